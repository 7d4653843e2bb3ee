//! Database models and DTOs.

pub mod access;
pub mod response;
pub mod user;
