//! Route definitions for the Pulseboard API.

pub mod auth;
pub mod dashboard;
pub mod health;
