//! Access log model: one row per unique questionnaire visit.

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// One unique visit as recorded by the survey-collection app, which dedups
/// visitors by hash before inserting. The dashboard only ever counts these.
#[derive(Debug, Clone, FromRow)]
pub struct AccessRecord {
    pub id: Uuid,
    pub visitor_hash: String,
    pub occurred_at: DateTime<Utc>,
}
