//! Survey response model: one submitted questionnaire.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// One survey submission as written by the collection app. Immutable here —
/// the dashboard reads this table, it never writes it.
///
/// `nps_score` is the 0–10 overall rating; `q1`–`q5` are the per-question
/// sub-scores on a 1–5 scale. The identity fields are whatever the respondent
/// chose to leave behind and may all be absent.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct SurveyResponse {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub nps_score: i32,
    pub q1: i32,
    pub q2: i32,
    pub q3: i32,
    pub q4: i32,
    pub q5: i32,
    pub duration_ms: i64,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub source: Option<String>,
}

impl SurveyResponse {
    /// The five per-question sub-scores in question order.
    pub fn question_scores(&self) -> [i32; 5] {
        [self.q1, self.q2, self.q3, self.q4, self.q5]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> SurveyResponse {
        SurveyResponse {
            id: Uuid::nil(),
            created_at: Utc::now(),
            nps_score: 8,
            q1: 1,
            q2: 2,
            q3: 3,
            q4: 4,
            q5: 5,
            duration_ms: 60_000,
            name: None,
            phone: None,
            source: None,
        }
    }

    #[test]
    fn question_scores_follow_question_order() {
        assert_eq!(sample().question_scores(), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn absent_identity_fields_serialize_as_null() {
        let json = serde_json::to_value(sample()).unwrap();
        assert!(json["name"].is_null());
        assert!(json["phone"].is_null());
        assert!(json["source"].is_null());
        assert_eq!(json["nps_score"], 8);
    }
}
