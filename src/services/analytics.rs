//! Dashboard analytics: bulk row fetch and in-memory aggregation.
//!
//! The fetch side issues two unfiltered read-all queries; survey data is
//! single-tenant and small, so there is no pagination or server-side
//! filtering. The aggregation side is a pure function over the fetched rows,
//! recomputed on every overview request.

use serde::Serialize;
use sqlx::PgPool;

use crate::models::access::AccessRecord;
use crate::models::response::SurveyResponse;

/// Score bands for the NPS distribution chart, in display order.
/// Thresholds are inclusive upper bounds; every 0–10 score lands in
/// exactly one band.
const SCORE_BANDS: [(i32, &str, &str, &str); 3] = [
    (3, "0-3", "Poor", "#EF4444"),
    (7, "4-7", "Good", "#F59E0B"),
    (10, "8-10", "Excellent", "#10B981"),
];

/// Mean sub-score for one of the five survey questions.
#[derive(Debug, Serialize)]
pub struct QuestionAverage {
    pub question: String,
    pub average: f64,
}

/// Response count for one calendar day. `date` is the display-formatted
/// grouping key the bar chart plots directly.
#[derive(Debug, Serialize, PartialEq)]
pub struct DailyCount {
    pub date: String,
    pub count: i64,
}

/// One slice of the score-distribution pie chart, with the fill color and
/// percentage precomputed so the renderer applies no logic.
#[derive(Debug, Serialize)]
pub struct ScoreBand {
    pub range: String,
    pub label: String,
    pub count: i64,
    pub fill: String,
    pub percentage: f64,
}

/// Everything the dashboard view binds: summary tiles, both charts, and the
/// raw response table.
#[derive(Debug, Serialize)]
pub struct DashboardOverview {
    pub total_accesses: i64,
    pub total_responses: i64,
    pub nps_average: f64,
    pub question_averages: Vec<QuestionAverage>,
    pub responses_per_day: Vec<DailyCount>,
    pub score_distribution: Vec<ScoreBand>,
    pub responses: Vec<SurveyResponse>,
}

/// Fetch both tables concurrently and aggregate.
///
/// Infallible by contract: a failed read degrades to an empty row set and a
/// zero-valued dashboard rather than an error response. The warning log is
/// the only place "fetch failed" is distinguishable from "no data yet".
pub async fn get_overview(pool: &PgPool) -> DashboardOverview {
    let (accesses, responses) = tokio::join!(fetch_access_log(pool), fetch_responses(pool));
    aggregate(&accesses, responses)
}

/// Read-all on the access log, degrading to empty on failure.
async fn fetch_access_log(pool: &PgPool) -> Vec<AccessRecord> {
    match sqlx::query_as::<_, AccessRecord>("SELECT * FROM access_log")
        .fetch_all(pool)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, "access_log fetch failed, substituting empty set");
            Vec::new()
        }
    }
}

/// Read-all on the responses table, degrading to empty on failure.
async fn fetch_responses(pool: &PgPool) -> Vec<SurveyResponse> {
    match sqlx::query_as::<_, SurveyResponse>("SELECT * FROM responses ORDER BY created_at")
        .fetch_all(pool)
        .await
    {
        Ok(rows) => rows,
        Err(e) => {
            tracing::warn!(error = %e, "responses fetch failed, substituting empty set");
            Vec::new()
        }
    }
}

/// Reduce the raw rows to the dashboard view model.
///
/// Total over any input: an empty list yields all-zero means and percentages
/// (every division is guarded), and the distribution always carries all
/// three bands so the pie chart keeps a stable legend.
pub fn aggregate(accesses: &[AccessRecord], responses: Vec<SurveyResponse>) -> DashboardOverview {
    let total_accesses = accesses.len() as i64;
    let total_responses = responses.len() as i64;

    let nps_average = mean(responses.iter().map(|r| r.nps_score));

    let question_averages = (0..5)
        .map(|i| QuestionAverage {
            question: format!("Q{}", i + 1),
            average: mean(responses.iter().map(|r| r.question_scores()[i])),
        })
        .collect();

    // Group by calendar date in first-seen order. A linear scan over the
    // accumulated pairs beats a map here: the series is at most a few dozen
    // days long and the chart wants insertion order anyway.
    let mut responses_per_day: Vec<DailyCount> = Vec::new();
    for response in &responses {
        let date = response.created_at.format("%d/%m/%Y").to_string();
        match responses_per_day.iter_mut().find(|d| d.date == date) {
            Some(day) => day.count += 1,
            None => responses_per_day.push(DailyCount { date, count: 1 }),
        }
    }

    let mut band_counts = [0i64; 3];
    for response in &responses {
        band_counts[band_index(response.nps_score)] += 1;
    }

    let score_distribution = SCORE_BANDS
        .iter()
        .zip(band_counts)
        .map(|(&(_, range, label, fill), count)| ScoreBand {
            range: range.to_string(),
            label: label.to_string(),
            count,
            fill: fill.to_string(),
            percentage: if total_responses > 0 {
                count as f64 / total_responses as f64 * 100.0
            } else {
                0.0
            },
        })
        .collect();

    DashboardOverview {
        total_accesses,
        total_responses,
        nps_average,
        question_averages,
        responses_per_day,
        score_distribution,
        responses,
    }
}

/// Mean of an integer sequence, 0 for an empty one.
fn mean(scores: impl Iterator<Item = i32>) -> f64 {
    let (sum, count) = scores.fold((0i64, 0i64), |(s, c), v| (s + i64::from(v), c + 1));
    if count > 0 {
        sum as f64 / count as f64
    } else {
        0.0
    }
}

/// Band index for an overall score: ≤3, ≤7, else.
fn band_index(score: i32) -> usize {
    SCORE_BANDS
        .iter()
        .position(|&(upper, ..)| score <= upper)
        .unwrap_or(SCORE_BANDS.len() - 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn response(created_at: chrono::DateTime<Utc>, nps_score: i32, qs: [i32; 5]) -> SurveyResponse {
        SurveyResponse {
            id: Uuid::new_v4(),
            created_at,
            nps_score,
            q1: qs[0],
            q2: qs[1],
            q3: qs[2],
            q4: qs[3],
            q5: qs[4],
            duration_ms: 45_000,
            name: None,
            phone: None,
            source: None,
        }
    }

    fn access(day: u32) -> AccessRecord {
        AccessRecord {
            id: Uuid::new_v4(),
            visitor_hash: format!("hash-{day}"),
            occurred_at: Utc.with_ymd_and_hms(2025, 3, day, 9, 0, 0).unwrap(),
        }
    }

    fn at(day: u32, hour: u32) -> chrono::DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn empty_input_yields_all_zeros() {
        let overview = aggregate(&[], Vec::new());

        assert_eq!(overview.total_accesses, 0);
        assert_eq!(overview.total_responses, 0);
        assert_eq!(overview.nps_average, 0.0);
        for qa in &overview.question_averages {
            assert_eq!(qa.average, 0.0);
        }
        assert!(overview.responses_per_day.is_empty());
        assert_eq!(overview.score_distribution.len(), 3);
        for band in &overview.score_distribution {
            assert_eq!(band.count, 0);
            assert_eq!(band.percentage, 0.0);
        }
    }

    #[test]
    fn band_counts_sum_to_response_count() {
        let responses: Vec<_> = (0..=10)
            .map(|score| response(at(1, 8), score, [3; 5]))
            .collect();
        let total = responses.len() as i64;

        let overview = aggregate(&[], responses);

        let band_sum: i64 = overview.score_distribution.iter().map(|b| b.count).sum();
        assert_eq!(band_sum, total);
        assert_eq!(overview.total_responses, total);
    }

    #[test]
    fn all_tens_fill_the_top_band() {
        let responses: Vec<_> = (0..4).map(|_| response(at(1, 8), 10, [5; 5])).collect();

        let overview = aggregate(&[], responses);

        let top = &overview.score_distribution[2];
        assert_eq!(top.range, "8-10");
        assert_eq!(top.count, 4);
        assert_eq!(top.percentage, 100.0);
        assert_eq!(overview.score_distribution[0].count, 0);
        assert_eq!(overview.score_distribution[1].count, 0);
    }

    #[test]
    fn one_score_per_band_splits_evenly() {
        let responses = vec![
            response(at(1, 8), 2, [3; 5]),
            response(at(1, 9), 5, [3; 5]),
            response(at(1, 10), 9, [3; 5]),
        ];

        let overview = aggregate(&[], responses);

        for band in &overview.score_distribution {
            assert_eq!(band.count, 1);
            assert!((band.percentage - 100.0 / 3.0).abs() < 0.1);
        }
        let pct_sum: f64 = overview.score_distribution.iter().map(|b| b.percentage).sum();
        assert!((pct_sum - 100.0).abs() < 1e-9);
    }

    #[test]
    fn band_thresholds_are_inclusive() {
        let responses = vec![
            response(at(1, 8), 3, [3; 5]),
            response(at(1, 9), 4, [3; 5]),
            response(at(1, 10), 7, [3; 5]),
            response(at(1, 11), 8, [3; 5]),
        ];

        let overview = aggregate(&[], responses);

        assert_eq!(overview.score_distribution[0].count, 1); // 3
        assert_eq!(overview.score_distribution[1].count, 2); // 4, 7
        assert_eq!(overview.score_distribution[2].count, 1); // 8
    }

    #[test]
    fn per_question_mean_is_exact() {
        let responses = vec![
            response(at(1, 8), 8, [2, 1, 5, 4, 3]),
            response(at(1, 9), 8, [4, 1, 5, 2, 3]),
        ];

        let overview = aggregate(&[], responses);

        assert_eq!(overview.question_averages[0].question, "Q1");
        assert_eq!(overview.question_averages[0].average, 3.0);
        assert_eq!(overview.question_averages[1].average, 1.0);
        assert_eq!(overview.question_averages[2].average, 5.0);
        assert_eq!(overview.question_averages[3].average, 3.0);
        assert_eq!(overview.question_averages[4].average, 3.0);
    }

    #[test]
    fn overall_mean_matches_scores() {
        let responses = vec![
            response(at(1, 8), 6, [3; 5]),
            response(at(1, 9), 9, [3; 5]),
        ];

        let overview = aggregate(&[], responses);

        assert_eq!(overview.nps_average, 7.5);
    }

    #[test]
    fn same_day_different_times_share_a_bucket() {
        let responses = vec![
            response(at(5, 8), 8, [3; 5]),
            response(at(5, 21), 9, [3; 5]),
        ];

        let overview = aggregate(&[], responses);

        assert_eq!(
            overview.responses_per_day,
            vec![DailyCount {
                date: "05/03/2025".to_string(),
                count: 2
            }]
        );
    }

    #[test]
    fn daily_buckets_keep_first_seen_order() {
        let responses = vec![
            response(at(7, 8), 8, [3; 5]),
            response(at(2, 9), 9, [3; 5]),
            response(at(7, 23), 4, [3; 5]),
        ];

        let overview = aggregate(&[], responses);

        let dates: Vec<_> = overview
            .responses_per_day
            .iter()
            .map(|d| d.date.as_str())
            .collect();
        assert_eq!(dates, vec!["07/03/2025", "02/03/2025"]);
        assert_eq!(overview.responses_per_day[0].count, 2);
        assert_eq!(overview.responses_per_day[1].count, 1);
    }

    #[test]
    fn access_and_response_counts_are_independent() {
        let accesses = vec![access(1), access(2), access(3)];
        let responses = vec![response(at(1, 8), 10, [5; 5])];

        let overview = aggregate(&accesses, responses);

        assert_eq!(overview.total_accesses, 3);
        assert_eq!(overview.total_responses, 1);
        assert_eq!(overview.responses.len(), 1);
    }

    #[test]
    fn band_metadata_is_fixed() {
        let overview = aggregate(&[], Vec::new());

        let ranges: Vec<_> = overview
            .score_distribution
            .iter()
            .map(|b| (b.range.as_str(), b.label.as_str(), b.fill.as_str()))
            .collect();
        assert_eq!(
            ranges,
            vec![
                ("0-3", "Poor", "#EF4444"),
                ("4-7", "Good", "#F59E0B"),
                ("8-10", "Excellent", "#10B981"),
            ]
        );
    }
}
