use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnswerStatus {
    Correct,
    Incorrect,
    Partial,
    Unanswered,
    Pending,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdownEntry {
    pub question_number: i32,
    pub marks: f64,
    pub scored: f64,
    pub status: AnswerStatus,
}

/// Computed once per submission event. A regrade builds a fresh report, the
/// engine never mutates an existing one.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreReport {
    pub total_score: f64,
    pub max_score: f64,
    pub correct_count: i32,
    pub incorrect_count: i32,
    pub unanswered_count: i32,
    pub partial_count: i32,
    pub score_breakdown: Vec<ScoreBreakdownEntry>,
    pub percentage: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub late_penalty: Option<LatePenaltyInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatePenaltyInfo {
    pub penalty: f64,
    pub delay_minutes: i64,
    pub original_score: f64,
}
