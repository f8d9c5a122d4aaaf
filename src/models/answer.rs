use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// One answer as submitted by the exam portal. `answer` stays loose JSON
/// because MCQ clients send either a bare index or `{"selected": n}`, and
/// theory clients send free text.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedAnswer {
    #[serde(default)]
    pub question_id: i32,
    #[serde(default)]
    pub answer: JsonValue,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub test_case_results: Option<Vec<TestCaseResult>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_spent_seconds: Option<i32>,
}

impl SubmittedAnswer {
    pub fn selected_index(&self) -> Option<i64> {
        self.answer.as_i64().or_else(|| {
            self.answer
                .get("selected")
                .and_then(|selected| selected.as_i64())
        })
    }

    pub fn is_empty(&self) -> bool {
        match &self.answer {
            JsonValue::Null => self.test_case_results.is_none(),
            JsonValue::String(s) => s.trim().is_empty() && self.test_case_results.is_none(),
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCaseResult {
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub input: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_output: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub actual_output: Option<String>,
}
