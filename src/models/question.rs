use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: i32,
    #[serde(rename = "type")]
    pub question_type: QuestionType,
    pub question: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marks: Option<f64>,
    #[serde(flatten)]
    pub details: QuestionDetails,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub negative_marks: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub randomized_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_index: Option<i32>,
}

impl Question {
    pub fn max_marks(&self, fallback: f64) -> f64 {
        self.marks.unwrap_or(fallback)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionType {
    Mcq,
    Coding,
    Theory,
}

impl QuestionType {
    /// Keyword mapping shared by the CSV type column and loose-JSON coercion,
    /// so labels like `MCQ`, `Multiple Choice` or `programming` all normalize.
    pub fn from_keyword(raw: &str) -> Self {
        let lower = raw.trim().to_lowercase();
        if lower.contains("mcq") || lower.contains("multiple") || lower.contains("choice") {
            QuestionType::Mcq
        } else if lower.contains("cod") || lower.contains("prog") {
            QuestionType::Coding
        } else {
            QuestionType::Theory
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum QuestionDetails {
    Mcq(McqDetails),
    Coding(CodingDetails),
    Theory(TheoryDetails),
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct McqDetails {
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_answer: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_correct_answer: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CodingDetails {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starter_code: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub test_cases: Vec<TestCase>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TheoryDetails {}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestCase {
    pub input: String,
    pub expected_output: String,
    #[serde(default)]
    pub is_hidden: bool,
}

// Incoming records are coerced through this shape: the declared type picks the
// details variant exactly once, and fields that do not belong to it are
// dropped, so a theory record with stray options can never be scored as MCQ.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawQuestion {
    #[serde(default)]
    id: i32,
    #[serde(rename = "type")]
    question_type: Option<String>,
    #[serde(default)]
    question: String,
    marks: Option<f64>,
    options: Option<Vec<String>>,
    correct_answer: Option<i32>,
    original_correct_answer: Option<i32>,
    explanation: Option<String>,
    language: Option<String>,
    starter_code: Option<String>,
    test_cases: Option<Vec<TestCase>>,
    negative_marks: Option<f64>,
    note: Option<String>,
    randomized_order: Option<i32>,
    original_index: Option<i32>,
}

impl RawQuestion {
    fn into_question(self) -> Question {
        let question_type =
            QuestionType::from_keyword(self.question_type.as_deref().unwrap_or("theory"));
        let details = match question_type {
            QuestionType::Mcq => QuestionDetails::Mcq(McqDetails {
                options: self.options.unwrap_or_default(),
                correct_answer: self.correct_answer,
                original_correct_answer: self.original_correct_answer,
                explanation: self.explanation,
            }),
            QuestionType::Coding => QuestionDetails::Coding(CodingDetails {
                language: self.language,
                starter_code: self.starter_code,
                test_cases: self.test_cases.unwrap_or_default(),
            }),
            QuestionType::Theory => QuestionDetails::Theory(TheoryDetails {}),
        };

        Question {
            id: self.id,
            question_type,
            question: self.question,
            marks: self.marks,
            details,
            negative_marks: self.negative_marks,
            note: self.note,
            randomized_order: self.randomized_order,
            original_index: self.original_index,
        }
    }
}

impl<'de> Deserialize<'de> for Question {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = RawQuestion::deserialize(deserializer)?;
        Ok(raw.into_question())
    }
}
