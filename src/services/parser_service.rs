use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::models::question::{
    CodingDetails, McqDetails, Question, QuestionDetails, QuestionType, TheoryDetails,
};

static TEMPLATE_HEADER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)Q\d+[.:]|Question\s+\d+").expect("template header regex is invalid")
});
static TYPE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\[(?:MCQ|CODING|CODE|THEORY)\]").expect("type marker regex is invalid")
});
static TEMPLATE_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^([a-d])\)\s*(.+)$").expect("template option regex is invalid")
});
static TEMPLATE_ANSWER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Answer:\s*([a-d])").expect("template answer regex is invalid"));
static MARKS_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Marks?:\s*(\d+)").expect("marks tag regex is invalid"));
static LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Language:\s*(\w+)").expect("language tag regex is invalid"));
static CODE_FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)```\w*\r?\n(.*?)```").expect("code fence regex is invalid")
});
static SMART_QUESTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)[.)\s]+(.+)$").expect("smart question regex is invalid")
});
static SMART_OPTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-dA-D][.)]\s*(.+)$").expect("smart option regex is invalid")
});
static SMART_ANSWER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Answer:\s*([a-dA-D0-9])").expect("smart answer regex is invalid")
});
static CODING_HINT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(write|implement|create|code|program|function)")
        .expect("coding hint regex is invalid")
});

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParseFormat {
    #[default]
    Auto,
    Csv,
    Json,
    Template,
    Smart,
}

#[derive(Clone)]
pub struct ParserService {
    default_language: String,
}

impl ParserService {
    pub fn new(default_language: String) -> Self {
        Self { default_language }
    }

    pub fn parse(&self, text: &str, format: ParseFormat) -> Result<Vec<Question>> {
        let resolved = match format {
            ParseFormat::Auto => self.detect_format(text),
            other => other,
        };

        let mut questions = match resolved {
            ParseFormat::Json => self.parse_json(text)?,
            ParseFormat::Csv => self.parse_csv(text),
            ParseFormat::Template => self.parse_template(text),
            _ => self.parse_smart(text),
        };

        for (idx, q) in questions.iter_mut().enumerate() {
            q.id = (idx as i32) + 1;
        }

        Ok(questions)
    }

    pub fn detect_format(&self, text: &str) -> ParseFormat {
        let trimmed = text.trim();

        if let Ok(value) = serde_json::from_str::<JsonValue>(trimmed) {
            if value.is_array() || value.is_object() {
                return ParseFormat::Json;
            }
        }

        let mut lines = trimmed.lines().filter(|l| !l.trim().is_empty());
        if let Some(first) = lines.next() {
            let commas = first.matches(',').count();
            if commas > 0 && lines.take(4).all(|l| l.matches(',').count() == commas) {
                return ParseFormat::Csv;
            }
        }

        if TEMPLATE_HEADER.is_match(trimmed) {
            return ParseFormat::Template;
        }

        ParseFormat::Smart
    }

    fn parse_json(&self, text: &str) -> Result<Vec<Question>> {
        let value: JsonValue = serde_json::from_str(text)?;
        match value {
            JsonValue::Array(_) => Ok(serde_json::from_value(value)?),
            JsonValue::Object(_) => Ok(vec![serde_json::from_value(value)?]),
            _ => Err(Error::Parse(
                "JSON input must be an array or object of questions".to_string(),
            )),
        }
    }

    fn parse_csv(&self, text: &str) -> Vec<Question> {
        let mut questions = Vec::new();
        let mut first_row = true;

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            if first_row {
                first_row = false;
                let lower = line.to_lowercase();
                if lower.contains("type") || lower.contains("question") {
                    continue;
                }
            }

            let cols: Vec<String> = line.split(',').map(|c| c.trim().to_string()).collect();
            let question_type = QuestionType::from_keyword(cols.first().map_or("", String::as_str));
            let question = cols.get(1).cloned().unwrap_or_default();
            let marks = cols
                .last()
                .and_then(|c| c.parse::<f64>().ok())
                .unwrap_or(1.0);

            let details = match question_type {
                QuestionType::Mcq => {
                    let options: Vec<String> = (2..=5)
                        .filter_map(|i| cols.get(i))
                        .filter(|c| !c.is_empty())
                        .cloned()
                        .collect();
                    let correct_answer = cols.get(6).map(|c| c.parse::<i32>().unwrap_or(0));
                    QuestionDetails::Mcq(McqDetails {
                        options,
                        correct_answer,
                        original_correct_answer: None,
                        explanation: None,
                    })
                }
                QuestionType::Coding => QuestionDetails::Coding(CodingDetails {
                    language: Some(self.default_language.clone()),
                    starter_code: None,
                    test_cases: Vec::new(),
                }),
                QuestionType::Theory => QuestionDetails::Theory(TheoryDetails {}),
            };

            questions.push(Question {
                id: 0,
                question_type,
                question,
                marks: Some(marks),
                details,
                negative_marks: None,
                note: None,
                randomized_order: None,
                original_index: None,
            });
        }

        questions
    }

    fn parse_template(&self, text: &str) -> Vec<Question> {
        let mut questions = Vec::new();

        for block in TEMPLATE_HEADER.split(text) {
            let block = block.trim();
            if block.is_empty() {
                continue;
            }

            let first_line = block.lines().next().unwrap_or("");
            let question = TYPE_MARKER.replace_all(first_line, "").trim().to_string();
            let marks = MARKS_TAG
                .captures(block)
                .and_then(|c| c[1].parse::<f64>().ok())
                .unwrap_or(1.0);

            let upper = block.to_uppercase();
            let (question_type, details) = if upper.contains("[CODING]") || upper.contains("[CODE]")
            {
                let language = LANGUAGE_TAG.captures(block).map(|c| c[1].to_string());
                let starter_code = CODE_FENCE
                    .captures(block)
                    .map(|c| c[1].trim_end().to_string());
                (
                    QuestionType::Coding,
                    QuestionDetails::Coding(CodingDetails {
                        language,
                        starter_code,
                        test_cases: Vec::new(),
                    }),
                )
            } else if upper.contains("[MCQ]") || TEMPLATE_OPTION.is_match(block) {
                let options: Vec<String> = TEMPLATE_OPTION
                    .captures_iter(block)
                    .map(|c| c[2].trim().to_string())
                    .collect();
                let correct_answer = TEMPLATE_ANSWER
                    .captures(block)
                    .map(|c| answer_token_index(&c[1]));
                (
                    QuestionType::Mcq,
                    QuestionDetails::Mcq(McqDetails {
                        options,
                        correct_answer,
                        original_correct_answer: None,
                        explanation: None,
                    }),
                )
            } else {
                (QuestionType::Theory, QuestionDetails::Theory(TheoryDetails {}))
            };

            questions.push(Question {
                id: 0,
                question_type,
                question,
                marks: Some(marks),
                details,
                negative_marks: None,
                note: None,
                randomized_order: None,
                original_index: None,
            });
        }

        questions
    }

    fn parse_smart(&self, text: &str) -> Vec<Question> {
        let mut questions = Vec::new();
        let mut current: Option<SmartDraft> = None;
        let mut in_fence = false;
        let mut fence_buf: Vec<String> = Vec::new();

        for raw_line in text.lines() {
            let line = raw_line.trim();

            if line.starts_with("```") {
                if in_fence {
                    if let Some(draft) = current.as_mut() {
                        draft.coding = true;
                        draft.starter_code = Some(fence_buf.join("\n"));
                    }
                    fence_buf.clear();
                }
                in_fence = !in_fence;
                continue;
            }
            if in_fence {
                fence_buf.push(raw_line.to_string());
                continue;
            }

            if let Some(caps) = SMART_QUESTION.captures(line) {
                if let Some(draft) = current.take() {
                    questions.push(draft.finish(&self.default_language));
                }
                let mut draft = SmartDraft::new(caps[2].trim().to_string());
                if CODING_HINT.is_match(&caps[2]) {
                    draft.coding = true;
                }
                current = Some(draft);
                continue;
            }

            if let Some(caps) = SMART_OPTION.captures(line) {
                if let Some(draft) = current.as_mut() {
                    draft.options.push(caps[1].trim().to_string());
                }
                continue;
            }

            if let Some(caps) = SMART_ANSWER.captures(line) {
                if let Some(draft) = current.as_mut() {
                    draft.correct_answer = Some(answer_token_index(&caps[1]));
                }
                continue;
            }

            if CODING_HINT.is_match(line) {
                if let Some(draft) = current.as_mut() {
                    draft.coding = true;
                }
            }
        }

        if let Some(draft) = current.take() {
            questions.push(draft.finish(&self.default_language));
        }

        questions
    }
}

struct SmartDraft {
    question: String,
    options: Vec<String>,
    correct_answer: Option<i32>,
    coding: bool,
    starter_code: Option<String>,
}

impl SmartDraft {
    fn new(question: String) -> Self {
        Self {
            question,
            options: Vec::new(),
            correct_answer: None,
            coding: false,
            starter_code: None,
        }
    }

    // Collected options win over a coding hint: a numbered question that
    // gathered lettered options is an MCQ no matter what its text says.
    fn finish(self, default_language: &str) -> Question {
        let (question_type, details) = if !self.options.is_empty() {
            (
                QuestionType::Mcq,
                QuestionDetails::Mcq(McqDetails {
                    options: self.options,
                    correct_answer: self.correct_answer,
                    original_correct_answer: None,
                    explanation: None,
                }),
            )
        } else if self.coding {
            (
                QuestionType::Coding,
                QuestionDetails::Coding(CodingDetails {
                    language: Some(default_language.to_string()),
                    starter_code: self.starter_code,
                    test_cases: Vec::new(),
                }),
            )
        } else {
            (QuestionType::Theory, QuestionDetails::Theory(TheoryDetails {}))
        };

        Question {
            id: 0,
            question_type,
            question: self.question,
            marks: Some(1.0),
            details,
            negative_marks: None,
            note: None,
            randomized_order: None,
            original_index: None,
        }
    }
}

fn answer_token_index(token: &str) -> i32 {
    match token.chars().next().map(|c| c.to_ascii_lowercase()) {
        Some('a') => 0,
        Some('b') => 1,
        Some('c') => 2,
        Some('d') => 3,
        Some(digit) => digit.to_digit(10).map_or(0, |d| d as i32),
        None => 0,
    }
}
