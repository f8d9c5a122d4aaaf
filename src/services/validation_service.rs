use serde::{Deserialize, Serialize};

use crate::models::question::{Question, QuestionDetails};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

pub struct ValidationService;

impl ValidationService {
    /// Collects every violation instead of stopping at the first, so a
    /// faculty user sees all problems in one pass. Question numbers are
    /// 1-based positions in the input list.
    pub fn validate(questions: &[Question]) -> ValidationReport {
        let mut errors: Vec<String> = Vec::new();

        for (idx, q) in questions.iter().enumerate() {
            let number = idx + 1;

            if q.question.trim().len() < 5 {
                errors.push(format!("Question {}: Question text is too short", number));
            }

            match &q.details {
                QuestionDetails::Mcq(mc) => {
                    if mc.options.len() < 2 {
                        errors.push(format!("Question {}: MCQ needs at least 2 options", number));
                    }
                    let answer_in_range = mc
                        .correct_answer
                        .is_some_and(|a| a >= 0 && (a as usize) < mc.options.len());
                    if !answer_in_range {
                        errors.push(format!("Question {}: Invalid correct answer index", number));
                    }
                }
                QuestionDetails::Coding(cd) => {
                    if cd.language.as_deref().map_or(true, str::is_empty) {
                        errors.push(format!(
                            "Question {}: Programming language not specified",
                            number
                        ));
                    }
                }
                QuestionDetails::Theory(_) => {}
            }
        }

        ValidationReport {
            is_valid: errors.is_empty(),
            errors,
        }
    }
}
