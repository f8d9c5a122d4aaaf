use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::answer::SubmittedAnswer;
use crate::models::question::{Question, QuestionDetails};
use crate::models::score::{AnswerStatus, LatePenaltyInfo, ScoreBreakdownEntry, ScoreReport};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRules {
    #[serde(default = "default_correct_marks")]
    pub correct_marks: f64,
    #[serde(default)]
    pub incorrect_marks: f64,
    #[serde(default)]
    pub unanswered_marks: f64,
    #[serde(default)]
    pub partial_credit: bool,
}

fn default_correct_marks() -> f64 {
    1.0
}

impl Default for ScoringRules {
    fn default() -> Self {
        Self {
            correct_marks: 1.0,
            incorrect_marks: 0.0,
            unanswered_marks: 0.0,
            partial_credit: false,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatePenaltyRules {
    #[serde(default)]
    pub enable_late_penalty: bool,
    #[serde(default)]
    pub penalty_per_minute: f64,
    #[serde(default)]
    pub grace_period_minutes: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionGrade {
    pub report: ScoreReport,
    pub needs_review: bool,
}

/// Scores are computed over already-validated banks. Structurally invalid
/// questions are not re-checked here and can produce meaningless numbers.
pub struct ScoringService;

impl ScoringService {
    pub fn score(
        answers: &[SubmittedAnswer],
        questions: &[Question],
        rules: &ScoringRules,
    ) -> ScoreReport {
        let mut score_breakdown = Vec::with_capacity(questions.len());
        let mut total = 0.0;
        let mut max_score = 0.0;
        let mut correct_count = 0;
        let mut incorrect_count = 0;
        let mut unanswered_count = 0;
        let mut partial_count = 0;

        for (idx, q) in questions.iter().enumerate() {
            let marks = q.max_marks(rules.correct_marks);
            max_score += marks;

            let question_id = q.id.max((idx as i32) + 1);
            let answer = answers.iter().find(|a| a.question_id == question_id);

            let (scored, status) = match answer {
                None => (rules.unanswered_marks, AnswerStatus::Unanswered),
                Some(a) if a.is_empty() => (rules.unanswered_marks, AnswerStatus::Unanswered),
                Some(a) => Self::score_answer(q, a, marks, rules),
            };

            total += scored;
            match status {
                AnswerStatus::Correct => correct_count += 1,
                AnswerStatus::Incorrect => incorrect_count += 1,
                AnswerStatus::Partial => partial_count += 1,
                AnswerStatus::Unanswered => unanswered_count += 1,
                AnswerStatus::Pending => {}
            }

            score_breakdown.push(ScoreBreakdownEntry {
                question_number: (idx as i32) + 1,
                marks,
                scored,
                status,
            });
        }

        // The aggregate never goes below zero; breakdown entries keep the raw
        // per-question values, negatives included.
        let total_score = total.max(0.0);
        let percentage = if max_score > 0.0 {
            total_score / max_score * 100.0
        } else {
            0.0
        };

        ScoreReport {
            total_score,
            max_score,
            correct_count,
            incorrect_count,
            unanswered_count,
            partial_count,
            score_breakdown,
            percentage,
            late_penalty: None,
        }
    }

    fn score_answer(
        q: &Question,
        answer: &SubmittedAnswer,
        marks: f64,
        rules: &ScoringRules,
    ) -> (f64, AnswerStatus) {
        match &q.details {
            QuestionDetails::Mcq(mc) => {
                // A selection matching either the current or the pre-shuffle
                // index counts, so both answer encodings grade the same.
                let selected = answer.selected_index().map(|s| s as i32);
                let is_correct = selected.is_some()
                    && (selected == mc.correct_answer || selected == mc.original_correct_answer);

                if is_correct {
                    (marks, AnswerStatus::Correct)
                } else {
                    (incorrect_penalty(q, rules), AnswerStatus::Incorrect)
                }
            }
            QuestionDetails::Coding(_) => {
                let results = answer.test_case_results.as_deref().unwrap_or(&[]);
                let passed = results.iter().filter(|r| r.passed).count();
                let total = results.len();

                if rules.partial_credit && total > 0 {
                    let scored = (passed as f64 / total as f64) * marks;
                    let status = if passed == total {
                        AnswerStatus::Correct
                    } else if passed > 0 {
                        AnswerStatus::Partial
                    } else {
                        AnswerStatus::Incorrect
                    };
                    (scored, status)
                } else if total > 0 && passed == total {
                    (marks, AnswerStatus::Correct)
                } else {
                    (incorrect_penalty(q, rules), AnswerStatus::Incorrect)
                }
            }
            // Free text is never auto-graded.
            QuestionDetails::Theory(_) => (0.0, AnswerStatus::Pending),
        }
    }

    pub fn apply_time_penalty(
        report: ScoreReport,
        submitted_at: Option<DateTime<Utc>>,
        deadline: Option<DateTime<Utc>>,
        rules: &LatePenaltyRules,
    ) -> ScoreReport {
        if !rules.enable_late_penalty {
            return report;
        }
        let (Some(submitted_at), Some(deadline)) = (submitted_at, deadline) else {
            return report;
        };

        let delay_minutes = (submitted_at - deadline).num_minutes().max(0);
        if delay_minutes <= rules.grace_period_minutes {
            return report;
        }

        let penalty = (delay_minutes - rules.grace_period_minutes) as f64 * rules.penalty_per_minute;
        let original_score = report.total_score;

        let mut penalized = report;
        penalized.total_score = (original_score - penalty).max(0.0);
        penalized.late_penalty = Some(LatePenaltyInfo {
            penalty,
            delay_minutes,
            original_score,
        });
        penalized
    }

    /// Synchronous submission-time grading: the general engine with default
    /// rules (no negative marking, no partial credit). Theory answers are
    /// flagged for manual review instead of being scored.
    pub fn grade_submission(
        answers: &[SubmittedAnswer],
        questions: &[Question],
    ) -> SubmissionGrade {
        let report = Self::score(answers, questions, &ScoringRules::default());
        let needs_review = report
            .score_breakdown
            .iter()
            .any(|e| e.status == AnswerStatus::Pending);

        SubmissionGrade {
            report,
            needs_review,
        }
    }
}

fn incorrect_penalty(q: &Question, rules: &ScoringRules) -> f64 {
    let magnitude = q.negative_marks.unwrap_or(rules.incorrect_marks).abs();
    // Keeps a negative zero out of the breakdown when the penalty is zero.
    if magnitude > 0.0 {
        -magnitude
    } else {
        0.0
    }
}
