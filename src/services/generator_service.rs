use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::error::{Error, Result};
use crate::models::question::{
    CodingDetails, McqDetails, Question, QuestionDetails, QuestionType, TheoryDetails,
};

static JSON_ARRAY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)\[.*\]").expect("json array regex is invalid"));
static BULLET_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[•\-\*\d]+[.)]\s*(.+)$").expect("bullet line regex is invalid")
});

const DEFAULT_TOPICS: [&str; 4] = [
    "the main concepts of the course",
    "key definitions and terminology",
    "practical applications of the subject",
    "common problem solving techniques",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationType {
    Mcq,
    Coding,
    Theory,
    #[default]
    Mixed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOptions {
    #[serde(rename = "type", default)]
    pub question_type: GenerationType,
    #[serde(default = "default_count")]
    pub count: usize,
    #[serde(default)]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub include_explanations: bool,
}

fn default_count() -> usize {
    5
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            question_type: GenerationType::default(),
            count: default_count(),
            difficulty: Difficulty::default(),
            language: None,
            include_explanations: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GenerationSource {
    Ai,
    Template,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GenerationOutput {
    pub questions: Vec<Question>,
    pub source: GenerationSource,
    pub logs: Vec<String>,
}

#[derive(Clone)]
pub struct GeneratorService {
    client: Client,
    api_key: Option<String>,
    model: String,
    default_language: String,
    max_count: usize,
    timeout_secs: u64,
}

impl GeneratorService {
    pub fn new(
        api_key: Option<String>,
        model: String,
        default_language: String,
        max_count: usize,
        timeout_secs: u64,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            model,
            default_language,
            max_count,
            timeout_secs,
        }
    }

    /// Never fails: a remote failure of any kind is logged and answered by the
    /// deterministic template stage. Callers learn which stage produced the
    /// questions from `source`.
    pub async fn generate(&self, syllabus: &str, options: &GenerationOptions) -> GenerationOutput {
        let mut logs: Vec<String> = vec![];
        logs.push(format!(
            "Starting generation for {} questions.",
            options.count.min(self.max_count)
        ));

        if self.api_key.is_some() {
            logs.push("Sending request to the generation backend...".to_string());
            match self.try_remote_generate(syllabus, options).await {
                Ok(questions) if !questions.is_empty() => {
                    logs.push(format!("Finalized {} AI questions.", questions.len()));
                    return GenerationOutput {
                        questions,
                        source: GenerationSource::Ai,
                        logs,
                    };
                }
                Ok(_) => {
                    tracing::warn!("AI generation returned no questions, using templates");
                    logs.push("AI generation returned no questions. Falling back to templates.".to_string());
                }
                Err(e) => {
                    tracing::error!("AI generation failed: {:?}", e);
                    logs.push(format!("AI generation failed: {}. Falling back to templates.", e));
                }
            }
        } else {
            logs.push("No generation backend configured. Using templates.".to_string());
        }

        let questions = self.template_generate(syllabus, options);
        logs.push(format!("Finalized {} template questions.", questions.len()));
        GenerationOutput {
            questions,
            source: GenerationSource::Template,
            logs,
        }
    }

    pub async fn try_remote_generate(
        &self,
        syllabus: &str,
        options: &GenerationOptions,
    ) -> Result<Vec<Question>> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| Error::Generation("no generation backend configured".to_string()))?;

        let system_prompt = r#"You are an experienced university examiner.
Your task is to generate exam questions strictly as a JSON array.

Rules:
1. Generate exactly the requested number of questions.
2. Every question must be answerable from the given syllabus.
3. For MCQ questions, VARY the correctAnswer index. Do NOT always use 0.
4. Return ONLY the JSON array. Do not wrap it in an object and do not add commentary."#;

        let payload = serde_json::json!({
            "model": self.model,
            "messages": [
                {"role": "system", "content": system_prompt},
                {"role": "user", "content": self.build_prompt(syllabus, options)}
            ],
            "temperature": 0.8
        });

        let res = self
            .client
            .post("https://api.openai.com/v1/chat/completions")
            .bearer_auth(api_key)
            .json(&payload)
            .timeout(Duration::from_secs(self.timeout_secs))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Generation API error {}: {}", status, text).into());
        }

        let body: JsonValue = res.json().await?;
        let content = body
            .get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid generation response format"))?;

        let array = JSON_ARRAY
            .find(content)
            .ok_or_else(|| Error::Generation("no JSON array in the model reply".to_string()))?;

        let mut questions: Vec<Question> = serde_json::from_str(array.as_str())?;
        questions.truncate(options.count.min(self.max_count));
        for (idx, q) in questions.iter_mut().enumerate() {
            q.id = (idx as i32) + 1;
            if q.marks.is_none() {
                q.marks = Some(1.0);
            }
        }

        Ok(questions)
    }

    pub fn template_generate(&self, syllabus: &str, options: &GenerationOptions) -> Vec<Question> {
        let topics = extract_topics(syllabus);
        let language = options
            .language
            .clone()
            .unwrap_or_else(|| self.default_language.clone());
        let count = options.count.min(self.max_count);

        let mut questions = Vec::with_capacity(count);
        for i in 0..count {
            let topic = &topics[i % topics.len()];
            let question_type = match options.question_type {
                GenerationType::Mcq => QuestionType::Mcq,
                GenerationType::Coding => QuestionType::Coding,
                GenerationType::Theory => QuestionType::Theory,
                GenerationType::Mixed => match i % 3 {
                    0 => QuestionType::Mcq,
                    1 => QuestionType::Coding,
                    _ => QuestionType::Theory,
                },
            };
            questions.push(placeholder_question(
                topic,
                question_type,
                &language,
                options,
            ));
        }

        for (idx, q) in questions.iter_mut().enumerate() {
            q.id = (idx as i32) + 1;
        }
        questions
    }

    fn build_prompt(&self, syllabus: &str, options: &GenerationOptions) -> String {
        let language = options.language.as_deref().unwrap_or(&self.default_language);

        let mcq_example = serde_json::json!({
            "type": "mcq",
            "question": "Question text here...",
            "options": ["First option", "Second option", "Third option", "Fourth option"],
            "correctAnswer": 1,
            "marks": 1,
            "explanation": "Why the option at index 1 is correct..."
        });
        let coding_example = serde_json::json!({
            "type": "coding",
            "question": "Problem statement here...",
            "language": language,
            "starterCode": "def solve():\n    pass",
            "testCases": [
                {"input": "sample input", "expectedOutput": "expected output", "isHidden": false}
            ],
            "marks": 2
        });
        let theory_example = serde_json::json!({
            "type": "theory",
            "question": "Open-ended prompt here...",
            "marks": 2
        });

        let examples: Vec<JsonValue> = match options.question_type {
            GenerationType::Mcq => vec![mcq_example],
            GenerationType::Coding => vec![coding_example],
            GenerationType::Theory => vec![theory_example],
            GenerationType::Mixed => vec![mcq_example, coding_example, theory_example],
        };

        let explanations_rule = if options.include_explanations {
            "\nInclude an explanation field for every MCQ question."
        } else {
            ""
        };

        format!(
            "Generate exactly {} {} {} exam questions for this syllabus:\n\n{}\n\nCoding questions must use {}.{}\nReturn ONLY a JSON array of question objects. Example shapes:\n{}",
            options.count.min(self.max_count),
            format!("{:?}", options.difficulty).to_lowercase(),
            format!("{:?}", options.question_type).to_lowercase(),
            syllabus,
            language,
            explanations_rule,
            serde_json::to_string(&examples).unwrap()
        )
    }
}

fn placeholder_question(
    topic: &str,
    question_type: QuestionType,
    language: &str,
    options: &GenerationOptions,
) -> Question {
    let (question, note, details) = match question_type {
        QuestionType::Mcq => {
            let question = match options.difficulty {
                Difficulty::Easy => format!("Which of the following best defines {}?", topic),
                Difficulty::Medium => format!("Which statement about {} is correct?", topic),
                Difficulty::Hard => {
                    format!("Which of the following is the most accurate analysis of {}?", topic)
                }
            };
            let explanation = options.include_explanations.then(|| {
                format!("Replace with an explanation of the correct answer for {}", topic)
            });
            (
                question,
                "Auto-generated placeholder. Edit the options and correct answer before use.",
                QuestionDetails::Mcq(McqDetails {
                    options: vec![
                        "Definition A".to_string(),
                        "Definition B".to_string(),
                        "Definition C".to_string(),
                        "Definition D".to_string(),
                    ],
                    correct_answer: Some(0),
                    original_correct_answer: None,
                    explanation,
                }),
            )
        }
        QuestionType::Coding => {
            let question = match options.difficulty {
                Difficulty::Easy => format!("Write a simple program related to {}", topic),
                Difficulty::Medium => format!("Write a program to solve a problem based on {}", topic),
                Difficulty::Hard => {
                    format!("Implement an optimized solution for a problem on {}", topic)
                }
            };
            (
                question,
                "Auto-generated placeholder. Add test cases and refine the problem statement before use.",
                QuestionDetails::Coding(CodingDetails {
                    language: Some(language.to_string()),
                    starter_code: None,
                    test_cases: Vec::new(),
                }),
            )
        }
        QuestionType::Theory => {
            let question = match options.difficulty {
                Difficulty::Easy => format!("Briefly describe {}", topic),
                Difficulty::Medium => format!("Explain {} with an example", topic),
                Difficulty::Hard => {
                    format!("Critically evaluate {} and discuss its trade-offs", topic)
                }
            };
            (
                question,
                "Auto-generated placeholder. Review the prompt before use.",
                QuestionDetails::Theory(TheoryDetails {}),
            )
        }
    };

    Question {
        id: 0,
        question_type,
        question,
        marks: Some(1.0),
        details,
        negative_marks: None,
        note: Some(note.to_string()),
        randomized_order: None,
        original_index: None,
    }
}

fn extract_topics(syllabus: &str) -> Vec<String> {
    let mut topics: Vec<String> = Vec::new();

    for line in syllabus.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(caps) = BULLET_LINE.captures(line) {
            topics.push(caps[1].trim().to_string());
        } else if line.len() >= 5 && line.len() < 100 {
            topics.push(line.to_string());
        }
    }

    if topics.is_empty() {
        topics = syllabus
            .split([',', ';', ':'])
            .map(str::trim)
            .filter(|f| f.len() >= 5 && f.len() < 100)
            .map(str::to_string)
            .collect();
    }

    if topics.is_empty() {
        topics = DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect();
    }

    topics.truncate(20);
    topics
}
