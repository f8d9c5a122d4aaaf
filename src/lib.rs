pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod utils;

use crate::services::{generator_service::GeneratorService, parser_service::ParserService};
use reqwest::Client;

#[derive(Clone)]
pub struct ExamEngine {
    pub parser: ParserService,
    pub generator: GeneratorService,
}

impl ExamEngine {
    /// Wires the stateful services from the global configuration. Call
    /// `config::init_config()` first. Validation, randomization and scoring
    /// are stateless and invoked through their service types directly.
    pub fn new() -> Self {
        let config = crate::config::get_config();
        let http_client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.ai_timeout_secs))
            .build()
            .unwrap();

        let parser = ParserService::new(config.default_coding_language.clone());
        let generator = GeneratorService::new(
            config.openai_api_key.clone(),
            config.ai_model.clone(),
            config.default_coding_language.clone(),
            config.max_ai_questions,
            config.ai_timeout_secs,
            http_client,
        );

        Self { parser, generator }
    }
}

impl Default for ExamEngine {
    fn default() -> Self {
        Self::new()
    }
}
