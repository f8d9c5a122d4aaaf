use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    /// Key for the remote generation backend; generation falls back to
    /// templates when unset.
    pub openai_api_key: Option<String>,
    pub ai_model: String,
    pub default_coding_language: String,
    pub max_ai_questions: usize,
    pub ai_timeout_secs: u64,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            openai_api_key: env::var("OPENAI_API_KEY").ok(),
            ai_model: get_env_or("AI_MODEL", "gpt-4o"),
            default_coding_language: get_env_or("DEFAULT_CODING_LANGUAGE", "python"),
            max_ai_questions: get_env_parse_or("MAX_AI_QUESTIONS", 50)?,
            ai_timeout_secs: get_env_parse_or("AI_TIMEOUT_SECS", 120)?,
        })
    }
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) => raw
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        Err(_) => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
