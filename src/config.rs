//! Typed configuration for sessions, batch evaluation, and oracle backends.
//!
//! The original system threaded a loosely-typed options bag through every
//! node; here each concern gets an explicit struct with named fields and
//! documented defaults.

use crate::llm_client::{LlmConfig, LlmProvider};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

fn default_max_questions() -> u32 {
    20
}

fn default_num_runs() -> u32 {
    1
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

/// Which guesser strategy (and matching host judge) a session uses.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum StrategyVersion {
    /// Single-shot guesser; host oracle rules on correctness.
    V1,
    /// Recommend-then-evaluate guesser; deterministic substring judge.
    V2,
    /// Binary-search candidate elimination; deterministic substring judge.
    #[default]
    V3,
}

/// Configuration for a single game session.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Question budget for the guesser. Default: 20.
    #[serde(default = "default_max_questions")]
    max_questions: u32,

    /// Secret topic. When unset, the host draws one from the topic source.
    #[serde(default)]
    topic: Option<String>,
}

impl SessionConfig {
    /// Creates a session config with the given budget and no fixed topic.
    pub fn new(max_questions: u32) -> Self {
        Self {
            max_questions,
            topic: None,
        }
    }

    /// Fixes the secret topic, bypassing the topic source.
    pub fn with_topic(mut self, topic: impl Into<String>) -> Self {
        self.topic = Some(topic.into());
        self
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self::new(default_max_questions())
    }
}

/// Configuration for a batch evaluation run.
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct EvalOptions {
    /// Games per topic. Default: 1.
    #[serde(default = "default_num_runs")]
    num_runs: u32,

    /// Question budget per game. Default: 20.
    #[serde(default = "default_max_questions")]
    max_questions: u32,

    /// Worker budget override. When unset, `min(32, 4 × parallelism)`.
    #[serde(default)]
    worker_budget: Option<usize>,
}

impl EvalOptions {
    /// Creates eval options with defaults: one run per topic, 20 questions.
    pub fn new() -> Self {
        Self {
            num_runs: default_num_runs(),
            max_questions: default_max_questions(),
            worker_budget: None,
        }
    }

    /// Sets games per topic.
    pub fn with_num_runs(mut self, num_runs: u32) -> Self {
        self.num_runs = num_runs;
        self
    }

    /// Sets the question budget per game.
    pub fn with_max_questions(mut self, max_questions: u32) -> Self {
        self.max_questions = max_questions;
        self
    }

    /// Overrides the worker budget.
    pub fn with_worker_budget(mut self, budget: usize) -> Self {
        self.worker_budget = Some(budget);
        self
    }
}

impl Default for EvalOptions {
    fn default() -> Self {
        Self::new()
    }
}

/// Oracle backend settings: provider, model, token ceiling.
///
/// API keys are not stored here; they come from `OPENAI_API_KEY` /
/// `ANTHROPIC_API_KEY` in the environment (a `.env` file is honored).
#[derive(Debug, Clone, Getters, Serialize, Deserialize)]
pub struct OracleSettings {
    /// LLM provider (openai or anthropic).
    #[serde(default)]
    provider: LlmProvider,

    /// Model name (e.g. "gpt-4o-mini", "claude-3-5-haiku-20241022").
    #[serde(default = "default_model")]
    model: String,

    /// Maximum tokens per completion.
    #[serde(default = "default_max_tokens")]
    max_tokens: u32,
}

impl OracleSettings {
    /// Creates settings for the given provider and model.
    pub fn new(provider: LlmProvider, model: String) -> Self {
        Self {
            provider,
            model,
            max_tokens: default_max_tokens(),
        }
    }

    /// Loads settings from a TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading oracle settings");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let settings: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        info!(model = %settings.model, "Oracle settings loaded");
        Ok(settings)
    }

    /// Resolves the API key from the environment and builds an LLM config.
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        let (var, provider) = match self.provider {
            LlmProvider::OpenAI => ("OPENAI_API_KEY", LlmProvider::OpenAI),
            LlmProvider::Anthropic => ("ANTHROPIC_API_KEY", LlmProvider::Anthropic),
        };
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            provider,
            api_key,
            self.model.clone(),
            self.max_tokens,
        ))
    }
}

impl Default for OracleSettings {
    fn default() -> Self {
        Self {
            provider: LlmProvider::default(),
            model: default_model(),
            max_tokens: default_max_tokens(),
        }
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where the error occurred.
    pub line: u32,
    /// Source file where the error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
