//! Twenty questions, played by LLMs against themselves.
//!
//! A host holds a secret topic; a guesser narrows it down with yes/no
//! questions under a fixed budget. Both roles delegate their judgment to
//! pluggable decision oracles, and an evaluation harness runs large batches
//! of games concurrently to measure strategy performance.
//!
//! # Architecture
//!
//! - **Game**: the turn-based state machine, host judges, and the three
//!   guesser strategies (single-shot, recommend-then-evaluate, binary-search
//!   candidate elimination)
//! - **Oracle**: trait capabilities for every delegated decision, a shared
//!   retry combinator, and LLM-backed implementations (OpenAI, Anthropic)
//! - **Eval**: bounded-concurrency batch runner plus aggregate metrics
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use twenty_questions::{
//!     Evaluator, EvalOptions, LlmClient, LlmHost, LlmGuesser, OracleJudge,
//!     SingleShot, TopicPool, OracleSettings,
//! };
//!
//! # async fn example() -> anyhow::Result<()> {
//! let client = LlmClient::new(OracleSettings::default().create_llm_config()?);
//! let judge = Arc::new(OracleJudge::new(Arc::new(LlmHost::new(client.clone()))));
//! let strategy = Arc::new(SingleShot::new(Arc::new(LlmGuesser::new(client))));
//!
//! let evaluator = Evaluator::new(
//!     judge,
//!     strategy,
//!     Arc::new(TopicPool::default()),
//!     EvalOptions::default(),
//! );
//! let results = evaluator.run_batch(&["dog".to_string()]).await;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![forbid(unsafe_code)]

// Private module declarations
mod config;
mod eval;
mod game;
mod llm_client;
mod oracle;
mod topics;

// Crate-level exports - Configuration
pub use config::{ConfigError, EvalOptions, OracleSettings, SessionConfig, StrategyVersion};

// Crate-level exports - LLM client
pub use llm_client::{LlmClient, LlmConfig, LlmError, LlmProvider};

// Crate-level exports - Game core
pub use game::{
    BinarySearchElimination, GameResult, GameSession, GameState, GuesserStrategy, HostJudge,
    Judgment, Message, OracleJudge, Outcome, RecommendThenEvaluate, SingleShot, Speaker,
    StrategyMove, SubstringJudge,
};

// Crate-level exports - Oracle capabilities
pub use oracle::{
    AnswerOracle, CandidateRecommender, ChoiceEvaluator, GeneratedQuestion, GuessOrQuestion,
    GuessOrQuestionChoice, GuesserOracle, HostOracle, HostVerdict, OracleError,
    QuestionAssessment, QuestionEvaluator, QuestionGenerator, Recommender, RecommenderDecision,
    RetryPolicy, Shortlist, YesNo, with_retry,
};

// Crate-level exports - LLM-backed oracles
pub use oracle::llm::{
    LlmCandidateRecommender, LlmChoiceEvaluator, LlmGuesser, LlmHost, LlmQuestionEvaluator,
    LlmQuestionGenerator, LlmRecommender,
};

// Crate-level exports - Evaluation harness
pub use eval::{
    EvaluationMetrics, Evaluator, MetricsError, compute_metrics, default_worker_budget,
};

// Crate-level exports - Topic selection
pub use topics::{TopicError, TopicPool, TopicSource};
