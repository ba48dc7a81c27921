//! Decision-oracle capabilities consumed by the game core.
//!
//! Every judgment the game cannot make mechanically is delegated to one of
//! these traits. The core treats them as opaque: implementations may call an
//! LLM ([`llm`]), return canned answers (tests), or anything else. All calls
//! are fallible; implementations are expected to wrap their transport in
//! [`retry::with_retry`] so a transient failure costs one bounded retry, not
//! the game.

mod models;
pub mod prompts;
pub mod retry;

pub mod llm;

pub use models::{
    GeneratedQuestion, GuessOrQuestion, GuessOrQuestionChoice, HostVerdict, QuestionAssessment,
    RecommenderDecision, Shortlist, YesNo,
};
pub use retry::{RetryPolicy, with_retry};

use crate::game::Message;
use async_trait::async_trait;

/// Errors surfaced by oracle calls after retries are exhausted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OracleError {
    /// The underlying service failed (transport, rate limit, model error).
    Failed(String),
    /// The service replied, but the reply did not match the expected shape.
    Malformed(String),
}

impl std::fmt::Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleError::Failed(msg) => write!(f, "oracle call failed: {}", msg),
            OracleError::Malformed(msg) => write!(f, "malformed oracle response: {}", msg),
        }
    }
}

impl std::error::Error for OracleError {}

/// Host oracle for the v1 game: answers yes/no *and* rules on correctness.
///
/// Correctness here is non-deterministic; the model decides whether the
/// guesser's question names the topic. The v2/v3 games replace this ruling
/// with a substring check and only need [`AnswerOracle`].
#[async_trait]
pub trait HostOracle: Send + Sync {
    /// Judges the guesser's question against the secret topic.
    async fn judge(&self, topic: &str, question: &str) -> Result<HostVerdict, OracleError>;
}

/// Host oracle for the v2/v3 games: yes/no only, no correctness ruling.
#[async_trait]
pub trait AnswerOracle: Send + Sync {
    /// Answers the guesser's question with yes or no.
    async fn answer(&self, topic: &str, question: &str) -> Result<YesNo, OracleError>;
}

/// Single-shot guesser oracle (v1): one question per call.
#[async_trait]
pub trait GuesserOracle: Send + Sync {
    /// Produces the next question given the conversation so far and the
    /// remaining question budget.
    async fn next_question(
        &self,
        history: &[Message],
        remaining: u32,
    ) -> Result<String, OracleError>;
}

/// Recommender stage of the v2 guesser: shortlists guesses and questions.
#[async_trait]
pub trait Recommender: Send + Sync {
    /// Proposes up to five candidate guesses and five candidate questions.
    async fn recommend(&self, history: &[Message]) -> Result<Shortlist, OracleError>;
}

/// Evaluator stage of the v2 guesser: picks one item from the shortlist.
#[async_trait]
pub trait ChoiceEvaluator: Send + Sync {
    /// Selects exactly one guess or question from the shortlist.
    async fn choose(
        &self,
        shortlist: &Shortlist,
        history: &[Message],
        remaining: u32,
    ) -> Result<GuessOrQuestion, OracleError>;
}

/// Recommender stage of the v3 guesser: tracks candidates and decides
/// whether to guess or keep narrowing.
#[async_trait]
pub trait CandidateRecommender: Send + Sync {
    /// Returns the decision, the updated candidate list, and optional
    /// per-candidate confidence scores.
    async fn recommend(
        &self,
        history: &[Message],
        candidates: &[String],
    ) -> Result<RecommenderDecision, OracleError>;
}

/// Generator stage of the v3 guesser: binary-search style questions.
#[async_trait]
pub trait QuestionGenerator: Send + Sync {
    /// Proposes a question expected to split the candidate pool, optionally
    /// steered by feedback from a prior rejection.
    async fn generate(
        &self,
        candidates: &[String],
        history: &[Message],
        feedback: Option<&str>,
    ) -> Result<GeneratedQuestion, OracleError>;
}

/// Evaluator stage of the v3 guesser: judges split quality.
#[async_trait]
pub trait QuestionEvaluator: Send + Sync {
    /// Assesses whether the proposed question is a good ~half-split of the
    /// candidate pool.
    async fn assess(
        &self,
        candidates: &[String],
        proposal: &GeneratedQuestion,
        history: &[Message],
    ) -> Result<QuestionAssessment, OracleError>;
}
