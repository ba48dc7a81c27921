//! LLM-backed implementations of the oracle traits.
//!
//! One thin adapter per trait: render the prompt, call the client through the
//! retry combinator, deserialize the structured reply. All adapters share one
//! [`LlmClient`] and one [`RetryPolicy`].

use super::prompts;
use super::retry::{RetryPolicy, with_retry};
use super::{
    AnswerOracle, CandidateRecommender, ChoiceEvaluator, GeneratedQuestion, GuessOrQuestion,
    GuesserOracle, HostOracle, HostVerdict, OracleError, QuestionAssessment, QuestionEvaluator,
    QuestionGenerator, Recommender, RecommenderDecision, Shortlist, YesNo,
};
use crate::game::Message;
use crate::llm_client::{LlmClient, LlmError};
use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

impl From<LlmError> for OracleError {
    fn from(e: LlmError) -> Self {
        OracleError::Failed(e.to_string())
    }
}

/// One retried structured call: prompt in, deserialized JSON out.
async fn call_json<T: DeserializeOwned>(
    client: &LlmClient,
    retry: &RetryPolicy,
    system: &str,
    user: &str,
) -> Result<T, OracleError> {
    with_retry(retry, move || async move {
        Ok(client.generate_json::<T>(system, user).await?)
    })
    .await
}

/// Host oracle backed by an LLM. Implements both the v1 judging contract and
/// the v2/v3 answer-only contract.
pub struct LlmHost {
    client: LlmClient,
    retry: RetryPolicy,
}

impl LlmHost {
    /// Creates a host oracle over the given client.
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }
}

#[async_trait]
impl HostOracle for LlmHost {
    #[instrument(skip(self, topic, question))]
    async fn judge(&self, topic: &str, question: &str) -> Result<HostVerdict, OracleError> {
        let system = prompts::fill(prompts::HOST_JUDGE_SYSTEM, "topic", topic);
        let user = format!("Question: {}", question);
        call_json(&self.client, &self.retry, &system, &user).await
    }
}

#[derive(Deserialize)]
struct AnswerReply {
    answer: YesNo,
}

#[async_trait]
impl AnswerOracle for LlmHost {
    #[instrument(skip(self, topic, question))]
    async fn answer(&self, topic: &str, question: &str) -> Result<YesNo, OracleError> {
        let system = prompts::fill(prompts::HOST_ANSWER_SYSTEM, "topic", topic);
        let user = format!("Question: {}", question);
        let reply: AnswerReply = call_json(&self.client, &self.retry, &system, &user).await?;
        Ok(reply.answer)
    }
}

#[derive(Deserialize)]
struct QuestionReply {
    question: String,
}

/// Single-shot guesser oracle backed by an LLM (v1).
pub struct LlmGuesser {
    client: LlmClient,
    retry: RetryPolicy,
}

impl LlmGuesser {
    /// Creates a guesser oracle over the given client.
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }
}

#[async_trait]
impl GuesserOracle for LlmGuesser {
    #[instrument(skip(self, history))]
    async fn next_question(
        &self,
        history: &[Message],
        remaining: u32,
    ) -> Result<String, OracleError> {
        let system = prompts::fill(prompts::GUESSER_SYSTEM, "remaining", &remaining.to_string());
        let user = format!(
            "{}\n\nWhat is your next question?",
            prompts::render_history(history)
        );
        let reply: QuestionReply = call_json(&self.client, &self.retry, &system, &user).await?;
        Ok(reply.question)
    }
}

/// Shortlist recommender backed by an LLM (v2).
pub struct LlmRecommender {
    client: LlmClient,
    retry: RetryPolicy,
}

impl LlmRecommender {
    /// Creates a recommender over the given client.
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }
}

#[async_trait]
impl Recommender for LlmRecommender {
    #[instrument(skip(self, history))]
    async fn recommend(&self, history: &[Message]) -> Result<Shortlist, OracleError> {
        let user = format!(
            "{}\n\nCome up with a list of possible guesses and questions.",
            prompts::render_history(history)
        );
        call_json(&self.client, &self.retry, prompts::RECOMMENDER_SYSTEM, &user).await
    }
}

/// Shortlist evaluator backed by an LLM (v2).
pub struct LlmChoiceEvaluator {
    client: LlmClient,
    retry: RetryPolicy,
}

impl LlmChoiceEvaluator {
    /// Creates a choice evaluator over the given client.
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }
}

#[async_trait]
impl ChoiceEvaluator for LlmChoiceEvaluator {
    #[instrument(skip(self, shortlist, history))]
    async fn choose(
        &self,
        shortlist: &Shortlist,
        history: &[Message],
        remaining: u32,
    ) -> Result<GuessOrQuestion, OracleError> {
        let system = prompts::fill(
            &prompts::fill(
                &prompts::fill(
                    prompts::CHOICE_EVALUATOR_SYSTEM,
                    "guesses",
                    &prompts::render_list(&shortlist.guesses),
                ),
                "questions",
                &prompts::render_list(&shortlist.questions),
            ),
            "remaining",
            &remaining.to_string(),
        );
        let user = format!(
            "{}\n\nCome up with either a guess or question based on the analysis.",
            prompts::render_history(history)
        );
        call_json(&self.client, &self.retry, &system, &user).await
    }
}

/// Candidate-tracking recommender backed by an LLM (v3).
pub struct LlmCandidateRecommender {
    client: LlmClient,
    retry: RetryPolicy,
}

impl LlmCandidateRecommender {
    /// Creates a candidate recommender over the given client.
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }
}

#[async_trait]
impl CandidateRecommender for LlmCandidateRecommender {
    #[instrument(skip(self, history, candidates))]
    async fn recommend(
        &self,
        history: &[Message],
        candidates: &[String],
    ) -> Result<RecommenderDecision, OracleError> {
        let system = prompts::fill(
            prompts::CANDIDATE_RECOMMENDER_SYSTEM,
            "candidates",
            &prompts::render_list(candidates),
        );
        let user = format!(
            "{}\n\nBased on the conversation history, should we guess or continue questioning? \
             What are the current possible candidates?",
            prompts::render_history(history)
        );
        call_json(&self.client, &self.retry, &system, &user).await
    }
}

/// Binary-search question generator backed by an LLM (v3).
pub struct LlmQuestionGenerator {
    client: LlmClient,
    retry: RetryPolicy,
}

impl LlmQuestionGenerator {
    /// Creates a question generator over the given client.
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }
}

#[async_trait]
impl QuestionGenerator for LlmQuestionGenerator {
    #[instrument(skip(self, candidates, history, feedback))]
    async fn generate(
        &self,
        candidates: &[String],
        history: &[Message],
        feedback: Option<&str>,
    ) -> Result<GeneratedQuestion, OracleError> {
        let system = prompts::fill(
            prompts::QUESTION_GENERATOR_SYSTEM,
            "candidates",
            &prompts::render_list(candidates),
        );
        let user = format!(
            "{}\n\nGenerate a question that will effectively split the candidate pool. {}",
            prompts::render_history(history),
            feedback.unwrap_or("")
        );
        call_json(&self.client, &self.retry, &system, &user).await
    }
}

/// Question quality evaluator backed by an LLM (v3).
pub struct LlmQuestionEvaluator {
    client: LlmClient,
    retry: RetryPolicy,
}

impl LlmQuestionEvaluator {
    /// Creates a question evaluator over the given client.
    pub fn new(client: LlmClient) -> Self {
        Self {
            client,
            retry: RetryPolicy::default(),
        }
    }
}

#[async_trait]
impl QuestionEvaluator for LlmQuestionEvaluator {
    #[instrument(skip(self, candidates, proposal, history))]
    async fn assess(
        &self,
        candidates: &[String],
        proposal: &GeneratedQuestion,
        history: &[Message],
    ) -> Result<QuestionAssessment, OracleError> {
        let system = prompts::fill(
            &prompts::fill(
                &prompts::fill(
                    &prompts::fill(
                        prompts::QUESTION_EVALUATOR_SYSTEM,
                        "candidates",
                        &prompts::render_list(candidates),
                    ),
                    "question",
                    &proposal.question,
                ),
                "eliminated",
                &prompts::render_list(&proposal.eliminated),
            ),
            "retained",
            &prompts::render_list(&proposal.retained),
        );
        let user = format!(
            "{}\n\nEvaluate if this is a good binary search question. If not, suggest \
             improvements.",
            prompts::render_history(history)
        );
        call_json(&self.client, &self.retry, &system, &user).await
    }
}
