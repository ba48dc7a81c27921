//! Guesser strategies.
//!
//! Each strategy turns the conversation so far into the next question or
//! guess. Variants are selected at session construction; the turn loop never
//! branches on which one it holds.

use super::state::GameState;
use crate::oracle::{
    CandidateRecommender, ChoiceEvaluator, GuessOrQuestionChoice, GuesserOracle, OracleError,
    QuestionEvaluator, QuestionGenerator, Recommender,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Confidence a v3 recommender must strictly exceed before its guess is
/// accepted without generating a narrowing question.
const GUESS_CONFIDENCE_THRESHOLD: f64 = 0.9;

/// The guesser's move for one turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StrategyMove {
    /// The question (or guess phrased as a question) to put to the host.
    pub question: String,
    /// Updated candidate pool, for strategies that track one.
    pub candidates: Option<Vec<String>>,
}

impl StrategyMove {
    fn question_only(question: String) -> Self {
        Self {
            question,
            candidates: None,
        }
    }
}

/// Produces the guesser's next question given the game state and the
/// remaining question budget.
#[async_trait]
pub trait GuesserStrategy: Send + Sync {
    /// Computes the next move. Called exactly once per guesser turn.
    async fn next_move(&self, state: &GameState, remaining: u32)
    -> Result<StrategyMove, OracleError>;
}

/// Phrases a bare guess as the yes/no question the host expects.
fn guess_question(guess: &str) -> String {
    format!("Is it a {}?", guess)
}

/// v1: one oracle call per turn, no candidate tracking.
pub struct SingleShot {
    oracle: Arc<dyn GuesserOracle>,
}

impl SingleShot {
    /// Creates the single-shot strategy.
    pub fn new(oracle: Arc<dyn GuesserOracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl GuesserStrategy for SingleShot {
    #[instrument(skip(self, state))]
    async fn next_move(
        &self,
        state: &GameState,
        remaining: u32,
    ) -> Result<StrategyMove, OracleError> {
        let question = self.oracle.next_question(state.history(), remaining).await?;
        Ok(StrategyMove::question_only(question))
    }
}

/// v2: a recommender shortlists guesses and questions, then an evaluator
/// commits to exactly one of them.
pub struct RecommendThenEvaluate {
    recommender: Arc<dyn Recommender>,
    evaluator: Arc<dyn ChoiceEvaluator>,
}

impl RecommendThenEvaluate {
    /// Creates the recommend-then-evaluate strategy.
    pub fn new(recommender: Arc<dyn Recommender>, evaluator: Arc<dyn ChoiceEvaluator>) -> Self {
        Self {
            recommender,
            evaluator,
        }
    }
}

#[async_trait]
impl GuesserStrategy for RecommendThenEvaluate {
    #[instrument(skip(self, state))]
    async fn next_move(
        &self,
        state: &GameState,
        remaining: u32,
    ) -> Result<StrategyMove, OracleError> {
        let shortlist = self.recommender.recommend(state.history()).await?;
        debug!(
            guesses = shortlist.guesses.len(),
            questions = shortlist.questions.len(),
            "Recommender shortlist"
        );

        let selection = self
            .evaluator
            .choose(&shortlist, state.history(), remaining)
            .await?;

        let question = match selection.choice {
            GuessOrQuestionChoice::Guess => selection
                .guess
                .as_deref()
                .map(guess_question)
                .ok_or_else(|| {
                    OracleError::Malformed("evaluator chose 'guess' without a guess".to_string())
                })?,
            GuessOrQuestionChoice::Question => selection.question.ok_or_else(|| {
                OracleError::Malformed("evaluator chose 'question' without a question".to_string())
            })?,
        };

        Ok(StrategyMove::question_only(question))
    }
}

/// v3: explicit candidate elimination with binary-search style questions.
///
/// Per turn: the recommender updates the candidate pool and decides whether
/// to guess. A guess is only emitted when its confidence strictly exceeds
/// [`GUESS_CONFIDENCE_THRESHOLD`]; otherwise a question is generated, assessed
/// by the evaluator, and regenerated at most once with the evaluator's
/// feedback. The second generation is used regardless of its quality.
pub struct BinarySearchElimination {
    recommender: Arc<dyn CandidateRecommender>,
    generator: Arc<dyn QuestionGenerator>,
    evaluator: Arc<dyn QuestionEvaluator>,
}

impl BinarySearchElimination {
    /// Creates the binary-search elimination strategy.
    pub fn new(
        recommender: Arc<dyn CandidateRecommender>,
        generator: Arc<dyn QuestionGenerator>,
        evaluator: Arc<dyn QuestionEvaluator>,
    ) -> Self {
        Self {
            recommender,
            generator,
            evaluator,
        }
    }
}

#[async_trait]
impl GuesserStrategy for BinarySearchElimination {
    #[instrument(skip(self, state))]
    async fn next_move(
        &self,
        state: &GameState,
        _remaining: u32,
    ) -> Result<StrategyMove, OracleError> {
        let decision = self
            .recommender
            .recommend(state.history(), state.candidates())
            .await?;
        let candidates = decision.candidates.clone();
        debug!(
            decision = ?decision.decision,
            candidates = candidates.len(),
            "Recommender decision"
        );

        // Guess branch: only when the top confidence clears the bar. Missing
        // scores read as 0, so an empty confidence map falls through to
        // question generation instead of panicking on an empty max.
        if decision.decision == GuessOrQuestionChoice::Guess {
            if let Some((best, confidence)) = decision.best_candidate() {
                if confidence > GUESS_CONFIDENCE_THRESHOLD {
                    debug!(candidate = best, confidence, "Guessing top candidate");
                    return Ok(StrategyMove {
                        question: guess_question(best),
                        candidates: Some(candidates),
                    });
                }
                debug!(candidate = best, confidence, "Confidence too low to guess");
            }
        }

        let mut proposal = self
            .generator
            .generate(&candidates, state.history(), None)
            .await?;

        let assessment = self
            .evaluator
            .assess(&candidates, &proposal, state.history())
            .await?;

        if !assessment.is_good {
            debug!(
                improvement = assessment.improvement.as_deref().unwrap_or(""),
                "Question rejected; regenerating once"
            );
            proposal = self
                .generator
                .generate(&candidates, state.history(), assessment.improvement.as_deref())
                .await?;
        }

        Ok(StrategyMove {
            question: proposal.question,
            candidates: Some(candidates),
        })
    }
}
