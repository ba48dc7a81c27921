//! Batch evaluation: many independent games under a bounded worker budget.
//!
//! The evaluator schedules `topics × num_runs` sessions through a
//! semaphore-gated submission loop, so at most the worker budget is ever in
//! flight; a new game is admitted the moment a permit frees. A failing game
//! is converted into an error result at this boundary and never disturbs its
//! siblings.

mod metrics;

pub use metrics::{EvaluationMetrics, MetricsError, compute_metrics};

use crate::config::{EvalOptions, SessionConfig};
use crate::game::{GameResult, GameSession, GuesserStrategy, HostJudge};
use crate::topics::TopicSource;
use futures::FutureExt;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

/// Default worker budget: `min(32, 4 × available parallelism)`.
pub fn default_worker_budget() -> usize {
    let parallelism = std::thread::available_parallelism()
        .map(std::num::NonZeroUsize::get)
        .unwrap_or(1);
    (4 * parallelism).min(32)
}

/// Runs batches of games and aggregates their results.
///
/// The judge, strategy, and topic source are shared read-only across all
/// sessions; each session owns its state exclusively.
pub struct Evaluator {
    judge: Arc<dyn HostJudge>,
    strategy: Arc<dyn GuesserStrategy>,
    topics: Arc<dyn TopicSource>,
    options: EvalOptions,
    completed: Arc<AtomicUsize>,
}

impl Evaluator {
    /// Creates an evaluator over the given collaborators.
    pub fn new(
        judge: Arc<dyn HostJudge>,
        strategy: Arc<dyn GuesserStrategy>,
        topics: Arc<dyn TopicSource>,
        options: EvalOptions,
    ) -> Self {
        Self {
            judge,
            strategy,
            topics,
            options,
            completed: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of games finished so far in the current batch.
    pub fn completed_games(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// The effective worker budget for this evaluator.
    pub fn worker_budget(&self) -> usize {
        self.options
            .worker_budget()
            .unwrap_or_else(default_worker_budget)
            .max(1)
    }

    /// Runs `topics × num_runs` games and returns one result per game.
    ///
    /// Results arrive in completion order, not input order. A game that
    /// fails for any reason (oracle exhaustion, panic) yields an error
    /// result with its question count reported as 0; the rest of the batch
    /// is unaffected.
    #[instrument(skip(self, topics), fields(topics = topics.len(), num_runs = self.options.num_runs()))]
    pub async fn run_batch(&self, topics: &[String]) -> Vec<GameResult> {
        let jobs: Vec<(String, u32)> = topics
            .iter()
            .flat_map(|topic| (0..*self.options.num_runs()).map(move |run| (topic.clone(), run)))
            .collect();
        let total = jobs.len();
        self.completed.store(0, Ordering::SeqCst);

        let budget = self.worker_budget();
        info!(total, budget, "Starting evaluation batch");

        let semaphore = Arc::new(Semaphore::new(budget));
        let mut set: JoinSet<GameResult> = JoinSet::new();

        for (topic, run_index) in jobs {
            // Owned-permit acquisition gates submission: this loop blocks
            // here until a running game finishes and frees a slot.
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .expect("admission semaphore closed");

            let judge = self.judge.clone();
            let strategy = self.strategy.clone();
            let topic_source = self.topics.clone();
            let completed = self.completed.clone();
            let max_questions = *self.options.max_questions();

            set.spawn(async move {
                let _permit = permit;
                let start = Instant::now();

                let config = SessionConfig::new(max_questions).with_topic(topic.clone());
                let session = GameSession::new(config, judge, strategy, topic_source);

                let result = match AssertUnwindSafe(session.run()).catch_unwind().await {
                    Ok(Ok(result)) => result,
                    Ok(Err(e)) => {
                        warn!(topic = %topic, error = %e, "Game aborted on oracle failure");
                        GameResult::from_failure(topic, e.to_string(), start.elapsed())
                    }
                    Err(panic) => {
                        let message = panic_message(panic.as_ref());
                        error!(topic = %topic, panic = %message, "Game panicked");
                        GameResult::from_failure(topic, message, start.elapsed())
                    }
                };

                let done = completed.fetch_add(1, Ordering::SeqCst) + 1;
                info!(completed = done, total, run_index, "Game completed");
                result
            });
        }

        let mut results = Vec::with_capacity(total);
        while let Some(joined) = set.join_next().await {
            match joined {
                Ok(result) => results.push(result),
                Err(e) => {
                    // Unreachable in practice (panics are caught in-task),
                    // but a scheduled game still gets its result row.
                    error!(error = %e, "Worker task failed to join");
                    results.push(GameResult::from_failure(
                        String::new(),
                        format!("worker task failed: {}", e),
                        Duration::ZERO,
                    ));
                }
            }
        }

        info!(results = results.len(), "Evaluation batch finished");
        results
    }

    /// Runs a batch and computes its metrics in one call.
    pub async fn evaluate(&self, topics: &[String]) -> Result<EvaluationMetrics, MetricsError> {
        let results = self.run_batch(topics).await;
        compute_metrics(&results)
    }
}

/// Extracts a readable message from a caught panic payload.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        (*message).to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "game panicked".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formatted_panic_payloads_are_preserved_verbatim() {
        // Formatted panics carry a String payload.
        let payload = std::panic::catch_unwind(|| panic!("boom {}", 7)).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "boom 7");
    }

    #[test]
    fn literal_panic_payloads_are_preserved_verbatim() {
        // Literal panics carry a &str payload.
        let payload = std::panic::catch_unwind(|| panic!("plain message")).unwrap_err();
        assert_eq!(panic_message(payload.as_ref()), "plain message");
    }
}
