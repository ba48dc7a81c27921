//! Aggregate metrics over a batch of game results.

use crate::game::GameResult;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::instrument;

/// Aggregate performance metrics for one evaluation batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationMetrics {
    /// Fraction of games ending in a correct guess.
    pub success_rate: f64,
    /// Mean question count over successful games; 0 when there are none.
    pub avg_questions_when_correct: f64,
    /// Mean wall-clock duration per game.
    pub avg_time_per_game: Duration,
    /// Fraction of games ending in an error.
    pub error_rate: f64,
}

impl std::fmt::Display for EvaluationMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Success Rate: {:.2}%", self.success_rate * 100.0)?;
        writeln!(
            f,
            "Avg Questions When Correct: {:.1}",
            self.avg_questions_when_correct
        )?;
        writeln!(
            f,
            "Avg Time per Game: {:.2}s",
            self.avg_time_per_game.as_secs_f64()
        )?;
        write!(f, "Error Rate: {:.2}%", self.error_rate * 100.0)
    }
}

/// Errors from metrics computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetricsError {
    /// Metrics were requested over zero results.
    EmptyResultSet,
}

impl std::fmt::Display for MetricsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MetricsError::EmptyResultSet => {
                write!(f, "cannot compute metrics over an empty result set")
            }
        }
    }
}

impl std::error::Error for MetricsError {}

/// Computes all four metrics in a single pass over the results.
///
/// An empty result set is a reported error, never a silent NaN.
#[instrument(skip(results), fields(count = results.len()))]
pub fn compute_metrics(results: &[GameResult]) -> Result<EvaluationMetrics, MetricsError> {
    if results.is_empty() {
        return Err(MetricsError::EmptyResultSet);
    }

    let total = results.len() as f64;
    let mut correct = 0u64;
    let mut errors = 0u64;
    let mut questions_when_correct = 0u64;
    let mut total_time = Duration::ZERO;

    for result in results {
        if result.is_correct() {
            correct += 1;
            questions_when_correct += u64::from(result.question_count);
        }
        if result.is_error() {
            errors += 1;
        }
        total_time += result.elapsed;
    }

    let avg_questions_when_correct = if correct > 0 {
        questions_when_correct as f64 / correct as f64
    } else {
        0.0
    };

    Ok(EvaluationMetrics {
        success_rate: correct as f64 / total,
        avg_questions_when_correct,
        avg_time_per_game: total_time.div_f64(total),
        error_rate: errors as f64 / total,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Outcome;

    fn result(outcome: Outcome, questions: u32, millis: u64) -> GameResult {
        GameResult {
            topic: "dog".to_string(),
            outcome,
            question_count: questions,
            error: (outcome == Outcome::Error).then(|| "boom".to_string()),
            elapsed: Duration::from_millis(millis),
            transcript: Vec::new(),
        }
    }

    #[test]
    fn empty_result_set_is_an_error() {
        assert_eq!(compute_metrics(&[]), Err(MetricsError::EmptyResultSet));
    }

    #[test]
    fn mixed_batch_aggregates() {
        let results = vec![
            result(Outcome::CorrectGuess, 4, 100),
            result(Outcome::CorrectGuess, 8, 100),
            result(Outcome::MaxQuestionsReached, 20, 100),
            result(Outcome::Error, 0, 100),
        ];

        let metrics = compute_metrics(&results).unwrap();
        assert_eq!(metrics.success_rate, 0.5);
        assert_eq!(metrics.avg_questions_when_correct, 6.0);
        assert_eq!(metrics.error_rate, 0.25);
        assert_eq!(metrics.avg_time_per_game, Duration::from_millis(100));
    }

    #[test]
    fn no_successes_means_zero_average() {
        let results = vec![result(Outcome::MaxQuestionsReached, 20, 50)];
        let metrics = compute_metrics(&results).unwrap();
        assert_eq!(metrics.success_rate, 0.0);
        assert_eq!(metrics.avg_questions_when_correct, 0.0);
    }
}
