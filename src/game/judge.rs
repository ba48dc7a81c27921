//! Host-side judgment of guesser questions.
//!
//! Two judge variants exist, selected at session construction:
//!
//! - [`OracleJudge`] (v1): the host oracle decides both the yes/no answer and
//!   whether the guess is correct. Non-deterministic.
//! - [`SubstringJudge`] (v2/v3): correctness is a deterministic, case-sensitive
//!   substring check of the topic inside the question, performed before any
//!   oracle call. The oracle only supplies the yes/no answer.

use crate::oracle::{AnswerOracle, HostOracle, OracleError, YesNo};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Outcome of judging one guesser question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Judgment {
    /// The host's yes/no answer.
    pub answer: YesNo,
    /// Whether the question counts as a correct guess of the topic.
    pub correct: bool,
}

/// Determines the host's answer and correctness for a question.
#[async_trait]
pub trait HostJudge: Send + Sync {
    /// Judges `question` against the secret `topic`.
    async fn judge(&self, topic: &str, question: &str) -> Result<Judgment, OracleError>;
}

/// v1 judge: delegates both answer and correctness to the host oracle.
pub struct OracleJudge {
    oracle: Arc<dyn HostOracle>,
}

impl OracleJudge {
    /// Creates a judge backed by the given host oracle.
    pub fn new(oracle: Arc<dyn HostOracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl HostJudge for OracleJudge {
    #[instrument(skip(self, topic, question))]
    async fn judge(&self, topic: &str, question: &str) -> Result<Judgment, OracleError> {
        let verdict = self.oracle.judge(topic, question).await?;
        debug!(answer = %verdict.answer, correct = verdict.correct_guess, "Host oracle verdict");
        Ok(Judgment {
            answer: verdict.answer,
            correct: verdict.correct_guess,
        })
    }
}

/// v2/v3 judge: correctness is a literal substring match of the topic inside
/// the question text, checked before consulting the oracle. A match short-
/// circuits the oracle call entirely.
pub struct SubstringJudge {
    oracle: Arc<dyn AnswerOracle>,
}

impl SubstringJudge {
    /// Creates a judge backed by the given yes/no oracle.
    pub fn new(oracle: Arc<dyn AnswerOracle>) -> Self {
        Self { oracle }
    }
}

#[async_trait]
impl HostJudge for SubstringJudge {
    #[instrument(skip(self, topic, question))]
    async fn judge(&self, topic: &str, question: &str) -> Result<Judgment, OracleError> {
        if question.contains(topic) {
            debug!("Topic appears in question; correct guess");
            return Ok(Judgment {
                answer: YesNo::Yes,
                correct: true,
            });
        }

        let answer = self.oracle.answer(topic, question).await?;
        debug!(answer = %answer, "Host oracle answer");
        Ok(Judgment {
            answer,
            correct: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::oracle::HostVerdict;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct CountingAnswerOracle {
        answer: YesNo,
        calls: AtomicU32,
    }

    #[async_trait]
    impl AnswerOracle for CountingAnswerOracle {
        async fn answer(&self, _topic: &str, _question: &str) -> Result<YesNo, OracleError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.answer)
        }
    }

    struct FixedHostOracle(HostVerdict);

    #[async_trait]
    impl HostOracle for FixedHostOracle {
        async fn judge(&self, _topic: &str, _question: &str) -> Result<HostVerdict, OracleError> {
            Ok(self.0)
        }
    }

    #[tokio::test]
    async fn substring_match_is_correct_without_oracle_call() {
        let oracle = Arc::new(CountingAnswerOracle {
            answer: YesNo::No,
            calls: AtomicU32::new(0),
        });
        let judge = SubstringJudge::new(oracle.clone());

        let judgment = judge.judge("dog", "Is it a dog?").await.unwrap();
        assert!(judgment.correct);
        assert_eq!(judgment.answer, YesNo::Yes);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn substring_match_is_case_sensitive() {
        let oracle = Arc::new(CountingAnswerOracle {
            answer: YesNo::No,
            calls: AtomicU32::new(0),
        });
        let judge = SubstringJudge::new(oracle.clone());

        let judgment = judge.judge("dog", "Is it a Dog?").await.unwrap();
        assert!(!judgment.correct);
        assert_eq!(oracle.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn oracle_judge_trusts_verdict() {
        let judge = OracleJudge::new(Arc::new(FixedHostOracle(HostVerdict {
            answer: YesNo::Yes,
            correct_guess: true,
        })));

        let judgment = judge.judge("dog", "Is it man's best friend?").await.unwrap();
        assert!(judgment.correct);
    }
}
