//! Shared scripted oracles and strategies for integration tests.

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use twenty_questions::{
    AnswerOracle, GameState, GuesserStrategy, HostOracle, HostVerdict, OracleError, StrategyMove,
    TopicSource, YesNo,
};

/// Topic source that always returns the same topic.
pub struct FixedTopic(pub String);

impl TopicSource for FixedTopic {
    fn random_topic(&self) -> String {
        self.0.clone()
    }
}

/// Answer oracle that always answers the same way, counting its calls.
pub struct FixedAnswer {
    answer: YesNo,
    calls: AtomicU32,
}

impl FixedAnswer {
    pub fn yes() -> Self {
        Self {
            answer: YesNo::Yes,
            calls: AtomicU32::new(0),
        }
    }

    pub fn no() -> Self {
        Self {
            answer: YesNo::No,
            calls: AtomicU32::new(0),
        }
    }

    pub fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AnswerOracle for FixedAnswer {
    async fn answer(&self, _topic: &str, _question: &str) -> Result<YesNo, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.answer)
    }
}

/// Host oracle that flags a correct guess when the question contains a
/// configured phrase, independent of the topic text.
pub struct PhraseHost {
    pub phrase: String,
}

#[async_trait]
impl HostOracle for PhraseHost {
    async fn judge(&self, _topic: &str, question: &str) -> Result<HostVerdict, OracleError> {
        let correct = question.contains(&self.phrase);
        Ok(HostVerdict {
            answer: if correct { YesNo::Yes } else { YesNo::No },
            correct_guess: correct,
        })
    }
}

/// Strategy that replays a scripted sequence of questions, then repeats the
/// last one if asked again.
pub struct ScriptedStrategy {
    questions: Mutex<VecDeque<String>>,
    last: Mutex<String>,
}

impl ScriptedStrategy {
    pub fn new(questions: impl IntoIterator<Item = &'static str>) -> Self {
        let queue: VecDeque<String> = questions.into_iter().map(String::from).collect();
        Self {
            questions: Mutex::new(queue),
            last: Mutex::new(String::from("Is it alive?")),
        }
    }
}

#[async_trait]
impl GuesserStrategy for ScriptedStrategy {
    async fn next_move(
        &self,
        _state: &GameState,
        _remaining: u32,
    ) -> Result<StrategyMove, OracleError> {
        let next = self.questions.lock().unwrap().pop_front();
        let question = match next {
            Some(question) => {
                *self.last.lock().unwrap() = question.clone();
                question
            }
            None => self.last.lock().unwrap().clone(),
        };
        Ok(StrategyMove {
            question,
            candidates: None,
        })
    }
}

/// Strategy that immediately guesses the topic it can see in the state.
///
/// Paired with the substring judge this wins every game on the first
/// question, which keeps batch tests fast.
pub struct InstantWin;

#[async_trait]
impl GuesserStrategy for InstantWin {
    async fn next_move(
        &self,
        state: &GameState,
        _remaining: u32,
    ) -> Result<StrategyMove, OracleError> {
        Ok(StrategyMove {
            question: format!("Is it a {}?", state.topic()),
            candidates: None,
        })
    }
}

/// Strategy that always fails with an oracle error.
pub struct FailingStrategy;

#[async_trait]
impl GuesserStrategy for FailingStrategy {
    async fn next_move(
        &self,
        _state: &GameState,
        _remaining: u32,
    ) -> Result<StrategyMove, OracleError> {
        Err(OracleError::Failed("stubbed transport failure".to_string()))
    }
}
