//! One game of twenty questions, run from start to terminal outcome.
//!
//! The session owns its [`GameState`] exclusively and alternates host and
//! guesser turns until a terminal outcome. Judge and strategy variants are
//! injected at construction; the loop itself is variant-agnostic.

use super::judge::HostJudge;
use super::state::{GameState, Message, Outcome};
use super::strategy::GuesserStrategy;
use crate::config::SessionConfig;
use crate::oracle::OracleError;
use crate::topics::TopicSource;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// Host reply appended to the transcript on a correct guess.
const CORRECT_GUESS_REPLY: &str = "Correct guess!";

/// Error message for a host turn reached without a pending question.
const MISSING_QUESTION: &str = "missing question";

/// Turn phases of the session state machine.
///
/// `AwaitTopic` and `AwaitJudgment` are both host turns; they are separate
/// phases because the first host turn assigns the topic instead of judging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// First host turn: assign the topic.
    AwaitTopic,
    /// Guesser's turn: produce a question.
    AwaitGuess,
    /// Host's turn: judge the pending question.
    AwaitJudgment,
    /// Terminal sentinel; no further turns execute.
    Done,
}

/// Immutable record of one finished game.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameResult {
    /// The secret topic (empty if the game failed before topic assignment).
    pub topic: String,
    /// Terminal outcome.
    pub outcome: Outcome,
    /// Questions asked before termination.
    pub question_count: u32,
    /// Error message for error outcomes, preserved verbatim.
    pub error: Option<String>,
    /// Wall-clock duration of this game only.
    pub elapsed: Duration,
    /// Flattened conversation transcript.
    pub transcript: Vec<String>,
}

impl GameResult {
    /// Whether the guesser won.
    pub fn is_correct(&self) -> bool {
        self.outcome == Outcome::CorrectGuess
    }

    /// Whether the game terminated on an error.
    pub fn is_error(&self) -> bool {
        self.outcome == Outcome::Error
    }

    /// Builds the result for a game that failed outside the turn loop
    /// (oracle exhaustion, panic). Question count is reported as 0.
    pub fn from_failure(topic: String, message: String, elapsed: Duration) -> Self {
        Self {
            topic,
            outcome: Outcome::Error,
            question_count: 0,
            error: Some(message),
            elapsed,
            transcript: Vec::new(),
        }
    }
}

/// A single game session: state machine plus injected collaborators.
pub struct GameSession {
    config: SessionConfig,
    judge: Arc<dyn HostJudge>,
    strategy: Arc<dyn GuesserStrategy>,
    topics: Arc<dyn TopicSource>,
    state: GameState,
    next: Phase,
}

impl GameSession {
    /// Creates a session ready to run.
    pub fn new(
        config: SessionConfig,
        judge: Arc<dyn HostJudge>,
        strategy: Arc<dyn GuesserStrategy>,
        topics: Arc<dyn TopicSource>,
    ) -> Self {
        Self {
            config,
            judge,
            strategy,
            topics,
            state: GameState::new(),
            next: Phase::AwaitTopic,
        }
    }

    /// Pure turn dispatcher: reads only the recorded outcome and the `next`
    /// phase written by the last transition. No side effects.
    fn next_phase(&self) -> Phase {
        if self.state.outcome().is_terminal() {
            Phase::Done
        } else {
            self.next
        }
    }

    /// Runs the game to a terminal outcome.
    ///
    /// Oracle failures (after retries) abort the session and propagate to the
    /// caller; every other termination produces a [`GameResult`].
    #[instrument(skip(self), fields(max_questions = self.config.max_questions()))]
    pub async fn run(mut self) -> Result<GameResult, OracleError> {
        let start = Instant::now();

        loop {
            match self.next_phase() {
                Phase::AwaitTopic | Phase::AwaitJudgment => self.host_turn().await?,
                Phase::AwaitGuess => self.guesser_turn().await?,
                Phase::Done => break,
            }
        }

        let result = GameResult {
            topic: self.state.topic().to_string(),
            outcome: self.state.outcome(),
            question_count: self.state.question_count(),
            error: self.state.error().map(str::to_string),
            elapsed: start.elapsed(),
            transcript: self.state.transcript(),
        };
        info!(
            topic = %result.topic,
            outcome = ?result.outcome,
            questions = result.question_count,
            "Game finished"
        );
        Ok(result)
    }

    /// Host turn: assigns the topic on the first turn, judges the pending
    /// question afterwards. A final-budget question is still judged; the
    /// exhaustion check only guards the hand-back to the guesser, so a
    /// correct last-question guess wins rather than exhausting.
    async fn host_turn(&mut self) -> Result<(), OracleError> {
        if self.state.question_count() == 0 {
            // A zero budget exhausts before any question is asked.
            if *self.config.max_questions() == 0 {
                debug!("Question budget exhausted");
                self.state.set_outcome(Outcome::MaxQuestionsReached);
                return Ok(());
            }
            let topic = match self.config.topic() {
                Some(topic) => topic.to_string(),
                None => self.topics.random_topic(),
            };
            self.state.set_topic(topic);
            self.next = Phase::AwaitGuess;
            return Ok(());
        }

        let question = match self.state.take_pending_question() {
            Some(question) => question,
            None => {
                self.state.fail(MISSING_QUESTION);
                return Ok(());
            }
        };

        let judgment = self.judge.judge(self.state.topic(), &question).await?;

        if judgment.correct {
            self.state.push_message(Message::host(CORRECT_GUESS_REPLY));
            self.state.set_outcome(Outcome::CorrectGuess);
        } else {
            self.state
                .push_message(Message::host(judgment.answer.to_string()));
            if self.state.question_count() >= *self.config.max_questions() {
                debug!("Question budget exhausted");
                self.state.set_outcome(Outcome::MaxQuestionsReached);
            } else {
                self.next = Phase::AwaitGuess;
            }
        }
        Ok(())
    }

    /// Guesser turn: one strategy invocation, one question, one increment of
    /// the question counter.
    async fn guesser_turn(&mut self) -> Result<(), OracleError> {
        let remaining = *self.config.max_questions() - self.state.question_count();
        let mv = self.strategy.next_move(&self.state, remaining).await?;

        if let Some(candidates) = mv.candidates {
            self.state.replace_candidates(candidates);
        }
        self.state.push_message(Message::guesser(mv.question.clone()));
        self.state.set_pending_question(mv.question);
        self.state.increment_question_count();
        self.next = Phase::AwaitJudgment;
        Ok(())
    }
}
