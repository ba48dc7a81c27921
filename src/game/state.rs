//! Mutable per-game state owned by a single [`GameSession`](super::GameSession).

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Which side of the table produced a transcript entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Speaker {
    /// The guesser asking questions.
    Guesser,
    /// The host answering them.
    Host,
}

/// One entry in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Who spoke.
    pub speaker: Speaker,
    /// What they said.
    pub text: String,
}

impl Message {
    /// Creates a guesser-tagged message.
    pub fn guesser(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Guesser,
            text: text.into(),
        }
    }

    /// Creates a host-tagged message.
    pub fn host(text: impl Into<String>) -> Self {
        Self {
            speaker: Speaker::Host,
            text: text.into(),
        }
    }
}

/// Terminal (or ongoing) disposition of a game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// The game is still in progress.
    Ongoing,
    /// The guesser identified the topic.
    CorrectGuess,
    /// The question budget ran out without a correct guess.
    MaxQuestionsReached,
    /// The game died on an internal error (e.g. a host turn with no question).
    Error,
}

impl Outcome {
    /// Returns true once the game can take no further turns.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Outcome::Ongoing)
    }
}

/// Mutable state of one game, exclusively owned by its session.
///
/// The topic is written once at the first host turn and never reassigned.
/// History is append-only; `candidates` is replaced wholesale each guesser
/// turn and only the binary-search strategy reads it.
#[derive(Debug, Clone)]
pub struct GameState {
    topic: String,
    question_count: u32,
    history: Vec<Message>,
    candidates: Vec<String>,
    pending_question: Option<String>,
    outcome: Outcome,
    error: Option<String>,
}

impl GameState {
    /// Creates the initial state: no topic, empty history, ongoing.
    pub fn new() -> Self {
        Self {
            topic: String::new(),
            question_count: 0,
            history: Vec::new(),
            candidates: Vec::new(),
            pending_question: None,
            outcome: Outcome::Ongoing,
            error: None,
        }
    }

    /// The secret topic, or an empty string before the first host turn.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// Assigns the topic. Later calls are ignored: the topic is immutable
    /// once set.
    pub fn set_topic(&mut self, topic: impl Into<String>) {
        if self.topic.is_empty() {
            self.topic = topic.into();
            debug!(topic = %self.topic, "Topic assigned");
        } else {
            debug!("Ignoring attempt to reassign topic");
        }
    }

    /// Number of guesser turns taken so far.
    pub fn question_count(&self) -> u32 {
        self.question_count
    }

    /// Advances the question counter by exactly one.
    pub fn increment_question_count(&mut self) {
        self.question_count += 1;
    }

    /// Full conversation history, oldest first.
    pub fn history(&self) -> &[Message] {
        &self.history
    }

    /// Appends a message to the history.
    pub fn push_message(&mut self, message: Message) {
        self.history.push(message);
    }

    /// Candidate topics tracked by the binary-search strategy.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Replaces the candidate list wholesale.
    pub fn replace_candidates(&mut self, candidates: Vec<String>) {
        self.candidates = candidates;
    }

    /// The guesser's most recent question, if the host has not consumed it.
    pub fn pending_question(&self) -> Option<&str> {
        self.pending_question.as_deref()
    }

    /// Stores the guesser's question for the next host turn.
    pub fn set_pending_question(&mut self, question: impl Into<String>) {
        self.pending_question = Some(question.into());
    }

    /// Takes the pending question, clearing it.
    pub fn take_pending_question(&mut self) -> Option<String> {
        self.pending_question.take()
    }

    /// Current outcome.
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    /// Marks the game terminal. Terminal outcomes stick: once set, further
    /// calls are ignored.
    pub fn set_outcome(&mut self, outcome: Outcome) {
        if !self.outcome.is_terminal() {
            self.outcome = outcome;
        }
    }

    /// Error message, set only on error-terminal outcomes.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Terminates the game with an error outcome and message.
    pub fn fail(&mut self, message: impl Into<String>) {
        let message = message.into();
        debug!(error = %message, "Game failed");
        self.set_outcome(Outcome::Error);
        if self.error.is_none() {
            self.error = Some(message);
        }
    }

    /// Flattens the history into plain text lines for the game result.
    pub fn transcript(&self) -> Vec<String> {
        self.history.iter().map(|m| m.text.clone()).collect()
    }
}

impl Default for GameState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topic_is_set_once() {
        let mut state = GameState::new();
        assert_eq!(state.topic(), "");

        state.set_topic("dog");
        state.set_topic("cat");
        assert_eq!(state.topic(), "dog");
    }

    #[test]
    fn history_is_append_only_and_flattens() {
        let mut state = GameState::new();
        state.push_message(Message::guesser("Is it alive?"));
        state.push_message(Message::host("Yes"));

        assert_eq!(state.history().len(), 2);
        assert_eq!(state.history()[0].speaker, Speaker::Guesser);
        assert_eq!(state.transcript(), vec!["Is it alive?", "Yes"]);
    }

    #[test]
    fn pending_question_cleared_when_taken() {
        let mut state = GameState::new();
        state.set_pending_question("Is it a dog?");
        assert_eq!(state.pending_question(), Some("Is it a dog?"));

        assert_eq!(state.take_pending_question().as_deref(), Some("Is it a dog?"));
        assert!(state.pending_question().is_none());
    }

    #[test]
    fn terminal_outcome_sticks() {
        let mut state = GameState::new();
        state.set_outcome(Outcome::CorrectGuess);
        state.set_outcome(Outcome::MaxQuestionsReached);
        assert_eq!(state.outcome(), Outcome::CorrectGuess);
    }

    #[test]
    fn fail_records_message_and_outcome() {
        let mut state = GameState::new();
        state.fail("missing question");
        assert_eq!(state.outcome(), Outcome::Error);
        assert_eq!(state.error(), Some("missing question"));
    }
}
