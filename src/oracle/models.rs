//! Structured input/output models exchanged with the decision oracles.
//!
//! These are the wire shapes LLM-backed oracles deserialize from model
//! output, and the shapes stub oracles construct directly in tests.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Yes/no answer from the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum YesNo {
    /// The question is true of the topic.
    #[serde(alias = "yes", alias = "YES")]
    Yes,
    /// The question is not true of the topic.
    #[serde(alias = "no", alias = "NO")]
    No,
}

impl std::fmt::Display for YesNo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            YesNo::Yes => write!(f, "Yes"),
            YesNo::No => write!(f, "No"),
        }
    }
}

/// Verdict of the v1 host oracle: an answer plus an explicit correctness flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HostVerdict {
    /// Yes/no answer to the guesser's question.
    pub answer: YesNo,
    /// Whether the host considers the question a correct guess of the topic.
    pub correct_guess: bool,
}

/// Recommender shortlist for the v2 guesser.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shortlist {
    /// Possible guesses at the topic, limited to 5.
    #[serde(default)]
    pub guesses: Vec<String>,
    /// Possible questions to the host, limited to 5.
    #[serde(default)]
    pub questions: Vec<String>,
}

/// Whether the guesser should guess the topic or ask another question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuessOrQuestionChoice {
    /// Commit to a guess at the topic.
    Guess,
    /// Ask another narrowing question.
    Question,
}

/// The v2 evaluator's selection from the shortlist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuessOrQuestion {
    /// Which kind of move was selected.
    pub choice: GuessOrQuestionChoice,
    /// The guess, present when `choice` is `Guess`.
    #[serde(default)]
    pub guess: Option<String>,
    /// The question, present when `choice` is `Question`.
    #[serde(default)]
    pub question: Option<String>,
    /// Free-form reasoning behind the selection.
    #[serde(default)]
    pub analysis: Option<String>,
}

/// Decision of the v3 candidate recommender.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommenderDecision {
    /// Guess now, or keep narrowing with questions.
    pub decision: GuessOrQuestionChoice,
    /// Updated candidate pool; replaces the prior pool wholesale.
    #[serde(default)]
    pub candidates: Vec<String>,
    /// Per-candidate confidence in [0, 1]. Candidates may be missing from
    /// this map; a missing score reads as 0.
    #[serde(default)]
    pub confidences: HashMap<String, f64>,
    /// Free-form reasoning behind the decision.
    #[serde(default)]
    pub reasoning: String,
}

impl RecommenderDecision {
    /// Confidence for a candidate, with missing scores reading as 0.
    pub fn confidence(&self, candidate: &str) -> f64 {
        self.confidences.get(candidate).copied().unwrap_or(0.0)
    }

    /// The candidate with the highest confidence, if any candidate exists.
    ///
    /// An empty or partial confidence map never panics; unscored candidates
    /// simply rank at 0.
    pub fn best_candidate(&self) -> Option<(&str, f64)> {
        self.candidates
            .iter()
            .map(|c| (c.as_str(), self.confidence(c)))
            .max_by(|a, b| a.1.total_cmp(&b.1))
    }
}

/// Output of the v3 question generator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedQuestion {
    /// Question expected to eliminate roughly half of the candidates.
    pub question: String,
    /// Candidates a No answer would eliminate.
    #[serde(default)]
    pub eliminated: Vec<String>,
    /// Candidates a Yes answer would retain.
    #[serde(default)]
    pub retained: Vec<String>,
}

/// The v3 question evaluator's assessment of a proposed question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionAssessment {
    /// Whether the question is an effective split.
    pub is_good: bool,
    /// Free-form reasoning behind the assessment.
    #[serde(default)]
    pub reasoning: String,
    /// Suggested improvement when the question is not good.
    #[serde(default)]
    pub improvement: Option<String>,
}
