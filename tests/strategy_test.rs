//! Behavioral tests for the staged guesser strategies, with call-counting
//! stub oracles.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use twenty_questions::{
    BinarySearchElimination, CandidateRecommender, ChoiceEvaluator, GameState, GeneratedQuestion,
    GuessOrQuestion, GuessOrQuestionChoice, GuesserStrategy, Message, OracleError,
    QuestionAssessment, QuestionEvaluator, QuestionGenerator, RecommendThenEvaluate, Recommender,
    RecommenderDecision, Shortlist,
};

struct FixedRecommender(Shortlist);

#[async_trait]
impl Recommender for FixedRecommender {
    async fn recommend(&self, _history: &[Message]) -> Result<Shortlist, OracleError> {
        Ok(self.0.clone())
    }
}

struct FixedChoice(GuessOrQuestion);

#[async_trait]
impl ChoiceEvaluator for FixedChoice {
    async fn choose(
        &self,
        _shortlist: &Shortlist,
        _history: &[Message],
        _remaining: u32,
    ) -> Result<GuessOrQuestion, OracleError> {
        Ok(self.0.clone())
    }
}

struct FixedDecision(RecommenderDecision);

#[async_trait]
impl CandidateRecommender for FixedDecision {
    async fn recommend(
        &self,
        _history: &[Message],
        _candidates: &[String],
    ) -> Result<RecommenderDecision, OracleError> {
        Ok(self.0.clone())
    }
}

/// Generator that returns canned questions in order and counts its calls.
struct CountingGenerator {
    questions: Mutex<Vec<String>>,
    calls: AtomicU32,
    last_feedback: Mutex<Option<String>>,
}

impl CountingGenerator {
    fn new(questions: impl IntoIterator<Item = &'static str>) -> Self {
        let mut questions: Vec<String> = questions.into_iter().map(String::from).collect();
        questions.reverse();
        Self {
            questions: Mutex::new(questions),
            calls: AtomicU32::new(0),
            last_feedback: Mutex::new(None),
        }
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl QuestionGenerator for CountingGenerator {
    async fn generate(
        &self,
        _candidates: &[String],
        _history: &[Message],
        feedback: Option<&str>,
    ) -> Result<GeneratedQuestion, OracleError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_feedback.lock().unwrap() = feedback.map(String::from);
        let question = self
            .questions
            .lock()
            .unwrap()
            .pop()
            .unwrap_or_else(|| "Is it alive?".to_string());
        Ok(GeneratedQuestion {
            question,
            eliminated: Vec::new(),
            retained: Vec::new(),
        })
    }
}

struct FixedAssessment(QuestionAssessment);

#[async_trait]
impl QuestionEvaluator for FixedAssessment {
    async fn assess(
        &self,
        _candidates: &[String],
        _proposal: &GeneratedQuestion,
        _history: &[Message],
    ) -> Result<QuestionAssessment, OracleError> {
        Ok(self.0.clone())
    }
}

fn good_assessment() -> QuestionAssessment {
    QuestionAssessment {
        is_good: true,
        reasoning: String::new(),
        improvement: None,
    }
}

fn bad_assessment(improvement: &str) -> QuestionAssessment {
    QuestionAssessment {
        is_good: false,
        reasoning: String::new(),
        improvement: Some(improvement.to_string()),
    }
}

fn decision(
    choice: GuessOrQuestionChoice,
    candidates: &[&str],
    confidences: &[(&str, f64)],
) -> RecommenderDecision {
    RecommenderDecision {
        decision: choice,
        candidates: candidates.iter().map(|c| c.to_string()).collect(),
        confidences: confidences
            .iter()
            .map(|(c, score)| (c.to_string(), *score))
            .collect(),
        reasoning: String::new(),
    }
}

#[tokio::test]
async fn high_confidence_guess_skips_question_generation() {
    let generator = Arc::new(CountingGenerator::new(["Is it alive?"]));
    let strategy = BinarySearchElimination::new(
        Arc::new(FixedDecision(decision(
            GuessOrQuestionChoice::Guess,
            &["dog", "cat"],
            &[("dog", 0.95), ("cat", 0.4)],
        ))),
        generator.clone(),
        Arc::new(FixedAssessment(good_assessment())),
    );

    let mv = strategy.next_move(&GameState::new(), 10).await.unwrap();
    assert_eq!(mv.question, "Is it a dog?");
    assert_eq!(generator.calls(), 0);
}

#[tokio::test]
async fn threshold_confidence_is_not_enough_to_guess() {
    // 0.9 exactly does not clear the strictly-greater bar.
    let generator = Arc::new(CountingGenerator::new(["Is it bigger than a cat?"]));
    let strategy = BinarySearchElimination::new(
        Arc::new(FixedDecision(decision(
            GuessOrQuestionChoice::Guess,
            &["dog"],
            &[("dog", 0.9)],
        ))),
        generator.clone(),
        Arc::new(FixedAssessment(good_assessment())),
    );

    let mv = strategy.next_move(&GameState::new(), 10).await.unwrap();
    assert_eq!(mv.question, "Is it bigger than a cat?");
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn guess_decision_without_confidences_falls_back_to_questions() {
    let generator = Arc::new(CountingGenerator::new(["Is it alive?"]));
    let strategy = BinarySearchElimination::new(
        Arc::new(FixedDecision(decision(
            GuessOrQuestionChoice::Guess,
            &["dog", "cat"],
            &[],
        ))),
        generator.clone(),
        Arc::new(FixedAssessment(good_assessment())),
    );

    let mv = strategy.next_move(&GameState::new(), 10).await.unwrap();
    assert_eq!(mv.question, "Is it alive?");
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn rejected_question_is_regenerated_exactly_once() {
    let generator = Arc::new(CountingGenerator::new([
        "Is it purple?",
        "Is it an animal?",
    ]));
    let strategy = BinarySearchElimination::new(
        Arc::new(FixedDecision(decision(
            GuessOrQuestionChoice::Question,
            &["dog", "cat", "car", "house"],
            &[],
        ))),
        generator.clone(),
        Arc::new(FixedAssessment(bad_assessment("split on animacy"))),
    );

    let mv = strategy.next_move(&GameState::new(), 10).await.unwrap();

    // The second proposal is used even though the assessment would still
    // reject it; regeneration is bounded at one.
    assert_eq!(mv.question, "Is it an animal?");
    assert_eq!(generator.calls(), 2);
    assert_eq!(
        generator.last_feedback.lock().unwrap().as_deref(),
        Some("split on animacy")
    );
}

#[tokio::test]
async fn accepted_question_is_not_regenerated() {
    let generator = Arc::new(CountingGenerator::new(["Is it an animal?"]));
    let strategy = BinarySearchElimination::new(
        Arc::new(FixedDecision(decision(
            GuessOrQuestionChoice::Question,
            &["dog", "cat"],
            &[],
        ))),
        generator.clone(),
        Arc::new(FixedAssessment(good_assessment())),
    );

    let mv = strategy.next_move(&GameState::new(), 10).await.unwrap();
    assert_eq!(mv.question, "Is it an animal?");
    assert_eq!(generator.calls(), 1);
}

#[tokio::test]
async fn recommender_candidates_replace_the_pool() {
    let strategy = BinarySearchElimination::new(
        Arc::new(FixedDecision(decision(
            GuessOrQuestionChoice::Question,
            &["cat", "cherry"],
            &[],
        ))),
        Arc::new(CountingGenerator::new(["Is it alive?"])),
        Arc::new(FixedAssessment(good_assessment())),
    );

    let mut state = GameState::new();
    state.replace_candidates(vec!["dog".to_string(), "cat".to_string()]);

    let mv = strategy.next_move(&state, 10).await.unwrap();
    assert_eq!(
        mv.candidates,
        Some(vec!["cat".to_string(), "cherry".to_string()])
    );
}

#[tokio::test]
async fn shortlist_guess_selection_is_phrased_as_a_question() {
    let strategy = RecommendThenEvaluate::new(
        Arc::new(FixedRecommender(Shortlist {
            guesses: vec!["dog".to_string()],
            questions: vec!["Is it alive?".to_string()],
        })),
        Arc::new(FixedChoice(GuessOrQuestion {
            choice: GuessOrQuestionChoice::Guess,
            guess: Some("dog".to_string()),
            question: None,
            analysis: None,
        })),
    );

    let mv = strategy.next_move(&GameState::new(), 10).await.unwrap();
    assert_eq!(mv.question, "Is it a dog?");
    assert!(mv.candidates.is_none());
}

#[tokio::test]
async fn shortlist_question_selection_is_used_verbatim() {
    let strategy = RecommendThenEvaluate::new(
        Arc::new(FixedRecommender(Shortlist::default())),
        Arc::new(FixedChoice(GuessOrQuestion {
            choice: GuessOrQuestionChoice::Question,
            guess: None,
            question: Some("Is it alive?".to_string()),
            analysis: None,
        })),
    );

    let mv = strategy.next_move(&GameState::new(), 10).await.unwrap();
    assert_eq!(mv.question, "Is it alive?");
}

#[tokio::test]
async fn guess_choice_without_payload_is_malformed() {
    let strategy = RecommendThenEvaluate::new(
        Arc::new(FixedRecommender(Shortlist::default())),
        Arc::new(FixedChoice(GuessOrQuestion {
            choice: GuessOrQuestionChoice::Guess,
            guess: None,
            question: None,
            analysis: None,
        })),
    );

    let error = strategy.next_move(&GameState::new(), 10).await.unwrap_err();
    assert!(matches!(error, OracleError::Malformed(_)));
}

#[tokio::test]
async fn empty_confidence_helper_never_panics() {
    // Regression guard for max-over-empty: a decision with candidates but no
    // scores must still produce a best candidate at score zero.
    let decision = RecommenderDecision {
        decision: GuessOrQuestionChoice::Guess,
        candidates: vec!["dog".to_string()],
        confidences: HashMap::new(),
        reasoning: String::new(),
    };
    assert_eq!(decision.best_candidate(), Some(("dog", 0.0)));
}
