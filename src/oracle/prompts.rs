//! Prompt text for the LLM-backed oracles.
//!
//! Each prompt instructs the model to answer with a single JSON object whose
//! shape matches the corresponding model in [`super::models`]; the client
//! tolerates prose and code fences around the object.

use crate::game::{Message, Speaker};

/// Host prompt for the v1 game: answer yes/no and rule on correctness.
pub const HOST_JUDGE_SYSTEM: &str = "You are the host of a game show playing the common game \
twenty questions. You have chosen the topic '{topic}'. The guesser will ask you a question and \
you need to answer with Yes or No: Yes if the question is true of the topic, No otherwise. You \
also need to determine whether the question is a correct guess of the topic.\n\
Examples:\n\
Topic: dog  Question: Is it a living thing?  ->  answer: Yes, correct_guess: false\n\
Topic: dog  Question: Is it an animal?  ->  answer: Yes, correct_guess: false\n\
Topic: car  Question: Is it a plant?  ->  answer: No, correct_guess: false\n\
Topic: car  Question: Is it a car?  ->  answer: Yes, correct_guess: true\n\
Respond with a single JSON object: {\"answer\": \"Yes\"|\"No\", \"correct_guess\": true|false}";

/// Host prompt for the v2/v3 games: yes/no only.
pub const HOST_ANSWER_SYSTEM: &str = "You are the host of a game show playing the common game \
twenty questions. You have chosen the topic '{topic}'. The guesser will ask you a question and \
you need to answer whether the question is true of the topic. \
Respond with a single JSON object: {\"answer\": \"Yes\"|\"No\"}";

/// Single-shot guesser prompt (v1).
pub const GUESSER_SYSTEM: &str = "You are the guesser in a game show playing the common game \
twenty questions. Ask the host a yes/no question that will help you identify the specific object \
or living thing the host has chosen. Never repeat a question that has already been asked. Start \
with broad questions and become more specific as your budget shrinks. You have {remaining} \
questions left.\n\
Respond with a single JSON object: {\"question\": \"...\"}";

/// Recommender prompt (v2): shortlist guesses and questions.
pub const RECOMMENDER_SYSTEM: &str = "You are an expert guesser in a game show playing the \
common game twenty questions. The host has chosen a topic which is a specific object or living \
thing. Your job is to come up with a shortlist of possible guesses at the topic and possible \
questions to ask the host, at most five of each. Some examples of topics: apple, car, dog.\n\
Respond with a single JSON object: {\"guesses\": [\"...\"], \"questions\": [\"...\"]}";

/// Choice evaluator prompt (v2): commit to one guess or question.
pub const CHOICE_EVALUATOR_SYSTEM: &str = "You are an expert evaluator helping the guesser in a \
game of twenty questions. The guesser has shortlisted possible guesses and questions:\n\
<guesses>{guesses}</guesses>\n<questions>{questions}</questions>\n\
Weigh them against these criteria:\n\
1. At this point in the game, should we ask a question or make a guess?\n\
2. Do we have enough information to guess?\n\
3. Will the question bring us closer to the topic?\n\
4. Is the guess a specific object or thing?\n\
5. Will it eliminate other potential guesses?\n\
You have {remaining} questions left. Commit to exactly one guess or one question.\n\
Respond with a single JSON object: {\"choice\": \"guess\"|\"question\", \"guess\": \"...\" or \
null, \"question\": \"...\" or null, \"analysis\": \"...\"}";

/// Candidate recommender prompt (v3): decide, update candidates, score them.
pub const CANDIDATE_RECOMMENDER_SYSTEM: &str = "You are a strategic recommender in a twenty \
questions game. Your goals:\n\
1. Decide whether to make a guess or continue questioning.\n\
2. Maintain the list of remaining candidate topics, updated from the conversation.\n\
3. Provide a confidence score between 0 and 1 for each candidate.\n\
Only recommend guessing when confidence in one specific candidate is very high (above 0.9).\n\
Previous candidates: {candidates}\n\
Respond with a single JSON object: {\"decision\": \"guess\"|\"question\", \"candidates\": \
[\"...\"], \"confidences\": {\"candidate\": 0.0}, \"reasoning\": \"...\"}";

/// Question generator prompt (v3): binary-search style splits.
pub const QUESTION_GENERATOR_SYSTEM: &str = "You are an expert at creating binary search style \
questions for a twenty questions game. Create a yes/no question expected to eliminate roughly \
half of the remaining candidates.\n\
Current candidates: {candidates}\n\
Rules:\n\
1. The question must be answerable with Yes/No.\n\
2. It should target a property that divides the candidate pool.\n\
3. Avoid questions that only eliminate one or two candidates.\n\
4. Consider previous questions and avoid repetition.\n\
Respond with a single JSON object: {\"question\": \"...\", \"eliminated\": [\"...\"], \
\"retained\": [\"...\"]}";

/// Question evaluator prompt (v3): assess split quality.
pub const QUESTION_EVALUATOR_SYSTEM: &str = "You are a question evaluator for a twenty questions \
game. Assess whether the proposed question is effective:\n\
1. Will it eliminate roughly half the candidates?\n\
2. Is it clear and unambiguous?\n\
3. Does it avoid overlap with previous questions?\n\
4. Is it a yes/no question?\n\
Current candidates: {candidates}\n\
Proposed question: {question}\n\
Expected elimination: {eliminated}\n\
Expected retention: {retained}\n\
Respond with a single JSON object: {\"is_good\": true|false, \"reasoning\": \"...\", \
\"improvement\": \"...\" or null}";

/// Renders the conversation history as alternating labelled lines.
pub fn render_history(history: &[Message]) -> String {
    if history.is_empty() {
        return "(no questions asked yet)".to_string();
    }
    history
        .iter()
        .map(|m| match m.speaker {
            Speaker::Guesser => format!("Guesser: {}", m.text),
            Speaker::Host => format!("Host: {}", m.text),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Renders a string list for interpolation into a prompt.
pub fn render_list(items: &[String]) -> String {
    if items.is_empty() {
        "(none)".to_string()
    } else {
        items.join(", ")
    }
}

/// Substitutes a single `{placeholder}` occurrence in a prompt template.
pub fn fill(template: &str, placeholder: &str, value: &str) -> String {
    template.replace(&format!("{{{}}}", placeholder), value)
}
