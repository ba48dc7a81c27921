//! Game core: state, turn loop, judges, and guesser strategies.

mod judge;
mod session;
mod state;
mod strategy;

pub use judge::{HostJudge, Judgment, OracleJudge, SubstringJudge};
pub use session::{GameResult, GameSession};
pub use state::{GameState, Message, Outcome, Speaker};
pub use strategy::{
    BinarySearchElimination, GuesserStrategy, RecommendThenEvaluate, SingleShot, StrategyMove,
};
