//! Twenty Questions - Unified CLI
//!
//! Plays single games or runs batch evaluations against LLM oracles.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;
use twenty_questions::{
    BinarySearchElimination, EvalOptions, Evaluator, GameSession, GuesserStrategy, HostJudge,
    LlmCandidateRecommender, LlmChoiceEvaluator, LlmClient, LlmGuesser, LlmHost,
    LlmQuestionEvaluator, LlmQuestionGenerator, LlmRecommender, OracleJudge, OracleSettings,
    RecommendThenEvaluate, SessionConfig, SingleShot, StrategyVersion, SubstringJudge, TopicPool,
    compute_metrics,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let settings = match &cli.oracle_config {
        Some(path) => OracleSettings::from_file(path)?,
        None => OracleSettings::default(),
    };
    let client = LlmClient::new(settings.create_llm_config()?);

    match cli.command {
        Command::Play {
            topic,
            max_questions,
            strategy,
        } => run_play(client, topic, max_questions, strategy).await,
        Command::Eval {
            topics,
            num_runs,
            max_questions,
            strategy,
            workers,
        } => run_eval(client, topics, num_runs, max_questions, strategy, workers).await,
    }
}

/// Builds the judge/strategy pair for a strategy version.
///
/// v1 pairs the single-shot guesser with the oracle-ruled judge; v2 and v3
/// pair their strategies with the deterministic substring judge.
fn build_players(
    version: StrategyVersion,
    client: &LlmClient,
) -> (Arc<dyn HostJudge>, Arc<dyn GuesserStrategy>) {
    let host = Arc::new(LlmHost::new(client.clone()));
    match version {
        StrategyVersion::V1 => (
            Arc::new(OracleJudge::new(host)),
            Arc::new(SingleShot::new(Arc::new(LlmGuesser::new(client.clone())))),
        ),
        StrategyVersion::V2 => (
            Arc::new(SubstringJudge::new(host)),
            Arc::new(RecommendThenEvaluate::new(
                Arc::new(LlmRecommender::new(client.clone())),
                Arc::new(LlmChoiceEvaluator::new(client.clone())),
            )),
        ),
        StrategyVersion::V3 => (
            Arc::new(SubstringJudge::new(host)),
            Arc::new(BinarySearchElimination::new(
                Arc::new(LlmCandidateRecommender::new(client.clone())),
                Arc::new(LlmQuestionGenerator::new(client.clone())),
                Arc::new(LlmQuestionEvaluator::new(client.clone())),
            )),
        ),
    }
}

/// Play one game and print the transcript.
#[instrument(skip(client))]
async fn run_play(
    client: LlmClient,
    topic: Option<String>,
    max_questions: u32,
    strategy: StrategyVersion,
) -> Result<()> {
    info!(?strategy, max_questions, "Starting single game");

    let (judge, guesser) = build_players(strategy, &client);
    let mut config = SessionConfig::new(max_questions);
    if let Some(topic) = topic {
        config = config.with_topic(topic);
    }

    let session = GameSession::new(config, judge, guesser, Arc::new(TopicPool::default()));
    let result = session.run().await?;

    for line in &result.transcript {
        println!("{}", line);
    }
    println!("----");
    println!("Topic: {}", result.topic);
    println!("Outcome: {:?}", result.outcome);
    println!("Questions: {}", result.question_count);
    if let Some(error) = &result.error {
        println!("Error: {}", error);
    }
    println!("Time: {:.2}s", result.elapsed.as_secs_f64());
    Ok(())
}

/// Run a batch evaluation over a topics file and print metrics.
#[instrument(skip(client))]
async fn run_eval(
    client: LlmClient,
    topics_path: std::path::PathBuf,
    num_runs: u32,
    max_questions: u32,
    strategy: StrategyVersion,
    workers: Option<usize>,
) -> Result<()> {
    let pool = TopicPool::from_file(&topics_path)?;
    let topics = pool.topics().to_vec();
    info!(
        topics = topics.len(),
        num_runs,
        ?strategy,
        "Starting evaluation"
    );

    let (judge, guesser) = build_players(strategy, &client);
    let mut options = EvalOptions::new()
        .with_num_runs(num_runs)
        .with_max_questions(max_questions);
    if let Some(workers) = workers {
        options = options.with_worker_budget(workers);
    }

    let evaluator = Evaluator::new(judge, guesser, Arc::new(TopicPool::default()), options);
    let results = evaluator.run_batch(&topics).await;
    let metrics = compute_metrics(&results)?;

    println!("\nEvaluation Results:");
    println!("==================");
    println!("{}", metrics);
    println!("==================");
    Ok(())
}
