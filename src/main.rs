use std::io;

use anyhow::Context;
use clap::Parser;
use log::info;
use rand::rngs::StdRng;
use rand::SeedableRng;

use chess_agent::agent::{AgentPlayer, HttpChatProvider};
use chess_agent::models::SessionConfig;
use chess_agent::session::Session;

/// Play chess against a tool-calling language model agent.
#[derive(Parser, Debug)]
#[command(version, about)]
struct Args {
    /// OpenAI-compatible chat-completions endpoint.
    #[arg(long, default_value = "https://api.openai.com/v1")]
    base_url: String,

    /// Model the agent runs on.
    #[arg(long, default_value = "gpt-4o")]
    model: String,

    /// Maximum tool-calling rounds the agent gets per turn.
    #[arg(long, default_value_t = 5)]
    round_cap: u32,

    /// Fix the random side assignment for reproducible sessions.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> anyhow::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let args = Args::parse();
    let api_key =
        std::env::var("CHESS_AGENT_API_KEY").context("CHESS_AGENT_API_KEY is not set")?;

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    let config = SessionConfig::new(&mut rng, args.round_cap);
    let provider = HttpChatProvider::new(args.base_url, api_key);
    let mut session = Session::new(config, AgentPlayer::new(provider, args.model));

    let stdin = io::stdin();
    let mut input = stdin.lock();
    let mut output = io::stdout();
    let reason = session.run(&mut input, &mut output)?;

    info!("moves played: {}", session.arbiter().move_history().join(" "));
    println!("Result: {}.", reason);
    Ok(())
}
