use std::io;

use anyhow::Context;
use clap::Parser;
use rollbox_core::{GameConfig, Letter, TurnEngine};

use crate::console::Console;

mod console;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: clap_verbosity_flag::Verbosity<clap_verbosity_flag::WarnLevel>,

    /// Force a seed instead of random
    #[arg(short, long)]
    seed: Option<u64>,

    /// Number of turns to play
    #[arg(short, long, default_value_t = GameConfig::DEFAULT_MAX_TURNS)]
    turns: u8,

    /// Letter to collect, random when omitted
    #[arg(long)]
    target: Option<Letter>,

    /// Allow opening any box, not only the ones rolled this turn
    #[arg(long)]
    open_any: bool,

    /// Print the final report as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .parse_default_env()
        .init();

    let seed = args.seed.unwrap_or_else(rand::random);
    log::debug!("seed: {}", seed);

    let config = GameConfig::new(args.turns).with_require_rolled_target(!args.open_any);
    let mut engine = TurnEngine::generate(config, seed);
    if let Some(target) = args.target {
        engine = engine.with_target(target)?;
    }

    let mut console = Console::new(io::stdin().lock(), io::stdout().lock());
    console.welcome(&engine);
    let report = engine.run(&mut console).context("Game stopped before it was over")?;
    console.game_over(&engine, &report);
    drop(console);

    if args.json {
        let json = serde_json::to_string_pretty(&report).context("Could not serialize the report")?;
        println!("{}", json);
    }

    Ok(())
}
