use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use reply_throttle::{
    init_tracing, read_transcript, BotConfig, DamerauLevenshtein, ReplayClock, Replayer,
};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "reply-throttle",
    version,
    about = "Replay chat transcripts through the duplicate-reply gate"
)]
struct Args {
    /// Path to the YAML config (defaults apply when omitted)
    #[arg(long, env = "REPLY_THROTTLE_CONFIG")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Replay a JSON-lines transcript and print one decision per message
    Replay {
        /// Transcript file
        transcript: PathBuf,
    },
    /// Print the effective configuration as YAML
    Config,
}

fn main() -> Result<()> {
    init_tracing();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => BotConfig::load(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => BotConfig::default(),
    };

    match args.command {
        Cmd::Replay { transcript } => replay(&config, &transcript),
        Cmd::Config => {
            print!("{}", config.to_yaml().context("serializing config")?);
            Ok(())
        }
    }
}

fn replay(config: &BotConfig, transcript: &Path) -> Result<()> {
    let file = File::open(transcript)
        .with_context(|| format!("opening transcript at {}", transcript.display()))?;
    let lines = read_transcript(BufReader::new(file))
        .with_context(|| format!("reading transcript at {}", transcript.display()))?;

    let clock = Arc::new(ReplayClock::new());
    let gate = config
        .build_gate(clock.clone(), Arc::new(DamerauLevenshtein))
        .context("building gate")?;
    let replayer = Replayer::new(gate, clock);
    info!(messages = lines.len(), "Replaying transcript");

    for (index, line) in lines.iter().enumerate() {
        let outcome = replayer.step(line);
        println!("{:>5} {:>9.1}s  {}", index + 1, line.at_secs, outcome);
    }

    let snapshot = replayer.gate().suppressor().metrics().snapshot();
    println!();
    println!("checked:         {}", snapshot.total_checked());
    println!("allowed:         {}", snapshot.replies_allowed);
    println!("suppressed:      {}", snapshot.replies_suppressed);
    println!("windows expired: {}", snapshot.windows_expired);
    println!("unlocks:         {}", snapshot.unlocks);
    println!("evicted:         {}", snapshot.entries_evicted);
    println!("oracle failures: {}", snapshot.oracle_failures);
    println!("suppression rate: {:.2}%", snapshot.suppression_rate() * 100.0);
    Ok(())
}
