//! ChainSec Demo CLI
//!
//! Runs one or all of the end-to-end scenarios.  Each scenario wires a real
//! ledger, reputation store, contract rules and validator together.
//!
//! Usage:
//!   cargo run -p demo -- run-all
//!   cargo run -p demo -- reputation-recovery
//!   cargo run -p demo -- tamper-detection
//!   cargo run -p demo -- replay-protection

use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chainsec_contracts::error::ChainSecResult;
use chainsec_node::scenarios::{replay_protection, reputation_recovery, tamper_detection};

// ── CLI definition ────────────────────────────────────────────────────────────

/// ChainSec: signed agent transactions on a reputation-gated ledger.
#[derive(Parser)]
#[command(
    name = "demo",
    about = "ChainSec agent ledger demo",
    long_about = "Runs ChainSec scenarios showing signature checks, contract rules,\n\
                  reputation gating, replay protection, and hash-chain integrity."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Run every scenario in sequence.
    RunAll,
    /// A new agent is gated by reputation, then recovers.
    ReputationRecovery,
    /// Altered transactions and an edited ledger file are caught.
    TamperDetection,
    /// Resubmitted transactions are refused, even after a reload.
    ReplayProtection,
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn main() {
    // RUST_LOG=debug shows every pipeline stage.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .compact()
        .init();

    let cli = Cli::parse();

    print_banner();

    let result = match cli.command {
        Command::RunAll => run_all(),
        Command::ReputationRecovery => reputation_recovery::run_scenario(),
        Command::TamperDetection => tamper_detection::run_scenario(),
        Command::ReplayProtection => replay_protection::run_scenario(),
    };

    match result {
        Ok(()) => {
            info!("demo finished");
            println!("All selected scenarios completed successfully.");
        }
        Err(e) => {
            eprintln!("Demo error: {e}");
            std::process::exit(1);
        }
    }
}

fn run_all() -> ChainSecResult<()> {
    reputation_recovery::run_scenario()?;
    tamper_detection::run_scenario()?;
    replay_protection::run_scenario()?;
    Ok(())
}

// ── Banner ────────────────────────────────────────────────────────────────────

fn print_banner() {
    println!();
    println!("ChainSec: Reputation-Gated Agent Ledger");
    println!("=======================================");
    println!();
    println!("Validation pipeline per transaction:");
    println!("  [1] Structural     required fields present         (hard)");
    println!("  [2] Cryptographic  Ed25519 signature over hash(data) (hard)");
    println!("  [3] Contract       deny-by-default rule check      (hard, timed)");
    println!("  [4] Consensus      sender built on the local tip   (advisory)");
    println!("  [5] Reputation     score gate, 50 / 70             (last)");
    println!();
}
