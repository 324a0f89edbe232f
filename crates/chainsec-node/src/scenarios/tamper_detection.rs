//! Scenario: Tamper Detection
//!
//! Shows both layers of tamper evidence:
//!
//!   1. A transaction whose data is altered after signing fails the
//!      cryptographic stage and never reaches the chain.
//!   2. A ledger snapshot whose stored transaction is edited no longer
//!      verifies, and loading it is refused.

use serde_json::json;

use chainsec_contracts::error::{ChainSecError, ChainSecResult};
use chainsec_ledger::Ledger;
use chainsec_reputation::TaskOutcome;

use crate::{config::NodeConfig, identity::AgentIdentity, node::ChainSecNode};

pub fn run_scenario() -> ChainSecResult<()> {
    println!("=== Scenario: Tamper Detection ===");
    println!();

    let node = ChainSecNode::with_default_rules(&NodeConfig::default())?;
    let agent = AgentIdentity::generate("ledger-writer");
    for _ in 0..5 {
        node.reputation()
            .update(agent.agent_id(), TaskOutcome::new(true, 50.0, 100.0))?;
    }

    // ── Part 1: altered in flight ─────────────────────────────────────────────

    let mut forged = node.builder().build_and_sign(
        &agent,
        "Network",
        json!({ "task": "transfer report", "result": { "amount": 10 } }),
    )?;
    forged.data = json!({ "task": "transfer report", "result": { "amount": 10_000 } });
    node.ledger().submit(forged)?;
    node.validator().process_pending()?;

    println!("  Part 1: data altered after signing");
    for rejection in node.validator().rejections()? {
        println!("    REJECTED: {}", rejection.errors.join(", "));
    }
    println!();

    // ── Part 2: altered at rest ───────────────────────────────────────────────

    node.builder()
        .record_task(&agent, "transfer report", json!({ "amount": 10 }))?;
    let summary = node.validator().process_pending()?;
    println!(
        "  Part 2: {} transaction(s) finalized, chain {}",
        summary.accepted.len(),
        if node.ledger().verify_chain() { "VERIFIED" } else { "FAILED" }
    );

    let mut snapshot = node.ledger().snapshot()?;
    if let Some(tx) = snapshot
        .blocks
        .iter_mut()
        .flat_map(|b| b.transactions.iter_mut())
        .next()
    {
        tx.data = json!({ "task": "transfer report", "result": { "amount": 10_000 } });
    }

    match Ledger::from_snapshot(snapshot) {
        Err(ChainSecError::BrokenChain { reason }) => {
            println!("    Edited snapshot REFUSED: {reason}");
        }
        Err(e) => return Err(e),
        Ok(ledger) => {
            println!(
                "    Edited snapshot loaded (chain {})",
                if ledger.verify_chain() { "VERIFIED" } else { "FAILED" }
            );
        }
    }
    println!();
    println!("  Scenario complete.");
    println!();

    Ok(())
}
