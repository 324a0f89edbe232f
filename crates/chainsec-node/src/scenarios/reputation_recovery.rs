//! Scenario: Reputation Recovery
//!
//! A brand-new agent has no history, so its first logged task passes every
//! hard stage and is still gated by reputation.  After the task-execution
//! side reports five successful, peer-reviewed tasks, the same shape of
//! transaction finalizes.
//!
//!   1. New agent logs a task → structural, cryptographic and contract pass;
//!      reputation gate rejects (score 0)
//!   2. Five successful task executions are folded into its reputation
//!   3. Score crosses the medium threshold
//!   4. The agent logs the task again → finalized into a block

use serde_json::json;

use chainsec_contracts::error::ChainSecResult;
use chainsec_reputation::TaskOutcome;

use crate::{config::NodeConfig, identity::AgentIdentity, node::ChainSecNode};

pub fn run_scenario() -> ChainSecResult<()> {
    println!("=== Scenario: Reputation Recovery ===");
    println!();

    let node = ChainSecNode::with_default_rules(&NodeConfig::default())?;
    let agent = AgentIdentity::generate("data-processor");
    let score = |node: &ChainSecNode| -> ChainSecResult<u8> {
        Ok(node.reputation().get_reputation(agent.agent_id())?.score)
    };

    println!("  Agent:              {}", agent.agent_id());
    println!("  Initial score:      {}", score(&node)?);
    println!();

    // ── First task: gated ─────────────────────────────────────────────────────

    node.builder()
        .record_task(&agent, "Simple data processing", json!({ "rows": 3 }))?;
    node.validator().process_pending()?;

    for rejection in node.validator().rejections()? {
        println!("  Attempt 1:          REJECTED");
        for warning in &rejection.warnings {
            println!("    warning:          {warning}");
        }
    }
    println!("  Score after reject: {}", score(&node)?);
    println!();

    // ── Recovery through executed tasks ───────────────────────────────────────

    for task in 1..=5 {
        let after = node.reputation().update(
            agent.agent_id(),
            TaskOutcome::new(true, 120.0, 100.0).with_peer_rating(90.0),
        )?;
        println!("  Executed task {task}:    success, score {after}");
    }
    println!();

    // ── Second attempt: accepted ──────────────────────────────────────────────

    node.builder()
        .record_task(&agent, "Simple data processing", json!({ "rows": 3 }))?;
    let summary = node.validator().process_pending()?;

    match &summary.block {
        Some(block) => println!("  Attempt 2:          FINALIZED in block {}", block.index),
        None => println!("  Attempt 2:          REJECTED"),
    }
    println!("  Final score:        {}", score(&node)?);
    println!(
        "  Chain integrity:    {} (height {})",
        if node.ledger().verify_chain() { "VERIFIED" } else { "FAILED" },
        node.ledger().height()?
    );
    println!();
    println!("  Scenario complete.");
    println!();

    Ok(())
}
