//! Scenario: Replay Protection
//!
//!   1. An agent's transaction is finalized.
//!   2. The identical signed transaction is resubmitted → refused with a
//!      duplicate nonce, before any validation runs.
//!   3. The ledger is saved and reloaded; the replay is still refused.

use serde_json::json;

use chainsec_contracts::error::{ChainSecError, ChainSecResult};
use chainsec_ledger::Ledger;
use chainsec_reputation::TaskOutcome;

use crate::{config::NodeConfig, identity::AgentIdentity, node::ChainSecNode};

fn describe(result: ChainSecResult<String>) -> ChainSecResult<String> {
    match result {
        Ok(tx_id) => Ok(format!("ACCEPTED into pool as {}", &tx_id[..12])),
        Err(ChainSecError::DuplicateNonce { sender, nonce }) => {
            Ok(format!("REFUSED: nonce {nonce} already used by '{sender}'"))
        }
        Err(e) => Err(e),
    }
}

pub fn run_scenario() -> ChainSecResult<()> {
    println!("=== Scenario: Replay Protection ===");
    println!();

    let node = ChainSecNode::with_default_rules(&NodeConfig::default())?;
    let agent = AgentIdentity::generate("payments-agent");
    for _ in 0..5 {
        node.reputation()
            .update(agent.agent_id(), TaskOutcome::new(true, 50.0, 100.0))?;
    }

    let original = node.builder().build_and_sign(
        &agent,
        "Network",
        json!({ "task": "settle invoice", "result": { "invoice": 1042 } }),
    )?;

    println!("  Submit original:    {}", describe(node.ledger().submit(original.clone()))?);
    println!("  Replay while pending: {}", describe(node.ledger().submit(original.clone()))?);

    let summary = node.validator().process_pending()?;
    println!("  Finalized:          {} transaction(s)", summary.accepted.len());
    println!("  Replay after block: {}", describe(node.ledger().submit(original.clone()))?);

    let saved = Ledger::from_snapshot(node.ledger().snapshot()?)?;
    println!("  Replay after reload: {}", describe(saved.submit(original))?);

    let fresh = node
        .builder()
        .record_task(&agent, "settle invoice", json!({ "invoice": 1042 }))?;
    println!("  Fresh nonce, same data: ACCEPTED into pool as {}", &fresh[..12]);
    println!();
    println!("  Scenario complete.");
    println!();

    Ok(())
}
