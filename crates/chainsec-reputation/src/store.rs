//! Concurrent reputation store.
//!
//! The agent map sits behind an `RwLock`; each record has its own `Mutex`.
//! Updates for one agent serialize on that agent's mutex while updates for
//! different agents proceed in parallel.  The map's write lock is only taken
//! the first time an agent is seen.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
};

use tracing::debug;

use chainsec_contracts::{
    agent::AgentId,
    error::{ChainSecError, ChainSecResult},
};
use chainsec_core::traits::ReputationView;

use crate::{
    record::{ReputationRecord, ReputationSnapshot, TaskOutcome},
    score::ReputationWeights,
};

type RecordHandle = Arc<Mutex<ReputationRecord>>;

pub struct ReputationStore {
    weights: ReputationWeights,
    agents: RwLock<HashMap<AgentId, RecordHandle>>,
}

impl ReputationStore {
    /// A store using the default weights.
    pub fn new() -> Self {
        Self {
            weights: ReputationWeights::default(),
            agents: RwLock::new(HashMap::new()),
        }
    }

    /// A store using `weights`, which must pass `ReputationWeights::validate`.
    pub fn with_weights(weights: ReputationWeights) -> ChainSecResult<Self> {
        weights.validate()?;
        Ok(Self {
            weights,
            agents: RwLock::new(HashMap::new()),
        })
    }

    pub fn weights(&self) -> &ReputationWeights {
        &self.weights
    }

    fn poisoned<E: std::fmt::Display>(resource: &str, e: E) -> ChainSecError {
        ChainSecError::LockPoisoned {
            resource: format!("{resource}: {e}"),
        }
    }

    fn lookup(&self, agent_id: &AgentId) -> ChainSecResult<Option<RecordHandle>> {
        let agents = self
            .agents
            .read()
            .map_err(|e| Self::poisoned("reputation map", e))?;
        Ok(agents.get(agent_id).cloned())
    }

    fn lookup_or_insert(&self, agent_id: &AgentId) -> ChainSecResult<RecordHandle> {
        if let Some(handle) = self.lookup(agent_id)? {
            return Ok(handle);
        }
        let mut agents = self
            .agents
            .write()
            .map_err(|e| Self::poisoned("reputation map", e))?;
        let handle = agents
            .entry(agent_id.clone())
            .or_insert_with(|| Arc::new(Mutex::new(ReputationRecord::new(agent_id.clone()))));
        Ok(Arc::clone(handle))
    }

    /// Fold one task outcome into `agent_id`'s record, creating it if needed.
    ///
    /// Returns the agent's score after the update.
    pub fn update(&self, agent_id: &AgentId, outcome: TaskOutcome) -> ChainSecResult<u8> {
        let handle = self.lookup_or_insert(agent_id)?;
        let mut record = handle
            .lock()
            .map_err(|e| Self::poisoned("reputation record", e))?;
        record.fold(&outcome);
        let score = self.weights.score(&record);

        debug!(
            agent_id = %agent_id,
            success = outcome.success,
            total_tasks = record.total_tasks,
            score,
            "reputation updated"
        );
        Ok(score)
    }

    /// Current record and score for `agent_id`.
    ///
    /// An unseen agent yields an all-zero record and is not inserted.
    pub fn get_reputation(&self, agent_id: &AgentId) -> ChainSecResult<ReputationSnapshot> {
        let record = match self.lookup(agent_id)? {
            Some(handle) => handle
                .lock()
                .map_err(|e| Self::poisoned("reputation record", e))?
                .clone(),
            None => ReputationRecord::new(agent_id.clone()),
        };
        let score = self.weights.score(&record);
        Ok(ReputationSnapshot { record, score })
    }

    /// Every agent with at least one recorded outcome, sorted by id.
    pub fn agents(&self) -> ChainSecResult<Vec<AgentId>> {
        let agents = self
            .agents
            .read()
            .map_err(|e| Self::poisoned("reputation map", e))?;
        let mut ids: Vec<AgentId> = agents.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }
}

impl Default for ReputationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ReputationView for ReputationStore {
    fn score(&self, agent_id: &AgentId) -> ChainSecResult<u8> {
        Ok(self.get_reputation(agent_id)?.score)
    }
}
