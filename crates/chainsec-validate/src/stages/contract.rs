//! Contract stage: delegate to a `ContractRuleChecker` under a deadline.
//!
//! Checks run on a fixed pool of worker threads fed over an `mpsc` channel,
//! and the stage waits for each answer with `recv_timeout`.  `false`, an
//! error, a panicking checker and an expired deadline are all the same hard
//! failure.  A worker stuck in a hung checker keeps its slot; once every
//! in-flight slot is taken the stage fails fast instead of queueing more.

use std::{
    panic::{self, AssertUnwindSafe},
    sync::{
        atomic::{AtomicUsize, Ordering},
        mpsc, Arc, Mutex,
    },
    thread,
    time::Duration,
};

use tracing::{debug, error, warn};

use chainsec_contracts::{
    error::{ChainSecError, ChainSecResult},
    report::StageOutcome,
    transaction::Transaction,
};
use chainsec_core::traits::{ContractRuleChecker, ValidationStage};

use super::CONTRACT_FAILED;

/// Checks allowed to wait in the queue for each worker.
const QUEUED_PER_WORKER: usize = 2;

struct CheckJob {
    tx: Transaction,
    reply: mpsc::Sender<ChainSecResult<bool>>,
}

/// Frees an in-flight slot when the job finishes, even on panic.
struct SlotGuard(Arc<AtomicUsize>);

impl Drop for SlotGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

pub struct ContractStage {
    jobs: Mutex<mpsc::Sender<CheckJob>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: usize,
    timeout: Duration,
}

impl ContractStage {
    /// Start `workers` checker threads.  Fails if `workers` is zero or a
    /// thread cannot be spawned.
    pub fn new(
        checker: Arc<dyn ContractRuleChecker>,
        timeout: Duration,
        workers: usize,
    ) -> ChainSecResult<Self> {
        if workers == 0 {
            return Err(ChainSecError::ConfigError {
                reason: "contract stage needs at least one worker".to_string(),
            });
        }

        let (sender, receiver) = mpsc::channel::<CheckJob>();
        let receiver = Arc::new(Mutex::new(receiver));
        let in_flight = Arc::new(AtomicUsize::new(0));

        for index in 0..workers {
            let receiver = Arc::clone(&receiver);
            let checker = Arc::clone(&checker);
            let in_flight = Arc::clone(&in_flight);
            thread::Builder::new()
                .name(format!("contract-check-{index}"))
                .spawn(move || worker_loop(&receiver, checker.as_ref(), &in_flight))
                .map_err(|e| ChainSecError::ContractCheck {
                    reason: format!("failed to spawn contract checker: {e}"),
                })?;
        }

        Ok(Self {
            jobs: Mutex::new(sender),
            in_flight,
            max_in_flight: workers * (1 + QUEUED_PER_WORKER),
            timeout,
        })
    }

    /// Checks dispatched and not yet finished, including abandoned ones.
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::SeqCst)
    }

    fn reserve_slot(&self) -> bool {
        self.in_flight
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| {
                (n < self.max_in_flight).then_some(n + 1)
            })
            .is_ok()
    }

    fn run_checker(&self, tx: &Transaction) -> ChainSecResult<bool> {
        if !self.reserve_slot() {
            return Err(ChainSecError::ContractCheck {
                reason: format!("all {} contract check slots are busy", self.max_in_flight),
            });
        }

        let (reply, answer) = mpsc::channel();
        let job = CheckJob {
            tx: tx.clone(),
            reply,
        };
        let sent = match self.jobs.lock() {
            Ok(jobs) => jobs.send(job).is_ok(),
            Err(_) => false,
        };
        if !sent {
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            return Err(ChainSecError::ContractCheck {
                reason: "contract checker pool is gone".to_string(),
            });
        }

        match answer.recv_timeout(self.timeout) {
            Ok(result) => result,
            Err(mpsc::RecvTimeoutError::Timeout) => Err(ChainSecError::ContractTimeout {
                timeout_ms: self.timeout.as_millis() as u64,
            }),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(ChainSecError::ContractCheck {
                reason: "contract checker exited without answering".to_string(),
            }),
        }
    }
}

fn worker_loop(
    receiver: &Mutex<mpsc::Receiver<CheckJob>>,
    checker: &dyn ContractRuleChecker,
    in_flight: &Arc<AtomicUsize>,
) {
    loop {
        let next = match receiver.lock() {
            Ok(jobs) => jobs.recv(),
            Err(_) => {
                error!("contract job queue lock poisoned; worker exiting");
                return;
            }
        };
        // Sender dropped with the stage.
        let Ok(job) = next else { return };

        let _slot = SlotGuard(Arc::clone(in_flight));
        let result = panic::catch_unwind(AssertUnwindSafe(|| checker.check(&job.tx)))
            .unwrap_or_else(|_| {
                Err(ChainSecError::ContractCheck {
                    reason: "contract checker panicked".to_string(),
                })
            });
        // The stage may have stopped waiting.
        let _ = job.reply.send(result);
    }
}

impl ValidationStage for ContractStage {
    fn evaluate(&self, tx: &Transaction) -> StageOutcome {
        match self.run_checker(tx) {
            Ok(true) => StageOutcome::Passed,
            Ok(false) => {
                debug!(sender = %tx.sender, receiver = %tx.receiver, "contract rules refused transaction");
                StageOutcome::rejected(CONTRACT_FAILED)
            }
            Err(e) => {
                warn!(sender = %tx.sender, nonce = tx.nonce, error = %e, "contract check failed");
                StageOutcome::rejected(CONTRACT_FAILED)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::{
        sync::Mutex,
        time::Instant,
    };

    use chainsec_contracts::{agent::AgentId, error::ChainSecResult};

    use super::*;

    fn tx() -> Transaction {
        Transaction {
            sender: AgentId::new("agent-a"),
            receiver: AgentId::new("Network"),
            data: serde_json::json!({}),
            public_key: String::new(),
            signature: vec![],
            timestamp: 1,
            nonce: 1,
            previous_hash: String::new(),
            block_hash: None,
        }
    }

    enum Behaviour {
        Answer(bool),
        Fail,
        Sleep(Duration),
        Panic,
        /// Blocks until the paired sender is dropped.
        Gate(Mutex<mpsc::Receiver<()>>),
    }

    struct MockChecker {
        behaviour: Behaviour,
        calls: Arc<Mutex<u32>>,
    }

    impl MockChecker {
        fn new(behaviour: Behaviour) -> Self {
            Self {
                behaviour,
                calls: Arc::new(Mutex::new(0)),
            }
        }
    }

    impl ContractRuleChecker for MockChecker {
        fn check(&self, _tx: &Transaction) -> ChainSecResult<bool> {
            *self.calls.lock().unwrap() += 1;
            match &self.behaviour {
                Behaviour::Answer(a) => Ok(*a),
                Behaviour::Fail => Err(ChainSecError::ContractCheck {
                    reason: "rpc unavailable".to_string(),
                }),
                Behaviour::Sleep(d) => {
                    thread::sleep(*d);
                    Ok(true)
                }
                Behaviour::Panic => panic!("checker bug"),
                Behaviour::Gate(gate) => {
                    let _ = gate.lock().unwrap().recv();
                    Ok(true)
                }
            }
        }
    }

    fn stage_with_workers(
        behaviour: Behaviour,
        timeout_ms: u64,
        workers: usize,
    ) -> (ContractStage, Arc<Mutex<u32>>) {
        let checker = MockChecker::new(behaviour);
        let calls = checker.calls.clone();
        let stage =
            ContractStage::new(Arc::new(checker), Duration::from_millis(timeout_ms), workers).unwrap();
        (stage, calls)
    }

    fn stage(behaviour: Behaviour, timeout_ms: u64) -> (ContractStage, Arc<Mutex<u32>>) {
        stage_with_workers(behaviour, timeout_ms, 2)
    }

    #[test]
    fn allow_passes() {
        let (stage, calls) = stage(Behaviour::Answer(true), 1000);
        assert_eq!(stage.evaluate(&tx()), StageOutcome::Passed);
        assert_eq!(*calls.lock().unwrap(), 1);
    }

    #[test]
    fn refusal_and_error_are_hard_failures() {
        let (refusing, _) = stage(Behaviour::Answer(false), 1000);
        assert_eq!(refusing.evaluate(&tx()), StageOutcome::rejected(CONTRACT_FAILED));

        let (failing, _) = stage(Behaviour::Fail, 1000);
        assert_eq!(failing.evaluate(&tx()), StageOutcome::rejected(CONTRACT_FAILED));
    }

    /// A checker that never answers in time fails the stage instead of hanging.
    #[test]
    fn timeout_is_a_hard_failure_not_a_hang() {
        let (slow, _) = stage(Behaviour::Sleep(Duration::from_secs(5)), 50);

        let started = Instant::now();
        let outcome = slow.evaluate(&tx());

        assert_eq!(outcome, StageOutcome::rejected(CONTRACT_FAILED));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn panicking_checker_is_a_hard_failure() {
        let (panicking, _) = stage(Behaviour::Panic, 1000);
        assert_eq!(panicking.evaluate(&tx()), StageOutcome::rejected(CONTRACT_FAILED));
    }

    /// The pool survives a panic and keeps answering.
    #[test]
    fn worker_survives_a_panicking_check() {
        let (panicking, calls) = stage_with_workers(Behaviour::Panic, 1000, 1);
        assert_eq!(panicking.evaluate(&tx()), StageOutcome::rejected(CONTRACT_FAILED));
        assert_eq!(panicking.evaluate(&tx()), StageOutcome::rejected(CONTRACT_FAILED));
        assert_eq!(*calls.lock().unwrap(), 2);
    }

    /// A hung checker occupies at most the fixed workers; further checks
    /// fail fast rather than starting new threads.
    #[test]
    fn hung_checker_does_not_grow_threads() {
        let (release, gate) = mpsc::channel::<()>();
        let (hung, calls) = stage_with_workers(Behaviour::Gate(Mutex::new(gate)), 20, 2);

        for _ in 0..50 {
            assert_eq!(hung.evaluate(&tx()), StageOutcome::rejected(CONTRACT_FAILED));
        }

        assert!(*calls.lock().unwrap() <= 2, "more checks ran than workers exist");
        assert_eq!(hung.in_flight(), 2 * (1 + QUEUED_PER_WORKER));

        drop(release);
        let deadline = Instant::now() + Duration::from_secs(5);
        while hung.in_flight() > 0 && Instant::now() < deadline {
            thread::sleep(Duration::from_millis(5));
        }
        assert_eq!(hung.in_flight(), 0);
        assert_eq!(hung.evaluate(&tx()), StageOutcome::Passed);
    }

    #[test]
    fn zero_workers_is_a_config_error() {
        let result = ContractStage::new(
            Arc::new(MockChecker::new(Behaviour::Answer(true))),
            Duration::from_millis(10),
            0,
        );
        assert!(matches!(result, Err(ChainSecError::ConfigError { .. })));
    }
}
