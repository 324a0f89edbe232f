//! Weighted reputation scoring.
//!
//! score = 100 * (w_success * success_ratio
//!              + w_accuracy * accuracy / 100
//!              + w_speed * 1 / (1 + avg_ms / half_life_ms)
//!              + w_peer * peer_score / 100) / (sum of weights)
//!
//! rounded and clamped to `[0, 100]`.  Every term is non-decreasing in its
//! input and the weights are validated non-negative, so the score never
//! drops when an agent gets better at anything.

use serde::{Deserialize, Serialize};

use chainsec_contracts::error::{ChainSecError, ChainSecResult};

use crate::record::ReputationRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReputationWeights {
    pub success: f64,
    pub accuracy: f64,
    pub speed: f64,
    pub peer: f64,

    /// Average response time at which the speed term is worth half its weight.
    pub speed_half_life_ms: f64,
}

impl Default for ReputationWeights {
    fn default() -> Self {
        Self {
            success: 45.0,
            accuracy: 30.0,
            speed: 15.0,
            peer: 10.0,
            speed_half_life_ms: 1000.0,
        }
    }
}

impl ReputationWeights {
    /// Reject weights that would break monotonicity or divide by zero.
    pub fn validate(&self) -> ChainSecResult<()> {
        let named = [
            ("success", self.success),
            ("accuracy", self.accuracy),
            ("speed", self.speed),
            ("peer", self.peer),
        ];
        for (name, weight) in named {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ChainSecError::ConfigError {
                    reason: format!("reputation weight '{name}' must be a non-negative number, got {weight}"),
                });
            }
        }
        if self.total() <= 0.0 {
            return Err(ChainSecError::ConfigError {
                reason: "at least one reputation weight must be positive".to_string(),
            });
        }
        if !self.speed_half_life_ms.is_finite() || self.speed_half_life_ms <= 0.0 {
            return Err(ChainSecError::ConfigError {
                reason: format!(
                    "speed_half_life_ms must be positive, got {}",
                    self.speed_half_life_ms
                ),
            });
        }
        Ok(())
    }

    fn total(&self) -> f64 {
        self.success + self.accuracy + self.speed + self.peer
    }

    /// Derive the `[0, 100]` score of `record`.  Zero for an agent with no tasks.
    pub fn score(&self, record: &ReputationRecord) -> u8 {
        if record.total_tasks == 0 {
            return 0;
        }

        let speed = speed_term(record.avg_response_time_ms, self.speed_half_life_ms);
        let weighted = self.success * record.success_ratio()
            + self.accuracy * record.validation_accuracy / 100.0
            + self.speed * speed
            + self.peer * record.peer_score / 100.0;

        let normalized = 100.0 * weighted / self.total();
        if normalized.is_nan() {
            return 0;
        }
        normalized.round().clamp(0.0, 100.0) as u8
    }
}

/// `1 / (1 + ms / half_life)`.  A non-finite average is the slowest possible.
fn speed_term(avg_ms: f64, half_life_ms: f64) -> f64 {
    if !avg_ms.is_finite() {
        return 0.0;
    }
    1.0 / (1.0 + avg_ms.max(0.0) / half_life_ms)
}

#[cfg(test)]
mod tests {
    use chainsec_contracts::agent::AgentId;

    use super::*;
    use crate::record::TaskOutcome;

    fn record_after(outcomes: &[TaskOutcome]) -> ReputationRecord {
        let mut record = ReputationRecord::new(AgentId::new("agent-a"));
        for outcome in outcomes {
            record.fold(outcome);
        }
        record
    }

    #[test]
    fn no_history_scores_zero() {
        let weights = ReputationWeights::default();
        assert_eq!(weights.score(&ReputationRecord::new(AgentId::new("fresh"))), 0);
    }

    #[test]
    fn perfect_fast_agent_scores_near_ninety_without_reviews() {
        let weights = ReputationWeights::default();
        let record = record_after(&[TaskOutcome::new(true, 0.0, 100.0)]);
        assert_eq!(weights.score(&record), 90);

        let reviewed = record_after(&[TaskOutcome::new(true, 0.0, 100.0).with_peer_rating(100.0)]);
        assert_eq!(weights.score(&reviewed), 100);
    }

    #[test]
    fn speed_term_halves_at_half_life() {
        let weights = ReputationWeights {
            success: 0.0,
            accuracy: 0.0,
            speed: 1.0,
            peer: 0.0,
            speed_half_life_ms: 200.0,
        };
        let record = record_after(&[TaskOutcome::new(false, 200.0, 0.0)]);
        assert_eq!(weights.score(&record), 50);
    }

    #[test]
    fn score_is_monotonic_in_each_input() {
        let weights = ReputationWeights::default();
        let base = TaskOutcome::new(true, 500.0, 60.0).with_peer_rating(40.0);
        let base_score = weights.score(&record_after(&[base, TaskOutcome::new(false, 500.0, 60.0)]));

        let more_success =
            weights.score(&record_after(&[base, TaskOutcome::new(true, 500.0, 60.0)]));
        let more_accuracy =
            weights.score(&record_after(&[base, TaskOutcome::new(false, 500.0, 90.0)]));
        let faster = weights.score(&record_after(&[base, TaskOutcome::new(false, 50.0, 60.0)]));
        let better_peer = weights.score(&record_after(&[
            base,
            TaskOutcome::new(false, 500.0, 60.0).with_peer_rating(95.0),
        ]));

        assert!(more_success >= base_score);
        assert!(more_accuracy >= base_score);
        assert!(faster >= base_score);
        assert!(better_peer >= base_score);
    }

    #[test]
    fn infinite_response_time_never_outscores_a_finite_one() {
        let weights = ReputationWeights::default();
        let slow = weights.score(&record_after(&[
            TaskOutcome::new(true, f64::INFINITY, 100.0),
            TaskOutcome::new(true, 5000.0, 100.0),
        ]));
        let steady = weights.score(&record_after(&[
            TaskOutcome::new(true, 5000.0, 100.0),
            TaskOutcome::new(true, 5000.0, 100.0),
        ]));
        assert!(slow <= steady, "slow={slow} steady={steady}");
    }

    #[test]
    fn non_finite_average_scores_no_speed() {
        let weights = ReputationWeights {
            success: 0.0,
            accuracy: 0.0,
            speed: 1.0,
            peer: 0.0,
            speed_half_life_ms: 1000.0,
        };
        let mut record = record_after(&[TaskOutcome::new(true, 10.0, 0.0)]);
        record.avg_response_time_ms = f64::NAN;
        assert_eq!(weights.score(&record), 0);
        record.avg_response_time_ms = f64::INFINITY;
        assert_eq!(weights.score(&record), 0);
    }

    #[test]
    fn negative_weight_is_rejected() {
        let weights = ReputationWeights {
            peer: -1.0,
            ..ReputationWeights::default()
        };
        match weights.validate() {
            Err(ChainSecError::ConfigError { reason }) => assert!(reason.contains("peer")),
            other => panic!("expected ConfigError, got {other:?}"),
        }
    }

    #[test]
    fn all_zero_weights_are_rejected() {
        let weights = ReputationWeights {
            success: 0.0,
            accuracy: 0.0,
            speed: 0.0,
            peer: 0.0,
            speed_half_life_ms: 1000.0,
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn non_positive_half_life_is_rejected() {
        let weights = ReputationWeights {
            speed_half_life_ms: 0.0,
            ..ReputationWeights::default()
        };
        assert!(weights.validate().is_err());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let weights: ReputationWeights = toml::from_str("peer = 0.0\nsuccess = 55.0").unwrap();
        assert_eq!(weights.success, 55.0);
        assert_eq!(weights.peer, 0.0);
        assert_eq!(weights.accuracy, 30.0);
        assert!(weights.validate().is_ok());
    }
}
