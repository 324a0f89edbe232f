//! Per-agent reputation counters.
//!
//! A `ReputationRecord` only stores raw history.  The score is derived on
//! read from the record and a set of `ReputationWeights`, so changing the
//! weights never requires rewriting stored records.

use serde::{Deserialize, Serialize};

use chainsec_contracts::agent::AgentId;

/// Longest response time folded into an average.  Longer, infinite or NaN
/// measurements count as this value.
pub const MAX_RESPONSE_TIME_MS: f64 = 3_600_000.0;

/// One observed task outcome, folded into a record by `ReputationStore::update`.
///
/// `validation_score` and `peer_rating` are clamped to `[0, 100]` when
/// folded; a `peer_rating` of 0 means "no review" and is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaskOutcome {
    pub success: bool,
    pub response_time_ms: f64,
    pub validation_score: f64,
    pub peer_rating: f64,
}

impl TaskOutcome {
    pub fn new(success: bool, response_time_ms: f64, validation_score: f64) -> Self {
        Self {
            success,
            response_time_ms,
            validation_score,
            peer_rating: 0.0,
        }
    }

    pub fn with_peer_rating(mut self, peer_rating: f64) -> Self {
        self.peer_rating = peer_rating;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationRecord {
    pub agent_id: AgentId,
    pub total_tasks: u64,
    pub successful_tasks: u64,

    /// Running average of validation scores, in `[0, 100]`.
    pub validation_accuracy: f64,

    /// Running average of response times, in `[0, MAX_RESPONSE_TIME_MS]`.
    pub avg_response_time_ms: f64,

    pub peer_reviews: u64,

    /// Running average of non-zero peer ratings, in `[0, 100]`.
    pub peer_score: f64,
}

impl ReputationRecord {
    /// An all-zero record for an agent with no history.
    pub fn new(agent_id: AgentId) -> Self {
        Self {
            agent_id,
            total_tasks: 0,
            successful_tasks: 0,
            validation_accuracy: 0.0,
            avg_response_time_ms: 0.0,
            peer_reviews: 0,
            peer_score: 0.0,
        }
    }

    pub fn success_ratio(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        self.successful_tasks as f64 / self.total_tasks as f64
    }

    pub(crate) fn fold(&mut self, outcome: &TaskOutcome) {
        self.total_tasks += 1;
        if outcome.success {
            self.successful_tasks += 1;
        }

        let n = self.total_tasks as f64;
        let score = clamp_percent(outcome.validation_score);
        self.validation_accuracy += (score - self.validation_accuracy) / n;

        let elapsed = clamp_response_time(outcome.response_time_ms);
        self.avg_response_time_ms += (elapsed - self.avg_response_time_ms) / n;

        let rating = clamp_percent(outcome.peer_rating);
        if rating > 0.0 {
            self.peer_reviews += 1;
            self.peer_score += (rating - self.peer_score) / self.peer_reviews as f64;
        }
    }
}

/// A record together with its derived score, as returned to callers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReputationSnapshot {
    pub record: ReputationRecord,
    pub score: u8,
}

fn sanitize(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value
    }
}

fn clamp_percent(value: f64) -> f64 {
    sanitize(value).clamp(0.0, 100.0)
}

fn clamp_response_time(value: f64) -> f64 {
    if value.is_nan() {
        MAX_RESPONSE_TIME_MS
    } else {
        value.clamp(0.0, MAX_RESPONSE_TIME_MS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> ReputationRecord {
        ReputationRecord::new(AgentId::new("agent-a"))
    }

    #[test]
    fn running_averages_track_the_mean() {
        let mut r = record();
        r.fold(&TaskOutcome::new(true, 100.0, 100.0));
        r.fold(&TaskOutcome::new(false, 300.0, 0.0));

        assert_eq!(r.total_tasks, 2);
        assert_eq!(r.successful_tasks, 1);
        assert!((r.validation_accuracy - 50.0).abs() < 1e-9);
        assert!((r.avg_response_time_ms - 200.0).abs() < 1e-9);
        assert!((r.success_ratio() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn out_of_range_inputs_are_clamped() {
        let mut r = record();
        r.fold(&TaskOutcome::new(true, -50.0, 250.0).with_peer_rating(400.0));

        assert_eq!(r.validation_accuracy, 100.0);
        assert_eq!(r.avg_response_time_ms, 0.0);
        assert_eq!(r.peer_score, 100.0);
    }

    #[test]
    fn zero_peer_rating_is_not_a_review() {
        let mut r = record();
        r.fold(&TaskOutcome::new(true, 10.0, 100.0).with_peer_rating(80.0));
        r.fold(&TaskOutcome::new(true, 10.0, 100.0));

        assert_eq!(r.peer_reviews, 1);
        assert_eq!(r.peer_score, 80.0);
    }

    #[test]
    fn nan_inputs_count_as_zero() {
        let mut r = record();
        r.fold(&TaskOutcome::new(true, 10.0, f64::NAN).with_peer_rating(f64::NAN));

        assert_eq!(r.total_tasks, 1);
        assert_eq!(r.validation_accuracy, 0.0);
        assert_eq!(r.peer_reviews, 0);
    }

    #[test]
    fn unmeasurable_response_times_count_as_slowest() {
        for elapsed in [f64::INFINITY, f64::NAN, 1e300] {
            let mut r = record();
            r.fold(&TaskOutcome::new(true, elapsed, 100.0));
            assert_eq!(r.avg_response_time_ms, MAX_RESPONSE_TIME_MS);

            r.fold(&TaskOutcome::new(true, 5000.0, 100.0));
            assert!(r.avg_response_time_ms.is_finite());
            assert!(r.avg_response_time_ms > 5000.0);
        }
    }
}
