//! Time-based confidence decay.
//!
//! Confidence drops linearly by `rate` for every whole week since a record
//! was last seen. Decay is computed on read and never written back to the
//! store, except through [`DecayEngine::rebase`] for snapshots that leave it.

use chrono::{DateTime, Duration, Utc};
use tracing::debug;

use crate::types::Instinct;

/// Default decay per week.
pub const DEFAULT_DECAY_RATE: f64 = 0.02;

/// Number of whole weeks in `elapsed`. Negative durations count as zero.
pub fn whole_weeks(elapsed: Duration) -> i64 {
    elapsed.num_weeks().max(0)
}

/// Decay `confidence` by `rate` per whole week of `elapsed`.
///
/// The result is clamped to `[0, 1]` and never exceeds the input. A
/// non-positive rate or elapsed time returns the input unchanged.
pub fn decay(confidence: f64, elapsed: Duration, rate: f64) -> f64 {
    if rate <= 0.0 || elapsed <= Duration::zero() {
        return confidence;
    }
    let weeks = whole_weeks(elapsed);
    if weeks == 0 {
        return confidence;
    }
    (confidence - weeks as f64 * rate).clamp(0.0, 1.0).min(confidence)
}

/// Applies decay to instinct records using a configured rate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecayEngine {
    rate: f64,
}

impl DecayEngine {
    /// Engine with the given rate per week.
    pub fn new(rate: f64) -> Self {
        Self { rate }
    }

    /// Configured decay per week.
    pub fn rate(&self) -> f64 {
        self.rate
    }

    fn elapsed(inst: &Instinct, now: DateTime<Utc>) -> Option<Duration> {
        inst.last_seen().map(|seen| now - seen)
    }

    /// Decayed confidence of `inst` at `now`.
    ///
    /// Records without timestamps are never decayed.
    pub fn apply(&self, inst: &Instinct, now: DateTime<Utc>) -> f64 {
        match Self::elapsed(inst, now) {
            Some(elapsed) => decay(inst.confidence, elapsed, self.rate),
            None => inst.confidence,
        }
    }

    /// Copies of `instincts` carrying decayed confidence.
    pub fn apply_all(&self, instincts: &[Instinct], now: DateTime<Utc>) -> Vec<Instinct> {
        instincts
            .iter()
            .map(|inst| {
                let confidence = self.apply(inst, now);
                if confidence != inst.confidence {
                    debug!(id = %inst.id, from = inst.confidence, to = confidence, "Decayed instinct");
                }
                Instinct {
                    confidence,
                    ..inst.clone()
                }
            })
            .collect()
    }

    /// Decayed copy whose last-seen timestamp is advanced by the whole weeks
    /// consumed.
    ///
    /// Decaying the result again at the same `now` is a no-op.
    pub fn rebase(&self, inst: &Instinct, now: DateTime<Utc>) -> Instinct {
        let mut out = inst.clone();
        if self.rate <= 0.0 {
            return out;
        }
        let (Some(seen), Some(elapsed)) = (inst.last_seen(), Self::elapsed(inst, now)) else {
            return out;
        };
        let weeks = whole_weeks(elapsed);
        if weeks == 0 {
            return out;
        }

        out.confidence = decay(inst.confidence, elapsed, self.rate);
        out.updated_at = Some(seen + Duration::weeks(weeks));
        out
    }

    /// Rebased copies of `instincts`.
    pub fn rebase_all(&self, instincts: &[Instinct], now: DateTime<Utc>) -> Vec<Instinct> {
        instincts.iter().map(|inst| self.rebase(inst, now)).collect()
    }
}

impl Default for DecayEngine {
    fn default() -> Self {
        Self::new(DEFAULT_DECAY_RATE)
    }
}
