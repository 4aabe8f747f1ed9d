use tracing::trace;

use crate::config::{AveragingMode, DegeneratePolicy};
use crate::consts::SELF_CORRELATION;
use crate::error::{CorrelationError, Result};

use super::cache::CorrelationCache;
use super::displacement::{ring_cardinality, ring_displacements};
use super::offset::OffsetCorrelationEvaluator;

/// Aggregates offset correlations at a Chebyshev radius into one value.
pub struct RadialAverager<'a> {
    evaluator: &'a OffsetCorrelationEvaluator<'a>,
    mode: AveragingMode,
    policy: DegeneratePolicy,
}

impl<'a> RadialAverager<'a> {
    pub fn new(
        evaluator: &'a OffsetCorrelationEvaluator<'a>,
        mode: AveragingMode,
        policy: DegeneratePolicy,
    ) -> Self {
        Self {
            evaluator,
            mode,
            policy,
        }
    }

    pub fn mode(&self) -> AveragingMode {
        self.mode
    }

    /// Radial correlation at `radius`.
    ///
    /// Radius 0 is 1.0 by convention unless every pixel is degenerate.
    pub fn average(&self, radius: usize, cache: &mut CorrelationCache) -> Result<f64> {
        if radius == 0 {
            return if self.evaluator.stack().fully_degenerate() {
                self.undefined(radius)
            } else {
                Ok(SELF_CORRELATION)
            };
        }

        match self.mode {
            AveragingMode::Ring => self.ring_average(radius, cache),
            AveragingMode::Disk => self.disk_average(radius, cache),
        }
    }

    /// Mean over the boundary of the (2r+1) x (2r+1) square.
    fn ring_average(&self, radius: usize, cache: &mut CorrelationCache) -> Result<f64> {
        // Every displacement of this ring leaves the frame.
        if radius >= self.extent() {
            return self.undefined(radius);
        }

        let mut sum = 0.0;
        let mut defined = 0usize;

        for displacement in ring_displacements(radius) {
            match self.evaluator.evaluate(displacement, cache) {
                Ok(value) => {
                    sum += value;
                    defined += 1;
                }
                Err(CorrelationError::DegenerateWindow { .. }) => {
                    if self.policy == DegeneratePolicy::PassThrough {
                        sum += f64::NAN;
                    }
                }
                Err(e) => return Err(e),
            }
        }

        trace!(radius, defined, "Ring evaluated");

        match self.policy {
            DegeneratePolicy::PassThrough => Ok(sum / ring_cardinality(radius) as f64),
            DegeneratePolicy::Exclude if defined == 0 => self.undefined(radius),
            DegeneratePolicy::Exclude => Ok(sum / defined as f64),
        }
    }

    /// Largest frame dimension; rings at or beyond it have no overlap.
    fn extent(&self) -> usize {
        let stack = self.evaluator.stack();
        stack.height().max(stack.width())
    }

    /// Value of a radius with no defined displacement under the current policy.
    fn undefined(&self, radius: usize) -> Result<f64> {
        match self.policy {
            DegeneratePolicy::PassThrough => Ok(f64::NAN),
            DegeneratePolicy::Exclude => Err(CorrelationError::DegenerateRadius { radius }),
        }
    }

    /// Mean of the ring averages for radii `1..=radius`, each normalized by
    /// its own boundary size. Undefined rings are skipped under `Exclude`.
    fn disk_average(&self, radius: usize, cache: &mut CorrelationCache) -> Result<f64> {
        let reachable = radius.min(self.extent().saturating_sub(1));
        if reachable < radius && self.policy == DegeneratePolicy::PassThrough {
            return Ok(f64::NAN);
        }

        let mut sum = 0.0;
        let mut defined = 0usize;

        for r in 1..=reachable {
            match self.ring_average(r, cache) {
                Ok(value) => {
                    sum += value;
                    defined += 1;
                }
                Err(CorrelationError::DegenerateRadius { .. }) => {}
                Err(e) => return Err(e),
            }
        }

        match self.policy {
            DegeneratePolicy::PassThrough => Ok(sum / radius as f64),
            DegeneratePolicy::Exclude if defined == 0 => self.undefined(radius),
            DegeneratePolicy::Exclude => Ok(sum / defined as f64),
        }
    }
}
