use serde::{Deserialize, Serialize};

use crate::consts::DEFAULT_RADII;
use crate::error::{CorrelationError, Result};

/// How offset correlations at a radius are aggregated into one value.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AveragingMode {
    /// Mean over the square ring at exact Chebyshev distance `r`.
    #[default]
    Ring,
    /// Mean of the ring averages for every radius `1..=r`. Approximates a
    /// filled-neighborhood mean; not comparable with `Ring`.
    Disk,
}

impl std::fmt::Display for AveragingMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ring => write!(f, "ring"),
            Self::Disk => write!(f, "disk"),
        }
    }
}

/// What to do with displacements whose window has no valid pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DegeneratePolicy {
    /// Leave the displacement out of its ring. A ring with no defined
    /// displacement is reported as undefined.
    #[default]
    Exclude,
    /// Let the undefined value flow into the ring average as NaN, dividing by
    /// the full boundary cardinality.
    PassThrough,
}

impl std::fmt::Display for DegeneratePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Exclude => write!(f, "Exclude"),
            Self::PassThrough => write!(f, "Pass Through"),
        }
    }
}

/// Options recognized by the correlation pipeline.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Chebyshev radii to sample.
    pub radii: Vec<usize>,
    pub mode: AveragingMode,
    /// Scale centered values to unit variance (correlation) instead of only
    /// centering them (covariance).
    pub normalize_variance: bool,
    /// Pixels with stddev at or below this are treated as degenerate.
    pub degenerate_threshold: f64,
    pub degenerate_policy: DegeneratePolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            radii: DEFAULT_RADII.to_vec(),
            mode: AveragingMode::Ring,
            normalize_variance: true,
            degenerate_threshold: 0.0,
            degenerate_policy: DegeneratePolicy::Exclude,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.degenerate_threshold.is_finite() || self.degenerate_threshold < 0.0 {
            return Err(CorrelationError::InvalidConfig(format!(
                "degenerate_threshold must be a finite value >= 0, got {}",
                self.degenerate_threshold
            )));
        }
        Ok(())
    }

    /// Requested radii as an ascending set without duplicates.
    pub fn sorted_radii(&self) -> Vec<usize> {
        let mut radii = self.radii.clone();
        radii.sort_unstable();
        radii.dedup();
        radii
    }
}
