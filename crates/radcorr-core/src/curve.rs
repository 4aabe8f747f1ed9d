use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::{AnalysisConfig, AveragingMode};
use crate::correlation::{CorrelationCache, OffsetCorrelationEvaluator, RadialAverager};
use crate::error::{CorrelationError, Result};
use crate::progress::{CurveStage, NoOpReporter, ProgressReporter};
use crate::stack::ImageStack;
use crate::standardize::{standardize, StandardizedStack};
use crate::statistics::PixelStatistics;

/// One sample of a correlation curve. `value` is `None` when the radius had no
/// defined displacement.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct CurvePoint {
    pub radius: usize,
    pub value: Option<f64>,
}

/// Radial correlation as a function of radius, ascending by radius.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CorrelationCurve {
    /// Aggregation the values were produced with. Curves of different modes
    /// are not comparable.
    pub mode: AveragingMode,
    /// `true` for correlation (variance-normalized), `false` for covariance.
    pub normalized: bool,
    pub points: Vec<CurvePoint>,
}

impl CorrelationCurve {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn value_at(&self, radius: usize) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.radius == radius)
            .and_then(|p| p.value)
    }

    pub fn radii(&self) -> impl Iterator<Item = usize> + '_ {
        self.points.iter().map(|p| p.radius)
    }

    /// Radii whose value could not be computed.
    pub fn undefined_radii(&self) -> Vec<usize> {
        self.points
            .iter()
            .filter(|p| p.value.is_none())
            .map(|p| p.radius)
            .collect()
    }

    /// Short label naming what the values measure, e.g. `ring correlation`.
    pub fn label(&self) -> String {
        let quantity = if self.normalized {
            "correlation"
        } else {
            "covariance"
        };
        format!("{} {}", self.mode, quantity)
    }
}

/// Drives the statistics, standardization and radial averaging stages over a
/// list of radii, owning one [`CorrelationCache`] per curve.
#[derive(Clone, Debug)]
pub struct CorrelationCurveBuilder {
    config: AnalysisConfig,
}

impl CorrelationCurveBuilder {
    pub fn new(config: AnalysisConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn build(&self, stack: &ImageStack) -> Result<CorrelationCurve> {
        self.build_reported(stack, &NoOpReporter)
    }

    pub fn build_reported(
        &self,
        stack: &ImageStack,
        reporter: &dyn ProgressReporter,
    ) -> Result<CorrelationCurve> {
        let (h, w, c) = stack.image_shape();
        info!(
            images = stack.len(),
            height = h,
            width = w,
            channels = c,
            "Computing correlation curve"
        );

        reporter.begin_stage(CurveStage::Statistics, Some(stack.len()));
        let stats = PixelStatistics::compute(stack, self.config.degenerate_threshold)?;
        reporter.finish_stage();

        reporter.begin_stage(CurveStage::Standardizing, None);
        let standardized = standardize(stack, &stats, self.config.normalize_variance)?;
        reporter.finish_stage();

        self.build_standardized_reported(&standardized, reporter)
    }

    pub fn build_standardized(&self, stack: &StandardizedStack) -> Result<CorrelationCurve> {
        self.build_standardized_reported(stack, &NoOpReporter)
    }

    pub fn build_standardized_reported(
        &self,
        stack: &StandardizedStack,
        reporter: &dyn ProgressReporter,
    ) -> Result<CorrelationCurve> {
        if stack.len() < 2 {
            return Err(CorrelationError::InsufficientSamples { count: stack.len() });
        }

        let radii = self.config.sorted_radii();
        let mut cache = CorrelationCache::new();
        let evaluator = OffsetCorrelationEvaluator::new(stack);
        let averager = RadialAverager::new(
            &evaluator,
            self.config.mode,
            self.config.degenerate_policy,
        );

        reporter.begin_stage(CurveStage::Correlating, Some(radii.len()));
        let mut points = Vec::with_capacity(radii.len());
        for (i, &radius) in radii.iter().enumerate() {
            let value = match averager.average(radius, &mut cache) {
                Ok(value) => Some(value),
                Err(CorrelationError::DegenerateRadius { radius }) => {
                    warn!(radius, "Radius has no valid displacements");
                    None
                }
                Err(e) => return Err(e),
            };
            info!(radius, value = ?value, mode = %self.config.mode, "Radial correlation");
            points.push(CurvePoint { radius, value });
            reporter.advance(i + 1);
        }
        reporter.finish_stage();

        info!(
            entries = cache.len(),
            hits = cache.hits(),
            misses = cache.misses(),
            "Correlation cache released"
        );

        Ok(CorrelationCurve {
            mode: self.config.mode,
            normalized: stack.normalized,
            points,
        })
    }
}
