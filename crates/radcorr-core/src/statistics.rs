use ndarray::{Array3, ArrayView3, Zip};
use tracing::info;

use crate::error::{CorrelationError, ImageShape, Result};
use crate::stack::ImageStack;

/// Per-pixel ensemble statistics of an [`ImageStack`].
#[derive(Clone, Debug)]
pub struct PixelStatistics {
    /// Per-pixel mean, shape = (height, width, channels).
    pub mean: Array3<f64>,
    /// Per-pixel sample standard deviation (divisor N-1).
    pub stddev: Array3<f64>,
    /// `true` where the pixel is constant across the ensemble.
    pub degenerate: Array3<bool>,
    /// Number of images the statistics were estimated from.
    pub samples: usize,
}

impl PixelStatistics {
    /// Estimate mean, sample stddev and the degeneracy mask of a stack.
    ///
    /// A pixel is degenerate when its stddev is `<= threshold`; with the
    /// default threshold of 0 only exactly-constant pixels are flagged.
    pub fn compute(stack: &ImageStack, threshold: f64) -> Result<Self> {
        if stack.len() < 2 {
            return Err(CorrelationError::InsufficientSamples { count: stack.len() });
        }

        let mut acc = EnsembleAccumulator::new(stack.image_shape());
        for image in stack.images() {
            acc.push(image)?;
        }
        let stats = acc.finish(threshold)?;

        info!(
            images = stats.samples,
            degenerate = stats.degenerate_count(),
            "Ensemble statistics computed"
        );
        Ok(stats)
    }

    pub fn degenerate_count(&self) -> usize {
        self.degenerate.iter().filter(|&&d| d).count()
    }

    /// `true` when every pixel of every channel is degenerate.
    pub fn fully_degenerate(&self) -> bool {
        self.degenerate.iter().all(|&d| d)
    }
}

/// Single-pass (Welford) accumulator of per-pixel mean and variance.
///
/// Members are folded in one at a time, so mean and variance come out of a
/// single pass without a separate centering sweep.
#[derive(Clone, Debug)]
pub struct EnsembleAccumulator {
    shape: ImageShape,
    count: usize,
    mean: Array3<f64>,
    m2: Array3<f64>,
}

impl EnsembleAccumulator {
    pub fn new(shape: ImageShape) -> Self {
        Self {
            shape,
            count: 0,
            mean: Array3::zeros(shape),
            m2: Array3::zeros(shape),
        }
    }

    pub fn count(&self) -> usize {
        self.count
    }

    /// Fold one more ensemble member into the running estimates.
    pub fn push(&mut self, image: ArrayView3<'_, f64>) -> Result<()> {
        if image.dim() != self.shape {
            return Err(CorrelationError::ShapeMismatch {
                index: self.count,
                expected: self.shape,
                found: image.dim(),
            });
        }

        self.count += 1;
        let n = self.count as f64;
        Zip::from(&mut self.mean)
            .and(&mut self.m2)
            .and(&image)
            .for_each(|mean, m2, &x| {
                let delta = x - *mean;
                *mean += delta / n;
                *m2 += delta * (x - *mean);
            });
        Ok(())
    }

    pub fn finish(self, threshold: f64) -> Result<PixelStatistics> {
        if self.count < 2 {
            return Err(CorrelationError::InsufficientSamples { count: self.count });
        }

        let denom = (self.count - 1) as f64;
        // Rounding can leave a tiny negative M2 on near-constant pixels.
        let stddev = self.m2.mapv(|m2| (m2.max(0.0) / denom).sqrt());
        let degenerate = stddev.mapv(|s| s <= threshold);

        Ok(PixelStatistics {
            mean: self.mean,
            stddev,
            degenerate,
            samples: self.count,
        })
    }
}
