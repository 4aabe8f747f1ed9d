use ndarray::{Array3, Array4, Axis, Zip};
use tracing::info;

use crate::error::{CorrelationError, Result};
use crate::stack::ImageStack;
use crate::statistics::PixelStatistics;

/// An ensemble with the per-pixel mean removed (and optionally scaled to unit
/// variance), together with the mask of pixels that must be ignored downstream.
#[derive(Clone, Debug)]
pub struct StandardizedStack {
    /// Shape = (images, height, width, channels).
    pub data: Array4<f64>,
    /// `true` where the pixel is degenerate, shape = (height, width, channels).
    pub invalid: Array3<bool>,
    /// Whether values were divided by the per-pixel stddev.
    pub normalized: bool,
}

impl StandardizedStack {
    pub fn len(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn height(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn width(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    pub fn channels(&self) -> usize {
        self.data.len_of(Axis(3))
    }

    pub fn fully_degenerate(&self) -> bool {
        self.invalid.iter().all(|&d| d)
    }
}

/// Subtract the per-pixel mean from every member and, when
/// `normalize_variance` is set, divide by the per-pixel stddev.
///
/// Degenerate pixels are divided by 1 instead of 0. Their values stay in the
/// output but are excluded from every aggregate through `invalid`.
pub fn standardize(
    stack: &ImageStack,
    stats: &PixelStatistics,
    normalize_variance: bool,
) -> Result<StandardizedStack> {
    if stack.len() < 2 {
        return Err(CorrelationError::InsufficientSamples { count: stack.len() });
    }
    if stats.mean.dim() != stack.image_shape() {
        return Err(CorrelationError::ShapeMismatch {
            index: 0,
            expected: stats.mean.dim(),
            found: stack.image_shape(),
        });
    }

    let divisor = if normalize_variance {
        Zip::from(&stats.stddev)
            .and(&stats.degenerate)
            .map_collect(|&s, &degenerate| if degenerate { 1.0 } else { s })
    } else {
        Array3::from_elem(stats.stddev.dim(), 1.0)
    };

    let mut data = stack.data.clone();
    for mut image in data.axis_iter_mut(Axis(0)) {
        Zip::from(&mut image)
            .and(&stats.mean)
            .and(&divisor)
            .for_each(|v, &mean, &d| *v = (*v - mean) / d);
    }

    info!(
        images = stack.len(),
        normalized = normalize_variance,
        "Stack standardized"
    );

    Ok(StandardizedStack {
        data,
        invalid: stats.degenerate.clone(),
        normalized: normalize_variance,
    })
}
