use ndarray::{Array3, ArrayView3, Zip};
use serde::{Deserialize, Serialize};

use crate::consts::MAPE_EPSILON;
use crate::error::{CorrelationError, Result};
use crate::stack::ImageStack;

/// Root-mean-square error of `image` against `reference`.
pub fn rmse(reference: ArrayView3<'_, f64>, image: ArrayView3<'_, f64>) -> Result<f64> {
    check_same_shape(reference, image)?;
    let sum_sq = Zip::from(&reference)
        .and(&image)
        .fold(0.0, |acc, &r, &v| acc + (r - v) * (r - v));
    Ok((sum_sq / reference.len() as f64).sqrt())
}

/// Mean absolute percentage error of `image` against `reference`.
///
/// The denominator is offset by [`MAPE_EPSILON`] so black reference pixels
/// stay finite.
pub fn mape(reference: ArrayView3<'_, f64>, image: ArrayView3<'_, f64>) -> Result<f64> {
    check_same_shape(reference, image)?;
    let sum = Zip::from(&reference)
        .and(&image)
        .fold(0.0, |acc, &r, &v| acc + ((r - v) / (r + MAPE_EPSILON)).abs());
    Ok(sum / reference.len() as f64 * 100.0)
}

/// Error of an ensemble against a reference, averaged over its members.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ErrorSummary {
    pub rmse: f64,
    pub mape: f64,
    pub members: usize,
}

pub fn ensemble_error(stack: &ImageStack, reference: &Array3<f64>) -> Result<ErrorSummary> {
    if stack.is_empty() {
        return Err(CorrelationError::EmptyStack);
    }

    let mut total_rmse = 0.0;
    let mut total_mape = 0.0;
    for (index, image) in stack.images().enumerate() {
        if image.dim() != reference.dim() {
            return Err(CorrelationError::ShapeMismatch {
                index,
                expected: reference.dim(),
                found: image.dim(),
            });
        }
        total_rmse += rmse(reference.view(), image)?;
        total_mape += mape(reference.view(), image)?;
    }

    let n = stack.len() as f64;
    Ok(ErrorSummary {
        rmse: total_rmse / n,
        mape: total_mape / n,
        members: stack.len(),
    })
}

fn check_same_shape(reference: ArrayView3<'_, f64>, image: ArrayView3<'_, f64>) -> Result<()> {
    if reference.dim() != image.dim() {
        return Err(CorrelationError::ShapeMismatch {
            index: 0,
            expected: reference.dim(),
            found: image.dim(),
        });
    }
    if reference.is_empty() {
        return Err(CorrelationError::EmptyStack);
    }
    Ok(())
}
