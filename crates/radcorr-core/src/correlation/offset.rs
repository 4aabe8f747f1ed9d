use ndarray::{s, ArrayView3, ArrayView4, Axis, Zip};
use rayon::prelude::*;
use tracing::debug;

use crate::consts::PARALLEL_PIXEL_THRESHOLD;
use crate::error::{CorrelationError, Result};
use crate::standardize::StandardizedStack;

use super::cache::CorrelationCache;
use super::displacement::Displacement;

/// Mean correlation between pixel (y, x) and pixel (y + dy, x + dx) of a
/// standardized stack.
///
/// For each overlapping position the ensemble products are summed and divided
/// by N-1. Positions where either side is degenerate are skipped, and the
/// remaining estimates are averaged over rows, columns and channels. The
/// estimate is a correlation coefficient only when the stack was
/// variance-normalized; otherwise it is a covariance.
pub struct OffsetCorrelationEvaluator<'a> {
    stack: &'a StandardizedStack,
}

impl<'a> OffsetCorrelationEvaluator<'a> {
    pub fn new(stack: &'a StandardizedStack) -> Self {
        Self { stack }
    }

    pub fn stack(&self) -> &StandardizedStack {
        self.stack
    }

    /// Cached evaluation. A displacement and its negation share one cache
    /// entry; a window with no valid pixels yields `DegenerateWindow`.
    pub fn evaluate(&self, displacement: Displacement, cache: &mut CorrelationCache) -> Result<f64> {
        let value = match cache.get(displacement) {
            Some(value) => value,
            None => {
                let value = self.compute(displacement);
                debug!(
                    dy = displacement.dy,
                    dx = displacement.dx,
                    value = ?value,
                    "Offset correlation computed"
                );
                cache.insert(displacement, value);
                value
            }
        };

        value.ok_or(CorrelationError::DegenerateWindow {
            dy: displacement.dy,
            dx: displacement.dx,
        })
    }

    /// Uncached evaluation. `None` when no valid pixel pair overlaps.
    pub fn compute(&self, displacement: Displacement) -> Option<f64> {
        let stack = self.stack;
        let windows = displacement.windows(stack.height(), stack.width())?;

        let base = stack.data.slice(s![
            ..,
            windows.base_rows.clone(),
            windows.base_cols.clone(),
            ..
        ]);
        let offset = stack.data.slice(s![
            ..,
            windows.offset_rows.clone(),
            windows.offset_cols.clone(),
            ..
        ]);
        let base_invalid = stack
            .invalid
            .slice(s![windows.base_rows.clone(), windows.base_cols.clone(), ..]);
        let offset_invalid = stack
            .invalid
            .slice(s![windows.offset_rows.clone(), windows.offset_cols.clone(), ..]);

        let pair = WindowPair {
            base,
            offset,
            base_invalid,
            offset_invalid,
            norm: (stack.len() - 1) as f64,
        };

        let rows = windows.height();
        let partials: Vec<(f64, usize)> = if rows * windows.width() >= PARALLEL_PIXEL_THRESHOLD {
            (0..rows).into_par_iter().map(|row| pair.row_sum(row)).collect()
        } else {
            (0..rows).map(|row| pair.row_sum(row)).collect()
        };

        // Summed in row order so the result doesn't depend on scheduling.
        let (sum, valid) = partials
            .into_iter()
            .fold((0.0, 0usize), |(s, v), (rs, rv)| (s + rs, v + rv));

        if valid == 0 {
            None
        } else {
            Some(sum / valid as f64)
        }
    }
}

struct WindowPair<'v> {
    base: ArrayView4<'v, f64>,
    offset: ArrayView4<'v, f64>,
    base_invalid: ArrayView3<'v, bool>,
    offset_invalid: ArrayView3<'v, bool>,
    norm: f64,
}

impl WindowPair<'_> {
    /// Sum of per-pixel estimates and count of valid positions in one row.
    fn row_sum(&self, row: usize) -> (f64, usize) {
        let base = self.base.index_axis(Axis(1), row);
        let offset = self.offset.index_axis(Axis(1), row);
        let base_invalid = self.base_invalid.index_axis(Axis(0), row);
        let offset_invalid = self.offset_invalid.index_axis(Axis(0), row);

        Zip::from(base.lanes(Axis(0)))
            .and(offset.lanes(Axis(0)))
            .and(&base_invalid)
            .and(&offset_invalid)
            .fold((0.0, 0usize), |(sum, valid), b, o, &bad_b, &bad_o| {
                if bad_b || bad_o {
                    (sum, valid)
                } else {
                    (sum + b.dot(&o) / self.norm, valid + 1)
                }
            })
    }
}
