/// Minimum pixel count (h*w) of a cropped window to use row-level Rayon parallelism.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Minimum experiment count to use experiment-level Rayon parallelism in batch mode.
pub const PARALLEL_EXPERIMENT_THRESHOLD: usize = 2;

/// Radii sampled when no explicit list is configured.
pub const DEFAULT_RADII: [usize; 15] = [1, 2, 3, 4, 6, 8, 10, 13, 16, 20, 25, 30, 35, 45, 60];

/// Offset added to the reference in the MAPE denominator so dark pixels
/// don't blow up the relative error.
pub const MAPE_EPSILON: f64 = 0.01;

/// Correlation of a pixel with itself.
pub const SELF_CORRELATION: f64 = 1.0;
