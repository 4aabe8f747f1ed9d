use std::ops::Range;

use thiserror::Error;

/// Shape of a single ensemble member: (height, width, channels).
pub type ImageShape = (usize, usize, usize);

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CorrelationError {
    #[error("Image {index} has shape {found:?}, expected {expected:?}")]
    ShapeMismatch {
        index: usize,
        expected: ImageShape,
        found: ImageShape,
    },

    #[error("Need at least 2 images to estimate sample variance, got {count}")]
    InsufficientSamples { count: usize },

    #[error("No valid pixels for displacement (dy={dy}, dx={dx})")]
    DegenerateWindow { dy: isize, dx: isize },

    #[error("No defined displacements at radius {radius}")]
    DegenerateRadius { radius: usize },

    #[error("Empty image stack")]
    EmptyStack,

    #[error("Crop rows {rows:?}, cols {cols:?} do not fit a {height}x{width} image")]
    CropOutOfBounds {
        rows: Range<usize>,
        cols: Range<usize>,
        height: usize,
        width: usize,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = std::result::Result<T, CorrelationError>;
