#![allow(dead_code)]

use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use radcorr_core::stack::ImageStack;

/// Build a stack of `n` images of shape (h, w, c) from a per-sample function
/// `f(image, row, col, channel)`.
pub fn stack_from_fn(
    n: usize,
    (h, w, c): (usize, usize, usize),
    f: impl Fn(usize, usize, usize, usize) -> f64,
) -> ImageStack {
    let images: Vec<Array3<f64>> = (0..n)
        .map(|i| Array3::from_shape_fn((h, w, c), |(y, x, ch)| f(i, y, x, ch)))
        .collect();
    ImageStack::from_images(&images).expect("valid stack")
}

/// Every image is spatially constant and equal to its own index.
pub fn index_valued_stack(n: usize, shape: (usize, usize, usize)) -> ImageStack {
    stack_from_fn(n, shape, |i, _, _, _| i as f64)
}

/// Every image is spatially constant and equal to `values[i]`.
pub fn per_member_constant_stack(values: &[f64], shape: (usize, usize, usize)) -> ImageStack {
    stack_from_fn(values.len(), shape, |i, _, _, _| values[i])
}

/// Independent uniform noise in [0, 1) at every sample.
pub fn noise_stack(n: usize, (h, w, c): (usize, usize, usize), seed: u64) -> ImageStack {
    let mut rng = StdRng::seed_from_u64(seed);
    let images: Vec<Array3<f64>> = (0..n)
        .map(|_| Array3::from_shape_fn((h, w, c), |_| rng.random::<f64>()))
        .collect();
    ImageStack::from_images(&images).expect("valid stack")
}

/// Same as [`noise_stack`] but pins `pixel` (row, col) to a constant in every
/// image, making it degenerate.
pub fn noise_stack_with_constant_pixel(
    n: usize,
    shape: (usize, usize, usize),
    seed: u64,
    pixel: (usize, usize),
) -> ImageStack {
    let mut stack = noise_stack(n, shape, seed);
    for i in 0..n {
        for ch in 0..shape.2 {
            stack.data[[i, pixel.0, pixel.1, ch]] = 0.25;
        }
    }
    stack
}
