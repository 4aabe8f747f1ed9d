mod common;

use ndarray::{Array3, Array4};

use radcorr_core::error::CorrelationError;
use radcorr_core::stack::{CropRegion, ImageStack};
use radcorr_core::statistics::{EnsembleAccumulator, PixelStatistics};

use common::{index_valued_stack, noise_stack, stack_from_fn};

#[test]
fn test_mean_and_sample_stddev() {
    // Values 0, 1, 2 at every pixel: mean 1, sample variance 1.
    let stack = index_valued_stack(3, (4, 4, 1));
    let stats = PixelStatistics::compute(&stack, 0.0).unwrap();
    assert_eq!(stats.samples, 3);
    for &m in stats.mean.iter() {
        assert!((m - 1.0).abs() < 1e-12);
    }
    for &s in stats.stddev.iter() {
        assert!((s - 1.0).abs() < 1e-12);
    }
    assert_eq!(stats.degenerate_count(), 0);
}

#[test]
fn test_bessel_correction() {
    // Two samples 0 and 2: population variance 1, sample variance 2.
    let stack = stack_from_fn(2, (2, 2, 1), |i, _, _, _| 2.0 * i as f64);
    let stats = PixelStatistics::compute(&stack, 0.0).unwrap();
    assert!((stats.stddev[[0, 0, 0]] - 2f64.sqrt()).abs() < 1e-12);
}

#[test]
fn test_constant_pixel_is_degenerate() {
    let stack = stack_from_fn(4, (3, 3, 2), |i, y, x, c| {
        if y == 1 && x == 2 && c == 0 {
            7.5
        } else {
            (i * 3 + y + x + c) as f64
        }
    });
    let stats = PixelStatistics::compute(&stack, 0.0).unwrap();
    assert!(stats.degenerate[[1, 2, 0]]);
    assert_eq!(stats.stddev[[1, 2, 0]], 0.0);
    assert!(!stats.degenerate[[1, 2, 1]]);
    assert_eq!(stats.degenerate_count(), 1);
    assert!(!stats.fully_degenerate());
}

#[test]
fn test_positive_threshold_flags_low_variance() {
    let stack = stack_from_fn(3, (2, 2, 1), |i, y, _, _| {
        if y == 0 {
            i as f64 * 1e-6
        } else {
            i as f64
        }
    });
    let exact = PixelStatistics::compute(&stack, 0.0).unwrap();
    assert_eq!(exact.degenerate_count(), 0);

    let tolerant = PixelStatistics::compute(&stack, 1e-3).unwrap();
    assert!(tolerant.degenerate[[0, 0, 0]]);
    assert!(tolerant.degenerate[[0, 1, 0]]);
    assert!(!tolerant.degenerate[[1, 0, 0]]);
}

#[test]
fn test_fully_constant_stack() {
    let stack = stack_from_fn(5, (3, 3, 1), |_, _, _, _| 0.4);
    let stats = PixelStatistics::compute(&stack, 0.0).unwrap();
    assert!(stats.fully_degenerate());
}

#[test]
fn test_insufficient_samples() {
    let stack = index_valued_stack(1, (4, 4, 1));
    let err = PixelStatistics::compute(&stack, 0.0).unwrap_err();
    assert_eq!(err, CorrelationError::InsufficientSamples { count: 1 });
}

#[test]
fn test_welford_matches_two_pass() {
    let stack = noise_stack(16, (6, 5, 3), 99);
    let stats = PixelStatistics::compute(&stack, 0.0).unwrap();

    let n = stack.len() as f64;
    for y in 0..6 {
        for x in 0..5 {
            for c in 0..3 {
                let values: Vec<f64> = (0..stack.len()).map(|i| stack.data[[i, y, x, c]]).collect();
                let mean = values.iter().sum::<f64>() / n;
                let var = values.iter().map(|v| (v - mean) * (v - mean)).sum::<f64>() / (n - 1.0);
                assert!((stats.mean[[y, x, c]] - mean).abs() < 1e-12);
                assert!((stats.stddev[[y, x, c]] - var.sqrt()).abs() < 1e-12);
            }
        }
    }
}

#[test]
fn test_accumulator_streams_images() {
    let mut acc = EnsembleAccumulator::new((2, 2, 1));
    for v in [1.0, 3.0, 5.0] {
        acc.push(Array3::from_elem((2, 2, 1), v).view()).unwrap();
    }
    assert_eq!(acc.count(), 3);
    let stats = acc.finish(0.0).unwrap();
    assert!((stats.mean[[1, 1, 0]] - 3.0).abs() < 1e-12);
    assert!((stats.stddev[[1, 1, 0]] - 2.0).abs() < 1e-12);
}

#[test]
fn test_accumulator_rejects_wrong_shape() {
    let mut acc = EnsembleAccumulator::new((2, 2, 1));
    acc.push(Array3::zeros((2, 2, 1)).view()).unwrap();
    let err = acc.push(Array3::zeros((2, 3, 1)).view()).unwrap_err();
    assert_eq!(
        err,
        CorrelationError::ShapeMismatch {
            index: 1,
            expected: (2, 2, 1),
            found: (2, 3, 1),
        }
    );
}

#[test]
fn test_accumulator_needs_two_images() {
    let mut acc = EnsembleAccumulator::new((1, 1, 1));
    acc.push(Array3::zeros((1, 1, 1)).view()).unwrap();
    assert!(matches!(
        acc.finish(0.0),
        Err(CorrelationError::InsufficientSamples { count: 1 })
    ));
}

// ---------------------------------------------------------------------------
// ImageStack construction
// ---------------------------------------------------------------------------

#[test]
fn test_stack_shape_mismatch() {
    let images = vec![
        Array3::<f32>::zeros((4, 4, 3)),
        Array3::<f32>::zeros((4, 4, 3)),
        Array3::<f32>::zeros((4, 5, 3)),
    ];
    let err = ImageStack::from_images(&images).unwrap_err();
    assert_eq!(
        err,
        CorrelationError::ShapeMismatch {
            index: 2,
            expected: (4, 4, 3),
            found: (4, 5, 3),
        }
    );
}

#[test]
fn test_stack_channel_mismatch() {
    let images = vec![Array3::<f64>::zeros((4, 4, 3)), Array3::<f64>::zeros((4, 4, 1))];
    assert!(matches!(
        ImageStack::from_images(&images),
        Err(CorrelationError::ShapeMismatch { index: 1, .. })
    ));
}

#[test]
fn test_stack_empty() {
    let images: Vec<Array3<f32>> = vec![];
    assert_eq!(
        ImageStack::from_images(&images).unwrap_err(),
        CorrelationError::EmptyStack
    );
    assert!(ImageStack::from_array(Array4::zeros((0, 2, 2, 1))).is_err());
}

#[test]
fn test_stack_converts_f32() {
    let images = vec![
        Array3::<f32>::from_elem((2, 3, 1), 0.5),
        Array3::<f32>::from_elem((2, 3, 1), 0.25),
    ];
    let stack = ImageStack::from_images(&images).unwrap();
    assert_eq!(stack.len(), 2);
    assert_eq!(stack.image_shape(), (2, 3, 1));
    assert_eq!(stack.data[[1, 1, 2, 0]], 0.25);
}

#[test]
fn test_stack_crop() {
    // Sample value encodes (image, row, col).
    let stack = stack_from_fn(2, (5, 6, 2), |i, y, x, _| (100 * i + 10 * y + x) as f64);
    let region = CropRegion::new(1..4, 2..5);
    let cropped = stack.crop(&region).unwrap();
    assert_eq!(cropped.len(), 2);
    assert_eq!(cropped.image_shape(), (3, 3, 2));
    assert_eq!(cropped.data[[0, 0, 0, 0]], 12.0);
    assert_eq!(cropped.data[[1, 2, 2, 1]], 134.0);

    let view = region.apply(stack.image(1)).unwrap();
    assert_eq!(view, cropped.image(1));
}

#[test]
fn test_stack_crop_out_of_bounds() {
    let stack = index_valued_stack(2, (4, 4, 1));
    for region in [CropRegion::new(0..5, 0..4), CropRegion::new(0..4, 2..2)] {
        assert_eq!(
            stack.crop(&region).unwrap_err(),
            CorrelationError::CropOutOfBounds {
                rows: region.rows.clone(),
                cols: region.cols.clone(),
                height: 4,
                width: 4,
            }
        );
    }
}
