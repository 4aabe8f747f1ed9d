use std::ops::Range;

use ndarray::{s, Array3, Array4, ArrayView3, Axis};
use num_traits::AsPrimitive;

use crate::error::{CorrelationError, ImageShape, Result};

/// An ensemble of same-shaped images of one scene.
///
/// Samples are stored as `f64`, shape = (images, height, width, channels).
#[derive(Clone, Debug)]
pub struct ImageStack {
    pub data: Array4<f64>,
}

impl ImageStack {
    /// Build a stack from individual images, checking that every image has the
    /// shape of the first one.
    pub fn from_images<T>(images: &[Array3<T>]) -> Result<Self>
    where
        T: AsPrimitive<f64>,
    {
        let first = images.first().ok_or(CorrelationError::EmptyStack)?;
        let expected = first.dim();
        check_shapes(images.iter().map(|img| img.dim()), expected)?;

        let (h, w, c) = expected;
        let mut data = Array4::<f64>::zeros((images.len(), h, w, c));
        for (mut slot, image) in data.axis_iter_mut(Axis(0)).zip(images) {
            slot.zip_mut_with(image, |dst, &src| *dst = src.as_());
        }

        Ok(Self { data })
    }

    /// Wrap an already-assembled (images, height, width, channels) array.
    pub fn from_array(data: Array4<f64>) -> Result<Self> {
        if data.len_of(Axis(0)) == 0 {
            return Err(CorrelationError::EmptyStack);
        }
        Ok(Self { data })
    }

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

    /// (height, width, channels) of every member.
    pub fn image_shape(&self) -> ImageShape {
        (self.height(), self.width(), self.channels())
    }

    pub fn image(&self, index: usize) -> ArrayView3<'_, f64> {
        self.data.index_axis(Axis(0), index)
    }

    pub fn images(&self) -> impl Iterator<Item = ArrayView3<'_, f64>> {
        self.data.axis_iter(Axis(0))
    }

    /// Copy of the stack restricted to `region` of every member.
    pub fn crop(&self, region: &CropRegion) -> Result<Self> {
        region.check(self.height(), self.width())?;
        let data = self
            .data
            .slice(s![.., region.rows.clone(), region.cols.clone(), ..])
            .to_owned();
        Ok(Self { data })
    }
}

/// Rectangular region of interest, as half-open row and column ranges.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CropRegion {
    pub rows: Range<usize>,
    pub cols: Range<usize>,
}

impl CropRegion {
    pub fn new(rows: Range<usize>, cols: Range<usize>) -> Self {
        Self { rows, cols }
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.cols.len()
    }

    /// View of `image` inside the region.
    pub fn apply<'a, T>(&self, image: ArrayView3<'a, T>) -> Result<ArrayView3<'a, T>> {
        let (h, w, _) = image.dim();
        self.check(h, w)?;
        Ok(image.slice_move(s![self.rows.clone(), self.cols.clone(), ..]))
    }

    /// The region must be non-empty and lie inside a `height` x `width` frame.
    fn check(&self, height: usize, width: usize) -> Result<()> {
        if self.rows.is_empty()
            || self.cols.is_empty()
            || self.rows.end > height
            || self.cols.end > width
        {
            return Err(CorrelationError::CropOutOfBounds {
                rows: self.rows.clone(),
                cols: self.cols.clone(),
                height,
                width,
            });
        }
        Ok(())
    }
}

pub(crate) fn check_shapes(
    shapes: impl Iterator<Item = ImageShape>,
    expected: ImageShape,
) -> Result<()> {
    for (index, found) in shapes.enumerate() {
        if found != expected {
            return Err(CorrelationError::ShapeMismatch {
                index,
                expected,
                found,
            });
        }
    }
    Ok(())
}
