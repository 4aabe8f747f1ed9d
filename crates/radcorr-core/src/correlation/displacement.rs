use std::ops::Range;

/// Integer pixel displacement: pixel (y, x) is paired with (y + dy, x + dx).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Displacement {
    pub dy: isize,
    pub dx: isize,
}

impl Displacement {
    pub fn new(dy: isize, dx: isize) -> Self {
        Self { dy, dx }
    }

    pub fn negated(self) -> Self {
        Self::new(-self.dy, -self.dx)
    }

    /// Representative shared by `d` and `-d`: the one with `dy > 0`, or
    /// `dy == 0 && dx >= 0`.
    pub fn canonical(self) -> Self {
        if self.dy < 0 || (self.dy == 0 && self.dx < 0) {
            self.negated()
        } else {
            self
        }
    }

    pub fn chebyshev(self) -> usize {
        self.dy.unsigned_abs().max(self.dx.unsigned_abs())
    }

    /// Row/column ranges of the base and offset windows inside an
    /// `height` x `width` frame. Both windows cover only the overlap, so
    /// base pixel (y, x) lines up with offset pixel (y + dy, x + dx).
    /// Returns `None` when the displacement leaves no overlap.
    pub fn windows(self, height: usize, width: usize) -> Option<CropWindows> {
        let rows = axis_windows(self.dy, height)?;
        let cols = axis_windows(self.dx, width)?;
        Some(CropWindows {
            base_rows: rows.0,
            base_cols: cols.0,
            offset_rows: rows.1,
            offset_cols: cols.1,
        })
    }
}

/// Overlapping regions of a frame and its displaced copy.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CropWindows {
    pub base_rows: Range<usize>,
    pub base_cols: Range<usize>,
    pub offset_rows: Range<usize>,
    pub offset_cols: Range<usize>,
}

impl CropWindows {
    pub fn height(&self) -> usize {
        self.base_rows.len()
    }

    pub fn width(&self) -> usize {
        self.base_cols.len()
    }
}

fn axis_windows(shift: isize, extent: usize) -> Option<(Range<usize>, Range<usize>)> {
    let magnitude = shift.unsigned_abs();
    if magnitude >= extent {
        return None;
    }
    let len = extent - magnitude;
    if shift >= 0 {
        Some((0..len, magnitude..extent))
    } else {
        Some((magnitude..extent, 0..len))
    }
}

/// Number of displacements at exact Chebyshev distance `radius`:
/// the boundary of a (2r+1) x (2r+1) square, `4 * (2r + 1) - 4`.
pub fn ring_cardinality(radius: usize) -> usize {
    if radius == 0 {
        1
    } else {
        4 * (2 * radius + 1) - 4
    }
}

/// Every displacement with `max(|dy|, |dx|) == radius`, each exactly once:
/// top row, bottom row, then the left and right columns without corners.
pub fn ring_displacements(radius: usize) -> impl Iterator<Item = Displacement> {
    let r = radius as isize;
    let rows = if r == 0 { 0..0 } else { -r..r + 1 };
    let cols = if r == 0 { 0..0 } else { -r + 1..r };

    let center = (radius == 0).then_some(Displacement::new(0, 0));
    let top = rows.clone().map(move |dx| Displacement::new(-r, dx));
    let bottom = rows.map(move |dx| Displacement::new(r, dx));
    let left = cols.clone().map(move |dy| Displacement::new(dy, -r));
    let right = cols.map(move |dy| Displacement::new(dy, r));

    center.into_iter().chain(top).chain(bottom).chain(left).chain(right)
}
