//! A heap-allocated two-dimensional array with dimensions chosen at runtime.
//!
//! Elements are [`Pod`], so they can be copied and compared as raw bytes;
//! this suits bitmaps and similar buffers. No meaning is attached to the
//! elements themselves. Storage is row-major: the first row, then the second,
//! and so on. Dimensions and indices are always given row first.

use core::ops::{Index, IndexMut, Range};

use dataview::{Pod, PodMethods as _};

#[derive(Debug)]
pub struct Array2d<T> {
    data: Box<[T]>,
    rows: usize,
    cols: usize,
}

/// Allocates a `rows` x `cols` array whose contents are meant to be
/// overwritten before use. They start out zeroed.
///
/// # Panics
///
/// Panics if `rows * cols` overflows.
#[must_use]
pub fn make_array2d_for_overwrite<T>(rows: usize, cols: usize) -> Array2d<T>
where
    T: Pod,
{
    let len = rows
        .checked_mul(cols)
        .unwrap_or_else(|| panic!("array2d size overflow: {rows} x {cols}"));
    let data = (0..len).map(|_| T::zeroed()).collect();
    Array2d { data, rows, cols }
}

impl<T> Array2d<T>
where
    T: Pod,
{
    /// All elements, row after row.
    #[must_use]
    pub fn data(&self) -> &[T] {
        &self.data
    }

    #[must_use]
    pub fn data_mut(&mut self) -> &mut [T] {
        &mut self.data
    }

    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[must_use]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    #[must_use]
    pub fn row(&self, row: usize) -> &[T] {
        assert!(row < self.rows, "row {row} out of range for {} rows", self.rows);
        &self.data[row * self.cols..][..self.cols]
    }

    /// # Panics
    ///
    /// Panics if `row >= self.rows()`.
    #[must_use]
    pub fn row_mut(&mut self, row: usize) -> &mut [T] {
        assert!(row < self.rows, "row {row} out of range for {} rows", self.rows);
        &mut self.data[row * self.cols..][..self.cols]
    }
}

impl<T> Index<(usize, usize)> for Array2d<T>
where
    T: Pod,
{
    type Output = T;

    fn index(&self, (row, col): (usize, usize)) -> &T {
        assert!(col < self.cols, "column {col} out of range for {} columns", self.cols);
        &self.row(row)[col]
    }
}

impl<T> IndexMut<(usize, usize)> for Array2d<T>
where
    T: Pod,
{
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut T {
        assert!(col < self.cols, "column {col} out of range for {} columns", self.cols);
        &mut self.row_mut(row)[col]
    }
}

/// Compares a rectangular region of `a` with an equally sized region of `b`
/// byte by byte.
///
/// The regions are scanned one row at a time even where rows happen to be
/// contiguous.
///
/// # Panics
///
/// Panics if a region does not lie within its array or if the two regions
/// differ in extent.
#[must_use]
pub fn subarray2d_eq<T>(
    a: &Array2d<T>,
    a_rows: Range<usize>,
    a_cols: Range<usize>,
    b: &Array2d<T>,
    b_rows: Range<usize>,
    b_cols: Range<usize>,
) -> bool
where
    T: Pod,
{
    assert!(a_rows.start <= a_rows.end && a_rows.end <= a.rows());
    assert!(a_cols.start <= a_cols.end && a_cols.end <= a.cols());
    assert!(b_rows.start <= b_rows.end && b_rows.end <= b.rows());
    assert!(b_cols.start <= b_cols.end && b_cols.end <= b.cols());
    assert_eq!(a_rows.len(), b_rows.len());
    assert_eq!(a_cols.len(), b_cols.len());

    a_rows.zip(b_rows).all(|(ar, br)| {
        let a_part = &a.row(ar)[a_cols.clone()];
        let b_part = &b.row(br)[b_cols.clone()];
        a_part.as_bytes() == b_part.as_bytes()
    })
}
