use ndarray::{ArrayView2, ShapeBuilder};

use crate::shared::error::PipelineError;

/// A decoded grayscale image: one intensity byte per pixel, row-major.
///
/// Immutable once built. Classifier ports only ever see it through the
/// borrowed [`ImageParams`] view.
#[derive(Clone, Debug, PartialEq)]
pub struct GrayImage {
    pixels: Vec<u8>,
    rows: usize,
    cols: usize,
}

impl GrayImage {
    pub fn new(pixels: Vec<u8>, rows: usize, cols: usize) -> Result<Self, PipelineError> {
        if rows == 0 || cols == 0 {
            return Err(PipelineError::InvalidImage(format!(
                "image must not be empty, got {cols}x{rows}"
            )));
        }
        if pixels.len() != rows * cols {
            return Err(PipelineError::InvalidImage(format!(
                "expected {} pixels for {cols}x{rows}, got {}",
                rows * cols,
                pixels.len()
            )));
        }
        Ok(Self { pixels, rows, cols })
    }

    pub fn pixels(&self) -> &[u8] {
        &self.pixels
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn params(&self) -> ImageParams<'_> {
        ImageParams {
            pixels: &self.pixels,
            rows: self.rows,
            cols: self.cols,
            row_stride: self.cols,
        }
    }
}

/// Read-only view of a grayscale image handed to every classifier port.
#[derive(Clone, Copy, Debug)]
pub struct ImageParams<'a> {
    pixels: &'a [u8],
    rows: usize,
    cols: usize,
    row_stride: usize,
}

impl<'a> ImageParams<'a> {
    pub fn pixels(&self) -> &'a [u8] {
        self.pixels
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Distance in bytes between the starts of two consecutive rows.
    pub fn row_stride(&self) -> usize {
        self.row_stride
    }

    /// Intensity at `(row, col)`, or `None` outside the image.
    pub fn get(&self, row: i64, col: i64) -> Option<u8> {
        if row < 0 || col < 0 {
            return None;
        }
        let (row, col) = (row as usize, col as usize);
        if row >= self.rows || col >= self.cols {
            return None;
        }
        self.pixels.get(row * self.row_stride + col).copied()
    }

    /// 2-D `(rows, cols)` view over the pixel buffer honoring the row stride.
    pub fn as_ndarray(&self) -> Result<ArrayView2<'a, u8>, PipelineError> {
        ArrayView2::from_shape((self.rows, self.cols).strides((self.row_stride, 1)), self.pixels)
            .map_err(|e| PipelineError::InvalidImage(e.to_string()))
    }
}
