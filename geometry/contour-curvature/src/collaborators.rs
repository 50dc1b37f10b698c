//! Interfaces to the segmentation and contour-tracing stages.
//!
//! Curvature estimation only needs ordered boundary points. Producing them
//! from an image (thresholding, labeling connected components, tracing a
//! boundary) is left to implementations of these traits so the estimator
//! has no dependency on any imaging or plotting library.

use crate::contour::Contour;

/// Binary raster mask of one detected cell, stored row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellMask {
    width: usize,
    height: usize,
    pixels: Vec<bool>,
}

impl CellMask {
    /// Create an all-background mask.
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![false; width * height],
        }
    }

    /// Create a mask from row-major pixels.
    ///
    /// Returns `None` if `pixels.len() != width * height`.
    #[must_use]
    pub fn from_pixels(width: usize, height: usize, pixels: Vec<bool>) -> Option<Self> {
        (pixels.len() == width * height).then_some(Self {
            width,
            height,
            pixels,
        })
    }

    /// Mask width in pixels.
    #[must_use]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Mask height in pixels.
    #[must_use]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Whether the pixel belongs to the cell. Out-of-bounds pixels do not.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> bool {
        row < self.height && col < self.width && self.pixels[row * self.width + col]
    }

    /// Mark a pixel as part of the cell. Out-of-bounds writes are ignored.
    pub fn set(&mut self, row: usize, col: usize, value: bool) {
        if row < self.height && col < self.width {
            self.pixels[row * self.width + col] = value;
        }
    }

    /// Number of foreground pixels.
    #[must_use]
    pub fn area(&self) -> usize {
        self.pixels.iter().filter(|&&p| p).count()
    }
}

/// Splits an image into one mask per detected cell.
pub trait CellSegmenter<I: ?Sized> {
    /// Segment `image` into per-cell masks.
    fn segment(&self, image: &I) -> Vec<CellMask>;
}

/// Traces the ordered boundary of a cell mask.
pub trait ContourTracer {
    /// Trace the outer boundary of `mask`, or `None` if it has none.
    fn trace(&self, mask: &CellMask) -> Option<Contour>;
}

impl<F> ContourTracer for F
where
    F: Fn(&CellMask) -> Option<Contour>,
{
    fn trace(&self, mask: &CellMask) -> Option<Contour> {
        self(mask)
    }
}
