//! Plain geometry in PDF points (origin at the lower-left corner).

use crate::constants::{DEFAULT_PAGE_DIMENSIONS, MIN_CROP_SIZE_PT};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Width and height of a page in points
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Largest uniform scale at which `self` still fits inside `target`.
    pub fn fit_scale(&self, target: &PageSize) -> f32 {
        if self.width <= 0.0 || self.height <= 0.0 {
            return 1.0;
        }
        (target.width / self.width).min(target.height / self.height)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_DIMENSIONS.0, DEFAULT_PAGE_DIMENSIONS.1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle; `x`/`y` is the lower-left corner
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0.0 || self.height == 0.0
    }

    /// Flip negative extents so the rectangle is described from its
    /// lower-left corner, the way a drag from any corner is resolved.
    pub fn normalized(&self) -> Rect {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Rect::new(x, y, width, height)
    }

    /// Normalize, then clamp into a page of the given size, keeping at
    /// least `MIN_CROP_SIZE_PT` on each edge.
    pub fn crop_within(&self, page: &PageSize) -> Rect {
        let rect = self.normalized();
        let min_w = MIN_CROP_SIZE_PT.min(page.width);
        let min_h = MIN_CROP_SIZE_PT.min(page.height);

        let x = finite_or_zero(rect.x).clamp(0.0, (page.width - min_w).max(0.0));
        let y = finite_or_zero(rect.y).clamp(0.0, (page.height - min_h).max(0.0));
        let width = finite_or_zero(rect.width).clamp(min_w, page.width - x);
        let height = finite_or_zero(rect.height).clamp(min_h, page.height - y);

        Rect::new(x, y, width, height)
    }
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}
