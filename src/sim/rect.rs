//! Axis-aligned rectangle geometry
//!
//! Every collider in the game (tiles, player, enemies, bullets, spikes) is an
//! integer pixel rectangle. There is no rotation anywhere.

use serde::{Deserialize, Serialize};

/// Integer pixel rectangle, origin at top-left, y grows downward
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub w: i32,
    pub h: i32,
}

impl Rect {
    pub const fn new(x: i32, y: i32, w: i32, h: i32) -> Self {
        Self { x, y, w, h }
    }

    #[inline]
    pub fn right(&self) -> i32 {
        self.x + self.w
    }

    #[inline]
    pub fn bottom(&self) -> i32 {
        self.y + self.h
    }

    /// Horizontal centre (integer division, like the pixel math everywhere else)
    #[inline]
    pub fn center_x(&self) -> i32 {
        self.x + self.w / 2
    }

    /// Copy of this rect moved by a whole-pixel offset
    #[inline]
    pub fn translated(&self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Copy of this rect moved by a fractional velocity, truncating to pixels
    #[inline]
    pub fn moved_by(&self, dx: f32, dy: f32) -> Self {
        Self::new(nudge(self.x, dx), nudge(self.y, dy), self.w, self.h)
    }
}

/// True iff the two rectangles share interior area
///
/// Rectangles that only touch along an edge do not overlap.
#[inline]
pub fn overlaps(a: &Rect, b: &Rect) -> bool {
    a.x < b.x + b.w && a.x + a.w > b.x && a.y < b.y + b.h && a.y + a.h > b.y
}

/// Add a fractional delta to a pixel coordinate, truncating toward zero
#[inline]
pub fn nudge(coord: i32, delta: f32) -> i32 {
    (coord as f32 + delta) as i32
}
