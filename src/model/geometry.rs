//! Page geometry: cursor position and box frames.
//!
//! Coordinates follow the page layout convention: origin at the top-left
//! corner, `y` growing downwards. The PDF writer flips them on output.

use serde::{Deserialize, Serialize};

/// Position where the next box will be drawn.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub x: f32,
    pub y: f32,
}

impl Cursor {
    /// Create a cursor at the given position.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Frame of a box of `width` x `height` anchored at this cursor.
    pub fn frame(self, width: f32, height: f32) -> Frame {
        Frame {
            x: self.x,
            y: self.y,
            width,
            height,
        }
    }

    /// Cursor moved below `frame`, leaving `gap` units of space.
    pub fn below(self, frame: &Frame, gap: f32) -> Self {
        Self {
            x: self.x,
            y: frame.bottom() + gap,
        }
    }
}

/// Axis-aligned rectangle on a page.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Frame {
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

    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Check whether this frame ends at or above `limit`.
    pub fn fits_above(&self, limit: f32) -> bool {
        self.bottom() <= limit
    }
}
