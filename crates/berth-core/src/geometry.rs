//! Rectangle math, zone-fraction tests and clamping used by layout and hit testing.

use crate::math::{Vec2, clamp_range};

/// An axis-aligned rectangle in host pixels, origin top-left.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const ZERO: Rect = Rect {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_position_size(position: Vec2, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    #[inline]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.x + self.width * 0.5
    }

    #[inline]
    pub fn center_y(&self) -> f32 {
        self.y + self.height * 0.5
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.center_x(), self.center_y())
    }

    pub fn position(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Inclusive containment on all four edges.
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.x && point.x <= self.right() && point.y >= self.y && point.y <= self.bottom()
    }

    /// Whether `x` lies inside the horizontal span (inclusive).
    pub fn contains_x(&self, x: f32) -> bool {
        x >= self.x && x <= self.right()
    }

    /// Grow the rectangle by `margin` on every side. Negative margins shrink it, never below
    /// zero size.
    pub fn expand(&self, margin: f32) -> Rect {
        Rect {
            x: self.x - margin,
            y: self.y - margin,
            width: (self.width + margin * 2.0).max(0.0),
            height: (self.height + margin * 2.0).max(0.0),
        }
    }

    /// Shrink by `padding` on every side.
    pub fn inset(&self, padding: f32) -> Rect {
        self.expand(-padding)
    }

    pub fn with_position(mut self, x: f32, y: f32) -> Rect {
        self.x = x;
        self.y = y;
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Rect {
        self.width = width;
        self.height = height;
        self
    }

    /// True when either dimension is zero, negative or not a number.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    /// Move the rectangle so it lies inside `bounds` where possible, keeping its size.
    ///
    /// When the rectangle is larger than `bounds` it is pinned to the top-left corner.
    pub fn clamped_within(&self, bounds: &Rect) -> Rect {
        let x = clamp_range(self.x, bounds.x, bounds.right() - self.width);
        let y = clamp_range(self.y, bounds.y, bounds.bottom() - self.height);
        self.with_position(x, y)
    }
}

/// Width and height in host pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Position of `value` within `[start, start + extent]` as a fraction.
///
/// Values outside the span produce fractions below 0 or above 1. A zero extent yields 0.5 so
/// callers treat the point as centred rather than dividing by zero.
#[inline]
pub fn fraction_within(value: f32, start: f32, extent: f32) -> f32 {
    if extent <= 0.0 {
        return 0.5;
    }
    (value - start) / extent
}

/// Whether `value` falls in the leading `zone` fraction of the span.
#[inline]
pub fn in_leading_zone(value: f32, start: f32, extent: f32, zone: f32) -> bool {
    value <= start + extent * zone
}

/// Whether `value` falls in the trailing `zone` fraction of the span.
#[inline]
pub fn in_trailing_zone(value: f32, start: f32, extent: f32, zone: f32) -> bool {
    value >= start + extent * (1.0 - zone)
}
