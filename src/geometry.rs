//! Value types for positions, rectangles, and four-sided spacing.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

/// A 2D vector or point.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2::new(0.0, 0.0);

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn min(self, other: Self) -> Self {
        Self::new(self.x.min(other.x), self.y.min(other.y))
    }

    pub fn max(self, other: Self) -> Self {
        Self::new(self.x.max(other.x), self.y.max(other.y))
    }

    pub fn lerp(self, other: Self, t: f64) -> Self {
        Self {
            x: self.x + (other.x - self.x) * t,
            y: self.y + (other.y - self.y) * t,
        }
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from(other: (f64, f64)) -> Self {
        Self::new(other.0, other.1)
    }
}

impl From<Vector2> for kurbo::Vec2 {
    fn from(v: Vector2) -> Self {
        kurbo::Vec2::new(v.x, v.y)
    }
}

impl From<Vector2> for kurbo::Point {
    fn from(v: Vector2) -> Self {
        kurbo::Point::new(v.x, v.y)
    }
}

impl From<kurbo::Size> for Vector2 {
    fn from(size: kurbo::Size) -> Self {
        Self::new(size.width, size.height)
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, other: Self) {
        self.x += other.x;
        self.y += other.y;
    }
}

impl SubAssign for Vector2 {
    fn sub_assign(&mut self, other: Self) {
        self.x -= other.x;
        self.y -= other.y;
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vector2 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

impl Neg for Vector2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// An axis-aligned rectangle stored as origin and size.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const ZERO: Rect = Rect::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn from_origin_size(origin: Vector2, size: Vector2) -> Self {
        Self::new(origin.x, origin.y, size.x, size.y)
    }

    pub fn from_min_max(min: Vector2, max: Vector2) -> Self {
        Self::new(min.x, min.y, max.x - min.x, max.y - min.y)
    }

    pub fn origin(&self) -> Vector2 {
        Vector2::new(self.x, self.y)
    }

    pub fn size(&self) -> Vector2 {
        Vector2::new(self.width, self.height)
    }

    pub fn min(&self) -> Vector2 {
        self.origin()
    }

    pub fn max(&self) -> Vector2 {
        Vector2::new(self.right(), self.bottom())
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Vector2 {
        Vector2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }

    pub fn contains(&self, point: Vector2) -> bool {
        point.x >= self.x && point.y >= self.y && point.x < self.right() && point.y < self.bottom()
    }

    pub fn translate(&self, offset: Vector2) -> Self {
        Self::new(self.x + offset.x, self.y + offset.y, self.width, self.height)
    }

    /// The smallest rectangle containing both.
    pub fn union(&self, other: &Self) -> Self {
        kurbo::Rect::from(*self).union((*other).into()).into()
    }

    /// The overlapping area. Disjoint rectangles produce a zero sized rectangle at the clamped corner.
    pub fn intersect(&self, other: &Self) -> Self {
        kurbo::Rect::from(*self).intersect((*other).into()).into()
    }

    /// Grows the rectangle outward by `spacing` on each side.
    pub fn expand(&self, spacing: Spacing) -> Self {
        (kurbo::Rect::from(*self) + kurbo::Insets::from(spacing)).into()
    }

    /// Shrinks the rectangle inward by `spacing` on each side.
    pub fn shrink(&self, spacing: Spacing) -> Self {
        (kurbo::Rect::from(*self) - kurbo::Insets::from(spacing)).into()
    }
}

impl From<Rect> for kurbo::Rect {
    fn from(rect: Rect) -> Self {
        kurbo::Rect::new(rect.x, rect.y, rect.right(), rect.bottom())
    }
}

impl From<kurbo::Rect> for Rect {
    fn from(rect: kurbo::Rect) -> Self {
        Self::new(rect.x0, rect.y0, rect.width(), rect.height())
    }
}

/// Four-sided spacing used for margins and paddings.
#[derive(Debug, Default, Copy, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spacing {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Spacing {
    pub const ZERO: Spacing = Spacing::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(left: f64, right: f64, top: f64, bottom: f64) -> Self {
        Self { left, right, top, bottom }
    }

    pub const fn all(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn horizontal(&self) -> f64 {
        self.left + self.right
    }

    pub fn vertical(&self) -> f64 {
        self.top + self.bottom
    }

    pub fn top_left(&self) -> Vector2 {
        Vector2::new(self.left, self.top)
    }

    pub fn size(&self) -> Vector2 {
        Vector2::new(self.horizontal(), self.vertical())
    }
}

impl From<Spacing> for kurbo::Insets {
    fn from(spacing: Spacing) -> Self {
        kurbo::Insets::new(spacing.left, spacing.top, spacing.right, spacing.bottom)
    }
}

impl Add for Spacing {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            left: self.left + other.left,
            right: self.right + other.right,
            top: self.top + other.top,
            bottom: self.bottom + other.bottom,
        }
    }
}

impl Sub for Spacing {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            left: self.left - other.left,
            right: self.right - other.right,
            top: self.top - other.top,
            bottom: self.bottom - other.bottom,
        }
    }
}
