//! Geometry primitives
//!
//! Plain value types for positions, sizes and rectangles. Input positions are
//! `f32` window coordinates; screen and window metrics are integer pixels.

use std::ops::{Add, AddAssign, Neg, Sub};

/// A 2D vector or point in window coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector2 {
    pub x: f32,
    pub y: f32,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    /// Create a new vector
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean length
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }
}

impl Add for Vector2 {
    type Output = Vector2;

    fn add(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl AddAssign for Vector2 {
    fn add_assign(&mut self, rhs: Vector2) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl Sub for Vector2 {
    type Output = Vector2;

    fn sub(self, rhs: Vector2) -> Vector2 {
        Vector2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Neg for Vector2 {
    type Output = Vector2;

    fn neg(self) -> Vector2 {
        Vector2::new(-self.x, -self.y)
    }
}

impl From<(f32, f32)> for Vector2 {
    fn from((x, y): (f32, f32)) -> Self {
        Self::new(x, y)
    }
}

/// A 3D vector, used for motion sensor readings
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub const ZERO: Vector3 = Vector3 {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Create a new vector
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Integer point in screen pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Point2i {
    pub x: i32,
    pub y: i32,
}

impl Point2i {
    pub const ZERO: Point2i = Point2i { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

impl From<Vector2> for Point2i {
    /// Truncates toward zero, matching how pointer positions are reported as pixels
    fn from(v: Vector2) -> Self {
        Self::new(v.x as i32, v.y as i32)
    }
}

/// Integer size in screen pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Size2i {
    pub width: i32,
    pub height: i32,
}

impl Size2i {
    pub const ZERO: Size2i = Size2i {
        width: 0,
        height: 0,
    };

    pub const fn new(width: i32, height: i32) -> Self {
        Self { width, height }
    }

    /// Whether either dimension is zero or negative
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Integer rectangle in screen pixels
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rect2i {
    pub position: Point2i,
    pub size: Size2i,
}

impl Rect2i {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            position: Point2i::new(x, y),
            size: Size2i::new(width, height),
        }
    }

    /// Whether the point lies inside the rectangle (right/bottom edges exclusive)
    pub const fn contains(&self, point: Point2i) -> bool {
        point.x >= self.position.x
            && point.y >= self.position.y
            && point.x < self.position.x + self.size.width
            && point.y < self.position.y + self.size.height
    }
}

/// Float rectangle in window coordinates
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect2 {
    pub position: Vector2,
    pub size: Vector2,
}

impl Rect2 {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            position: Vector2::new(x, y),
            size: Vector2::new(width, height),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vector_arithmetic() {
        let a = Vector2::new(3.0, 4.0);
        let b = Vector2::new(1.0, 1.0);
        assert_eq!(a - b, Vector2::new(2.0, 3.0));
        assert_eq!(a + b, Vector2::new(4.0, 5.0));
        assert_eq!(-b, Vector2::new(-1.0, -1.0));
        assert_eq!(a.length(), 5.0);
    }

    #[test]
    fn test_rect_contains() {
        let rect = Rect2i::new(0, 0, 100, 50);
        assert!(rect.contains(Point2i::new(0, 0)));
        assert!(rect.contains(Point2i::new(99, 49)));
        assert!(!rect.contains(Point2i::new(100, 10)));
        assert!(!rect.contains(Point2i::new(-1, 10)));
    }
}
