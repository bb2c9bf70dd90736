//! Axis-aligned hit regions for cards and slots
//!
//! A region is defined by:
//! - center: render coordinate the region is anchored on
//! - half_size: half of the width/height (edges are inclusive)

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in viewport space
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub center: Vec2,
    pub half_size: Vec2,
}

impl Rect {
    pub fn from_center(center: Vec2, size: Vec2) -> Self {
        Self {
            center,
            half_size: size.abs() / 2.0,
        }
    }

    /// Check if a point lies inside the region (edges count as inside)
    pub fn contains_point(&self, point: Vec2) -> bool {
        let d = (point - self.center).abs();
        d.x <= self.half_size.x && d.y <= self.half_size.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rect_contains_point() {
        let rect = Rect::from_center(Vec2::new(100.0, 50.0), Vec2::new(40.0, 20.0));
        assert!(rect.contains_point(Vec2::new(100.0, 50.0)));
        assert!(rect.contains_point(Vec2::new(120.0, 60.0))); // corner is inclusive
        assert!(!rect.contains_point(Vec2::new(121.0, 50.0)));
        assert!(!rect.contains_point(Vec2::new(100.0, 39.0)));
    }
}
