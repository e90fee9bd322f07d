//! Planar geometry in normalized frame coordinates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to `other`.
    pub fn distance(&self, other: &Point) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Axis-aligned box, `min` corner inclusive of the smallest coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub min_x: f32,
    pub min_y: f32,
    pub max_x: f32,
    pub max_y: f32,
}

impl BoundingBox {
    /// Smallest box containing every point, `None` for an empty iterator.
    pub fn enclosing<I>(points: I) -> Option<Self>
    where
        I: IntoIterator<Item = Point>,
    {
        let mut points = points.into_iter();
        let first = points.next()?;
        let seed = Self {
            min_x: first.x,
            min_y: first.y,
            max_x: first.x,
            max_y: first.y,
        };

        Some(points.fold(seed, |b, p| Self {
            min_x: b.min_x.min(p.x),
            min_y: b.min_y.min(p.y),
            max_x: b.max_x.max(p.x),
            max_y: b.max_y.max(p.y),
        }))
    }

    pub fn center(&self) -> Point {
        Point::new((self.min_x + self.max_x) / 2.0, (self.min_y + self.max_y) / 2.0)
    }

    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f32 {
        self.max_y - self.min_y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(0.3, 0.4);
        assert!((a.distance(&b) - 0.5).abs() < 1e-6);
        assert_eq!(a.distance(&a), 0.0);
    }

    #[test]
    fn enclosing_box_spans_all_points() {
        let bbox = BoundingBox::enclosing([
            Point::new(0.4, 0.1),
            Point::new(0.42, 0.11),
            Point::new(0.38, 0.09),
            Point::new(0.35, 0.15),
            Point::new(0.45, 0.15),
        ])
        .unwrap();

        assert_eq!(bbox.min_x, 0.35);
        assert_eq!(bbox.max_x, 0.45);
        assert_eq!(bbox.min_y, 0.09);
        assert_eq!(bbox.max_y, 0.15);

        let c = bbox.center();
        assert!((c.x - 0.40).abs() < 1e-6);
        assert!((c.y - 0.12).abs() < 1e-6);
        assert!((bbox.width() - 0.10).abs() < 1e-6);
    }

    #[test]
    fn enclosing_nothing_is_none() {
        assert!(BoundingBox::enclosing(std::iter::empty()).is_none());
    }

    #[test]
    fn single_point_box_is_degenerate() {
        let bbox = BoundingBox::enclosing([Point::new(0.2, 0.7)]).unwrap();
        assert_eq!(bbox.width(), 0.0);
        assert_eq!(bbox.height(), 0.0);
        assert_eq!(bbox.center(), Point::new(0.2, 0.7));
    }
}
