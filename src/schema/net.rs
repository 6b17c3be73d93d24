//! Geometry primitives: contour points, closed contours, and flattened nets.

use serde::{Deserialize, Serialize};

/// A 2D point in the flattening plane.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance(&self, other: &Point) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// An ordered, closed polygon boundary.
///
/// The closing edge from the last point back to the first is implicit;
/// callers never repeat the first point.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Total boundary length, including the implicit closing edge.
    pub fn perimeter(&self) -> f64 {
        let n = self.points.len();
        if n < 2 {
            return 0.0;
        }
        (0..n)
            .map(|i| self.points[i].distance(&self.points[(i + 1) % n]))
            .sum()
    }

    /// Shoelace area; positive for counter-clockwise winding.
    pub fn signed_area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let mut acc = 0.0;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            acc += a.x * b.y - b.x * a.y;
        }
        acc * 0.5
    }

    /// Area of the convex hull of the contour's points (Andrew monotone
    /// chain). Zero for degenerate input.
    pub fn convex_hull_area(&self) -> f64 {
        let mut pts = self.points.clone();
        if pts.len() < 3 {
            return 0.0;
        }
        pts.sort_by(|a, b| a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)));
        pts.dedup();

        fn cross(o: Point, a: Point, b: Point) -> f64 {
            (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
        }

        let mut lower: Vec<Point> = Vec::new();
        for &p in &pts {
            while lower.len() >= 2 && cross(lower[lower.len() - 2], lower[lower.len() - 1], p) <= 0.0
            {
                lower.pop();
            }
            lower.push(p);
        }
        let mut upper: Vec<Point> = Vec::new();
        for &p in pts.iter().rev() {
            while upper.len() >= 2 && cross(upper[upper.len() - 2], upper[upper.len() - 1], p) <= 0.0
            {
                upper.pop();
            }
            upper.push(p);
        }
        lower.pop();
        upper.pop();
        lower.extend(upper);
        Contour::new(lower).signed_area().abs()
    }

    /// Resample the contour to `n` points spaced uniformly along its arc
    /// length. Returns `None` if the contour is degenerate (fewer than 3
    /// points or zero perimeter).
    pub fn resample(&self, n: usize) -> Option<Vec<Point>> {
        let count = self.points.len();
        if count < 3 || n < 3 {
            return None;
        }
        let perimeter = self.perimeter();
        if perimeter <= 0.0 {
            return None;
        }

        let step = perimeter / n as f64;
        let mut out = Vec::with_capacity(n);
        let mut edge = 0usize;
        let mut edge_start = self.points[0];
        let mut edge_end = self.points[1 % count];
        let mut edge_len = edge_start.distance(&edge_end);
        let mut walked = 0.0;

        for i in 0..n {
            let target = i as f64 * step;
            // Advance along edges until the target arc length falls inside
            // the current edge. Zero-length edges are skipped outright.
            while walked + edge_len < target || edge_len == 0.0 {
                walked += edge_len;
                edge += 1;
                edge_start = self.points[edge % count];
                edge_end = self.points[(edge + 1) % count];
                edge_len = edge_start.distance(&edge_end);
            }
            let t = if edge_len > 0.0 {
                (target - walked) / edge_len
            } else {
                0.0
            };
            out.push(Point::new(
                edge_start.x + (edge_end.x - edge_start.x) * t,
                edge_start.y + (edge_end.y - edge_start.y) * t,
            ));
        }
        Some(out)
    }
}

/// Immutable view of one flattened net, as produced by the unfolding engine
/// for a single genome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Net {
    /// Boundary polygon of the flattened arrangement, already projected
    /// into the flattening plane.
    pub boundary: Contour,
    /// Number of mesh faces in the net.
    pub face_count: usize,
}

impl Net {
    pub fn new(boundary: Contour, face_count: usize) -> Self {
        Self {
            boundary,
            face_count,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Contour {
        Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 1.0),
        ])
    }

    #[test]
    fn square_perimeter_and_area() {
        let square = unit_square();
        assert!((square.perimeter() - 4.0).abs() < 1e-12);
        assert!((square.signed_area() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn clockwise_square_has_negative_area() {
        let mut square = unit_square();
        square.points.reverse();
        assert!(square.signed_area() < 0.0);
    }

    #[test]
    fn resample_preserves_point_count_and_shape() {
        let square = unit_square();
        let pts = square.resample(16).unwrap();
        assert_eq!(pts.len(), 16);
        // Every resampled point lies on the square's boundary.
        for p in &pts {
            let on_edge = (p.x.abs() < 1e-9 || (p.x - 1.0).abs() < 1e-9)
                || (p.y.abs() < 1e-9 || (p.y - 1.0).abs() < 1e-9);
            assert!(on_edge, "point {:?} not on boundary", p);
        }
        // First resampled point is the contour start.
        assert!((pts[0].x - 0.0).abs() < 1e-9 && (pts[0].y - 0.0).abs() < 1e-9);
    }

    #[test]
    fn hull_of_concave_polygon_is_its_bounding_square() {
        // Square with a notch cut into the top edge.
        let notched = Contour::new(vec![
            Point::new(0.0, 0.0),
            Point::new(2.0, 0.0),
            Point::new(2.0, 2.0),
            Point::new(1.0, 1.0),
            Point::new(0.0, 2.0),
        ]);
        assert!(notched.signed_area().abs() < 4.0 - 1e-9);
        assert!((notched.convex_hull_area() - 4.0).abs() < 1e-9);
    }

    #[test]
    fn degenerate_contours_do_not_resample() {
        assert!(Contour::new(vec![]).resample(10).is_none());
        assert!(
            Contour::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 0.0)])
                .resample(10)
                .is_none()
        );
        // Three coincident points: zero perimeter.
        let collapsed = Contour::new(vec![Point::default(); 3]);
        assert!(collapsed.resample(10).is_none());
    }
}
