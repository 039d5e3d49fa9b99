//! Convex polygon primitive with exact area and clipping operations.
//!
//! Polygons store their vertices counter-clockwise together with the center
//! they were constructed around, so rotation and scaling stay anchored to the
//! originating shape rather than the coordinate origin.

use nalgebra::{Point2, Rotation2, Vector2};

/// Areas below this are treated as degenerate when clipping
const AREA_EPSILON: f64 = 1e-12;

/// A convex polygon with counter-clockwise vertex order and a tracked center.
#[derive(Debug, Clone, PartialEq)]
pub struct ConvexPolygon {
    vertices: Vec<Point2<f64>>,
    center: Point2<f64>,
}

impl ConvexPolygon {
    /// Create a polygon from counter-clockwise vertices and the center point
    /// rotations and scalings should be anchored to.
    pub fn from_vertices(vertices: Vec<Point2<f64>>, center: Point2<f64>) -> Self {
        Self { vertices, center }
    }

    /// The empty polygon (zero area, no vertices).
    pub fn empty() -> Self {
        Self {
            vertices: Vec::new(),
            center: Point2::origin(),
        }
    }

    pub fn vertices(&self) -> &[Point2<f64>] {
        &self.vertices
    }

    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    /// Polygon area via the shoelace formula.
    ///
    /// Always non-negative; degenerate polygons (fewer than 3 vertices or
    /// collinear vertices) have area 0.
    pub fn area(&self) -> f64 {
        if self.vertices.len() < 3 {
            return 0.0;
        }
        let mut twice_area = 0.0;
        for (i, a) in self.vertices.iter().enumerate() {
            let b = &self.vertices[(i + 1) % self.vertices.len()];
            twice_area += a.x * b.y - b.x * a.y;
        }
        (twice_area / 2.0).abs()
    }

    /// Exact intersection with another convex polygon via Sutherland-Hodgman
    /// clipping.
    ///
    /// Both operands must be convex with counter-clockwise vertex order. The
    /// result may be empty when the polygons are disjoint. A degenerate
    /// operand (zero area) always yields the empty polygon.
    pub fn intersection(&self, clip: &ConvexPolygon) -> ConvexPolygon {
        if self.area() < AREA_EPSILON || clip.area() < AREA_EPSILON {
            return ConvexPolygon::empty();
        }

        let mut output = self.vertices.clone();
        for (i, edge_start) in clip.vertices.iter().enumerate() {
            let edge_end = &clip.vertices[(i + 1) % clip.vertices.len()];
            let input = std::mem::take(&mut output);
            if input.is_empty() {
                break;
            }

            for (j, current) in input.iter().enumerate() {
                let next = &input[(j + 1) % input.len()];
                let current_inside = is_inside(edge_start, edge_end, current);
                let next_inside = is_inside(edge_start, edge_end, next);

                if current_inside {
                    output.push(*current);
                    if !next_inside {
                        output.push(edge_line_intersection(edge_start, edge_end, current, next));
                    }
                } else if next_inside {
                    output.push(edge_line_intersection(edge_start, edge_end, current, next));
                }
            }
        }

        if output.len() < 3 {
            return ConvexPolygon::empty();
        }
        let center = vertex_mean(&output);
        ConvexPolygon::from_vertices(output, center)
    }

    /// Area of the overlap with another convex polygon.
    pub fn intersection_area(&self, clip: &ConvexPolygon) -> f64 {
        self.intersection(clip).area()
    }

    /// Translate every vertex (and the center) by the given displacement.
    pub fn translate(&mut self, delta: Vector2<f64>) {
        for vertex in &mut self.vertices {
            *vertex += delta;
        }
        self.center += delta;
    }

    /// Rotate the polygon counter-clockwise about its own center.
    pub fn rotate_about_center(&mut self, angle_deg: f64) {
        let rotation = Rotation2::new(angle_deg.to_radians());
        for vertex in &mut self.vertices {
            *vertex = self.center + rotation * (*vertex - self.center);
        }
    }

    /// Scale the polygon about its own center, independently per axis.
    pub fn scale_about_center(&mut self, sx: f64, sy: f64) {
        for vertex in &mut self.vertices {
            let offset = *vertex - self.center;
            *vertex = self.center + Vector2::new(offset.x * sx, offset.y * sy);
        }
    }
}

/// Whether `point` lies on the inner side of the directed edge `a -> b`
/// (left of the edge for counter-clockwise polygons). Points exactly on the
/// edge count as inside.
fn is_inside(a: &Point2<f64>, b: &Point2<f64>, point: &Point2<f64>) -> bool {
    let edge = b - a;
    let offset = point - a;
    edge.x * offset.y - edge.y * offset.x >= 0.0
}

/// Intersection of segment `p1 -> p2` with the infinite line through
/// `a -> b`. Only called when the segment endpoints straddle the line, so the
/// denominator is never zero.
fn edge_line_intersection(
    a: &Point2<f64>,
    b: &Point2<f64>,
    p1: &Point2<f64>,
    p2: &Point2<f64>,
) -> Point2<f64> {
    let edge = b - a;
    let d1 = edge.x * (p1.y - a.y) - edge.y * (p1.x - a.x);
    let d2 = edge.x * (p2.y - a.y) - edge.y * (p2.x - a.x);
    let t = d1 / (d1 - d2);
    p1 + (p2 - p1) * t
}

fn vertex_mean(vertices: &[Point2<f64>]) -> Point2<f64> {
    let sum = vertices
        .iter()
        .fold(Vector2::zeros(), |acc, v| acc + v.coords);
    Point2::from(sum / vertices.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn unit_square_at(x: f64, y: f64) -> ConvexPolygon {
        ConvexPolygon::from_vertices(
            vec![
                Point2::new(x, y),
                Point2::new(x + 1.0, y),
                Point2::new(x + 1.0, y + 1.0),
                Point2::new(x, y + 1.0),
            ],
            Point2::new(x + 0.5, y + 0.5),
        )
    }

    #[test]
    fn test_square_area() {
        assert_relative_eq!(unit_square_at(0.0, 0.0).area(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_degenerate_area() {
        assert_eq!(ConvexPolygon::empty().area(), 0.0);
        let line = ConvexPolygon::from_vertices(
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(1.0, 0.0),
                Point2::new(2.0, 0.0),
            ],
            Point2::new(1.0, 0.0),
        );
        assert_eq!(line.area(), 0.0);
    }

    #[test]
    fn test_intersection_overlapping_squares() {
        let a = unit_square_at(0.0, 0.0);
        let b = unit_square_at(0.5, 0.5);
        assert_relative_eq!(a.intersection_area(&b), 0.25, epsilon = 1e-12);
    }

    #[test]
    fn test_intersection_disjoint() {
        let a = unit_square_at(0.0, 0.0);
        let b = unit_square_at(5.0, 5.0);
        assert_eq!(a.intersection_area(&b), 0.0);
    }

    #[test]
    fn test_intersection_contained() {
        let outer = ConvexPolygon::from_vertices(
            vec![
                Point2::new(-2.0, -2.0),
                Point2::new(2.0, -2.0),
                Point2::new(2.0, 2.0),
                Point2::new(-2.0, 2.0),
            ],
            Point2::origin(),
        );
        let inner = unit_square_at(-0.5, -0.5);
        assert_relative_eq!(outer.intersection_area(&inner), 1.0, epsilon = 1e-12);
        assert_relative_eq!(inner.intersection_area(&outer), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_intersection_commutative_area() {
        let a = unit_square_at(0.0, 0.0);
        let b = unit_square_at(0.25, -0.75);
        assert_relative_eq!(
            a.intersection_area(&b),
            b.intersection_area(&a),
            epsilon = 1e-12
        );
    }

    #[test]
    fn test_translate_preserves_area() {
        let mut square = unit_square_at(0.0, 0.0);
        square.translate(Vector2::new(3.0, -7.0));
        assert_relative_eq!(square.area(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(square.center().x, 3.5, epsilon = 1e-12);
        assert_relative_eq!(square.center().y, -6.5, epsilon = 1e-12);

        // Every vertex carries the same displacement
        let reference = unit_square_at(3.0, -7.0);
        for (moved, expected) in square.vertices().iter().zip(reference.vertices()) {
            assert_relative_eq!(moved.x, expected.x, epsilon = 1e-12);
            assert_relative_eq!(moved.y, expected.y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_rotation_moves_vertices_rigidly() {
        let mut square = unit_square_at(2.0, 2.0);
        let distances_before: Vec<f64> = square
            .vertices()
            .iter()
            .map(|v| (v - square.center()).norm())
            .collect();

        square.rotate_about_center(90.0);

        // A quarter turn maps each vertex onto the previous one's distance
        // ring; distances to the center are unchanged
        for (vertex, before) in square.vertices().iter().zip(&distances_before) {
            assert_relative_eq!((vertex - square.center()).norm(), before, epsilon = 1e-12);
        }
        assert_relative_eq!(square.vertices()[0].x, 3.0, epsilon = 1e-12);
        assert_relative_eq!(square.vertices()[0].y, 2.0, epsilon = 1e-12);
    }

    #[test]
    fn test_rotation_preserves_area_and_center() {
        let mut square = unit_square_at(2.0, 2.0);
        square.rotate_about_center(37.0);
        assert_relative_eq!(square.area(), 1.0, epsilon = 1e-12);
        assert_relative_eq!(square.center().x, 2.5, epsilon = 1e-12);
        assert_relative_eq!(square.center().y, 2.5, epsilon = 1e-12);
    }

    #[test]
    fn test_scale_about_center() {
        let mut square = unit_square_at(0.0, 0.0);
        square.scale_about_center(2.0, 3.0);
        assert_relative_eq!(square.area(), 6.0, epsilon = 1e-12);
        assert_relative_eq!(square.center().x, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_intersection_with_degenerate_is_empty() {
        let square = unit_square_at(0.0, 0.0);
        let point_like = ConvexPolygon::from_vertices(
            vec![Point2::new(0.5, 0.5); 4],
            Point2::new(0.5, 0.5),
        );
        assert_eq!(square.intersection_area(&point_like), 0.0);
        assert_eq!(point_like.intersection_area(&square), 0.0);
    }
}
