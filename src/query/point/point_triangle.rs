use crate::math::Point;

/// The feature of a triangle a closest point lies on.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriangleFeature {
    /// The interior of the triangle.
    Face,
    /// The edge starting at the i-th vertex: `0 = ab`, `1 = bc`, `2 = ca`.
    Edge(u8),
    /// The i-th vertex.
    Vertex(u8),
}

/// Computes the point of the triangle `(a, b, c)` closest to `pt`.
///
/// Voronoi regions are checked in order so that the face interior wins
/// whenever the projection of `pt` lies inside of the triangle, then the
/// edges, then the vertices.
pub fn closest_point_on_triangle(
    a: &Point,
    b: &Point,
    c: &Point,
    pt: &Point,
) -> (Point, TriangleFeature) {
    let ab = b - a;
    let ac = c - a;
    let ap = pt - a;

    let d1 = ab.dot(&ap);
    let d2 = ac.dot(&ap);
    if d1 <= 0.0 && d2 <= 0.0 {
        return (*a, TriangleFeature::Vertex(0));
    }

    let bp = pt - b;
    let d3 = ab.dot(&bp);
    let d4 = ac.dot(&bp);
    if d3 >= 0.0 && d4 <= d3 {
        return (*b, TriangleFeature::Vertex(1));
    }

    let vc = d1 * d4 - d3 * d2;
    if vc <= 0.0 && d1 >= 0.0 && d3 <= 0.0 {
        let v = d1 / (d1 - d3);
        return (a + ab * v, TriangleFeature::Edge(0));
    }

    let cp = pt - c;
    let d5 = ab.dot(&cp);
    let d6 = ac.dot(&cp);
    if d6 >= 0.0 && d5 <= d6 {
        return (*c, TriangleFeature::Vertex(2));
    }

    let vb = d5 * d2 - d1 * d6;
    if vb <= 0.0 && d2 >= 0.0 && d6 <= 0.0 {
        let w = d2 / (d2 - d6);
        return (a + ac * w, TriangleFeature::Edge(2));
    }

    let va = d3 * d6 - d5 * d4;
    if va <= 0.0 && (d4 - d3) >= 0.0 && (d5 - d6) >= 0.0 {
        let w = (d4 - d3) / ((d4 - d3) + (d5 - d6));
        return (b + (c - b) * w, TriangleFeature::Edge(1));
    }

    let denom = va + vb + vc;
    if denom == 0.0 {
        // Degenerate triangle.
        return (*a, TriangleFeature::Vertex(0));
    }

    let v = vb / denom;
    let w = vc / denom;
    (a + ab * v + ac * w, TriangleFeature::Face)
}
