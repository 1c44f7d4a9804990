use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use crate::query::sat::{axis_penetration, Penetration};

/// Edge cross products shorter than this are considered degenerate.
const DEGENERATE_AXIS_EPSILON: Real = 1.0e-9;

/// A borrowed description of a convex polytope, as seen by the SAT.
///
/// Only the *unique* face and edge directions are needed: antiparallel
/// and duplicate directions yield the same candidate axes.
#[derive(Copy, Clone, Debug)]
pub struct PolytopeView<'a> {
    /// The vertices of the polytope.
    pub vertices: &'a [Point],
    /// The unique face normals of the polytope.
    pub face_directions: &'a [UnitVector],
    /// The unique edge directions of the polytope.
    pub edge_directions: &'a [UnitVector],
}

impl PolytopeView<'_> {
    /// Projects the vertices on `axis`, returning the `[min, max]` interval.
    #[inline]
    pub fn project(&self, axis: &Vector) -> (Real, Real) {
        self.vertices
            .iter()
            .map(|pt| pt.coords.dot(axis))
            .fold((Real::MAX, -Real::MAX), |(min, max), p| {
                (min.min(p), max.max(p))
            })
    }

    /// Projects the vertices, transformed by `pos`, on `axis`.
    #[inline]
    fn project_transformed(&self, pos: &Isometry, axis: &Vector) -> (Real, Real) {
        let local_axis = pos.inverse_transform_vector(axis);
        let offset = pos.translation.vector.dot(axis);
        let (min, max) = self.project(&local_axis);
        (min + offset, max + offset)
    }
}

/// Finds the axis of minimum penetration between two convex polytopes.
///
/// `poly1` is expressed in its own local-space and `poly2` is positioned
/// relative to it by `pos12`. The candidate axes are the face directions
/// of both polytopes and the cross products of every pair of their edge
/// directions. Returns `None` if any axis separates them, or if either
/// polytope has no vertex.
pub fn polytope_polytope_penetration(
    poly1: &PolytopeView,
    poly2: &PolytopeView,
    pos12: &Isometry,
) -> Option<Penetration> {
    if poly1.vertices.is_empty() || poly2.vertices.is_empty() {
        return None;
    }

    let mut best = None;
    let mut test_axis = |axis: &UnitVector| {
        let interval1 = poly1.project(axis);
        let interval2 = poly2.project_transformed(pos12, axis);
        axis_penetration(axis, interval1, interval2).map(|pen| pen.keep_shallowest(&mut best))
    };

    for axis in poly1.face_directions {
        test_axis(axis)?;
    }

    for axis in poly2.face_directions {
        test_axis(&(pos12 * axis))?;
    }

    for edge2 in poly2.edge_directions {
        let edge2 = pos12 * edge2;

        for edge1 in poly1.edge_directions {
            if let Some(axis) = UnitVector::try_new(edge1.cross(&edge2), DEGENERATE_AXIS_EPSILON) {
                test_axis(&axis)?;
            }
        }
    }

    best
}

#[cfg(test)]
mod test {
    use super::{polytope_polytope_penetration, PolytopeView};
    use crate::bounding_volume::Aabb;
    use crate::math::{Isometry, Point, Vector};

    #[test]
    fn boxes_as_polytopes() {
        let vertices =
            Aabb::new(Point::new(-1.0, -1.0, -1.0), Point::new(1.0, 1.0, 1.0)).vertices();
        let axes = [Vector::x_axis(), Vector::y_axis(), Vector::z_axis()];
        let view = PolytopeView {
            vertices: &vertices,
            face_directions: &axes,
            edge_directions: &axes,
        };

        let near = Isometry::translation(0.0, 1.5, 0.0);
        let pen = polytope_polytope_penetration(&view, &view, &near).unwrap();
        assert_relative_eq!(pen.depth, 0.5);
        assert_relative_eq!(*pen.normal, -Vector::y());

        let far = Isometry::translation(0.0, 2.5, 0.0);
        assert!(polytope_polytope_penetration(&view, &view, &far).is_none());
    }
}
