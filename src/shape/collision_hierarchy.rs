//!
//! Tree of collision shapes.
//!

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Isometry, Real};
use crate::query::{Intersection, Ray, RayIntersection};
use crate::shape::CollisionShape;
use smallvec::SmallVec;

/// A tree of collision shapes sharing the same local frame.
///
/// A leaf collides through its shape. A node with children only uses its
/// own shape as a bounding volume: the children are tested only when that
/// volume overlaps the other side. Intersections are reported for each
/// colliding pair of leaves.
#[derive(Clone, Debug)]
pub struct CollisionHierarchy {
    shape: CollisionShape,
    children: Vec<CollisionHierarchy>,
}

impl CollisionHierarchy {
    /// A leaf of the hierarchy.
    pub fn new(shape: impl Into<CollisionShape>) -> Self {
        CollisionHierarchy {
            shape: shape.into(),
            children: Vec::new(),
        }
    }

    /// A node whose children are bounded by `shape`.
    pub fn with_children(
        shape: impl Into<CollisionShape>,
        children: Vec<CollisionHierarchy>,
    ) -> Self {
        CollisionHierarchy {
            shape: shape.into(),
            children,
        }
    }

    /// Adds a child to this node.
    ///
    /// The shape of this node must enclose the new child.
    pub fn push_child(&mut self, child: CollisionHierarchy) {
        self.children.push(child);
    }

    /// The shape of this node.
    #[inline]
    pub fn shape(&self) -> &CollisionShape {
        &self.shape
    }

    /// The children of this node.
    #[inline]
    pub fn children(&self) -> &[CollisionHierarchy] {
        &self.children
    }

    /// Is this node a leaf?
    #[inline]
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// The bounds of this hierarchy, given by the shape of its root.
    #[inline]
    pub fn local_aabb(&self) -> Aabb {
        self.shape.local_aabb()
    }

    /// The radius of a sphere centered at the local origin enclosing every shape of this hierarchy.
    pub fn bounding_radius(&self) -> Real {
        self.children
            .iter()
            .map(|child| child.bounding_radius())
            .fold(self.shape.bounding_radius(), Real::max)
    }

    /// Loads the deferred geometry of every shape of this hierarchy.
    ///
    /// Every shape is polled, even after one of them reported it is not
    /// ready. Returns `true` once all of them are loaded.
    pub fn validate(&self) -> bool {
        self.children
            .iter()
            .fold(self.shape.validate(), |valid, child| child.validate() && valid)
    }

    /// The number of levels of this hierarchy.
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    /// Iterates through the shapes of the leaves, depth first.
    pub fn iter_leaves(&self) -> Leaves<'_> {
        let mut stack = SmallVec::new();
        stack.push(self);
        Leaves { stack }
    }

    /// Appends to `out` the intersections between the leaves of `self` and
    /// those of `other`, positioned by `pos12` relative to `self`.
    ///
    /// Intersections are expressed in the local-space of `self`.
    pub fn collide(
        &self,
        other: &CollisionHierarchy,
        pos12: &Isometry,
        out: &mut Vec<Intersection>,
    ) {
        match (self.is_leaf(), other.is_leaf()) {
            (true, true) => out.extend(self.shape.collide(&other.shape, pos12)),
            (false, _) => {
                if self.shape.intersects(&other.shape, pos12) {
                    for child in &self.children {
                        child.collide(other, pos12, out);
                    }
                }
            }
            (true, false) => {
                if self.shape.intersects(&other.shape, pos12) {
                    for child in &other.children {
                        self.collide(child, pos12, out);
                    }
                }
            }
        }
    }

    /// The intersections between the leaves of `self` and those of `other`.
    pub fn collisions(&self, other: &CollisionHierarchy, pos12: &Isometry) -> Vec<Intersection> {
        let mut out = Vec::new();
        self.collide(other, pos12, &mut out);
        out
    }

    /// The nearest intersection between `ray` and the leaves of this hierarchy.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        if self.is_leaf() {
            return self.shape.ray_intersection(ray);
        }

        let aabb = self.local_aabb();
        if !aabb.is_valid() {
            return None;
        }

        // Flat bounds would defeat the slab test.
        let (tmin, tmax) = aabb.loosened(1.0e-6).ray_intersect(ray);
        if tmin > tmax || tmax < 0.0 {
            return None;
        }

        self.children
            .iter()
            .filter_map(|child| child.ray_intersection(ray))
            .min_by(|a, b| a.time_of_impact.total_cmp(&b.time_of_impact))
    }
}

impl From<CollisionShape> for CollisionHierarchy {
    fn from(shape: CollisionShape) -> Self {
        CollisionHierarchy::new(shape)
    }
}

/// Iterator through the leaf shapes of a [`CollisionHierarchy`].
pub struct Leaves<'a> {
    stack: SmallVec<[&'a CollisionHierarchy; 8]>,
}

impl<'a> Iterator for Leaves<'a> {
    type Item = &'a CollisionShape;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(node) = self.stack.pop() {
            if node.is_leaf() {
                return Some(&node.shape);
            }

            self.stack.extend(node.children.iter().rev());
        }

        None
    }
}

#[cfg(test)]
mod test {
    use super::CollisionHierarchy;
    use crate::bounding_volume::Aabb;
    use crate::math::{Isometry, Point, Vector};
    use crate::query::Ray;
    use crate::shape::{CollisionShape, Sphere};

    fn dumbbell() -> CollisionHierarchy {
        CollisionHierarchy::with_children(
            Aabb::new(Point::new(-3.0, -1.0, -1.0), Point::new(3.0, 1.0, 1.0)),
            vec![
                CollisionHierarchy::new(Sphere::new(Point::new(-2.0, 0.0, 0.0), 1.0)),
                CollisionHierarchy::new(Aabb::from_half_extents(
                    Point::origin(),
                    Vector::new(1.0, 0.2, 0.2),
                )),
                CollisionHierarchy::new(Sphere::new(Point::new(2.0, 0.0, 0.0), 1.0)),
            ],
        )
    }

    #[test]
    fn leaves_are_visited_in_order() {
        let tree = dumbbell();
        let kinds: Vec<_> = tree
            .iter_leaves()
            .map(|s| matches!(s, CollisionShape::Sphere(_)))
            .collect();
        assert_eq!(kinds, vec![true, false, true]);
        assert_eq!(tree.depth(), 2);
    }

    #[test]
    fn leaf_hierarchy_is_the_primitive() {
        let a = CollisionShape::from(Sphere::new(Point::origin(), 1.0));
        let b = CollisionShape::from(Aabb::from_half_extents(Point::origin(), Vector::repeat(0.5)));
        let pos12 = Isometry::translation(1.2, 0.1, 0.0);

        let direct = a.collide(&b, &pos12);
        let through_tree =
            CollisionHierarchy::new(a).collisions(&CollisionHierarchy::new(b), &pos12);
        assert_eq!(through_tree, direct.into_iter().collect::<Vec<_>>());
    }

    #[test]
    fn both_ends_hit_a_wide_box() {
        let tree = dumbbell();
        let slab = CollisionHierarchy::new(Aabb::from_half_extents(
            Point::origin(),
            Vector::new(5.0, 0.5, 0.5),
        ));
        let pos12 = Isometry::translation(0.0, 1.25, 0.0);

        // The two spheres reach y = 1, the bar only y = 0.2.
        let hits = tree.collisions(&slab, &pos12);
        assert_eq!(hits.len(), 2);
        for hit in hits {
            assert_relative_eq!(hit.depth, 0.25, epsilon = 1.0e-9);
        }
    }

    #[test]
    fn ray_keeps_the_nearest_leaf() {
        let tree = dumbbell();
        let ray = Ray::new(Point::new(10.0, 0.0, 0.0), -Vector::x());
        let hit = tree.ray_intersection(&ray).unwrap();
        assert_relative_eq!(hit.time_of_impact, 7.0, epsilon = 1.0e-9);

        let miss = Ray::new(Point::new(10.0, 5.0, 0.0), -Vector::x());
        assert!(tree.ray_intersection(&miss).is_none());
        let down = Ray::new(Point::new(0.0, 0.0, 10.0), -Vector::z());
        assert_relative_eq!(
            tree.ray_intersection(&down).unwrap().time_of_impact,
            9.8,
            epsilon = 1.0e-9
        );
    }
}
