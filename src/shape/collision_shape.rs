use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::{Isometry, Real};
use crate::query::{self, Intersection, Ray, RayCast, RayIntersection};
use crate::shape::{ConvexHull, ParallelPlanes, Sphere, Terrain, TriangleList};
use std::sync::Arc;

/// The primitive shapes a collision hierarchy node can hold.
///
/// Heavy geometry (hulls and meshes) is shared through `Arc`: the same
/// hull may be used by many bodies at once.
#[derive(Debug, Clone)]
pub enum CollisionShape {
    /// An oriented box, given in the local-space of its owner.
    Box(Aabb),
    /// A sphere.
    Sphere(Sphere),
    /// A convex polytope.
    Hull(Arc<ConvexHull>),
    /// A regular height field.
    Terrain(Arc<Terrain>),
    /// An arbitrary triangulated surface.
    Planes(Arc<ParallelPlanes>),
}

impl CollisionShape {
    /// Loads the deferred geometry of this shape, if any.
    ///
    /// Returns `false` until every buffer is available and well-formed.
    pub fn validate(&self) -> bool {
        match self {
            CollisionShape::Box(_) | CollisionShape::Sphere(_) => true,
            CollisionShape::Hull(hull) => hull.validate(),
            CollisionShape::Terrain(terrain) => terrain.validate(),
            CollisionShape::Planes(planes) => planes.validate(),
        }
    }

    /// The axis-aligned box enclosing this shape in its local-space.
    ///
    /// This is [`Aabb::new_invalid`] while the geometry is not loaded.
    pub fn local_aabb(&self) -> Aabb {
        match self {
            CollisionShape::Box(aabb) => *aabb,
            CollisionShape::Sphere(sphere) => sphere.local_aabb(),
            CollisionShape::Hull(hull) => hull.local_aabb(),
            CollisionShape::Terrain(terrain) => terrain.local_aabb(),
            CollisionShape::Planes(planes) => planes.local_aabb(),
        }
    }

    /// The radius of the smallest sphere centered at the local origin enclosing this shape.
    pub fn bounding_radius(&self) -> Real {
        match self {
            CollisionShape::Sphere(sphere) => sphere.center.coords.norm() + sphere.radius,
            _ => {
                let aabb = self.local_aabb();
                if !aabb.is_valid() {
                    return 0.0;
                }

                aabb.vertices()
                    .iter()
                    .map(|v| v.coords.norm())
                    .fold(0.0, Real::max)
            }
        }
    }

    /// A sphere enclosing this shape, `None` while the geometry is not loaded.
    pub fn bounding_sphere(&self) -> Option<BoundingSphere> {
        match self {
            CollisionShape::Sphere(sphere) => Some(sphere.bounding_sphere()),
            CollisionShape::Hull(hull) => hull.bounding_sphere().copied(),
            _ => {
                let aabb = self.local_aabb();
                aabb.is_valid().then(|| aabb.bounding_sphere())
            }
        }
    }

    /// The triangles of a surface shape lying under `aabb`.
    ///
    /// Returns `None` for volumetric shapes.
    pub fn surface_patch(&self, aabb: &Aabb) -> Option<TriangleList> {
        match self {
            CollisionShape::Terrain(terrain) => Some(terrain.patch(aabb)),
            CollisionShape::Planes(planes) => Some(planes.patch(aabb)),
            _ => None,
        }
    }

    /// Is this shape a triangulated surface?
    #[inline]
    pub fn is_surface(&self) -> bool {
        matches!(self, CollisionShape::Terrain(_) | CollisionShape::Planes(_))
    }

    /// Cheap overlap test between this shape and `other` positioned by `pos12`.
    ///
    /// This compares bounding volumes only: it may report overlaps where
    /// [`CollisionShape::collide`] finds none, but never misses one.
    pub fn intersects(&self, other: &CollisionShape, pos12: &Isometry) -> bool {
        let aabb1 = self.local_aabb();
        let aabb2 = other.local_aabb();

        if !aabb1.is_valid() || !aabb2.is_valid() {
            return false;
        }

        aabb1.overlaps(&aabb2.transform_by(pos12))
    }

    /// Computes the intersection with `other` positioned by `pos12`, in the
    /// local-space of `self`.
    #[inline]
    pub fn collide(&self, other: &CollisionShape, pos12: &Isometry) -> Option<Intersection> {
        query::contact(pos12, self, other)
    }

    /// The nearest intersection between `ray` and this shape.
    ///
    /// A ray starting inside of a volume reports its exit point.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        match self {
            CollisionShape::Box(aabb) => aabb.cast_local_ray(ray, Real::MAX, false),
            CollisionShape::Sphere(sphere) => sphere.ray_intersection(ray),
            CollisionShape::Hull(hull) => hull.ray_intersection(ray),
            CollisionShape::Terrain(terrain) => terrain.ray_intersection(ray),
            CollisionShape::Planes(planes) => planes.ray_intersection(ray),
        }
    }
}

impl From<Aabb> for CollisionShape {
    fn from(aabb: Aabb) -> Self {
        CollisionShape::Box(aabb)
    }
}

impl From<Sphere> for CollisionShape {
    fn from(sphere: Sphere) -> Self {
        CollisionShape::Sphere(sphere)
    }
}

impl From<ConvexHull> for CollisionShape {
    fn from(hull: ConvexHull) -> Self {
        CollisionShape::Hull(Arc::new(hull))
    }
}

impl From<Terrain> for CollisionShape {
    fn from(terrain: Terrain) -> Self {
        CollisionShape::Terrain(Arc::new(terrain))
    }
}

impl From<ParallelPlanes> for CollisionShape {
    fn from(planes: ParallelPlanes) -> Self {
        CollisionShape::Planes(Arc::new(planes))
    }
}

#[cfg(test)]
mod test {
    use super::CollisionShape;
    use crate::bounding_volume::Aabb;
    use crate::math::{Isometry, Point, Vector};
    use crate::shape::{ConvexHull, Sphere, Terrain};

    #[test]
    fn bounding_radius_about_the_origin() {
        let sphere = CollisionShape::from(Sphere::new(Point::new(3.0, 0.0, 4.0), 1.0));
        assert_relative_eq!(sphere.bounding_radius(), 6.0);

        let cube = Aabb::from_half_extents(Point::origin(), Vector::repeat(1.0));
        let cube = CollisionShape::from(cube);
        assert_relative_eq!(cube.bounding_radius(), 3.0f64.sqrt());
    }

    #[test]
    fn box_on_terrain() {
        let terrain = CollisionShape::from(
            Terrain::new(vec![0.0; 16], 4, 4, (1.0, 1.0), Point::origin()).unwrap(),
        );
        let cube = CollisionShape::from(ConvexHull::from_aabb(&Aabb::from_half_extents(
            Point::origin(),
            Vector::repeat(0.5),
        )));
        let pos12 = Isometry::translation(1.5, 1.5, 0.3);

        assert!(terrain.intersects(&cube, &pos12));
        let inter = terrain.collide(&cube, &pos12).unwrap();
        assert_relative_eq!(inter.depth, 0.2, epsilon = 1.0e-9);
        assert_relative_eq!(*inter.normal, -Vector::z(), epsilon = 1.0e-9);

        // Same contact seen from the hull.
        let reversed = cube.collide(&terrain, &pos12.inverse()).unwrap();
        assert_relative_eq!(reversed.depth, 0.2, epsilon = 1.0e-9);
        assert_relative_eq!(*reversed.normal, Vector::z(), epsilon = 1.0e-9);
    }

    #[test]
    fn box_shape_ray_reports_exit_from_inside() {
        let cube = Aabb::from_half_extents(Point::origin(), Vector::repeat(1.0));
        let cube = CollisionShape::from(cube);
        let hit = cube
            .ray_intersection(&crate::query::Ray::new(Point::origin(), Vector::x()))
            .unwrap();
        assert_relative_eq!(hit.time_of_impact, 1.0);
    }

    #[test]
    fn unloaded_shapes_never_intersect() {
        let hull = CollisionShape::from(ConvexHull::from_deferred(
            crate::shape::DeferredArray::deferred(std::sync::Arc::new(|| None::<Vec<Point>>)),
            vec![[0, 1, 2]].into(),
        ));
        let sphere = CollisionShape::from(Sphere::new(Point::origin(), 10.0));

        assert!(!hull.validate());
        assert!(!sphere.intersects(&hull, &Isometry::identity()));
        assert!(sphere.collide(&hull, &Isometry::identity()).is_none());
    }
}
