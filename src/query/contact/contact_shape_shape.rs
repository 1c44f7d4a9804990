use crate::math::Isometry;
use crate::query::Intersection;
use crate::shape::CollisionShape;

/// Runs `f` with the roles of both shapes swapped, and expresses its result
/// back from the point of view of the first shape.
///
/// `f` receives `pos21`, the position of the first shape in the local-space
/// of the second one.
#[inline]
pub fn contact_reversed(
    pos12: &Isometry,
    f: impl FnOnce(&Isometry) -> Option<Intersection>,
) -> Option<Intersection> {
    f(&pos12.inverse()).map(|inter| inter.transform_by(pos12).flipped())
}

/// Computes the intersection between two shapes, `g2` being positioned by
/// `pos12` in the local-space of `g1`.
///
/// The result is expressed in the local-space of `g1`, with a normal
/// pointing from `g2` toward `g1`. Shapes whose geometry is not loaded yet
/// never intersect anything.
pub fn contact(pos12: &Isometry, g1: &CollisionShape, g2: &CollisionShape) -> Option<Intersection> {
    use CollisionShape::*;

    match (g1, g2) {
        (Box(a), Box(b)) => a.collide(b, pos12),
        (Box(a), Sphere(b)) => a.collide_sphere(b, pos12),
        (Box(a), Hull(b)) => contact_reversed(pos12, |pos21| b.collide_box(a, pos21)),
        (Box(a), Terrain(b)) => contact_reversed(pos12, |pos21| b.collide_box(a, pos21)),
        (Box(a), Planes(b)) => contact_reversed(pos12, |pos21| b.collide_box(a, pos21)),

        (Sphere(a), Box(b)) => a.collide_box(b, pos12),
        (Sphere(a), Sphere(b)) => a.collide_sphere(b, pos12),
        (Sphere(a), Hull(b)) => contact_reversed(pos12, |pos21| b.collide_sphere(a, pos21)),
        (Sphere(a), Terrain(b)) => contact_reversed(pos12, |pos21| b.collide_sphere(a, pos21)),
        (Sphere(a), Planes(b)) => contact_reversed(pos12, |pos21| b.collide_sphere(a, pos21)),

        (Hull(a), Box(b)) => a.collide_box(b, pos12),
        (Hull(a), Sphere(b)) => a.collide_sphere(b, pos12),
        (Hull(a), Hull(b)) => a.collide_hull(b, pos12),
        (Hull(a), Terrain(b)) => contact_reversed(pos12, |pos21| b.collide_hull(a, pos21)),
        (Hull(a), Planes(b)) => contact_reversed(pos12, |pos21| b.collide_hull(a, pos21)),

        (Terrain(a), Box(b)) => a.collide_box(b, pos12),
        (Terrain(a), Sphere(b)) => a.collide_sphere(b, pos12),
        (Terrain(a), Hull(b)) => a.collide_hull(b, pos12),
        (Planes(a), Box(b)) => a.collide_box(b, pos12),
        (Planes(a), Sphere(b)) => a.collide_sphere(b, pos12),
        (Planes(a), Hull(b)) => a.collide_hull(b, pos12),

        (Terrain(_) | Planes(_), Terrain(_) | Planes(_)) => contact_surface_surface(pos12, g1, g2),
    }
}

/// Contact between two triangulated surfaces.
///
/// Only the parts of each surface under the bounds of the other are tested.
/// Surfaces have no volume: the depth of the result is zero.
fn contact_surface_surface(
    pos12: &Isometry,
    g1: &CollisionShape,
    g2: &CollisionShape,
) -> Option<Intersection> {
    let patch1 = g1.surface_patch(&g2.local_aabb().transform_by(pos12))?;
    let patch2 = g2.surface_patch(&g1.local_aabb().transform_by(&pos12.inverse()))?;

    if patch1.is_empty() || patch2.is_empty() {
        return None;
    }

    patch1.collide_triangle_list(&patch2, pos12)
}
