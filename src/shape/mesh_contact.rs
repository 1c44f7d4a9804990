//! Contacts between a triangulated surface patch and the convex shapes.
//!
//! Every function here works in the space of the surface and returns
//! intersections with the surface as "this" shape: the normal points down
//! into the surface, opposite to the triangle normals.

use crate::math::{Isometry, Point, Real, UnitVector, Vector};
use crate::query::{Intersection, Ray};
use crate::shape::{Plane, TriangleList};

/// Contact between a surface patch and a convex polytope positioned by `pos12`.
///
/// The patch is moved into the space of the polytope and clipped by its
/// planes. If nothing remains but the polytope center lies below the
/// surface (as given by `height_at`), the polytope is buried: the depth is
/// then the distance from its lowest vertex up to the surface.
pub(crate) fn surface_polytope_contact(
    patch: &TriangleList,
    pos12: &Isometry,
    planes: &[Plane],
    vertices: &[Point],
    height_at: impl Fn(&Point) -> Option<Real>,
) -> Option<Intersection> {
    if vertices.is_empty() || planes.is_empty() {
        return None;
    }

    let local_patch = patch.transform_by(&pos12.inverse());

    if let Some(inter) = local_patch.collide_polytope(planes, vertices) {
        return Some(inter.transform_by(pos12));
    }

    let center = pos12 * crate::utils::center(vertices);
    let height = height_at(&center)?;

    if center.z >= height {
        return None;
    }

    let lowest = vertices
        .iter()
        .map(|v| (pos12 * v).z)
        .fold(Real::MAX, Real::min);
    let depth = height - lowest;

    Some(Intersection::new(
        Point::new(center.x, center.y, height),
        -Vector::z_axis(),
        depth,
    ))
}

/// Contact between a surface patch and a sphere centered at `center` (in
/// the space of the surface).
///
/// Each triangle is tested with an extended ray cast from the center along
/// the opposite of its normal: a hit inside of the triangle gives the
/// signed height of the center above it, even when the center is below the
/// surface. Edges and vertices are covered by the closest point of the
/// patch. The deepest of all these penetrations wins.
pub(crate) fn surface_sphere_contact(
    patch: &TriangleList,
    center: &Point,
    radius: Real,
) -> Option<Intersection> {
    let mut deepest = closest_feature_contact(patch, center, radius);

    for tri in patch {
        let Some(normal) = tri.normal() else {
            continue;
        };

        let ray = Ray::new(*center, -*normal);
        if let Some(hit) = tri.extended_ray_intersection(&ray) {
            let height = hit.time_of_impact;
            let depth = radius - height;

            if depth > 0.0 && deepest.map(|d| depth > d.depth).unwrap_or(true) {
                let point = center - *normal * ((height + radius) * 0.5);
                deepest = Some(Intersection::new(point, -normal, depth));
            }
        }
    }

    deepest
}

/// Contact between the sphere and the point of the patch closest to its center.
fn closest_feature_contact(
    patch: &TriangleList,
    center: &Point,
    radius: Real,
) -> Option<Intersection> {
    let (closest, distance) = patch
        .iter()
        .map(|tri| {
            let pt = tri.closest_point(center).0;
            (pt, na::distance(&pt, center))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))?;

    if distance >= radius {
        return None;
    }

    let dir = UnitVector::try_new(center - closest, 0.0)?;
    let deepest_sphere = center - *dir * radius;

    Some(Intersection::new(
        na::center(&closest, &deepest_sphere),
        -dir,
        radius - distance,
    ))
}

/// The height of the surface vertically above or below `pt`, if any.
pub(crate) fn surface_height_at(patch: &TriangleList, pt: &Point) -> Option<Real> {
    let ray = Ray::new(*pt, -Vector::z());

    patch
        .iter()
        .filter_map(|tri| tri.extended_ray_intersection(&ray))
        .map(|hit| hit.point.z)
        .max_by(|a, b| a.total_cmp(b))
}
