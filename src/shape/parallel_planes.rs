use crate::bounding_volume::Aabb;
use crate::math::{Isometry, Point, Real};
use crate::partitioning::RTree;
use crate::query::{Intersection, Ray, RayIntersection};
use crate::shape::mesh_contact::{
    surface_height_at, surface_polytope_contact, surface_sphere_contact,
};
use crate::shape::terrain::aabb_planes;
use crate::shape::{ConvexHull, DeferredArray, Plane, Sphere, TriangleList};
use std::sync::OnceLock;

/// Indicated an inconsistency in the description of a planar mesh.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParallelPlanesError {
    /// The mesh has no triangle.
    #[error("a planar mesh must contain at least one triangle.")]
    EmptyIndices,
    /// A triangle references a vertex that does not exist.
    #[error("the triangle {triangle} references the vertex {vertex} but there are only {num_vertices} vertices.")]
    VertexOutOfBounds {
        /// The faulty triangle.
        triangle: u32,
        /// The missing vertex index.
        vertex: u32,
        /// The number of vertices of the mesh.
        num_vertices: u32,
    },
}

/// An arbitrary triangulated surface with `z` pointing up.
///
/// Unlike [`Terrain`](crate::shape::Terrain), the vertices need not lie on a
/// grid. Queries select their candidate triangles with an [`RTree`] of the
/// triangle bounding boxes, built on first use.
#[derive(Debug, Clone)]
pub struct ParallelPlanes {
    vertices: DeferredArray<Point>,
    indices: DeferredArray<[u32; 3]>,
    checked: OnceLock<Result<(), ParallelPlanesError>>,
    triangle_list: OnceLock<TriangleList>,
    tree: OnceLock<RTree<u32>>,
    local_aabb: OnceLock<Aabb>,
}

impl ParallelPlanes {
    /// Creates a planar mesh from its vertices and counter-clockwise triangles.
    pub fn new(vertices: Vec<Point>, indices: Vec<[u32; 3]>) -> Result<Self, ParallelPlanesError> {
        let mesh = Self::from_deferred(vertices.into(), indices.into());
        let checked = check_indices(mesh.vertices.as_slice(), mesh.indices.as_slice());
        let _ = mesh.checked.set(checked);
        checked.map(|_| mesh)
    }

    /// Creates a planar mesh whose buffers may still be loading.
    ///
    /// The consistency of the data is checked by [`ParallelPlanes::validate`].
    pub fn from_deferred(vertices: DeferredArray<Point>, indices: DeferredArray<[u32; 3]>) -> Self {
        ParallelPlanes {
            vertices,
            indices,
            checked: OnceLock::new(),
            triangle_list: OnceLock::new(),
            tree: OnceLock::new(),
            local_aabb: OnceLock::new(),
        }
    }

    /// Loads the buffers if they are not available yet.
    ///
    /// Returns `false` while loading, or if the triangles reference missing vertices.
    pub fn validate(&self) -> bool {
        if !self.vertices.validate() || !self.indices.validate() {
            return false;
        }

        let checked = self
            .checked
            .get_or_init(|| check_indices(self.vertices.as_slice(), self.indices.as_slice()));

        match checked {
            Ok(()) => true,
            Err(err) => {
                log::debug!("Rejected planar mesh: {}", err);
                false
            }
        }
    }

    /// Has this mesh been successfully validated?
    #[inline]
    pub fn is_valid(&self) -> bool {
        matches!(self.checked.get(), Some(Ok(())))
    }

    /// The vertices of this mesh (empty until loaded).
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        self.vertices.as_slice()
    }

    /// The triangles of this mesh (empty until loaded).
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        self.indices.as_slice()
    }

    /// The triangles of this mesh, once validated.
    pub fn triangle_list(&self) -> Option<&TriangleList> {
        if !self.is_valid() {
            return None;
        }

        Some(
            self.triangle_list
                .get_or_init(|| TriangleList::from_indexed(self.vertices(), self.indices())),
        )
    }

    /// The spatial index of the triangles, once validated.
    ///
    /// The value associated to each box is the index of its triangle.
    pub fn rtree(&self) -> Option<&RTree<u32>> {
        let triangles = self.triangle_list()?;

        Some(self.tree.get_or_init(|| {
            let items = triangles
                .iter()
                .enumerate()
                .map(|(i, tri)| (tri.local_aabb(), i as u32))
                .collect();
            RTree::bulk_load(items)
        }))
    }

    /// The axis-aligned box enclosing this mesh, invalid until validated.
    pub fn local_aabb(&self) -> Aabb {
        match self.triangle_list() {
            Some(triangles) => *self.local_aabb.get_or_init(|| triangles.local_aabb()),
            None => Aabb::new_invalid(),
        }
    }

    /// The triangles whose bounding boxes overlap `aabb`.
    pub fn patch(&self, aabb: &Aabb) -> TriangleList {
        let (Some(triangles), Some(tree)) = (self.triangle_list(), self.rtree()) else {
            return TriangleList::default();
        };

        let mut patch = TriangleList::default();
        tree.for_each_overlapping(aabb, |_, i| patch.push(triangles.triangles[*i as usize]));
        patch
    }

    /// The height of the highest part of the surface vertically above or below `(x, y)`.
    pub fn height_at(&self, x: Real, y: Real) -> Option<Real> {
        let column = Aabb::new(Point::new(x, y, -Real::MAX), Point::new(x, y, Real::MAX));
        let pt = Point::new(x, y, 0.0);
        surface_height_at(&self.patch(&column), &pt)
    }

    fn collide_polytope(
        &self,
        pos12: &Isometry,
        planes: &[Plane],
        vertices: &[Point],
        local_aabb: &Aabb,
    ) -> Option<Intersection> {
        let patch = self.patch(&local_aabb.transform_by(pos12));

        if patch.is_empty() {
            return None;
        }

        surface_polytope_contact(&patch, pos12, planes, vertices, |pt| {
            surface_height_at(&patch, pt)
        })
    }

    /// Computes the penetration of a convex hull positioned by `pos12` relative to `self`.
    pub fn collide_hull(&self, hull: &ConvexHull, pos12: &Isometry) -> Option<Intersection> {
        self.collide_polytope(pos12, hull.planes(), hull.vertices(), &hull.local_aabb())
    }

    /// Computes the penetration of an oriented box positioned by `pos12` relative to `self`.
    pub fn collide_box(&self, aabb: &Aabb, pos12: &Isometry) -> Option<Intersection> {
        self.collide_polytope(pos12, &aabb_planes(aabb), &aabb.vertices(), aabb)
    }

    /// Computes the penetration of a sphere positioned by `pos12` relative to `self`.
    pub fn collide_sphere(&self, sphere: &Sphere, pos12: &Isometry) -> Option<Intersection> {
        let sphere = sphere.transform_by(pos12);
        let patch = self.patch(&sphere.local_aabb());
        surface_sphere_contact(&patch, &sphere.center, sphere.radius)
    }

    /// The nearest intersection between `ray` and this mesh.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        let (Some(triangles), Some(tree)) = (self.triangle_list(), self.rtree()) else {
            return None;
        };

        let mut best: Option<RayIntersection> = None;
        tree.for_each_ray_candidate(ray, Real::MAX, |_, i| {
            let hit = triangles.triangles[*i as usize].ray_intersection(ray);
            if let Some(hit) = hit {
                if best.map(|b| hit.time_of_impact < b.time_of_impact).unwrap_or(true) {
                    best = Some(hit);
                }
            }
        });

        best
    }
}

fn check_indices(vertices: &[Point], indices: &[[u32; 3]]) -> Result<(), ParallelPlanesError> {
    if indices.is_empty() {
        return Err(ParallelPlanesError::EmptyIndices);
    }

    for (t, idx) in indices.iter().enumerate() {
        if let Some(vertex) = idx.iter().find(|v| **v as usize >= vertices.len()) {
            return Err(ParallelPlanesError::VertexOutOfBounds {
                triangle: t as u32,
                vertex: *vertex,
                num_vertices: vertices.len() as u32,
            });
        }
    }

    Ok(())
}
