use crate::bounding_volume::{Aabb, BoundingSphere};
use crate::math::{Isometry, Point, Real, UnitVector};
use crate::query::sat::PolytopeView;
use crate::query::{self, Intersection, Ray, RayCast, RayIntersection};
use crate::shape::{DeferredArray, Plane, Sphere, Triangle, TriangleList};
use crate::utils::{self, SortedPair};
use hashbrown::hash_map::{Entry, HashMap};
use std::sync::{Arc, OnceLock};

/// Two unit directions closer than this (or to each other's opposite) are merged.
const DIRECTION_EPSILON: Real = 1.0e-6;
/// Triangles whose planes are closer than this belong to the same face.
const COPLANARITY_EPSILON: Real = 1.0e-6;

/// Indicated an inconsistency in the geometry of a convex hull.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum HullError {
    /// A convex hull must contain at least one triangle.
    #[error("a convex hull must contain at least one triangle.")]
    EmptyIndices,
    /// A triangle references a vertex that does not exist.
    #[error("the triangle {triangle} references the vertex {vertex} but there are only {num_vertices} vertices.")]
    VertexOutOfBounds {
        /// The faulty triangle.
        triangle: u32,
        /// The missing vertex index.
        vertex: u32,
        /// The number of vertices of the hull.
        num_vertices: u32,
    },
    /// Found a triangle with a zero area.
    #[error("the triangle {0} is degenerate.")]
    DegenerateTriangle(u32),
}

/// An edge of a convex hull between two non-coplanar faces.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub struct HullEdge {
    /// The indices of the edge endpoints.
    pub vertices: [u32; 2],
    /// The indices of the two unique faces adjacent to this edge.
    pub faces: [u32; 2],
}

/// The pose-independent topology of a convex hull.
///
/// It is shared by every transformed copy of a hull.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(PartialEq, Debug, Clone, Default)]
pub struct HullTopology {
    /// For each triangle, the index of the unique face it belongs to.
    pub triangle_faces: Vec<u32>,
    /// For each unique face, the index of one of its vertices.
    pub face_plane_points: Vec<u32>,
    /// The edges between non-coplanar faces.
    pub edges: Vec<HullEdge>,
    /// The unique faces whose normals are not parallel to another selected face normal.
    pub unique_face_directions: Vec<u32>,
    /// The edges whose directions are not parallel to another selected edge.
    pub unique_edge_directions: Vec<u32>,
}

#[derive(Debug, Clone)]
struct HullGeometry {
    topology: Arc<HullTopology>,
    face_normals: Vec<UnitVector>,
}

/// A convex polytope given by its vertices and a triangulation of its boundary.
///
/// The triangles must be wound counter-clockwise when seen from the outside.
/// The vertex and index buffers may be loaded lazily (see [`DeferredArray`]):
/// until [`ConvexHull::validate`] succeeds, the hull has no geometry and never
/// collides with anything.
///
/// Everything derived from the vertices (planes, edges, unique directions,
/// triangle list, bounding sphere) is computed on first access, exactly once,
/// and shared by every subsequent caller, including concurrent ones.
#[derive(Debug)]
pub struct ConvexHull {
    vertices: DeferredArray<Point>,
    indices: DeferredArray<[u32; 3]>,
    geometry: OnceLock<Result<HullGeometry, HullError>>,
    planes: OnceLock<Vec<Plane>>,
    edges: OnceLock<Vec<(Point, Point)>>,
    face_directions: OnceLock<Vec<UnitVector>>,
    edge_directions: OnceLock<Vec<UnitVector>>,
    triangle_list: OnceLock<TriangleList>,
    bounding_sphere: OnceLock<BoundingSphere>,
    local_aabb: OnceLock<Aabb>,
}

impl ConvexHull {
    /// Creates a convex hull from its vertices and counter-clockwise triangles.
    ///
    /// The topology is computed immediately; malformed data is reported as an error.
    pub fn new(vertices: Vec<Point>, indices: Vec<[u32; 3]>) -> Result<Self, HullError> {
        let hull = Self::from_deferred(vertices.into(), indices.into());
        let geometry = compute_geometry(hull.vertices.as_slice(), hull.indices.as_slice());
        let failure = geometry.as_ref().err().copied();
        let _ = hull.geometry.set(geometry);

        match failure {
            Some(err) => Err(err),
            None => Ok(hull),
        }
    }

    /// Creates a convex hull whose buffers may still be loading.
    ///
    /// The consistency of the data is checked by [`ConvexHull::validate`].
    pub fn from_deferred(vertices: DeferredArray<Point>, indices: DeferredArray<[u32; 3]>) -> Self {
        ConvexHull {
            vertices,
            indices,
            geometry: OnceLock::new(),
            planes: OnceLock::new(),
            edges: OnceLock::new(),
            face_directions: OnceLock::new(),
            edge_directions: OnceLock::new(),
            triangle_list: OnceLock::new(),
            bounding_sphere: OnceLock::new(),
            local_aabb: OnceLock::new(),
        }
    }

    /// The convex hull of an axis-aligned box.
    pub fn from_aabb(aabb: &Aabb) -> Self {
        let indices = Aabb::FACES_VERTEX_IDS
            .iter()
            .flat_map(|&(a, b, c, d)| {
                [[a as u32, b as u32, c as u32], [a as u32, c as u32, d as u32]]
            })
            .collect();
        let hull = Self::from_deferred(
            aabb.vertices().to_vec().into(),
            DeferredArray::ready(indices),
        );
        let _ = hull.validate();
        hull
    }

    fn from_parts(
        vertices: Vec<Point>,
        indices: DeferredArray<[u32; 3]>,
        geometry: HullGeometry,
    ) -> Self {
        let hull = Self::from_deferred(vertices.into(), indices);
        let _ = hull.geometry.set(Ok(geometry));
        hull
    }

    /// Loads the buffers and derives the hull topology, if not done already.
    ///
    /// Returns `false` while the buffers are not available, or if they are
    /// malformed (the reason is logged).
    pub fn validate(&self) -> bool {
        if !self.vertices.validate() || !self.indices.validate() {
            return false;
        }

        let geometry = self
            .geometry
            .get_or_init(|| compute_geometry(self.vertices.as_slice(), self.indices.as_slice()));

        match geometry {
            Ok(_) => true,
            Err(err) => {
                log::debug!("Rejected malformed convex hull: {}", err);
                false
            }
        }
    }

    fn geometry(&self) -> Option<&HullGeometry> {
        self.geometry.get().and_then(|g| g.as_ref().ok())
    }

    /// Has this hull been successfully validated?
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.geometry().is_some()
    }

    /// The vertices of this hull (empty until loaded).
    #[inline]
    pub fn vertices(&self) -> &[Point] {
        self.vertices.as_slice()
    }

    /// The triangles of this hull (empty until loaded).
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        self.indices.as_slice()
    }

    /// The shared topology of this hull, once validated.
    #[inline]
    pub fn topology(&self) -> Option<&Arc<HullTopology>> {
        self.geometry().map(|g| &g.topology)
    }

    /// The normals of the unique faces of this hull (empty until validated).
    #[inline]
    pub fn face_normals(&self) -> &[UnitVector] {
        self.geometry().map(|g| &g.face_normals[..]).unwrap_or(&[])
    }

    /// The i-th triangle of this hull.
    #[inline]
    pub fn triangle(&self, i: usize) -> Triangle {
        let vtx = self.vertices();
        let idx = self.indices()[i];
        Triangle::new(
            vtx[idx[0] as usize],
            vtx[idx[1] as usize],
            vtx[idx[2] as usize],
        )
    }

    /// The outward planes of the unique faces of this hull.
    pub fn planes(&self) -> &[Plane] {
        let Some(geometry) = self.geometry() else {
            return &[];
        };

        self.planes.get_or_init(|| {
            let vtx = self.vertices();
            geometry
                .face_normals
                .iter()
                .zip(geometry.topology.face_plane_points.iter())
                .map(|(n, i)| Plane::new(*n, vtx[*i as usize]))
                .collect()
        })
    }

    /// The segments of the edges between non-coplanar faces.
    pub fn edges(&self) -> &[(Point, Point)] {
        let Some(geometry) = self.geometry() else {
            return &[];
        };

        self.edges.get_or_init(|| {
            let vtx = self.vertices();
            geometry
                .topology
                .edges
                .iter()
                .map(|e| (vtx[e.vertices[0] as usize], vtx[e.vertices[1] as usize]))
                .collect()
        })
    }

    /// The face normals of this hull, without duplicate or opposite directions.
    pub fn face_directions(&self) -> &[UnitVector] {
        let Some(geometry) = self.geometry() else {
            return &[];
        };

        self.face_directions.get_or_init(|| {
            geometry
                .topology
                .unique_face_directions
                .iter()
                .map(|i| geometry.face_normals[*i as usize])
                .collect()
        })
    }

    /// The edge directions of this hull, without duplicate or opposite directions.
    pub fn edge_directions(&self) -> &[UnitVector] {
        let Some(geometry) = self.geometry() else {
            return &[];
        };

        self.edge_directions.get_or_init(|| {
            let vtx = self.vertices();
            geometry
                .topology
                .unique_edge_directions
                .iter()
                .filter_map(|i| {
                    let e = &geometry.topology.edges[*i as usize];
                    edge_direction(vtx, e)
                })
                .collect()
        })
    }

    /// The triangles of this hull, once validated.
    pub fn triangle_list(&self) -> Option<&TriangleList> {
        let _ = self.geometry()?;
        Some(
            self.triangle_list
                .get_or_init(|| TriangleList::from_indexed(self.vertices(), self.indices())),
        )
    }

    /// A sphere enclosing this hull, centered on the vertex centroid.
    pub fn bounding_sphere(&self) -> Option<&BoundingSphere> {
        let _ = self.geometry()?;
        Some(
            self.bounding_sphere
                .get_or_init(|| BoundingSphere::from_points(self.vertices())),
        )
    }

    /// The axis-aligned box enclosing this hull.
    ///
    /// This is [`Aabb::new_invalid`] until the hull is validated.
    pub fn local_aabb(&self) -> Aabb {
        if self.geometry().is_none() {
            return Aabb::new_invalid();
        }

        *self
            .local_aabb
            .get_or_init(|| Aabb::from_points(self.vertices().iter().copied()))
    }

    /// The view of this hull used by the separating-axis tests.
    #[inline]
    pub fn polytope_view(&self) -> PolytopeView<'_> {
        PolytopeView {
            vertices: if self.is_valid() { self.vertices() } else { &[] },
            face_directions: self.face_directions(),
            edge_directions: self.edge_directions(),
        }
    }

    /// Is `pt` strictly on the negative side of every face plane?
    pub fn contains_point(&self, pt: &Point) -> bool {
        let planes = self.planes();
        !planes.is_empty() && planes.iter().all(|p| p.signed_distance(pt) < 0.0)
    }

    /// This hull moved by `m`.
    ///
    /// The result shares the topology of `self`. Returns `None` if `self` is
    /// not validated yet.
    pub fn transform_by(&self, m: &Isometry) -> Option<ConvexHull> {
        let geometry = self.geometry()?;
        let vertices = self.vertices().iter().map(|pt| m * pt).collect();
        let transformed = HullGeometry {
            topology: geometry.topology.clone(),
            face_normals: geometry.face_normals.iter().map(|n| m * n).collect(),
        };

        Some(Self::from_parts(vertices, self.indices.clone(), transformed))
    }

    /// Computes the penetration of an oriented box positioned by `pos12` relative to `self`.
    #[inline]
    pub fn collide_box(&self, other: &Aabb, pos12: &Isometry) -> Option<Intersection> {
        query::details::contact_hull_aabb(pos12, self, other)
    }

    /// Computes the penetration of another hull positioned by `pos12` relative to `self`.
    #[inline]
    pub fn collide_hull(&self, other: &ConvexHull, pos12: &Isometry) -> Option<Intersection> {
        query::details::contact_hull_hull(pos12, self, other)
    }

    /// Computes the penetration of a sphere positioned by `pos12` relative to `self`.
    #[inline]
    pub fn collide_sphere(&self, other: &Sphere, pos12: &Isometry) -> Option<Intersection> {
        query::details::contact_hull_sphere(pos12, self, other)
    }

    /// The nearest intersection between `ray` and this hull.
    #[inline]
    pub fn ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        self.cast_local_ray(ray, Real::MAX, false)
    }
}

impl Clone for ConvexHull {
    fn clone(&self) -> Self {
        let hull = Self::from_deferred(self.vertices.clone(), self.indices.clone());
        if let Some(geometry) = self.geometry.get() {
            let _ = hull.geometry.set(geometry.clone());
        }
        hull
    }
}

fn edge_direction(vertices: &[Point], edge: &HullEdge) -> Option<UnitVector> {
    let a = vertices[edge.vertices[0] as usize];
    let b = vertices[edge.vertices[1] as usize];
    UnitVector::try_new(b - a, 0.0)
}

fn is_parallel_to_any(dir: &UnitVector, selected: &[UnitVector]) -> bool {
    selected
        .iter()
        .any(|s| s.dot(dir).abs() >= 1.0 - DIRECTION_EPSILON)
}

fn compute_geometry(vertices: &[Point], indices: &[[u32; 3]]) -> Result<HullGeometry, HullError> {
    if indices.is_empty() {
        return Err(HullError::EmptyIndices);
    }

    let mut triangle_faces = Vec::with_capacity(indices.len());
    let mut face_plane_points: Vec<u32> = Vec::new();
    let mut face_normals: Vec<UnitVector> = Vec::new();

    for (t, idx) in indices.iter().enumerate() {
        for vertex in idx {
            if *vertex as usize >= vertices.len() {
                return Err(HullError::VertexOutOfBounds {
                    triangle: t as u32,
                    vertex: *vertex,
                    num_vertices: vertices.len() as u32,
                });
            }
        }

        let pts = idx.map(|i| vertices[i as usize]);
        let normal = utils::ccw_face_normal([&pts[0], &pts[1], &pts[2]])
            .ok_or(HullError::DegenerateTriangle(t as u32))?;

        // Merge coplanar triangles into a single face.
        let existing = face_normals.iter().zip(face_plane_points.iter()).position(|(n, p)| {
            n.dot(&normal) >= 1.0 - DIRECTION_EPSILON
                && (pts[0] - vertices[*p as usize]).dot(n).abs() <= COPLANARITY_EPSILON
        });

        match existing {
            Some(face) => triangle_faces.push(face as u32),
            None => {
                triangle_faces.push(face_normals.len() as u32);
                face_plane_points.push(idx[0]);
                face_normals.push(normal);
            }
        }
    }

    // Collect the faces adjacent to each edge, keeping the first-seen order.
    let mut edge_faces: HashMap<SortedPair<u32>, usize> = HashMap::new();
    let mut adjacency: Vec<(SortedPair<u32>, [u32; 2])> = Vec::new();

    for (t, idx) in indices.iter().enumerate() {
        let face = triangle_faces[t];

        for k in 0..3 {
            let key = SortedPair::new(idx[k], idx[(k + 1) % 3]);

            match edge_faces.entry(key) {
                Entry::Occupied(e) => adjacency[*e.get()].1[1] = face,
                Entry::Vacant(e) => {
                    let _ = e.insert(adjacency.len());
                    adjacency.push((key, [face, face]));
                }
            }
        }
    }

    let edges: Vec<HullEdge> = adjacency
        .into_iter()
        .filter(|(_, faces)| faces[0] != faces[1])
        .map(|(key, faces)| {
            let (a, b) = *key;
            HullEdge {
                vertices: [a, b],
                faces,
            }
        })
        .collect();

    let mut unique_face_directions = Vec::new();
    let mut selected = Vec::new();
    for (i, n) in face_normals.iter().enumerate() {
        if !is_parallel_to_any(n, &selected) {
            unique_face_directions.push(i as u32);
            selected.push(*n);
        }
    }

    let mut unique_edge_directions = Vec::new();
    selected.clear();
    for (i, e) in edges.iter().enumerate() {
        if let Some(dir) = edge_direction(vertices, e) {
            if !is_parallel_to_any(&dir, &selected) {
                unique_edge_directions.push(i as u32);
                selected.push(dir);
            }
        }
    }

    Ok(HullGeometry {
        topology: Arc::new(HullTopology {
            triangle_faces,
            face_plane_points,
            edges,
            unique_face_directions,
            unique_edge_directions,
        }),
        face_normals,
    })
}
