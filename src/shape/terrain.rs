use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Isometry, Point, Real, Vector};
use crate::query::{Intersection, Ray, RayIntersection};
use crate::shape::mesh_contact::{surface_polytope_contact, surface_sphere_contact};
use crate::shape::{ConvexHull, DeferredArray, Plane, Sphere, Triangle, TriangleList};
use std::ops::Range;
use std::sync::OnceLock;

/// Indicated an inconsistency in the description of a terrain.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq)]
pub enum TerrainError {
    /// A terrain needs at least two samples along each axis.
    #[error("a terrain needs at least 2x2 height samples, got {rows}x{cols}.")]
    TooFewSamples {
        /// The number of rows of samples.
        rows: usize,
        /// The number of columns of samples.
        cols: usize,
    },
    /// The cell dimensions must be strictly positive.
    #[error("invalid terrain cell size {0}x{1}.")]
    InvalidCellSize(Real, Real),
    /// The height buffer does not match the grid dimensions.
    #[error("expected {expected} height samples, found {found}.")]
    HeightCountMismatch {
        /// The number of samples of the grid.
        expected: usize,
        /// The number of samples of the height buffer.
        found: usize,
    },
}

/// A regular-grid height field, with `z` pointing up.
///
/// The samples are stored row-major: the sample at row `i` and column `j`
/// is the vertex `origin + (j * dx, i * dy, heights[i * cols + j])`. Each
/// grid cell is split into two counter-clockwise triangles facing up.
///
/// Queries never look at the whole grid: the rectangle of cells under the
/// bounding box of the query is computed first, and only the triangles of
/// that patch are built and tested.
#[derive(Debug, Clone)]
pub struct Terrain {
    heights: DeferredArray<Real>,
    rows: usize,
    cols: usize,
    cell_size: (Real, Real),
    origin: Point,
    local_aabb: OnceLock<Aabb>,
}

impl Terrain {
    /// Creates a terrain from its height samples.
    pub fn new(
        heights: Vec<Real>,
        rows: usize,
        cols: usize,
        cell_size: (Real, Real),
        origin: Point,
    ) -> Result<Self, TerrainError> {
        let expected = rows * cols;
        if heights.len() != expected && rows >= 2 && cols >= 2 {
            return Err(TerrainError::HeightCountMismatch {
                expected,
                found: heights.len(),
            });
        }

        Self::from_deferred(heights.into(), rows, cols, cell_size, origin)
    }

    /// Creates a terrain whose height samples may still be loading.
    ///
    /// The length of the height buffer is checked by [`Terrain::validate`].
    pub fn from_deferred(
        heights: DeferredArray<Real>,
        rows: usize,
        cols: usize,
        cell_size: (Real, Real),
        origin: Point,
    ) -> Result<Self, TerrainError> {
        if rows < 2 || cols < 2 {
            return Err(TerrainError::TooFewSamples { rows, cols });
        }

        if !(cell_size.0 > 0.0 && cell_size.1 > 0.0) {
            return Err(TerrainError::InvalidCellSize(cell_size.0, cell_size.1));
        }

        Ok(Terrain {
            heights,
            rows,
            cols,
            cell_size,
            origin,
            local_aabb: OnceLock::new(),
        })
    }

    /// Loads the height samples if they are not available yet.
    ///
    /// Returns `false` while loading, or if the buffer has the wrong size.
    pub fn validate(&self) -> bool {
        if !self.heights.validate() {
            return false;
        }

        let found = self.heights.as_slice().len();
        if found != self.rows * self.cols {
            log::debug!(
                "Rejected terrain: {}",
                TerrainError::HeightCountMismatch {
                    expected: self.rows * self.cols,
                    found,
                }
            );
            return false;
        }

        true
    }

    fn samples(&self) -> Option<&[Real]> {
        self.heights
            .get()
            .filter(|heights| heights.len() == self.rows * self.cols)
    }

    /// The number of rows of samples (along `y`).
    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// The number of columns of samples (along `x`).
    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The size of a cell along `x` and `y`.
    #[inline]
    pub fn cell_size(&self) -> (Real, Real) {
        self.cell_size
    }

    /// The position of the first sample.
    #[inline]
    pub fn origin(&self) -> &Point {
        &self.origin
    }

    fn vertex(&self, heights: &[Real], i: usize, j: usize) -> Point {
        Point::new(
            self.origin.x + j as Real * self.cell_size.0,
            self.origin.y + i as Real * self.cell_size.1,
            self.origin.z + heights[i * self.cols + j],
        )
    }

    /// The axis-aligned box enclosing this terrain, invalid until loaded.
    pub fn local_aabb(&self) -> Aabb {
        let Some(heights) = self.samples() else {
            return Aabb::new_invalid();
        };

        *self.local_aabb.get_or_init(|| {
            let (min_h, max_h) = heights
                .iter()
                .fold((Real::MAX, -Real::MAX), |(min, max), h| (min.min(*h), max.max(*h)));
            let extents = Vector::new(
                (self.cols - 1) as Real * self.cell_size.0,
                (self.rows - 1) as Real * self.cell_size.1,
                0.0,
            );
            Aabb::new(
                self.origin + Vector::z() * min_h,
                self.origin + extents + Vector::z() * max_h,
            )
        })
    }

    /// The ranges of cell rows and cell columns overlapped by `aabb` on the `xy` plane.
    ///
    /// Returns `None` if `aabb` is entirely outside of the grid.
    pub fn cell_range(&self, aabb: &Aabb) -> Option<(Range<usize>, Range<usize>)> {
        let (dx, dy) = self.cell_size;
        let max_i = self.rows - 2;
        let max_j = self.cols - 2;

        let to_cell = |coord: Real, origin: Real, size: Real| ((coord - origin) / size).floor();
        let j0 = to_cell(aabb.mins.x, self.origin.x, dx);
        let j1 = to_cell(aabb.maxs.x, self.origin.x, dx);
        let i0 = to_cell(aabb.mins.y, self.origin.y, dy);
        let i1 = to_cell(aabb.maxs.y, self.origin.y, dy);

        if j1 < 0.0 || i1 < 0.0 || j0 > max_j as Real || i0 > max_i as Real {
            return None;
        }

        let clamp = |c: Real, max: usize| (c.max(0.0) as usize).min(max);
        Some((
            clamp(i0, max_i)..clamp(i1, max_i) + 1,
            clamp(j0, max_j)..clamp(j1, max_j) + 1,
        ))
    }

    /// The two triangles of the cell at row `i` and column `j`.
    pub fn cell_triangles(&self, i: usize, j: usize) -> Option<[Triangle; 2]> {
        let heights = self.samples()?;

        if i + 1 >= self.rows || j + 1 >= self.cols {
            return None;
        }

        let p00 = self.vertex(heights, i, j);
        let p01 = self.vertex(heights, i, j + 1);
        let p10 = self.vertex(heights, i + 1, j);
        let p11 = self.vertex(heights, i + 1, j + 1);

        Some([Triangle::new(p00, p01, p11), Triangle::new(p00, p11, p10)])
    }

    /// The triangles of the cells under `aabb`.
    pub fn patch(&self, aabb: &Aabb) -> TriangleList {
        let mut patch = TriangleList::default();

        if let Some((rows, cols)) = self.cell_range(aabb) {
            for i in rows {
                for j in cols.clone() {
                    if let Some(tris) = self.cell_triangles(i, j) {
                        patch.triangles.extend(tris);
                    }
                }
            }
        }

        patch
    }

    /// The height of the surface at `(x, y)`, `None` outside of the grid.
    pub fn height_at(&self, x: Real, y: Real) -> Option<Real> {
        let heights = self.samples()?;
        let (dx, dy) = self.cell_size;
        let fx = (x - self.origin.x) / dx;
        let fy = (y - self.origin.y) / dy;

        if fx < 0.0 || fy < 0.0 || fx > (self.cols - 1) as Real || fy > (self.rows - 1) as Real {
            return None;
        }

        let j = (fx.floor() as usize).min(self.cols - 2);
        let i = (fy.floor() as usize).min(self.rows - 2);
        let u = fx - j as Real;
        let v = fy - i as Real;

        let h = |i: usize, j: usize| heights[i * self.cols + j];
        let (h00, h01, h10, h11) = (h(i, j), h(i, j + 1), h(i + 1, j), h(i + 1, j + 1));

        // Interpolate on the triangle of the cell containing the point.
        let height = if u >= v {
            h00 + u * (h01 - h00) + v * (h11 - h01)
        } else {
            h00 + v * (h10 - h00) + u * (h11 - h10)
        };

        Some(self.origin.z + height)
    }

    fn collide_polytope(
        &self,
        pos12: &Isometry,
        planes: &[Plane],
        vertices: &[Point],
        local_aabb: &Aabb,
    ) -> Option<Intersection> {
        let query = local_aabb.transform_by(pos12);
        let patch = self.patch(&query);

        if patch.is_empty() {
            return None;
        }

        surface_polytope_contact(&patch, pos12, planes, vertices, |pt| self.height_at(pt.x, pt.y))
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

    /// The nearest intersection between `ray` and the terrain surface.
    ///
    /// Only the cells under the part of the ray crossing the terrain bounds are tested.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<RayIntersection> {
        let aabb = self.local_aabb();
        if !aabb.is_valid() {
            return None;
        }

        // Flat terrains have flat bounds: thicken them so the slab test still works.
        let (tmin, tmax) = aabb.loosened(1.0e-6).ray_intersect(ray);
        if tmin > tmax || tmax < 0.0 {
            return None;
        }

        let segment = Aabb::from_two_points(ray.point_at(tmin.max(0.0)), ray.point_at(tmax));
        self.patch(&segment).ray_intersection(ray)
    }
}

/// The six outward face planes of an axis-aligned box.
pub(crate) fn aabb_planes(aabb: &Aabb) -> [Plane; 6] {
    [
        Plane::new(Vector::x_axis(), aabb.maxs),
        Plane::new(-Vector::x_axis(), aabb.mins),
        Plane::new(Vector::y_axis(), aabb.maxs),
        Plane::new(-Vector::y_axis(), aabb.mins),
        Plane::new(Vector::z_axis(), aabb.maxs),
        Plane::new(-Vector::z_axis(), aabb.mins),
    ]
}
