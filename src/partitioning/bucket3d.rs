use crate::bounding_volume::Aabb;
use crate::math::{Point, Real, DIM};
use crate::utils::SortedPair;
use hashbrown::{HashMap, HashSet};
use smallvec::SmallVec;

type CellKey = [i64; DIM];

/// A uniform spatial hash used as the broad phase between moving bodies.
///
/// Every object is stored in each cell its bounding box covers. When the cell
/// size is at least the diameter of the largest object (see
/// [`Bucket3d::cell_size_for`]), an object covers at most 8 cells.
#[derive(Clone, Debug)]
pub struct Bucket3d {
    cell_size: Real,
    cells: HashMap<CellKey, SmallVec<[usize; 8]>>,
}

impl Bucket3d {
    /// Creates an empty spatial hash with the given cell size.
    ///
    /// Non-positive or non-finite sizes are replaced by `1.0`.
    pub fn new(cell_size: Real) -> Self {
        let cell_size = if cell_size.is_finite() && cell_size > 0.0 {
            cell_size
        } else {
            1.0
        };

        Bucket3d {
            cell_size,
            cells: HashMap::new(),
        }
    }

    /// The cell size picked for a set of objects bounded by `extent`, the
    /// largest of them having a radius of `max_radius`.
    ///
    /// This is `max(2 * max_radius, extent / 16)`.
    pub fn cell_size_for(max_radius: Real, extent: &Aabb) -> Real {
        let longest_side = if extent.is_valid() {
            extent.extents().max()
        } else {
            0.0
        };
        (2.0 * max_radius).max(longest_side / 16.0)
    }

    /// The edge length of the cells.
    #[inline]
    pub fn cell_size(&self) -> Real {
        self.cell_size
    }

    /// The number of non-empty cells.
    #[inline]
    pub fn num_cells(&self) -> usize {
        self.cells.len()
    }

    /// Removes every object, keeping the cell size.
    pub fn clear(&mut self) {
        self.cells.clear();
    }

    fn cell_of(&self, pt: &Point) -> CellKey {
        let mut key = [0; DIM];
        for (i, k) in key.iter_mut().enumerate() {
            *k = (pt[i] / self.cell_size).floor() as i64;
        }
        key
    }

    /// Inserts the object `id` bounded by `aabb`.
    ///
    /// Returns the number of cells it landed in.
    pub fn insert(&mut self, id: usize, aabb: &Aabb) -> usize {
        let mins = self.cell_of(&aabb.mins);
        let maxs = self.cell_of(&aabb.maxs);
        let mut count = 0;

        for x in mins[0]..=maxs[0] {
            for y in mins[1]..=maxs[1] {
                for z in mins[2]..=maxs[2] {
                    self.cells.entry([x, y, z]).or_default().push(id);
                    count += 1;
                }
            }
        }

        count
    }

    /// Calls `f` once for each pair of objects sharing at least one cell.
    pub fn for_each_pair(&self, mut f: impl FnMut(usize, usize)) {
        let mut seen = HashSet::new();

        for ids in self.cells.values() {
            for (k, id1) in ids.iter().enumerate() {
                for id2 in &ids[k + 1..] {
                    if id1 != id2 && seen.insert(SortedPair::new(*id1, *id2)) {
                        let (a, b) = *SortedPair::new(*id1, *id2);
                        f(a, b);
                    }
                }
            }
        }
    }

    /// Collects each pair of objects sharing at least one cell, smallest
    /// index first.
    pub fn pairs(&self) -> Vec<(usize, usize)> {
        let mut result = Vec::new();
        self.for_each_pair(|a, b| result.push((a, b)));
        result
    }
}

#[cfg(test)]
mod test {
    use super::Bucket3d;
    use crate::bounding_volume::Aabb;
    use crate::math::{Point, Vector};

    #[test]
    fn small_objects_land_in_at_most_eight_cells() {
        let mut buckets = Bucket3d::new(2.0);
        let aabb = Aabb::from_half_extents(Point::new(2.0, 2.0, 2.0), Vector::repeat(0.9));
        assert_eq!(buckets.insert(0, &aabb), 8);

        let aabb = Aabb::from_half_extents(Point::new(1.0, 1.0, 1.0), Vector::repeat(0.5));
        assert_eq!(buckets.insert(1, &aabb), 1);
    }

    #[test]
    fn pairs_are_reported_once() {
        let mut buckets = Bucket3d::new(1.0);
        let a = Aabb::new(Point::new(0.0, 0.0, 0.0), Point::new(1.5, 1.5, 1.5));
        let b = Aabb::new(Point::new(1.2, 1.2, 1.2), Point::new(1.8, 1.8, 1.8));
        let c = Aabb::new(Point::new(5.0, 5.0, 5.0), Point::new(5.5, 5.5, 5.5));
        let _ = buckets.insert(0, &a);
        let _ = buckets.insert(1, &b);
        let _ = buckets.insert(2, &c);

        assert_eq!(buckets.pairs(), vec![(0, 1)]);
    }

    #[test]
    fn cell_size_heuristic() {
        let extent = Aabb::new(Point::origin(), Point::new(160.0, 10.0, 10.0));
        assert_eq!(Bucket3d::cell_size_for(1.0, &extent), 10.0);
        assert_eq!(Bucket3d::cell_size_for(8.0, &extent), 16.0);
        assert_eq!(Bucket3d::new(-1.0).cell_size(), 1.0);
    }
}
