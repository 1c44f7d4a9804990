//! An R-tree over axis-aligned bounding boxes.

use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::Real;
use crate::query::details::ray_aabb_slabs;
use crate::query::Ray;
use smallvec::SmallVec;

/// The default maximum number of entries of an R-tree node.
pub const DEFAULT_MAX_CHILDREN: usize = 8;

type TraversalStack = SmallVec<[usize; 32]>;

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
enum RTreeNodeContent<T> {
    Leaf(Vec<(Aabb, T)>),
    Internal(Vec<(Aabb, usize)>),
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct RTreeNode<T> {
    aabb: Aabb,
    content: RTreeNodeContent<T>,
}

/// A balanced tree of axis-aligned bounding boxes, each associated to a
/// user value.
///
/// Nodes are stored in a flat arena and refer to their children by index.
/// Trees can be built incrementally with [`RTree::insert`] (quadratic split)
/// or all at once with [`RTree::bulk_load`] (Sort-Tile-Recursive packing).
///
/// Queries report every value whose box overlaps the query region,
/// boundaries included, so flat boxes are never missed.
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct RTree<T> {
    nodes: Vec<RTreeNode<T>>,
    root: usize,
    max_children: usize,
    min_children: usize,
    len: usize,
}

impl<T> Default for RTree<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> RTree<T> {
    /// Creates an empty tree with at most [`DEFAULT_MAX_CHILDREN`] entries per node.
    pub fn new() -> Self {
        Self::with_max_children(DEFAULT_MAX_CHILDREN)
    }

    /// Creates an empty tree with at most `max_children` entries per node.
    ///
    /// Values smaller than 4 are raised to 4.
    pub fn with_max_children(max_children: usize) -> Self {
        let max_children = max_children.max(4);
        RTree {
            nodes: vec![RTreeNode {
                aabb: Aabb::new_invalid(),
                content: RTreeNodeContent::Leaf(Vec::new()),
            }],
            root: 0,
            max_children,
            min_children: max_children / 2,
            len: 0,
        }
    }

    /// Builds a tree from a set of boxes with the Sort-Tile-Recursive algorithm.
    pub fn bulk_load(items: Vec<(Aabb, T)>) -> Self {
        Self::bulk_load_with_max_children(items, DEFAULT_MAX_CHILDREN)
    }

    /// Builds a tree from a set of boxes with the Sort-Tile-Recursive
    /// algorithm, with at most `max_children` entries per node.
    pub fn bulk_load_with_max_children(items: Vec<(Aabb, T)>, max_children: usize) -> Self {
        let mut tree = Self::with_max_children(max_children);

        if items.is_empty() {
            return tree;
        }

        tree.len = items.len();
        tree.nodes.clear();

        let mut level: Vec<(Aabb, usize)> = str_groups(items, tree.max_children)
            .into_iter()
            .map(|group| {
                let aabb = entries_aabb(&group);
                (aabb, tree.push_node(aabb, RTreeNodeContent::Leaf(group)))
            })
            .collect();

        while level.len() > 1 {
            level = str_groups(level, tree.max_children)
                .into_iter()
                .map(|group| {
                    let aabb = entries_aabb(&group);
                    (aabb, tree.push_node(aabb, RTreeNodeContent::Internal(group)))
                })
                .collect();
        }

        tree.root = level.first().map(|(_, id)| *id).unwrap_or_default();
        tree
    }

    /// The number of values stored in this tree.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Is this tree empty?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The box enclosing every value of this tree, if it is not empty.
    pub fn root_aabb(&self) -> Option<Aabb> {
        if self.is_empty() {
            None
        } else {
            Some(self.nodes[self.root].aabb)
        }
    }

    /// The number of levels of this tree, leaves included.
    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut node = &self.nodes[self.root];

        while let RTreeNodeContent::Internal(children) = &node.content {
            match children.first() {
                Some((_, child)) => node = &self.nodes[*child],
                None => break,
            }
            depth += 1;
        }

        depth
    }

    /// Inserts a new value with the given bounding box.
    pub fn insert(&mut self, aabb: Aabb, data: T) {
        if let Some(sibling) = self.insert_rec(self.root, aabb, data) {
            let old_root = self.root;
            let aabb1 = self.nodes[old_root].aabb;
            let aabb2 = self.nodes[sibling].aabb;
            self.root = self.push_node(
                aabb1.merged(&aabb2),
                RTreeNodeContent::Internal(vec![(aabb1, old_root), (aabb2, sibling)]),
            );
        }

        self.len += 1;
    }

    /// Iterates through every value of this tree, with its box.
    pub fn iter(&self) -> impl Iterator<Item = (&Aabb, &T)> {
        self.nodes.iter().flat_map(|node| match &node.content {
            RTreeNodeContent::Leaf(entries) => entries.as_slice(),
            RTreeNodeContent::Internal(_) => &[][..],
        })
        .map(|(aabb, data)| (aabb, data))
    }

    /// Calls `f` on every value whose box overlaps `aabb`.
    pub fn for_each_overlapping<'a>(&'a self, aabb: &Aabb, mut f: impl FnMut(&'a Aabb, &'a T)) {
        self.traverse(|node_aabb| node_aabb.overlaps(aabb), |entry_aabb, data| {
            if entry_aabb.overlaps(aabb) {
                f(entry_aabb, data)
            }
        })
    }

    /// Collects every value whose box overlaps `aabb`.
    pub fn query_aabb(&self, aabb: &Aabb) -> Vec<&T> {
        let mut result = Vec::new();
        self.for_each_overlapping(aabb, |_, data| result.push(data));
        result
    }

    /// Calls `f` on every value whose box is hit by `ray` for a time of
    /// impact in `[0, max_time_of_impact]`.
    pub fn for_each_ray_candidate<'a>(
        &'a self,
        ray: &Ray,
        max_time_of_impact: Real,
        mut f: impl FnMut(&'a Aabb, &'a T),
    ) {
        let hit = |aabb: &Aabb| {
            let (tmin, tmax) = ray_aabb_slabs(aabb, ray);
            tmin <= tmax && tmax >= 0.0 && tmin <= max_time_of_impact
        };

        self.traverse(hit, |entry_aabb, data| {
            if hit(entry_aabb) {
                f(entry_aabb, data)
            }
        })
    }

    /// Collects every value whose box is hit by `ray` for a time of impact
    /// in `[0, max_time_of_impact]`.
    pub fn ray_candidates(&self, ray: &Ray, max_time_of_impact: Real) -> Vec<&T> {
        let mut result = Vec::new();
        self.for_each_ray_candidate(ray, max_time_of_impact, |_, data| result.push(data));
        result
    }

    fn traverse<'a>(
        &'a self,
        visit_node: impl Fn(&Aabb) -> bool,
        mut visit_leaf: impl FnMut(&'a Aabb, &'a T),
    ) {
        if self.is_empty() {
            return;
        }

        let mut stack = TraversalStack::new();
        stack.push(self.root);

        while let Some(id) = stack.pop() {
            let node = &self.nodes[id];

            if !visit_node(&node.aabb) {
                continue;
            }

            match &node.content {
                RTreeNodeContent::Leaf(entries) => {
                    for (aabb, data) in entries {
                        visit_leaf(aabb, data);
                    }
                }
                RTreeNodeContent::Internal(children) => {
                    stack.extend(children.iter().map(|(_, child)| *child));
                }
            }
        }
    }

    fn push_node(&mut self, aabb: Aabb, content: RTreeNodeContent<T>) -> usize {
        self.nodes.push(RTreeNode { aabb, content });
        self.nodes.len() - 1
    }

    /// Inserts into the subtree rooted at `node_id`. Returns the new sibling
    /// of `node_id` if it had to be split.
    fn insert_rec(&mut self, node_id: usize, aabb: Aabb, data: T) -> Option<usize> {
        self.nodes[node_id].aabb.merge(&aabb);

        let chosen = match &self.nodes[node_id].content {
            RTreeNodeContent::Leaf(_) => None,
            RTreeNodeContent::Internal(children) => choose_subtree(children, &aabb),
        };

        match chosen {
            None => {
                if let RTreeNodeContent::Leaf(entries) = &mut self.nodes[node_id].content {
                    entries.push((aabb, data));
                }
            }
            Some((k, child_id)) => {
                let split = self.insert_rec(child_id, aabb, data);
                let child_aabb = self.nodes[child_id].aabb;
                let sibling = split.map(|s| (self.nodes[s].aabb, s));

                if let RTreeNodeContent::Internal(children) = &mut self.nodes[node_id].content {
                    children[k].0 = child_aabb;
                    children.extend(sibling);
                }
            }
        }

        self.split_if_overflowing(node_id)
    }

    fn split_if_overflowing(&mut self, node_id: usize) -> Option<usize> {
        let num_entries = match &self.nodes[node_id].content {
            RTreeNodeContent::Leaf(entries) => entries.len(),
            RTreeNodeContent::Internal(children) => children.len(),
        };

        if num_entries <= self.max_children {
            return None;
        }

        let content = std::mem::replace(
            &mut self.nodes[node_id].content,
            RTreeNodeContent::Leaf(Vec::new()),
        );

        let ((aabb1, content1), (aabb2, content2)) = match content {
            RTreeNodeContent::Leaf(entries) => {
                let ((a1, g1), (a2, g2)) = quadratic_split(entries, self.min_children);
                (
                    (a1, RTreeNodeContent::Leaf(g1)),
                    (a2, RTreeNodeContent::Leaf(g2)),
                )
            }
            RTreeNodeContent::Internal(children) => {
                let ((a1, g1), (a2, g2)) = quadratic_split(children, self.min_children);
                (
                    (a1, RTreeNodeContent::Internal(g1)),
                    (a2, RTreeNodeContent::Internal(g2)),
                )
            }
        };

        self.nodes[node_id] = RTreeNode {
            aabb: aabb1,
            content: content1,
        };
        Some(self.push_node(aabb2, content2))
    }
}

fn enlargement(aabb: &Aabb, added: &Aabb) -> Real {
    aabb.merged(added).volume() - aabb.volume()
}

fn entries_aabb<E>(entries: &[(Aabb, E)]) -> Aabb {
    entries
        .iter()
        .fold(Aabb::new_invalid(), |aabb, (entry, _)| aabb.merged(entry))
}

/// Picks the child needing the least enlargement to contain `aabb`, ties
/// broken by the smallest volume.
fn choose_subtree(children: &[(Aabb, usize)], aabb: &Aabb) -> Option<(usize, usize)> {
    children
        .iter()
        .enumerate()
        .min_by(|(_, (a, _)), (_, (b, _))| {
            enlargement(a, aabb)
                .total_cmp(&enlargement(b, aabb))
                .then(a.volume().total_cmp(&b.volume()))
        })
        .map(|(k, (_, child))| (k, *child))
}

/// Guttman's quadratic split.
fn quadratic_split<E>(
    mut entries: Vec<(Aabb, E)>,
    min_children: usize,
) -> ((Aabb, Vec<(Aabb, E)>), (Aabb, Vec<(Aabb, E)>)) {
    // Seeds: the pair wasting the most volume when grouped together.
    let mut seeds = (0, 1);
    let mut worst_waste = -Real::MAX;

    for i in 0..entries.len() {
        for j in i + 1..entries.len() {
            let (a, b) = (&entries[i].0, &entries[j].0);
            let waste = a.merged(b).volume() - a.volume() - b.volume();

            if waste > worst_waste {
                worst_waste = waste;
                seeds = (i, j);
            }
        }
    }

    // seeds.0 < seeds.1, so removing seeds.1 first leaves seeds.0 in place.
    let seed2 = entries.swap_remove(seeds.1);
    let seed1 = entries.swap_remove(seeds.0);
    let mut groups = [(seed1.0, vec![seed1]), (seed2.0, vec![seed2])];

    while !entries.is_empty() {
        if let Some(starving) = groups
            .iter()
            .position(|(_, group)| group.len() + entries.len() <= min_children)
        {
            let (aabb, group) = &mut groups[starving];
            for entry in entries.drain(..) {
                aabb.merge(&entry.0);
                group.push(entry);
            }
            break;
        }

        let next = entries
            .iter()
            .enumerate()
            .max_by(|(_, (a, _)), (_, (b, _))| {
                let pref_a = (enlargement(&groups[0].0, a) - enlargement(&groups[1].0, a)).abs();
                let pref_b = (enlargement(&groups[0].0, b) - enlargement(&groups[1].0, b)).abs();
                pref_a.total_cmp(&pref_b)
            })
            .map(|(k, _)| k)
            .unwrap_or_default();
        let entry = entries.swap_remove(next);

        let d0 = enlargement(&groups[0].0, &entry.0);
        let d1 = enlargement(&groups[1].0, &entry.0);
        let target = if d0 != d1 {
            usize::from(d1 < d0)
        } else if groups[0].0.volume() != groups[1].0.volume() {
            usize::from(groups[1].0.volume() < groups[0].0.volume())
        } else {
            usize::from(groups[1].1.len() < groups[0].1.len())
        };

        let (aabb, group) = &mut groups[target];
        aabb.merge(&entry.0);
        group.push(entry);
    }

    let [g1, g2] = groups;
    (g1, g2)
}

fn sort_by_center<E>(entries: &mut [(Aabb, E)], axis: usize) {
    entries.sort_by(|(a, _), (b, _)| a.center()[axis].total_cmp(&b.center()[axis]));
}

fn into_chunks<E>(entries: Vec<E>, chunk_len: usize) -> Vec<Vec<E>> {
    let mut chunks = Vec::new();
    let mut it = entries.into_iter().peekable();

    while it.peek().is_some() {
        chunks.push(it.by_ref().take(chunk_len).collect());
    }

    chunks
}

/// Sort-Tile-Recursive grouping of one tree level into nodes of at most
/// `max_children` entries.
fn str_groups<E>(mut entries: Vec<(Aabb, E)>, max_children: usize) -> Vec<Vec<(Aabb, E)>> {
    let num_nodes = entries.len().div_ceil(max_children);
    let num_slices = ((num_nodes as Real).cbrt().ceil() as usize).max(1);
    let slab_len = entries.len().div_ceil(num_slices).max(1);
    let mut groups = Vec::with_capacity(num_nodes);

    sort_by_center(&mut entries, 0);

    for mut slab in into_chunks(entries, slab_len) {
        sort_by_center(&mut slab, 1);
        let run_len = slab.len().div_ceil(num_slices).max(1);

        for mut run in into_chunks(slab, run_len) {
            sort_by_center(&mut run, 2);
            groups.extend(into_chunks(run, max_children));
        }
    }

    groups
}
