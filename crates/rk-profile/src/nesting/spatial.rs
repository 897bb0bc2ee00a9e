//! Broad-phase grouping of loops by bounding box using an R*-tree

use rstar::{AABB, RTree, RTreeObject};

use crate::geometry::BoundingBox2D;

/// A loop's bounds in the index
#[derive(Debug, Clone)]
pub(crate) struct LoopEntry {
    /// Index of the loop in the organizer input
    pub index: usize,
    pub bounds: BoundingBox2D,
}

impl RTreeObject for LoopEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        let (min, max) = self.bounds.corners();
        AABB::from_corners(min, max)
    }
}

/// Partition loop indices into groups of transitively overlapping boxes.
///
/// Groups are ordered by their smallest index and list members ascending.
pub(crate) fn overlap_groups(bounds: &[BoundingBox2D]) -> Vec<Vec<usize>> {
    let entries: Vec<LoopEntry> = bounds
        .iter()
        .enumerate()
        .map(|(index, bounds)| LoopEntry {
            index,
            bounds: *bounds,
        })
        .collect();
    let tree = RTree::bulk_load(entries);

    let mut sets = DisjointSets::new(bounds.len());
    for (i, bounds_i) in bounds.iter().enumerate() {
        let (min, max) = bounds_i.corners();
        let envelope = AABB::from_corners(min, max);
        for entry in tree.locate_in_envelope_intersecting(&envelope) {
            if entry.index > i && entry.bounds.overlaps(bounds_i) {
                sets.union(i, entry.index);
            }
        }
    }
    sets.groups()
}

/// Union-find over `0..len`
#[derive(Debug)]
struct DisjointSets {
    parent: Vec<usize>,
}

impl DisjointSets {
    fn new(len: usize) -> Self {
        Self {
            parent: (0..len).collect(),
        }
    }

    fn root(&mut self, mut i: usize) -> usize {
        while self.parent[i] != i {
            self.parent[i] = self.parent[self.parent[i]];
            i = self.parent[i];
        }
        i
    }

    fn union(&mut self, a: usize, b: usize) {
        let (ra, rb) = (self.root(a), self.root(b));
        if ra != rb {
            // Keep the smaller index as root so group order is stable
            let (low, high) = if ra < rb { (ra, rb) } else { (rb, ra) };
            self.parent[high] = low;
        }
    }

    fn groups(mut self) -> Vec<Vec<usize>> {
        let mut slot_of_root: Vec<Option<usize>> = vec![None; self.parent.len()];
        let mut groups: Vec<Vec<usize>> = Vec::new();
        for i in 0..self.parent.len() {
            let root = self.root(i);
            match slot_of_root[root] {
                Some(slot) => groups[slot].push(i),
                None => {
                    slot_of_root[root] = Some(groups.len());
                    groups.push(vec![i]);
                }
            }
        }
        groups
    }
}
