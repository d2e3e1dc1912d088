// Copyright 2016 Matthew D. Michelotti
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.


// QuadTree is the spatial index behind a CollisionWorld. It maps body ids to
// the rectangles they occupied at the last rebuild. Entries are only stored
// at leaves, and an entry that straddles a quadrant boundary is stored in
// every quadrant it touches, so query results may repeat an id.
//
// There is no removal: the owner rebuilds the tree from its registry.

use crate::geom::Rect;
use crate::world::BodyId;

/// Number of entries a leaf may hold before it splits.
pub const DEFAULT_NODE_CAPACITY: usize = 25;

/// Depth below which leaves stop splitting (the root has depth 0).
pub const DEFAULT_MAX_DEPTH: usize = 10;

/// Shape summary of a `QuadTree`, mostly useful to check that repeated
/// rebuilds do not accumulate nodes.
#[derive(PartialEq, Eq, Copy, Clone, Debug, Default)]
pub struct IndexStats {
    /// Total number of nodes, internal and leaf.
    pub nodes: usize,
    /// Number of leaf nodes.
    pub leaves: usize,
    /// Number of stored entries, counting duplicates across quadrants.
    pub entries: usize,
    /// Depth of the deepest node.
    pub depth: usize,
}

/// A region quadtree over axis-aligned rectangles keyed by `BodyId`.
#[derive(PartialEq, Clone, Debug)]
pub struct QuadTree {
    root: Option<Node>,
    capacity: usize,
    max_depth: usize,
}

#[derive(PartialEq, Clone, Debug)]
struct Node {
    bounds: Rect,
    depth: usize,
    entries: Vec<(BodyId, Rect)>,
    children: Option<Box<[Node; 4]>>,
}

impl QuadTree {
    /// Constructs an empty, uninitialized tree. Leaves split once they hold
    /// more than `capacity` entries, unless they are already at `max_depth`.
    ///
    /// Call `init` before inserting; inserts into an uninitialized tree are
    /// ignored.
    pub fn new(capacity: usize, max_depth: usize) -> QuadTree {
        assert!(capacity > 0, "requires capacity > 0");
        QuadTree { root: None, capacity, max_depth }
    }

    /// Builds a tree covering `bounds` holding every `(id, rect)` in `entries`.
    pub fn build<I>(capacity: usize, max_depth: usize, bounds: Rect, entries: I) -> QuadTree
    where
        I: IntoIterator<Item = (BodyId, Rect)>,
    {
        let mut tree = QuadTree::new(capacity, max_depth);
        tree.init(bounds);
        for (id, rect) in entries {
            tree.insert(id, rect);
        }
        tree
    }

    /// Resets the tree to a single empty leaf covering `bounds`.
    pub fn init(&mut self, bounds: Rect) {
        self.root = Some(Node::leaf(bounds, 0));
    }

    /// Releases every node. The tree is uninitialized afterwards.
    pub fn clear(&mut self) {
        self.root = None;
    }

    /// Returns the area covered by the tree, or `None` if uninitialized.
    pub fn bounds(&self) -> Option<Rect> {
        self.root.as_ref().map(|root| root.bounds)
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Inserts `id` with the given `rect`.
    ///
    /// Returns `false` if the rectangle lies entirely outside the tree (or the
    /// tree is uninitialized), in which case nothing is stored.
    pub fn insert(&mut self, id: BodyId, rect: Rect) -> bool {
        let (capacity, max_depth) = (self.capacity, self.max_depth);
        match self.root {
            Some(ref mut root) => root.insert(id, rect, capacity, max_depth),
            None => false,
        }
    }

    /// Returns the ids of all entries intersecting `rect`.
    ///
    /// An id stored in several quadrants may appear more than once.
    pub fn query(&self, rect: &Rect) -> Vec<BodyId> {
        let mut result = Vec::new();
        if let Some(ref root) = self.root {
            root.query(rect, &mut result);
        }
        result
    }

    pub fn stats(&self) -> IndexStats {
        let mut stats = IndexStats::default();
        if let Some(ref root) = self.root {
            root.collect_stats(&mut stats);
        }
        stats
    }
}

impl Node {
    fn leaf(bounds: Rect, depth: usize) -> Node {
        Node { bounds, depth, entries: Vec::new(), children: None }
    }

    fn insert(&mut self, id: BodyId, rect: Rect, capacity: usize, max_depth: usize) -> bool {
        if !self.bounds.intersects(&rect) {
            return false;
        }
        if let Some(ref mut children) = self.children {
            let mut stored = false;
            for child in children.iter_mut() {
                stored |= child.insert(id, rect, capacity, max_depth);
            }
            return stored;
        }
        self.entries.push((id, rect));
        if self.entries.len() > capacity && self.depth < max_depth {
            self.split(capacity, max_depth);
        }
        true
    }

    fn split(&mut self, capacity: usize, max_depth: usize) {
        let depth = self.depth + 1;
        let [nw, ne, sw, se] = self.bounds.quadrants();
        let mut children = Box::new([
            Node::leaf(nw, depth),
            Node::leaf(ne, depth),
            Node::leaf(sw, depth),
            Node::leaf(se, depth),
        ]);
        for (id, rect) in self.entries.drain(..) {
            for child in children.iter_mut() {
                child.insert(id, rect, capacity, max_depth);
            }
        }
        self.entries = Vec::new();
        self.children = Some(children);
    }

    fn query(&self, rect: &Rect, result: &mut Vec<BodyId>) {
        if !self.bounds.intersects(rect) {
            return;
        }
        match self.children {
            Some(ref children) => {
                for child in children.iter() {
                    child.query(rect, result);
                }
            }
            None => result.extend(
                self.entries
                    .iter()
                    .filter(|(_, entry_rect)| entry_rect.intersects(rect))
                    .map(|&(id, _)| id),
            ),
        }
    }

    fn collect_stats(&self, stats: &mut IndexStats) {
        stats.nodes += 1;
        stats.depth = stats.depth.max(self.depth);
        match self.children {
            Some(ref children) => {
                for child in children.iter() {
                    child.collect_stats(stats);
                }
            }
            None => {
                stats.leaves += 1;
                stats.entries += self.entries.len();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::rect;
    use crate::util::dedup_ids;
    use proptest::prelude::*;

    fn world() -> Rect {
        rect(0.0, 0.0, 100.0, 100.0)
    }

    fn sorted(mut ids: Vec<BodyId>) -> Vec<BodyId> {
        ids.sort();
        ids
    }

    #[test]
    fn test_uninitialized_ignores_inserts() {
        let mut tree = QuadTree::new(4, DEFAULT_MAX_DEPTH);
        assert!(!tree.insert(1, rect(0.0, 0.0, 1.0, 1.0)));
        assert_eq!(tree.query(&world()), vec![]);
        assert_eq!(tree.bounds(), None);
        assert_eq!(tree.stats(), IndexStats::default());
    }

    #[test]
    fn test_insert_outside_is_noop() {
        let mut tree = QuadTree::new(4, DEFAULT_MAX_DEPTH);
        tree.init(world());
        assert!(!tree.insert(1, rect(200.0, 200.0, 5.0, 5.0)));
        assert!(!tree.insert(2, rect(100.0, 0.0, 5.0, 5.0)));
        assert_eq!(tree.stats().entries, 0);
    }

    #[test]
    fn test_leaf_until_capacity_exceeded() {
        let mut tree = QuadTree::new(4, DEFAULT_MAX_DEPTH);
        tree.init(world());
        for id in 0..4 {
            tree.insert(id, rect(id as f64 * 10.0, 0.0, 5.0, 5.0));
        }
        assert_eq!(tree.stats(), IndexStats { nodes: 1, leaves: 1, entries: 4, depth: 0 });
        tree.insert(4, rect(80.0, 80.0, 5.0, 5.0));
        let stats = tree.stats();
        assert_eq!(stats.nodes, 5);
        assert_eq!(stats.leaves, 4);
        assert_eq!(stats.entries, 5);
        assert_eq!(stats.depth, 1);
    }

    #[test]
    fn test_split_duplicates_straddlers() {
        let mut tree = QuadTree::new(1, DEFAULT_MAX_DEPTH);
        tree.init(world());
        tree.insert(7, rect(45.0, 45.0, 10.0, 10.0));
        tree.insert(8, rect(0.0, 0.0, 5.0, 5.0));
        // id 7 covers the center point, so it lands in every quadrant
        let ids = tree.query(&world());
        assert_eq!(ids.iter().filter(|&&id| id == 7).count(), 4);
        assert_eq!(sorted(dedup_ids(ids)), vec![7, 8]);
    }

    #[test]
    fn test_query_filters_by_rect() {
        let mut tree = QuadTree::new(2, DEFAULT_MAX_DEPTH);
        tree.init(world());
        tree.insert(1, rect(0.0, 0.0, 10.0, 10.0));
        tree.insert(2, rect(60.0, 0.0, 10.0, 10.0));
        tree.insert(3, rect(0.0, 60.0, 10.0, 10.0));
        tree.insert(4, rect(60.0, 60.0, 10.0, 10.0));
        assert_eq!(sorted(dedup_ids(tree.query(&rect(5.0, 5.0, 60.0, 2.0)))), vec![1, 2]);
        assert_eq!(tree.query(&rect(65.0, 65.0, 1.0, 1.0)), vec![4]);
        assert_eq!(tree.query(&rect(30.0, 30.0, 5.0, 5.0)), vec![]);
        assert_eq!(tree.query(&rect(150.0, 150.0, 5.0, 5.0)), vec![]);
    }

    #[test]
    fn test_max_depth_stops_splitting() {
        let mut tree = QuadTree::new(2, 3);
        tree.init(world());
        for id in 0..50 {
            tree.insert(id, rect(1.0, 1.0, 2.0, 2.0));
        }
        let stats = tree.stats();
        assert_eq!(stats.depth, 3);
        assert_eq!(stats.entries, 50);
        assert_eq!(dedup_ids(tree.query(&rect(0.0, 0.0, 4.0, 4.0))).len(), 50);
    }

    #[test]
    fn test_init_and_clear_reset() {
        let mut tree = QuadTree::new(1, DEFAULT_MAX_DEPTH);
        tree.init(world());
        tree.insert(1, rect(0.0, 0.0, 5.0, 5.0));
        tree.insert(2, rect(90.0, 90.0, 5.0, 5.0));
        assert!(tree.stats().nodes > 1);
        tree.init(rect(0.0, 0.0, 10.0, 10.0));
        assert_eq!(tree.stats(), IndexStats { nodes: 1, leaves: 1, entries: 0, depth: 0 });
        assert_eq!(tree.bounds(), Some(rect(0.0, 0.0, 10.0, 10.0)));
        tree.clear();
        assert_eq!(tree.bounds(), None);
        assert_eq!(tree.query(&world()), vec![]);
    }

    #[test]
    fn test_build_matches_incremental() {
        let entries = vec![
            (1, rect(0.0, 0.0, 10.0, 10.0)),
            (2, rect(40.0, 40.0, 30.0, 30.0)),
            (3, rect(90.0, 5.0, 5.0, 5.0)),
        ];
        let built = QuadTree::build(1, DEFAULT_MAX_DEPTH, world(), entries.clone());
        let mut tree = QuadTree::new(1, DEFAULT_MAX_DEPTH);
        tree.init(world());
        for (id, r) in entries {
            tree.insert(id, r);
        }
        assert_eq!(built, tree);
    }

    fn arb_rect() -> impl Strategy<Value = Rect> {
        (0.0..95.0f64, 0.0..95.0f64, 0.1..20.0f64, 0.1..20.0f64)
            .prop_map(|(x, y, w, h)| rect(x, y, w, h))
    }

    proptest! {
        #[test]
        fn prop_inserted_rect_is_found(
            rects in prop::collection::vec(arb_rect(), 1..120),
            capacity in 1usize..8,
        ) {
            let mut tree = QuadTree::new(capacity, DEFAULT_MAX_DEPTH);
            tree.init(world());
            for (id, r) in rects.iter().enumerate() {
                prop_assert!(tree.insert(id as BodyId, *r));
            }
            for (id, r) in rects.iter().enumerate() {
                prop_assert!(tree.query(r).contains(&(id as BodyId)));
            }
            let all = sorted(dedup_ids(tree.query(&world())));
            prop_assert_eq!(all, (0..rects.len() as BodyId).collect::<Vec<_>>());
        }

        #[test]
        fn prop_query_has_no_false_positives(
            rects in prop::collection::vec(arb_rect(), 1..80),
            probe in arb_rect(),
        ) {
            let tree = QuadTree::build(
                3,
                DEFAULT_MAX_DEPTH,
                world(),
                rects.iter().enumerate().map(|(id, r)| (id as BodyId, *r)),
            );
            let mut expected: Vec<BodyId> = rects
                .iter()
                .enumerate()
                .filter(|(_, r)| r.intersects(&probe))
                .map(|(id, _)| id as BodyId)
                .collect();
            expected.sort();
            prop_assert_eq!(sorted(dedup_ids(tree.query(&probe))), expected);
        }
    }
}
