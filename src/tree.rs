use std::cmp::Ordering;

use crate::arena::NodeArena;
use crate::bounds::Axis;

/// A cached point: coordinates copied from the caller's arrays plus the
/// position they came from.
#[derive(Clone, Copy, Debug)]
pub struct DataPoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
    /// Index of the point in the caller's coordinate arrays. Searches
    /// report this, not the point's slot in the cache.
    pub index: usize,
}

impl DataPoint {
    /// Coordinate on the given axis.
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Balanced static 3D k-d tree over a set of points.
///
/// The tree is built for workloads where the points move every simulation
/// iteration: it is rebuilt from scratch each step and queried many times in
/// between. Building caches the caller's coordinates, so the tree never
/// borrows from the caller, and a handle built once can be rebuilt in place
/// for as long as the point count stays the same:
///
/// ```
/// use kdthree::{KdTree, SearchHits};
///
/// let mut x = vec![0.0, 1.0, 2.0, 3.0];
/// let mut y = vec![0.0, 0.0, 0.0, 0.0];
/// let z = vec![0.0, 0.0, 0.0, 0.0];
///
/// let mut tree = KdTree::new();
/// let mut hits = SearchHits::new();
///
/// for _step in 0..3 {
///     tree.build(&x, &y, &z);
///     tree.search_cube(0.0, 0.0, 0.0, 1.5, &mut hits);
///     for index in &mut hits {
///         // advance the matched points
///         x[index] += 0.1;
///         y[index] += 0.1;
///     }
/// }
/// ```
pub struct KdTree {
    pub(crate) points: Vec<DataPoint>,
    pub(crate) arena: NodeArena,
    pub(crate) root: u32,
}

impl KdTree {
    /// A new, unbuilt handle. No allocation happens until the first
    /// [`build`](KdTree::build).
    pub fn new() -> KdTree {
        KdTree {
            points: Vec::new(),
            arena: NodeArena::new(),
            root: 0,
        }
    }

    /// Number of points in the current tree, 0 while unbuilt.
    pub fn count(&self) -> usize {
        self.points.len()
    }

    pub fn is_built(&self) -> bool {
        !self.points.is_empty()
    }

    /// Number of allocated tree nodes, exactly `2 * count - 1` once built.
    pub fn node_count(&self) -> usize {
        self.arena.len()
    }

    /// Build or rebuild the tree from three parallel coordinate slices.
    ///
    /// If the handle is unbuilt or the point count changed, the point cache
    /// and the node arena are reallocated at the new size. Otherwise both
    /// allocations are reused in place, so a simulation rebuilding with a
    /// stable point count stops touching the allocator after its first
    /// iteration. Either way the previous tree shape is destroyed.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length or hold fewer than two points.
    pub fn build(&mut self, x: &[f64], y: &[f64], z: &[f64]) {
        let count = x.len();
        assert_eq!(count, y.len(), "coordinate slices must be equally long");
        assert_eq!(count, z.len(), "coordinate slices must be equally long");
        assert!(count > 1, "a tree needs at least two points");

        // Reallocate only when the point count changed.
        if self.points.len() != count {
            self.points = Vec::with_capacity(count);
            self.arena = NodeArena::with_point_count(count);
        }

        self.arena.reset();
        self.points.clear();
        for i in 0..count {
            self.points.push(DataPoint {
                x: x[i],
                y: y[i],
                z: z[i],
                index: i,
            });
        }

        self.root = self.build_range(0, count, 0);
    }

    /// Recursively build the subtree over the half-open point-cache range
    /// `[from, to)` and return its arena index. Children are allocated
    /// before their parent, so the root ends up last in the arena.
    fn build_range(&mut self, from: usize, to: usize, depth: usize) -> u32 {
        if to - from == 1 {
            return self.arena.leaf(from as u32);
        }

        // A full sort is the simplest way to land the median element in the
        // middle of the range. Only the split value matters for
        // correctness, so `select_nth_unstable_by` could replace this if
        // the build ever shows up as a bottleneck.
        let axis = Axis::from_depth(depth);
        self.points[from..to].sort_unstable_by(|a, b| {
            a.coord(axis).partial_cmp(&b.coord(axis)).unwrap_or(Ordering::Equal)
        });

        // Lower median: odd-sized ranges put the extra point on the left.
        let mid = from + (to - from - 1) / 2;
        let split = self.points[mid].coord(axis);

        let left = self.build_range(from, mid + 1, depth + 1);
        let right = self.build_range(mid + 1, to, depth + 1);
        self.arena.branch(split, left, right)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::TreeNode;

    fn grid_coords(n: usize) -> (Vec<f64>, Vec<f64>, Vec<f64>) {
        let x: Vec<f64> = (0..n).map(|i| i as f64).collect();
        let y: Vec<f64> = (0..n).map(|i| (i * 7 % 13) as f64).collect();
        let z: Vec<f64> = (0..n).map(|i| (i * 3 % 5) as f64).collect();
        (x, y, z)
    }

    #[test]
    fn test_node_accounting() {
        for n in [2, 3, 4, 11, 64, 100] {
            let (x, y, z) = grid_coords(n);
            let mut tree = KdTree::new();
            tree.build(&x, &y, &z);

            assert_eq!(tree.node_count(), 2 * n - 1, "n = {}", n);

            let mut leaves = 0;
            let mut branches = 0;
            let mut seen = vec![false; n];
            for id in 0..tree.node_count() {
                match *tree.arena.get(id as u32) {
                    TreeNode::Leaf { point } => {
                        leaves += 1;
                        let original = tree.points[point as usize].index;
                        assert!(!seen[original], "index {} in two leaves", original);
                        seen[original] = true;
                    }
                    TreeNode::Branch { .. } => branches += 1,
                }
            }
            assert_eq!(leaves, n);
            assert_eq!(branches, n - 1);
            assert!(seen.iter().all(|&s| s), "every original index has a leaf");
        }
    }

    #[test]
    fn test_root_is_last_and_branch() {
        let (x, y, z) = grid_coords(10);
        let mut tree = KdTree::new();
        tree.build(&x, &y, &z);
        assert_eq!(tree.root as usize, tree.node_count() - 1);
        assert!(!tree.arena.get(tree.root).is_leaf());
    }

    #[test]
    fn test_root_split_is_lower_median_x() {
        // Four points spread on x only; depth 0 splits on x at the lower
        // median, the second smallest coordinate.
        let x = vec![7.0, 1.0, 5.0, 3.0];
        let y = vec![0.0; 4];
        let z = vec![0.0; 4];
        let mut tree = KdTree::new();
        tree.build(&x, &y, &z);
        match *tree.arena.get(tree.root) {
            TreeNode::Branch { split, .. } => assert_eq!(split, 3.0),
            TreeNode::Leaf { .. } => panic!("root should be a branch"),
        }
    }

    #[test]
    fn test_rebuild_same_count_reuses_allocations() {
        let (x, y, z) = grid_coords(50);
        let mut tree = KdTree::new();
        tree.build(&x, &y, &z);

        let points_ptr = tree.points.as_ptr();
        let (x2, y2, z2) = grid_coords(50);
        let x2: Vec<f64> = x2.iter().map(|v| v * -2.0).collect();
        tree.build(&x2, &y2, &z2);

        assert_eq!(tree.points.as_ptr(), points_ptr, "point cache reused");
        assert_eq!(tree.node_count(), 99);
    }

    #[test]
    fn test_rebuild_different_count_resizes() {
        let (x, y, z) = grid_coords(50);
        let mut tree = KdTree::new();
        tree.build(&x, &y, &z);
        assert_eq!(tree.arena.max_nodes(), 99);

        let (x2, y2, z2) = grid_coords(8);
        tree.build(&x2, &y2, &z2);
        assert_eq!(tree.count(), 8);
        assert_eq!(tree.arena.max_nodes(), 15);
        assert_eq!(tree.node_count(), 15);
    }

    #[test]
    #[should_panic(expected = "at least two points")]
    fn test_single_point_is_rejected() {
        let mut tree = KdTree::new();
        tree.build(&[1.0], &[2.0], &[3.0]);
    }

    #[test]
    #[should_panic(expected = "equally long")]
    fn test_mismatched_slices_are_rejected() {
        let mut tree = KdTree::new();
        tree.build(&[1.0, 2.0], &[1.0, 2.0], &[1.0]);
    }
}
