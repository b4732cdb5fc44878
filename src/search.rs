use crate::arena::TreeNode;
use crate::bounds::{Axis, Space};
use crate::iter::SearchHits;
use crate::tree::KdTree;

impl KdTree {
    /// Collect every point lying inside the axis-aligned box `space`.
    ///
    /// `hits` is reset first, then filled with the original index of each
    /// matching point in traversal order; call [`SearchHits::sort`] for a
    /// canonical ordering. Box bounds are inclusive on every axis, so
    /// points exactly on a face are reported.
    ///
    /// The traversal carries the domain of each subtree, the box its points
    /// are guaranteed to lie in given the splits taken so far. A subtree
    /// whose domain misses the query box is skipped outright; one whose
    /// domain the box encloses is reported wholesale without per-point
    /// tests.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built.
    pub fn search_space(&self, space: Space, hits: &mut SearchHits) {
        assert!(self.is_built(), "search requires a built tree");
        hits.reset();
        match *self.arena.get(self.root) {
            TreeNode::Branch { split, left, right } => {
                self.descend(split, left, right, 0, &space, Space::everything(), hits);
            }
            // build() requires two points, so the root is always a branch
            TreeNode::Leaf { .. } => unreachable!(),
        }
    }

    /// Collect every point inside the cube centered on (x, y, z) whose
    /// faces sit `apothem` away from the center.
    ///
    /// # Panics
    ///
    /// Panics if the tree has not been built or `apothem` is negative.
    pub fn search_cube(&self, x: f64, y: f64, z: f64, apothem: f64, hits: &mut SearchHits) {
        self.search_space(Space::cube(x, y, z, apothem), hits);
    }

    /// Walk both children of a branch at `depth`, narrowing the domain by
    /// the split threshold: the left child keeps everything up to `split`
    /// on this depth's axis, the right child everything from `split` up.
    fn descend(
        &self,
        split: f64,
        left: u32,
        right: u32,
        depth: usize,
        space: &Space,
        domain: Space,
        hits: &mut SearchHits,
    ) {
        let axis = Axis::from_depth(depth);
        self.explore(left, depth, space, domain.with_max(axis, split), hits);
        self.explore(right, depth, space, domain.with_min(axis, split), hits);
    }

    /// Handle one child whose points are known to lie inside `domain`: test
    /// a leaf directly, prune a subtree whose domain misses the box, report
    /// a subtree whose domain the box swallows whole, recurse otherwise.
    fn explore(&self, node: u32, depth: usize, space: &Space, domain: Space, hits: &mut SearchHits) {
        match *self.arena.get(node) {
            TreeNode::Leaf { point } => {
                let p = &self.points[point as usize];
                if space.contains(p.x, p.y, p.z) {
                    hits.push(p.index);
                }
            }
            TreeNode::Branch { split, left, right } => {
                if !space.intersects(&domain) {
                    return;
                }
                if space.encloses(&domain) {
                    // Split thresholds are coordinates of actual points, so
                    // an enclosed domain means every point below matches.
                    self.report_subtree(node, hits);
                } else {
                    self.descend(split, left, right, depth + 1, space, domain, hits);
                }
            }
        }
    }

    /// Emit every leaf under `node` without further testing.
    fn report_subtree(&self, node: u32, hits: &mut SearchHits) {
        match *self.arena.get(node) {
            TreeNode::Leaf { point } => hits.push(self.points[point as usize].index),
            TreeNode::Branch { left, right, .. } => {
                self.report_subtree(left, hits);
                self.report_subtree(right, hits);
            }
        }
    }
}
