use crate::bounds::Space;
use crate::iter::SearchHits;
use crate::tree::KdTree;
use rand::prelude::*;
use rand::rngs::StdRng;
use wasm_bindgen::prelude::*;

/// A k-d tree paired with a reusable result buffer, exposed to JavaScript
/// and TypeScript.
///
/// The pairing mirrors how the index is meant to be driven: the caller
/// rebuilds once per animation frame as its points move, then issues many
/// searches against the same tree. Both the node storage and the result
/// buffer keep their allocations across frames as long as the point count
/// is stable.
#[wasm_bindgen]
pub struct SearchIndex {
    tree: KdTree,
    hits: SearchHits,
}

#[wasm_bindgen]
impl SearchIndex {
    #[wasm_bindgen(constructor)]
    pub fn new() -> SearchIndex {
        SearchIndex {
            tree: KdTree::new(),
            hits: SearchHits::new(),
        }
    }

    /// Build or rebuild the tree from three equally sized coordinate
    /// arrays. Needs at least two points.
    pub fn build(&mut self, x: &[f64], y: &[f64], z: &[f64]) {
        self.tree.build(x, y, z);
    }

    /// Generate `count` random points inside a cube of the given half-width
    /// around the origin and build the tree from them. Returns the flat
    /// `[x0, y0, z0, x1, ...]` coordinates so the caller can render them.
    pub fn random_points(&mut self, count: usize, half_width: f64) -> Vec<f64> {
        let mut rng = StdRng::seed_from_u64(get_seed());
        let mut x = Vec::with_capacity(count);
        let mut y = Vec::with_capacity(count);
        let mut z = Vec::with_capacity(count);
        for _ in 0..count {
            x.push((rng.r#gen::<f64>() * 2.0 - 1.0) * half_width);
            y.push((rng.r#gen::<f64>() * 2.0 - 1.0) * half_width);
            z.push((rng.r#gen::<f64>() * 2.0 - 1.0) * half_width);
        }
        self.tree.build(&x, &y, &z);

        let mut flat = Vec::with_capacity(count * 3);
        for i in 0..count {
            flat.push(x[i]);
            flat.push(y[i]);
            flat.push(z[i]);
        }
        flat
    }

    #[wasm_bindgen(getter)]
    pub fn count(&self) -> usize {
        self.tree.count()
    }

    /// Search the cube centered on (x, y, z) with half-width `apothem`.
    /// Returns the number of points found; consume them with `next_hit` or
    /// the `hits` getter.
    pub fn search_cube(&mut self, x: f64, y: f64, z: f64, apothem: f64) -> usize {
        self.tree.search_cube(x, y, z, apothem, &mut self.hits);
        self.hits.len()
    }

    /// Search an axis-aligned box given as per-axis bounds. Returns the
    /// number of points found.
    pub fn search_space(
        &mut self,
        x_min: f64,
        x_max: f64,
        y_min: f64,
        y_max: f64,
        z_min: f64,
        z_max: f64,
    ) -> usize {
        let space = Space::new([x_min, y_min, z_min], [x_max, y_max, z_max]);
        self.tree.search_space(space, &mut self.hits);
        self.hits.len()
    }

    /// Pull the next result index, or `undefined` once exhausted.
    pub fn next_hit(&mut self) -> Option<usize> {
        self.hits.next()
    }

    /// Reset the read position so results can be consumed again.
    pub fn rewind(&mut self) {
        self.hits.rewind();
    }

    /// Sort the current results ascending.
    pub fn sort_hits(&mut self) {
        self.hits.sort();
    }

    #[wasm_bindgen(getter)]
    pub fn count_hits(&self) -> usize {
        self.hits.len()
    }

    /// All current results as one array.
    #[wasm_bindgen(getter)]
    pub fn hits(&self) -> Vec<usize> {
        self.hits.as_slice().to_vec()
    }
}

fn get_seed() -> u64 {
    #[cfg(target_arch = "wasm32")]
    {
        (js_sys::Math::random() * 4294967296.0) as u64
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        987654321 // Fixed seed for tests
    }
}
