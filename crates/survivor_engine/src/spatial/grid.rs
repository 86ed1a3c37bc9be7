//! Uniform hash grid for 2D broad-phase queries
//!
//! The grid is rebuilt every frame: `clear`, then `insert` each live body.
//! Bodies are stored once and referenced from every cell their bounding
//! circle touches. Query results come back in insertion order, which keeps
//! simulations deterministic regardless of hash iteration order.

use std::collections::HashMap;

use crate::foundation::math::Vec2;

/// Body stored in the grid
#[derive(Debug, Clone, Copy)]
pub struct GridEntry<K> {
    /// Caller's identifier
    pub key: K,
    /// Center position
    pub position: Vec2,
    /// Bounding radius
    pub radius: f32,
}

/// Spatial hash grid keyed by the caller's identifier type
#[derive(Debug, Clone)]
pub struct SpatialGrid<K> {
    cell_size: f32,
    entries: Vec<GridEntry<K>>,
    cells: HashMap<(i32, i32), Vec<usize>>,
    extent: Option<((i32, i32), (i32, i32))>,
}

impl<K: Copy> SpatialGrid<K> {
    /// Create an empty grid; `cell_size` should be near the typical query radius
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size: cell_size.max(1.0),
            entries: Vec::new(),
            cells: HashMap::new(),
            extent: None,
        }
    }

    /// Cell edge length
    pub fn cell_size(&self) -> f32 {
        self.cell_size
    }

    /// Remove every body, keeping allocations
    pub fn clear(&mut self) {
        self.entries.clear();
        self.extent = None;
        for bucket in self.cells.values_mut() {
            bucket.clear();
        }
    }

    /// Number of bodies stored
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the grid is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn cell_of(&self, x: f32, y: f32) -> (i32, i32) {
        (
            (x / self.cell_size).floor() as i32,
            (y / self.cell_size).floor() as i32,
        )
    }

    fn cell_range(&self, center: Vec2, radius: f32) -> ((i32, i32), (i32, i32)) {
        (
            self.cell_of(center.x - radius, center.y - radius),
            self.cell_of(center.x + radius, center.y + radius),
        )
    }

    /// Insert a body covering the circle at `position` with `radius`
    pub fn insert(&mut self, key: K, position: Vec2, radius: f32) {
        let index = self.entries.len();
        self.entries.push(GridEntry { key, position, radius });

        let (hx, hy) = self.cell_of(position.x, position.y);
        self.extent = Some(match self.extent {
            Some(((x0, y0), (x1, y1))) => ((x0.min(hx), y0.min(hy)), (x1.max(hx), y1.max(hy))),
            None => ((hx, hy), (hx, hy)),
        });

        let ((x0, y0), (x1, y1)) = self.cell_range(position, radius);
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                self.cells.entry((cx, cy)).or_default().push(index);
            }
        }
    }

    fn candidates(&self, center: Vec2, radius: f32) -> Vec<usize> {
        let ((x0, y0), (x1, y1)) = self.cell_range(center, radius);
        let mut found = Vec::new();
        for cx in x0..=x1 {
            for cy in y0..=y1 {
                if let Some(bucket) = self.cells.get(&(cx, cy)) {
                    found.extend_from_slice(bucket);
                }
            }
        }
        found.sort_unstable();
        found.dedup();
        found
    }

    /// Bodies whose circles overlap the query circle
    pub fn query_radius(&self, center: Vec2, radius: f32) -> Vec<GridEntry<K>> {
        self.candidates(center, radius)
            .into_iter()
            .map(|i| self.entries[i])
            .filter(|entry| {
                let reach = entry.radius + radius;
                (entry.position - center).norm_squared() <= reach * reach
            })
            .collect()
    }

    /// Nearest body center to `point`
    ///
    /// Walks rings of cells outward from `point` and stops once no unvisited
    /// cell can hold a closer center. Ties go to the earliest insert.
    pub fn nearest(&self, point: Vec2) -> Option<GridEntry<K>> {
        let ((x0, y0), (x1, y1)) = self.extent?;
        let (px, py) = self.cell_of(point.x, point.y);
        let last_ring = [px - x0, x1 - px, py - y0, y1 - py]
            .into_iter()
            .map(i32::abs)
            .max()
            .unwrap_or(0);

        let mut best: Option<(f32, usize)> = None;
        for ring in 0..=last_ring {
            for cell in ring_cells(px, py, ring) {
                let Some(bucket) = self.cells.get(&cell) else {
                    continue;
                };
                for &index in bucket {
                    let distance = (self.entries[index].position - point).norm_squared();
                    let closer = match best {
                        Some((best_distance, best_index)) => distance
                            .total_cmp(&best_distance)
                            .then(index.cmp(&best_index))
                            .is_lt(),
                        None => true,
                    };
                    if closer {
                        best = Some((distance, index));
                    }
                }
            }

            // Centers in later rings are at least this far away
            let reach = ring as f32 * self.cell_size;
            if best.is_some_and(|(distance, _)| distance < reach * reach) {
                break;
            }
        }
        best.map(|(_, index)| self.entries[index])
    }

    /// Iterate over all stored bodies in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &GridEntry<K>> {
        self.entries.iter()
    }
}

/// Cells at Chebyshev distance `ring` from `(cx, cy)`
fn ring_cells(cx: i32, cy: i32, ring: i32) -> Vec<(i32, i32)> {
    if ring == 0 {
        return vec![(cx, cy)];
    }
    let mut cells = Vec::with_capacity(8 * ring as usize);
    for x in cx - ring..=cx + ring {
        cells.push((x, cy - ring));
        cells.push((x, cy + ring));
    }
    for y in cy - ring + 1..cy + ring {
        cells.push((cx - ring, y));
        cells.push((cx + ring, y));
    }
    cells
}
