//! The cell-similarity graph: a plain adjacency list, deliberately
//! independent of any external graph library, plus label-propagation
//! clustering.

use std::collections::HashSet;

use cell_store::{CellId, EntityStore};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_mt::Mt19937GenRand64;
use similar_pairs::SimilarPairs;
use tracing::{debug, info};

pub struct CellGraph {
    cells: Vec<CellId>,
    adjacency: Vec<Vec<(u32, f64)>>,
    cluster_ids: Vec<u32>,
}

impl CellGraph {
    /// One vertex per cell of `cell_set`; an (undirected, deduplicated) edge
    /// for every neighbor entry in `pairs`, whichever direction it was
    /// stored under -- `pairs`'s lists are already threshold- and k-capped,
    /// so no further filtering happens here.
    pub fn build(cell_set: &[CellId], pairs: &SimilarPairs) -> CellGraph {
        let n = cell_set.len();
        let index_of = |cell: CellId| cell_set.binary_search(&cell).ok();
        let mut adjacency: Vec<Vec<(u32, f64)>> = vec![Vec::new(); n];
        let mut seen: HashSet<(u32, u32)> = HashSet::new();
        for (i, &cell) in cell_set.iter().enumerate() {
            for neighbor in pairs.neighbors(cell) {
                let Some(j) = index_of(neighbor.cell) else { continue };
                if i == j {
                    continue;
                }
                let key = (i.min(j) as u32, i.max(j) as u32);
                if seen.insert(key) {
                    adjacency[i].push((j as u32, neighbor.similarity));
                    adjacency[j].push((i as u32, neighbor.similarity));
                }
            }
        }
        info!(vertices = n, "built cell-similarity graph");
        CellGraph {
            cells: cell_set.to_vec(),
            cluster_ids: (0..n as u32).collect(),
            adjacency,
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.cells.len()
    }

    pub fn edge_count(&self) -> usize {
        self.adjacency.iter().map(|n| n.len()).sum::<usize>() / 2
    }

    pub fn cells(&self) -> &[CellId] {
        &self.cells
    }

    pub fn neighbors(&self, vertex: usize) -> &[(u32, f64)] {
        &self.adjacency[vertex]
    }

    /// Remove vertices with no edges, remapping the remaining vertices to a
    /// dense `0..n'` index space. Returns the number of vertices removed.
    pub fn prune_isolated(&mut self) -> usize {
        let n = self.cells.len();
        let mut keep = vec![false; n];
        for (v, neighbors) in self.adjacency.iter().enumerate() {
            keep[v] = !neighbors.is_empty();
        }
        let mut new_index = vec![u32::MAX; n];
        let mut next = 0u32;
        for v in 0..n {
            if keep[v] {
                new_index[v] = next;
                next += 1;
            }
        }
        let removed = n - next as usize;
        if removed == 0 {
            return 0;
        }

        let mut new_cells = Vec::with_capacity(next as usize);
        let mut new_adjacency = Vec::with_capacity(next as usize);
        let mut new_clusters = Vec::with_capacity(next as usize);
        for v in 0..n {
            if !keep[v] {
                continue;
            }
            new_cells.push(self.cells[v]);
            new_clusters.push(self.cluster_ids[v]);
            let remapped: Vec<(u32, f64)> = self.adjacency[v]
                .iter()
                .map(|&(j, w)| (new_index[j as usize], w))
                .collect();
            new_adjacency.push(remapped);
        }
        self.cells = new_cells;
        self.adjacency = new_adjacency;
        self.cluster_ids = new_clusters;
        info!(removed, remaining = self.cells.len(), "pruned isolated vertices");
        removed
    }

    /// Label propagation. Each iteration visits vertices in a permuted
    /// (seeded, reshuffled per iteration) order, assigning each the label
    /// that maximizes the sum of edge weights among same-label neighbors,
    /// ties broken by the lowest label id. Stops early once no vertex
    /// changes label in a full pass. Returns the number of iterations run.
    pub fn cluster(&mut self, max_iterations: usize, seed: u64) -> usize {
        let n = self.cells.len();
        let mut rng = Mt19937GenRand64::seed_from_u64(seed);
        let mut order: Vec<usize> = (0..n).collect();
        let mut iterations_run = 0;
        for iteration in 0..max_iterations {
            order.shuffle(&mut rng);
            let mut changed = false;
            for &v in &order {
                let mut weight_by_label: std::collections::HashMap<u32, f64> = std::collections::HashMap::new();
                for &(j, w) in &self.adjacency[v] {
                    *weight_by_label.entry(self.cluster_ids[j as usize]).or_insert(0.0) += w;
                }
                if weight_by_label.is_empty() {
                    continue;
                }
                let best_label = weight_by_label
                    .iter()
                    .max_by(|(label_a, weight_a), (label_b, weight_b)| {
                        weight_a
                            .partial_cmp(weight_b)
                            .unwrap_or(std::cmp::Ordering::Equal)
                            .then_with(|| label_b.cmp(label_a))
                    })
                    .map(|(&label, _)| label)
                    .unwrap();
                if best_label != self.cluster_ids[v] {
                    self.cluster_ids[v] = best_label;
                    changed = true;
                }
            }
            iterations_run = iteration + 1;
            if !changed {
                break;
            }
        }
        debug!(iterations_run, "label propagation converged or hit the iteration cap");
        iterations_run
    }

    pub fn cluster_ids(&self) -> &[u32] {
        &self.cluster_ids
    }

    /// Collapse clusters smaller than `min_size` into a reserved label.
    pub fn collapse_small_clusters(&mut self, min_size: usize, unclustered_label: u32) {
        let mut counts: std::collections::HashMap<u32, usize> = std::collections::HashMap::new();
        for &id in &self.cluster_ids {
            *counts.entry(id).or_insert(0) += 1;
        }
        for id in self.cluster_ids.iter_mut() {
            if counts.get(id).copied().unwrap_or(0) < min_size {
                *id = unclustered_label;
            }
        }
    }

    /// Write each vertex's cluster id back to cell meta-data under `field`.
    pub fn store_cluster_ids(&self, store: &mut EntityStore, field: &str) -> cell_store::Result<()> {
        for (v, &cell) in self.cells.iter().enumerate() {
            store.set_cell_meta_data(cell, field, &self.cluster_ids[v].to_string())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cell_store::StoreConfig;

    fn meta(name: &str) -> Vec<(String, String)> {
        vec![("CellName".to_string(), name.to_string())]
    }

    // Build a real SimilarPairs index over a tiny hand-picked store, so the
    // graph tests exercise the actual builder end to end.
    fn build_pairs(store: &EntityStore, gene_set: &[cell_store::GeneId], cell_set: &[CellId], k: usize) -> SimilarPairs {
        let view = subset_view::SubsetView::build(store, gene_set, cell_set);
        SimilarPairs::build_exact(&view, k, -2.0)
    }

    #[test]
    fn build_creates_undirected_deduplicated_edges() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        store.add_cell(&meta("a"), &[("G".into(), 1.0)]).unwrap();
        store.add_cell(&meta("b"), &[("G".into(), 1.0)]).unwrap();
        store.add_cell(&meta("c"), &[("G".into(), 5.0)]).unwrap();
        let gene_set = store.all_gene_ids();
        let cell_set = store.all_cell_ids();
        let pairs = build_pairs(&store, &gene_set, &cell_set, 2);

        let graph = CellGraph::build(&cell_set, &pairs);
        assert_eq!(graph.vertex_count(), 3);
        assert!(graph.edge_count() > 0);
    }

    #[test]
    fn prune_isolated_removes_and_remaps() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        store.add_cell(&meta("a"), &[("G".into(), 1.0)]).unwrap();
        store.add_cell(&meta("b"), &[("G".into(), 1.0)]).unwrap();
        store.add_cell(&meta("lonely"), &[("H".into(), 1.0)]).unwrap();
        let gene_set = store.all_gene_ids();
        let cell_set = store.all_cell_ids();
        let pairs = build_pairs(&store, &gene_set, &cell_set, 2);

        let mut graph = CellGraph::build(&cell_set, &pairs);
        let removed = graph.prune_isolated();
        assert_eq!(removed, 1);
        assert_eq!(graph.vertex_count(), 2);
        assert!(!graph.cells().contains(&store.cell_id("lonely").unwrap()));
    }

    #[test]
    fn clustering_converges_and_stores_back_to_meta_data() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        store.add_cell(&meta("a"), &[("G".into(), 1.0)]).unwrap();
        store.add_cell(&meta("b"), &[("G".into(), 1.0)]).unwrap();
        let gene_set = store.all_gene_ids();
        let cell_set = store.all_cell_ids();
        let pairs = build_pairs(&store, &gene_set, &cell_set, 2);

        let mut graph = CellGraph::build(&cell_set, &pairs);
        let iterations = graph.cluster(100, 42);
        assert!(iterations <= 100);
        assert_eq!(graph.cluster_ids()[0], graph.cluster_ids()[1]);

        graph.store_cluster_ids(&mut store, "cluster").unwrap();
        let a = store.cell_id("a").unwrap();
        assert_eq!(
            store.get_cell_meta_data(a, "cluster").unwrap(),
            graph.cluster_ids()[0].to_string()
        );
    }

    #[test]
    fn collapse_small_clusters_reassigns_to_reserved_label() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        store.add_cell(&meta("a"), &[("G".into(), 1.0)]).unwrap();
        let gene_set = store.all_gene_ids();
        let cell_set = store.all_cell_ids();
        let pairs = build_pairs(&store, &gene_set, &cell_set, 2);
        let mut graph = CellGraph::build(&cell_set, &pairs);
        graph.collapse_small_clusters(2, u32::MAX);
        assert_eq!(graph.cluster_ids(), &[u32::MAX]);
    }
}
