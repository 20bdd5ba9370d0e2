//! Per-cell capped top-k similarity lists, built either by exact
//! all-pairs Pearson correlation or by LSH-estimated correlation over
//! precomputed signatures.

use cell_store::{CellId, GeneId};
use lsh::{hamming_to_correlation, LshModel};
use rayon::prelude::*;
use similarity::similarity_subset;
use subset_view::SubsetView;
use tracing::info;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Neighbor {
    pub cell: CellId,
    pub similarity: f64,
}

/// A per-cell top-k similarity index over a fixed gene-set, recorded
/// alongside a copy of that gene-set so a caller can check whether it may
/// reuse this index for another query.
pub struct SimilarPairs {
    gene_set: Vec<GeneId>,
    cell_set: Vec<CellId>,
    lists: Vec<Vec<Neighbor>>,
    k: usize,
    threshold: f64,
}

fn rank_and_cap(mut candidates: Vec<Neighbor>, k: usize) -> Vec<Neighbor> {
    candidates.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.cell.cmp(&b.cell))
    });
    candidates.truncate(k);
    candidates
}

impl SimilarPairs {
    fn build_from_pairwise<F: Fn(usize, usize) -> f64 + Sync>(
        view: &SubsetView,
        k: usize,
        threshold: f64,
        sim_fn: F,
    ) -> SimilarPairs {
        let n = view.n_cells();
        let cell_set = view.cell_set().to_vec();
        let lists: Vec<Vec<Neighbor>> = (0..n)
            .into_par_iter()
            .map(|i| {
                let mut candidates = Vec::new();
                for j in 0..n {
                    if j == i {
                        continue;
                    }
                    let sim = sim_fn(i, j);
                    if sim.is_nan() || sim < threshold {
                        continue;
                    }
                    candidates.push(Neighbor {
                        cell: cell_set[j],
                        similarity: sim,
                    });
                }
                rank_and_cap(candidates, k)
            })
            .collect();
        info!(n_cells = n, k, threshold, "built SimilarPairs index");
        SimilarPairs {
            gene_set: view.gene_set().to_vec(),
            cell_set,
            lists,
            k,
            threshold,
        }
    }

    /// Exact mode: all `O(n^2)` pairs, exact Pearson correlation.
    pub fn build_exact(view: &SubsetView, k: usize, threshold: f64) -> SimilarPairs {
        SimilarPairs::build_from_pairwise(view, k, threshold, |i, j| similarity_subset(view, i, j))
    }

    /// LSH mode: all `O(n^2)` pairs, Hamming-distance-estimated correlation
    /// over a signature arena already built from `model`.
    pub fn build_lsh(
        view: &SubsetView,
        model: &LshModel,
        signatures: &bitsig::SignatureArena,
        k: usize,
        threshold: f64,
    ) -> SimilarPairs {
        SimilarPairs::build_from_pairwise(view, k, threshold, |i, j| {
            hamming_to_correlation(signatures.hamming(i, j), model.bit_count())
        })
    }

    pub fn k(&self) -> usize {
        self.k
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    pub fn gene_set(&self) -> &[GeneId] {
        &self.gene_set
    }

    pub fn cell_set(&self) -> &[CellId] {
        &self.cell_set
    }

    /// Whether this index was built over exactly `gene_set`, and so may be
    /// reused for a query restricted to it.
    pub fn matches_gene_set(&self, gene_set: &[GeneId]) -> bool {
        self.gene_set == gene_set
    }

    pub fn neighbors(&self, cell: CellId) -> &[Neighbor] {
        match self.cell_set.binary_search(&cell) {
            Ok(idx) => &self.lists[idx],
            Err(_) => &[],
        }
    }

    pub fn all_neighbor_lists(&self) -> impl Iterator<Item = (CellId, &[Neighbor])> {
        self.cell_set.iter().zip(self.lists.iter()).map(|(&c, l)| (c, l.as_slice()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cell_store::{EntityStore, StoreConfig};

    fn meta(name: &str) -> Vec<(String, String)> {
        vec![("CellName".to_string(), name.to_string())]
    }

    #[test]
    fn exact_mode_ranks_by_decreasing_similarity_and_caps_at_k() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        store.add_cell(&meta("a"), &[("G1".into(), 1.0), ("G2".into(), 2.0)]).unwrap();
        store.add_cell(&meta("b"), &[("G1".into(), 1.0), ("G2".into(), 2.0)]).unwrap();
        store.add_cell(&meta("c"), &[("G1".into(), 5.0), ("G2".into(), 1.0)]).unwrap();

        let gene_set: Vec<GeneId> = store.all_gene_ids();
        let cell_set: Vec<CellId> = store.all_cell_ids();
        let view = SubsetView::build(&store, &gene_set, &cell_set);

        let pairs = SimilarPairs::build_exact(&view, 1, 0.0);
        let a_id = store.cell_id("a").unwrap();
        let b_id = store.cell_id("b").unwrap();
        let neighbors = pairs.neighbors(a_id);
        assert_eq!(neighbors.len(), 1);
        assert_eq!(neighbors[0].cell, b_id);
        assert!((neighbors[0].similarity - 1.0).abs() < 1e-9);
    }

    #[test]
    fn records_gene_set_for_reuse_checks() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        store.add_cell(&meta("a"), &[("G1".into(), 1.0)]).unwrap();
        let gene_set: Vec<GeneId> = store.all_gene_ids();
        let cell_set: Vec<CellId> = store.all_cell_ids();
        let view = SubsetView::build(&store, &gene_set, &cell_set);
        let pairs = SimilarPairs::build_exact(&view, 5, 0.0);
        assert!(pairs.matches_gene_set(&gene_set));
        assert!(!pairs.matches_gene_set(&[]));
    }
}
