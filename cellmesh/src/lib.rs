//! Facade crate: wires the entity store, set algebra, LSH, similarity,
//! SimilarPairs, information content, and the cell-similarity graph into one
//! surface, plus the configuration and error types that sit around all of
//! them. The CLI binary (`src/main.rs`) is a thin client of this crate.

pub mod config;
pub mod errors;

pub use config::Config;
pub use errors::{Error, Result};

pub use cell_store::{CellId, EntityStore, GeneId, StoreConfig};
pub use cell_graph::CellGraph;
pub use info_content::Normalization;
pub use lsh::LshModel;
pub use set_algebra::SetAlgebra;
pub use similar_pairs::SimilarPairs;
pub use subset_view::SubsetView;

use std::path::Path;

use config::{ClusteringConfig, LshConfig, SimilarPairsConfig};

/// An open store plus the operations that build derived, ephemeral
/// artifacts (subset views, LSH signatures, SimilarPairs indices, the
/// cell-similarity graph) over it.
pub struct Mesh {
    pub store: EntityStore,
}

impl Mesh {
    pub fn create(dir: impl AsRef<Path>, config: StoreConfig) -> Result<Mesh> {
        Ok(Mesh {
            store: EntityStore::create_new(dir, config)?,
        })
    }

    pub fn open(dir: impl AsRef<Path>, writable: bool) -> Result<Mesh> {
        Ok(Mesh {
            store: EntityStore::open_existing(dir, writable)?,
        })
    }

    pub fn close(self) -> Result<()> {
        Ok(self.store.close()?)
    }

    pub fn sets(&self) -> SetAlgebra<'_> {
        SetAlgebra::new(&self.store)
    }

    /// Add a cell from an ordered meta-data list (`CellName` need not be
    /// first) and a `(gene name, count)` list; unseen genes are registered
    /// automatically.
    pub fn add_cell(&mut self, meta_data: &[(String, String)], counts: &[(String, f32)]) -> Result<CellId> {
        Ok(self.store.add_cell(meta_data, counts)?)
    }

    pub fn build_subset_view(&self, gene_set: &str, cell_set: &str) -> Result<SubsetView> {
        let sa = self.sets();
        let g = sa.load_gene_set(gene_set)?;
        let c = sa.load_cell_set(cell_set)?;
        Ok(SubsetView::build(&self.store, &g, &c))
    }

    pub fn build_similar_pairs_exact(&self, view: &SubsetView, cfg: &SimilarPairsConfig) -> SimilarPairs {
        SimilarPairs::build_exact(view, cfg.k, cfg.similarity_threshold)
    }

    pub fn build_similar_pairs_lsh(&self, view: &SubsetView, lsh_cfg: &LshConfig, cfg: &SimilarPairsConfig) -> SimilarPairs {
        let model = LshModel::build(view.n_genes(), lsh_cfg.lsh_bit_count, lsh_cfg.lsh_seed);
        let signatures = model.build_signatures(view);
        SimilarPairs::build_lsh(view, &model, &signatures, cfg.k, cfg.similarity_threshold)
    }

    /// Build the cell-similarity graph from an already-built `SimilarPairs`
    /// index, prune isolated vertices, cluster by label propagation, and
    /// write cluster ids back to cell meta-data under `field`.
    pub fn cluster_and_store(
        &mut self,
        cell_set: &[CellId],
        pairs: &SimilarPairs,
        cfg: &ClusteringConfig,
        field: &str,
    ) -> Result<CellGraph> {
        let mut graph = CellGraph::build(cell_set, pairs);
        graph.prune_isolated();
        graph.cluster(cfg.max_iterations, cfg.permutation_seed);
        if cfg.min_cluster_size > 1 {
            graph.collapse_small_clusters(cfg.min_cluster_size, u32::MAX);
        }
        graph.store_cluster_ids(&mut self.store, field)?;
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(name: &str) -> Vec<(String, String)> {
        vec![("CellName".to_string(), name.to_string())]
    }

    #[test]
    fn end_to_end_cluster_pipeline_runs() {
        let dir = tempfile::tempdir().unwrap();
        let mut mesh = Mesh::create(dir.path().join("store"), StoreConfig::default()).unwrap();
        mesh.add_cell(&meta("a"), &[("G1".into(), 1.0), ("G2".into(), 2.0)]).unwrap();
        mesh.add_cell(&meta("b"), &[("G1".into(), 1.0), ("G2".into(), 2.0)]).unwrap();
        mesh.add_cell(&meta("c"), &[("G1".into(), 5.0), ("G2".into(), 0.1)]).unwrap();

        let sa = mesh.sets();
        sa.create_gene_set_by_regex("all_genes", ".*").unwrap();
        sa.create_cell_set_by_names("all_cells", &["a".into(), "b".into(), "c".into()]).unwrap();

        let view = mesh.build_subset_view("all_genes", "all_cells").unwrap();
        let cfg = SimilarPairsConfig {
            k: 2,
            similarity_threshold: -2.0,
        };
        let pairs = mesh.build_similar_pairs_exact(&view, &cfg);

        let cell_set = view.cell_set().to_vec();
        let clustering_cfg = ClusteringConfig {
            max_iterations: 50,
            min_cluster_size: 1,
            permutation_seed: 1,
        };
        let graph = mesh.cluster_and_store(&cell_set, &pairs, &clustering_cfg, "cluster").unwrap();
        assert!(graph.vertex_count() <= 3);

        let a = mesh.store.cell_id("a").unwrap();
        assert!(mesh.store.get_cell_meta_data(a, "cluster").is_some());
    }
}
