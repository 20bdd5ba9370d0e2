//! Dense local-id projection of a `(gene-set, cell-set)` pair.
//!
//! Numeric kernels (similarity, LSH, information content) run against a
//! `SubsetView` rather than the entity store directly so they see dense,
//! small local gene ids instead of the store's sparse global ones.

use cell_store::{CellId, EntityStore, GeneId};
use rayon::prelude::*;

/// One cell's expression restricted to a gene-set, reindexed to local ids,
/// kept sorted by local gene id (the global order is preserved by
/// construction since both the gene-set and the row are sorted ascending).
pub type LocalRow = Vec<(u32, f32)>;

pub struct SubsetView {
    gene_set: Vec<GeneId>,
    cell_set: Vec<CellId>,
    rows: Vec<LocalRow>,
    /// `(sum1, sum2)` restricted to `gene_set`, parallel to `cell_set`.
    sums: Vec<(f64, f64)>,
}

impl SubsetView {
    /// Build a subset view. `gene_set` and `cell_set` must already be
    /// strictly ascending (the invariant every stored set maintains).
    pub fn build(store: &EntityStore, gene_set: &[GeneId], cell_set: &[CellId]) -> SubsetView {
        let rows_and_sums: Vec<(LocalRow, (f64, f64))> = cell_set
            .par_iter()
            .map(|&cell| {
                let mut row = Vec::new();
                let mut sum1 = 0.0f64;
                let mut sum2 = 0.0f64;
                for entry in store.expression(cell) {
                    if let Ok(local) = gene_set.binary_search(&entry.gene) {
                        row.push((local as u32, entry.count));
                        sum1 += entry.count as f64;
                        sum2 += (entry.count as f64) * (entry.count as f64);
                    }
                }
                (row, (sum1, sum2))
            })
            .collect();
        let (rows, sums) = rows_and_sums.into_iter().unzip();
        SubsetView {
            gene_set: gene_set.to_vec(),
            cell_set: cell_set.to_vec(),
            rows,
            sums,
        }
    }

    pub fn n_genes(&self) -> usize {
        self.gene_set.len()
    }

    pub fn n_cells(&self) -> usize {
        self.cell_set.len()
    }

    pub fn gene_set(&self) -> &[GeneId] {
        &self.gene_set
    }

    pub fn cell_set(&self) -> &[CellId] {
        &self.cell_set
    }

    /// Row for the `i`-th cell of `cell_set`, as `(localGeneId, count)`.
    pub fn row(&self, i: usize) -> &[(u32, f32)] {
        &self.rows[i]
    }

    /// `(sum1, sum2)` restricted to the gene-set, for the `i`-th cell.
    pub fn sums(&self, i: usize) -> (f64, f64) {
        self.sums[i]
    }

    pub fn local_index_of_cell(&self, cell: CellId) -> Option<usize> {
        self.cell_set.binary_search(&cell).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cell_store::StoreConfig;

    fn meta(name: &str) -> Vec<(String, String)> {
        vec![("CellName".to_string(), name.to_string())]
    }

    #[test]
    fn restricts_rows_and_sums_to_the_gene_set() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        store
            .add_cell(&meta("a"), &[("G1".into(), 1.0), ("G2".into(), 2.0), ("G3".into(), 3.0)])
            .unwrap();
        store
            .add_cell(&meta("b"), &[("G2".into(), 5.0)])
            .unwrap();

        let g1 = store.gene_id("G1").unwrap();
        let g3 = store.gene_id("G3").unwrap();
        let mut gene_set = vec![g1, g3];
        gene_set.sort();
        let cell_set: Vec<CellId> = store.all_cell_ids();

        let view = SubsetView::build(&store, &gene_set, &cell_set);
        assert_eq!(view.n_genes(), 2);
        assert_eq!(view.n_cells(), 2);
        // cell "a" has G1 and G3 in the subset, not G2.
        assert_eq!(view.row(0).len(), 2);
        let (sum1, sum2) = view.sums(0);
        assert_eq!(sum1, 4.0);
        assert_eq!(sum2, 1.0 + 9.0);
        // cell "b" has none of its genes in the subset.
        assert_eq!(view.row(1).len(), 0);
    }
}
