//! Shannon information content of each gene in a gene-set, over a
//! cell-set, under an optional whole-cell normalization.

use cell_store::{CellId, EntityStore, GeneId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Normalization {
    None,
    L1,
    L2,
}

fn normalized_count(store: &EntityStore, cell: CellId, count: f32, norm: Normalization) -> f64 {
    let count = count as f64;
    match norm {
        Normalization::None => count,
        Normalization::L1 => count * store.cell_record(cell).norm1_inverse,
        Normalization::L2 => count * store.cell_record(cell).norm2_inverse,
    }
}

/// `I(g) = log|C| + Σ_{c: x_{c,g}>0} p_c·log(p_c)`, `p_c = x_{c,g} / Σ_c x_{c,g}`,
/// in bits. One entry per gene of `gene_set`, in the same order.
pub fn information_content(
    store: &EntityStore,
    gene_set: &[GeneId],
    cell_set: &[CellId],
    norm: Normalization,
) -> Vec<f64> {
    let n_genes = gene_set.len();
    if cell_set.is_empty() || n_genes == 0 {
        return vec![0.0; n_genes];
    }

    let mut totals = vec![0.0f64; n_genes];
    // (local gene index, normalized value) per cell, reused in the second pass.
    let mut per_cell: Vec<Vec<(usize, f64)>> = Vec::with_capacity(cell_set.len());
    for &cell in cell_set {
        let mut values = Vec::new();
        for entry in store.expression(cell) {
            if let Ok(local) = gene_set.binary_search(&entry.gene) {
                let v = normalized_count(store, cell, entry.count, norm);
                if v > 0.0 {
                    totals[local] += v;
                    values.push((local, v));
                }
            }
        }
        per_cell.push(values);
    }

    let log_n = (cell_set.len() as f64).ln();
    let mut entropy_sum = vec![0.0f64; n_genes];
    for values in &per_cell {
        for &(local, v) in values {
            let total = totals[local];
            if total > 0.0 {
                let p = v / total;
                entropy_sum[local] += p * p.ln();
            }
        }
    }

    let ln2 = std::f64::consts::LN_2;
    (0..n_genes).map(|g| (log_n + entropy_sum[g]) / ln2).collect()
}

/// Genes of `gene_set` with `I(g) > threshold`, preserving `gene_set`'s order.
pub fn select_by_threshold(
    store: &EntityStore,
    gene_set: &[GeneId],
    cell_set: &[CellId],
    norm: Normalization,
    threshold: f64,
) -> Vec<GeneId> {
    let ic = information_content(store, gene_set, cell_set, norm);
    gene_set
        .iter()
        .zip(ic.iter())
        .filter(|(_, &i)| i > threshold)
        .map(|(&g, _)| g)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use cell_store::StoreConfig;

    fn meta(name: &str) -> Vec<(String, String)> {
        vec![("CellName".to_string(), name.to_string())]
    }

    #[test]
    fn uniform_gene_across_cells_has_maximal_information_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        store.add_cell(&meta("a"), &[("G".into(), 1.0)]).unwrap();
        store.add_cell(&meta("b"), &[("G".into(), 1.0)]).unwrap();
        store.add_cell(&meta("c"), &[("G".into(), 1.0)]).unwrap();

        let gene_set: Vec<GeneId> = store.all_gene_ids();
        let cell_set: Vec<CellId> = store.all_cell_ids();
        let ic = information_content(&store, &gene_set, &cell_set, Normalization::None);
        // p_c = 1/3 for all three cells: I = log2(3) + 3*(1/3)*log2(1/3) = 0.
        assert!(ic[0].abs() < 1e-9);
    }

    #[test]
    fn gene_concentrated_in_one_cell_has_zero_information_content() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        store.add_cell(&meta("a"), &[("G".into(), 10.0)]).unwrap();
        store.add_cell(&meta("b"), &[]).unwrap();

        let gene_set: Vec<GeneId> = store.all_gene_ids();
        let cell_set: Vec<CellId> = store.all_cell_ids();
        let ic = information_content(&store, &gene_set, &cell_set, Normalization::None);
        // p_c = 1 for the single expressing cell: log2(2) + 1*log2(1) = 1.
        assert!((ic[0] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn select_by_threshold_preserves_gene_set_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = EntityStore::create_new(dir.path().join("store"), StoreConfig::default()).unwrap();
        store.add_cell(&meta("a"), &[("G1".into(), 1.0), ("G2".into(), 10.0)]).unwrap();
        store.add_cell(&meta("b"), &[("G1".into(), 1.0)]).unwrap();

        let gene_set: Vec<GeneId> = store.all_gene_ids();
        let cell_set: Vec<CellId> = store.all_cell_ids();
        let selected = select_by_threshold(&store, &gene_set, &cell_set, Normalization::None, 0.5);
        assert_eq!(selected, vec![store.gene_id("G2").unwrap()]);
    }
}
