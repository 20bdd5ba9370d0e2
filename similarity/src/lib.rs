//! Exact Pearson correlation between two cells' sparse gene vectors,
//! computed over either the full gene universe or a `SubsetView`.

use cell_store::{CellId, EntityStore};
use subset_view::SubsetView;

/// `Σ_g x_{a,g} · x_{b,g}` via a two-pointer intersection of two sorted,
/// gene-unique sparse vectors.
pub fn scalar_product(a: &[(u32, f32)], b: &[(u32, f32)]) -> f64 {
    let mut i = 0;
    let mut j = 0;
    let mut s = 0.0f64;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                s += (a[i].1 as f64) * (b[j].1 as f64);
                i += 1;
                j += 1;
            }
        }
    }
    s
}

/// Pearson correlation from precomputed sums and the cross scalar product.
/// Returns `NaN` when either cell has non-positive variance (constant, or
/// all-zero, expression over the `n` genes considered) -- the denominator is
/// then zero or undefined and the pair must be excluded from selection.
pub fn pearson(n: f64, sum1_a: f64, sum2_a: f64, sum1_b: f64, sum2_b: f64, s: f64) -> f64 {
    let var_a = n * sum2_a - sum1_a * sum1_a;
    let var_b = n * sum2_b - sum1_b * sum1_b;
    let denom_sq = var_a * var_b;
    if denom_sq <= 0.0 {
        return f64::NAN;
    }
    (n * s - sum1_a * sum1_b) / denom_sq.sqrt()
}

/// Similarity of two cells over the full gene universe (`n_genes` genes),
/// using the store's precomputed whole-cell `sum1`/`sum2`.
pub fn similarity_full(store: &EntityStore, a: CellId, b: CellId, n_genes: usize) -> f64 {
    let ra = store.cell_record(a);
    let rb = store.cell_record(b);
    let row_a: Vec<(u32, f32)> = store.expression(a).iter().map(|e| (e.gene, e.count)).collect();
    let row_b: Vec<(u32, f32)> = store.expression(b).iter().map(|e| (e.gene, e.count)).collect();
    let s = scalar_product(&row_a, &row_b);
    pearson(n_genes as f64, ra.sum1, ra.sum2, rb.sum1, rb.sum2, s)
}

/// Similarity of the `i`-th and `j`-th cells of a `SubsetView`, restricted
/// to that view's gene-set (`n = |G|`, sums restricted to `G`).
pub fn similarity_subset(view: &SubsetView, i: usize, j: usize) -> f64 {
    let (sum1_a, sum2_a) = view.sums(i);
    let (sum1_b, sum2_b) = view.sums(j);
    let s = scalar_product(view.row(i), view.row(j));
    pearson(view.n_genes() as f64, sum1_a, sum2_a, sum1_b, sum2_b, s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_vectors_have_similarity_one() {
        let row = vec![(0u32, 1.0f32), (1, 2.0), (2, 3.0)];
        let sum1 = 6.0;
        let sum2 = 1.0 + 4.0 + 9.0;
        let s = scalar_product(&row, &row);
        let sim = pearson(3.0, sum1, sum2, sum1, sum2, s);
        assert!((sim - 1.0).abs() < 1e-9);
    }

    #[test]
    fn constant_vector_is_nan() {
        // n*sum2 - sum1^2 == 0 for a constant vector over n genes.
        let row = vec![(0u32, 2.0f32), (1, 2.0)];
        let sum1 = 4.0;
        let sum2 = 8.0;
        let s = scalar_product(&row, &row);
        let sim = pearson(2.0, sum1, sum2, sum1, sum2, s);
        assert!(sim.is_nan());
    }

    #[test]
    fn disjoint_vectors_have_zero_scalar_product() {
        let a = vec![(0u32, 1.0f32), (2, 1.0)];
        let b = vec![(1u32, 1.0f32), (3, 1.0)];
        assert_eq!(scalar_product(&a, &b), 0.0);
    }
}
