//! Locality-sensitive hashing: random unit hyperplanes over gene-space,
//! turning each cell's sparse expression vector into a fixed-width bit
//! signature whose Hamming distance estimates the angle (and, since the
//! hyperplanes are drawn against centered vectors, the Pearson correlation)
//! between cells.

use bitsig::SignatureArena;
use rand::{Rng, SeedableRng};
use rand_distr::{Distribution, StandardNormal};
use rand_mt::Mt19937GenRand64;
use subset_view::SubsetView;
use tracing::debug;
use std::f64::consts::PI;

/// `L` random hyperplanes over a gene-space of dimension `m = |G|`, each
/// normalized to unit L2 norm, with `S_j = Σ_g U_{j,g}` precomputed for the
/// centered scalar-product trick.
pub struct LshModel {
    bit_count: usize,
    n_genes: usize,
    planes: Vec<Vec<f32>>,
    plane_sums: Vec<f64>,
}

impl LshModel {
    /// Draw `bit_count` random unit vectors in a gene-space of dimension
    /// `n_genes`, deterministically from `seed` via a Mersenne Twister.
    pub fn build(n_genes: usize, bit_count: usize, seed: u64) -> LshModel {
        let mut rng = Mt19937GenRand64::seed_from_u64(seed);
        let mut planes = Vec::with_capacity(bit_count);
        let mut plane_sums = Vec::with_capacity(bit_count);
        for _ in 0..bit_count {
            let mut v: Vec<f64> = (0..n_genes).map(|_| StandardNormal.sample(&mut rng)).collect();
            let norm: f64 = v.iter().map(|x| x * x).sum::<f64>().sqrt();
            if norm > 0.0 {
                for x in v.iter_mut() {
                    *x /= norm;
                }
            }
            plane_sums.push(v.iter().sum());
            planes.push(v.iter().map(|&x| x as f32).collect());
        }
        debug!(bit_count, n_genes, seed, "built LSH model");
        LshModel {
            bit_count,
            n_genes,
            planes,
            plane_sums,
        }
    }

    pub fn bit_count(&self) -> usize {
        self.bit_count
    }

    pub fn n_genes(&self) -> usize {
        self.n_genes
    }

    /// Build one signature arena covering every cell of `view`. `view` must
    /// have been built against the same gene-set dimension this model was
    /// drawn for.
    pub fn build_signatures(&self, view: &SubsetView) -> SignatureArena {
        assert_eq!(
            self.n_genes,
            view.n_genes(),
            "LSH model drawn for a different gene-space dimension than this subset view"
        );
        let m = self.n_genes.max(1) as f64;
        let mut arena = SignatureArena::with_capacity(self.bit_count, view.n_cells());
        for i in 0..view.n_cells() {
            let (sum1, _) = view.sums(i);
            let mu = sum1 / m;
            let row = view.row(i);
            arena.set_signature(i, |j| {
                let mut scalar = -mu * self.plane_sums[j];
                let plane = &self.planes[j];
                for &(gene, count) in row {
                    scalar += (count as f64) * (plane[gene as usize] as f64);
                }
                scalar > 0.0
            });
        }
        arena
    }
}

/// Estimated cosine (== Pearson correlation, by the centered-unit-vector
/// equality) from a Hamming distance `h` over `bit_count` bits.
pub fn hamming_to_correlation(h: usize, bit_count: usize) -> f64 {
    (PI * h as f64 / bit_count as f64).cos()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_is_bit_for_bit_deterministic() {
        let a = LshModel::build(50, 32, 7);
        let b = LshModel::build(50, 32, 7);
        assert_eq!(a.planes, b.planes);
    }

    #[test]
    fn hamming_zero_is_correlation_one() {
        assert!((hamming_to_correlation(0, 64) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn hamming_half_bits_is_correlation_zero() {
        assert!(hamming_to_correlation(32, 64).abs() < 1e-12);
    }
}
