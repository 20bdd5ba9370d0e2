// Fixed-layout record types mapped directly onto the store's on-disk files.

use mmap_vec::FixedLayout;

pub type GeneId = u32;
pub type CellId = u32;
pub type StringId = u32;

pub const INVALID_STRING: StringId = u32::MAX;

/// One non-zero entry of a cell's sparse expression vector: `CellExpressionCounts`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ExprEntry {
    pub gene: GeneId,
    pub count: f32,
}

unsafe impl FixedLayout for ExprEntry {}

/// One (name, value) meta-data pair: `CellMetaData`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MetaPair {
    pub name_id: StringId,
    pub value_id: StringId,
}

unsafe impl FixedLayout for MetaPair {}

/// Fixed per-cell scalar record: `Cells`.
///
/// `norm1` is not stored separately because, with non-negative expression
/// counts, the L1 norm equals `sum1`. Norms are computed before their
/// inverses, not the other way around -- `norm1_inverse` is `1.0 / sum1`
/// (0 if `sum1` is 0), and `norm2` / `norm2_inverse` are `sqrt(sum2)` / its
/// reciprocal.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellRecord {
    pub sum1: f64,
    pub sum2: f64,
    pub norm2: f64,
    pub norm1_inverse: f64,
    pub norm2_inverse: f64,
}

unsafe impl FixedLayout for CellRecord {}

impl CellRecord {
    pub fn from_counts(counts: &[ExprEntry]) -> CellRecord {
        let mut sum1 = 0.0f64;
        let mut sum2 = 0.0f64;
        for e in counts {
            sum1 += e.count as f64;
            sum2 += (e.count as f64) * (e.count as f64);
        }
        let norm2 = sum2.sqrt();
        let norm1_inverse = if sum1 > 0.0 { 1.0 / sum1 } else { 0.0 };
        let norm2_inverse = if norm2 > 0.0 { 1.0 / norm2 } else { 0.0 };
        CellRecord {
            sum1,
            sum2,
            norm2,
            norm1_inverse,
            norm2_inverse,
        }
    }
}
