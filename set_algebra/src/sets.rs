// Sorted, deduplicated `Vector<u32>` files: the on-disk representation of
// both gene-sets and cell-sets (GeneId and CellId are both u32).

use std::path::Path;

use mmap_vec::Vector;
use regex::Regex;

use crate::error::Result;

pub fn read_ids(path: impl AsRef<Path>) -> Result<Vec<u32>> {
    let v = Vector::<u32>::access_existing(path, false)?;
    Ok(v.as_slice().to_vec())
}

pub fn write_ids(path: impl AsRef<Path>, ids: &[u32]) -> Result<()> {
    let mut v = Vector::<u32>::create_new(path, 0, ids.len().max(1))?;
    for &id in ids {
        v.push_back(id)?;
    }
    v.sync_to_disk()?;
    Ok(())
}

/// Whether `re` matches the *entire* string, not just a substring of it.
pub fn full_match(re: &Regex, s: &str) -> bool {
    re.find(s).map(|m| m.start() == 0 && m.end() == s.len()).unwrap_or(false)
}

pub fn merge_sorted_unique(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len() + b.len());
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => {
                out.push(a[i]);
                i += 1;
            }
            std::cmp::Ordering::Greater => {
                out.push(b[j]);
                j += 1;
            }
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&a[i..]);
    out.extend_from_slice(&b[j..]);
    out
}

pub fn intersect_sorted(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::new();
    let mut i = 0;
    let mut j = 0;
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}

/// `a` minus `b`.
pub fn difference_sorted(a: &[u32], b: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(a.len());
    let mut i = 0;
    let mut j = 0;
    while i < a.len() {
        if j >= b.len() || a[i] < b[j] {
            out.push(a[i]);
            i += 1;
        } else if a[i] > b[j] {
            j += 1;
        } else {
            i += 1;
            j += 1;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_union_intersect_difference_agree_with_definitions() {
        let a = [1u32, 2, 4, 6];
        let b = [2u32, 3, 4];
        assert_eq!(merge_sorted_unique(&a, &b), vec![1, 2, 3, 4, 6]);
        assert_eq!(intersect_sorted(&a, &b), vec![2, 4]);
        assert_eq!(difference_sorted(&a, &b), vec![1, 6]);
        let union = merge_sorted_unique(&a, &b);
        let inter = intersect_sorted(&a, &b);
        let diff = difference_sorted(&a, &b);
        let mut reunioned = diff.clone();
        reunioned.extend_from_slice(&inter);
        reunioned.sort();
        assert_eq!(reunioned, a.to_vec());
        let _ = union;
    }
}
