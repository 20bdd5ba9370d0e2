// A jagged array: a flat `data: Vector<T>` plus a table-of-contents
// `toc: Vector<Int>` of size `outer_count + 1`, where `toc[i]` is the byte^W
// element offset at which row `i` starts in `data`, and `toc[outer_count]`
// is the total element count of `data`.
//
// Two ways to build one:
//  - streaming, one row at a time (`append_empty_row` / `append_to_last_row`),
//    used while a single writer ingests cells one at a time;
//  - bulk, two-pass (`build_from_row_lengths` then `row_mut`), used when the
//    row lengths are all known up front and rows can be filled independently
//    -- the shape that makes sharded concurrent ingestion possible, since
//    each row's slice is disjoint from every other row's once the TOC is
//    fixed by the prefix sum in pass one.

use std::path::Path;

use crate::error::Result;
use crate::vector::{FixedLayout, Vector};

pub trait IndexInt: FixedLayout + Eq {
    fn to_usize(self) -> usize;
    fn from_usize(x: usize) -> Self;
    fn invalid() -> Self;
}

impl IndexInt for u32 {
    fn to_usize(self) -> usize {
        self as usize
    }
    fn from_usize(x: usize) -> Self {
        x as u32
    }
    fn invalid() -> Self {
        u32::MAX
    }
}

impl IndexInt for u64 {
    fn to_usize(self) -> usize {
        self as usize
    }
    fn from_usize(x: usize) -> Self {
        x as u64
    }
    fn invalid() -> Self {
        u64::MAX
    }
}

pub struct VectorOfVectors<T: FixedLayout, Int: IndexInt> {
    toc: Vector<Int>,
    data: Vector<T>,
}

impl<T: FixedLayout, Int: IndexInt> VectorOfVectors<T, Int> {
    pub fn create_new(
        toc_path: impl AsRef<Path>,
        data_path: impl AsRef<Path>,
        outer_capacity_hint: usize,
        data_capacity_hint: usize,
    ) -> Result<Self> {
        let mut toc = Vector::<Int>::create_new(toc_path, 1, outer_capacity_hint + 1)?;
        toc.set(0, Int::from_usize(0));
        let data = Vector::<T>::create_new(data_path, 0, data_capacity_hint)?;
        Ok(VectorOfVectors { toc, data })
    }

    pub fn access_existing(
        toc_path: impl AsRef<Path>,
        data_path: impl AsRef<Path>,
        writable: bool,
    ) -> Result<Self> {
        let toc = Vector::<Int>::access_existing(toc_path, writable)?;
        let data = Vector::<T>::access_existing(data_path, writable)?;
        Ok(VectorOfVectors { toc, data })
    }

    pub fn outer_count(&self) -> usize {
        self.toc.len() - 1
    }

    pub fn total_len(&self) -> usize {
        self.data.len()
    }

    fn offset(&self, i: usize) -> usize {
        self.toc.get(i).to_usize()
    }

    pub fn row_len(&self, i: usize) -> usize {
        self.offset(i + 1) - self.offset(i)
    }

    pub fn row(&self, i: usize) -> &[T] {
        let start = self.offset(i);
        let end = self.offset(i + 1);
        &self.data.as_slice()[start..end]
    }

    pub fn row_mut(&mut self, i: usize) -> &mut [T] {
        let start = self.offset(i);
        let end = self.offset(i + 1);
        &mut self.data.as_mut_slice()[start..end]
    }

    /// Streaming build: append a new, initially-empty row.
    pub fn append_empty_row(&mut self) -> Result<()> {
        let total = self.data.len();
        self.toc.push_back(Int::from_usize(total))
    }

    /// Streaming build: append one element to the most recently appended row.
    pub fn append_to_last_row(&mut self, value: T) -> Result<()> {
        self.data.push_back(value)?;
        let last = self.toc.len() - 1;
        let new_total = self.data.len();
        self.toc.set(last, Int::from_usize(new_total));
        self.toc.sync_to_disk()
    }

    /// Two-pass bulk build, pass 2: given per-row lengths computed in pass 1,
    /// prefix-sum them into the TOC and zero-fill the data array so that rows
    /// can then be filled independently (e.g. one thread per shard of rows)
    /// via repeated calls to `row_mut`.
    pub fn build_from_row_lengths(
        toc_path: impl AsRef<Path>,
        data_path: impl AsRef<Path>,
        row_lengths: &[usize],
        zero: T,
    ) -> Result<Self> {
        let outer_count = row_lengths.len();
        let mut toc = Vector::<Int>::create_new(toc_path, outer_count + 1, outer_count + 1)?;
        let mut running = 0usize;
        toc.set(0, Int::from_usize(0));
        for (i, len) in row_lengths.iter().enumerate() {
            running += len;
            toc.set(i + 1, Int::from_usize(running));
        }
        toc.sync_to_disk()?;
        let mut data = Vector::<T>::create_new(data_path, running, running)?;
        data.resize(running, zero)?;
        Ok(VectorOfVectors { toc, data })
    }

    pub fn sync_to_disk(&self) -> Result<()> {
        self.toc.sync_to_disk()?;
        self.data.sync_to_disk()
    }

    pub fn close(self) -> Result<()> {
        self.sync_to_disk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn streaming_build_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let toc_path = dir.path().join("toc.bin");
        let data_path = dir.path().join("data.bin");
        {
            let mut v = VectorOfVectors::<u32, u64>::create_new(&toc_path, &data_path, 4, 16).unwrap();
            v.append_empty_row().unwrap();
            v.append_to_last_row(10).unwrap();
            v.append_to_last_row(20).unwrap();
            v.append_empty_row().unwrap();
            v.append_empty_row().unwrap();
            v.append_to_last_row(30).unwrap();
            v.sync_to_disk().unwrap();
            assert_eq!(v.row(0), &[10, 20]);
            assert_eq!(v.row(1), &[] as &[u32]);
            assert_eq!(v.row(2), &[30]);
        }
        let v2 = VectorOfVectors::<u32, u64>::access_existing(&toc_path, &data_path, false).unwrap();
        assert_eq!(v2.outer_count(), 3);
        assert_eq!(v2.row(0), &[10, 20]);
        assert_eq!(v2.row(2), &[30]);
    }

    #[test]
    fn bulk_build_prefix_sums_toc() {
        let dir = tempfile::tempdir().unwrap();
        let toc_path = dir.path().join("toc.bin");
        let data_path = dir.path().join("data.bin");
        let lengths = [2usize, 0, 3, 1];
        let mut v =
            VectorOfVectors::<u32, u64>::build_from_row_lengths(&toc_path, &data_path, &lengths, 0).unwrap();
        assert_eq!(v.outer_count(), 4);
        assert_eq!(v.total_len(), 6);
        v.row_mut(0).copy_from_slice(&[1, 2]);
        v.row_mut(2).copy_from_slice(&[3, 4, 5]);
        v.row_mut(3).copy_from_slice(&[6]);
        assert_eq!(v.row(0), &[1, 2]);
        assert_eq!(v.row(1), &[] as &[u32]);
        assert_eq!(v.row(2), &[3, 4, 5]);
        assert_eq!(v.row(3), &[6]);
    }
}
