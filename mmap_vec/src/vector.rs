// A contiguous, file-backed array of fixed-layout `T`, following the layout
// described in `header.rs`: a 256-byte header followed by `capacity` slots of
// `T`, only `object_count` of which are logically present.
//
// Growth on `push_back` overflow remaps the file at `1.5 * new_len`
// (rounded up to a whole number of elements), per the documented policy.

use std::fs::{File, OpenOptions};
use std::marker::PhantomData;
use std::mem::size_of;
use std::path::{Path, PathBuf};

use memmap2::MmapMut;
use tracing::debug;

use crate::error::{Error, Result};
use crate::header::{round_up_to_page, Header, HEADER_SIZE};

/// Marker for types with a stable, `#[repr(C)]`-style byte layout that may be
/// memory-mapped directly, and for which the all-zero bit pattern is a valid
/// value (new slots are zero-filled on creation and on growth).
///
/// # Safety
/// Implementors must be `Copy`, contain no padding that aliases with other
/// fields across platforms, and treat all-zero bytes as a legal value.
pub unsafe trait FixedLayout: Copy + Sized + 'static {}

macro_rules! impl_fixed_layout {
    ($($t:ty),*) => {
        $(unsafe impl FixedLayout for $t {})*
    };
}
impl_fixed_layout!(u8, u16, u32, u64, i8, i16, i32, i64, f32, f64);

pub struct Vector<T: FixedLayout> {
    path: PathBuf,
    file: File,
    mmap: MmapMut,
    object_count: usize,
    capacity: usize,
    writable: bool,
    _marker: PhantomData<T>,
}

impl<T: FixedLayout> Vector<T> {
    pub fn create_new(path: impl AsRef<Path>, n: usize, capacity: usize) -> Result<Vector<T>> {
        let path = path.as_ref().to_path_buf();
        let capacity = capacity.max(n).max(1);
        let object_size = size_of::<T>() as u64;
        let data_bytes = capacity * size_of::<T>();
        let file_size = HEADER_SIZE + round_up_to_page(data_bytes);

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create_new(true)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;
        file.set_len(file_size as u64)
            .map_err(|e| Error::io(&path, e))?;

        let mut mmap = unsafe { MmapMut::map_mut(&file).map_err(|e| Error::io(&path, e))? };
        let header = Header::new(object_size, n as u64, capacity as u64, file_size as u64);
        header.write_to(&mut mmap[0..HEADER_SIZE]);

        debug!(path = %path.display(), n, capacity, "created mmap vector");
        Ok(Vector {
            path,
            file,
            mmap,
            object_count: n,
            capacity,
            writable: true,
            _marker: PhantomData,
        })
    }

    pub fn access_existing(path: impl AsRef<Path>, writable: bool) -> Result<Vector<T>> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .read(true)
            .write(writable)
            .open(&path)
            .map_err(|e| Error::io(&path, e))?;
        let mmap = unsafe { MmapMut::map_mut(&file).map_err(|e| Error::io(&path, e))? };
        let header = Header::read_from(&path, &mmap[..], size_of::<T>() as u64)?;
        Ok(Vector {
            path,
            file,
            mmap,
            object_count: header.object_count as usize,
            capacity: header.capacity as usize,
            writable,
            _marker: PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.object_count
    }

    pub fn is_empty(&self) -> bool {
        self.object_count == 0
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn data_offset(&self, index: usize) -> usize {
        HEADER_SIZE + index * size_of::<T>()
    }

    pub fn as_slice(&self) -> &[T] {
        let bytes = &self.mmap[HEADER_SIZE..HEADER_SIZE + self.object_count * size_of::<T>()];
        unsafe { std::slice::from_raw_parts(bytes.as_ptr() as *const T, self.object_count) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let n = self.object_count;
        let bytes = &mut self.mmap[HEADER_SIZE..HEADER_SIZE + n * size_of::<T>()];
        unsafe { std::slice::from_raw_parts_mut(bytes.as_mut_ptr() as *mut T, n) }
    }

    pub fn get(&self, index: usize) -> T {
        self.as_slice()[index]
    }

    pub fn set(&mut self, index: usize, value: T) {
        self.as_mut_slice()[index] = value;
    }

    /// Grow the backing file so that `capacity` is at least `min_capacity`
    /// elements, remapping in place. New slots are zero-filled.
    pub fn reserve(&mut self, min_capacity: usize) -> Result<()> {
        if min_capacity <= self.capacity {
            return Ok(());
        }
        if !self.writable {
            return Err(Error::CapacityExhausted {
                reason: "cannot grow a read-only mapping".to_string(),
            });
        }
        let object_size = size_of::<T>();
        let data_bytes = min_capacity * object_size;
        let new_file_size = HEADER_SIZE + round_up_to_page(data_bytes);

        self.sync_to_disk()?;
        // Drop the old mapping before resizing the file underneath it.
        self.mmap = MmapMut::map_anon(1).map_err(|e| Error::io(&self.path, e))?;
        self.file
            .set_len(new_file_size as u64)
            .map_err(|e| Error::io(&self.path, e))?;
        self.mmap = unsafe { MmapMut::map_mut(&self.file).map_err(|e| Error::io(&self.path, e))? };

        let zero_start = self.data_offset(self.object_count);
        let zero_end = self.data_offset(min_capacity);
        self.mmap[zero_start..zero_end].fill(0);
        self.capacity = min_capacity;
        self.write_header();
        debug!(path = %self.path.display(), new_capacity = min_capacity, "grew mmap vector");
        Ok(())
    }

    fn write_header(&mut self) {
        let header = Header::new(
            size_of::<T>() as u64,
            self.object_count as u64,
            self.capacity as u64,
            self.mmap.len() as u64,
        );
        header.write_to(&mut self.mmap[0..HEADER_SIZE]);
    }

    pub fn push_back(&mut self, value: T) -> Result<()> {
        if self.object_count == self.capacity {
            let new_size = self.object_count + 1;
            let new_capacity = ((1.5 * new_size as f64).ceil() as usize).max(new_size);
            self.reserve(new_capacity)?;
        }
        self.object_count += 1;
        self.set(self.object_count - 1, value);
        self.write_header();
        Ok(())
    }

    /// Resize to `new_len`, zero-filling (or `fill`-filling) any newly
    /// created slots.
    pub fn resize(&mut self, new_len: usize, fill: T) -> Result<()> {
        if new_len > self.capacity {
            self.reserve(new_len)?;
        }
        if new_len > self.object_count {
            for i in self.object_count..new_len {
                self.set(i, fill);
            }
        }
        self.object_count = new_len;
        self.write_header();
        Ok(())
    }

    pub fn sync_to_disk(&self) -> Result<()> {
        self.mmap.flush().map_err(|e| Error::io(&self.path, e))
    }

    pub fn close(self) -> Result<()> {
        self.sync_to_disk()
    }

    /// Remove the backing file. The store directory layout treats removal of
    /// a named set or index as removal of its whole file.
    pub fn remove(path: impl AsRef<Path>) -> Result<()> {
        std::fs::remove_file(path.as_ref()).map_err(|e| Error::io(path.as_ref(), e))
    }
}

impl<T: FixedLayout> Drop for Vector<T> {
    fn drop(&mut self) {
        let _ = self.mmap.flush();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip_push_and_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.bin");
        {
            let mut v = Vector::<u32>::create_new(&path, 0, 4).unwrap();
            for i in 0..10u32 {
                v.push_back(i).unwrap();
            }
            assert_eq!(v.len(), 10);
            v.sync_to_disk().unwrap();
        }
        let v2 = Vector::<u32>::access_existing(&path, false).unwrap();
        assert_eq!(v2.len(), 10);
        assert_eq!(v2.as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
    }

    #[test]
    fn growth_policy_is_one_point_five_x() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.bin");
        let mut v = Vector::<u8>::create_new(&path, 0, 2).unwrap();
        v.push_back(1).unwrap();
        v.push_back(2).unwrap();
        assert_eq!(v.capacity(), 2);
        v.push_back(3).unwrap();
        // new_size = 3 -> ceil(1.5 * 3) = 5
        assert_eq!(v.capacity(), 5);
    }

    #[test]
    fn reopen_rejects_bad_magic() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("v.bin");
        std::fs::write(&path, vec![0u8; 300]).unwrap();
        let err = Vector::<u32>::access_existing(&path, false).unwrap_err();
        assert!(matches!(err, Error::Corrupt { .. }));
    }
}
