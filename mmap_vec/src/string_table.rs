// Open-addressing `name -> Id` hash table, backed by a fixed-capacity
// `Vector<Bucket>` and a `VectorOfVectors<u8, u32>` arena holding the
// interned bytes in insertion order (so the arena row index *is* the dense
// `Id`, giving a free `Id -> name` reverse map).
//
// Capacity is fixed at creation and never grows; callers must size for at
// least 2x the number of names they expect to intern, per the documented
// contract. Probing is linear; this is adequate for the load factors the
// capacity contract implies (<= 50%).

use std::hash::{Hash, Hasher};
use std::path::Path;

use crate::error::{Error, Result};
use crate::jagged::{IndexInt, VectorOfVectors};
use crate::vector::{FixedLayout, Vector};

#[repr(C)]
#[derive(Clone, Copy)]
struct Bucket {
    occupied: u32,
    hash: u64,
    string_id: u32,
}

unsafe impl FixedLayout for Bucket {}

const EMPTY_BUCKET: Bucket = Bucket {
    occupied: 0,
    hash: 0,
    string_id: 0,
};

fn hash_name(name: &str) -> u64 {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    name.hash(&mut hasher);
    hasher.finish()
}

pub struct StringTable<Id: IndexInt> {
    buckets: Vector<Bucket>,
    arena: VectorOfVectors<u8, u32>,
    capacity: usize,
    _marker: std::marker::PhantomData<Id>,
}

impl<Id: IndexInt> StringTable<Id> {
    pub fn create_new(
        buckets_path: impl AsRef<Path>,
        arena_toc_path: impl AsRef<Path>,
        arena_data_path: impl AsRef<Path>,
        capacity: usize,
    ) -> Result<Self> {
        let mut buckets = Vector::<Bucket>::create_new(buckets_path, capacity, capacity)?;
        for i in 0..capacity {
            buckets.set(i, EMPTY_BUCKET);
        }
        let arena = VectorOfVectors::<u8, u32>::create_new(arena_toc_path, arena_data_path, capacity, capacity * 8)?;
        Ok(StringTable {
            buckets,
            arena,
            capacity,
            _marker: std::marker::PhantomData,
        })
    }

    pub fn access_existing(
        buckets_path: impl AsRef<Path>,
        arena_toc_path: impl AsRef<Path>,
        arena_data_path: impl AsRef<Path>,
        writable: bool,
    ) -> Result<Self> {
        let buckets = Vector::<Bucket>::access_existing(buckets_path, writable)?;
        let arena = VectorOfVectors::<u8, u32>::access_existing(arena_toc_path, arena_data_path, writable)?;
        let capacity = buckets.len();
        Ok(StringTable {
            buckets,
            arena,
            capacity,
            _marker: std::marker::PhantomData,
        })
    }

    pub fn len(&self) -> usize {
        self.arena.outer_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn probe_for(&self, name: &str) -> (u64, usize) {
        let hash = hash_name(name);
        let start = (hash as usize) % self.capacity;
        (hash, start)
    }

    /// Return the existing `Id` for `name`, or `Id::invalid()` if absent.
    pub fn get(&self, name: &str) -> Id {
        let (hash, start) = self.probe_for(name);
        for probe in 0..self.capacity {
            let slot = (start + probe) % self.capacity;
            let b = self.buckets.get(slot);
            if b.occupied == 0 {
                return Id::invalid();
            }
            if b.hash == hash && self.arena.row(b.string_id as usize) == name.as_bytes() {
                return Id::from_usize(b.string_id as usize);
            }
        }
        Id::invalid()
    }

    /// Return the existing `Id` for `name`, interning it if absent.
    pub fn get_or_insert(&mut self, name: &str) -> Result<Id> {
        let (hash, start) = self.probe_for(name);
        for probe in 0..self.capacity {
            let slot = (start + probe) % self.capacity;
            let b = self.buckets.get(slot);
            if b.occupied == 0 {
                let id = self.arena.outer_count();
                self.arena.append_empty_row()?;
                for byte in name.as_bytes() {
                    self.arena.append_to_last_row(*byte)?;
                }
                self.buckets.set(
                    slot,
                    Bucket {
                        occupied: 1,
                        hash,
                        string_id: id as u32,
                    },
                );
                return Ok(Id::from_usize(id));
            }
            if b.hash == hash && self.arena.row(b.string_id as usize) == name.as_bytes() {
                return Ok(Id::from_usize(b.string_id as usize));
            }
        }
        Err(Error::CapacityExhausted {
            reason: format!("string table of capacity {} is full", self.capacity),
        })
    }

    pub fn name_of(&self, id: Id) -> String {
        String::from_utf8(self.arena.row(id.to_usize()).to_vec()).expect("interned names are valid utf8")
    }

    pub fn sync_to_disk(&self) -> Result<()> {
        self.buckets.sync_to_disk()?;
        self.arena.sync_to_disk()
    }

    pub fn close(self) -> Result<()> {
        self.sync_to_disk()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interns_and_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let buckets = dir.path().join("buckets.bin");
        let toc = dir.path().join("arena_toc.bin");
        let data = dir.path().join("arena_data.bin");
        let id_a;
        let id_b;
        {
            let mut t = StringTable::<u32>::create_new(&buckets, &toc, &data, 64).unwrap();
            id_a = t.get_or_insert("ACTB").unwrap();
            id_b = t.get_or_insert("GAPDH").unwrap();
            assert_eq!(t.get_or_insert("ACTB").unwrap(), id_a);
            assert_ne!(id_a, id_b);
            assert_eq!(t.get("NOT_THERE"), u32::invalid());
            t.sync_to_disk().unwrap();
        }
        let t2 = StringTable::<u32>::access_existing(&buckets, &toc, &data, false).unwrap();
        assert_eq!(t2.get("ACTB"), id_a);
        assert_eq!(t2.name_of(id_b), "GAPDH");
        assert_eq!(t2.len(), 2);
    }
}
