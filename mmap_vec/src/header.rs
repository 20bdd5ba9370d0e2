// Fixed 256-byte header shared by every file this crate writes.  Field order
// is part of the on-disk format; do not reorder without bumping the magic.
//
// Layout (little endian, all u64 except the trailing padding):
//   0   magic          0xA3756FD4B5D8BCC1
//   8   header_size    always HEADER_SIZE (256)
//   16  object_size    size_of::<T>() for the element type
//   24  object_count   number of logically-present elements
//   32  page_count     number of PAGE_SIZE pages backing the mapping
//   40  file_size      total file length in bytes
//   48  capacity       number of elements the current allocation can hold
//   56..256  reserved, zero-filled

use crate::error::{Error, Result};
use std::path::Path;

pub const MAGIC: u64 = 0xA375_6FD4_B5D8_BCC1;
pub const HEADER_SIZE: usize = 256;
pub const PAGE_SIZE: usize = 4096;

#[derive(Clone, Copy, Debug)]
pub struct Header {
    pub object_size: u64,
    pub object_count: u64,
    pub page_count: u64,
    pub file_size: u64,
    pub capacity: u64,
}

impl Header {
    pub fn new(object_size: u64, object_count: u64, capacity: u64, file_size: u64) -> Header {
        let page_count = (file_size as usize).div_ceil(PAGE_SIZE) as u64;
        Header {
            object_size,
            object_count,
            page_count,
            file_size,
            capacity,
        }
    }

    pub fn write_to(&self, buf: &mut [u8]) {
        assert!(buf.len() >= HEADER_SIZE);
        buf[0..56].fill(0);
        buf[0..8].copy_from_slice(&MAGIC.to_le_bytes());
        buf[8..16].copy_from_slice(&(HEADER_SIZE as u64).to_le_bytes());
        buf[16..24].copy_from_slice(&self.object_size.to_le_bytes());
        buf[24..32].copy_from_slice(&self.object_count.to_le_bytes());
        buf[32..40].copy_from_slice(&self.page_count.to_le_bytes());
        buf[40..48].copy_from_slice(&self.file_size.to_le_bytes());
        buf[48..56].copy_from_slice(&self.capacity.to_le_bytes());
        buf[56..HEADER_SIZE].fill(0);
    }

    pub fn read_from(path: &Path, buf: &[u8], expected_object_size: u64) -> Result<Header> {
        if buf.len() < HEADER_SIZE {
            return Err(Error::corrupt(path, "file shorter than header"));
        }
        let magic = u64::from_le_bytes(buf[0..8].try_into().unwrap());
        if magic != MAGIC {
            return Err(Error::corrupt(path, format!("bad magic {magic:#x}")));
        }
        let header_size = u64::from_le_bytes(buf[8..16].try_into().unwrap());
        if header_size as usize != HEADER_SIZE {
            return Err(Error::corrupt(path, format!("bad header_size {header_size}")));
        }
        let object_size = u64::from_le_bytes(buf[16..24].try_into().unwrap());
        if object_size != expected_object_size {
            return Err(Error::corrupt(
                path,
                format!("object_size mismatch: file has {object_size}, expected {expected_object_size}"),
            ));
        }
        let object_count = u64::from_le_bytes(buf[24..32].try_into().unwrap());
        let page_count = u64::from_le_bytes(buf[32..40].try_into().unwrap());
        let file_size = u64::from_le_bytes(buf[40..48].try_into().unwrap());
        let capacity = u64::from_le_bytes(buf[48..56].try_into().unwrap());
        if object_count > capacity {
            return Err(Error::corrupt(path, "object_count exceeds capacity"));
        }
        let needed = HEADER_SIZE as u64 + capacity * object_size;
        if file_size < needed {
            return Err(Error::corrupt(path, "file_size smaller than header + capacity"));
        }
        Ok(Header {
            object_size,
            object_count,
            page_count,
            file_size,
            capacity,
        })
    }
}

/// Round a byte length up to the next multiple of `PAGE_SIZE`.
pub fn round_up_to_page(bytes: usize) -> usize {
    bytes.div_ceil(PAGE_SIZE) * PAGE_SIZE
}
