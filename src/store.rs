//! RAM image of the persisted configuration bytes.
//!
//! The firmware keeps the whole config image in RAM and flushes it to
//! flash after any poll that changed it (see `board::flash`). Reads always
//! come from the image, so a value read after a write is never lost.

use crate::config::CONFIG_LEN;
use crate::devices::ByteStore;

/// Value of an erased flash byte.
const ERASED: u8 = 0xFF;

pub struct ImageStore {
    image: [u8; CONFIG_LEN],
    dirty: bool,
    writes: usize,
}

impl ImageStore {
    /// Store backed by blank (erased) memory.
    pub const fn erased() -> Self {
        Self::from_image([ERASED; CONFIG_LEN])
    }

    /// Store preloaded with bytes read from flash.
    pub const fn from_image(image: [u8; CONFIG_LEN]) -> Self {
        Self {
            image,
            dirty: false,
            writes: 0,
        }
    }

    pub fn image(&self) -> &[u8; CONFIG_LEN] {
        &self.image
    }

    /// True if a byte changed since the last [`ImageStore::mark_clean`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Number of byte writes performed so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

impl ByteStore for ImageStore {
    fn read(&mut self, offset: usize) -> u8 {
        self.image.get(offset).copied().unwrap_or(ERASED)
    }

    fn write(&mut self, offset: usize, value: u8) {
        if let Some(byte) = self.image.get_mut(offset) {
            *byte = value;
            self.dirty = true;
            self.writes += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn erased_store_reads_ff() {
        let mut store = ImageStore::erased();
        assert_eq!(store.read(0), 0xFF);
        assert_eq!(store.read(CONFIG_LEN + 3), 0xFF);
        assert!(!store.is_dirty());
    }

    #[test]
    fn write_marks_dirty_until_clean() {
        let mut store = ImageStore::erased();
        store.write(3, 7);
        assert!(store.is_dirty());
        assert_eq!(store.read(3), 7);
        store.mark_clean();
        assert!(!store.is_dirty());
        assert_eq!(store.read(3), 7);
    }

    #[test]
    fn out_of_range_write_is_ignored() {
        let mut store = ImageStore::erased();
        store.write(CONFIG_LEN, 1);
        assert!(!store.is_dirty());
        assert_eq!(store.writes(), 0);
    }
}
