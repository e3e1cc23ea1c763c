//! Persistent config image in the nRF52840's internal flash.
//!
//! The 11-byte image is kept in RAM by [`ImageStore`] and mirrored to
//! flash through `sequential-storage`, which appends records and handles
//! wear levelling and page GC. Only the latest record is read back.

use defmt::{debug, error, info};
use embedded_storage_async::nor_flash::NorFlash;
use sequential_storage::cache::NoCache;
use sequential_storage::map::{fetch_item, store_item};

use rtimer::config::{CONFIG_LEN, STORAGE_FLASH_PAGE_COUNT, STORAGE_FLASH_PAGE_START};
use rtimer::store::ImageStore;
use rtimer::Error;

/// Flash page size for nRF52840 (4 KB).
const FLASH_PAGE_SIZE: u32 = 4096;

const STORAGE_START: u32 = STORAGE_FLASH_PAGE_START * FLASH_PAGE_SIZE;
const STORAGE_END: u32 = (STORAGE_FLASH_PAGE_START + STORAGE_FLASH_PAGE_COUNT) * FLASH_PAGE_SIZE;

/// Map key of the config image.
const KEY_CONFIG_IMAGE: u8 = 0x01;

/// Scratch buffer for one map record (key + length + image, word aligned).
const SCRATCH_SIZE: usize = 64;

/// Read the stored image. A blank region yields an erased store, which the
/// core treats as a first boot.
pub async fn load(flash: &mut impl NorFlash) -> Result<ImageStore, Error> {
    let mut buf = [0u8; SCRATCH_SIZE];

    let stored = fetch_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut NoCache::new(),
        &mut buf,
        &KEY_CONFIG_IMAGE,
    )
    .await
    .map_err(|e| {
        error!("flash: read failed: {:?}", defmt::Debug2Format(&e));
        Error::Storage
    })?;

    match stored {
        Some(data) if data.len() == CONFIG_LEN => {
            let mut image = [0u8; CONFIG_LEN];
            image.copy_from_slice(data);
            info!("flash: config image loaded");
            Ok(ImageStore::from_image(image))
        }
        Some(data) => {
            info!("flash: ignoring {}-byte record", data.len());
            Ok(ImageStore::erased())
        }
        None => {
            info!("flash: no config image");
            Ok(ImageStore::erased())
        }
    }
}

/// Write the image back if any byte changed since the last flush.
pub async fn flush(flash: &mut impl NorFlash, store: &mut ImageStore) -> Result<(), Error> {
    if !store.is_dirty() {
        return Ok(());
    }

    let mut buf = [0u8; SCRATCH_SIZE];
    let image = *store.image();
    let item: &[u8] = &image;

    store_item::<u8, &[u8], _>(
        flash,
        STORAGE_START..STORAGE_END,
        &mut NoCache::new(),
        &mut buf,
        &KEY_CONFIG_IMAGE,
        &item,
    )
    .await
    .map_err(|e| {
        error!("flash: write failed: {:?}", defmt::Debug2Format(&e));
        Error::Storage
    })?;

    store.mark_clean();
    debug!("flash: config image saved");
    Ok(())
}
