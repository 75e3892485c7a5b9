//! In-memory archive backend.

use crate::archive::Archive;
use crate::archive::ArchiveFlags;
use crate::error::ArchiveError;

/// Archive over an in-memory byte buffer.
///
/// In save mode, writes go into a growable buffer from the current
/// cursor, overwriting existing bytes and appending past the end.
/// In load mode, reads come from a fixed snapshot with every access
/// bounds-checked.
pub struct MemoryArchive
{
    flags: ArchiveFlags,
    data: Vec<u8>,
    position: usize,
}

impl MemoryArchive
{
    /// Create an empty archive that saves into a growable buffer.
    pub fn for_saving() -> Self
    {
        Self{
            flags: ArchiveFlags::SAVING
                | ArchiveFlags::BINARY
                | ArchiveFlags::VOLATILE,
            data: Vec::new(),
            position: 0,
        }
    }

    /// Create an archive that loads from a snapshot of bytes.
    pub fn for_loading(data: Vec<u8>) -> Self
    {
        Self{
            flags: ArchiveFlags::LOADING
                | ArchiveFlags::BINARY
                | ArchiveFlags::VOLATILE,
            data,
            position: 0,
        }
    }

    /// The underlying bytes.
    pub fn data(&self) -> &[u8]
    {
        &self.data
    }

    /// Consume the archive and return the underlying bytes.
    pub fn into_data(self) -> Vec<u8>
    {
        self.data
    }
}

impl Archive for MemoryArchive
{
    fn flags(&self) -> ArchiveFlags
    {
        self.flags
    }

    fn seek(&mut self, position: u64) -> Result<(), ArchiveError>
    {
        let size = self.data.len() as u64;
        if position > size {
            if self.is_loading() {
                return Err(ArchiveError::OutOfBounds{position, size});
            }
            // A saving archive extends to cover the seek target.
            self.data.resize(position as usize, 0);
        }
        self.position = position as usize;
        Ok(())
    }

    fn tell(&self) -> u64
    {
        self.position as u64
    }

    fn total_size(&self) -> u64
    {
        self.data.len() as u64
    }

    fn serialize_raw(&mut self, bytes: &mut [u8]) -> Result<(), ArchiveError>
    {
        let end = self.position + bytes.len();

        if self.is_loading() {
            if end > self.data.len() {
                return Err(ArchiveError::OutOfBounds{
                    position: end as u64,
                    size: self.data.len() as u64,
                });
            }
            bytes.copy_from_slice(&self.data[self.position .. end]);
        } else {
            if end > self.data.len() {
                self.data.resize(end, 0);
            }
            self.data[self.position .. end].copy_from_slice(bytes);
        }

        self.position = end;
        Ok(())
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::persist::Persist;

    #[test]
    fn direction_flags_are_fixed_at_construction()
    {
        let saver = MemoryArchive::for_saving();
        assert!(saver.is_saving());
        assert!(!saver.is_loading());
        assert!(saver.is_binary());
        assert!(!saver.is_persistent());

        let loader = MemoryArchive::for_loading(Vec::new());
        assert!(loader.is_loading());
        assert!(!loader.is_saving());
    }

    #[test]
    fn save_then_load_mixed_values()
    {
        let mut saver = MemoryArchive::for_saving();
        true.persist(&mut saver).unwrap();
        0xDEAD_BEEFu32.persist(&mut saver).unwrap();
        String::from("player").persist(&mut saver).unwrap();
        (-1.5f64).persist(&mut saver).unwrap();

        let mut loader = MemoryArchive::for_loading(saver.into_data());
        let mut flag = false;
        let mut word = 0u32;
        let mut name = String::new();
        let mut scale = 0f64;
        flag.persist(&mut loader).unwrap();
        word.persist(&mut loader).unwrap();
        name.persist(&mut loader).unwrap();
        scale.persist(&mut loader).unwrap();

        assert!(flag);
        assert_eq!(word, 0xDEAD_BEEF);
        assert_eq!(name, "player");
        assert_eq!(scale, -1.5);
        assert_eq!(loader.remaining(), 0);
    }

    #[test]
    fn the_cursor_tracks_reads_and_writes()
    {
        let mut ar = MemoryArchive::for_saving();
        assert_eq!(ar.tell(), 0);
        7u32.persist(&mut ar).unwrap();
        assert_eq!(ar.tell(), 4);
        assert_eq!(ar.total_size(), 4);
    }

    #[test]
    fn saving_overwrites_from_the_cursor()
    {
        let mut ar = MemoryArchive::for_saving();
        0u32.persist(&mut ar).unwrap();
        9u8.persist(&mut ar).unwrap();

        ar.seek(0).unwrap();
        5u32.persist(&mut ar).unwrap();

        assert_eq!(ar.data(), &[5, 0, 0, 0, 9]);
    }

    #[test]
    fn saving_may_seek_past_the_end_and_zero_fills()
    {
        let mut ar = MemoryArchive::for_saving();
        ar.seek(3).unwrap();
        assert_eq!(ar.tell(), 3);
        assert_eq!(ar.total_size(), 3);

        1u8.persist(&mut ar).unwrap();
        assert_eq!(ar.data(), &[0, 0, 0, 1]);
    }

    #[test]
    fn loading_rejects_a_seek_past_the_end()
    {
        let mut ar = MemoryArchive::for_loading(vec![1, 2, 3]);
        ar.seek(3).unwrap();
        let error = ar.seek(4).unwrap_err();
        assert!(matches!(
            error,
            ArchiveError::OutOfBounds{position: 4, size: 3},
        ));
    }

    #[test]
    fn loading_rejects_a_read_past_the_end()
    {
        let mut ar = MemoryArchive::for_loading(vec![1, 2]);
        let mut value = 0u32;
        let error = value.persist(&mut ar).unwrap_err();
        assert!(matches!(error, ArchiveError::OutOfBounds{..}));
    }
}
