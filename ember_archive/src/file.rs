//! File-backed archive backend.

use crate::archive::Archive;
use crate::archive::ArchiveFlags;
use crate::error::ArchiveError;

use std::fs::File;
use std::io::Read;
use std::io::Seek;
use std::io::SeekFrom;
use std::io::Write;
use std::path::Path;

/// Archive backed by a binary file.
///
/// The file is opened strictly for one direction; opening is
/// fallible, so a failed open surfaces as an
/// [`Io`][`ArchiveError::Io`] error from the constructor and no
/// archive with a dead handle can exist. All I/O is synchronous and
/// every failure is reported to the caller.
#[derive(Debug)]
pub struct FileArchive
{
    flags: ArchiveFlags,
    file: File,
    position: u64,
    size: u64,
}

impl FileArchive
{
    /// Open an existing file for loading.
    pub fn open_read(path: impl AsRef<Path>) -> Result<Self, ArchiveError>
    {
        let file = File::open(path)?;
        let size = file.metadata()?.len();
        Ok(Self{
            flags: ArchiveFlags::LOADING
                | ArchiveFlags::BINARY
                | ArchiveFlags::PERSISTENT,
            file,
            position: 0,
            size,
        })
    }

    /// Create (or truncate) a file for saving.
    pub fn create_write(path: impl AsRef<Path>) -> Result<Self, ArchiveError>
    {
        let file = File::create(path)?;
        Ok(Self{
            flags: ArchiveFlags::SAVING
                | ArchiveFlags::BINARY
                | ArchiveFlags::PERSISTENT,
            file,
            position: 0,
            size: 0,
        })
    }
}

impl Archive for FileArchive
{
    fn flags(&self) -> ArchiveFlags
    {
        self.flags
    }

    fn seek(&mut self, position: u64) -> Result<(), ArchiveError>
    {
        if self.is_loading() && position > self.size {
            return Err(ArchiveError::OutOfBounds{position, size: self.size});
        }

        self.file.seek(SeekFrom::Start(position))?;
        self.position = position;

        if self.is_saving() && position > self.size {
            // The gap becomes zeros when the next write lands.
            self.size = position;
        }
        Ok(())
    }

    fn tell(&self) -> u64
    {
        self.position
    }

    fn total_size(&self) -> u64
    {
        self.size
    }

    fn serialize_raw(&mut self, bytes: &mut [u8]) -> Result<(), ArchiveError>
    {
        if self.is_loading() {
            let end = self.position + bytes.len() as u64;
            if end > self.size {
                return Err(ArchiveError::OutOfBounds{
                    position: end,
                    size: self.size,
                });
            }
            self.file.read_exact(bytes)?;
            self.position = end;
        } else {
            self.file.write_all(bytes)?;
            self.position += bytes.len() as u64;
            if self.position > self.size {
                self.size = self.position;
            }
        }
        Ok(())
    }
}
