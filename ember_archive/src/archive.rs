//! The archive channel abstraction.

use crate::error::ArchiveError;

use bitflags::bitflags;

bitflags!
{
    /// Direction and representation of an archive.
    ///
    /// Fixed at construction for the archive's entire lifetime:
    /// an archive is either strictly loading or strictly saving.
    pub struct ArchiveFlags: u32
    {
        /// Archive reads values out of the byte stream.
        const LOADING = 1 << 0;

        /// Archive writes values into the byte stream.
        const SAVING = 1 << 1;

        /// Binary representation.
        const BINARY = 1 << 2;

        /// Text representation. No backend in this crate uses it.
        const TEXT = 1 << 3;

        /// Backed by persistent storage (a file).
        const PERSISTENT = 1 << 4;

        /// Backed by volatile storage (memory).
        const VOLATILE = 1 << 5;
    }
}

/// Bidirectional binary byte channel.
///
/// Backends implement the raw transfer and cursor control; the typed
/// surface lives on [`Persist`][`crate::persist::Persist`]. The
/// cursor never exceeds [`total_size`][`Archive::total_size`]: a
/// saving archive grows to cover a seek past the end, a loading
/// archive reports it as an error.
pub trait Archive
{
    /// Flags fixed at construction.
    fn flags(&self) -> ArchiveFlags;

    /// Move the cursor to an absolute position.
    ///
    /// While loading, a position past the end is a reported
    /// [`OutOfBounds`][`ArchiveError::OutOfBounds`] error. While
    /// saving, the archive extends (zero-filled) to keep the cursor
    /// in bounds.
    fn seek(&mut self, position: u64) -> Result<(), ArchiveError>;

    /// Current cursor position.
    fn tell(&self) -> u64;

    /// Total number of bytes in the archive.
    fn total_size(&self) -> u64;

    /// Transfer raw bytes through the channel.
    ///
    /// Fills `bytes` from the stream when loading; writes `bytes` to
    /// the stream, leaving them untouched, when saving. Advances the
    /// cursor by the length of `bytes` on success.
    fn serialize_raw(&mut self, bytes: &mut [u8]) -> Result<(), ArchiveError>;

    /// Whether this archive reads values out of the stream.
    fn is_loading(&self) -> bool
    {
        self.flags().contains(ArchiveFlags::LOADING)
    }

    /// Whether this archive writes values into the stream.
    fn is_saving(&self) -> bool
    {
        self.flags().contains(ArchiveFlags::SAVING)
    }

    /// Whether this archive uses the binary representation.
    fn is_binary(&self) -> bool
    {
        self.flags().contains(ArchiveFlags::BINARY)
    }

    /// Whether this archive is backed by persistent storage.
    fn is_persistent(&self) -> bool
    {
        self.flags().contains(ArchiveFlags::PERSISTENT)
    }

    /// Bytes between the cursor and the end of the archive.
    fn remaining(&self) -> u64
    {
        self.total_size().saturating_sub(self.tell())
    }
}
