//! Symmetric serialization of typed values.

use crate::archive::Archive;
use crate::error::ArchiveError;

/// Value that can travel through an archive in either direction.
///
/// The value is taken by mutable reference so one call path serves
/// both directions: a saving archive writes the value and leaves it
/// unchanged, a loading archive overwrites it from the stream.
pub trait Persist
{
    /// Write the value to, or overwrite it from, the archive.
    fn persist(&mut self, ar: &mut dyn Archive) -> Result<(), ArchiveError>;
}

/// Fixed-width numerics travel as their little-endian bytes.
macro_rules! persist_le_bytes
{
    ($($ty:ty),* $(,)?) =>
    {
        $(
            impl Persist for $ty
            {
                fn persist(&mut self, ar: &mut dyn Archive)
                    -> Result<(), ArchiveError>
                {
                    let mut bytes = self.to_le_bytes();
                    ar.serialize_raw(&mut bytes)?;
                    if ar.is_loading() {
                        *self = <$ty>::from_le_bytes(bytes);
                    }
                    Ok(())
                }
            }
        )*
    };
}

persist_le_bytes!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl Persist for bool
{
    /// One byte on the wire: written as 0 or 1, any nonzero byte
    /// loads as true.
    fn persist(&mut self, ar: &mut dyn Archive) -> Result<(), ArchiveError>
    {
        let mut byte = [u8::from(*self)];
        ar.serialize_raw(&mut byte)?;
        if ar.is_loading() {
            *self = byte[0] != 0;
        }
        Ok(())
    }
}

impl Persist for String
{
    /// A `u32` length prefix followed by the UTF-8 bytes.
    ///
    /// On load the declared length is checked against the remaining
    /// bytes before the buffer is allocated.
    fn persist(&mut self, ar: &mut dyn Archive) -> Result<(), ArchiveError>
    {
        let mut length = prefix_for(self.len())?;
        length.persist(ar)?;

        if ar.is_loading() {
            check_remaining(length, ar)?;
            let mut bytes = vec![0u8; length as usize];
            ar.serialize_raw(&mut bytes)?;
            *self = String::from_utf8(bytes)?;
        } else {
            let mut bytes = self.as_bytes().to_vec();
            ar.serialize_raw(&mut bytes)?;
        }

        Ok(())
    }
}

impl<T> Persist for Vec<T>
    where T: Persist + Default
{
    /// A `u32` element count followed by the elements in order.
    ///
    /// On load the container is resized to the declared count before
    /// filling. Every element encodes to at least one byte, so a
    /// count exceeding the remaining bytes is always corrupt and is
    /// rejected before any allocation.
    fn persist(&mut self, ar: &mut dyn Archive) -> Result<(), ArchiveError>
    {
        let mut count = prefix_for(self.len())?;
        count.persist(ar)?;

        if ar.is_loading() {
            check_remaining(count, ar)?;
            self.clear();
            self.resize_with(count as usize, T::default);
        }

        for element in self.iter_mut() {
            element.persist(ar)?;
        }

        Ok(())
    }
}

fn prefix_for(length: usize) -> Result<u32, ArchiveError>
{
    u32::try_from(length).map_err(|_| ArchiveError::LengthOverflow(length as u64))
}

fn check_remaining(declared: u32, ar: &dyn Archive) -> Result<(), ArchiveError>
{
    let remaining = ar.remaining();
    if u64::from(declared) > remaining {
        return Err(ArchiveError::Truncated{declared: declared.into(), remaining});
    }
    Ok(())
}
