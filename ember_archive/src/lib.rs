//! Bidirectional binary serialization.
//!
//! An [`Archive`] is a direction-tagged byte channel: the same
//! [`Persist`] call path writes a value when the archive is saving
//! and overwrites it from the stream when the archive is loading,
//! so serialization code for a composite value is written once and
//! works for both directions.
//!
//! The wire format is fixed: little-endian fixed-width numerics,
//! `u32` length prefixes, UTF-8 string bytes. There is no
//! self-describing schema; writer and reader must agree on field
//! order and types.
//!
//! [`Archive`]: `archive::Archive`
//! [`Persist`]: `persist::Persist`

#![warn(missing_docs)]

pub mod archive;
pub mod error;
pub mod file;
pub mod memory;
pub mod object_ref;
pub mod persist;
