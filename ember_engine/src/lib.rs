//! Engine shell: the subsystem container and its lifecycle hooks.
//!
//! This crate is deliberately thin. It owns no object semantics;
//! it drives [`Subsystem`] implementations through their
//! initialize/update/shutdown hooks from a generic per-frame loop.
//!
//! [`Subsystem`]: `subsystem::Subsystem`

#![warn(missing_docs)]

pub mod engine;
pub mod subsystem;
pub mod time;
