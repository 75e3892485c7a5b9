//! Reference-counted object runtime.
//!
//! Every long-lived entity is an [`Object`]: a named, flagged,
//! reference-counted value that belongs to a tree-shaped ownership
//! hierarchy and is indexed by a process-wide [`Registry`].
//! Destruction is a two-phase protocol layered on top of the
//! reference count; see the [`lifecycle`] module for the
//! orchestration entry points.
//!
//! [`Object`]: `object::Object`
//! [`Registry`]: `registry::Registry`

#![warn(missing_docs)]

pub mod class;
pub mod lifecycle;
pub mod object;
pub mod registry;
