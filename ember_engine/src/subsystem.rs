//! The subsystem lifecycle interface.

/// A unit of engine functionality with a managed lifecycle.
///
/// Subsystems are initialized in the order they were added to the
/// [`Engine`][`crate::engine::Engine`], updated every frame in that
/// same order, and shut down in reverse order.
pub trait Subsystem
{
    /// Stable name used for lookups and logging.
    fn name(&self) -> &str;

    /// Called once before the first update.
    fn initialize(&mut self);

    /// Called once, in reverse insertion order, during engine
    /// shutdown.
    fn shutdown(&mut self);

    /// Per-frame update hook with the elapsed time in seconds.
    fn update(&mut self, delta_time: f32);
}
