//! Frame-time bookkeeping subsystem.

use crate::subsystem::Subsystem;

/// Tracks per-frame delta time, accumulated time, and frame count.
#[derive(Default)]
pub struct TimeSubsystem
{
    delta_time: f32,
    total_time: f32,
    frame_count: u64,
}

impl TimeSubsystem
{
    /// Create a subsystem with all counters at zero.
    pub fn new() -> Self
    {
        Self::default()
    }

    /// Delta time of the most recent frame, in seconds.
    pub fn delta_time(&self) -> f32
    {
        self.delta_time
    }

    /// Accumulated time across all frames, in seconds.
    pub fn total_time(&self) -> f32
    {
        self.total_time
    }

    /// Number of frames observed since initialization.
    pub fn frame_count(&self) -> u64
    {
        self.frame_count
    }
}

impl Subsystem for TimeSubsystem
{
    fn name(&self) -> &str
    {
        "TimeSubsystem"
    }

    fn initialize(&mut self)
    {
        self.delta_time = 0.0;
        self.total_time = 0.0;
        self.frame_count = 0;
    }

    fn shutdown(&mut self)
    {
    }

    fn update(&mut self, delta_time: f32)
    {
        self.delta_time = delta_time;
        self.total_time += delta_time;
        self.frame_count += 1;
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn updates_accumulate_time_and_frames()
    {
        let mut time = TimeSubsystem::new();
        time.initialize();

        time.update(0.016);
        time.update(0.020);

        assert_eq!(time.delta_time(), 0.020);
        assert!((time.total_time() - 0.036).abs() < 1e-6);
        assert_eq!(time.frame_count(), 2);
    }

    #[test]
    fn reinitialization_resets_the_counters()
    {
        let mut time = TimeSubsystem::new();
        time.initialize();
        time.update(1.0);
        time.initialize();

        assert_eq!(time.frame_count(), 0);
        assert_eq!(time.total_time(), 0.0);
    }
}
