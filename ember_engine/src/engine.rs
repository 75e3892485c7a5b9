//! Ordered container of subsystems.

use crate::subsystem::Subsystem;

use std::time::Instant;

/// Owns the subsystems and drives their lifecycle hooks.
///
/// An application shell calls [`tick`][`Engine::tick`] (or
/// [`update`][`Engine::update`] with its own delta time) once per
/// frame; scheduling of frames is not this crate's concern.
pub struct Engine
{
    subsystems: Vec<Box<dyn Subsystem>>,
    initialized: bool,
    last_tick: Option<Instant>,
    delta_time: f32,
    total_time: f32,
}

impl Engine
{
    /// Create an engine with no subsystems.
    pub fn new() -> Self
    {
        Self{
            subsystems: Vec::new(),
            initialized: false,
            last_tick: None,
            delta_time: 0.0,
            total_time: 0.0,
        }
    }

    /// Append a subsystem.
    ///
    /// Subsystems initialize and update in insertion order and shut
    /// down in reverse.
    pub fn add_subsystem(&mut self, subsystem: Box<dyn Subsystem>)
    {
        self.subsystems.push(subsystem);
    }

    /// Look up a subsystem by name.
    pub fn subsystem(&self, name: &str) -> Option<&dyn Subsystem>
    {
        self.subsystems
            .iter()
            .find(|subsystem| subsystem.name() == name)
            .map(|subsystem| subsystem.as_ref())
    }

    /// Initialize every subsystem in insertion order.
    ///
    /// Idempotent: a second call does nothing.
    pub fn initialize(&mut self)
    {
        if self.initialized {
            return;
        }

        for subsystem in self.subsystems.iter_mut() {
            log::info!("initializing subsystem `{}`", subsystem.name());
            subsystem.initialize();
        }
        self.initialized = true;
    }

    /// Shut down every subsystem in reverse order and drop them all.
    ///
    /// Idempotent: a no-op unless the engine is initialized.
    pub fn shutdown(&mut self)
    {
        if !self.initialized {
            return;
        }

        for subsystem in self.subsystems.iter_mut().rev() {
            log::info!("shutting down subsystem `{}`", subsystem.name());
            subsystem.shutdown();
        }
        self.subsystems.clear();
        self.initialized = false;
    }

    /// Forward one frame's delta time to every subsystem.
    pub fn update(&mut self, delta_time: f32)
    {
        for subsystem in self.subsystems.iter_mut() {
            subsystem.update(delta_time);
        }
        self.delta_time = delta_time;
        self.total_time += delta_time;
    }

    /// Advance one frame, measuring the real elapsed time.
    ///
    /// The first tick after creation (or after a previous run) sees a
    /// delta of zero.
    pub fn tick(&mut self)
    {
        let now = Instant::now();
        let delta_time = match self.last_tick {
            Some(last) => now.duration_since(last).as_secs_f32(),
            None => 0.0,
        };
        self.last_tick = Some(now);
        self.update(delta_time);
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

    /// Whether [`initialize`][`Engine::initialize`] has run.
    pub fn is_initialized(&self) -> bool
    {
        self.initialized
    }
}

impl Default for Engine
{
    fn default() -> Self
    {
        Self::new()
    }
}

#[cfg(test)]
mod tests
{
    use super::*;

    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records lifecycle calls into a shared journal.
    struct Recorder
    {
        name: &'static str,
        journal: Rc<RefCell<Vec<String>>>,
    }

    impl Subsystem for Recorder
    {
        fn name(&self) -> &str
        {
            self.name
        }

        fn initialize(&mut self)
        {
            self.journal.borrow_mut().push(format!("init {}", self.name));
        }

        fn shutdown(&mut self)
        {
            self.journal.borrow_mut().push(format!("down {}", self.name));
        }

        fn update(&mut self, delta_time: f32)
        {
            self.journal
                .borrow_mut()
                .push(format!("tick {} {delta_time}", self.name));
        }
    }

    fn engine_with_recorders(
        names: &[&'static str],
    ) -> (Engine, Rc<RefCell<Vec<String>>>)
    {
        let journal = Rc::new(RefCell::new(Vec::new()));
        let mut engine = Engine::new();
        for &name in names {
            engine.add_subsystem(Box::new(Recorder{
                name,
                journal: Rc::clone(&journal),
            }));
        }
        (engine, journal)
    }

    #[test]
    fn initialization_runs_forward_and_shutdown_reverse()
    {
        let (mut engine, journal) = engine_with_recorders(&["time", "input"]);

        engine.initialize();
        assert!(engine.is_initialized());
        engine.initialize();

        engine.shutdown();
        assert!(!engine.is_initialized());
        engine.shutdown();

        assert_eq!(
            *journal.borrow(),
            vec!["init time", "init input", "down input", "down time"],
        );
    }

    #[test]
    fn update_reaches_every_subsystem_with_the_delta()
    {
        let (mut engine, journal) = engine_with_recorders(&["a", "b"]);
        engine.initialize();
        journal.borrow_mut().clear();

        engine.update(0.25);

        assert_eq!(*journal.borrow(), vec!["tick a 0.25", "tick b 0.25"]);
        assert_eq!(engine.delta_time(), 0.25);
        assert_eq!(engine.total_time(), 0.25);

        engine.update(0.5);
        assert_eq!(engine.total_time(), 0.75);
    }

    #[test]
    fn subsystems_are_found_by_name()
    {
        let (engine, _journal) = engine_with_recorders(&["time"]);
        assert!(engine.subsystem("time").is_some());
        assert!(engine.subsystem("missing").is_none());
    }

    #[test]
    fn the_first_tick_has_zero_delta()
    {
        let (mut engine, journal) = engine_with_recorders(&["a"]);
        engine.tick();
        assert_eq!(*journal.borrow(), vec!["tick a 0"]);
        engine.tick();
        assert_eq!(journal.borrow().len(), 2);
    }
}
