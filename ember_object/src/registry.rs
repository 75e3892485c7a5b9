//! Process-wide index of live objects.

use crate::class::Class;
use crate::class::ClassId;
use crate::object::ObjectPtr;
use crate::object::UnsafeHandle;

use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::OnceLock;
use thiserror::Error;

/// Raised when a registration cannot be honored.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError
{
    /// A live object is already registered under this full path name.
    ///
    /// Collisions are rejected outright; the registry never
    /// overwrites an earlier registration, so a displaced object can
    /// never linger with stale bookkeeping.
    #[error("an object named `{0}` is already registered")]
    NameCollision(String),
}

/// Non-owning index of registered objects.
///
/// One map goes from full path name to object, a second from class
/// descriptor to the ordered set of instances of exactly that class.
/// Both sit behind a single lock so no caller ever observes a path
/// entry without its class-list entry or vice versa. The registry
/// never releases references: it indexes, the pointers own.
///
/// Registered objects must stay alive until they are unregistered.
/// The lifecycle entry points uphold this by unregistering inside
/// [`destroy_object`][`crate::lifecycle::destroy_object`] before the
/// final release.
pub struct Registry
{
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner
{
    by_path: HashMap<String, UnsafeHandle>,
    by_class: HashMap<ClassId, Vec<UnsafeHandle>>,
}

static GLOBAL: OnceLock<Registry> = OnceLock::new();

impl Registry
{
    /// Create an empty registry.
    ///
    /// Fresh instances give tests isolation from the process-wide
    /// registry.
    pub fn new() -> Self
    {
        Self{inner: Mutex::new(Inner::default())}
    }

    /// The process-wide registry, lazily created on first access.
    pub fn global() -> &'static Registry
    {
        GLOBAL.get_or_init(Registry::new)
    }

    /// Register an object under its full path name.
    ///
    /// No-op on a null pointer. A name collision with an existing
    /// registration is rejected and leaves both maps untouched.
    pub fn register(&self, object: &ObjectPtr) -> Result<(), RegistryError>
    {
        let Some(target) = object.get() else { return Ok(()) };
        let handle = object.handle().unwrap();

        let path = target.full_name();
        let class_id = target.class().id();

        let mut inner = self.inner.lock();
        if inner.by_path.contains_key(&path) {
            log::warn!("rejecting duplicate registration of `{path}`");
            return Err(RegistryError::NameCollision(path));
        }

        inner.by_path.insert(path, handle);
        inner.by_class.entry(class_id).or_default().push(handle);
        Ok(())
    }

    /// Remove an object from both maps.
    ///
    /// Idempotent; no-op on a null or unregistered pointer. Removal
    /// goes by identity, not by name: if the object was renamed after
    /// registration, the stale path entry is found by scanning, so the
    /// maps never retain an entry for an unregistered object.
    pub fn unregister(&self, object: &ObjectPtr)
    {
        let Some(target) = object.get() else { return };
        let handle = object.handle().unwrap();

        let path = target.full_name();
        let class_id = target.class().id();

        let mut inner = self.inner.lock();
        match inner.by_path.get(&path).copied() {
            Some(registered) if registered == handle => {
                inner.by_path.remove(&path);
            },
            _ => {
                inner.by_path.retain(|_, &mut registered| registered != handle);
            },
        }

        if let Some(instances) = inner.by_class.get_mut(&class_id) {
            instances.retain(|&registered| registered != handle);
            if instances.is_empty() {
                inner.by_class.remove(&class_id);
            }
        }
    }

    /// Look up an object by exact full path name.
    ///
    /// Returns a null pointer when no such object is registered.
    /// The returned pointer holds a fresh reference taken under the
    /// registry lock.
    pub fn find_by_name(&self, path: &str) -> ObjectPtr
    {
        let inner = self.inner.lock();
        match inner.by_path.get(path) {
            // SAFETY: Registered objects are alive; see the type docs.
            Some(&handle) => unsafe { ObjectPtr::retained(handle) },
            None => ObjectPtr::null(),
        }
    }

    /// Snapshot of the registered instances of exactly `class`.
    ///
    /// Subtypes are not included. Every returned pointer holds its own
    /// reference, so later registry mutation never invalidates a
    /// snapshot.
    pub fn instances_of(&self, class: &'static Class) -> Vec<ObjectPtr>
    {
        let inner = self.inner.lock();
        match inner.by_class.get(&class.id()) {
            Some(instances) => {
                instances
                    .iter()
                    // SAFETY: Registered objects are alive.
                    .map(|&handle| unsafe { ObjectPtr::retained(handle) })
                    .collect()
            },
            None => Vec::new(),
        }
    }

    /// Number of currently registered objects.
    pub fn object_count(&self) -> usize
    {
        self.inner.lock().by_path.len()
    }
}

impl Default for Registry
{
    fn default() -> Self
    {
        Self::new()
    }
}
