//! In-memory representation of objects and their lifecycle state.

pub use self::ptr::*;

use crate::class::Class;

use bitflags::bitflags;
use core::sync::atomic::AtomicU32;
use core::sync::atomic::AtomicU64;
use core::sync::atomic::AtomicUsize;
use core::sync::atomic::Ordering;
use parking_lot::RwLock;

mod ptr;

bitflags!
{
    /// Lifecycle and visibility flags attached to every object.
    ///
    /// Flags are additive bits; no two flags exclude each other by
    /// construction. The destruction protocol enforces an order on
    /// [`BEGIN_DESTROYED`] and [`FINISH_DESTROYED`]:
    /// the former is always observed set before the latter.
    ///
    /// [`BEGIN_DESTROYED`]: `ObjectFlags::BEGIN_DESTROYED`
    /// [`FINISH_DESTROYED`]: `ObjectFlags::FINISH_DESTROYED`
    pub struct ObjectFlags: u32
    {
        /// Object can be referenced by external packages.
        const PUBLIC = 1 << 0;

        /// Keep the object around for editing even if unreferenced.
        const STANDALONE = 1 << 1;

        /// Object is native to the runtime.
        const NATIVE = 1 << 2;

        /// Object is not saved to disk.
        const TRANSIENT = 1 << 3;

        /// Object is in the root set; exempt from collection sweeps.
        const ROOT_SET = 1 << 4;

        /// Object still needs post-construction initialization.
        const NEEDS_INIT = 1 << 5;

        /// `begin_destroy` has run; the object is pending kill.
        const BEGIN_DESTROYED = 1 << 6;

        /// `finish_destroy` has run; only storage reclamation remains.
        const FINISH_DESTROYED = 1 << 7;

        /// Object is being regenerated.
        const BEING_REGENERATED = 1 << 8;

        /// Object is a default subobject of another object.
        const DEFAULT_SUB_OBJECT = 1 << 9;

        /// Object was loaded from an archive.
        const WAS_LOADED = 1 << 10;

        /// Object must not be exported to text.
        const TEXT_EXPORT_TRANSIENT = 1 << 11;

        /// Loading of the object has completed.
        const LOAD_COMPLETED = 1 << 12;

        /// Properties have been initialized.
        const PROPS_INITIALIZED = 1 << 13;

        /// Construction has completed.
        const CONSTRUCTED = 1 << 14;
    }
}

/// Hard cap on the length of an outer chain.
///
/// Outers are fixed at construction, so a chain cannot actually be
/// cyclic; the cap turns a violation of that invariant (for example
/// through memory corruption) into a panic instead of an endless walk.
const MAX_OUTER_DEPTH: usize = 1024;

/// Number of objects whose storage is currently allocated.
static LIVE_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Source of suffixes for generated object names.
static NAME_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Number of objects whose storage is currently allocated.
///
/// Incremented when an object is allocated and decremented exactly
/// once when its reference count reaches zero, which makes storage
/// reclamation observable to callers and tests.
pub fn live_count() -> usize
{
    LIVE_COUNT.load(Ordering::SeqCst)
}

/// A named, flagged, reference-counted entity.
///
/// Objects start with a reference count of one (the creation
/// reference, see [`Object::allocate`]) and are reclaimed exactly once,
/// when the count reaches zero. The `outer` forms a tree: it is fixed
/// at construction and holds a counted reference, so the name walk in
/// [`full_name`] can never touch freed storage and a cycle cannot be
/// constructed (an object would have to exist before its own outer).
///
/// [`full_name`]: `Object::full_name`
pub struct Object
{
    class: &'static Class,
    name: RwLock<String>,
    outer: Option<ObjectPtr>,
    flags: AtomicU32,
    ref_count: AtomicU32,
}

impl Object
{
    /// Allocate a new object carrying a single creation reference.
    ///
    /// The returned pointer owns that reference. The object starts
    /// with the [`NEEDS_INIT`] flag set; the lifecycle entry points
    /// clear it once post-construction initialization has run.
    ///
    /// An empty `name` is replaced by a generated `<Class>_<n>` name
    /// so that the object has a usable registration path.
    ///
    /// [`NEEDS_INIT`]: `ObjectFlags::NEEDS_INIT`
    pub fn allocate(
        class: &'static Class,
        outer: Option<ObjectPtr>,
        name: &str,
    ) -> ObjectPtr
    {
        let name = if name.is_empty() {
            let suffix = NAME_COUNTER.fetch_add(1, Ordering::Relaxed);
            format!("{}_{}", class.name(), suffix)
        } else {
            name.to_owned()
        };

        let object = Box::new(Object{
            class,
            name: RwLock::new(name),
            outer,
            flags: AtomicU32::new(ObjectFlags::NEEDS_INIT.bits()),
            ref_count: AtomicU32::new(1),
        });

        LIVE_COUNT.fetch_add(1, Ordering::SeqCst);

        let handle = UnsafeHandle::from_box(object);
        // SAFETY: The fresh object carries exactly the one reference
        // that the pointer adopts.
        unsafe { ObjectPtr::from_raw(handle) }
    }

    /// Name of this object alone, without the outer chain.
    pub fn name(&self) -> String
    {
        self.name.read().clone()
    }

    /// Rename the object.
    ///
    /// Renaming a currently registered object leaves the registry
    /// keyed under the old path; unregistration still finds the entry
    /// by identity, but lookups under the new name will miss until the
    /// object is re-registered.
    pub fn set_name(&self, name: &str)
    {
        *self.name.write() = name.to_owned();
    }

    /// Descriptor of this object's runtime type.
    pub fn class(&self) -> &'static Class
    {
        self.class
    }

    /// Owning object in the ownership tree, absent for a root object.
    pub fn outer(&self) -> Option<&Object>
    {
        self.outer.as_ref().and_then(ObjectPtr::get)
    }

    /// Current flag set.
    pub fn flags(&self) -> ObjectFlags
    {
        ObjectFlags::from_bits_truncate(self.flags.load(Ordering::SeqCst))
    }

    /// Replace the entire flag set.
    pub fn set_flags(&self, flags: ObjectFlags)
    {
        self.flags.store(flags.bits(), Ordering::SeqCst);
    }

    /// Set the given flags, leaving the others untouched.
    pub fn add_flags(&self, flags: ObjectFlags)
    {
        self.flags.fetch_or(flags.bits(), Ordering::SeqCst);
    }

    /// Clear the given flags, leaving the others untouched.
    pub fn remove_flags(&self, flags: ObjectFlags)
    {
        self.flags.fetch_and(!flags.bits(), Ordering::SeqCst);
    }

    /// Whether any of the given flags is set.
    pub fn has_any_flags(&self, flags: ObjectFlags) -> bool
    {
        self.flags().intersects(flags)
    }

    /// Current reference count.
    pub fn ref_count(&self) -> u32
    {
        self.ref_count.load(Ordering::SeqCst)
    }

    /// Take an additional reference to this object.
    ///
    /// Callable from any number of threads. Prefer cloning an
    /// [`ObjectPtr`], which pairs the increment with a release.
    pub fn add_ref(&self)
    {
        let old = self.ref_count.fetch_add(1, Ordering::Relaxed);
        debug_assert!(old != 0, "resurrected an object with no references");
    }

    /// Enter the first destruction phase: mark the object pending kill.
    ///
    /// The object may still be referenced afterwards; storage is only
    /// reclaimed when the reference count reaches zero.
    pub fn begin_destroy(&self)
    {
        self.add_flags(ObjectFlags::BEGIN_DESTROYED);
    }

    /// Enter the second destruction phase.
    ///
    /// Owned sub-resources are considered released after this call.
    /// Storage itself is not freed here.
    ///
    /// # Panics
    ///
    /// Panics if [`begin_destroy`][`Object::begin_destroy`] has not run,
    /// keeping the two phases monotonic.
    pub fn finish_destroy(&self)
    {
        assert!(
            self.has_any_flags(ObjectFlags::BEGIN_DESTROYED),
            "finish_destroy called before begin_destroy",
        );
        self.add_flags(ObjectFlags::FINISH_DESTROYED);
    }

    /// Whether the object is flagged for destruction.
    ///
    /// Pending kill is distinct from deallocation: a pending-kill
    /// object may still have live references.
    pub fn is_pending_kill(&self) -> bool
    {
        self.has_any_flags(ObjectFlags::BEGIN_DESTROYED)
    }

    /// Hierarchical name with `.` separators, outermost first.
    ///
    /// A root object yields just its own name.
    pub fn full_name(&self) -> String
    {
        self.compose_name(".")
    }

    /// Hierarchical name with `/` separators, outermost first.
    ///
    /// A root object yields just its own name.
    pub fn path_name(&self) -> String
    {
        self.compose_name("/")
    }

    fn compose_name(&self, separator: &str) -> String
    {
        let mut components = vec![self.name()];

        let mut outer = self.outer();
        while let Some(object) = outer {
            assert!(
                components.len() < MAX_OUTER_DEPTH,
                "outer chain exceeds {MAX_OUTER_DEPTH} objects; cyclic outer?",
            );
            components.push(object.name());
            outer = object.outer();
        }

        components.reverse();
        components.join(separator)
    }
}

impl Drop for Object
{
    fn drop(&mut self)
    {
        LIVE_COUNT.fetch_sub(1, Ordering::SeqCst);
    }
}
