use super::Object;
use super::ObjectFlags;

use core::fmt;
use core::ops::Deref;
use core::ptr::NonNull;
use core::sync::atomic::Ordering;
use core::sync::atomic::fence;

/// Pointer to an object with no guarantees.
///
/// Much like with the primitive [pointer] type,
/// dereferencing an unsafe handle is not guaranteed to be safe.
/// The handle does not keep the object alive;
/// once the last counted reference is released,
/// existing unsafe handles to the object dangle.
/// The registry index and the allocator use this type;
/// everything else should hold an [`ObjectPtr`].
#[repr(transparent)]
#[derive(Clone, Copy, Debug)]
pub struct UnsafeHandle
{
    pointer: NonNull<Object>,
}

impl UnsafeHandle
{
    /// Create a handle from a pointer.
    #[inline]
    pub fn new(pointer: NonNull<Object>) -> Self
    {
        Self{pointer}
    }

    /// Move a boxed object onto the raw heap and return its handle.
    pub fn from_box(object: Box<Object>) -> Self
    {
        Self{pointer: NonNull::from(Box::leak(object))}
    }

    /// Access the handle as a pointer.
    #[inline]
    pub fn as_ptr(self) -> *mut Object
    {
        self.pointer.as_ptr()
    }

    /// Borrow the object referenced by this handle.
    ///
    /// # Safety
    ///
    /// The handle must point to an object whose storage has not been
    /// reclaimed, and the storage must remain live for `'a`.
    #[inline]
    pub unsafe fn as_ref<'a>(self) -> &'a Object
    {
        &*self.as_ptr()
    }

    /// Take an additional reference to the object.
    ///
    /// # Safety
    ///
    /// The handle must point to a live object.
    pub unsafe fn retain(self)
    {
        self.as_ref().add_ref();
    }

    /// Give up one reference to the object.
    ///
    /// If this release observes the transition from one reference to
    /// zero, the object's storage is reclaimed synchronously inside
    /// this call; exactly one concurrent releaser performs the
    /// reclamation. The acquire fence on that path orders all prior
    /// writes to the object before its storage is freed.
    ///
    /// # Safety
    ///
    /// The caller must own one reference to a live object, and must
    /// not touch the object through this handle afterwards.
    ///
    /// # Panics
    ///
    /// Panics on reference count underflow, so releasing more often
    /// than acquiring is a defined failure rather than corruption.
    pub unsafe fn release(self)
    {
        let old = self.as_ref().ref_count.fetch_sub(1, Ordering::Release);
        assert!(old != 0, "object reference count underflow");

        if old == 1 {
            fence(Ordering::Acquire);
            drop(Box::from_raw(self.as_ptr()));
        }
    }
}

impl PartialEq for UnsafeHandle
{
    #[inline]
    fn eq(&self, other: &Self) -> bool
    {
        self.pointer == other.pointer
    }
}

impl Eq for UnsafeHandle
{
}

// SAFETY: A handle is only an address; every dereference is already
// gated behind unsafe with its own liveness obligations.
unsafe impl Send for UnsafeHandle
{
}

// SAFETY: See the Send impl.
unsafe impl Sync for UnsafeHandle
{
}

/// Owning, possibly-null smart pointer to an [`Object`].
///
/// Each live pointer accounts for exactly one reference:
/// cloning takes a reference, dropping (or reassigning away from a
/// target) gives one up, and moves transfer the reference without
/// touching the count. The number of live pointers to an object,
/// plus its creation reference until that is consumed,
/// always equals the object's reference count.
pub struct ObjectPtr
{
    handle: Option<UnsafeHandle>,
}

impl ObjectPtr
{
    /// The null pointer.
    pub const fn null() -> Self
    {
        Self{handle: None}
    }

    /// Adopt an existing reference to the object behind `handle`.
    ///
    /// The count is not incremented; the new pointer takes over a
    /// reference the caller already owns.
    ///
    /// # Safety
    ///
    /// The handle must point to a live object and the caller must own
    /// one reference to it, which it forfeits to the new pointer.
    pub unsafe fn from_raw(handle: UnsafeHandle) -> Self
    {
        Self{handle: Some(handle)}
    }

    /// Take a new reference to the object behind `handle`.
    ///
    /// # Safety
    ///
    /// The handle must point to a live object, and the object must
    /// stay live for the duration of this call.
    pub unsafe fn retained(handle: UnsafeHandle) -> Self
    {
        handle.retain();
        Self{handle: Some(handle)}
    }

    /// Whether this pointer refers to no object.
    pub fn is_null(&self) -> bool
    {
        self.handle.is_none()
    }

    /// Whether this pointer refers to an object.
    pub fn is_valid(&self) -> bool
    {
        self.handle.is_some()
    }

    /// The raw handle behind this pointer, if any.
    pub fn handle(&self) -> Option<UnsafeHandle>
    {
        self.handle
    }

    /// Borrow the object without any lifecycle check.
    ///
    /// Returns [`None`] for a null pointer. The borrow is valid even
    /// for an object in destruction, which teardown code needs;
    /// ordinary access should go through [`Deref`], which refuses
    /// destroyed objects.
    pub fn get(&self) -> Option<&Object>
    {
        // SAFETY: Holding this pointer keeps the storage alive.
        self.handle.map(|handle| unsafe { handle.as_ref() })
    }

    /// Whether the referenced object is flagged for destruction.
    ///
    /// False for a null pointer. Callers holding possibly stale
    /// pointers check this before dereferencing.
    pub fn is_pending_kill(&self) -> bool
    {
        self.get().is_some_and(Object::is_pending_kill)
    }
}

impl Clone for ObjectPtr
{
    fn clone(&self) -> Self
    {
        if let Some(handle) = self.handle {
            // SAFETY: Holding this pointer keeps the object live.
            unsafe { handle.retain() };
        }
        Self{handle: self.handle}
    }
}

impl Drop for ObjectPtr
{
    fn drop(&mut self)
    {
        if let Some(handle) = self.handle {
            // SAFETY: This pointer owns one reference, given up here.
            unsafe { handle.release() };
        }
    }
}

impl Deref for ObjectPtr
{
    type Target = Object;

    /// Borrow the referenced object.
    ///
    /// # Panics
    ///
    /// Panics on a null pointer, and panics once the object has been
    /// finish-destroyed: use after destruction is a defined, loud
    /// failure instead of undefined behavior.
    fn deref(&self) -> &Object
    {
        let object = self.get().expect("dereferenced a null ObjectPtr");
        assert!(
            !object.has_any_flags(ObjectFlags::FINISH_DESTROYED),
            "dereferenced a destroyed object",
        );
        object
    }
}

impl Default for ObjectPtr
{
    fn default() -> Self
    {
        Self::null()
    }
}

impl fmt::Debug for ObjectPtr
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result
    {
        match self.get() {
            Some(object) => write!(f, "ObjectPtr({})", object.full_name()),
            None => write!(f, "ObjectPtr(null)"),
        }
    }
}

// SAFETY: The reference count is atomic and all shared state reachable
// through &Object is itself Sync (atomics and locks).
unsafe impl Send for ObjectPtr
{
}

// SAFETY: See the Send impl.
unsafe impl Sync for ObjectPtr
{
}
