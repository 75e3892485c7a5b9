//! Orchestration of object construction and destruction.
//!
//! Construction sequence: factory, then registration, then the
//! post-initialization flag transition. Destruction reverses it:
//! begin-destroy, unregistration, finish-destroy, and finally the
//! release of the consumed reference, which reclaims storage only
//! when no other pointer remains.

use crate::class::Class;
use crate::object::ObjectFlags;
use crate::object::ObjectPtr;
use crate::registry::Registry;
use crate::registry::RegistryError;

use thiserror::Error;

/// Raised when an object cannot be created.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ObjectError
{
    /// The class descriptor declined to produce an instance.
    #[error("class `{0}` declined to produce an instance")]
    NoFactory(&'static str),

    /// The new instance could not be registered.
    ///
    /// The instance is released before this is returned; a failed
    /// creation leaks nothing and registers nothing.
    #[error(transparent)]
    Register(#[from] RegistryError),
}

/// Create, register, and initialize a new instance of `class`.
///
/// On success the returned pointer owns the creation reference and
/// the object is findable in `registry` under its full path name,
/// with [`NEEDS_INIT`] cleared and [`PROPS_INITIALIZED`] and
/// [`CONSTRUCTED`] set.
///
/// [`NEEDS_INIT`]: `ObjectFlags::NEEDS_INIT`
/// [`PROPS_INITIALIZED`]: `ObjectFlags::PROPS_INITIALIZED`
/// [`CONSTRUCTED`]: `ObjectFlags::CONSTRUCTED`
pub fn create_object(
    registry: &Registry,
    class: &'static Class,
    outer: Option<ObjectPtr>,
    name: &str,
) -> Result<ObjectPtr, ObjectError>
{
    let object = class
        .create_instance(outer, name)
        .ok_or(ObjectError::NoFactory(class.name()))?;

    registry.register(&object)?;

    object.remove_flags(ObjectFlags::NEEDS_INIT);
    object.add_flags(ObjectFlags::PROPS_INITIALIZED | ObjectFlags::CONSTRUCTED);

    log::debug!("created `{}` of class `{}`", object.full_name(), class.name());
    Ok(object)
}

/// Destroy an object, consuming one reference to it.
///
/// No-op on a null pointer. The object is marked pending kill, taken
/// out of `registry`, finish-destroyed, and released. If other
/// pointers to it remain, the storage lingers until the last of them
/// drops; dereferencing through them now fails loudly.
pub fn destroy_object(registry: &Registry, object: ObjectPtr)
{
    let Some(target) = object.get() else { return };

    log::debug!("destroying `{}`", target.full_name());

    target.begin_destroy();
    registry.unregister(&object);
    target.finish_destroy();

    // Dropping `object` releases the consumed reference.
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::class::OBJECT_CLASS;

    static ABSTRACT: Class = Class::new("AbstractKind", Some(&OBJECT_CLASS));

    #[test]
    fn creation_registers_and_initializes()
    {
        let registry = Registry::new();
        let object =
            create_object(&registry, &OBJECT_CLASS, None, "Hero").unwrap();

        assert!(!object.has_any_flags(ObjectFlags::NEEDS_INIT));
        assert!(object.has_any_flags(ObjectFlags::PROPS_INITIALIZED));
        assert!(object.has_any_flags(ObjectFlags::CONSTRUCTED));
        assert!(registry.find_by_name("Hero").is_valid());

        destroy_object(&registry, object);
    }

    #[test]
    fn creation_fails_without_a_factory()
    {
        let registry = Registry::new();
        let result = create_object(&registry, &ABSTRACT, None, "Ghost");
        assert_eq!(result.unwrap_err(), ObjectError::NoFactory("AbstractKind"));
        assert_eq!(registry.object_count(), 0);
    }

    #[test]
    fn creation_fails_on_name_collision()
    {
        let registry = Registry::new();
        let first =
            create_object(&registry, &OBJECT_CLASS, None, "Unique").unwrap();

        let result = create_object(&registry, &OBJECT_CLASS, None, "Unique");
        assert!(matches!(result, Err(ObjectError::Register(_))));

        // The survivor is still registered and untouched.
        assert_eq!(registry.object_count(), 1);
        assert_eq!(
            registry.find_by_name("Unique").handle(),
            first.handle(),
        );

        destroy_object(&registry, first);
    }

    #[test]
    fn creation_threads_the_outer_through()
    {
        let registry = Registry::new();
        let world =
            create_object(&registry, &OBJECT_CLASS, None, "World").unwrap();
        let pawn = create_object(
            &registry,
            &OBJECT_CLASS,
            Some(world.clone()),
            "Pawn",
        )
        .unwrap();

        assert_eq!(pawn.full_name(), "World.Pawn");
        assert!(registry.find_by_name("World.Pawn").is_valid());

        destroy_object(&registry, pawn);
        destroy_object(&registry, world);
    }

    #[test]
    fn destruction_runs_the_full_sequence()
    {
        let registry = Registry::new();
        let object =
            create_object(&registry, &OBJECT_CLASS, None, "Mortal").unwrap();
        let observer = object.clone();

        destroy_object(&registry, object);

        assert!(registry.find_by_name("Mortal").is_null());
        let raw = observer.get().unwrap();
        assert!(raw.has_any_flags(ObjectFlags::BEGIN_DESTROYED));
        assert!(raw.has_any_flags(ObjectFlags::FINISH_DESTROYED));
        assert_eq!(raw.ref_count(), 1);
    }

    #[test]
    fn destruction_of_null_is_a_no_op()
    {
        let registry = Registry::new();
        destroy_object(&registry, ObjectPtr::null());
    }

    #[test]
    #[should_panic(expected = "dereferenced a destroyed object")]
    fn stale_pointers_fail_loudly_after_destruction()
    {
        let registry = Registry::new();
        let object =
            create_object(&registry, &OBJECT_CLASS, None, "Stale").unwrap();
        let stale = object.clone();

        destroy_object(&registry, object);
        let _ = stale.name();
    }
}
