//! Object-reference serialization.
//!
//! Object fields travel as a stable identity, never a raw address:
//! the full hierarchical name, resolved against a registry at load
//! time. An unresolved reference loads as a null pointer and is not
//! an error; the rest of this runtime is best-effort in the same way.

use crate::archive::Archive;
use crate::error::ArchiveError;
use crate::persist::Persist;

use ember_object::object::ObjectPtr;
use ember_object::registry::Registry;

/// Serialize an object reference through `ar`.
///
/// Saves the referenced object's full name, or an empty string for a
/// null pointer. On load the name is resolved against `registry`:
/// the pointer becomes null when the name is empty or no longer
/// registered.
pub fn persist_object_ref(
    ar: &mut dyn Archive,
    registry: &Registry,
    object: &mut ObjectPtr,
) -> Result<(), ArchiveError>
{
    let mut path = match object.get() {
        Some(target) => target.full_name(),
        None => String::new(),
    };
    path.persist(ar)?;

    if ar.is_loading() {
        *object = if path.is_empty() {
            ObjectPtr::null()
        } else {
            registry.find_by_name(&path)
        };
    }

    Ok(())
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::memory::MemoryArchive;

    use ember_object::class::OBJECT_CLASS;
    use ember_object::lifecycle::create_object;
    use ember_object::lifecycle::destroy_object;

    #[test]
    fn references_resolve_while_the_object_is_registered()
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

        let mut saver = MemoryArchive::for_saving();
        let mut field = pawn.clone();
        persist_object_ref(&mut saver, &registry, &mut field).unwrap();

        let mut loader = MemoryArchive::for_loading(saver.into_data());
        let mut loaded = ObjectPtr::null();
        persist_object_ref(&mut loader, &registry, &mut loaded).unwrap();

        assert_eq!(loaded.handle(), pawn.handle());
        assert_eq!(loaded.full_name(), "World.Pawn");

        drop(loaded);
        drop(field);
        destroy_object(&registry, pawn);
        destroy_object(&registry, world);
    }

    #[test]
    fn null_references_round_trip_as_null()
    {
        let registry = Registry::new();

        let mut saver = MemoryArchive::for_saving();
        let mut field = ObjectPtr::null();
        persist_object_ref(&mut saver, &registry, &mut field).unwrap();

        let mut loader = MemoryArchive::for_loading(saver.into_data());
        let mut loaded =
            create_object(&registry, &OBJECT_CLASS, None, "Overwritten")
                .unwrap();
        let keeper = loaded.clone();
        persist_object_ref(&mut loader, &registry, &mut loaded).unwrap();

        assert!(loaded.is_null());
        destroy_object(&registry, keeper);
    }

    #[test]
    fn unresolved_references_load_as_null_without_error()
    {
        let registry = Registry::new();
        let player =
            create_object(&registry, &OBJECT_CLASS, None, "Player").unwrap();

        let mut saver = MemoryArchive::for_saving();
        let mut field = player.clone();
        persist_object_ref(&mut saver, &registry, &mut field).unwrap();
        drop(field);

        // Destroy the original; the archived name now dangles.
        destroy_object(&registry, player);

        let mut loader = MemoryArchive::for_loading(saver.into_data());
        let mut loaded = ObjectPtr::null();
        persist_object_ref(&mut loader, &registry, &mut loaded).unwrap();

        assert!(loaded.is_null());
    }
}
