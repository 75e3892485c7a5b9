//! Runtime type descriptors.
//!
//! A [`Class`] is a lightweight type identity distinct from Rust's own
//! type system: it carries a name, an optional super type, and a
//! factory operation. Descriptors are process-lifetime singletons
//! declared as `static` values; identity is the address of the static,
//! which the registry uses to key its per-class instance lists.

use crate::object::Object;
use crate::object::ObjectPtr;

/// Factory operation producing a new instance of a class.
///
/// The returned pointer owns the new object's creation reference.
pub type Factory = fn(outer: Option<ObjectPtr>, name: &str) -> Option<ObjectPtr>;

/// Minimal runtime type descriptor.
///
/// Immutable after construction and therefore freely shared between
/// threads. The super links form a tree; the root descriptor has no
/// super.
pub struct Class
{
    name: &'static str,
    super_class: Option<&'static Class>,
    factory: Option<Factory>,
}

impl Class
{
    /// Declare a descriptor with no factory.
    ///
    /// Such a class is abstract in the sense that
    /// [`create_instance`][`Class::create_instance`] always declines.
    pub const fn new(
        name: &'static str,
        super_class: Option<&'static Class>,
    ) -> Self
    {
        Self{name, super_class, factory: None}
    }

    /// Declare a descriptor whose instances come from `factory`.
    pub const fn with_factory(
        name: &'static str,
        super_class: Option<&'static Class>,
        factory: Factory,
    ) -> Self
    {
        Self{name, super_class, factory: Some(factory)}
    }

    /// Name of the type, unique across the live type universe by
    /// convention (uniqueness is not enforced here).
    pub fn name(&self) -> &'static str
    {
        self.name
    }

    /// Parent descriptor, absent for a root of the type hierarchy.
    pub fn super_class(&self) -> Option<&'static Class>
    {
        self.super_class
    }

    /// Polymorphic factory hook.
    ///
    /// Returns [`None`] when the descriptor carries no factory.
    /// The instance is not registered; use
    /// [`create_object`][`crate::lifecycle::create_object`] for the
    /// full construction sequence.
    pub fn create_instance(
        &self,
        outer: Option<ObjectPtr>,
        name: &str,
    ) -> Option<ObjectPtr>
    {
        self.factory.and_then(|factory| factory(outer, name))
    }

    /// Names of the reflected properties of this type.
    ///
    /// Reflection is stubbed in this core: the list is always empty.
    pub fn property_names(&self) -> Vec<String>
    {
        Vec::new()
    }

    /// Whether this type reflects a property with the given name.
    ///
    /// Reflection is stubbed in this core: always false.
    pub fn has_property(&self, _name: &str) -> bool
    {
        false
    }

    /// Identity of this descriptor.
    pub fn id(&'static self) -> ClassId
    {
        ClassId(self as *const Class as usize)
    }
}

/// Identity of a `static` class descriptor: the address of the static.
///
/// Two ids compare equal exactly when they name the same descriptor.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct ClassId(usize);

/// Descriptor for the plain base object kind.
///
/// Its factory allocates an [`Object`] with no payload beyond the
/// identity fields, which is what most callers of
/// [`create_object`][`crate::lifecycle::create_object`] want.
pub static OBJECT_CLASS: Class =
    Class::with_factory("Object", None, allocate_plain);

fn allocate_plain(outer: Option<ObjectPtr>, name: &str) -> Option<ObjectPtr>
{
    Some(Object::allocate(&OBJECT_CLASS, outer, name))
}

#[cfg(test)]
mod tests
{
    use super::*;

    static ABSTRACT: Class = Class::new("Abstract", Some(&OBJECT_CLASS));

    #[test]
    fn descriptor_accessors()
    {
        assert_eq!(OBJECT_CLASS.name(), "Object");
        assert!(OBJECT_CLASS.super_class().is_none());

        assert_eq!(ABSTRACT.name(), "Abstract");
        let super_class = ABSTRACT.super_class().unwrap();
        assert_eq!(super_class.id(), OBJECT_CLASS.id());
    }

    #[test]
    fn descriptor_identity_is_per_static()
    {
        assert_eq!(OBJECT_CLASS.id(), OBJECT_CLASS.id());
        assert_ne!(OBJECT_CLASS.id(), ABSTRACT.id());
    }

    #[test]
    fn factoryless_class_declines_to_instantiate()
    {
        assert!(ABSTRACT.create_instance(None, "Nope").is_none());
    }

    #[test]
    fn object_class_instantiates()
    {
        let object = OBJECT_CLASS.create_instance(None, "Plain").unwrap();
        assert_eq!(object.name(), "Plain");
        assert_eq!(object.class().id(), OBJECT_CLASS.id());
        assert_eq!(object.ref_count(), 1);
    }

    #[test]
    fn reflection_is_stubbed()
    {
        assert!(OBJECT_CLASS.property_names().is_empty());
        assert!(!OBJECT_CLASS.has_property("Name"));
    }
}
