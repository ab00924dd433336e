// models/src/entity.rs
use std::collections::HashMap;

use crate::identifiers::{EntityId, Identifier};
use crate::properties::{FieldKind, PropertyMap, PropertyValue};

/// Reads one field of `T` as a [`PropertyValue`].
pub type FieldAccessor<T> = fn(&T) -> PropertyValue;

struct FieldEntry<T> {
    name: Identifier,
    kind: FieldKind,
    accessor: FieldAccessor<T>,
}

/// The fields an entity type exposes to queries, with the kind of value
/// each one holds.
///
/// Built once per type (see the `Lazy` statics next to each record) and
/// consulted by name at query time. Names that are not registered simply
/// are not there; callers decide whether that is an error. Lookups compare
/// against the registered names and never intern the caller's text.
pub struct FieldAccessors<T> {
    entity: &'static str,
    fields: Vec<FieldEntry<T>>,
    index: HashMap<&'static str, usize>,
}

impl<T> FieldAccessors<T> {
    pub fn new(entity: &'static str) -> Self {
        FieldAccessors {
            entity,
            fields: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Registers `name` as a field of `kind`. Field names are compile-time
    /// literals, so a name that is not a valid identifier is a programming
    /// error and is skipped in release builds.
    pub fn field(mut self, name: &'static str, kind: FieldKind, accessor: FieldAccessor<T>) -> Self {
        if self.index.contains_key(name) {
            debug_assert!(false, "field {name} registered twice");
            return self;
        }
        match Identifier::new(name) {
            Ok(id) => {
                self.index.insert(name, self.fields.len());
                self.fields.push(FieldEntry { name: id, kind, accessor });
            }
            Err(e) => debug_assert!(false, "invalid field name {name}: {e}"),
        }
        self
    }

    pub fn entity(&self) -> &'static str {
        self.entity
    }

    fn entry(&self, name: &str) -> Option<&FieldEntry<T>> {
        self.index.get(name).map(|&i| &self.fields[i])
    }

    /// Looks up the accessor for `name`. Unknown or malformed names yield `None`.
    pub fn get(&self, name: &str) -> Option<FieldAccessor<T>> {
        self.entry(name).map(|entry| entry.accessor)
    }

    /// The kind of value stored under `name`.
    pub fn kind(&self, name: &str) -> Option<FieldKind> {
        self.entry(name).map(|entry| entry.kind)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Field names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.fields.iter().map(|entry| &*entry.name)
    }
}

/// A record an `EntityStore` can hold.
///
/// The store stamps the identity through `assign_id`; everything else about
/// the record stays with its own type.
pub trait Entity: Clone + Send + Sync + 'static {
    /// Name used in logs and error messages.
    const ENTITY_NAME: &'static str;

    fn id(&self) -> Option<EntityId>;

    fn assign_id(&mut self, id: EntityId);

    fn field_accessors() -> &'static FieldAccessors<Self>;

    /// Reads the field called `name`, or `None` if the type has no such field.
    fn field(&self, name: &str) -> Option<PropertyValue> {
        Self::field_accessors().get(name).map(|accessor| accessor(self))
    }

    /// Every exposed field rendered as a property map.
    fn properties(&self) -> PropertyMap {
        Self::field_accessors()
            .fields
            .iter()
            .map(|entry| (entry.name.to_string(), (entry.accessor)(self)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use once_cell::sync::Lazy;

    #[derive(Clone, Debug)]
    struct Ward {
        id: Option<EntityId>,
        name: String,
        beds: i64,
    }

    static WARD_FIELDS: Lazy<FieldAccessors<Ward>> = Lazy::new(|| {
        FieldAccessors::<Ward>::new("Ward")
            .field("id", FieldKind::Integer, |w| w.id.into())
            .field("name", FieldKind::String, |w| (&w.name).into())
            .field("beds", FieldKind::Integer, |w| w.beds.into())
    });

    impl Entity for Ward {
        const ENTITY_NAME: &'static str = "Ward";

        fn id(&self) -> Option<EntityId> {
            self.id
        }

        fn assign_id(&mut self, id: EntityId) {
            self.id = Some(id);
        }

        fn field_accessors() -> &'static FieldAccessors<Self> {
            &WARD_FIELDS
        }
    }

    fn ward() -> Ward {
        Ward { id: None, name: "East".to_string(), beds: 12 }
    }

    #[test]
    fn field_reads_registered_accessors() {
        let w = ward();
        assert_eq!(w.field("beds"), Some(PropertyValue::Integer(12)));
        assert_eq!(w.field("id"), Some(PropertyValue::Null));
    }

    #[test]
    fn unknown_and_malformed_names_are_absent() {
        let w = ward();
        assert_eq!(w.field("floor"), None);
        assert_eq!(w.field("not a name"), None);
        assert_eq!(w.field(""), None);
        assert_eq!(Ward::field_accessors().kind("floor"), None);
    }

    #[test]
    fn lookups_do_not_intern_the_requested_name() {
        let fields = Ward::field_accessors();
        let before = internment::Intern::<String>::num_objects_interned();
        for i in 0..200 {
            assert!(!fields.contains(&format!("floor_{i}")));
            assert_eq!(ward().field(&format!("wing_{i}")), None);
            assert_eq!(fields.kind(&format!("annex_{i}")), None);
        }
        // Tests running alongside may register their own fields meanwhile.
        let added = internment::Intern::<String>::num_objects_interned() - before;
        assert!(added < 100, "{added} strings interned by lookups");
    }

    #[test]
    fn kinds_follow_registration() {
        let fields = Ward::field_accessors();
        assert_eq!(fields.kind("name"), Some(FieldKind::String));
        assert_eq!(fields.kind("beds"), Some(FieldKind::Integer));
    }

    #[test]
    fn properties_cover_every_field() {
        let props = ward().properties();
        assert_eq!(props.len(), 3);
        assert_eq!(props.get("name"), Some(&PropertyValue::String("East".to_string())));
        let names: Vec<&str> = Ward::field_accessors().names().collect();
        assert_eq!(names, vec!["id", "name", "beds"]);
    }
}
