// lib/src/storage_engine/inmemory_storage.rs
use std::collections::HashMap;
use std::fmt;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use log::debug;

use hospital_models::{Entity, EntityId, PropertyValue};

use crate::errors::{StoreError, StoreResult};

// The counter and the map live behind one lock so an identity is never
// handed out without its entry, and vice versa.
struct InternalStore<T> {
    last_id: u64,
    entities: HashMap<EntityId, T>,
}

/// In-memory collection of one entity type, keyed by the identity the store
/// assigns.
///
/// Identities start at 1 and grow by one per insert; deleted identities are
/// never handed out again. Writers are exclusive and readers share the lock,
/// so a reader sees either all of an insert/delete or none of it. Every
/// read returns clones, never references into the store.
pub struct EntityStore<T: Entity> {
    internal: RwLock<InternalStore<T>>,
}

impl<T: Entity> EntityStore<T> {
    pub fn new() -> Self {
        EntityStore {
            internal: RwLock::new(InternalStore {
                last_id: 0,
                entities: HashMap::new(),
            }),
        }
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, InternalStore<T>>> {
        self.internal.read().map_err(|e| StoreError::LockError(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, InternalStore<T>>> {
        self.internal.write().map_err(|e| StoreError::LockError(e.to_string()))
    }

    /// Stamps the next identity on `entity`, stores it and returns the
    /// stamped copy. Any identity the entity carried before is replaced.
    pub fn insert(&self, mut entity: T) -> StoreResult<T> {
        let mut internal = self.write()?;
        internal.last_id += 1;
        let id = EntityId(internal.last_id);
        entity.assign_id(id);
        internal.entities.insert(id, entity.clone());
        debug!("Inserted {} #{}", T::ENTITY_NAME, id);
        Ok(entity)
    }

    /// Replaces the stored copy of `entity`. The entity must carry an
    /// identity this store issued and has not deleted.
    pub fn update(&self, entity: T) -> StoreResult<()> {
        let id = entity.id().ok_or(StoreError::MissingIdentity {
            entity: T::ENTITY_NAME,
        })?;
        let mut internal = self.write()?;
        match internal.entities.get_mut(&id) {
            Some(slot) => {
                *slot = entity;
                debug!("Updated {} #{}", T::ENTITY_NAME, id);
                Ok(())
            }
            None => Err(StoreError::NotFound {
                entity: T::ENTITY_NAME,
                id,
            }),
        }
    }

    pub fn find_by_id(&self, id: EntityId) -> StoreResult<Option<T>> {
        Ok(self.read()?.entities.get(&id).cloned())
    }

    /// Snapshot of every live entity in ascending identity order.
    pub fn find_all(&self) -> StoreResult<Vec<T>> {
        self.find_where(|_| true)
    }

    /// Entities whose field `field` equals `value`, in ascending identity
    /// order.
    ///
    /// # Errors
    /// `StoreError::FieldNotFound` when the entity type has no such field.
    /// A value of the wrong type is not an error; it just matches nothing.
    pub fn find_by_field(
        &self,
        field: &str,
        value: impl Into<PropertyValue>,
    ) -> StoreResult<Vec<T>> {
        let accessor = T::field_accessors()
            .get(field)
            .ok_or_else(|| StoreError::FieldNotFound {
                entity: T::ENTITY_NAME,
                field: field.to_string(),
            })?;
        let value = value.into();
        self.find_where(|entity| accessor(entity) == value)
    }

    /// Like [`find_by_field`](Self::find_by_field), but `raw` is text read
    /// against the kind the field was registered with, so `"12345678"`
    /// matches a national id and `"150000"` matches a cost of 150000.00.
    ///
    /// # Errors
    /// `StoreError::FieldNotFound` for an unknown field and
    /// `StoreError::InvalidFieldValue` when `raw` does not parse as the
    /// field's kind.
    pub fn find_by_field_text(&self, field: &str, raw: &str) -> StoreResult<Vec<T>> {
        let accessors = T::field_accessors();
        let (accessor, kind) = accessors
            .get(field)
            .zip(accessors.kind(field))
            .ok_or_else(|| StoreError::FieldNotFound {
                entity: T::ENTITY_NAME,
                field: field.to_string(),
            })?;
        let value = kind.parse(raw).map_err(|reason| StoreError::InvalidFieldValue {
            entity: T::ENTITY_NAME,
            field: field.to_string(),
            reason,
        })?;
        self.find_where(|entity| accessor(entity) == value)
    }

    /// Entities matching `predicate`, in ascending identity order. The
    /// predicate runs under the read lock and must not touch this store.
    pub fn find_where<F>(&self, predicate: F) -> StoreResult<Vec<T>>
    where
        F: Fn(&T) -> bool,
    {
        let internal = self.read()?;
        let mut matches: Vec<(EntityId, &T)> = internal
            .entities
            .iter()
            .filter(|(_, entity)| predicate(*entity))
            .map(|(id, entity)| (*id, entity))
            .collect();
        matches.sort_unstable_by_key(|(id, _)| *id);
        Ok(matches.into_iter().map(|(_, entity)| entity.clone()).collect())
    }

    /// The lowest-identity entity matching `predicate`, without cloning the
    /// rest of the collection.
    pub fn first_where<F>(&self, predicate: F) -> StoreResult<Option<T>>
    where
        F: Fn(&T) -> bool,
    {
        let internal = self.read()?;
        Ok(internal
            .entities
            .iter()
            .filter(|(_, entity)| predicate(*entity))
            .min_by_key(|(id, _)| **id)
            .map(|(_, entity)| entity.clone()))
    }

    /// Number of live entities.
    pub fn size(&self) -> StoreResult<usize> {
        Ok(self.read()?.entities.len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.size()? == 0)
    }

    /// Removes `id`. Returns whether anything was removed.
    pub fn delete(&self, id: EntityId) -> StoreResult<bool> {
        let removed = self.write()?.entities.remove(&id).is_some();
        if removed {
            debug!("Deleted {} #{}", T::ENTITY_NAME, id);
        }
        Ok(removed)
    }
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> fmt::Debug for EntityStore<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let size = self.size().ok();
        f.debug_struct("EntityStore")
            .field("entity", &T::ENTITY_NAME)
            .field("size", &size)
            .finish()
    }
}
