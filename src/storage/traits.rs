use std::sync::Arc;

use crate::types::{Funko, StoreError};

/// Backend-agnostic record store. Records are keyed by (owner, id); an
/// owner namespace is a partition created lazily on first write.
pub trait Storage {
    fn owner_exists(&self, owner: &str) -> Result<bool, StoreError>;
    fn create_owner(&self, owner: &str) -> Result<(), StoreError>;
    fn exists(&self, owner: &str, id: u32) -> Result<bool, StoreError>;
    /// Atomic upsert: writes or overwrites the record under (owner, funko.id).
    fn put(&self, owner: &str, funko: &Funko) -> Result<(), StoreError>;
    fn get(&self, owner: &str, id: u32) -> Result<Option<Funko>, StoreError>;
    /// Returns false when no record with that id was present.
    fn delete(&self, owner: &str, id: u32) -> Result<bool, StoreError>;
    /// All records for the owner, order unspecified.
    fn list_all(&self, owner: &str) -> Result<Vec<Funko>, StoreError>;
}

impl<S: Storage + ?Sized> Storage for Arc<S> {
    fn owner_exists(&self, owner: &str) -> Result<bool, StoreError> {
        (**self).owner_exists(owner)
    }

    fn create_owner(&self, owner: &str) -> Result<(), StoreError> {
        (**self).create_owner(owner)
    }

    fn exists(&self, owner: &str, id: u32) -> Result<bool, StoreError> {
        (**self).exists(owner, id)
    }

    fn put(&self, owner: &str, funko: &Funko) -> Result<(), StoreError> {
        (**self).put(owner, funko)
    }

    fn get(&self, owner: &str, id: u32) -> Result<Option<Funko>, StoreError> {
        (**self).get(owner, id)
    }

    fn delete(&self, owner: &str, id: u32) -> Result<bool, StoreError> {
        (**self).delete(owner, id)
    }

    fn list_all(&self, owner: &str) -> Result<Vec<Funko>, StoreError> {
        (**self).list_all(owner)
    }
}
