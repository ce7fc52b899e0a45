use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::storage::Storage;
use crate::types::{Funko, StoreError};

/// Per-(owner, id) mutex registry. Every check-then-act sequence in the
/// service runs under the key's lock so two concurrent adds cannot both
/// pass the existence check, and an update cannot interleave with a delete.
#[derive(Default)]
struct KeyLocks {
    inner: Mutex<HashMap<(String, u32), Arc<Mutex<()>>>>,
}

impl KeyLocks {
    fn acquire(&self, owner: &str, id: u32) -> Arc<Mutex<()>> {
        let mut map = self.inner.lock().unwrap();
        map.entry((owner.to_string(), id))
            .or_default()
            .clone()
    }
}

/// Business rules on top of a record store: per-owner id uniqueness, lazy
/// owner creation on add, presence checks for update/remove/fetch.
pub struct CollectionService<S: Storage> {
    storage: S,
    locks: KeyLocks,
}

impl<S: Storage> CollectionService<S> {
    pub fn new(storage: S) -> Self {
        Self {
            storage,
            locks: KeyLocks::default(),
        }
    }

    pub fn add(&self, owner: &str, funko: Funko) -> Result<(), StoreError> {
        let lock = self.locks.acquire(owner, funko.id);
        let _guard = lock.lock().unwrap();

        if self.storage.owner_exists(owner)? {
            if self.storage.exists(owner, funko.id)? {
                return Err(StoreError::AlreadyExists {
                    owner: owner.to_string(),
                    id: funko.id,
                });
            }
        } else {
            self.storage.create_owner(owner)?;
        }
        self.storage.put(owner, &funko)
    }

    pub fn update(&self, owner: &str, funko: Funko) -> Result<(), StoreError> {
        let lock = self.locks.acquire(owner, funko.id);
        let _guard = lock.lock().unwrap();

        if !self.storage.owner_exists(owner)? {
            return Err(StoreError::OwnerNotFound(owner.to_string()));
        }
        if !self.storage.exists(owner, funko.id)? {
            return Err(StoreError::NotFound {
                owner: owner.to_string(),
                id: funko.id,
            });
        }
        // A single upsert replaces the record in place; there is no window
        // in which the record is absent.
        self.storage.put(owner, &funko)
    }

    pub fn remove(&self, owner: &str, id: u32) -> Result<(), StoreError> {
        let lock = self.locks.acquire(owner, id);
        let _guard = lock.lock().unwrap();

        if !self.storage.owner_exists(owner)? {
            return Err(StoreError::OwnerNotFound(owner.to_string()));
        }
        if !self.storage.delete(owner, id)? {
            return Err(StoreError::NotFound {
                owner: owner.to_string(),
                id,
            });
        }
        Ok(())
    }

    pub fn fetch(&self, owner: &str, id: u32) -> Result<Funko, StoreError> {
        if !self.storage.owner_exists(owner)? {
            return Err(StoreError::OwnerNotFound(owner.to_string()));
        }
        self.storage
            .get(owner, id)?
            .ok_or_else(|| StoreError::NotFound {
                owner: owner.to_string(),
                id,
            })
    }

    pub fn list(&self, owner: &str) -> Result<Vec<Funko>, StoreError> {
        if !self.storage.owner_exists(owner)? {
            return Err(StoreError::OwnerNotFound(owner.to_string()));
        }
        self.storage.list_all(owner)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::RwLock;

    use super::*;

    /// In-memory test double for the storage trait.
    #[derive(Default)]
    struct MemoryStorage {
        owners: RwLock<HashSet<String>>,
        records: RwLock<HashMap<(String, u32), Funko>>,
    }

    impl Storage for MemoryStorage {
        fn owner_exists(&self, owner: &str) -> Result<bool, StoreError> {
            Ok(self.owners.read().unwrap().contains(owner))
        }

        fn create_owner(&self, owner: &str) -> Result<(), StoreError> {
            self.owners.write().unwrap().insert(owner.to_string());
            Ok(())
        }

        fn exists(&self, owner: &str, id: u32) -> Result<bool, StoreError> {
            let records = self.records.read().unwrap();
            Ok(records.contains_key(&(owner.to_string(), id)))
        }

        fn put(&self, owner: &str, funko: &Funko) -> Result<(), StoreError> {
            let mut records = self.records.write().unwrap();
            records.insert((owner.to_string(), funko.id), funko.clone());
            Ok(())
        }

        fn get(&self, owner: &str, id: u32) -> Result<Option<Funko>, StoreError> {
            let records = self.records.read().unwrap();
            Ok(records.get(&(owner.to_string(), id)).cloned())
        }

        fn delete(&self, owner: &str, id: u32) -> Result<bool, StoreError> {
            let mut records = self.records.write().unwrap();
            Ok(records.remove(&(owner.to_string(), id)).is_some())
        }

        fn list_all(&self, owner: &str) -> Result<Vec<Funko>, StoreError> {
            let records = self.records.read().unwrap();
            Ok(records
                .iter()
                .filter(|((o, _), _)| o == owner)
                .map(|(_, funko)| funko.clone())
                .collect())
        }
    }

    fn service() -> CollectionService<MemoryStorage> {
        CollectionService::new(MemoryStorage::default())
    }

    fn sample(id: u32, name: &str) -> Funko {
        Funko {
            id,
            name: name.to_string(),
            description: "a funko".to_string(),
            category: "Pop!".to_string(),
            genre: "Heroes".to_string(),
            franchise: "DC".to_string(),
            number: 7,
            is_exclusive: false,
            special_features: "none".to_string(),
            market_value: 20.0,
        }
    }

    #[test]
    fn add_then_fetch_returns_identical_record() {
        let svc = service();
        let batman = sample(1, "Batman");
        svc.add("ana", batman.clone()).unwrap();
        assert_eq!(svc.fetch("ana", 1).unwrap(), batman);
    }

    #[test]
    fn duplicate_add_fails_and_keeps_original() {
        let svc = service();
        svc.add("ana", sample(1, "Batman")).unwrap();
        let err = svc.add("ana", sample(1, "Robin")).unwrap_err();
        assert!(matches!(err, StoreError::AlreadyExists { id: 1, .. }));
        assert_eq!(svc.fetch("ana", 1).unwrap().name, "Batman");
    }

    #[test]
    fn same_id_allowed_for_different_owners() {
        let svc = service();
        svc.add("ana", sample(1, "Batman")).unwrap();
        svc.add("luis", sample(1, "Robin")).unwrap();
        assert_eq!(svc.fetch("ana", 1).unwrap().name, "Batman");
        assert_eq!(svc.fetch("luis", 1).unwrap().name, "Robin");
    }

    #[test]
    fn update_replaces_all_fields() {
        let svc = service();
        svc.add("ana", sample(1, "Batman")).unwrap();
        let mut replacement = sample(1, "Robin");
        replacement.market_value = 99.9;
        svc.update("ana", replacement.clone()).unwrap();
        assert_eq!(svc.fetch("ana", 1).unwrap(), replacement);
    }

    #[test]
    fn update_of_absent_id_is_a_failing_noop() {
        let svc = service();
        svc.add("ana", sample(1, "Batman")).unwrap();
        let err = svc.update("ana", sample(2, "Robin")).unwrap_err();
        assert!(matches!(err, StoreError::NotFound { id: 2, .. }));
        assert!(matches!(
            svc.fetch("ana", 2).unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[test]
    fn update_requires_owner() {
        let svc = service();
        let err = svc.update("nobody", sample(1, "Batman")).unwrap_err();
        assert!(matches!(err, StoreError::OwnerNotFound(_)));
    }

    #[test]
    fn remove_then_fetch_reports_not_found() {
        let svc = service();
        svc.add("ana", sample(1, "Batman")).unwrap();
        svc.remove("ana", 1).unwrap();
        assert!(matches!(
            svc.fetch("ana", 1).unwrap_err(),
            StoreError::NotFound { .. }
        ));
        assert!(matches!(
            svc.remove("ana", 1).unwrap_err(),
            StoreError::NotFound { .. }
        ));
    }

    #[test]
    fn list_sizes_track_adds_without_duplicates() {
        let svc = service();
        for id in 1..=5 {
            svc.add("ana", sample(id, "Funko")).unwrap();
        }
        let funkos = svc.list("ana").unwrap();
        assert_eq!(funkos.len(), 5);
        let ids: HashSet<u32> = funkos.iter().map(|f| f.id).collect();
        assert_eq!(ids.len(), 5);
    }

    #[test]
    fn list_of_unknown_owner_fails() {
        let svc = service();
        assert!(matches!(
            svc.list("nobody").unwrap_err(),
            StoreError::OwnerNotFound(_)
        ));
    }

    #[test]
    fn owner_with_all_records_removed_still_lists_empty() {
        let svc = service();
        svc.add("ana", sample(1, "Batman")).unwrap();
        svc.remove("ana", 1).unwrap();
        assert!(svc.list("ana").unwrap().is_empty());
    }
}
