use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use crate::types::{Funko, StoreError};

use super::Storage;

/// Flat-file backend. One directory per owner, one JSON file per record,
/// named by record id. An in-memory id -> path index per owner is rebuilt
/// on open so lookups never rescan the directory.
#[derive(Clone)]
pub struct FileStorage {
    root: PathBuf,
    index: Arc<RwLock<HashMap<String, HashMap<u32, PathBuf>>>>,
}

impl FileStorage {
    /// Opens the store rooted at `root`, creating it when absent, and
    /// rebuilds the id index from the directory tree.
    pub fn open<P: AsRef<Path>>(root: P) -> Result<Self, StoreError> {
        let root = root.as_ref().to_path_buf();
        fs::create_dir_all(&root)?;

        let mut index: HashMap<String, HashMap<u32, PathBuf>> = HashMap::new();
        for entry in fs::read_dir(&root)? {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let owner = entry.file_name().to_string_lossy().into_owned();
            let mut records = HashMap::new();
            for record_entry in fs::read_dir(entry.path())? {
                let path = record_entry?.path();
                if path.extension().and_then(|e| e.to_str()) != Some("json") {
                    continue;
                }
                let contents = fs::read_to_string(&path)?;
                let funko: Funko = serde_json::from_str(&contents)?;
                records.insert(funko.id, path);
            }
            index.insert(owner, records);
        }

        Ok(Self {
            root,
            index: Arc::new(RwLock::new(index)),
        })
    }

    fn record_path(&self, owner: &str, id: u32) -> PathBuf {
        self.root.join(owner).join(format!("{id}.json"))
    }
}

impl Storage for FileStorage {
    fn owner_exists(&self, owner: &str) -> Result<bool, StoreError> {
        Ok(self.index.read().unwrap().contains_key(owner))
    }

    fn create_owner(&self, owner: &str) -> Result<(), StoreError> {
        fs::create_dir_all(self.root.join(owner))?;
        self.index
            .write()
            .unwrap()
            .entry(owner.to_string())
            .or_default();
        Ok(())
    }

    fn exists(&self, owner: &str, id: u32) -> Result<bool, StoreError> {
        let index = self.index.read().unwrap();
        Ok(index.get(owner).is_some_and(|records| records.contains_key(&id)))
    }

    fn put(&self, owner: &str, funko: &Funko) -> Result<(), StoreError> {
        let path = self.record_path(owner, funko.id);
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }

        // Write to a sibling temp file, then rename over the target so the
        // record on disk is always either the old version or the new one.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, serde_json::to_vec(funko)?)?;
        fs::rename(&tmp, &path)?;

        let mut index = self.index.write().unwrap();
        index
            .entry(owner.to_string())
            .or_default()
            .insert(funko.id, path);
        Ok(())
    }

    fn get(&self, owner: &str, id: u32) -> Result<Option<Funko>, StoreError> {
        let path = {
            let index = self.index.read().unwrap();
            match index.get(owner).and_then(|records| records.get(&id)) {
                Some(path) => path.clone(),
                None => return Ok(None),
            }
        };
        match fs::read_to_string(&path) {
            Ok(contents) => Ok(Some(serde_json::from_str(&contents)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn delete(&self, owner: &str, id: u32) -> Result<bool, StoreError> {
        let mut index = self.index.write().unwrap();
        let Some(path) = index.get_mut(owner).and_then(|records| records.remove(&id)) else {
            return Ok(false);
        };
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(true),
            Err(e) => Err(e.into()),
        }
    }

    fn list_all(&self, owner: &str) -> Result<Vec<Funko>, StoreError> {
        let paths: Vec<PathBuf> = {
            let index = self.index.read().unwrap();
            match index.get(owner) {
                Some(records) => records.values().cloned().collect(),
                None => return Ok(Vec::new()),
            }
        };
        let mut funkos = Vec::with_capacity(paths.len());
        for path in paths {
            let contents = fs::read_to_string(&path)?;
            funkos.push(serde_json::from_str(&contents)?);
        }
        Ok(funkos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(id: u32, name: &str) -> Funko {
        Funko {
            id,
            name: name.to_string(),
            description: "a funko".to_string(),
            category: "Pop!".to_string(),
            genre: "Heroes".to_string(),
            franchise: "DC".to_string(),
            number: 7,
            is_exclusive: true,
            special_features: "none".to_string(),
            market_value: 12.0,
        }
    }

    #[test]
    fn get_returns_none_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path()).unwrap();
        assert!(store.get("ana", 1).unwrap().is_none());
        assert!(!store.exists("ana", 1).unwrap());
    }

    #[test]
    fn put_and_get_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path()).unwrap();
        let funko = sample(1, "Batman");
        store.put("ana", &funko).unwrap();
        assert!(store.exists("ana", 1).unwrap());
        assert_eq!(store.get("ana", 1).unwrap(), Some(funko));
    }

    #[test]
    fn put_overwrites_in_place() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path()).unwrap();
        store.put("ana", &sample(1, "Batman")).unwrap();
        store.put("ana", &sample(1, "Robin")).unwrap();
        let got = store.get("ana", 1).unwrap().unwrap();
        assert_eq!(got.name, "Robin");
        assert_eq!(store.list_all("ana").unwrap().len(), 1);
    }

    #[test]
    fn delete_removes_record_and_reports_absent() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path()).unwrap();
        store.put("ana", &sample(3, "Batman")).unwrap();
        assert!(store.delete("ana", 3).unwrap());
        assert!(!store.delete("ana", 3).unwrap());
        assert!(store.get("ana", 3).unwrap().is_none());
    }

    #[test]
    fn owners_are_partitioned() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path()).unwrap();
        store.put("ana", &sample(1, "Batman")).unwrap();
        store.put("luis", &sample(1, "Robin")).unwrap();
        assert_eq!(store.get("ana", 1).unwrap().unwrap().name, "Batman");
        assert_eq!(store.get("luis", 1).unwrap().unwrap().name, "Robin");
    }

    #[test]
    fn index_is_rebuilt_on_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStorage::open(dir.path()).unwrap();
            store.put("ana", &sample(1, "Batman")).unwrap();
            store.put("ana", &sample(2, "Robin")).unwrap();
        }
        let reopened = FileStorage::open(dir.path()).unwrap();
        assert!(reopened.owner_exists("ana").unwrap());
        assert!(reopened.exists("ana", 2).unwrap());
        let mut ids: Vec<u32> = reopened
            .list_all("ana")
            .unwrap()
            .into_iter()
            .map(|f| f.id)
            .collect();
        ids.sort_unstable();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn create_owner_makes_empty_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStorage::open(dir.path()).unwrap();
        assert!(!store.owner_exists("ana").unwrap());
        store.create_owner("ana").unwrap();
        assert!(store.owner_exists("ana").unwrap());
        assert!(store.list_all("ana").unwrap().is_empty());
    }
}
