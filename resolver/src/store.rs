use crate::errors::StoreError;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::HashMap;

/// Read access to the key-value store holding index documents and
/// revision pointers.
#[async_trait]
pub trait IndexStore: Send + Sync {
    /// Returns the value stored under `key`, or `None` if it is absent.
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
}

/// In-process store. Useful for local runs and tests.
#[derive(Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new(entries: HashMap<String, String>) -> Self {
        MemoryStore {
            entries: RwLock::new(entries),
        }
    }

    pub fn set<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.entries.write().insert(key.into(), value.into());
    }

    pub fn remove(&self, key: &str) {
        self.entries.write().remove(key);
    }
}

#[async_trait]
impl IndexStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.read().get(key).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::new(HashMap::from([(
            "myapp:current".to_string(),
            "myapp:abc123".to_string(),
        )]));

        assert_eq!(
            store.get("myapp:current").await.unwrap(),
            Some("myapp:abc123".to_string())
        );
        assert_eq!(store.get("myapp:abc123").await.unwrap(), None);

        store.set("myapp:abc123", "<html></html>");
        assert_eq!(
            store.get("myapp:abc123").await.unwrap(),
            Some("<html></html>".to_string())
        );

        store.remove("myapp:abc123");
        assert_eq!(store.get("myapp:abc123").await.unwrap(), None);
    }
}
