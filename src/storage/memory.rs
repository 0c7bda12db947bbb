//! In-memory greeting store for local development and tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{canonical_key, GreetingStore, StorageError};

/// Process-local store with the same contract as the DynamoDB table.
///
/// Keys are stored in canonical numeric form, so every spelling of a number
/// addresses the same record and keys the table would reject fail here too.
#[derive(Debug, Default)]
pub struct MemoryStore {
    items: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored greetings
    pub async fn len(&self) -> usize {
        self.items.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.items.read().await.is_empty()
    }
}

#[async_trait]
impl GreetingStore for MemoryStore {
    async fn write_item(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let id = canonical_key(key)?;
        self.items.write().await.insert(id, value.to_string());
        Ok(())
    }

    async fn read_item(&self, key: &str) -> Result<String, StorageError> {
        let id = canonical_key(key)?;
        self.items
            .read()
            .await
            .get(&id)
            .cloned()
            .ok_or_else(|| StorageError::NotFound(key.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn last_write_wins() {
        let store = MemoryStore::new();
        store.write_item("42", "hello").await.unwrap();
        store.write_item("42", "bonjour").await.unwrap();

        assert_eq!(store.read_item("42").await.unwrap(), "bonjour");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn numeric_spellings_address_one_record() {
        let store = MemoryStore::new();
        store.write_item("42", "a").await.unwrap();
        store.write_item("042", "b").await.unwrap();

        assert_eq!(store.read_item("42.0").await.unwrap(), "b");
        assert_eq!(store.read_item("4.2e1").await.unwrap(), "b");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn out_of_range_key_is_rejected() {
        let store = MemoryStore::new();
        let err = store.write_item("1e999", "hello").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn unknown_key_is_not_found() {
        let store = MemoryStore::new();
        let err = store.read_item("999").await.unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn non_numeric_key_is_rejected() {
        let store = MemoryStore::new();
        let err = store.write_item("abc", "hello").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
        assert!(store.is_empty().await);

        let err = store.read_item("abc").await.unwrap_err();
        assert!(matches!(err, StorageError::InvalidKey(_)));
    }
}
