//! # 메모리 문서 리포지토리
//!
//! MongoDB 리포지토리와 같은 계약을 프로세스 메모리에서 구현합니다.
//! 로컬 실행(`DATASTORE_BACKEND=memory`)과 테스트에서 사용합니다.
//!
//! `teardown` 이후에는 MongoDB 리포지토리와 마찬가지로 모든 연산이
//! `ConnectivityError`로 실패합니다.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use log::info;
use mongodb::bson::Document;

use crate::core::errors::{DataStoreError, DataStoreResult};
use crate::repositories::document_repository::DocumentRepository;

/// 컬렉션 이름 → (`_id` → 문서)
type Collections = HashMap<String, HashMap<String, Document>>;

/// 메모리 기반 문서 리포지토리
pub struct InMemoryDocumentRepository {
    /// 저장된 컬렉션 (해제 후에는 `None`)
    collections: RwLock<Option<Collections>>,
}

impl Default for InMemoryDocumentRepository {
    fn default() -> Self {
        Self {
            collections: RwLock::new(Some(HashMap::new())),
        }
    }
}

impl InMemoryDocumentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// 컬렉션에 저장된 문서 수. 해제된 저장소는 0입니다.
    pub fn document_count(&self, collection_name: &str) -> usize {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .and_then(|collections| collections.get(collection_name))
            .map_or(0, HashMap::len)
    }

    pub fn is_open(&self) -> bool {
        self.collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

fn closed() -> DataStoreError {
    DataStoreError::ConnectivityError("in-memory store is closed".to_string())
}

impl DocumentRepository for InMemoryDocumentRepository {
    fn upsert(&self, collection_name: &str, id: &str, document: Document) -> DataStoreResult<()> {
        self.collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
            .ok_or_else(closed)?
            .entry(collection_name.to_string())
            .or_default()
            .insert(id.to_string(), document);
        Ok(())
    }

    fn find_by_id(&self, collection_name: &str, id: &str) -> DataStoreResult<Option<Document>> {
        Ok(self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .ok_or_else(closed)?
            .get(collection_name)
            .and_then(|documents| documents.get(id))
            .cloned())
    }

    fn count(&self, collection_name: &str, id: &str) -> DataStoreResult<u64> {
        let found = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .ok_or_else(closed)?
            .get(collection_name)
            .is_some_and(|documents| documents.contains_key(id));
        Ok(u64::from(found))
    }

    fn delete_by_id(&self, collection_name: &str, id: &str) -> DataStoreResult<()> {
        if let Some(documents) = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .as_mut()
            .ok_or_else(closed)?
            .get_mut(collection_name)
        {
            documents.remove(id);
        }
        Ok(())
    }

    /// 저장된 문서를 모두 버리고 저장소를 닫습니다. 두 번 호출해도 안전합니다.
    fn teardown(&self) {
        let released = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if released.is_some() {
            info!("🔌 메모리 저장소 해제");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::doc;

    #[test]
    fn test_upsert_replaces_whole_document() {
        let repo = InMemoryDocumentRepository::new();

        repo.upsert("players", "p-1", doc! { "_id": "p-1", "name": "Ann", "rank": 3 }).unwrap();
        repo.upsert("players", "p-1", doc! { "_id": "p-1", "name": "Ann2" }).unwrap();

        let stored = repo.find_by_id("players", "p-1").unwrap().unwrap();
        assert_eq!(stored.get_str("name").unwrap(), "Ann2");
        assert!(!stored.contains_key("rank"));
        assert_eq!(repo.document_count("players"), 1);
    }

    #[test]
    fn test_count_and_missing_lookup() {
        let repo = InMemoryDocumentRepository::new();
        repo.upsert("players", "p-1", doc! { "_id": "p-1" }).unwrap();

        assert_eq!(repo.count("players", "p-1").unwrap(), 1);
        assert_eq!(repo.count("players", "p-2").unwrap(), 0);
        assert_eq!(repo.count("unknown", "p-1").unwrap(), 0);
        assert!(repo.find_by_id("players", "p-2").unwrap().is_none());
    }

    #[test]
    fn test_delete_absent_is_noop() {
        let repo = InMemoryDocumentRepository::new();

        assert!(repo.delete_by_id("players", "ghost").is_ok());

        repo.upsert("players", "p-1", doc! { "_id": "p-1" }).unwrap();
        repo.delete_by_id("players", "p-1").unwrap();
        repo.delete_by_id("players", "p-1").unwrap();
        assert_eq!(repo.count("players", "p-1").unwrap(), 0);
    }

    #[test]
    fn test_collections_are_isolated() {
        let repo = InMemoryDocumentRepository::new();
        repo.upsert("a", "k", doc! { "_id": "k", "v": 1 }).unwrap();
        repo.upsert("b", "k", doc! { "_id": "k", "v": 2 }).unwrap();

        assert_eq!(repo.find_by_id("a", "k").unwrap().unwrap().get_i32("v").unwrap(), 1);
        assert_eq!(repo.find_by_id("b", "k").unwrap().unwrap().get_i32("v").unwrap(), 2);
    }

    #[test]
    fn test_operations_fail_after_teardown() {
        let repo = InMemoryDocumentRepository::new();
        repo.upsert("players", "p-1", doc! { "_id": "p-1" }).unwrap();

        repo.teardown();
        repo.teardown();

        assert!(!repo.is_open());
        assert_eq!(repo.document_count("players"), 0);
        assert!(matches!(
            repo.find_by_id("players", "p-1"),
            Err(DataStoreError::ConnectivityError(_))
        ));
        assert!(matches!(repo.count("players", "p-1"), Err(DataStoreError::ConnectivityError(_))));
        assert!(matches!(
            repo.upsert("players", "p-2", doc! { "_id": "p-2" }),
            Err(DataStoreError::ConnectivityError(_))
        ));
        assert!(matches!(
            repo.delete_by_id("players", "p-1"),
            Err(DataStoreError::ConnectivityError(_))
        ));
    }
}
