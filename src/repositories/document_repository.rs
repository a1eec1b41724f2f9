//! # 문서 리포지토리 구현
//!
//! 컬렉션 단위의 원시 문서 연산을 담당합니다. 모든 연산은 `_id` 한 필드로만
//! 문서를 식별하며, 엔티티 타입에 대해서는 알지 못합니다.
//!
//! ## 연산 계약
//!
//! | 연산 | 동작 |
//! |------|------|
//! | `upsert` | `_id` 기준 교체 또는 삽입, 마지막 쓰기 승리 |
//! | `find_by_id` | 문서 또는 `None` |
//! | `count` | 존재 확인용 개수 (문서를 읽지 않음) |
//! | `delete_by_id` | 없는 `_id` 삭제는 에러가 아닌 무동작 |

use std::sync::Arc;

use log::debug;
use mongodb::bson::{Document, doc};

use crate::core::errors::DataStoreResult;
use crate::db::Database;

/// 저장소 백엔드 추상화
///
/// 동기 인터페이스이며 여러 스레드에서 잠금 없이 공유됩니다.
pub trait DocumentRepository: Send + Sync {
    /// `_id`가 `id`인 문서를 `document`로 교체하거나 새로 삽입합니다.
    fn upsert(&self, collection_name: &str, id: &str, document: Document) -> DataStoreResult<()>;

    /// `_id`가 `id`인 문서를 조회합니다.
    fn find_by_id(&self, collection_name: &str, id: &str) -> DataStoreResult<Option<Document>>;

    /// `_id`가 `id`인 문서 수를 셉니다 (0 또는 1).
    fn count(&self, collection_name: &str, id: &str) -> DataStoreResult<u64>;

    /// `_id`가 `id`인 문서를 삭제합니다.
    fn delete_by_id(&self, collection_name: &str, id: &str) -> DataStoreResult<()>;

    /// 백엔드 자원을 해제합니다.
    fn teardown(&self) {}
}

/// MongoDB 기반 문서 리포지토리
pub struct MongoDocumentRepository {
    /// 공유 데이터베이스 연결
    db: Arc<Database>,
}

impl MongoDocumentRepository {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl DocumentRepository for MongoDocumentRepository {
    fn upsert(&self, collection_name: &str, id: &str, document: Document) -> DataStoreResult<()> {
        let result = self
            .db
            .collection(collection_name)?
            .replace_one(doc! { "_id": id }, document)
            .upsert(true)
            .run()?;

        debug!(
            "[DataStorage] upsert: collection={}, key={}, matched={}, upserted={}",
            collection_name,
            id,
            result.matched_count,
            result.upserted_id.is_some()
        );
        Ok(())
    }

    fn find_by_id(&self, collection_name: &str, id: &str) -> DataStoreResult<Option<Document>> {
        Ok(self
            .db
            .collection(collection_name)?
            .find_one(doc! { "_id": id })
            .run()?)
    }

    fn count(&self, collection_name: &str, id: &str) -> DataStoreResult<u64> {
        Ok(self
            .db
            .collection(collection_name)?
            .count_documents(doc! { "_id": id })
            .run()?)
    }

    fn delete_by_id(&self, collection_name: &str, id: &str) -> DataStoreResult<()> {
        let result = self
            .db
            .collection(collection_name)?
            .delete_one(doc! { "_id": id })
            .run()?;

        debug!(
            "[DataStorage] delete: collection={}, key={}, deleted={}",
            collection_name, id, result.deleted_count
        );
        Ok(())
    }

    fn teardown(&self) {
        self.db.teardown();
    }
}
