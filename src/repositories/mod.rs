//! 저장소 백엔드 계층을 담당하는 리포지토리 모듈
//!
//! 컬렉션 이름과 `_id`만으로 동작하는 원시 문서 연산을 제공합니다.
//!
//! # Features
//!
//! - [`DocumentRepository`] - 동기 백엔드 계약 (upsert, find_by_id, count, delete_by_id)
//! - [`MongoDocumentRepository`] - 공유 MongoDB 연결 위의 구현
//! - [`InMemoryDocumentRepository`] - 같은 계약의 메모리 구현
//!
//! # Examples
//!
//! ```rust,ignore
//! use entity_datastore::repositories::{DocumentRepository, InMemoryDocumentRepository};
//! use mongodb::bson::doc;
//!
//! let repo = InMemoryDocumentRepository::new();
//! repo.upsert("worlds", "lobby:spawn", doc! { "_id": "lobby:spawn" })?;
//! assert_eq!(repo.count("worlds", "lobby:spawn")?, 1);
//! ```

pub mod document_repository;
pub mod memory_repository;

pub use document_repository::{DocumentRepository, MongoDocumentRepository};
pub use memory_repository::InMemoryDocumentRepository;
