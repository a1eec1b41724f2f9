//! # Domain Layer Module
//!
//! 저장 가능한 엔티티의 계약과 실제 엔티티 정의를 담습니다.
//!
//! ```text
//! Domain Layer (이 모듈)
//! └── Entities   - 컬렉션/키 선언과 저장 형태(정형, 바이너리)
//!      │
//!      ▼
//! Services (DataStorageService, StatsService)
//!      │
//!      ▼
//! Codec → Repositories → MongoDB
//! ```
//!
//! ## 엔티티 형태
//!
//! | 형태 | 트레잇 | 저장 문서 |
//! |------|--------|-----------|
//! | 정형 | [`StorableStructuredData`](entities::StorableStructuredData) | `{ _id, ...필드 }` |
//! | 바이너리 | [`StorableBinaryData`](entities::StorableBinaryData) | `{ _id, data: Binary }` |
//!
//! ## 새로운 엔티티 추가
//!
//! ```rust,ignore
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! pub struct PartyData {
//!     pub party_id: String,
//!     pub members: Vec<String>,
//!     pub created_at: chrono::DateTime<chrono::Utc>,
//! }
//!
//! data_collection!(PartyData, name = "parties", key = party_id as "partyId");
//! ```
//!
//! 날짜 필드는 저장 백엔드와 무관하게 ISO-8601 문자열을 거쳐 디코딩되므로
//! `chrono::DateTime<Utc>`를 그대로 사용할 수 있습니다.

pub mod entities;

pub use entities::*;
