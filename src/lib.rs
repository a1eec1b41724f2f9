//! 엔티티 데이터 저장 계층
//!
//! 선언형 메타데이터로 엔티티를 MongoDB 문서에 매핑하는 저장 라이브러리입니다.
//! 엔티티는 컬렉션 이름과 키 필드만 선언하면 저장, 조회, 존재 확인, 삭제를
//! 동기/비동기 양쪽으로 사용할 수 있습니다.
//!
//! # Features
//!
//! - **메타데이터 레지스트리**: `data_collection!` 선언을 컴파일 타임에 수집하고 런타임에 캐시
//! - **문서 코덱**: 키 필드 ↔ `_id` 재배치, ISO-8601 날짜 호환 경계
//! - **저장소 백엔드**: MongoDB 동기 드라이버 또는 메모리 구현
//! - **저장 파사드**: 설정 오류만 전파하고 나머지는 로그 후 부정 결과로 변환
//! - **워커 풀**: 동시 실행 수가 제한된 비동기 실행
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────┐
//! │  Domain Services    │ ← StatsService 등
//! └─────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────┐
//! │ DataStorageService  │ ← 에러 정책, 비동기 디스패치
//! └─────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────┐
//! │   DocumentCodec     │ ← 엔티티 ↔ 문서
//! └─────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────┐
//! │    Repositories     │ ← upsert / find / count / delete
//! └─────────────────────┘
//!          │
//!          ▼
//! ┌─────────────────────┐
//! │  MongoDB / Memory   │ ← 저장소
//! └─────────────────────┘
//! ```
//!
//! # Examples
//!
//! ```rust,ignore
//! use entity_datastore::config::DataStoreConfig;
//! use entity_datastore::domain::entities::stats::PlayerStatsData;
//! use entity_datastore::services::storage::DataStorageService;
//!
//! let storage = DataStorageService::connect(&DataStoreConfig::from_env())?;
//!
//! storage.store_structured(&PlayerStatsData::empty("p-1"))?;
//! let loaded = storage.load_structured::<PlayerStatsData>("p-1")?;
//! ```

pub mod codec;
pub mod config;
pub mod core;
pub mod db;
pub mod domain;
pub mod repositories;
pub mod services;
pub mod utils;

#[doc(hidden)]
pub use inventory;
