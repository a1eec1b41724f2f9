//! # Core Module
//!
//! 저장 계층 전체가 공유하는 기반 기능을 제공합니다.
//!
//! ## 모듈 구성
//!
//! ### [`registry`] - 엔티티 메타데이터 레지스트리
//! - **컴파일 타임 등록**: `inventory` 기반으로 `data_collection!` 선언 수집
//! - **런타임 캐시**: 타입별 컬렉션 이름과 키 필드를 한 번만 해석
//! - **시작 시 검증**: 모든 등록을 일괄 검증하여 설정 오류를 조기 발견
//!
//! ### [`errors`] - 통합 에러 처리
//! - **DataStoreError**: 설정 / 직렬화 / 연결 세 가지 분류
//! - **자동 변환**: 드라이버, bson, serde_json, io 에러를 `?`로 변환
//!
//! ## 에러 분류와 전파
//!
//! | 분류 | 의미 | 파사드 경계 |
//! |------|------|-------------|
//! | `ConfigurationError` | 엔티티 선언 오류, null 키 | 호출자에게 전파 |
//! | `SerializationError` | 페이로드 변환 실패 | 로그 후 부정 결과 |
//! | `ConnectivityError` | 백엔드 연결 불가 | 로그 후 부정 결과 |
//!
//! ## 사용 패턴
//!
//! ```rust,ignore
//! use entity_datastore::core::registry::MetadataResolver;
//! use entity_datastore::domain::entities::stats::PlayerStatsData;
//!
//! // 시작 시 한 번
//! MetadataResolver::validate_registrations()?;
//!
//! let metadata = MetadataResolver::resolve::<PlayerStatsData>()?;
//! assert_eq!(metadata.collection_name, "player_stats");
//! ```

pub mod errors;
pub mod registry;

pub use errors::*;
pub use registry::*;
