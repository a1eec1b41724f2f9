//! # 데이터 저장소 에러 체계
//!
//! 엔티티 저장 계층에서 발생하는 모든 에러를 세 가지로 분류합니다.
//!
//! | 변형 | 원인 | 파사드 경계에서의 처리 |
//! |------|------|------------------------|
//! | `ConfigurationError` | 컬렉션/키 필드 메타데이터 오류, 저장 시 키 값 누락 | 호출자에게 그대로 반환 |
//! | `SerializationError` | 페이로드 인코딩/디코딩 실패 | 로그 후 빈 결과로 변환 |
//! | `ConnectivityError` | MongoDB 연결 실패, 연산 거부 | 로그 후 빈 결과로 변환 |
//!
//! 설정 에러만 파사드 밖으로 전파됩니다. 나머지는 [`ErrorSink`]로 보고된 뒤
//! `None`, `false`, 무동작 중 호출에 맞는 결과로 바뀝니다.
//!
//! [`ErrorSink`]: crate::services::storage::ErrorSink
//!
//! ## 사용 예제
//!
//! ```rust,ignore
//! use entity_datastore::core::errors::{DataStoreError, DataStoreResult};
//!
//! fn require_key(key: Option<&str>) -> DataStoreResult<&str> {
//!     key.ok_or_else(|| DataStoreError::ConfigurationError("Key field is null".to_string()))
//! }
//! ```

use thiserror::Error;

/// 저장 계층 전역 에러 타입
#[derive(Error, Debug)]
pub enum DataStoreError {
    /// 엔티티 타입 선언 오류 또는 저장 시 키 값 누락
    ///
    /// 코드 결함을 의미하므로 재시도해도 성공하지 않습니다.
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// 페이로드를 저장 형식으로 바꾸거나 되돌리는 과정의 실패
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// 백엔드 연결 불가 또는 연산 거부
    #[error("Connectivity error: {0}")]
    ConnectivityError(String),
}

impl DataStoreError {
    /// 호출자에게 전파되어야 하는 설정 에러인지 확인합니다.
    pub fn is_configuration(&self) -> bool {
        matches!(self, DataStoreError::ConfigurationError(_))
    }

    /// 로그에 남길 짧은 분류 이름
    pub fn kind(&self) -> &'static str {
        match self {
            DataStoreError::ConfigurationError(_) => "configuration",
            DataStoreError::SerializationError(_) => "serialization",
            DataStoreError::ConnectivityError(_) => "connectivity",
        }
    }
}

/// 편의성을 위한 Result 타입 별칭
pub type DataStoreResult<T> = Result<T, DataStoreError>;

impl From<mongodb::error::Error> for DataStoreError {
    fn from(error: mongodb::error::Error) -> Self {
        DataStoreError::ConnectivityError(error.to_string())
    }
}

impl From<mongodb::bson::ser::Error> for DataStoreError {
    fn from(error: mongodb::bson::ser::Error) -> Self {
        DataStoreError::SerializationError(error.to_string())
    }
}

impl From<mongodb::bson::de::Error> for DataStoreError {
    fn from(error: mongodb::bson::de::Error) -> Self {
        DataStoreError::SerializationError(error.to_string())
    }
}

impl From<serde_json::Error> for DataStoreError {
    fn from(error: serde_json::Error) -> Self {
        DataStoreError::SerializationError(error.to_string())
    }
}

impl From<std::io::Error> for DataStoreError {
    fn from(error: std::io::Error) -> Self {
        DataStoreError::SerializationError(format!("byte stream failure: {}", error))
    }
}
