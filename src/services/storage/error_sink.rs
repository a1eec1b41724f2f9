//! # 에러 보고 전략
//!
//! 파사드가 삼킨 에러(직렬화, 연결)를 어디로 보낼지 결정합니다.
//! 기본 구현은 연산 컨텍스트와 함께 error 레벨로 로그를 남깁니다.
//!
//! 호출자는 반환값만으로 "없음"과 "실패"를 구분할 수 없으므로,
//! 구분이 필요한 경우 별도의 [`ErrorSink`]를 주입해 실패를 관찰합니다.

use log::error;

use crate::core::errors::DataStoreError;
use crate::core::registry::EntityMetadata;

/// 실패한 연산의 컨텍스트
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OperationContext {
    /// 파사드 메서드 이름 (예: `load_structured`)
    pub operation: &'static str,
    pub collection_name: &'static str,
    pub key: String,
    pub type_name: &'static str,
}

impl OperationContext {
    pub fn new(operation: &'static str, metadata: &EntityMetadata, key: &str) -> Self {
        Self {
            operation,
            collection_name: metadata.collection_name,
            key: key.to_string(),
            type_name: metadata.type_name,
        }
    }
}

/// 삼켜진 에러를 받는 싱크
pub trait ErrorSink: Send + Sync {
    fn report(&self, context: &OperationContext, error: &DataStoreError);
}

/// 로그로 보고하는 기본 싱크
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingErrorSink;

impl ErrorSink for LoggingErrorSink {
    fn report(&self, context: &OperationContext, error: &DataStoreError) {
        error!(
            "[DataStorage] {} 실패 ({}): collection={}, key={}, type={}: {}",
            context.operation,
            error.kind(),
            context.collection_name,
            context.key,
            context.type_name,
            error
        );
    }
}
