//! 엔티티 저장 파사드
//!
//! 동기/비동기 저장 연산과 에러 보고, 블로킹 작업 풀을 제공합니다.

pub mod data_storage_service;
pub mod error_sink;
pub mod worker_pool;

pub use data_storage_service::DataStorageService;
pub use error_sink::{ErrorSink, LoggingErrorSink, OperationContext};
pub use worker_pool::WorkerPool;
