//! # Configuration Module
//!
//! 저장 계층의 설정을 환경 변수 기반으로 중앙에서 관리합니다.
//!
//! ## 모듈 구성
//!
//! - [`data_config`] - 백엔드 종류, 연결 문자열, 데이터베이스, 워커 풀 설정
//!
//! ## 환경 변수 설정 가이드
//!
//! ```bash
//! export DATASTORE_BACKEND="mongo"                       # mongo | memory
//! export DATASTORE_CONNECTION_STRING="mongodb://mongo:27017"
//! export DATASTORE_DATABASE="mineplex"
//! export DATASTORE_WORKER_POOL_SIZE="16"                 # 1-256
//! export DATASTORE_DIAGNOSTIC_LIMIT="500"
//! ```
//!
//! `PROFILE` 값에 따라 `.env.dev` / `.env.prod` 파일이 먼저 로드됩니다 (바이너리 참고).

pub mod data_config;

pub use data_config::*;
