//! 데이터 저장소 설정 관리 모듈
//!
//! 연결 문자열, 데이터베이스 이름, 워커 풀 크기 등 저장 계층 설정을 관리합니다.
//! 모든 값은 시작 시점에 환경 변수에서 한 번 읽습니다.

use std::env;

/// 기본 MongoDB 연결 문자열
pub const DEFAULT_CONNECTION_STRING: &str = "mongodb://mongo:27017";

/// 기본 데이터베이스 이름
pub const DEFAULT_DATABASE_NAME: &str = "mineplex";

/// 비동기 작업 동시 실행 상한 기본값
pub const DEFAULT_WORKER_POOL_SIZE: usize = 16;

/// 워커 풀 크기 허용 범위
const WORKER_POOL_RANGE: std::ops::RangeInclusive<usize> = 1..=256;

/// 진단 로그 페이로드 길이 기본값
pub const DEFAULT_DIAGNOSTIC_LIMIT: usize = 500;

/// 저장소 백엔드 종류
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackendKind {
    /// MongoDB 서버
    Mongo,
    /// 프로세스 메모리 (로컬 실행, 테스트)
    Memory,
}

impl StorageBackendKind {
    /// 문자열에서 백엔드 종류를 결정합니다.
    ///
    /// 알 수 없는 값은 `Mongo`로 취급합니다.
    pub fn from_str(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "memory" | "in-memory" | "mem" => StorageBackendKind::Memory,
            _ => StorageBackendKind::Mongo,
        }
    }
}

/// 저장 계층 설정
#[derive(Debug, Clone, PartialEq)]
pub struct DataStoreConfig {
    pub backend: StorageBackendKind,
    pub connection_string: String,
    pub database_name: String,
    pub worker_pool_size: usize,
    pub diagnostic_limit: usize,
}

impl Default for DataStoreConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackendKind::Mongo,
            connection_string: DEFAULT_CONNECTION_STRING.to_string(),
            database_name: DEFAULT_DATABASE_NAME.to_string(),
            worker_pool_size: DEFAULT_WORKER_POOL_SIZE,
            diagnostic_limit: DEFAULT_DIAGNOSTIC_LIMIT,
        }
    }
}

impl DataStoreConfig {
    /// 환경 변수에서 설정을 읽습니다.
    ///
    /// # Environment Variables
    ///
    /// - `DATASTORE_BACKEND`: `mongo` | `memory` (기본값: mongo)
    /// - `DATASTORE_CONNECTION_STRING` 또는 `MONGODB_URI` (기본값: "mongodb://mongo:27017")
    /// - `DATASTORE_DATABASE` 또는 `DATABASE_NAME` (기본값: "mineplex")
    /// - `DATASTORE_WORKER_POOL_SIZE`: 1-256 (기본값: 16)
    /// - `DATASTORE_DIAGNOSTIC_LIMIT`: 진단 로그 문자 수 (기본값: 500)
    pub fn from_env() -> Self {
        let backend = env::var("DATASTORE_BACKEND")
            .map(|value| StorageBackendKind::from_str(&value))
            .unwrap_or(StorageBackendKind::Mongo);

        let connection_string = env::var("DATASTORE_CONNECTION_STRING")
            .or_else(|_| env::var("MONGODB_URI"))
            .unwrap_or_else(|_| DEFAULT_CONNECTION_STRING.to_string());

        let database_name = env::var("DATASTORE_DATABASE")
            .or_else(|_| env::var("DATABASE_NAME"))
            .unwrap_or_else(|_| DEFAULT_DATABASE_NAME.to_string());

        Self {
            backend,
            connection_string,
            database_name,
            worker_pool_size: parse_worker_pool_size(env::var("DATASTORE_WORKER_POOL_SIZE").ok().as_deref()),
            diagnostic_limit: parse_diagnostic_limit(env::var("DATASTORE_DIAGNOSTIC_LIMIT").ok().as_deref()),
        }
    }
}

/// 워커 풀 크기를 해석합니다. 범위를 벗어나거나 숫자가 아니면 기본값을 사용합니다.
pub fn parse_worker_pool_size(value: Option<&str>) -> usize {
    value
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|size| WORKER_POOL_RANGE.contains(size))
        .unwrap_or(DEFAULT_WORKER_POOL_SIZE)
}

/// 진단 로그 길이를 해석합니다. 0 또는 잘못된 값이면 기본값을 사용합니다.
pub fn parse_diagnostic_limit(value: Option<&str>) -> usize {
    value
        .and_then(|raw| raw.trim().parse::<usize>().ok())
        .filter(|limit| *limit > 0)
        .unwrap_or(DEFAULT_DIAGNOSTIC_LIMIT)
}
