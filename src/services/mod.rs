//! 저장 계층 위의 서비스 모듈
//!
//! 엔티티 저장 파사드와 이를 사용하는 도메인 서비스를 제공합니다.
//!
//! # Examples
//!
//! ```rust,ignore
//! use crate::services::{storage::DataStorageService, stats::StatsService};
//!
//! let storage = DataStorageService::in_memory();
//! let stats = StatsService::new(storage.clone());
//! ```

pub mod level;
pub mod stats;
pub mod storage;
