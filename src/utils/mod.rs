//! 공통 유틸리티 함수 모듈
//!
//! # Modules
//!
//! - [`string_utils`] - 로그용 문자열 절단, 타입 이름 정리

pub mod string_utils;
