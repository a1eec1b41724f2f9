//! 문서 코덱 모듈
//!
//! 엔티티와 MongoDB 문서 사이의 변환 규칙을 모읍니다.
//!
//! # Modules
//!
//! - [`document_codec`] - 키 필드 ↔ `_id` 재배치, 정형/바이너리 인코딩
//! - [`json_bridge`] - 저장 값을 ISO-8601 날짜 기반 JSON 으로 변환

pub mod document_codec;
pub mod json_bridge;

pub use document_codec::{BINARY_DATA_FIELD, CodecOptions, DocumentCodec, EncodedDocument, ID_FIELD};
