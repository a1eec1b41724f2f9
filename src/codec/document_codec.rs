//! # Document Codec
//!
//! 엔티티 ↔ MongoDB 문서 변환을 담당합니다.
//!
//! ## 저장 경로 (엔티티 → 문서)
//!
//! ```text
//! 1. 메타데이터 해석 (컬렉션, 키 필드)
//! 2. 키 값 확인 (null → ConfigurationError)
//! 3. serde_json 으로 필드/값 페이로드 생성 (최상위 null 필드 제외, 날짜는 ISO 문자열)
//! 4. 키 필드를 이름으로 제거 (페이로드에 없으면 ConfigurationError)
//! 5. { _id: key, ...payload } 형태로 평탄하게 병합
//! ```
//!
//! ## 로드 경로 (문서 → 엔티티)
//!
//! ```text
//! 1. 문서 복사 후 _id 제거, 키 필드 이름으로 재삽입
//! 2. 날짜를 ISO-8601 문자열로 바꾼 중간 JSON 문자열 생성
//! 3. 중간 문자열을 대상 타입으로 디코딩 (실패 → SerializationError + 페이로드 일부)
//! ```
//!
//! 바이너리 엔티티는 필드 재배치 없이 `{ _id: key, data: Binary }` 형태로 저장됩니다.

use std::io::{Cursor, Read};

use log::{debug, warn};
use mongodb::bson::spec::BinarySubtype;
use mongodb::bson::{Binary, Bson, Document};
use serde_json::{Map, Value};

use crate::codec::json_bridge::document_to_json;
use crate::core::errors::{DataStoreError, DataStoreResult};
use crate::core::registry::{EntityMetadata, MetadataResolver};
use crate::domain::entities::{DataCollection, StorableBinaryData, StorableStructuredData};
use crate::utils::string_utils::truncate_for_log;

/// 저장 문서의 식별자 필드 이름
pub const ID_FIELD: &str = "_id";

/// 바이너리 페이로드 필드 이름
pub const BINARY_DATA_FIELD: &str = "data";

/// 진단 로그에 남길 페이로드 최대 문자 수 기본값
pub const DEFAULT_DIAGNOSTIC_LIMIT: usize = 500;

/// 코덱 인코딩 규칙
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecOptions {
    /// null 값을 가진 필드를 저장하지 않음
    pub omit_null_fields: bool,
    /// 디코딩 실패 시 에러 메시지에 포함할 페이로드 문자 수
    pub diagnostic_limit: usize,
}

impl Default for CodecOptions {
    fn default() -> Self {
        Self {
            omit_null_fields: true,
            diagnostic_limit: DEFAULT_DIAGNOSTIC_LIMIT,
        }
    }
}

/// 인코딩이 끝난 저장 단위
#[derive(Debug, Clone, PartialEq)]
pub struct EncodedDocument {
    pub collection_name: &'static str,
    pub key: String,
    pub document: Document,
}

/// 엔티티 ↔ 문서 코덱
#[derive(Debug, Clone, Default)]
pub struct DocumentCodec {
    options: CodecOptions,
}

impl DocumentCodec {
    pub fn new(options: CodecOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &CodecOptions {
        &self.options
    }

    /// 정형 엔티티를 저장 문서로 변환합니다.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError` - 메타데이터 오류, 키 값이 null/빈 문자열, 또는 선언한 키 필드가 직렬화 결과에 없음
    /// * `SerializationError` - 엔티티가 객체 형태로 직렬화되지 않거나 값 변환 실패
    pub fn encode_structured<T: StorableStructuredData>(&self, data: &T) -> DataStoreResult<EncodedDocument> {
        let metadata = MetadataResolver::resolve::<T>()?;
        let key = require_key(&metadata, data)?;

        let mut fields = match serde_json::to_value(data)? {
            Value::Object(fields) => fields,
            other => {
                return Err(DataStoreError::SerializationError(format!(
                    "{} did not serialize to an object (got {})",
                    metadata.type_name,
                    json_kind(&other)
                )));
            }
        };

        if self.options.omit_null_fields {
            strip_null_fields(&mut fields);
        }

        // 키 값은 _id 에만 보관
        if fields.remove(metadata.key_field).is_none() {
            return Err(DataStoreError::ConfigurationError(format!(
                "key field `{}` not present in serialized payload of {}",
                metadata.key_field, metadata.type_name
            )));
        }
        if metadata.key_field != ID_FIELD && fields.remove(ID_FIELD).is_some() {
            warn!(
                "[DataStorage] `_id` 필드는 식별자 전용이므로 제외합니다: collection={}, type={}",
                metadata.collection_name, metadata.type_name
            );
        }

        let payload = mongodb::bson::to_document(&fields)?;
        let mut document = Document::new();
        document.insert(ID_FIELD, key.as_str());
        for (field, value) in payload {
            document.insert(field, value);
        }

        Ok(EncodedDocument {
            collection_name: metadata.collection_name,
            key,
            document,
        })
    }

    /// 저장 문서를 엔티티 디코딩용 중간 JSON 문자열로 변환합니다.
    ///
    /// `_id`를 제거하고 그 자리를 키 필드 이름으로 채운 뒤,
    /// 날짜를 ISO-8601 문자열로 표현한 JSON 을 반환합니다.
    pub fn to_intermediate_json(&self, metadata: &EntityMetadata, mut document: Document, key: &str) -> DataStoreResult<String> {
        document.remove(ID_FIELD);
        document.insert(metadata.key_field, key);

        Ok(serde_json::to_string(&document_to_json(&document))?)
    }

    /// 저장 문서를 정형 엔티티로 되돌립니다.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError` - 메타데이터 오류
    /// * `SerializationError` - 형식 또는 타입 불일치 (페이로드 앞부분 포함)
    pub fn decode_structured<T: StorableStructuredData>(&self, document: Document, key: &str) -> DataStoreResult<T> {
        let metadata = MetadataResolver::resolve::<T>()?;
        let json = self.to_intermediate_json(&metadata, document, key)?;
        let excerpt = truncate_for_log(&json, self.options.diagnostic_limit);

        debug!(
            "[DataStorage] 중간 JSON 생성: collection={}, key={}, json={}",
            metadata.collection_name, key, excerpt
        );

        serde_json::from_str::<T>(&json).map_err(|e| {
            DataStoreError::SerializationError(format!(
                "failed to decode {} (collection={}, key={}): {}; payload: {}",
                metadata.type_name, metadata.collection_name, key, e, excerpt
            ))
        })
    }

    /// 바이너리 엔티티를 저장 문서로 변환합니다.
    ///
    /// 스트림 전체를 메모리로 읽어 `data` 필드에 담습니다.
    pub fn encode_binary<T: StorableBinaryData>(&self, data: &T) -> DataStoreResult<EncodedDocument> {
        let metadata = MetadataResolver::resolve::<T>()?;
        let key = require_key(&metadata, data)?;

        let mut bytes = Vec::with_capacity(usize::try_from(data.size_in_bytes()).unwrap_or(0));
        data.open().read_to_end(&mut bytes)?;

        let mut document = Document::new();
        document.insert(ID_FIELD, key.as_str());
        document.insert(BINARY_DATA_FIELD, Binary { subtype: BinarySubtype::Generic, bytes });

        Ok(EncodedDocument {
            collection_name: metadata.collection_name,
            key,
            document,
        })
    }

    /// 저장 문서를 바이너리 엔티티로 되돌립니다.
    ///
    /// `Default`로 생성한 값에 `load`로 바이트를 채우고 키를 복원합니다.
    pub fn decode_binary<T: StorableBinaryData>(&self, document: &Document, key: &str) -> DataStoreResult<T> {
        let metadata = MetadataResolver::resolve::<T>()?;

        let bytes = match document.get(BINARY_DATA_FIELD) {
            Some(Bson::Binary(binary)) => binary.bytes.clone(),
            Some(Bson::Array(items)) => bytes_from_array(items).ok_or_else(|| {
                DataStoreError::SerializationError(format!(
                    "`{}` of {} (key={}) is an array but not a byte array",
                    BINARY_DATA_FIELD, metadata.collection_name, key
                ))
            })?,
            Some(other) => {
                return Err(DataStoreError::SerializationError(format!(
                    "`{}` of {} (key={}) holds {:?} instead of binary",
                    BINARY_DATA_FIELD,
                    metadata.collection_name,
                    key,
                    other.element_type()
                )));
            }
            None => {
                return Err(DataStoreError::SerializationError(format!(
                    "document {} in {} has no `{}` field",
                    key, metadata.collection_name, BINARY_DATA_FIELD
                )));
            }
        };

        let mut value = T::default();
        value.load(&mut Cursor::new(bytes))?;
        value.restore_key(key);
        Ok(value)
    }
}

/// 저장 시점의 키 값을 확인합니다.
fn require_key<T: DataCollection>(metadata: &EntityMetadata, data: &T) -> DataStoreResult<String> {
    match data.data_key() {
        Some(key) if !key.is_empty() => Ok(key.to_string()),
        Some(_) => Err(DataStoreError::ConfigurationError(format!(
            "Key field `{}` of {} is empty",
            metadata.key_field, metadata.type_name
        ))),
        None => Err(DataStoreError::ConfigurationError(format!(
            "Key field `{}` of {} is null",
            metadata.key_field, metadata.type_name
        ))),
    }
}

/// 최상위 null 필드만 제거합니다. 중첩 객체와 맵 안의 null 값은 그대로 둡니다.
fn strip_null_fields(fields: &mut Map<String, Value>) {
    fields.retain(|_, value| !value.is_null());
}

fn bytes_from_array(items: &[Bson]) -> Option<Vec<u8>> {
    items
        .iter()
        .map(|item| match item {
            Bson::Int32(n) => u8::try_from(*n).ok(),
            Bson::Int64(n) => u8::try_from(*n).ok(),
            _ => None,
        })
        .collect()
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_collection;
    use crate::domain::entities::world::WorldBinaryData;
    use chrono::{DateTime, Utc};
    use mongodb::bson::{DateTime as BsonDateTime, doc};
    use serde::{Deserialize, Serialize};
    use std::collections::HashMap;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Planet {
        planet_id: Option<String>,
        display_name: String,
        created_at: DateTime<Utc>,
        nickname: Option<String>,
        citizens: Vec<String>,
    }

    data_collection!(Planet, name = "codec_planets", key = planet_id);

    #[derive(Debug, Serialize, Deserialize)]
    struct Shadowing {
        id: String,
        #[serde(rename = "_id")]
        legacy: String,
    }

    data_collection!(Shadowing, name = "codec_shadowing", key = id);

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    struct MisdeclaredKey {
        player_id: String,
        display_name: String,
    }

    // serde 는 `playerId`로 쓰지만 선언은 `player_id`
    data_collection!(MisdeclaredKey, name = "codec_misdeclared", key = player_id);

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct Scoreboard {
        board_id: String,
        scores: HashMap<String, Option<i64>>,
        owner: Option<String>,
    }

    data_collection!(Scoreboard, name = "codec_scoreboards", key = board_id);

    #[derive(Debug, Serialize, Deserialize)]
    struct Scalar(String);

    impl DataCollection for Scalar {
        const COLLECTION_NAME: &'static str = "codec_scalars";
        const KEY_FIELD: &'static str = "value";

        fn data_key(&self) -> Option<&str> {
            Some(&self.0)
        }
    }

    fn planet(created_at: DateTime<Utc>) -> Planet {
        Planet {
            planet_id: Some("bbc5b1a1".to_string()),
            display_name: "Folkintijpyb".to_string(),
            created_at,
            nickname: None,
            citizens: vec!["3f2d2205".to_string()],
        }
    }

    #[test]
    fn test_encode_moves_key_into_id() {
        let codec = DocumentCodec::default();

        let encoded = codec.encode_structured(&planet(Utc::now())).unwrap();

        assert_eq!(encoded.collection_name, "codec_planets");
        assert_eq!(encoded.key, "bbc5b1a1");
        assert_eq!(encoded.document.get_str(ID_FIELD).unwrap(), "bbc5b1a1");
        assert!(!encoded.document.contains_key("planet_id"));
        assert_eq!(encoded.document.get_str("display_name").unwrap(), "Folkintijpyb");
        assert_eq!(encoded.document.keys().next().map(String::as_str), Some(ID_FIELD));
    }

    #[test]
    fn test_encode_omits_null_fields_and_writes_iso_dates() {
        let codec = DocumentCodec::default();
        let created_at = "2024-03-01T12:30:45.123Z".parse::<DateTime<Utc>>().unwrap();

        let encoded = codec.encode_structured(&planet(created_at)).unwrap();

        assert!(!encoded.document.contains_key("nickname"));
        let stored_date = encoded.document.get_str("created_at").unwrap();
        assert_eq!(stored_date.parse::<DateTime<Utc>>().unwrap(), created_at);
    }

    #[test]
    fn test_encode_keeps_nulls_when_configured() {
        let codec = DocumentCodec::new(CodecOptions { omit_null_fields: false, ..CodecOptions::default() });

        let encoded = codec.encode_structured(&planet(Utc::now())).unwrap();

        assert_eq!(encoded.document.get("nickname"), Some(&Bson::Null));
    }

    #[test]
    fn test_encode_keeps_nested_null_map_values() {
        let codec = DocumentCodec::default();
        let board = Scoreboard {
            board_id: "b-1".to_string(),
            scores: HashMap::from([("a".to_string(), None), ("b".to_string(), Some(3))]),
            owner: None,
        };

        let encoded = codec.encode_structured(&board).unwrap();
        let scores = encoded.document.get_document("scores").unwrap();
        assert_eq!(scores.get("a"), Some(&Bson::Null));
        assert!(!encoded.document.contains_key("owner"));

        let decoded: Scoreboard = codec.decode_structured(encoded.document, "b-1").unwrap();
        assert_eq!(decoded, board);
    }

    #[test]
    fn test_encode_key_field_missing_from_payload_is_configuration_error() {
        let codec = DocumentCodec::default();
        let value = MisdeclaredKey { player_id: "p".to_string(), display_name: "n".to_string() };

        let error = codec.encode_structured(&value).unwrap_err();

        match error {
            DataStoreError::ConfigurationError(message) => {
                assert!(message.contains("`player_id`"));
                assert!(message.contains("MisdeclaredKey"));
            }
            other => panic!("Expected ConfigurationError, got {:?}", other),
        }
    }

    #[test]
    fn test_encode_null_key_is_configuration_error() {
        let codec = DocumentCodec::default();
        let mut value = planet(Utc::now());
        value.planet_id = None;

        let error = codec.encode_structured(&value).unwrap_err();
        assert!(error.is_configuration());

        value.planet_id = Some(String::new());
        assert!(codec.encode_structured(&value).unwrap_err().is_configuration());
    }

    #[test]
    fn test_encode_never_lets_payload_override_identity() {
        let codec = DocumentCodec::default();
        let value = Shadowing { id: "real".to_string(), legacy: "stale".to_string() };

        let encoded = codec.encode_structured(&value).unwrap();

        assert_eq!(encoded.document.get_str(ID_FIELD).unwrap(), "real");
        assert_eq!(encoded.document.len(), 1);
    }

    #[test]
    fn test_encode_rejects_non_object_payload() {
        let codec = DocumentCodec::default();

        let error = codec.encode_structured(&Scalar("k".to_string())).unwrap_err();

        assert!(matches!(error, DataStoreError::SerializationError(_)));
    }

    #[test]
    fn test_decode_remaps_id_and_native_dates() {
        let codec = DocumentCodec::default();
        let document = doc! {
            "_id": "test-entity-123",
            "display_name": "Test Entity",
            "created_at": BsonDateTime::from_millis(1_709_296_245_123),
            "citizens": [],
        };

        let decoded: Planet = codec.decode_structured(document, "test-entity-123").unwrap();

        assert_eq!(decoded.planet_id.as_deref(), Some("test-entity-123"));
        assert_eq!(decoded.display_name, "Test Entity");
        assert_eq!(decoded.created_at.timestamp_millis(), 1_709_296_245_123);
        assert!(decoded.nickname.is_none());
    }

    #[test]
    fn test_intermediate_json_uses_key_field_not_id() {
        let codec = DocumentCodec::default();
        let metadata = MetadataResolver::resolve::<Planet>().unwrap();
        let document = doc! { "_id": "p-9", "created_at": BsonDateTime::from_millis(0) };

        let json = codec.to_intermediate_json(&metadata, document, "p-9").unwrap();

        assert!(json.contains("\"planet_id\":\"p-9\""));
        assert!(json.contains("\"created_at\":\"1970-01-01T00:00:00.000Z\""));
        assert!(!json.contains("\"_id\""));
    }

    #[test]
    fn test_decode_mismatch_reports_bounded_excerpt() {
        let codec = DocumentCodec::new(CodecOptions { diagnostic_limit: 40, ..CodecOptions::default() });
        let document = doc! {
            "_id": "broken",
            "display_name": 42_i32,
            "created_at": "not a date",
            "padding": "x".repeat(400),
        };

        let error = codec.decode_structured::<Planet>(document, "broken").unwrap_err();

        match error {
            DataStoreError::SerializationError(message) => {
                assert!(message.contains("key=broken"));
                assert!(!message.contains(&"x".repeat(100)));
            }
            other => panic!("Expected SerializationError, got {:?}", other),
        }
    }

    #[test]
    fn test_binary_round_trip_restores_key() {
        let codec = DocumentCodec::default();
        let world = WorldBinaryData::new("maps", "arena", vec![0x50, 0x4b, 0x03, 0x04]);

        let encoded = codec.encode_binary(&world).unwrap();
        assert_eq!(encoded.document.get_str(ID_FIELD).unwrap(), "maps:arena");
        assert!(matches!(encoded.document.get(BINARY_DATA_FIELD), Some(Bson::Binary(_))));

        let decoded: WorldBinaryData = codec.decode_binary(&encoded.document, "maps:arena").unwrap();
        assert_eq!(decoded, world);
    }

    #[test]
    fn test_binary_accepts_integer_arrays() {
        let codec = DocumentCodec::default();
        let document = doc! { "_id": "a:b", "data": [1_i32, 2_i32, 255_i32] };

        let decoded: WorldBinaryData = codec.decode_binary(&document, "a:b").unwrap();

        assert_eq!(decoded.data, vec![1, 2, 255]);
    }

    #[test]
    fn test_binary_without_payload_is_serialization_error() {
        let codec = DocumentCodec::default();

        let missing = codec.decode_binary::<WorldBinaryData>(&doc! { "_id": "a:b" }, "a:b");
        let wrong = codec.decode_binary::<WorldBinaryData>(&doc! { "_id": "a:b", "data": "text" }, "a:b");

        assert!(matches!(missing, Err(DataStoreError::SerializationError(_))));
        assert!(matches!(wrong, Err(DataStoreError::SerializationError(_))));
    }
}
