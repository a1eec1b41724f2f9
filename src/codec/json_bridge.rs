//! # 저장 값 → JSON 변환
//!
//! 로드 경로에서 MongoDB 문서를 엔티티로 되돌리기 전에 거치는 중간 JSON 표현을 만듭니다.
//! 드라이버의 시간 타입과 무관하게 날짜는 항상 ISO-8601 문자열로 출력되며,
//! 이 문자열 형식이 엔티티 디코더와의 호환 경계입니다.
//!
//! | BSON | JSON |
//! |------|------|
//! | `DateTime` | `"2024-03-01T12:30:45.123Z"` (밀리초, UTC) |
//! | `Timestamp` | 초 단위 시각의 ISO-8601 문자열 |
//! | `ObjectId` | 16진수 문자열 |
//! | `Binary` | base64 문자열 |
//! | `Decimal128` | 10진수 문자열 |
//! | `Double` (NaN, ∞) | `null` |
//! | `MinKey`, `MaxKey`, `Undefined`, `DbPointer` | `null` |

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chrono::{SecondsFormat, TimeZone, Utc};
use mongodb::bson::{Bson, Document};
use serde_json::{Map, Number, Value};

/// 에포크 밀리초를 ISO-8601 UTC 문자열로 변환합니다.
///
/// 표현 범위를 벗어난 값은 `None`을 반환합니다.
pub fn format_instant_millis(millis: i64) -> Option<String> {
    Utc.timestamp_millis_opt(millis)
        .single()
        .map(|instant| instant.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// 문서 전체를 JSON 객체로 변환합니다.
pub fn document_to_json(document: &Document) -> Value {
    let mut object = Map::with_capacity(document.len());
    for (field, value) in document {
        object.insert(field.clone(), bson_to_json(value));
    }
    Value::Object(object)
}

/// 단일 BSON 값을 JSON 값으로 변환합니다.
pub fn bson_to_json(value: &Bson) -> Value {
    match value {
        Bson::Double(number) => Number::from_f64(*number)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        Bson::String(text) => Value::String(text.clone()),
        Bson::Array(items) => Value::Array(items.iter().map(bson_to_json).collect()),
        Bson::Document(nested) => document_to_json(nested),
        Bson::Boolean(flag) => Value::Bool(*flag),
        Bson::Null => Value::Null,
        Bson::Int32(number) => Value::from(*number),
        Bson::Int64(number) => Value::from(*number),
        Bson::DateTime(date_time) => {
            let millis = date_time.timestamp_millis();
            format_instant_millis(millis)
                .map(Value::String)
                .unwrap_or_else(|| Value::from(millis))
        }
        Bson::Timestamp(timestamp) => format_instant_millis(i64::from(timestamp.time) * 1000)
            .map(Value::String)
            .unwrap_or(Value::Null),
        Bson::ObjectId(object_id) => Value::String(object_id.to_hex()),
        Bson::Binary(binary) => Value::String(STANDARD.encode(&binary.bytes)),
        Bson::Decimal128(decimal) => Value::String(decimal.to_string()),
        Bson::RegularExpression(regex) => {
            Value::String(format!("/{}/{}", regex.pattern, regex.options))
        }
        Bson::JavaScriptCode(code) => Value::String(code.clone()),
        Bson::JavaScriptCodeWithScope(code) => Value::String(code.code.clone()),
        Bson::Symbol(symbol) => Value::String(symbol.clone()),
        _ => Value::Null,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mongodb::bson::spec::BinarySubtype;
    use mongodb::bson::{Binary, DateTime, doc, oid::ObjectId};

    #[test]
    fn test_date_time_becomes_iso_millis_string() {
        // 2024-03-01T12:30:45.123Z
        let document = doc! { "joined": DateTime::from_millis(1_709_296_245_123) };

        let json = document_to_json(&document);

        assert_eq!(json["joined"], Value::String("2024-03-01T12:30:45.123Z".to_string()));
    }

    #[test]
    fn test_epoch_formats_with_zero_millis() {
        assert_eq!(format_instant_millis(0).unwrap(), "1970-01-01T00:00:00.000Z");
    }

    #[test]
    fn test_nested_values_are_converted() {
        let object_id = ObjectId::new();
        let document = doc! {
            "name": "Ann",
            "level": 7_i32,
            "experience": 1_500_i64,
            "ratio": 0.5,
            "owner": object_id,
            "history": [ { "at": DateTime::from_millis(0) } ],
            "archived": Bson::Null,
        };

        let json = document_to_json(&document);

        assert_eq!(json["name"], "Ann");
        assert_eq!(json["level"], 7);
        assert_eq!(json["experience"], 1500);
        assert_eq!(json["ratio"], 0.5);
        assert_eq!(json["owner"], Value::String(object_id.to_hex()));
        assert_eq!(json["history"][0]["at"], "1970-01-01T00:00:00.000Z");
        assert!(json["archived"].is_null());
    }

    #[test]
    fn test_binary_becomes_base64() {
        let binary = Binary { subtype: BinarySubtype::Generic, bytes: vec![0, 1, 2, 253] };

        assert_eq!(bson_to_json(&Bson::Binary(binary)), Value::String("AAEC/Q==".to_string()));
    }

    #[test]
    fn test_non_finite_double_becomes_null() {
        assert!(bson_to_json(&Bson::Double(f64::NAN)).is_null());
        assert!(bson_to_json(&Bson::MaxKey).is_null());
    }
}
