//! Entity Contract Module
//!
//! 저장 가능한 엔티티가 구현해야 하는 계약을 정의합니다.
//! 모든 엔티티는 하나의 컬렉션 이름과 하나의 키 필드를 가지며,
//! 정형(JSON 유사) 엔티티와 바이너리 엔티티 두 가지 형태로 나뉩니다.
//!
//! # 주요 구성 요소
//!
//! ### [`DataCollection`]
//! - **컬렉션 이름**: 타입당 하나, 필수
//! - **키 필드**: 타입당 하나, 저장 시점에 값이 반드시 존재해야 함
//!
//! ### [`StorableStructuredData`]
//! - serde 직렬화 가능한 모든 엔티티
//! - 키 필드는 저장 시 페이로드에서 제거되고 `_id`에만 남음
//!
//! ### [`StorableBinaryData`]
//! - 바이트 스트림을 열고(`open`), 다시 채우고(`load`), 크기를 보고하는 엔티티
//! - 로드 경로에서 `Default`로 생성한 뒤 `load`로 채움
//!
//! # 사용 예제
//!
//! ```rust,ignore
//! use serde::{Deserialize, Serialize};
//! use entity_datastore::data_collection;
//!
//! #[derive(Debug, Clone, Serialize, Deserialize)]
//! #[serde(rename_all = "camelCase")]
//! pub struct PlayerProfile {
//!     pub player_id: String,
//!     pub nickname: String,
//! }
//!
//! data_collection!(PlayerProfile, name = "player_profiles", key = player_id as "playerId");
//! ```

pub mod level;
pub mod stats;
pub mod world;

use std::io::Read;

use serde::{Serialize, de::DeserializeOwned};

/// 컬렉션 이름과 키 필드를 선언하는 타입 수준 메타데이터
///
/// 직접 구현할 수도 있지만 보통은 [`data_collection!`](crate::data_collection) 매크로를
/// 사용합니다. 매크로는 시작 시점 검증을 위한 레지스트리 등록까지 함께 수행합니다.
pub trait DataCollection: Send + Sync + 'static {
    /// 문서가 저장될 컬렉션 이름
    const COLLECTION_NAME: &'static str;

    /// 키 필드의 페이로드상 이름 (serde 직렬화 결과 기준)
    const KEY_FIELD: &'static str;

    /// 키 필드의 현재 값. `None`은 null 키를 의미합니다.
    fn data_key(&self) -> Option<&str>;
}

/// JSON 유사 문서로 저장되는 엔티티
pub trait StorableStructuredData: DataCollection + Serialize + DeserializeOwned {}

impl<T> StorableStructuredData for T where T: DataCollection + Serialize + DeserializeOwned {}

/// 바이트 스트림으로 저장되는 엔티티
pub trait StorableBinaryData: DataCollection + Default {
    /// 저장할 바이트를 읽을 수 있는 스트림을 엽니다.
    fn open(&self) -> Box<dyn Read + '_>;

    /// 스트림의 내용으로 자신을 다시 채웁니다.
    fn load(&mut self, reader: &mut dyn Read) -> std::io::Result<()>;

    /// 현재 페이로드 크기
    fn size_in_bytes(&self) -> u64;

    /// 로드 직후 `_id`에서 복원한 키를 전달받습니다.
    fn restore_key(&mut self, _key: &str) {}
}

/// 키 필드로 쓸 수 있는 값 타입
pub trait DataKeyValue {
    fn as_data_key(&self) -> Option<&str>;
}

impl DataKeyValue for String {
    fn as_data_key(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl DataKeyValue for Option<String> {
    fn as_data_key(&self) -> Option<&str> {
        self.as_deref()
    }
}

/// 엔티티 타입에 컬렉션 이름과 키 필드를 선언합니다.
///
/// `key = field`는 필드 이름을 그대로 페이로드 이름으로 사용하고,
/// `key = field as "wireName"`은 serde가 필드 이름을 바꾸는 경우에 사용합니다.
/// 키 필드 타입은 `String` 또는 `Option<String>`이어야 합니다.
#[macro_export]
macro_rules! data_collection {
    ($ty:ty, name = $collection:literal, key = $field:ident) => {
        $crate::data_collection!($ty, name = $collection, key = $field as stringify!($field));
    };
    ($ty:ty, name = $collection:literal, key = $field:ident as $wire:expr) => {
        impl $crate::domain::entities::DataCollection for $ty {
            const COLLECTION_NAME: &'static str = $collection;
            const KEY_FIELD: &'static str = $wire;

            fn data_key(&self) -> ::std::option::Option<&str> {
                $crate::domain::entities::DataKeyValue::as_data_key(&self.$field)
            }
        }

        $crate::inventory::submit! {
            $crate::core::registry::EntityRegistration {
                type_name: stringify!($ty),
                collection_name: $collection,
                key_field: $wire,
            }
        }
    };
}
