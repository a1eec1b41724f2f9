//! # Entity Metadata Registry
//!
//! 엔티티 타입 → (컬렉션 이름, 키 필드) 해석을 담당합니다.
//!
//! ## 구성 요소
//!
//! ### 컴파일 타임 등록
//! - [`data_collection!`](crate::data_collection) 매크로가 [`EntityRegistration`]을 생성
//! - `inventory::collect!`로 전역 레지스트리에 수집
//! - 시작 시점에 [`MetadataResolver::validate_registrations`]로 일괄 검증
//!
//! ### 런타임 캐시
//! - 타입별 해석 결과를 `TypeId` 키로 프로세스 수명 동안 보관
//! - 첫 삽입이 승리하며 이후 모든 호출자는 같은 `Arc`를 관찰
//! - 해석 실패는 캐시하지 않음 (설정 오류는 매번 동일하게 실패)
//!
//! ## 동작 흐름
//!
//! ```text
//! resolve::<T>()
//!    ├─ 읽기 잠금으로 캐시 조회 → 있으면 반환
//!    ├─ 잠금 밖에서 이름 검증 (순수 함수)
//!    └─ 쓰기 잠금으로 entry().or_insert() → 먼저 들어간 값 반환
//! ```

use std::any::{TypeId, type_name};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info, warn};
use once_cell::sync::Lazy;

use crate::core::errors::{DataStoreError, DataStoreResult};
use crate::domain::entities::DataCollection;
use crate::utils::string_utils::short_type_name;

/// 엔티티 등록 정보
///
/// `data_collection!` 매크로에 의해 자동 생성되는 메타데이터입니다.
pub struct EntityRegistration {
    /// 선언된 타입 이름 (로그용)
    pub type_name: &'static str,
    /// 컬렉션 이름
    pub collection_name: &'static str,
    /// 키 필드의 페이로드상 이름
    pub key_field: &'static str,
}

inventory::collect!(EntityRegistration);

/// 해석이 끝난 엔티티 메타데이터
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityMetadata {
    pub type_name: &'static str,
    pub collection_name: &'static str,
    pub key_field: &'static str,
}

/// 타입별 메타데이터 캐시
static METADATA_CACHE: Lazy<RwLock<HashMap<TypeId, Arc<EntityMetadata>>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

/// 엔티티 메타데이터 해석기
pub struct MetadataResolver;

impl MetadataResolver {
    /// 타입 `T`의 메타데이터를 해석합니다.
    ///
    /// 최초 호출 시 이름을 검증하고 캐시에 저장하며, 이후에는 캐시된 값을 반환합니다.
    /// 동시에 여러 스레드가 같은 타입을 해석해도 캐시에는 하나의 값만 남습니다.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError` - 컬렉션 이름이나 키 필드가 규칙에 어긋나는 경우
    pub fn resolve<T: DataCollection>() -> DataStoreResult<Arc<EntityMetadata>> {
        let type_id = TypeId::of::<T>();

        if let Some(found) = METADATA_CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&type_id)
        {
            return Ok(Arc::clone(found));
        }

        let metadata = Arc::new(Self::describe::<T>()?);

        let mut cache = METADATA_CACHE.write().unwrap_or_else(PoisonError::into_inner);
        let resolved = cache.entry(type_id).or_insert(metadata);
        debug!(
            "[Metadata] 해석 완료: type={}, collection={}, key_field={}",
            resolved.type_name, resolved.collection_name, resolved.key_field
        );
        Ok(Arc::clone(resolved))
    }

    /// 타입 `T`의 컬렉션 이름
    pub fn resolve_collection_name<T: DataCollection>() -> DataStoreResult<&'static str> {
        Ok(Self::resolve::<T>()?.collection_name)
    }

    /// 타입 `T`의 키 필드 이름
    pub fn resolve_key_field<T: DataCollection>() -> DataStoreResult<&'static str> {
        Ok(Self::resolve::<T>()?.key_field)
    }

    /// 현재 캐시에 들어 있는 타입 수
    pub fn cached_count() -> usize {
        METADATA_CACHE
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// 컴파일 타임에 등록된 모든 엔티티
    pub fn registrations() -> impl Iterator<Item = &'static EntityRegistration> {
        inventory::iter::<EntityRegistration>.into_iter()
    }

    /// 등록된 모든 엔티티의 이름 규칙을 검증합니다.
    ///
    /// 서로 다른 타입이 같은 컬렉션을 공유하면 경고만 남깁니다.
    ///
    /// # Returns
    ///
    /// 검증된 등록 수
    pub fn validate_registrations() -> DataStoreResult<usize> {
        let mut owners: HashMap<&'static str, &'static str> = HashMap::new();
        let mut count = 0;

        for registration in Self::registrations() {
            validate_collection_name(registration.type_name, registration.collection_name)?;
            validate_key_field(registration.type_name, registration.key_field)?;

            if let Some(previous) = owners.insert(registration.collection_name, registration.type_name) {
                warn!(
                    "⚠️ 컬렉션 공유 감지: collection={}, types=[{}, {}]",
                    registration.collection_name, previous, registration.type_name
                );
            }
            count += 1;
        }

        info!("📋 엔티티 레지스트리 검증 완료: {}개 타입", count);
        Ok(count)
    }

    fn describe<T: DataCollection>() -> DataStoreResult<EntityMetadata> {
        let type_name = short_type_name(type_name::<T>());

        validate_collection_name(type_name, T::COLLECTION_NAME)?;
        validate_key_field(type_name, T::KEY_FIELD)?;

        Ok(EntityMetadata {
            type_name,
            collection_name: T::COLLECTION_NAME,
            key_field: T::KEY_FIELD,
        })
    }
}

/// MongoDB 컬렉션 명명 규칙 검증
fn validate_collection_name(type_name: &str, name: &str) -> DataStoreResult<()> {
    if name.trim().is_empty() {
        return Err(DataStoreError::ConfigurationError(format!(
            "{} is not a storable data type: collection name is empty",
            type_name
        )));
    }
    if name.contains('$') || name.contains('\0') {
        return Err(DataStoreError::ConfigurationError(format!(
            "{} declares invalid collection name `{}`: `$` and NUL are not allowed",
            type_name, name
        )));
    }
    if name.starts_with("system.") {
        return Err(DataStoreError::ConfigurationError(format!(
            "{} declares reserved collection name `{}`",
            type_name, name
        )));
    }
    Ok(())
}

/// 키 필드 이름 검증
fn validate_key_field(type_name: &str, field: &str) -> DataStoreResult<()> {
    if field.trim().is_empty() {
        return Err(DataStoreError::ConfigurationError(format!(
            "{} has no key field",
            type_name
        )));
    }
    if field.starts_with('$') || field.contains('.') {
        return Err(DataStoreError::ConfigurationError(format!(
            "{} declares invalid key field `{}`",
            type_name, field
        )));
    }
    Ok(())
}
