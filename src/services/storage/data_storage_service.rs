//! # 데이터 저장 서비스
//!
//! 엔티티 저장/조회/존재 확인/삭제를 제공하는 저장 계층의 단일 진입점입니다.
//! 정형 엔티티와 바이너리 엔티티 각각에 대해 같은 모양의 연산을 제공합니다.
//!
//! ## 에러 정책
//!
//! | 에러 | 처리 |
//! |------|------|
//! | `ConfigurationError` | 그대로 반환 (코드 결함) |
//! | `SerializationError` | [`ErrorSink`]에 보고 후 부정 결과 |
//! | `ConnectivityError` | [`ErrorSink`]에 보고 후 부정 결과 |
//!
//! 부정 결과는 연산별로 `None`, `false`, 무동작입니다. 따라서 `Err`를 받았다면
//! 항상 설정 오류이며, "없음"과 "실패"는 반환값으로 구분되지 않습니다.
//!
//! ## 비동기 연산
//!
//! `_async` 접미사 메서드는 동기 본문을 [`WorkerPool`]에서 실행합니다.
//! 호출자 스레드를 막지 않으며 결과는 동기 버전과 동일합니다.
//!
//! ```rust,ignore
//! let storage = DataStorageService::connect(&DataStoreConfig::from_env())?;
//!
//! storage.store_structured(&PlayerStatsData::empty("p-1"))?;
//! let stats = storage.load_structured_async::<PlayerStatsData>("p-1").await?;
//! ```

use std::sync::{Arc, PoisonError, RwLock};

use log::{debug, info};

use crate::codec::{CodecOptions, DocumentCodec};
use crate::config::{DataStoreConfig, StorageBackendKind};
use crate::core::errors::DataStoreResult;
use crate::core::registry::{EntityMetadata, MetadataResolver};
use crate::db::Database;
use crate::domain::entities::{StorableBinaryData, StorableStructuredData};
use crate::repositories::{DocumentRepository, InMemoryDocumentRepository, MongoDocumentRepository};
use crate::services::storage::error_sink::{ErrorSink, LoggingErrorSink, OperationContext};
use crate::services::storage::worker_pool::WorkerPool;

/// 로그에 표시할 null 키
const NULL_KEY: &str = "<null>";

/// 엔티티 저장 파사드
///
/// 복제 비용이 낮으며, 복제본은 같은 백엔드와 코덱을 공유합니다.
#[derive(Clone)]
pub struct DataStorageService {
    repository: Arc<dyn DocumentRepository>,
    codec: Arc<RwLock<Arc<DocumentCodec>>>,
    workers: WorkerPool,
    error_sink: Arc<dyn ErrorSink>,
}

impl DataStorageService {
    pub fn new(repository: Arc<dyn DocumentRepository>, workers: WorkerPool) -> Self {
        Self {
            repository,
            codec: Arc::new(RwLock::new(Arc::new(DocumentCodec::default()))),
            workers,
            error_sink: Arc::new(LoggingErrorSink),
        }
    }

    /// 메모리 백엔드를 사용하는 서비스를 만듭니다.
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryDocumentRepository::new()),
            WorkerPool::new(crate::config::DEFAULT_WORKER_POOL_SIZE),
        )
    }

    /// 설정에 따라 백엔드를 연결하고 등록된 엔티티를 검증합니다.
    ///
    /// MongoDB 백엔드는 연결 시 블로킹되므로 비동기 컨텍스트에서는
    /// `spawn_blocking` 안에서 호출해야 합니다.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError` - 등록된 엔티티 선언이 잘못된 경우
    /// * `ConnectivityError` - 초기 연결 실패 (복구 불가)
    pub fn connect(config: &DataStoreConfig) -> DataStoreResult<Self> {
        MetadataResolver::validate_registrations()?;

        let repository: Arc<dyn DocumentRepository> = match config.backend {
            StorageBackendKind::Mongo => {
                let database = Database::connect(config)?;
                Arc::new(MongoDocumentRepository::new(Arc::new(database)))
            }
            StorageBackendKind::Memory => {
                info!("🧪 메모리 저장소를 사용합니다 (프로세스 종료 시 데이터 소멸)");
                Arc::new(InMemoryDocumentRepository::new())
            }
        };

        let options = CodecOptions {
            diagnostic_limit: config.diagnostic_limit,
            ..CodecOptions::default()
        };

        Ok(Self::new(repository, WorkerPool::new(config.worker_pool_size)).with_codec_options(options))
    }

    /// 삼켜진 에러를 받을 싱크를 교체합니다.
    pub fn with_error_sink(mut self, error_sink: Arc<dyn ErrorSink>) -> Self {
        self.error_sink = error_sink;
        self
    }

    pub fn with_codec_options(self, options: CodecOptions) -> Self {
        self.reset_codec(options);
        self
    }

    /// 코덱을 새 규칙으로 교체합니다.
    ///
    /// 진행 중인 연산은 시작 시점의 코덱으로 끝까지 수행됩니다.
    pub fn reset_codec(&self, options: CodecOptions) {
        debug!("[DataStorage] 코덱 교체: {:?}", options);
        *self.codec.write().unwrap_or_else(PoisonError::into_inner) = Arc::new(DocumentCodec::new(options));
    }

    /// 코덱을 기본 규칙으로 되돌립니다.
    pub fn reset_codec_default(&self) {
        self.reset_codec(CodecOptions::default());
    }

    pub fn codec_options(&self) -> CodecOptions {
        self.codec().options().clone()
    }

    pub fn workers(&self) -> &WorkerPool {
        &self.workers
    }

    /// 백엔드 연결을 해제합니다. 이후 연산은 실패로 보고되고 부정 결과를 반환합니다.
    pub fn teardown(&self) {
        self.repository.teardown();
    }

    fn codec(&self) -> Arc<DocumentCodec> {
        Arc::clone(&self.codec.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// 설정 오류는 통과시키고 나머지 실패는 싱크에 보고한 뒤 `fallback`으로 대체합니다.
    fn settle<R>(
        &self,
        operation: &'static str,
        metadata: &EntityMetadata,
        key: &str,
        result: DataStoreResult<R>,
        fallback: R,
    ) -> DataStoreResult<R> {
        match result {
            Ok(value) => Ok(value),
            Err(e) if e.is_configuration() => Err(e),
            Err(e) => {
                self.error_sink.report(&OperationContext::new(operation, metadata, key), &e);
                Ok(fallback)
            }
        }
    }

    // ===== 정형 엔티티 =====

    /// 정형 엔티티를 저장합니다. 같은 키의 기존 문서는 교체됩니다.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError` - 엔티티 선언 오류 또는 키 값이 null/빈 문자열
    pub fn store_structured<T: StorableStructuredData>(&self, data: &T) -> DataStoreResult<()> {
        let metadata = MetadataResolver::resolve::<T>()?;

        let result = self.codec().encode_structured(data).and_then(|encoded| {
            self.repository
                .upsert(encoded.collection_name, &encoded.key, encoded.document)?;
            info!(
                "💾 [DataStorage] 저장 완료: collection={}, key={}",
                encoded.collection_name, encoded.key
            );
            Ok(())
        });

        self.settle("store_structured", &metadata, data.data_key().unwrap_or(NULL_KEY), result, ())
    }

    /// 키로 정형 엔티티를 조회합니다. 없거나 실패하면 `None`입니다.
    pub fn load_structured<T: StorableStructuredData>(&self, key: &str) -> DataStoreResult<Option<T>> {
        let metadata = MetadataResolver::resolve::<T>()?;

        let result = self
            .repository
            .find_by_id(metadata.collection_name, key)
            .and_then(|found| match found {
                Some(document) => {
                    debug!(
                        "[DataStorage] 문서 조회: collection={}, key={}, fields={}",
                        metadata.collection_name,
                        key,
                        document.len()
                    );
                    self.codec().decode_structured::<T>(document, key).map(Some)
                }
                None => {
                    debug!(
                        "[DataStorage] 문서 없음: collection={}, key={}",
                        metadata.collection_name, key
                    );
                    Ok(None)
                }
            });

        self.settle("load_structured", &metadata, key, result, None)
    }

    /// 키에 해당하는 정형 엔티티가 있는지 확인합니다.
    pub fn exists_structured<T: StorableStructuredData>(&self, key: &str) -> DataStoreResult<bool> {
        let metadata = MetadataResolver::resolve::<T>()?;
        let result = self.count(&metadata, key);
        self.settle("exists_structured", &metadata, key, result, false)
    }

    /// 키에 해당하는 정형 엔티티를 삭제합니다. 없으면 아무것도 하지 않습니다.
    pub fn delete_structured<T: StorableStructuredData>(&self, key: &str) -> DataStoreResult<()> {
        let metadata = MetadataResolver::resolve::<T>()?;
        let result = self.delete(&metadata, key);
        self.settle("delete_structured", &metadata, key, result, ())
    }

    // ===== 바이너리 엔티티 =====

    /// 바이너리 엔티티를 저장합니다.
    ///
    /// # Errors
    ///
    /// * `ConfigurationError` - 엔티티 선언 오류 또는 키 값이 null/빈 문자열
    pub fn store_binary<T: StorableBinaryData>(&self, data: &T) -> DataStoreResult<()> {
        let metadata = MetadataResolver::resolve::<T>()?;

        let result = self.codec().encode_binary(data).and_then(|encoded| {
            self.repository
                .upsert(encoded.collection_name, &encoded.key, encoded.document)?;
            info!(
                "💾 [DataStorage] 바이너리 저장 완료: collection={}, key={}, bytes={}",
                encoded.collection_name,
                encoded.key,
                data.size_in_bytes()
            );
            Ok(())
        });

        self.settle("store_binary", &metadata, data.data_key().unwrap_or(NULL_KEY), result, ())
    }

    /// 키로 바이너리 엔티티를 조회합니다.
    pub fn load_binary<T: StorableBinaryData>(&self, key: &str) -> DataStoreResult<Option<T>> {
        let metadata = MetadataResolver::resolve::<T>()?;

        let result = self
            .repository
            .find_by_id(metadata.collection_name, key)
            .and_then(|found| match found {
                Some(document) => self.codec().decode_binary::<T>(&document, key).map(Some),
                None => {
                    debug!(
                        "[DataStorage] 문서 없음: collection={}, key={}",
                        metadata.collection_name, key
                    );
                    Ok(None)
                }
            });

        self.settle("load_binary", &metadata, key, result, None)
    }

    pub fn exists_binary<T: StorableBinaryData>(&self, key: &str) -> DataStoreResult<bool> {
        let metadata = MetadataResolver::resolve::<T>()?;
        let result = self.count(&metadata, key);
        self.settle("exists_binary", &metadata, key, result, false)
    }

    pub fn delete_binary<T: StorableBinaryData>(&self, key: &str) -> DataStoreResult<()> {
        let metadata = MetadataResolver::resolve::<T>()?;
        let result = self.delete(&metadata, key);
        self.settle("delete_binary", &metadata, key, result, ())
    }

    fn count(&self, metadata: &EntityMetadata, key: &str) -> DataStoreResult<bool> {
        let count = self.repository.count(metadata.collection_name, key)?;
        debug!(
            "[DataStorage] 존재 확인: collection={}, key={}, count={}",
            metadata.collection_name, key, count
        );
        Ok(count > 0)
    }

    fn delete(&self, metadata: &EntityMetadata, key: &str) -> DataStoreResult<()> {
        self.repository.delete_by_id(metadata.collection_name, key)?;
        info!(
            "🗑️ [DataStorage] 삭제 완료: collection={}, key={}",
            metadata.collection_name, key
        );
        Ok(())
    }

    // ===== 비동기 버전 =====

    pub async fn store_structured_async<T: StorableStructuredData>(&self, data: T) -> DataStoreResult<()> {
        let service = self.clone();
        self.workers.execute(move || service.store_structured(&data)).await
    }

    pub async fn load_structured_async<T: StorableStructuredData>(
        &self,
        key: impl Into<String>,
    ) -> DataStoreResult<Option<T>> {
        let service = self.clone();
        let key = key.into();
        self.workers.execute(move || service.load_structured::<T>(&key)).await
    }

    pub async fn exists_structured_async<T: StorableStructuredData>(
        &self,
        key: impl Into<String>,
    ) -> DataStoreResult<bool> {
        let service = self.clone();
        let key = key.into();
        self.workers.execute(move || service.exists_structured::<T>(&key)).await
    }

    pub async fn delete_structured_async<T: StorableStructuredData>(
        &self,
        key: impl Into<String>,
    ) -> DataStoreResult<()> {
        let service = self.clone();
        let key = key.into();
        self.workers.execute(move || service.delete_structured::<T>(&key)).await
    }

    pub async fn store_binary_async<T: StorableBinaryData>(&self, data: T) -> DataStoreResult<()> {
        let service = self.clone();
        self.workers.execute(move || service.store_binary(&data)).await
    }

    pub async fn load_binary_async<T: StorableBinaryData>(
        &self,
        key: impl Into<String>,
    ) -> DataStoreResult<Option<T>> {
        let service = self.clone();
        let key = key.into();
        self.workers.execute(move || service.load_binary::<T>(&key)).await
    }

    pub async fn exists_binary_async<T: StorableBinaryData>(
        &self,
        key: impl Into<String>,
    ) -> DataStoreResult<bool> {
        let service = self.clone();
        let key = key.into();
        self.workers.execute(move || service.exists_binary::<T>(&key)).await
    }

    pub async fn delete_binary_async<T: StorableBinaryData>(
        &self,
        key: impl Into<String>,
    ) -> DataStoreResult<()> {
        let service = self.clone();
        let key = key.into();
        self.workers.execute(move || service.delete_binary::<T>(&key)).await
    }
}
