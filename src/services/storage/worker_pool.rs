//! # 저장 작업 워커 풀
//!
//! 비동기 파사드 메서드가 동기 본문을 실행하는 공유 풀입니다.
//! `tokio::task::spawn_blocking` 위에 세마포어를 두어 동시에 실행되는 블로킹 작업 수를
//! 제한합니다. 한도를 넘는 호출은 스레드를 점유하지 않고 허가를 기다립니다.

use std::sync::Arc;

use tokio::sync::Semaphore;

use crate::core::errors::{DataStoreError, DataStoreResult};

/// 동시 실행 상한이 있는 블로킹 작업 풀
#[derive(Clone, Debug)]
pub struct WorkerPool {
    permits: Arc<Semaphore>,
    capacity: usize,
}

impl WorkerPool {
    /// `capacity`개까지 동시에 실행하는 풀을 만듭니다. 0은 1로 취급합니다.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            permits: Arc::new(Semaphore::new(capacity)),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// 현재 남은 실행 슬롯 수
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// 동기 작업을 블로킹 스레드에서 실행하고 결과를 돌려줍니다.
    ///
    /// 작업 안의 패닉은 호출자 쪽에서 다시 발생합니다.
    ///
    /// # Errors
    ///
    /// 작업 자체의 결과를 그대로 반환하며, 런타임 종료로 작업이 취소된 경우에만
    /// `ConnectivityError`를 반환합니다.
    pub async fn execute<F, R>(&self, task: F) -> DataStoreResult<R>
    where
        F: FnOnce() -> DataStoreResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|_| DataStoreError::ConnectivityError("storage worker pool is closed".to_string()))?;

        let joined = tokio::task::spawn_blocking(move || {
            let _permit = permit;
            task()
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(e) if e.is_panic() => std::panic::resume_unwind(e.into_panic()),
            Err(e) => Err(DataStoreError::ConnectivityError(format!(
                "storage worker task was cancelled: {}",
                e
            ))),
        }
    }
}
