//! # 플레이어 통계 서비스
//!
//! [`DataStorageService`] 위에서 플레이어별 누적 통계를 관리합니다.
//! 통계는 `player_stats` 컬렉션에 플레이어당 한 문서로 저장됩니다.
//!
//! 저장 계층의 에러 정책을 그대로 따르므로, 백엔드 장애 시 조회는 빈 통계를,
//! 갱신은 무동작을 결과로 돌려줍니다.

use std::collections::HashMap;

use log::{debug, info};

use crate::core::errors::DataStoreResult;
use crate::domain::entities::stats::PlayerStatsData;
use crate::services::storage::DataStorageService;

/// 플레이어 통계 서비스
#[derive(Clone)]
pub struct StatsService {
    storage: DataStorageService,
}

impl StatsService {
    pub fn new(storage: DataStorageService) -> Self {
        info!("📊 StatsService 초기화 완료");
        Self { storage }
    }

    /// 플레이어의 현재 통계를 조회합니다. 기록이 없으면 빈 맵입니다.
    pub fn get_player_stats(&self, player_id: &str) -> DataStoreResult<HashMap<String, i64>> {
        Ok(self.load_or_empty(player_id)?.stats)
    }

    /// 각 통계에 증가분을 더해 저장하고 갱신된 통계를 반환합니다.
    ///
    /// 조회와 저장 사이에 잠금이 없으므로 같은 플레이어에 대한 동시 호출은
    /// 나중에 저장된 쪽만 남습니다.
    pub fn award_player_stats(
        &self,
        player_id: &str,
        increments: &HashMap<String, i64>,
    ) -> DataStoreResult<HashMap<String, i64>> {
        let mut record = self.load_or_empty(player_id)?;
        record.apply_increments(increments);
        self.storage.store_structured(&record)?;

        debug!(
            "[Stats] 통계 지급: player={}, increments={}, total_stats={}",
            player_id,
            increments.len(),
            record.stats.len()
        );
        Ok(record.stats)
    }

    /// 플레이어의 통계를 주어진 값으로 덮어씁니다.
    pub fn set_player_stats(&self, player_id: &str, stats: HashMap<String, i64>) -> DataStoreResult<()> {
        let record = PlayerStatsData {
            player_id: player_id.to_string(),
            stats,
        };
        self.storage.store_structured(&record)
    }

    /// 지정한 통계 항목만 제거합니다. 기록이 없으면 아무것도 하지 않습니다.
    pub fn delete_player_stats(&self, player_id: &str, stat_names: &[String]) -> DataStoreResult<()> {
        let Some(mut record) = self.storage.load_structured::<PlayerStatsData>(player_id)? else {
            debug!("[Stats] 삭제할 통계 없음: player={}", player_id);
            return Ok(());
        };

        for name in stat_names {
            record.stats.remove(name);
        }
        self.storage.store_structured(&record)
    }

    /// 플레이어의 통계 문서를 통째로 삭제합니다.
    pub fn clear_player_stats(&self, player_id: &str) -> DataStoreResult<()> {
        self.storage.delete_structured::<PlayerStatsData>(player_id)
    }

    pub async fn get_player_stats_async(&self, player_id: impl Into<String>) -> DataStoreResult<HashMap<String, i64>> {
        let service = self.clone();
        let player_id = player_id.into();
        self.storage
            .workers()
            .execute(move || service.get_player_stats(&player_id))
            .await
    }

    pub async fn award_player_stats_async(
        &self,
        player_id: impl Into<String>,
        increments: HashMap<String, i64>,
    ) -> DataStoreResult<HashMap<String, i64>> {
        let service = self.clone();
        let player_id = player_id.into();
        self.storage
            .workers()
            .execute(move || service.award_player_stats(&player_id, &increments))
            .await
    }

    pub async fn set_player_stats_async(
        &self,
        player_id: impl Into<String>,
        stats: HashMap<String, i64>,
    ) -> DataStoreResult<()> {
        let service = self.clone();
        let player_id = player_id.into();
        self.storage
            .workers()
            .execute(move || service.set_player_stats(&player_id, stats))
            .await
    }

    pub async fn delete_player_stats_async(
        &self,
        player_id: impl Into<String>,
        stat_names: Vec<String>,
    ) -> DataStoreResult<()> {
        let service = self.clone();
        let player_id = player_id.into();
        self.storage
            .workers()
            .execute(move || service.delete_player_stats(&player_id, &stat_names))
            .await
    }

    fn load_or_empty(&self, player_id: &str) -> DataStoreResult<PlayerStatsData> {
        Ok(self
            .storage
            .load_structured::<PlayerStatsData>(player_id)?
            .unwrap_or_else(|| PlayerStatsData::empty(player_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn increments(pairs: &[(&str, i64)]) -> HashMap<String, i64> {
        pairs.iter().map(|(name, value)| (name.to_string(), *value)).collect()
    }

    #[test]
    fn test_unknown_player_has_empty_stats() {
        let service = StatsService::new(DataStorageService::in_memory());

        assert!(service.get_player_stats("nobody").unwrap().is_empty());
    }

    #[test]
    fn test_award_accumulates() {
        let service = StatsService::new(DataStorageService::in_memory());

        service
            .award_player_stats("p-1", &increments(&[("kills", 2), ("wins", 1)]))
            .unwrap();
        let totals = service
            .award_player_stats("p-1", &increments(&[("kills", 3), ("deaths", 1)]))
            .unwrap();

        assert_eq!(totals, increments(&[("kills", 5), ("wins", 1), ("deaths", 1)]));
        assert_eq!(service.get_player_stats("p-1").unwrap(), totals);
    }

    #[test]
    fn test_set_overwrites_and_delete_removes_named_stats() {
        let service = StatsService::new(DataStorageService::in_memory());
        service
            .award_player_stats("p-2", &increments(&[("kills", 10)]))
            .unwrap();

        service
            .set_player_stats("p-2", increments(&[("wins", 4), ("coins", 250)]))
            .unwrap();
        assert_eq!(
            service.get_player_stats("p-2").unwrap(),
            increments(&[("wins", 4), ("coins", 250)])
        );

        service
            .delete_player_stats("p-2", &["coins".to_string(), "unknown".to_string()])
            .unwrap();
        assert_eq!(service.get_player_stats("p-2").unwrap(), increments(&[("wins", 4)]));
    }

    #[test]
    fn test_delete_without_record_stores_nothing() {
        let storage = DataStorageService::in_memory();
        let service = StatsService::new(storage.clone());

        service
            .delete_player_stats("ghost", &["kills".to_string()])
            .unwrap();

        assert!(!storage.exists_structured::<PlayerStatsData>("ghost").unwrap());
    }

    #[test]
    fn test_clear_removes_record() {
        let storage = DataStorageService::in_memory();
        let service = StatsService::new(storage.clone());
        service
            .award_player_stats("p-3", &increments(&[("wins", 1)]))
            .unwrap();

        service.clear_player_stats("p-3").unwrap();

        assert!(!storage.exists_structured::<PlayerStatsData>("p-3").unwrap());
        assert!(service.get_player_stats("p-3").unwrap().is_empty());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_async_award_and_get() {
        let service = StatsService::new(DataStorageService::in_memory());

        service
            .award_player_stats_async("p-4", increments(&[("blocks", 64)]))
            .await
            .unwrap();
        service
            .set_player_stats_async("p-5", increments(&[("wins", 2), ("losses", 1)]))
            .await
            .unwrap();
        service
            .delete_player_stats_async("p-5", vec!["losses".to_string()])
            .await
            .unwrap();

        assert_eq!(
            service.get_player_stats_async("p-4").await.unwrap(),
            increments(&[("blocks", 64)])
        );
        assert_eq!(
            service.get_player_stats_async("p-5").await.unwrap(),
            increments(&[("wins", 2)])
        );
    }
}
