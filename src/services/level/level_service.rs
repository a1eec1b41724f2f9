//! # 플레이어 레벨 서비스
//!
//! [`DataStorageService`] 위에서 플레이어 경험치 조회와 지급을 담당합니다.
//! 레벨은 저장하지 않고 경험치에서 매번 계산합니다
//! ([`level_for_experience`] 참고).
//!
//! 저장 계층이 실패를 부정 결과로 바꾸므로, 조회 실패는 경험치 0인 플레이어로 보입니다.

use std::collections::HashMap;

use log::{debug, info};

use crate::core::errors::DataStoreResult;
use crate::domain::entities::level::{PlayerLevelData, experience_for_level, level_for_experience};
use crate::services::storage::DataStorageService;

/// 플레이어의 현재 레벨 진행 상황
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerExperience {
    pub player_id: String,
    pub level: u32,
    pub experience: i64,
    /// 현재 레벨에 들어선 뒤 쌓은 경험치
    pub experience_in_current_level: i64,
    /// 현재 레벨에서 다음 레벨까지 필요한 전체 경험치
    pub experience_needed_for_next_level: i64,
}

impl PlayerExperience {
    pub fn from_experience(player_id: impl Into<String>, experience: i64) -> Self {
        let level = level_for_experience(experience);
        let current_floor = experience_for_level(level);
        let next_floor = experience_for_level(level.saturating_add(1));

        Self {
            player_id: player_id.into(),
            level,
            experience,
            experience_in_current_level: experience - current_floor,
            experience_needed_for_next_level: next_floor - current_floor,
        }
    }
}

/// 경험치 지급 결과
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceAwardResult {
    pub player_id: String,
    pub experience_awarded: i64,
    pub old_level: u32,
    pub new_level: u32,
    pub leveled_up: bool,
}

/// 플레이어 레벨 서비스
#[derive(Clone)]
pub struct LevelService {
    storage: DataStorageService,
}

impl LevelService {
    pub fn new(storage: DataStorageService) -> Self {
        info!("⭐ LevelService 초기화 완료");
        Self { storage }
    }

    /// 플레이어의 경험치와 레벨을 조회합니다. 기록이 없으면 레벨 1입니다.
    pub fn get_player_experience(&self, player_id: &str) -> DataStoreResult<PlayerExperience> {
        let record = self.load_or_new(player_id)?;
        Ok(PlayerExperience::from_experience(player_id, record.experience))
    }

    /// 여러 플레이어의 경험치를 한 번에 조회합니다.
    pub fn list_player_experiences(&self, player_ids: &[String]) -> DataStoreResult<HashMap<String, PlayerExperience>> {
        player_ids
            .iter()
            .map(|id| Ok((id.clone(), self.get_player_experience(id)?)))
            .collect()
    }

    /// 한 플레이어에게 경험치를 지급합니다. 음수는 차감이며 0 아래로 내려가지 않습니다.
    pub fn reward_player(&self, player_id: &str, amount: i64) -> DataStoreResult<ExperienceAwardResult> {
        let mut record = self.load_or_new(player_id)?;
        let old_level = record.level();

        record.add_experience(amount);
        let new_level = record.level();
        self.storage.store_structured(&record)?;

        if new_level > old_level {
            debug!("[Level] 레벨 업: player={}, {} → {}", player_id, old_level, new_level);
        }

        Ok(ExperienceAwardResult {
            player_id: player_id.to_string(),
            experience_awarded: amount,
            old_level,
            new_level,
            leveled_up: new_level > old_level,
        })
    }

    /// 게임 보상처럼 여러 플레이어에게 경험치를 지급합니다.
    pub fn reward_game(&self, rewards: &HashMap<String, i64>) -> DataStoreResult<HashMap<String, ExperienceAwardResult>> {
        let results = rewards
            .iter()
            .map(|(player_id, amount)| Ok((player_id.clone(), self.reward_player(player_id, *amount)?)))
            .collect::<DataStoreResult<HashMap<_, _>>>()?;

        info!("⭐ 게임 보상 지급 완료: {}명", results.len());
        Ok(results)
    }

    pub async fn get_player_experience_async(&self, player_id: impl Into<String>) -> DataStoreResult<PlayerExperience> {
        let service = self.clone();
        let player_id = player_id.into();
        self.storage
            .workers()
            .execute(move || service.get_player_experience(&player_id))
            .await
    }

    pub async fn list_player_experiences_async(
        &self,
        player_ids: Vec<String>,
    ) -> DataStoreResult<HashMap<String, PlayerExperience>> {
        let service = self.clone();
        self.storage
            .workers()
            .execute(move || service.list_player_experiences(&player_ids))
            .await
    }

    pub async fn reward_game_async(
        &self,
        rewards: HashMap<String, i64>,
    ) -> DataStoreResult<HashMap<String, ExperienceAwardResult>> {
        let service = self.clone();
        self.storage
            .workers()
            .execute(move || service.reward_game(&rewards))
            .await
    }

    fn load_or_new(&self, player_id: &str) -> DataStoreResult<PlayerLevelData> {
        Ok(self
            .storage
            .load_structured::<PlayerLevelData>(player_id)?
            .unwrap_or_else(|| PlayerLevelData::new(player_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_player_starts_at_level_one() {
        let service = LevelService::new(DataStorageService::in_memory());

        let experience = service.get_player_experience("nobody").unwrap();

        assert_eq!(experience, PlayerExperience::from_experience("nobody", 0));
        assert_eq!(experience.level, 1);
        assert_eq!(experience.experience_needed_for_next_level, 100);
    }

    #[test]
    fn test_progress_within_level() {
        let experience = PlayerExperience::from_experience("p-1", 250);

        assert_eq!(experience.level, 2);
        assert_eq!(experience.experience_in_current_level, 150);
        assert_eq!(experience.experience_needed_for_next_level, 300);
    }

    #[test]
    fn test_reward_player_levels_up_and_persists() {
        let storage = DataStorageService::in_memory();
        let service = LevelService::new(storage.clone());

        let first = service.reward_player("p-1", 50).unwrap();
        assert!(!first.leveled_up);
        assert_eq!((first.old_level, first.new_level), (1, 1));

        let second = service.reward_player("p-1", 400).unwrap();
        assert!(second.leveled_up);
        assert_eq!((second.old_level, second.new_level), (1, 3));

        let stored = storage.load_structured::<PlayerLevelData>("p-1").unwrap().unwrap();
        assert_eq!(stored.experience, 450);
        assert_eq!(service.get_player_experience("p-1").unwrap().level, 3);
    }

    #[test]
    fn test_negative_reward_clamps_at_zero() {
        let service = LevelService::new(DataStorageService::in_memory());
        service.reward_player("p-2", 120).unwrap();

        let result = service.reward_player("p-2", -500).unwrap();

        assert_eq!((result.old_level, result.new_level), (2, 1));
        assert!(!result.leveled_up);
        assert_eq!(service.get_player_experience("p-2").unwrap().experience, 0);
    }

    #[test]
    fn test_reward_game_and_list() {
        let service = LevelService::new(DataStorageService::in_memory());
        let rewards = HashMap::from([("a".to_string(), 100), ("b".to_string(), 900)]);

        let results = service.reward_game(&rewards).unwrap();
        assert_eq!(results["a"].new_level, 2);
        assert_eq!(results["b"].new_level, 4);

        let listed = service
            .list_player_experiences(&["a".to_string(), "b".to_string(), "c".to_string()])
            .unwrap();
        assert_eq!(listed.len(), 3);
        assert_eq!(listed["a"].experience, 100);
        assert_eq!(listed["c"].level, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_async_reward_and_lookup() {
        let service = LevelService::new(DataStorageService::in_memory());

        let results = service
            .reward_game_async(HashMap::from([("p-3".to_string(), 400)]))
            .await
            .unwrap();
        assert!(results["p-3"].leveled_up);

        assert_eq!(service.get_player_experience_async("p-3").await.unwrap().level, 3);
        let listed = service
            .list_player_experiences_async(vec!["p-3".to_string()])
            .await
            .unwrap();
        assert_eq!(listed["p-3"].experience, 400);
    }
}
