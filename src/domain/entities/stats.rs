//! Player Statistics Entity
//!
//! 플레이어별 누적 통계를 저장하는 정형 엔티티입니다.
//! 기존 문서와의 호환을 위해 필드는 camelCase로 직렬화됩니다.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::data_collection;

/// 플레이어 통계 데이터
///
/// `player_stats` 컬렉션에 저장되며, `playerId`가 문서의 `_id`가 됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerStatsData {
    /// 플레이어 식별자 (키 필드)
    pub player_id: String,
    /// 통계 이름 → 누적 값
    #[serde(default)]
    pub stats: HashMap<String, i64>,
}

data_collection!(PlayerStatsData, name = "player_stats", key = player_id as "playerId");

impl PlayerStatsData {
    /// 비어 있는 통계 레코드를 생성합니다.
    pub fn empty(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            stats: HashMap::new(),
        }
    }

    /// 각 통계에 증가분을 더합니다. 없던 통계는 0에서 시작합니다.
    pub fn apply_increments(&mut self, increments: &HashMap<String, i64>) {
        for (name, delta) in increments {
            *self.stats.entry(name.clone()).or_insert(0) += delta;
        }
    }
}
