//! Player Level Entity
//!
//! 플레이어별 누적 경험치를 저장하는 정형 엔티티와 레벨 계산 규칙입니다.
//!
//! 레벨은 `floor(sqrt(experience / 100)) + 1`로 계산합니다.
//!
//! | 레벨 | 경험치 구간 |
//! |------|-------------|
//! | 1 | 0 - 99 |
//! | 2 | 100 - 399 |
//! | 3 | 400 - 899 |
//! | 4 | 900 - 1599 |

use serde::{Deserialize, Serialize};

use crate::data_collection;

/// 레벨 하나를 올리는 데 필요한 기준 경험치
pub const BASE_XP_PER_LEVEL: i64 = 100;

/// 플레이어 레벨 데이터
///
/// `player_levels` 컬렉션에 저장되며, `playerId`가 문서의 `_id`가 됩니다.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlayerLevelData {
    pub player_id: String,
    #[serde(default)]
    pub experience: i64,
}

data_collection!(PlayerLevelData, name = "player_levels", key = player_id as "playerId");

impl PlayerLevelData {
    pub fn new(player_id: impl Into<String>) -> Self {
        Self {
            player_id: player_id.into(),
            experience: 0,
        }
    }

    pub fn level(&self) -> u32 {
        level_for_experience(self.experience)
    }

    /// 경험치를 더합니다. 결과는 0 미만으로 내려가지 않습니다.
    pub fn add_experience(&mut self, amount: i64) {
        self.experience = self.experience.saturating_add(amount).max(0);
    }
}

/// 경험치에 해당하는 레벨 (최소 1)
pub fn level_for_experience(experience: i64) -> u32 {
    if experience <= 0 {
        return 1;
    }
    let steps = (experience / BASE_XP_PER_LEVEL).isqrt();
    u32::try_from(steps).map_or(u32::MAX, |steps| steps.saturating_add(1))
}

/// 레벨에 도달하는 데 필요한 누적 경험치
pub fn experience_for_level(level: u32) -> i64 {
    if level <= 1 {
        return 0;
    }
    i64::from(level - 1)
        .saturating_pow(2)
        .saturating_mul(BASE_XP_PER_LEVEL)
}
