//! 엔티티 저장 계층 데모 애플리케이션
//!
//! 환경 설정으로 저장소에 연결한 뒤 통계, 레벨과 월드 데이터를 저장, 조회, 삭제하는
//! 전체 흐름을 한 번 실행합니다. `DATASTORE_BACKEND=memory`로 MongoDB 없이도 실행할 수 있습니다.

use std::collections::HashMap;

use dotenv::dotenv;
use env_logger::Env;
use futures_util::future::join_all;
use log::{error, info, warn};
use uuid::Uuid;

use entity_datastore::config::DataStoreConfig;
use entity_datastore::core::errors::{DataStoreError, DataStoreResult};
use entity_datastore::domain::entities::world::WorldBinaryData;
use entity_datastore::services::level::LevelService;
use entity_datastore::services::stats::StatsService;
use entity_datastore::services::storage::DataStorageService;

#[tokio::main]
async fn main() -> DataStoreResult<()> {
    // 환경 설정 및 로깅 초기화
    load_env_file();
    init_logging();

    info!("🚀 엔티티 저장 계층 시작중...");

    let config = DataStoreConfig::from_env();
    let storage = initialize_storage(config).await?;
    let stats = StatsService::new(storage.clone());
    let levels = LevelService::new(storage.clone());

    info!("✅ 저장 계층이 성공적으로 초기화되었습니다!");

    run_stats_flow(&stats).await?;
    run_level_flow(&levels).await?;
    run_world_flow(&storage).await?;

    storage.teardown();
    info!("👋 저장 계층 종료");
    Ok(())
}

/// 환경별 설정 파일을 로드합니다
///
/// # Environment Variables
///
/// * `PROFILE=dev` - .env.dev 파일 로드 (기본값)
/// * `PROFILE=prod` - .env.prod 파일 로드
/// * 기타 - 기본 .env 파일 로드
fn load_env_file() {
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "dev".to_string());

    info!("Current profile: {}", profile);

    match profile.as_str() {
        "prod" => match dotenv::from_filename(".env.prod") {
            Ok(_) => info!(".env.prod 파일 로드 됨"),
            Err(e) => warn!(".env.prod 파일 로드 실패: {}", e),
        },
        "dev" => match dotenv::from_filename(".env.dev") {
            Ok(_) => info!(".env.dev 파일 로드 됨"),
            Err(e) => warn!(".env.dev 파일 로드 실패: {}", e),
        },
        _ => {
            dotenv().ok();
            info!("기본 .env 파일 로드");
        }
    }
}

/// 로깅 시스템을 초기화합니다
///
/// # Environment Variables
///
/// * `RUST_LOG` - 로깅 레벨 설정 (기본값: "info")
///
/// ```bash
/// RUST_LOG=entity_datastore=debug cargo run
/// ```
fn init_logging() {
    env_logger::init_from_env(Env::default().default_filter_or("info"));
}

/// 저장소에 연결합니다. 초기 연결 실패는 복구할 수 없으므로 그대로 반환합니다.
async fn initialize_storage(config: DataStoreConfig) -> DataStoreResult<DataStorageService> {
    info!("📡 저장소 연결 중... (backend={:?})", config.backend);

    let connected = tokio::task::spawn_blocking(move || DataStorageService::connect(&config))
        .await
        .map_err(|e| DataStoreError::ConnectivityError(format!("storage startup task failed: {}", e)))?;

    connected.inspect_err(|e| error!("❌ 저장소 초기화 실패: {}", e))
}

async fn run_stats_flow(stats: &StatsService) -> DataStoreResult<()> {
    let player_id = Uuid::new_v4().to_string();

    let awarded = stats
        .award_player_stats_async(player_id.clone(), HashMap::from([("kills".to_string(), 3), ("wins".to_string(), 1)]))
        .await?;
    info!("🏆 통계 지급: player={}, stats={:?}", player_id, awarded);

    // 같은 플레이어에 대한 동시 갱신은 직렬화되지 않으므로 서로 다른 플레이어로 실행
    let others: Vec<String> = (0..4).map(|_| Uuid::new_v4().to_string()).collect();
    let results = join_all(others.iter().map(|id| {
        stats.award_player_stats_async(id.clone(), HashMap::from([("joins".to_string(), 1)]))
    }))
    .await;
    let succeeded = results.iter().filter(|result| result.is_ok()).count();
    info!("📊 동시 지급 완료: {}/{}", succeeded, others.len());

    let loaded = stats.get_player_stats_async(player_id.clone()).await?;
    info!("📊 통계 조회: player={}, stats={:?}", player_id, loaded);

    stats.delete_player_stats(&player_id, &["wins".to_string()])?;
    for id in others.iter().chain(std::iter::once(&player_id)) {
        stats.clear_player_stats(id)?;
    }
    Ok(())
}

async fn run_level_flow(levels: &LevelService) -> DataStoreResult<()> {
    let players: Vec<String> = (0..2).map(|_| Uuid::new_v4().to_string()).collect();
    let rewards: HashMap<String, i64> = players.iter().cloned().zip([150, 950]).collect();

    for (player_id, result) in levels.reward_game_async(rewards).await? {
        info!(
            "⭐ 경험치 지급: player={}, +{}, level {} → {}",
            player_id, result.experience_awarded, result.old_level, result.new_level
        );
    }

    for (player_id, experience) in levels.list_player_experiences_async(players).await? {
        info!(
            "⭐ 레벨 조회: player={}, level={}, progress={}/{}",
            player_id,
            experience.level,
            experience.experience_in_current_level,
            experience.experience_needed_for_next_level
        );
    }
    Ok(())
}

async fn run_world_flow(storage: &DataStorageService) -> DataStoreResult<()> {
    let world = WorldBinaryData::new("lobby", &Uuid::new_v4().to_string(), vec![0x1f, 0x8b, 0x08, 0x00]);
    let key = world.key.clone();

    storage.store_binary_async(world).await?;

    match storage.load_binary_async::<WorldBinaryData>(key.clone()).await? {
        Some(loaded) => info!("🌍 월드 조회: key={}, bytes={}", loaded.key, loaded.data.len()),
        None => warn!("🌍 월드 없음: key={}", key),
    }

    storage.delete_binary_async::<WorldBinaryData>(key.clone()).await?;
    info!(
        "🌍 월드 삭제 후 존재 여부: key={}, exists={}",
        key,
        storage.exists_binary_async::<WorldBinaryData>(key.clone()).await?
    );
    Ok(())
}
