pub mod level_service;

pub use level_service::{ExperienceAwardResult, LevelService, PlayerExperience};
