//! 설정 저장소 포트 구현 어댑터.

use anyhow::{Context, Result};

use crate::application::config::Config;
use crate::application::ports::ConfigRepository;

/// 표준 경로의 JSON 설정 파일을 병합해 읽는 저장소 어댑터.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonConfigRepository;

impl ConfigRepository for JsonConfigRepository {
    fn load(&self) -> Result<Config> {
        Config::load()
    }

    fn inspect(&self) -> Result<serde_json::Value> {
        let inspection = Config::inspect()?;
        serde_json::to_value(inspection).context("failed to serialize config inspection")
    }
}
