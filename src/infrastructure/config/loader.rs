//! 설정 파일 탐색/병합 로더.

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::debug;

use crate::application::config::Config;

/// 명시 경로를 지정하는 환경변수.
pub const CONFIG_ENV: &str = "FORGELINK_CONFIG";

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: Config,
    pub searched_paths: Vec<PathBuf>,
    pub loaded_paths: Vec<PathBuf>,
}

/// 우선순위 경로를 순회해 JSON 설정을 병합한다.
pub(crate) fn load_merged_config() -> Result<LoadedConfig> {
    load_from_paths(config_paths())
}

/// 주어진 경로를 앞에서부터(낮은 우선순위 → 높은 우선순위) 병합한다.
/// 존재하지 않는 경로는 건너뛰고, 설정 파일이 하나도 없으면 빈 설정을 반환한다.
pub fn load_from_paths(paths: Vec<PathBuf>) -> Result<LoadedConfig> {
    let mut merged = Config::default();
    let mut loaded_paths = Vec::new();

    for path in &paths {
        if !path.exists() {
            continue;
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config at {}", path.display()))?;
        let parsed: Config = serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse JSON in {}", path.display()))?;
        debug!(path = %path.display(), instances = parsed.instances.len(), "loaded config file");
        merged.merge_from(parsed);
        loaded_paths.push(path.to_path_buf());
    }

    Ok(LoadedConfig {
        config: merged,
        searched_paths: paths,
        loaded_paths,
    })
}

/// 시스템 + 사용자 + 프로젝트 + 명시 경로 순으로 병합 경로를 구성한다.
pub fn config_paths() -> Vec<PathBuf> {
    let mut paths = vec![PathBuf::from("/etc/forgelink/config.json")];

    if let Some(base) = dirs::config_dir() {
        paths.push(base.join("forgelink").join("config.json"));
    }

    paths.push(PathBuf::from(".forgelink/config.json"));

    if let Ok(path) = env::var(CONFIG_ENV) {
        paths.push(Path::new(&path).to_path_buf());
    }

    dedup_paths(paths)
}

fn dedup_paths(paths: Vec<PathBuf>) -> Vec<PathBuf> {
    let mut out = Vec::new();
    for p in paths {
        if !out.contains(&p) {
            out.push(p);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_files_take_priority() {
        let dir = tempfile::tempdir().unwrap();
        let low = dir.path().join("low.json");
        let high = dir.path().join("high.json");
        let missing = dir.path().join("missing.json");

        fs::write(
            &low,
            r#"{"instances": {"gitlab": {"token": "low", "api_base": "https://gl/api/v4"}}}"#,
        )
        .unwrap();
        fs::write(&high, r#"{"instances": {"gitlab": {"token": "high"}}}"#).unwrap();

        let loaded = load_from_paths(vec![low.clone(), missing.clone(), high.clone()]).unwrap();

        assert_eq!(loaded.searched_paths, vec![low.clone(), missing, high.clone()]);
        assert_eq!(loaded.loaded_paths, vec![low, high]);
        let gitlab = &loaded.config.instances["gitlab"];
        assert_eq!(gitlab.token.as_deref(), Some("high"));
        assert_eq!(gitlab.api_base.as_deref(), Some("https://gl/api/v4"));
    }

    #[test]
    fn invalid_json_names_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{ not json").unwrap();

        let err = load_from_paths(vec![path.clone()]).unwrap_err();
        assert!(format!("{err:#}").contains(&path.display().to_string()));
    }

    #[test]
    fn no_files_yields_empty_config() {
        let loaded = load_from_paths(vec![PathBuf::from("/nonexistent/forgelink.json")]).unwrap();
        assert!(loaded.loaded_paths.is_empty());
        assert!(loaded.config.instances.is_empty());
        assert!(loaded.config.services.is_empty());
    }

    #[test]
    fn dedup_keeps_first_occurrence() {
        let paths = dedup_paths(vec![
            PathBuf::from("a"),
            PathBuf::from("b"),
            PathBuf::from("a"),
        ]);
        assert_eq!(paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }
}
