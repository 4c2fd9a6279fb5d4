//! 서비스 토큰 설정(token/env/cmd)을 실제 런타임 값으로 해석하는 유틸리티.
//!
//! - 환경변수/프로세스 실행은 인프라 계층에서만 수행한다.

use std::env;
use std::process::Command;

use anyhow::{Context, Result};

use crate::application::config::ServiceOptions;

/// 토큰 해석 결과. `source`는 진단용 라벨이며 토큰 값은 담지 않는다.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenResolution {
    pub token: Option<String>,
    pub source: Option<String>,
}

/// `token` → `token_env` → `token_command` 순으로 토큰을 찾는다.
pub fn resolve_service_token(options: &ServiceOptions) -> TokenResolution {
    if let Some(token) = non_empty(options.token.as_deref()) {
        return TokenResolution {
            token: Some(token.to_string()),
            source: Some("inline".to_string()),
        };
    }

    let mut hint: Option<String> = None;

    if let Some(env_name) = non_empty(options.token_env.as_deref()) {
        match env::var(env_name).ok().map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => {
                return TokenResolution {
                    token: Some(v),
                    source: Some(format!("env:{env_name}")),
                };
            }
            _ => hint = Some(format!("env:{env_name} (missing)")),
        }
    }

    if let Some(cmd) = options
        .token_command
        .as_ref()
        .filter(|cmd| cmd.iter().any(|s| !s.trim().is_empty()))
    {
        let label = format!("cmd:{}", cmd.join(" "));
        match run_token_command(cmd) {
            Ok(token) if !token.trim().is_empty() => {
                return TokenResolution {
                    token: Some(token.trim().to_string()),
                    source: Some(label),
                };
            }
            Ok(_) => hint = Some(format!("{label} (empty)")),
            Err(_) => hint = Some(format!("{label} (failed)")),
        }
    }

    TokenResolution {
        token: None,
        source: hint,
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn run_token_command(cmd: &[String]) -> Result<String> {
    let program = cmd
        .first()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .context("token_command is empty")?;

    let output = Command::new(program)
        .args(&cmd[1..])
        .output()
        .with_context(|| format!("failed to run token command: {program}"))?;

    if !output.status.success() {
        anyhow::bail!("token command failed: {program} ({})", output.status);
    }

    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inline_token_wins() {
        let options = ServiceOptions {
            token: Some(" abcd ".to_string()),
            token_env: Some("FORGELINK_TEST_UNUSED".to_string()),
            ..ServiceOptions::default()
        };
        let resolved = resolve_service_token(&options);
        assert_eq!(resolved.token.as_deref(), Some("abcd"));
        assert_eq!(resolved.source.as_deref(), Some("inline"));
    }

    #[test]
    fn missing_env_is_reported() {
        let options = ServiceOptions {
            token_env: Some("FORGELINK_TEST_SURELY_UNSET_VARIABLE".to_string()),
            ..ServiceOptions::default()
        };
        let resolved = resolve_service_token(&options);
        assert_eq!(resolved.token, None);
        assert_eq!(
            resolved.source.as_deref(),
            Some("env:FORGELINK_TEST_SURELY_UNSET_VARIABLE (missing)")
        );
    }

    #[cfg(unix)]
    #[test]
    fn token_command_output_is_trimmed() {
        let options = ServiceOptions {
            token_command: Some(vec!["echo".to_string(), "from-cmd".to_string()]),
            ..ServiceOptions::default()
        };
        let resolved = resolve_service_token(&options);
        assert_eq!(resolved.token.as_deref(), Some("from-cmd"));
        assert_eq!(resolved.source.as_deref(), Some("cmd:echo from-cmd"));
    }

    #[test]
    fn nothing_configured() {
        assert_eq!(
            resolve_service_token(&ServiceOptions::default()),
            TokenResolution::default()
        );
    }
}
