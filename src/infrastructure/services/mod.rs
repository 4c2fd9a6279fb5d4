//! forge 백엔드 구현체와 기본 레지스트리 구성.
//!
//! 각 백엔드는 `ServiceOptions`만 받아 생성되며, 코어는 생성자/`instance_url`/
//! `get_project_from_url`만 사용한다.

pub mod forgejo;
pub mod github;
pub mod gitlab;
pub mod pagure;

use std::fmt;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;

use crate::application::config::ServiceOptions;
use crate::application::registry::{ServiceRegistry, ServiceType};
use crate::domain::error::ForgeError;
use crate::infrastructure::config::resolve_service_token;

pub const GITHUB: ServiceType = ServiceType::new("github", github::build);
pub const GITLAB: ServiceType = ServiceType::new("gitlab", gitlab::build);
pub const PAGURE: ServiceType = ServiceType::new("pagure", pagure::build);
pub const FORGEJO: ServiceType = ServiceType::new("forgejo", forgejo::build);

const USER_AGENT: &str = concat!("forgelink/", env!("CARGO_PKG_VERSION"));

/// 기본 호스트 패턴을 등록 순서대로 추가한다.
pub fn register_default_services(registry: &ServiceRegistry) {
    registry.register("github.com", GITHUB);
    registry.register("gitlab", GITLAB);
    for pattern in [
        "pagure",
        "src.fedoraproject.org",
        "src.stg.fedoraproject.org",
        "pkgs.fedoraproject.org",
        "pkgs.stg.fedoraproject.org",
        "git.centos.org",
        "git.stg.centos.org",
    ] {
        registry.register(pattern, PAGURE);
    }
    registry.register("forgejo", FORGEJO);
    registry.register("codeberg.org", FORGEJO);
}

/// 기본 백엔드가 모두 등록된 레지스트리.
pub fn default_registry() -> ServiceRegistry {
    let registry = ServiceRegistry::new();
    register_default_services(&registry);
    registry
}

/// 백엔드 공통 연결 정보. 토큰은 생성 시점에 한 번만 해석한다.
pub(crate) struct Connection {
    client: Client,
    instance_url: String,
    token: Option<String>,
    api_base: Option<String>,
}

impl Connection {
    pub(crate) fn new(options: &ServiceOptions, default_instance: &str) -> Self {
        let instance_url = options
            .instance_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
            .unwrap_or(default_instance)
            .trim_end_matches('/');
        // 설정 키처럼 호스트만 주어지면 https로 본다.
        let instance_url = if instance_url.contains("://") {
            instance_url.to_string()
        } else {
            format!("https://{instance_url}")
        };

        Self {
            client: Client::new(),
            instance_url,
            token: resolve_service_token(options).token,
            api_base: options
                .api_base
                .as_deref()
                .map(|base| base.trim_end_matches('/').to_string()),
        }
    }

    pub(crate) fn instance_url(&self) -> &str {
        &self.instance_url
    }

    pub(crate) fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// 설정된 override가 있으면 그것을, 없으면 `fallback`을 API base로 쓴다.
    pub(crate) fn api_base_or(&self, fallback: impl FnOnce(&str) -> String) -> String {
        self.api_base
            .clone()
            .unwrap_or_else(|| fallback(&self.instance_url))
    }

    pub(crate) fn get(&self, url: String) -> RequestBuilder {
        self.client.get(url).header("User-Agent", USER_AGENT)
    }
}

impl fmt::Debug for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connection")
            .field("instance_url", &self.instance_url)
            .field("api_base", &self.api_base)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// GET 요청을 보내고 성공 응답 본문을 JSON으로 해석한다.
pub(crate) async fn get_json<T: DeserializeOwned>(
    service: &str,
    request: RequestBuilder,
) -> Result<T> {
    let resp = request
        .send()
        .await
        .with_context(|| format!("{service}: failed to fetch project"))?;

    let status = resp.status();
    let body = resp
        .text()
        .await
        .with_context(|| format!("{service}: failed to read project body"))?;
    if !status.is_success() {
        anyhow::bail!("{service}: failed to fetch project metadata ({status}): {body}");
    }

    serde_json::from_str(&body).with_context(|| format!("{service}: invalid project JSON"))
}

/// namespace가 필수인 백엔드용 검사.
pub(crate) fn require_namespace(
    service: ServiceType,
    repo: &str,
    namespace: Option<&str>,
) -> Result<String, ForgeError> {
    match namespace.map(str::trim) {
        Some(ns) if !ns.is_empty() => Ok(ns.to_string()),
        _ => Err(ForgeError::InvalidProject {
            message: format!("{service} project '{repo}' requires a namespace"),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_resolves_known_hosts() {
        let registry = default_registry();
        let cases = [
            ("https://github.com/packit/ogr", GITHUB),
            ("https://gitlab.gnome.org/GNOME/gnome-shell", GITLAB),
            ("https://src.fedoraproject.org/rpms/python-ogr", PAGURE),
            ("https://pagure.io/ogr", PAGURE),
            ("https://git.centos.org/rpms/kernel", PAGURE),
            ("https://codeberg.org/forgejo/forgejo", FORGEJO),
            ("https://v10.next.forgejo.org/owner/repo", FORGEJO),
        ];
        for (url, expected) in cases {
            assert_eq!(registry.resolve(url, None), Some(expected), "{url}");
        }
        assert_eq!(registry.resolve("https://example.com/a/b", None), None);
    }

    #[test]
    fn default_registry_keeps_registration_order() {
        let patterns = default_registry().patterns();
        assert_eq!(patterns.first().map(|(p, _)| p.as_str()), Some("github.com"));
        assert_eq!(patterns.last().map(|(p, _)| p.as_str()), Some("codeberg.org"));
        assert_eq!(patterns.len(), 11);
    }

    #[test]
    fn connection_hides_token_in_debug() {
        let conn = Connection::new(
            &ServiceOptions::default().with_token("secret-token"),
            "https://example.com/",
        );
        assert_eq!(conn.instance_url(), "https://example.com");
        assert_eq!(conn.token(), Some("secret-token"));
        assert!(!format!("{conn:?}").contains("secret-token"));
    }

    #[test]
    fn bare_host_instance_gets_https() {
        let conn = Connection::new(
            &ServiceOptions::default().with_instance_url("gitlab.gnome.org/"),
            "https://gitlab.com",
        );
        assert_eq!(conn.instance_url(), "https://gitlab.gnome.org");
        assert_eq!(
            conn.api_base_or(|instance| format!("{instance}/api/v4")),
            "https://gitlab.gnome.org/api/v4"
        );

        let conn = Connection::new(
            &ServiceOptions::default().with_instance_url("http://pagure.local"),
            "https://pagure.io",
        );
        assert_eq!(conn.instance_url(), "http://pagure.local");
    }

    #[test]
    fn require_namespace_rejects_blank() {
        assert!(require_namespace(GITHUB, "ogr", Some("  ")).is_err());
        assert!(require_namespace(GITHUB, "ogr", None).is_err());
        assert_eq!(
            require_namespace(GITHUB, "ogr", Some("packit")).unwrap(),
            "packit"
        );
    }
}
