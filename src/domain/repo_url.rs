//! git remote URL을 저장소 식별자(RepoUrl)로 해석하는 모듈.
//!
//! 문법 기반 파서가 아니라 순서가 정해진 문자열 휴리스틱이다.
//! HTTPS/HTTP/`git://`/`git+https://`/SCP(`user@host:path`) 형식을 모두 받아들인다.

use std::fmt;

use serde::Serialize;
use url::Host;

/// 그대로 인정하는 스킴 접두사. 그 외 입력은 `https://`를 붙여 해석한다.
const KNOWN_SCHEMES: [&str; 4] = ["http://", "https://", "git://", "git+https://"];

/// SCP 형식에서 `host:forks/...`로 포크를 표시하는 토큰.
const FORK_MARKER: &str = "forks";

/// 경로 첫 세그먼트로 포크를 표시하는 키워드(`fork/<user>/...`).
const FORK_KEYWORDS: [&str; 2] = ["fork", "forks"];

/// 파싱된 저장소 좌표. 모든 필드가 같을 때만 같은 값으로 본다.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RepoUrl {
    /// http / https / git / git+https (SCP 입력은 https로 정규화)
    pub scheme: String,
    /// 포트/경로를 포함하지 않는 호스트 이름
    pub hostname: String,
    /// namespace와 구분되는 소유 사용자(SCP 사용자 슬롯, 포크 소유자)
    pub username: Option<String>,
    /// 사용자/포크 표식과 저장소 이름 사이의 `/` 연결 경로(빈 문자열 가능)
    pub namespace: Option<String>,
    /// `.git`이 제거된 마지막 경로 세그먼트
    pub repo: String,
    pub is_fork: bool,
}

/// 경로 해석 전 단계(스킴/호스트/사용자 슬롯)까지의 결과.
struct Authority {
    scheme: String,
    hostname: String,
    username: Option<String>,
    is_fork: bool,
    path: String,
}

impl RepoUrl {
    /// 임의의 git remote 문자열을 해석한다.
    /// 저장소 좌표로 인식할 수 없으면 `None`을 반환하며 패닉하지 않는다.
    pub fn parse(potential_url: &str) -> Option<Self> {
        if potential_url.is_empty() {
            return None;
        }

        let Authority {
            scheme,
            hostname,
            mut username,
            mut is_fork,
            path,
        } = parse_authority(potential_url)?;

        let segments: Vec<&str> = path.split('/').collect();

        let (namespace, repo) = match segments.as_slice() {
            [] => return None,
            [repo] => {
                // `host:forks/repo`처럼 포크 소유자를 알 수 없는 경우
                if is_fork {
                    return None;
                }
                (username.clone(), *repo)
            }
            [head @ .., repo] => {
                let namespace_parts: Vec<&str> = if is_fork {
                    // SCP 포크 표식: 첫 세그먼트가 포크 소유자
                    username = Some(head[0].to_string());
                    head[1..].to_vec()
                } else if FORK_KEYWORDS.contains(&head[0]) && segments.len() >= 3 {
                    is_fork = true;
                    username = Some(head[1].to_string());
                    head[2..].to_vec()
                } else if let Some(user) = &username {
                    std::iter::once(user.as_str())
                        .chain(head.iter().copied())
                        .collect()
                } else {
                    head.to_vec()
                };
                (Some(namespace_parts.join("/")), *repo)
            }
        };

        if repo.is_empty() {
            return None;
        }

        Some(RepoUrl {
            scheme,
            hostname,
            username,
            namespace,
            repo: repo.to_string(),
            is_fork,
        })
    }

    /// 저장소가 속한 forge 인스턴스 URL(`scheme://hostname`).
    pub fn instance_url(&self) -> String {
        format!("{}://{}", self.scheme, self.hostname)
    }

    /// `namespace/repo` 형태의 전체 이름. namespace가 비어 있으면 repo만 반환한다.
    pub fn full_name(&self) -> String {
        match self.namespace.as_deref() {
            Some(ns) if !ns.is_empty() => format!("{ns}/{}", self.repo),
            _ => self.repo.clone(),
        }
    }
}

impl fmt::Display for RepoUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}://{}/", self.scheme, self.hostname)?;
        if self.is_fork
            && let Some(user) = &self.username
        {
            write!(f, "fork/{user}/")?;
        }
        write!(f, "{}", self.full_name())
    }
}

/// `RepoUrl::parse`의 함수형 진입점.
pub fn parse_git_repo(potential_url: &str) -> Option<RepoUrl> {
    RepoUrl::parse(potential_url)
}

/// URL에서 사용자 이름을 추출한다.
pub fn get_username_from_git_url(url: &str) -> Option<String> {
    RepoUrl::parse(url)?.username
}

/// URL에서 저장소 이름을 추출한다.
pub fn get_reponame_from_git_url(url: &str) -> Option<String> {
    RepoUrl::parse(url).map(|parsed| parsed.repo)
}

/// 끝의 `.git`을 한 번만 제거한다.
pub fn strip_dot_git(url: &str) -> &str {
    url.strip_suffix(".git").unwrap_or(url)
}

/// 경로 없이 인스턴스 URL(`https://gitlab.com`)만 주어져도 호스트 이름을 얻는다.
pub fn parse_hostname(url: &str) -> Option<String> {
    if url.is_empty() {
        return None;
    }
    parse_authority(url).map(|authority| authority.hostname)
}

fn parse_authority(raw: &str) -> Option<Authority> {
    let trimmed = raw.strip_suffix('/').unwrap_or(raw);

    // SCP 형식은 '@' 뒤의 host:path만 남긴다. '@'가 여러 개면 모호하다.
    let mut candidate = match trimmed.matches('@').count() {
        0 => trimmed.to_string(),
        1 => {
            let (_, rest) = trimmed.split_once('@')?;
            format!("https://{rest}")
        }
        _ => return None,
    };

    if !KNOWN_SCHEMES
        .iter()
        .any(|scheme| candidate.starts_with(scheme))
    {
        candidate = format!("https://{candidate}");
    }

    let (scheme, rest) = candidate.split_once("://")?;
    let rest = rest.split(['?', '#']).next().unwrap_or_default();
    let (authority, path) = match rest.find('/') {
        Some(idx) => rest.split_at(idx),
        None => (rest, ""),
    };

    let mut parts = authority.split(':');
    let host = parts.next().unwrap_or_default();
    let suffix = parts.next();
    if parts.next().is_some() {
        // host:port:namespace 형태
        return None;
    }

    let hostname = normalize_hostname(host)?;

    // 같은 `host:X` 자리가 포트/포크 표식/사용자 이름 세 가지로 쓰인다.
    // 숫자는 언제나 포트로 본다.
    let mut username = None;
    let mut is_fork = false;
    match suffix {
        None | Some("") => {}
        Some(FORK_MARKER) => is_fork = true,
        Some(port) if port.chars().all(|c| c.is_ascii_digit()) => {}
        Some(user) => username = Some(user.to_string()),
    }

    let path = path.strip_prefix('/').unwrap_or(path);
    let path = strip_dot_git(path);

    Some(Authority {
        scheme: scheme.to_string(),
        hostname,
        username,
        is_fork,
        path: path.to_string(),
    })
}

/// 호스트 문법만 검증하고, 표기는 소문자화 외에는 입력 그대로 둔다(IPv4 축약/IDN 유지).
fn normalize_hostname(host: &str) -> Option<String> {
    if host.is_empty() {
        return None;
    }
    Host::parse(host).ok()?;
    Some(host.to_lowercase())
}
