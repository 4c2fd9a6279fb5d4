//! 애플리케이션 계층이 의존하는 포트(추상 인터페이스) 모음.

use std::fmt;

use anyhow::Result;
use async_trait::async_trait;

use crate::application::config::Config;
use crate::application::registry::ServiceType;
use crate::domain::error::ForgeError;
use crate::domain::project::ProjectInfo;
use crate::domain::repo_url::{RepoUrl, parse_hostname};

/// 설정 로딩/점검을 담당하는 저장소 포트.
pub trait ConfigRepository: Send + Sync {
    fn load(&self) -> Result<Config>;
    /// 탐색/로딩 경로와 인스턴스별 토큰 출처 등 진단 정보(JSON 객체).
    fn inspect(&self) -> Result<serde_json::Value>;
}

/// forge 인스턴스 하나에 연결된 서비스 객체.
/// 코어는 생성자, `instance_url`, `get_project_from_url`만 사용한다.
pub trait GitService: Send + Sync + fmt::Debug {
    fn service_type(&self) -> ServiceType;

    fn instance_url(&self) -> &str;

    /// 인스턴스 URL의 호스트 이름. 커스텀 인스턴스 매칭에 사용한다.
    fn hostname(&self) -> Option<String> {
        parse_hostname(self.instance_url())
    }

    /// (repo, namespace) 좌표로 프로젝트 핸들을 만든다.
    fn get_project(
        &self,
        repo: &str,
        namespace: Option<&str>,
    ) -> Result<Box<dyn GitProject>, ForgeError>;

    /// URL을 다시 해석해 `get_project`로 위임한다.
    fn get_project_from_url(&self, url: &str) -> Result<Box<dyn GitProject>, ForgeError> {
        let repo_url = RepoUrl::parse(url).ok_or_else(|| ForgeError::UnparseableUrl {
            url: url.to_string(),
        })?;
        self.get_project(&repo_url.repo, repo_url.namespace.as_deref())
    }
}

/// 백엔드별 프로젝트 핸들.
#[async_trait]
pub trait GitProject: Send + Sync + fmt::Debug {
    fn service_type(&self) -> ServiceType;
    fn instance_url(&self) -> &str;
    fn namespace(&self) -> Option<&str>;
    fn repo(&self) -> &str;

    /// 포크 소유자(포크가 아니면 None)
    fn fork_owner(&self) -> Option<&str> {
        None
    }

    fn full_repo_name(&self) -> String {
        match self.namespace() {
            Some(ns) if !ns.is_empty() => format!("{ns}/{}", self.repo()),
            _ => self.repo().to_string(),
        }
    }

    fn web_url(&self) -> String {
        format!(
            "{}/{}",
            self.instance_url().trim_end_matches('/'),
            self.full_repo_name()
        )
    }

    /// forge API에서 저장소 메타데이터를 조회한다.
    async fn fetch_info(&self) -> Result<ProjectInfo>;
}
