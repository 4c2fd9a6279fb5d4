//! Pagure 백엔드(src.fedoraproject.org, pagure.io, git.centos.org 등).
//!
//! Pagure는 namespace가 없는 프로젝트와 `fork/{user}/...` 형태의 포크 경로를 지원한다.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use super::{Connection, PAGURE, get_json};
use crate::application::config::ServiceOptions;
use crate::application::ports::{GitProject, GitService};
use crate::application::registry::ServiceType;
use crate::domain::error::ForgeError;
use crate::domain::project::ProjectInfo;
use crate::domain::repo_url::RepoUrl;

pub const DEFAULT_INSTANCE_URL: &str = "https://src.fedoraproject.org";

pub fn build(options: ServiceOptions) -> Arc<dyn GitService> {
    Arc::new(PagureService::new(&options))
}

#[derive(Debug)]
pub struct PagureService {
    conn: Arc<Connection>,
}

impl PagureService {
    pub fn new(options: &ServiceOptions) -> Self {
        Self {
            conn: Arc::new(Connection::new(options, DEFAULT_INSTANCE_URL)),
        }
    }

    pub fn api_base(&self) -> String {
        self.conn.api_base_or(|instance| format!("{instance}/api/0"))
    }

    /// `fork_owner`가 있으면 해당 사용자의 포크를 가리킨다.
    pub fn project(
        &self,
        repo: &str,
        namespace: Option<&str>,
        fork_owner: Option<&str>,
    ) -> PagureProject {
        PagureProject {
            conn: Arc::clone(&self.conn),
            api_base: self.api_base(),
            namespace: namespace
                .map(str::trim)
                .filter(|ns| !ns.is_empty())
                .map(ToString::to_string),
            repo: repo.to_string(),
            fork_owner: fork_owner.map(ToString::to_string),
        }
    }
}

impl GitService for PagureService {
    fn service_type(&self) -> ServiceType {
        PAGURE
    }

    fn instance_url(&self) -> &str {
        self.conn.instance_url()
    }

    fn get_project(
        &self,
        repo: &str,
        namespace: Option<&str>,
    ) -> Result<Box<dyn GitProject>, ForgeError> {
        Ok(Box::new(self.project(repo, namespace, None)))
    }

    /// 포크 URL이면 사용자 이름을 포크 소유자로 유지한다.
    fn get_project_from_url(&self, url: &str) -> Result<Box<dyn GitProject>, ForgeError> {
        let repo_url = RepoUrl::parse(url).ok_or_else(|| ForgeError::UnparseableUrl {
            url: url.to_string(),
        })?;
        let fork_owner = repo_url
            .username
            .as_deref()
            .filter(|_| repo_url.is_fork);
        Ok(Box::new(self.project(
            &repo_url.repo,
            repo_url.namespace.as_deref(),
            fork_owner,
        )))
    }
}

#[derive(Debug)]
pub struct PagureProject {
    conn: Arc<Connection>,
    api_base: String,
    namespace: Option<String>,
    repo: String,
    fork_owner: Option<String>,
}

impl PagureProject {
    /// `[fork/{user}/]{namespace}/{repo}` 형태의 상대 경로.
    fn path(&self) -> String {
        let mut parts: Vec<&str> = Vec::with_capacity(4);
        if let Some(owner) = &self.fork_owner {
            parts.extend(["fork", owner.as_str()]);
        }
        if let Some(ns) = &self.namespace {
            parts.push(ns);
        }
        parts.push(&self.repo);
        parts.join("/")
    }

    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.api_base, self.path())
    }
}

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    fullname: String,
    description: Option<String>,
    full_url: Option<String>,
}

#[async_trait]
impl GitProject for PagureProject {
    fn service_type(&self) -> ServiceType {
        PAGURE
    }

    fn instance_url(&self) -> &str {
        self.conn.instance_url()
    }

    fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    fn repo(&self) -> &str {
        &self.repo
    }

    fn fork_owner(&self) -> Option<&str> {
        self.fork_owner.as_deref()
    }

    fn web_url(&self) -> String {
        format!("{}/{}", self.conn.instance_url(), self.path())
    }

    async fn fetch_info(&self) -> Result<ProjectInfo> {
        let mut req = self.conn.get(self.endpoint());
        if let Some(token) = self.conn.token() {
            req = req.header("Authorization", format!("token {token}"));
        }

        let project: ProjectResponse = get_json("pagure", req).await?;
        Ok(ProjectInfo {
            full_name: project.fullname,
            description: project.description.filter(|d| !d.is_empty()),
            // 프로젝트 API는 기본 브랜치를 돌려주지 않는다.
            default_branch: None,
            web_url: project.full_url.unwrap_or_else(|| self.web_url()),
        })
    }
}
