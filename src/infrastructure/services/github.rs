//! GitHub(및 Enterprise) 백엔드.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use super::{Connection, GITHUB, get_json, require_namespace};
use crate::application::config::ServiceOptions;
use crate::application::ports::{GitProject, GitService};
use crate::application::registry::ServiceType;
use crate::domain::error::ForgeError;
use crate::domain::project::ProjectInfo;
use crate::domain::repo_url::parse_hostname;

pub const DEFAULT_INSTANCE_URL: &str = "https://github.com";

pub fn build(options: ServiceOptions) -> Arc<dyn GitService> {
    Arc::new(GitHubService::new(&options))
}

#[derive(Debug)]
pub struct GitHubService {
    conn: Arc<Connection>,
}

impl GitHubService {
    pub fn new(options: &ServiceOptions) -> Self {
        Self {
            conn: Arc::new(Connection::new(options, DEFAULT_INSTANCE_URL)),
        }
    }

    /// github.com은 공개 API, 그 외는 Enterprise 기본 경로를 사용한다.
    pub fn api_base(&self) -> String {
        self.conn.api_base_or(|instance| {
            if parse_hostname(instance).as_deref() == Some("github.com") {
                "https://api.github.com".to_string()
            } else {
                format!("{instance}/api/v3")
            }
        })
    }

    pub fn project(&self, repo: &str, namespace: Option<&str>) -> Result<GitHubProject, ForgeError> {
        let owner = require_namespace(GITHUB, repo, namespace)?;
        Ok(GitHubProject {
            conn: Arc::clone(&self.conn),
            api_base: self.api_base(),
            owner,
            repo: repo.to_string(),
        })
    }
}

impl GitService for GitHubService {
    fn service_type(&self) -> ServiceType {
        GITHUB
    }

    fn instance_url(&self) -> &str {
        self.conn.instance_url()
    }

    fn get_project(
        &self,
        repo: &str,
        namespace: Option<&str>,
    ) -> Result<Box<dyn GitProject>, ForgeError> {
        Ok(Box::new(self.project(repo, namespace)?))
    }
}

#[derive(Debug)]
pub struct GitHubProject {
    conn: Arc<Connection>,
    api_base: String,
    owner: String,
    repo: String,
}

impl GitHubProject {
    pub fn endpoint(&self) -> String {
        format!("{}/repos/{}/{}", self.api_base, self.owner, self.repo)
    }
}

#[derive(Debug, Deserialize)]
struct RepositoryResponse {
    full_name: String,
    description: Option<String>,
    default_branch: Option<String>,
    html_url: String,
}

#[async_trait]
impl GitProject for GitHubProject {
    fn service_type(&self) -> ServiceType {
        GITHUB
    }

    fn instance_url(&self) -> &str {
        self.conn.instance_url()
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.owner)
    }

    fn repo(&self) -> &str {
        &self.repo
    }

    async fn fetch_info(&self) -> Result<ProjectInfo> {
        let mut req = self
            .conn
            .get(self.endpoint())
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = self.conn.token() {
            req = req.bearer_auth(token);
        }

        let repo: RepositoryResponse = get_json("github", req).await?;
        Ok(ProjectInfo {
            full_name: repo.full_name,
            description: repo.description.filter(|d| !d.is_empty()),
            default_branch: repo.default_branch,
            web_url: repo.html_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_github_uses_api_host() {
        let service = GitHubService::new(&ServiceOptions::default());
        assert_eq!(service.instance_url(), "https://github.com");
        let project = service.project("ogr", Some("packit")).unwrap();
        assert_eq!(project.endpoint(), "https://api.github.com/repos/packit/ogr");
        assert_eq!(project.web_url(), "https://github.com/packit/ogr");
    }

    #[test]
    fn enterprise_uses_v3_path() {
        let service = GitHubService::new(
            &ServiceOptions::default().with_instance_url("https://github.example.com/"),
        );
        assert_eq!(service.api_base(), "https://github.example.com/api/v3");
    }

    #[test]
    fn api_base_override_wins() {
        let service = GitHubService::new(&ServiceOptions {
            api_base: Some("https://gh.local/api/".to_string()),
            ..ServiceOptions::default()
        });
        assert_eq!(service.api_base(), "https://gh.local/api");
    }

    #[test]
    fn project_requires_owner() {
        let service = GitHubService::new(&ServiceOptions::default());
        let err = service.get_project("ogr", None).unwrap_err();
        assert!(matches!(err, ForgeError::InvalidProject { .. }));
    }

    #[test]
    fn project_from_url_keeps_coordinates() {
        let service = GitHubService::new(&ServiceOptions::default());
        let project = service
            .get_project_from_url("git@github.com:packit/ogr.git")
            .unwrap();
        assert_eq!(project.full_repo_name(), "packit/ogr");
        assert_eq!(project.fork_owner(), None);
    }
}
