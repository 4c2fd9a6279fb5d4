//! GitLab 백엔드.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Deserialize;

use super::{Connection, GITLAB, get_json, require_namespace};
use crate::application::config::ServiceOptions;
use crate::application::ports::{GitProject, GitService};
use crate::application::registry::ServiceType;
use crate::domain::error::ForgeError;
use crate::domain::project::ProjectInfo;

pub const DEFAULT_INSTANCE_URL: &str = "https://gitlab.com";

pub fn build(options: ServiceOptions) -> Arc<dyn GitService> {
    Arc::new(GitLabService::new(&options))
}

#[derive(Debug)]
pub struct GitLabService {
    conn: Arc<Connection>,
}

impl GitLabService {
    pub fn new(options: &ServiceOptions) -> Self {
        Self {
            conn: Arc::new(Connection::new(options, DEFAULT_INSTANCE_URL)),
        }
    }

    pub fn api_base(&self) -> String {
        self.conn.api_base_or(|instance| format!("{instance}/api/v4"))
    }

    pub fn project(&self, repo: &str, namespace: Option<&str>) -> Result<GitLabProject, ForgeError> {
        // 중첩 그룹은 namespace에 그대로 남는다(a/b/c).
        let namespace = require_namespace(GITLAB, repo, namespace)?;
        Ok(GitLabProject {
            conn: Arc::clone(&self.conn),
            api_base: self.api_base(),
            namespace,
            repo: repo.to_string(),
        })
    }
}

impl GitService for GitLabService {
    fn service_type(&self) -> ServiceType {
        GITLAB
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
pub struct GitLabProject {
    conn: Arc<Connection>,
    api_base: String,
    namespace: String,
    repo: String,
}

impl GitLabProject {
    /// /projects/{path} API 규격에 맞춰 전체 경로를 URL 인코딩한다.
    pub fn endpoint(&self) -> String {
        let path = format!("{}/{}", self.namespace, self.repo);
        format!(
            "{}/projects/{}",
            self.api_base,
            utf8_percent_encode(&path, NON_ALPHANUMERIC)
        )
    }
}

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    path_with_namespace: String,
    description: Option<String>,
    default_branch: Option<String>,
    web_url: String,
}

#[async_trait]
impl GitProject for GitLabProject {
    fn service_type(&self) -> ServiceType {
        GITLAB
    }

    fn instance_url(&self) -> &str {
        self.conn.instance_url()
    }

    fn namespace(&self) -> Option<&str> {
        Some(&self.namespace)
    }

    fn repo(&self) -> &str {
        &self.repo
    }

    async fn fetch_info(&self) -> Result<ProjectInfo> {
        let mut req = self.conn.get(self.endpoint());
        if let Some(token) = self.conn.token() {
            req = req.header("PRIVATE-TOKEN", token);
        }

        let project: ProjectResponse = get_json("gitlab", req).await?;
        Ok(ProjectInfo {
            full_name: project.path_with_namespace,
            description: project.description.filter(|d| !d.is_empty()),
            default_branch: project.default_branch,
            web_url: project.web_url,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_groups_are_encoded() {
        let service = GitLabService::new(
            &ServiceOptions::default().with_instance_url("https://gitlab.gnome.org"),
        );
        let project = service
            .get_project_from_url("https://gitlab.gnome.org/GNOME/World/apostrophe.git")
            .unwrap();
        assert_eq!(project.namespace(), Some("GNOME/World"));
        assert_eq!(
            project.web_url(),
            "https://gitlab.gnome.org/GNOME/World/apostrophe"
        );

        let project = service.project("apostrophe", Some("GNOME/World")).unwrap();
        assert_eq!(
            project.endpoint(),
            "https://gitlab.gnome.org/api/v4/projects/GNOME%2FWorld%2Fapostrophe"
        );
    }

    #[test]
    fn default_instance_is_gitlab_com() {
        let service = GitLabService::new(&ServiceOptions::default());
        assert_eq!(service.api_base(), "https://gitlab.com/api/v4");
    }

    #[test]
    fn project_requires_namespace() {
        let service = GitLabService::new(&ServiceOptions::default());
        assert!(service.get_project("repo", Some("")).is_err());
    }
}
