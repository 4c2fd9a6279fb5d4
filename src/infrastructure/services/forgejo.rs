//! Forgejo(Gitea 호환) 백엔드.

use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use serde::Deserialize;

use super::{Connection, FORGEJO, get_json, require_namespace};
use crate::application::config::ServiceOptions;
use crate::application::ports::{GitProject, GitService};
use crate::application::registry::ServiceType;
use crate::domain::error::ForgeError;
use crate::domain::project::ProjectInfo;

pub const DEFAULT_INSTANCE_URL: &str = "https://codeberg.org";

pub fn build(options: ServiceOptions) -> Arc<dyn GitService> {
    Arc::new(ForgejoService::new(&options))
}

#[derive(Debug)]
pub struct ForgejoService {
    conn: Arc<Connection>,
}

impl ForgejoService {
    pub fn new(options: &ServiceOptions) -> Self {
        Self {
            conn: Arc::new(Connection::new(options, DEFAULT_INSTANCE_URL)),
        }
    }

    pub fn api_base(&self) -> String {
        self.conn.api_base_or(|instance| format!("{instance}/api/v1"))
    }

    pub fn project(&self, repo: &str, namespace: Option<&str>) -> Result<ForgejoProject, ForgeError> {
        let owner = require_namespace(FORGEJO, repo, namespace)?;
        Ok(ForgejoProject {
            conn: Arc::clone(&self.conn),
            api_base: self.api_base(),
            owner,
            repo: repo.to_string(),
        })
    }
}

impl GitService for ForgejoService {
    fn service_type(&self) -> ServiceType {
        FORGEJO
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
pub struct ForgejoProject {
    conn: Arc<Connection>,
    api_base: String,
    owner: String,
    repo: String,
}

impl ForgejoProject {
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
impl GitProject for ForgejoProject {
    fn service_type(&self) -> ServiceType {
        FORGEJO
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
        let mut req = self.conn.get(self.endpoint());
        if let Some(token) = self.conn.token() {
            req = req.header("Authorization", format!("token {token}"));
        }

        let repo: RepositoryResponse = get_json("forgejo", req).await?;
        Ok(ProjectInfo {
            full_name: repo.full_name,
            description: repo.description.filter(|d| !d.is_empty()),
            default_branch: repo.default_branch,
            web_url: repo.html_url,
        })
    }
}
