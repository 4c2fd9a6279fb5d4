//! URL을 해석하고 매칭 서비스를 알려주는 조회 전용 유스케이스.

use serde::Serialize;

use crate::application::registry::ServiceRegistry;
use crate::domain::error::ForgeError;
use crate::domain::repo_url::RepoUrl;

#[derive(Debug, Clone, Serialize)]
pub struct UrlDescription {
    pub repo_url: RepoUrl,
    pub instance_url: String,
    /// 매칭된 서비스 short-name(없으면 None)
    pub service: Option<&'static str>,
}

pub struct DescribeUrlUseCase<'a> {
    pub registry: &'a ServiceRegistry,
}

impl<'a> DescribeUrlUseCase<'a> {
    pub fn execute(&self, url: &str) -> Result<UrlDescription, ForgeError> {
        let repo_url = RepoUrl::parse(url).ok_or_else(|| ForgeError::UnparseableUrl {
            url: url.to_string(),
        })?;

        Ok(UrlDescription {
            instance_url: repo_url.instance_url(),
            service: self.registry.resolve(url, None).map(|s| s.name()),
            repo_url,
        })
    }
}
