//! URL → 프로젝트 핸들 해석 유스케이스.
//!
//! 파서와 레지스트리를 조합하고, 호출자가 넘긴 서비스 인스턴스 풀이 있으면 재사용한다.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::config::ServiceOptions;
use crate::application::ports::{GitProject, GitService};
use crate::application::registry::{ServiceMapping, ServiceRegistry};
use crate::domain::error::ForgeError;
use crate::domain::project::ProjectSummary;
use crate::domain::repo_url::RepoUrl;

/// `GetProjectUseCase::execute`의 선택 인자.
pub struct ProjectQuery<'q> {
    /// 레지스트리 위에 겹칠 패턴 → 서비스 타입 매핑
    pub overrides: Option<&'q ServiceMapping>,
    /// 이미 생성된 서비스 인스턴스 풀
    pub custom_instances: &'q [Arc<dyn GitService>],
    /// 풀이 주어졌는데 매칭 인스턴스가 없으면 새로 만들지 않고 오류로 처리(기본 true)
    pub force_custom_instance: bool,
    /// 새 인스턴스 생성 시 전달할 인자
    pub options: ServiceOptions,
}

impl Default for ProjectQuery<'_> {
    fn default() -> Self {
        Self {
            overrides: None,
            custom_instances: &[],
            force_custom_instance: true,
            options: ServiceOptions::default(),
        }
    }
}

pub struct GetProjectUseCase<'a> {
    pub registry: &'a ServiceRegistry,
}

impl<'a> GetProjectUseCase<'a> {
    /// URL에 맞는 서비스를 골라 프로젝트 핸들을 반환한다.
    pub fn execute(
        &self,
        url: &str,
        query: ProjectQuery<'_>,
    ) -> Result<Box<dyn GitProject>, ForgeError> {
        // 풀이 있을 때만 overrides를 복사해 인스턴스 호스트를 덧붙인다.
        let pool_mapping = (!query.custom_instances.is_empty())
            .then(|| pool_overrides(query.overrides, query.custom_instances));
        let overrides = pool_mapping.as_ref().or(query.overrides);

        let service_type = self.registry.resolve_or_fail(url, overrides)?;

        // 서비스 매칭은 호스트 기준이라 경로 해석 실패와는 별개다.
        let repo_url = RepoUrl::parse(url).ok_or_else(|| ForgeError::UnparseableUrl {
            url: url.to_string(),
        })?;

        let pooled = query.custom_instances.iter().find(|instance| {
            instance.service_type() == service_type
                && instance.hostname().as_deref() == Some(repo_url.hostname.as_str())
        });

        let service = match pooled {
            Some(instance) => {
                debug!(url, instance_url = instance.instance_url(), "using custom instance");
                Arc::clone(instance)
            }
            None if query.force_custom_instance && !query.custom_instances.is_empty() => {
                return Err(ForgeError::InstanceNotProvided {
                    service: service_type.name().to_string(),
                    url: url.to_string(),
                });
            }
            None => {
                let instance_url = repo_url.instance_url();
                debug!(url, instance_url = %instance_url, service = service_type.name(), "constructing service");
                service_type.build(query.options.with_instance_url(instance_url))
            }
        };

        service.get_project_from_url(url)
    }
}

/// 출력용 요약을 만든다.
pub fn summarize(project: &dyn GitProject) -> ProjectSummary {
    ProjectSummary {
        service: project.service_type().name().to_string(),
        instance_url: project.instance_url().to_string(),
        namespace: project.namespace().map(ToString::to_string),
        repo: project.repo().to_string(),
        full_name: project.full_repo_name(),
        fork_owner: project.fork_owner().map(ToString::to_string),
        web_url: project.web_url(),
    }
}

fn pool_overrides(
    overrides: Option<&ServiceMapping>,
    instances: &[Arc<dyn GitService>],
) -> ServiceMapping {
    let mut mapping = overrides.cloned().unwrap_or_default();
    for instance in instances {
        match instance.hostname() {
            Some(hostname) => mapping.insert(hostname, instance.service_type()),
            None => warn!(
                instance_url = instance.instance_url(),
                "custom instance has no hostname; check instance_url"
            ),
        }
    }
    mapping
}
