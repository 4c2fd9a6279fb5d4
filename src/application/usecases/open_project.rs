//! 설정의 인스턴스 테이블을 풀로 사용해 URL의 프로젝트를 열고, 필요하면 메타데이터를 조회한다.

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::config::{Config, ServiceOptions};
use crate::application::registry::ServiceRegistry;
use crate::application::usecases::get_project::{GetProjectUseCase, ProjectQuery, summarize};
use crate::application::usecases::instances_from_config::InstancesFromConfigUseCase;
use crate::domain::project::{ProjectInfo, ProjectSummary};

#[derive(Debug, Clone)]
pub struct OpenProjectOptions {
    pub url: String,
    /// 새 인스턴스를 만들 때 사용할 토큰
    pub token: Option<String>,
    /// 설정 인스턴스 중 매칭이 없으면 실패
    pub strict: bool,
    /// forge API로 메타데이터 조회
    pub fetch: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OpenProjectReport {
    pub project: ProjectSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub info: Option<ProjectInfo>,
}

pub struct OpenProjectUseCase<'a> {
    pub config: &'a Config,
    pub registry: &'a ServiceRegistry,
}

impl<'a> OpenProjectUseCase<'a> {
    pub async fn execute(&self, options: OpenProjectOptions) -> Result<OpenProjectReport> {
        let instances = InstancesFromConfigUseCase {
            registry: self.registry,
        }
        .execute(self.config.instances.clone())
        .context("failed to build service instances from config")?;

        let mut service_options = ServiceOptions::default();
        if let Some(token) = options.token {
            service_options = service_options.with_token(token);
        }

        let project = GetProjectUseCase {
            registry: self.registry,
        }
        .execute(
            &options.url,
            ProjectQuery {
                custom_instances: &instances,
                force_custom_instance: options.strict,
                options: service_options,
                ..ProjectQuery::default()
            },
        )?;

        let info = if options.fetch {
            Some(
                project
                    .fetch_info()
                    .await
                    .with_context(|| format!("failed to fetch project info for {}", options.url))?,
            )
        } else {
            None
        };

        Ok(OpenProjectReport {
            project: summarize(project.as_ref()),
            info,
        })
    }
}
