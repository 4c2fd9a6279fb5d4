//! 애플리케이션 조립(composition root) 모듈.

use anyhow::{Context, Result};

use crate::application::config::Config;
use crate::application::ports::ConfigRepository;
use crate::application::registry::ServiceRegistry;
use crate::application::usecases::describe_url::DescribeUrlUseCase;
use crate::application::usecases::get_project::GetProjectUseCase;
use crate::application::usecases::inspect_config::InspectConfigUseCase;
use crate::application::usecases::instances_from_config::InstancesFromConfigUseCase;
use crate::application::usecases::open_project::OpenProjectUseCase;
use crate::infrastructure::adapters::JsonConfigRepository;
use crate::infrastructure::services::default_registry;

/// 실행 시점 의존성을 한 곳에서 조립하는 컨테이너.
pub struct AppComposition {
    config_repo: JsonConfigRepository,
    config: Config,
    registry: ServiceRegistry,
}

impl Default for AppComposition {
    /// 기본 백엔드만 등록하고 설정 파일은 읽지 않는다.
    fn default() -> Self {
        Self {
            config_repo: JsonConfigRepository,
            config: Config::default(),
            registry: default_registry(),
        }
    }
}

impl AppComposition {
    /// 설정 파일을 병합해 읽고, 추가 호스트 패턴을 레지스트리에 등록한다.
    pub fn load() -> Result<Self> {
        let config_repo = JsonConfigRepository;
        let config = config_repo.load()?;
        Self::with_config(config)
    }

    /// 주어진 설정으로 조립한다(테스트/라이브러리 호출용).
    pub fn with_config(config: Config) -> Result<Self> {
        let registry = default_registry();
        registry
            .register_patterns(&config.services)
            .context("invalid `services` entry in config")?;

        Ok(Self {
            config_repo: JsonConfigRepository,
            config,
            registry,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn registry(&self) -> &ServiceRegistry {
        &self.registry
    }

    pub fn describe_url_usecase(&self) -> DescribeUrlUseCase<'_> {
        DescribeUrlUseCase {
            registry: &self.registry,
        }
    }

    pub fn get_project_usecase(&self) -> GetProjectUseCase<'_> {
        GetProjectUseCase {
            registry: &self.registry,
        }
    }

    pub fn instances_usecase(&self) -> InstancesFromConfigUseCase<'_> {
        InstancesFromConfigUseCase {
            registry: &self.registry,
        }
    }

    /// 설정 인스턴스 풀을 사용하는 프로젝트 열기 유스케이스를 생성한다.
    pub fn open_project_usecase(&self) -> OpenProjectUseCase<'_> {
        OpenProjectUseCase {
            config: &self.config,
            registry: &self.registry,
        }
    }

    /// 설정 점검 유스케이스를 생성한다.
    pub fn inspect_config_usecase(&self) -> InspectConfigUseCase<'_> {
        InspectConfigUseCase {
            config_repo: &self.config_repo,
            registry: &self.registry,
        }
    }
}
