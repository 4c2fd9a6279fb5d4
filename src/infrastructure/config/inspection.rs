//! 적용 설정 진단(inspection) 뷰 모델.

use std::collections::BTreeMap;

use serde::Serialize;

use super::loader::LoadedConfig;
use super::resolve::resolve_service_token;
use super::utils::token_command_available;
use crate::application::config::{ServiceOptions, ServicePatternConfig};

#[derive(Debug, Clone, Serialize)]
pub struct ConfigInspection {
    pub searched_paths: Vec<String>,
    pub loaded_paths: Vec<String>,
    pub services: Vec<ServicePatternConfig>,
    pub instances: BTreeMap<String, InstanceInspection>,
}

/// 인스턴스 설정 진단. 토큰 값 자체는 절대 포함하지 않는다.
#[derive(Debug, Clone, Serialize)]
pub struct InstanceInspection {
    pub service_type: Option<String>,
    pub instance_url: Option<String>,
    pub api_base: Option<String>,
    pub token_source: Option<String>,
    pub token_resolved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_command_available: Option<bool>,
}

impl ConfigInspection {
    pub(crate) fn from_loaded(loaded: LoadedConfig) -> Self {
        let instances = loaded
            .config
            .instances
            .iter()
            .map(|(key, options)| (key.clone(), instance_inspection(options)))
            .collect();

        Self {
            searched_paths: loaded
                .searched_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            loaded_paths: loaded
                .loaded_paths
                .iter()
                .map(|p| p.display().to_string())
                .collect(),
            services: loaded.config.services,
            instances,
        }
    }
}

fn instance_inspection(options: &ServiceOptions) -> InstanceInspection {
    let token = resolve_service_token(options);
    InstanceInspection {
        service_type: options.service_type.clone(),
        instance_url: options.instance_url.clone(),
        api_base: options.api_base.clone(),
        token_source: token.source,
        token_resolved: token.token.is_some(),
        token_command_available: options
            .token_command
            .as_deref()
            .map(token_command_available),
    }
}
