//! URL 해석/서비스 선택 과정에서 발생하는 오류 분류.

use thiserror::Error;

/// 코어(파서/레지스트리/리졸버)가 호출자에게 그대로 전달하는 오류.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ForgeError {
    #[error("no repository could be identified from URL: {url}")]
    UnparseableUrl { url: String },

    #[error("No matching service was found.")]
    NoMatchingService { url: String },

    #[error("Instance of type {service} matching instance URL '{url}' was not provided.")]
    InstanceNotProvided { service: String, url: String },

    #[error(
        "No matching service was found for url '{key}'. Add the service name as a `type` attribute."
    )]
    UnresolvableConfigEntry { key: String },

    #[error("No matching service was found for type '{service_type}'.")]
    UnknownServiceType { service_type: String },

    #[error("invalid project coordinates: {message}")]
    InvalidProject { message: String },
}

impl ForgeError {
    /// 설정/인스턴스 풀 구성 문제인지 여부.
    /// 지원하지 않는 forge(`NoMatchingService`)와 구분할 때 사용한다.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            ForgeError::InstanceNotProvided { .. }
                | ForgeError::UnresolvableConfigEntry { .. }
                | ForgeError::UnknownServiceType { .. }
        )
    }
}
