//! 설정 테이블(키 → 생성 인자)에서 서비스 인스턴스 집합을 만드는 유스케이스.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use crate::application::config::ServiceOptions;
use crate::application::ports::GitService;
use crate::application::registry::{ServiceRegistry, ServiceType};
use crate::domain::error::ForgeError;

pub struct InstancesFromConfigUseCase<'a> {
    pub registry: &'a ServiceRegistry,
}

impl<'a> InstancesFromConfigUseCase<'a> {
    /// 키(호스트/URL/이름)를 URL처럼 매칭해 서비스 타입을 정하고 인스턴스를 생성한다.
    ///
    /// 키로 정할 수 없으면 `type` 필드가 필요하고, 이때 키가 인스턴스 URL 기본값이 된다.
    /// `type`은 생성 전에 제거한다. 결과는 (서비스 타입, 인스턴스 URL) 기준으로 중복 제거된다.
    pub fn execute<I, K>(&self, entries: I) -> Result<Vec<Arc<dyn GitService>>, ForgeError>
    where
        I: IntoIterator<Item = (K, ServiceOptions)>,
        K: AsRef<str>,
    {
        let mut seen: HashSet<(ServiceType, String)> = HashSet::new();
        let mut services = Vec::new();

        for (key, mut options) in entries {
            let key = key.as_ref();
            let explicit_type = options.service_type.take();

            let (service_type, key_is_instance) = match self.registry.resolve(key, None) {
                // 키가 이미 매칭되면 `type`은 무시하고, 키가 완전한 URL일 때만 인스턴스 주소로 쓴다.
                Some(service_type) => (service_type, explicit_type.is_some() && key.contains("://")),
                None => {
                    let Some(type_name) = explicit_type.as_deref() else {
                        return Err(ForgeError::UnresolvableConfigEntry {
                            key: key.to_string(),
                        });
                    };
                    (self.resolve_type_name(type_name)?, true)
                }
            };

            if key_is_instance && options.instance_url.is_none() {
                options.instance_url = Some(key.to_string());
            }

            let service = service_type.build(options);
            debug!(
                key,
                service = service_type.name(),
                instance_url = service.instance_url(),
                "service instance created from config"
            );
            if seen.insert((service_type, service.instance_url().to_string())) {
                services.push(service);
            }
        }

        Ok(services)
    }

    /// `type` 값은 호스트/URL 패턴으로 먼저 매칭하고, 없으면 short-name으로 찾는다.
    fn resolve_type_name(&self, type_name: &str) -> Result<ServiceType, ForgeError> {
        self.registry
            .resolve(type_name, None)
            .or_else(|| self.registry.find_by_name(type_name))
            .ok_or_else(|| ForgeError::UnknownServiceType {
                service_type: type_name.to_string(),
            })
    }
}
