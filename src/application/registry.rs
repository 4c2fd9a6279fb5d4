//! 호스트 패턴 → 서비스 타입 레지스트리와 URL 기반 서비스 선택.
//!
//! 패턴은 정규식이 아닌 부분 문자열이며, 삽입 순서상 처음 매칭된 항목이 이긴다.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, PoisonError, RwLock};

use tracing::debug;

use crate::application::config::{ServiceOptions, ServicePatternConfig};
use crate::application::ports::GitService;
use crate::domain::error::ForgeError;

/// 서비스 생성자. 설정 인자를 그대로 받아 인스턴스를 만든다.
pub type ServiceConstructor = fn(ServiceOptions) -> Arc<dyn GitService>;

/// 생성 가능한 서비스 타입 서술자. 동일성은 `name`으로 판단한다.
#[derive(Clone, Copy)]
pub struct ServiceType {
    name: &'static str,
    build: ServiceConstructor,
}

impl ServiceType {
    pub const fn new(name: &'static str, build: ServiceConstructor) -> Self {
        Self { name, build }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn build(&self, options: ServiceOptions) -> Arc<dyn GitService> {
        (self.build)(options)
    }
}

impl PartialEq for ServiceType {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
    }
}

impl Eq for ServiceType {}

impl Hash for ServiceType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.name.hash(state);
    }
}

impl fmt::Debug for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ServiceType").field(&self.name).finish()
    }
}

impl fmt::Display for ServiceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// 삽입 순서를 유지하는 패턴 → 서비스 타입 테이블.
#[derive(Debug, Clone, Default)]
pub struct ServiceMapping {
    entries: Vec<(String, ServiceType)>,
}

impl ServiceMapping {
    pub fn new() -> Self {
        Self::default()
    }

    /// 이미 있는 패턴은 자리를 유지한 채 값만 교체하고, 새 패턴은 뒤에 붙인다.
    pub fn insert(&mut self, pattern: impl Into<String>, service: ServiceType) {
        let pattern = pattern.into();
        if let Some(entry) = self.entries.iter_mut().find(|(p, _)| *p == pattern) {
            entry.1 = service;
        } else {
            self.entries.push((pattern, service));
        }
    }

    pub fn get(&self, pattern: &str) -> Option<ServiceType> {
        self.entries
            .iter()
            .find(|(p, _)| p == pattern)
            .map(|(_, service)| *service)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, ServiceType)> + '_ {
        self.entries
            .iter()
            .map(|(pattern, service)| (pattern.as_str(), *service))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<P: Into<String>> FromIterator<(P, ServiceType)> for ServiceMapping {
    fn from_iter<I: IntoIterator<Item = (P, ServiceType)>>(iter: I) -> Self {
        let mut mapping = Self::new();
        for (pattern, service) in iter {
            mapping.insert(pattern, service);
        }
        mapping
    }
}

/// 프로세스 수준 서비스 레지스트리.
/// 시작 시점에 등록하고 이후에는 읽기만 하지만, 늦은 등록과 조회가 섞여도 안전하도록
/// `RwLock`으로 감싼다.
#[derive(Debug, Default)]
pub struct ServiceRegistry {
    mapping: RwLock<ServiceMapping>,
}

impl ServiceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 패턴을 등록한다. 같은 패턴은 마지막 등록이 이긴다.
    pub fn register(&self, pattern: impl Into<String>, service: ServiceType) {
        let pattern = pattern.into();
        debug!(pattern = %pattern, service = service.name(), "registering service pattern");
        self.mapping
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(pattern, service);
    }

    /// 설정 파일의 추가 패턴을 서비스 short-name으로 찾아 등록한다.
    pub fn register_patterns(&self, patterns: &[ServicePatternConfig]) -> Result<(), ForgeError> {
        for entry in patterns {
            let service = self.find_by_name(&entry.service_type).ok_or_else(|| {
                ForgeError::UnknownServiceType {
                    service_type: entry.service_type.clone(),
                }
            })?;
            self.register(entry.pattern.clone(), service);
        }
        Ok(())
    }

    /// URL에 부분 문자열로 포함된 첫 패턴의 서비스 타입을 반환한다.
    ///
    /// `overrides`는 레지스트리를 복사하지 않는 겹침 뷰로 적용된다.
    /// 레지스트리 순서대로 순회하며 같은 패턴은 override 값으로 대체하고,
    /// 레지스트리에 없는 override 패턴은 그 뒤에 자체 순서로 이어진다.
    pub fn resolve(&self, url: &str, overrides: Option<&ServiceMapping>) -> Option<ServiceType> {
        let registry = self.mapping.read().unwrap_or_else(PoisonError::into_inner);

        let overlaid = registry.iter().map(|(pattern, service)| {
            let service = overrides
                .and_then(|o| o.get(pattern))
                .unwrap_or(service);
            (pattern, service)
        });
        let extra = overrides
            .into_iter()
            .flat_map(|o| o.iter())
            .filter(|(pattern, _)| registry.get(pattern).is_none());

        let found = overlaid
            .chain(extra)
            .find(|(pattern, _)| url.contains(pattern));

        match found {
            Some((pattern, service)) => {
                debug!(url, pattern, service = service.name(), "resolved service");
                Some(service)
            }
            None => {
                debug!(url, "no service pattern matched");
                None
            }
        }
    }

    /// `resolve`와 같지만 매칭이 없으면 오류를 반환한다.
    pub fn resolve_or_fail(
        &self,
        url: &str,
        overrides: Option<&ServiceMapping>,
    ) -> Result<ServiceType, ForgeError> {
        self.resolve(url, overrides)
            .ok_or_else(|| ForgeError::NoMatchingService {
                url: url.to_string(),
            })
    }

    /// 등록된 서비스 중 short-name이 일치하는 타입을 찾는다(대소문자 무시).
    pub fn find_by_name(&self, name: &str) -> Option<ServiceType> {
        let registry = self.mapping.read().unwrap_or_else(PoisonError::into_inner);
        registry
            .iter()
            .map(|(_, service)| service)
            .find(|service| service.name().eq_ignore_ascii_case(name.trim()))
    }

    /// 진단용 (패턴, 서비스 이름) 스냅샷.
    pub fn patterns(&self) -> Vec<(String, &'static str)> {
        let registry = self.mapping.read().unwrap_or_else(PoisonError::into_inner);
        registry
            .iter()
            .map(|(pattern, service)| (pattern.to_string(), service.name()))
            .collect()
    }
}
