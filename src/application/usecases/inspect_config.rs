//! 설정 파일 탐색/병합 결과와 실제 적용된 레지스트리 패턴을 함께 보여주는 유스케이스.

use anyhow::Result;
use serde_json::{Value, json};

use crate::application::ports::ConfigRepository;
use crate::application::registry::ServiceRegistry;

pub struct InspectConfigUseCase<'a> {
    pub config_repo: &'a dyn ConfigRepository,
    pub registry: &'a ServiceRegistry,
}

impl<'a> InspectConfigUseCase<'a> {
    /// 설정 점검 결과를 사람이 읽기 쉬운 JSON 문자열로 만든다.
    /// `registry`는 매칭 순서(첫 매칭 우선) 그대로 나열한다.
    pub fn execute(&self) -> Result<String> {
        let mut report = self.config_repo.inspect()?;

        let patterns: Vec<Value> = self
            .registry
            .patterns()
            .into_iter()
            .map(|(pattern, service)| json!({ "pattern": pattern, "type": service }))
            .collect();
        if let Value::Object(map) = &mut report {
            map.insert("registry".to_string(), Value::Array(patterns));
        }

        Ok(serde_json::to_string_pretty(&report)?)
    }
}
