//! 애플리케이션이 사용하는 설정 스키마(순수 데이터).
//!
//! 주의: 파일/환경변수/프로세스 접근은 `infrastructure`에서만 수행한다.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    /// 기본 레지스트리 뒤에 추가 등록할 호스트 패턴(순서 유지)
    #[serde(default)]
    pub services: Vec<ServicePatternConfig>,
    /// 호스트/URL/이름 → 서비스 생성 인자 테이블
    #[serde(default)]
    pub instances: BTreeMap<String, ServiceOptions>,
}

#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct ServicePatternConfig {
    /// URL에 부분 문자열로 매칭할 패턴
    pub pattern: String,
    /// 서비스 short-name(github/gitlab/pagure/forgejo)
    #[serde(rename = "type")]
    pub service_type: String,
}

/// 서비스 생성자에 그대로 전달되는 인자.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
pub struct ServiceOptions {
    /// forge 인스턴스 URL(미지정 시 서비스 기본값)
    pub instance_url: Option<String>,
    /// 고정 토큰(민감정보: 권장하지 않음)
    pub token: Option<String>,
    /// 토큰을 읽을 환경변수 이름
    pub token_env: Option<String>,
    /// 토큰을 stdout으로 출력하는 커맨드(예: ["glab","auth","token"])
    pub token_command: Option<Vec<String>>,
    /// API base URL override(선택)
    pub api_base: Option<String>,
    /// 키만으로 서비스를 알 수 없을 때 지정하는 서비스 타입(생성 전에 제거됨)
    #[serde(rename = "type")]
    pub service_type: Option<String>,
}

impl ServiceOptions {
    pub fn with_instance_url(mut self, instance_url: impl Into<String>) -> Self {
        self.instance_url = Some(instance_url.into());
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    pub(crate) fn merge_from(&mut self, other: ServiceOptions) {
        if other.instance_url.is_some() {
            self.instance_url = other.instance_url;
        }
        if other.token.is_some() {
            self.token = other.token;
        }
        if other.token_env.is_some() {
            self.token_env = other.token_env;
        }
        if other.token_command.is_some() {
            self.token_command = other.token_command;
        }
        if other.api_base.is_some() {
            self.api_base = other.api_base;
        }
        if other.service_type.is_some() {
            self.service_type = other.service_type;
        }
    }
}

impl Config {
    /// 후순위(나중 파일) 값으로 덮어쓰는 병합 규칙.
    /// 패턴은 뒤에 이어 붙이고(같은 패턴은 등록 시 교체), 인스턴스는 키 단위로 병합한다.
    pub(crate) fn merge_from(&mut self, other: Config) {
        self.services.extend(other.services);

        for (key, incoming) in other.instances {
            if let Some(existing) = self.instances.get_mut(&key) {
                existing.merge_from(incoming);
            } else {
                self.instances.insert(key, incoming);
            }
        }
    }
}
