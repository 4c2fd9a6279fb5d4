//! forge에서 조회한 프로젝트 메타데이터 값 객체.

use serde::Serialize;

/// 백엔드가 반환한 저장소 정보를 공통 형태로 정규화한 값.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectInfo {
    pub full_name: String,
    pub description: Option<String>,
    pub default_branch: Option<String>,
    pub web_url: String,
}

/// 해석된 프로젝트 핸들을 출력용으로 요약한 값.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectSummary {
    pub service: String,
    pub instance_url: String,
    pub namespace: Option<String>,
    pub repo: String,
    pub full_name: String,
    pub fork_owner: Option<String>,
    pub web_url: String,
}
