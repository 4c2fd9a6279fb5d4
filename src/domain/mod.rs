//! Domain layer
//! 저장소 좌표/오류/프로젝트 정보를 외부 의존성 없이 표현한다.

pub mod error;
pub mod project;
pub mod repo_url;
