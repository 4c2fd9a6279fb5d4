//! forgelink library root.
//! git remote URL 해석과 forge 서비스 선택 계층을 외부에 노출한다.

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod interface;

pub use application::config::{Config, ServiceOptions};
pub use application::ports::{GitProject, GitService};
pub use application::registry::{ServiceMapping, ServiceRegistry, ServiceType};
pub use application::usecases::get_project::ProjectQuery;
pub use domain::error::ForgeError;
pub use domain::repo_url::{
    RepoUrl, get_reponame_from_git_url, get_username_from_git_url, parse_git_repo,
};
pub use infrastructure::services::{FORGEJO, GITHUB, GITLAB, PAGURE, default_registry};

use application::usecases::get_project::GetProjectUseCase;

/// 기본 레지스트리로 URL에 맞는 프로젝트 핸들을 만든다.
pub fn get_project(url: &str) -> Result<Box<dyn GitProject>, ForgeError> {
    let registry = default_registry();
    GetProjectUseCase {
        registry: &registry,
    }
    .execute(url, ProjectQuery::default())
}
