//! 애플리케이션 유스케이스 모음.

pub mod describe_url;
pub mod get_project;
pub mod inspect_config;
pub mod instances_from_config;
pub mod open_project;
