use std::fs;
use std::sync::Arc;

use forgelink::application::usecases::instances_from_config::InstancesFromConfigUseCase;
use forgelink::application::usecases::open_project::OpenProjectOptions;
use forgelink::infrastructure::config::load_from_paths;
use forgelink::interface::composition::AppComposition;
use forgelink::{FORGEJO, GITHUB, GITLAB, GitService, PAGURE, ServiceOptions, default_registry};

fn token(value: &str) -> ServiceOptions {
    ServiceOptions::default().with_token(value)
}

fn instances(entries: Vec<(&str, ServiceOptions)>) -> Vec<Arc<dyn GitService>> {
    let registry = default_registry();
    InstancesFromConfigUseCase {
        registry: &registry,
    }
    .execute(entries)
    .unwrap()
}

fn coordinates(services: &[Arc<dyn GitService>]) -> Vec<(&'static str, String)> {
    let mut out: Vec<_> = services
        .iter()
        .map(|s| (s.service_type().name(), s.instance_url().to_string()))
        .collect();
    out.sort();
    out
}

#[test]
fn empty_table_gives_no_instances() {
    assert!(instances(vec![]).is_empty());
}

#[test]
fn keys_resolve_like_urls() {
    assert_eq!(
        coordinates(&instances(vec![("github.com", token("abcd"))])),
        vec![("github", "https://github.com".to_string())]
    );
    assert_eq!(
        coordinates(&instances(vec![("gitlab", token("abcd"))])),
        vec![("gitlab", "https://gitlab.com".to_string())]
    );
    assert_eq!(
        coordinates(&instances(vec![("pagure", token("abcd"))])),
        vec![("pagure", "https://src.fedoraproject.org".to_string())]
    );
    assert_eq!(
        coordinates(&instances(vec![(
            "pagure",
            token("abcd").with_instance_url("https://src.fedoraproject.org")
        )])),
        vec![("pagure", "https://src.fedoraproject.org".to_string())]
    );
    assert_eq!(
        coordinates(&instances(vec![
            ("github.com", token("abcd")),
            ("gitlab", token("abcd")),
        ])),
        vec![
            ("github", "https://github.com".to_string()),
            ("gitlab", "https://gitlab.com".to_string()),
        ]
    );
}

#[test]
fn explicit_type_defaults_instance_url_to_key() {
    let options = ServiceOptions {
        token: Some("abcd".to_string()),
        service_type: Some("gitlab".to_string()),
        ..ServiceOptions::default()
    };
    let services = instances(vec![("https://my.gtlb", options)]);

    assert_eq!(services.len(), 1);
    assert_eq!(services[0].service_type(), GITLAB);
    assert_eq!(services[0].instance_url(), "https://my.gtlb");
    assert_eq!(services[0].hostname().as_deref(), Some("my.gtlb"));
}

#[test]
fn type_on_resolved_host_key_keeps_default_instance() {
    let options = ServiceOptions {
        service_type: Some("github".to_string()),
        ..token("abcd")
    };
    let services = instances(vec![("github.com", options)]);
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].service_type(), GITHUB);
    assert_eq!(services[0].instance_url(), "https://github.com");

    let project = services[0]
        .get_project_from_url("https://github.com/packit/ogr")
        .unwrap();
    assert_eq!(project.web_url(), "https://github.com/packit/ogr");
}

#[test]
fn bare_host_key_with_type_becomes_https_instance() {
    let options = ServiceOptions {
        service_type: Some("gitlab".to_string()),
        ..ServiceOptions::default()
    };
    let services = instances(vec![("my.gtlb", options)]);
    assert_eq!(services[0].service_type(), GITLAB);
    assert_eq!(services[0].instance_url(), "https://my.gtlb");

    let project = services[0].get_project("repo", Some("team")).unwrap();
    assert_eq!(project.web_url(), "https://my.gtlb/team/repo");
}

#[test]
fn duplicate_instances_are_collapsed() {
    let services = instances(vec![
        ("codeberg.org", token("a")),
        ("forgejo", token("b")),
    ]);
    assert_eq!(services.len(), 1);
    assert_eq!(services[0].service_type(), FORGEJO);
}

#[test]
fn unresolvable_entries_fail() {
    let registry = default_registry();
    let usecase = InstancesFromConfigUseCase {
        registry: &registry,
    };

    let err = usecase
        .execute(vec![("unknown", token("abcd"))])
        .unwrap_err();
    assert!(
        err.to_string()
            .contains("No matching service was found for url"),
        "{err}"
    );

    let options = ServiceOptions {
        service_type: Some("unknown".to_string()),
        ..token("abcd")
    };
    let err = usecase
        .execute(vec![("https://my.unknown.service", options)])
        .unwrap_err();
    assert!(
        err.to_string()
            .contains("No matching service was found for type"),
        "{err}"
    );
}

#[tokio::test]
async fn config_file_drives_project_resolution() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    fs::write(
        &path,
        r#"{
            "services": [{"pattern": "git.example.com", "type": "forgejo"}],
            "instances": {
                "https://my.gitlab": {"type": "gitlab", "token": "secret"},
                "github.com": {"token_env": "FORGELINK_TEST_UNSET_TOKEN"}
            }
        }"#,
    )
    .unwrap();

    let loaded = load_from_paths(vec![path]).unwrap();
    let composition = AppComposition::with_config(loaded.config).unwrap();

    let report = composition
        .open_project_usecase()
        .execute(OpenProjectOptions {
            url: "https://my.gitlab/group/sub/repo.git".to_string(),
            token: None,
            strict: true,
            fetch: false,
        })
        .await
        .unwrap();
    assert_eq!(report.project.service, "gitlab");
    assert_eq!(report.project.instance_url, "https://my.gitlab");
    assert_eq!(report.project.namespace.as_deref(), Some("group/sub"));
    assert_eq!(report.project.full_name, "group/sub/repo");
    assert!(report.info.is_none());

    // 추가 패턴은 기본 레지스트리 뒤에 등록된다.
    assert_eq!(
        composition
            .registry()
            .resolve("https://git.example.com/team/app", None),
        Some(FORGEJO)
    );

    // strict 모드에서는 풀에 없는 인스턴스를 만들지 않는다.
    let err = composition
        .open_project_usecase()
        .execute(OpenProjectOptions {
            url: "https://git.example.com/team/app".to_string(),
            token: None,
            strict: true,
            fetch: false,
        })
        .await
        .unwrap_err();
    assert!(format!("{err:#}").contains("Instance of type forgejo"), "{err:#}");

    let report = composition
        .open_project_usecase()
        .execute(OpenProjectOptions {
            url: "https://git.example.com/team/app".to_string(),
            token: None,
            strict: false,
            fetch: false,
        })
        .await
        .unwrap();
    assert_eq!(report.project.service, "forgejo");
    assert_eq!(report.project.web_url, "https://git.example.com/team/app");
}

#[test]
fn unknown_service_pattern_type_fails_composition() {
    let config = serde_json::from_str(
        r#"{"services": [{"pattern": "git.example.com", "type": "bitbucket"}]}"#,
    )
    .unwrap();
    assert!(AppComposition::with_config(config).is_err());
}

#[test]
fn default_library_entry_point() {
    let project = forgelink::get_project("https://github.com/packit/ogr").unwrap();
    assert_eq!(project.service_type(), GITHUB);
    assert_eq!(project.web_url(), "https://github.com/packit/ogr");

    let project = forgelink::get_project("https://pagure.io/fork/jdoe/ogr").unwrap();
    assert_eq!(project.service_type(), PAGURE);
    assert_eq!(project.fork_owner(), Some("jdoe"));
}
