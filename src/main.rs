//! `forgelink` 바이너리 진입점.

use std::fmt::Display;

use serde::Serialize;

use forgelink::ForgeError;
use forgelink::interface::cli::{Cli, CliAction};
use forgelink::interface::composition::AppComposition;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let action = match Cli::parse_action() {
        Ok(action) => action,
        Err(msg) => {
            eprintln!("error: {msg}");
            std::process::exit(2);
        }
    };

    let composition = match AppComposition::load() {
        Ok(composition) => composition,
        Err(err) => fail(format!("{err:#}")),
    };

    match action {
        CliAction::Parse(url) => match composition.describe_url_usecase().execute(&url) {
            Ok(description) => print_json(&description),
            Err(err) => fail(err),
        },
        CliAction::Project(options) => {
            match composition.open_project_usecase().execute(options).await {
                Ok(report) => print_json(&report),
                Err(err) => {
                    if err
                        .downcast_ref::<ForgeError>()
                        .is_some_and(ForgeError::is_configuration_error)
                    {
                        eprintln!("hint: run `forgelink config` to check configured instances");
                    }
                    fail(format!("{err:#}"))
                }
            }
        }
        CliAction::InspectConfig => match composition.inspect_config_usecase().execute() {
            Ok(json) => println!("{json}"),
            Err(err) => fail(format!("{err:#}")),
        },
    }
}

fn print_json<T: Serialize>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{json}"),
        Err(err) => fail(err),
    }
}

fn fail(err: impl Display) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}
