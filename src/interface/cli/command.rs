//! CLI 명령 파싱 모듈.

use clap::{Parser, Subcommand};

use crate::application::usecases::open_project::OpenProjectOptions;

#[derive(Debug, Parser)]
#[command(name = "forgelink")]
#[command(about = "Resolve git remote URLs to forge projects (GitHub, GitLab, Pagure, Forgejo)")]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Parse a git remote URL and show the matched service
    Parse {
        /// Git remote URL (https, ssh, scp-like, git://)
        url: String,
    },
    /// Resolve a URL to a project handle on its forge
    Project {
        /// Git remote URL
        url: String,

        /// Token used when a new service instance is constructed
        #[arg(long)]
        token: Option<String>,

        /// Fail unless the URL matches an instance from the config file
        #[arg(long)]
        strict: bool,

        /// Query the forge API for repository metadata
        #[arg(long)]
        fetch: bool,
    },
    /// Show effective merged config, token sources and registered patterns
    Config,
}

#[derive(Debug)]
pub enum CliAction {
    Parse(String),
    Project(OpenProjectOptions),
    InspectConfig,
}

impl Cli {
    pub fn parse_action() -> Result<CliAction, String> {
        Cli::parse().into_action()
    }

    fn into_action(self) -> Result<CliAction, String> {
        match self.command {
            Commands::Parse { url } => Ok(CliAction::Parse(non_blank(url)?)),
            Commands::Project {
                url,
                token,
                strict,
                fetch,
            } => Ok(CliAction::Project(OpenProjectOptions {
                url: non_blank(url)?,
                token,
                strict,
                fetch,
            })),
            Commands::Config => Ok(CliAction::InspectConfig),
        }
    }
}

fn non_blank(url: String) -> Result<String, String> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err("URL must not be empty".to_string());
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn action(args: &[&str]) -> Result<CliAction, String> {
        Cli::try_parse_from(args)
            .map_err(|err| err.to_string())?
            .into_action()
    }

    #[test]
    fn project_flags_are_mapped() {
        let parsed = action(&[
            "forgelink",
            "project",
            "https://github.com/packit/ogr",
            "--strict",
            "--fetch",
            "--token",
            "abc",
        ])
        .unwrap();
        let CliAction::Project(options) = parsed else {
            panic!("expected project action");
        };
        assert_eq!(options.url, "https://github.com/packit/ogr");
        assert!(options.strict);
        assert!(options.fetch);
        assert_eq!(options.token.as_deref(), Some("abc"));
    }

    #[test]
    fn blank_url_is_rejected() {
        assert!(action(&["forgelink", "parse", "  "]).is_err());
    }

    #[test]
    fn config_subcommand() {
        assert!(matches!(
            action(&["forgelink", "config"]),
            Ok(CliAction::InspectConfig)
        ));
    }
}
