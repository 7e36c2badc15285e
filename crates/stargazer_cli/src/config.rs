//! Configuration file support for stargazer.
//!
//! Configuration is loaded with the following precedence (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables (prefixed with `STARGAZER_`, e.g., `STARGAZER_GITHUB_TOKEN`)
//! 3. Local config file (./stargazer.toml)
//! 4. XDG config file (~/.config/stargazer/config.toml)
//! 5. Built-in defaults
//!
//! Example config file:
//! ```toml
//! [github]
//! token = "ghp_..."  # or use STARGAZER_GITHUB_TOKEN env var
//!
//! [run]
//! batch_size = 100
//! per_page = 100
//! checkpoint_interval = 10
//! output = "stargazers"
//! ```

use std::path::PathBuf;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};
use directories::ProjectDirs;
use serde::Deserialize;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// GitHub configuration.
    pub github: GitHubConfig,
    /// Default run options.
    pub run: RunConfig,
}

/// GitHub configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct GitHubConfig {
    /// GitHub personal access token.
    /// Can also be set via STARGAZER_GITHUB_TOKEN environment variable.
    pub token: Option<String>,
}

/// Default run options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Default batch size for batch mode.
    pub batch_size: usize,
    /// Stargazers fetched per listing page (max 100).
    pub per_page: usize,
    /// Records between checkpoint writes during enrichment.
    pub checkpoint_interval: usize,
    /// Default output file prefix.
    pub output: String,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            batch_size: stargazer::enrich::DEFAULT_BATCH_SIZE,
            per_page: stargazer::enrich::DEFAULT_PER_PAGE,
            checkpoint_interval: stargazer::enrich::DEFAULT_CHECKPOINT_INTERVAL,
            output: "stargazers".to_string(),
        }
    }
}

impl Config {
    /// Load configuration using the config crate's layered approach.
    ///
    /// Sources are loaded in order (later sources override earlier):
    /// 1. Built-in defaults
    /// 2. XDG config file (~/.config/stargazer/config.toml)
    /// 3. Local config file (./stargazer.toml)
    /// 4. Environment variables with STARGAZER_ prefix
    pub fn load() -> Self {
        let mut builder = ConfigBuilder::builder();

        // Add XDG config file if it exists
        if let Some(proj_dirs) = ProjectDirs::from("", "", "stargazer") {
            let xdg_config = proj_dirs.config_dir().join("config.toml");
            if xdg_config.exists() {
                tracing::debug!("Loading config from {:?}", xdg_config);
                builder = builder.add_source(
                    File::from(xdg_config)
                        .format(FileFormat::Toml)
                        .required(false),
                );
            }
        }

        // Add local config file (higher priority than XDG)
        let local_config = PathBuf::from("stargazer.toml");
        if local_config.exists() {
            tracing::debug!("Loading config from ./stargazer.toml");
            builder = builder.add_source(
                File::from(local_config)
                    .format(FileFormat::Toml)
                    .required(false),
            );
        }

        // Add STARGAZER_ prefixed environment variables
        // e.g., STARGAZER_GITHUB_TOKEN -> github.token
        builder = builder.add_source(
            Environment::with_prefix("STARGAZER")
                .separator("_")
                .try_parsing(true),
        );

        match builder.build() {
            Ok(settings) => match settings.try_deserialize::<Config>() {
                Ok(config) => config,
                Err(e) => {
                    tracing::warn!("Failed to deserialize config: {}", e);
                    Config::default()
                }
            },
            Err(e) => {
                tracing::warn!("Failed to build config: {}", e);
                Config::default()
            }
        }
    }

    /// Get the GitHub token.
    pub fn github_token(&self) -> Option<String> {
        self.github.token.clone()
    }

    /// Get the default config file path.
    #[allow(dead_code)]
    pub fn default_config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "stargazer").map(|dirs| dirs.config_dir().join("config.toml"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.github.token.is_none());
        assert_eq!(config.run.batch_size, 100);
        assert_eq!(config.run.per_page, 100);
        assert_eq!(config.run.checkpoint_interval, 10);
        assert_eq!(config.run.output, "stargazers");
    }

    #[test]
    fn test_config_from_toml_string() {
        let toml_content = r#"
            [github]
            token = "ghp_test123"

            [run]
            batch_size = 50
            output = "audience"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.github.token, Some("ghp_test123".to_string()));
        assert_eq!(config.run.batch_size, 50);
        assert_eq!(config.run.output, "audience");
        // Unspecified values keep their defaults.
        assert_eq!(config.run.per_page, 100);
        assert_eq!(config.run.checkpoint_interval, 10);
    }

    #[test]
    fn test_config_partial_override() {
        let toml_content = r#"
            [run]
            checkpoint_interval = 25
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.run.checkpoint_interval, 25);
        assert_eq!(config.run.batch_size, 100);
        assert!(config.github.token.is_none());
    }

    #[test]
    fn test_config_merging_order() {
        // Later sources override earlier ones.
        let base_toml = r#"
            [run]
            batch_size = 100
            output = "stargazers"
        "#;

        let override_toml = r#"
            [run]
            batch_size = 25
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(base_toml, FileFormat::Toml))
            .add_source(config::File::from_str(override_toml, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();

        assert_eq!(config.run.batch_size, 25);
        assert_eq!(config.run.output, "stargazers");
    }

    #[test]
    fn test_config_invalid_toml() {
        let invalid_toml = r#"
            [run
            batch_size = 100
        "#;

        let result = ConfigBuilder::builder()
            .add_source(config::File::from_str(invalid_toml, FileFormat::Toml))
            .build();

        assert!(result.is_err());
    }

    #[test]
    fn test_config_unknown_fields_ignored() {
        let toml_content = r#"
            [run]
            batch_size = 100
            unknown_field = "should be ignored"
        "#;

        let settings = ConfigBuilder::builder()
            .add_source(config::File::from_str(toml_content, FileFormat::Toml))
            .build()
            .unwrap();

        let config: Config = settings.try_deserialize().unwrap();
        assert_eq!(config.run.batch_size, 100);
    }

    #[test]
    fn test_github_token_accessor() {
        let config = Config {
            github: GitHubConfig {
                token: Some("ghp_abc".to_string()),
            },
            run: RunConfig::default(),
        };
        assert_eq!(config.github_token(), Some("ghp_abc".to_string()));
    }
}
