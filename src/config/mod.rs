use std::{env, fs, path::Path, path::PathBuf, str::FromStr};

use log::{info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::layouts::{validate_ratio, Rect};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("unable to read config: {0}")]
    UnableToReadConfig(PathBuf),
    #[error("invalid toml file: {0}")]
    TomlSyntaxError(String),
    #[error("$HOME is not defined")]
    HomeNotDefined,
    #[error("split_ratio must be between 0 and 1 exclusive, got {0}")]
    InvalidRatio(f64),
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Commands spawned once at startup.
    pub startup: Vec<String>,
    /// First child's share of every new split.
    pub split_ratio: f64,
    pub hide_titlebars: bool,
    pub log_level: String,
    /// Tiled area, replaces the screen bounds reported by the server.
    pub screen: Option<Rect>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            startup: Vec::new(),
            split_ratio: 0.5,
            hide_titlebars: false,
            log_level: "info".into(),
            screen: None,
        }
    }
}

impl FromStr for Config {
    type Err = ConfigError;

    fn from_str(content: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(content).map_err(|e| ConfigError::TomlSyntaxError(e.to_string()))?;
        validate_ratio(config.split_ratio)
            .map_err(|_| ConfigError::InvalidRatio(config.split_ratio))?;
        Ok(config)
    }
}

pub fn config_path() -> Result<PathBuf, ConfigError> {
    let home_dir = match env::var("HOME") {
        Ok(home_dir) => home_dir,
        Err(_e) => return Err(ConfigError::HomeNotDefined),
    };

    Ok([home_dir.as_str(), ".config", "tdatile", "tdatile.toml"]
        .iter()
        .collect())
}

pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(config_path: &Path) -> Result<Config, ConfigError> {
    let config_content = fs::read_to_string(config_path)
        .map_err(|_| ConfigError::UnableToReadConfig(config_path.to_path_buf()))?;
    let config: Config = config_content.parse()?;
    info!("config loaded !");
    Ok(config)
}

/// Runs the configured startup commands, logging the ones that fail to spawn.
pub fn run_startup(config: &Config) {
    for command in &config.startup {
        info!("starting {}", command);
        if let Err(e) = execute::shell(command).spawn() {
            warn!("failed to start {}: {}", command, e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn empty_file_gives_defaults() {
        let config: Config = "".parse().unwrap();
        assert_eq!(config, Config::default());
        assert_eq!(config.split_ratio, 0.5);
    }

    #[test]
    fn full_file_is_read() {
        let config: Config = r#"
            startup = ["feh --bg-scale bg.jpg"]
            split_ratio = 0.6
            hide_titlebars = true
            log_level = "debug"
            screen = { x = 0, y = 20, w = 1920, h = 1060 }
        "#
        .parse()
        .unwrap();
        assert_eq!(config.startup, vec!["feh --bg-scale bg.jpg".to_string()]);
        assert_eq!(config.split_ratio, 0.6);
        assert!(config.hide_titlebars);
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.screen, Some(Rect::new(0, 20, 1920, 1060)));
    }

    #[test]
    fn degenerate_ratio_is_rejected() {
        for ratio in ["0.0", "1.0", "1.5"] {
            let result = format!("split_ratio = {ratio}").parse::<Config>();
            assert!(matches!(result, Err(ConfigError::InvalidRatio(_))));
        }
    }

    #[test]
    fn syntax_errors_are_reported() {
        assert!(matches!(
            "split_ratio = ".parse::<Config>(),
            Err(ConfigError::TomlSyntaxError(_))
        ));
    }

    #[test]
    fn loads_from_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "hide_titlebars = true").unwrap();
        let config = load_config_from(file.path()).unwrap();
        assert!(config.hide_titlebars);

        let missing = file.path().with_extension("missing");
        assert!(matches!(
            load_config_from(&missing),
            Err(ConfigError::UnableToReadConfig(path)) if path == missing
        ));
    }
}
