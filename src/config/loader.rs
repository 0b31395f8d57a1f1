// src/config/loader.rs
//! Layered configuration loader
//!
//! Precedence, lowest first: built-in defaults, TOML files in the order they
//! were registered, then `AUDIOVIVE_*` environment variables (`__` separates
//! nested keys, e.g. `AUDIOVIVE_DENOISE__ATTENUATION_STRENGTH=0.8`).

use crate::config::{constants::paths, RestorationConfig};
use crate::error::{RestoreError, Result};
use config::{Config, Environment, File, FileFormat};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader merging defaults, files and environment
#[derive(Debug, Clone)]
pub struct ConfigLoader {
    config_paths: Vec<PathBuf>,
    env_prefix: String,
}

impl ConfigLoader {
    /// Loader over the conventional locations
    pub fn new() -> Self {
        Self {
            config_paths: Self::discover_config_paths(),
            env_prefix: paths::ENV_PREFIX.to_string(),
        }
    }

    /// Loader with custom paths; missing files are skipped
    pub fn with_paths(config_paths: Vec<PathBuf>) -> Self {
        Self {
            config_paths,
            env_prefix: paths::ENV_PREFIX.to_string(),
        }
    }

    /// Override the environment variable prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Files layered over the defaults, in merge order
    pub fn config_paths(&self) -> &[PathBuf] {
        &self.config_paths
    }

    /// Merge every layer and validate the result
    pub fn load(&self) -> Result<RestorationConfig> {
        let mut builder = Config::builder().add_source(Config::try_from(&RestorationConfig::default())?);

        for path in &self.config_paths {
            if path.exists() {
                debug!(path = %path.display(), "merging configuration file");
            }
            builder = builder.add_source(File::from(path.as_path()).format(FileFormat::Toml).required(false));
        }

        builder = builder.add_source(
            Environment::with_prefix(&self.env_prefix)
                .prefix_separator("_")
                .separator(paths::ENV_SEPARATOR)
                .try_parsing(true),
        );

        let config: RestorationConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load a single file that must exist, on top of the defaults
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<RestorationConfig> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(RestoreError::Config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let config: RestorationConfig = Config::builder()
            .add_source(Config::try_from(&RestorationConfig::default())?)
            .add_source(File::from(path).format(FileFormat::Toml).required(true))
            .build()?
            .try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Write a configuration to disk as TOML
    pub fn export_config<P: AsRef<Path>>(config: &RestorationConfig, path: P) -> Result<()> {
        let content = toml::to_string_pretty(config)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn discover_config_paths() -> Vec<PathBuf> {
        let mut found = Vec::new();

        if let Some(home) = home_dir() {
            found.push(home.join(".config").join("audiovive").join("config.toml"));
        }
        found.push(PathBuf::from(paths::DEFAULT_CONFIG_FILE));

        found
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

fn home_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var_os("USERPROFILE").map(PathBuf::from)
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var_os("HOME").map(PathBuf::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProfileStrategy;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn toml_file(content: &str) -> NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_config_loader_creation() {
        let loader = ConfigLoader::new();
        assert!(!loader.config_paths().is_empty());
    }

    #[test]
    #[serial]
    fn test_missing_files_yield_defaults() {
        let loader = ConfigLoader::with_paths(vec![PathBuf::from("/nonexistent/audiovive.toml")])
            .with_env_prefix("AUDIOVIVE_TEST_NONE");
        let config = loader.load().unwrap();
        assert_eq!(config, RestorationConfig::default());
    }

    #[test]
    #[serial]
    fn test_file_overrides_defaults() {
        let file = toml_file(
            r#"
[notch]
target_freq_hz = 50.0
quality_factor = 25.0

[noise_profile.strategy]
kind = "quietest_window"
duration_s = 0.25
"#,
        );

        let loader = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
            .with_env_prefix("AUDIOVIVE_TEST_NONE");
        let config = loader.load().unwrap();

        assert_eq!(config.notch.target_freq_hz, 50.0);
        assert_eq!(config.notch.quality_factor, 25.0);
        assert!(config.notch.enabled);
        assert_eq!(
            config.noise_profile.strategy,
            ProfileStrategy::QuietestWindow { duration_s: 0.25 }
        );
        assert_eq!(config.denoise.attenuation_strength, 1.0);
    }

    #[test]
    #[serial]
    fn test_environment_override() {
        std::env::set_var("AUDIOVIVE_DENOISE__ATTENUATION_STRENGTH", "0.25");
        std::env::set_var("AUDIOVIVE_NOTCH__ENABLED", "false");

        let loader = ConfigLoader::with_paths(Vec::new());
        let result = loader.load();

        std::env::remove_var("AUDIOVIVE_DENOISE__ATTENUATION_STRENGTH");
        std::env::remove_var("AUDIOVIVE_NOTCH__ENABLED");

        let config = result.unwrap();
        assert_eq!(config.denoise.attenuation_strength, 0.25);
        assert!(!config.notch.enabled);
    }

    #[test]
    #[serial]
    fn test_invalid_values_are_rejected() {
        let file = toml_file("[denoise]\nattenuation_strength = 3.0\n");
        let loader = ConfigLoader::with_paths(vec![file.path().to_path_buf()])
            .with_env_prefix("AUDIOVIVE_TEST_NONE");
        let err = loader.load().unwrap_err();
        assert!(err.is_parameter_error());
    }

    #[test]
    fn test_load_file_requires_existing_file() {
        assert!(matches!(
            ConfigLoader::load_file("/nonexistent/audiovive.toml"),
            Err(RestoreError::Config(_))
        ));
    }

    #[test]
    fn test_config_export_round_trip() {
        let mut config = RestorationConfig::default();
        config.notch.harmonics = 3;
        config.denoise.spectral_floor = 0.05;

        let file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        ConfigLoader::export_config(&config, file.path()).unwrap();

        let content = std::fs::read_to_string(file.path()).unwrap();
        assert!(content.contains("[notch]"));

        let reloaded = ConfigLoader::load_file(file.path()).unwrap();
        assert_eq!(reloaded, config);
    }
}
