use crate::models::GallerySettings;
use anyhow::{Context, Result};
use camino::{Utf8Path, Utf8PathBuf};
use config::{Config, Environment, File, FileFormat};
use std::collections::HashMap;
use std::fs;

/// File name of the settings file inside the config directory.
pub const SETTINGS_FILE: &str = "gallery.yaml";

/// Prefix of environment overrides, e.g. `GALLERY__THUMBNAILS__SIZE=256`.
pub const ENV_PREFIX: &str = "GALLERY";

/// Loads and saves [`GallerySettings`].
///
/// Settings are layered, later layers winning:
/// 1. built-in defaults
/// 2. `gallery.yaml` in the config directory (optional)
/// 3. `GALLERY__SECTION__KEY` environment variables
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config_dir: Utf8PathBuf,
    settings_path: Utf8PathBuf,
}

impl ConfigManager {
    /// Create a new ConfigManager, creating `config_dir` if it doesn't exist.
    pub fn new<P: AsRef<Utf8Path>>(config_dir: P) -> Result<Self> {
        let config_dir = config_dir.as_ref().to_path_buf();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .with_context(|| format!("Failed to create config directory: {}", config_dir))?;
        }

        Ok(Self {
            settings_path: config_dir.join(SETTINGS_FILE),
            config_dir,
        })
    }

    /// Load settings from the YAML file and the process environment.
    pub fn load_settings(&self) -> Result<GallerySettings> {
        self.load_with_environment(self.environment())
    }

    /// Load settings with environment overrides taken from `vars` instead of
    /// the process environment. Keys use the same `GALLERY__SECTION__KEY` form.
    pub fn load_settings_with_overrides(
        &self,
        vars: HashMap<String, String>,
    ) -> Result<GallerySettings> {
        self.load_with_environment(self.environment().source(Some(vars)))
    }

    fn environment(&self) -> Environment {
        Environment::with_prefix(ENV_PREFIX)
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
            .list_separator(",")
            .with_list_parse_key("scan.image_extensions")
            .with_list_parse_key("scan.video_extensions")
            .with_list_parse_key("pagination.page_size_options")
    }

    fn load_with_environment(&self, environment: Environment) -> Result<GallerySettings> {
        if !self.settings_path.exists() {
            tracing::warn!(
                "Settings file not found at {}, using defaults",
                self.settings_path
            );
        }

        let layered = Config::builder()
            .add_source(
                File::new(self.settings_path.as_str(), FileFormat::Yaml).required(false),
            )
            .add_source(environment)
            .build()
            .with_context(|| format!("Failed to read settings: {}", self.settings_path))?;

        let settings: GallerySettings = layered
            .try_deserialize()
            .with_context(|| format!("Failed to parse settings: {}", self.settings_path))?;

        tracing::info!("Loaded settings from {}", self.settings_path);
        Ok(settings)
    }

    /// Save settings as YAML.
    pub fn save_settings(&self, settings: &GallerySettings) -> Result<()> {
        let yaml_string =
            serde_yaml_ng::to_string(settings).context("Failed to serialize settings to YAML")?;

        fs::write(&self.settings_path, yaml_string)
            .with_context(|| format!("Failed to write settings: {}", self.settings_path))?;

        tracing::info!("Saved settings to {}", self.settings_path);
        Ok(())
    }

    /// Whether `gallery.yaml` exists; without it only defaults and the
    /// environment apply.
    pub fn has_settings_file(&self) -> bool {
        self.settings_path.is_file()
    }

    pub fn settings_path(&self) -> &Utf8Path {
        &self.settings_path
    }

    pub fn config_dir(&self) -> &Utf8Path {
        &self.config_dir
    }
}
