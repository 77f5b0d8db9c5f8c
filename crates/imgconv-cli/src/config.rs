use anyhow::{Context, Result};
use imgconv_common::TargetFormat;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// CLI configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Format used when `--format` is not given
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Default output directory; unset writes next to each source
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_dir: Option<PathBuf>,

    /// JPEG/HEIC quality (1-100)
    #[serde(default = "default_quality")]
    pub jpeg_quality: u8,

    /// Lock aspect ratio when resizing
    #[serde(default)]
    pub lock_aspect: bool,

    /// Replace existing output files
    #[serde(default = "default_overwrite")]
    pub overwrite: bool,

    /// Show progress bars
    #[serde(default = "default_progress")]
    pub show_progress: bool,

    /// Colored output
    #[serde(default = "default_color")]
    pub colored_output: bool,
}

fn default_format() -> String {
    TargetFormat::Jpeg.name().to_string()
}

fn default_quality() -> u8 {
    95
}

fn default_overwrite() -> bool {
    true
}

fn default_progress() -> bool {
    true
}

fn default_color() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            output_dir: None,
            jpeg_quality: default_quality(),
            lock_aspect: false,
            overwrite: default_overwrite(),
            show_progress: default_progress(),
            colored_output: default_color(),
        }
    }
}

impl Config {
    /// Get config file path (XDG-compliant)
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = directories::ProjectDirs::from("", "", "imgconv")
            .context("Failed to determine config directory")?
            .config_dir()
            .to_path_buf();

        fs::create_dir_all(&config_dir).context("Failed to create config directory")?;

        Ok(config_dir.join("config.toml"))
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let content = fs::read_to_string(config_path).context("Failed to read config file")?;

            let config: Config = toml::from_str(&content).context("Failed to parse config file")?;

            tracing::debug!("Loaded config from {:?}", config_path);
            Ok(config)
        } else {
            let config = Self::default();
            config.save_to(config_path)?;
            tracing::info!("Created default config at {:?}", config_path);
            Ok(config)
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, config_path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize config")?;

        fs::write(config_path, content).context("Failed to write config file")?;

        tracing::debug!("Saved config to {:?}", config_path);
        Ok(())
    }

    /// Reset to defaults
    pub fn reset() -> Result<()> {
        let config = Self::default();
        config.save()
    }

    /// Apply a `config set <key> <value>` assignment
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "default_format" => {
                let format: TargetFormat = value.parse()?;
                self.default_format = format.name().to_string();
            }
            "output_dir" => {
                self.output_dir = if value.is_empty() {
                    None
                } else {
                    Some(PathBuf::from(value))
                };
            }
            "jpeg_quality" => {
                let quality: u8 = value.parse()?;
                anyhow::ensure!((1..=100).contains(&quality), "Quality must be 1-100");
                self.jpeg_quality = quality;
            }
            "lock_aspect" => self.lock_aspect = value.parse()?,
            "overwrite" => self.overwrite = value.parse()?,
            "show_progress" => self.show_progress = value.parse()?,
            "colored_output" => self.colored_output = value.parse()?,
            _ => anyhow::bail!("Unknown config key: {}", key),
        }
        Ok(())
    }
}

/// Resolve a `--flag`/`--no-flag` pair against the configured value
pub fn flag_or(on: bool, off: bool, configured: bool) -> bool {
    match (on, off) {
        (true, _) => true,
        (_, true) => false,
        _ => configured,
    }
}
