//! Configuration types for the topology service.

use crate::discovery::DefaultSize;
use crate::errors::TopologyError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Complete topology configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyConfig {
    /// Preferred primary monitor, as an index into the discovered screens.
    #[serde(default)]
    pub primary_monitor: usize,
    /// Default desktop settings.
    #[serde(default)]
    pub desktop: DesktopConfig,
    /// How the desktop window relates to the host root window.
    #[serde(default)]
    pub mode: DesktopMode,
}

/// Default desktop configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DesktopConfig {
    /// Width of the synthetic default monitor.
    #[serde(default = "default_width")]
    pub width: u32,
    /// Height of the synthetic default monitor.
    #[serde(default = "default_height")]
    pub height: u32,
}

fn default_width() -> u32 {
    1024
}

fn default_height() -> u32 {
    768
}

impl Default for DesktopConfig {
    fn default() -> Self {
        Self {
            width: default_width(),
            height: default_height(),
        }
    }
}

/// Desktop window mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesktopMode {
    /// The desktop is the host root window; screens are queried.
    #[default]
    Native,
    /// The desktop lives in its own window; one default monitor is used and
    /// the host is not queried.
    Virtual,
}

impl Default for TopologyConfig {
    fn default() -> Self {
        Self {
            primary_monitor: 0,
            desktop: DesktopConfig::default(),
            mode: DesktopMode::default(),
        }
    }
}

impl TopologyConfig {
    /// Creates a new configuration builder.
    #[must_use]
    pub fn builder() -> TopologyConfigBuilder {
        TopologyConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the default desktop has a zero dimension.
    pub fn validate(&self) -> Result<(), TopologyError> {
        if self.desktop.width == 0 {
            return Err(TopologyError::Config(
                "Desktop width cannot be 0".to_string(),
            ));
        }
        if self.desktop.height == 0 {
            return Err(TopologyError::Config(
                "Desktop height cannot be 0".to_string(),
            ));
        }
        if i32::try_from(self.desktop.width).is_err() || i32::try_from(self.desktop.height).is_err()
        {
            return Err(TopologyError::Config(
                "Desktop size exceeds the coordinate range".to_string(),
            ));
        }
        Ok(())
    }

    /// Size of the synthetic default monitor.
    #[must_use]
    pub fn default_size(&self) -> DefaultSize {
        DefaultSize::new(self.desktop.width, self.desktop.height)
    }

    /// Parse and validate a TOML document.
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid TOML for this type or
    /// fails validation.
    pub fn from_toml_str(s: &str) -> Result<Self, TopologyError> {
        let config: Self = toml::from_str(s)
            .map_err(|e| TopologyError::Config(format!("Failed to parse config: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TopologyError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            TopologyError::Config(format!(
                "Failed to read config file '{}': {}",
                path.display(),
                e
            ))
        })?;
        Self::from_toml_str(&text)
    }
}

/// Builder for creating a `TopologyConfig`.
#[derive(Default)]
pub struct TopologyConfigBuilder {
    config: TopologyConfig,
}

impl TopologyConfigBuilder {
    /// Start from an existing configuration.
    #[must_use]
    pub fn from_config(config: TopologyConfig) -> Self {
        Self { config }
    }

    /// Sets the preferred primary monitor index.
    #[must_use]
    pub fn primary_monitor(mut self, index: usize) -> Self {
        self.config.primary_monitor = index;
        self
    }

    /// Sets the default desktop size.
    #[must_use]
    pub fn desktop_size(mut self, width: u32, height: u32) -> Self {
        self.config.desktop.width = width;
        self.config.desktop.height = height;
        self
    }

    /// Sets the desktop mode.
    #[must_use]
    pub fn mode(mut self, mode: DesktopMode) -> Self {
        self.config.mode = mode;
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<TopologyConfig, TopologyError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write as _;

    #[test]
    fn test_config_builder() {
        let config = TopologyConfig::builder()
            .primary_monitor(2)
            .desktop_size(1920, 1080)
            .mode(DesktopMode::Virtual)
            .build()
            .unwrap();

        assert_eq!(config.primary_monitor, 2);
        assert_eq!(config.default_size(), DefaultSize::new(1920, 1080));
        assert_eq!(config.mode, DesktopMode::Virtual);
    }

    #[test]
    fn test_config_defaults() {
        let config = TopologyConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.primary_monitor, 0);
        assert_eq!(config.default_size(), DefaultSize::new(1024, 768));
        assert_eq!(config.mode, DesktopMode::Native);
    }

    #[test]
    fn test_config_validation_zero_size() {
        assert!(TopologyConfig::builder().desktop_size(0, 768).build().is_err());
        assert!(TopologyConfig::builder().desktop_size(1024, 0).build().is_err());
        assert!(TopologyConfig::builder()
            .desktop_size(u32::MAX, 768)
            .build()
            .is_err());
    }

    #[test]
    fn test_from_toml() {
        let config = TopologyConfig::from_toml_str(
            r#"
            primary_monitor = 1
            mode = "virtual"

            [desktop]
            width = 1280
            "#,
        )
        .unwrap();
        assert_eq!(config.primary_monitor, 1);
        assert_eq!(config.mode, DesktopMode::Virtual);
        assert_eq!(config.desktop.width, 1280);
        assert_eq!(config.desktop.height, 768);

        assert_eq!(TopologyConfig::from_toml_str("").unwrap(), TopologyConfig::default());
        assert!(TopologyConfig::from_toml_str("mode = \"sideways\"").is_err());
        assert!(TopologyConfig::from_toml_str("[desktop]\nwidth = 0").is_err());
    }

    #[test]
    fn test_load_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "primary_monitor = 3").unwrap();
        let config = TopologyConfig::load(file.path()).unwrap();
        assert_eq!(config.primary_monitor, 3);

        let err = TopologyConfig::load("/nonexistent/vscreen.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
