//! Layout files: a scripted host for trying out topologies.
//!
//! ```toml
//! workarea = [0, 0, 3200, 1040]
//!
//! [[screen]]
//! x = 0
//! y = 0
//! width = 1280
//! height = 1024
//! ```

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;
use vscreen_topology::{RawScreen, StaticHost};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Layout {
    /// Whether the multi-display extension is present.
    #[serde(default = "default_true")]
    pub extension: bool,
    #[serde(default, rename = "screen")]
    pub screens: Vec<RawScreen>,
    /// Work area as x, y, width, height; any length is accepted and
    /// validated by the resolver.
    pub workarea: Option<Vec<i64>>,
}

fn default_true() -> bool {
    true
}

impl Layout {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        toml::from_str(s).context("Failed to parse layout")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read layout file '{}'", path.display()))?;
        Self::from_toml_str(&text)
            .with_context(|| format!("Invalid layout file '{}'", path.display()))
    }

    pub fn into_host(self) -> StaticHost {
        let host = if self.extension {
            StaticHost::with_screens(self.screens)
        } else {
            StaticHost::unavailable()
        };
        match self.workarea {
            Some(values) => {
                host.work_area_property(vscreen_topology::PropertyReply::cardinal(values))
            }
            None => host,
        }
    }
}
