//! Layered tgac settings
//!
//! Settings are read from up to three TOML files, later layers overriding
//! the fields earlier ones set:
//!
//! 1. Global (`<config_dir>/tgac/config.toml`)
//! 2. Project (`<root>/.tgac.toml`)
//! 3. An explicit file, when one is given
//!
//! ```toml
//! [resolver]
//! working_dir = "live"
//!
//! [watch]
//! max_depth = 32
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tgac_fs::{NormalizedPath, io};

use crate::watch::WatchWalker;
use crate::{Error, Result};

/// Name of the project settings file
pub const PROJECT_SETTINGS_FILE: &str = ".tgac.toml";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub resolver: ResolverSettings,
    pub watch: WatchSettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ResolverSettings {
    /// Base directory for relative config paths
    pub working_dir: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WatchSettings {
    /// Module nesting depth followed by the watch walker
    pub max_depth: Option<usize>,
}

impl Settings {
    /// Parse settings from TOML content.
    pub fn parse(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Merge `other` on top of these settings; fields `other` sets win.
    pub fn merge(&mut self, other: &Settings) {
        if other.resolver.working_dir.is_some() {
            self.resolver.working_dir = other.resolver.working_dir.clone();
        }
        if other.watch.max_depth.is_some() {
            self.watch.max_depth = other.watch.max_depth;
        }
    }

    /// The configured working directory, resolved against `base`.
    pub fn working_dir(&self, base: &NormalizedPath) -> Option<NormalizedPath> {
        self.resolver
            .working_dir
            .as_ref()
            .map(|dir| NormalizedPath::new(dir).absolutize(base))
    }

    pub fn max_depth(&self) -> usize {
        self.watch.max_depth.unwrap_or(WatchWalker::DEFAULT_MAX_DEPTH)
    }
}

/// Loads [`Settings`] from the global, project and explicit layers
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    /// Project root holding `.tgac.toml`
    root: NormalizedPath,

    /// Override for the global config directory (used for testing).
    /// When `None`, `dirs::config_dir()` is used.
    global_config_dir_override: Option<PathBuf>,

    /// Explicit settings file, applied last
    explicit: Option<NormalizedPath>,
}

impl SettingsLoader {
    pub fn new(root: NormalizedPath) -> Self {
        Self {
            root,
            global_config_dir_override: None,
            explicit: None,
        }
    }

    /// Use `dir` instead of the platform config directory for the global layer.
    pub fn with_global_config_dir(mut self, dir: PathBuf) -> Self {
        self.global_config_dir_override = Some(dir);
        self
    }

    /// Apply `path` as the last layer. The file must exist.
    pub fn with_explicit_file(mut self, path: NormalizedPath) -> Self {
        self.explicit = Some(path);
        self
    }

    fn global_config_dir(&self) -> Option<PathBuf> {
        if let Some(ref override_dir) = self.global_config_dir_override {
            return Some(override_dir.clone());
        }
        dirs::config_dir().map(|d| d.join("tgac"))
    }

    /// Load and merge every layer. Missing global and project files are skipped.
    pub fn load(&self) -> Result<Settings> {
        let mut settings = Settings::default();

        // Layer 1 - Global (<config_dir>/tgac/config.toml)
        if let Some(global_dir) = self.global_config_dir() {
            let global_path = NormalizedPath::new(global_dir.join("config.toml"));
            if global_path.is_file() {
                tracing::debug!(%global_path, "Loading global settings (layer 1)");
                settings.merge(&load_file(&global_path)?);
            } else {
                tracing::debug!(%global_path, "No global settings found (layer 1), skipping");
            }
        }

        // Layer 2 - Project (<root>/.tgac.toml)
        let project_path = self.root.join(PROJECT_SETTINGS_FILE);
        if project_path.is_file() {
            tracing::debug!(%project_path, "Loading project settings (layer 2)");
            settings.merge(&load_file(&project_path)?);
        }

        // Layer 3 - Explicit file
        if let Some(explicit) = &self.explicit {
            if !explicit.is_file() {
                return Err(Error::SettingsNotFound {
                    path: explicit.to_native(),
                });
            }
            tracing::debug!(%explicit, "Loading explicit settings (layer 3)");
            settings.merge(&load_file(explicit)?);
        }

        Ok(settings)
    }
}

fn load_file(path: &NormalizedPath) -> Result<Settings> {
    let content = io::read_text(path)?;
    Settings::parse(&content).map_err(|source| Error::Settings {
        path: path.to_native(),
        source,
    })
}
