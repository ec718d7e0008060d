//! Settings and working directory shared by every command

use std::path::Path;

use tgac_core::{Settings, SettingsLoader};
use tgac_fs::NormalizedPath;

use crate::error::Result;

/// Effective settings for one invocation
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory holding the project settings file
    pub root: NormalizedPath,
    /// Base for relative config paths
    pub working_dir: NormalizedPath,
    pub settings: Settings,
}

impl CommandContext {
    /// Load settings for `root` and apply the command-line overrides.
    ///
    /// `root` is where the project settings file is looked up; it is resolved
    /// against the process working directory. The working directory is the
    /// `--working-dir` flag, else the configured one, else the process's.
    pub fn load(root: &Path, config: Option<&Path>, working_dir: Option<&Path>) -> Result<Self> {
        let cwd = NormalizedPath::current_dir()?;
        let root = NormalizedPath::new(root).absolutize(&cwd);

        let mut loader = SettingsLoader::new(root.clone());
        if let Some(config) = config {
            loader = loader.with_explicit_file(NormalizedPath::new(config).absolutize(&cwd));
        }
        let settings = loader.load()?;

        let working_dir = match working_dir {
            Some(dir) => NormalizedPath::new(dir).absolutize(&cwd),
            None => settings.working_dir(&root).unwrap_or_else(|| cwd.clone()),
        };
        tracing::debug!(%root, %working_dir, "Loaded settings");

        Ok(Self {
            root,
            working_dir,
            settings,
        })
    }

    /// Resolve a path given on the command line against the working directory.
    pub fn resolve(&self, path: &Path) -> NormalizedPath {
        NormalizedPath::new(path).absolutize(&self.working_dir)
    }

    /// The depth cap, with `flag` taking precedence over the settings.
    pub fn max_depth(&self, flag: Option<usize>) -> usize {
        flag.unwrap_or_else(|| self.settings.max_depth())
    }
}
