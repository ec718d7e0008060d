//! Config discovery under a repository root

use std::collections::BTreeSet;

use tgac_fs::{NormalizedPath, TERRAGRUNT_CONFIG_NAMES};
use walkdir::{DirEntry, WalkDir};

use crate::Result;

/// Conventional name of the top-level parent config
pub const ROOT_CONFIG_NAME: &str = "root.hcl";

/// Directories never searched for configs
const SKIPPED_DIRS: &[&str] = &[".terragrunt-cache", ".git"];

/// Find every Terragrunt config under `root`, sorted by path.
///
/// Failing to read `root` itself is an error; unreadable entries below it
/// are skipped.
pub fn discover_configs(root: &NormalizedPath) -> Result<Vec<NormalizedPath>> {
    let mut configs = BTreeSet::new();

    let walker = WalkDir::new(root.to_native())
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_skipped_dir(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) if e.depth() == 0 => return Err(e.into()),
            Err(e) => {
                tracing::debug!(%root, error = %e, "Skipping unreadable entry");
                continue;
            }
        };
        if entry.file_type().is_file() && is_config_name(&entry) {
            configs.insert(NormalizedPath::new(entry.path()));
        }
    }

    tracing::debug!(%root, count = configs.len(), "Discovered configs");
    Ok(configs.into_iter().collect())
}

fn is_skipped_dir(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .is_some_and(|name| SKIPPED_DIRS.contains(&name))
}

fn is_config_name(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .is_some_and(|name| name == ROOT_CONFIG_NAME || TERRAGRUNT_CONFIG_NAMES.contains(&name))
}
