//! File name families for Terragrunt and Terraform/OpenTofu configurations.

use globset::{Glob, GlobSet, GlobSetBuilder};

use crate::{Error, NormalizedPath, Result};

/// File names that mark a directory as holding a Terragrunt configuration.
pub const TERRAGRUNT_CONFIG_NAMES: &[&str] = &["terragrunt.hcl", "terragrunt.hcl.json"];

/// Module source file families.
///
/// Terraform and its OpenTofu fork each have a native and a JSON variant;
/// all four are equivalent inputs when looking for module calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigFamily {
    /// `*.tf`
    Terraform,
    /// `*.tf.json`
    TerraformJson,
    /// `*.tofu`
    OpenTofu,
    /// `*.tofu.json`
    OpenTofuJson,
}

impl ConfigFamily {
    pub const ALL: [ConfigFamily; 4] = [
        Self::Terraform,
        Self::TerraformJson,
        Self::OpenTofu,
        Self::OpenTofuJson,
    ];

    /// File name glob matching this family.
    pub fn glob(&self) -> &'static str {
        match self {
            Self::Terraform => "*.tf",
            Self::TerraformJson => "*.tf.json",
            Self::OpenTofu => "*.tofu",
            Self::OpenTofuJson => "*.tofu.json",
        }
    }

    /// Glob covering every file of the primary or alternate family inside `dir`.
    ///
    /// `*.tf*` also matches `*.tf.json`, and `*.tofu*` matches `*.tofu.json`.
    pub fn watch_patterns(dir: &NormalizedPath) -> [String; 2] {
        [
            dir.join("*.tf*").as_str().to_string(),
            dir.join("*.tofu*").as_str().to_string(),
        ]
    }
}

/// Matches file names against the four module source families.
#[derive(Debug, Clone)]
pub struct ModuleFileMatcher {
    glob_set: GlobSet,
}

impl ModuleFileMatcher {
    pub fn new() -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        for family in ConfigFamily::ALL {
            let pattern = family.glob();
            let glob = Glob::new(pattern).map_err(|source| Error::InvalidPattern {
                pattern: pattern.to_string(),
                source,
            })?;
            builder.add(glob);
        }
        let glob_set = builder.build().map_err(|source| Error::InvalidPattern {
            pattern: "module source families".to_string(),
            source,
        })?;
        Ok(Self { glob_set })
    }

    /// Whether the file name of `path` belongs to one of the families.
    pub fn is_match(&self, path: &NormalizedPath) -> bool {
        path.file_name()
            .is_some_and(|name| self.glob_set.is_match(name))
    }
}
