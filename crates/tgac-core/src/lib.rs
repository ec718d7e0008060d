//! Project metadata resolution for Terragrunt trees
//!
//! `tgac-core` sits above the filesystem and HCL crates and below the CLI:
//!
//! ```text
//!          tgac-cli
//!              |
//!          tgac-core
//!           /     \
//!     tgac-hcl   tgac-fs
//! ```
//!
//! - **Locals**: [`resolve_locals`] reads the `atlantis_*` locals of one
//!   config into a [`ResolvedLocals`] record.
//! - **Inheritance**: [`LocalsResolver`] merges the locals of included parent
//!   configs into a child's, parent first.
//! - **Watch patterns**: [`WatchWalker`] follows local `module` sources, and
//!   a project's local `terraform` source, to the set of globs it depends on.
//! - **Projects**: [`classify`] tells parent configs from children and
//!   [`discover_configs`] finds every config under a root.
//! - **Settings**: [`SettingsLoader`] layers global and project TOML files.

pub mod discovery;
pub mod error;
pub mod locals;
pub mod project;
pub mod resolver;
pub mod settings;
pub mod watch;

pub use discovery::{ROOT_CONFIG_NAME, discover_configs};
pub use error::{Error, Result};
pub use locals::{ResolvedLocals, Tristate, resolve_locals};
pub use project::{ConfigRole, classify};
pub use resolver::{LocalsResolver, ResolvedConfig};
pub use settings::{ResolverSettings, Settings, SettingsLoader, WatchSettings};
pub use watch::{WatchWalker, extract_module_sources, is_local_module_source};
