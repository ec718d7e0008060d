//! Filesystem helpers for tgac
//!
//! Provides forward-slash normalized paths, plain text I/O and the file name
//! families Terragrunt and Terraform/OpenTofu configurations use.

pub mod error;
pub mod family;
pub mod io;
pub mod path;

pub use error::{Error, Result};
pub use family::{ConfigFamily, ModuleFileMatcher, TERRAGRUNT_CONFIG_NAMES};
pub use path::NormalizedPath;
