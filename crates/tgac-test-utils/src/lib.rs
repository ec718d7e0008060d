//! Shared test utilities for the tgac workspace.
//!
//! A dev-dependency only, never published.
//!
//! # Modules
//!
//! - [`tree`]: [`TestTree`] builder for temporary Terragrunt directory layouts

pub mod tree;

pub use tree::TestTree;
