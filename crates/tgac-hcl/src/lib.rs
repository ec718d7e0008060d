//! HCL handling for tgac
//!
//! Wraps the `hcl-rs` parser and evaluator behind a small boundary:
//!
//! - [`ConfigDocument`] loads native HCL or HCL JSON, picking the syntax from
//!   the file name.
//! - [`normalize_bare_include`] labels a single unlabeled `include` block with
//!   `""` so it decodes like a labeled one.
//! - [`Decoder`] decodes the `include` blocks, or the base blocks (`include`,
//!   `locals`, `dependency`, `dependencies`, `terraform`), evaluating
//!   expressions against an [`EvalContextProvider`].
//!
//! Every call into the parser or evaluator runs under a panic guard, so a
//! fault inside the HCL crates comes back as [`Error::ParsePanic`].

pub mod decode;
pub mod document;
pub mod error;
pub mod eval;
mod functions;
mod json;
pub mod normalize;
mod panic;
pub mod syntax;

pub use decode::{BaseBlocks, DependencyBlock, Decoder, ExposedIncludes, IncludeLink};
pub use document::ConfigDocument;
pub use error::{Error, Result};
pub use eval::{EvalContextProvider, FileScope, TerragruntFunctions};
pub use normalize::{BARE_INCLUDE_LABEL, Normalized, normalize_bare_include};
pub use syntax::Syntax;
