//! Labels a bare `include` block.
//!
//! Terragrunt accepts `include { ... }` without a label as well as any
//! number of labeled includes. Decoding is label-count strict, so a single
//! unlabeled include is rewritten to `include "" { ... }` before decoding.
//! The rewrite goes through the format-preserving `hcl-edit` tree, so the
//! rest of the file is rendered back unchanged.

use hcl_edit::Decorated;
use hcl_edit::structure::{BlockLabel, Body};

use crate::document::ConfigDocument;
use crate::error::{Error, Result};
use crate::panic::guard;
use crate::syntax::Syntax;

/// Label given to an include block declared without one.
pub const BARE_INCLUDE_LABEL: &str = "";

/// Outcome of [`normalize_bare_include`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    /// Source text to decode; identical to the input when `changed` is false
    pub source: String,
    /// Whether a label was injected. The source must be parsed again when set.
    pub changed: bool,
}

impl Normalized {
    fn unchanged(doc: &ConfigDocument) -> Self {
        Self {
            source: doc.source().to_string(),
            changed: false,
        }
    }
}

/// Inject the empty label into the single unlabeled top-level `include` block.
///
/// JSON documents are returned untouched. Two or more unlabeled includes fail
/// with [`Error::MultipleBareIncludeBlocks`].
pub fn normalize_bare_include(doc: &ConfigDocument) -> Result<Normalized> {
    if doc.syntax() == Syntax::Json {
        return Ok(Normalized::unchanged(doc));
    }

    let path = doc.path();
    guard(path, || {
        let mut body: Body = hcl_edit::parser::parse_body(doc.source())
            .map_err(|e| Error::parse(path, e.to_string()))?;

        let bare = body
            .get_blocks("include")
            .filter(|block| block.labels.is_empty())
            .count();

        match bare {
            0 => Ok(Normalized::unchanged(doc)),
            1 => {
                for block in body.get_blocks_mut("include") {
                    if block.labels.is_empty() {
                        block
                            .labels
                            .push(BlockLabel::String(Decorated::new(BARE_INCLUDE_LABEL.to_string())));
                    }
                }
                tracing::debug!(%path, "Labeled bare include block");
                Ok(Normalized {
                    source: body.to_string(),
                    changed: true,
                })
            }
            _ => Err(Error::MultipleBareIncludeBlocks { path: path.clone() }),
        }
    })
}
