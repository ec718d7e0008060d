//! Parent and child config classification
//!
//! A config without any `include` that also defines no `terraform` source is
//! most likely a parent meant to be included by others, rather than a
//! deployable project of its own.

use tgac_fs::NormalizedPath;
use tgac_hcl::{ConfigDocument, Decoder, EvalContextProvider, IncludeLink};

use crate::Result;
use crate::locals::{ResolvedLocals, Tristate};

/// Role of a config in its hierarchy
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigRole {
    /// Included by other configs; declares no includes or terraform source
    Parent,
    /// A project config, with the includes it declares (possibly none)
    Child { includes: Vec<IncludeLink> },
}

impl ConfigRole {
    pub fn is_parent(&self) -> bool {
        matches!(self, Self::Parent)
    }

    /// Whether a config with this role and `locals` is a deployable project.
    ///
    /// `atlantis_project = true` turns a parent into a project and
    /// `atlantis_project = false` opts a child out.
    pub fn is_project(&self, locals: &ResolvedLocals) -> bool {
        match self {
            Self::Parent => locals.marked_project() == Tristate::True,
            Self::Child { .. } => locals.marked_project() != Tristate::False,
        }
    }
}

/// Classify the config at `path`.
///
/// Errors loading the file or decoding its includes are returned. When the
/// remaining base blocks fail to decode, the `terraform` block is only
/// checked for a `source` attribute, without evaluating it.
pub fn classify<P: EvalContextProvider>(
    decoder: &Decoder<P>,
    path: &NormalizedPath,
) -> Result<ConfigRole> {
    let doc = ConfigDocument::load(path)?;

    let includes = decoder.decode_includes(&doc)?;
    if !includes.is_empty() {
        return Ok(ConfigRole::Child { includes });
    }

    let has_source = match decoder.decode_base_blocks(&doc, None) {
        Ok(blocks) => blocks.terraform_source.is_some(),
        Err(e) => {
            tracing::debug!(%path, error = %e, "Classifying from partial decode");
            declares_terraform_source(&doc)
        }
    };

    if has_source {
        Ok(ConfigRole::Child {
            includes: Vec::new(),
        })
    } else {
        Ok(ConfigRole::Parent)
    }
}

fn declares_terraform_source(doc: &ConfigDocument) -> bool {
    doc.blocks("terraform")
        .any(|block| block.body().attributes().any(|attr| attr.key() == "source"))
}
