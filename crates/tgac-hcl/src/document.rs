//! Parsed configuration documents

use tgac_fs::{NormalizedPath, io};

use crate::error::{Error, Result};
use crate::json;
use crate::panic::guard;
use crate::syntax::Syntax;

/// One parsed configuration file.
///
/// A document is immutable: normalization produces new source text, which is
/// parsed into a new document.
#[derive(Debug, Clone)]
pub struct ConfigDocument {
    path: NormalizedPath,
    source: String,
    syntax: Syntax,
    body: hcl::Body,
}

impl ConfigDocument {
    /// Parse `source`, choosing the syntax from the extension of `path`.
    pub fn parse(source: impl Into<String>, path: &NormalizedPath) -> Result<Self> {
        let source = source.into();
        let syntax = Syntax::from_path(path);
        let body = guard(path, || match syntax {
            Syntax::Native => parse_native(&source, path),
            Syntax::Json => parse_json(&source, path),
        })?;

        Ok(Self {
            path: path.clone(),
            source,
            syntax,
            body,
        })
    }

    /// Read and parse the file at `path`.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        let source = io::read_text(path)?;
        Self::parse(source, path)
    }

    /// The file this document was parsed from
    pub fn path(&self) -> &NormalizedPath {
        &self.path
    }

    /// The source text as given to [`ConfigDocument::parse`]
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn syntax(&self) -> Syntax {
        self.syntax
    }

    /// The parsed body. JSON documents hold only the blocks tgac reads.
    pub fn body(&self) -> &hcl::Body {
        &self.body
    }

    /// Top-level blocks with the given identifier, in declaration order.
    pub fn blocks<'a>(&'a self, ident: &'a str) -> impl Iterator<Item = &'a hcl::Block> + 'a {
        self.body
            .blocks()
            .filter(move |block| block.identifier() == ident)
    }
}

fn parse_native(source: &str, path: &NormalizedPath) -> Result<hcl::Body> {
    hcl::parse(source).map_err(|e| Error::parse(path, e.to_string()))
}

fn parse_json(source: &str, path: &NormalizedPath) -> Result<hcl::Body> {
    let value: serde_json::Value =
        serde_json::from_str(source).map_err(|e| Error::parse(path, e.to_string()))?;
    let native = json::to_native_source(&value).map_err(|message| Error::parse(path, message))?;
    parse_native(&native, path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_native_blocks() {
        let path = NormalizedPath::new("/live/terragrunt.hcl");
        let doc = ConfigDocument::parse(
            "include \"root\" {\n  path = \"../root.hcl\"\n}\nlocals {\n  a = 1\n}\n",
            &path,
        )
        .unwrap();

        assert_eq!(doc.syntax(), Syntax::Native);
        assert_eq!(doc.blocks("include").count(), 1);
        assert_eq!(doc.blocks("locals").count(), 1);
        assert_eq!(doc.blocks("terraform").count(), 0);
    }

    #[test]
    fn parses_json_blocks() {
        let path = NormalizedPath::new("/live/terragrunt.hcl.json");
        let doc = ConfigDocument::parse(
            r#"{"locals": {"atlantis_workflow": "custom"}, "terraform": {"source": "../m"}}"#,
            &path,
        )
        .unwrap();

        assert_eq!(doc.syntax(), Syntax::Json);
        assert_eq!(doc.blocks("locals").count(), 1);
        assert_eq!(doc.blocks("terraform").count(), 1);
    }

    #[test]
    fn native_syntax_errors_name_the_file() {
        let path = NormalizedPath::new("/live/terragrunt.hcl");
        let err = ConfigDocument::parse("locals {", &path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
        assert!(err.to_string().contains("/live/terragrunt.hcl"));
    }

    #[test]
    fn invalid_json_is_a_parse_error() {
        let path = NormalizedPath::new("/live/terragrunt.hcl.json");
        let err = ConfigDocument::parse("{ not json", &path).unwrap_err();
        assert!(matches!(err, Error::Parse { .. }));
    }
}
