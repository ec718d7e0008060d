//! Partial decoding of Terragrunt configurations.
//!
//! Only two shapes are ever decoded: the `include` blocks on their own, and
//! the "base" blocks (`include`, `locals`, `dependency`, `dependencies` and
//! the `terraform` source) that are needed before a full evaluation.

use std::borrow::Cow;
use std::collections::HashSet;

use hcl::Value;
use hcl::eval::{Context, Evaluate};
use tgac_fs::NormalizedPath;

use crate::document::ConfigDocument;
use crate::error::{Error, Result};
use crate::eval::{EvalContextProvider, FileScope, TerragruntFunctions};
use crate::normalize::{BARE_INCLUDE_LABEL, normalize_bare_include};
use crate::panic::guard;

/// One `include` block of a configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncludeLink {
    /// Block label; [`BARE_INCLUDE_LABEL`] for an include declared without one
    pub label: String,
    /// The evaluated `path` attribute, as written (may be relative)
    pub path: String,
    /// Whether the parent's values are exposed to the child as `include.<label>`
    pub expose: bool,
    /// The `merge_strategy` attribute, if set
    pub merge_strategy: Option<String>,
    /// Config file that declares this include
    pub declared_in: NormalizedPath,
}

impl IncludeLink {
    pub fn is_bare(&self) -> bool {
        self.label == BARE_INCLUDE_LABEL
    }

    /// The included file, with a relative `path` resolved against the
    /// directory of the declaring config.
    pub fn resolved_path(&self) -> NormalizedPath {
        let dir = self
            .declared_in
            .parent()
            .unwrap_or_else(|| self.declared_in.clone());
        NormalizedPath::new(&self.path).absolutize(&dir)
    }
}

/// A `dependency "<name>" { config_path = ... }` block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyBlock {
    pub name: String,
    pub config_path: String,
}

/// The base blocks of one configuration
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BaseBlocks {
    pub includes: Vec<IncludeLink>,
    /// Evaluated `locals` as an object, or `None` when no locals block exists
    pub locals: Option<Value>,
    pub dependencies: Vec<DependencyBlock>,
    /// Paths from the `dependencies { paths = [...] }` block
    pub dependency_paths: Vec<String>,
    /// `terraform { source = ... }`
    pub terraform_source: Option<String>,
}

impl BaseBlocks {
    /// The values a child sees through an exposed include of this config:
    /// `locals` (empty when none are declared) and `terraform.source` when set.
    pub fn exposed_value(&self) -> Value {
        let mut value = hcl::Map::new();
        let locals = match &self.locals {
            Some(locals) => locals.clone(),
            None => Value::Object(hcl::Map::new()),
        };
        value.insert("locals".to_string(), locals);
        if let Some(source) = &self.terraform_source {
            let mut terraform = hcl::Map::new();
            terraform.insert("source".to_string(), Value::from(source.as_str()));
            value.insert("terraform".to_string(), Value::Object(terraform));
        }
        Value::Object(value)
    }
}

/// Parent values a child can read through `include`
///
/// A labeled include with `expose = true` is visible as `include.<label>`;
/// an exposed bare include puts its values directly on `include`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExposedIncludes {
    values: hcl::Map<String, Value>,
}

impl ExposedIncludes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Expose `parent` through `link`. Links without `expose` are ignored.
    pub fn insert(&mut self, link: &IncludeLink, parent: &BaseBlocks) {
        if !link.expose {
            return;
        }
        match parent.exposed_value() {
            Value::Object(fields) if link.is_bare() => self.values.extend(fields),
            value => {
                self.values.insert(link.label.clone(), value);
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn to_value(&self) -> Value {
        Value::Object(self.values.clone())
    }
}

/// Decodes include and base blocks, evaluating expressions with the
/// context of an [`EvalContextProvider`].
#[derive(Debug, Clone)]
pub struct Decoder<P = TerragruntFunctions> {
    provider: P,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::new(TerragruntFunctions)
    }
}

impl<P: EvalContextProvider> Decoder<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Decode only the `include` blocks of `doc`.
    pub fn decode_includes(&self, doc: &ConfigDocument) -> Result<Vec<IncludeLink>> {
        let doc = prepare(doc)?;
        let scope = FileScope::new(doc.path().clone());
        self.with_scope(&doc, &scope, |ctx| decode_includes(&doc, ctx))
    }

    /// Decode the base blocks of `doc`.
    ///
    /// `include_from_child` is set when `doc` is a parent being resolved on
    /// behalf of the child that declared the link; include-relative
    /// functions then evaluate against that child.
    pub fn decode_base_blocks(
        &self,
        doc: &ConfigDocument,
        include_from_child: Option<&IncludeLink>,
    ) -> Result<BaseBlocks> {
        self.decode_base_blocks_exposing(doc, include_from_child, &ExposedIncludes::new())
    }

    /// Like [`Decoder::decode_base_blocks`], with `exposed` declared as the
    /// `include` variable while `locals` and the remaining blocks evaluate.
    pub fn decode_base_blocks_exposing(
        &self,
        doc: &ConfigDocument,
        include_from_child: Option<&IncludeLink>,
        exposed: &ExposedIncludes,
    ) -> Result<BaseBlocks> {
        let doc = prepare(doc)?;
        let mut scope = FileScope::new(doc.path().clone());
        if let Some(link) = include_from_child {
            scope = scope.with_child(link.declared_in.clone());
        }

        self.with_scope(&doc, &scope, |ctx| {
            let includes = decode_includes(&doc, ctx)?;
            if !exposed.is_empty() {
                ctx.declare_var("include", exposed.to_value());
            }
            let locals = evaluate_locals(&doc, ctx)?;
            if let Some(locals) = &locals {
                ctx.declare_var("local", locals.clone());
            }

            Ok(BaseBlocks {
                includes,
                locals,
                dependencies: decode_dependency_blocks(&doc, ctx)?,
                dependency_paths: decode_dependency_paths(&doc, ctx)?,
                terraform_source: decode_terraform_source(&doc, ctx)?,
            })
        })
    }

    fn with_scope<T>(
        &self,
        doc: &ConfigDocument,
        scope: &FileScope,
        f: impl FnOnce(&mut Context<'static>) -> Result<T>,
    ) -> Result<T> {
        let mut ctx = self.provider.context_for(scope);
        let _scope = scope.enter();
        guard(doc.path(), || f(&mut ctx))
    }
}

/// Label a bare include, re-parsing the document when it changed.
fn prepare(doc: &ConfigDocument) -> Result<Cow<'_, ConfigDocument>> {
    let normalized = normalize_bare_include(doc)?;
    if normalized.changed {
        Ok(Cow::Owned(ConfigDocument::parse(normalized.source, doc.path())?))
    } else {
        Ok(Cow::Borrowed(doc))
    }
}

fn decode_includes(doc: &ConfigDocument, ctx: &Context<'_>) -> Result<Vec<IncludeLink>> {
    let path = doc.path();
    let mut seen = HashSet::new();
    let mut includes = Vec::new();

    for block in doc.blocks("include") {
        let label = match block.labels() {
            [label] => label.as_str().to_string(),
            labels => {
                return Err(Error::decode(
                    path,
                    format!("include block needs one label, found {}", labels.len()),
                ));
            }
        };
        if !seen.insert(label.clone()) {
            return Err(Error::DuplicateIncludeLabel {
                path: path.clone(),
                label,
            });
        }

        let body = block.body();
        let include_path = match attribute(body, "path") {
            Some(expr) => expect_string(evaluate(expr, ctx, path)?, path, "include.path")?,
            None => {
                return Err(Error::decode(
                    path,
                    format!("include {label:?} is missing the required `path` attribute"),
                ));
            }
        };
        let expose = match attribute(body, "expose") {
            Some(expr) => expect_bool(evaluate(expr, ctx, path)?, path, "include.expose")?,
            None => false,
        };
        let merge_strategy = attribute(body, "merge_strategy")
            .map(|expr| expect_string(evaluate(expr, ctx, path)?, path, "include.merge_strategy"))
            .transpose()?;

        includes.push(IncludeLink {
            label,
            path: include_path,
            expose,
            merge_strategy,
            declared_in: path.clone(),
        });
    }

    Ok(includes)
}

/// Evaluate every `locals` attribute, letting locals refer to each other.
///
/// Attributes are evaluated in passes; each pass sees the locals resolved so
/// far as `local.<name>`. Evaluation stops with an error once a pass makes no
/// progress.
fn evaluate_locals(doc: &ConfigDocument, ctx: &mut Context<'_>) -> Result<Option<Value>> {
    let mut pending: Vec<&hcl::Attribute> = doc
        .blocks("locals")
        .flat_map(|block| block.body().attributes())
        .collect();
    if doc.blocks("locals").next().is_none() {
        return Ok(None);
    }

    let mut resolved = hcl::Map::new();
    while !pending.is_empty() {
        ctx.declare_var("local", Value::Object(resolved.clone()));

        let mut unresolved = Vec::new();
        let mut last_error = None;
        for attr in pending.iter().copied() {
            match attr.expr().evaluate(ctx) {
                Ok(value) => {
                    resolved.insert(attr.key().to_string(), value);
                }
                Err(e) => {
                    last_error = Some(format!("local.{}: {e}", attr.key()));
                    unresolved.push(attr);
                }
            }
        }

        if unresolved.len() == pending.len() {
            let message = last_error.unwrap_or_else(|| "locals could not be evaluated".to_string());
            return Err(Error::decode(doc.path(), message));
        }
        pending = unresolved;
    }

    Ok(Some(Value::Object(resolved)))
}

fn decode_dependency_blocks(
    doc: &ConfigDocument,
    ctx: &Context<'_>,
) -> Result<Vec<DependencyBlock>> {
    let path = doc.path();
    doc.blocks("dependency")
        .map(|block| {
            let name = match block.labels() {
                [label] => label.as_str().to_string(),
                _ => return Err(Error::decode(path, "dependency block needs one label")),
            };
            let config_path = match attribute(block.body(), "config_path") {
                Some(expr) => expect_string(evaluate(expr, ctx, path)?, path, "dependency.config_path")?,
                None => {
                    return Err(Error::decode(
                        path,
                        format!("dependency {name:?} is missing `config_path`"),
                    ));
                }
            };
            Ok(DependencyBlock { name, config_path })
        })
        .collect()
}

fn decode_dependency_paths(doc: &ConfigDocument, ctx: &Context<'_>) -> Result<Vec<String>> {
    let path = doc.path();
    let mut paths = Vec::new();
    for block in doc.blocks("dependencies") {
        let Some(expr) = attribute(block.body(), "paths") else {
            continue;
        };
        match evaluate(expr, ctx, path)? {
            Value::Array(items) => {
                for item in items {
                    paths.push(expect_string(item, path, "dependencies.paths")?);
                }
            }
            other => {
                return Err(Error::decode(
                    path,
                    format!("dependencies.paths must be a list, got {other:?}"),
                ));
            }
        }
    }
    Ok(paths)
}

fn decode_terraform_source(doc: &ConfigDocument, ctx: &Context<'_>) -> Result<Option<String>> {
    let path = doc.path();
    let mut source = None;
    for block in doc.blocks("terraform") {
        if let Some(expr) = attribute(block.body(), "source") {
            source = Some(expect_string(evaluate(expr, ctx, path)?, path, "terraform.source")?);
        }
    }
    Ok(source)
}

fn attribute<'a>(body: &'a hcl::Body, key: &str) -> Option<&'a hcl::Expression> {
    body.attributes()
        .find(|attr| attr.key() == key)
        .map(|attr| attr.expr())
}

fn evaluate(expr: &hcl::Expression, ctx: &Context<'_>, path: &NormalizedPath) -> Result<Value> {
    expr.evaluate(ctx)
        .map_err(|e| Error::decode(path, e.to_string()))
}

fn expect_string(value: Value, path: &NormalizedPath, what: &str) -> Result<String> {
    match value {
        Value::String(s) => Ok(s),
        other => Err(Error::decode(
            path,
            format!("{what} must be a string, got {other:?}"),
        )),
    }
}

fn expect_bool(value: Value, path: &NormalizedPath, what: &str) -> Result<bool> {
    match value {
        Value::Bool(b) => Ok(b),
        other => Err(Error::decode(
            path,
            format!("{what} must be a bool, got {other:?}"),
        )),
    }
}
