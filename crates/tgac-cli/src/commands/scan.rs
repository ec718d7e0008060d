//! `tgac scan`

use serde::Serialize;
use tgac_core::{ConfigRole, LocalsResolver, ResolvedLocals, WatchWalker, classify, discover_configs};
use tgac_fs::NormalizedPath;
use tgac_hcl::IncludeLink;

use crate::context::CommandContext;
use crate::error::{CliError, Result};

/// One discovered config in the scan report
#[derive(Debug, Serialize)]
struct ScanEntry {
    config: String,
    role: &'static str,
    project: bool,
    includes: Vec<IncludeEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    locals: Option<ResolvedLocals>,
    /// Config directories named by `dependency` and `dependencies` blocks
    dependencies: Vec<String>,
    watch_patterns: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

/// One `include` of a child config
#[derive(Debug, Serialize)]
struct IncludeEntry {
    label: String,
    path: String,
    expose: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    merge_strategy: Option<String>,
}

impl From<&IncludeLink> for IncludeEntry {
    fn from(link: &IncludeLink) -> Self {
        Self {
            label: link.label.clone(),
            path: link.resolved_path().as_str().to_string(),
            expose: link.expose,
            merge_strategy: link.merge_strategy.clone(),
        }
    }
}

impl ScanEntry {
    fn new(config: &NormalizedPath) -> Self {
        Self {
            config: config.as_str().to_string(),
            role: "unknown",
            project: false,
            includes: Vec::new(),
            locals: None,
            dependencies: Vec::new(),
            watch_patterns: Vec::new(),
            errors: Vec::new(),
        }
    }
}

/// Discover configs under the context root and print their metadata as a
/// JSON array.
///
/// Failures are recorded on the entry of the config they belong to.
pub fn run_scan(ctx: &CommandContext, max_depth: Option<usize>) -> Result<()> {
    let root = &ctx.root;
    if !root.is_dir() {
        return Err(CliError::user(format!("Not a directory: {root}")));
    }

    let resolver = LocalsResolver::new(ctx.working_dir.clone());
    let walker = WatchWalker::new()?.with_max_depth(ctx.max_depth(max_depth));

    let entries: Vec<ScanEntry> = discover_configs(root)?
        .iter()
        .map(|config| scan_config(&resolver, &walker, config))
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

fn scan_config(resolver: &LocalsResolver, walker: &WatchWalker, config: &NormalizedPath) -> ScanEntry {
    let mut entry = ScanEntry::new(config);

    let role = match classify(resolver.decoder(), config) {
        Ok(role) => role,
        Err(e) => {
            tracing::debug!(%config, error = %e, "Failed to classify config");
            entry.errors.push(e.to_string());
            return entry;
        }
    };
    entry.role = match &role {
        ConfigRole::Parent => "parent",
        ConfigRole::Child { .. } => "child",
    };
    if let ConfigRole::Child { includes } = &role {
        entry.includes = includes.iter().map(IncludeEntry::from).collect();
    }

    let resolved = match resolver.resolve_config(config, None) {
        Ok(resolved) => resolved,
        Err(e) => {
            entry.errors.push(e.to_string());
            return entry;
        }
    };
    entry.project = role.is_project(&resolved.locals);
    entry.dependencies = resolved
        .dependency_dirs()
        .iter()
        .map(|dir| dir.as_str().to_string())
        .collect();

    if entry.project {
        let source = resolved.blocks.terraform_source.as_deref();
        match walker.project_watch_patterns(&resolved.dir(), source) {
            Ok(patterns) => entry.watch_patterns = patterns.into_iter().collect(),
            Err(e) => entry.errors.push(e.to_string()),
        }
    }
    entry.locals = Some(resolved.locals);

    entry
}
