//! Watch patterns from local module references
//!
//! A project depends on every module it calls through a local `source`
//! (`./x`, `../x`, `.\x`, `..\x`), and transitively on the modules those call.
//! [`WatchWalker`] follows those references depth-first and yields, for each
//! reachable module directory, the globs covering its Terraform and OpenTofu
//! files. The starting directory itself is not part of the result.

use std::collections::BTreeSet;

use hcl::Value;
use hcl::eval::{Context, Evaluate};
use tgac_fs::{ConfigFamily, ModuleFileMatcher, NormalizedPath, io};
use tgac_hcl::ConfigDocument;

use crate::Result;

const LOCAL_SOURCE_PREFIXES: [&str; 4] = ["./", "../", ".\\", "..\\"];

/// Whether a module `source` refers to a directory on disk.
pub fn is_local_module_source(source: &str) -> bool {
    LOCAL_SOURCE_PREFIXES
        .iter()
        .any(|prefix| source.starts_with(prefix))
}

/// Collect the `source` of every `module "<name>"` block in the module files
/// directly inside `dir`.
///
/// Files that cannot be read or parsed are skipped, as are sources that do
/// not evaluate to a string without any variables or functions in scope.
pub fn extract_module_sources(
    dir: &NormalizedPath,
    matcher: &ModuleFileMatcher,
) -> Result<Vec<String>> {
    let ctx = Context::new();
    let mut sources = Vec::new();

    for file in io::list_files(dir)? {
        if !matcher.is_match(&file) {
            continue;
        }
        let doc = match ConfigDocument::load(&file) {
            Ok(doc) => doc,
            Err(e) => {
                tracing::debug!(%file, error = %e, "Skipping unparseable module file");
                continue;
            }
        };

        for block in doc.blocks("module") {
            if block.labels().is_empty() {
                continue;
            }
            let Some(attr) = block.body().attributes().find(|attr| attr.key() == "source") else {
                continue;
            };
            match attr.expr().evaluate(&ctx) {
                Ok(Value::String(source)) => sources.push(source),
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(%file, error = %e, "Skipping non-literal module source");
                }
            }
        }
    }

    Ok(sources)
}

/// Computes the watch patterns of a directory
#[derive(Debug, Clone)]
pub struct WatchWalker {
    matcher: ModuleFileMatcher,
    max_depth: usize,
}

impl WatchWalker {
    /// Module nesting depth followed when none is configured
    pub const DEFAULT_MAX_DEPTH: usize = 64;

    pub fn new() -> Result<Self> {
        Ok(Self {
            matcher: ModuleFileMatcher::new()?,
            max_depth: Self::DEFAULT_MAX_DEPTH,
        })
    }

    /// Stop descending once modules are `max_depth` references away from the root.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The watch patterns of every module reachable from `root`.
    ///
    /// Failing to list `root` is an error. A module directory that cannot be
    /// listed, including one that does not exist, contributes its patterns
    /// but no further modules.
    pub fn watch_patterns(&self, root: &NormalizedPath) -> Result<BTreeSet<String>> {
        self.project_watch_patterns(root, None)
    }

    /// The watch patterns of a Terragrunt project in `root`.
    ///
    /// A local `terraform_source` counts as one more module reference of
    /// `root`: its directory is watched and its modules are followed like
    /// those called from `root`'s own files.
    pub fn project_watch_patterns(
        &self,
        root: &NormalizedPath,
        terraform_source: Option<&str>,
    ) -> Result<BTreeSet<String>> {
        let mut sources = extract_module_sources(root, &self.matcher)?;
        if let Some(source) = terraform_source {
            sources.push(source.to_string());
        }
        let mut patterns = BTreeSet::new();
        self.visit(root, &sources, 1, &mut patterns);
        Ok(patterns)
    }

    fn visit(
        &self,
        dir: &NormalizedPath,
        sources: &[String],
        depth: usize,
        patterns: &mut BTreeSet<String>,
    ) {
        for source in sources.iter().filter(|s| is_local_module_source(s)) {
            let module_dir = dir.join(source);
            let [tf, tofu] = ConfigFamily::watch_patterns(&module_dir);
            // Seen modules are skipped, which also ends reference cycles
            if patterns.contains(&tf) {
                continue;
            }
            patterns.insert(tf);
            patterns.insert(tofu);

            let nested = match extract_module_sources(&module_dir, &self.matcher) {
                Ok(nested) => nested,
                Err(e) => {
                    tracing::debug!(module = %module_dir, error = %e, "Treating unreadable module as empty");
                    continue;
                }
            };
            if depth >= self.max_depth {
                if nested.iter().any(|s| is_local_module_source(s)) {
                    tracing::warn!(
                        module = %module_dir,
                        max_depth = self.max_depth,
                        "Module nesting exceeds the maximum depth; not descending further"
                    );
                }
                continue;
            }
            self.visit(&module_dir, &nested, depth + 1, patterns);
        }
    }
}
