//! Locals inheritance across `include` hierarchies
//!
//! A child config inherits the locals of every config it includes. Parents
//! are merged in declaration order, then the child's own locals are merged on
//! top. Only one level is followed: a parent resolved on behalf of a child
//! does not resolve its own includes.
//!
//! Parents included with `expose = true` are also readable from the child's
//! expressions as `include.<label>`.

use tgac_fs::NormalizedPath;
use tgac_hcl::{
    BaseBlocks, ConfigDocument, Decoder, EvalContextProvider, ExposedIncludes, IncludeLink,
    TerragruntFunctions,
};

use crate::Result;
use crate::locals::{ResolvedLocals, resolve_locals};

/// A config resolved together with its own decoded blocks
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedConfig {
    /// Absolute path of the config
    pub path: NormalizedPath,
    /// Locals merged over every included parent
    pub locals: ResolvedLocals,
    /// The config's own base blocks
    pub blocks: BaseBlocks,
}

impl ResolvedConfig {
    /// Directory holding the config
    pub fn dir(&self) -> NormalizedPath {
        self.path.parent().unwrap_or_else(|| self.path.clone())
    }

    /// Config directories this config depends on, from its `dependency`
    /// blocks followed by its `dependencies { paths }`, resolved against
    /// [`ResolvedConfig::dir`].
    pub fn dependency_dirs(&self) -> Vec<NormalizedPath> {
        let dir = self.dir();
        self.blocks
            .dependencies
            .iter()
            .map(|dependency| dependency.config_path.as_str())
            .chain(self.blocks.dependency_paths.iter().map(String::as_str))
            .map(|path| NormalizedPath::new(path).absolutize(&dir))
            .collect()
    }
}

/// Resolves the effective locals of a config file
#[derive(Debug, Clone)]
pub struct LocalsResolver<P = TerragruntFunctions> {
    /// Base for relative config paths
    working_dir: NormalizedPath,
    decoder: Decoder<P>,
}

impl LocalsResolver {
    /// Create a resolver using the default Terragrunt function set.
    pub fn new(working_dir: NormalizedPath) -> Self {
        Self::with_provider(working_dir, TerragruntFunctions)
    }
}

impl<P: EvalContextProvider> LocalsResolver<P> {
    /// Create a resolver that evaluates expressions with `provider`.
    pub fn with_provider(working_dir: NormalizedPath, provider: P) -> Self {
        Self {
            working_dir,
            decoder: Decoder::new(provider),
        }
    }

    pub fn working_dir(&self) -> &NormalizedPath {
        &self.working_dir
    }

    pub fn decoder(&self) -> &Decoder<P> {
        &self.decoder
    }

    /// Resolve the locals of the config at `path`.
    ///
    /// With `include_from_child` unset, every included parent is resolved
    /// and merged first; a parent that fails to load or decode is skipped.
    /// Failures of the config itself are returned.
    pub fn resolve(
        &self,
        path: &NormalizedPath,
        include_from_child: Option<&IncludeLink>,
    ) -> Result<ResolvedLocals> {
        Ok(self.resolve_config(path, include_from_child)?.locals)
    }

    /// Resolve the config at `path`, keeping its decoded blocks.
    pub fn resolve_config(
        &self,
        path: &NormalizedPath,
        include_from_child: Option<&IncludeLink>,
    ) -> Result<ResolvedConfig> {
        let path = path.absolutize(&self.working_dir);
        let doc = ConfigDocument::load(&path)?;

        let mut merged = ResolvedLocals::default();
        let mut exposed = ExposedIncludes::new();
        if include_from_child.is_none() {
            for link in self.decoder.decode_includes(&doc)? {
                let parent = link.resolved_path();
                match self.resolve_config(&parent, Some(&link)) {
                    Ok(parent_config) => {
                        tracing::debug!(%path, %parent, label = %link.label, "Merging parent locals");
                        merged.merge(&parent_config.locals);
                        exposed.insert(&link, &parent_config.blocks);
                    }
                    Err(e) => {
                        tracing::debug!(%path, %parent, error = %e, "Skipping unresolvable include");
                    }
                }
            }
        }

        let blocks = self
            .decoder
            .decode_base_blocks_exposing(&doc, include_from_child, &exposed)?;
        let own = resolve_locals(blocks.locals.as_ref())?;
        merged.merge(&own);

        Ok(ResolvedConfig {
            path,
            locals: merged,
            blocks,
        })
    }
}
