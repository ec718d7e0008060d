//! `tgac locals`

use std::path::Path;

use tgac_core::LocalsResolver;

use crate::context::CommandContext;
use crate::error::Result;

/// Resolve the locals of `config` and print them as JSON.
pub fn run_locals(ctx: &CommandContext, config: &Path) -> Result<()> {
    let resolver = LocalsResolver::new(ctx.working_dir.clone());
    let path = ctx.resolve(config);
    let locals = resolver.resolve(&path, None)?;

    println!("{}", serde_json::to_string_pretty(&locals)?);
    Ok(())
}
