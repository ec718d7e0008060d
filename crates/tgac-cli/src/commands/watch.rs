//! `tgac watch`

use std::path::Path;

use tgac_core::WatchWalker;

use crate::context::CommandContext;
use crate::error::{CliError, Result};

/// Print the watch patterns of `dir`, one per line or as a JSON array.
pub fn run_watch(ctx: &CommandContext, dir: &Path, max_depth: Option<usize>, json: bool) -> Result<()> {
    let dir = ctx.resolve(dir);
    if !dir.is_dir() {
        return Err(CliError::user(format!("Not a directory: {dir}")));
    }

    let walker = WatchWalker::new()?.with_max_depth(ctx.max_depth(max_depth));
    let patterns = walker.watch_patterns(&dir)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&patterns)?);
    } else {
        for pattern in &patterns {
            println!("{pattern}");
        }
    }
    Ok(())
}
