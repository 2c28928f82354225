use std::path::Path;

use anyhow::{Context, Result};
use console::style;

use drugxref_core::store::{transfer, DirStore, TransferOp};

pub fn run_push(local: &Path, key: &str, bucket: &Path) -> Result<()> {
    let store = DirStore::new(bucket.to_path_buf());
    transfer(TransferOp::Push, &store, local, key)
        .with_context(|| format!("failed to push {} to '{key}'", local.display()))?;
    eprintln!("{} Pushed: {} -> {key}", style("✓").green(), local.display());
    Ok(())
}

pub fn run_pull(key: &str, local: &Path, bucket: &Path) -> Result<()> {
    let store = DirStore::new(bucket.to_path_buf());
    transfer(TransferOp::Pull, &store, local, key)
        .with_context(|| format!("failed to pull '{key}' to {}", local.display()))?;
    eprintln!("{} Pulled: {key} -> {}", style("✓").green(), local.display());
    Ok(())
}
