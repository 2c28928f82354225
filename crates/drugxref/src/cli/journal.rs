use std::path::Path;

use anyhow::{bail, Context, Result};
use console::style;

use drugxref_core::ingest::{read_records, ReaderRegistry};
use drugxref_core::journal::journal_most_cited;
use drugxref_core::RecordKind;

pub fn run(artifact: &Path) -> Result<()> {
    let registry = ReaderRegistry::standard();
    let outcome = read_records(&registry, artifact, RecordKind::ReconciledDrug)
        .with_context(|| format!("failed to read {}", artifact.display()))?;
    if !outcome.rejected.is_empty() {
        bail!(
            "{} malformed entries in {}",
            outcome.rejected.len(),
            artifact.display()
        );
    }

    let reconciled = outcome.into_reconciled_drugs();
    let top = journal_most_cited(&reconciled)?;
    if top.len() > 1 {
        eprintln!("{} {} journals tied", style("●").blue(), top.len());
    }
    for journal in &top {
        println!("{journal}");
    }
    Ok(())
}
