use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Result};
use console::style;

use drugxref_core::ingest::{read_records, ReaderRegistry};
use drugxref_core::RecordKind;

pub fn run(kind_name: &str, files: &[PathBuf]) -> Result<()> {
    let registry = ReaderRegistry::standard();
    let kind = resolve_kind(&registry, kind_name)?;

    let mut failed = 0;
    for path in files {
        check_file(&registry, path, kind, &mut failed);
    }

    if failed > 0 {
        bail!("{failed} file(s) could not be read");
    }
    Ok(())
}

fn resolve_kind(registry: &ReaderRegistry, name: &str) -> Result<RecordKind> {
    registry.kind_for(name).map_err(|_| {
        let known: Vec<&str> = registry.kinds().map(|kind| kind.as_str()).collect();
        anyhow!(
            "unknown record kind '{name}' (expected one of: {})",
            known.join(", ")
        )
    })
}

fn check_file(registry: &ReaderRegistry, path: &Path, kind: RecordKind, failed: &mut usize) {
    match read_records(registry, path, kind) {
        Ok(outcome) => {
            let marker = if outcome.rejected.is_empty() {
                style("✓").green()
            } else {
                style("!").yellow()
            };
            eprintln!(
                "{marker} {}: {} valid, {} rejected",
                path.display(),
                outcome.records.len(),
                outcome.rejected.len()
            );
            for entry in &outcome.rejected {
                eprintln!("    {} {}", style("✗").red(), entry.reason);
            }
        }
        Err(err) => {
            eprintln!(
                "{} {}: {err}",
                style("✗").red().bold(),
                style(path.display()).red()
            );
            *failed += 1;
        }
    }
}
