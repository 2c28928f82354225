use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use console::style;

use drugxref_core::ingest::{read_batch, read_records, BatchReadResult, ReaderRegistry, Rejected};
use drugxref_core::reconcile::reconcile_all;
use drugxref_core::store::{save_json, ArtifactReceipt, RunManifest};
use drugxref_core::{RawRecord, Record, RecordKind};

pub fn run(
    drugs: &Path,
    publications: &[PathBuf],
    trials: &[PathBuf],
    out_dir: &Path,
) -> Result<()> {
    let registry = ReaderRegistry::standard();

    let drug_outcome = read_records(&registry, drugs, RecordKind::Drug)
        .with_context(|| format!("failed to read drugs from {}", drugs.display()))?;

    let publication_batch = read_batch(&registry, publications, RecordKind::Publication);
    let trial_batch = read_batch(&registry, trials, RecordKind::ClinicalTrial);
    print_failures(&publication_batch);
    print_failures(&trial_batch);
    let failed_sources = publication_batch.failures.len() + trial_batch.failures.len();

    let mut rejected_count = 0;
    let mut receipts: Vec<ArtifactReceipt> = Vec::new();
    rejected_count += stash_rejected(out_dir, drugs, &drug_outcome.rejected, &mut receipts)?;
    for (path, outcome) in &publication_batch.outcomes {
        rejected_count += stash_rejected(out_dir, path, &outcome.rejected, &mut receipts)?;
    }
    for (path, outcome) in &trial_batch.outcomes {
        rejected_count += stash_rejected(out_dir, path, &outcome.rejected, &mut receipts)?;
    }

    let drug_records = drug_outcome.into_drugs();
    let publication_records: Vec<_> = publication_batch
        .records()
        .into_iter()
        .filter_map(Record::into_publication)
        .collect();
    let trial_records: Vec<_> = trial_batch
        .records()
        .into_iter()
        .filter_map(Record::into_clinical_trial)
        .collect();

    let reconciled = reconcile_all(&drug_records, &publication_records, &trial_records);
    let reconciled_receipt = save_json(&out_dir.join("reconciled.json"), &reconciled)?;

    let mut manifest = RunManifest::new().with_counts(
        drug_records.len(),
        publication_records.len(),
        trial_records.len(),
        rejected_count,
    );
    manifest.record_artifact(reconciled_receipt.clone());
    for receipt in receipts {
        manifest.record_artifact(receipt);
    }
    save_json(&out_dir.join("manifest.json"), &manifest)?;

    eprintln!();
    eprintln!(
        "{} {}",
        style("●").green(),
        style("reconciliation complete").bold()
    );
    eprintln!("  Drugs: {}", drug_records.len());
    eprintln!("  Publications: {}", publication_records.len());
    eprintln!("  Clinical trials: {}", trial_records.len());
    eprintln!("  Rejected rows: {rejected_count}");
    eprintln!(
        "  Reconciled: {} entries -> {}",
        reconciled.len(),
        reconciled_receipt.path.display()
    );
    eprintln!("  sha256: {}", style(&reconciled_receipt.sha256).dim());

    if failed_sources > 0 {
        bail!("{failed_sources} source file(s) could not be read");
    }
    Ok(())
}

fn print_failures(batch: &BatchReadResult) {
    for (path, err) in &batch.failures {
        eprintln!(
            "{} {}: {err}",
            style("✗").red().bold(),
            style(path.display()).red()
        );
    }
}

/// Writes one source's rejected rows, raw and unmodified, next to the run's
/// other artifacts. Nothing is written for a fully valid source.
fn stash_rejected(
    out_dir: &Path,
    source: &Path,
    rejected: &[Rejected],
    receipts: &mut Vec<ArtifactReceipt>,
) -> Result<usize> {
    if rejected.is_empty() {
        return Ok(0);
    }
    let raws: Vec<&RawRecord> = rejected.iter().map(|entry| &entry.raw).collect();
    let artifact = out_dir.join(rejected_artifact_name(source));
    let receipt = save_json(&artifact, &raws)
        .with_context(|| format!("failed to write {}", artifact.display()))?;
    eprintln!(
        "{} {}: {} row(s) rejected -> {}",
        style("!").yellow(),
        source.display(),
        rejected.len(),
        receipt.path.display()
    );
    receipts.push(receipt);
    Ok(rejected.len())
}

fn rejected_artifact_name(source: &Path) -> String {
    let name = source.file_name().map_or_else(
        || "source".to_string(),
        |name| name.to_string_lossy().replace('.', "_"),
    );
    format!("rejected_{name}.json")
}
