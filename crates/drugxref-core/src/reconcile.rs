use crate::record::{ClinicalTrial, Drug, Publication, ReconciledDrug};

/// Joins one drug against every publication and trial that mentions it. A
/// mention is a case-insensitive substring hit anywhere in the title, with
/// no word-boundary handling: a name like "pen" matches "Open-label".
/// Matching rows contribute their id and their journal; journals pool into
/// one set across both source types.
#[must_use]
pub fn reconcile(
    drug: &Drug,
    publications: &[Publication],
    trials: &[ClinicalTrial],
) -> ReconciledDrug {
    let needle = drug.name.to_lowercase();
    let mut reconciled = ReconciledDrug::empty(drug.clone());
    for publication in publications {
        if publication.title.to_lowercase().contains(&needle) {
            reconciled.publication_ids.insert(publication.id);
            reconciled.journals.insert(publication.journal.clone());
        }
    }
    for trial in trials {
        if trial.scientific_title.to_lowercase().contains(&needle) {
            reconciled.trial_ids.insert(trial.id.clone());
            reconciled.journals.insert(trial.journal.clone());
        }
    }
    reconciled
}

/// One output per drug, in drug order, including drugs nothing mentions.
#[must_use]
pub fn reconcile_all(
    drugs: &[Drug],
    publications: &[Publication],
    trials: &[ClinicalTrial],
) -> Vec<ReconciledDrug> {
    drugs
        .iter()
        .map(|drug| reconcile(drug, publications, trials))
        .collect()
}
