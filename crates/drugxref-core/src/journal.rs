use std::collections::BTreeMap;

use crate::error::{Error, Result};
use crate::record::ReconciledDrug;

/// Journals cited by the most distinct drugs. Per-drug journal sets already
/// dedupe, so a journal counts once per drug however many of its articles
/// matched. Every journal tied at the maximum comes back, lexicographically
/// sorted; an input citing no journals at all is an error.
pub fn journal_most_cited(reconciled: &[ReconciledDrug]) -> Result<Vec<String>> {
    let mut citations: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in reconciled {
        for journal in &entry.journals {
            *citations.entry(journal.as_str()).or_insert(0) += 1;
        }
    }
    let best = citations.values().copied().max().ok_or(Error::EmptyInput)?;
    Ok(citations
        .into_iter()
        .filter(|(_, count)| *count == best)
        .map(|(journal, _)| journal.to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Drug;

    fn entry(name: &str, journals: &[&str]) -> ReconciledDrug {
        let mut reconciled = ReconciledDrug::empty(Drug {
            code: "X00XX".to_string(),
            name: name.to_string(),
        });
        reconciled
            .journals
            .extend(journals.iter().map(ToString::to_string));
        reconciled
    }

    fn canonical() -> Vec<ReconciledDrug> {
        vec![
            entry(
                "DIPHENHYDRAMINE",
                &["The Journal of pediatrics", "Journal of emergency nursing"],
            ),
            entry(
                "TETRACYCLINE",
                &[
                    "Psychopharmacology",
                    "American journal of veterinary research",
                    "Journal of food protection",
                ],
            ),
            entry("ETHANOL", &["Psychopharmacology"]),
            entry("ATROPINE", &[]),
            entry(
                "EPINEPHRINE",
                &[
                    "Journal of emergency nursing",
                    "The journal of allergy and clinical immunology. In practice",
                ],
            ),
            entry(
                "ISOPRENALINE",
                &["Journal of photochemistry and photobiology. B, Biology"],
            ),
            entry(
                "BETAMETHASONE",
                &[
                    "Hôpitaux Universitaires de Genève",
                    "Journal of back and musculoskeletal rehabilitation",
                    "The journal of maternal-fetal & neonatal medicine",
                ],
            ),
        ]
    }

    #[test]
    fn all_maximum_ties_come_back_sorted() {
        // Two journals reach two distinct drugs each.
        let top = journal_most_cited(&canonical()).unwrap();
        assert_eq!(
            top,
            vec!["Journal of emergency nursing", "Psychopharmacology"]
        );
    }

    #[test]
    fn single_winner_when_tie_breaks() {
        let mut entries = canonical();
        entries.retain(|entry| entry.drug.name != "ETHANOL");
        let top = journal_most_cited(&entries).unwrap();
        assert_eq!(top, vec!["Journal of emergency nursing"]);
    }

    #[test]
    fn score_is_distinct_drugs_not_articles() {
        let entries = vec![
            entry("DIPHENHYDRAMINE", &["Journal of emergency nursing"]),
            entry(
                "EPINEPHRINE",
                &[
                    "Journal of emergency nursing",
                    "The journal of allergy and clinical immunology. In practice",
                ],
            ),
        ];
        let top = journal_most_cited(&entries).unwrap();
        assert_eq!(top, vec!["Journal of emergency nursing"]);
    }

    #[test]
    fn no_journals_anywhere_is_an_error() {
        assert!(matches!(
            journal_most_cited(&[]).unwrap_err(),
            Error::EmptyInput
        ));
        let entries = vec![entry("ATROPINE", &[]), entry("ETHANOL", &[])];
        assert!(matches!(
            journal_most_cited(&entries).unwrap_err(),
            Error::EmptyInput
        ));
    }

    #[test]
    fn empty_string_journal_is_rankable() {
        let entries = vec![
            entry("GLUCAGON", &[""]),
            entry("ETHANOL", &["", "Psychopharmacology"]),
        ];
        let top = journal_most_cited(&entries).unwrap();
        assert_eq!(top, vec![""]);
    }
}
