use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::encoding;
use super::reader::{raw_rows, ReaderRegistry};
use super::schema::{validate, ValidationError};
use crate::error::{Error, Result};
use crate::record::{
    ClinicalTrial, Drug, Publication, RawRecord, Record, RecordKind, ReconciledDrug,
};

/// A row that failed validation: the raw map exactly as it arrived plus the
/// reason. Rejection never mutates the row, even for kinds that clean text.
#[derive(Debug, Clone)]
pub struct Rejected {
    pub raw: RawRecord,
    pub reason: ValidationError,
}

#[derive(Debug, Clone)]
pub struct ReadOutcome {
    pub kind: RecordKind,
    pub records: Vec<Record>,
    pub rejected: Vec<Rejected>,
}

impl ReadOutcome {
    #[must_use]
    pub fn into_drugs(self) -> Vec<Drug> {
        self.records.into_iter().filter_map(Record::into_drug).collect()
    }

    #[must_use]
    pub fn into_publications(self) -> Vec<Publication> {
        self.records
            .into_iter()
            .filter_map(Record::into_publication)
            .collect()
    }

    #[must_use]
    pub fn into_clinical_trials(self) -> Vec<ClinicalTrial> {
        self.records
            .into_iter()
            .filter_map(Record::into_clinical_trial)
            .collect()
    }

    #[must_use]
    pub fn into_reconciled_drugs(self) -> Vec<ReconciledDrug> {
        self.records
            .into_iter()
            .filter_map(Record::into_reconciled_drug)
            .collect()
    }
}

/// Reads one source file and partitions its rows: format from the registry,
/// bytes decoded under the sniffed encoding, each row validated against
/// `kind` independently. Row failures land in `rejected`; file-level
/// failures (unknown format, I/O, unrepairable JSON, malformed CSV) fail the
/// whole call.
pub fn read_records(
    registry: &ReaderRegistry,
    path: &Path,
    kind: RecordKind,
) -> Result<ReadOutcome> {
    let format = registry.format_for(path)?;
    let bytes = fs::read(path)?;
    let (text, encoding) = encoding::decode_bytes(&bytes);
    debug!(
        path = %path.display(),
        format = %format,
        encoding = %encoding,
        kind = %kind,
        "reading source file"
    );

    let mut records = Vec::new();
    let mut rejected = Vec::new();
    for (index, raw) in raw_rows(format, &text, path)?.into_iter().enumerate() {
        match validate(kind, &raw) {
            Ok(record) => records.push(record),
            Err(reason) => {
                warn!(path = %path.display(), index, %reason, "rejecting record");
                rejected.push(Rejected { raw, reason });
            }
        }
    }
    Ok(ReadOutcome {
        kind,
        records,
        rejected,
    })
}

#[derive(Debug, Default)]
pub struct BatchReadResult {
    pub outcomes: Vec<(PathBuf, ReadOutcome)>,
    pub failures: Vec<(PathBuf, Error)>,
}

impl BatchReadResult {
    /// Valid records across all readable sources, in source order.
    #[must_use]
    pub fn records(self) -> Vec<Record> {
        self.outcomes
            .into_iter()
            .flat_map(|(_, outcome)| outcome.records)
            .collect()
    }
}

/// Reads several sources of one kind. A file that cannot be read is recorded
/// and skipped; it never takes the rest of the batch down with it.
pub fn read_batch(
    registry: &ReaderRegistry,
    paths: &[PathBuf],
    kind: RecordKind,
) -> BatchReadResult {
    let mut result = BatchReadResult::default();
    for path in paths {
        match read_records(registry, path, kind) {
            Ok(outcome) => result.outcomes.push((path.clone(), outcome)),
            Err(err) => {
                warn!(path = %path.display(), error = %err, "skipping unreadable source");
                result.failures.push((path.clone(), err));
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_file(dir: &tempfile::TempDir, name: &str, bytes: &[u8]) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, bytes).unwrap();
        path
    }

    #[test]
    fn partitions_rows_and_preserves_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "clinical_trials.csv",
            b"id,scientific_title,date,journal\n\
              NCT01967433,Use of Diphenhydramine as an Adjunctive Sedative,1 January 2020,Journal of emergency nursing\n\
              ,Missing identifier row,1 January 2020,Journal of emergency nursing\n\
              NCT04188184,Tranexamic Acid Versus Epinephrine,27 April 2020,Journal of emergency nursing\n",
        );

        let outcome =
            read_records(&ReaderRegistry::standard(), &path, RecordKind::ClinicalTrial).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(
            outcome.rejected[0].reason,
            ValidationError::TooShort { field: "id", min: 3 }
        );
        assert_eq!(
            outcome.rejected[0].raw["scientific_title"],
            "Missing identifier row"
        );

        let trials = outcome.into_clinical_trials();
        assert_eq!(trials[0].id, "NCT01967433");
        assert_eq!(trials[1].id, "NCT04188184");
    }

    #[test]
    fn short_csv_row_is_rejected_without_failing_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "pubmed.csv",
            b"id,title,date,journal\n\
              1,A 44-year-old man with erythema of the face diphenhydramine,01/01/2019,Journal of emergency nursing\n\
              2,An evaluation of benadryl for preventing oculogyric crises,01/01/2019\n\
              3,Diphenhydramine hydrochloride helps symptoms of ciguatera fish poisoning,02/01/2019,The Journal of pediatrics\n",
        );

        let outcome =
            read_records(&ReaderRegistry::standard(), &path, RecordKind::Publication).unwrap();
        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.rejected.len(), 1);
        assert_eq!(outcome.rejected[0].reason, ValidationError::Missing("journal"));
        assert_eq!(outcome.rejected[0].raw["id"], "2");
        assert!(!outcome.rejected[0].raw.contains_key("journal"));

        let publications = outcome.into_publications();
        assert_eq!(publications[0].id, 1);
        assert_eq!(publications[1].id, 3);
    }

    #[test]
    fn json_source_keeps_native_types() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(
            &dir,
            "pubmed.json",
            br#"[{"id": 9, "title": "Gold nanoparticles", "date": "01/01/2020", "journal": "Biology"},
                {"id": "10", "title": "Clinical implications", "date": "01/01/2020", "journal": "Neonatal medicine"}]"#,
        );

        let outcome =
            read_records(&ReaderRegistry::standard(), &path, RecordKind::Publication).unwrap();
        assert!(outcome.rejected.is_empty());
        let publications = outcome.into_publications();
        assert_eq!(publications[0].id, 9);
        assert_eq!(publications[1].id, 10);
    }

    #[test]
    fn latin1_source_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let mut bytes = b"id,scientific_title,date,journal\nNCT04153396,Preemptive Infiltration,1 January 2020,".to_vec();
        bytes.extend_from_slice(b"H\xF4pitaux Universitaires de Gen\xE8ve\n");
        let path = write_file(&dir, "clinical_trials.csv", &bytes);

        let outcome =
            read_records(&ReaderRegistry::standard(), &path, RecordKind::ClinicalTrial).unwrap();
        let trials = outcome.into_clinical_trials();
        assert_eq!(trials[0].journal, "Hôpitaux Universitaires de Genève");
    }

    #[test]
    fn written_records_survive_a_reread() {
        let dir = tempfile::tempdir().unwrap();
        let originals = vec![
            Publication {
                id: 7,
                title: "The High Cost of Epinephrine Autoinjectors and Possible Alternatives."
                    .to_string(),
                date: "01/02/2020".to_string(),
                journal: "The journal of allergy and clinical immunology. In practice".to_string(),
            },
            Publication {
                id: 8,
                title: "Time to epinephrine treatment is associated with the risk of mortality."
                    .to_string(),
                date: "01/03/2020".to_string(),
                journal: "The journal of allergy and clinical immunology. In practice".to_string(),
            },
        ];
        let path = write_file(
            &dir,
            "pubmed.json",
            serde_json::to_string(&originals).unwrap().as_bytes(),
        );

        let outcome =
            read_records(&ReaderRegistry::standard(), &path, RecordKind::Publication).unwrap();
        assert!(outcome.rejected.is_empty());
        assert_eq!(outcome.into_publications(), originals);
    }

    #[test]
    fn unknown_extension_fails_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(&dir, "drugs.xml", b"<drugs/>");
        let err = read_records(&ReaderRegistry::standard(), &path, RecordKind::Drug).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat(_)));
    }

    #[test]
    fn batch_skips_unreadable_sources() {
        let dir = tempfile::tempdir().unwrap();
        let good = write_file(
            &dir,
            "pubmed.csv",
            b"id,title,date,journal\n7,The High Cost of Epinephrine Autoinjectors,01/02/2020,The journal of allergy and clinical immunology. In practice\n",
        );
        let missing = dir.path().join("absent.csv");

        let result = read_batch(
            &ReaderRegistry::standard(),
            &[good, missing],
            RecordKind::Publication,
        );
        assert_eq!(result.outcomes.len(), 1);
        assert_eq!(result.failures.len(), 1);
        assert!(matches!(result.failures[0].1, Error::Io(_)));
        assert_eq!(result.records().len(), 1);
    }
}
