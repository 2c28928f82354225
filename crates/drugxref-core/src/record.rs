use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Untyped source row: column/field name to raw JSON value. CSV rows arrive
/// with every value as a string; JSON rows keep their native types.
pub type RawRecord = serde_json::Map<String, serde_json::Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Drug,
    Publication,
    ClinicalTrial,
    ReconciledDrug,
}

impl RecordKind {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Drug => "drug",
            Self::Publication => "publication",
            Self::ClinicalTrial => "clinical_trial",
            Self::ReconciledDrug => "reconciled_drug",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RecordKind {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "drug" => Ok(Self::Drug),
            "publication" => Ok(Self::Publication),
            "clinical_trial" => Ok(Self::ClinicalTrial),
            "reconciled_drug" => Ok(Self::ReconciledDrug),
            _ => Err(crate::Error::UnknownKind(s.to_string())),
        }
    }
}

/// Wire names follow the upstream exports: the ATC code column is `atccode`
/// and the name column is `drug`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Drug {
    #[serde(rename = "atccode")]
    pub code: String,
    #[serde(rename = "drug")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Publication {
    pub id: i64,
    pub title: String,
    pub date: String,
    pub journal: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClinicalTrial {
    pub id: String,
    pub scientific_title: String,
    pub date: String,
    pub journal: String,
}

/// One drug joined against everything that mentions it. Sets keep the
/// serialized artifact deterministic; empty-string journals are legal values
/// and survive into the output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciledDrug {
    pub drug: Drug,
    #[serde(rename = "pubmed")]
    pub publication_ids: BTreeSet<i64>,
    #[serde(rename = "clinical_trials")]
    pub trial_ids: BTreeSet<String>,
    pub journals: BTreeSet<String>,
}

impl ReconciledDrug {
    #[must_use]
    pub fn empty(drug: Drug) -> Self {
        Self {
            drug,
            publication_ids: BTreeSet::new(),
            trial_ids: BTreeSet::new(),
            journals: BTreeSet::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Record {
    Drug(Drug),
    Publication(Publication),
    ClinicalTrial(ClinicalTrial),
    ReconciledDrug(ReconciledDrug),
}

impl Record {
    #[must_use]
    pub fn kind(&self) -> RecordKind {
        match self {
            Self::Drug(_) => RecordKind::Drug,
            Self::Publication(_) => RecordKind::Publication,
            Self::ClinicalTrial(_) => RecordKind::ClinicalTrial,
            Self::ReconciledDrug(_) => RecordKind::ReconciledDrug,
        }
    }

    #[must_use]
    pub fn into_drug(self) -> Option<Drug> {
        match self {
            Self::Drug(drug) => Some(drug),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_publication(self) -> Option<Publication> {
        match self {
            Self::Publication(publication) => Some(publication),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_clinical_trial(self) -> Option<ClinicalTrial> {
        match self {
            Self::ClinicalTrial(trial) => Some(trial),
            _ => None,
        }
    }

    #[must_use]
    pub fn into_reconciled_drug(self) -> Option<ReconciledDrug> {
        match self {
            Self::ReconciledDrug(reconciled) => Some(reconciled),
            _ => None,
        }
    }
}
