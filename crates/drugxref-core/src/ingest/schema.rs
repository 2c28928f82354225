use std::collections::BTreeSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::record::{
    ClinicalTrial, Drug, Publication, RawRecord, Record, RecordKind, ReconciledDrug,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Missing field: {0}")]
    Missing(&'static str),

    #[error("Field {field}: expected {expected}")]
    Type {
        field: &'static str,
        expected: &'static str,
    },

    #[error("Field {field}: not an integer: {value}")]
    NotAnInteger {
        field: &'static str,
        value: String,
    },

    #[error("Field {field}: shorter than {min} characters")]
    TooShort { field: &'static str, min: usize },

    #[error("Field {field}: missing required prefix {prefix}")]
    MissingPrefix {
        field: &'static str,
        prefix: &'static str,
    },
}

pub type ValidationResult<T> = Result<T, ValidationError>;

/// Literal `\xHH` sequences left behind by a bad re-encoding of the trials
/// registry. They appear only in clinical trial exports.
static ESCAPE_ARTIFACT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\\x[0-9a-fA-F]{2}").expect("artifact pattern cannot fail"));

#[must_use]
pub fn clean_text(text: &str) -> String {
    ESCAPE_ARTIFACT.replace_all(text, "").into_owned()
}

/// Builds the typed record for `kind` from an untyped row. Each kind has its
/// own constructor; this is the only place a kind value picks one.
pub fn validate(kind: RecordKind, raw: &RawRecord) -> ValidationResult<Record> {
    match kind {
        RecordKind::Drug => Drug::from_raw(raw).map(Record::Drug),
        RecordKind::Publication => Publication::from_raw(raw).map(Record::Publication),
        RecordKind::ClinicalTrial => ClinicalTrial::from_raw(raw).map(Record::ClinicalTrial),
        RecordKind::ReconciledDrug => {
            ReconciledDrug::from_raw(raw).map(Record::ReconciledDrug)
        }
    }
}

impl Drug {
    pub fn from_raw(raw: &RawRecord) -> ValidationResult<Self> {
        Ok(Self {
            code: string_field(raw, "atccode")?,
            name: string_field(raw, "drug")?,
        })
    }
}

impl Publication {
    pub fn from_raw(raw: &RawRecord) -> ValidationResult<Self> {
        Ok(Self {
            id: integer_field(raw, "id")?,
            title: string_field(raw, "title")?,
            date: string_field(raw, "date")?,
            journal: string_field(raw, "journal")?,
        })
    }
}

impl ClinicalTrial {
    pub fn from_raw(raw: &RawRecord) -> ValidationResult<Self> {
        let id = string_field(raw, "id")?;
        if id.len() < 3 {
            return Err(ValidationError::TooShort { field: "id", min: 3 });
        }
        if !id.starts_with("NCT") {
            return Err(ValidationError::MissingPrefix {
                field: "id",
                prefix: "NCT",
            });
        }
        Ok(Self {
            id,
            scientific_title: clean_text(&string_field(raw, "scientific_title")?),
            date: string_field(raw, "date")?,
            journal: clean_text(&string_field(raw, "journal")?),
        })
    }
}

impl ReconciledDrug {
    pub fn from_raw(raw: &RawRecord) -> ValidationResult<Self> {
        let Value::Object(drug_raw) = require(raw, "drug")? else {
            return Err(ValidationError::Type {
                field: "drug",
                expected: "an object",
            });
        };
        Ok(Self {
            drug: Drug::from_raw(drug_raw)?,
            publication_ids: integer_set(raw, "pubmed")?,
            trial_ids: string_set(raw, "clinical_trials")?,
            journals: string_set(raw, "journals")?,
        })
    }
}

fn require<'a>(raw: &'a RawRecord, field: &'static str) -> ValidationResult<&'a Value> {
    raw.get(field).ok_or(ValidationError::Missing(field))
}

fn string_field(raw: &RawRecord, field: &'static str) -> ValidationResult<String> {
    match require(raw, field)? {
        Value::String(value) => Ok(value.clone()),
        _ => Err(ValidationError::Type {
            field,
            expected: "a string",
        }),
    }
}

fn integer_field(raw: &RawRecord, field: &'static str) -> ValidationResult<i64> {
    integer_value(require(raw, field)?, field)
}

/// CSV cells arrive as strings even when the column is numeric, so integer
/// fields accept both native numbers and digit strings.
fn integer_value(value: &Value, field: &'static str) -> ValidationResult<i64> {
    match value {
        Value::Number(number) => number.as_i64().ok_or_else(|| ValidationError::NotAnInteger {
            field,
            value: number.to_string(),
        }),
        Value::String(text) => {
            text.trim()
                .parse()
                .map_err(|_| ValidationError::NotAnInteger {
                    field,
                    value: text.clone(),
                })
        }
        _ => Err(ValidationError::Type {
            field,
            expected: "an integer",
        }),
    }
}

fn integer_set(raw: &RawRecord, field: &'static str) -> ValidationResult<BTreeSet<i64>> {
    match require(raw, field)? {
        Value::Array(items) => items.iter().map(|item| integer_value(item, field)).collect(),
        _ => Err(ValidationError::Type {
            field,
            expected: "an array of integers",
        }),
    }
}

fn string_set(raw: &RawRecord, field: &'static str) -> ValidationResult<BTreeSet<String>> {
    match require(raw, field)? {
        Value::Array(items) => items
            .iter()
            .map(|item| match item {
                Value::String(value) => Ok(value.clone()),
                _ => Err(ValidationError::Type {
                    field,
                    expected: "an array of strings",
                }),
            })
            .collect(),
        _ => Err(ValidationError::Type {
            field,
            expected: "an array of strings",
        }),
    }
}
