use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::record::{RawRecord, RecordKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileFormat {
    Csv,
    Json,
}

impl FileFormat {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Lookup tables assembled once at startup and handed to every read entry
/// point: file extension to decoder, kind name to record kind. Nothing else
/// decides how a path gets decoded.
#[derive(Debug, Clone, Default)]
pub struct ReaderRegistry {
    extensions: BTreeMap<String, FileFormat>,
    kinds: BTreeMap<String, RecordKind>,
}

impl ReaderRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The registry every shipped command uses: `csv`/`json` decoders and
    /// the four record kinds under their canonical names.
    #[must_use]
    pub fn standard() -> Self {
        Self::new()
            .with_extension("csv", FileFormat::Csv)
            .with_extension("json", FileFormat::Json)
            .with_kind(RecordKind::Drug)
            .with_kind(RecordKind::Publication)
            .with_kind(RecordKind::ClinicalTrial)
            .with_kind(RecordKind::ReconciledDrug)
    }

    #[must_use]
    pub fn with_extension(mut self, extension: &str, format: FileFormat) -> Self {
        self.extensions.insert(extension.to_lowercase(), format);
        self
    }

    #[must_use]
    pub fn with_kind(mut self, kind: RecordKind) -> Self {
        self.kinds.insert(kind.as_str().to_string(), kind);
        self
    }

    pub fn format_for(&self, path: &Path) -> Result<FileFormat> {
        let extension = path
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))?;
        self.extensions
            .get(&extension.to_lowercase())
            .copied()
            .ok_or_else(|| Error::UnsupportedFormat(path.to_path_buf()))
    }

    pub fn kind_for(&self, name: &str) -> Result<RecordKind> {
        self.kinds
            .get(name)
            .copied()
            .ok_or_else(|| Error::UnknownKind(name.to_string()))
    }

    /// Registered kind names, for error hints.
    pub fn kinds(&self) -> impl Iterator<Item = RecordKind> + '_ {
        self.kinds.values().copied()
    }
}

/// Decoded text to untyped rows, in source order.
pub fn raw_rows(format: FileFormat, text: &str, path: &Path) -> Result<Vec<RawRecord>> {
    match format {
        FileFormat::Csv => rows_from_csv(text),
        FileFormat::Json => rows_from_json(text, path),
    }
}

fn rows_from_csv(text: &str) -> Result<Vec<RawRecord>> {
    // Ragged rows surface as missing fields at validation, never as file
    // failures.
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(text.as_bytes());
    let headers = reader.headers()?.clone();
    let mut rows = Vec::new();
    for result in reader.records() {
        let row = result?;
        let mut raw = RawRecord::new();
        for (name, value) in headers.iter().zip(row.iter()) {
            raw.insert(name.to_string(), Value::String(value.to_string()));
        }
        rows.push(raw);
    }
    Ok(rows)
}

fn rows_from_json(text: &str, path: &Path) -> Result<Vec<RawRecord>> {
    let document = match serde_json::from_str::<Value>(text) {
        Ok(document) => document,
        Err(err) => repair_and_reparse(text, &err, path)?,
    };
    Ok(serde_json::from_value(document)?)
}

/// One repair attempt, ever. The known corruption in upstream exports is a
/// dangling element separator right before the closing bracket, so the two
/// bytes immediately preceding the decoder's failure offset are dropped and
/// the document is parsed again. Anything still invalid after that is fatal
/// for the file.
fn repair_and_reparse(text: &str, err: &serde_json::Error, path: &Path) -> Result<Value> {
    let offset = byte_offset(text, err.line(), err.column());
    let failed = |message: String| Error::DecodeRepair {
        path: path.to_path_buf(),
        offset,
        message,
    };

    if offset < 2 {
        return Err(failed(err.to_string()));
    }
    let mut bytes = text.as_bytes().to_vec();
    bytes.drain(offset - 2..offset);
    let Ok(repaired) = String::from_utf8(bytes) else {
        return Err(failed(err.to_string()));
    };

    warn!(
        path = %path.display(),
        offset,
        "dropped two bytes before JSON failure point, reparsing"
    );
    serde_json::from_str(&repaired).map_err(|second| failed(second.to_string()))
}

/// Decoder positions are a one-based line and a one-based byte column.
fn byte_offset(text: &str, line: usize, column: usize) -> usize {
    let mut offset = 0;
    for (index, segment) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line {
            return (offset + column.saturating_sub(1)).min(text.len());
        }
        offset += segment.len();
    }
    text.len()
}
