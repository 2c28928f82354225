mod encoding;
mod pipeline;
mod reader;
mod schema;

pub use encoding::{decode_bytes, detect, SourceEncoding};
pub use pipeline::{read_batch, read_records, BatchReadResult, ReadOutcome, Rejected};
pub use reader::{raw_rows, FileFormat, ReaderRegistry};
pub use schema::{clean_text, validate, ValidationError, ValidationResult};
