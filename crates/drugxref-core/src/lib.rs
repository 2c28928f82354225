pub mod error;
pub mod ingest;
pub mod journal;
pub mod reconcile;
pub mod record;
pub mod store;

pub use error::{Error, Result};
pub use record::{
    ClinicalTrial, Drug, Publication, RawRecord, Record, RecordKind, ReconciledDrug,
};
pub use store::{
    save_json, transfer, ArtifactReceipt, DirStore, ObjectStore, RunManifest, TransferOp,
};
