pub mod journal;
pub mod run;
pub mod transfer;
pub mod validate;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "dxr",
    about = "Drug and literature reconciliation pipeline",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read every source, reconcile drugs against the literature, write artifacts
    Run {
        /// Drugs source file (CSV or JSON)
        #[arg(long)]
        drugs: PathBuf,
        /// Publication source file(s); repeat for multiple sources
        #[arg(long = "publications", required = true)]
        publications: Vec<PathBuf>,
        /// Clinical trial source file(s); repeat for multiple sources
        #[arg(long = "trials", required = true)]
        trials: Vec<PathBuf>,
        /// Directory receiving reconciled.json, rejected rows, and the manifest
        #[arg(long = "out-dir", default_value = "out")]
        out_dir: PathBuf,
    },
    /// Check source files against a record schema without writing anything
    Validate {
        /// Record kind: drug, publication, clinical_trial, reconciled_drug
        #[arg(long)]
        kind: String,
        /// Files to check
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Print the journal(s) citing the most distinct drugs
    TopJournal {
        /// Reconciled artifact produced by `dxr run`
        artifact: PathBuf,
    },
    /// Copy a local file into a bucket
    Push {
        /// Local file
        local: PathBuf,
        /// Object key inside the bucket
        key: String,
        /// Bucket directory
        #[arg(long)]
        bucket: PathBuf,
    },
    /// Fetch an object from a bucket
    Pull {
        /// Object key inside the bucket
        key: String,
        /// Local destination path
        local: PathBuf,
        /// Bucket directory
        #[arg(long)]
        bucket: PathBuf,
    },
}
