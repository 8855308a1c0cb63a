//! Error types for the wind-artifacts crate.
//!
//! Every error here is local to one snapshot, one (valid time, level)
//! cell, or one alias; a pipeline pass always completes a full sweep over
//! all groups and levels regardless of how many of these occur.

use std::path::PathBuf;
use std::process::ExitStatus;

use thiserror::Error;

/// A downloaded file whose name cannot be resolved to a model run.
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("malformed snapshot identifier in {path}: {reason}")]
    MalformedIdentifier { path: PathBuf, reason: String },
}

/// Failure to load a level catalog from disk.
#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("failed to read level catalog: {0}")]
    Read(#[from] std::io::Error),

    #[error("failed to parse level catalog: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("level catalog contains no levels")]
    Empty,
}

/// Failure of the external grid-to-JSON converter.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("failed to spawn converter '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("converter exited with {status}: {stderr}")]
    NonZeroExit { status: ExitStatus, stderr: String },
}

/// Failure of one (valid time, level) emission cell.
#[derive(Error, Debug)]
pub enum EmitError {
    #[error("failed to create date partition {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Convert(#[from] ConvertError),
}

/// Failure to refresh one level's current alias.
#[derive(Error, Debug)]
pub enum SynthesisError {
    #[error("failed to create alias directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
