//! Core logic for the wind artifact pipeline.
//!
//! Takes a tree of GFS grid files retrieved by an external downloader and
//! produces per-level, per-valid-time JSON wind artifacts plus a stable
//! `current/` alias set pointing at the newest artifact per level.
//!
//! # Architecture
//!
//! This crate is used by the `wind-pipeline` service and deliberately owns
//! no transport and no grid decoding. It handles:
//!
//! - Recovering `(run time, forecast offset)` from downloaded filenames
//! - Grouping snapshots by valid time and selecting one representative
//! - The dated artifact path layout (encode and decode from one place)
//! - Per-level emission through an external grid-to-JSON converter
//! - Rescanning the artifact tree to refresh the `current/` aliases
//! - Advisory validation of the 3-hourly valid-time series

pub mod convert;
pub mod current;
pub mod emit;
pub mod error;
pub mod layout;
pub mod levels;
pub mod select;
pub mod sequence;
pub mod snapshot;

// Re-exports
pub use convert::{Converter, Grib2JsonConverter};
pub use current::{synthesize_current, CurrentAlias};
pub use emit::{ArtifactEmitter, LevelArtifact};
pub use error::{CatalogError, ConvertError, EmitError, SnapshotError, SynthesisError};
pub use layout::{alias_path, artifact_path, decode_artifact_path, ArtifactId};
pub use levels::{Level, LevelCatalog};
pub use select::{group_by_valid_time, select_representative, ValidTimeGroups};
pub use sequence::{validate_all, validate_day, SequenceReport};
pub use snapshot::{discover_snapshots, RawSnapshot};
