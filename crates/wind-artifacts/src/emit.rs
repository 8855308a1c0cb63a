//! Per-level artifact emission for one selected representative.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use futures::stream::{self, StreamExt};
use tracing::{info, warn};

use crate::convert::Converter;
use crate::error::EmitError;
use crate::layout;
use crate::levels::{Level, LevelCatalog};
use crate::snapshot::RawSnapshot;

/// One successfully emitted artifact cell.
#[derive(Debug, Clone)]
pub struct LevelArtifact {
    pub valid_time: DateTime<Utc>,
    pub level: Level,
    pub storage_path: PathBuf,
}

/// Emits artifacts into the dated output tree through a converter.
pub struct ArtifactEmitter<C> {
    converter: C,
    output_root: PathBuf,
    max_concurrent: usize,
}

impl<C: Converter> ArtifactEmitter<C> {
    pub fn new(converter: C, output_root: impl Into<PathBuf>, max_concurrent: usize) -> Self {
        Self {
            converter,
            output_root: output_root.into(),
            max_concurrent: max_concurrent.max(1),
        }
    }

    /// Emit one artifact per catalog level for the chosen representative.
    ///
    /// Each (valid time, level) cell is an independent unit of work: a
    /// converter failure for one level is recorded in its outcome and
    /// does not abort the remaining levels. Re-running overwrites the
    /// same paths, so emission is idempotent.
    pub async fn emit(
        &self,
        representative: &RawSnapshot,
        catalog: &LevelCatalog,
    ) -> Vec<Result<LevelArtifact, EmitError>> {
        let valid_time = representative.valid_time();

        let outcomes = stream::iter(catalog.iter())
            .map(|level| self.emit_level(representative, level, valid_time))
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        let failed = outcomes.iter().filter(|o| o.is_err()).count();
        info!(
            valid_time = %valid_time,
            run_time = %representative.run_time,
            forecast_offset = representative.forecast_offset,
            emitted = outcomes.len() - failed,
            failed = failed,
            "Emitted level artifacts"
        );

        outcomes
    }

    async fn emit_level(
        &self,
        representative: &RawSnapshot,
        level: &Level,
        valid_time: DateTime<Utc>,
    ) -> Result<LevelArtifact, EmitError> {
        let storage_path = layout::artifact_path(&self.output_root, valid_time, &level.kind());

        if let Some(partition) = storage_path.parent() {
            // create_dir_all tolerates the partition already existing,
            // including via a concurrent sibling cell
            if let Err(e) = create_partition(partition).await {
                warn!(
                    valid_time = %valid_time,
                    level = %level.id,
                    error = %e,
                    "Could not create date partition, skipping cell"
                );
                return Err(e);
            }
        }

        match self
            .converter
            .convert(
                &representative.source_path,
                level.surface_type,
                level.surface_value,
                &storage_path,
            )
            .await
        {
            Ok(()) => Ok(LevelArtifact {
                valid_time,
                level: level.clone(),
                storage_path,
            }),
            Err(e) => {
                warn!(
                    valid_time = %valid_time,
                    level = %level.id,
                    input = %representative.source_path.display(),
                    error = %e,
                    "Conversion failed for level, continuing with remaining levels"
                );
                Err(EmitError::Convert(e))
            }
        }
    }
}

async fn create_partition(partition: &Path) -> Result<(), EmitError> {
    tokio::fs::create_dir_all(partition)
        .await
        .map_err(|source| EmitError::CreateDir {
            path: partition.to_path_buf(),
            source,
        })
}
