//! Current-view synthesis.
//!
//! Rescans the whole dated artifact tree, finds the newest artifact per
//! level, and republishes its payload byte-for-byte under the level's
//! fixed `current/` name. The scan is a full pass every invocation; the
//! caller serializes passes (one per pipeline run) since concurrent
//! passes would race on the same alias paths.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::error::SynthesisError;
use crate::layout;

/// The published alias for one level kind.
#[derive(Debug, Clone, PartialEq)]
pub struct CurrentAlias {
    /// Level discriminator (`surface-level` or `isobaric-{value}hPa`)
    pub kind: String,
    /// Valid time of the artifact the alias duplicates
    pub valid_time: DateTime<Utc>,
    /// The dated artifact the payload came from
    pub source_path: PathBuf,
    /// Fixed-name alias location
    pub alias_path: PathBuf,
}

/// Rescan `root` and refresh the `current/` alias set.
///
/// Independent per level: a copy failure for one alias never blocks the
/// others, and a level with no artifacts simply gets no alias (reported
/// by its absence from the returned map, not as an error).
pub async fn synthesize_current(root: &Path) -> BTreeMap<String, CurrentAlias> {
    let latest = scan_latest(root);

    if latest.is_empty() {
        info!(root = %root.display(), "No dated artifacts found, nothing to publish as current");
        return BTreeMap::new();
    }

    let mut published = BTreeMap::new();
    for (kind, (valid_time, source_path)) in latest {
        match publish_alias(root, &kind, valid_time, &source_path).await {
            Ok(alias) => {
                published.insert(kind, alias);
            }
            Err(e) => {
                warn!(
                    kind = %kind,
                    source = %source_path.display(),
                    error = %e,
                    "Failed to refresh current alias, other levels unaffected"
                );
            }
        }
    }

    info!(count = published.len(), "Current aliases refreshed");
    published
}

/// Linear scan for the newest artifact per level kind.
///
/// Artifacts are compared by decoded valid time with an explicit
/// comparator rather than traversal order; names that do not decode
/// (aliases, foreign files) are ignored, not errors.
fn scan_latest(root: &Path) -> BTreeMap<String, (DateTime<Utc>, PathBuf)> {
    let mut latest: BTreeMap<String, (DateTime<Utc>, PathBuf)> = BTreeMap::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry during rescan");
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }

        let Some(id) = layout::decode_artifact_path(entry.path()) else {
            continue;
        };

        let newer = match latest.get(&id.kind) {
            Some((best, _)) => id.valid_time > *best,
            None => true,
        };
        if newer {
            latest.insert(id.kind, (id.valid_time, entry.path().to_path_buf()));
        }
    }

    latest
}

async fn publish_alias(
    root: &Path,
    kind: &str,
    valid_time: DateTime<Utc>,
    source_path: &Path,
) -> Result<CurrentAlias, SynthesisError> {
    let alias_path = layout::alias_path(root, kind);

    if let Some(parent) = alias_path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| SynthesisError::CreateDir {
                path: parent.to_path_buf(),
                source,
            })?;
    }

    tokio::fs::copy(source_path, &alias_path)
        .await
        .map_err(|source| SynthesisError::Copy {
            from: source_path.to_path_buf(),
            to: alias_path.clone(),
            source,
        })?;

    debug!(
        kind = %kind,
        valid_time = %valid_time,
        from = %source_path.display(),
        to = %alias_path.display(),
        "Published current alias"
    );

    Ok(CurrentAlias {
        kind: kind.to_string(),
        valid_time,
        source_path: source_path.to_path_buf(),
        alias_path,
    })
}
