//! Raw snapshot identification and valid-time resolution.
//!
//! The external downloader saves grid files with the run hour and forecast
//! hour encoded in the filename (`t{HH}z`, `.f{OFF}`) and the run's
//! calendar date as the parent directory name (`YYYYMMDD`). This module
//! recovers that identity and resolves the physical instant each file
//! describes.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::error::SnapshotError;

/// One retrieved grid file for one model run and one forecast offset.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSnapshot {
    /// Run reference time (date from the parent directory, hour from `t{HH}z`)
    pub run_time: DateTime<Utc>,
    /// Hours ahead of the run this file predicts; zero is an analysis
    pub forecast_offset: u32,
    /// Where the downloader left the raw grid data
    pub source_path: PathBuf,
}

impl RawSnapshot {
    /// Resolve a snapshot's identity from its storage path.
    pub fn from_path(path: &Path) -> Result<Self, SnapshotError> {
        let malformed = |reason: &str| SnapshotError::MalformedIdentifier {
            path: path.to_path_buf(),
            reason: reason.to_string(),
        };

        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .ok_or_else(|| malformed("no file name"))?;

        let date_part = path
            .parent()
            .and_then(|p| p.file_name())
            .and_then(|s| s.to_str())
            .ok_or_else(|| malformed("no run-date parent directory"))?;

        let run_date = NaiveDate::parse_from_str(date_part, "%Y%m%d")
            .map_err(|_| malformed("run-date directory is not YYYYMMDD"))?;

        let run_hour =
            find_run_hour(name).ok_or_else(|| malformed("missing t{HH}z run-hour marker"))?;

        let forecast_offset = find_forecast_offset(name)
            .ok_or_else(|| malformed("missing .f{OFF} forecast-hour marker"))?;

        let run_dt = run_date
            .and_hms_opt(run_hour, 0, 0)
            .ok_or_else(|| malformed("run hour out of range"))?;

        Ok(Self {
            run_time: Utc.from_utc_datetime(&run_dt),
            forecast_offset,
            source_path: path.to_path_buf(),
        })
    }

    /// The physical instant this snapshot describes.
    pub fn valid_time(&self) -> DateTime<Utc> {
        self.run_time + Duration::hours(i64::from(self.forecast_offset))
    }

    /// Analyses describe the run's own reference time.
    pub fn is_analysis(&self) -> bool {
        self.forecast_offset == 0
    }
}

/// Run hour from the first `t{HH}z` marker in the filename.
fn find_run_hour(name: &str) -> Option<u32> {
    let bytes = name.as_bytes();
    for (i, window) in bytes.windows(4).enumerate() {
        if window[0] == b't'
            && window[1].is_ascii_digit()
            && window[2].is_ascii_digit()
            && window[3] == b'z'
        {
            return name[i + 1..i + 3].parse().ok();
        }
    }
    None
}

/// Forecast hour from the first `.f{OFF3}` marker in the filename.
fn find_forecast_offset(name: &str) -> Option<u32> {
    let bytes = name.as_bytes();
    for (i, window) in bytes.windows(5).enumerate() {
        if window[0] == b'.'
            && window[1] == b'f'
            && window[2..].iter().all(u8::is_ascii_digit)
        {
            return name[i + 2..i + 5].parse().ok();
        }
    }
    None
}

/// Scan the downloader's save tree for grid files and resolve each one.
///
/// Files whose names do not carry both markers are logged and excluded;
/// they never fail the pass. Entries are visited in sorted name order so
/// the resulting snapshot order is deterministic.
pub fn discover_snapshots(root: &Path) -> Vec<RawSnapshot> {
    let mut snapshots = Vec::new();

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(error = %e, "Skipping unreadable entry in download tree");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        match RawSnapshot::from_path(entry.path()) {
            Ok(snapshot) => {
                debug!(
                    path = %entry.path().display(),
                    run_time = %snapshot.run_time,
                    forecast_offset = snapshot.forecast_offset,
                    "Discovered raw snapshot"
                );
                snapshots.push(snapshot);
            }
            Err(e) => {
                warn!(error = %e, "Skipping file with invalid name pattern");
            }
        }
    }

    snapshots
}
