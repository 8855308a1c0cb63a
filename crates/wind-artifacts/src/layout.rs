//! Bidirectional encoding of the artifact naming convention.
//!
//! The dated layout
//! `{root}/{YYYY}/{MM}/{DD}/{HHmm}-wind-{kind}-gfs-1.0.json` and the
//! alias layout `{root}/current/current-wind-{kind}-gfs-1.0.json` are the
//! contract with downstream consumers. Both the emitter (encode) and the
//! current-view synthesizer (decode) go through this module so the
//! pattern cannot drift between the two directions.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, TimeZone, Timelike, Utc};

/// Dated artifact path for one (valid time, level kind) cell.
pub fn artifact_path(root: &Path, valid_time: DateTime<Utc>, kind: &str) -> PathBuf {
    root.join(format!("{:04}", valid_time.year()))
        .join(format!("{:02}", valid_time.month()))
        .join(format!("{:02}", valid_time.day()))
        .join(format!(
            "{:02}{:02}-wind-{kind}-gfs-1.0.json",
            valid_time.hour(),
            valid_time.minute()
        ))
}

/// Fixed-name alias path for one level kind.
pub fn alias_path(root: &Path, kind: &str) -> PathBuf {
    root.join("current")
        .join(format!("current-wind-{kind}-gfs-1.0.json"))
}

/// Identity recovered from a dated artifact path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactId {
    pub valid_time: DateTime<Utc>,
    /// Level discriminator from the filename (`surface-level` or
    /// `isobaric-{value}hPa`)
    pub kind: String,
}

/// Inverse of [`artifact_path`].
///
/// Returns `None` for anything that does not match the convention --
/// including the `current/` aliases themselves, which is what lets the
/// synthesizer rescan the whole tree blindly.
pub fn decode_artifact_path(path: &Path) -> Option<ArtifactId> {
    let name = path.file_name()?.to_str()?;

    let stamp = name.get(..4)?;
    if !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let kind = name
        .get(4..)?
        .strip_prefix("-wind-")?
        .strip_suffix("-gfs-1.0.json")?;
    if !is_level_kind(kind) {
        return None;
    }

    let hour: u32 = stamp[..2].parse().ok()?;
    let minute: u32 = stamp[2..].parse().ok()?;

    // Date comes from the three enclosing partition directories.
    let day: u32 = ancestor_component(path, 1)?;
    let month: u32 = ancestor_component(path, 2)?;
    let year: i32 = ancestor_component(path, 3)?;

    let date = NaiveDate::from_ymd_opt(year, month, day)?;
    let naive = date.and_hms_opt(hour, minute, 0)?;

    Some(ArtifactId {
        valid_time: Utc.from_utc_datetime(&naive),
        kind: kind.to_string(),
    })
}

/// Parse the directory name `up` levels above the file.
fn ancestor_component<T: std::str::FromStr>(path: &Path, up: usize) -> Option<T> {
    let mut dir = path.parent()?;
    for _ in 1..up {
        dir = dir.parent()?;
    }
    dir.file_name()?.to_str()?.parse().ok()
}

fn is_level_kind(kind: &str) -> bool {
    if kind == "surface-level" {
        return true;
    }
    match kind
        .strip_prefix("isobaric-")
        .and_then(|rest| rest.strip_suffix("hPa"))
    {
        Some(digits) => !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit()),
        None => false,
    }
}
