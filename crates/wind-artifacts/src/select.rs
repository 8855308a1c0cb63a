//! Grouping snapshots by valid time and choosing one representative each.
//!
//! Several overlapping runs can describe the same physical instant (the
//! 06z analysis and the 00z three-hour forecast both describe 06:00).
//! Exactly one snapshot per instant goes on to emission.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::snapshot::RawSnapshot;

/// Snapshots keyed by the instant they describe, in ascending order.
pub type ValidTimeGroups = BTreeMap<DateTime<Utc>, Vec<RawSnapshot>>;

/// Group snapshots by valid time, preserving arrival order within each
/// group.
pub fn group_by_valid_time(snapshots: Vec<RawSnapshot>) -> ValidTimeGroups {
    let mut groups: ValidTimeGroups = BTreeMap::new();
    for snapshot in snapshots {
        groups.entry(snapshot.valid_time()).or_default().push(snapshot);
    }
    groups
}

/// Pick the snapshot that best represents one valid time.
///
/// Analyses win over forecasts; the first analysis in arrival order is
/// taken. With no analysis present, the most recently issued run wins.
/// Runs that tie are broken by the smaller forecast offset (the most
/// recent model knowledge), then by arrival order.
///
/// Returns `None` only for an empty group, which grouping never produces.
pub fn select_representative(group: &[RawSnapshot]) -> Option<&RawSnapshot> {
    if let Some(analysis) = group.iter().find(|s| s.is_analysis()) {
        return Some(analysis);
    }

    let mut best: Option<&RawSnapshot> = None;
    for candidate in group {
        let better = match best {
            None => true,
            Some(current) => {
                candidate.run_time > current.run_time
                    || (candidate.run_time == current.run_time
                        && candidate.forecast_offset < current.forecast_offset)
            }
        };
        if better {
            best = Some(candidate);
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Timelike};
    use std::path::PathBuf;

    fn snapshot(run_hour: u32, forecast_offset: u32, tag: &str) -> RawSnapshot {
        RawSnapshot {
            run_time: Utc.with_ymd_and_hms(2025, 1, 15, run_hour, 0, 0).unwrap(),
            forecast_offset,
            source_path: PathBuf::from(format!("20250115/{tag}")),
        }
    }

    #[test]
    fn test_analysis_wins_over_forecasts() {
        // 09:00 described by the 06z f003 and the 09z analysis (hypothetical
        // run) in either arrival order
        let group = vec![snapshot(6, 3, "f003"), snapshot(9, 0, "f000")];
        assert!(select_representative(&group).unwrap().is_analysis());

        let group = vec![snapshot(9, 0, "f000"), snapshot(6, 3, "f003")];
        assert!(select_representative(&group).unwrap().is_analysis());
    }

    #[test]
    fn test_latest_run_wins_among_forecasts() {
        // 09:00 from the 00z run at f009 and the 06z run at f003
        let group = vec![snapshot(0, 9, "t00z.f009"), snapshot(6, 3, "t06z.f003")];
        let chosen = select_representative(&group).unwrap();
        assert_eq!(chosen.run_time.hour(), 6);
        assert_eq!(chosen.forecast_offset, 3);
    }

    #[test]
    fn test_run_tie_prefers_smaller_offset_then_arrival() {
        // Duplicate retrievals of the same run and offset: arrival order
        // settles it
        let group = vec![snapshot(6, 3, "first"), snapshot(6, 3, "second")];
        let chosen = select_representative(&group).unwrap();
        assert_eq!(chosen.source_path, PathBuf::from("20250115/first"));
    }

    #[test]
    fn test_groups_iterate_in_valid_time_order() {
        let groups = group_by_valid_time(vec![
            snapshot(6, 0, "a"),
            snapshot(0, 3, "b"),
            snapshot(0, 0, "c"),
        ]);
        let hours: Vec<u32> = groups.keys().map(|t| t.hour()).collect();
        assert_eq!(hours, vec![0, 3, 6]);
    }

    #[test]
    fn test_empty_group_has_no_representative() {
        assert!(select_representative(&[]).is_none());
    }
}
