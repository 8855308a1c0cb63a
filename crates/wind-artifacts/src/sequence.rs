//! Advisory check that a day's valid times form a complete 3-hourly
//! series. Gaps surface upstream retrieval problems early; they never
//! fail the pipeline.

use chrono::{DateTime, NaiveDate, Timelike, Utc};

/// Hours at which an artifact is expected every day.
pub const EXPECTED_HOURS: [u32; 8] = [0, 3, 6, 9, 12, 15, 18, 21];

/// Gap report for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceReport {
    pub date: NaiveDate,
    /// Expected hours with no observed valid time, ascending
    pub missing_hours: Vec<u32>,
}

impl SequenceReport {
    pub fn is_complete(&self) -> bool {
        self.missing_hours.is_empty()
    }
}

/// Report the expected hours with no valid time observed on `date`.
pub fn validate_day(date: NaiveDate, valid_times: &[DateTime<Utc>]) -> SequenceReport {
    let observed: Vec<u32> = valid_times
        .iter()
        .filter(|t| t.date_naive() == date)
        .map(|t| t.hour())
        .collect();

    let missing_hours = EXPECTED_HOURS
        .iter()
        .copied()
        .filter(|hour| !observed.contains(hour))
        .collect();

    SequenceReport {
        date,
        missing_hours,
    }
}

/// Report every calendar day that appears in `valid_times`, in date order.
pub fn validate_all(valid_times: &[DateTime<Utc>]) -> Vec<SequenceReport> {
    let mut dates: Vec<NaiveDate> = valid_times.iter().map(|t| t.date_naive()).collect();
    dates.sort();
    dates.dedup();

    dates
        .into_iter()
        .map(|date| validate_day(date, valid_times))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_reports_missing_hours() {
        let times: Vec<_> = [0, 3, 6, 12, 18].into_iter().map(|h| at(15, h)).collect();
        let report = validate_day(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(), &times);
        assert_eq!(report.missing_hours, vec![9, 15, 21]);
        assert!(!report.is_complete());
    }

    #[test]
    fn test_complete_day() {
        let times: Vec<_> = EXPECTED_HOURS.into_iter().map(|h| at(15, h)).collect();
        let report = validate_day(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap(), &times);
        assert!(report.is_complete());
    }

    #[test]
    fn test_validate_all_groups_by_day() {
        let times = vec![at(15, 0), at(16, 3), at(15, 3)];
        let reports = validate_all(&times);
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(reports[0].missing_hours.len(), 6);
        assert_eq!(reports[1].missing_hours.len(), 7);
    }

    #[test]
    fn test_no_valid_times_no_reports() {
        assert!(validate_all(&[]).is_empty());
    }
}
