//! Retrieval plan for the external downloader.
//!
//! The downloader owns transport, retries, and backoff; this side only
//! states what to fetch: which runs, which forecast offsets, and the
//! field/level search expression derived from the level catalog.

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use serde::Serialize;

use wind_artifacts::LevelCatalog;

const MODEL: &str = "gfs";
const PRODUCT: &str = "pgrb2.1p00";
const SOURCE: &str = "nomads";

/// One day's worth of run requests, serialized for the downloader.
#[derive(Debug, Serialize)]
pub struct RetrievalRequest {
    pub model: String,
    pub product: String,
    pub source: String,
    /// Reference time of every requested run, ascending
    pub reference_times: Vec<DateTime<Utc>>,
    /// Forecast offsets requested for each run
    pub forecast_offsets: Vec<u32>,
    /// UGRD/VGRD field selection over the catalog levels
    pub search: String,
    /// Concurrency budget for the downloader
    pub max_threads: usize,
}

pub fn build_request(
    date: NaiveDate,
    cycles: &[u32],
    offsets: &[u32],
    catalog: &LevelCatalog,
    max_threads: usize,
) -> RetrievalRequest {
    let mut cycles: Vec<u32> = cycles.to_vec();
    cycles.sort_unstable();
    cycles.dedup();

    let reference_times = cycles
        .iter()
        .filter_map(|cycle| date.and_hms_opt(*cycle, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
        .collect();

    RetrievalRequest {
        model: MODEL.to_string(),
        product: PRODUCT.to_string(),
        source: SOURCE.to_string(),
        reference_times,
        forecast_offsets: offsets.to_vec(),
        search: catalog.search_expression(),
        max_threads,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_request_covers_all_cycles() {
        let catalog = LevelCatalog::default_gfs();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        let request = build_request(date, &[0, 6, 12, 18], &[0, 3], &catalog, 5);

        assert_eq!(request.model, "gfs");
        assert_eq!(request.product, "pgrb2.1p00");
        assert_eq!(request.source, "nomads");
        assert_eq!(request.reference_times.len(), 4);
        assert_eq!(
            request.reference_times[0],
            Utc.with_ymd_and_hms(2025, 1, 15, 0, 0, 0).unwrap()
        );
        assert_eq!(
            request.reference_times[3],
            Utc.with_ymd_and_hms(2025, 1, 15, 18, 0, 0).unwrap()
        );
        assert_eq!(request.forecast_offsets, vec![0, 3]);
        assert!(request.search.contains(":UGRD:"));
        assert!(request.search.contains("850 mb"));
        assert_eq!(request.max_threads, 5);
    }

    #[test]
    fn test_build_request_dedupes_cycles() {
        let catalog = LevelCatalog::default_gfs();
        let date = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();

        let request = build_request(date, &[6, 0, 6], &[0], &catalog, 1);
        assert_eq!(request.reference_times.len(), 2);

        let serialized = serde_json::to_string(&request).unwrap();
        assert!(serialized.contains("2025-01-15T06:00:00Z"));
    }
}
