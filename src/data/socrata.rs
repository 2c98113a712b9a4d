//! Import from the city's Socrata open-data portal
//!
//! The portal's `rows.json` export is a positional table. Only rows wide
//! enough to carry a location are converted, and rows without a usable
//! latitude/longitude pair are dropped.

use crate::{
    core::{config::LoaderConfig, geo::LatLng},
    data::feature::Feature,
    LoadError,
};
use chrono::{Duration, NaiveDate};
use serde::Deserialize;
use serde_json::Value;

/// Building permits export of the Denver open-data portal.
pub const PERMITS_ROWS_URL: &str = "https://data.denvergov.org/api/views/bvnf-nfkt/rows.json";

pub const DEFAULT_ROW_LIMIT: u32 = 50_000;

const PERMIT_TYPE: &str = "Demolition";

mod column {
    pub const PERMIT_NUM: usize = 0;
    pub const ADDRESS: usize = 2;
    pub const DESCRIPTION: usize = 3;
    pub const ISSUED_DATE: usize = 6;
    pub const STATUS: usize = 7;
    pub const LATITUDE: usize = 8;
    pub const LONGITUDE: usize = 9;
    /// Rows must be strictly wider than this to be considered.
    pub const MIN_WIDTH: usize = 10;
}

#[derive(Debug, Deserialize)]
struct RowsPayload {
    #[serde(default)]
    data: Vec<Vec<Value>>,
}

/// Converts a `rows.json` document into permit features.
pub fn features_from_rows(payload: &str) -> Result<Vec<Feature>, LoadError> {
    let payload: RowsPayload = serde_json::from_str(payload)?;
    let total = payload.data.len();

    let features: Vec<Feature> = payload
        .data
        .iter()
        .filter_map(|row| feature_from_row(row))
        .collect();
    log::debug!("converted {} of {} portal rows", features.len(), total);
    Ok(features)
}

fn feature_from_row(row: &[Value]) -> Option<Feature> {
    if row.len() <= column::MIN_WIDTH {
        return None;
    }

    let lat = number_cell(&row[column::LATITUDE])?;
    let lng = number_cell(&row[column::LONGITUDE])?;
    // Zero is how the portal marks an ungeocoded address.
    if lat == 0.0 || lng == 0.0 {
        return None;
    }
    let coordinates = LatLng::new(lat, lng);
    if !coordinates.is_valid() {
        return None;
    }

    Some(Feature {
        coordinates: Some(coordinates),
        address: text_cell(&row[column::ADDRESS]),
        permit_number: text_cell(&row[column::PERMIT_NUM]),
        permit_type: Some(PERMIT_TYPE.to_string()),
        status: text_cell(&row[column::STATUS]),
        issued_date: text_cell(&row[column::ISSUED_DATE]),
        description: text_cell(&row[column::DESCRIPTION]),
    })
}

fn number_cell(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn text_cell(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Downloads the portal export and converts it.
pub async fn fetch_permits(
    url: &str,
    limit: u32,
    loader: &LoaderConfig,
) -> Result<Vec<Feature>, LoadError> {
    let client = reqwest::Client::builder()
        .user_agent(loader.user_agent.clone())
        .timeout(loader.timeout())
        .build()?;

    let body = client
        .get(url)
        .query(&[("$limit", limit)])
        .header(reqwest::header::ACCEPT, "application/json")
        .send()
        .await?
        .error_for_status()?
        .text()
        .await?;

    features_from_rows(&body)
}

const SAMPLE_NEIGHBORHOODS: [(&str, f64, f64); 10] = [
    ("Downtown Denver", 39.7392, -104.9903),
    ("LoDo", 39.7567, -104.9956),
    ("RiNo", 39.7676, -104.9844),
    ("Five Points", 39.7627, -104.9674),
    ("Baker", 39.7259, -104.9744),
    ("Washington Park", 39.7199, -104.9844),
    ("South Pearl Street", 39.6989, -104.9774),
    ("Aurora", 39.7589, -104.8191),
    ("Highlands", 39.7544, -105.0311),
    ("Cheesman Park", 39.7420, -104.9211),
];

const SAMPLE_STATUSES: [&str; 3] = ["ISSUED", "UNDER_REVIEW", "APPROVED"];

/// A realistic stand-in data set, issued over the days before `today`.
pub fn sample_permits(today: NaiveDate) -> Vec<Feature> {
    SAMPLE_NEIGHBORHOODS
        .iter()
        .enumerate()
        .map(|(i, (name, lat, lng))| {
            let issued = today - Duration::days(i as i64 * 2);
            Feature {
                coordinates: Some(LatLng::new(*lat, *lng)),
                address: Some(format!("{} {} St, Denver, CO", 100 + i * 50, name)),
                permit_number: Some(format!("2025-DEM-{:04}", 1001 + i)),
                permit_type: Some(PERMIT_TYPE.to_string()),
                status: Some(SAMPLE_STATUSES[i % SAMPLE_STATUSES.len()].to_string()),
                issued_date: Some(issued.format("%Y-%m-%d").to_string()),
                description: Some(format!("Demolition of residential structure in {name}")),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(lat: Value, lng: Value) -> Value {
        json!([
            "2025-DEM-0042", "sid", "1500 Blake St", "Garage teardown", "x", "y",
            "2025-05-30", "ISSUED", lat, lng, "extra"
        ])
    }

    #[test]
    fn test_rows_conversion() {
        let payload = json!({
            "meta": {},
            "data": [
                row(json!("39.7500"), json!("-104.9990")),
                row(json!(39.76), json!(-104.98)),
                row(json!(null), json!("-104.99")),
                row(json!("0"), json!("0")),
                ["too", "short"]
            ]
        })
        .to_string();

        let features = features_from_rows(&payload).unwrap();
        assert_eq!(features.len(), 2);

        let first = &features[0];
        assert_eq!(first.coordinates, Some(LatLng::new(39.75, -104.999)));
        assert_eq!(first.permit_number.as_deref(), Some("2025-DEM-0042"));
        assert_eq!(first.address.as_deref(), Some("1500 Blake St"));
        assert_eq!(first.description.as_deref(), Some("Garage teardown"));
        assert_eq!(first.issued_date.as_deref(), Some("2025-05-30"));
        assert_eq!(first.status.as_deref(), Some("ISSUED"));
        assert_eq!(first.permit_type.as_deref(), Some("Demolition"));
    }

    #[test]
    fn test_payload_without_data() {
        assert!(features_from_rows(r#"{"meta":{}}"#).unwrap().is_empty());
        assert!(features_from_rows("<html>").is_err());
    }

    #[test]
    fn test_sample_permits() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let permits = sample_permits(today);

        assert_eq!(permits.len(), 10);
        assert_eq!(permits[0].permit_number.as_deref(), Some("2025-DEM-1001"));
        assert_eq!(permits[0].address.as_deref(), Some("100 Downtown Denver St, Denver, CO"));
        assert_eq!(permits[0].issued_date.as_deref(), Some("2025-06-20"));
        assert_eq!(permits[3].issued_date.as_deref(), Some("2025-06-14"));
        assert_eq!(permits[4].status.as_deref(), Some("UNDER_REVIEW"));
        assert!(permits.iter().all(|p| p.coordinates.is_some()));
    }
}
