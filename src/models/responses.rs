use serde::{Deserialize, Serialize};

use crate::core::round_km;
use crate::models::domain::{Coordinate, MatchRecord, RejectedEntry};

/// One match as returned over HTTP
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchView {
    pub source_index: usize,
    pub source: Coordinate,
    pub target_index: Option<usize>,
    pub matched: Option<Coordinate>,
    /// Rounded for display; `null` when there was no target
    pub distance_km: Option<f64>,
}

impl MatchView {
    pub fn from_record(record: &MatchRecord, precision: u32) -> Self {
        Self {
            source_index: record.source_index,
            source: record.source,
            target_index: record.target_index,
            matched: record.matched,
            distance_km: record
                .is_matched()
                .then(|| round_km(record.distance_km, precision)),
        }
    }
}

/// An input that was skipped, with the reason
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RejectedView {
    pub index: usize,
    pub raw: String,
    pub kind: String,
    pub message: String,
}

impl From<&RejectedEntry> for RejectedView {
    fn from(entry: &RejectedEntry) -> Self {
        Self {
            index: entry.index,
            raw: entry.raw.clone(),
            kind: entry.error.kind().to_string(),
            message: entry.error.to_string(),
        }
    }
}

/// Rejected entries for each side of a match request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RejectedSets {
    pub source: Vec<RejectedView>,
    pub target: Vec<RejectedView>,
}

/// Response for the nearest match endpoint
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearestMatchResponse {
    pub run_id: String,
    pub matches: Vec<MatchView>,
    pub rejected: RejectedSets,
    pub total_source: usize,
    pub total_target: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct IndexedCoordinate {
    pub index: usize,
    pub latitude: f64,
    pub longitude: f64,
}

/// Response for the parse endpoint
#[derive(Debug, Clone, Serialize)]
pub struct ParseCoordinatesResponse {
    pub coordinates: Vec<IndexedCoordinate>,
    pub rejected: Vec<RejectedView>,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    pub status_code: u16,
    /// Entries skipped before the request failed, when there were any to skip
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rejected: Option<RejectedSets>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            error: error.into(),
            message: message.into(),
            status_code,
            rejected: None,
        }
    }

    pub fn with_rejected(mut self, rejected: RejectedSets) -> Self {
        self.rejected = Some(rejected);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unmatched_record_has_null_distance() {
        let source = Coordinate::new(1.0, 1.0).unwrap();
        let record = MatchRecord {
            source_index: 0,
            source,
            target_index: None,
            matched: None,
            distance_km: f64::INFINITY,
        };

        let json = serde_json::to_value(MatchView::from_record(&record, 2)).unwrap();

        assert!(json["distanceKm"].is_null());
        assert!(json["matched"].is_null());
        assert_eq!(json["source"]["latitude"], 1.0);
    }

    #[test]
    fn test_error_response_rejected_is_optional() {
        let plain = serde_json::to_value(ErrorResponse::new("too_many_points", "too many", 413)).unwrap();
        assert!(plain.get("rejected").is_none());

        let body = ErrorResponse::new("empty_set", "target set contains no valid coordinates", 422)
            .with_rejected(RejectedSets::default());
        let json = serde_json::to_string(&body).unwrap();
        let back: ErrorResponse = serde_json::from_str(&json).unwrap();
        assert_eq!(back.status_code, 422);
        assert!(back.rejected.is_some_and(|r| r.source.is_empty()));
    }
}
