use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::error::CoordinateError;
use crate::core::{parse, validate};
use crate::models::Coordinate;

/// One coordinate as a client may send it
///
/// Accepts `"40.7,-73.9"` (decimal or DMS text), `[40.7, -73.9]` or
/// `{"latitude": 40.7, "longitude": -73.9}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CoordinateInput {
    Text(String),
    Pair([f64; 2]),
    Object {
        #[serde(alias = "lat")]
        latitude: f64,
        #[serde(alias = "lon", alias = "lng")]
        longitude: f64,
    },
}

impl CoordinateInput {
    pub fn resolve(&self) -> Result<Coordinate, CoordinateError> {
        match self {
            CoordinateInput::Text(raw) => parse(raw),
            CoordinateInput::Pair([lat, lon]) => Ok(validate(*lat, *lon)?),
            CoordinateInput::Object {
                latitude,
                longitude,
            } => Ok(validate(*latitude, *longitude)?),
        }
    }

    /// Input as text, for error reports
    pub fn raw(&self) -> String {
        match self {
            CoordinateInput::Text(raw) => raw.clone(),
            CoordinateInput::Pair([lat, lon]) => format!("{lat},{lon}"),
            CoordinateInput::Object {
                latitude,
                longitude,
            } => format!("{latitude},{longitude}"),
        }
    }
}

/// Request to match two coordinate sets
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct NearestMatchRequest {
    #[validate(length(min = 1))]
    pub source: Vec<CoordinateInput>,
    #[validate(length(min = 1))]
    pub target: Vec<CoordinateInput>,
}

/// Request to parse raw coordinate strings
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ParseCoordinatesRequest {
    #[validate(length(min = 1))]
    pub values: Vec<String>,
}
