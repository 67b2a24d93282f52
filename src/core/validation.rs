use crate::core::error::{CoordinateError, ParseError, ValidationError};
use crate::core::parser::{parse_angle, Axis};
use crate::models::{CellValue, Coordinate};

pub const MAX_LATITUDE: f64 = 90.0;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Check latitude/longitude ranges (inclusive) and finiteness
#[inline]
pub fn is_valid_pair(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude)
        && (-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude)
}

/// True iff `values` is a numeric two-component pair in geographic range
///
/// Anything else (wrong length, non-numeric text, empty cells) is invalid.
pub fn is_valid(values: &[CellValue]) -> bool {
    match values {
        [lat, lon] => match (lat.as_f64(), lon.as_f64()) {
            (Some(lat), Some(lon)) => is_valid_pair(lat, lon),
            _ => false,
        },
        _ => false,
    }
}

/// Build a [`Coordinate`] from raw degrees, enforcing the range invariant
pub fn validate(latitude: f64, longitude: f64) -> Result<Coordinate, ValidationError> {
    let reason = if !latitude.is_finite() || !longitude.is_finite() {
        Some("values must be finite".to_string())
    } else if !(-MAX_LATITUDE..=MAX_LATITUDE).contains(&latitude) {
        Some(format!("latitude must be between -{MAX_LATITUDE} and {MAX_LATITUDE} degrees"))
    } else if !(-MAX_LONGITUDE..=MAX_LONGITUDE).contains(&longitude) {
        Some(format!("longitude must be between -{MAX_LONGITUDE} and {MAX_LONGITUDE} degrees"))
    } else {
        None
    };

    match reason {
        Some(reason) => Err(ValidationError {
            latitude,
            longitude,
            reason,
        }),
        None => Ok(Coordinate::from_validated(latitude, longitude)),
    }
}

/// Resolve two tabular cells into a coordinate
///
/// Numeric cells are range-checked directly. Text cells may hold decimal
/// or DMS notation.
pub fn coordinate_from_cells(
    latitude: &CellValue,
    longitude: &CellValue,
) -> Result<Coordinate, CoordinateError> {
    let lat = cell_component(latitude, Axis::Latitude)?;
    let lon = cell_component(longitude, Axis::Longitude)?;
    Ok(validate(lat, lon)?)
}

fn cell_component(cell: &CellValue, axis: Axis) -> Result<f64, ParseError> {
    match cell {
        CellValue::Number(n) => Ok(*n),
        CellValue::Text(text) => parse_angle(text)?.for_axis(axis, text),
        CellValue::Empty => Err(ParseError::new("", format!("missing {axis}"))),
    }
}
