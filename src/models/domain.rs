use serde::Serialize;
use std::fmt;
use std::ops::Index;

use crate::core::error::{CoordinateError, ValidationError};
use crate::core::validation;

/// A validated latitude/longitude pair in degrees
///
/// Only obtainable through validation, so every value in range holds
/// -90 <= latitude <= 90 and -180 <= longitude <= 180.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Validate and build a coordinate
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, ValidationError> {
        validation::validate(latitude, longitude)
    }

    /// Caller has already checked the range
    pub(crate) fn from_validated(latitude: f64, longitude: f64) -> Self {
        Self { latitude, longitude }
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Formats as `lat,lon`, the same shape `parse` accepts
impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.latitude, self.longitude)
    }
}

impl From<Coordinate> for geo::Point<f64> {
    fn from(c: Coordinate) -> Self {
        geo::Point::new(c.longitude, c.latitude)
    }
}

/// Ordered coordinates; the index is the join key back to the input rows
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CoordinateSet {
    points: Vec<Coordinate>,
}

impl CoordinateSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, coordinate: Coordinate) -> usize {
        self.points.push(coordinate);
        self.points.len() - 1
    }

    pub fn get(&self, index: usize) -> Option<&Coordinate> {
        self.points.get(index)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.points.iter()
    }

    /// Index of the first point equal to `coordinate`
    pub fn position(&self, coordinate: &Coordinate) -> Option<usize> {
        self.points.iter().position(|c| c == coordinate)
    }

    pub fn as_slice(&self) -> &[Coordinate] {
        &self.points
    }
}

impl Index<usize> for CoordinateSet {
    type Output = Coordinate;

    fn index(&self, index: usize) -> &Coordinate {
        &self.points[index]
    }
}

impl From<Vec<Coordinate>> for CoordinateSet {
    fn from(points: Vec<Coordinate>) -> Self {
        Self { points }
    }
}

impl FromIterator<Coordinate> for CoordinateSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CoordinateSet {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Nearest target found for one source point
///
/// `matched` and `target_index` are `None` only when the target set was
/// empty; `distance_km` is then infinite.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchRecord {
    pub source_index: usize,
    pub source: Coordinate,
    pub target_index: Option<usize>,
    pub matched: Option<Coordinate>,
    pub distance_km: f64,
}

impl MatchRecord {
    pub fn is_matched(&self) -> bool {
        self.matched.is_some()
    }
}

/// A tabular cell before it is resolved into a coordinate component
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Text(String),
    Number(f64),
    Empty,
}

impl CellValue {
    /// Numeric value of the cell, if it holds a finite decimal number
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            CellValue::Number(n) => *n,
            CellValue::Text(s) => s.trim().parse::<f64>().ok()?,
            CellValue::Empty => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Source text of the cell, as a user would have typed it
    pub fn raw(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => n.to_string(),
            CellValue::Empty => String::new(),
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        if s.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(s.to_string())
        }
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

/// An input that was left out of a coordinate set
#[derive(Debug, Clone, PartialEq)]
pub struct RejectedEntry {
    pub index: usize,
    pub raw: String,
    pub error: CoordinateError,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coordinate_rejects_out_of_range() {
        assert!(Coordinate::new(91.0, 0.0).is_err());
        assert!(Coordinate::new(0.0, -181.0).is_err());
        assert!(Coordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_coordinate_display() {
        let c = Coordinate::new(40.748817, -73.985428).unwrap();
        assert_eq!(c.to_string(), "40.748817,-73.985428");
    }

    #[test]
    fn test_geo_point_axis_order() {
        let point: geo::Point<f64> = Coordinate::new(10.0, 20.0).unwrap().into();
        assert_eq!(point.x(), 20.0);
        assert_eq!(point.y(), 10.0);
    }

    #[test]
    fn test_set_preserves_order() {
        let mut set = CoordinateSet::new();
        let first = set.push(Coordinate::new(1.0, 1.0).unwrap());
        let second = set.push(Coordinate::new(2.0, 2.0).unwrap());

        assert_eq!((first, second), (0, 1));
        assert_eq!(set[1].latitude(), 2.0);
        assert_eq!(set.position(&Coordinate::new(1.0, 1.0).unwrap()), Some(0));
    }

    #[test]
    fn test_cell_value_numeric() {
        assert_eq!(CellValue::from(" 12.5 ").as_f64(), Some(12.5));
        assert_eq!(CellValue::from("").as_f64(), None);
        assert_eq!(CellValue::from("north").as_f64(), None);
        assert_eq!(CellValue::Number(f64::NAN).as_f64(), None);
    }
}
