use crate::core::coordinate_from_cells;
use crate::core::error::CoordinateError;
use crate::core::parse;
use crate::models::{CellValue, Coordinate, CoordinateInput, CoordinateSet, RejectedEntry};

/// Anything that can be turned into a coordinate at ingestion time
pub trait RawCoordinate {
    fn resolve(&self) -> Result<Coordinate, CoordinateError>;

    /// Original text, kept for error reports
    fn raw(&self) -> String;
}

impl RawCoordinate for &str {
    fn resolve(&self) -> Result<Coordinate, CoordinateError> {
        parse(self)
    }

    fn raw(&self) -> String {
        self.to_string()
    }
}

impl RawCoordinate for String {
    fn resolve(&self) -> Result<Coordinate, CoordinateError> {
        parse(self)
    }

    fn raw(&self) -> String {
        self.clone()
    }
}

impl RawCoordinate for CoordinateInput {
    fn resolve(&self) -> Result<Coordinate, CoordinateError> {
        CoordinateInput::resolve(self)
    }

    fn raw(&self) -> String {
        CoordinateInput::raw(self)
    }
}

/// Latitude and longitude cells of one table row
#[derive(Debug, Clone, PartialEq)]
pub struct CellPair {
    pub latitude: CellValue,
    pub longitude: CellValue,
}

impl RawCoordinate for CellPair {
    fn resolve(&self) -> Result<Coordinate, CoordinateError> {
        coordinate_from_cells(&self.latitude, &self.longitude)
    }

    fn raw(&self) -> String {
        format!("{},{}", self.latitude.raw(), self.longitude.raw())
    }
}

/// Valid coordinates plus everything that was skipped
#[derive(Debug, Clone, Default)]
pub struct Ingested {
    pub coordinates: CoordinateSet,
    /// Input index of each coordinate, by set position
    pub origins: Vec<usize>,
    pub rejected: Vec<RejectedEntry>,
}

impl Ingested {
    /// Input index that produced the coordinate at `position`
    pub fn origin(&self, position: usize) -> Option<usize> {
        self.origins.get(position).copied()
    }
}

/// Resolve every input, keeping order and reporting failures individually
pub fn ingest<T>(inputs: &[T]) -> Ingested
where
    T: RawCoordinate,
{
    let mut ingested = Ingested::default();

    for (index, input) in inputs.iter().enumerate() {
        match input.resolve() {
            Ok(coordinate) => {
                ingested.coordinates.push(coordinate);
                ingested.origins.push(index);
            }
            Err(error) => {
                tracing::warn!("Skipping entry {}: {}", index, error);
                ingested.rejected.push(RejectedEntry {
                    index,
                    raw: input.raw(),
                    error,
                });
            }
        }
    }

    tracing::debug!(
        "Ingested {} coordinates, rejected {}",
        ingested.coordinates.len(),
        ingested.rejected.len()
    );

    ingested
}
