use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

use crate::core::parser::{parse_angle, Axis};
use crate::models::CellValue;
use crate::services::ingest::{ingest, CellPair, Ingested};

/// Errors that can occur while reading tabular input
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("column '{column}' not found (available: {available})")]
    UnknownColumn { column: String, available: String },

    #[error("could not detect a {axis} column, pass it explicitly")]
    ColumnNotDetected { axis: Axis },
}

const LATITUDE_HEADERS: &[&str] = &["lat", "latitude", "y"];
const LONGITUDE_HEADERS: &[&str] = &["lon", "lng", "long", "longitude", "x"];

/// A column picked by header name or zero-based position
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnSelector {
    Name(String),
    Index(usize),
}

impl FromStr for ColumnSelector {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().parse::<usize>() {
            Ok(index) => ColumnSelector::Index(index),
            Err(_) => ColumnSelector::Name(s.trim().to_string()),
        })
    }
}

/// Whether the first CSV record names the columns
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum HeaderMode {
    /// Header row only if no cell of the first record reads as an angle
    #[default]
    Detect,
    Present,
    Absent,
}

impl HeaderMode {
    fn applies_to(self, first: &StringRecord) -> bool {
        match self {
            HeaderMode::Present => true,
            HeaderMode::Absent => false,
            HeaderMode::Detect => first.iter().all(|cell| parse_angle(cell).is_err()),
        }
    }
}

/// A CSV table held in memory
#[derive(Debug, Clone)]
pub struct CsvSource {
    headers: Option<StringRecord>,
    rows: Vec<StringRecord>,
    width: usize,
}

impl CsvSource {
    /// Open and read a CSV file
    pub fn open<P: AsRef<Path>>(
        path: P,
        delimiter: u8,
        header: HeaderMode,
    ) -> Result<Self, IngestError> {
        let file = File::open(path.as_ref())?;
        Self::read(file, delimiter, header)
    }

    /// Read CSV data, detecting whether it starts with a header row
    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> Result<Self, IngestError> {
        Self::read(reader, delimiter, HeaderMode::Detect)
    }

    pub fn read<R: Read>(reader: R, delimiter: u8, header: HeaderMode) -> Result<Self, IngestError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .delimiter(delimiter)
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);

        let mut rows = rdr.records().collect::<Result<Vec<_>, _>>()?;
        let has_header = rows.first().is_some_and(|first| header.applies_to(first));
        let headers = has_header.then(|| rows.remove(0));
        let width = rows
            .iter()
            .chain(headers.iter())
            .map(StringRecord::len)
            .max()
            .unwrap_or(0);

        tracing::debug!(
            "Read {} rows with {} columns ({})",
            rows.len(),
            width,
            if headers.is_some() { "header row" } else { "no header row" }
        );

        Ok(Self { headers, rows, width })
    }

    /// Column names, empty when the data has no header row
    pub fn headers(&self) -> Vec<&str> {
        self.headers.iter().flat_map(|h| h.iter()).collect()
    }

    pub fn has_headers(&self) -> bool {
        self.headers.is_some()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// One-based line of the file holding data row `row`
    pub fn line_number(&self, row: usize) -> usize {
        row + 1 + usize::from(self.has_headers())
    }

    fn column_name(&self, column: usize) -> String {
        self.headers
            .as_ref()
            .and_then(|h| h.get(column))
            .map_or_else(|| column.to_string(), str::to_string)
    }

    fn available(&self) -> String {
        (0..self.width)
            .map(|column| self.column_name(column))
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Position of the selected column
    pub fn resolve_column(&self, selector: &ColumnSelector) -> Result<usize, IngestError> {
        let found = match selector {
            ColumnSelector::Index(index) => (*index < self.width).then_some(*index),
            ColumnSelector::Name(name) => self
                .headers()
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name)),
        };

        found.ok_or_else(|| IngestError::UnknownColumn {
            column: match selector {
                ColumnSelector::Index(index) => index.to_string(),
                ColumnSelector::Name(name) => name.clone(),
            },
            available: self.available(),
        })
    }

    /// Guess latitude and longitude columns from common header names
    pub fn detect_columns(&self) -> Result<(usize, usize), IngestError> {
        Ok((self.detect_column(Axis::Latitude)?, self.detect_column(Axis::Longitude)?))
    }

    fn detect_column(&self, axis: Axis) -> Result<usize, IngestError> {
        let candidates = match axis {
            Axis::Latitude => LATITUDE_HEADERS,
            Axis::Longitude => LONGITUDE_HEADERS,
        };

        self.headers()
            .iter()
            .position(|h| candidates.iter().any(|c| h.eq_ignore_ascii_case(c)))
            .ok_or(IngestError::ColumnNotDetected { axis })
    }

    /// Latitude/longitude cells of every row
    pub fn cells(&self, lat_column: usize, lon_column: usize) -> Vec<CellPair> {
        self.rows
            .iter()
            .map(|row| CellPair {
                latitude: row.get(lat_column).map_or(CellValue::Empty, CellValue::from),
                longitude: row.get(lon_column).map_or(CellValue::Empty, CellValue::from),
            })
            .collect()
    }

    /// Pick columns (explicit or detected) and ingest every row
    pub fn ingest(
        &self,
        latitude: Option<&ColumnSelector>,
        longitude: Option<&ColumnSelector>,
    ) -> Result<Ingested, IngestError> {
        let lat_column = match latitude {
            Some(selector) => self.resolve_column(selector)?,
            None => self.detect_column(Axis::Latitude)?,
        };
        let lon_column = match longitude {
            Some(selector) => self.resolve_column(selector)?,
            None => self.detect_column(Axis::Longitude)?,
        };

        tracing::info!(
            "Using columns '{}' (latitude) and '{}' (longitude)",
            self.column_name(lat_column),
            self.column_name(lon_column)
        );

        Ok(ingest(&self.cells(lat_column, lon_column)))
    }
}
