use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Raw coordinate text that could not be understood
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot parse '{raw}': {reason}")]
pub struct ParseError {
    pub raw: String,
    pub reason: String,
}

impl ParseError {
    pub fn new(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            reason: reason.into(),
        }
    }
}

/// Numeric values outside the geographic range
#[derive(Debug, Clone, PartialEq, Error)]
#[error("invalid coordinate ({latitude}, {longitude}): {reason}")]
pub struct ValidationError {
    pub latitude: f64,
    pub longitude: f64,
    pub reason: String,
}

/// Which side of a matching run a set belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SetRole {
    Source,
    Target,
}

impl fmt::Display for SetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SetRole::Source => f.write_str("source"),
            SetRole::Target => f.write_str("target"),
        }
    }
}

/// A coordinate set with nothing in it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{set} set contains no valid coordinates")]
pub struct EmptySetError {
    pub set: SetRole,
}

/// Any failure while turning input into coordinates or preparing a match
#[derive(Debug, Clone, PartialEq, Error)]
pub enum CoordinateError {
    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    EmptySet(#[from] EmptySetError),
}

impl CoordinateError {
    /// Stable tag used in JSON bodies and reports
    pub fn kind(&self) -> &'static str {
        match self {
            CoordinateError::Parse(_) => "parse",
            CoordinateError::Validation(_) => "validation",
            CoordinateError::EmptySet(_) => "empty_set",
        }
    }
}
