//! Geo Nearest - nearest-neighbour matching of geographic coordinate sets
//!
//! Each point of a source set is paired with the closest point of a
//! target set by great-circle (haversine) distance. The `core` module is
//! pure computation; `services`, `routes` and the binaries feed it from
//! CSV files, prompts and HTTP.

pub mod config;
pub mod core;
pub mod logging;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use self::core::{
    distance, haversine_distance, is_valid, is_valid_pair, match_all, parse, parse_dms,
    CoordinateError, EmptySetError, Matcher, MatchResult, ParseError, ValidationError,
};
pub use models::{CellValue, Coordinate, CoordinateSet, MatchRecord};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_exports() {
        let a = parse("0,0").unwrap();
        let b = parse("0,90").unwrap();
        assert!((distance(&a, &b) - 10007.54).abs() < 0.01);
    }
}
