// Core algorithm exports
pub mod distance;
pub mod error;
pub mod matcher;
pub mod parser;
pub mod validation;

pub use distance::{distance, haversine_distance, round_km, EARTH_RADIUS_KM, MAX_DISPLAY_PRECISION};
pub use error::{CoordinateError, EmptySetError, ParseError, SetRole, ValidationError};
pub use matcher::{ensure_non_empty, match_all, MatchResult, Matcher};
pub use parser::{parse, parse_angle, parse_dms, Angle, Axis, Hemisphere};
pub use validation::{coordinate_from_cells, is_valid, is_valid_pair, validate};
