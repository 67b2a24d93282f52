// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{CellValue, Coordinate, CoordinateSet, MatchRecord, RejectedEntry};
pub use requests::{CoordinateInput, NearestMatchRequest, ParseCoordinatesRequest};
pub use responses::{
    ErrorResponse, HealthResponse, IndexedCoordinate, MatchView, NearestMatchResponse,
    ParseCoordinatesResponse, RejectedSets, RejectedView,
};
