use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::config::MatchingSettings;
use crate::core::error::SetRole;
use crate::core::{ensure_non_empty, Matcher};
use crate::models::{
    ErrorResponse, HealthResponse, IndexedCoordinate, MatchView, NearestMatchRequest,
    NearestMatchResponse, ParseCoordinatesRequest, ParseCoordinatesResponse, RejectedSets,
    RejectedView,
};
use crate::services::ingest;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub matcher: Matcher,
    pub matching: MatchingSettings,
}

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/coordinates/parse", web::post().to(parse_coordinates))
        .route("/matches/nearest", web::post().to(nearest_matches));
}

/// Health check endpoint
async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

fn validation_failed(message: String) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::new("Validation failed", message, 400))
}

/// Parse coordinates endpoint
///
/// POST /api/v1/coordinates/parse
///
/// Request body:
/// ```json
/// { "values": ["40.748817,-73.985428", "27 29 44.09 S, 153 1 30 E"] }
/// ```
async fn parse_coordinates(req: web::Json<ParseCoordinatesRequest>) -> impl Responder {
    if let Err(errors) = req.validate() {
        return validation_failed(errors.to_string());
    }

    let ingested = ingest(&req.values);

    let coordinates = ingested
        .coordinates
        .iter()
        .enumerate()
        .map(|(position, c)| IndexedCoordinate {
            index: ingested.origin(position).unwrap_or(position),
            latitude: c.latitude(),
            longitude: c.longitude(),
        })
        .collect();

    HttpResponse::Ok().json(ParseCoordinatesResponse {
        coordinates,
        rejected: ingested.rejected.iter().map(RejectedView::from).collect(),
    })
}

/// Nearest match endpoint
///
/// POST /api/v1/matches/nearest
///
/// Request body:
/// ```json
/// {
///   "source": ["40.748817,-73.985428", [34.05, -118.24]],
///   "target": [{"latitude": 40.73061, "longitude": -73.935242}]
/// }
/// ```
async fn nearest_matches(
    state: web::Data<AppState>,
    req: web::Json<NearestMatchRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for nearest_matches request: {}", errors);
        return validation_failed(errors.to_string());
    }

    let limit = state.matching.max_points_per_set;
    for (role, size) in [(SetRole::Source, req.source.len()), (SetRole::Target, req.target.len())] {
        if size > limit {
            return HttpResponse::PayloadTooLarge().json(ErrorResponse::new(
                "too_many_points",
                format!("{role} set has {size} points, the limit is {limit}"),
                413,
            ));
        }
    }

    let source = ingest(&req.source);
    let target = ingest(&req.target);

    let rejected = RejectedSets {
        source: source.rejected.iter().map(RejectedView::from).collect(),
        target: target.rejected.iter().map(RejectedView::from).collect(),
    };

    if let Err(err) =
        ensure_non_empty(source.coordinates.as_slice(), target.coordinates.as_slice())
    {
        tracing::info!("Refusing match request: no valid {} coordinates", err.set);
        return HttpResponse::UnprocessableEntity()
            .json(ErrorResponse::new("empty_set", err.to_string(), 422).with_rejected(rejected));
    }

    let result = state
        .matcher
        .find_matches(source.coordinates.as_slice(), target.coordinates.as_slice());

    let precision = state.matching.display_precision;
    let matches = result
        .matches
        .iter()
        .map(|record| {
            let mut view = MatchView::from_record(record, precision);
            // report input positions, not positions in the filtered sets
            view.source_index = source.origin(record.source_index).unwrap_or(record.source_index);
            view.target_index = record
                .target_index
                .map(|j| target.origin(j).unwrap_or(j));
            view
        })
        .collect();

    let response = NearestMatchResponse {
        run_id: uuid::Uuid::new_v4().to_string(),
        matches,
        rejected,
        total_source: req.source.len(),
        total_target: req.target.len(),
    };

    tracing::info!(
        "Run {}: matched {} source points against {} targets ({} comparisons)",
        response.run_id,
        result.matches.len(),
        target.coordinates.len(),
        result.comparisons
    );

    HttpResponse::Ok().json(response)
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use serde_json::{json, Value};

    fn app_state(max_points: usize) -> AppState {
        AppState {
            matcher: Matcher::new(),
            matching: MatchingSettings {
                max_points_per_set: max_points,
                ..MatchingSettings::default()
            },
        }
    }

    #[actix_web::test]
    async fn test_health_check() {
        let app = test::init_service(App::new().configure(configure)).await;
        let req = test::TestRequest::get().uri("/health").to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["status"], "healthy");
    }

    #[actix_web::test]
    async fn test_nearest_matches() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(100)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/nearest")
            .set_json(json!({
                "source": ["0,0", "garbage", [10.0, 10.0]],
                "target": [[0.0, 90.0], "15,15", {"latitude": -10.0, "longitude": -10.0}]
            }))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["matches"].as_array().unwrap().len(), 2);
        assert_eq!(body["matches"][0]["targetIndex"], 2);
        assert_eq!(body["matches"][0]["distanceKm"], 1568.52);
        assert_eq!(body["matches"][1]["sourceIndex"], 2);
        assert_eq!(body["matches"][1]["targetIndex"], 1);
        assert_eq!(body["matches"][1]["distanceKm"], 776.86);
        assert_eq!(body["rejected"]["source"][0]["index"], 1);
        assert_eq!(body["rejected"]["source"][0]["kind"], "parse");
        assert_eq!(body["totalSource"], 3);
    }

    #[actix_web::test]
    async fn test_nearest_matches_refuses_empty_target() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(100)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/nearest")
            .set_json(json!({ "source": ["1,1"], "target": ["200,0"] }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 422);

        let body: ErrorResponse = test::read_body_json(resp).await;
        assert_eq!(body.error, "empty_set");
        assert_eq!(body.status_code, 422);
        assert_eq!(body.message, "target set contains no valid coordinates");

        let rejected = body.rejected.unwrap();
        assert!(rejected.source.is_empty());
        assert_eq!(rejected.target[0].kind, "validation");
    }

    #[actix_web::test]
    async fn test_nearest_matches_enforces_limit() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(1)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/nearest")
            .set_json(json!({ "source": ["1,1", "2,2"], "target": ["0,0"] }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 413);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["error"], "too_many_points");
        assert!(body.get("rejected").is_none());
    }

    #[actix_web::test]
    async fn test_parse_coordinates() {
        let app = test::init_service(App::new().configure(configure)).await;

        let req = test::TestRequest::post()
            .uri("/coordinates/parse")
            .set_json(json!({ "values": ["bad", "27 29 44.09 S, 153 1 30 E"] }))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;

        assert_eq!(body["coordinates"][0]["index"], 1);
        assert!((body["coordinates"][0]["latitude"].as_f64().unwrap() + 27.49558).abs() < 1e-4);
        assert_eq!(body["rejected"][0]["raw"], "bad");
    }

    #[actix_web::test]
    async fn test_empty_request_is_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(web::Data::new(app_state(100)))
                .configure(configure),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/matches/nearest")
            .set_json(json!({ "source": [], "target": ["0,0"] }))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 400);
    }
}
