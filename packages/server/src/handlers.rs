//! HTTP handler functions for the wayfare API.

use actix_web::{HttpRequest, HttpResponse, web};
use wayfare_server_models::{
    ApiHealth, ApiRouteOption, ApiSuggestion, ApiTrip, NewTripPayload, RouteQueryParams,
    SuggestQueryParams, TripQueryParams,
};
use wayfare_trips::NewTrip;

use crate::{AppState, client_ip, routes};

/// Default and maximum page sizes for the trip history endpoint.
const DEFAULT_TRIPS_LIMIT: u32 = 20;
const MAX_TRIPS_LIMIT: u32 = 100;

/// `GET /api/health`
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(ApiHealth {
        healthy: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// `GET /api/suggestions`
///
/// Returns ranked suggestions for the `q` query string. Always answers
/// with HTTP 200: missing sources, rate-limited clients, and unknown
/// queries all degrade to a smaller (possibly empty) array.
pub async fn suggestions(
    state: web::Data<AppState>,
    req: HttpRequest,
    params: web::Query<SuggestQueryParams>,
) -> HttpResponse {
    let query = params.q.as_deref().unwrap_or_default();
    let client = client_ip::client_key(&req);

    let results = state.engine.suggest(query, &client).await;
    let api: Vec<ApiSuggestion> = results.into_iter().map(ApiSuggestion::from).collect();

    HttpResponse::Ok().json(api)
}

/// `GET /api/routes`
///
/// Returns synthetic multi-modal route options for an origin/destination
/// pair, optionally filtered by budget. The searched pair is recorded
/// into the trip history so future suggestion queries can surface it.
pub async fn route_options(
    state: web::Data<AppState>,
    params: web::Query<RouteQueryParams>,
) -> HttpResponse {
    let origin = params.origin.as_deref().unwrap_or_default().trim();
    let destination = params.destination.as_deref().unwrap_or_default().trim();

    if origin.is_empty() || destination.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "origin and destination are required"
        }));
    }

    let options: Vec<ApiRouteOption> = routes::route_options(origin, destination, params.budget);

    // History is advisory; a failed write must not fail the search.
    if let Err(e) = state
        .trips
        .record(&NewTrip {
            origin: origin.to_string(),
            destination: destination.to_string(),
            mode: None,
        })
        .await
    {
        log::error!("Failed to record trip search: {e}");
    }

    HttpResponse::Ok().json(options)
}

/// `GET /api/trips`
///
/// Lists the most recently recorded trips.
pub async fn list_trips(
    state: web::Data<AppState>,
    params: web::Query<TripQueryParams>,
) -> HttpResponse {
    let limit = params
        .limit
        .unwrap_or(DEFAULT_TRIPS_LIMIT)
        .min(MAX_TRIPS_LIMIT);

    match state.trips.recent(limit).await {
        Ok(trips) => {
            let api: Vec<ApiTrip> = trips.into_iter().map(ApiTrip::from).collect();
            HttpResponse::Ok().json(api)
        }
        Err(e) => {
            log::error!("Failed to list trips: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to list trips"
            }))
        }
    }
}

/// `POST /api/trips`
///
/// Records a planned trip.
pub async fn record_trip(
    state: web::Data<AppState>,
    payload: web::Json<NewTripPayload>,
) -> HttpResponse {
    let origin = payload.origin.trim();
    let destination = payload.destination.trim();

    if origin.is_empty() || destination.is_empty() {
        return HttpResponse::BadRequest().json(serde_json::json!({
            "error": "origin and destination are required"
        }));
    }

    let trip = NewTrip {
        origin: origin.to_string(),
        destination: destination.to_string(),
        mode: payload
            .mode
            .as_deref()
            .map(str::trim)
            .filter(|m| !m.is_empty())
            .map(ToString::to_string),
    };

    match state.trips.record(&trip).await {
        Ok(id) => HttpResponse::Ok().json(serde_json::json!({ "id": id })),
        Err(e) => {
            log::error!("Failed to record trip: {e}");
            HttpResponse::InternalServerError().json(serde_json::json!({
                "error": "Failed to record trip"
            }))
        }
    }
}
