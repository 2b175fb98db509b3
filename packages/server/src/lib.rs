#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Actix-Web API server for the wayfare travel planner.
//!
//! Serves the suggestion search (`/api/suggestions`), synthetic route
//! options (`/api/routes`), and trip history (`/api/trips`) endpoints,
//! plus static frontend files. Trip history is persisted in a `SQLite`
//! database at `data/trips.db`; the generative provider is configured
//! from environment credentials and degrades to static suggestions when
//! absent.

mod client_ip;
mod handlers;
pub mod routes;

use std::path::Path;
use std::sync::Arc;

use actix_cors::Cors;
use actix_files::Files;
use actix_web::{App, HttpServer, middleware, web};
use wayfare_ai::suggest::AiSuggester;
use wayfare_suggest::{SuggestConfig, SuggestionEngine};
use wayfare_trips::{SqliteTripStore, TripStore};

/// Shared application state.
pub struct AppState {
    /// The suggestion engine (owns the rate limiter and AI adapter).
    pub engine: Arc<SuggestionEngine>,
    /// Trip history store, shared with the engine.
    pub trips: Arc<dyn TripStore>,
}

/// Starts the wayfare API server.
///
/// Opens the trips `SQLite` database, configures the generative provider
/// from environment credentials, builds the suggestion engine, and starts
/// the Actix-Web HTTP server. This is a regular async function — the
/// caller is responsible for providing the async runtime (e.g. via
/// `#[actix_web::main]`).
///
/// # Errors
///
/// Returns an `std::io::Result` error if the HTTP server fails to bind or
/// encounters a runtime error.
///
/// # Panics
///
/// Panics if the trips database cannot be opened.
#[allow(clippy::future_not_send)]
pub async fn run_server() -> std::io::Result<()> {
    pretty_env_logger::init_custom_env("RUST_LOG");

    log::info!("Opening trips database...");
    let trips_path =
        std::env::var("TRIPS_DB_PATH").unwrap_or_else(|_| wayfare_trips::DEFAULT_DB_PATH.to_string());
    let store = SqliteTripStore::open(Path::new(&trips_path))
        .await
        .expect("Failed to open trips database");
    let trips: Arc<dyn TripStore> = Arc::new(store);

    log::info!("Configuring generative suggestion provider...");
    let ai = AiSuggester::from_env();
    if !ai.is_live() {
        log::info!("Running with static fallback suggestions");
    }

    let mut config = SuggestConfig::default();
    if let Some(quota) = std::env::var("SUGGEST_RATE_LIMIT")
        .ok()
        .and_then(|q| q.parse().ok())
    {
        config.rate_quota = quota;
    }

    let engine = Arc::new(SuggestionEngine::new(Arc::clone(&trips), ai, config));

    let state = web::Data::new(AppState { engine, trips });

    let bind_addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8080);

    log::info!("Starting server on {bind_addr}:{port}");

    HttpServer::new(move || {
        let cors = Cors::permissive();

        App::new()
            .wrap(cors)
            .wrap(middleware::Logger::default())
            .app_data(state.clone())
            .service(
                web::scope("/api")
                    .route("/health", web::get().to(handlers::health))
                    .route("/suggestions", web::get().to(handlers::suggestions))
                    .route("/routes", web::get().to(handlers::route_options))
                    .route("/trips", web::get().to(handlers::list_trips))
                    .route("/trips", web::post().to(handlers::record_trip)),
            )
            // Serve frontend static files (production)
            .service(Files::new("/", "app/dist").index_file("index.html"))
    })
    .bind((bind_addr, port))?
    .run()
    .await
}
