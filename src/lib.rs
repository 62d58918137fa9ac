pub mod api;
pub mod config;
pub mod error;
pub mod flash;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod scanner;
pub mod state;
pub mod tracking;
pub mod utils;
pub mod vehicles;
pub mod view;

use axum::{
    routing::{get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{cors::CorsLayer, services::ServeDir, trace::TraceLayer};

pub use config::Config;
pub use state::AppState;

pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Public routes
        .route("/", get(handlers::auth::root))
        .route("/login", get(handlers::auth::login_page).post(handlers::auth::login))
        .route("/logout", post(handlers::auth::logout))

        // Role landing pages
        .route("/manager", get(handlers::dashboard::manager))
        .route("/operator", get(handlers::dashboard::operator))
        .route("/helper", get(handlers::dashboard::helper))
        .route("/mixture", get(handlers::dashboard::mixture))

        // Manager forms
        .route(
            "/assign-inventory",
            get(handlers::assignment::assign_form).post(handlers::assignment::assign_machine),
        )
        .route(
            "/assign-shipment",
            get(handlers::shipment::shipment_form).post(handlers::shipment::create_shipment),
        )
        .route("/assign-shipment/vehicles", post(handlers::shipment::add_vehicle))

        // Tracking and scanning
        .route("/track", get(handlers::tracking::track_shipments))
        .route("/scan/open", post(handlers::scan::open_scanner))
        .route("/scan/:id", get(handlers::scan::scanner_page))
        .route("/scan/:id/events", post(handlers::scan::scanner_event))
        .route("/scan/:id/close", post(handlers::scan::close_scanner))

        // Static files
        .nest_service("/static", ServeDir::new("static"))

        // Middleware
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CookieManagerLayer::new())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}
