use axum::extract::State;
use askama::Template;
use tower_cookies::Cookies;

use crate::{
    handlers::{render, require_session, PageResult},
    state::AppState,
    tracking::{build_cards, ShipmentCard},
    view::Loadable,
};

#[derive(Template)]
#[template(path = "track.html")]
struct TrackTemplate {
    shipments: Loadable<ShipmentCard>,
    back: String,
}

/// One snapshot of every transfer, newest status update first.
pub async fn track_shipments(State(state): State<AppState>, cookies: Cookies) -> PageResult {
    let employee = require_session(&cookies, &state)?;

    let mut shipments = Loadable::Loading;
    let result = state.api.transfers().await.map(build_cards);
    // only a fresh section can be settled
    let _ = shipments.settle(result, "shipments");

    render(&TrackTemplate {
        shipments,
        back: employee.role.landing_route().to_string(),
    })
}
