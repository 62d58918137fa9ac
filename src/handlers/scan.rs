use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json, Redirect, Response},
};
use askama::Template;
use serde::Serialize;
use tower_cookies::{Cookie, Cookies};
use uuid::Uuid;

use crate::{
    flash::{self, Flash},
    handlers::{render, require_session, PageResult},
    scanner::{DecodeEvent, ScanError, ScanProgress, SCANNER_ANCHOR},
    state::AppState,
};

const SCAN_RESULT_COOKIE: &str = "scan_result";

#[derive(Template)]
#[template(path = "scan.html")]
struct ScanTemplate {
    scan_id: String,
    anchor: String,
    back: String,
}

#[derive(Debug, Serialize)]
pub struct ScanReply {
    state: &'static str,
    redirect: String,
}

/// Last decoded code for this browser, shown on the landing pages.
pub fn last_scan_result(cookies: &Cookies) -> Option<String> {
    let raw = cookies.get(SCAN_RESULT_COOKIE)?.value().to_string();
    urlencoding::decode(&raw).ok().map(|s| s.into_owned())
}

fn store_scan_result(cookies: &Cookies, text: &str) {
    let cookie = Cookie::build((SCAN_RESULT_COOKIE, urlencoding::encode(text).into_owned()))
        .path("/")
        .http_only(true)
        .build();
    cookies.add(cookie);
}

pub async fn open_scanner(State(state): State<AppState>, cookies: Cookies) -> PageResult<Redirect> {
    let employee = require_session(&cookies, &state)?;

    match state.scanner.mount(&employee.id, SCANNER_ANCHOR) {
        Ok(scan) => {
            let id = scan.id();
            scan.suspend();
            Ok(Redirect::to(&format!("/scan/{}", id)))
        }
        Err(e) => {
            log::info!("{} tried to open a second scanner: {}", employee.name, e);
            flash::set(&cookies, Flash::error("A scanner is already open. Close it before starting a new scan."));
            Ok(Redirect::to(employee.role.landing_route()))
        }
    }
}

pub async fn scanner_page(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
) -> PageResult {
    let employee = require_session(&cookies, &state)?;
    let back = employee.role.landing_route().to_string();

    let scan = state
        .scanner
        .resume(&employee.id, id)
        .map_err(|_| Redirect::to(&back).into_response())?;
    let anchor = scan.anchor().to_string();
    scan.suspend();

    render(&ScanTemplate {
        scan_id: id.to_string(),
        anchor,
        back,
    })
}

pub async fn scanner_event(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
    Json(event): Json<DecodeEvent>,
) -> PageResult<Response> {
    let employee = require_session(&cookies, &state)?;
    let back = employee.role.landing_route().to_string();

    let scan = match state.scanner.resume(&employee.id, id) {
        Ok(scan) => scan,
        Err(ScanError::NotFound) | Err(ScanError::AlreadyActive) => {
            let reply = ScanReply { state: "closed", redirect: back };
            return Ok((StatusCode::NOT_FOUND, Json(reply)).into_response());
        }
    };

    let progress = scan.handle(event, |text| {
        log::info!("{} scanned {}", employee.name, text);
        store_scan_result(&cookies, &text);
    });

    let label = match progress {
        ScanProgress::Finished => "finished",
        ScanProgress::Scanning => "scanning",
    };
    Ok(Json(ScanReply { state: label, redirect: back }).into_response())
}

pub async fn close_scanner(
    State(state): State<AppState>,
    cookies: Cookies,
    Path(id): Path<Uuid>,
) -> PageResult<Redirect> {
    let employee = require_session(&cookies, &state)?;

    if let Ok(scan) = state.scanner.resume(&employee.id, id) {
        scan.close();
    }
    Ok(Redirect::to(employee.role.landing_route()))
}
