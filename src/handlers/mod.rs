pub mod assignment;
pub mod auth;
pub mod dashboard;
pub mod scan;
pub mod shipment;
pub mod tracking;

use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use tower_cookies::Cookies;

use crate::{
    middleware::get_current_employee,
    models::{Employee, Role},
    state::AppState,
};

/// Page handlers answer with rendered HTML or a ready-made response
/// (redirect, status code).
pub type PageResult<T = Html<String>> = Result<T, Response>;

pub(crate) fn render<T: Template>(template: &T) -> PageResult {
    template.render().map(Html).map_err(|e| {
        log::error!("template render failed: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

/// The session employee, or a redirect to the login page.
pub(crate) fn require_session(cookies: &Cookies, state: &AppState) -> Result<Employee, Response> {
    get_current_employee(cookies, state).ok_or_else(|| Redirect::to("/login").into_response())
}

/// Assignment and shipment forms are for managers only.
pub(crate) fn require_manager(cookies: &Cookies, state: &AppState) -> Result<Employee, Response> {
    let employee = require_session(cookies, state)?;
    if employee.role != Role::Manager {
        log::warn!("{} ({}) denied manager page", employee.name, employee.role);
        return Err(StatusCode::FORBIDDEN.into_response());
    }
    Ok(employee)
}
