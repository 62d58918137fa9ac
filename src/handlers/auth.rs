use axum::{
    extract::{Form, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use askama::Template;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    error::{ApiError, ValidationError},
    handlers::{render, PageResult},
    middleware::{get_current_employee, SessionStore},
    models::LoginRequest,
    state::AppState,
};

#[derive(Template)]
#[template(path = "login.html")]
struct LoginTemplate {
    error: String,
    mobile: String,
}

#[derive(Template)]
#[template(path = "login_success.html")]
struct LoginSuccessTemplate {
    name: String,
    target: String,
    delay_ms: u64,
    refresh_secs: u64,
}

#[derive(Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    mobile: String,
    #[serde(default)]
    password: String,
}

/// Checks done before the credentials leave the browser session.
pub fn validate_login(form: &LoginForm) -> Result<LoginRequest, ValidationError> {
    let mobile = form.mobile.trim();
    if mobile.len() != 10 || !mobile.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ValidationError::new("Please enter a valid 10-digit phone number."));
    }
    if form.password.is_empty() {
        return Err(ValidationError::new("Please enter your password."));
    }
    Ok(LoginRequest {
        mobile: mobile.to_string(),
        password: form.password.clone(),
    })
}

fn login_form(status: StatusCode, error: &str, mobile: &str) -> Response {
    let template = LoginTemplate {
        error: error.to_string(),
        mobile: mobile.to_string(),
    };
    match render(&template) {
        Ok(html) => (status, html).into_response(),
        Err(resp) => resp,
    }
}

/// `/` shows the login form unless the session already has a landing page.
pub async fn root(State(state): State<AppState>, cookies: Cookies) -> Response {
    match get_current_employee(&cookies, &state) {
        Some(employee) if employee.role.landing_route() != "/" => {
            Redirect::to(employee.role.landing_route()).into_response()
        }
        _ => login_form(StatusCode::OK, "", ""),
    }
}

pub async fn login_page() -> PageResult {
    render(&LoginTemplate {
        error: String::new(),
        mobile: String::new(),
    })
}

pub async fn login(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<LoginForm>,
) -> Response {
    let request = match validate_login(&form) {
        Ok(request) => request,
        Err(e) => return login_form(StatusCode::BAD_REQUEST, &e.to_string(), &form.mobile),
    };

    let employee = match state.api.login(&request).await {
        Ok(employee) => employee,
        Err(e @ ApiError::Rejected(_)) => {
            log::info!("login refused for {}: {}", request.mobile, e);
            return login_form(StatusCode::UNAUTHORIZED, &e.user_message("Invalid credentials."), &form.mobile);
        }
        Err(e) => {
            log::warn!("login request failed: {}", e);
            return login_form(StatusCode::BAD_GATEWAY, "Network error. Please try again.", &form.mobile);
        }
    };

    if let Err(e) = SessionStore::new(&cookies, &state.config.jwt_secret).set(&employee) {
        log::error!("failed to sign session: {}", e);
        return login_form(StatusCode::INTERNAL_SERVER_ERROR, "Authentication failed", &form.mobile);
    }
    log::info!("{} logged in as {}", employee.name, employee.role);

    let delay_ms = state.config.login_redirect.as_millis() as u64;
    let template = LoginSuccessTemplate {
        name: employee.name.clone(),
        target: employee.role.landing_route().to_string(),
        delay_ms,
        refresh_secs: delay_ms.div_ceil(1000),
    };
    match render(&template) {
        Ok(html) => html.into_response(),
        Err(resp) => resp,
    }
}

pub async fn logout(State(state): State<AppState>, cookies: Cookies) -> Redirect {
    SessionStore::new(&cookies, &state.config.jwt_secret).clear();
    Redirect::to("/login")
}
