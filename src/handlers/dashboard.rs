use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Redirect},
};
use askama::Template;
use tower_cookies::Cookies;

use crate::{
    flash::{self, Flash},
    handlers::{render, require_session, scan::last_scan_result, PageResult},
    models::{EmployeeDisplay, Role},
    state::AppState,
};

#[derive(Template)]
#[template(path = "dashboard.html")]
struct DashboardTemplate {
    employee: EmployeeDisplay,
    heading: String,
    blurb: String,
    scan_result: String,
    flash: Option<Flash>,
    has_inventory_access: bool,
    has_scan_access: bool,
    has_tracking_access: bool,
}

struct Landing {
    heading: &'static str,
    blurb: &'static str,
    inventory: bool,
    scan: bool,
    tracking: bool,
}

fn landing_for(role: &Role) -> Landing {
    match role {
        Role::Manager => Landing {
            heading: "Manager Dashboard",
            blurb: "Assign machines and shipments, scan boxes and follow deliveries.",
            inventory: true,
            scan: true,
            tracking: true,
        },
        Role::Helper => Landing {
            heading: "Helper Dashboard",
            blurb: "Scan QR codes to log box movements and follow shipments.",
            inventory: false,
            scan: true,
            tracking: true,
        },
        Role::Operator => Landing {
            heading: "Operator Dashboard",
            blurb: "Monitor and operate assigned machines efficiently.",
            inventory: false,
            scan: false,
            tracking: false,
        },
        _ => Landing {
            heading: "Mixture Dashboard",
            blurb: "Check your mixing machine assignments for the shift.",
            inventory: false,
            scan: false,
            tracking: false,
        },
    }
}

async fn landing_page(state: AppState, cookies: Cookies, expected: Role) -> PageResult {
    let employee = require_session(&cookies, &state)?;

    if employee.role != expected {
        // send people to their own page, or away if they have none
        let own = employee.role.landing_route();
        return Err(if own == "/" {
            StatusCode::FORBIDDEN.into_response()
        } else {
            Redirect::to(own).into_response()
        });
    }

    let landing = landing_for(&expected);
    let template = DashboardTemplate {
        employee: EmployeeDisplay::from(&employee),
        heading: landing.heading.to_string(),
        blurb: landing.blurb.to_string(),
        scan_result: last_scan_result(&cookies).unwrap_or_default(),
        flash: flash::take(&cookies),
        has_inventory_access: landing.inventory,
        has_scan_access: landing.scan,
        has_tracking_access: landing.tracking,
    };
    render(&template)
}

pub async fn manager(State(state): State<AppState>, cookies: Cookies) -> PageResult<Html<String>> {
    landing_page(state, cookies, Role::Manager).await
}

pub async fn operator(State(state): State<AppState>, cookies: Cookies) -> PageResult<Html<String>> {
    landing_page(state, cookies, Role::Operator).await
}

pub async fn helper(State(state): State<AppState>, cookies: Cookies) -> PageResult<Html<String>> {
    landing_page(state, cookies, Role::Helper).await
}

pub async fn mixture(State(state): State<AppState>, cookies: Cookies) -> PageResult<Html<String>> {
    landing_page(state, cookies, Role::Mixture).await
}
