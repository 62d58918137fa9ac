use axum::{
    extract::{Form, State},
    response::Redirect,
};
use askama::Template;
use serde::Deserialize;
use tower_cookies::Cookies;

use crate::{
    error::ValidationError,
    flash::{self, Flash},
    handlers::{render, require_manager, PageResult},
    models::{CreateShipment, OrderOption, Role, StaffMember, Vehicle, VehicleOption},
    state::AppState,
    view::Loadable,
};

const FORM_URL: &str = "/assign-shipment";

#[derive(Template)]
#[template(path = "add_shipment.html")]
struct AddShipmentTemplate {
    vehicles: Loadable<VehicleOption>,
    drivers: Loadable<StaffMember>,
    helpers: Loadable<StaffMember>,
    orders: Loadable<OrderOption>,
    flash: Option<Flash>,
}

#[derive(Deserialize)]
pub struct ShipmentForm {
    #[serde(default)]
    vehicle_id: String,
    #[serde(default)]
    driver_id: String,
    #[serde(default)]
    helper_id: String,
    #[serde(default)]
    order_id: String,
    #[serde(default)]
    quantity: String,
    #[serde(default)]
    start_point: String,
    #[serde(default)]
    end_point: String,
}

#[derive(Deserialize)]
pub struct NewVehicleForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    vehicle_number: String,
}

impl ShipmentForm {
    /// Combine the form with the resolved vehicle into the create payload.
    pub fn into_shipment(self, vehicle: &Vehicle) -> Result<CreateShipment, ValidationError> {
        for (value, label) in [
            (&self.driver_id, "Driver"),
            (&self.helper_id, "Helper"),
            (&self.order_id, "Product / Order"),
            (&self.start_point, "Start Point"),
            (&self.end_point, "End Point"),
        ] {
            if value.trim().is_empty() {
                return Err(ValidationError::new(format!("{} is required.", label)));
            }
        }

        let quantity: f64 = self
            .quantity
            .trim()
            .parse()
            .ok()
            .filter(|q: &f64| q.is_finite())
            .ok_or_else(|| ValidationError::new("Quantity must be a number."))?;

        Ok(CreateShipment {
            vehicle: vehicle.name.clone(),
            vehicle_number: vehicle.vehicle_number.clone(),
            driver_id: self.driver_id,
            helper_id: self.helper_id,
            order_id: self.order_id,
            quantity,
            start_point: self.start_point.trim().to_string(),
            end_point: self.end_point.trim().to_string(),
        })
    }
}

pub async fn shipment_form(State(state): State<AppState>, cookies: Cookies) -> PageResult {
    let manager = require_manager(&cookies, &state)?;

    // the three lists settle independently; one failing leaves the others usable
    let (vehicles, staff, orders) = tokio::join!(
        state.api.vehicles(),
        state.api.employees(),
        state.api.orders(),
    );

    let vehicles = match vehicles {
        Ok(remote) => Ok(state.vehicles.options(&manager.id, &remote)),
        Err(e) => {
            // pending vehicles stay selectable without the server list
            let pending = state.vehicles.options(&manager.id, &[]);
            if pending.is_empty() {
                Err(e)
            } else {
                log::warn!("vehicle list unavailable, showing pending only: {}", e);
                Ok(pending)
            }
        }
    };
    let staff = Loadable::from_result(staff, "staff");

    let template = AddShipmentTemplate {
        vehicles: Loadable::from_result(vehicles, "vehicles"),
        drivers: staff.clone().filter(|s| s.role == Role::Driver),
        helpers: staff.filter(|s| s.role == Role::Helper),
        orders: Loadable::from_result(orders, "orders").map(|o| OrderOption::from(&o)),
        flash: flash::take(&cookies),
    };
    render(&template)
}

pub async fn create_shipment(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<ShipmentForm>,
) -> PageResult<Redirect> {
    let manager = require_manager(&cookies, &state)?;

    let remote = match state.api.vehicles().await {
        Ok(remote) => remote,
        // pending vehicles resolve without the server list
        Err(e) if state.vehicles.resolve(&manager.id, &[], &form.vehicle_id).is_some() => {
            log::warn!("could not refresh vehicles before submit: {}", e);
            Vec::new()
        }
        Err(e) => {
            log::warn!("could not refresh vehicles before submit: {}", e);
            flash::set(&cookies, Flash::error(e.user_message("Network error. Please try again.")));
            return Ok(Redirect::to(FORM_URL));
        }
    };
    let Some((vehicle, sync)) = state.vehicles.resolve(&manager.id, &remote, &form.vehicle_id) else {
        flash::set(&cookies, Flash::error("Invalid vehicle selected."));
        return Ok(Redirect::to(FORM_URL));
    };

    let shipment = match form.into_shipment(&vehicle) {
        Ok(shipment) => shipment,
        Err(e) => {
            flash::set(&cookies, Flash::error(e.to_string()));
            return Ok(Redirect::to(FORM_URL));
        }
    };

    match state.api.create_shipment(&shipment).await {
        Ok(message) => {
            log::info!(
                "shipment of order {} on {} ({:?}) created by {}",
                shipment.order_id,
                shipment.vehicle_number,
                sync,
                manager.name
            );
            flash::set(&cookies, Flash::success(message));
        }
        Err(e) => {
            log::warn!("shipment creation failed: {}", e);
            flash::set(&cookies, Flash::error(e.user_message("Failed to create shipment")));
        }
    }
    Ok(Redirect::to(FORM_URL))
}

pub async fn add_vehicle(
    State(state): State<AppState>,
    cookies: Cookies,
    Form(form): Form<NewVehicleForm>,
) -> PageResult<Redirect> {
    let manager = require_manager(&cookies, &state)?;

    match state.vehicles.add(&manager.id, &form.name, &form.vehicle_number) {
        Ok(vehicle) => flash::set(&cookies, Flash::success(format!("Vehicle \"{}\" added!", vehicle.name))),
        Err(e) => flash::set(&cookies, Flash::error(e.to_string())),
    }
    Ok(Redirect::to(FORM_URL))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vehicle() -> Vehicle {
        Vehicle {
            id: "v1".to_string(),
            name: "Tata Ace".to_string(),
            vehicle_number: "KN-9598".to_string(),
        }
    }

    fn form() -> ShipmentForm {
        ShipmentForm {
            vehicle_id: "v1".to_string(),
            driver_id: "d1".to_string(),
            helper_id: "h1".to_string(),
            order_id: "o1".to_string(),
            quantity: "50".to_string(),
            start_point: "Warehouse A, Mumbai".to_string(),
            end_point: " Site B, Pune ".to_string(),
        }
    }

    #[test]
    fn payload_carries_vehicle_name_and_number() {
        let shipment = form().into_shipment(&vehicle()).unwrap();
        assert_eq!(shipment.vehicle, "Tata Ace");
        assert_eq!(shipment.vehicle_number, "KN-9598");
        assert_eq!(shipment.quantity, 50.0);
        assert_eq!(shipment.end_point, "Site B, Pune");
    }

    #[test]
    fn quantity_must_be_numeric() {
        let mut input = form();
        input.quantity = "fifty".to_string();
        assert_eq!(
            input.into_shipment(&vehicle()).unwrap_err().to_string(),
            "Quantity must be a number."
        );
    }

    #[test]
    fn quantity_must_be_finite() {
        for raw in ["NaN", "inf", "-infinity"] {
            let mut input = form();
            input.quantity = raw.to_string();
            assert_eq!(
                input.into_shipment(&vehicle()).unwrap_err().to_string(),
                "Quantity must be a number.",
                "quantity {}",
                raw
            );
        }
    }

    #[test]
    fn missing_driver_is_reported() {
        let mut input = form();
        input.driver_id.clear();
        assert_eq!(input.into_shipment(&vehicle()).unwrap_err().to_string(), "Driver is required.");
    }

    #[test]
    fn failed_section_does_not_hide_others() {
        let html = AddShipmentTemplate {
            vehicles: Loadable::Failed("Error fetching vehicles.".to_string()),
            drivers: Loadable::Ready(vec![StaffMember {
                id: "d1".to_string(),
                full_name: "Manoj".to_string(),
                role: Role::Driver,
            }]),
            helpers: Loadable::Empty,
            orders: Loadable::Ready(vec![OrderOption {
                id: "o1".to_string(),
                label: "Tile Mix A".to_string(),
            }]),
            flash: Some(Flash::success("Vehicle \"Tata Ace\" added!")),
        }
        .render()
        .unwrap();

        assert!(html.contains("Error fetching vehicles."));
        assert!(html.contains(r#"<option value="d1">Manoj</option>"#));
        assert!(html.contains(r#"<option value="o1">Tile Mix A</option>"#));
        assert!(html.contains("Vehicle &quot;Tata Ace&quot; added!"));
    }
}
