use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vehicle {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default, deserialize_with = "super::null_default")]
    pub name: String,
    #[serde(rename = "vehicleNumber", default, deserialize_with = "super::null_default")]
    pub vehicle_number: String,
}

/// Whether a vehicle is known to the server or only to this dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    Synced,
    PendingSync,
}

// Template-friendly option for the vehicle select
#[derive(Debug, Clone)]
pub struct VehicleOption {
    pub id: String,
    pub label: String,
    pub pending: bool,
}

impl VehicleOption {
    pub fn new(vehicle: &Vehicle, sync: SyncState) -> Self {
        let mut label = format!("{} - {}", vehicle.name, vehicle.vehicle_number);
        if sync == SyncState::PendingSync {
            label.push_str(" (pending sync)");
        }
        Self {
            id: vehicle.id.clone(),
            label,
            pending: sync == SyncState::PendingSync,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pending_vehicles_are_marked_in_their_label() {
        let vehicle = Vehicle {
            id: "v1".to_string(),
            name: "Tata Ace".to_string(),
            vehicle_number: "KN-9598".to_string(),
        };
        assert_eq!(VehicleOption::new(&vehicle, SyncState::Synced).label, "Tata Ace - KN-9598");

        let pending = VehicleOption::new(&vehicle, SyncState::PendingSync);
        assert_eq!(pending.label, "Tata Ace - KN-9598 (pending sync)");
        assert!(pending.pending);
    }

    #[test]
    fn null_name_or_number_decodes_as_empty() {
        let vehicles: Vec<Vehicle> = serde_json::from_value(serde_json::json!([
            {"_id": "v1", "name": "Tata Ace", "vehicleNumber": "KN-9598"},
            {"_id": "v2", "name": null, "vehicleNumber": null}
        ]))
        .unwrap();

        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[1].name, "");
        assert_eq!(vehicles[1].vehicle_number, "");
    }
}
