//! Vehicles added from the shipment form.
//!
//! The API has no endpoint to create a vehicle, so these live here, tagged
//! pending sync, until the backend learns about them. They are kept per
//! owner and merged after the server's list.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use uuid::Uuid;

use crate::{
    error::ValidationError,
    models::{SyncState, Vehicle, VehicleOption},
};

#[derive(Clone, Default)]
pub struct VehicleCache {
    pending: Arc<Mutex<HashMap<String, Vec<Vehicle>>>>,
}

impl VehicleCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, Vec<Vehicle>>> {
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn add(&self, owner: &str, name: &str, vehicle_number: &str) -> Result<Vehicle, ValidationError> {
        let name = name.trim();
        let vehicle_number = vehicle_number.trim();
        if name.is_empty() || vehicle_number.is_empty() {
            return Err(ValidationError::new("All fields are required!"));
        }

        let vehicle = Vehicle {
            id: format!("v{}", Uuid::new_v4().simple()),
            name: name.to_string(),
            vehicle_number: vehicle_number.to_string(),
        };
        self.lock()
            .entry(owner.to_string())
            .or_default()
            .push(vehicle.clone());
        log::info!("vehicle {} ({}) added locally, pending sync", vehicle.name, vehicle.id);

        Ok(vehicle)
    }

    pub fn pending(&self, owner: &str) -> Vec<Vehicle> {
        self.lock().get(owner).cloned().unwrap_or_default()
    }

    /// Server vehicles first, then this owner's pending ones.
    pub fn options(&self, owner: &str, remote: &[Vehicle]) -> Vec<VehicleOption> {
        remote
            .iter()
            .map(|v| VehicleOption::new(v, SyncState::Synced))
            .chain(
                self.pending(owner)
                    .iter()
                    .map(|v| VehicleOption::new(v, SyncState::PendingSync)),
            )
            .collect()
    }

    /// Look a selected id up among the server's and this owner's vehicles.
    pub fn resolve(&self, owner: &str, remote: &[Vehicle], id: &str) -> Option<(Vehicle, SyncState)> {
        if let Some(v) = remote.iter().find(|v| v.id == id) {
            return Some((v.clone(), SyncState::Synced));
        }
        self.pending(owner)
            .into_iter()
            .find(|v| v.id == id)
            .map(|v| (v, SyncState::PendingSync))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn remote() -> Vec<Vehicle> {
        vec![Vehicle {
            id: "r1".to_string(),
            name: "Eicher".to_string(),
            vehicle_number: "MH-12".to_string(),
        }]
    }

    #[test]
    fn both_fields_are_required() {
        let cache = VehicleCache::new();
        assert!(cache.add("m1", "Tata Ace", "  ").is_err());
        assert!(cache.add("m1", "", "KN-9598").is_err());
        assert!(cache.pending("m1").is_empty());
    }

    #[test]
    fn pending_vehicles_follow_remote_ones() {
        let cache = VehicleCache::new();
        let added = cache.add("m1", "Tata Ace", "KN-9598").unwrap();
        assert!(added.id.starts_with('v'));

        let options = cache.options("m1", &remote());
        assert_eq!(options.len(), 2);
        assert_eq!(options[0].id, "r1");
        assert!(!options[0].pending);
        assert_eq!(options[1].id, added.id);
        assert!(options[1].pending);

        // another manager does not see them
        assert_eq!(cache.options("m2", &remote()).len(), 1);
    }

    #[test]
    fn resolves_remote_and_pending_ids() {
        let cache = VehicleCache::new();
        let added = cache.add("m1", "Tata Ace", "KN-9598").unwrap();

        let (vehicle, sync) = cache.resolve("m1", &remote(), "r1").unwrap();
        assert_eq!(vehicle.name, "Eicher");
        assert_eq!(sync, SyncState::Synced);

        let (vehicle, sync) = cache.resolve("m1", &remote(), &added.id).unwrap();
        assert_eq!(vehicle.vehicle_number, "KN-9598");
        assert_eq!(sync, SyncState::PendingSync);

        assert!(cache.resolve("m1", &remote(), "nope").is_none());
    }
}
