pub mod assignment;
pub mod employee;
pub mod order;
pub mod shipment;
pub mod vehicle;

use serde::{Deserialize, Deserializer};

pub use assignment::{FormBranch, MachineAssignment, Shift};
pub use employee::{Employee, EmployeeDisplay, LoginRequest, Role, StaffMember};
pub use order::{Order, OrderOption, OrdersEnvelope};
pub use shipment::{CreateShipment, Shipment, ShipmentStatus, StatusEntry, StatusStyle};
pub use vehicle::{SyncState, Vehicle, VehicleOption};

/// Treat an explicit `null` like a missing key. The API sends both.
pub(crate) fn null_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
