use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ShipmentStatus {
    Loading,
    OutForDelivery,
    Completed,
    /// A value the dashboard has no style for, kept verbatim.
    Unrecognized(String),
    #[default]
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusStyle {
    pub label: &'static str,
    pub color: &'static str,
}

pub const UNKNOWN_STYLE: StatusStyle = StatusStyle { label: "Unknown", color: "#6c757d" };

impl ShipmentStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "LOADING" => ShipmentStatus::Loading,
            "OUT_FOR_DELIVERY" => ShipmentStatus::OutForDelivery,
            "COMPLETED" => ShipmentStatus::Completed,
            "" => ShipmentStatus::Missing,
            other => ShipmentStatus::Unrecognized(other.to_string()),
        }
    }

    pub fn raw(&self) -> &str {
        match self {
            ShipmentStatus::Loading => "LOADING",
            ShipmentStatus::OutForDelivery => "OUT_FOR_DELIVERY",
            ShipmentStatus::Completed => "COMPLETED",
            ShipmentStatus::Unrecognized(raw) => raw,
            ShipmentStatus::Missing => "",
        }
    }

    pub fn style(&self) -> StatusStyle {
        match self {
            ShipmentStatus::Loading => StatusStyle { label: "Loading", color: "#ffc107" },
            ShipmentStatus::Completed => StatusStyle { label: "Completed", color: "#198754" },
            ShipmentStatus::OutForDelivery => StatusStyle { label: "Out for Delivery", color: "#0dcaf0" },
            ShipmentStatus::Unrecognized(_) | ShipmentStatus::Missing => UNKNOWN_STYLE,
        }
    }
}

impl From<String> for ShipmentStatus {
    fn from(raw: String) -> Self {
        ShipmentStatus::parse(&raw)
    }
}

impl From<ShipmentStatus> for String {
    fn from(status: ShipmentStatus) -> Self {
        status.raw().to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusEntry {
    #[serde(default, deserialize_with = "super::null_default")]
    pub status: ShipmentStatus,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRef {
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "super::null_default")]
    pub images: Vec<ImageRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HelperRef {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub eid: Option<String>,
}

/// A transfer record from `GET /transfers/all`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shipment {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub product_id: Option<ProductRef>,
    #[serde(default)]
    pub vehicle_number: Option<String>,
    #[serde(default)]
    pub driver_name: Option<String>,
    #[serde(default)]
    pub staff_employee_id: Option<HelperRef>,
    #[serde(default)]
    pub start_point: Option<String>,
    #[serde(default)]
    pub end_point: Option<String>,
    #[serde(default, deserialize_with = "super::null_default")]
    pub status: ShipmentStatus,
    #[serde(default)]
    pub number_of_boxes: Option<u32>,
    #[serde(default)]
    pub loading_timestamp: Option<String>,
    #[serde(default)]
    pub unloading_timestamp: Option<String>,
    #[serde(default, deserialize_with = "super::null_default")]
    pub damaged_box_count: u32,
    #[serde(default, deserialize_with = "super::null_default")]
    pub damaged_box_ids: Vec<String>,
    #[serde(default, deserialize_with = "super::null_default")]
    pub status_history: Vec<StatusEntry>,
}

impl Shipment {
    /// The first history entry is authoritative; the top-level field only
    /// fills in when the history is empty.
    pub fn current_status(&self) -> &ShipmentStatus {
        self.status_history
            .first()
            .map(|entry| &entry.status)
            .unwrap_or(&self.status)
    }

    pub fn latest_timestamp(&self) -> Option<&str> {
        self.status_history.first().and_then(|entry| entry.timestamp.as_deref())
    }
}

/// Body of `POST /shipments/create`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateShipment {
    pub vehicle: String,
    pub vehicle_number: String,
    pub driver_id: String,
    pub helper_id: String,
    pub order_id: String,
    pub quantity: f64,
    pub start_point: String,
    pub end_point: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_use_their_table_entry() {
        let table = [
            ("LOADING", "Loading", "#ffc107"),
            ("COMPLETED", "Completed", "#198754"),
            ("OUT_FOR_DELIVERY", "Out for Delivery", "#0dcaf0"),
        ];
        for (raw, label, color) in table {
            let style = ShipmentStatus::parse(raw).style();
            assert_eq!(style.label, label, "label for {}", raw);
            assert_eq!(style.color, color, "color for {}", raw);
        }
    }

    #[test]
    fn unknown_statuses_keep_their_raw_value() {
        for raw in ["IN_TRANSIT", "loading", "RETURNED", ""] {
            let status = ShipmentStatus::parse(raw);
            assert_eq!(status.style(), UNKNOWN_STYLE);
            assert_eq!(status.raw(), raw);
        }
    }

    #[test]
    fn history_head_is_the_current_status() {
        let shipment: Shipment = serde_json::from_value(serde_json::json!({
            "_id": "t1",
            "status": "LOADING",
            "statusHistory": [
                {"status": "COMPLETED", "timestamp": "2024-01-03T10:00:00Z"},
                {"status": "LOADING", "timestamp": "2024-01-01T08:00:00Z"}
            ]
        }))
        .unwrap();

        assert_eq!(shipment.current_status(), &ShipmentStatus::Completed);
        assert_eq!(shipment.latest_timestamp(), Some("2024-01-03T10:00:00Z"));
    }

    #[test]
    fn create_payload_uses_camel_case_keys() {
        let body = serde_json::to_value(CreateShipment {
            vehicle: "Tata Ace".to_string(),
            vehicle_number: "KN-9598".to_string(),
            driver_id: "d1".to_string(),
            helper_id: "h1".to_string(),
            order_id: "o1".to_string(),
            quantity: 50.0,
            start_point: "Warehouse A".to_string(),
            end_point: "Site B".to_string(),
        })
        .unwrap();

        assert_eq!(body["vehicleNumber"], "KN-9598");
        assert_eq!(body["quantity"], 50.0);
        assert_eq!(body["startPoint"], "Warehouse A");
    }

    #[test]
    fn null_fields_do_not_sink_the_list() {
        let list: Vec<Shipment> = serde_json::from_value(serde_json::json!([
            {"_id": "t1", "damagedBoxCount": 2, "statusHistory": [{"status": "LOADING"}]},
            {
                "_id": "t2",
                "status": null,
                "damagedBoxCount": null,
                "damagedBoxIds": null,
                "productId": {"name": "Tile Mix A", "images": null},
                "statusHistory": [{"status": null, "timestamp": null}]
            }
        ]))
        .unwrap();

        assert_eq!(list.len(), 2);
        assert_eq!(list[1].damaged_box_count, 0);
        assert!(list[1].damaged_box_ids.is_empty());
        assert_eq!(list[1].current_status(), &ShipmentStatus::Missing);
    }
}
