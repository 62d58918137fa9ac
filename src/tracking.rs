//! Shipment status tracker: ordering and display of transfer records.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use crate::models::{Shipment, ShipmentStatus, StatusEntry};

/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS[.fff]` and plain dates.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(ts) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(ts.and_utc());
        }
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|ts| ts.and_utc())
}

fn latest_update(shipment: &Shipment) -> Option<DateTime<Utc>> {
    shipment.latest_timestamp().and_then(parse_timestamp)
}

/// Most recent status update first. Records without a usable timestamp go
/// last; ties keep server order.
pub fn sort_by_latest(shipments: &mut [Shipment]) {
    shipments.sort_by(|a, b| match (latest_update(a), latest_update(b)) {
        (Some(a), Some(b)) => b.cmp(&a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
}

fn format_timestamp(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    Some(match parse_timestamp(raw) {
        Some(ts) => ts.format("%d %b %Y, %H:%M").to_string(),
        None => raw.to_string(),
    })
}

#[derive(Debug, Clone)]
pub struct StatusBadge {
    pub label: String,
    pub color: String,
    /// Raw server value, shown as a tooltip for unrecognized statuses.
    pub raw: String,
    pub recognized: bool,
}

impl From<&ShipmentStatus> for StatusBadge {
    fn from(status: &ShipmentStatus) -> Self {
        let style = status.style();
        Self {
            label: style.label.to_string(),
            color: style.color.to_string(),
            raw: status.raw().to_string(),
            recognized: !matches!(status, ShipmentStatus::Unrecognized(_) | ShipmentStatus::Missing),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HistoryItem {
    pub badge: StatusBadge,
    pub time: String,
}

impl From<&StatusEntry> for HistoryItem {
    fn from(entry: &StatusEntry) -> Self {
        Self {
            badge: StatusBadge::from(&entry.status),
            time: format_timestamp(entry.timestamp.as_deref()).unwrap_or_else(|| "-".to_string()),
        }
    }
}

const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/150";

// Template-friendly card for one shipment
#[derive(Debug, Clone)]
pub struct ShipmentCard {
    pub id: String,
    pub product_name: String,
    pub image_url: String,
    pub route: String,
    pub status: StatusBadge,
    pub vehicle_number: String,
    pub driver_name: String,
    pub boxes: String,
    pub loading_time: String,
    pub unloading_time: String,
    pub damaged: String,
    pub helper_name: String,
    pub helper_role: String,
    pub helper_eid: String,
    pub history: Vec<HistoryItem>,
}

impl From<&Shipment> for ShipmentCard {
    fn from(shipment: &Shipment) -> Self {
        let product = shipment.product_id.as_ref();
        let helper = shipment.staff_employee_id.as_ref();

        let damaged = if shipment.damaged_box_count > 0 {
            format!("{} ({})", shipment.damaged_box_count, shipment.damaged_box_ids.join(", "))
        } else {
            "None reported".to_string()
        };

        Self {
            id: shipment.id.clone(),
            product_name: product.and_then(|p| p.name.clone()).unwrap_or_default(),
            image_url: product
                .and_then(|p| p.images.first())
                .and_then(|img| img.url.clone())
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            route: format!(
                "{} → {}",
                shipment.start_point.as_deref().unwrap_or_default(),
                shipment.end_point.as_deref().unwrap_or_default()
            ),
            status: StatusBadge::from(shipment.current_status()),
            vehicle_number: shipment.vehicle_number.clone().unwrap_or_default(),
            driver_name: shipment.driver_name.clone().unwrap_or_default(),
            boxes: shipment.number_of_boxes.map(|n| n.to_string()).unwrap_or_default(),
            loading_time: format_timestamp(shipment.loading_timestamp.as_deref()).unwrap_or_default(),
            unloading_time: format_timestamp(shipment.unloading_timestamp.as_deref())
                .unwrap_or_else(|| "In Transit".to_string()),
            damaged,
            helper_name: helper.and_then(|h| h.name.clone()).unwrap_or_default(),
            helper_role: helper.and_then(|h| h.role.clone()).unwrap_or_default(),
            helper_eid: helper.and_then(|h| h.eid.clone()).unwrap_or_default(),
            history: shipment.status_history.iter().map(HistoryItem::from).collect(),
        }
    }
}

/// Turn the raw transfer list into display cards, newest first. Records
/// without any status history are not rendered.
pub fn build_cards(mut shipments: Vec<Shipment>) -> Vec<ShipmentCard> {
    shipments.retain(|s| {
        let keep = !s.status_history.is_empty();
        if !keep {
            log::warn!("dropping shipment {} with empty status history", s.id);
        }
        keep
    });
    sort_by_latest(&mut shipments);
    shipments.iter().map(ShipmentCard::from).collect()
}
