use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderProduct {
    #[serde(rename = "productName", default)]
    pub product_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(rename = "orderId", default)]
    pub order_id: Option<String>,
    #[serde(default, deserialize_with = "super::null_default")]
    pub products: Vec<OrderProduct>,
}

impl Order {
    /// First product name, or `Order <orderId>` when the order has none.
    pub fn display_label(&self) -> String {
        self.products
            .first()
            .and_then(|p| p.product_name.clone())
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| format!("Order {}", self.order_id.as_deref().unwrap_or(&self.id)))
    }
}

/// Response of `GET /orders/get-orders`. Only the wrapped form is accepted.
#[derive(Debug, Deserialize)]
pub struct OrdersEnvelope {
    #[serde(default, deserialize_with = "super::null_default")]
    pub orders: Vec<Order>,
}

#[derive(Debug, Clone)]
pub struct OrderOption {
    pub id: String,
    pub label: String,
}

impl From<&Order> for OrderOption {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id.clone(),
            label: order.display_label(),
        }
    }
}
