//! Client for the remote operations API.
//!
//! Every screen of the dashboard is a view over these calls. The client holds
//! no state besides the connection pool, so it is cheap to clone into handlers.

use reqwest::StatusCode;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::{
    config::Config,
    error::ApiError,
    models::{
        CreateShipment, Employee, LoginRequest, MachineAssignment, Order, OrdersEnvelope, Role,
        Shipment, StaffMember, Vehicle,
    },
};

#[derive(Debug, Deserialize)]
struct StaffEnvelope {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    data: Option<Vec<StaffMember>>,
}

#[derive(Debug, Default, Deserialize)]
struct Ack {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LoginResponse {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    employee: Option<Employee>,
    #[serde(default)]
    message: Option<String>,
}

/// How strictly a write endpoint's `success` flag is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AckPolicy {
    /// `success` must be present and true.
    RequireFlag,
    /// Any 2xx counts unless the body says `success: false`.
    StatusOnly,
}

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    assignment_url: String,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            http,
            base_url: config.api_base_url.clone(),
            assignment_url: config.assignment_api_url.clone(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ApiError> {
        log::debug!("GET {}", url);
        let resp = self.http.get(url).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Server {
                status: status.as_u16(),
                message: message_from_body(&body).unwrap_or_default(),
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| ApiError::Decode(format!("{}: {}", url, e)))
    }

    async fn post_ack<B: Serialize>(
        &self,
        url: &str,
        body: &B,
        policy: AckPolicy,
        fallback: &str,
    ) -> Result<String, ApiError> {
        log::debug!("POST {}", url);
        let resp = self.http.post(url).json(body).send().await?;
        let status = resp.status();
        let text = resp.text().await?;
        let ack: Ack = serde_json::from_str(&text).unwrap_or_default();

        check_ack(status, ack, policy, fallback)
    }

    /// `GET /api/get-staffs/{role}` on the assignment host.
    pub async fn staff_by_role(&self, role: &Role) -> Result<Vec<StaffMember>, ApiError> {
        let url = format!("{}/api/get-staffs/{}", self.assignment_url, role);
        let envelope: StaffEnvelope = self.get_json(&url).await?;
        match envelope.data {
            Some(staff) if envelope.success => Ok(staff),
            _ => Err(ApiError::Rejected(format!("Could not fetch {}s.", role))),
        }
    }

    pub async fn assign_machine(&self, assignment: &MachineAssignment) -> Result<String, ApiError> {
        let url = format!("{}/api/assign-machine", self.assignment_url);
        self.post_ack(&url, assignment, AckPolicy::RequireFlag, "Machine assigned successfully!")
            .await
    }

    pub async fn vehicles(&self) -> Result<Vec<Vehicle>, ApiError> {
        self.get_json(&format!("{}/vehicles/get", self.base_url)).await
    }

    /// Every staff member; callers split the list by role.
    pub async fn employees(&self) -> Result<Vec<StaffMember>, ApiError> {
        self.get_json(&format!("{}/staff/get-employees", self.base_url)).await
    }

    pub async fn orders(&self) -> Result<Vec<Order>, ApiError> {
        let envelope: OrdersEnvelope = self
            .get_json(&format!("{}/orders/get-orders", self.base_url))
            .await?;
        Ok(envelope.orders)
    }

    pub async fn create_shipment(&self, shipment: &CreateShipment) -> Result<String, ApiError> {
        let url = format!("{}/shipments/create", self.base_url);
        self.post_ack(&url, shipment, AckPolicy::StatusOnly, "Shipment created successfully!")
            .await
    }

    /// `POST /staff/login`. Any answer other than a 2xx with `success: true`
    /// and an employee record is a rejection.
    pub async fn login(&self, request: &LoginRequest) -> Result<Employee, ApiError> {
        let url = format!("{}/staff/login", self.base_url);
        let resp = self.http.post(&url).json(request).send().await?;
        let status = resp.status();
        let body: LoginResponse = resp
            .json()
            .await
            .map_err(|e| ApiError::Decode(format!("login response: {}", e)))?;

        match body.employee {
            Some(employee) if status.is_success() && body.success => Ok(employee),
            _ => Err(ApiError::Rejected(
                body.message
                    .filter(|m| !m.is_empty())
                    .unwrap_or_else(|| "Invalid credentials.".to_string()),
            )),
        }
    }

    pub async fn transfers(&self) -> Result<Vec<Shipment>, ApiError> {
        self.get_json(&format!("{}/transfers/all", self.base_url)).await
    }
}

fn check_ack(status: StatusCode, ack: Ack, policy: AckPolicy, fallback: &str) -> Result<String, ApiError> {
    let message = ack.message.filter(|m| !m.is_empty());

    if !status.is_success() {
        return Err(ApiError::Server {
            status: status.as_u16(),
            message: message.unwrap_or_else(|| "Submission failed".to_string()),
        });
    }

    let accepted = match policy {
        AckPolicy::RequireFlag => ack.success == Some(true),
        AckPolicy::StatusOnly => ack.success != Some(false),
    };
    if !accepted {
        return Err(ApiError::Rejected(
            message.unwrap_or_else(|| "Submission failed".to_string()),
        ));
    }

    Ok(message.unwrap_or_else(|| fallback.to_string()))
}

fn message_from_body(body: &str) -> Option<String> {
    serde_json::from_str::<Ack>(body).ok()?.message
}
