//! Courier (parcel delivery) REST API client
//!
//! Every call authenticates with `Api-Key` / `Secret-Key` headers. The raw
//! JSON response is handed back with the parsed value so the relay can store
//! it in `courier_logs`.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shared::models::CourierSettings;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CourierApiError {
    #[error("Courier request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Courier rejected the request ({status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        body: Value,
    },

    #[error("Unexpected courier response: {0}")]
    InvalidResponse(String),
}

impl CourierApiError {
    /// Response body worth logging, when the courier sent one
    pub fn body(&self) -> Option<&Value> {
        match self {
            CourierApiError::Rejected { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Resolved endpoint and credentials
#[derive(Clone)]
pub struct CourierCredentials {
    pub base_url: String,
    pub api_key: String,
    pub secret_key: String,
}

impl CourierCredentials {
    pub fn from_settings(settings: &CourierSettings, default_base_url: &str) -> Self {
        Self {
            base_url: settings
                .base_url
                .as_deref()
                .filter(|u| !u.is_empty())
                .unwrap_or(default_base_url)
                .trim_end_matches('/')
                .to_string(),
            api_key: settings.api_key.clone(),
            secret_key: settings.secret_key.clone(),
        }
    }
}

/// Parcel creation payload
#[derive(Debug, Clone, Serialize)]
pub struct ParcelRequest {
    /// Our order number, echoed back by the courier
    pub invoice: String,
    pub recipient_name: String,
    pub recipient_phone: String,
    pub recipient_address: String,
    /// Cash to collect on delivery
    pub cod_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Consignment {
    #[serde(default)]
    pub consignment_id: Value,
    pub tracking_code: Option<String>,
    pub status: Option<String>,
}

impl Consignment {
    /// Couriers send the id as a number or a string
    pub fn consignment_id(&self) -> Option<String> {
        match &self.consignment_id {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}

/// Send `req`, returning the JSON body when both the HTTP status and the
/// body's own `status` field indicate success
async fn execute(
    req: reqwest::RequestBuilder,
    creds: &CourierCredentials,
) -> Result<Value, CourierApiError> {
    let resp = req
        .header("Api-Key", &creds.api_key)
        .header("Secret-Key", &creds.secret_key)
        .header(http::header::ACCEPT, "application/json")
        .send()
        .await?;

    let status = resp.status();
    let body: Value = resp
        .json()
        .await
        .map_err(|e| CourierApiError::InvalidResponse(e.to_string()))?;

    let body_status = body.get("status").and_then(Value::as_u64).unwrap_or(200);
    if !status.is_success() || body_status != 200 {
        let message = body
            .get("message")
            .and_then(Value::as_str)
            .unwrap_or("no message")
            .to_string();
        return Err(CourierApiError::Rejected {
            status: if status.is_success() { body_status as u16 } else { status.as_u16() },
            message,
            body,
        });
    }
    Ok(body)
}

/// GET `/get_balance`
pub async fn get_balance(
    http: &reqwest::Client,
    creds: &CourierCredentials,
) -> Result<(Decimal, Value), CourierApiError> {
    let body = execute(http.get(format!("{}/get_balance", creds.base_url)), creds).await?;
    let balance = match body.get("current_balance") {
        Some(Value::Number(n)) => n.to_string().parse::<Decimal>().ok(),
        Some(Value::String(s)) => s.parse::<Decimal>().ok(),
        _ => None,
    }
    .ok_or_else(|| CourierApiError::InvalidResponse("missing current_balance".into()))?;
    Ok((balance, body))
}

/// POST `/create_order`
pub async fn create_order(
    http: &reqwest::Client,
    creds: &CourierCredentials,
    parcel: &ParcelRequest,
) -> Result<(Consignment, Value), CourierApiError> {
    let body = execute(
        http.post(format!("{}/create_order", creds.base_url)).json(parcel),
        creds,
    )
    .await?;
    let consignment: Consignment = body
        .get("consignment")
        .cloned()
        .ok_or_else(|| CourierApiError::InvalidResponse("missing consignment".into()))
        .and_then(|c| {
            serde_json::from_value(c).map_err(|e| CourierApiError::InvalidResponse(e.to_string()))
        })?;
    Ok((consignment, body))
}

/// GET `/status_by_cid/{consignment_id}`; the raw `delivery_status` may be absent
pub async fn status_by_consignment(
    http: &reqwest::Client,
    creds: &CourierCredentials,
    consignment_id: &str,
) -> Result<(Option<String>, Value), CourierApiError> {
    let body = execute(
        http.get(format!("{}/status_by_cid/{}", creds.base_url, consignment_id)),
        creds,
    )
    .await?;
    let delivery_status = body
        .get("delivery_status")
        .and_then(Value::as_str)
        .map(str::to_string);
    Ok((delivery_status, body))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(base_url: Option<&str>) -> CourierSettings {
        CourierSettings {
            api_key: "key".into(),
            secret_key: "secret".into(),
            base_url: base_url.map(str::to_string),
            is_enabled: true,
        }
    }

    #[test]
    fn test_settings_base_url_overrides_default() {
        let creds = CourierCredentials::from_settings(
            &settings(Some("https://courier.test/api/")),
            "https://default.test",
        );
        assert_eq!(creds.base_url, "https://courier.test/api");

        let creds = CourierCredentials::from_settings(&settings(Some("")), "https://default.test");
        assert_eq!(creds.base_url, "https://default.test");
    }

    #[test]
    fn test_consignment_id_number_or_string() {
        let c: Consignment = serde_json::from_value(serde_json::json!({
            "consignment_id": 1424107,
            "tracking_code": "15BAEB8A"
        }))
        .unwrap();
        assert_eq!(c.consignment_id().as_deref(), Some("1424107"));

        let c: Consignment =
            serde_json::from_value(serde_json::json!({"consignment_id": "CN-1"})).unwrap();
        assert_eq!(c.consignment_id().as_deref(), Some("CN-1"));
        assert!(c.tracking_code.is_none());
    }
}
