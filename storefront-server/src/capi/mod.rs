//! Conversions API integration via the Graph REST API (no SDK dependency)
//!
//! Personally identifying fields are normalized and SHA-256 hashed before
//! they leave the server.

use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use shared::client::{CapiEventRequest, CapiUserData};

use crate::config::CapiConfig;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

fn sha256_hex(value: &str) -> String {
    hex::encode(Sha256::digest(value.as_bytes()))
}

/// Hash an email or external id: trimmed, lower-cased. `None` when blank.
pub fn hash_identifier(value: &str) -> Option<String> {
    let normalized = value.trim().to_lowercase();
    (!normalized.is_empty()).then(|| sha256_hex(&normalized))
}

/// Hash a phone number over its digits only. `None` when it has no digits.
pub fn hash_phone(value: &str) -> Option<String> {
    let digits = shared::util::normalize_phone(value);
    (!digits.is_empty()).then(|| sha256_hex(&digits))
}

/// Graph API `user_data` object with hashed identifiers
pub fn hashed_user_data(user: &CapiUserData) -> Value {
    let mut data = serde_json::Map::new();
    let mut put_hashed = |key: &str, hashed: Option<String>| {
        if let Some(h) = hashed {
            data.insert(key.to_string(), json!([h]));
        }
    };
    put_hashed("em", user.email.as_deref().and_then(hash_identifier));
    put_hashed("ph", user.phone.as_deref().and_then(hash_phone));
    put_hashed(
        "external_id",
        user.external_id.as_deref().and_then(hash_identifier),
    );

    let passthrough = [
        ("client_ip_address", &user.client_ip_address),
        ("client_user_agent", &user.client_user_agent),
        ("fbp", &user.fbp),
        ("fbc", &user.fbc),
    ];
    for (key, value) in passthrough {
        if let Some(v) = value.as_deref().filter(|v| !v.is_empty()) {
            data.insert(key.to_string(), json!(v));
        }
    }
    Value::Object(data)
}

/// Build the events request body for a single website event
pub fn build_payload(
    req: &CapiEventRequest,
    event_time: i64,
    test_event_code: Option<&str>,
) -> Value {
    let mut event = json!({
        "event_name": req.event_name,
        "event_time": event_time,
        "action_source": "website",
        "user_data": hashed_user_data(&req.user_data),
    });
    if let Some(id) = &req.event_id {
        event["event_id"] = json!(id);
    }
    if let Some(url) = &req.event_source_url {
        event["event_source_url"] = json!(url);
    }
    if let Some(custom) = &req.custom_data {
        event["custom_data"] = custom.clone();
    }

    let mut payload = json!({ "data": [event] });
    if req.test_mode
        && let Some(code) = test_event_code
    {
        payload["test_event_code"] = json!(code);
    }
    payload
}

/// POST `{graph_base}/{version}/{pixel_id}/events`
///
/// The access token travels in the JSON body and errors carry no URL, so
/// nothing returned from here can leak it into logs.
pub async fn send_events(
    http: &reqwest::Client,
    config: &CapiConfig,
    payload: &Value,
) -> Result<Value, BoxError> {
    let (Some(pixel_id), Some(access_token)) = (&config.pixel_id, &config.access_token) else {
        return Err("Conversions API is not configured".into());
    };

    let url = format!(
        "{}/{}/{}/events",
        config.graph_base_url.trim_end_matches('/'),
        config.api_version,
        pixel_id
    );
    let mut body = payload.clone();
    body["access_token"] = json!(access_token);

    let resp = http
        .post(&url)
        .json(&body)
        .send()
        .await
        .map_err(reqwest::Error::without_url)?;

    let status = resp.status();
    let body: Value = resp.json().await.unwrap_or(Value::Null);
    if !status.is_success() {
        return Err(format!("Graph API returned {status}: {body}").into());
    }
    Ok(body)
}
