use serde::{Deserialize, Deserializer, Serialize};

use crate::utils::constants::SUCCESS_CODE;

/// `responseStatus` block returned by most endpoints.
#[derive(Clone, PartialEq, Serialize, Deserialize, Debug, Default)]
pub struct ResponseStatus {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub code: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

impl ResponseStatus {
    pub fn is_success(&self) -> bool {
        self.code == Some(SUCCESS_CODE)
    }
}

/// Minimal envelope used to read `responseStatus` out of any body.
#[derive(Clone, PartialEq, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    #[serde(default)]
    pub response_status: Option<ResponseStatus>,
}

#[derive(Clone, PartialEq, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct SendOtpRequest {
    pub mobile_no: String,
    #[serde(rename = "deviceID")]
    pub device_id: String,
}

#[derive(Clone, PartialEq, Deserialize, Debug)]
pub struct SendOtpResponse {
    #[serde(rename = "clientID")]
    pub client_id: String,
}

#[derive(Clone, PartialEq, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOtpRequest {
    pub mobile_no: String,
    pub otp: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
}

#[derive(Clone, PartialEq, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FetchBookingsRequest {
    pub date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "consultantID", skip_serializing_if = "Option::is_none")]
    pub consultant_id: Option<String>,
    pub pharmacy_no: String,
}

#[derive(Clone, PartialEq, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct FetchVaccinesRequest {
    pub pharmacy_no: String,
}

#[derive(Clone, PartialEq, Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlRequest {
    #[serde(rename = "type")]
    pub object_type: String,
    pub mime_type: String,
    pub key: String,
}

#[derive(Clone, PartialEq, Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct PresignedUrlStatus {
    #[serde(default, deserialize_with = "lenient_i64")]
    pub response_code: Option<i64>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub message: Option<String>,
}

#[derive(Clone, PartialEq, Deserialize, Debug, Default)]
pub struct PresignedUrlResponse {
    #[serde(default)]
    pub response: Option<PresignedUrlStatus>,
    #[serde(default)]
    pub url: Option<String>,
}

impl PresignedUrlResponse {
    pub fn is_success(&self) -> bool {
        self.response
            .as_ref()
            .map(|r| r.response_code == Some(SUCCESS_CODE))
            .unwrap_or(false)
    }
}

// ----------------------------------------------------------------------------
// Lenient field readers: the service mixes strings, numbers and nulls.
// ----------------------------------------------------------------------------

/// Accepts a string, number or boolean; `null`/objects/arrays become `None`.
pub fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| value_as_string(&v)))
}

/// Accepts an integer or a numeric string.
pub fn lenient_i64<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

pub(crate) fn value_as_string(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
