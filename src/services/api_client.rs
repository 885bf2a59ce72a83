// ============================================================================
// API CLIENT - HTTP only, stateless
// ============================================================================
// No business logic: builds URLs, sends typed bodies, checks the status line.
// Interpreting `responseStatus` codes is up to the calling service.
// ============================================================================

use std::rc::Rc;

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::ApiError;
use crate::models::{
    FetchBookingsRequest, FetchVaccinesRequest, PresignedUrlRequest, PresignedUrlResponse,
    ResponseEnvelope, SendOtpRequest, SendOtpResponse, VaccineCommand, VerifyOtpRequest,
};
use crate::services::http::{HttpResponse, Transport};
use crate::utils::constants::{
    FETCH_BOOKINGS_PATH, FETCH_VACCINES_PATH, MANAGE_VACCINE_PATH, PRESIGNED_URL_PATH,
    SEND_OTP_PATH, VERIFY_OTP_PATH,
};

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    transport: Rc<dyn Transport>,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, transport: Rc<dyn Transport>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            transport,
        }
    }

    /// Browser client against the configured backend.
    #[cfg(target_arch = "wasm32")]
    pub fn from_config() -> Self {
        use crate::services::http::GlooTransport;
        Self::new(crate::config::CONFIG.backend_url.clone(), Rc::new(GlooTransport))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn exchange<B: Serialize>(&self, path: &str, body: &B) -> Result<HttpResponse, ApiError> {
        let body = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        let url = self.url(path);
        log::debug!("📤 POST {}", path);
        let response = self.transport.post_json(&url, &body).await?;
        if !response.is_success() {
            log::warn!("⚠️ POST {} → HTTP {}", path, response.status);
        }
        response.error_for_status()
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        B: Serialize,
        T: DeserializeOwned,
    {
        self.exchange(path, body).await?.json()
    }

    /// Raw JSON body of any endpoint (used by the collection client).
    pub async fn post_value(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> Result<serde_json::Value, ApiError> {
        self.post(path, body).await
    }

    /// Request an OTP. The returned `clientID` correlates the later verification.
    pub async fn send_otp(&self, request: &SendOtpRequest) -> Result<SendOtpResponse, ApiError> {
        self.post(SEND_OTP_PATH, request).await
    }

    /// Any 2xx means the OTP was accepted; the body is not inspected.
    pub async fn verify_otp(&self, request: &VerifyOtpRequest) -> Result<(), ApiError> {
        self.exchange(VERIFY_OTP_PATH, request).await.map(|_| ())
    }

    pub async fn fetch_bookings_by_date(
        &self,
        request: &FetchBookingsRequest,
    ) -> Result<serde_json::Value, ApiError> {
        self.post(FETCH_BOOKINGS_PATH, request).await
    }

    pub async fn fetch_all_vaccines(
        &self,
        request: &FetchVaccinesRequest,
    ) -> Result<serde_json::Value, ApiError> {
        self.post(FETCH_VACCINES_PATH, request).await
    }

    /// ADD / UPDATE command. Success is decided by the caller from `responseStatus`.
    pub async fn manage_vaccine(
        &self,
        command: &VaccineCommand,
    ) -> Result<ResponseEnvelope, ApiError> {
        self.post(MANAGE_VACCINE_PATH, command).await
    }

    pub async fn get_presigned_url(
        &self,
        request: &PresignedUrlRequest,
    ) -> Result<PresignedUrlResponse, ApiError> {
        self.post(PRESIGNED_URL_PATH, request).await
    }

    /// PUT raw bytes to a presigned storage URL.
    pub async fn upload(
        &self,
        url: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<(), ApiError> {
        log::debug!("📤 PUT {} bytes ({})", bytes.len(), content_type);
        self.transport
            .put_bytes(url, content_type, bytes)
            .await?
            .error_for_status()
            .map(|_| ())
    }
}
