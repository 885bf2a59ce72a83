// ============================================================================
// HTTP TRANSPORT - Raw request/response exchange, nothing else
// ============================================================================
// The browser adapter sits on gloo-net. Tests script a fake implementation.
// ============================================================================

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Status and body of a completed exchange. Non-2xx is still `Ok` here.
#[derive(Clone, Debug, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        serde_json::from_str(&self.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Turns a non-2xx response into `ApiError::Http`.
    pub fn error_for_status(self) -> Result<Self, ApiError> {
        if self.is_success() {
            Ok(self)
        } else {
            Err(ApiError::Http {
                status: self.status,
                body: self.body,
            })
        }
    }
}

#[async_trait(?Send)]
pub trait Transport {
    async fn post_json(
        &self,
        url: &str,
        body: &serde_json::Value,
    ) -> Result<HttpResponse, ApiError>;

    async fn put_bytes(
        &self,
        url: &str,
        content_type: &str,
        bytes: &[u8],
    ) -> Result<HttpResponse, ApiError>;
}

#[cfg(target_arch = "wasm32")]
pub use browser::GlooTransport;

#[cfg(target_arch = "wasm32")]
mod browser {
    use super::*;
    use gloo_net::http::{Request, Response};

    /// `fetch` based transport.
    #[derive(Clone, Copy, Default)]
    pub struct GlooTransport;

    async fn read(response: Response) -> Result<HttpResponse, ApiError> {
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ApiError::Decode(e.to_string()))?;
        Ok(HttpResponse { status, body })
    }

    #[async_trait(?Send)]
    impl Transport for GlooTransport {
        async fn post_json(
            &self,
            url: &str,
            body: &serde_json::Value,
        ) -> Result<HttpResponse, ApiError> {
            let response = Request::post(url)
                .json(body)
                .map_err(|e| ApiError::Encode(e.to_string()))?
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            read(response).await
        }

        async fn put_bytes(
            &self,
            url: &str,
            content_type: &str,
            bytes: &[u8],
        ) -> Result<HttpResponse, ApiError> {
            let response = Request::put(url)
                .header("Content-Type", content_type)
                .body(js_sys::Uint8Array::from(bytes))
                .map_err(|e| ApiError::Encode(e.to_string()))?
                .send()
                .await
                .map_err(|e| ApiError::Network(e.to_string()))?;
            read(response).await
        }
    }
}
