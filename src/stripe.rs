//! Outbound Stripe client used by the proxy route

use axum::body::Body;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use reqwest::StatusCode;

use crate::error::Result;

/// Shared client for the Stripe products endpoint.
///
/// WebhookDB is focused on querying, not mutations: creating a product
/// still goes through the Stripe API itself, so this client relays the
/// caller's request with the server-held credential attached.
#[derive(Clone)]
pub struct StripeClient {
    http: reqwest::Client,
    api_key: String,
    products_url: String,
}

/// What came back from the upstream call, relayed verbatim to the caller.
pub struct UpstreamResponse {
    pub status: StatusCode,
    pub content_type: Option<HeaderValue>,
    pub body: bytes::Bytes,
}

impl StripeClient {
    pub fn new(api_key: impl Into<String>, api_base: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            products_url: format!("{}/v1/products", api_base.trim_end_matches('/')),
        }
    }

    /// POST the inbound body through to the products endpoint.
    ///
    /// The body is streamed rather than buffered. The credential goes out
    /// as a Basic-Auth header with an empty password, i.e.
    /// `base64(<api_key>:)`, which is how Stripe expects single-token keys.
    pub async fn create_product(
        &self,
        content_type: Option<&HeaderValue>,
        body: Body,
    ) -> Result<UpstreamResponse> {
        let mut req = self
            .http
            .post(&self.products_url)
            .basic_auth(&self.api_key, Some(""))
            .body(reqwest::Body::wrap_stream(body.into_data_stream()));

        if let Some(ct) = content_type {
            req = req.header(CONTENT_TYPE, ct.clone());
        }

        let resp = req.send().await?;
        let status = resp.status();
        let content_type = resp.headers().get(CONTENT_TYPE).cloned();
        let body = resp.bytes().await?;

        Ok(UpstreamResponse {
            status,
            content_type,
            body,
        })
    }
}
