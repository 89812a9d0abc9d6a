//! API handlers

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::error::Error;

/// Plaintext 500 wrapper shared by every handler.
///
/// The body format is part of the route contract: `Error: <message>`.
pub struct ApiError(Error);

impl<E: Into<Error>> From<E> for ApiError {
    fn from(err: E) -> Self {
        ApiError(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self.0, "request failed");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            format!("Error: {}", self.0),
        )
            .into_response()
    }
}

/// Health check with database reachability
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>, ApiError> {
    state.store.ping().await?;

    Ok(Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    }))
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Proxy a product-creation request to Stripe.
///
/// The caller's body and `Content-Type` pass through untouched; the
/// response is whatever Stripe returned, status included.
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Body,
) -> Result<Response, ApiError> {
    let content_type = headers.get(header::CONTENT_TYPE);

    let upstream = state.stripe.create_product(content_type, body).await?;

    let mut response = (upstream.status, upstream.body).into_response();
    if let Some(ct) = upstream.content_type {
        response.headers_mut().insert(header::CONTENT_TYPE, ct);
    }
    Ok(response)
}

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    /// Absent is treated as the empty string, which matches everything.
    #[serde(default)]
    pub q: String,
}

/// Search the replicated products by description.
///
/// Matches come back as newline-delimited JSON, one payload per line.
pub async fn search(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Response, ApiError> {
    let lines = state.store.search(&params.q).await?;

    Ok(([(header::CONTENT_TYPE, "application/x-ndjson")], lines).into_response())
}
