//! Emoji combination handlers
//!
//! `/{left}/{right}` proxies the composited image for a pair and
//! `/{left}` lists every pair an emoji takes part in. Bad input and lookup
//! misses are both a plain 404.

use axum::{
    body::Body,
    extract::{Path, State, rejection::PathRejection},
    http::{HeaderName, header},
    response::{Html, IntoResponse, Response},
};
use tracing::{debug, info};

use super::not_found_response;
use crate::{
    errors::{AppError, AppResult},
    web::AppState,
};

/// Headers that describe a single connection rather than the payload
static HOP_BY_HOP_HEADERS: [HeaderName; 7] = [
    header::CONNECTION,
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
];

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP_HEADERS.contains(name) || name.as_str() == "keep-alive"
}

/// Proxy the composited image for a pair
pub async fn combination_image(
    State(state): State<AppState>,
    params: Result<Path<(String, String)>, PathRejection>,
) -> AppResult<Response> {
    let dataset = state.dataset_cache.get_dataset().await?;

    let Ok(Path((left, right))) = params else {
        debug!("Rejected undecodable pair path");
        return Ok(not_found_response());
    };

    let Some(url) = state.resolver.resolve_pair_url(&dataset, &left, &right) else {
        debug!("No combination for {} + {}", left, right);
        return Ok(not_found_response());
    };

    info!("Proxying combination image: {}", url);
    let upstream = state.http_client.get(&url).await?;
    passthrough(upstream)
}

/// HTML list of the combinations available for one emoji
pub async fn combination_index(
    State(state): State<AppState>,
    param: Result<Path<String>, PathRejection>,
) -> AppResult<Response> {
    let dataset = state.dataset_cache.get_dataset().await?;

    let Ok(Path(emoji)) = param else {
        debug!("Rejected undecodable emoji path");
        return Ok(not_found_response());
    };

    match state.resolver.resolve_index(&dataset, &emoji) {
        Some(html) => Ok(Html(html).into_response()),
        None => {
            debug!("No combinations listed for {}", emoji);
            Ok(not_found_response())
        }
    }
}

/// Relay upstream status, headers and streamed body unchanged
fn passthrough(upstream: reqwest::Response) -> AppResult<Response> {
    let mut builder = Response::builder().status(upstream.status());

    if let Some(headers) = builder.headers_mut() {
        for (name, value) in upstream.headers() {
            if !is_hop_by_hop(name) {
                headers.append(name.clone(), value.clone());
            }
        }
    }

    builder
        .body(Body::from_stream(upstream.bytes_stream()))
        .map_err(|e| AppError::internal(format!("Failed to build proxied response: {e}")))
}
