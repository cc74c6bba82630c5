//! Turns an inbound HTTP request into a [`NewCapturedRequest`]

use std::net::SocketAddr;

use axum::{
    body::{to_bytes, Body},
    extract::{ConnectInfo, Request},
    http::{header, request::Parts, HeaderMap, Method},
};
use hookbin_db::{NewCapturedRequest, Uid};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Request body too large or unreadable: {0}")]
    Body(#[source] axum::Error),

    #[error("Failed to encode headers: {0}")]
    Headers(#[from] serde_json::Error),
}

/// Capture everything about `request` that the store keeps
///
/// GET and HEAD requests are recorded without a body. Other bodies are read up
/// to `max_body_bytes`; JSON bodies are re-encoded compactly when they parse.
pub async fn capture_request(
    request: Request,
    uid: Option<Uid>,
    max_body_bytes: usize,
) -> Result<NewCapturedRequest, CaptureError> {
    let (parts, body) = request.into_parts();

    let headers: Vec<(String, String)> = parts
        .headers
        .iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect();

    let body = if parts.method == Method::GET || parts.method == Method::HEAD {
        None
    } else {
        Some(read_body(&parts.headers, body, max_body_bytes).await?)
    };

    Ok(NewCapturedRequest {
        uid,
        method: parts.method.as_str().to_string(),
        url: request_url(&parts),
        headers: serde_json::to_string(&headers)?,
        body,
        query: parts.uri.query().map(str::to_string),
        ip: client_ip(&parts),
    })
}

async fn read_body(
    headers: &HeaderMap,
    body: Body,
    max_body_bytes: usize,
) -> Result<String, CaptureError> {
    let bytes = to_bytes(body, max_body_bytes)
        .await
        .map_err(CaptureError::Body)?;

    let is_json = header_str(headers, header::CONTENT_TYPE.as_str())
        .is_some_and(|ct| ct.contains("application/json"));

    if is_json {
        if let Ok(value) = serde_json::from_slice::<serde_json::Value>(&bytes) {
            return Ok(value.to_string());
        }
    }

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Reconstruct the URL the client used
fn request_url(parts: &Parts) -> String {
    if parts.uri.scheme().is_some() && parts.uri.authority().is_some() {
        return parts.uri.to_string();
    }

    let scheme = header_str(&parts.headers, "x-forwarded-proto")
        .and_then(|p| p.split(',').next())
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or("http");

    let host = header_str(&parts.headers, header::HOST.as_str())
        .or_else(|| parts.uri.authority().map(|a| a.as_str()))
        .unwrap_or("localhost");

    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    format!("{}://{}{}", scheme, host, path_and_query)
}

/// Client address: proxy headers first, then the socket peer
fn client_ip(parts: &Parts) -> Option<String> {
    let forwarded = header_str(&parts.headers, "x-forwarded-for")
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = forwarded {
        return Some(ip.to_string());
    }

    let real_ip = header_str(&parts.headers, "x-real-ip")
        .map(str::trim)
        .filter(|v| !v.is_empty());
    if let Some(ip) = real_ip {
        return Some(ip.to_string());
    }

    parts
        .extensions
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}
