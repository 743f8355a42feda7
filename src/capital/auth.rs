//! Session header handling for the Capital.com API

use reqwest::header::HeaderMap;

use crate::common::errors::{ClientError, Result};
use crate::common::types::Session;

/// API key header sent when opening a session
pub const API_KEY_HEADER: &str = "X-CAP-API-KEY";
/// Client session token header
pub const CST_HEADER: &str = "CST";
/// Account security token header
pub const SECURITY_TOKEN_HEADER: &str = "X-SECURITY-TOKEN";

/// Extract session tokens from the `POST /session` response headers
pub fn session_from_headers(headers: &HeaderMap) -> Result<Session> {
    let cst = header_value(headers, CST_HEADER)?;
    let security_token = header_value(headers, SECURITY_TOKEN_HEADER)?;
    Ok(Session::new(cst, security_token))
}

fn header_value(headers: &HeaderMap, name: &str) -> Result<String> {
    let value = headers
        .get(name)
        .ok_or_else(|| ClientError::Authentication(format!("response is missing {} header", name)))?
        .to_str()
        .map_err(|e| ClientError::Authentication(format!("invalid {} header: {}", name, e)))?;

    if value.is_empty() {
        return Err(ClientError::Authentication(format!("empty {} header", name)));
    }
    Ok(value.to_string())
}

impl Session {
    /// Add session headers to a reqwest RequestBuilder
    pub fn apply_to_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request
            .header(CST_HEADER, &self.cst)
            .header(SECURITY_TOKEN_HEADER, &self.security_token)
    }
}
