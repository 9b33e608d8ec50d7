//! Minimal request/response types for the serverless routes
//!
//! The hosting function hands over method, path, query and raw body; the
//! backend returns a status and a JSON body. No headers, no streaming.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use super::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
    #[serde(default)]
    pub body: Option<String>,
}

impl ApiRequest {
    pub fn new(method: &str, path: &str) -> Self {
        Self {
            method: method.to_ascii_uppercase(),
            path: path.to_string(),
            query: BTreeMap::new(),
            body: None,
        }
    }

    pub fn get(path: &str) -> Self {
        Self::new("GET", path)
    }

    pub fn post(path: &str, body: impl Into<String>) -> Self {
        Self::new("POST", path).with_body(body)
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Query parameter, with blank values treated as absent
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    /// Parse the JSON body
    pub fn json_body<T: DeserializeOwned>(&self) -> Result<T, ApiError> {
        let body = self
            .body
            .as_deref()
            .filter(|body| !body.trim().is_empty())
            .ok_or_else(|| ApiError::BadRequest("Request body is required".to_string()))?;
        serde_json::from_str(body).map_err(|e| {
            log::warn!("rejecting malformed JSON body: {}", e);
            ApiError::BadRequest("Invalid JSON body".to_string())
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Value,
}

impl ApiResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, body }
    }

    pub fn ok(body: Value) -> Self {
        Self::new(200, body)
    }

    pub fn created(body: Value) -> Self {
        Self::new(201, body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Deserialize)]
    struct Probe {
        name: Option<String>,
    }

    #[test]
    fn test_query_param_blank_is_absent() {
        let request = ApiRequest::get("/api/waitlist").with_query("email", "  ");
        assert_eq!(request.query_param("email"), None);
    }

    #[test]
    fn test_json_body_errors() {
        let missing = ApiRequest::new("post", "/x");
        assert_eq!(missing.method, "POST");
        assert!(matches!(missing.json_body::<Probe>(), Err(ApiError::BadRequest(_))));

        let malformed = ApiRequest::post("/x", "{oops");
        assert!(matches!(malformed.json_body::<Probe>(), Err(ApiError::BadRequest(_))));

        let ok = ApiRequest::post("/x", r#"{"name":"Ada"}"#);
        assert_eq!(ok.json_body::<Probe>().unwrap().name.as_deref(), Some("Ada"));
    }
}
