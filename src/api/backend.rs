//! Site backend exported to the serverless host
//!
//! The host function calls `initSiteBackend` once, registers its mail
//! provider with `setMailTransport`, then forwards each request to
//! `handleApiRequest`.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, TryLockError};

use lazy_static::lazy_static;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::api::helpers::{deserialize_optional, describe_js, js_error, serialize};
use crate::config::SiteConfig;
use crate::server::{ApiRequest, ApiResponse, MailError, Mailer, MemoryDocumentStore, OutgoingEmail, SiteBackend};

// WASM-owned backend, one per function instance
lazy_static! {
    static ref BACKEND: Mutex<Option<SiteBackend<MemoryDocumentStore, JsMailer>>> = Mutex::new(None);
}

thread_local! {
    static MAIL_TRANSPORT: RefCell<Option<js_sys::Function>> = RefCell::new(None);
}

/// Forwards mail to the JS transport registered with `setMailTransport`
///
/// The transport is called with `{ to, from, subject, html }`; a thrown
/// exception is a transport error. Returned promises are not awaited.
#[derive(Debug, Default)]
pub struct JsMailer;

impl Mailer for JsMailer {
    fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let payload = serialize(email, "Failed to serialize email")
            .map_err(|e| MailError::Transport(describe_js(&e)))?;
        // Clone out so the transport may re-register itself while running
        let callback = MAIL_TRANSPORT
            .with(|transport| transport.borrow().clone())
            .ok_or_else(|| MailError::Transport("no mail transport registered".to_string()))?;
        callback
            .call1(&JsValue::NULL, &payload)
            .map(|_| ())
            .map_err(|e| MailError::Transport(describe_js(&e)))
    }
}

#[derive(Serialize)]
struct ResponseEnvelope<'a> {
    status: u16,
    body: &'a serde_json::Value,
}

/// Create the backend; `config` is an optional partial `SiteConfig`
///
/// Without a config object the settings come from the environment.
#[wasm_bindgen(js_name = initSiteBackend)]
pub fn init_site_backend(config: JsValue) -> Result<(), JsValue> {
    let config: SiteConfig =
        deserialize_optional(config, "Invalid site config")?.unwrap_or_else(SiteConfig::from_env);
    log::info!("site backend ready for {}", config.site_name);

    let mut backend = lock_backend()?;
    *backend = Some(SiteBackend::new(MemoryDocumentStore::new(), JsMailer, config));
    Ok(())
}

#[wasm_bindgen(js_name = setMailTransport)]
pub fn set_mail_transport(transport: js_sys::Function) {
    MAIL_TRANSPORT.with(|slot| *slot.borrow_mut() = Some(transport));
}

/// Route one request; returns `{ status, body }`
///
/// `query_json` is a JSON object of query parameters, `body` the raw
/// request body.
#[wasm_bindgen(js_name = handleApiRequest)]
pub fn handle_api_request(
    method: &str,
    path: &str,
    query_json: Option<String>,
    body: Option<String>,
) -> Result<JsValue, JsValue> {
    let response = match build_request(method, path, query_json.as_deref(), body) {
        Ok(request) => {
            let guard = lock_backend()?;
            let backend = guard
                .as_ref()
                .ok_or_else(|| js_error("Site backend not initialized; call initSiteBackend first"))?;
            backend.handle(&request)
        }
        Err(error) => error,
    };

    serialize(
        &ResponseEnvelope {
            status: response.status,
            body: &response.body,
        },
        "Failed to serialize API response",
    )
}

/// Lock the backend slot without blocking
///
/// A mail transport that calls back into the backend while a request is in
/// flight gets an error instead of a deadlock.
fn lock_backend() -> Result<MutexGuard<'static, Option<SiteBackend<MemoryDocumentStore, JsMailer>>>, JsValue> {
    BACKEND.try_lock().map_err(|e| match e {
        TryLockError::WouldBlock => js_error("Site backend is busy with another request"),
        TryLockError::Poisoned(_) => js_error("Site backend lock poisoned"),
    })
}

fn build_request(
    method: &str,
    path: &str,
    query_json: Option<&str>,
    body: Option<String>,
) -> Result<ApiRequest, ApiResponse> {
    let mut request = ApiRequest::new(method, path);
    if let Some(query_json) = query_json.filter(|q| !q.trim().is_empty()) {
        request.query = serde_json::from_str::<BTreeMap<String, String>>(query_json).map_err(|e| {
            log::warn!("rejecting malformed query: {}", e);
            crate::server::ApiError::BadRequest("Invalid query parameters".to_string()).into_response()
        })?;
    }
    request.body = body;
    Ok(request)
}
