//! Serverless API routes
//!
//! `SiteBackend` owns a document store, a mailer and the site settings, and
//! turns an `ApiRequest` into an `ApiResponse`. Routing is by exact path and
//! method; everything else is 404 or 405.

pub mod error;
pub mod http;
pub mod mail;
pub mod store;
pub mod support;
pub mod validation;
pub mod waitlist;

pub use error::{ApiError, MailError, StoreError};
pub use http::{ApiRequest, ApiResponse};
pub use mail::{render_email, EmailTemplate, Mailer, OutgoingEmail, RecordingMailer};
pub use store::{DocumentStore, MemoryDocumentStore, StoredDocument};
pub use support::{SupportStatus, SupportTicket};
pub use waitlist::{SubscriptionStatus, WaitlistEntry};

use crate::config::SiteConfig;

pub const WAITLIST_PATH: &str = "/api/waitlist";
pub const SUPPORT_PATH: &str = "/api/support";

/// Borrowed view of the backend handed to each route
pub struct RouteContext<'a> {
    pub store: &'a dyn DocumentStore,
    pub mailer: &'a dyn Mailer,
    pub config: &'a SiteConfig,
}

pub struct SiteBackend<S: DocumentStore, M: Mailer> {
    store: S,
    mailer: M,
    config: SiteConfig,
}

impl<S: DocumentStore, M: Mailer> SiteBackend<S, M> {
    pub fn new(store: S, mailer: M, config: SiteConfig) -> Self {
        Self { store, mailer, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn mailer(&self) -> &M {
        &self.mailer
    }

    pub fn handle(&self, request: &ApiRequest) -> ApiResponse {
        log::debug!("{} {}", request.method, request.path);
        let ctx = RouteContext {
            store: &self.store,
            mailer: &self.mailer,
            config: &self.config,
        };

        let path = match request.path.trim_end_matches('/') {
            "" => "/",
            trimmed => trimmed,
        };
        let result = match (path, request.method.as_str()) {
            (WAITLIST_PATH, "POST") => waitlist::subscribe(&ctx, request),
            (WAITLIST_PATH, "GET") => waitlist::lookup(&ctx, request),
            (SUPPORT_PATH, "POST") => support::submit(&ctx, request),
            (SUPPORT_PATH, "GET") => support::lookup(&ctx, request),
            (WAITLIST_PATH | SUPPORT_PATH, method) => Err(ApiError::MethodNotAllowed(method.to_string())),
            _ => Err(ApiError::NotFound),
        };

        match result {
            Ok(response) => response,
            Err(e) => {
                if e.status() < 500 {
                    log::info!("{} {} -> {}: {}", request.method, request.path, e.status(), e);
                }
                e.into_response()
            }
        }
    }
}
