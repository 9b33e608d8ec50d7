//! `/api/waitlist` route
//!
//! POST subscribes a name/email pair once per email address; GET reports
//! whether an address is on the list.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::ApiError;
use super::http::{ApiRequest, ApiResponse};
use super::mail::{render_email, EmailTemplate, OutgoingEmail, WelcomeContext};
use super::validation::{normalized_email, required};
use super::RouteContext;

#[derive(Debug, Deserialize)]
struct WaitlistSubmission {
    name: Option<String>,
    email: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionStatus {
    Active,
}

/// Stored waitlist record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WaitlistEntry {
    pub name: String,
    pub email: String,
    pub subscribed_at: String,
    pub status: SubscriptionStatus,
}

pub fn subscribe(ctx: &RouteContext<'_>, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let submission: WaitlistSubmission = request.json_body()?;

    let (Some(name), Some(email)) = (required(&submission.name), required(&submission.email)) else {
        return Err(ApiError::BadRequest("Name and email are required".to_string()));
    };
    let email = normalized_email(&email)?;

    let collection = &ctx.config.waitlist_collection;
    if ctx.store.find_one_by_field(collection, "email", &email)?.is_some() {
        log::info!("waitlist: {} already registered", email);
        return Err(ApiError::Conflict("Email already registered".to_string()));
    }

    let entry = WaitlistEntry {
        name,
        email,
        subscribed_at: chrono::Utc::now().to_rfc3339(),
        status: SubscriptionStatus::Active,
    };
    let data = serde_json::to_value(&entry).map_err(|e| ApiError::Internal(e.to_string()))?;
    let id = ctx.store.insert(collection, data)?;
    log::info!("waitlist: subscribed {} as {}", entry.email, id);

    if let Err(e) = send_welcome(ctx, &entry) {
        log::warn!("waitlist: welcome email to {} failed: {}", entry.email, e);
    }

    Ok(ApiResponse::created(json!({
        "success": true,
        "message": "Successfully joined the waitlist",
        "data": {
            "id": id,
            "name": entry.name,
            "email": entry.email,
            "subscribedAt": entry.subscribed_at,
        }
    })))
}

pub fn lookup(ctx: &RouteContext<'_>, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let email = request
        .query_param("email")
        .ok_or_else(|| ApiError::BadRequest("Email parameter is required".to_string()))?
        .to_lowercase();

    let found = ctx
        .store
        .find_one_by_field(&ctx.config.waitlist_collection, "email", &email)?;

    let body = match found {
        Some(doc) => {
            let mut data = doc.data;
            if let Some(object) = data.as_object_mut() {
                object.insert("id".to_string(), json!(doc.id));
            }
            json!({ "subscribed": true, "data": data })
        }
        None => json!({ "subscribed": false }),
    };
    Ok(ApiResponse::ok(body))
}

fn send_welcome(ctx: &RouteContext<'_>, entry: &WaitlistEntry) -> Result<(), super::error::MailError> {
    let html = render_email(
        EmailTemplate::Welcome,
        &WelcomeContext {
            name: entry.name.clone(),
            email: entry.email.clone(),
            site_name: ctx.config.site_name.clone(),
            subscribed_at: entry.subscribed_at.clone(),
        },
    )?;
    ctx.mailer.send(&OutgoingEmail {
        to: entry.email.clone(),
        from: ctx.config.from_address.clone(),
        subject: format!("Welcome to the {} waitlist", ctx.config.site_name),
        html,
    })
}
