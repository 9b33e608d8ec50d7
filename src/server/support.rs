//! `/api/support` route
//!
//! POST files a support request and sends two best-effort emails: a
//! confirmation to the requester and a notification to the admin inbox.
//! Either email may fail without failing the request.

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::error::{ApiError, MailError};
use super::http::{ApiRequest, ApiResponse};
use super::mail::{render_email, EmailTemplate, OutgoingEmail, SupportContext};
use super::validation::{normalized_email, required};
use super::RouteContext;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SupportSubmission {
    name: Option<String>,
    email: Option<String>,
    support_type: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportStatus {
    Pending,
}

/// Stored support request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SupportTicket {
    pub name: String,
    pub email: String,
    pub support_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub created_at: String,
    pub status: SupportStatus,
}

pub fn submit(ctx: &RouteContext<'_>, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let submission: SupportSubmission = request.json_body()?;

    let (Some(name), Some(email), Some(support_type)) = (
        required(&submission.name),
        required(&submission.email),
        required(&submission.support_type),
    ) else {
        return Err(ApiError::BadRequest(
            "Name, email, and support type are required".to_string(),
        ));
    };
    let email = normalized_email(&email)?;

    let ticket = SupportTicket {
        name,
        email,
        support_type,
        message: required(&submission.message),
        created_at: chrono::Utc::now().to_rfc3339(),
        status: SupportStatus::Pending,
    };
    let data = serde_json::to_value(&ticket).map_err(|e| ApiError::Internal(e.to_string()))?;
    let id = ctx.store.insert(&ctx.config.support_collection, data)?;
    log::info!("support: {} request {} from {}", ticket.support_type, id, ticket.email);

    let context = SupportContext {
        name: ticket.name.clone(),
        email: ticket.email.clone(),
        support_type: ticket.support_type.clone(),
        message: ticket.message.clone().unwrap_or_default(),
        has_message: ticket.message.is_some(),
        request_id: id.clone(),
        created_at: ticket.created_at.clone(),
        site_name: ctx.config.site_name.clone(),
    };

    if let Err(e) = send(
        ctx,
        EmailTemplate::SupportConfirmation,
        &context,
        &ticket.email,
        format!("We received your {} request", ticket.support_type),
    ) {
        log::warn!("support: confirmation email to {} failed: {}", ticket.email, e);
    }

    if let Err(e) = send(
        ctx,
        EmailTemplate::SupportAdminNotification,
        &context,
        &ctx.config.admin_email,
        format!("New support request: {} from {}", ticket.support_type, ticket.name),
    ) {
        log::warn!("support: admin notification for {} failed: {}", id, e);
    }

    Ok(ApiResponse::created(json!({
        "message": "Support request submitted successfully",
        "id": id,
    })))
}

pub fn lookup(ctx: &RouteContext<'_>, request: &ApiRequest) -> Result<ApiResponse, ApiError> {
    let email = request
        .query_param("email")
        .ok_or_else(|| ApiError::BadRequest("Email parameter is required".to_string()))?
        .to_lowercase();

    let requests: Vec<serde_json::Value> = ctx
        .store
        .find_by_field(&ctx.config.support_collection, "email", &email)?
        .into_iter()
        .map(|doc| {
            let mut data = doc.data;
            if let Some(object) = data.as_object_mut() {
                object.insert("id".to_string(), json!(doc.id));
            }
            data
        })
        .collect();

    Ok(ApiResponse::ok(json!({ "requests": requests })))
}

fn send(
    ctx: &RouteContext<'_>,
    template: EmailTemplate,
    context: &SupportContext,
    to: &str,
    subject: String,
) -> Result<(), MailError> {
    let html = render_email(template, context)?;
    ctx.mailer.send(&OutgoingEmail {
        to: to.to_string(),
        from: ctx.config.from_address.clone(),
        subject,
        html,
    })
}
