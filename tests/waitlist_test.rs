// Waitlist route against the in-memory store and recording mailer

use serde_json::json;
use site_core_wasm::server::{ApiRequest, MemoryDocumentStore, RecordingMailer, SiteBackend};
use site_core_wasm::SiteConfig;

fn backend() -> SiteBackend<MemoryDocumentStore, RecordingMailer> {
    let config = SiteConfig {
        site_name: "Orbit".to_string(),
        from_address: "hello@orbit.test".to_string(),
        ..Default::default()
    };
    SiteBackend::new(MemoryDocumentStore::new(), RecordingMailer::new(), config)
}

fn join(name: &str, email: &str) -> ApiRequest {
    ApiRequest::post(
        "/api/waitlist",
        json!({ "name": name, "email": email }).to_string(),
    )
}

#[test]
fn test_second_signup_with_same_email_conflicts() {
    let backend = backend();

    let first = backend.handle(&join("Ada", "ada@example.com"));
    assert_eq!(first.status, 201);
    assert_eq!(first.body["success"], true);
    assert_eq!(first.body["data"]["email"], "ada@example.com");
    assert!(first.body["data"]["id"].is_string());
    assert!(first.body["data"]["subscribedAt"].is_string());

    // Case and whitespace do not make a new address
    let second = backend.handle(&join("Ada again", "  ADA@example.com "));
    assert_eq!(second.status, 409);
    assert_eq!(second.body["error"], "Email already registered");

    assert_eq!(backend.store().count("waitlist").unwrap(), 1);
}

#[test]
fn test_welcome_email_is_sent() {
    let backend = backend();
    backend.handle(&join("Ada", "ada@example.com"));

    let sent = backend.mailer().sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "ada@example.com");
    assert_eq!(sent[0].from, "hello@orbit.test");
    assert!(sent[0].subject.contains("Orbit"));
    assert!(sent[0].html.contains("Ada"));
}

#[test]
fn test_failed_welcome_email_still_subscribes() {
    let backend = backend();
    backend.mailer().fail_for("ada@example.com");

    let response = backend.handle(&join("Ada", "ada@example.com"));
    assert_eq!(response.status, 201);
    assert_eq!(backend.store().count("waitlist").unwrap(), 1);
    assert!(backend.mailer().sent().is_empty());
}

#[test]
fn test_missing_fields_and_bad_email() {
    let backend = backend();

    let missing = backend.handle(&ApiRequest::post("/api/waitlist", r#"{"name":"Ada"}"#));
    assert_eq!(missing.status, 400);
    assert_eq!(missing.body["error"], "Name and email are required");

    let blank = backend.handle(&join("   ", "ada@example.com"));
    assert_eq!(blank.status, 400);

    let invalid = backend.handle(&join("Ada", "ada-at-example"));
    assert_eq!(invalid.status, 400);
    assert_eq!(invalid.body["error"], "Invalid email format");

    let malformed = backend.handle(&ApiRequest::post("/api/waitlist", "{not json"));
    assert_eq!(malformed.status, 400);

    assert_eq!(backend.store().count("waitlist").unwrap(), 0);
}

#[test]
fn test_lookup_reports_subscription() {
    let backend = backend();
    backend.handle(&join("Ada", "ada@example.com"));

    let found = backend.handle(&ApiRequest::get("/api/waitlist").with_query("email", "ada@example.com"));
    assert_eq!(found.status, 200);
    assert_eq!(found.body["subscribed"], true);
    assert_eq!(found.body["data"]["name"], "Ada");

    let absent = backend.handle(&ApiRequest::get("/api/waitlist").with_query("email", "bob@example.com"));
    assert_eq!(absent.body["subscribed"], false);
    assert!(absent.body.get("data").is_none());
}
