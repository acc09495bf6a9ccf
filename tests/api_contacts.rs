mod support;

use anyhow::anyhow;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use recycling_site_service::common::state::AppState;
use recycling_site_service::entities::contacts::{Contact, CreateContactArgs};
use recycling_site_service::repositories::contacts::ContactsRepository;
use reqwest::StatusCode;
use serde_json::{Value, json};
use std::sync::Arc;
use support::{TestApp, ids, submission};
use uuid::Uuid;

struct UnavailableContacts;

#[async_trait]
impl ContactsRepository for UnavailableContacts {
    async fn create(&self, _args: CreateContactArgs) -> anyhow::Result<Contact> {
        Err(anyhow!("contacts table is unavailable"))
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<Contact>> {
        Err(anyhow!("contacts table is unavailable"))
    }

    async fn mark_read(&self, _contact_id: Uuid) -> anyhow::Result<Option<Contact>> {
        Err(anyhow!("contacts table is unavailable"))
    }

    async fn delete(&self, _contact_id: Uuid) -> anyhow::Result<()> {
        Err(anyhow!("contacts table is unavailable"))
    }
}

async fn spawn_unavailable(expose_error_details: bool) -> TestApp {
    TestApp::spawn_state(AppState {
        contacts: Arc::new(UnavailableContacts),
        expose_error_details,
        ..TestApp::in_memory_state()
    })
    .await
}

#[tokio::test]
async fn submit_then_read_then_delete() {
    let app = TestApp::spawn().await;

    let response = app.submit(&submission("A")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(
        body["message"],
        "Your message has been received. We will contact you shortly!"
    );
    assert_eq!(body["contact"]["read"], false);
    assert_eq!(body["contact"]["contactPurpose"], "Support");
    let id = body["contact"]["_id"].as_str().unwrap().to_string();

    let response = app.mark_read(&id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(body["message"]["_id"], id.as_str());
    assert_eq!(body["message"]["read"], true);
    assert_eq!(ids(&body), vec![id.clone()]);

    let list = app.list().await;
    assert_eq!(ids(&list), vec![id.clone()]);
    assert_eq!(list["messages"][0]["read"], true);

    let response = app.delete(&id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(ids(&body).is_empty());
    assert!(ids(&app.list().await).is_empty());
}

#[tokio::test]
async fn missing_fields_are_rejected_without_touching_the_store() {
    let app = TestApp::spawn().await;

    for field in ["name", "email", "phone", "contactPurpose", "message"] {
        let mut body = submission("A");
        body.as_object_mut().unwrap().remove(field);
        let response = app.submit(&body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{field}");
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Please provide all required fields");

        let mut body = submission("A");
        body[field] = json!("");
        assert_eq!(app.submit(&body).await.status(), StatusCode::BAD_REQUEST);
    }

    assert_eq!(app.record_count().await, 0);
}

#[tokio::test]
async fn operator_keys_in_fields_count_as_missing() {
    let app = TestApp::spawn().await;
    let mut body = submission("A");
    body["email"] = json!({ "$ne": null });

    let response = app.submit(&body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(app.record_count().await, 0);
}

#[tokio::test]
async fn injected_keys_are_stripped_before_storage() {
    let app = TestApp::spawn().await;
    let mut body = submission("A");
    body["$where"] = json!("1 == 1");
    body["read"] = json!(true);

    let response = app.submit(&body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["contact"]["read"], false);
    assert!(body["contact"].get("$where").is_none());
    assert_eq!(app.record_count().await, 1);
}

#[tokio::test]
async fn valid_submission_adds_one_record_created_now() {
    let app = TestApp::spawn().await;
    let started = Utc::now();

    let body: Value = app.submit(&submission("A")).await.json().await.unwrap();

    assert_eq!(app.record_count().await, 1);
    let created_at: DateTime<Utc> = body["contact"]["createdAt"].as_str().unwrap().parse().unwrap();
    assert!(created_at >= started);
}

#[tokio::test]
async fn list_is_newest_first() {
    let app = TestApp::spawn().await;
    let mut created = Vec::new();
    for name in ["t1", "t2", "t3"] {
        let body: Value = app.submit(&submission(name)).await.json().await.unwrap();
        created.push(body["contact"]["_id"].as_str().unwrap().to_string());
    }

    let list = app.list().await;

    assert_eq!(list["success"], true);
    created.reverse();
    assert_eq!(ids(&list), created);
    let names: Vec<&str> = list["messages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|message| message["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["t3", "t2", "t1"]);
}

#[tokio::test]
async fn list_without_trailing_slash_is_the_same_route() {
    let app = TestApp::spawn().await;
    app.submit(&submission("A")).await;

    let body: Value = app
        .client
        .get(app.url("/api/contact"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(ids(&body).len(), 1);
}

#[tokio::test]
async fn mark_read_of_unknown_id_succeeds_with_null_message() {
    let app = TestApp::spawn().await;
    app.submit(&submission("A")).await;
    let before = app.list().await;

    let response = app.mark_read(&uuid::Uuid::new_v4().to_string()).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert!(body["message"].is_null());
    assert_eq!(body["messages"], before["messages"]);
    assert_eq!(app.list().await, before);
}

#[tokio::test]
async fn delete_is_idempotent() {
    let app = TestApp::spawn().await;
    let kept: Value = app.submit(&submission("kept")).await.json().await.unwrap();
    let gone: Value = app.submit(&submission("gone")).await.json().await.unwrap();
    let gone_id = gone["contact"]["_id"].as_str().unwrap();

    let once: Value = app.delete(gone_id).await.json().await.unwrap();
    let response = app.delete(gone_id).await;
    assert_eq!(response.status(), StatusCode::OK);
    let twice: Value = response.json().await.unwrap();

    assert_eq!(once, twice);
    assert_eq!(ids(&twice), vec![kept["contact"]["_id"].as_str().unwrap()]);
}

#[tokio::test]
async fn malformed_ids_are_client_errors() {
    let app = TestApp::spawn().await;

    for response in [app.mark_read("64f1c0ffee").await, app.delete("nope").await] {
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "contacts.invalid_id");
    }
}

#[tokio::test]
async fn undecodable_bodies_keep_the_error_shape() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .put(app.url("/api/contact/read"))
        .header("content-type", "application/json")
        .body("{\"id\":")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "decoding_request_failed");

    let response = app
        .client
        .put(app.url("/api/contact/read"))
        .json(&json!({ "id": { "$gt": "" } }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let app = TestApp::spawn().await;

    let response = app.client.get(app.url("/api/nope")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "not_found");
}

#[tokio::test]
async fn unparseable_proxy_headers_do_not_block_contact_routes() {
    let app = TestApp::spawn().await;

    for forwarded_for in ["unknown", "203.0.113.7:4711", "garbage, 10.0.0.1"] {
        let response = app
            .client
            .post(app.url("/api/contact/"))
            .header("X-Forwarded-For", forwarded_for)
            .json(&submission("A"))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED, "{forwarded_for}");
    }
    assert_eq!(app.record_count().await, 3);

    let response = app
        .client
        .get(app.url("/api/contact/"))
        .header("CF-Connecting-IP", "garbage")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(ids(&body).len(), 3);
}

#[tokio::test]
async fn long_messages_fit_within_the_body_limit() {
    let app = TestApp::spawn().await;
    let mut body = submission("A");
    body["message"] = json!("x".repeat(90 * 1024));

    let response = app.submit(&body).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(app.record_count().await, 1);
}

#[tokio::test]
async fn oversized_bodies_are_rejected_for_any_json_content_type() {
    let app = TestApp::spawn().await;
    let mut body = submission("A");
    body["message"] = json!("x".repeat(120 * 1024));

    let response = app
        .client
        .post(app.url("/api/contact/"))
        .header("content-type", "Application/JSON")
        .body(body.to_string())
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "decoding_request_failed");
    assert_eq!(app.record_count().await, 0);
}

#[tokio::test]
async fn store_failures_hide_their_detail_by_default() {
    let app = spawn_unavailable(false).await;

    let response = app.submit(&submission("A")).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "unexpected");
    assert_eq!(body["message"], "Server Error");
    assert!(body.get("error").is_none());
}

#[tokio::test]
async fn store_failures_show_their_detail_when_exposed() {
    let app = spawn_unavailable(true).await;

    let response = app.client.get(app.url("/api/contact/")).send().await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["code"], "unexpected");
    assert_eq!(body["error"], "contacts table is unavailable");
}
