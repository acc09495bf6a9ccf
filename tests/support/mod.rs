#![allow(dead_code)]

use recycling_site_service::api;
use recycling_site_service::common::state::AppState;
use recycling_site_service::repositories::contacts::ContactsRepository;
use recycling_site_service::repositories::users::UsersRepository;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;

pub const OPERATOR_EMAIL: &str = "ops@example.com";
pub const OPERATOR_PASSWORD: &str = "correct horse battery staple";

pub struct TestApp {
    pub base_url: String,
    pub client: reqwest::Client,
    pub state: AppState,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::spawn_with(false).await
    }

    pub async fn spawn_with(require_operator_auth: bool) -> Self {
        let state = AppState::in_memory(Duration::from_secs(60), require_operator_auth);
        Self::spawn_state(state).await
    }

    pub async fn spawn_state(state: AppState) -> Self {
        let password_hash = bcrypt::hash(OPERATOR_PASSWORD, 4).expect("hash password");
        state
            .users
            .create("Operator", OPERATOR_EMAIL, &password_hash)
            .await
            .expect("seed operator");

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let address = listener.local_addr().expect("local addr");
        let app = api::router(state.clone());
        tokio::spawn(async move {
            axum::serve(
                listener,
                app.into_make_service_with_connect_info::<SocketAddr>(),
            )
            .await
            .expect("serve");
        });

        Self {
            base_url: format!("http://{address}"),
            client: reqwest::Client::new(),
            state,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    pub fn in_memory_state() -> AppState {
        AppState::in_memory(Duration::from_secs(60), false)
    }

    pub async fn submit(&self, body: &Value) -> reqwest::Response {
        self.client
            .post(self.url("/api/contact/"))
            .json(body)
            .send()
            .await
            .expect("submit")
    }

    pub async fn list(&self) -> Value {
        self.client
            .get(self.url("/api/contact/"))
            .send()
            .await
            .expect("list")
            .json()
            .await
            .expect("list body")
    }

    pub async fn mark_read(&self, id: &str) -> reqwest::Response {
        self.client
            .put(self.url("/api/contact/read"))
            .json(&json!({ "id": id }))
            .send()
            .await
            .expect("mark read")
    }

    pub async fn delete(&self, id: &str) -> reqwest::Response {
        self.client
            .delete(self.url("/api/contact/delete"))
            .json(&json!({ "id": id }))
            .send()
            .await
            .expect("delete")
    }

    pub async fn record_count(&self) -> usize {
        self.state.contacts.fetch_all().await.expect("fetch").len()
    }
}

pub fn submission(name: &str) -> Value {
    json!({
        "name": name,
        "email": "a@x.com",
        "phone": "1234567890",
        "contactPurpose": "Support",
        "message": "hi",
    })
}

pub fn ids(list: &Value) -> Vec<String> {
    list["messages"]
        .as_array()
        .expect("messages array")
        .iter()
        .map(|message| message["_id"].as_str().expect("id").to_string())
        .collect()
}
