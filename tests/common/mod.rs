use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response};
use serde_json::Value;

use listkeep_api::auth::{generate_jwt, Claims};
use listkeep_api::config::{OwnershipPolicy, SecurityConfig};
use listkeep_api::database::models::User;
use listkeep_api::database::MemoryStore;
use listkeep_api::{app, AppState};

pub const FORM: &str = "application/x-www-form-urlencoded";

/// A router served on an ephemeral local port over a fresh in-memory store
pub struct TestServer {
    pub base_url: String,
    pub store: Arc<MemoryStore>,
    pub security: SecurityConfig,
    client: Client,
}

pub fn security(policy: OwnershipPolicy) -> SecurityConfig {
    SecurityConfig {
        enable_cors: false,
        cors_origins: Vec::new(),
        jwt_secret: "integration-test-secret".to_string(),
        jwt_expiry_hours: 1,
        ownership_policy: policy,
    }
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(OwnershipPolicy::Strict).await
    }

    pub async fn spawn_with(policy: OwnershipPolicy) -> Result<Self> {
        let store = Arc::new(MemoryStore::new());
        let security = security(policy);
        let router = app(AppState::new(store.clone(), security.clone()));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind test listener")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        // Redirects are asserted on, never followed
        let client = Client::builder()
            .redirect(reqwest::redirect::Policy::none())
            .build()?;

        Ok(Self {
            base_url: format!("http://{}", addr),
            store,
            security,
            client,
        })
    }

    pub async fn user(&self, id: &str, email: &str) -> Result<(User, String)> {
        let user = self.store.insert_user(id, email).await;
        let token = generate_jwt(&Claims::for_user(&user, 1), &self.security)?;
        Ok((user, token))
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(format!("{}{}", self.base_url, path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(format!("{}{}", self.base_url, path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(format!("{}{}", self.base_url, path))
    }

    /// Submit a url-encoded form with a bearer token
    pub async fn submit(&self, path: &str, token: &str, pairs: &[(&str, &str)]) -> Result<Response> {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs)
            .finish();
        Ok(self
            .post(path)
            .bearer_auth(token)
            .header(reqwest::header::CONTENT_TYPE, FORM)
            .body(body)
            .send()
            .await?)
    }

    /// Create a list through the API and return its id
    pub async fn create_list(&self, token: &str, owner: &User, name: &str) -> Result<String> {
        let res = self
            .submit("/lists", token, &[("action", "create"), ("name", name), ("userId", owner.id.as_str())])
            .await?;
        let body = res.json::<Value>().await?;
        body["data"]["list"]["id"]
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("no list id in {}", body))
    }

    pub async fn add_item(&self, token: &str, list_id: &str, name: &str) -> Result<String> {
        let res = self
            .submit(
                &format!("/lists/{}", list_id),
                token,
                &[("action", "addItem"), ("name", name), ("listId", list_id)],
            )
            .await?;
        let body = res.json::<Value>().await?;
        body["data"]["item"]["id"]
            .as_str()
            .map(str::to_string)
            .with_context(|| format!("no item id in {}", body))
    }
}
