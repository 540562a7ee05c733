//! Shared harness for the integration suites. Requires a running Postgres
//! reachable via `DATABASE_URL`; when the variable is unset every test
//! returns early so the suite can run without a database.

#![allow(dead_code)]

use confab_server::api::{ServiceContainer, app_router};
use confab_server::config::{
    AuthConfig, Config, ConversationConfig, LogFormat, ServerConfig, TelemetryConfig,
};
use confab_server::domain::auth::Claims;
use confab_server::services::access::AccessGate;
use confab_server::services::conversation_service::ConversationService;
use confab_server::services::directory_service::DirectoryService;
use confab_server::services::membership_service::MembershipService;
use confab_server::services::message_service::MessageService;
use confab_server::storage;
use confab_server::storage::conversation_repo::ConversationRepository;
use confab_server::storage::message_repo::MessageRepository;
use confab_server::storage::user_repo::UserRepository;
use sqlx::PgPool;
use std::sync::Once;
use uuid::Uuid;

static INIT: Once = Once::new();

pub fn setup_tracing() {
    INIT.call_once(|| {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "warn".into())
            .add_directive("confab_server=debug".parse().unwrap())
            .add_directive("sqlx=warn".parse().unwrap())
            .add_directive("tower=warn".parse().unwrap())
            .add_directive("hyper=warn".parse().unwrap())
            .add_directive("reqwest=warn".parse().unwrap());

        tracing_subscriber::fmt().with_env_filter(filter).init();
    });
}

pub fn get_test_config(database_url: String) -> Config {
    Config {
        database_url,
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            mgmt_port: 0,
            request_timeout_secs: 30,
        },
        auth: AuthConfig { jwt_secret: "test_secret".to_string() },
        conversations: ConversationConfig { max_group_size: 50, page_limit: 50, max_page_limit: 200 },
        telemetry: TelemetryConfig { log_format: LogFormat::Text },
    }
}

pub struct TestUser {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

pub struct TestApp {
    pub server_url: String,
    pub client: reqwest::Client,
    pub pool: PgPool,
    jwt_secret: String,
}

impl TestApp {
    /// Spawns the app on a random port, or `None` when `DATABASE_URL` is not
    /// set.
    pub async fn try_spawn() -> Option<Self> {
        Self::try_spawn_with(|_| {}).await
    }

    pub async fn try_spawn_with(mutate: impl FnOnce(&mut Config)) -> Option<Self> {
        setup_tracing();
        let Ok(database_url) = std::env::var("DATABASE_URL") else {
            tracing::warn!("DATABASE_URL not set; skipping integration test");
            return None;
        };

        let pool = storage::init_pool(&database_url).await.expect("Failed to connect to DB. Is Postgres running?");
        storage::run_migrations(&pool).await.expect("Failed to run migrations");

        let mut config = get_test_config(database_url);
        mutate(&mut config);

        let conversation_repo = ConversationRepository::new(pool.clone());
        let user_repo = UserRepository::new(pool.clone());
        let gate = AccessGate::new(conversation_repo.clone());

        let services = ServiceContainer {
            conversation_service: ConversationService::new(
                config.conversations.clone(),
                conversation_repo.clone(),
                user_repo.clone(),
            ),
            message_service: MessageService::new(
                config.conversations.clone(),
                gate.clone(),
                MessageRepository::new(pool.clone()),
            ),
            membership_service: MembershipService::new(gate, conversation_repo, user_repo.clone()),
            directory_service: DirectoryService::new(config.conversations.clone(), user_repo),
        };

        let jwt_secret = config.auth.jwt_secret.clone();
        let router = app_router(config, services);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to read local addr");
        tokio::spawn(async move {
            axum::serve(listener, router.into_make_service()).await.expect("Server crashed");
        });

        Some(Self {
            server_url: format!("http://{addr}"),
            client: reqwest::Client::new(),
            pool,
            jwt_secret,
        })
    }

    /// Provisions a directory entry the way the identity provider would and
    /// mints a matching access token.
    pub async fn create_user(&self, username: &str) -> TestUser {
        let user_id = Uuid::new_v4();
        sqlx::query("INSERT INTO users (id, username, email) VALUES ($1, $2, $3)")
            .bind(user_id)
            .bind(username)
            .bind(format!("{username}@example.com"))
            .execute(&self.pool)
            .await
            .expect("Failed to insert user");

        let token = Claims::new(user_id, 3600).encode(&self.jwt_secret).expect("Failed to mint token");
        TestUser { user_id, username: username.to_string(), token }
    }

    pub async fn get(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .get(format!("{}{path}", self.server_url))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn post_json(&self, token: &str, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .post(format!("{}{path}", self.server_url))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    pub async fn delete(&self, token: &str, path: &str) -> reqwest::Response {
        self.client
            .delete(format!("{}{path}", self.server_url))
            .header("Authorization", format!("Bearer {token}"))
            .send()
            .await
            .expect("request failed")
    }

    pub async fn delete_json(&self, token: &str, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.client
            .delete(format!("{}{path}", self.server_url))
            .header("Authorization", format!("Bearer {token}"))
            .json(body)
            .send()
            .await
            .expect("request failed")
    }

    /// Creates a direct conversation between the two users, asserting success.
    pub async fn create_direct(&self, requester: &TestUser, peer: &TestUser) -> serde_json::Value {
        let resp = self
            .post_json(
                &requester.token,
                "/v1/conversations",
                &serde_json::json!({
                    "conversationType": "direct",
                    "participants": [requester.user_id, peer.user_id],
                }),
            )
            .await;
        assert_eq!(resp.status(), 201, "direct conversation creation failed");
        resp.json().await.expect("invalid JSON")
    }

    /// Creates a group owned by `creator`, asserting success.
    pub async fn create_group(
        &self,
        creator: &TestUser,
        name: &str,
        members: &[Uuid],
    ) -> serde_json::Value {
        let resp = self
            .post_json(
                &creator.token,
                "/v1/conversations",
                &serde_json::json!({
                    "conversationType": "group",
                    "name": name,
                    "participants": members,
                }),
            )
            .await;
        assert_eq!(resp.status(), 201, "group conversation creation failed");
        resp.json().await.expect("invalid JSON")
    }

    /// Sends a message, asserting success, and returns the response body.
    pub async fn send_message(
        &self,
        sender: &TestUser,
        conversation_id: &str,
        content: &str,
    ) -> serde_json::Value {
        let resp = self
            .post_json(
                &sender.token,
                &format!("/v1/conversations/{conversation_id}/messages"),
                &serde_json::json!({ "content": content }),
            )
            .await;
        assert_eq!(resp.status(), 201, "message send failed");
        resp.json().await.expect("invalid JSON")
    }
}

/// Short unique suffix so suites can share one database.
pub fn run_id() -> String {
    Uuid::new_v4().to_string()[..8].to_string()
}

/// Extracts the participant ids from a conversation response body.
pub fn participant_ids(conversation: &serde_json::Value) -> Vec<String> {
    conversation["participants"]
        .as_array()
        .expect("participants must be an array")
        .iter()
        .map(|p| p["id"].as_str().expect("participant id").to_string())
        .collect()
}
