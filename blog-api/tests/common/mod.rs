use std::sync::Arc;

use blog_api::domain::user::service::UserService;
use blog_api::inbound::http::router::create_router;
use blog_api::outbound::repositories::InMemoryUserRepository;
use blog_auth::AuthGate;
use blog_auth::Authenticator;
use blog_auth::HashingCost;
use blog_auth::JwtSecret;
use blog_auth::PasswordHasher;
use blog_auth::TokenIssuer;
use chrono::Duration;
use serde_json::json;
use serde_json::Value;

pub const TEST_SECRET: &str = "test-secret-key-for-jwt-signing-at-least-32-bytes";

/// Test application that spawns a real server
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub api_client: reqwest::Client,
    /// Signs tokens with the server's secret, bypassing login
    pub issuer: TokenIssuer,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let secret = JwtSecret::new(TEST_SECRET).expect("Invalid test secret");

        // Cheapest cost Argon2 accepts keeps the suite fast
        let password_hasher = PasswordHasher::with_cost(HashingCost {
            memory_kib: 256,
            iterations: 1,
            parallelism: 1,
        })
        .expect("Invalid hashing cost");

        let authenticator = Arc::new(
            Authenticator::new(&secret, Duration::minutes(60))
                .with_password_hasher(password_hasher),
        );

        let user_repository = Arc::new(InMemoryUserRepository::new());
        let user_service = Arc::new(UserService::new(
            user_repository,
            Arc::clone(&authenticator),
        ));
        let auth_gate =
            AuthGate::new(authenticator.validator().clone(), Arc::clone(&user_service));

        let router = create_router(user_service, auth_gate);

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        Self {
            address,
            port,
            api_client: reqwest::Client::new(),
            issuer: TokenIssuer::new(&secret),
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make GET request with Bearer token
    pub fn get_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.get(path).bearer_auth(token)
    }

    /// Register a user and return the response body
    pub async fn register(&self, username: &str, email: &str, password: &str) -> Value {
        let response = self
            .post("/api/v1/user/register")
            .json(&json!({
                "username": username,
                "email": email,
                "password": password
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::CREATED);
        response.json().await.expect("Failed to parse response")
    }

    /// Register a user, log in, and return (user id, token)
    pub async fn register_and_login(&self, username: &str) -> (String, String) {
        let email = format!("{}@example.com", username);
        let registered = self.register(username, &email, "pass_word!").await;

        let response = self
            .post("/api/v1/user/login")
            .json(&json!({
                "usernameOrEmail": username,
                "password": "pass_word!"
            }))
            .send()
            .await
            .expect("Failed to execute request");

        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let body: Value = response.json().await.expect("Failed to parse response");

        (
            registered["data"]["id"].as_str().unwrap().to_string(),
            body["data"]["token"].as_str().unwrap().to_string(),
        )
    }
}
