//! Common test utilities for route tests
//!
//! Each test receives a fresh, migrated database from `#[sqlx::test]`. The
//! context seeds one regular user and one admin and builds the router on top
//! of that pool.
#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use qrboxer_api::app::{build_router, AppState};
use qrboxer_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, LogFormat, LoggingConfig};
use qrboxer_shared::auth::token::create_token;
use qrboxer_shared::models::user::{RegisterUser, User};
use serde_json::Value;
use sqlx::PgPool;
use tower::Service as _;

pub const TEST_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

pub struct TestContext {
    pub db: PgPool,
    pub app: axum::Router,
    pub user: User,
    pub user_token: String,
    pub admin: User,
    pub admin_token: String,
}

pub fn test_config() -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
        },
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
        },
        jwt: JwtConfig {
            secret: TEST_SECRET.to_string(),
        },
        logging: LoggingConfig {
            format: LogFormat::Pretty,
        },
    }
}

impl TestContext {
    pub async fn new(db: PgPool) -> Self {
        let user = User::register(
            &db,
            RegisterUser {
                username: "testuser".to_string(),
                password: "password123".to_string(),
                email: "test@test.com".to_string(),
                admin: false,
            },
        )
        .await
        .unwrap();

        let admin = User::register(
            &db,
            RegisterUser {
                username: "admin".to_string(),
                password: "adminpass".to_string(),
                email: "admin@test.com".to_string(),
                admin: true,
            },
        )
        .await
        .unwrap();

        let user_token = create_token(&user, TEST_SECRET).unwrap();
        let admin_token = create_token(&admin, TEST_SECRET).unwrap();

        let app = build_router(AppState::new(db.clone(), test_config()));

        TestContext {
            db,
            app,
            user,
            user_token,
            admin,
            admin_token,
        }
    }

    /// Sends a request and returns the status with the parsed JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                panic!("Non-JSON body ({}): {}", status, String::from_utf8_lossy(&bytes))
            })
        };

        (status, json)
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, Value) {
        self.send("GET", uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("POST", uri, Some(body), None).await
    }

    pub async fn patch(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send("PATCH", uri, Some(body), None).await
    }

    pub async fn delete(&self, uri: &str) -> (StatusCode, Value) {
        self.send("DELETE", uri, None, None).await
    }

    /// Creates a move for `testuser` through the API and returns its id
    pub async fn create_move(&self, date: &str) -> i64 {
        let (status, body) = self
            .post(
                "/moves",
                serde_json::json!({
                    "location": "New York",
                    "date": date,
                    "username": "testuser"
                }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["move"]["id"].as_i64().unwrap()
    }

    /// Creates a box in `move_id` through the API and returns its id
    pub async fn create_box(&self, move_id: i64, room: &str) -> i64 {
        let (status, body) = self
            .post(
                "/boxes",
                serde_json::json!({ "name": "Box", "room": room, "move": move_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["box"]["id"].as_i64().unwrap()
    }

    /// Creates an item in `box_id` through the API and returns its id
    pub async fn create_item(&self, box_id: i64, description: &str) -> i64 {
        let (status, body) = self
            .post(
                "/items",
                serde_json::json!({ "description": description, "box": box_id }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["item"]["id"].as_i64().unwrap()
    }
}
