//! Integration tests for the Yadukul Dairy storefront API.
//!
//! The tests talk HTTP to a running server and are `#[ignore]`d by default.
//!
//! # Running Tests
//!
//! ```bash
//! yd-cli migrate
//! YADUKUL_AUTH_RATE_BURST=1000 cargo run -p yadukul-storefront &
//! cargo test -p yadukul-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `YADUKUL_TEST_BASE_URL` - Server under test (default: `http://localhost:5000`)
//! - `YADUKUL_OTP_CODE` - Login code the server accepts (default: `123456`)
//!
//! Every login uses a fresh random phone number, so tests can run against a
//! shared database without cleaning up.

#![allow(clippy::missing_panics_doc, clippy::unwrap_used)]

use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use yadukul_core::Role;

/// Base URL of the server under test.
#[must_use]
pub fn base_url() -> String {
    std::env::var("YADUKUL_TEST_BASE_URL")
        .unwrap_or_else(|_| "http://localhost:5000".to_owned())
        .trim_end_matches('/')
        .to_owned()
}

/// Login code the server accepts.
#[must_use]
pub fn otp_code() -> String {
    std::env::var("YADUKUL_OTP_CODE").unwrap_or_else(|_| "123456".to_owned())
}

/// A random, valid, 12-digit phone number.
#[must_use]
pub fn unique_phone() -> String {
    let n = Uuid::new_v4().as_u128() % 100_000_000_000;
    format!("9{n:011}")
}

/// Absolute URL for an `/api` path.
#[must_use]
pub fn api(path: &str) -> String {
    format!("{}/api{path}", base_url())
}

/// A logged-in user.
#[derive(Debug, Clone)]
pub struct Session {
    pub client: Client,
    pub token: String,
    pub user: Value,
    pub phone: String,
}

impl Session {
    /// Log in as a new user with `role`.
    pub async fn login(role: Role) -> Self {
        Self::login_with_phone(role, &unique_phone()).await
    }

    /// Log in with a specific phone number.
    pub async fn login_with_phone(role: Role, phone: &str) -> Self {
        let client = Client::new();
        let resp = client
            .post(api("/users/login"))
            .json(&json!({ "phone": phone, "role": role, "otp": otp_code() }))
            .send()
            .await
            .expect("login request failed");
        assert_eq!(resp.status(), StatusCode::OK, "login as {role} failed");

        let user: Value = resp.json().await.unwrap();
        let token = user["token"].as_str().unwrap().to_owned();
        Self {
            client,
            token,
            user,
            phone: phone.to_owned(),
        }
    }

    /// The user's `_id`.
    #[must_use]
    pub fn id(&self) -> i64 {
        self.user["_id"].as_i64().unwrap()
    }

    #[must_use]
    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(api(path)).bearer_auth(&self.token)
    }

    #[must_use]
    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(api(path)).bearer_auth(&self.token)
    }

    #[must_use]
    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(api(path)).bearer_auth(&self.token)
    }

    #[must_use]
    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(api(path)).bearer_auth(&self.token)
    }
}

/// Send a request, assert the status, and return the JSON body.
pub async fn expect_json(request: RequestBuilder, status: StatusCode) -> Value {
    let resp = request.send().await.expect("request failed");
    let actual = resp.status();
    let body = resp.text().await.unwrap();
    assert_eq!(actual, status, "unexpected status, body: {body}");
    serde_json::from_str(&body).unwrap_or(Value::Null)
}

/// Create a product as `admin` and return it.
pub async fn create_product(admin: &Session, name: &str, price: f64) -> Value {
    expect_json(
        admin.post("/products").json(&json!({
            "name": name,
            "category": "Milk",
            "price": price,
            "imageUrl": "/uploads/test-milk.jpg",
            "origin": "Test farm",
            "nutrition": "Fat 3.5%"
        })),
        StatusCode::CREATED,
    )
    .await
}
