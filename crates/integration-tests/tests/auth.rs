//! Login, tokens and profile.
//!
//! Run with: `cargo test -p yadukul-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode};
use serde_json::json;

use yadukul_core::Role;
use yadukul_integration_tests::{Session, api, expect_json, otp_code, unique_phone};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_request_otp() {
    let body = expect_json(
        Client::new()
            .post(api("/users/otp"))
            .json(&json!({ "phone": unique_phone() })),
        StatusCode::OK,
    )
    .await;

    assert_eq!(body["message"], "OTP sent successfully");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_wrong_otp_is_rejected() {
    let body = expect_json(
        Client::new().post(api("/users/login")).json(&json!({
            "phone": unique_phone(),
            "role": "customer",
            "otp": "000000",
        })),
        StatusCode::UNAUTHORIZED,
    )
    .await;

    assert_eq!(body["message"], "Invalid OTP");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_first_login_creates_user() {
    let customer = Session::login(Role::Customer).await;

    assert_eq!(customer.user["name"], "New Customer");
    assert_eq!(customer.user["role"], "customer");
    assert!(!customer.token.is_empty());

    // Logging in again returns the same account
    let again = Session::login_with_phone(Role::Customer, &customer.phone).await;
    assert_eq!(again.id(), customer.id());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_phone_is_bound_to_one_role() {
    let staff = Session::login(Role::Staff).await;

    expect_json(
        Client::new().post(api("/users/login")).json(&json!({
            "phone": staff.phone,
            "role": "customer",
            "otp": otp_code(),
        })),
        StatusCode::CONFLICT,
    )
    .await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_profile_requires_token() {
    let body = expect_json(
        Client::new().get(api("/users/profile")),
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(body["message"], "Not authorized, no token");

    let body = expect_json(
        Client::new()
            .get(api("/users/profile"))
            .bearer_auth("not-a-token"),
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(body["message"], "Not authorized, token failed");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_update_profile() {
    let customer = Session::login(Role::Customer).await;

    let updated = expect_json(
        customer.put("/users/profile").json(&json!({
            "name": "Asha Patel",
            "address": "12 Dairy Lane",
        })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["name"], "Asha Patel");
    assert_eq!(updated["address"], "12 Dairy Lane");

    let profile = expect_json(customer.get("/users/profile"), StatusCode::OK).await;
    assert_eq!(profile["_id"], customer.user["_id"]);
    assert_eq!(profile["name"], "Asha Patel");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_staff_management() {
    let admin = Session::login(Role::Admin).await;
    let customer = Session::login(Role::Customer).await;

    let staff = expect_json(
        admin.post("/users/staff").json(&json!({
            "name": "Ravi",
            "phone": unique_phone(),
            "assignedArea": "North",
        })),
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(staff["role"], "staff");
    let id = staff["_id"].as_i64().unwrap();

    let list = expect_json(admin.get("/users/staff"), StatusCode::OK).await;
    assert!(list.as_array().unwrap().iter().any(|s| s["_id"] == id));

    expect_json(customer.get("/users/staff"), StatusCode::FORBIDDEN).await;

    let body = expect_json(admin.delete(&format!("/users/staff/{id}")), StatusCode::OK).await;
    assert_eq!(body["message"], "Staff member removed");

    expect_json(
        admin.delete(&format!("/users/staff/{id}")),
        StatusCode::NOT_FOUND,
    )
    .await;
}
