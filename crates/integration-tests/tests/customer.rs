//! Orders, payments and subscriptions.
//!
//! Run with: `cargo test -p yadukul-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use yadukul_core::Role;
use yadukul_integration_tests::{Session, create_product, expect_json};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_order_pay_flow() {
    let admin = Session::login(Role::Admin).await;
    let customer = Session::login(Role::Customer).await;
    let milk = create_product(&admin, &format!("Milk {}", Uuid::new_v4()), 60.0).await;
    let ghee = create_product(&admin, &format!("Ghee {}", Uuid::new_v4()), 550.0).await;

    let order = expect_json(
        customer.post("/orders").json(&json!({
            "items": [
                { "productId": milk["_id"], "quantity": 2 },
                { "productId": ghee["_id"], "quantity": 1 },
            ]
        })),
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(order["totalAmount"], 670.0);
    assert_eq!(order["status"], "Pending");
    assert_eq!(order["items"][0]["price"], 60.0);

    let balance = expect_json(customer.get("/orders/balance"), StatusCode::OK).await;
    assert_eq!(balance["outstanding"], 670.0);

    let path = format!("/orders/{}/pay", order["_id"]);

    // Only the owner pays
    let stranger = Session::login(Role::Customer).await;
    expect_json(stranger.post(&path), StatusCode::FORBIDDEN).await;

    let paid = expect_json(customer.post(&path), StatusCode::OK).await;
    assert_eq!(paid["status"], "Paid");
    assert!(paid["paidAt"].is_string());

    let body = expect_json(customer.post(&path), StatusCode::CONFLICT).await;
    assert_eq!(body["message"], "Order already paid");

    let profile = expect_json(customer.get("/users/profile"), StatusCode::OK).await;
    assert_eq!(profile["loyaltyPoints"], 6);

    let balance = expect_json(customer.get("/orders/balance"), StatusCode::OK).await;
    assert_eq!(balance["outstanding"], 0.0);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_order_validation() {
    let customer = Session::login(Role::Customer).await;

    let body = expect_json(
        customer.post("/orders").json(&json!({ "items": [] })),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["message"], "Order must contain at least one item");

    expect_json(
        customer.post("/orders").json(&json!({
            "items": [{ "productId": i32::MAX, "quantity": 1 }]
        })),
        StatusCode::BAD_REQUEST,
    )
    .await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_orders_are_scoped_to_customer() {
    let admin = Session::login(Role::Admin).await;
    let customer = Session::login(Role::Customer).await;
    let staff = Session::login(Role::Staff).await;
    let curd = create_product(&admin, &format!("Curd {}", Uuid::new_v4()), 40.0).await;

    let order = expect_json(
        customer.post("/orders").json(&json!({
            "items": [{ "productId": curd["_id"], "quantity": 1 }]
        })),
        StatusCode::CREATED,
    )
    .await;

    let other = Session::login(Role::Customer).await;
    let theirs = expect_json(other.get("/orders"), StatusCode::OK).await;
    assert!(theirs.as_array().unwrap().is_empty());

    let all = expect_json(admin.get("/orders"), StatusCode::OK).await;
    assert!(all.as_array().unwrap().iter().any(|o| o["_id"] == order["_id"]));

    expect_json(staff.get("/orders"), StatusCode::FORBIDDEN).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_subscription_toggle_and_cancel() {
    let admin = Session::login(Role::Admin).await;
    let customer = Session::login(Role::Customer).await;
    let milk = create_product(&admin, &format!("Milk {}", Uuid::new_v4()), 60.0).await;

    let sub = expect_json(
        customer.post("/subscriptions").json(&json!({
            "productId": milk["_id"],
            "quantity": "1 L",
            "frequency": "Alternate Days",
        })),
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(sub["status"], "Active");
    assert_eq!(sub["productName"], milk["name"]);
    assert!(sub["nextDelivery"].is_string());

    let path = format!("/subscriptions/{}", sub["_id"]);

    let stranger = Session::login(Role::Customer).await;
    expect_json(
        stranger.put(&path).json(&json!({ "action": "toggle" })),
        StatusCode::FORBIDDEN,
    )
    .await;

    let paused = expect_json(
        customer.put(&path).json(&json!({ "action": "toggle" })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(paused["status"], "Paused");

    let resumed = expect_json(
        customer.put(&path).json(&json!({ "action": "toggle" })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(resumed["status"], "Active");

    let body = expect_json(
        customer.put(&path).json(&json!({ "action": "cancel" })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(body["message"], "Subscription cancelled");

    let list = expect_json(customer.get("/subscriptions"), StatusCode::OK).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_subscribe_to_unknown_product() {
    let customer = Session::login(Role::Customer).await;

    let body = expect_json(
        customer.post("/subscriptions").json(&json!({
            "productId": i32::MAX,
            "quantity": "500 ml",
            "frequency": "Daily",
        })),
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(body["message"], "Product not found");
}
