//! Inventory, milk intake, conversion logs and the dashboard.
//!
//! Run with: `cargo test -p yadukul-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::json;
use uuid::Uuid;

use yadukul_core::Role;
use yadukul_integration_tests::{Session, expect_json};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_inventory_lifecycle() {
    let admin = Session::login(Role::Admin).await;
    let name = format!("Packaging film {}", Uuid::new_v4());

    let item = expect_json(
        admin.post("/inventory").json(&json!({
            "name": name,
            "type": "Raw Material",
            "quantity": 12.5,
            "unit": "kg",
        })),
        StatusCode::CREATED,
    )
    .await;
    let path = format!("/inventory/{}", item["_id"]);

    let item = expect_json(
        admin.put(&path).json(&json!({ "quantity": 3.0 })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(item["quantity"], 3.0);

    let body = expect_json(
        admin.put(&path).json(&json!({ "quantity": -1.0 })),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert!(body["message"].is_string());

    let csv = admin
        .get("/inventory/export")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(csv.contains(&name));

    let body = expect_json(admin.delete(&path), StatusCode::OK).await;
    assert_eq!(body["message"], "Inventory item removed");
    expect_json(admin.delete(&path), StatusCode::NOT_FOUND).await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_conversion_logs() {
    let admin = Session::login(Role::Admin).await;

    let intake = expect_json(
        admin
            .post("/conversion/intake")
            .json(&json!({ "type": "Buffalo", "quantityLiters": 40.0 })),
        StatusCode::CREATED,
    )
    .await;
    assert_eq!(intake["type"], "Buffalo");

    let log = expect_json(
        admin.post("/conversion/logs").json(&json!({
            "productName": "Paneer",
            "quantityProduced": 8.0,
            "unit": "kg",
            "milkUsed": { "buffaloLiters": 40.0 },
        })),
        StatusCode::CREATED,
    )
    .await;

    let logs = expect_json(admin.get("/conversion/logs"), StatusCode::OK).await;
    assert!(logs.as_array().unwrap().iter().any(|l| l["_id"] == log["_id"]));

    let intakes = expect_json(admin.get("/conversion/intake"), StatusCode::OK).await;
    assert!(
        intakes
            .as_array()
            .unwrap()
            .iter()
            .any(|l| l["_id"] == intake["_id"])
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_dashboard_is_admin_only() {
    let admin = Session::login(Role::Admin).await;
    let staff = Session::login(Role::Staff).await;

    let stats = expect_json(admin.get("/dashboard"), StatusCode::OK).await;
    assert!(stats["totalProducts"].is_number());
    assert!(stats["monthlyRevenue"].is_array());

    expect_json(staff.get("/dashboard"), StatusCode::FORBIDDEN).await;
}
