//! Delivery assignment and the status flow.
//!
//! Run with: `cargo test -p yadukul-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use reqwest::StatusCode;
use serde_json::{Value, json};

use yadukul_core::Role;
use yadukul_integration_tests::{Session, expect_json};

struct Route {
    admin: Session,
    staff: Session,
    customer: Session,
    delivery: Value,
}

impl Route {
    async fn assign() -> Self {
        let admin = Session::login(Role::Admin).await;
        let staff = Session::login(Role::Staff).await;
        let customer = Session::login(Role::Customer).await;

        let delivery = expect_json(
            admin.post("/deliveries").json(&json!({
                "customerId": customer.id(),
                "staffId": staff.id(),
                "address": "4 Gaushala Road",
            })),
            StatusCode::CREATED,
        )
        .await;

        Self {
            admin,
            staff,
            customer,
            delivery,
        }
    }

    fn path(&self, suffix: &str) -> String {
        format!("/deliveries/{}{suffix}", self.delivery["_id"])
    }

    async fn set_status(&self, who: &Session, status: &str, expected: StatusCode) -> Value {
        expect_json(
            who.put(&self.path("/status")).json(&json!({ "status": status })),
            expected,
        )
        .await
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_assignment_defaults() {
    let route = Route::assign().await;

    assert_eq!(route.delivery["status"], "Pending");
    assert_eq!(route.delivery["customerName"], "New Customer");

    for who in [&route.staff, &route.customer, &route.admin] {
        let list = expect_json(who.get("/deliveries"), StatusCode::OK).await;
        assert!(
            list.as_array()
                .unwrap()
                .iter()
                .any(|d| d["_id"] == route.delivery["_id"])
        );
    }
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_status_flow() {
    let route = Route::assign().await;

    let body = route
        .set_status(&route.staff, "Delivered", StatusCode::CONFLICT)
        .await;
    assert_eq!(
        body["message"],
        "Cannot change delivery status from Pending to Delivered"
    );

    let d = route
        .set_status(&route.staff, "Out for Delivery", StatusCode::OK)
        .await;
    assert_eq!(d["status"], "Out for Delivery");

    // Same status again is accepted unchanged
    route
        .set_status(&route.staff, "Out for Delivery", StatusCode::OK)
        .await;

    let d = route
        .set_status(&route.staff, "Delivered", StatusCode::OK)
        .await;
    assert_eq!(d["status"], "Delivered");

    route
        .set_status(&route.staff, "Pending", StatusCode::CONFLICT)
        .await;

    // Completed deliveries drop out of the active list
    let active = expect_json(route.staff.get("/deliveries?active=true"), StatusCode::OK).await;
    assert!(
        !active
            .as_array()
            .unwrap()
            .iter()
            .any(|d| d["_id"] == route.delivery["_id"])
    );
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_only_assigned_staff_can_update() {
    let route = Route::assign().await;
    let other = Session::login(Role::Staff).await;

    let body = route
        .set_status(&other, "Out for Delivery", StatusCode::FORBIDDEN)
        .await;
    assert_eq!(body["message"], "Not authorized to update this delivery");

    route
        .set_status(&route.customer, "Out for Delivery", StatusCode::FORBIDDEN)
        .await;

    // Admins may update any delivery
    route
        .set_status(&route.admin, "Out for Delivery", StatusCode::OK)
        .await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_proof_and_removal() {
    let route = Route::assign().await;

    let d = expect_json(
        route
            .staff
            .put(&route.path("/proof"))
            .json(&json!({ "proofImageUrl": "/uploads/proof.jpg" })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(d["proofImageUrl"], "/uploads/proof.jpg");

    let csv = route
        .admin
        .get("/deliveries/export")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(csv.contains("4 Gaushala Road"));

    expect_json(route.admin.delete(&route.path("")), StatusCode::OK).await;
    let body = expect_json(
        route.staff.put(&route.path("/status")).json(&json!({ "status": "Out for Delivery" })),
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(body["message"], "Delivery not found");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_assign_to_non_staff_is_rejected() {
    let admin = Session::login(Role::Admin).await;
    let customer = Session::login(Role::Customer).await;

    let body = expect_json(
        admin.post("/deliveries").json(&json!({
            "customerId": customer.id(),
            "staffId": customer.id(),
            "address": "Nowhere",
        })),
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(body["message"], "Staff member not found");
}
