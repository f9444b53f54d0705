//! Products, gallery, settings and uploads.
//!
//! Run with: `cargo test -p yadukul-integration-tests -- --ignored`

#![allow(clippy::unwrap_used)]

use reqwest::{Client, StatusCode, multipart};
use serde_json::json;
use uuid::Uuid;

use yadukul_core::Role;
use yadukul_integration_tests::{Session, api, base_url, create_product, expect_json};

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_product_lifecycle() {
    let admin = Session::login(Role::Admin).await;
    let name = format!("Test Milk {}", Uuid::new_v4());

    let product = create_product(&admin, &name, 60.0).await;
    let id = product["_id"].as_i64().unwrap();
    assert_eq!(product["rating"], 0.0);

    // Creating invalidates the cached list
    let list = expect_json(
        Client::new().get(api("/products?category=Milk")),
        StatusCode::OK,
    )
    .await;
    assert!(list.as_array().unwrap().iter().any(|p| p["_id"] == id));

    let updated = expect_json(
        admin.put(&format!("/products/{id}")).json(&json!({
            "name": name,
            "category": "Milk",
            "price": 65.5,
            "imageUrl": "/uploads/test-milk.jpg",
            "origin": "Test farm",
            "nutrition": "Fat 3.5%",
            "rating": 4.8
        })),
        StatusCode::OK,
    )
    .await;
    assert_eq!(updated["price"], 65.5);

    let csv = admin
        .get("/products/export")
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(csv.starts_with("ID,Name,Category"));
    assert!(csv.contains(&name));

    let body = expect_json(admin.delete(&format!("/products/{id}")), StatusCode::OK).await;
    assert_eq!(body["message"], "Product removed");

    let body = expect_json(
        Client::new().get(api(&format!("/products/{id}"))),
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(body["message"], "Product not found");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_customer_cannot_write_products() {
    let customer = Session::login(Role::Customer).await;

    let body = expect_json(
        customer.post("/products").json(&json!({
            "name": "Sneaky Ghee",
            "category": "Ghee",
            "price": 1.0,
            "imageUrl": "x",
            "origin": "x",
            "nutrition": "x"
        })),
        StatusCode::FORBIDDEN,
    )
    .await;
    assert_eq!(body["message"], "Not authorized as an admin");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_invalid_product_is_rejected() {
    let admin = Session::login(Role::Admin).await;

    expect_json(
        admin.post("/products").json(&json!({
            "name": "Negative Paneer",
            "category": "Paneer",
            "price": -5.0,
            "imageUrl": "x",
            "origin": "x",
            "nutrition": "x"
        })),
        StatusCode::BAD_REQUEST,
    )
    .await;
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_gallery() {
    let admin = Session::login(Role::Admin).await;

    let image = expect_json(
        admin.post("/gallery").json(&json!({
            "src": "/uploads/cows.jpg",
            "alt": "Cows grazing",
            "aspect": "wide",
        })),
        StatusCode::CREATED,
    )
    .await;
    let id = image["_id"].as_i64().unwrap();

    let list = expect_json(Client::new().get(api("/gallery")), StatusCode::OK).await;
    assert!(list.as_array().unwrap().iter().any(|i| i["_id"] == id));

    expect_json(admin.delete(&format!("/gallery/{id}")), StatusCode::OK).await;
    let body = expect_json(admin.delete(&format!("/gallery/{id}")), StatusCode::NOT_FOUND).await;
    assert_eq!(body["message"], "Image not found");
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_settings() {
    let admin = Session::login(Role::Admin).await;
    let logo = format!("/uploads/logo-{}.png", Uuid::new_v4());

    expect_json(
        admin.put("/settings").json(&json!({ "logoUrl": logo })),
        StatusCode::OK,
    )
    .await;

    let settings = expect_json(Client::new().get(api("/settings")), StatusCode::OK).await;
    assert_eq!(settings["logoUrl"], logo);
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_upload_and_serve_image() {
    let customer = Session::login(Role::Customer).await;
    // Minimal PNG signature plus padding
    let png = [
        0x89, b'P', b'N', b'G', 0x0d, 0x0a, 0x1a, 0x0a, 0, 0, 0, 0x0d, b'I', b'H', b'D', b'R',
    ];

    let part = multipart::Part::bytes(png.to_vec())
        .file_name("avatar.png")
        .mime_str("image/png")
        .unwrap();
    let form = multipart::Form::new().part("image", part);

    let body = expect_json(customer.post("/upload").multipart(form), StatusCode::OK).await;
    assert_eq!(body["message"], "Image uploaded successfully");

    let url = body["url"].as_str().unwrap();
    assert!(url.contains("/uploads/"));

    // Relative unless YADUKUL_PUBLIC_URL is set
    let absolute = if url.starts_with('/') {
        format!("{}{url}", base_url())
    } else {
        url.to_owned()
    };
    let served = Client::new()
        .get(absolute)
        .send()
        .await
        .unwrap();
    assert_eq!(served.status(), StatusCode::OK);
    assert_eq!(served.bytes().await.unwrap().as_ref(), png.as_slice());
}

#[tokio::test]
#[ignore = "Requires running storefront server"]
async fn test_upload_without_image_field() {
    let customer = Session::login(Role::Customer).await;
    let form = multipart::Form::new().text("caption", "no file here");

    expect_json(
        customer.post("/upload").multipart(form),
        StatusCode::BAD_REQUEST,
    )
    .await;
}
