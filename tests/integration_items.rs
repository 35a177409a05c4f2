mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{response_json, setup_test_app};
use serde_json::json;
use tower::ServiceExt;

#[tokio::test]
async fn test_create_item_without_restaurant_context_is_unauthorized() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/item")
        .header("content-type", "application/json")
        .body(Body::from(
            serde_json::to_string(&json!({ "name": "Beef pho", "price": 55000 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = response_json(response).await;
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "restaurant_context_missing");
}

#[tokio::test]
async fn test_create_item_with_malformed_context_is_unauthorized() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/item")
        .header("content-type", "application/json")
        .header("x-restaurant-id", "not-a-uuid")
        .body(Body::from(
            serde_json::to_string(&json!({ "name": "Beef pho", "price": 55000 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_create_item_negative_price_fails_validation() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/item")
        .header("content-type", "application/json")
        .header("x-restaurant-id", uuid::Uuid::new_v4().to_string())
        .body(Body::from(
            serde_json::to_string(&json!({ "name": "Beef pho", "price": -1 })).unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = response_json(response).await;
    assert_eq!(body["status"], false);
    assert_eq!(body["message"], "price must not be negative");
}

#[tokio::test]
async fn test_create_item_rejects_restaurant_id_in_body() {
    let app = setup_test_app();

    let request = Request::builder()
        .method("POST")
        .uri("/api/item")
        .header("content-type", "application/json")
        .header("x-restaurant-id", uuid::Uuid::new_v4().to_string())
        .body(Body::from(
            serde_json::to_string(&json!({
                "name": "Beef pho",
                "price": 55000,
                "restaurant_id": uuid::Uuid::new_v4()
            }))
            .unwrap(),
        ))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
