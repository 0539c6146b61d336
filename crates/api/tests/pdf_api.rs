//! Integration tests for the change-order PDF download.

mod common;

use axum::http::{header, StatusCode};
use coflow_db::models::line_item::CreateLineItem;
use coflow_db::Store;
use common::{body_bytes, body_json, build_test_app, get, seed_change_order, seed_project};

#[tokio::test]
async fn pdf_is_an_attachment() {
    let app = build_test_app();
    let project = seed_project(&app, "24-118", "Tower A").await;
    let co = seed_change_order(&app, project.id, "CO-7").await;
    for i in 0..3 {
        app.store
            .create_line_item(&CreateLineItem {
                change_order_id: co.id,
                description: format!("Lite {i}"),
                quantity: Some(2.0),
                unit: Some("ea".into()),
                unit_price: Some(100.0),
                total_price: Some(200.0),
                sort_order: None,
            })
            .await
            .unwrap();
    }

    let response = get(&app, &format!("/api/v1/change-orders/{}/pdf", co.id)).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "application/pdf");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"change-order-CO-7.pdf\""
    );

    let bytes = body_bytes(response).await;
    assert!(bytes.starts_with(b"%PDF-"));
    let doc = lopdf::Document::load_mem(&bytes).unwrap();
    assert_eq!(doc.get_pages().len(), 1);
}

#[tokio::test]
async fn pdf_for_unknown_change_order_is_404() {
    let app = build_test_app();
    let id = uuid::Uuid::new_v4();

    let response = get(&app, &format!("/api/v1/change-orders/{id}/pdf")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["error"], format!("Change order with id {id} not found"));
}
