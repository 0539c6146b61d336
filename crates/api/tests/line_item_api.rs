//! Integration tests for line-item form actions.

mod common;

use coflow_db::Store;
use common::{
    build_test_app, post_form, post_raw, redirected, seed_change_order, seed_project, TestApp,
};

async fn setup() -> (TestApp, uuid::Uuid) {
    let app = build_test_app();
    let project = seed_project(&app, "24-118", "Tower A").await;
    let co = seed_change_order(&app, project.id, "CO-1").await;
    (app, co.id)
}

// ---------------------------------------------------------------------------
// Add
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_computes_missing_total() {
    let (app, co_id) = setup().await;

    let response = post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items"),
        &[
            ("description", "Tempered lite"),
            ("quantity", "3"),
            ("unit", "ea"),
            ("unit_price", "10.5"),
            ("total_price", ""),
        ],
    )
    .await;

    let flash = redirected(&response);
    assert_eq!(flash.path, format!("/change-orders/{co_id}"));
    assert_eq!(flash.message, "Line item added");

    let items = app.store.list_line_items(co_id).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].total_price, Some(31.5));
    assert_eq!(items[0].sort_order, Some(1));
}

#[tokio::test]
async fn add_without_amounts_persists_zero() {
    let (app, co_id) = setup().await;

    post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items"),
        &[("description", "Site visit"), ("quantity", "two")],
    )
    .await;

    let items = app.store.list_line_items(co_id).await.unwrap();
    assert_eq!(items[0].quantity, None);
    assert_eq!(items[0].total_price, Some(0.0));
}

#[tokio::test]
async fn add_without_form_body_is_error_flash() {
    let (app, co_id) = setup().await;

    let response = post_raw(
        &app,
        &format!("/actions/change-orders/{co_id}/items"),
        None,
        "description=Glass",
    )
    .await;

    let flash = redirected(&response);
    assert_eq!(flash.path, format!("/change-orders/{co_id}"));
    assert_eq!(flash.kind, "error");
    assert!(app.store.list_line_items(co_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_overflowing_product_persists_zero() {
    let (app, co_id) = setup().await;

    let response = post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items"),
        &[("description", "Bulk glass"), ("quantity", "1e200"), ("unit_price", "1e200")],
    )
    .await;

    assert_eq!(redirected(&response).kind, "success");
    let items = app.store.list_line_items(co_id).await.unwrap();
    assert_eq!(items[0].quantity, Some(1e200));
    assert_eq!(items[0].total_price, Some(0.0));
}

#[tokio::test]
async fn add_requires_description() {
    let (app, co_id) = setup().await;

    let response = post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items"),
        &[("description", "  "), ("quantity", "1")],
    )
    .await;

    let flash = redirected(&response);
    assert_eq!(flash.kind, "error");
    assert_eq!(flash.message, "Description is required");
    assert!(app.store.list_line_items(co_id).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_to_missing_change_order_is_error() {
    let app = build_test_app();
    let co_id = uuid::Uuid::new_v4();

    let response = post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items"),
        &[("description", "Lite")],
    )
    .await;
    let flash = redirected(&response);
    assert_eq!(flash.kind, "error");
    assert_eq!(flash.message, "Referenced change order does not exist");
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_quantity_recomputes_from_stored_price() {
    let (app, co_id) = setup().await;
    post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items"),
        &[("description", "Lite"), ("quantity", "3"), ("unit_price", "10.5")],
    )
    .await;
    let item = app.store.list_line_items(co_id).await.unwrap().remove(0);

    let response = post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items/{}", item.id),
        &[("quantity", "5")],
    )
    .await;
    assert_eq!(redirected(&response).message, "Line item updated");

    let stored = app.store.get_line_item(item.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, Some(5.0));
    assert_eq!(stored.unit_price, Some(10.5));
    assert_eq!(stored.total_price, Some(52.5));
    assert_eq!(stored.description, "Lite");
}

#[tokio::test]
async fn update_explicit_total_wins() {
    let (app, co_id) = setup().await;
    post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items"),
        &[("description", "Lite"), ("quantity", "3"), ("unit_price", "10.5")],
    )
    .await;
    let item = app.store.list_line_items(co_id).await.unwrap().remove(0);

    post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items/{}", item.id),
        &[("quantity", "5"), ("total_price", "40")],
    )
    .await;

    let stored = app.store.get_line_item(item.id).await.unwrap().unwrap();
    assert_eq!(stored.total_price, Some(40.0));
}

#[tokio::test]
async fn item_of_another_change_order_is_not_found() {
    let (app, co_id) = setup().await;
    let project = app.store.list_projects(&Default::default()).await.unwrap().remove(0);
    let other = seed_change_order(&app, project.id, "CO-2").await;
    post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items"),
        &[("description", "Lite"), ("quantity", "1"), ("unit_price", "5")],
    )
    .await;
    let item = app.store.list_line_items(co_id).await.unwrap().remove(0);

    let response = post_form(
        &app,
        &format!("/actions/change-orders/{}/items/{}", other.id, item.id),
        &[("quantity", "9")],
    )
    .await;
    let flash = redirected(&response);
    assert_eq!(flash.path, format!("/change-orders/{}", other.id));
    assert_eq!(flash.kind, "error");
    assert_eq!(flash.message, format!("Line item with id {} not found", item.id));

    let response = post_form(
        &app,
        &format!("/actions/change-orders/{}/items/{}/delete", other.id, item.id),
        &[],
    )
    .await;
    assert_eq!(redirected(&response).kind, "error");

    let stored = app.store.get_line_item(item.id).await.unwrap().unwrap();
    assert_eq!(stored.quantity, Some(1.0));
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_removes_item() {
    let (app, co_id) = setup().await;
    post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items"),
        &[("description", "Lite")],
    )
    .await;
    let item = app.store.list_line_items(co_id).await.unwrap().remove(0);

    let response = post_form(
        &app,
        &format!("/actions/change-orders/{co_id}/items/{}/delete", item.id),
        &[],
    )
    .await;
    let flash = redirected(&response);
    assert_eq!(flash.path, format!("/change-orders/{co_id}"));
    assert_eq!(flash.message, "Line item deleted");
    assert!(app.store.list_line_items(co_id).await.unwrap().is_empty());
}
