//! Integration tests for the dashboard summary.

mod common;

use coflow_core::status::ChangeOrderStatus;
use coflow_db::Store;
use common::{body_json, build_test_app, get, seed_change_order, seed_project};

#[tokio::test]
async fn empty_dashboard() {
    let app = build_test_app();

    let json = body_json(get(&app, "/api/v1/dashboard").await).await;
    assert_eq!(json["data"]["project_count"], 0);
    assert_eq!(json["data"]["change_order_count"], 0);
    assert_eq!(json["data"]["pending_change_order_count"], 0);
    assert!(json["data"]["recent_change_orders"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn counts_and_five_most_recent() {
    let app = build_test_app();
    let a = seed_project(&app, "24-118", "Tower A").await;
    let b = seed_project(&app, "24-119", "Tower B").await;

    let mut ids = Vec::new();
    for i in 1..=7 {
        let project = if i % 2 == 0 { a.id } else { b.id };
        ids.push(seed_change_order(&app, project, &format!("CO-{i}")).await.id);
    }
    for id in &ids[..2] {
        app.store
            .set_change_order_status(*id, ChangeOrderStatus::Pending)
            .await
            .unwrap();
    }

    let json = body_json(get(&app, "/api/v1/dashboard").await).await;
    let data = &json["data"];
    assert_eq!(data["project_count"], 2);
    assert_eq!(data["change_order_count"], 7);
    assert_eq!(data["pending_change_order_count"], 2);

    let recent: Vec<&str> = data["recent_change_orders"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["co_number"].as_str().unwrap())
        .collect();
    assert_eq!(recent, vec!["CO-7", "CO-6", "CO-5", "CO-4", "CO-3"]);
    assert_eq!(data["recent_change_orders"][0]["project_name"], "Tower B");
}
