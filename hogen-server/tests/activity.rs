use hogen_core::api::routes;
use serde_json::{Value, json};

mod support;
use support::spawn_default_app;

#[tokio::test]
async fn self_ping_leaves_activity_untouched() {
    let app = spawn_default_app();
    let before = app.state.activity.snapshot();

    for _ in 0..3 {
        app.server.get(routes::KEEP_ALIVE).await.assert_status_ok();
    }

    let after = app.state.activity.snapshot();
    assert_eq!(after.activity_count, before.activity_count);
    assert_eq!(after.last_activity_at, before.last_activity_at);
}

#[tokio::test]
async fn organic_requests_count_once_each() {
    let app = spawn_default_app();
    let start = app.state.activity.snapshot().activity_count;

    app.server.get(routes::DIALECTS).await.assert_status_ok();
    assert_eq!(app.state.activity.snapshot().activity_count, start + 1);

    app.server
        .post(routes::translate::SINGLE)
        .json(&json!({
            "text": "ありがとう",
            "from": "standard",
            "to": "dialect",
            "dialect": "kagoshima",
        }))
        .await
        .assert_status_ok();
    assert_eq!(app.state.activity.snapshot().activity_count, start + 2);

    app.server.get("/no/such/route").await;
    assert_eq!(app.state.activity.snapshot().activity_count, start + 3);
}

#[tokio::test]
async fn keep_alive_reports_current_activity() {
    let app = spawn_default_app();
    app.server.get(routes::HEALTH).await.assert_status_ok();

    let response = app.server.get(routes::KEEP_ALIVE).await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "alive");
    assert_eq!(body["activity_count"], 1);
    assert!(body["last_activity_at"].is_string());
    assert!(body["uptime_seconds"].is_u64());
}
