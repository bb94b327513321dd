use std::sync::Arc;

use axum::http::StatusCode;
use hogen_core::api::routes;
use serde_json::{Value, json};

mod support;
use support::{StubTranslator, spawn_app, spawn_default_app, test_config};

const KUMAMOTO_SENTENCES: [(&str, &str); 6] = [
    ("とても暑いです", "ばり暑か"),
    ("何をしているの", "なんばしよっと"),
    ("本当にそうだね", "ほんなこつそうたい"),
    ("早く来なさい", "はよ来なっせ"),
    ("疲れました", "きつかった"),
    ("いいですよ", "よかよ"),
];

#[tokio::test]
async fn kumamoto_batch_of_six_keeps_order() {
    let translator = Arc::new(StubTranslator::with_phrases(&KUMAMOTO_SENTENCES));
    let app = spawn_app(test_config(), translator.clone());
    let texts: Vec<&str> = KUMAMOTO_SENTENCES.iter().map(|(source, _)| *source).collect();

    let response = app
        .server
        .post(routes::translate::BATCH)
        .json(&json!({
            "texts": texts,
            "from": "standard",
            "to": "dialect",
            "dialect": "kumamoto",
        }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["success"], true);

    let data = &body["data"];
    assert_eq!(data["total_count"], 6);
    assert_eq!(data["success_count"], 6);
    assert_eq!(data["error_count"], 0);
    assert_eq!(data["dialect_code"], "kumamoto");
    assert_eq!(data["dialect_name"], "熊本弁");
    assert_eq!(data["from_type"], "standard");
    assert_eq!(data["to_type"], "dialect");

    let results = data["results"].as_array().expect("results array");
    assert_eq!(results.len(), 6);
    for (position, (result, (source, expected))) in
        results.iter().zip(KUMAMOTO_SENTENCES).enumerate()
    {
        assert_eq!(result["index"], position);
        assert_eq!(result["original_text"], source);
        assert_eq!(result["translated_text"], expected);
        assert_eq!(result["success"], true);
        assert!(result.get("error").is_none());
    }
    assert_eq!(translator.call_count(), 6);
}

#[tokio::test]
async fn failed_items_are_reported_in_place() {
    let app = spawn_default_app();

    let response = app
        .server
        .post(routes::translate::BATCH)
        .json(&json!({
            "texts": ["いち", "fail here", "さん"],
            "from": "dialect",
            "to": "standard",
            "dialect": "tohoku",
        }))
        .await;

    response.assert_status_ok();
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["success_count"], 2);
    assert_eq!(data["error_count"], 1);

    let failed = &data["results"][1];
    assert_eq!(failed["index"], 1);
    assert_eq!(failed["success"], false);
    assert!(failed.get("translated_text").is_none());
    assert!(
        failed["error"]
            .as_str()
            .is_some_and(|error| error.contains("could not translate"))
    );
    assert_eq!(data["results"][2]["success"], true);
}

#[tokio::test]
async fn batch_shape_errors_are_rejected_before_translation() {
    let translator = Arc::new(StubTranslator::default());
    let app = spawn_app(test_config(), translator.clone());

    let cases = [
        (json!({ "from": "standard", "to": "dialect", "dialect": "osaka" }), "Texts array is required"),
        (json!({ "texts": "not-an-array", "from": "standard", "to": "dialect", "dialect": "osaka" }), "Texts array is required"),
        (json!({ "texts": [], "from": "standard", "to": "dialect", "dialect": "osaka" }), "Texts array is empty"),
        (json!({ "texts": vec!["a"; 21], "from": "standard", "to": "dialect", "dialect": "osaka" }), "Too many texts"),
        (json!({ "texts": ["ok", 42], "from": "standard", "to": "dialect", "dialect": "osaka" }), "Invalid text in batch"),
        (json!({ "texts": ["ok", "  "], "from": "standard", "to": "dialect", "dialect": "osaka" }), "Invalid text in batch"),
        (json!({ "texts": ["ok"], "from": "dialect", "to": "dialect", "dialect": "osaka" }), "Source and target language types must differ"),
        (json!({ "texts": ["ok"], "from": "standard", "to": "dialect", "dialect": "tokyo" }), "Unsupported dialect"),
    ];

    for (payload, expected) in cases {
        let response = app.server.post(routes::translate::BATCH).json(&payload).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["error"], expected, "payload {payload}");
    }

    assert_eq!(translator.call_count(), 0);
}

#[tokio::test]
async fn twenty_items_is_the_ceiling() {
    let app = spawn_default_app();
    let texts: Vec<String> = (0..20).map(|i| format!("文{i}")).collect();

    let response = app
        .server
        .post(routes::translate::BATCH)
        .json(&json!({
            "texts": texts,
            "from": "standard",
            "to": "dialect",
            "dialect": "hokkaido",
        }))
        .await;

    response.assert_status_ok();
    let data = &response.json::<Value>()["data"];
    assert_eq!(data["total_count"], 20);
    let indices: Vec<u64> = data["results"]
        .as_array()
        .expect("results")
        .iter()
        .filter_map(|result| result["index"].as_u64())
        .collect();
    assert_eq!(indices, (0..20).collect::<Vec<u64>>());
}
