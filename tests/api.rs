mod common;

use axum::http::StatusCode;
use common::{app_at, empty_app, seeded_app, send, send_raw, ScriptedModel};
use serde_json::json;
use smartrate_rust::AiError;

fn no_model() -> std::sync::Arc<ScriptedModel> {
    ScriptedModel::new(|_| Err(AiError::EmptyResponse))
}

#[tokio::test]
async fn health() {
    let t = seeded_app(no_model());
    let (status, body) = send_raw(&t.app, "GET", "/health", "").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"OK");
}

#[tokio::test]
async fn search_catalog() {
    let t = seeded_app(no_model());
    let (status, body) = send(&t.app, "GET", "/api/catalog?q=canopy", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert!(!items.is_empty());
    assert!(items.iter().all(|i| {
        i["source"].as_str().unwrap().to_lowercase().contains("canopy")
            || i["name"].as_str().unwrap().to_lowercase().contains("canopy")
    }));
}

#[tokio::test]
async fn flat_estimate_prices_by_exact_name() {
    let t = seeded_app(no_model());
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/estimate",
        Some(json!({"items": [
            {"item": "tmt steel fe500d", "unit": "kg", "quantity": 100, "estimatedScope": "rebar"},
            {"item": "Unobtainium rod", "unit": "each", "quantity": 5, "estimatedScope": ""}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["lines"][0]["lineTotal"], "7524.00");
    assert_eq!(data["lines"][1]["lineTotal"], "0");
    assert_eq!(data["total"], "7524.00");
    // 纯本地计算, 不调用外部能力
    assert_eq!(t.model.calls(), 0);
}

#[tokio::test]
async fn facility_estimate_sums_subtotals() {
    let t = seeded_app(no_model());
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/estimate/facility",
        Some(json!({"groups": [
            {"facility": "Canopy", "items": [
                {"item": "Ridge sheet", "unit": "m", "quantity": 10, "estimatedScope": ""}
            ]},
            {"facility": "Kerb Wall", "items": [
                {"item": "Cement primer", "unit": "m²", "quantity": 100, "estimatedScope": ""}
            ]}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let data = &body["data"];
    assert_eq!(data["facilities"][0]["facility"], "Canopy");
    assert_eq!(data["facilities"][0]["subtotal"], "3751.00");
    assert_eq!(data["facilities"][1]["subtotal"], "5407.00");
    assert_eq!(data["grandTotal"], "9158.00");
}

#[tokio::test]
async fn add_edit_delete_persist() {
    let t = seeded_app(no_model());
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/catalog",
        Some(json!({"name": "Unobtainium rod", "unit": "each", "rate": 12.5,
                    "scopeOfWork": "rare", "source": "Miscellaneous"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (_, body) = send(
        &t.app,
        "POST",
        "/api/estimate",
        Some(json!({"items": [{"item": "unobtainium rod", "unit": "each", "quantity": 4, "estimatedScope": ""}]})),
    )
    .await;
    assert_eq!(body["data"]["total"], "50.0");

    let (status, body) = send(
        &t.app,
        "PUT",
        &format!("/api/catalog/{}", id),
        Some(json!({"name": "Unobtainium rod", "unit": "each", "rate": 20,
                    "scopeOfWork": "rare", "source": "Miscellaneous"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, _) = send(&t.app, "DELETE", &format!("/api/catalog/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&t.app, "DELETE", &format!("/api/catalog/{}", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // 删除后不再匹配
    let (_, body) = send(
        &t.app,
        "POST",
        "/api/estimate",
        Some(json!({"items": [{"item": "Unobtainium rod", "unit": "each", "quantity": 4, "estimatedScope": ""}]})),
    )
    .await;
    assert_eq!(body["data"]["total"], "0");

    let saved = std::fs::read_to_string(t.dir.path().join("rates.json")).unwrap();
    assert!(!saved.contains("Unobtainium"));
}

#[tokio::test]
async fn invalid_item_rejected() {
    let t = seeded_app(no_model());
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/catalog",
        Some(json!({"name": " ", "unit": "m", "rate": 1, "scopeOfWork": "", "source": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn restore_rejects_non_array_without_mutation() {
    let t = seeded_app(no_model());
    let before = t.state.store.read().await.len();

    let (status, _) = send_raw(&t.app, "POST", "/api/catalog/restore", r#"{"items": []}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(t.state.store.read().await.len(), before);

    let backup = r#"[{"id": "x1", "name": "WMM", "unit": "m³", "rate": 2379.99,
                      "scopeOfWork": "base", "source": "Driveway Works", "timestamp": 1700000000000}]"#;
    let (status, _) = send_raw(&t.app, "POST", "/api/catalog/restore", backup).await;
    assert_eq!(status, StatusCode::OK);
    let store = t.state.store.read().await;
    assert_eq!(store.len(), 1);
    assert_eq!(store.items()[0].id, "x1");
}

#[tokio::test]
async fn catalog_csv_download() {
    let t = seeded_app(no_model());
    let (status, body) = send_raw(&t.app, "GET", "/api/catalog/export.csv", "").await;
    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    assert!(text.starts_with("\u{feff}\"Item Name\",\"Unit\""));
    assert!(text.contains("\"TMT steel Fe500D\",\"kg\",\"75.24\""));
}

#[tokio::test]
async fn tender_quote_uses_semantic_fallback() {
    let model = ScriptedModel::new(|req| {
        if req.prompt.starts_with("Extract items") {
            Ok(json!([
                {"name": "TMT STEEL FE500D", "quantity": 100, "requestedScope": "rebar"},
                {"name": "tyre inflator (digital)", "quantity": 1, "requestedScope": "air"}
            ]))
        } else {
            // 取候选列表中 "Digital tyre inflator" 的 id
            let listing = req.prompt.split("Available Database Items:\n").nth(1).unwrap();
            let listing = listing.split("\n\n").next().unwrap();
            let candidates: Vec<serde_json::Value> = serde_json::from_str(listing).unwrap();
            let hit = candidates
                .iter()
                .find(|c| c["name"] == "Digital tyre inflator")
                .unwrap();
            Ok(json!({"id": hit["id"]}))
        }
    });
    let t = seeded_app(model);
    let (status, body) = send(&t.app, "POST", "/api/tender", Some(json!({"text": "100kg rebar, 1 inflator"}))).await;
    assert_eq!(status, StatusCode::OK);
    let lines = body["data"]["lines"].as_array().unwrap();
    assert_eq!(lines[0]["status"], "matched");
    assert_eq!(lines[1]["matched"]["name"], "Digital tyre inflator");
    assert_eq!(body["data"]["total"], "60268.53");
    assert_eq!(t.model.calls(), 2);
}

#[tokio::test]
async fn tender_on_empty_catalog_rejected() {
    let t = empty_app(no_model());
    let (status, _) = send(&t.app, "POST", "/api/tender", Some(json!({"text": "anything"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(t.model.calls(), 0);
}

#[tokio::test]
async fn analysis_failure_is_bad_gateway() {
    let t = seeded_app(no_model());
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/analysis",
        Some(json!({"image": "data:image/jpeg;base64,YWJj", "workType": "repair"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn analysis_flat_bom_priced() {
    let model = ScriptedModel::new(|_| {
        Ok(json!({
            "summary": "Driveway pavers cracked",
            "problems": [{"category": "Civil", "description": "cracked pavers", "severity": "High"}],
            "bom": [{"item": "M40 pavers 80 mm", "unit": "m²", "quantity": 10, "estimatedScope": "relay"}]
        }))
    });
    let t = seeded_app(model);
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/analysis",
        Some(json!({"image": "YWJj", "mimeType": "image/png"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let estimate = &body["data"]["estimate"];
    assert_eq!(estimate["kind"], "flat");
    assert_eq!(estimate["total"], "10091.80");
    assert_eq!(body["data"]["problems"][0]["severity"], "High");
}

#[tokio::test]
async fn parse_rates_commit_adds_items() {
    let model = ScriptedModel::new(|_| {
        Ok(json!([{"name": "Fire extinguisher 9 kg", "unit": "each", "rate": 4200,
                   "scopeOfWork": "ABC type", "source": "Safety"}]))
    });
    let t = empty_app(model);
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/catalog/parse",
        Some(json!({"text": "Fire extinguisher 9kg ABC Rs 4200 each", "commit": true})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["name"], "Fire extinguisher 9 kg");
    assert_eq!(t.state.store.read().await.len(), 1);
}

#[tokio::test]
async fn estimate_rejects_non_positive_quantity() {
    let t = seeded_app(no_model());
    let (status, body) = send(
        &t.app,
        "POST",
        "/api/estimate",
        Some(json!({"items": [
            {"item": "TMT Steel Fe500D", "unit": "kg", "quantity": -3, "estimatedScope": ""}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    let (status, _) = send(
        &t.app,
        "POST",
        "/api/estimate/facility",
        Some(json!({"groups": [
            {"facility": "Canopy", "items": [
                {"item": "Ridge sheet", "unit": "m", "quantity": 10, "estimatedScope": ""},
                {"item": "Flashing sheet", "unit": "m", "quantity": 0, "estimatedScope": ""}
            ]}
        ]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn failed_save_leaves_catalog_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    // 父路径是普通文件, 写盘必然失败
    let blocker = dir.path().join("blocker");
    std::fs::write(&blocker, "").unwrap();
    let t = app_at(blocker.join("rates.json"), no_model());

    let (status, body) = send(
        &t.app,
        "POST",
        "/api/catalog",
        Some(json!({"name": "Unobtainium rod", "unit": "each", "rate": 12.5,
                    "scopeOfWork": "rare", "source": "Miscellaneous"})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);

    let (status, body) = send(&t.app, "GET", "/api/catalog", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 0);

    let backup = r#"[{"id": "x1", "name": "WMM", "unit": "m³", "rate": "2379.99",
                      "scopeOfWork": "base", "source": "Driveway Works", "timestamp": 1700000000000}]"#;
    let (status, _) = send_raw(&t.app, "POST", "/api/catalog/restore", backup).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(t.state.store.read().await.is_empty());
}
