use axum::http::{self, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use mock_server::app;
use serde_json::{json, Value};
use tower::ServiceExt;

const MANAGE: &str = "/ajax/manage_ymm.php";

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn get_request(uri: &str) -> Request<String> {
    Request::builder().uri(uri).body(String::new()).unwrap()
}

fn json_request(uri: &str, body: Value) -> Request<String> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn fields(values: &[&str]) -> Value {
    values
        .iter()
        .enumerate()
        .map(|(i, v)| {
            json!({
                "field": format!("field_{}", i + 1),
                "field_val": v,
                "tag_field": format!("field_{}_tag", i + 1),
                "tag_val": v,
            })
        })
        .collect()
}

/// Create a row on `app` and return its id.
async fn add(app: &Router, domain: &str, values: &[&str], products: &[&str]) -> String {
    let resp = app
        .clone()
        .oneshot(json_request(
            &format!("{MANAGE}?action=save&domain={domain}"),
            json!({ "ymm_fields": fields(values), "product_ids": products }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    body_json(resp).await["id"].as_str().unwrap().to_string()
}

// --- list ---

#[tokio::test]
async fn list_empty_domain() {
    let resp = app()
        .oneshot(get_request(&format!("{MANAGE}?action=get&domain=shop1")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        body_json(resp).await,
        json!({"all_count": "0", "total": 0, "list": []})
    );
}

#[tokio::test]
async fn list_is_scoped_by_domain() {
    let app = app();
    add(&app, "shop1", &["1999", "Make", "Nano"], &[]).await;
    add(&app, "shop2", &["2005", "Other", "Thing"], &[]).await;

    let resp = app
        .oneshot(get_request(&format!("{MANAGE}?action=get&domain=shop1")))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["all_count"], "1");
    assert_eq!(body["list"][0]["field_3"], "Nano");
    assert!(body["list"][0].get("field_1_tag").is_none());
}

#[tokio::test]
async fn missing_domain_returns_400() {
    let resp = app()
        .oneshot(get_request(&format!("{MANAGE}?action=get")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unknown_action_returns_400() {
    let resp = app()
        .oneshot(get_request(&format!("{MANAGE}?action=explode&domain=shop1")))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(resp).await["status"], "error");
}

// --- save / edit ---

#[tokio::test]
async fn save_then_edit_returns_detail() {
    let app = app();
    let id = add(&app, "shop1", &["1999", "Make", "Nano"], &["111"]).await;

    let resp = app
        .oneshot(get_request(&format!(
            "{MANAGE}?action=edit&data_id={id}&domain=shop1"
        )))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["id"], id);
    assert_eq!(body["shop_id"], "shop1");
    assert_eq!(body["product_ids"], "111");
    assert_eq!(body["field_2"], "Make");
    assert_eq!(body["field_2_tag"], "Make");
}

#[tokio::test]
async fn save_with_data_id_replaces_row() {
    let app = app();
    let id = add(&app, "shop1", &["1999", "Make", "Nano"], &["111"]).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            &format!("{MANAGE}?action=save&domain=shop1&data_id={id}"),
            json!({ "ymm_fields": fields(&["2000", "Make", "Nano"]), "product_ids": [] }),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = app
        .oneshot(get_request(&format!(
            "{MANAGE}?action=edit&data_id={id}&domain=shop1"
        )))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["field_1"], "2000");
    assert_eq!(body["product_ids"], "");
}

#[tokio::test]
async fn save_unknown_data_id_returns_404() {
    let resp = app()
        .oneshot(json_request(
            &format!("{MANAGE}?action=save&domain=shop1&data_id=99"),
            json!({ "ymm_fields": fields(&["2000"]) }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn save_malformed_body_returns_422() {
    let resp = app()
        .oneshot(json_request(
            &format!("{MANAGE}?action=save&domain=shop1"),
            json!({ "not_fields": 1 }),
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn edit_not_found() {
    let resp = app()
        .oneshot(get_request(&format!(
            "{MANAGE}?action=edit&data_id=1&domain=shop1"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn edit_bad_id_returns_400() {
    let resp = app()
        .oneshot(get_request(&format!(
            "{MANAGE}?action=edit&data_id=abc&domain=shop1"
        )))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- search ---

#[tokio::test]
async fn search_filters_by_field() {
    let app = app();
    add(&app, "shop1", &["1999", "Make", "Nano"], &[]).await;
    add(&app, "shop1", &["2001", "Nano", "Other"], &[]).await;

    let resp = app
        .oneshot(json_request(
            &format!("{MANAGE}?action=get&domain=shop1"),
            json!({"txt": "nano", "search_cond": "equals", "page": 1, "filter_fields": ["field_3"]}),
        ))
        .await
        .unwrap();
    let body = body_json(resp).await;
    assert_eq!(body["all_count"], "2");
    assert_eq!(body["total"], 1);
    assert_eq!(body["list"][0]["field_1"], "1999");
}

#[tokio::test]
async fn search_without_filter_checks_every_field() {
    let app = app();
    add(&app, "shop1", &["1999", "Make", "Nano"], &[]).await;
    add(&app, "shop1", &["2001", "Nano", "Other"], &[]).await;

    let resp = app
        .oneshot(json_request(
            &format!("{MANAGE}?action=get&domain=shop1"),
            json!({"txt": "Nano", "search_cond": "equals", "page": 1, "filter_fields": []}),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["total"], 2);
}

#[tokio::test]
async fn search_unknown_condition_returns_400() {
    let app = app();
    add(&app, "shop1", &["1999"], &[]).await;

    let resp = app
        .oneshot(json_request(
            &format!("{MANAGE}?action=get&domain=shop1"),
            json!({"txt": "1999", "search_cond": "sounds_like", "page": 1, "filter_fields": []}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- assign ---

#[tokio::test]
async fn bulk_assign_links_products_once() {
    let app = app();
    let a = add(&app, "shop1", &["1999"], &["111"]).await;
    let b = add(&app, "shop1", &["2000"], &[]).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "/ajax/bulk_ymm.php?action=bulk_assign&domain=shop1",
            json!({"product_ids": ["111", "222"], "ymm_row_ids": [a, b, "404"]}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["assigned"], 2);

    let resp = app
        .oneshot(get_request(&format!(
            "{MANAGE}?action=edit&data_id={a}&domain=shop1"
        )))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["product_ids"], "111,222");
}

#[tokio::test]
async fn bulk_endpoint_rejects_other_actions() {
    let resp = app()
        .oneshot(json_request(
            "/ajax/bulk_ymm.php?action=save&domain=shop1",
            json!({"product_ids": [], "ymm_row_ids": []}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

// --- delete ---

#[tokio::test]
async fn delete_accepts_comma_separated_ids() {
    let app = app();
    let a = add(&app, "shop1", &["1999"], &[]).await;
    let b = add(&app, "shop1", &["2000"], &[]).await;
    add(&app, "shop1", &["2001"], &[]).await;

    let resp = app
        .clone()
        .oneshot(json_request(
            &format!("{MANAGE}?action=delete&domain=shop1"),
            json!({"delete_id": format!("{a},{b}")}),
        ))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["deleted"], 2);

    let resp = app
        .oneshot(get_request(&format!("{MANAGE}?action=get&domain=shop1")))
        .await
        .unwrap();
    assert_eq!(body_json(resp).await["total"], 1);
}

#[tokio::test]
async fn delete_all_clears_domain() {
    let app = app();
    add(&app, "shop1", &["1999"], &[]).await;
    add(&app, "shop1", &["2000"], &[]).await;

    let resp = app
        .clone()
        .oneshot(get_request(&format!("{MANAGE}?action=delete_all&domain=shop1")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp).await["deleted"], 2);

    let resp = app
        .oneshot(get_request(&format!("{MANAGE}?action=get&domain=shop1")))
        .await
        .unwrap();
    let bytes = body_bytes(resp).await;
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["total"], 0);
}
