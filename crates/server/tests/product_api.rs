use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use configs::AppConfig;
use migration::MigratorTrait;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::startup::build_app;
use server::state::ServerState;

async fn app() -> anyhow::Result<Router> {
    let db = models::db::connect_sqlite_memory().await?;
    migration::Migrator::up(&db, None).await?;
    Ok(build_app(ServerState::new(db, &AppConfig::default())))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> anyhow::Result<(StatusCode, Value)> {
    let request = match body {
        Some(json) => Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(serde_json::to_vec(&json)?))?,
        None => Request::builder().method(method).uri(uri).body(Body::empty())?,
    };
    let response = app.oneshot(request).await?;
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes)? };
    Ok((status, value))
}

#[tokio::test]
async fn list_returns_page_metadata() -> anyhow::Result<()> {
    let (status, body) = send(app().await?, Method::GET, "/api/v1/product", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"]["index"], 1);
    assert_eq!(body["result"]["page_size"], 10);
    assert_eq!(body["result"]["items"], json!([]));
    Ok(())
}

#[tokio::test]
async fn list_with_zero_limit_is_bad_request() -> anyhow::Result<()> {
    let (status, body) = send(app().await?, Method::GET, "/api/v1/product?limit=0", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["has_error"], true);
    Ok(())
}

#[tokio::test]
async fn get_by_id_returns_empty_envelope() -> anyhow::Result<()> {
    let (status, body) = send(app().await?, Method::GET, "/api/v1/product/7", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"has_error": false, "errors": [], "total": 0, "result": null}));
    Ok(())
}

#[tokio::test]
async fn create_maps_validation_to_status() -> anyhow::Result<()> {
    let (status, body) = send(app().await?, Method::POST, "/api/v1/product", Some(json!({"id": 0}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"], json!(["'Id' must not be empty."]));

    let (status, _) = send(app().await?, Method::POST, "/api/v1/product", Some(json!({"id": 3, "name": "Pen"}))).await?;
    assert_eq!(status, StatusCode::CREATED);
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_an_error_envelope() -> anyhow::Result<()> {
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/v1/product")
        .header("content-type", "application/json")
        .body(Body::from("{\"id\": 3,"))?;
    let response = app().await?.oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let body: Value = serde_json::from_slice(&bytes)?;
    assert_eq!(body["has_error"], true);
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn non_numeric_id_is_an_error_envelope() -> anyhow::Result<()> {
    let (status, body) = send(app().await?, Method::GET, "/api/v1/product/abc", None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["has_error"], true);

    let (status, body) = send(app().await?, Method::PUT, "/api/v1/product?id=x", Some(json!({}))).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["has_error"], true);
    Ok(())
}

#[tokio::test]
async fn update_reads_id_from_query() -> anyhow::Result<()> {
    let (status, body) =
        send(app().await?, Method::PUT, "/api/v1/product?id=3", Some(json!({"price": 2.0}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["has_error"], false);
    Ok(())
}

#[tokio::test]
async fn patch_and_delete_have_fixed_statuses() -> anyhow::Result<()> {
    let (status, _) = send(app().await?, Method::PATCH, "/api/v1/product", None).await?;
    assert_eq!(status, StatusCode::ACCEPTED);
    let (status, body) = send(app().await?, Method::DELETE, "/api/v1/product/3", None).await?;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());
    Ok(())
}

#[tokio::test]
async fn state_carries_cache_and_mail() -> anyhow::Result<()> {
    use service::cache::{get_json, set_json};
    use service::mail::{MailError, MailRequest, MailService};

    let db = models::db::connect_sqlite_memory().await?;
    let state = ServerState::new(db, &AppConfig::default());

    set_json(state.cache.as_ref(), "product:1", &json!({"id": 1}), None).await?;
    let cached: Option<Value> = get_json(state.cache.as_ref(), "product:1").await?;
    assert_eq!(cached, Some(json!({"id": 1})));

    let sent = state.mail.send(MailRequest::new(vec!["ops@example.com".into()], "hello")).await;
    assert!(matches!(sent, Err(MailError::NotImplemented(_))));
    Ok(())
}
