use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_backend::{app, app_with, MockConfig, TokenBody};
use serde_json::{json, Value};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<String> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(body.to_string())
        .unwrap()
}

fn empty_request(method: &str, uri: &str) -> Request<String> {
    Request::builder().method(method).uri(uri).body(String::new()).unwrap()
}

// --- list ---

#[tokio::test]
async fn list_empty_collection() {
    let resp = app().oneshot(empty_request("GET", "/api/clientes")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let rows: Vec<Value> = body_json(resp).await;
    assert!(rows.is_empty());
}

#[tokio::test]
async fn unknown_resource_returns_404() {
    let resp = app().oneshot(empty_request("GET", "/api/planetas")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- create ---

#[tokio::test]
async fn create_assigns_id_into_id_field() {
    let resp = app()
        .oneshot(json_request(
            "POST",
            "/api/clientes",
            r#"{"idcliente":null,"nombres":"Ana","email":"a@x.com"}"#,
        ))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::CREATED);
    let row: Value = body_json(resp).await;
    assert_eq!(row["idcliente"], 1);
    assert_eq!(row["nombres"], "Ana");
}

#[tokio::test]
async fn create_non_object_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/api/productos", "[1,2,3]"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

// --- get / update / delete on missing rows ---

#[tokio::test]
async fn get_missing_returns_404() {
    let resp = app().oneshot(empty_request("GET", "/api/vendedores/7")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_id_returns_400() {
    let resp = app().oneshot(empty_request("GET", "/api/vendedores/siete")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn update_missing_returns_404() {
    let resp = app()
        .oneshot(json_request("PUT", "/api/pagos/3", r#"{"monto":10}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn delete_missing_returns_404() {
    let resp = app().oneshot(empty_request("DELETE", "/api/ventas/1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

// --- auth ---

#[tokio::test]
async fn login_rejects_wrong_password() {
    let resp = app()
        .oneshot(json_request("POST", "/api/login", r#"{"usuario":"admin","password":"nope"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn protected_routes_need_issued_token() {
    use tower::Service;

    let mut app = app_with(MockConfig::default().with_auth()).into_service();

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/clientes"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/login", r#"{"usuario":"admin","password":"admin"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: TokenBody = body_json(resp).await;
    let token = body.token;

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .uri("/api/clientes")
                .header(http::header::AUTHORIZATION, "Bearer forged")
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(
            Request::builder()
                .uri("/api/clientes")
                .header(http::header::AUTHORIZATION, format!("Bearer {token}"))
                .body(String::new())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

// --- full CRUD lifecycle ---

#[tokio::test]
async fn crud_lifecycle() {
    use tower::Service;

    let mut app = app().into_service();

    // create
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request("POST", "/api/vendedores", r#"{"idvendedor":null,"nombre":"Luis"}"#))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = body_json(resp).await;
    let id = created["idvendedor"].as_i64().unwrap();

    // update merges fields and keeps the id
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(json_request(
            "PUT",
            &format!("/api/vendedores/{id}"),
            r#"{"idvendedor":999,"zona":"norte"}"#,
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated: Value = body_json(resp).await;
    assert_eq!(updated, json!({"idvendedor": id, "nombre": "Luis", "zona": "norte"}));

    // get
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", &format!("/api/vendedores/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let fetched: Value = body_json(resp).await;
    assert_eq!(fetched, updated);

    // delete
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("DELETE", &format!("/api/vendedores/{id}")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    assert!(body_bytes(resp).await.is_empty());

    // list after delete — empty
    let resp = ServiceExt::ready(&mut app)
        .await
        .unwrap()
        .call(empty_request("GET", "/api/vendedores"))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let rows: Vec<Value> = body_json(resp).await;
    assert!(rows.is_empty());
}
