//! End-to-end tests for the HTTP surface, each against a fresh in-memory
//! database.

use axum::body::Body;
use axum::http::{header, HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use inventix_core::StockPolicy;
use inventix_db::{Database, DbConfig};
use inventix_web::config::AppConfig;
use inventix_web::router;
use inventix_web::state::AppState;
use serde_json::{json, Value};
use tower::ServiceExt;

// =============================================================================
// Helpers
// =============================================================================

async fn app_with(config: AppConfig) -> Router {
    let db = Database::new(DbConfig::in_memory()).await.unwrap();
    router(AppState::new(db, config))
}

async fn app() -> Router {
    app_with(AppConfig::default()).await
}

async fn raw(app: &Router, request: Request<Body>) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, headers, bytes.to_vec())
}

async fn get(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    let (status, _, body) = raw(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn post(app: &Router, uri: &str, body: Value) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    let (status, _, body) = raw(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

async fn delete(app: &Router, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method("DELETE")
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let (status, _, body) = raw(app, request).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn client_payload(name: &str, cedula: &str) -> Value {
    json!({
        "nombre": name,
        "cedula": cedula,
        "celular": "0999999999",
        "email": format!("{}@example.com", cedula),
        "direccion": "Av. Principal 123"
    })
}

async fn add_client(app: &Router, name: &str, cedula: &str) -> i64 {
    let (status, body) = post(app, "/api/clientes", client_payload(name, cedula)).await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn add_product(app: &Router, name: &str, price: &str, stock: i64) -> i64 {
    let (status, body) = post(
        app,
        "/api/productos",
        json!({ "nombre": name, "precio": price, "stock": stock }),
    )
    .await;
    assert_eq!(status, StatusCode::OK, "{body}");
    body["data"]["id"].as_i64().unwrap()
}

async fn stock_of(app: &Router, id: i64) -> i64 {
    let (_, body) = get(app, "/productos").await;
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .find(|p| p["id"] == id)
        .map(|p| p["stock"].as_i64().unwrap())
        .unwrap()
}

// =============================================================================
// Dashboard
// =============================================================================

#[tokio::test]
async fn test_empty_dashboard_is_all_zero() {
    let app = app().await;
    let (status, body) = get(&app, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["total_clients"], 0);
    assert_eq!(body["data"]["total_products"], 0);
    assert_eq!(body["data"]["total_sales"], 0);
    assert_eq!(body["data"]["total_sold_cents"], 0);
    assert_eq!(body["data"]["total_sold"], "0.00");
}

#[tokio::test]
async fn test_health() {
    let app = app().await;
    let (status, body) = get(&app, "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], true);
}

// =============================================================================
// Clients
// =============================================================================

#[tokio::test]
async fn test_clients_are_listed_by_name() {
    let app = app().await;
    add_client(&app, "Zoila", "0001").await;
    let (status, body) = post(&app, "/api/clientes", client_payload("Andrés", "0002")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cliente registrado correctamente");

    let (_, body) = get(&app, "/clientes").await;
    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Andrés", "Zoila"]);
}

#[tokio::test]
async fn test_duplicate_identification_is_rejected() {
    let app = app().await;
    add_client(&app, "Ana", "0102030405").await;

    let (status, body) = post(&app, "/api/clientes", client_payload("Otra Ana", "0102030405")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "DUPLICATE_IDENTIFICATION");
    assert_eq!(body["message"], "La cédula ya está registrada");
}

#[tokio::test]
async fn test_missing_client_field_is_a_validation_error() {
    let app = app().await;
    let (status, body) = post(&app, "/api/clientes", json!({ "nombre": "Ana" })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_malformed_json_uses_the_envelope() {
    let app = app().await;
    let request = Request::builder()
        .method("POST")
        .uri("/api/clientes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"nombre\": "))
        .unwrap();
    let (status, _, body) = raw(&app, request).await;
    let body: Value = serde_json::from_slice(&body).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn test_delete_missing_client_succeeds() {
    let app = app().await;
    let (status, body) = delete(&app, "/api/clientes/999").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Cliente eliminado");
}

#[tokio::test]
async fn test_delete_with_non_numeric_id_fails() {
    let app = app().await;
    let (status, body) = delete(&app, "/api/productos/abc").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

// =============================================================================
// Products
// =============================================================================

#[tokio::test]
async fn test_product_register_and_delete() {
    let app = app().await;
    let id = add_product(&app, "Martillo", "12.50", 4).await;

    let (_, body) = get(&app, "/productos").await;
    assert_eq!(body["data"][0]["price_cents"], 1250);

    let (status, body) = delete(&app, &format!("/api/productos/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Producto eliminado");

    let (_, body) = get(&app, "/productos").await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_negative_price_is_rejected() {
    let app = app().await;
    let (status, body) = post(
        &app,
        "/api/productos",
        json!({ "nombre": "Martillo", "precio": "-1", "stock": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_price_above_the_limit_is_rejected() {
    let app = app().await;
    let (status, body) = post(
        &app,
        "/api/productos",
        json!({ "nombre": "Lingote", "precio": "50000000000000000", "stock": 1 }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (_, body) = get(&app, "/productos").await;
    assert_eq!(body["data"].as_array().unwrap().len(), 0);
}

// =============================================================================
// Sales
// =============================================================================

#[tokio::test]
async fn test_two_product_sale() {
    let app = app().await;
    let client = add_client(&app, "Ana", "0001").await;
    let a = add_product(&app, "A", "10.00", 5).await;
    let b = add_product(&app, "B", "20.00", 3).await;

    let (status, body) = post(
        &app,
        "/api/ventas",
        json!({
            "numero_factura": "FAC-00001",
            "cliente_id": client.to_string(),
            "total": "40.00",
            "items": [
                { "producto_id": a, "cantidad": 2, "precio": "10.00", "subtotal": "20.00" },
                { "producto_id": b, "cantidad": 1, "precio": "20.00", "subtotal": "20.00" }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["message"], "Venta registrada correctamente");
    assert_eq!(body["data"]["sale"]["invoice_number"], "FAC-00001");
    assert_eq!(body["data"]["sale"]["total_cents"], 4000);
    assert_eq!(body["data"]["items"][0]["subtotal_cents"], 2000);
    assert_eq!(body["data"]["items"][1]["subtotal_cents"], 2000);

    assert_eq!(stock_of(&app, a).await, 3);
    assert_eq!(stock_of(&app, b).await, 2);

    let (_, body) = get(&app, "/").await;
    assert_eq!(body["data"]["total_sales"], 1);
    assert_eq!(body["data"]["total_sold"], "40.00");
}

#[tokio::test]
async fn test_sale_above_the_total_limit_is_rejected() {
    let app = app().await;
    let client = add_client(&app, "Ana", "0001").await;
    let product = add_product(&app, "Lingote", "99999999.99", 1000).await;

    let (status, body) = post(
        &app,
        "/api/ventas",
        json!({ "cliente_id": client, "items": [{ "producto_id": product, "cantidad": 999 }] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(stock_of(&app, product).await, 1000);

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["total_sales"], 0);
}

#[tokio::test]
async fn test_largest_prices_still_sum_in_dashboard_and_reports() {
    let app = app().await;
    let client = add_client(&app, "Ana", "0001").await;
    let product = add_product(&app, "Lingote", "99999999.99", 10).await;

    for _ in 0..2 {
        let (status, body) = post(
            &app,
            "/api/ventas",
            json!({ "cliente_id": client, "items": [{ "producto_id": product, "cantidad": 1 }] }),
        )
        .await;
        assert_eq!(status, StatusCode::OK, "{body}");
    }

    let (status, body) = get(&app, "/").await;
    assert_eq!(status, StatusCode::OK, "{body}");
    assert_eq!(body["data"]["total_sold"], "199999999.98");

    let (status, _, body) = download(&app, "/api/reportes/ventas-pdf").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(b"%PDF"));

    let (status, _, _) = download(&app, "/api/reportes/ventas-excel").await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_invoice_numbers_follow_registration_order() {
    let app = app().await;
    let client = add_client(&app, "Ana", "0001").await;
    let product = add_product(&app, "A", "1.00", 100).await;

    let (_, form) = get(&app, "/ventas").await;
    assert_eq!(form["data"]["next_invoice_number"], "FAC-00001");

    for expected in ["FAC-00001", "FAC-00002"] {
        let (_, body) = post(
            &app,
            "/api/ventas",
            json!({ "cliente_id": client, "items": [{ "producto_id": product, "cantidad": 1 }] }),
        )
        .await;
        assert_eq!(body["data"]["sale"]["invoice_number"], expected);
    }

    let (_, form) = get(&app, "/ventas").await;
    assert_eq!(form["data"]["next_invoice_number"], "FAC-00003");
    assert_eq!(form["data"]["clients"].as_array().unwrap().len(), 1);
    assert_eq!(form["data"]["products"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_default_policy_allows_negative_stock() {
    let app = app().await;
    let client = add_client(&app, "Ana", "0001").await;
    let product = add_product(&app, "A", "1.00", 1).await;

    let (status, _) = post(
        &app,
        "/api/ventas",
        json!({ "cliente_id": client, "items": [{ "producto_id": product, "cantidad": 3 }] }),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(stock_of(&app, product).await, -2);
}

#[tokio::test]
async fn test_reject_policy_rolls_back_the_whole_sale() {
    let mut config = AppConfig::default();
    config.sales.stock_policy = StockPolicy::Reject;
    let app = app_with(config).await;

    let client = add_client(&app, "Ana", "0001").await;
    let a = add_product(&app, "A", "1.00", 5).await;
    let b = add_product(&app, "B", "1.00", 1).await;

    let (status, body) = post(
        &app,
        "/api/ventas",
        json!({
            "cliente_id": client,
            "items": [
                { "producto_id": a, "cantidad": 2 },
                { "producto_id": b, "cantidad": 3 }
            ]
        }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(stock_of(&app, a).await, 5);
    assert_eq!(stock_of(&app, b).await, 1);

    let (_, body) = get(&app, "/").await;
    assert_eq!(body["data"]["total_sales"], 0);
}

#[tokio::test]
async fn test_sale_with_unknown_product_fails() {
    let app = app().await;
    let client = add_client(&app, "Ana", "0001").await;

    let (status, body) = post(
        &app,
        "/api/ventas",
        json!({ "cliente_id": client, "items": [{ "producto_id": 42, "cantidad": 1 }] }),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_FOUND");
}

#[tokio::test]
async fn test_sale_without_items_fails() {
    let app = app().await;
    let client = add_client(&app, "Ana", "0001").await;

    let (status, body) = post(&app, "/api/ventas", json!({ "cliente_id": client, "items": [] })).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_referenced_client_cannot_be_deleted() {
    let app = app().await;
    let client = add_client(&app, "Ana", "0001").await;
    let product = add_product(&app, "A", "1.00", 5).await;
    post(
        &app,
        "/api/ventas",
        json!({ "cliente_id": client, "items": [{ "producto_id": product, "cantidad": 1 }] }),
    )
    .await;

    let (status, body) = delete(&app, &format!("/api/clientes/{client}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "REFERENCED_RECORD");

    let (status, body) = delete(&app, &format!("/api/productos/{product}")).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "REFERENCED_RECORD");
}

// =============================================================================
// Reports
// =============================================================================

async fn download(app: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    raw(app, request).await
}

#[tokio::test]
async fn test_report_menu_lists_all_downloads() {
    let app = app().await;
    let (_, body) = get(&app, "/reportes").await;
    let urls: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["url"].as_str().unwrap())
        .collect();
    assert_eq!(urls.len(), 4);
    assert!(urls.contains(&"/api/reportes/ventas-pdf"));
}

#[tokio::test]
async fn test_empty_reports_download() {
    let app = app().await;

    let (status, headers, body) = download(&app, "/api/reportes/ventas-pdf").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "application/pdf");
    let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
    assert!(disposition.starts_with("attachment; filename=\"Reporte_Ventas_"));
    assert!(disposition.ends_with(".pdf\""));
    assert!(body.starts_with(b"%PDF"));

    let (status, headers, body) = download(&app, "/api/reportes/inventario-excel").await;
    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_DISPOSITION]
        .to_str()
        .unwrap()
        .contains("Reporte_Inventario_"));
    assert!(body.starts_with(b"PK"));
}

#[tokio::test]
async fn test_sales_report_after_a_sale() {
    let app = app().await;
    let client = add_client(&app, "Ana", "0001").await;
    let product = add_product(&app, "A", "10.00", 5).await;
    post(
        &app,
        "/api/ventas",
        json!({ "cliente_id": client, "items": [{ "producto_id": product, "cantidad": 2 }] }),
    )
    .await;

    let (status, _, body) = download(&app, "/api/reportes/ventas-pdf").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.windows(11).any(|w| w == b"(FAC-00001)"));

    let (status, _, body) = download(&app, "/api/reportes/ventas-excel").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(b"PK"));
}

#[tokio::test]
async fn test_unknown_report_is_an_envelope_error() {
    let app = app().await;
    let (status, body) = get(&app, "/api/reportes/clientes-pdf").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "NOT_FOUND");
}
