use std::sync::Arc;

use flash_api::{build_router, AppState};
use flash_db::{Database, DbConfig, LedgerStore};
use reqwest::StatusCode;
use serde_json::{json, Value};

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn() -> Self {
        // Same router as prod, over a throwaway in-memory database
        let db = Database::new(DbConfig::in_memory())
            .await
            .expect("failed to open in-memory database");
        let store: Arc<dyn LedgerStore> = Arc::new(db);
        let app = build_router(AppState::new(store));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind ephemeral port");
        let addr = listener.local_addr().unwrap();
        let base_url = format!("http://{}", addr);

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { base_url, handle }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn create_widget(client: &reqwest::Client, srv: &TestServer) -> Value {
    let res = client
        .post(srv.url("/products"))
        .json(&json!({
            "name": "Widget",
            "sku": "W1",
            "price": 9.99,
            "stock_quantity": 10
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], true);
    body["data"].clone()
}

#[tokio::test]
async fn banner_and_health() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client.get(srv.url("/")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["status"], "running");

    let res = client.get(srv.url("/health")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["database"], "connected");
}

#[tokio::test]
async fn create_and_fetch_product() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let created = create_widget(&client, &srv).await;
    assert_eq!(created["price"], 9.99);
    assert_eq!(created["price_cents"], 999);
    assert_eq!(created["min_stock_level"], 5);
    assert_eq!(created["category"], "General");

    let res = client.get(srv.url("/products/sku/W1")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["id"], created["id"]);
    assert_eq!(body["data"]["stock_quantity"], 10);

    let id = created["id"].as_str().unwrap();
    let res = client
        .get(srv.url(&format!("/products/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(srv.url("/products?search=widg"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_sku_conflicts() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_widget(&client, &srv).await;

    let res = client
        .post(srv.url("/products"))
        .json(&json!({ "name": "Other", "sku": "W1", "price": 1.0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["code"], "DUPLICATE_SKU");
    assert!(body["error"].as_str().unwrap().contains("W1"));

    let res = client.get(srv.url("/products")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn widget_sale_scenario() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let widget = create_widget(&client, &srv).await;

    let res = client
        .post(srv.url("/sales"))
        .json(&json!({ "sku": "W1", "quantity": 3 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["remaining_stock"], 7);
    assert_eq!(body["data"]["quantity_sold"], 3);
    assert_eq!(body["data"]["total_cents"], 2997);
    assert_eq!(body["data"]["product_sku"], "W1");

    let res = client.get(srv.url("/sales")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    let log = body["data"].as_array().unwrap();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0]["total"], 29.97);

    let id = widget["id"].as_str().unwrap();
    let res = client
        .get(srv.url(&format!("/products/{}", id)))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["stock_quantity"], 7);

    let res = client
        .get(srv.url(&format!("/products/{}/sales", id)))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn insufficient_stock_conflicts_without_writes() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_widget(&client, &srv).await;

    let res = client
        .post(srv.url("/sales"))
        .json(&json!({ "sku": "W1", "quantity": 11 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CONFLICT);

    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(body["error"], "Insufficient stock. Available: 10");

    let res = client.get(srv.url("/sales")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert!(body["data"].as_array().unwrap().is_empty());

    let res = client.get(srv.url("/products/sku/W1")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["stock_quantity"], 10);
}

#[tokio::test]
async fn validation_errors_are_bad_requests() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let cases = [
        json!({ "name": "", "sku": "X1", "price": 1.0 }),
        json!({ "name": "Thing", "sku": "  ", "price": 1.0 }),
        json!({ "name": "Thing", "sku": "X1", "price": 0 }),
        json!({ "name": "Thing", "sku": "X1", "price": 1.0, "stock_quantity": -1 }),
    ];
    for case in cases {
        let res = client
            .post(srv.url("/products"))
            .json(&case)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {}", case);

        let body: Value = res.json().await.unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    // Malformed JSON goes through the same envelope
    let res = client
        .post(srv.url("/sales"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let res = client
        .get(srv.url("/reports/sales?days=-1"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sale_amounts_are_checked_before_the_ledger() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_widget(&client, &srv).await;

    let cases = [
        json!({ "sku": "W1", "quantity": 1, "sale_price": 0.004 }),
        json!({ "sku": "W1", "quantity": 1, "sale_price": -0.004 }),
        json!({ "sku": "W1", "quantity": 1, "sale_price": 1e10 }),
        json!({ "sku": "W1", "quantity": 10_000_000_000i64 }),
    ];
    for case in cases {
        let res = client
            .post(srv.url("/sales"))
            .json(&case)
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST, "body: {}", case);
        let body: Value = res.json().await.unwrap();
        assert_eq!(body["code"], "VALIDATION_ERROR");
    }

    let res = client
        .post(srv.url("/products"))
        .json(&json!({ "name": "Bulk", "sku": "B1", "price": 1e10, "stock_quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    // Nothing was written, so the full stock can still be sold
    let res = client
        .post(srv.url("/sales"))
        .json(&json!({ "sku": "W1", "quantity": 10 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::CREATED);

    let res = client.get(srv.url("/products/sku/W1")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["stock_quantity"], 0);
    assert_eq!(body["data"]["is_out_of_stock"], true);

    let res = client.get(srv.url("/reports/sales")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["total_revenue_cents"], 9990);
}

#[tokio::test]
async fn unknown_products_are_not_found() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();

    let res = client
        .get(srv.url("/products/sku/NOPE"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["code"], "NOT_FOUND");

    let res = client
        .post(srv.url("/sales"))
        .json(&json!({ "sku": "NOPE", "quantity": 1 }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = client
        .put(srv.url("/products/missing/stock?new_stock=3"))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_stock_and_delete() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    let widget = create_widget(&client, &srv).await;
    let id = widget["id"].as_str().unwrap();

    let res = client
        .put(srv.url(&format!("/products/{}/stock?new_stock=2", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["stock_quantity"], 2);
    assert_eq!(body["data"]["is_low_stock"], true);
    assert_eq!(body["data"]["is_out_of_stock"], false);

    let res = client
        .get(srv.url("/products/low-stock"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let res = client
        .put(srv.url(&format!("/products/{}", id)))
        .json(&json!({ "name": "Widget Pro", "description": "Shiny" }))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["name"], "Widget Pro");
    assert_eq!(body["data"]["description"], "Shiny");

    let res = client
        .delete(srv.url(&format!("/products/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);

    let res = client
        .get(srv.url(&format!("/products/{}", id)))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reports_and_dashboard() {
    let srv = TestServer::spawn().await;
    let client = reqwest::Client::new();
    create_widget(&client, &srv).await;

    for qty in [3, 2] {
        let res = client
            .post(srv.url("/sales"))
            .json(&json!({ "sku": "W1", "quantity": qty }))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::CREATED);
    }

    let res = client.get(srv.url("/reports/sales")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["period_days"], 30);
    assert_eq!(body["data"]["total_sales"], 2);
    assert_eq!(body["data"]["total_items_sold"], 5);
    assert_eq!(body["data"]["total_revenue_cents"], 4995);

    let res = client
        .get(srv.url("/reports/sales?days=0"))
        .send()
        .await
        .unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["total_sales"], 0);
    assert_eq!(body["data"]["average_sale_value"], 0.0);

    let res = client.get(srv.url("/reports/daily")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    let days = body["data"].as_array().unwrap();
    assert_eq!(days.len(), 1);
    assert_eq!(days[0]["items_sold"], 5);

    let res = client.get(srv.url("/dashboard")).send().await.unwrap();
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["total_products"], 1);
    assert_eq!(body["data"]["recent_sales_count"], 2);
    assert_eq!(body["data"]["recent_revenue_cents"], 4995);
}
