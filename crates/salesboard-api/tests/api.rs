use reqwest::StatusCode;
use salesboard_api::{create_router, AppState};
use salesboard_config::PaginationConfig;
use salesboard_core::{FileSeedSource, MemoryStore, SourceRef, StaticSeedSource, TransactionEngine};
use serde_json::{json, Value};
use std::sync::Arc;

struct TestServer {
    base_url: String,
    handle: tokio::task::JoinHandle<()>,
}

impl TestServer {
    async fn spawn(source: SourceRef) -> Self {
        let engine = TransactionEngine::new(
            Arc::new(MemoryStore::new()),
            source,
            PaginationConfig::default(),
        );
        let app = create_router(AppState { engine });
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

    async fn seeded() -> Self {
        let srv = Self::spawn(Arc::new(StaticSeedSource::from_json(&seed_payload()))).await;
        let res = reqwest::Client::new()
            .post(format!("{}/api/transactions/init", srv.base_url))
            .send()
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::OK);
        srv
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// 12 March records across three years, 3 in July, one March record without a price
fn seed_payload() -> Value {
    let mut items = Vec::new();
    for i in 0..12 {
        let description = if i == 4 { "discounted to 250" } else { "outerwear" };
        let category = if i % 2 == 0 { "men's clothing" } else { "women's clothing" };
        items.push(json!({
            "productId": format!("mar-{i}"),
            "title": format!("Spring jacket {i}"),
            "description": description,
            "price": 50 + i * 80,
            "category": category,
            "dateOfSale": format!("{}-03-{:02}T12:00:00Z", 2021 + i % 3, i + 1),
            "sold": i < 8,
        }));
    }
    for i in 0..3 {
        items.push(json!({
            "productId": format!("jul-{i}"),
            "title": "Sunglasses",
            "description": "summer",
            "price": 250,
            "category": "accessories",
            "dateOfSale": format!("2022-07-{:02}", i + 10),
            "sold": true,
        }));
    }
    items.push(json!({
        "id": 99,
        "title": "Mystery box",
        "description": "no price yet",
        "price": null,
        "category": "misc",
        "dateOfSale": "2022-03-31T23:00:00Z",
        "sold": false,
    }));
    Value::Array(items)
}

async fn get_json(client: &reqwest::Client, url: String) -> (StatusCode, Value) {
    let res = client.get(url).send().await.unwrap();
    let status = res.status();
    (status, res.json().await.unwrap())
}

#[tokio::test]
async fn init_reports_inserted_count() {
    let srv = TestServer::spawn(Arc::new(StaticSeedSource::from_json(&seed_payload()))).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/transactions/init", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["inserted"], 16);
    assert_eq!(body["message"], "Database initialized with seed data.");

    // Reseeding replaces rather than appends.
    let res = client
        .post(format!("{}/api/transactions/init", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let (_, page) = get_json(&client, format!("{}/api/transactions?month=3&perPage=100", srv.base_url)).await;
    assert_eq!(page["total"], 13);
}

#[tokio::test]
async fn list_pages_through_a_month() {
    let srv = TestServer::seeded().await;
    let client = reqwest::Client::new();

    let (status, first) = get_json(&client, format!("{}/api/transactions?month=March", srv.base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(first["total"], 13);
    assert_eq!(first["page"], 1);
    assert_eq!(first["perPage"], 10);
    assert_eq!(first["transactions"].as_array().unwrap().len(), 10);
    assert_eq!(first["transactions"][0]["productId"], "mar-0");
    assert_eq!(first["transactions"][0]["dateOfSale"], "2021-03-01T12:00:00Z");

    let (_, second) = get_json(&client, format!("{}/api/transactions?month=3&page=2", srv.base_url)).await;
    let rows = second["transactions"].as_array().unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[2]["productId"], "99");
    assert!(rows[2]["price"].is_null());

    let (_, beyond) = get_json(&client, format!("{}/api/transactions?month=3&page=5", srv.base_url)).await;
    assert_eq!(beyond["total"], 13);
    assert!(beyond["transactions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn list_search_matches_text_and_price() {
    let srv = TestServer::seeded().await;
    let client = reqwest::Client::new();

    // mar-4 mentions 250 in its description; no March price equals 250.
    let (_, page) = get_json(&client, format!("{}/api/transactions?month=3&search=250", srv.base_url)).await;
    assert_eq!(page["total"], 1);
    assert_eq!(page["transactions"][0]["productId"], "mar-4");

    // July prices are all 250.
    let (_, page) = get_json(&client, format!("{}/api/transactions?month=7&search=250", srv.base_url)).await;
    assert_eq!(page["total"], 3);

    let (_, page) = get_json(&client, format!("{}/api/transactions?month=3&search=JACKET", srv.base_url)).await;
    assert_eq!(page["total"], 12);

    // Category text is not searched.
    let (_, page) = get_json(&client, format!("{}/api/transactions?month=3&search=misc", srv.base_url)).await;
    assert_eq!(page["total"], 0);
}

#[tokio::test]
async fn statistics_and_charts_agree() {
    let srv = TestServer::seeded().await;
    let client = reqwest::Client::new();

    let (status, stats) = get_json(&client, format!("{}/api/transactions/statistics?month=3", srv.base_url)).await;
    assert_eq!(status, StatusCode::OK);
    // 50 + 130 + ... + 930 over twelve priced records
    assert_eq!(stats["totalSaleAmount"], 5880.0);
    assert_eq!(stats["totalSoldItems"], 8);
    assert_eq!(stats["totalNotSoldItems"], 5);

    let (_, bars) = get_json(&client, format!("{}/api/transactions/bar-chart?month=3", srv.base_url)).await;
    let bars = bars.as_array().unwrap();
    assert_eq!(bars.len(), 10);
    assert_eq!(bars[0]["range"], "0-100");
    assert_eq!(bars[9]["range"], "901-above");
    let histogram_total: u64 = bars.iter().map(|b| b["count"].as_u64().unwrap()).sum();
    assert_eq!(histogram_total, 12);

    let (_, pie) = get_json(&client, format!("{}/api/transactions/pie-chart?month=3", srv.base_url)).await;
    assert_eq!(
        pie,
        json!([
            { "category": "men's clothing", "count": 6 },
            { "category": "misc", "count": 1 },
            { "category": "women's clothing", "count": 6 }
        ])
    );

    let (_, combined) = get_json(&client, format!("{}/api/transactions/combined?month=3", srv.base_url)).await;
    assert_eq!(combined["statistics"], stats);
    assert_eq!(combined["barChart"], Value::Array(bars.clone()));
    assert_eq!(combined["pieChart"], pie);
}

#[tokio::test]
async fn month_without_records_is_empty() {
    let srv = TestServer::seeded().await;
    let client = reqwest::Client::new();

    let (status, stats) = get_json(&client, format!("{}/api/transactions/statistics?month=1", srv.base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats, json!({ "totalSaleAmount": 0.0, "totalSoldItems": 0, "totalNotSoldItems": 0 }));

    let (_, pie) = get_json(&client, format!("{}/api/transactions/pie-chart?month=january", srv.base_url)).await;
    assert_eq!(pie, json!([]));
}

#[tokio::test]
async fn bad_month_is_rejected() {
    let srv = TestServer::seeded().await;
    let client = reqwest::Client::new();

    let (status, body) = get_json(&client, format!("{}/api/transactions/statistics", srv.base_url)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Month parameter is required.");

    for month in ["0", "13", "Mar", "x"] {
        let (status, body) = get_json(
            &client,
            format!("{}/api/transactions/combined?month={}", srv.base_url, month),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{}", month);
        assert!(body["error"].is_string());
    }
}

#[tokio::test]
async fn unavailable_source_is_a_server_error() {
    let missing = std::env::temp_dir().join("salesboard-api-test-missing-seed.json");
    let srv = TestServer::spawn(Arc::new(FileSeedSource::new(missing))).await;
    let client = reqwest::Client::new();

    let res = client
        .post(format!("{}/api/transactions/init", srv.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = res.json().await.unwrap();
    assert!(body["error"].as_str().unwrap().starts_with("Failed to initialize database"));

    // The store stays usable and empty.
    let (status, page) = get_json(&client, format!("{}/api/transactions?month=3", srv.base_url)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 0);
}
