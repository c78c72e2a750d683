use axum::{
    Router,
    body::Body,
    http::{Request, StatusCode, header},
};
use base64::{Engine as _, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use sea_orm::{ConnectionTrait, Database, Statement};
use serde_json::{Value, json};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tower::ServiceExt;

use engine::{Charity, CharityRegistry, CreditCmd, Engine, PrizeCash, TxnCategory};
use migration::MigratorTrait;

async fn seeded_engine() -> (Engine, sea_orm::DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();

    let registry = CharityRegistry::new([Charity {
        id: "C1".to_string(),
        name: "GiveDirectly".to_string(),
        website: Some("https://www.givedirectly.org".to_string()),
        description: None,
    }])
    .unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .charities(registry)
        .min_cash_donation(PrizeCash::whole(5))
        .build()
        .await
        .unwrap();

    engine.create_user("alice", "secret").await.unwrap();
    engine
        .credit(
            CreditCmd::new(
                "alice",
                PrizeCash::whole(100),
                TxnCategory::ContractResolutionPayout,
            )
            .source("market-1"),
        )
        .await
        .unwrap();
    engine
        .credit(CreditCmd::new(
            "alice",
            PrizeCash::whole(50),
            TxnCategory::CashBonus,
        ))
        .await
        .unwrap();

    (engine, db)
}

async fn test_app() -> (Router, sea_orm::DatabaseConnection) {
    let (engine, db) = seeded_engine().await;
    (server::app(engine, db.clone()), db)
}

fn basic(username: &str, password: &str) -> String {
    format!("Basic {}", STANDARD.encode(format!("{username}:{password}")))
}

fn donate_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/donate")
        .header(header::AUTHORIZATION, basic("alice", "secret"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, basic("alice", "secret"))
        .body(Body::empty())
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn donation_count(db: &sea_orm::DatabaseConnection) -> i64 {
    let row = db
        .query_one(Statement::from_string(
            db.get_database_backend(),
            "SELECT COUNT(*) AS n FROM txns WHERE category = 'CHARITY'",
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get::<i64>("", "n").unwrap()
}

#[tokio::test]
async fn donate_succeeds_with_empty_body() {
    let (app, db) = test_app().await;

    let response = app
        .clone()
        .oneshot(donate_request(json!({"amount": 20, "to": "C1"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    assert!(bytes.is_empty());
    assert_eq!(donation_count(&db).await, 1);

    let response = app.oneshot(get_request("/balance")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"cash_balance": 130.0, "redeemable": 80.0})
    );
}

#[tokio::test]
async fn unknown_charity_is_404() {
    let (app, db) = test_app().await;

    let response = app
        .oneshot(donate_request(json!({"amount": 20, "to": "nope"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await, json!({"error": "Charity not found"}));
    assert_eq!(donation_count(&db).await, 0);
}

#[tokio::test]
async fn overdraw_is_403() {
    let (app, _db) = test_app().await;

    let response = app
        .oneshot(donate_request(json!({"amount": 151, "to": "C1"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Insufficient prizecash balance"})
    );
}

#[tokio::test]
async fn locked_cash_is_403_with_redeemable_amount() {
    let (app, db) = test_app().await;

    let response = app
        .oneshot(donate_request(json!({"amount": 120, "to": "C1"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Insufficient redeemable prizecash. Only 100 prizecash can be redeemed."})
    );
    assert_eq!(donation_count(&db).await, 0);
}

#[tokio::test]
async fn below_minimum_is_400_with_minimum() {
    let (app, _db) = test_app().await;

    let response = app
        .oneshot(donate_request(json!({"amount": 4.99, "to": "C1"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await,
        json!({"error": "Minimum donation is 5 prizecash"})
    );
}

#[tokio::test]
async fn fractional_cents_are_rejected() {
    let (app, db) = test_app().await;

    let response = app
        .oneshot(donate_request(json!({"amount": 10.005, "to": "C1"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(donation_count(&db).await, 0);
}

#[tokio::test]
async fn missing_or_wrong_credentials_are_401() {
    let (app, _db) = test_app().await;

    let missing = Request::builder()
        .method("POST")
        .uri("/donate")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"amount": 20, "to": "C1"}).to_string()))
        .unwrap();
    let response = app.clone().oneshot(missing).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let wrong = Request::builder()
        .uri("/balance")
        .header(header::AUTHORIZATION, basic("alice", "guess"))
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(wrong).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn charities_and_totals() {
    let (app, _db) = test_app().await;

    let response = app.clone().oneshot(get_request("/charities")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!([{"id": "C1", "name": "GiveDirectly", "website": "https://www.givedirectly.org"}])
    );

    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(donate_request(json!({"amount": 12.5, "to": "C1"})))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = app
        .clone()
        .oneshot(get_request("/charities/C1/total"))
        .await
        .unwrap();
    assert_eq!(
        body_json(response).await,
        json!({"charity_id": "C1", "total": 25.0, "donors": 1})
    );

    let response = app.oneshot(get_request("/charities/nope/total")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn txns_lists_ledger_entries() {
    let (app, _db) = test_app().await;

    let response = app
        .clone()
        .oneshot(donate_request(json!({"amount": 20, "to": "C1"})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get_request("/txns?limit=1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let entries = body.as_array().unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["category"], "CHARITY");
    assert_eq!(entries[0]["from_type"], "USER");
    assert_eq!(entries[0]["from_id"], "alice");
    assert_eq!(entries[0]["to_type"], "CHARITY");
    assert_eq!(entries[0]["to_id"], "C1");
    assert_eq!(entries[0]["amount"], 20.0);
    assert_eq!(entries[0]["token"], "CASH");
}

#[tokio::test]
async fn serves_on_the_given_listener() {
    let (engine, db) = seeded_engine().await;
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::run_with_listener(engine, db, listener));

    let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
    let request = format!(
        "GET /charities HTTP/1.1\r\nHost: {addr}\r\nAuthorization: {}\r\nConnection: close\r\n\r\n",
        basic("alice", "secret")
    );
    stream.write_all(request.as_bytes()).await.unwrap();

    let mut response = String::new();
    stream.read_to_string(&mut response).await.unwrap();
    assert!(response.starts_with("HTTP/1.1 200"), "{response}");
    assert!(response.contains("GiveDirectly"));
}
