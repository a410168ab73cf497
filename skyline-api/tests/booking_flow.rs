use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use skyline_api::state::{AppState, AuthConfig};
use skyline_api::app;
use skyline_core::flight::Flight;
use skyline_store::{AccountStore, BookingLedger, FlightInventory};
use std::sync::Arc;
use tower::util::ServiceExt;

async fn test_app() -> Router {
    let inventory = Arc::new(FlightInventory::new());
    // 20/100 seats at demand 1.0 prices at exactly 135.00
    inventory
        .insert(
            Flight::new("SK100", "Skyline Air", "London, UK", "Paris, France", 100.0, 100)
                .unwrap()
                .with_seats_remaining(20)
                .unwrap(),
        )
        .await
        .unwrap();

    let accounts = Arc::new(AccountStore::new());
    let ledger = Arc::new(BookingLedger::new(inventory.clone(), accounts.clone()));

    app(AppState {
        inventory,
        accounts,
        ledger,
        auth: AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        },
    })
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn register_and_login(app: &Router, username: &str) -> String {
    let (status, _) = send(
        app,
        Method::POST,
        "/v1/auth/register",
        None,
        Some(json!({ "username": username, "password": "s3cret", "full_name": "Jane Doe" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
        app,
        Method::POST,
        "/v1/auth/login",
        None,
        Some(json!({ "username": username, "password": "s3cret" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn full_booking_lifecycle() {
    let app = test_app().await;
    let token = register_and_login(&app, "alice").await;

    // Search: exact-match filter, priced at read time.
    let (status, body) = send(
        &app,
        Method::GET,
        "/v1/flights?origin=London,%20UK",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["flight_number"], "SK100");
    assert_eq!(body[0]["final_price"].as_f64().unwrap(), 135.00);

    // Reserve: soft hold, price locked, nothing decremented.
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/bookings",
        Some(&token),
        Some(json!({
            "flight_number": "SK100",
            "passenger": { "first_name": "Jane", "last_name": "Doe" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["status"], "PENDING_PAYMENT");
    assert_eq!(body["price_due"].as_f64().unwrap(), 135.00);
    let pnr = body["pnr"].as_str().unwrap().to_string();

    let (status, body) = send(&app, Method::GET, "/v1/flights", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body[0]["seats_remaining"].as_u64().unwrap(), 20);

    // Pay: seat committed atomically.
    let (status, body) = send(
        &app,
        Method::POST,
        &format!("/v1/bookings/{pnr}/pay"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "CONFIRMED");

    let (_, body) = send(&app, Method::GET, "/v1/flights", None, None).await;
    assert_eq!(body[0]["seats_remaining"].as_u64().unwrap(), 19);

    // Ticket payload for the report generator.
    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/v1/tickets/{pnr}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["passenger_name"], "Jane Doe");
    assert_eq!(body["username"], "alice");

    // History shows the confirmed booking.
    let (status, body) = send(
        &app,
        Method::GET,
        "/v1/bookings/history",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"].as_u64().unwrap(), 1);
    assert_eq!(body["history"][0]["pnr"].as_str().unwrap(), pnr);

    // Cancel: 80% refund, seat restored, record archived.
    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/v1/bookings/{pnr}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["refund_amount"].as_f64().unwrap(), 108.00);
    assert_eq!(body["cancellation_fee"].as_f64().unwrap(), 27.00);

    let (_, body) = send(&app, Method::GET, "/v1/flights", None, None).await;
    assert_eq!(body[0]["seats_remaining"].as_u64().unwrap(), 20);

    let (status, body) = send(
        &app,
        Method::GET,
        "/v1/bookings/cancelled",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"].as_u64().unwrap(), 1);

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/v1/receipts/{pnr}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["refund_amount"].as_f64().unwrap(), 108.00);

    // Cancelling again: the PNR no longer exists in the live set.
    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/v1/bookings/{pnr}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn booking_routes_require_a_token() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/bookings",
        None,
        Some(json!({
            "flight_number": "SK100",
            "passenger": { "first_name": "Jane", "last_name": "Doe" }
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
        &app,
        Method::GET,
        "/v1/bookings/history",
        Some("not-a-real-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn auth_and_search_error_paths() {
    let app = test_app().await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/auth/register",
        None,
        Some(json!({ "username": "bob", "password": "pw" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    // Duplicate username.
    let (status, body) = send(
        &app,
        Method::POST,
        "/v1/auth/register",
        None,
        Some(json!({ "username": "bob", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("bob"));

    // Wrong password.
    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/auth/login",
        None,
        Some(json!({ "username": "bob", "password": "wrong" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // No matching flights is an error for searchers.
    let (status, _) = send(
        &app,
        Method::GET,
        "/v1/flights?origin=Atlantis",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Airports feed for the trip advisor.
    let (status, body) = send(&app, Method::GET, "/v1/airports", None, None).await;
    assert_eq!(status, StatusCode::OK);
    let airports: Vec<&str> = body["airports"]
        .as_array()
        .unwrap()
        .iter()
        .map(|v| v.as_str().unwrap())
        .collect();
    assert_eq!(airports, vec!["London, UK", "Paris, France"]);
}

#[tokio::test]
async fn paying_for_an_unknown_pnr_is_not_found() {
    let app = test_app().await;
    let token = register_and_login(&app, "carol").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/v1/bookings/PNRFFFFFFF/pay",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn last_seat_race_surfaces_sold_out_to_the_loser() {
    // Scenario C over the HTTP surface: two soft holds, one seat.
    let inventory = Arc::new(FlightInventory::new());
    inventory
        .insert(
            Flight::new("SK900", "Skyline Air", "Oslo, Norway", "Berlin, Germany", 100.0, 100)
                .unwrap()
                .with_seats_remaining(1)
                .unwrap(),
        )
        .await
        .unwrap();
    let accounts = Arc::new(AccountStore::new());
    let ledger = Arc::new(BookingLedger::new(inventory.clone(), accounts.clone()));
    let app = app(AppState {
        inventory,
        accounts,
        ledger: ledger.clone(),
        auth: AuthConfig {
            secret: "test-secret".to_string(),
            expiration: 3600,
        },
    });
    let token = register_and_login(&app, "dave").await;

    let reserve = json!({
        "flight_number": "SK900",
        "passenger": { "first_name": "Jane", "last_name": "Doe" }
    });
    let (status, first) = send(&app, Method::POST, "/v1/bookings", Some(&token), Some(reserve.clone())).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, second) = send(&app, Method::POST, "/v1/bookings", Some(&token), Some(reserve)).await;
    assert_eq!(status, StatusCode::CREATED);

    let pnr_1 = first["pnr"].as_str().unwrap();
    let pnr_2 = second["pnr"].as_str().unwrap();
    assert_ne!(pnr_1, pnr_2);

    let (status_1, _) = send(&app, Method::POST, &format!("/v1/bookings/{pnr_1}/pay"), Some(&token), None).await;
    let (status_2, body) = send(&app, Method::POST, &format!("/v1/bookings/{pnr_2}/pay"), Some(&token), None).await;

    assert_eq!(status_1, StatusCode::OK);
    assert_eq!(status_2, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("sold out"));
}
