use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use cashfree_tools::{helpers::calculate_signature, WEBHOOK_SIGNATURE_HEADER};
use checkout_common::Secret;
use checkout_engine::CheckoutApi;
use chrono::Duration;
use serde_json::Value;

use super::mocks::{MockBackend, MockPayments, MockShipping};
use crate::{middleware::HmacMiddlewareFactory, routes};

const SECRET: &str = "cfsk_ma_test_cafebabe";
const PAID_EVENT: &str = r#"{"event":"order.paid","order":{"order_id":"ORDER-1724922000000-a1b2c3d4"}}"#;

async fn post_webhook(payload: &str, signature: Option<&str>, hmac_checks: bool) -> (StatusCode, Value) {
    let _ = env_logger::try_init();
    let data = web::Data::new(CheckoutApi::new(
        MockBackend::new(),
        MockPayments::new(),
        MockShipping::new(),
        Duration::hours(1),
    ));
    let app = test::init_service(
        App::new().app_data(data).service(
            web::scope("/webhook")
                .wrap(HmacMiddlewareFactory::new(
                    WEBHOOK_SIGNATURE_HEADER,
                    Secret::new(SECRET.to_string()),
                    hmac_checks,
                ))
                .route("/cashfree", web::post().to(routes::cashfree_webhook::<MockBackend, MockPayments, MockShipping>)),
        ),
    )
    .await;
    // The signature covers the raw bytes, so the payload is set verbatim rather than via set_json.
    let mut req = TestRequest::post()
        .uri("/webhook/cashfree")
        .insert_header(("Content-Type", "application/json"))
        .set_payload(payload.to_string());
    if let Some(sig) = signature {
        req = req.insert_header((WEBHOOK_SIGNATURE_HEADER, sig));
    }
    // Middleware rejections surface as service-level errors in the test harness; convert them to the
    // HTTP response a real server would send instead of letting `call_service` panic.
    match test::try_call_service(&app, req.to_request()).await {
        Ok(res) => {
            let status = res.status();
            let body = test::read_body(res).await;
            let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
            (status, json)
        },
        Err(err) => {
            let res = err.error_response();
            let status = res.status();
            let body = actix_web::body::to_bytes(res.into_body()).await.unwrap_or_default();
            let json = serde_json::from_slice(&body).unwrap_or(Value::Null);
            (status, json)
        },
    }
}

#[actix_web::test]
async fn valid_signature_is_accepted() {
    let sig = calculate_signature(SECRET, PAID_EVENT.as_bytes());
    let (status, body) = post_webhook(PAID_EVENT, Some(&sig), true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn failed_payment_event_is_accepted() {
    let payload = r#"{"event":"order.failed","order":{"order_id":"ORDER-1724922000000-a1b2c3d4"}}"#;
    let sig = calculate_signature(SECRET, payload.as_bytes());
    let (status, body) = post_webhook(payload, Some(&sig), true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn tampered_payload_is_rejected() {
    let sig = calculate_signature(SECRET, PAID_EVENT.as_bytes());
    let tampered = PAID_EVENT.replace("order.paid", "order.failed");
    let (status, _) = post_webhook(&tampered, Some(&sig), true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn wrong_key_is_rejected() {
    let sig = calculate_signature("some_other_secret", PAID_EVENT.as_bytes());
    let (status, _) = post_webhook(PAID_EVENT, Some(&sig), true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn missing_signature_header_is_rejected() {
    let (status, _) = post_webhook(PAID_EVENT, None, true).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn disabled_hmac_checks_allow_unsigned_deliveries() {
    let (status, body) = post_webhook(PAID_EVENT, None, false).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}

#[actix_web::test]
async fn unknown_event_types_are_still_acknowledged() {
    let payload = r#"{"event":"order.refund","order":{"order_id":"ORDER-1724922000000-a1b2c3d4"}}"#;
    let sig = calculate_signature(SECRET, payload.as_bytes());
    let (status, body) = post_webhook(payload, Some(&sig), true).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
}
