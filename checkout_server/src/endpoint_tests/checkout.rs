use actix_web::{http::StatusCode, test, test::TestRequest, web, App};
use checkout_common::Rupees;
use checkout_engine::{
    db_types::{
        CustomerDetails,
        Order,
        OrderId,
        OrderStatusType,
        PaymentMethod,
        ProductSnapshot,
        ShippingAddress,
    },
    traits::{KeyStoreError, PaymentOrder, RemoteOrderStatus},
    CheckoutApi,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};

use super::mocks::{MockBackend, MockPayments, MockShipping};
use crate::routes;

fn app_data(
    db: MockBackend,
    payments: MockPayments,
    shipping: MockShipping,
) -> web::Data<CheckoutApi<MockBackend, MockPayments, MockShipping>> {
    let _ = env_logger::try_init();
    web::Data::new(CheckoutApi::new(db, payments, shipping, Duration::hours(1)))
}

fn order(id: i64, order_id: &str, status: OrderStatusType, shipped: bool) -> Order {
    Order {
        id,
        order_id: OrderId(order_id.to_string()),
        product: ProductSnapshot {
            title: "Shirt".to_string(),
            sku: Some("SKU-17".to_string()),
            price: Rupees::from_rupees(250),
        },
        quantity: 2,
        size: Some("M".to_string()),
        payment_method: PaymentMethod::Prepaid,
        customer: CustomerDetails {
            name: "Asha Rao".to_string(),
            email: "asha@example.com".to_string(),
            phone: "9800011122".to_string(),
        },
        shipping_address: ShippingAddress::default(),
        total_price: Rupees::from_rupees(500),
        status,
        shiprocket_order_id: shipped.then(|| "7001".to_string()),
        shipment_id: shipped.then(|| "9001".to_string()),
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

fn create_order_body(key: &str) -> Value {
    json!({
        "amount": 500.0,
        "customer": { "name": "Asha Rao", "email": "asha@example.com", "phone": "9800011122" },
        "product": { "title": "Shirt", "sku": "SKU-17", "price": 250.0 },
        "quantity": 2,
        "processingKey": key,
    })
}

fn verify_body(order_id: &str, key: &str) -> Value {
    json!({
        "orderId": order_id,
        "processingKey": key,
        "orderDetails": {
            "customer": { "name": "Asha Rao", "email": "asha@example.com", "phone": "9800011122" },
            "product": { "title": "Shirt", "sku": "SKU-17", "price": 250.0 },
            "quantity": 2,
            "address": "14 MG Road",
            "city": "Jaipur",
            "state": "Rajasthan",
            "pincode": "302001",
            "size": "M",
            "paymentMethod": "Prepaid",
        },
    })
}

#[actix_web::test]
async fn health_check() {
    let app = test::init_service(App::new().service(routes::health)).await;
    let req = TestRequest::get().uri("/health").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn create_order_returns_payment_link() {
    let mut db = MockBackend::new();
    db.expect_issue_key().returning(|_| Ok(()));
    db.expect_insert_order()
        .returning(|o| Ok(order(1, o.order_id.as_str(), OrderStatusType::PaymentPending, false)));
    let mut payments = MockPayments::new();
    payments.expect_create_payment_order().returning(|o| {
        Ok(PaymentOrder { order_id: o.order_id.clone(), payment_link: "https://pay.example/abc".to_string() })
    });
    let data = app_data(db, payments, MockShipping::new());
    let app = test::init_service(
        App::new().app_data(data).route(
            "/order/create",
            web::post().to(routes::create_order::<MockBackend, MockPayments, MockShipping>),
        ),
    )
    .await;
    let req = TestRequest::post().uri("/order/create").set_json(create_order_body("key-1")).to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["paymentLink"], "https://pay.example/abc");
    assert!(body["orderId"].as_str().unwrap().starts_with("ORDER-"));
}

#[actix_web::test]
async fn duplicate_processing_key_is_a_bad_request() {
    let mut db = MockBackend::new();
    db.expect_issue_key().returning(|k| Err(KeyStoreError::AlreadyIssued(k.to_string())));
    let mut payments = MockPayments::new();
    payments.expect_create_payment_order().times(0);
    let data = app_data(db, payments, MockShipping::new());
    let app = test::init_service(
        App::new().app_data(data).route(
            "/order/create",
            web::post().to(routes::create_order::<MockBackend, MockPayments, MockShipping>),
        ),
    )
    .await;
    let req = TestRequest::post().uri("/order/create").set_json(create_order_body("key-1")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn malformed_create_order_body_is_a_bad_request() {
    let data = app_data(MockBackend::new(), MockPayments::new(), MockShipping::new());
    let app = test::init_service(
        App::new().app_data(data).route(
            "/order/create",
            web::post().to(routes::create_order::<MockBackend, MockPayments, MockShipping>),
        ),
    )
    .await;
    let req = TestRequest::post().uri("/order/create").set_json(json!({ "amount": 500.0 })).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn unpaid_order_reports_failure_without_error() {
    let mut db = MockBackend::new();
    db.expect_consume_key().returning(|_, _| Ok(true));
    let mut payments = MockPayments::new();
    payments.expect_payment_order_status().returning(|_| Ok(RemoteOrderStatus::Pending));
    let mut shipping = MockShipping::new();
    shipping.expect_authenticate().times(0);
    let data = app_data(db, payments, shipping);
    let app = test::init_service(
        App::new().app_data(data).route(
            "/order/verify-and-ship",
            web::post().to(routes::verify_and_ship::<MockBackend, MockPayments, MockShipping>),
        ),
    )
    .await;
    let req = TestRequest::post().uri("/order/verify-and-ship").set_json(verify_body("ORDER-1", "key-1")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["success"], false);
}

#[actix_web::test]
async fn consumed_key_is_a_bad_request() {
    let mut db = MockBackend::new();
    db.expect_consume_key().returning(|_, _| Ok(false));
    let mut payments = MockPayments::new();
    payments.expect_payment_order_status().times(0);
    let data = app_data(db, payments, MockShipping::new());
    let app = test::init_service(
        App::new().app_data(data).route(
            "/order/verify-and-ship",
            web::post().to(routes::verify_and_ship::<MockBackend, MockPayments, MockShipping>),
        ),
    )
    .await;
    let req = TestRequest::post().uri("/order/verify-and-ship").set_json(verify_body("ORDER-1", "key-1")).to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cancelling_an_unshipped_order_is_a_bad_request() {
    let mut db = MockBackend::new();
    db.expect_fetch_order_by_id()
        .returning(|id| Ok(Some(order(id, "ORDER-4", OrderStatusType::PaymentPending, false))));
    let data = app_data(db, MockPayments::new(), MockShipping::new());
    let app = test::init_service(
        App::new().app_data(data).route(
            "/order/{id}/cancel",
            web::post().to(routes::cancel_order::<MockBackend, MockPayments, MockShipping>),
        ),
    )
    .await;
    let req = TestRequest::post().uri("/order/4/cancel").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cancelling_a_cancelled_order_is_a_bad_request() {
    let mut db = MockBackend::new();
    db.expect_fetch_order_by_id()
        .returning(|id| Ok(Some(order(id, "ORDER-4", OrderStatusType::Cancelled, true))));
    let data = app_data(db, MockPayments::new(), MockShipping::new());
    let app = test::init_service(
        App::new().app_data(data).route(
            "/order/{id}/cancel",
            web::post().to(routes::cancel_order::<MockBackend, MockPayments, MockShipping>),
        ),
    )
    .await;
    let req = TestRequest::post().uri("/order/4/cancel").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cancelling_an_unknown_order_is_not_found() {
    let mut db = MockBackend::new();
    db.expect_fetch_order_by_id().returning(|_| Ok(None));
    let data = app_data(db, MockPayments::new(), MockShipping::new());
    let app = test::init_service(
        App::new().app_data(data).route(
            "/order/{id}/cancel",
            web::post().to(routes::cancel_order::<MockBackend, MockPayments, MockShipping>),
        ),
    )
    .await;
    let req = TestRequest::post().uri("/order/99/cancel").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn order_listing_returns_all_orders() {
    let mut db = MockBackend::new();
    db.expect_fetch_orders().returning(|| {
        Ok(vec![order(2, "ORDER-2", OrderStatusType::Confirmed, true), order(1, "ORDER-1", OrderStatusType::PaymentPending, false)])
    });
    let data = app_data(db, MockPayments::new(), MockShipping::new());
    let app = test::init_service(
        App::new()
            .app_data(data)
            .route("/orders", web::get().to(routes::list_orders::<MockBackend, MockPayments, MockShipping>)),
    )
    .await;
    let req = TestRequest::get().uri("/orders").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let orders = body.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0]["order_id"], "ORDER-2");
    assert_eq!(orders[0]["shiprocket_order_id"], "7001");
    assert_eq!(orders[1]["status"], "PaymentPending");
}
