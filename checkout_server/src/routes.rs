//! Route handlers for the checkout server.
//!
//! The handlers are generic over the same type parameters as [`CheckoutApi`], so the endpoint tests can run the
//! full HTTP stack against mocked stores and gateways. `server.rs` registers them with the concrete types.
use actix_web::{get, web, HttpResponse, Responder};
use cashfree_tools::WebhookEvent;
use checkout_engine::{
    db_types::OrderId,
    traits::{OrderStore, PaymentGateway, ProcessingKeyStore, ShippingGateway},
    CheckoutApi,
    VerifyOutcome,
};
use log::*;

use crate::{
    data_objects::{CreateOrderRequest, CreateOrderResponse, JsonResponse, VerifyRequest},
    errors::ServerError,
};

#[get("/health")]
pub async fn health() -> impl Responder {
    trace!("💻️ Received health check request");
    HttpResponse::Ok().body("👍️\n")
}

/// Route handler for the order creation endpoint.
///
/// Converts the storefront payload into a checkout request and returns the payment link the customer must follow.
/// A duplicate processing key is a 400.
pub async fn create_order<B, P, S>(
    api: web::Data<CheckoutApi<B, P, S>>,
    body: web::Json<CreateOrderRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore + ProcessingKeyStore,
    P: PaymentGateway,
    S: ShippingGateway,
{
    let checkout = body.into_inner().try_into()?;
    let started = api.create_order(checkout).await?;
    debug!("🛒️ Checkout started for order {}", started.order_id);
    let response =
        CreateOrderResponse { order_id: started.order_id.as_str().to_string(), payment_link: started.payment_link };
    Ok(HttpResponse::Ok().json(response))
}

/// Route handler for the payment verification endpoint.
///
/// Consumes the processing key, checks the payment status with the gateway, and creates the shipment if the order
/// is paid. An unpaid order is not an error: the response carries `success: false` and the observed status, and
/// the customer needs a fresh checkout to try again.
pub async fn verify_and_ship<B, P, S>(
    api: web::Data<CheckoutApi<B, P, S>>,
    body: web::Json<VerifyRequest>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore + ProcessingKeyStore,
    P: PaymentGateway,
    S: ShippingGateway,
{
    let request = body.into_inner();
    let order_id = request.order_id.clone();
    let details = request.order_details.try_into()?;
    let outcome = api.verify_and_create_shipment(&order_id, details, &request.processing_key).await?;
    match outcome {
        VerifyOutcome::Confirmed(order) => {
            info!("🛒️ Order {order_id} verified and shipped");
            Ok(HttpResponse::Ok().json(order))
        },
        VerifyOutcome::NotPaid(status) => {
            info!("🛒️ Order {order_id} is not paid ({status})");
            Ok(HttpResponse::Ok().json(JsonResponse::failure(format!("Payment not completed. Status: {status}"))))
        },
    }
}

/// Route handler for order cancellation. `id` is the internal (store-assigned) order id.
pub async fn cancel_order<B, P, S>(
    api: web::Data<CheckoutApi<B, P, S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore + ProcessingKeyStore,
    P: PaymentGateway,
    S: ShippingGateway,
{
    let id = path.into_inner();
    let order = api.cancel_order(id).await?;
    info!("🛒️ Order {} cancelled", order.order_id);
    Ok(HttpResponse::Ok().json(order))
}

/// Route handler for return requests. `id` is the internal (store-assigned) order id.
pub async fn create_return<B, P, S>(
    api: web::Data<CheckoutApi<B, P, S>>,
    path: web::Path<i64>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore + ProcessingKeyStore,
    P: PaymentGateway,
    S: ShippingGateway,
{
    let id = path.into_inner();
    let order = api.create_return(id).await?;
    info!("🛒️ Return requested for order {}", order.order_id);
    Ok(HttpResponse::Ok().json(order))
}

/// Route handler for the operator order listing.
pub async fn list_orders<B, P, S>(api: web::Data<CheckoutApi<B, P, S>>) -> Result<HttpResponse, ServerError>
where
    B: OrderStore + ProcessingKeyStore,
    P: PaymentGateway,
    S: ShippingGateway,
{
    let orders = api.db().fetch_orders().await.map_err(|e| ServerError::BackendError(e.to_string()))?;
    debug!("🛒️ Listing {} order(s)", orders.len());
    Ok(HttpResponse::Ok().json(orders))
}

/// Route handler for the payment webhook. The HMAC middleware has already verified the signature by the time this
/// runs, and webhook processing is observational, so the response is always a 200 for well-formed payloads.
pub async fn cashfree_webhook<B, P, S>(
    api: web::Data<CheckoutApi<B, P, S>>,
    body: web::Json<WebhookEvent>,
) -> Result<HttpResponse, ServerError>
where
    B: OrderStore + ProcessingKeyStore,
    P: PaymentGateway,
    S: ShippingGateway,
{
    let event = body.into_inner();
    let order_id = OrderId(event.order.order_id);
    api.record_webhook(&event.event, &order_id);
    Ok(HttpResponse::Ok().json(JsonResponse::success("Webhook processed successfully")))
}
