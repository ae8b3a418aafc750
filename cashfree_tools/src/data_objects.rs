use checkout_common::Rupees;
use serde::{Deserialize, Serialize};

/// Cashfree sends the webhook signature in this header.
pub const WEBHOOK_SIGNATURE_HEADER: &str = "x-webhook-signature";

//--------------------------------------   CustomerDetails     -------------------------------------------------------
/// Customer details in Cashfree's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub customer_id: String,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
}

impl From<checkout_engine::db_types::CustomerDetails> for CustomerDetails {
    fn from(c: checkout_engine::db_types::CustomerDetails) -> Self {
        // The phone number is the most stable customer handle we hold, so it doubles as the customer id.
        Self { customer_id: c.phone.clone(), customer_name: c.name, customer_email: c.email, customer_phone: c.phone }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderMeta {
    pub return_url: String,
    pub notify_url: String,
}

//--------------------------------------  CreateOrderRequest   -------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    pub order_id: String,
    /// Order total in fractional rupees, as Cashfree expects amounts.
    pub order_amount: f64,
    pub order_currency: String,
    pub customer_details: CustomerDetails,
    pub order_meta: OrderMeta,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_note: Option<String>,
}

impl CreateOrderRequest {
    pub fn new(
        order_id: String,
        amount: Rupees,
        currency: String,
        customer: CustomerDetails,
        meta: OrderMeta,
        note: Option<String>,
    ) -> Self {
        Self {
            order_id,
            order_amount: amount.to_rupees(),
            order_currency: currency,
            customer_details: customer,
            order_meta: meta,
            order_note: note,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub payment_link: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct OrderStatusResponse {
    pub order_id: String,
    /// One of `ACTIVE`, `PAID`, `EXPIRED` or `TERMINATED`.
    pub order_status: String,
}

//--------------------------------------     WebhookEvent      -------------------------------------------------------
/// A webhook notification from Cashfree, e.g. `order.paid`. Only the fields the server cares about are
/// deserialized.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEvent {
    pub event: String,
    pub order: WebhookOrder,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookOrder {
    pub order_id: String,
}
