use std::fmt::Display;

use checkout_common::Rupees;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::{CustomerDetails, OrderId};

/// Client contract for the third-party payment gateway.
#[allow(async_fn_in_trait)]
pub trait PaymentGateway: Clone {
    /// Creates a remote payment order and returns the link the customer must follow to pay. No local side
    /// effects; safe for the caller to retry with a fresh order id if it fails.
    async fn create_payment_order(&self, order: &NewPaymentOrder) -> Result<PaymentOrder, PaymentGatewayError>;

    /// Reads the remote status of a payment order. Idempotent; safe to poll.
    async fn payment_order_status(&self, order_id: &OrderId) -> Result<RemoteOrderStatus, PaymentGatewayError>;
}

/// The request to create a remote payment order. The gateway client supplies the return/notify URLs from its own
/// configuration; everything else comes from the checkout request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewPaymentOrder {
    pub order_id: OrderId,
    pub amount: Rupees,
    pub currency: String,
    pub customer: CustomerDetails,
    /// Free-text note attached to the gateway order, e.g. "Shirt x 2".
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentOrder {
    pub order_id: OrderId,
    pub payment_link: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RemoteOrderStatus {
    Pending,
    Paid,
    Failed,
}

impl Display for RemoteOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteOrderStatus::Pending => write!(f, "Pending"),
            RemoteOrderStatus::Paid => write!(f, "Paid"),
            RemoteOrderStatus::Failed => write!(f, "Failed"),
        }
    }
}

#[derive(Debug, Clone, Error)]
pub enum PaymentGatewayError {
    /// Network error, timeout or remote 5xx. The initial creation call is safe to retry.
    #[error("Payment gateway unavailable: {0}")]
    Unavailable(String),
    /// Remote 4xx — the gateway rejected the request (e.g. malformed customer data).
    #[error("Payment gateway rejected the request. Error {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("Could not interpret the payment gateway response: {0}")]
    InvalidResponse(String),
}
