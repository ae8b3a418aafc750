use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db_types::{CustomerDetails, Order, OrderId, PaymentMethod, ProductSnapshot, ShipmentIds, ShippingAddress};

/// Client contract for the third-party logistics gateway.
///
/// The carrier uses short-lived bearer tokens. Callers authenticate once per flow and pass the token to the
/// subsequent calls; implementations may cache the token internally, but must then tolerate a stale token by
/// re-authenticating once and retrying.
#[allow(async_fn_in_trait)]
pub trait ShippingGateway: Clone {
    /// Logs into the carrier with the configured service credentials.
    async fn authenticate(&self) -> Result<CarrierToken, ShippingGatewayError>;

    /// Creates a shipment for a gateway-confirmed payment. Single attempt; the caller does not retry.
    async fn create_shipment(&self, token: &CarrierToken, request: &ShipmentRequest) -> Result<ShipmentIds, ShippingGatewayError>;

    /// Cancels an existing shipment.
    async fn cancel_shipment(&self, token: &CarrierToken, carrier_order_id: &str, reason: &str) -> Result<(), ShippingGatewayError>;

    /// Registers a return for a shipped order. The carrier needs the full original order (pickup address,
    /// items), which the completed [`Order`] record carries.
    async fn create_return(&self, token: &CarrierToken, order: &Order) -> Result<(), ShippingGatewayError>;
}

/// A carrier bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CarrierToken(pub String);

impl CarrierToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Everything the carrier needs to create a shipment. The gateway client turns this into its own wire format,
/// computing the sub-total (unit price × quantity) and attaching the fixed package dimensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentRequest {
    pub order_id: OrderId,
    pub order_date: NaiveDate,
    pub customer: CustomerDetails,
    pub shipping_address: ShippingAddress,
    pub product: ProductSnapshot,
    pub quantity: i64,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Clone, Error)]
pub enum ShippingGatewayError {
    /// Network error, timeout or remote 5xx.
    #[error("Shipping gateway unavailable: {0}")]
    Unavailable(String),
    /// Remote 4xx — the carrier rejected the request (e.g. invalid pincode).
    #[error("Shipping gateway rejected the request. Error {status}. {message}")]
    Rejected { status: u16, message: String },
    #[error("Could not authenticate with the shipping gateway: {0}")]
    AuthenticationFailed(String),
    #[error("Could not interpret the shipping gateway response: {0}")]
    InvalidResponse(String),
}
