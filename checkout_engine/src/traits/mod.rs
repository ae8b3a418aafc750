//! Trait contracts for the checkout engine's collaborators.
//!
//! The engine never talks to a database or a remote gateway directly. Instead it is generic over four narrow
//! interfaces:
//!
//! * [`OrderStore`] — persistence for the local order record and its lifecycle status.
//! * [`ProcessingKeyStore`] — the idempotency guard: single-use processing keys with a fixed TTL.
//! * [`PaymentGateway`] — creating remote payment orders and reading their status.
//! * [`ShippingGateway`] — authenticating with the carrier and managing shipments.
//!
//! The SQLite backend in this crate implements both store traits; the `cashfree_tools` and `shiprocket_tools`
//! crates implement the gateway traits. Tests mock any of them with `mockall`.
mod order_store;
mod payment_gateway;
mod processing_keys;
mod shipping_gateway;

pub use order_store::{OrderStore, OrderStoreError};
pub use payment_gateway::{NewPaymentOrder, PaymentGateway, PaymentGatewayError, PaymentOrder, RemoteOrderStatus};
pub use processing_keys::{KeyStoreError, ProcessingKeyStore};
pub use shipping_gateway::{CarrierToken, ShipmentRequest, ShippingGateway, ShippingGatewayError};
