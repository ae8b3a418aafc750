//! Checkout Engine
//!
//! The checkout engine carries the order-lifecycle logic for the storefront: it sequences payment-order creation
//! against the payment gateway, payment verification, shipment creation against the logistics gateway, and local
//! persistence of the resulting order record. It is provider-agnostic.
//!
//! The library is divided into three main sections:
//! 1. The data types stored and returned by the engine ([`mod@db_types`]).
//! 2. The trait contracts ([`mod@traits`]) that persistence backends and gateway clients must implement. The
//!    engine ships a SQLite order/key store; the `cashfree_tools` and `shiprocket_tools` crates provide the
//!    gateway clients.
//! 3. The orchestration API ([`CheckoutApi`]), which is generic over those traits and contains the actual
//!    checkout flow, including duplicate-submission suppression via single-use processing keys.
pub mod db_types;
pub mod helpers;
mod keys;
pub mod traits;

mod checkout_api;

#[cfg(feature = "sqlite")]
mod sqlite;

pub use checkout_api::{CheckoutApi, CheckoutError, CheckoutStarted, NewCheckout, ShipmentStage, VerifyDetails, VerifyOutcome, WebhookDisposition};
pub use keys::MemoryKeyStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;
