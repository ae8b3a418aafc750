//! A Rust client for the Cashfree Payment Gateway REST API.
//!
//! Covers the subset of the API the checkout flow needs: creating payment orders, reading their payment status,
//! and verifying webhook signatures. [`CashfreeApi`] implements the engine's
//! [`PaymentGateway`](checkout_engine::traits::PaymentGateway) trait.
mod api;
mod config;
mod error;

mod data_objects;
pub mod helpers;

pub use api::CashfreeApi;
pub use config::CashfreeConfig;
pub use data_objects::{
    CreateOrderRequest,
    CreateOrderResponse,
    CustomerDetails,
    OrderMeta,
    OrderStatusResponse,
    WebhookEvent,
    WebhookOrder,
    WEBHOOK_SIGNATURE_HEADER,
};
pub use error::CashfreeApiError;
