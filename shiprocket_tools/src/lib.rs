//! A Rust client for the Shiprocket logistics REST API.
//!
//! Covers the subset of the API the checkout flow needs: authentication, adhoc order (shipment) creation,
//! cancellation and returns. [`ShiprocketApi`] implements the engine's
//! [`ShippingGateway`](checkout_engine::traits::ShippingGateway) trait, caching the bearer token between calls.
mod api;
mod config;
mod error;

mod data_objects;

pub use api::ShiprocketApi;
pub use config::ShiprocketConfig;
pub use data_objects::{
    CancelOrderRequest,
    CreateOrderResponse,
    LoginRequest,
    LoginResponse,
    OrderItem,
    ReturnOrderRequest,
    ShiprocketOrder,
};
pub use error::ShiprocketApiError;
