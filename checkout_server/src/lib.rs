//! # Checkout server
//! This module hosts the HTTP surface for the storefront checkout backend. It is responsible for:
//! Accepting checkout requests and creating payment orders with the payment gateway.
//! Verifying payments and creating shipments with the logistics gateway.
//! Handling order cancellations and returns.
//! Receiving (signature-checked) payment webhook notifications.
//!
//! ## Configuration
//! The server is configured via environment variables. See [config](config/index.html) for more information.
//!
//! ## Routes
//! The server exposes the following routes:
//! * `/health`: A health check route that returns a 200 OK response.
//! * `/order/create`: Starts a checkout and returns the payment link.
//! * `/order/verify-and-ship`: Verifies payment and creates the shipment.
//! * `/order/{id}/cancel` and `/order/{id}/return`: lifecycle transitions for confirmed orders.
//! * `/orders`: The operator order listing.
//! * `/webhook/cashfree`: The payment webhook, guarded by HMAC signature checks.
pub mod config;
pub mod data_objects;
pub mod errors;
pub mod key_sweeper;
pub mod middleware;
pub mod routes;
pub mod server;

#[cfg(test)]
mod endpoint_tests;
