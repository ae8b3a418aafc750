use thiserror::Error;

use crate::db_types::{NewOrder, Order, OrderId, OrderStatusType, ShipmentDetails, ShipmentIds};

/// Persistence contract for the local order record.
///
/// Implementations must enforce the lifecycle rules from [`OrderStatusType::can_transition_to`]: the status only
/// moves forward, carrier ids are written exactly once, and a duplicate gateway order id is an error.
#[allow(async_fn_in_trait)]
pub trait OrderStore: Clone {
    /// Inserts a new `PaymentPending` order record. Fails with [`OrderStoreError::OrderAlreadyExists`] if an
    /// order with the same gateway order id is already present.
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError>;

    /// Fetches an order by its local (store-assigned) id.
    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, OrderStoreError>;

    /// Fetches an order by the payment gateway order id.
    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;

    /// Returns all orders, newest first. Used by the operator listing.
    async fn fetch_orders(&self) -> Result<Vec<Order>, OrderStoreError>;

    /// Moves the order to `new_status`, enforcing the transition table.
    async fn update_order_status(&self, order_id: &OrderId, new_status: OrderStatusType) -> Result<Order, OrderStoreError>;

    /// Completes the order record after a successful shipment: writes the shipping address and payment method
    /// supplied at verification time, sets the carrier ids, and moves the status from `Paid` to `Confirmed`.
    async fn confirm_shipment(
        &self,
        order_id: &OrderId,
        details: &ShipmentDetails,
        ids: &ShipmentIds,
    ) -> Result<Order, OrderStoreError>;
}

#[derive(Debug, Clone, Error)]
pub enum OrderStoreError {
    #[error("Internal database error: {0}")]
    DatabaseError(String),
    #[error("Cannot insert order, since it already exists with gateway id {0}")]
    OrderAlreadyExists(OrderId),
    #[error("The requested order {0} does not exist")]
    OrderNotFound(OrderId),
    #[error("The requested order (internal id {0}) does not exist")]
    OrderIdNotFound(i64),
    #[error("Illegal order status change from {from} to {to}")]
    ForbiddenStatusChange { from: OrderStatusType, to: OrderStatusType },
}

impl From<sqlx::Error> for OrderStoreError {
    fn from(e: sqlx::Error) -> Self {
        OrderStoreError::DatabaseError(e.to_string())
    }
}
