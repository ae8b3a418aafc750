use chrono::Utc;
use log::debug;
use sqlx::SqliteConnection;

use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType, ShipmentDetails, ShipmentIds},
    traits::OrderStoreError,
};

/// Inserts a new `PaymentPending` order into the database using the given connection. This is not atomic. You can
/// embed this call inside a transaction if you need to ensure atomicity, and pass `&mut *tx` as the connection
/// argument.
pub async fn insert_order(order: NewOrder, conn: &mut SqliteConnection) -> Result<Order, OrderStoreError> {
    let now = Utc::now();
    let order_id = order.order_id.clone();
    let result: Result<Order, sqlx::Error> = sqlx::query_as(
        r#"
            INSERT INTO orders (
                order_id,
                title,
                sku,
                price,
                quantity,
                name,
                email,
                phone,
                total_price,
                status,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $11)
            RETURNING *;
        "#,
    )
    .bind(order.order_id)
    .bind(order.product.title)
    .bind(order.product.sku)
    .bind(order.product.price)
    .bind(order.quantity)
    .bind(order.customer.name)
    .bind(order.customer.email)
    .bind(order.customer.phone)
    .bind(order.total_price)
    .bind(OrderStatusType::PaymentPending)
    .bind(now)
    .fetch_one(conn)
    .await;
    // The UNIQUE constraint on order_id is the duplicate check, so two racing inserts cannot both succeed.
    match result {
        Ok(order) => {
            debug!("📝️ Order [{}] inserted with id {}", order.order_id, order.id);
            Ok(order)
        },
        Err(sqlx::Error::Database(de)) if de.is_unique_violation() => {
            Err(OrderStoreError::OrderAlreadyExists(order_id))
        },
        Err(e) => Err(e.into()),
    }
}

pub async fn fetch_order_by_id(id: i64, conn: &mut SqliteConnection) -> Result<Option<Order>, sqlx::Error> {
    let order = sqlx::query_as("SELECT * FROM orders WHERE id = $1").bind(id).fetch_optional(conn).await?;
    Ok(order)
}

pub async fn fetch_order_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<Order>, sqlx::Error> {
    let order =
        sqlx::query_as("SELECT * FROM orders WHERE order_id = $1").bind(order_id.as_str()).fetch_optional(conn).await?;
    Ok(order)
}

/// Returns all orders, newest first.
pub async fn fetch_orders(conn: &mut SqliteConnection) -> Result<Vec<Order>, sqlx::Error> {
    let orders = sqlx::query_as("SELECT * FROM orders ORDER BY created_at DESC, id DESC").fetch_all(conn).await?;
    Ok(orders)
}

/// Moves the order to `new_status`, enforcing the lifecycle transition table. Run this inside a transaction to
/// close the gap between the status read and the write.
pub async fn update_order_status(
    order_id: &OrderId,
    new_status: OrderStatusType,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderStoreError> {
    let order = fetch_order_by_order_id(order_id, &mut *conn)
        .await?
        .ok_or_else(|| OrderStoreError::OrderNotFound(order_id.clone()))?;
    if !order.status.can_transition_to(new_status) {
        return Err(OrderStoreError::ForbiddenStatusChange { from: order.status, to: new_status });
    }
    let order: Order = sqlx::query_as(
        "UPDATE orders SET status = $1, updated_at = $2 WHERE order_id = $3 RETURNING *",
    )
    .bind(new_status)
    .bind(Utc::now())
    .bind(order_id.as_str())
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order [{}] moved to {}", order.order_id, order.status);
    Ok(order)
}

/// Completes the order record after a successful shipment: writes the shipping address, size and payment method
/// supplied at verification time, sets the carrier ids exactly once, and moves the status from `Paid` to
/// `Confirmed`.
pub async fn confirm_shipment(
    order_id: &OrderId,
    details: &ShipmentDetails,
    ids: &ShipmentIds,
    conn: &mut SqliteConnection,
) -> Result<Order, OrderStoreError> {
    let order = fetch_order_by_order_id(order_id, &mut *conn)
        .await?
        .ok_or_else(|| OrderStoreError::OrderNotFound(order_id.clone()))?;
    if !order.status.can_transition_to(OrderStatusType::Confirmed) {
        return Err(OrderStoreError::ForbiddenStatusChange { from: order.status, to: OrderStatusType::Confirmed });
    }
    let order: Order = sqlx::query_as(
        r#"
            UPDATE orders SET
                address = $1,
                sec_address = $2,
                city = $3,
                state = $4,
                pincode = $5,
                size = $6,
                payment_method = $7,
                shiprocket_order_id = $8,
                shipment_id = $9,
                status = $10,
                updated_at = $11
            WHERE order_id = $12
            RETURNING *;
        "#,
    )
    .bind(&details.shipping_address.address)
    .bind(&details.shipping_address.sec_address)
    .bind(&details.shipping_address.city)
    .bind(&details.shipping_address.state)
    .bind(&details.shipping_address.pincode)
    .bind(&details.size)
    .bind(details.payment_method)
    .bind(&ids.carrier_order_id)
    .bind(&ids.shipment_id)
    .bind(OrderStatusType::Confirmed)
    .bind(Utc::now())
    .bind(order_id.as_str())
    .fetch_one(conn)
    .await?;
    debug!("📝️ Order [{}] confirmed with carrier order {}", order.order_id, ids.carrier_order_id);
    Ok(order)
}
