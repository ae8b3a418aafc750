//! `SqliteDatabase` is the concrete storage backend for the checkout engine.
//!
//! Unsurprisingly, it uses SQLite, and implements both the [`OrderStore`] and [`ProcessingKeyStore`] traits, so a
//! single instance serves as the `B` parameter of [`crate::CheckoutApi`].
use std::fmt::Debug;

use chrono::Duration;
use sqlx::SqlitePool;

use super::db::{db_url, keys, new_pool, orders, MIGRATOR};
use crate::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType, ShipmentDetails, ShipmentIds},
    traits::{KeyStoreError, OrderStore, OrderStoreError, ProcessingKeyStore},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Connects to the database given by the `CHK_DATABASE_URL` environment variable, or the default path if it is
    /// not set.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    /// Brings the schema up to date. Call once at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        MIGRATOR.run(&self.pool).await
    }

    pub fn url(&self) -> &str {
        self.url.as_str()
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl OrderStore for SqliteDatabase {
    async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        orders::insert_order(order, &mut conn).await
    }

    async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_id(id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let order = orders::fetch_order_by_order_id(order_id, &mut conn).await?;
        Ok(order)
    }

    async fn fetch_orders(&self) -> Result<Vec<Order>, OrderStoreError> {
        let mut conn = self.pool.acquire().await?;
        let orders = orders::fetch_orders(&mut conn).await?;
        Ok(orders)
    }

    async fn update_order_status(
        &self,
        order_id: &OrderId,
        new_status: OrderStatusType,
    ) -> Result<Order, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::update_order_status(order_id, new_status, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }

    async fn confirm_shipment(
        &self,
        order_id: &OrderId,
        details: &ShipmentDetails,
        ids: &ShipmentIds,
    ) -> Result<Order, OrderStoreError> {
        let mut tx = self.pool.begin().await?;
        let order = orders::confirm_shipment(order_id, details, ids, &mut tx).await?;
        tx.commit().await?;
        Ok(order)
    }
}

impl ProcessingKeyStore for SqliteDatabase {
    async fn issue_key(&self, key: &str) -> Result<(), KeyStoreError> {
        let mut conn = self.pool.acquire().await?;
        keys::issue_key(key, &mut conn).await
    }

    async fn consume_key(&self, key: &str, ttl: Duration) -> Result<bool, KeyStoreError> {
        let mut conn = self.pool.acquire().await?;
        keys::consume_key(key, ttl, &mut conn).await
    }

    async fn sweep_expired_keys(&self, ttl: Duration) -> Result<usize, KeyStoreError> {
        let mut conn = self.pool.acquire().await?;
        keys::sweep_expired_keys(ttl, &mut conn).await
    }
}
