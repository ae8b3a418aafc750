use std::fmt::{Debug, Display};

use checkout_common::{Rupees, INR_CURRENCY_CODE};
use chrono::{Duration, Utc};
use log::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    db_types::{
        CustomerDetails,
        NewOrder,
        Order,
        OrderId,
        OrderStatusType,
        PaymentMethod,
        ProductSnapshot,
        ShipmentDetails,
        ShippingAddress,
    },
    helpers::new_order_id,
    traits::{
        KeyStoreError,
        NewPaymentOrder,
        OrderStore,
        OrderStoreError,
        PaymentGateway,
        PaymentGatewayError,
        ProcessingKeyStore,
        RemoteOrderStatus,
        ShipmentRequest,
        ShippingGateway,
        ShippingGatewayError,
    },
};

/// `CheckoutApi` is the primary API for the checkout flow: it sequences idempotency checks, payment-order
/// creation, payment verification, shipment creation and local persistence, and exposes the cancel/return
/// transitions.
///
/// It is generic over the order/key store `B` and the two gateway clients, so the whole flow can be exercised
/// against mocks.
pub struct CheckoutApi<B, P, S> {
    db: B,
    payments: P,
    shipping: S,
    key_ttl: Duration,
}

impl<B, P, S> Debug for CheckoutApi<B, P, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CheckoutApi")
    }
}

impl<B, P, S> CheckoutApi<B, P, S> {
    pub fn new(db: B, payments: P, shipping: S, key_ttl: Duration) -> Self {
        Self { db, payments, shipping, key_ttl }
    }

    pub fn db(&self) -> &B {
        &self.db
    }
}

impl<B, P, S> CheckoutApi<B, P, S>
where
    B: OrderStore + ProcessingKeyStore,
    P: PaymentGateway,
    S: ShippingGateway,
{
    /// Starts a checkout: records the processing key, creates the remote payment order and persists a
    /// `PaymentPending` order record. Returns the payment link the customer must follow.
    ///
    /// A duplicate processing key rejects the request before any remote call is made. If the gateway call fails,
    /// the key is released again so that the client may legitimately retry the creation.
    pub async fn create_order(&self, checkout: NewCheckout) -> Result<CheckoutStarted, CheckoutError> {
        checkout.validate()?;
        match self.db.issue_key(&checkout.processing_key).await {
            Ok(()) => {},
            Err(KeyStoreError::AlreadyIssued(key)) => {
                debug!("🛒️ Duplicate order submission for processing key {key}");
                return Err(CheckoutError::DuplicateRequest(key));
            },
            Err(e) => return Err(e.into()),
        }
        let order_id = new_order_id();
        let note = format!("{} x {}", checkout.product.title, checkout.quantity);
        let payment_order = NewPaymentOrder {
            order_id: order_id.clone(),
            amount: checkout.amount,
            currency: INR_CURRENCY_CODE.to_string(),
            customer: checkout.customer.clone(),
            note,
        };
        let remote = match self.payments.create_payment_order(&payment_order).await {
            Ok(remote) => remote,
            Err(e) => {
                warn!("🛒️ Payment order creation for {order_id} failed. {e}");
                if let Err(release_err) = self.db.consume_key(&checkout.processing_key, self.key_ttl).await {
                    warn!(
                        "🛒️ Could not release the processing key after the gateway failure, so a retry will be \
                         rejected as a duplicate. {release_err}"
                    );
                }
                return Err(e.into());
            },
        };
        let order = NewOrder::new(
            remote.order_id.clone(),
            checkout.product,
            i64::from(checkout.quantity),
            checkout.customer,
            checkout.amount,
        );
        self.db.insert_order(order).await?;
        info!("🛒️ Payment order {order_id} created. Awaiting payment.");
        Ok(CheckoutStarted { order_id: remote.order_id, payment_link: remote.payment_link })
    }

    /// Verifies that the gateway order has been paid, and if so creates the shipment and confirms the local
    /// order record.
    ///
    /// The processing key is consumed up front, before the remote status read, so re-entry is blocked even when
    /// a later step fails. This makes the operation one-shot by construction: a carrier failure after this point
    /// cannot be retried under the same key and forces a fresh checkout.
    pub async fn verify_and_create_shipment(
        &self,
        order_id: &OrderId,
        details: VerifyDetails,
        processing_key: &str,
    ) -> Result<VerifyOutcome, CheckoutError> {
        if !self.db.consume_key(processing_key, self.key_ttl).await? {
            debug!("🛒️ Processing key for order {order_id} was never issued or has already been used");
            return Err(CheckoutError::InvalidProcessingKey);
        }
        let remote_status = self.payments.payment_order_status(order_id).await?;
        if remote_status != RemoteOrderStatus::Paid {
            info!("🛒️ Order {order_id} is not paid yet (remote status: {remote_status})");
            if remote_status == RemoteOrderStatus::Failed {
                self.mark_order_failed(order_id).await;
            }
            return Ok(VerifyOutcome::NotPaid(remote_status));
        }
        // The pending record is normally written when the checkout starts; recreate it from the verification
        // details if the store has lost it (e.g. a restart in between).
        if self.db.fetch_order_by_order_id(order_id).await?.is_none() {
            let total = details.product.price * details.quantity;
            let order = NewOrder::new(
                order_id.clone(),
                details.product.clone(),
                details.quantity,
                details.customer.clone(),
                total,
            );
            self.db.insert_order(order).await?;
        }
        let token = self
            .shipping
            .authenticate()
            .await
            .map_err(|source| CheckoutError::Shipping { stage: ShipmentStage::Auth, source })?;
        let request = ShipmentRequest {
            order_id: order_id.clone(),
            order_date: Utc::now().date_naive(),
            customer: details.customer,
            shipping_address: details.shipping_address.clone(),
            product: details.product,
            quantity: details.quantity,
            payment_method: details.payment_method,
        };
        let ids = self
            .shipping
            .create_shipment(&token, &request)
            .await
            .map_err(|source| CheckoutError::Shipping { stage: ShipmentStage::Create, source })?;
        self.db.update_order_status(order_id, OrderStatusType::Paid).await?;
        let shipment_details = ShipmentDetails {
            shipping_address: details.shipping_address,
            size: details.size,
            payment_method: details.payment_method,
        };
        let order = self.db.confirm_shipment(order_id, &shipment_details, &ids).await?;
        info!("🛒️ Order {order_id} confirmed. Carrier order {} shipment {}", ids.carrier_order_id, ids.shipment_id);
        Ok(VerifyOutcome::Confirmed(order))
    }

    /// Cancels the shipment for a confirmed order and moves the local record to `Cancelled`.
    ///
    /// A carrier failure surfaces as an error and leaves the local status unchanged; there is nothing to roll
    /// back because the status is only updated after the carrier acknowledges the cancellation.
    pub async fn cancel_order(&self, id: i64) -> Result<Order, CheckoutError> {
        let order = self.db.fetch_order_by_id(id).await?.ok_or(CheckoutError::OrderNotFound(id))?;
        let carrier_order_id = order.shiprocket_order_id.clone().ok_or(CheckoutError::NotShipped(id))?;
        // Check the transition up front so a repeated cancel never reaches the carrier a second time.
        if !order.status.can_transition_to(OrderStatusType::Cancelled) {
            debug!("🛒️ Order {} cannot move from {} to Cancelled", order.order_id, order.status);
            return Err(
                OrderStoreError::ForbiddenStatusChange { from: order.status, to: OrderStatusType::Cancelled }.into()
            );
        }
        let token = self
            .shipping
            .authenticate()
            .await
            .map_err(|source| CheckoutError::Shipping { stage: ShipmentStage::Auth, source })?;
        self.shipping
            .cancel_shipment(&token, &carrier_order_id, "Cancelled by customer")
            .await
            .map_err(|source| CheckoutError::Shipping { stage: ShipmentStage::Cancel, source })?;
        let order = self.db.update_order_status(&order.order_id, OrderStatusType::Cancelled).await?;
        info!("🛒️ Order {} cancelled (carrier order {carrier_order_id})", order.order_id);
        Ok(order)
    }

    /// Registers a return for a confirmed order and moves the local record to `ReturnRequested`.
    pub async fn create_return(&self, id: i64) -> Result<Order, CheckoutError> {
        let order = self.db.fetch_order_by_id(id).await?.ok_or(CheckoutError::OrderNotFound(id))?;
        let carrier_order_id = order.shiprocket_order_id.clone().ok_or(CheckoutError::NotShipped(id))?;
        if !order.status.can_transition_to(OrderStatusType::ReturnRequested) {
            debug!("🛒️ Order {} cannot move from {} to ReturnRequested", order.order_id, order.status);
            return Err(OrderStoreError::ForbiddenStatusChange {
                from: order.status,
                to: OrderStatusType::ReturnRequested,
            }
            .into());
        }
        let token = self
            .shipping
            .authenticate()
            .await
            .map_err(|source| CheckoutError::Shipping { stage: ShipmentStage::Auth, source })?;
        self.shipping
            .create_return(&token, &order)
            .await
            .map_err(|source| CheckoutError::Shipping { stage: ShipmentStage::Return, source })?;
        let order = self.db.update_order_status(&order.order_id, OrderStatusType::ReturnRequested).await?;
        info!("🛒️ Return requested for order {} (carrier order {carrier_order_id})", order.order_id);
        Ok(order)
    }

    /// Records an already-verified webhook notification. The webhook path is observational only: it lets an
    /// operator reconcile payment outcomes asynchronously and never mutates order state itself.
    pub fn record_webhook(&self, event_type: &str, order_id: &OrderId) -> WebhookDisposition {
        match event_type {
            "order.paid" => {
                info!("💸️ Webhook: payment succeeded for order {order_id}");
                WebhookDisposition::Recorded
            },
            "order.failed" => {
                info!("💸️ Webhook: payment failed for order {order_id}");
                WebhookDisposition::Recorded
            },
            other => {
                debug!("💸️ Webhook: ignoring unhandled event {other} for order {order_id}");
                WebhookDisposition::Ignored
            },
        }
    }

    async fn mark_order_failed(&self, order_id: &OrderId) {
        match self.db.fetch_order_by_order_id(order_id).await {
            Ok(Some(order)) if order.status.can_transition_to(OrderStatusType::Failed) => {
                if let Err(e) = self.db.update_order_status(order_id, OrderStatusType::Failed).await {
                    warn!("🛒️ Could not mark order {order_id} as failed. {e}");
                }
            },
            Ok(_) => {},
            Err(e) => warn!("🛒️ Could not look up order {order_id} to mark it failed. {e}"),
        }
    }
}

//--------------------------------------      NewCheckout      -------------------------------------------------------
/// A validated checkout request: everything needed to create the remote payment order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewCheckout {
    pub processing_key: String,
    pub amount: Rupees,
    pub customer: CustomerDetails,
    pub product: ProductSnapshot,
    pub quantity: u32,
}

impl NewCheckout {
    fn validate(&self) -> Result<(), CheckoutError> {
        if self.processing_key.trim().is_empty() {
            return Err(CheckoutError::ValidationError("processing key is required".to_string()));
        }
        if self.amount.value() <= 0 {
            return Err(CheckoutError::ValidationError(format!("amount must be positive, got {}", self.amount)));
        }
        if self.customer.name.trim().is_empty() ||
            self.customer.email.trim().is_empty() ||
            self.customer.phone.trim().is_empty()
        {
            return Err(CheckoutError::ValidationError("customer name, email and phone are required".to_string()));
        }
        if self.product.title.trim().is_empty() {
            return Err(CheckoutError::ValidationError("product title is required".to_string()));
        }
        if self.quantity == 0 {
            return Err(CheckoutError::ValidationError("quantity must be at least 1".to_string()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutStarted {
    pub order_id: OrderId,
    pub payment_link: String,
}

//--------------------------------------     VerifyDetails     -------------------------------------------------------
/// The order details supplied with the verification call. The shipment payload is built from these, not from the
/// stored record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyDetails {
    pub customer: CustomerDetails,
    pub shipping_address: ShippingAddress,
    pub product: ProductSnapshot,
    pub quantity: i64,
    pub size: Option<String>,
    pub payment_method: PaymentMethod,
}

/// The outcome of a verification attempt. `NotPaid` is a normal result, not an error: the caller decides whether
/// to re-poll with a fresh processing key.
#[derive(Debug, Clone)]
pub enum VerifyOutcome {
    Confirmed(Order),
    NotPaid(RemoteOrderStatus),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WebhookDisposition {
    Recorded,
    Ignored,
}

//--------------------------------------     ShipmentStage     -------------------------------------------------------
/// Which carrier interaction failed. Surfaced so callers can tell an authentication problem from a rejected
/// shipment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShipmentStage {
    Auth,
    Create,
    Cancel,
    Return,
}

impl Display for ShipmentStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShipmentStage::Auth => write!(f, "auth"),
            ShipmentStage::Create => write!(f, "create"),
            ShipmentStage::Cancel => write!(f, "cancel"),
            ShipmentStage::Return => write!(f, "return"),
        }
    }
}

//--------------------------------------     CheckoutError     -------------------------------------------------------
#[derive(Debug, Clone, Error)]
pub enum CheckoutError {
    #[error("Missing or invalid field in checkout request: {0}")]
    ValidationError(String),
    #[error("Duplicate order submission for processing key {0}")]
    DuplicateRequest(String),
    #[error("The processing key was never issued or has already been used")]
    InvalidProcessingKey,
    #[error("Order {0} has no shipment to act on")]
    NotShipped(i64),
    #[error("The requested order (internal id {0}) does not exist")]
    OrderNotFound(i64),
    #[error(transparent)]
    PaymentGateway(#[from] PaymentGatewayError),
    #[error("Shipping gateway call failed at the {stage} stage. {source}")]
    Shipping { stage: ShipmentStage, source: ShippingGatewayError },
    #[error(transparent)]
    OrderStore(#[from] crate::traits::OrderStoreError),
    #[error(transparent)]
    KeyStore(#[from] KeyStoreError),
}
