use std::{fmt::Display, str::FromStr};

use checkout_common::Rupees;
use chrono::{DateTime, Utc};
use log::error;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------        OrderId        -------------------------------------------------------
/// The payment gateway order id. Generated locally when a checkout starts (see [`crate::helpers::new_order_id`])
/// and globally unique per payment attempt.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------   OrderStatusType     -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum OrderStatusType {
    /// A payment order has been created with the gateway and we are waiting for the customer to pay.
    PaymentPending,
    /// The gateway has confirmed the payment, but no shipment exists yet.
    Paid,
    /// The payment is confirmed and the shipment has been created. The carrier ids are set.
    Confirmed,
    /// The shipment was cancelled by explicit customer action.
    Cancelled,
    /// The customer has requested a return for a confirmed order.
    ReturnRequested,
    /// The payment attempt failed.
    Failed,
}

impl OrderStatusType {
    /// The order lifecycle only ever moves forward, except for the explicit cancel/return transitions out of
    /// `Confirmed`. Terminal states admit no further transitions.
    pub fn can_transition_to(self, new_status: OrderStatusType) -> bool {
        use OrderStatusType::*;
        matches!(
            (self, new_status),
            (PaymentPending, Paid) |
                (PaymentPending, Failed) |
                (Paid, Confirmed) |
                (Paid, Failed) |
                (Confirmed, Cancelled) |
                (Confirmed, ReturnRequested)
        )
    }
}

impl Display for OrderStatusType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatusType::PaymentPending => write!(f, "PaymentPending"),
            OrderStatusType::Paid => write!(f, "Paid"),
            OrderStatusType::Confirmed => write!(f, "Confirmed"),
            OrderStatusType::Cancelled => write!(f, "Cancelled"),
            OrderStatusType::ReturnRequested => write!(f, "ReturnRequested"),
            OrderStatusType::Failed => write!(f, "Failed"),
        }
    }
}

impl From<String> for OrderStatusType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid order status: {value}. But this conversion cannot fail. Defaulting to PaymentPending");
            OrderStatusType::PaymentPending
        })
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid conversion: {0}")]
pub struct ConversionError(pub String);

impl FromStr for OrderStatusType {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PaymentPending" => Ok(Self::PaymentPending),
            "Paid" => Ok(Self::Paid),
            "Confirmed" => Ok(Self::Confirmed),
            "Cancelled" => Ok(Self::Cancelled),
            "ReturnRequested" => Ok(Self::ReturnRequested),
            "Failed" => Ok(Self::Failed),
            s => Err(ConversionError(format!("Invalid order status: {s}"))),
        }
    }
}

//--------------------------------------    PaymentMethod      -------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
pub enum PaymentMethod {
    Prepaid,
    #[sqlx(rename = "COD")]
    #[serde(rename = "COD")]
    Cod,
}

impl Default for PaymentMethod {
    fn default() -> Self {
        Self::Prepaid
    }
}

impl Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Prepaid => write!(f, "Prepaid"),
            PaymentMethod::Cod => write!(f, "COD"),
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Prepaid" => Ok(Self::Prepaid),
            "COD" => Ok(Self::Cod),
            s => Err(ConversionError(format!("Invalid payment method: {s}"))),
        }
    }
}

//--------------------------------------   ProductSnapshot     -------------------------------------------------------
/// The product details captured at checkout time. The catalog itself lives elsewhere; orders carry a snapshot so
/// that later catalog edits never change what a customer bought.
#[derive(Debug, Clone, PartialEq, FromRow, Serialize, Deserialize)]
pub struct ProductSnapshot {
    pub title: String,
    pub sku: Option<String>,
    /// Unit price at the time of purchase.
    pub price: Rupees,
}

//--------------------------------------   CustomerDetails     -------------------------------------------------------
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: String,
}

//--------------------------------------   ShippingAddress     -------------------------------------------------------
#[derive(Debug, Clone, Default, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ShippingAddress {
    pub address: String,
    pub sec_address: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
}

//--------------------------------------        Order          -------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Order {
    pub id: i64,
    /// The payment gateway order id.
    pub order_id: OrderId,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub product: ProductSnapshot,
    pub quantity: i64,
    pub size: Option<String>,
    pub payment_method: PaymentMethod,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub customer: CustomerDetails,
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub shipping_address: ShippingAddress,
    pub total_price: Rupees,
    pub status: OrderStatusType,
    /// Carrier order id, set once a shipment exists.
    pub shiprocket_order_id: Option<String>,
    /// Carrier shipment id, set once a shipment exists.
    pub shipment_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    pub fn is_shipped(&self) -> bool {
        self.shiprocket_order_id.is_some()
    }
}

//--------------------------------------       NewOrder        -------------------------------------------------------
/// The order record persisted when checkout starts. The shipping address and carrier ids only become known at
/// verification time, so they are absent here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewOrder {
    pub order_id: OrderId,
    pub product: ProductSnapshot,
    pub quantity: i64,
    pub customer: CustomerDetails,
    pub total_price: Rupees,
}

impl NewOrder {
    pub fn new(order_id: OrderId, product: ProductSnapshot, quantity: i64, customer: CustomerDetails, total_price: Rupees) -> Self {
        Self { order_id, product, quantity, customer, total_price }
    }
}

//--------------------------------------    ShipmentDetails    -------------------------------------------------------
/// The customer-supplied order details that arrive with the verification call and complete the order record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShipmentDetails {
    pub shipping_address: ShippingAddress,
    pub size: Option<String>,
    pub payment_method: PaymentMethod,
}

//--------------------------------------      ShipmentIds      -------------------------------------------------------
/// Identifiers assigned by the carrier once a shipment has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipmentIds {
    pub carrier_order_id: String,
    pub shipment_id: String,
}

#[cfg(test)]
mod test {
    use super::OrderStatusType::*;

    #[test]
    fn lifecycle_moves_forward_only() {
        assert!(PaymentPending.can_transition_to(Paid));
        assert!(PaymentPending.can_transition_to(Failed));
        assert!(Paid.can_transition_to(Confirmed));
        assert!(Paid.can_transition_to(Failed));
        assert!(!Paid.can_transition_to(PaymentPending));
        assert!(!PaymentPending.can_transition_to(Confirmed));
        assert!(!Confirmed.can_transition_to(Paid));
    }

    #[test]
    fn cancel_and_return_only_from_confirmed() {
        assert!(Confirmed.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(ReturnRequested));
        assert!(!PaymentPending.can_transition_to(Cancelled));
        assert!(!Paid.can_transition_to(ReturnRequested));
        assert!(!Cancelled.can_transition_to(ReturnRequested));
        assert!(!ReturnRequested.can_transition_to(Cancelled));
    }

    #[test]
    fn status_string_round_trip() {
        for status in [PaymentPending, Paid, Confirmed, Cancelled, ReturnRequested, Failed] {
            assert_eq!(status.to_string().parse::<super::OrderStatusType>().unwrap(), status);
        }
        assert!("Shipped".parse::<super::OrderStatusType>().is_err());
    }
}
