//! The JSON payloads of the HTTP surface. The storefront speaks camelCase; everything is converted into the
//! engine's types at the edge.
use std::fmt::Display;

use checkout_common::Rupees;
use checkout_engine::{
    db_types::{CustomerDetails, OrderId, PaymentMethod, ProductSnapshot, ShippingAddress},
    NewCheckout,
    VerifyDetails,
};
use serde::{Deserialize, Serialize};

use crate::errors::ServerError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonResponse {
    pub success: bool,
    pub message: String,
}

impl JsonResponse {
    pub fn success<S: Display>(message: S) -> Self {
        Self { success: true, message: message.to_string() }
    }

    pub fn failure<S: Display>(message: S) -> Self {
        Self { success: false, message: message.to_string() }
    }
}

//--------------------------------------     Order creation    -------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerPayload {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl From<CustomerPayload> for CustomerDetails {
    fn from(c: CustomerPayload) -> Self {
        Self { name: c.name, email: c.email, phone: c.phone }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPayload {
    pub title: String,
    #[serde(default)]
    pub sku: Option<String>,
    /// Unit price in fractional rupees.
    pub price: f64,
}

impl TryFrom<ProductPayload> for ProductSnapshot {
    type Error = ServerError;

    fn try_from(p: ProductPayload) -> Result<Self, Self::Error> {
        let price = Rupees::try_from_rupees(p.price).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
        Ok(Self { title: p.title, sku: p.sku, price })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    /// The order total in fractional rupees.
    pub amount: f64,
    pub customer: CustomerPayload,
    pub product: ProductPayload,
    pub quantity: u32,
    pub processing_key: String,
}

impl TryFrom<CreateOrderRequest> for NewCheckout {
    type Error = ServerError;

    fn try_from(r: CreateOrderRequest) -> Result<Self, Self::Error> {
        let amount = Rupees::try_from_rupees(r.amount).map_err(|e| ServerError::InvalidRequestBody(e.to_string()))?;
        Ok(Self {
            processing_key: r.processing_key,
            amount,
            customer: r.customer.into(),
            product: r.product.try_into()?,
            quantity: r.quantity,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub order_id: String,
    pub payment_link: String,
}

//--------------------------------------      Verification     -------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDetailsPayload {
    pub customer: CustomerPayload,
    pub product: ProductPayload,
    pub quantity: i64,
    pub address: String,
    #[serde(default)]
    pub sec_address: Option<String>,
    pub city: String,
    pub state: String,
    pub pincode: String,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

impl TryFrom<OrderDetailsPayload> for VerifyDetails {
    type Error = ServerError;

    fn try_from(d: OrderDetailsPayload) -> Result<Self, Self::Error> {
        let shipping_address = ShippingAddress {
            address: d.address,
            sec_address: d.sec_address,
            city: d.city,
            state: d.state,
            pincode: d.pincode,
        };
        Ok(Self {
            customer: d.customer.into(),
            shipping_address,
            product: d.product.try_into()?,
            quantity: d.quantity,
            size: d.size,
            payment_method: d.payment_method,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub order_id: OrderId,
    pub processing_key: String,
    pub order_details: OrderDetailsPayload,
}
