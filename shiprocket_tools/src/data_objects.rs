use checkout_engine::{db_types::Order, traits::ShipmentRequest};
use serde::{Deserialize, Serialize};

use crate::config::ShiprocketConfig;

// Fixed package profile for apparel shipments, in cm and kg.
pub const PACKAGE_LENGTH: f64 = 10.0;
pub const PACKAGE_BREADTH: f64 = 5.0;
pub const PACKAGE_HEIGHT: f64 = 2.0;
pub const PACKAGE_WEIGHT: f64 = 0.5;
/// GST rate for apparel.
pub const TAX_RATE: u32 = 18;
/// HSN code for made-up clothing accessories.
pub const HSN_CODE: u32 = 621710;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
}

//--------------------------------------      OrderItem        -------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItem {
    pub name: String,
    pub sku: String,
    pub units: i64,
    pub selling_price: f64,
    pub discount: u32,
    pub tax: u32,
    pub hsn: u32,
}

//--------------------------------------    ShiprocketOrder    -------------------------------------------------------
/// The adhoc order creation payload, in Shiprocket's wire format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShiprocketOrder {
    pub order_id: String,
    /// `YYYY-MM-DD`
    pub order_date: String,
    pub pickup_location: String,
    pub channel_id: String,
    pub billing_customer_name: String,
    pub billing_last_name: String,
    pub billing_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_address_2: Option<String>,
    pub billing_city: String,
    pub billing_pincode: String,
    pub billing_state: String,
    pub billing_country: String,
    pub billing_email: String,
    pub billing_phone: String,
    pub shipping_is_billing: bool,
    pub order_items: Vec<OrderItem>,
    pub payment_method: String,
    pub sub_total: f64,
    pub length: f64,
    pub breadth: f64,
    pub height: f64,
    pub weight: f64,
}

impl ShiprocketOrder {
    /// Builds the wire payload from an engine shipment request. The sub-total is computed in paise and only
    /// converted to fractional rupees at the end, so it is exact to two decimals.
    pub fn from_request(request: &ShipmentRequest, config: &ShiprocketConfig) -> Self {
        let sub_total = (request.product.price * request.quantity).to_rupees();
        let sku = request.product.sku.clone().unwrap_or_else(|| format!("SKU-{}", request.order_id.as_str()));
        let item = OrderItem {
            name: request.product.title.clone(),
            sku,
            units: request.quantity,
            selling_price: request.product.price.to_rupees(),
            discount: 0,
            tax: TAX_RATE,
            hsn: HSN_CODE,
        };
        Self {
            order_id: request.order_id.as_str().to_string(),
            order_date: request.order_date.format("%Y-%m-%d").to_string(),
            pickup_location: config.pickup_location.clone(),
            channel_id: config.channel_id.clone(),
            billing_customer_name: request.customer.name.clone(),
            billing_last_name: "NA".to_string(),
            billing_address: request.shipping_address.address.clone(),
            billing_address_2: request.shipping_address.sec_address.clone(),
            billing_city: request.shipping_address.city.clone(),
            billing_pincode: request.shipping_address.pincode.clone(),
            billing_state: request.shipping_address.state.clone(),
            billing_country: "India".to_string(),
            billing_email: request.customer.email.clone(),
            billing_phone: request.customer.phone.clone(),
            shipping_is_billing: true,
            order_items: vec![item],
            payment_method: request.payment_method.to_string(),
            sub_total,
            length: PACKAGE_LENGTH,
            breadth: PACKAGE_BREADTH,
            height: PACKAGE_HEIGHT,
            weight: PACKAGE_WEIGHT,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateOrderResponse {
    pub order_id: i64,
    pub shipment_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct CancelOrderRequest {
    pub ids: Vec<i64>,
}

//--------------------------------------  ReturnOrderRequest   -------------------------------------------------------
/// The return order payload. The pickup side is the customer's address; the items and totals come from the
/// original order record.
#[derive(Debug, Clone, Serialize)]
pub struct ReturnOrderRequest {
    pub order_id: String,
    pub order_date: String,
    pub channel_id: String,
    pub pickup_customer_name: String,
    pub pickup_address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pickup_address_2: Option<String>,
    pub pickup_city: String,
    pub pickup_state: String,
    pub pickup_country: String,
    pub pickup_pincode: String,
    pub pickup_email: String,
    pub pickup_phone: String,
    pub order_items: Vec<OrderItem>,
    pub payment_method: String,
    pub sub_total: f64,
    pub length: f64,
    pub breadth: f64,
    pub height: f64,
    pub weight: f64,
}

impl ReturnOrderRequest {
    pub fn from_order(order: &Order, config: &ShiprocketConfig) -> Self {
        let sub_total = (order.product.price * order.quantity).to_rupees();
        let sku = order.product.sku.clone().unwrap_or_else(|| format!("SKU-{}", order.order_id.as_str()));
        let item = OrderItem {
            name: order.product.title.clone(),
            sku,
            units: order.quantity,
            selling_price: order.product.price.to_rupees(),
            discount: 0,
            tax: TAX_RATE,
            hsn: HSN_CODE,
        };
        Self {
            order_id: format!("R-{}", order.order_id.as_str()),
            order_date: order.created_at.format("%Y-%m-%d").to_string(),
            channel_id: config.channel_id.clone(),
            pickup_customer_name: order.customer.name.clone(),
            pickup_address: order.shipping_address.address.clone(),
            pickup_address_2: order.shipping_address.sec_address.clone(),
            pickup_city: order.shipping_address.city.clone(),
            pickup_state: order.shipping_address.state.clone(),
            pickup_country: "India".to_string(),
            pickup_pincode: order.shipping_address.pincode.clone(),
            pickup_email: order.customer.email.clone(),
            pickup_phone: order.customer.phone.clone(),
            order_items: vec![item],
            payment_method: order.payment_method.to_string(),
            sub_total,
            length: PACKAGE_LENGTH,
            breadth: PACKAGE_BREADTH,
            height: PACKAGE_HEIGHT,
            weight: PACKAGE_WEIGHT,
        }
    }
}

#[cfg(test)]
mod test {
    use checkout_common::Rupees;
    use checkout_engine::{
        db_types::{CustomerDetails, OrderId, PaymentMethod, ProductSnapshot, ShippingAddress},
        traits::ShipmentRequest,
    };
    use chrono::NaiveDate;

    use super::ShiprocketOrder;
    use crate::ShiprocketConfig;

    fn request() -> ShipmentRequest {
        ShipmentRequest {
            order_id: OrderId("ORDER-17".to_string()),
            order_date: NaiveDate::from_ymd_opt(2026, 3, 14).unwrap(),
            customer: CustomerDetails {
                name: "Asha Rao".to_string(),
                email: "asha@example.com".to_string(),
                phone: "9800011122".to_string(),
            },
            shipping_address: ShippingAddress {
                address: "14 MG Road".to_string(),
                sec_address: None,
                city: "Jaipur".to_string(),
                state: "Rajasthan".to_string(),
                pincode: "302001".to_string(),
            },
            product: ProductSnapshot {
                title: "Kurta".to_string(),
                sku: None,
                price: Rupees::try_from_rupees(250.50).unwrap(),
            },
            quantity: 3,
            payment_method: PaymentMethod::Cod,
        }
    }

    #[test]
    fn sub_total_is_exact() {
        let config = ShiprocketConfig::default();
        let order = ShiprocketOrder::from_request(&request(), &config);
        assert_eq!(order.sub_total, 751.50);
        assert_eq!(order.order_items[0].selling_price, 250.50);
        assert_eq!(order.order_items[0].units, 3);
    }

    #[test]
    fn wire_format_matches_the_carrier_contract() {
        let mut config = ShiprocketConfig::default();
        config.pickup_location = "Home".to_string();
        config.channel_id = "5794009".to_string();
        let order = ShiprocketOrder::from_request(&request(), &config);
        assert_eq!(order.order_date, "2026-03-14");
        assert_eq!(order.payment_method, "COD");
        assert_eq!(order.billing_country, "India");
        assert!(order.shipping_is_billing);
        assert_eq!(order.order_items[0].tax, 18);
        assert_eq!(order.order_items[0].hsn, 621710);
        assert_eq!(order.order_items[0].sku, "SKU-ORDER-17");
        assert_eq!((order.length, order.breadth, order.height, order.weight), (10.0, 5.0, 2.0, 0.5));
    }
}
