use checkout_engine::{
    db_types::{NewOrder, Order, OrderId, OrderStatusType, ShipmentDetails, ShipmentIds},
    traits::{
        CarrierToken,
        KeyStoreError,
        NewPaymentOrder,
        OrderStore,
        OrderStoreError,
        PaymentGateway,
        PaymentGatewayError,
        PaymentOrder,
        ProcessingKeyStore,
        RemoteOrderStatus,
        ShipmentRequest,
        ShippingGateway,
        ShippingGatewayError,
    },
};
use chrono::Duration;
use mockall::mock;

mock! {
    pub Backend {}

    impl OrderStore for Backend {
        async fn insert_order(&self, order: NewOrder) -> Result<Order, OrderStoreError>;
        async fn fetch_order_by_id(&self, id: i64) -> Result<Option<Order>, OrderStoreError>;
        async fn fetch_order_by_order_id(&self, order_id: &OrderId) -> Result<Option<Order>, OrderStoreError>;
        async fn fetch_orders(&self) -> Result<Vec<Order>, OrderStoreError>;
        async fn update_order_status(&self, order_id: &OrderId, new_status: OrderStatusType) -> Result<Order, OrderStoreError>;
        async fn confirm_shipment(&self, order_id: &OrderId, details: &ShipmentDetails, ids: &ShipmentIds) -> Result<Order, OrderStoreError>;
    }

    impl ProcessingKeyStore for Backend {
        async fn issue_key(&self, key: &str) -> Result<(), KeyStoreError>;
        async fn consume_key(&self, key: &str, ttl: Duration) -> Result<bool, KeyStoreError>;
        async fn sweep_expired_keys(&self, ttl: Duration) -> Result<usize, KeyStoreError>;
    }

    impl Clone for Backend {
        fn clone(&self) -> Self;
    }
}

mock! {
    pub Payments {}

    impl PaymentGateway for Payments {
        async fn create_payment_order(&self, order: &NewPaymentOrder) -> Result<PaymentOrder, PaymentGatewayError>;
        async fn payment_order_status(&self, order_id: &OrderId) -> Result<RemoteOrderStatus, PaymentGatewayError>;
    }

    impl Clone for Payments {
        fn clone(&self) -> Self;
    }
}

mock! {
    pub Shipping {}

    impl ShippingGateway for Shipping {
        async fn authenticate(&self) -> Result<CarrierToken, ShippingGatewayError>;
        async fn create_shipment(&self, token: &CarrierToken, request: &ShipmentRequest) -> Result<ShipmentIds, ShippingGatewayError>;
        async fn cancel_shipment(&self, token: &CarrierToken, carrier_order_id: &str, reason: &str) -> Result<(), ShippingGatewayError>;
        async fn create_return(&self, token: &CarrierToken, order: &Order) -> Result<(), ShippingGatewayError>;
    }

    impl Clone for Shipping {
        fn clone(&self) -> Self;
    }
}
