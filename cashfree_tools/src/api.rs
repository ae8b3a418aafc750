use std::{sync::Arc, time::Duration};

use checkout_engine::{
    db_types::OrderId,
    traits::{NewPaymentOrder, PaymentGateway, PaymentGatewayError, PaymentOrder, RemoteOrderStatus},
};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
};
use serde::{de::DeserializeOwned, Serialize};

use crate::{
    config::CashfreeConfig,
    data_objects::{CreateOrderRequest, CreateOrderResponse, OrderMeta, OrderStatusResponse},
    CashfreeApiError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct CashfreeApi {
    config: CashfreeConfig,
    client: Arc<Client>,
}

impl CashfreeApi {
    pub fn new(config: CashfreeConfig) -> Result<Self, CashfreeApiError> {
        let mut headers = HeaderMap::with_capacity(3);
        let id = HeaderValue::from_str(config.client_id.as_str())
            .map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        headers.insert("x-client-id", id);
        let mut secret = HeaderValue::from_str(config.client_secret.reveal().as_str())
            .map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        secret.set_sensitive(true);
        headers.insert("x-client-secret", secret);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| CashfreeApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client) })
    }

    pub async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<B>,
    ) -> Result<T, CashfreeApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self
            .client
            .request(method, url)
            .header("x-api-version", &self.config.api_version)
            .header("x-request-id", new_request_id());
        if let Some(body) = body {
            req = req.json(&body);
        }
        let response = req.send().await.map_err(|e| CashfreeApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| CashfreeApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| CashfreeApiError::RestResponseError(e.to_string()))?;
            Err(CashfreeApiError::QueryError { status, message })
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Creates a payment order with Cashfree and returns the payment link for the customer.
    pub async fn create_order(&self, order: CreateOrderRequest) -> Result<CreateOrderResponse, CashfreeApiError> {
        debug!("💳️ Creating payment order {}", order.order_id);
        let result = self.rest_query::<CreateOrderResponse, _>(Method::POST, "/orders", Some(order)).await?;
        info!("💳️ Payment order {} created", result.order_id);
        Ok(result)
    }

    /// Fetches the current payment status of an order.
    pub async fn order_status(&self, order_id: &str) -> Result<OrderStatusResponse, CashfreeApiError> {
        let path = format!("/orders/{order_id}");
        debug!("💳️ Fetching status for payment order {order_id}");
        let result = self.rest_query::<OrderStatusResponse, ()>(Method::GET, &path, None).await?;
        debug!("💳️ Payment order {order_id} is {}", result.order_status);
        Ok(result)
    }
}

fn new_request_id() -> String {
    format!("req-{:016x}", rand::random::<u64>())
}

impl PaymentGateway for CashfreeApi {
    async fn create_payment_order(&self, order: &NewPaymentOrder) -> Result<PaymentOrder, PaymentGatewayError> {
        let meta = OrderMeta { return_url: self.config.return_url.clone(), notify_url: self.config.notify_url.clone() };
        let request = CreateOrderRequest::new(
            order.order_id.as_str().to_string(),
            order.amount,
            order.currency.clone(),
            order.customer.clone().into(),
            meta,
            Some(order.note.clone()),
        );
        let response = self.create_order(request).await.map_err(into_gateway_error)?;
        Ok(PaymentOrder { order_id: OrderId(response.order_id), payment_link: response.payment_link })
    }

    async fn payment_order_status(&self, order_id: &OrderId) -> Result<RemoteOrderStatus, PaymentGatewayError> {
        let response = self.order_status(order_id.as_str()).await.map_err(into_gateway_error)?;
        match response.order_status.as_str() {
            "PAID" => Ok(RemoteOrderStatus::Paid),
            "ACTIVE" => Ok(RemoteOrderStatus::Pending),
            "EXPIRED" | "TERMINATED" | "TERMINATION_REQUESTED" => Ok(RemoteOrderStatus::Failed),
            other => Err(PaymentGatewayError::InvalidResponse(format!("Unknown order status: {other}"))),
        }
    }
}

fn into_gateway_error(e: CashfreeApiError) -> PaymentGatewayError {
    match e {
        CashfreeApiError::QueryError { status, message } if status < 500 => {
            PaymentGatewayError::Rejected { status, message }
        },
        CashfreeApiError::QueryError { status, message } => {
            PaymentGatewayError::Unavailable(format!("Error {status}. {message}"))
        },
        CashfreeApiError::JsonError(e) | CashfreeApiError::UnknownOrderStatus(e) => {
            PaymentGatewayError::InvalidResponse(e)
        },
        CashfreeApiError::Initialization(e) | CashfreeApiError::RestResponseError(e) => {
            PaymentGatewayError::Unavailable(e)
        },
    }
}
