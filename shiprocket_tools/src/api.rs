use std::{sync::Arc, time::Duration};

use checkout_engine::{
    db_types::{Order, ShipmentIds},
    traits::{CarrierToken, ShipmentRequest, ShippingGateway, ShippingGatewayError},
};
use log::*;
use reqwest::{
    header::{HeaderMap, HeaderValue},
    Client,
    Method,
    StatusCode,
};
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;

use crate::{
    config::ShiprocketConfig,
    data_objects::{CancelOrderRequest, CreateOrderResponse, LoginRequest, LoginResponse, ReturnOrderRequest, ShiprocketOrder},
    ShiprocketApiError,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Clone)]
pub struct ShiprocketApi {
    config: ShiprocketConfig,
    client: Arc<Client>,
    // Shiprocket bearer tokens are valid for days; cache one and re-login when the carrier rejects it.
    token: Arc<RwLock<Option<String>>>,
}

impl ShiprocketApi {
    pub fn new(config: ShiprocketConfig) -> Result<Self, ShiprocketApiError> {
        let mut headers = HeaderMap::with_capacity(1);
        headers.insert("Content-Type", HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| ShiprocketApiError::Initialization(e.to_string()))?;
        Ok(Self { config, client: Arc::new(client), token: Arc::new(RwLock::new(None)) })
    }

    /// Logs into Shiprocket, replacing any cached token.
    pub async fn login(&self) -> Result<String, ShiprocketApiError> {
        debug!("🚚️ Logging into the carrier API");
        let body =
            LoginRequest { email: self.config.email.clone(), password: self.config.password.reveal().clone() };
        let response = self
            .rest_query::<LoginResponse, _>(Method::POST, "/auth/login", None, Some(&body))
            .await
            .map_err(|e| ShiprocketApiError::AuthenticationFailed(e.to_string()))?;
        let mut guard = self.token.write().await;
        *guard = Some(response.token.clone());
        info!("🚚️ Carrier login successful");
        Ok(response.token)
    }

    /// Returns the cached bearer token, logging in first if there is none.
    pub async fn token(&self) -> Result<String, ShiprocketApiError> {
        if let Some(token) = self.token.read().await.clone() {
            trace!("🚚️ Using cached carrier token");
            return Ok(token);
        }
        self.login().await
    }

    async fn rest_query<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        token: Option<&str>,
        body: Option<&B>,
    ) -> Result<T, ShiprocketApiError> {
        let url = self.url(path);
        trace!("Sending REST query: {url}");
        let mut req = self.client.request(method, url);
        if let Some(token) = token {
            req = req.bearer_auth(token);
        }
        if let Some(body) = body {
            req = req.json(body);
        }
        let response = req.send().await.map_err(|e| ShiprocketApiError::RestResponseError(e.to_string()))?;
        if response.status().is_success() {
            trace!("REST query successful. {}", response.status());
            response.json::<T>().await.map_err(|e| ShiprocketApiError::JsonError(e.to_string()))
        } else {
            let status = response.status().as_u16();
            let message = response.text().await.map_err(|e| ShiprocketApiError::RestResponseError(e.to_string()))?;
            Err(ShiprocketApiError::QueryError { status, message })
        }
    }

    /// Sends an authenticated query, re-logging in and retrying once if the carrier rejects the token.
    async fn rest_query_with_reauth<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        token: &str,
        body: Option<&B>,
    ) -> Result<T, ShiprocketApiError> {
        match self.rest_query(method.clone(), path, Some(token), body).await {
            Err(ShiprocketApiError::QueryError { status, .. }) if status == StatusCode::UNAUTHORIZED.as_u16() => {
                warn!("🚚️ Carrier token was rejected. Logging in again and retrying.");
                let token = self.login().await?;
                self.rest_query(method, path, Some(token.as_str()), body).await
            },
            other => other,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }

    /// Creates an adhoc order (shipment) with the carrier.
    pub async fn create_order(
        &self,
        token: &str,
        order: &ShiprocketOrder,
    ) -> Result<CreateOrderResponse, ShiprocketApiError> {
        debug!("🚚️ Creating carrier order for {}", order.order_id);
        let result = self
            .rest_query_with_reauth::<CreateOrderResponse, _>(Method::POST, "/orders/create/adhoc", token, Some(order))
            .await?;
        info!("🚚️ Carrier order {} created with shipment {}", result.order_id, result.shipment_id);
        Ok(result)
    }

    /// Cancels carrier orders by id.
    pub async fn cancel_orders(&self, token: &str, ids: Vec<i64>) -> Result<(), ShiprocketApiError> {
        debug!("🚚️ Cancelling carrier order(s) {ids:?}");
        let body = CancelOrderRequest { ids };
        let _ = self
            .rest_query_with_reauth::<serde_json::Value, _>(Method::POST, "/orders/cancel", token, Some(&body))
            .await?;
        info!("🚚️ Carrier order(s) cancelled");
        Ok(())
    }

    /// Creates a return order with the carrier.
    pub async fn create_return_order(
        &self,
        token: &str,
        order: &ReturnOrderRequest,
    ) -> Result<(), ShiprocketApiError> {
        debug!("🚚️ Creating carrier return order {}", order.order_id);
        let _ = self
            .rest_query_with_reauth::<serde_json::Value, _>(Method::POST, "/orders/create/return", token, Some(order))
            .await?;
        info!("🚚️ Carrier return order {} created", order.order_id);
        Ok(())
    }
}

impl ShippingGateway for ShiprocketApi {
    async fn authenticate(&self) -> Result<CarrierToken, ShippingGatewayError> {
        let token = self.token().await.map_err(into_gateway_error)?;
        Ok(CarrierToken(token))
    }

    async fn create_shipment(
        &self,
        token: &CarrierToken,
        request: &ShipmentRequest,
    ) -> Result<ShipmentIds, ShippingGatewayError> {
        let order = ShiprocketOrder::from_request(request, &self.config);
        let response = self.create_order(token.as_str(), &order).await.map_err(into_gateway_error)?;
        Ok(ShipmentIds {
            carrier_order_id: response.order_id.to_string(),
            shipment_id: response.shipment_id.to_string(),
        })
    }

    async fn cancel_shipment(
        &self,
        token: &CarrierToken,
        carrier_order_id: &str,
        reason: &str,
    ) -> Result<(), ShippingGatewayError> {
        let id = carrier_order_id
            .parse::<i64>()
            .map_err(|_| ShippingGatewayError::InvalidResponse(format!("Carrier order id {carrier_order_id} is not numeric")))?;
        debug!("🚚️ Cancelling carrier order {carrier_order_id}: {reason}");
        self.cancel_orders(token.as_str(), vec![id]).await.map_err(into_gateway_error)
    }

    async fn create_return(&self, token: &CarrierToken, order: &Order) -> Result<(), ShippingGatewayError> {
        let request = ReturnOrderRequest::from_order(order, &self.config);
        self.create_return_order(token.as_str(), &request).await.map_err(into_gateway_error)
    }
}

fn into_gateway_error(e: ShiprocketApiError) -> ShippingGatewayError {
    match e {
        ShiprocketApiError::AuthenticationFailed(e) => ShippingGatewayError::AuthenticationFailed(e),
        ShiprocketApiError::QueryError { status, message } if status == StatusCode::UNAUTHORIZED.as_u16() => {
            ShippingGatewayError::AuthenticationFailed(message)
        },
        ShiprocketApiError::QueryError { status, message } if status < 500 => {
            ShippingGatewayError::Rejected { status, message }
        },
        ShiprocketApiError::QueryError { status, message } => {
            ShippingGatewayError::Unavailable(format!("Error {status}. {message}"))
        },
        ShiprocketApiError::JsonError(e) => ShippingGatewayError::InvalidResponse(e),
        ShiprocketApiError::Initialization(e) | ShiprocketApiError::RestResponseError(e) => {
            ShippingGatewayError::Unavailable(e)
        },
    }
}
