use actix_web::{
    error::ResponseError,
    http::{header::ContentType, StatusCode},
    HttpResponse,
};
use checkout_engine::{
    traits::{OrderStoreError, PaymentGatewayError, ShippingGatewayError},
    CheckoutError,
};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("Could not initialize server. {0}")]
    InitializeError(String),
    #[error("An error occurred on the backend of the server. {0}")]
    BackendError(String),
    #[error("Could not read request body: {0}")]
    InvalidRequestBody(String),
    #[error("An I/O error happened in the server. {0}")]
    IOError(#[from] std::io::Error),
    #[error("{0}")]
    CheckoutError(#[from] CheckoutError),
    #[error("UnspecifiedError. {0}")]
    Unspecified(String),
}

impl ResponseError for ServerError {
    fn status_code(&self) -> StatusCode {
        match self {
            Self::InvalidRequestBody(_) => StatusCode::BAD_REQUEST,
            Self::CheckoutError(e) => checkout_error_status(e),
            Self::InitializeError(_) | Self::BackendError(_) | Self::IOError(_) | Self::Unspecified(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            },
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header(ContentType::json())
            .body(serde_json::json!({ "error": self.to_string() }).to_string())
    }
}

/// Client mistakes (including gateway rejections of data the client supplied) are 400s; an unreachable or broken
/// gateway is a 502; everything else is a 500.
fn checkout_error_status(e: &CheckoutError) -> StatusCode {
    match e {
        CheckoutError::ValidationError(_) |
        CheckoutError::DuplicateRequest(_) |
        CheckoutError::InvalidProcessingKey |
        CheckoutError::NotShipped(_) => StatusCode::BAD_REQUEST,
        CheckoutError::OrderNotFound(_) => StatusCode::NOT_FOUND,
        CheckoutError::PaymentGateway(e) => match e {
            PaymentGatewayError::Rejected { .. } => StatusCode::BAD_REQUEST,
            PaymentGatewayError::Unavailable(_) | PaymentGatewayError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        },
        CheckoutError::Shipping { source, .. } => match source {
            ShippingGatewayError::Rejected { .. } => StatusCode::BAD_REQUEST,
            ShippingGatewayError::Unavailable(_) |
            ShippingGatewayError::AuthenticationFailed(_) |
            ShippingGatewayError::InvalidResponse(_) => StatusCode::BAD_GATEWAY,
        },
        // A forbidden transition means the client asked for a lifecycle move the order cannot make, e.g. a
        // second cancel click.
        CheckoutError::OrderStore(OrderStoreError::ForbiddenStatusChange { .. }) => StatusCode::BAD_REQUEST,
        CheckoutError::OrderStore(_) | CheckoutError::KeyStore(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}
