//! HTTP client for the storefront collaborator API.
//!
//! The backend is a black box reachable at a configurable base URL; it
//! owns all validation and stock accounting. Failures are turned into
//! human-readable messages at the call site and never retried.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use reqwest::{Client, Response};
use rust_decimal::Decimal;
use savego::{
    products::{Category, Product},
    session::User,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Fallback message when the backend gives no usable detail.
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

/// Configuration for reaching the storefront API.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Base URL, e.g. `"http://localhost:8000"`.
    pub base_url: String,
}

/// Login request payload.
#[derive(Debug, Clone, Serialize)]
pub struct Credentials {
    /// Account email.
    pub email: String,

    /// Account password.
    pub password: String,
}

/// Registration request payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewAccount {
    /// Account email.
    pub email: String,

    /// Display username.
    pub username: String,

    /// Account password.
    pub password: String,

    /// Given name.
    pub first_name: String,

    /// Family name.
    pub last_name: String,
}

/// Successful authentication exchange.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    /// The authenticated identity.
    pub user: User,

    /// Opaque bearer token for protected endpoints.
    pub access_token: String,
}

/// One line of an order submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewOrderItem {
    /// Product being ordered.
    pub product_id: u64,

    /// Units ordered.
    pub quantity: u32,
}

/// Order submission payload.
#[derive(Debug, Clone, Serialize)]
pub struct NewOrder {
    /// Recipient name.
    pub name: String,

    /// Contact email.
    pub email: String,

    /// Contact phone.
    pub phone: String,

    /// Delivery address.
    pub address: String,

    /// Ordered lines, built from the cart.
    pub items: Vec<NewOrderItem>,
}

/// One line of a placed order, as recorded by the backend.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItem {
    /// Product ordered.
    pub product_id: u64,

    /// Units ordered.
    pub quantity: u32,

    /// Unit price captured when the order was placed.
    pub price_at_time: Decimal,
}

/// A placed order.
#[derive(Debug, Clone, Deserialize)]
pub struct Order {
    /// Order identifier.
    pub id: u64,

    /// Human-facing order reference.
    pub order_number: String,

    /// When the order was placed.
    pub created_at: Timestamp,

    /// Total charged.
    pub total_amount: Decimal,

    /// Ordered lines.
    pub order_items: Vec<OrderItem>,

    /// Fulfilment status, when the backend reports one.
    #[serde(default)]
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SuggestionsResponse {
    suggestions: Vec<String>,
}

/// Errors from the storefront API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport or body-decoding failure.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend rejected the request with a non-2xx status.
    #[error("request rejected with status {status}: {detail}")]
    Rejected {
        /// HTTP status code.
        status: u16,

        /// Backend-provided detail, or [`GENERIC_ERROR`].
        detail: String,
    },
}

impl ApiError {
    /// The message to surface to the shopper.
    ///
    /// Uses the backend's `detail` payload when one was present,
    /// otherwise the generic fallback.
    pub fn message(&self) -> &str {
        match self {
            Self::Http(_) => GENERIC_ERROR,
            Self::Rejected { detail, .. } => detail,
        }
    }
}

/// Seam over the storefront API, mockable for component tests.
#[automock]
#[async_trait]
pub trait StorefrontApi: Send + Sync {
    /// Exchange credentials for an identity and bearer token.
    async fn login(&self, credentials: Credentials) -> Result<AuthResponse, ApiError>;

    /// Create an account, then perform the implicit follow-up login.
    async fn register(&self, account: NewAccount) -> Result<AuthResponse, ApiError>;

    /// Fetch the full product catalog.
    async fn products(&self) -> Result<Vec<Product>, ApiError>;

    /// Fetch all categories.
    async fn categories(&self) -> Result<Vec<Category>, ApiError>;

    /// Fetch search-as-you-type suggestions for a query.
    async fn suggestions(&self, query: String) -> Result<Vec<String>, ApiError>;

    /// Submit an order, optionally authenticated.
    async fn submit_order(
        &self,
        order: NewOrder,
        bearer: Option<String>,
    ) -> Result<Order, ApiError>;

    /// List the authenticated account's orders.
    async fn orders(&self, bearer: String) -> Result<Vec<Order>, ApiError>;
}

/// Reqwest-backed [`StorefrontApi`] implementation.
#[derive(Debug, Clone)]
pub struct ApiClient {
    config: ApiConfig,
    http: Client,
}

impl ApiClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url)
    }
}

#[async_trait]
impl StorefrontApi for ApiClient {
    async fn login(&self, credentials: Credentials) -> Result<AuthResponse, ApiError> {
        let response = self
            .http
            .post(self.url("/api/v1/auth/login"))
            .json(&credentials)
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }

    async fn register(&self, account: NewAccount) -> Result<AuthResponse, ApiError> {
        let credentials = Credentials {
            email: account.email.clone(),
            password: account.password.clone(),
        };

        let response = self
            .http
            .post(self.url("/api/v1/auth/register"))
            .json(&account)
            .send()
            .await?;

        checked(response).await?;

        // The storefront logs a fresh account straight in.
        self.login(credentials).await
    }

    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let response = self.http.get(self.url("/api/v1/products/")).send().await?;

        Ok(checked(response).await?.json().await?)
    }

    async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/v1/categories/"))
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }

    async fn suggestions(&self, query: String) -> Result<Vec<String>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/v1/products/search/suggestions"))
            .query(&[("query", query.as_str())])
            .send()
            .await?;

        let parsed: SuggestionsResponse = checked(response).await?.json().await?;

        Ok(parsed.suggestions)
    }

    async fn submit_order(
        &self,
        order: NewOrder,
        bearer: Option<String>,
    ) -> Result<Order, ApiError> {
        let mut request = self.http.post(self.url("/api/v1/orders/")).json(&order);

        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;

        Ok(checked(response).await?.json().await?)
    }

    async fn orders(&self, bearer: String) -> Result<Vec<Order>, ApiError> {
        let response = self
            .http
            .get(self.url("/api/v1/orders/"))
            .bearer_auth(bearer)
            .send()
            .await?;

        Ok(checked(response).await?.json().await?)
    }
}

/// Map a non-2xx response to [`ApiError::Rejected`], extracting the
/// backend's `{"detail": ...}` message when the body carries one.
async fn checked(response: Response) -> Result<Response, ApiError> {
    let status = response.status();

    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let detail = detail_from_body(&body).unwrap_or_else(|| GENERIC_ERROR.to_string());

    Err(ApiError::Rejected {
        status: status.as_u16(),
        detail,
    })
}

fn detail_from_body(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;

    value
        .get("detail")
        .and_then(serde_json::Value::as_str)
        .map(str::to_string)
}
