//! HTTP client for storefront-server

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use shared::client::{
    AccountProfile, CapiEventRequest, CapiRelayResponse, CheckoutOptions, CheckoutRequest,
    CheckoutResponse, CouponValidateRequest, CouponValidateResponse, ReviewCreateRequest,
    RoleInfo, TrackOrderQuery, TrackedOrder, WishlistAddRequest,
};
use shared::error::{ApiResponse, ErrorCode};
use shared::models::{Review, StoreSettings, WishlistItem};
use uuid::Uuid;

use crate::{ClientConfig, ClientError, ClientResult};

/// HTTP client for making requests to storefront-server
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpClient {
    /// Create a new HTTP client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    /// Set the access token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Get the current token
    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    /// Forget the access token; later calls go out anonymous
    pub fn clear_token(&mut self) {
        self.token = None;
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)));
        Self::handle_response(request.send().await?).await
    }

    /// Make a GET request with query parameters
    pub async fn get_with_query<T: DeserializeOwned, Q: Serialize>(
        &self,
        path: &str,
        query: &Q,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.get(self.url(path)).query(query));
        Self::handle_response(request.send().await?).await
    }

    /// Make a POST request with JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let request = self.authorize(self.client.post(self.url(path)).json(body));
        Self::handle_response(request.send().await?).await
    }

    /// Make a DELETE request
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let request = self.authorize(self.client.delete(self.url(path)));
        Self::handle_response(request.send().await?).await
    }

    /// Handle the HTTP response
    ///
    /// Error bodies are `ApiResponse` envelopes; their message and code are
    /// carried into the returned error when present.
    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();

        if !status.is_success() {
            let text = response.text().await?;
            let envelope = serde_json::from_str::<ApiResponse<serde_json::Value>>(&text).ok();
            let message = envelope
                .as_ref()
                .map(|e| e.message.clone())
                .unwrap_or_else(|| text.clone());
            let code = envelope
                .and_then(|e| e.code)
                .and_then(|c| ErrorCode::try_from(c).ok());

            return match (status, code) {
                (StatusCode::UNAUTHORIZED, _) => Err(ClientError::Unauthorized),
                (StatusCode::FORBIDDEN, _) => Err(ClientError::Forbidden(message)),
                (StatusCode::NOT_FOUND, _) => Err(ClientError::NotFound(message)),
                (StatusCode::BAD_REQUEST, None) => Err(ClientError::Validation(message)),
                (_, Some(code)) => Err(ClientError::Api { code, message }),
                _ => Err(ClientError::Internal(message)),
            };
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes)
            .map_err(|e| ClientError::InvalidResponse(format!("{e} (status {status})")))
    }

    // ========== Store ==========

    pub async fn store_settings(&self) -> ClientResult<StoreSettings> {
        self.get("/api/store/settings").await
    }

    /// Settings, shipping methods, zones and payment methods in one call
    pub async fn checkout_options(&self) -> ClientResult<CheckoutOptions> {
        self.get("/api/store/checkout-options").await
    }

    // ========== Checkout ==========

    pub async fn validate_coupon(
        &self,
        request: &CouponValidateRequest,
    ) -> ClientResult<CouponValidateResponse> {
        self.post("/api/coupons/validate", request).await
    }

    /// Place an order; sent with the bearer token when one is set, as a guest otherwise
    pub async fn place_order(&self, request: &CheckoutRequest) -> ClientResult<CheckoutResponse> {
        self.post("/api/orders", request).await
    }

    pub async fn track_order(&self, order_number: &str, phone: &str) -> ClientResult<TrackedOrder> {
        let query = TrackOrderQuery {
            order_number: order_number.to_string(),
            phone: phone.to_string(),
        };
        self.get_with_query("/api/orders/track", &query).await
    }

    // ========== Account ==========

    pub async fn profile(&self) -> ClientResult<AccountProfile> {
        self.get("/api/account/profile").await
    }

    pub async fn role(&self) -> ClientResult<RoleInfo> {
        self.get("/api/account/role").await
    }

    // ========== Wishlist / reviews ==========

    pub async fn wishlist(&self) -> ClientResult<Vec<WishlistItem>> {
        self.get("/api/wishlist").await
    }

    pub async fn add_to_wishlist(&self, product_id: Uuid) -> ClientResult<WishlistItem> {
        self.post("/api/wishlist", &WishlistAddRequest { product_id })
            .await
    }

    /// Returns whether an entry was removed
    pub async fn remove_from_wishlist(&self, product_id: Uuid) -> ClientResult<bool> {
        self.delete(&format!("/api/wishlist/{product_id}")).await
    }

    pub async fn reviews(&self, product_id: Uuid) -> ClientResult<Vec<Review>> {
        self.get(&format!("/api/products/{product_id}/reviews")).await
    }

    pub async fn submit_review(
        &self,
        product_id: Uuid,
        request: &ReviewCreateRequest,
    ) -> ClientResult<Review> {
        self.post(&format!("/api/products/{product_id}/reviews"), request)
            .await
    }

    // ========== Functions ==========

    /// Forward a tracking event; delivery failures come back as `success: false`
    pub async fn send_capi_event(
        &self,
        event: &CapiEventRequest,
    ) -> ClientResult<CapiRelayResponse> {
        self.post("/functions/v1/capi-relay", event).await
    }
}
