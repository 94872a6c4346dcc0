//! Executes built requests and normalizes what comes back.
//!
//! # Design
//! `Transport` is the only I/O seam: it turns an `HttpRequest` into an
//! `HttpResponse` or a transport failure. `UreqTransport` is the blocking
//! production implementation with a single fixed timeout per call; tests
//! plug in recording stubs. `Gateway` adds the per-resource operations on
//! top and never retries.

use std::time::Duration;

use serde::Deserialize;
use tracing::{debug, warn};

use crate::client::InventoryClient;
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::types::{ApiResponse, Seed, SeedFilter, Supplier, SupplierFilter};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(6);

/// Default API location.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Where the API lives and how long a single call may block.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT.as_secs(),
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Performs one HTTP round-trip.
///
/// Any status code counts as a response; only failures to obtain one
/// (refused connection, timeout, ...) are `Err`, as `ApiError::Transport`.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError>;
}

/// Blocking transport backed by a `ureq` agent.
pub struct UreqTransport {
    agent: ureq::Agent,
}

impl UreqTransport {
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .build()
            .new_agent();
        Self { agent }
    }
}

impl Default for UreqTransport {
    fn default() -> Self {
        Self::new(DEFAULT_TIMEOUT)
    }
}

impl Transport for UreqTransport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        let url = request.url.as_str();
        let headers = request.headers.as_slice();
        let result = match (request.method, request.body.as_deref()) {
            (HttpMethod::Get, _) => with_headers(self.agent.get(url), headers).call(),
            (HttpMethod::Delete, _) => with_headers(self.agent.delete(url), headers).call(),
            (HttpMethod::Post, Some(body)) => {
                with_headers(self.agent.post(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Post, None) => with_headers(self.agent.post(url), headers).send_empty(),
            (HttpMethod::Put, Some(body)) => {
                with_headers(self.agent.put(url), headers).send(body.as_bytes())
            }
            (HttpMethod::Put, None) => with_headers(self.agent.put(url), headers).send_empty(),
        };
        let mut response = result.map_err(|e| ApiError::Transport(e.to_string()))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(name, value)| {
                value
                    .to_str()
                    .ok()
                    .map(|v| (name.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| ApiError::Transport(e.to_string()))?;

        Ok(HttpResponse {
            status,
            headers,
            body,
        })
    }
}

/// Invalid header names or values surface as a transport error when the
/// request is sent.
fn with_headers<B>(
    builder: ureq::RequestBuilder<B>,
    headers: &[(String, String)],
) -> ureq::RequestBuilder<B> {
    headers
        .iter()
        .fold(builder, |builder, (name, value)| builder.header(name.as_str(), value.as_str()))
}

/// The inventory API as a set of blocking operations.
///
/// Every operation returns the normalized `ApiResponse` for any status code;
/// interpreting non-success statuses is left to the caller.
pub struct Gateway {
    client: InventoryClient,
    transport: Box<dyn Transport>,
}

impl Gateway {
    pub fn new(client: InventoryClient, transport: Box<dyn Transport>) -> Self {
        Self { client, transport }
    }

    /// Gateway over HTTP with the configured base URL and timeout.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        let client = InventoryClient::new(&config.base_url)?;
        Ok(Self::new(client, Box::new(UreqTransport::new(config.timeout()))))
    }

    /// Send `request` and normalize the outcome.
    pub fn send(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        self.exchange(&request).map(ApiResponse::from)
    }

    fn exchange(&self, request: &HttpRequest) -> Result<HttpResponse, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        match self.transport.execute(request) {
            Ok(response) => {
                debug!(status = response.status, "received response");
                Ok(response)
            }
            Err(err) => {
                warn!(method = %request.method, url = %request.url, error = %err, "request failed");
                Err(err)
            }
        }
    }

    pub fn create_seed(&self, seed: &Seed) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_create_seed(seed)?)
    }

    pub fn get_seed(&self, code: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_seed(code))
    }

    pub fn update_seed(&self, code: &str, seed: &Seed) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_update_seed(code, seed)?)
    }

    pub fn delete_seed(&self, code: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_delete_seed(code))
    }

    pub fn list_seeds(&self, filter: &SeedFilter) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_list_seeds(filter))
    }

    pub fn create_supplier(&self, supplier: &Supplier) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_create_supplier(supplier)?)
    }

    pub fn get_supplier(&self, tax_id: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_supplier(tax_id))
    }

    pub fn update_supplier(&self, tax_id: &str, supplier: &Supplier) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_update_supplier(tax_id, supplier)?)
    }

    pub fn delete_supplier(&self, tax_id: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_delete_supplier(tax_id))
    }

    pub fn list_suppliers(&self, filter: &SupplierFilter) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_list_suppliers(filter))
    }

    pub fn top_seeds(&self, tax_id: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_top_seeds(tax_id))
    }

    /// Whether the API knows `tax_id`. Blank ids, non-200 answers and
    /// transport failures all count as "no".
    pub fn supplier_exists(&self, tax_id: &str) -> bool {
        let tax_id = tax_id.trim();
        if tax_id.is_empty() {
            return false;
        }
        match self.exchange(&self.client.build_get_supplier(tax_id)) {
            Ok(response) => response.status == 200,
            Err(_) => false,
        }
    }
}
