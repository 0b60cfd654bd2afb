//! DigitalOcean API HTTP client
//!
//! Handles authentication, pagination and error bodies for the v2 REST API.

use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT},
    Client, ClientBuilder, RequestBuilder, Response, StatusCode, Url,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::types::{
    Balance, Database, DatabaseCreateRequest, Domain, DomainCreateRequest, DomainRecord,
    DomainRecordRequest, Droplet, DropletCreateRequest, KubernetesCluster,
    KubernetesClusterCreateRequest, Vpc, VpcCreateRequest,
};

/// Base URL for the DigitalOcean API
pub const DIGITALOCEAN_API_BASE: &str = "https://api.digitalocean.com/v2";

/// Page size requested from list endpoints
const PER_PAGE: u32 = 100;

/// Errors that can occur when talking to the API
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse API response: {0}")]
    Parse(#[from] serde_json::Error),

    /// The API answered with a non-success status
    #[error("API returned {status}: {message}")]
    Status { status: StatusCode, message: String },

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// The token cannot be sent as a header
    #[error("API token contains characters that are not allowed in a header")]
    InvalidToken,

    /// The configured API URL cannot be used as a base
    #[error("Invalid API URL: {0}")]
    InvalidBaseUrl(String),
}

/// Error body returned by the API on failures
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Pages {
    next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Links {
    pages: Option<Pages>,
}

impl Links {
    fn is_last_page(&self) -> bool {
        self.pages.as_ref().and_then(|p| p.next.as_ref()).is_none()
    }
}

/// One page of a list endpoint
#[derive(Debug)]
struct Page<T> {
    items: Vec<T>,
    links: Links,
}

/// Splits a list response body into the items under `field` and its pagination links
fn parse_page<T: DeserializeOwned>(text: &str, field: &str) -> Result<Page<T>, ApiError> {
    let mut body: Value = serde_json::from_str(text)?;

    let items = body
        .get_mut(field)
        .map(Value::take)
        .ok_or_else(|| ApiError::MissingField(field.to_string()))?;
    let items = serde_json::from_value(items)?;

    let links = match body.get_mut("links").map(Value::take) {
        Some(links) => serde_json::from_value(links)?,
        None => Links::default(),
    };

    Ok(Page { items, links })
}

/// Pulls a human-readable message out of an error response body
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|e| e.message)
        .unwrap_or_else(|_| {
            status
                .canonical_reason()
                .unwrap_or("unexpected response")
                .to_string()
        })
}

/// Client for the DigitalOcean v2 API
#[derive(Debug, Clone)]
pub struct DigitalOceanClient {
    client: Client,
    base_url: Url,
}

impl DigitalOceanClient {
    /// Create a new client for the public API with the given token
    pub fn new(token: &str) -> Result<Self, ApiError> {
        Self::with_base_url(token, DIGITALOCEAN_API_BASE)
    }

    /// Create a new client against a custom API URL
    pub fn with_base_url(token: &str, base_url: &str) -> Result<Self, ApiError> {
        Self::build(Client::builder(), token, base_url)
    }

    fn build(builder: ClientBuilder, token: &str, base_url: &str) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| ApiError::InvalidToken)?;
        auth.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth);
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(
            USER_AGENT,
            HeaderValue::from_static(concat!("docli/", env!("CARGO_PKG_VERSION"))),
        );

        let base_url =
            Url::parse(base_url).map_err(|e| ApiError::InvalidBaseUrl(e.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidBaseUrl(base_url.to_string()));
        }

        let client = builder.default_headers(headers).build()?;
        Ok(Self { client, base_url })
    }

    /// Builds an endpoint URL, percent-encoding each path segment
    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    /// Sends a request and turns non-success statuses into `ApiError::Status`
    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(ApiError::Status {
            status,
            message: error_message(status, &body),
        })
    }

    /// Fetches every page of a list endpoint
    async fn list_all<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        field: &str,
    ) -> Result<Vec<T>, ApiError> {
        let mut items = Vec::new();
        let mut page = 1u32;

        loop {
            let request = self
                .client
                .get(self.url(segments))
                .query(&[("page", page), ("per_page", PER_PAGE)]);
            let text = self.send(request).await?.text().await?;
            let parsed: Page<T> = parse_page(&text, field)?;

            debug!(field, page, count = parsed.items.len(), "Fetched page");
            let done = parsed.links.is_last_page() || parsed.items.is_empty();
            items.extend(parsed.items);
            if done {
                break;
            }
            page += 1;
        }

        Ok(items)
    }

    /// POSTs `body` and returns the object under `field` in the response
    async fn create<B: Serialize, T: DeserializeOwned>(
        &self,
        segments: &[&str],
        field: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let request = self.client.post(self.url(segments)).json(body);
        let mut response: Value = serde_json::from_str(&self.send(request).await?.text().await?)?;

        let object = response
            .get_mut(field)
            .map(Value::take)
            .ok_or_else(|| ApiError::MissingField(field.to_string()))?;
        Ok(serde_json::from_value(object)?)
    }

    async fn delete(&self, segments: &[&str]) -> Result<(), ApiError> {
        self.send(self.client.delete(self.url(segments))).await?;
        Ok(())
    }

    pub async fn list_droplets(&self) -> Result<Vec<Droplet>, ApiError> {
        self.list_all(&["droplets"], "droplets").await
    }

    pub async fn create_droplet(&self, request: &DropletCreateRequest) -> Result<Droplet, ApiError> {
        self.create(&["droplets"], "droplet", request).await
    }

    pub async fn delete_droplet(&self, id: u64) -> Result<(), ApiError> {
        self.delete(&["droplets", &id.to_string()]).await
    }

    pub async fn list_vpcs(&self) -> Result<Vec<Vpc>, ApiError> {
        self.list_all(&["vpcs"], "vpcs").await
    }

    pub async fn create_vpc(&self, request: &VpcCreateRequest) -> Result<Vpc, ApiError> {
        self.create(&["vpcs"], "vpc", request).await
    }

    pub async fn delete_vpc(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&["vpcs", id]).await
    }

    pub async fn list_kubernetes_clusters(&self) -> Result<Vec<KubernetesCluster>, ApiError> {
        self.list_all(&["kubernetes", "clusters"], "kubernetes_clusters")
            .await
    }

    pub async fn create_kubernetes_cluster(
        &self,
        request: &KubernetesClusterCreateRequest,
    ) -> Result<KubernetesCluster, ApiError> {
        self.create(&["kubernetes", "clusters"], "kubernetes_cluster", request)
            .await
    }

    pub async fn delete_kubernetes_cluster(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&["kubernetes", "clusters", id]).await
    }

    pub async fn list_databases(&self) -> Result<Vec<Database>, ApiError> {
        self.list_all(&["databases"], "databases").await
    }

    pub async fn create_database(
        &self,
        request: &DatabaseCreateRequest,
    ) -> Result<Database, ApiError> {
        self.create(&["databases"], "database", request).await
    }

    pub async fn delete_database(&self, id: &str) -> Result<(), ApiError> {
        self.delete(&["databases", id]).await
    }

    /// Fetches the account balance
    pub async fn get_balance(&self) -> Result<Balance, ApiError> {
        let request = self.client.get(self.url(&["customers", "my", "balance"]));
        let text = self.send(request).await?.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    pub async fn list_domains(&self) -> Result<Vec<Domain>, ApiError> {
        self.list_all(&["domains"], "domains").await
    }

    pub async fn create_domain(&self, request: &DomainCreateRequest) -> Result<Domain, ApiError> {
        self.create(&["domains"], "domain", request).await
    }

    pub async fn delete_domain(&self, name: &str) -> Result<(), ApiError> {
        self.delete(&["domains", name]).await
    }

    pub async fn list_domain_records(&self, domain: &str) -> Result<Vec<DomainRecord>, ApiError> {
        self.list_all(&["domains", domain, "records"], "domain_records")
            .await
    }

    pub async fn create_domain_record(
        &self,
        domain: &str,
        request: &DomainRecordRequest,
    ) -> Result<DomainRecord, ApiError> {
        self.create(&["domains", domain, "records"], "domain_record", request)
            .await
    }

    pub async fn delete_domain_record(&self, domain: &str, record_id: u64) -> Result<(), ApiError> {
        self.delete(&["domains", domain, "records", &record_id.to_string()])
            .await
    }
}
