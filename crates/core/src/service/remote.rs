//! HTTP clients for collaborators running as separate services.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::json;
use tracing::debug;

use super::{PackageLedger, ResourceService, ServiceError};
use crate::ledger::{NewPackage, Package, PackageStatus};
use crate::pool::{Resource, ResourceKind};

/// Build the HTTP client shared by all remote collaborators.
pub fn build_http_client(timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().timeout(timeout).build()
}

fn api_base(base_url: &str) -> String {
    format!("{}/api/v1", base_url.trim_end_matches('/'))
}

/// Send a request, turning transport failures into `Unavailable`.
async fn send(request: RequestBuilder, what: &str) -> Result<Response, ServiceError> {
    request
        .send()
        .await
        .map_err(|e| ServiceError::Unavailable(format!("{}: {}", what, e)))
}

/// Decode a successful response body.
async fn decode<T: DeserializeOwned>(response: Response, what: &str) -> Result<T, ServiceError> {
    response
        .json()
        .await
        .map_err(|e| ServiceError::Unavailable(format!("{}: invalid response: {}", what, e)))
}

async fn body_text(response: Response) -> String {
    response.text().await.unwrap_or_default()
}

/// Crew or ship pool reached over HTTP.
pub struct HttpResourceClient {
    client: Client,
    kind: ResourceKind,
    base_url: String,
}

impl HttpResourceClient {
    pub fn new(client: Client, kind: ResourceKind, base_url: impl AsRef<str>) -> Self {
        Self {
            client,
            kind,
            base_url: api_base(base_url.as_ref()),
        }
    }

    fn url(&self, action: &str) -> String {
        format!("{}/{}/{}", self.base_url, self.kind.as_str(), action)
    }
}

#[async_trait]
impl ResourceService for HttpResourceClient {
    fn kind(&self) -> ResourceKind {
        self.kind
    }

    async fn reserve(&self) -> Result<Resource, ServiceError> {
        let url = self.url("reserve");
        debug!("Sending request to {}", url);

        let response = send(self.client.post(&url), &url).await?;
        match response.status() {
            status if status.is_success() => decode(response, &url).await,
            StatusCode::SERVICE_UNAVAILABLE | StatusCode::CONFLICT => {
                Err(ServiceError::Exhausted(self.kind))
            }
            status => Err(ServiceError::Rejected(format!(
                "{} reservation failed ({}): {}",
                self.kind,
                status,
                body_text(response).await
            ))),
        }
    }

    async fn release(&self, name: &str) -> Result<Resource, ServiceError> {
        let url = self.url("return");
        debug!("Sending request to {} for {}", url, name);

        let response = send(self.client.post(&url).json(&json!({ "name": name })), &url).await?;
        match response.status() {
            status if status.is_success() => decode(response, &url).await,
            StatusCode::NOT_FOUND => Err(ServiceError::NotFound(format!(
                "{} not found: {}",
                self.kind, name
            ))),
            status => Err(ServiceError::Rejected(format!(
                "{} return failed ({}): {}",
                self.kind,
                status,
                body_text(response).await
            ))),
        }
    }
}

/// Package ledger reached over HTTP.
pub struct HttpLedgerClient {
    client: Client,
    base_url: String,
}

impl HttpLedgerClient {
    pub fn new(client: Client, base_url: impl AsRef<str>) -> Self {
        Self {
            client,
            base_url: api_base(base_url.as_ref()),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/packages{}", self.base_url, path)
    }

    async fn expect_package(
        response: Response,
        url: &str,
        id: &str,
    ) -> Result<Package, ServiceError> {
        match response.status() {
            status if status.is_success() => decode(response, url).await,
            StatusCode::NOT_FOUND => Err(ServiceError::NotFound(format!(
                "package not found: {}",
                id
            ))),
            status => Err(ServiceError::Rejected(format!(
                "package request failed ({}): {}",
                status,
                body_text(response).await
            ))),
        }
    }
}

#[async_trait]
impl PackageLedger for HttpLedgerClient {
    async fn create(&self, new: NewPackage) -> Result<Package, ServiceError> {
        let url = self.url("");
        debug!("Sending request to {}", url);

        let response = send(self.client.post(&url).json(&new), &url).await?;
        let status = response.status();
        if status != StatusCode::CREATED {
            return Err(ServiceError::Rejected(format!(
                "package creation failed ({}): {}",
                status,
                body_text(response).await
            )));
        }
        decode(response, &url).await
    }

    async fn get(&self, id: &str) -> Result<Package, ServiceError> {
        let url = self.url(&format!("/{}", id));
        let response = send(self.client.get(&url), &url).await?;
        Self::expect_package(response, &url, id).await
    }

    async fn list(&self) -> Result<Vec<Package>, ServiceError> {
        let url = self.url("");
        let response = send(self.client.get(&url), &url).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(ServiceError::Rejected(format!(
                "package listing failed ({}): {}",
                status,
                body_text(response).await
            )));
        }
        decode(response, &url).await
    }

    async fn update_status(
        &self,
        id: &str,
        status: PackageStatus,
    ) -> Result<Package, ServiceError> {
        let url = self.url(&format!("/{}/status", id));
        debug!("Sending request to {} ({})", url, status);

        let response = send(
            self.client.post(&url).json(&json!({ "status": status })),
            &url,
        )
        .await?;
        Self::expect_package(response, &url, id).await
    }
}
