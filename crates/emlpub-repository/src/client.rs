//! Package API client
//!
//! ## Usage
//!
//! ```rust,ignore
//! let client = RepositoryClient::new(Environment::Staging, credentials, PackageRef::edi("1047"))?;
//!
//! let ticket = client.evaluate_package(xml_url).await?;
//! let report = client.evaluation_report(&ticket).await?;
//! ```
//!
//! Every call that submits a document first downloads the EML from the
//! given URL and sends its bytes as the request body.

use crate::environment::{Credentials, Environment};
use crate::error::{RepositoryError, Result};
use reqwest::{Client, RequestBuilder, Response, Url};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);
const XML_CONTENT_TYPE: &str = "application/xml";

/// Scope and identifier of a data package, e.g. `edi` / `1047`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageRef {
    pub scope: String,
    pub identifier: String,
}

impl PackageRef {
    pub fn new(scope: impl Into<String>, identifier: impl Into<String>) -> Self {
        Self {
            scope: scope.into(),
            identifier: identifier.into(),
        }
    }

    /// A package in the `edi` scope
    pub fn edi(identifier: impl Into<String>) -> Self {
        Self::new("edi", identifier)
    }
}

/// Handle on a submitted evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationTicket {
    transaction_id: String,
}

impl EvaluationTicket {
    pub fn new(transaction_id: impl Into<String>) -> Self {
        Self {
            transaction_id: transaction_id.into(),
        }
    }

    pub fn transaction_id(&self) -> &str {
        &self.transaction_id
    }
}

pub struct RepositoryClient {
    http: Client,
    base_url: Url,
    credentials: Credentials,
    package: PackageRef,
}

impl RepositoryClient {
    pub fn new(
        environment: Environment,
        credentials: Credentials,
        package: PackageRef,
    ) -> Result<Self> {
        Self::with_base_url(environment.base_url(), credentials, package)
    }

    /// Client against an arbitrary API root, e.g. a local mock server
    pub fn with_base_url(
        base_url: &str,
        credentials: Credentials,
        package: PackageRef,
    ) -> Result<Self> {
        let base_url = parse_base_url(base_url)?;
        let http = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url,
            credentials,
            package,
        })
    }

    pub fn package(&self) -> &PackageRef {
        &self.package
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url
            .join(path)
            .map_err(|e| RepositoryError::InvalidUrl {
                url: format!("{}{}", self.base_url, path),
                reason: e.to_string(),
            })
    }

    fn authed(&self, request: RequestBuilder) -> RequestBuilder {
        request.basic_auth(
            self.credentials.principal(),
            Some(self.credentials.password.expose()),
        )
    }

    /// Download the EML document to submit
    async fn fetch_document(&self, xml_url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(xml_url).map_err(|e| RepositoryError::InvalidUrl {
            url: xml_url.to_string(),
            reason: e.to_string(),
        })?;
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RepositoryError::Fetch {
                url: xml_url.to_string(),
                status: status.as_u16(),
            });
        }
        Ok(response.bytes().await?.to_vec())
    }

    /// Submit the EML at `xml_url` for evaluation
    pub async fn evaluate_package(&self, xml_url: &str) -> Result<EvaluationTicket> {
        let body = self.fetch_document(xml_url).await?;
        let request = self
            .http
            .post(self.endpoint("package/evaluate/eml")?)
            .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body);
        let text = read_text(self.authed(request).send().await?).await?;

        let transaction_id = text.trim();
        if transaction_id.is_empty() {
            return Err(RepositoryError::EmptyTransaction);
        }
        tracing::info!(
            op = "evaluate_package",
            transaction_id = transaction_id,
            "evaluation submitted"
        );
        Ok(EvaluationTicket::new(transaction_id))
    }

    /// Fetch the report of a submitted evaluation
    pub async fn evaluation_report(&self, ticket: &EvaluationTicket) -> Result<String> {
        let path = format!("package/evaluate/report/eml/{}", ticket.transaction_id());
        let request = self.http.get(self.endpoint(&path)?);
        read_text(self.authed(request).send().await?).await
    }

    /// Create a new package from the EML at `xml_url`
    pub async fn upload_package(&self, xml_url: &str) -> Result<String> {
        let body = self.fetch_document(xml_url).await?;
        let request = self
            .http
            .post(self.endpoint("package/eml")?)
            .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body);
        let text = read_text(self.authed(request).send().await?).await?;
        tracing::info!(op = "upload_package", identifier = %self.package.identifier, "package uploaded");
        Ok(text.trim().to_string())
    }

    /// Publish the EML at `xml_url` as a new revision of this package
    pub async fn update_package(&self, xml_url: &str) -> Result<String> {
        let body = self.fetch_document(xml_url).await?;
        let path = format!("package/eml/{}/{}", self.package.scope, self.package.identifier);
        let request = self
            .http
            .put(self.endpoint(&path)?)
            .header(reqwest::header::CONTENT_TYPE, XML_CONTENT_TYPE)
            .body(body);
        let text = read_text(self.authed(request).send().await?).await?;
        tracing::info!(op = "update_package", identifier = %self.package.identifier, "package updated");
        Ok(text.trim().to_string())
    }

    /// Newest revision listing for this package, as returned by the API
    pub async fn list_revisions(&self) -> Result<String> {
        let path = format!("package/eml/{}/{}", self.package.scope, self.package.identifier);
        let mut url = self.endpoint(&path)?;
        url.query_pairs_mut().append_pair("filter", "newest");
        let request = self.http.get(url);
        read_text(self.authed(request).send().await?).await
    }
}

impl std::fmt::Debug for RepositoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryClient")
            .field("base_url", &self.base_url.as_str())
            .field("credentials", &self.credentials)
            .field("package", &self.package)
            .finish()
    }
}

fn parse_base_url(raw: &str) -> Result<Url> {
    // Url::join drops the last segment unless the base ends with '/'
    let normalized = if raw.ends_with('/') {
        raw.to_string()
    } else {
        format!("{}/", raw)
    };
    let url = Url::parse(&normalized).map_err(|e| RepositoryError::InvalidUrl {
        url: raw.to_string(),
        reason: e.to_string(),
    })?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(RepositoryError::InvalidUrl {
            url: raw.to_string(),
            reason: format!("unsupported scheme '{}'", url.scheme()),
        });
    }
    Ok(url)
}

async fn read_text(response: Response) -> Result<String> {
    let status = response.status();
    let body = response.text().await?;
    if !status.is_success() {
        tracing::warn!(status = status.as_u16(), "repository returned an error");
        return Err(RepositoryError::Server {
            status: status.as_u16(),
            body,
        });
    }
    Ok(body)
}
