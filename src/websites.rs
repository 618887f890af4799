use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{app::AppIdentity, snapshot::SnapshotRestoreRequest};

/// The management API version the wire types below are written against.
pub const API_VERSION: &str = "2016-08-01";

/// A non-success response from the management service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{status}: {code}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl ApiError {
    fn from_body(status: reqwest::StatusCode, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(e) => ApiError {
                status: status.as_u16(),
                code: e.error.code,
                message: e.error.message,
            },
            Err(_) => ApiError {
                status: status.as_u16(),
                code: status.canonical_reason().unwrap_or("Unknown").to_string(),
                message: body.trim().to_string(),
            },
        }
    }
}

/// A site (web app or slot) as returned by a lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Site {
    pub id: String,
    pub name: String,
    pub location: String,
}

impl TryFrom<Site> for crate::app::TargetApp {
    type Error = crate::app::IdentityError;

    fn try_from(site: Site) -> Result<Self, Self::Error> {
        crate::app::TargetApp::from_resource_id(&site.id, &site.location)
    }
}

/// A snapshot available for restore.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub time: String,
}

#[derive(Deserialize)]
struct SnapshotResource {
    properties: Snapshot,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotPage {
    #[serde(default)]
    value: Vec<SnapshotResource>,
    #[serde(default)]
    next_link: Option<String>,
}

#[derive(Serialize)]
struct RecoverEnvelope<'a> {
    properties: &'a SnapshotRestoreRequest,
}

/// The management operations the commands need.
#[async_trait::async_trait]
pub trait Websites: Send + Sync {
    /// Look up a web app or slot.
    async fn get_site(&self, app: &AppIdentity) -> Result<Site>;

    /// List the snapshots that can be restored for a web app or slot.
    async fn list_snapshots(&self, app: &AppIdentity) -> Result<Vec<Snapshot>>;

    /// Ask the service to restore a snapshot of `app`. Returns once the service
    /// has accepted the request.
    async fn recover_site(&self, app: &AppIdentity, request: &SnapshotRestoreRequest) -> Result<()>;
}

pub struct WebsitesClient {
    http: reqwest::Client,
    endpoint: url::Url,
    subscription: String,
    token: String,
    log: slog::Logger,
}

impl WebsitesClient {
    pub fn new(endpoint: &str, subscription: &str, token: &str, log: slog::Logger) -> Result<Self> {
        let endpoint = url::Url::parse(endpoint).with_context(|| format!("invalid endpoint `{}`", endpoint))?;
        if endpoint.cannot_be_a_base() {
            return Err(anyhow!("invalid endpoint `{}`", endpoint));
        }

        let http = reqwest::Client::builder()
            .user_agent(concat!("webapps/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(WebsitesClient {
            http,
            endpoint,
            subscription: subscription.to_string(),
            token: token.to_string(),
            log,
        })
    }

    /// The URL of `app`, optionally followed by an operation path segment.
    pub fn site_url(&self, app: &AppIdentity, operation: Option<&str>) -> Result<url::Url> {
        let mut url = self.endpoint.clone();

        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| anyhow!("invalid endpoint `{}`", self.endpoint))?;
            segments.pop_if_empty().extend(&[
                "subscriptions",
                self.subscription.as_str(),
                "resourceGroups",
                app.resource_group.as_str(),
                "providers",
                "Microsoft.Web",
            ]);
            segments.extend(app.site_segments());
            if let Some(op) = operation {
                segments.push(op);
            }
        }

        url.query_pairs_mut().append_pair("api-version", API_VERSION);

        Ok(url)
    }

    async fn check(&self, resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        let body = resp.text().await.unwrap_or_default();
        let err = ApiError::from_body(status, &body);
        slog::debug!(self.log, "request failed"; "status" => status.as_u16(), "code" => &err.code);

        Err(err.into())
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: url::Url) -> Result<T> {
        slog::debug!(self.log, "GET"; "url" => %url);

        let resp = self.http.get(url.clone()).bearer_auth(&self.token).send().await?;
        let resp = self.check(resp).await?;

        resp.json::<T>()
            .await
            .with_context(|| format!("failed to decode response from {}", url))
    }
}

#[async_trait::async_trait]
impl Websites for WebsitesClient {
    async fn get_site(&self, app: &AppIdentity) -> Result<Site> {
        let url = self.site_url(app, None)?;
        self.get_json(url).await
    }

    async fn list_snapshots(&self, app: &AppIdentity) -> Result<Vec<Snapshot>> {
        let mut snapshots = Vec::new();
        let mut next = Some(self.site_url(app, Some("snapshots"))?);

        while let Some(url) = next.take() {
            let page: SnapshotPage = self.get_json(url).await?;
            snapshots.extend(page.value.into_iter().map(|r| r.properties));

            if let Some(link) = page.next_link.filter(|l| !l.is_empty()) {
                next = Some(url::Url::parse(&link).with_context(|| format!("invalid nextLink `{}`", link))?);
            }
        }

        Ok(snapshots)
    }

    async fn recover_site(&self, app: &AppIdentity, request: &SnapshotRestoreRequest) -> Result<()> {
        let url = self.site_url(app, Some("recover"))?;
        slog::debug!(self.log, "POST"; "url" => %url, "snapshot_time" => request.snapshot_time());

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.token)
            .json(&RecoverEnvelope { properties: request })
            .send()
            .await?;
        let resp = self.check(resp).await?;

        // The restore runs asynchronously on the service side.
        let operation = resp
            .headers()
            .get("Azure-AsyncOperation")
            .or_else(|| resp.headers().get(reqwest::header::LOCATION))
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();
        slog::debug!(self.log, "recover accepted"; "status" => resp.status().as_u16(), "operation" => operation);

        Ok(())
    }
}
