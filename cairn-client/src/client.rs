//! The portal client and its fetch operations.

use crate::{
    errors::{FetchError, SetupError},
    paths,
};
use anyhow::Context;
use cairn_settings::Settings;
use cairn_types::{Completion, ParseError, RawCompletions, Resource, StorageMetadata};
use reqwest::Response;
use std::time::Duration;

/// User-Agent sent with every request.
const USER_AGENT: &str = concat!("cairn-client/", env!("CARGO_PKG_VERSION"));

/// Connect timeout used by [`Client::new`]. [`Client::from_settings`] takes
/// the value from configuration instead.
const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Request timeout used by [`Client::new`].
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// A client for one data portal.
///
/// Holds no mutable state; it is freely shareable across tasks, and the
/// wrapped [`reqwest::Client`] is a cheaply cloneable handle.
#[derive(Clone, Debug)]
pub struct Client {
    /// Base URL prefix for all relative request paths. May be empty.
    endpoint: String,

    /// Absolute base URL used to qualify root-relative storage locations.
    site_root: String,

    /// The client that will be used to make http requests.
    reqwest_client: reqwest::Client,
}

impl Client {
    /// Make a new client against `endpoint`, with default timeouts.
    ///
    /// `site_root` is consulted only when converting storage metadata whose
    /// location is root-relative.
    pub fn new(endpoint: &str, site_root: &str) -> Result<Self, SetupError> {
        Self::with_timeouts(
            endpoint,
            site_root,
            DEFAULT_CONNECT_TIMEOUT,
            DEFAULT_REQUEST_TIMEOUT,
        )
    }

    /// Make a new client from the loaded configuration.
    pub fn from_settings(settings: &Settings) -> Result<Self, SetupError> {
        Self::with_timeouts(
            &settings.portal.endpoint,
            &settings.portal.site_root,
            settings.http.connect_timeout_sec,
            settings.http.request_timeout_sec,
        )
    }

    /// Make a new client with explicit timeouts.
    pub fn with_timeouts(
        endpoint: &str,
        site_root: &str,
        connect_timeout: Duration,
        request_timeout: Duration,
    ) -> Result<Self, SetupError> {
        let reqwest_client = reqwest::Client::builder()
            .connect_timeout(connect_timeout)
            .timeout(request_timeout)
            .user_agent(USER_AGENT)
            .build()
            .context("Unable to create the Reqwest client")
            .map_err(SetupError::Network)?;

        Ok(Self {
            endpoint: endpoint.to_string(),
            site_root: site_root.to_string(),
            reqwest_client,
        })
    }

    /// The configured endpoint, as given at construction.
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Resolve `path` against the configured endpoint.
    pub fn url(&self, path: &str) -> String {
        paths::resolve(&self.endpoint, path)
    }

    /// Fetch an HTML snippet by filename, with optional query parameters.
    /// The body is returned unparsed.
    pub async fn fetch_template(
        &self,
        filename: &str,
        params: &[(&str, &str)],
    ) -> Result<String, FetchError> {
        let url = self.url(&format!("/api/1/util/snippet/{}", filename));
        tracing::debug!(url = %url, "fetching snippet");
        let res = self
            .reqwest_client
            .get(&url)
            .query(params)
            .send()
            .await
            .and_then(Response::error_for_status)
            .context(format!("Fetching snippet: {}", filename))
            .map_err(FetchError::Network)?;
        res.text()
            .await
            .context("Reading snippet body")
            .map_err(FetchError::Format)
    }

    /// Fetch the localization bundle for `locale`, JSON-decoded but otherwise
    /// unprocessed.
    pub async fn fetch_locale_data(&self, locale: &str) -> Result<serde_json::Value, FetchError> {
        let url = self.url(&format!("/api/i18n/{}", locale));
        tracing::debug!(url = %url, "fetching locale data");
        let res = self
            .reqwest_client
            .get(&url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .context(format!("Fetching locale data: {}", locale))
            .map_err(FetchError::Network)?;
        res.json()
            .await
            .context("Parsing locale data")
            .map_err(FetchError::Format)
    }

    /// Fetch a completion source and pipe the payload through `format`.
    ///
    /// `format` runs exactly once, strictly after the response settles,
    /// inside the returned future. The other completion operations are
    /// shorthands for this with the standard parsers.
    pub async fn fetch_completions_with<T, F>(
        &self,
        url_path: &str,
        format: F,
    ) -> Result<T, FetchError>
    where
        F: FnOnce(RawCompletions) -> Result<T, ParseError>,
    {
        let url = self.url(&format!("/{}", url_path));
        tracing::debug!(url = %url, "fetching completions");
        let res = self
            .reqwest_client
            .get(&url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .context(format!("Fetching completions: {}", url_path))
            .map_err(FetchError::Network)?;
        let body = res
            .text()
            .await
            .context("Reading completion body")
            .map_err(FetchError::Format)?;
        Ok(format(RawCompletions::from_body(&body))?)
    }

    /// Fetch a completion source as a deduplicated identifier list.
    pub async fn fetch_completions(&self, url_path: &str) -> Result<Vec<String>, FetchError> {
        self.fetch_completions_with(url_path, |raw| raw.identifiers())
            .await
    }

    /// Fetch a completion source as a list of id/text pairs.
    pub async fn fetch_completion_objects(
        &self,
        url_path: &str,
    ) -> Result<Vec<Completion>, FetchError> {
        self.fetch_completions_with(url_path, |raw| raw.objects())
            .await
    }

    /// Fetch the upload authorization form for `filename`, as raw JSON.
    pub async fn fetch_storage_auth_form(
        &self,
        filename: &str,
    ) -> Result<serde_json::Value, FetchError> {
        let url = self.url(&format!("/api/storage/auth/form/{}", filename));
        tracing::debug!(url = %url, "fetching storage auth form");
        let res = self
            .reqwest_client
            .get(&url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .context(format!("Fetching storage auth form: {}", filename))
            .map_err(FetchError::Network)?;
        res.json()
            .await
            .context("Parsing storage auth form")
            .map_err(FetchError::Format)
    }

    /// Fetch the storage metadata record for `filename`.
    ///
    /// Fails with [`FetchError::InvalidArgument`] before any request is
    /// issued when `filename` is empty.
    pub async fn fetch_storage_metadata(
        &self,
        filename: &str,
    ) -> Result<StorageMetadata, FetchError> {
        if filename.is_empty() {
            return Err(FetchError::InvalidArgument("filename is required"));
        }
        let url = self.url(&format!("/api/storage/metadata/{}", filename));
        tracing::debug!(url = %url, "fetching storage metadata");
        let res = self
            .reqwest_client
            .get(&url)
            .send()
            .await
            .and_then(Response::error_for_status)
            .context(format!("Fetching storage metadata: {}", filename))
            .map_err(FetchError::Network)?;
        res.json()
            .await
            .context("Parsing storage metadata")
            .map_err(FetchError::Format)
    }

    /// Fetch the storage metadata record for `filename` and convert it into
    /// its canonical [`Resource`] form, using the configured site root.
    pub async fn fetch_storage_resource(&self, filename: &str) -> Result<Resource, FetchError> {
        let metadata = self.fetch_storage_metadata(filename).await?;
        Ok(metadata.to_resource(&self.site_root))
    }
}
