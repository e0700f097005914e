//! Redfish HTTP client

use std::fmt;
use std::sync::Arc;

use bytes::Bytes;
use redfish_core::{Flavor, ServiceEndpoints};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::debug;

use crate::config::ClientConfig;
use crate::error::{RedfishClientError, Result};
use crate::transport::{BasicAuth, HttpRequest, HttpResponse, HttpTransport, Transport};

/// Path of the service root
pub const SERVICE_ROOT: &str = "/redfish/v1/";

/// Sent as `User-Agent` with every request
pub const USER_AGENT: &str = concat!("redfish-client/", env!("CARGO_PKG_VERSION"));

/// Bearer token and the session resource it belongs to.
///
/// Both exist together or not at all.
#[derive(Clone)]
pub(crate) struct SessionAuth {
    pub(crate) token: String,
    pub(crate) location: String,
}

/// Redfish client for a single service processor
///
/// One instance drives one session; every operation runs its requests
/// strictly one after another. Use [`Clone`] to get an independent,
/// unauthenticated client for the same target.
pub struct RedfishClient {
    pub(crate) config: ClientConfig,
    transport: Arc<dyn Transport>,
    base_url: String,
    pub(crate) endpoints: Option<ServiceEndpoints>,
    pub(crate) raw_service_root: Option<Bytes>,
    pub(crate) session: Option<SessionAuth>,
    pub(crate) flavor: Flavor,
}

impl RedfishClient {
    /// Create a client talking HTTP(S) to the configured target
    pub fn new(config: ClientConfig) -> Result<Self> {
        let transport = HttpTransport::new(&config)?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client on top of a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> Self {
        let base_url = config.connection.base_url();
        Self {
            config,
            transport,
            base_url,
            endpoints: None,
            raw_service_root: None,
            session: None,
            flavor: Flavor::Uninitialized,
        }
    }

    /// Load the configuration from a YAML file and create a client
    pub fn from_yaml_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Self::new(ClientConfig::from_yaml_file(path)?)
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// `scheme://host:port` requests are sent to
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Whether endpoint discovery has completed
    pub fn is_initialised(&self) -> bool {
        self.endpoints.is_some()
    }

    pub fn endpoints(&self) -> Option<&ServiceEndpoints> {
        self.endpoints.as_ref()
    }

    /// Body of the service root as received during discovery
    pub fn raw_service_root(&self) -> Option<&[u8]> {
        self.raw_service_root.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Absolute URL of the current session resource
    pub fn session_location(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.location.as_str())
    }

    pub fn auth_token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    /// Resolved flavor, [`Flavor::Uninitialized`] until resolution ran
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    /// Skip detection and treat the target as `flavor`
    pub fn set_flavor(&mut self, flavor: Flavor) {
        self.flavor = flavor;
    }

    pub(crate) fn required_endpoints(&self) -> Result<&ServiceEndpoints> {
        self.endpoints
            .as_ref()
            .ok_or(RedfishClientError::NotInitialised)
    }

    pub(crate) fn require_session(&self) -> Result<()> {
        if self.session.is_some() {
            Ok(())
        } else {
            Err(RedfishClientError::NotAuthenticated)
        }
    }

    pub(crate) fn set_base_url(&mut self) {
        self.base_url = self.config.connection.base_url();
    }

    // =========================================================================
    // Requests
    // =========================================================================

    /// Absolute URL for an endpoint given as URL or path
    pub fn url_for(&self, endpoint: &str) -> String {
        if endpoint.starts_with("https://") || endpoint.starts_with("http://") {
            endpoint.to_string()
        } else if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }

    fn build_request(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Bytes>,
        basic_auth: Option<BasicAuth>,
    ) -> HttpRequest {
        let mut request = HttpRequest::new(method, self.url_for(endpoint))
            .header("OData-Version", "4.0")
            .header("Accept", "application/json")
            .header("Content-Type", "application/json")
            .header("User-Agent", USER_AGENT)
            .header("Connection", "close");

        if let Some(session) = &self.session {
            request = request.header("X-Auth-Token", session.token.as_str());
        }
        if let Some(auth) = basic_auth {
            request = request.basic_auth(auth);
        }
        if let Some(body) = body {
            request = request.body(body);
        }
        request
    }

    /// Send one request. Non-success statuses are returned, not raised.
    pub(crate) async fn send(
        &self,
        method: Method,
        endpoint: &str,
        body: Option<Bytes>,
        basic_auth: Option<BasicAuth>,
    ) -> Result<HttpResponse> {
        let request = self.build_request(method, endpoint, body, basic_auth);
        debug!("{} {}", request.method, request.url);

        let response = self.transport.send(request).await?;
        debug!("{} -> {}", response.url, response.status_line());
        Ok(response)
    }

    /// GET an endpoint and decode a `200 OK` body
    pub(crate) async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        let response = self.send(Method::GET, endpoint, None, None).await?;
        if response.status != 200 {
            return Err(RedfishClientError::from_response("GET", &response));
        }
        decode(&response)
    }

    pub(crate) async fn post_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpResponse> {
        self.send(Method::POST, endpoint, Some(encode(body)?), None)
            .await
    }

    pub(crate) async fn patch_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<HttpResponse> {
        self.send(Method::PATCH, endpoint, Some(encode(body)?), None)
            .await
    }

    pub(crate) async fn delete(&self, endpoint: &str) -> Result<HttpResponse> {
        self.send(Method::DELETE, endpoint, None, None).await
    }
}

/// Accept `response` if its status is one of `accepted`
pub(crate) fn expect_status(
    method: &str,
    response: HttpResponse,
    accepted: &[u16],
) -> Result<HttpResponse> {
    if accepted.contains(&response.status) {
        Ok(response)
    } else {
        Err(RedfishClientError::from_response(method, &response))
    }
}

pub(crate) fn decode<T: DeserializeOwned>(response: &HttpResponse) -> Result<T> {
    serde_json::from_slice(&response.body).map_err(|e| RedfishClientError::Parse {
        url: response.url.clone(),
        message: e.to_string(),
    })
}

fn encode<B: Serialize + ?Sized>(body: &B) -> Result<Bytes> {
    serde_json::to_vec(body)
        .map(Bytes::from)
        .map_err(|e| RedfishClientError::InvalidRequest(format!("unserializable payload: {}", e)))
}

/// A clone shares target configuration, discovered endpoints and flavor,
/// but starts without a session.
impl Clone for RedfishClient {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            transport: Arc::clone(&self.transport),
            base_url: self.base_url.clone(),
            endpoints: self.endpoints.clone(),
            raw_service_root: self.raw_service_root.clone(),
            session: None,
            flavor: self.flavor,
        }
    }
}

impl fmt::Debug for RedfishClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedfishClient")
            .field("base_url", &self.base_url)
            .field("endpoints", &self.endpoints)
            .field("authenticated", &self.is_authenticated())
            .field("flavor", &self.flavor)
            .finish()
    }
}
