//! Endpoint discovery from the service root

use redfish_core::{ServiceEndpoints, ServiceRoot};
use reqwest::Method;
use tracing::{debug, info, instrument, warn};
use url::Url;

use crate::client::{decode, RedfishClient, SERVICE_ROOT};
use crate::error::{RedfishClientError, Result};
use crate::transport::HttpResponse;

fn is_redirect(status: u16) -> bool {
    (300..400).contains(&status)
}

impl RedfishClient {
    /// Fetch the service root and record the endpoints it advertises.
    ///
    /// A redirect only ever changes the port: scheme and path are fixed by
    /// the protocol. Any other difference in the redirect target is logged
    /// and ignored. Discovery is retried once against the new port.
    #[instrument(skip(self), fields(base_url = %self.base_url()))]
    pub async fn discover(&mut self) -> Result<&ServiceEndpoints> {
        let mut response = self.send(Method::GET, SERVICE_ROOT, None, None).await?;

        if is_redirect(response.status) {
            self.follow_port_redirect(&response)?;
            response = self.send(Method::GET, SERVICE_ROOT, None, None).await?;

            if is_redirect(response.status) {
                return Err(RedfishClientError::integrity(format!(
                    "service root at {} redirected again after port change",
                    response.url
                )));
            }
        }

        if response.status != 200 {
            return Err(RedfishClientError::unexpected_status("GET", &response));
        }

        let root: ServiceRoot = decode(&response)?;
        let endpoints = root.endpoints()?;
        debug!(?endpoints, "Discovered endpoints");
        info!(
            version = root.redfish_version.as_deref().unwrap_or("unknown"),
            "Service root discovered"
        );

        self.raw_service_root = Some(response.body.clone());
        let endpoints = &*self.endpoints.insert(endpoints);
        Ok(endpoints)
    }

    fn follow_port_redirect(&mut self, response: &HttpResponse) -> Result<()> {
        let location = response.header("Location").ok_or_else(|| {
            RedfishClientError::integrity(format!(
                "HTTP redirect ({}) from {} without a Location header",
                response.status_line(),
                response.url
            ))
        })?;

        let current = Url::parse(&response.url).map_err(|e| {
            RedfishClientError::integrity(format!("invalid request URL {}: {}", response.url, e))
        })?;
        let target = current.join(location).map_err(|e| {
            RedfishClientError::integrity(format!("invalid redirect target {}: {}", location, e))
        })?;

        if target.scheme() != current.scheme() {
            warn!(
                "Redirect to {} changes the scheme, ignoring everything but the port",
                target
            );
        }
        if target.host_str() != current.host_str() {
            warn!(
                "Redirect to {} points to another host, ignoring everything but the port",
                target
            );
        }
        if target.path() != current.path() {
            warn!(
                "Redirect to {} changes the path, ignoring everything but the port",
                target
            );
        }

        let port = target.port_or_known_default().ok_or_else(|| {
            RedfishClientError::integrity(format!("redirect target {} has no port", target))
        })?;

        info!(port, "Service root redirected, switching port");
        self.config.connection.port = Some(port);
        self.set_base_url();
        Ok(())
    }
}
