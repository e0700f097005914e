//! Session login and logout

use redfish_core::SessionServiceInfo;
use reqwest::Method;
use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::client::{decode, RedfishClient, SessionAuth};
use crate::error::{RedfishClientError, Result};
use crate::transport::BasicAuth;

/// Header carrying the session token
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct LoginRequest<'a> {
    user_name: &'a str,
    password: &'a str,
}

impl RedfishClient {
    /// Discover endpoints and log in with the configured credentials
    #[instrument(skip(self))]
    pub async fn connect(&mut self) -> Result<()> {
        self.discover().await?;
        let credentials = self.config.credentials.clone();
        self.login(&credentials.username, &credentials.password).await
    }

    /// Open a session.
    ///
    /// Runs discovery first when it has not happened yet. On success both the
    /// token and the absolute session location are held.
    #[instrument(skip(self, password))]
    pub async fn login(&mut self, username: &str, password: &str) -> Result<()> {
        if username.is_empty() || password.is_empty() {
            return Err(RedfishClientError::InvalidRequest(
                "username and password must not be empty".into(),
            ));
        }
        if !self.is_initialised() {
            self.discover().await?;
        }

        let sessions = self.sessions_endpoint(username, password).await?;
        let payload = LoginRequest {
            user_name: username,
            password,
        };
        let response = self.post_json(&sessions, &payload).await?;

        if !matches!(response.status, 200 | 201) {
            return Err(RedfishClientError::from_response("POST", &response));
        }

        let token = response
            .header(AUTH_TOKEN_HEADER)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| {
                RedfishClientError::integrity(format!(
                    "session created at {} but no {} header returned",
                    response.url, AUTH_TOKEN_HEADER
                ))
            })?
            .to_string();
        let location = response
            .header("Location")
            .filter(|l| !l.is_empty())
            .ok_or_else(|| {
                RedfishClientError::integrity(format!(
                    "session created at {} but no Location header returned",
                    response.url
                ))
            })?;
        let location = self.url_for(location);

        info!(session = %location, "Logged in");
        self.session = Some(SessionAuth { token, location });
        Ok(())
    }

    /// Close the current session, if any
    #[instrument(skip(self))]
    pub async fn logout(&mut self) -> Result<()> {
        let location = match &self.session {
            Some(session) => session.location.clone(),
            None => {
                debug!("No session held, nothing to log out");
                return Ok(());
            }
        };

        let response = self.delete(&location).await?;
        if !response.is_success() {
            return Err(RedfishClientError::from_response("DELETE", &response));
        }

        info!(session = %location, "Logged out");
        self.clear_session();
        Ok(())
    }

    /// Forget the session without telling the server
    pub fn clear_session(&mut self) {
        self.session = None;
    }

    /// Location of the session collection, asking the SessionService when
    /// the service root did not advertise it.
    async fn sessions_endpoint(&mut self, username: &str, password: &str) -> Result<String> {
        let endpoints = self.required_endpoints()?;
        if let Some(sessions) = &endpoints.sessions {
            return Ok(sessions.clone());
        }

        let session_service = endpoints.session_service.clone();
        let auth = BasicAuth {
            username: username.to_string(),
            password: password.to_string(),
        };
        let response = self
            .send(Method::GET, &session_service, None, Some(auth))
            .await?;
        if response.status != 200 {
            return Err(RedfishClientError::from_response("GET", &response));
        }

        let info: SessionServiceInfo = decode(&response)?;
        if info.service_enabled == Some(false) {
            return Err(RedfishClientError::SessionServiceDisabled(session_service));
        }

        let sessions = info
            .sessions
            .as_ref()
            .and_then(|link| link.target())
            .map(str::to_string)
            .ok_or_else(|| {
                RedfishClientError::integrity(format!(
                    "SessionService at {} does not define Sessions",
                    session_service
                ))
            })?;

        if let Some(endpoints) = self.endpoints.as_mut() {
            endpoints.sessions = Some(sessions.clone());
        }
        Ok(sessions)
    }
}
