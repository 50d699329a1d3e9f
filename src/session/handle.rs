//! Authenticated session handle.

use std::sync::Arc;

use crate::api::ApiClient;
use crate::config::CloudConfig;
use crate::error::{CloudError, Result};
use crate::http::Transport;

use super::account::Rate;

/// Identity, secret, auth token and transport of one logged-in account.
///
/// Produced by [`SessionHandle::login`]. There is no renewal: once the server
/// stops accepting the token, log in again.
#[derive(Clone)]
pub struct SessionHandle {
    api: ApiClient,
    secret: String,
    activated_tariffs: Vec<Rate>,
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("api", &self.api)
            .field("activated_tariffs", &self.activated_tariffs.len())
            .finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// Assemble a handle from an existing token, e.g. one kept from an earlier login.
    ///
    /// No request is made; call [`SessionHandle::check_authorization`] to
    /// confirm the token is still accepted.
    pub fn from_token(
        identity: &str,
        secret: &str,
        token: &str,
        transport: Arc<dyn Transport>,
        config: Arc<CloudConfig>,
    ) -> Self {
        let mut api = ApiClient::new(transport, config, identity);
        if !token.is_empty() {
            api.set_token(token.to_string());
        }
        Self::from_api(api, secret)
    }

    pub(crate) fn from_api(api: ApiClient, secret: &str) -> Self {
        Self {
            api,
            secret: secret.to_string(),
            activated_tariffs: Vec::new(),
        }
    }

    /// Login identity (the account e-mail).
    pub fn identity(&self) -> &str {
        self.api.email()
    }

    /// Auth token, if one was obtained.
    pub fn token(&self) -> Option<&str> {
        self.api.token()
    }

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub(crate) fn api_mut(&mut self) -> &mut ApiClient {
        &mut self.api
    }

    pub fn config(&self) -> &CloudConfig {
        self.api.config()
    }

    /// Tariffs that were active at login.
    pub fn activated_tariffs(&self) -> &[Rate] {
        &self.activated_tariffs
    }

    /// Replace the activated tariffs used for capability gating.
    pub fn set_activated_tariffs(&mut self, tariffs: Vec<Rate>) {
        self.activated_tariffs = tariffs;
    }

    /// Identity and secret must both be present.
    pub(crate) fn check_credentials(&self) -> Result<()> {
        if self.api.email().is_empty() {
            return Err(CloudError::not_authorized("Login is not defined", Some("login")));
        }
        if self.secret.is_empty() {
            return Err(CloudError::not_authorized(
                "Password is not defined",
                Some("password"),
            ));
        }
        Ok(())
    }

    /// Credentials plus a cached token, without asking the server.
    pub(crate) fn check_local_authorization(&self) -> Result<()> {
        self.check_credentials()?;
        if self.api.token().is_none_or(str::is_empty) {
            return Err(CloudError::not_authorized("Auth token is missing", None));
        }
        Ok(())
    }

    pub(crate) fn secret(&self) -> &str {
        &self.secret
    }

    /// Full authorization check: local preconditions, then a disk-usage probe
    /// confirming the server still accepts the session.
    pub async fn check_authorization(&self) -> Result<()> {
        self.check_local_authorization()?;
        self.fetch_disk_usage().await.map(|_| ())
    }
}
