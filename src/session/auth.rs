//! Login handshake.

use std::sync::Arc;

use tracing::{debug, info};

use super::SessionHandle;
use crate::api::client::absolute_url;
use crate::api::endpoints::{AUTH, CSRF_TOKEN, ENSURE_SDC, ENSURE_SDC_FROM};
use crate::api::{ApiClient, FormData, TokenRecord, decode_envelope};
use crate::config::CloudConfig;
use crate::error::{CloudError, Result};
use crate::http::{HttpClient, Transport};

/// Domain submitted with the credentials form.
const LOGIN_DOMAIN: &str = "mail.ru";

impl SessionHandle {
    /// Login with e-mail and password.
    ///
    /// # Example
    /// ```no_run
    /// use mailrulib::SessionHandle;
    ///
    /// # async fn example() -> mailrulib::Result<()> {
    /// let session = SessionHandle::login("user@mail.ru", "password").await?;
    /// println!("Logged in as: {}", session.identity());
    /// # Ok(())
    /// # }
    /// ```
    pub async fn login(identity: &str, secret: &str) -> Result<Self> {
        Self::login_with_config(identity, secret, CloudConfig::default()).await
    }

    /// Login with e-mail, password, and HTTP proxy.
    ///
    /// # Arguments
    /// * `proxy` - Proxy URL (e.g., "http://proxy:8080" or "socks5://proxy:1080")
    pub async fn login_with_proxy(identity: &str, secret: &str, proxy: &str) -> Result<Self> {
        Self::login_with_config(identity, secret, CloudConfig::default().with_proxy(proxy)).await
    }

    /// Login against the endpoints of `config` over a reqwest transport.
    pub async fn login_with_config(
        identity: &str,
        secret: &str,
        config: CloudConfig,
    ) -> Result<Self> {
        let transport = Arc::new(HttpClient::new(&config)?);
        Self::login_with_transport(identity, secret, transport, Arc::new(config)).await
    }

    /// Run the handshake over an arbitrary transport.
    ///
    /// Steps: credentials form, SDC cookie bootstrap, CSRF token, then the
    /// tariff list used for capability gating.
    pub async fn login_with_transport(
        identity: &str,
        secret: &str,
        transport: Arc<dyn Transport>,
        config: Arc<CloudConfig>,
    ) -> Result<Self> {
        let mut session = Self::from_api(ApiClient::new(transport, config, identity), secret);
        session.check_credentials()?;

        session.submit_credentials().await?;
        session.ensure_sdc().await?;
        let token = session.fetch_csrf_token().await?;
        session.api_mut().set_token(token);

        let activated: Vec<_> = session
            .fetch_rates()
            .await?
            .into_iter()
            .filter(|rate| rate.is_active)
            .collect();
        debug!("{} activated tariffs", activated.len());
        session.set_activated_tariffs(activated);

        info!("Logged in as {}", identity);
        Ok(session)
    }

    async fn submit_credentials(&self) -> Result<()> {
        let api = self.api();
        let mut form = FormData::new();
        form.set("Login", api.email())
            .set("Domain", LOGIN_DOMAIN)
            .set("Password", self.secret());

        let response = api
            .post_form_url(&api.config().auth_url(AUTH), &form)
            .await?;
        if response.status != 200 {
            return Err(CloudError::not_authorized(
                format!("Login failed with status {}", response.status),
                Some("login"),
            ));
        }
        Ok(())
    }

    async fn ensure_sdc(&self) -> Result<()> {
        let api = self.api();
        let url = absolute_url(
            &api.config().auth_url(ENSURE_SDC),
            &[("from", ENSURE_SDC_FROM)],
        )?;
        let response = api.get(&url).await?;
        if response.status != 200 {
            return Err(CloudError::not_authorized(
                format!("SDC cookie request failed with status {}", response.status),
                None,
            ));
        }
        Ok(())
    }

    async fn fetch_csrf_token(&self) -> Result<String> {
        let api = self.api();
        let response = api.get(&api.config().cloud_url(CSRF_TOKEN)).await?;
        if !response.is_success() {
            return Err(CloudError::not_authorized(
                format!("Token request failed with status {}", response.status),
                None,
            ));
        }
        let record: TokenRecord = decode_envelope(&response.body)?;
        if record.token.is_empty() {
            return Err(CloudError::not_authorized(
                "Auth token is missing in the response",
                None,
            ));
        }
        Ok(record.token)
    }
}
