//! Configuration options for the SaaS kit client

use std::env;
use std::sync::Arc;
use std::time::Duration;

use crate::auth::{Navigator, NoopNavigator};
use crate::token::{MemoryTokenStore, TokenStore};

/// Default backend URL when `SAASKIT_API_URL` is not set
pub const DEFAULT_API_URL: &str = "http://localhost:8080";

/// Configuration options for the SaaS kit client
#[derive(Clone)]
pub struct ClientOptions {
    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Path prefix for all API endpoints
    pub api_prefix: String,

    /// Whether to persist the session token via the token store
    pub persist_session: bool,

    /// Display name of the site, used for marketing metadata
    pub site_name: Option<String>,

    /// Stripe publishable key for checkout flows
    pub stripe_publishable_key: Option<String>,

    /// Where the bearer token is loaded from and saved to
    pub token_store: Arc<dyn TokenStore>,

    /// Receives navigation side effects (login/dashboard/admin redirects)
    pub navigator: Arc<dyn Navigator>,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            request_timeout: Some(Duration::from_secs(30)),
            api_prefix: "/api/v1".to_string(),
            persist_session: true,
            site_name: None,
            stripe_publishable_key: None,
            token_store: Arc::new(MemoryTokenStore::new()),
            navigator: Arc::new(NoopNavigator),
        }
    }
}

impl ClientOptions {
    /// Build options from the environment (`SAASKIT_SITE_NAME`,
    /// `SAASKIT_STRIPE_PUBLISHABLE_KEY`)
    pub fn from_env() -> Self {
        Self {
            site_name: env::var("SAASKIT_SITE_NAME").ok(),
            stripe_publishable_key: env::var("SAASKIT_STRIPE_PUBLISHABLE_KEY").ok(),
            ..Self::default()
        }
    }

    /// Resolve the backend URL from `SAASKIT_API_URL`, with a localhost default
    pub fn api_url_from_env() -> String {
        env::var("SAASKIT_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string())
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the API path prefix
    pub fn with_api_prefix(mut self, value: &str) -> Self {
        self.api_prefix = value.to_string();
        self
    }

    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    /// Set the site name
    pub fn with_site_name(mut self, value: &str) -> Self {
        self.site_name = Some(value.to_string());
        self
    }

    /// Set the Stripe publishable key
    pub fn with_stripe_publishable_key(mut self, value: &str) -> Self {
        self.stripe_publishable_key = Some(value.to_string());
        self
    }

    /// Set the token store
    pub fn with_token_store(mut self, value: Arc<dyn TokenStore>) -> Self {
        self.token_store = value;
        self
    }

    /// Set the navigator
    pub fn with_navigator(mut self, value: Arc<dyn Navigator>) -> Self {
        self.navigator = value;
        self
    }
}
