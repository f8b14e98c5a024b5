//! SaaS Kit Rust Client Library
//!
//! A Rust client for the SaaS starter kit backend, covering authentication
//! and session management, organization/project/invitation CRUD, billing and
//! plans, application settings, and the metadata-driven admin panel.

pub mod admin;
pub mod auth;
pub mod config;
pub mod error;
pub mod fetch;
pub mod forms;
pub mod models;
pub mod resources;
pub mod token;

use std::sync::Arc;

use reqwest::Client;

use crate::admin::AdminClient;
use crate::auth::{AuthClient, SessionContext};
use crate::config::ClientOptions;
use crate::resources::{
    BillingClient, InvitationsClient, OrganizationsClient, PlansClient, ProjectsClient,
    SettingsClient,
};

/// The main entry point for the SaaS kit client
pub struct SaasKit {
    /// The base URL of the backend
    pub url: String,
    /// HTTP client used for requests
    pub http_client: Client,
    /// Client options
    pub options: ClientOptions,
    /// The shared session, constructed once per client instance
    session: Arc<SessionContext>,
}

impl SaasKit {
    /// Create a new client for a backend URL
    ///
    /// # Example
    ///
    /// ```
    /// use saaskit_rust::SaasKit;
    ///
    /// let client = SaasKit::new("http://localhost:8080");
    /// ```
    pub fn new(url: &str) -> Self {
        Self::new_with_options(url, ClientOptions::default())
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use saaskit_rust::{SaasKit, config::ClientOptions};
    ///
    /// let options = ClientOptions::default().with_persist_session(false);
    /// let client = SaasKit::new_with_options("http://localhost:8080", options);
    /// ```
    pub fn new_with_options(url: &str, options: ClientOptions) -> Self {
        let mut builder = Client::builder();
        if let Some(timeout) = options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build().unwrap_or_default();

        let session = Arc::new(SessionContext::new(
            options.token_store.clone(),
            options.navigator.clone(),
            options.persist_session,
        ));

        Self {
            url: url.trim_end_matches('/').to_string(),
            http_client,
            options,
            session,
        }
    }

    /// Create a client configured from the environment (`SAASKIT_API_URL`,
    /// defaulting to `http://localhost:8080`)
    pub fn from_env() -> Self {
        Self::new_with_options(&ClientOptions::api_url_from_env(), ClientOptions::from_env())
    }

    /// The shared session context
    pub fn session(&self) -> Arc<SessionContext> {
        self.session.clone()
    }

    /// Authentication and current-user profile operations
    pub fn auth(&self) -> AuthClient {
        AuthClient::new(
            &self.url,
            &self.options.api_prefix,
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Organization CRUD
    pub fn organizations(&self) -> OrganizationsClient {
        OrganizationsClient::new(
            &self.url,
            &self.options.api_prefix,
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Project CRUD
    pub fn projects(&self) -> ProjectsClient {
        ProjectsClient::new(
            &self.url,
            &self.options.api_prefix,
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Invitation listing and accept/decline flows
    pub fn invitations(&self) -> InvitationsClient {
        InvitationsClient::new(
            &self.url,
            &self.options.api_prefix,
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Billing plan CRUD
    pub fn plans(&self) -> PlansClient {
        PlansClient::new(
            &self.url,
            &self.options.api_prefix,
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Application settings
    pub fn settings(&self) -> SettingsClient {
        SettingsClient::new(
            &self.url,
            &self.options.api_prefix,
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Checkout and subscription management
    pub fn billing(&self) -> BillingClient {
        BillingClient::new(
            &self.url,
            &self.options.api_prefix,
            self.http_client.clone(),
            self.session.clone(),
        )
    }

    /// Admin stats and the metadata-driven resource panel
    pub fn admin(&self) -> AdminClient {
        AdminClient::new(
            &self.url,
            &self.options.api_prefix,
            self.http_client.clone(),
            self.session.clone(),
        )
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{Navigator, Route, SessionState};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, ErrorKind};
    pub use crate::SaasKit;
}
