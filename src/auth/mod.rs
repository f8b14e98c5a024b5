//! Authentication and session management

mod session;
mod types;

use std::collections::HashMap;
use std::sync::Arc;

use log::warn;
use reqwest::multipart::{Form, Part};
use reqwest::Client;

use crate::error::Error;
use crate::fetch::{data_key, parse_envelope, Fetch};
use crate::models::{User, UserUpdate};

pub use session::*;
pub use types::*;

/// Client for authentication and the current-user profile
pub struct AuthClient {
    /// Base URL of the backend
    url: String,

    /// API path prefix
    prefix: String,

    /// HTTP client used for requests
    client: Client,

    /// The shared session
    session: Arc<SessionContext>,
}

impl AuthClient {
    pub(crate) fn new(url: &str, prefix: &str, client: Client, session: Arc<SessionContext>) -> Self {
        Self {
            url: url.to_string(),
            prefix: prefix.to_string(),
            client,
            session,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}{}", self.url, self.prefix, path)
    }

    fn require_token(&self) -> Result<String, Error> {
        self.session.token().ok_or_else(|| Error::auth("Not logged in"))
    }

    /// The session shared with the rest of the client
    pub fn session(&self) -> Arc<SessionContext> {
        self.session.clone()
    }

    /// Verify any persisted token against the backend and settle the session
    /// into `Authenticated` or `Unauthenticated`.
    ///
    /// Failures during the check are swallowed: an unreachable backend and an
    /// invalid token both degrade to an unauthenticated session. On a
    /// protected route that also redirects to login, exactly once.
    pub async fn initialize(&self, protected_route: bool) -> SessionState {
        if self.session.token().is_none() {
            self.session.clear();
            if protected_route {
                self.session.navigate(Route::Login);
            }
            return self.session.state();
        }

        self.session.set_checking();
        match self.fetch_current_user().await {
            Ok(user) => self.session.set_authenticated(user),
            Err(err) => {
                warn!("session check failed: {}", err);
                self.session.clear();
                if protected_route {
                    self.session.navigate(Route::Login);
                }
            }
        }
        self.session.state()
    }

    /// Sign in with email and password.
    ///
    /// On success the token is stored, the session becomes authenticated and
    /// navigation goes to the admin panel for admins, the dashboard for
    /// everyone else. Errors propagate to the caller uncaught.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, Error> {
        let credentials = Credentials {
            email: email.to_string(),
            password: password.to_string(),
        };

        let data = Fetch::post(&self.client, &self.endpoint("/auth/login"))
            .json(&credentials)?
            .execute_envelope()
            .await?;
        let payload: AuthPayload = serde_json::from_value(data)?;

        self.session.store_token(&payload.token);
        self.session.set_authenticated(payload.user.clone());
        let route = if payload.user.is_admin() {
            Route::Admin
        } else {
            Route::Dashboard
        };
        self.session.navigate(route);

        Ok(payload.user)
    }

    /// Create an account. Symmetric to [`login`](Self::login).
    pub async fn register(&self, request: &RegisterRequest) -> Result<User, Error> {
        let data = Fetch::post(&self.client, &self.endpoint("/auth/register"))
            .json(request)?
            .execute_envelope()
            .await?;
        let payload: AuthPayload = serde_json::from_value(data)?;

        self.session.store_token(&payload.token);
        self.session.set_authenticated(payload.user.clone());
        let route = if payload.user.is_admin() {
            Route::Admin
        } else {
            Route::Dashboard
        };
        self.session.navigate(route);

        Ok(payload.user)
    }

    /// Drop the session locally and navigate to the login page. The token is
    /// stateless on the backend, so no request is made.
    pub fn logout(&self) {
        self.session.clear();
        self.session.navigate(Route::Login);
    }

    /// Request a password-reset email
    pub async fn forgot_password(&self, email: &str) -> Result<(), Error> {
        let mut body = HashMap::new();
        body.insert("email".to_string(), email.to_string());

        Fetch::post(&self.client, &self.endpoint("/auth/forgot-password"))
            .json(&body)?
            .execute_envelope()
            .await?;
        Ok(())
    }

    /// Complete a password reset with the emailed token
    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), Error> {
        let mut body = HashMap::new();
        body.insert("token".to_string(), token.to_string());
        body.insert("password".to_string(), new_password.to_string());

        Fetch::post(&self.client, &self.endpoint("/auth/reset-password"))
            .json(&body)?
            .execute_envelope()
            .await?;
        Ok(())
    }

    async fn fetch_current_user(&self) -> Result<User, Error> {
        let token = self.require_token()?;
        let data = Fetch::get(&self.client, &self.endpoint("/users/me"))
            .bearer_auth(&token)
            .execute_envelope()
            .await?;
        let user: User = serde_json::from_value(data_key(&data, "user"))?;
        Ok(user)
    }

    /// Fetch the authenticated user and refresh the session copy
    pub async fn current_user(&self) -> Result<User, Error> {
        let user = self.fetch_current_user().await?;
        self.session.set_authenticated(user.clone());
        Ok(user)
    }

    /// Persist profile changes. The server's copy of the user replaces the
    /// session copy, reconciling any provisional client-side merge.
    pub async fn update_profile(&self, update: &UserUpdate) -> Result<User, Error> {
        let token = self.require_token()?;
        let data = Fetch::put(&self.client, &self.endpoint("/users/me"))
            .bearer_auth(&token)
            .json(update)?
            .execute_envelope()
            .await?;
        let user: User = serde_json::from_value(data_key(&data, "user"))?;
        self.session.set_authenticated(user.clone());
        Ok(user)
    }

    /// Shallow-merge a patch into the cached user without a server round
    /// trip. See [`SessionContext::update_user`].
    pub fn update_user(&self, patch: UserUpdate) {
        self.session.update_user(patch);
    }

    /// Upload a new avatar image
    pub async fn upload_avatar(&self, bytes: Vec<u8>, file_name: &str) -> Result<User, Error> {
        let token = self.require_token()?;
        let part = Part::bytes(bytes).file_name(file_name.to_string());
        let form = Form::new().part("avatar", part);

        let response = self
            .client
            .post(self.endpoint("/users/me/avatar"))
            .header("Authorization", format!("Bearer {}", token))
            .multipart(form)
            .send()
            .await?;
        let data = parse_envelope(response).await?;
        let user: User = serde_json::from_value(data_key(&data, "user"))?;
        self.session.set_authenticated(user.clone());
        Ok(user)
    }

    /// Remove the current avatar
    pub async fn delete_avatar(&self) -> Result<(), Error> {
        let token = self.require_token()?;
        Fetch::delete(&self.client, &self.endpoint("/users/me/avatar"))
            .bearer_auth(&token)
            .execute_envelope()
            .await?;
        Ok(())
    }

    /// Ask the backend to generate a placeholder avatar
    pub async fn generate_avatar(&self) -> Result<User, Error> {
        let token = self.require_token()?;
        let data = Fetch::post(&self.client, &self.endpoint("/users/me/avatar/generate"))
            .bearer_auth(&token)
            .execute_envelope()
            .await?;
        let user: User = serde_json::from_value(data_key(&data, "user"))?;
        self.session.set_authenticated(user.clone());
        Ok(user)
    }
}
