//! Generic CRUD resource abstractions and the typed endpoint clients
//!
//! Every backend collection speaks the same dialect: a REST path under the
//! API prefix, bearer auth, and the standard envelope with a plural key for
//! lists and a singular key for single entities. [`RestResource`] implements
//! that dialect once; [`ResourceSet`] and [`ResourceDetail`] layer the
//! client-side fetch/mutate state machines on top of any [`ResourceApi`].

mod clients;
mod index;
mod set;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

use crate::auth::SessionContext;
use crate::error::Error;
use crate::fetch::{Fetch, FetchBuilder};

pub use clients::*;
pub use index::EntityIndex;
pub use set::{ResourceDetail, ResourceSet};

/// CRUD surface of one backend collection. Methods return the envelope's
/// `data` value; key extraction is the caller's concern.
#[async_trait]
pub trait ResourceApi: Send + Sync {
    async fn list(&self) -> Result<Value, Error>;
    async fn get(&self, id: &str) -> Result<Value, Error>;
    async fn create(&self, data: &Value) -> Result<Value, Error>;
    async fn update(&self, id: &str, data: &Value) -> Result<Value, Error>;
    async fn delete(&self, id: &str) -> Result<Value, Error>;
}

/// [`ResourceApi`] over the backend's REST conventions
pub struct RestResource {
    client: Client,
    url: String,
    prefix: String,
    path: String,
    session: Arc<SessionContext>,
}

impl RestResource {
    pub(crate) fn new(
        url: &str,
        prefix: &str,
        path: &str,
        client: Client,
        session: Arc<SessionContext>,
    ) -> Self {
        Self {
            client,
            url: url.to_string(),
            prefix: prefix.to_string(),
            path: path.to_string(),
            session,
        }
    }

    fn collection_url(&self) -> String {
        format!("{}{}/{}", self.url, self.prefix, self.path)
    }

    fn item_url(&self, id: &str) -> String {
        format!("{}/{}", self.collection_url(), id)
    }

    /// Build a sub-path request under this collection (e.g. `:id/accept`),
    /// with bearer auth attached
    pub(crate) fn request<'a>(
        &'a self,
        method: reqwest::Method,
        suffix: &str,
    ) -> FetchBuilder<'a> {
        let url = format!("{}/{}", self.collection_url(), suffix);
        self.authed(FetchBuilder::new(&self.client, &url, method))
    }

    fn authed<'a>(&self, builder: FetchBuilder<'a>) -> FetchBuilder<'a> {
        match self.session.token() {
            Some(token) => builder.bearer_auth(&token),
            None => builder,
        }
    }

    pub(crate) fn session(&self) -> Arc<SessionContext> {
        self.session.clone()
    }
}

#[async_trait]
impl ResourceApi for RestResource {
    async fn list(&self) -> Result<Value, Error> {
        self.authed(Fetch::get(&self.client, &self.collection_url()))
            .execute_envelope()
            .await
    }

    async fn get(&self, id: &str) -> Result<Value, Error> {
        self.authed(Fetch::get(&self.client, &self.item_url(id)))
            .execute_envelope()
            .await
    }

    async fn create(&self, data: &Value) -> Result<Value, Error> {
        self.authed(Fetch::post(&self.client, &self.collection_url()))
            .json(data)?
            .execute_envelope()
            .await
    }

    async fn update(&self, id: &str, data: &Value) -> Result<Value, Error> {
        self.authed(Fetch::put(&self.client, &self.item_url(id)))
            .json(data)?
            .execute_envelope()
            .await
    }

    async fn delete(&self, id: &str) -> Result<Value, Error> {
        self.authed(Fetch::delete(&self.client, &self.item_url(id)))
            .execute_envelope()
            .await
    }
}
