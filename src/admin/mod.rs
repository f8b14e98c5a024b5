//! Admin panel client: stats, resource schemas, and the schema-driven view

mod metadata;
mod table;

use reqwest::Client;
use serde_json::Value;
use std::sync::Arc;

use crate::auth::SessionContext;
use crate::error::Error;
use crate::fetch::{data_key, Fetch, FetchBuilder};
use crate::models::AdminStats;

pub use metadata::{Capability, FieldDescriptor, FieldKind, ResolvedField, ResourceMetadata};
pub use table::{format_relative_time, ResourceTable, Row};

/// Client for `/api/v1/admin`
pub struct AdminClient {
    url: String,
    prefix: String,
    client: Client,
    session: Arc<SessionContext>,
}

impl AdminClient {
    pub(crate) fn new(url: &str, prefix: &str, client: Client, session: Arc<SessionContext>) -> Self {
        Self {
            url: url.to_string(),
            prefix: prefix.to_string(),
            client,
            session,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}/admin{}", self.url, self.prefix, path)
    }

    fn authed<'a>(&self, builder: FetchBuilder<'a>) -> FetchBuilder<'a> {
        match self.session.token() {
            Some(token) => builder.bearer_auth(&token),
            None => builder,
        }
    }

    /// Aggregate dashboard counters
    pub async fn stats(&self) -> Result<AdminStats, Error> {
        let data = self
            .authed(Fetch::get(&self.client, &self.endpoint("/stats")))
            .execute_envelope()
            .await?;
        Ok(serde_json::from_value(data_key(&data, "stats"))?)
    }

    /// Schemas of every admin-manageable resource
    pub async fn resources(&self) -> Result<Vec<ResourceMetadata>, Error> {
        let data = self
            .authed(Fetch::get(&self.client, &self.endpoint("/resources")))
            .execute_envelope()
            .await?;
        let value = data
            .get("resources")
            .cloned()
            .unwrap_or_else(|| Value::Array(Vec::new()));
        Ok(serde_json::from_value(value)?)
    }

    /// Schema for one resource, by singular or plural name
    pub async fn resource_metadata(&self, resource: &str) -> Result<ResourceMetadata, Error> {
        let resources = self.resources().await?;
        resources
            .into_iter()
            .find(|m| m.name == resource || m.plural_key() == resource)
            .ok_or_else(|| Error::general(format!("Unknown admin resource: {}", resource)))
    }

    /// Rows of one resource. Read from `data[pluralName]`, falling back to
    /// `data` itself when the envelope carries the array directly.
    pub async fn resource_rows(&self, metadata: &ResourceMetadata) -> Result<Vec<Row>, Error> {
        let data = self
            .authed(Fetch::get(
                &self.client,
                &self.endpoint(&format!("/resources/{}", metadata.name)),
            ))
            .execute_envelope()
            .await?;
        let value = match data.get(&metadata.plural_key()) {
            Some(rows) => rows.clone(),
            None if data.is_array() => data,
            None => Value::Array(Vec::new()),
        };
        Ok(serde_json::from_value(value)?)
    }

    /// Fetch schema and rows and assemble a renderable table
    pub async fn load_table(&self, resource: &str) -> Result<ResourceTable, Error> {
        let metadata = self.resource_metadata(resource).await?;
        let rows = self.resource_rows(&metadata).await?;
        Ok(ResourceTable::new(metadata, rows))
    }
}

/// State of the admin resource page
pub enum ViewState {
    Loading,
    Ready(ResourceTable),
    Failed(String),
}

/// Page-level state machine around one resource's table.
///
/// `Loading` transitions to `Ready` or `Failed`; the only way back to
/// `Loading` is an explicit [`refetch`](AdminResourceView::refetch).
pub struct AdminResourceView {
    resource: String,
    state: ViewState,
}

impl AdminResourceView {
    pub fn new(resource: &str) -> Self {
        Self {
            resource: resource.to_string(),
            state: ViewState::Loading,
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn table(&self) -> Option<&ResourceTable> {
        match &self.state {
            ViewState::Ready(table) => Some(table),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.state {
            ViewState::Failed(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, ViewState::Loading)
    }

    /// Reload schema and rows from scratch
    pub async fn refetch(&mut self, admin: &AdminClient) {
        self.state = ViewState::Loading;
        self.state = match admin.load_table(&self.resource).await {
            Ok(table) => ViewState::Ready(table),
            Err(err) => ViewState::Failed(err.to_string()),
        };
    }
}
