//! Typed clients, one per backend endpoint family

use reqwest::{Client, Method};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;

use crate::auth::SessionContext;
use crate::error::Error;
use crate::fetch::data_key;
use crate::models::{
    active_project_count, CheckoutSession, Invitation, InvitationStatus, Organization, Plan,
    Project, SubscriptionStatus,
};
use crate::resources::{ResourceApi, ResourceDetail, ResourceSet, RestResource};

fn list_value(data: &Value, plural_key: &str) -> Value {
    data.get(plural_key)
        .cloned()
        .unwrap_or_else(|| Value::Array(Vec::new()))
}

/// Fields accepted when creating or updating an organization
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Client for `/api/v1/organizations`
pub struct OrganizationsClient {
    rest: Arc<RestResource>,
}

impl OrganizationsClient {
    pub(crate) fn new(url: &str, prefix: &str, client: Client, session: Arc<SessionContext>) -> Self {
        Self {
            rest: Arc::new(RestResource::new(url, prefix, "organizations", client, session)),
        }
    }

    pub async fn list(&self) -> Result<Vec<Organization>, Error> {
        let data = self.rest.list().await?;
        Ok(serde_json::from_value(list_value(&data, "organizations"))?)
    }

    pub async fn get(&self, id: &str) -> Result<Organization, Error> {
        let data = self.rest.get(id).await?;
        Ok(serde_json::from_value(data_key(&data, "organization"))?)
    }

    pub async fn create(&self, input: &OrganizationInput) -> Result<Organization, Error> {
        let data = self.rest.create(&serde_json::to_value(input)?).await?;
        Ok(serde_json::from_value(data_key(&data, "organization"))?)
    }

    pub async fn update(&self, id: &str, input: &OrganizationInput) -> Result<Organization, Error> {
        let data = self.rest.update(id, &serde_json::to_value(input)?).await?;
        Ok(serde_json::from_value(data_key(&data, "organization"))?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.rest.delete(id).await?;
        Ok(())
    }

    /// A [`ResourceSet`] wired to this collection
    pub fn resource_set(&self) -> ResourceSet<Organization> {
        ResourceSet::new(
            self.rest.clone(),
            "organizations",
            "organization",
            self.rest.session().navigator(),
        )
    }

    /// A [`ResourceDetail`] wired to this collection
    pub fn detail(&self) -> ResourceDetail<Organization> {
        ResourceDetail::new(self.rest.clone(), "organization", self.rest.session().navigator())
    }
}

/// Fields accepted when creating or updating a project
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organization_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Client for `/api/v1/projects`
pub struct ProjectsClient {
    rest: Arc<RestResource>,
}

impl ProjectsClient {
    pub(crate) fn new(url: &str, prefix: &str, client: Client, session: Arc<SessionContext>) -> Self {
        Self {
            rest: Arc::new(RestResource::new(url, prefix, "projects", client, session)),
        }
    }

    pub async fn list(&self) -> Result<Vec<Project>, Error> {
        let data = self.rest.list().await?;
        Ok(serde_json::from_value(list_value(&data, "projects"))?)
    }

    pub async fn get(&self, id: &str) -> Result<Project, Error> {
        let data = self.rest.get(id).await?;
        Ok(serde_json::from_value(data_key(&data, "project"))?)
    }

    pub async fn create(&self, input: &ProjectInput) -> Result<Project, Error> {
        let data = self.rest.create(&serde_json::to_value(input)?).await?;
        Ok(serde_json::from_value(data_key(&data, "project"))?)
    }

    pub async fn update(&self, id: &str, input: &ProjectInput) -> Result<Project, Error> {
        let data = self.rest.update(id, &serde_json::to_value(input)?).await?;
        Ok(serde_json::from_value(data_key(&data, "project"))?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.rest.delete(id).await?;
        Ok(())
    }

    /// Number of projects currently in the `active` state
    pub async fn active_count(&self) -> Result<usize, Error> {
        Ok(active_project_count(&self.list().await?))
    }

    pub fn resource_set(&self) -> ResourceSet<Project> {
        ResourceSet::new(
            self.rest.clone(),
            "projects",
            "project",
            self.rest.session().navigator(),
        )
    }

    pub fn detail(&self) -> ResourceDetail<Project> {
        ResourceDetail::new(self.rest.clone(), "project", self.rest.session().navigator())
    }
}

/// Fields accepted when inviting a member
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvitationInput {
    pub organization_id: String,
    pub email: String,
}

/// Client for `/api/v1/invitations`
pub struct InvitationsClient {
    rest: Arc<RestResource>,
}

impl InvitationsClient {
    pub(crate) fn new(url: &str, prefix: &str, client: Client, session: Arc<SessionContext>) -> Self {
        Self {
            rest: Arc::new(RestResource::new(url, prefix, "invitations", client, session)),
        }
    }

    pub async fn list(&self) -> Result<Vec<Invitation>, Error> {
        let data = self.rest.list().await?;
        Ok(serde_json::from_value(list_value(&data, "invitations"))?)
    }

    /// Invitations still awaiting a response
    pub async fn pending(&self) -> Result<Vec<Invitation>, Error> {
        let invitations = self.list().await?;
        Ok(invitations
            .into_iter()
            .filter(|i| i.status == InvitationStatus::Pending)
            .collect())
    }

    pub async fn create(&self, input: &InvitationInput) -> Result<Invitation, Error> {
        let data = self.rest.create(&serde_json::to_value(input)?).await?;
        Ok(serde_json::from_value(data_key(&data, "invitation"))?)
    }

    pub async fn accept(&self, id: &str) -> Result<(), Error> {
        self.rest
            .request(Method::POST, &format!("{}/accept", id))
            .execute_envelope()
            .await?;
        Ok(())
    }

    pub async fn decline(&self, id: &str) -> Result<(), Error> {
        self.rest
            .request(Method::POST, &format!("{}/decline", id))
            .execute_envelope()
            .await?;
        Ok(())
    }

    pub fn resource_set(&self) -> ResourceSet<Invitation> {
        ResourceSet::new(
            self.rest.clone(),
            "invitations",
            "invitation",
            self.rest.session().navigator(),
        )
    }
}

/// Fields accepted when creating or updating a plan
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_monthly: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_yearly: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_organizations: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_projects: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_members: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort_order: Option<i32>,
}

/// Client for `/api/v1/plans`
pub struct PlansClient {
    rest: Arc<RestResource>,
}

impl PlansClient {
    pub(crate) fn new(url: &str, prefix: &str, client: Client, session: Arc<SessionContext>) -> Self {
        Self {
            rest: Arc::new(RestResource::new(url, prefix, "plans", client, session)),
        }
    }

    pub async fn list(&self) -> Result<Vec<Plan>, Error> {
        let data = self.rest.list().await?;
        Ok(serde_json::from_value(list_value(&data, "plans"))?)
    }

    pub async fn get(&self, id: &str) -> Result<Plan, Error> {
        let data = self.rest.get(id).await?;
        Ok(serde_json::from_value(data_key(&data, "plan"))?)
    }

    pub async fn create(&self, input: &PlanInput) -> Result<Plan, Error> {
        let data = self.rest.create(&serde_json::to_value(input)?).await?;
        Ok(serde_json::from_value(data_key(&data, "plan"))?)
    }

    pub async fn update(&self, id: &str, input: &PlanInput) -> Result<Plan, Error> {
        let data = self.rest.update(id, &serde_json::to_value(input)?).await?;
        Ok(serde_json::from_value(data_key(&data, "plan"))?)
    }

    pub async fn delete(&self, id: &str) -> Result<(), Error> {
        self.rest.delete(id).await?;
        Ok(())
    }

    pub fn resource_set(&self) -> ResourceSet<Plan> {
        ResourceSet::new(
            self.rest.clone(),
            "plans",
            "plan",
            self.rest.session().navigator(),
        )
    }
}

/// Client for `/api/v1/settings`
pub struct SettingsClient {
    rest: Arc<RestResource>,
}

impl SettingsClient {
    pub(crate) fn new(url: &str, prefix: &str, client: Client, session: Arc<SessionContext>) -> Self {
        Self {
            rest: Arc::new(RestResource::new(url, prefix, "settings", client, session)),
        }
    }

    /// Fetch every setting as a key/value map
    pub async fn all(&self) -> Result<HashMap<String, Value>, Error> {
        let data = self
            .rest
            .request(Method::GET, "all")
            .execute_envelope()
            .await?;
        Ok(serde_json::from_value(data_key(&data, "settings"))?)
    }

    /// Write several settings in one request
    pub async fn update_batch(&self, settings: &HashMap<String, Value>) -> Result<(), Error> {
        self.rest
            .request(Method::PUT, "batch")
            .json(&serde_json::json!({ "settings": settings }))?
            .execute_envelope()
            .await?;
        Ok(())
    }
}

/// Billing interval for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BillingCycle {
    Monthly,
    Yearly,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
struct CheckoutRequest<'a> {
    plan_id: &'a str,
    billing_cycle: BillingCycle,
}

/// Client for `/api/v1/billing`
pub struct BillingClient {
    rest: Arc<RestResource>,
}

impl BillingClient {
    pub(crate) fn new(url: &str, prefix: &str, client: Client, session: Arc<SessionContext>) -> Self {
        Self {
            rest: Arc::new(RestResource::new(url, prefix, "billing", client, session)),
        }
    }

    /// Start a checkout session for a plan
    pub async fn checkout(
        &self,
        plan_id: &str,
        billing_cycle: BillingCycle,
    ) -> Result<CheckoutSession, Error> {
        let request = CheckoutRequest {
            plan_id,
            billing_cycle,
        };
        let data = self
            .rest
            .request(Method::POST, "checkout")
            .json(&request)?
            .execute_envelope()
            .await?;
        Ok(serde_json::from_value(data_key(&data, "checkout"))?)
    }

    /// Current subscription state for the authenticated user
    pub async fn subscription_status(&self) -> Result<SubscriptionStatus, Error> {
        let data = self
            .rest
            .request(Method::GET, "subscription/status")
            .execute_envelope()
            .await?;
        Ok(serde_json::from_value(data_key(&data, "subscription"))?)
    }

    /// Cancel a subscription
    pub async fn cancel_subscription(&self, subscription_id: &str) -> Result<(), Error> {
        self.rest
            .request(Method::DELETE, &format!("subscription/{}", subscription_id))
            .execute_envelope()
            .await?;
        Ok(())
    }
}
