mod common;

use std::collections::HashMap;

use common::harness;
use saaskit_rust::models::InvitationStatus;
use saaskit_rust::resources::{BillingCycle, InvitationInput, PlanInput};
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn invitations_filter_pending_and_accept() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/invitations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"invitations": [
                {
                    "id": "i1", "organizationId": "o1", "email": "a@b.com",
                    "status": "pending",
                    "organization": {"id": "o1", "name": "Acme"}
                },
                {"id": "i2", "organizationId": "o1", "email": "c@d.com", "status": "declined"}
            ]}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/invitations/i1/accept"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok1"));
    let invitations = h.client.invitations();

    let pending = invitations.pending().await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].status, InvitationStatus::Pending);
    assert_eq!(
        pending[0].organization.as_ref().unwrap().name,
        "Acme"
    );

    invitations.accept("i1").await.unwrap();
}

#[tokio::test]
async fn invitations_create_and_decline() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/invitations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"invitation": {
                "id": "i3", "organizationId": "o1", "email": "e@f.com", "status": "pending"
            }}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/v1/invitations/i3/decline"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok1"));
    let invitations = h.client.invitations();

    let input = InvitationInput {
        organization_id: "o1".to_string(),
        email: "e@f.com".to_string(),
    };
    let created = invitations.create(&input).await.unwrap();
    assert_eq!(created.id, "i3");

    invitations.decline("i3").await.unwrap();
}

#[tokio::test]
async fn plans_round_trip_with_unlimited_caps() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/plans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"plans": [
                {
                    "id": "pro", "name": "pro", "displayName": "Pro",
                    "priceMonthly": 29.0, "priceYearly": 290.0,
                    "maxOrganizations": 5, "maxProjects": -1, "maxMembers": 25,
                    "features": ["sso"], "isActive": true, "sortOrder": 2
                }
            ]}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/plans/pro"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"plan": {
                "id": "pro", "name": "pro", "priceMonthly": 35.0
            }}
        })))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok1"));
    let plans = h.client.plans();

    let listed = plans.list().await.unwrap();
    assert_eq!(listed.len(), 1);
    assert!(listed[0].unlimited_projects());
    assert!(!listed[0].unlimited_members());

    let updated = plans
        .update(
            "pro",
            &PlanInput {
                price_monthly: Some(35.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.price_monthly, 35.0);
}

#[tokio::test]
async fn settings_read_all_and_write_batch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/settings/all"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"settings": {"siteName": "Acme SaaS", "signupsOpen": true}}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/v1/settings/batch"))
        .and(body_json(json!({"settings": {"signupsOpen": false}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok1"));
    let settings = h.client.settings();

    let all = settings.all().await.unwrap();
    assert_eq!(all["siteName"], json!("Acme SaaS"));

    let mut batch = HashMap::new();
    batch.insert("signupsOpen".to_string(), json!(false));
    settings.update_batch(&batch).await.unwrap();
}

#[tokio::test]
async fn billing_checkout_and_subscription_lifecycle() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/api/v1/billing/checkout"))
        .and(body_json(json!({"planId": "pro", "billingCycle": "monthly"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"checkout": {"sessionId": "cs_1", "url": "https://pay.example/cs_1"}}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/billing/subscription/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"subscription": {
                "subscriptionId": "sub_1",
                "status": "active",
                "planId": "pro",
                "cancelAtPeriodEnd": false
            }}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("DELETE"))
        .and(path("/api/v1/billing/subscription/sub_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok1"));
    let billing = h.client.billing();

    let checkout = billing.checkout("pro", BillingCycle::Monthly).await.unwrap();
    assert_eq!(checkout.url.as_deref(), Some("https://pay.example/cs_1"));

    let status = billing.subscription_status().await.unwrap();
    assert_eq!(status.status, "active");

    billing.cancel_subscription("sub_1").await.unwrap();
}
