mod common;

use common::harness;
use saaskit_rust::admin::{AdminResourceView, Capability};
use serde_json::json;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn project_metadata() -> serde_json::Value {
    json!({
        "name": "project",
        "pluralName": "projects",
        "capabilities": ["view", "edit", "delete"],
        "fields": [
            {"name": "name", "type": "string", "label": "Name"},
            {"name": "status", "type": "string", "label": "Status"},
            {"name": "createdAt", "type": "datetime", "label": "Created"}
        ],
        "searchFields": ["name", "status"],
        "displayFields": ["name", "status"]
    })
}

#[tokio::test]
async fn stats_parse_with_extra_counters() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/stats"))
        .and(header("Authorization", "Bearer tok1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"stats": {
                "totalUsers": 42,
                "totalOrganizations": 7,
                "monthlyRevenue": 1234.5
            }}
        })))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok1"));
    let stats = h.client.admin().stats().await.unwrap();

    assert_eq!(stats.total_users, 42);
    assert_eq!(stats.total_organizations, 7);
    assert_eq!(stats.total_projects, 0);
    assert_eq!(stats.extra["monthlyRevenue"], json!(1234.5));
}

#[tokio::test]
async fn load_table_renders_headers_from_metadata() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"resources": [project_metadata()]}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/resources/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"projects": [
                {"name": "Apollo", "status": "active", "secret": "hidden"},
                {"name": "Borealis", "status": "paused"}
            ]}
        })))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok1"));
    let table = h.client.admin().load_table("project").await.unwrap();

    // columns are exactly the display fields, whatever else rows carry
    assert_eq!(table.headers(), vec!["Name", "Status"]);
    assert_eq!(table.rows().len(), 2);
    assert_eq!(table.render_row(&table.rows()[0])[..2], ["Apollo", "active"]);
    assert_eq!(
        table.actions(),
        vec![Capability::View, Capability::Edit, Capability::Delete]
    );
    assert_eq!(table.filter("borealis").len(), 1);
}

#[tokio::test]
async fn load_table_accepts_plural_resource_name() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"resources": [project_metadata()]}
        })))
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/resources/project"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"projects": []}
        })))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok1"));
    let table = h.client.admin().load_table("projects").await.unwrap();
    assert!(table.rows().is_empty());
}

#[tokio::test]
async fn view_settles_into_ready_or_failed() {
    let mock_server = MockServer::start().await;

    let h = harness(&mock_server.uri(), Some("tok1"));
    let admin = h.client.admin();
    let mut view = AdminResourceView::new("project");
    assert!(view.is_loading());

    {
        let _resources = Mock::given(method("GET"))
            .and(path("/api/v1/admin/resources"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"resources": [project_metadata()]}
            })))
            .mount_as_scoped(&mock_server)
            .await;
        let _rows = Mock::given(method("GET"))
            .and(path("/api/v1/admin/resources/project"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "success": true,
                "data": {"projects": [{"name": "Apollo", "status": "active"}]}
            })))
            .mount_as_scoped(&mock_server)
            .await;

        view.refetch(&admin).await;
        assert!(!view.is_loading());
        assert_eq!(view.table().unwrap().rows().len(), 1);
    }

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/resources"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "success": false,
            "error": "admin backend down"
        })))
        .mount(&mock_server)
        .await;

    view.refetch(&admin).await;
    assert_eq!(view.error(), Some("admin backend down"));
    assert!(view.table().is_none());
}

#[tokio::test]
async fn unknown_resource_is_an_error() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/v1/admin/resources"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"resources": []}
        })))
        .mount(&mock_server)
        .await;

    let h = harness(&mock_server.uri(), Some("tok1"));
    let err = h.client.admin().load_table("widget").await.unwrap_err();
    assert!(err.to_string().contains("widget"));
}
