// ABOUTME: Test support utilities.
// ABOUTME: Provides an in-process fake platform and JSON fixtures for integration tests.

use std::sync::{Arc, Once};

use cfkit::api::{CfApiClient, TransportConfig};
use cfkit::model::{Instance, Organization, Space};
use cfkit::types::{OrgGuid, SpaceGuid};
use serde_json::{Value, json};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub const TOKEN: &str = "test-token";

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
#[allow(dead_code)]
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("cfkit=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

#[allow(dead_code)]
pub fn client() -> CfApiClient {
    CfApiClient::from_config(&TransportConfig::default()).unwrap()
}

/// A fake platform whose root advertises itself as the login server.
#[allow(dead_code)]
pub async fn platform() -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "links": {
                "self": { "href": server.uri() },
                "login": { "href": server.uri() },
                "uaa": { "href": server.uri() }
            }
        })))
        .mount(&server)
        .await;
    server
}

#[allow(dead_code)]
pub async fn mount_token(server: &MockServer, status: u16, access_token: &str) {
    Mock::given(method("POST"))
        .and(path("/oauth/token"))
        .respond_with(ResponseTemplate::new(status).set_body_json(json!({
            "access_token": access_token,
            "token_type": "bearer",
            "expires_in": 599
        })))
        .mount(server)
        .await;
}

#[allow(dead_code)]
pub fn page(resources: Vec<Value>, next: Option<String>) -> Value {
    let next = next.map(|href| json!({ "href": href }));
    json!({
        "pagination": {
            "total_results": resources.len(),
            "next": next
        },
        "resources": resources
    })
}

#[allow(dead_code)]
pub fn org_json(guid: &str, name: &str) -> Value {
    json!({ "guid": guid, "name": name, "created_at": "2024-01-02T03:04:05Z" })
}

#[allow(dead_code)]
pub fn space_json(guid: &str, name: &str, org: &str) -> Value {
    json!({
        "guid": guid,
        "name": name,
        "relationships": { "organization": { "data": { "guid": org } } }
    })
}

#[allow(dead_code)]
pub fn app_json(guid: &str, name: &str, state: &str) -> Value {
    json!({ "guid": guid, "name": name, "state": state })
}

/// An instance, org, and space hierarchy pointing at `server`.
#[allow(dead_code)]
pub fn hierarchy(server: &MockServer) -> (Arc<Instance>, Arc<Organization>, Arc<Space>) {
    let instance = Arc::new(Instance::new("test", &server.uri(), TOKEN));
    let org = Arc::new(Organization {
        name: "acme".to_string(),
        guid: OrgGuid::new("org-1"),
        parent: Arc::clone(&instance),
    });
    let space = Arc::new(Space {
        name: "dev".to_string(),
        guid: SpaceGuid::new("space-1"),
        parent: Arc::clone(&org),
    });
    (instance, org, space)
}
