// ABOUTME: Client for the v3 platform REST API.
// ABOUTME: Login via a discovered authorization server, paginated listings, and resource actions.

mod actions;
mod auth;
mod client;
mod error;
pub mod models;
mod pagination;
pub mod paths;
mod transport;

pub use actions::NewRoute;
pub use auth::{
    AuthServerResolver, ClientCredentials, DEFAULT_CLIENT_ID, DEFAULT_CLIENT_SECRET, TokenClient,
    UaaTokenClient,
};
pub use client::CfApiClient;
pub use error::{ApiError, ApiErrorKind, Result};
pub use pagination::{PageContents, app_page, org_page, space_page, walk_pages};
pub use transport::{TransportConfig, endpoint, parse_target, with_guid};
