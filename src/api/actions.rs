// ABOUTME: Single-resource lifecycle actions against the v3 API.
// ABOUTME: Each action returns success, an unexpected status, or a transport failure.

use reqwest::multipart::{Form, Part};
use reqwest::{Method, StatusCode};
use serde::Serialize;
use snafu::ResultExt;
use url::Url;

use super::client::CfApiClient;
use super::error::{Result, TransportSnafu};
use super::models::{
    AddDestinationsRequest, AppRelationship, AppResource, BuildResource, CreateAppRequest,
    CreateBuildRequest, CreatePackageRequest, CreateRouteRequest, DestinationApp, GuidRef,
    PackageResource, ProcessRef, Relationship, RouteDestination, RouteRelationships,
    RouteResource, SetDropletRequest, SpaceRelationship,
};
use super::paths;
use super::transport::{authorized, decode, decode_with_status, endpoint, expect_status, send, with_guid};
use crate::types::{AppGuid, AppState, BuildGuid, DomainGuid, DropletGuid, PackageGuid, RouteGuid, SpaceGuid};

const PACKAGE_TYPE_BITS: &str = "bits";
const BITS_FIELD: &str = "bits";
const BITS_FILE_NAME: &str = "application.zip";

/// Route to create in a space.
#[derive(Debug, Clone)]
pub struct NewRoute {
    pub domain: DomainGuid,
    pub host: String,
    pub path: String,
    pub port: Option<u16>,
}

impl CfApiClient {
    // =========================================================================
    // App lifecycle
    // =========================================================================

    /// Start an app. `Ok(true)` only if the platform reports it `STARTED`.
    pub async fn start_app(&self, target: &str, token: &str, app: &AppGuid) -> Result<bool> {
        let url = endpoint(target, &with_guid(paths::START_APP, app.as_str()), None)?;
        let resource: AppResource = self.call_any_success(Method::POST, url, token).await?;
        Ok(resource.state == AppState::Started)
    }

    /// Stop an app. `Ok(true)` only if the platform reports it `STOPPED`.
    pub async fn stop_app(&self, target: &str, token: &str, app: &AppGuid) -> Result<bool> {
        let url = endpoint(target, &with_guid(paths::STOP_APP, app.as_str()), None)?;
        let resource: AppResource = self.call_any_success(Method::POST, url, token).await?;
        Ok(resource.state == AppState::Stopped)
    }

    /// Request asynchronous deletion of an app. The platform answers 202.
    pub async fn delete_app(&self, target: &str, token: &str, app: &AppGuid) -> Result<()> {
        let method = Method::DELETE;
        let url = endpoint(target, &with_guid(paths::APP, app.as_str()), None)?;
        let builder = authorized(self.http.delete(url.clone()), token);
        let response = send(builder, &method, &url).await?;
        expect_status(response, &method, &url, |s| s == StatusCode::ACCEPTED)?;
        Ok(())
    }

    pub async fn create_app(
        &self,
        target: &str,
        token: &str,
        name: &str,
        space: &SpaceGuid,
    ) -> Result<AppResource> {
        let url = endpoint(target, paths::APPS, None)?;
        let body = CreateAppRequest {
            name,
            relationships: SpaceRelationship {
                space: Relationship::to(space),
            },
        };
        self.send_json(Method::POST, url, token, &body, StatusCode::CREATED)
            .await
    }

    /// Point the app at a staged droplet.
    pub async fn set_droplet(
        &self,
        target: &str,
        token: &str,
        app: &AppGuid,
        droplet: &DropletGuid,
    ) -> Result<()> {
        let method = Method::PATCH;
        let url = endpoint(target, &with_guid(paths::CURRENT_DROPLET, app.as_str()), None)?;
        let body: SetDropletRequest = Relationship::to(droplet);
        let builder = authorized(self.http.patch(url.clone()), token).json(&body);
        let response = send(builder, &method, &url).await?;
        expect_status(response, &method, &url, |s| s == StatusCode::OK)?;
        Ok(())
    }

    // =========================================================================
    // Packages and builds
    // =========================================================================

    pub async fn create_package(
        &self,
        target: &str,
        token: &str,
        app: &AppGuid,
    ) -> Result<PackageResource> {
        let url = endpoint(target, paths::PACKAGES, None)?;
        let body = CreatePackageRequest {
            kind: PACKAGE_TYPE_BITS,
            relationships: AppRelationship {
                app: Relationship::to(app),
            },
        };
        self.send_json(Method::POST, url, token, &body, StatusCode::CREATED)
            .await
    }

    pub async fn get_package(
        &self,
        target: &str,
        token: &str,
        package: &PackageGuid,
    ) -> Result<PackageResource> {
        let url = endpoint(target, &with_guid(paths::PACKAGE, package.as_str()), None)?;
        self.get_json(url, token).await
    }

    /// Upload a zip archive as the package's bits.
    ///
    /// The archive travels as the multipart field `bits`. Any 2xx is accepted
    /// since platforms differ on whether processing is synchronous.
    pub async fn upload_bits(
        &self,
        target: &str,
        token: &str,
        package: &PackageGuid,
        archive: Vec<u8>,
    ) -> Result<PackageResource> {
        let method = Method::POST;
        let url = endpoint(target, &with_guid(paths::UPLOAD_PACKAGE, package.as_str()), None)?;
        let size = archive.len();

        let part = Part::bytes(archive)
            .file_name(BITS_FILE_NAME)
            .mime_str("application/zip")
            .context(TransportSnafu {
                method: method.clone(),
                uri: url.as_str(),
            })?;
        let form = Form::new().part(BITS_FIELD, part);

        tracing::debug!(%package, size, "uploading package bits");
        let builder = authorized(self.http.post(url.clone()), token).multipart(form);
        let response = send(builder, &method, &url).await?;
        let response = expect_status(response, &method, &url, |s| s.is_success())?;
        decode(response, &method, &url).await
    }

    pub async fn create_build(
        &self,
        target: &str,
        token: &str,
        package: &PackageGuid,
    ) -> Result<BuildResource> {
        let url = endpoint(target, paths::BUILDS, None)?;
        let body = CreateBuildRequest {
            package: GuidRef {
                guid: package.clone(),
            },
        };
        self.send_json(Method::POST, url, token, &body, StatusCode::CREATED)
            .await
    }

    pub async fn get_build(&self, target: &str, token: &str, build: &BuildGuid) -> Result<BuildResource> {
        let url = endpoint(target, &with_guid(paths::BUILD, build.as_str()), None)?;
        self.get_json(url, token).await
    }

    // =========================================================================
    // Routes
    // =========================================================================

    pub async fn create_route(
        &self,
        target: &str,
        token: &str,
        space: &SpaceGuid,
        route: &NewRoute,
    ) -> Result<RouteResource> {
        let url = endpoint(target, paths::ROUTES, None)?;
        let body = CreateRouteRequest {
            host: &route.host,
            path: &route.path,
            port: route.port,
            relationships: RouteRelationships {
                domain: Relationship::to(&route.domain),
                space: Relationship::to(space),
            },
        };
        self.send_json(Method::POST, url, token, &body, StatusCode::CREATED)
            .await
    }

    /// Send traffic for `route` to a process of `app`.
    pub async fn add_destination(
        &self,
        target: &str,
        token: &str,
        route: &RouteGuid,
        app: &AppGuid,
        process_type: &str,
        port: Option<u16>,
    ) -> Result<()> {
        let method = Method::POST;
        let url = endpoint(target, &with_guid(paths::ROUTE_DESTINATIONS, route.as_str()), None)?;
        let body = AddDestinationsRequest {
            destinations: vec![RouteDestination {
                guid: None,
                app: DestinationApp {
                    guid: app.clone(),
                    process: ProcessRef {
                        kind: process_type.to_string(),
                    },
                },
                port,
            }],
        };
        let builder = authorized(self.http.post(url.clone()), token).json(&body);
        let response = send(builder, &method, &url).await?;
        expect_status(response, &method, &url, |s| s == StatusCode::OK)?;
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url, token: &str) -> Result<T> {
        let method = Method::GET;
        let builder = authorized(self.http.get(url.clone()), token);
        let response = send(builder, &method, &url).await?;
        decode_with_status(response, &method, &url, StatusCode::OK).await
    }

    async fn send_json<B, T>(
        &self,
        method: Method,
        url: Url,
        token: &str,
        body: &B,
        expected: StatusCode,
    ) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: serde::de::DeserializeOwned,
    {
        let builder = authorized(self.http.request(method.clone(), url.clone()), token).json(body);
        let response = send(builder, &method, &url).await?;
        decode_with_status(response, &method, &url, expected).await
    }

    async fn call_any_success<T: serde::de::DeserializeOwned>(
        &self,
        method: Method,
        url: Url,
        token: &str,
    ) -> Result<T> {
        let builder = authorized(self.http.request(method.clone(), url.clone()), token);
        let response = send(builder, &method, &url).await?;
        let response = expect_status(response, &method, &url, |s| s.is_success())?;
        decode(response, &method, &url).await
    }
}
