// ABOUTME: Cursor-following traversal of paginated listing endpoints.
// ABOUTME: One generic page walker, with per-resource decode functions passed in.

use reqwest::Method;
use serde::de::DeserializeOwned;
use snafu::ResultExt;
use url::Url;

use super::error::{ApiError, DecodeSnafu, Result, TransportSnafu};
use super::models::{AppResource, Href, OrgResource, ResourcePage, SpaceResource};
use super::transport::{authorized, expect_status, send};

/// Items of one page plus the cursor to the next, if any.
pub type PageContents<T> = (Vec<T>, Option<Href>);

/// Fetch every page starting at `first`, following `pagination.next` until
/// it is null. Pages are requested strictly one after another and their
/// items concatenated in server order.
///
/// # Errors
///
/// Any page failing (status, transport, or decode) fails the whole walk; no
/// partial list is returned.
pub async fn walk_pages<T, F>(
    http: &reqwest::Client,
    first: Url,
    token: &str,
    mut extract: F,
) -> Result<Vec<T>>
where
    F: FnMut(&Url, &str) -> Result<PageContents<T>>,
{
    let method = Method::GET;
    let mut items = Vec::new();
    let mut next = Some(first);
    let mut pages = 0usize;

    while let Some(page_url) = next.take() {
        let builder = authorized(http.get(page_url.clone()), token);
        let response = send(builder, &method, &page_url).await?;
        let response = expect_status(response, &method, &page_url, |s| s.is_success())?;
        let body = response.text().await.context(TransportSnafu {
            method: method.clone(),
            uri: page_url.as_str(),
        })?;

        let (mut page_items, cursor) = extract(&page_url, &body)?;
        pages += 1;
        tracing::debug!(url = %page_url, count = page_items.len(), "fetched page");
        items.append(&mut page_items);

        next = match cursor {
            Some(href) => Some(resolve_cursor(&page_url, &href)?),
            None => None,
        };
    }

    tracing::debug!(pages, total = items.len(), "pagination complete");
    Ok(items)
}

/// Cursors are normally absolute; relative ones resolve against the page
/// that returned them.
fn resolve_cursor(current: &Url, href: &Href) -> Result<Url> {
    current.join(&href.href).map_err(|e| ApiError::InvalidTarget {
        target: href.href.clone(),
        reason: e.to_string(),
    })
}

fn decode_page<R: DeserializeOwned>(url: &Url, body: &str) -> Result<PageContents<R>> {
    let page: ResourcePage<R> =
        serde_json::from_str(body).context(DecodeSnafu { uri: url.as_str() })?;
    Ok((page.resources, page.pagination.next))
}

/// Decode an organizations page.
pub fn org_page(url: &Url, body: &str) -> Result<PageContents<OrgResource>> {
    decode_page(url, body)
}

/// Decode a spaces page.
pub fn space_page(url: &Url, body: &str) -> Result<PageContents<SpaceResource>> {
    decode_page(url, body)
}

/// Decode an apps page.
pub fn app_page(url: &Url, body: &str) -> Result<PageContents<AppResource>> {
    decode_page(url, body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;

    fn url() -> Url {
        Url::parse("https://api.example.com/v3/apps").unwrap()
    }

    #[test]
    fn app_page_extracts_items_and_cursor() {
        let body = r#"{
            "pagination": { "next": { "href": "https://api.example.com/v3/apps?page=2" } },
            "resources": [
                { "guid": "a-1", "name": "one", "state": "STARTED" },
                { "guid": "a-2", "name": "two", "state": "STOPPED" }
            ]
        }"#;

        let (apps, next) = app_page(&url(), body).unwrap();
        assert_eq!(apps.len(), 2);
        assert_eq!(apps[1].name, "two");
        assert_eq!(
            next.unwrap().href,
            "https://api.example.com/v3/apps?page=2"
        );
    }

    #[test]
    fn malformed_page_is_a_decode_error() {
        let err = org_page(&url(), "{ not json").unwrap_err();
        assert_eq!(err.kind(), ApiErrorKind::Decode);
    }

    #[test]
    fn relative_cursor_resolves_against_current_page() {
        let href = Href {
            href: "/v3/apps?page=3".to_string(),
        };
        let resolved = resolve_cursor(&url(), &href).unwrap();
        assert_eq!(resolved.as_str(), "https://api.example.com/v3/apps?page=3");
    }
}
