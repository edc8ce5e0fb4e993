//! Reqwest-backed menu store adapter.
//!
//! This adapter owns transport details only: the `GET`/`PUT` exchange, HTTP
//! status mapping, and JSON decoding into the domain aggregate. It never
//! retries; the only timeout is the optional one on the reqwest client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use tracing::debug;

use crate::domain::MenuAggregate;
use crate::domain::ports::{MenuStore, MenuStoreError};

const DEFAULT_USER_AGENT: &str = concat!("menu-admin/", env!("CARGO_PKG_VERSION"));

/// Menu store that exchanges the whole aggregate with one HTTP endpoint.
#[derive(Debug, Clone)]
pub struct HttpMenuStore {
    client: Client,
    endpoint: Url,
}

impl HttpMenuStore {
    /// Build an adapter without a request timeout.
    /// ```rust,no_run
    /// use menu_admin::outbound::http::HttpMenuStore;
    ///
    /// let endpoint = "http://localhost:3000/menu".parse().expect("valid URL");
    /// let store = HttpMenuStore::new(endpoint);
    /// assert!(store.is_ok());
    /// ```
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, None)
    }

    /// Build an adapter whose requests fail after `timeout`, when given.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(endpoint: Url, timeout: Option<Duration>) -> Result<Self, reqwest::Error> {
        let mut builder = Client::builder().user_agent(DEFAULT_USER_AGENT);
        if let Some(limit) = timeout {
            builder = builder.timeout(limit);
        }
        Ok(Self {
            client: builder.build()?,
            endpoint,
        })
    }

    /// The menu resource URL.
    #[must_use]
    pub const fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl MenuStore for HttpMenuStore {
    async fn fetch_menu(&self) -> Result<MenuAggregate, MenuStoreError> {
        debug!(endpoint = %self.endpoint, "GET menu");
        let response = self
            .client
            .get(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }
        parse_menu(body.as_ref())
    }

    async fn replace_menu(&self, menu: &MenuAggregate) -> Result<(), MenuStoreError> {
        debug!(endpoint = %self.endpoint, "PUT menu");
        let response = self
            .client
            .put(self.endpoint.clone())
            .json(menu)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn parse_menu(body: &[u8]) -> Result<MenuAggregate, MenuStoreError> {
    serde_json::from_slice(body)
        .map_err(|error| MenuStoreError::decode(format!("invalid menu JSON payload: {error}")))
}

fn map_transport_error(error: reqwest::Error) -> MenuStoreError {
    MenuStoreError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> MenuStoreError {
    let preview = body_preview(body);
    if preview.is_empty() {
        MenuStoreError::transport(format!("status {}", status.as_u16()))
    } else {
        MenuStoreError::transport(format!("status {}: {preview}", status.as_u16()))
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network mapping helpers.

    use super::*;
    use crate::domain::Ingredient;
    use rstest::rstest;

    #[rstest]
    #[case::not_found(StatusCode::NOT_FOUND, b"".as_slice(), "menu store transport failed: status 404")]
    #[case::server_error(
        StatusCode::INTERNAL_SERVER_ERROR,
        b"{\n  \"error\": \"db down\"\n}".as_slice(),
        "menu store transport failed: status 500: { \"error\": \"db down\" }"
    )]
    #[case::unauthorised(StatusCode::UNAUTHORIZED, b"denied".as_slice(), "menu store transport failed: status 401: denied")]
    fn non_success_statuses_map_to_transport_errors(
        #[case] status: StatusCode,
        #[case] body: &[u8],
        #[case] expected: &str,
    ) {
        let error = map_status_error(status, body);
        assert!(error.is_transport());
        assert_eq!(error.to_string(), expected);
    }

    #[test]
    fn long_bodies_are_truncated_in_previews() {
        let body = "x".repeat(400);
        let preview = body_preview(body.as_bytes());

        assert_eq!(preview.chars().count(), 163);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn parses_menu_json_into_the_aggregate() {
        let body = br#"{ "ingredients": [{ "id": 1, "name": "Salt" }], "categories": [] }"#;

        let menu = parse_menu(body).expect("JSON should decode");
        assert_eq!(menu.ingredients, vec![Ingredient::new(1, "Salt")]);
    }

    #[rstest]
    #[case::not_json(b"<html>oops</html>".as_slice())]
    #[case::wrong_shape(br#"{ "ingredients": {} , "categories": [] }"#.as_slice())]
    #[case::missing_collection(br#"{ "ingredients": [] }"#.as_slice())]
    fn malformed_bodies_map_to_decode_errors(#[case] body: &[u8]) {
        let error = parse_menu(body).expect_err("decode should fail");
        assert!(
            matches!(error, MenuStoreError::Decode { .. }),
            "malformed bodies should map to Decode errors",
        );
    }
}
