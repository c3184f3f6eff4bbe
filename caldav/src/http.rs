// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP client wrapper with authentication and status mapping.

use std::sync::Arc;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};

use crate::config::{AuthMethod, CalDavConfig};
use crate::digest::{DigestAuthClient, HttpTransport};
use crate::error::CalDavError;
use crate::types::Href;

/// HTTP client for `CalDAV` operations.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
    transport: Arc<dyn HttpTransport>,
}

impl HttpClient {
    /// Creates a new HTTP client, wrapping the transport for the configured authentication.
    ///
    /// # Errors
    ///
    /// Returns an error if HTTP client creation fails.
    pub fn new(config: &CalDavConfig) -> Result<Self, CalDavError> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .user_agent(&config.user_agent)
            .build()?;

        let transport: Arc<dyn HttpTransport> = match &config.auth {
            AuthMethod::None => Arc::new(client.clone()),
            AuthMethod::Digest { username, password } => Arc::new(DigestAuthClient::new(
                client.clone(),
                username.as_str(),
                password.as_str(),
            )),
        };
        Ok(Self { client, transport })
    }

    /// Starts a request; authentication is added by the transport on demand.
    pub fn build_request(&self, method: Method, url: &str) -> RequestBuilder {
        self.client.request(method, url)
    }

    /// Executes a request and checks for HTTP errors.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or returns an error status code.
    pub async fn execute(&self, req: RequestBuilder) -> Result<Response, CalDavError> {
        let request = req.build()?;
        let path = request.url().path().to_string();
        let resp = self.transport.send(request).await?;

        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }

        match status {
            StatusCode::NOT_FOUND => Err(CalDavError::NotFound(Href::new(path))),
            StatusCode::PRECONDITION_FAILED => Err(CalDavError::PreconditionFailed(
                resp.headers()
                    .get("ETag")
                    .and_then(|v| v.to_str().ok())
                    .unwrap_or("unknown")
                    .to_string(),
            )),
            StatusCode::UNAUTHORIZED => Err(CalDavError::Auth(format!("{status} for {path}"))),
            status => {
                let text = resp
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read response".to_string());
                Err(CalDavError::Http(format!("{status}: {text}")))
            }
        }
    }
}
