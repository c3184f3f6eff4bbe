// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! HTTP Digest access authentication (RFC 2617) as a transport decorator.

use std::collections::HashMap;
use std::fmt::{self, Write as _};
use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;
use md5::{Digest, Md5};
use reqwest::header::{AUTHORIZATION, HeaderValue, WWW_AUTHENTICATE};
use reqwest::{Request, Response, StatusCode};

use crate::error::CalDavError;

const SCHEME: &str = "Digest";
const QOP_AUTH: &str = "auth";

/// Something that can send a prepared HTTP request.
#[async_trait]
pub trait HttpTransport: Send + Sync + fmt::Debug {
    /// Sends the request and returns the response whatever its status.
    ///
    /// # Errors
    ///
    /// Returns an error if the request cannot be sent or, for decorators, cannot be authorized.
    async fn send(&self, request: Request) -> Result<Response, CalDavError>;
}

#[async_trait]
impl HttpTransport for reqwest::Client {
    async fn send(&self, request: Request) -> Result<Response, CalDavError> {
        Ok(self.execute(request).await?)
    }
}

/// A parsed `WWW-Authenticate: Digest` challenge.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DigestChallenge {
    /// Protection space.
    pub realm: String,
    /// Server nonce.
    pub nonce: String,
    /// Offered quality-of-protection values, comma separated.
    pub qop: Option<String>,
    /// Opaque value to echo back unchanged.
    pub opaque: Option<String>,
    /// Hash algorithm; `MD5` when absent.
    pub algorithm: Option<String>,
    /// Whether the previous nonce was rejected only for being stale.
    pub stale: bool,
    /// URIs sharing this protection space.
    pub domain: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Algorithm {
    Md5,
    Md5Sess,
}

impl DigestChallenge {
    /// Parses a `WWW-Authenticate` header value.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::UnsupportedAuth`] if the scheme is not `Digest`, and
    /// [`CalDavError::MalformedChallenge`] if `realm` or `nonce` is missing.
    pub fn parse(header: &str) -> Result<Self, CalDavError> {
        let params = strip_scheme(header).ok_or_else(|| {
            CalDavError::UnsupportedAuth(format!("not a Digest challenge: {header}"))
        })?;

        let mut challenge = Self::default();
        let (mut realm, mut nonce) = (None, None);
        for (key, value) in split_directives(params) {
            match key.as_str() {
                "realm" => realm = Some(value),
                "nonce" => nonce = Some(value),
                "qop" => challenge.qop = Some(value),
                "opaque" => challenge.opaque = Some(value),
                "algorithm" => challenge.algorithm = Some(value),
                "stale" => challenge.stale = value.eq_ignore_ascii_case("true"),
                "domain" => challenge.domain = Some(value),
                _ => {}
            }
        }

        challenge.realm =
            realm.ok_or_else(|| CalDavError::MalformedChallenge("missing realm".to_string()))?;
        challenge.nonce =
            nonce.ok_or_else(|| CalDavError::MalformedChallenge("missing nonce".to_string()))?;
        Ok(challenge)
    }

    /// Builds the `Authorization` header value answering this challenge.
    ///
    /// `uri` is the request path plus query; `nc` is the nonce count for this nonce.
    ///
    /// # Errors
    ///
    /// Returns [`CalDavError::UnsupportedAuth`] for algorithms other than `MD5`/`MD5-sess`,
    /// or when `auth` is not among the offered qop values.
    pub fn authorization(
        &self,
        username: &str,
        password: &str,
        method: &str,
        uri: &str,
        cnonce: &str,
        nc: u32,
    ) -> Result<String, CalDavError> {
        let algorithm = self.algorithm()?;
        let qop = self.select_qop()?;
        let nonce = &self.nonce;
        let nc = format!("{nc:08x}");

        let mut ha1 = md5_hex(&format!("{username}:{}:{password}", self.realm));
        if algorithm == Algorithm::Md5Sess {
            ha1 = md5_hex(&format!("{ha1}:{nonce}:{cnonce}"));
        }
        let ha2 = md5_hex(&format!("{method}:{uri}"));
        let response = match qop {
            Some(qop) => md5_hex(&format!("{ha1}:{nonce}:{nc}:{cnonce}:{qop}:{ha2}")),
            None => md5_hex(&format!("{ha1}:{nonce}:{ha2}")),
        };

        let mut header = format!(
            r#"{SCHEME} username="{username}", realm="{}", nonce="{nonce}", uri="{uri}""#,
            self.realm
        );
        if let Some(qop) = qop {
            let _ = write!(header, r#", cnonce="{cnonce}", nc={nc}, qop={qop}"#);
        }
        let _ = write!(header, r#", response="{response}""#);
        if let Some(opaque) = &self.opaque {
            let _ = write!(header, r#", opaque="{opaque}""#);
        }
        let _ = write!(
            header,
            ", algorithm={}",
            self.algorithm.as_deref().unwrap_or("MD5")
        );
        Ok(header)
    }

    fn algorithm(&self) -> Result<Algorithm, CalDavError> {
        match self.algorithm.as_deref() {
            None => Ok(Algorithm::Md5),
            Some(a) if a.eq_ignore_ascii_case("MD5") => Ok(Algorithm::Md5),
            Some(a) if a.eq_ignore_ascii_case("MD5-sess") => Ok(Algorithm::Md5Sess),
            Some(a) => Err(CalDavError::UnsupportedAuth(format!("algorithm {a}"))),
        }
    }

    fn select_qop(&self) -> Result<Option<&'static str>, CalDavError> {
        match self.qop.as_deref() {
            None => Ok(None),
            Some(offered) if offered.split(',').any(|q| q.trim() == QOP_AUTH) => Ok(Some(QOP_AUTH)),
            Some(offered) => Err(CalDavError::UnsupportedAuth(format!("qop {offered}"))),
        }
    }
}

/// Transport decorator answering Digest challenges with one authorized retry.
pub struct DigestAuthClient<T = reqwest::Client> {
    inner: T,
    username: String,
    password: String,
    nonce_counts: Mutex<HashMap<String, u32>>,
}

impl<T: HttpTransport> DigestAuthClient<T> {
    /// Wraps `inner` with the given credentials.
    pub fn new(inner: T, username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            inner,
            username: username.into(),
            password: password.into(),
            nonce_counts: Mutex::new(HashMap::new()),
        }
    }

    fn next_nonce_count(&self, nonce: &str) -> u32 {
        let mut counts = self
            .nonce_counts
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let count = counts.entry(nonce.to_string()).or_insert(0);
        *count += 1;
        *count
    }
}

impl<T: fmt::Debug> fmt::Debug for DigestAuthClient<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DigestAuthClient")
            .field("inner", &self.inner)
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl<T: HttpTransport> HttpTransport for DigestAuthClient<T> {
    async fn send(&self, request: Request) -> Result<Response, CalDavError> {
        let retry = request.try_clone();
        let response = self.inner.send(request).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        let header = response
            .headers()
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .find(|v| strip_scheme(v).is_some())
            .map(str::to_string)
            .ok_or_else(|| {
                CalDavError::UnsupportedAuth("server did not offer Digest authentication".into())
            })?;
        let challenge = DigestChallenge::parse(&header)?;

        let mut retry = retry.ok_or_else(|| {
            CalDavError::UnsupportedAuth("request body cannot be replayed".to_string())
        })?;
        let uri = match retry.url().query() {
            Some(query) => format!("{}?{query}", retry.url().path()),
            None => retry.url().path().to_string(),
        };
        let cnonce = uuid::Uuid::new_v4().simple().to_string();
        let nc = self.next_nonce_count(&challenge.nonce);
        let authorization = challenge.authorization(
            &self.username,
            &self.password,
            retry.method().as_str(),
            &uri,
            &cnonce,
            nc,
        )?;
        let value = HeaderValue::from_str(&authorization)
            .map_err(|e| CalDavError::Http(format!("Invalid Authorization header: {e}")))?;
        retry.headers_mut().insert(AUTHORIZATION, value);

        tracing::debug!(realm = %challenge.realm, nc, stale = challenge.stale, "retrying with Digest authorization");
        self.inner.send(retry).await
    }
}

fn md5_hex(input: &str) -> String {
    hex::encode(Md5::digest(input.as_bytes()))
}

/// Returns the directive list if `header` uses the Digest scheme.
fn strip_scheme(header: &str) -> Option<&str> {
    let (scheme, rest) = header.trim_start().split_once(char::is_whitespace)?;
    scheme.eq_ignore_ascii_case(SCHEME).then_some(rest)
}

/// Splits `key=value` directives on commas outside quotes, unquoting values.
fn split_directives(params: &str) -> Vec<(String, String)> {
    let mut directives = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    for ch in params.chars() {
        match ch {
            '"' => {
                in_quotes = !in_quotes;
                current.push(ch);
            }
            ',' if !in_quotes => {
                push_directive(&mut directives, &current);
                current.clear();
            }
            _ => current.push(ch),
        }
    }
    push_directive(&mut directives, &current);
    directives
}

fn push_directive(directives: &mut Vec<(String, String)>, raw: &str) {
    let Some((key, value)) = raw.trim().split_once('=') else {
        return;
    };
    let value = value.trim();
    let value = value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value);
    directives.push((key.trim().to_ascii_lowercase(), value.to_string()));
}
