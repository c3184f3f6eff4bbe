// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! `CalDAV` client for listing, storing and removing events on a `CalDAV` calendar
//! (RFC 4791), with HTTP Digest authentication (RFC 2617).

#![warn(
    trivial_casts,
    trivial_numeric_casts,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unsafe_code,
    unstable_features,
    unused_import_braces,
    unused_qualifications,
    clippy::dbg_macro,
    clippy::indexing_slicing,
    clippy::pedantic
)]
// Allow certain clippy lints that are too restrictive for this crate
#![allow(
    clippy::similar_names,
    clippy::single_match_else,
    clippy::too_many_arguments
)]

mod client;
mod config;
mod digest;
mod error;
mod http;
mod request;
mod response;
mod types;
mod xml;

pub use crate::client::CalDavClient;
pub use crate::config::{AuthMethod, CalDavConfig};
pub use crate::digest::{DigestAuthClient, DigestChallenge, HttpTransport};
pub use crate::error::CalDavError;
pub use crate::request::{CalendarQueryRequest, TimeRange};
pub use crate::response::{MultiStatusResponse, PropStat, ResponseItem};
pub use crate::types::{CalendarResource, ETag, Href};
