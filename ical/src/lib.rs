// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! Read, edit and write iCalendar objects carrying events and their attendees.

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
#![allow(clippy::similar_names, clippy::single_match_else)]

mod event;
pub mod formatter;
pub mod keyword;
mod parser;
pub mod syntax;
pub mod value;

pub use crate::event::{CalendarEvent, EventError, Participant};
pub use crate::parser::{ParseError, parse};
pub use crate::syntax::{Component, Parameter, Property};
pub use crate::value::ValueError;
