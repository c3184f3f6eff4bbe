// SPDX-FileCopyrightText: 2025-2026 Zexin Yuan <aim@yzx9.xyz>
//
// SPDX-License-Identifier: Apache-2.0

//! calbridge - keep a CalDAV calendar and e-mail invitations in sync

use std::process::ExitCode;

use calbridge_cli::run;

#[tokio::main]
async fn main() -> ExitCode {
    run().await
}
