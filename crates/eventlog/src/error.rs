// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Failures raised by the structured event log.
#[derive(Debug, thiserror::Error)]
pub enum EventLogError {
    #[error("io error on {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },
}
