// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("protocol violated: {0}")]
    ProtocolViolation(String),

    #[error("narration contained a forbidden phrase: {0:?}")]
    ForbiddenPhrase(String),
}
