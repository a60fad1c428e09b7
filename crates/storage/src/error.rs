// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

/// Failures raised by the checkpointed state store.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("io error on {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("run record for feature {feature:?} is corrupt: {source}")]
    Corrupt { feature: String, #[source] source: serde_json::Error },

    #[error("feature name {0:?} is not a valid path component")]
    InvalidFeatureName(String),
}

/// Failures raised by the advisory feature lock.
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("io error on lock file {path}: {source}")]
    Io { path: String, #[source] source: std::io::Error },

    #[error("feature {feature:?} is locked by pid {holder_pid} (age {age_secs}s)")]
    Held { feature: String, holder_pid: u32, age_secs: u64 },
}
