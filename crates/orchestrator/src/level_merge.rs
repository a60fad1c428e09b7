// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The level-merge hook (spec §4.1 step 4, §9 open question: "the source
//! alludes to a merge commit per level via an external git collaborator,
//! but the contract ... is not captured in the core; an implementer must
//! treat level-merge as a pluggable post-level hook with a success/failure
//! result that feeds back into level close").

use async_trait::async_trait;

/// Integrates one closed level's artifacts into the feature's accumulated
/// state. The default implementation is a no-op success; a real deployment
/// supplies a collaborator that, for example, merges each task's branch
/// into the feature branch.
#[async_trait]
pub trait LevelMergeHook: Send + Sync {
    async fn merge_level(&self, feature: &str, level: u32) -> Result<(), LevelMergeError>;
}

#[derive(Debug, thiserror::Error)]
#[error("level merge failed for feature {feature:?} level {level}: {reason}")]
pub struct LevelMergeError {
    pub feature: String,
    pub level: u32,
    pub reason: String,
}

/// No-op merge hook, used when no level-merge collaborator is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopLevelMergeHook;

#[async_trait]
impl LevelMergeHook for NoopLevelMergeHook {
    async fn merge_level(&self, _feature: &str, _level: u32) -> Result<(), LevelMergeError> {
        Ok(())
    }
}
