use std::{fmt::Display, path::Path};

use serde::Serialize;

use crate::{Res, cancel::Cancel, error::Error};

pub mod parse;
pub mod shell;

/// Commit counts between an upstream (left) and a local ref (right).
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AheadBehind {
    pub behind: u32,
    pub ahead: u32,
}

/// Why an upstream could not be resolved.
#[derive(Debug)]
pub enum UpstreamError {
    /// The branch has no upstream configured. Carries git's message.
    NotConfigured(String),
    Failed(Error),
}

impl std::error::Error for UpstreamError {}

impl Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UpstreamError::NotConfigured(msg) => f.write_str(msg),
            UpstreamError::Failed(e) => e.fmt(f),
        }
    }
}

/// Best-effort facts about a repository and its remote.
///
/// Each call is issued at most once per analysis and must give up promptly once `cancel`
/// fires, reporting that as an ordinary failure.
pub trait Signals: Send + Sync {
    fn is_repository(&self, path: &Path, cancel: &Cancel) -> Res<bool>;
    fn current_branch(&self, path: &Path, cancel: &Cancel) -> Res<String>;
    fn is_detached_head(&self, path: &Path, cancel: &Cancel) -> Res<bool>;
    fn has_remote(&self, path: &Path, remote: &str, cancel: &Cancel) -> Res<bool>;
    fn is_remote_reachable(&self, path: &Path, remote: &str, cancel: &Cancel) -> Res<bool>;

    /// Upstream of whatever HEAD points at.
    fn upstream(&self, path: &Path, cancel: &Cancel) -> Result<String, UpstreamError>;
    fn branch_upstream(
        &self,
        path: &Path,
        branch: &str,
        cancel: &Cancel,
    ) -> Result<String, UpstreamError>;

    /// Refreshes remote-tracking refs, dropping stale ones. The only mutating call.
    fn fetch_prune(&self, path: &Path, remote: &str, cancel: &Cancel) -> Res<()>;
    fn ahead_behind(
        &self,
        path: &Path,
        left: &str,
        right: &str,
        cancel: &Cancel,
    ) -> Res<AheadBehind>;
    fn is_worktree_dirty(&self, path: &Path, cancel: &Cancel) -> Res<bool>;
    fn default_branch(&self, path: &Path, remote: &str, cancel: &Cancel) -> Res<String>;
    fn is_branch_merged_into(
        &self,
        path: &Path,
        branch: &str,
        base: &str,
        cancel: &Cancel,
    ) -> Res<bool>;
    fn local_branches(&self, path: &Path, cancel: &Cancel) -> Res<Vec<String>>;
}
