use std::{fmt::Display, path::PathBuf};

use serde::Serialize;

use crate::{
    git::AheadBehind,
    status::{Flag, Status},
};

/// Outcome of analysing one repository's current branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    pub repo_path: PathBuf,
    pub branch: String,
    pub upstream: String,
    pub status: Status,
    pub behind: u32,
    pub ahead: u32,
    pub flags: Vec<Flag>,
    /// First entry is the primary recommendation.
    pub actions: Vec<String>,
    pub details: Vec<String>,
    /// Text of the last underlying git failure, empty if none.
    pub error: String,
    pub no_upstream_was_merged: bool,
    pub no_upstream_merge_base: String,
    pub no_upstream_suggestion: String,
}

impl SyncReport {
    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchSummary {
    pub name: String,
}

/// One row of a batch scan over the local branches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchStatus {
    pub branch: String,
    pub upstream: String,
    pub status: Status,
    pub behind: u32,
    pub ahead: u32,
    pub flags: Vec<Flag>,
}

impl BranchStatus {
    pub(crate) fn unresolved(branch: &str) -> Self {
        Self {
            branch: branch.to_string(),
            upstream: String::new(),
            status: Status::NoUpstream,
            behind: 0,
            ahead: 0,
            flags: vec![],
        }
    }
}

/// A [`SyncReport`] under construction.
///
/// Owned by a single analysis and moved from stage to stage. Only [`ReportDraft::finish`]
/// produces a report, which fixes its status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ReportDraft {
    repo_path: PathBuf,
    branch: String,
    upstream: String,
    counts: AheadBehind,
    flags: Vec<Flag>,
    actions: Vec<String>,
    details: Vec<String>,
    error: String,
    merged_into: Option<(String, String)>,
}

impl ReportDraft {
    pub fn new(repo_path: impl Into<PathBuf>) -> Self {
        Self {
            repo_path: repo_path.into(),
            branch: String::new(),
            upstream: String::new(),
            counts: AheadBehind::default(),
            flags: vec![],
            actions: vec![],
            details: vec![],
            error: String::new(),
            merged_into: None,
        }
    }

    pub fn branch_name(&self) -> &str {
        &self.branch
    }

    pub fn upstream_name(&self) -> &str {
        &self.upstream
    }

    pub fn counts(&self) -> AheadBehind {
        self.counts
    }

    pub fn has_flag(&self, flag: Flag) -> bool {
        self.flags.contains(&flag)
    }

    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }

    pub fn with_upstream(mut self, upstream: impl Into<String>) -> Self {
        self.upstream = upstream.into();
        self
    }

    pub fn with_counts(mut self, counts: AheadBehind) -> Self {
        self.counts = counts;
        self
    }

    pub fn flag(mut self, flag: Flag) -> Self {
        if !self.flags.contains(&flag) {
            self.flags.push(flag);
        }
        self
    }

    pub fn detail(mut self, detail: impl Into<String>) -> Self {
        self.details.push(detail.into());
        self
    }

    pub fn action(mut self, action: impl Into<String>) -> Self {
        self.actions.push(action.into());
        self
    }

    pub fn error(mut self, error: &impl Display) -> Self {
        self.error = error.to_string();
        self
    }

    /// Records that the branch already landed in `base`. The suggestion also becomes an action.
    pub fn merged_into(mut self, base: impl Into<String>, suggestion: impl Into<String>) -> Self {
        let suggestion = suggestion.into();
        self.actions.push(suggestion.clone());
        self.merged_into = Some((base.into(), suggestion));
        self
    }

    pub fn finish(self, status: Status) -> SyncReport {
        let (no_upstream_was_merged, no_upstream_merge_base, no_upstream_suggestion) =
            match self.merged_into {
                Some((base, suggestion)) => (true, base, suggestion),
                None => (false, String::new(), String::new()),
            };

        SyncReport {
            repo_path: self.repo_path,
            branch: self.branch,
            upstream: self.upstream,
            status,
            behind: self.counts.behind,
            ahead: self.counts.ahead,
            flags: self.flags,
            actions: self.actions,
            details: self.details,
            error: self.error,
            no_upstream_was_merged,
            no_upstream_merge_base,
            no_upstream_suggestion,
        }
    }
}
