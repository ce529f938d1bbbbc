use std::{ops::ControlFlow, path::Path, sync::Arc};

use crate::{
    cancel::Cancel,
    git::{Signals, UpstreamError},
    report::{ReportDraft, SyncReport},
    status::{Flag, Status, classify},
};

mod branches;

pub const DEFAULT_REMOTE: &str = "origin";
pub const DETACHED_PLACEHOLDER: &str = "(detached)";
const FALLBACK_BASE: &str = "main";

const INIT_ACTION: &str = "Initialize repository with: git init";
const REVIEW_WORKTREE_ACTION: &str = "Review local changes: git status";

/// Turns repository signals into a [`SyncReport`] for the branch HEAD is on.
///
/// Holds nothing but the remote name, so analyses of different repositories may run in
/// parallel. Two analyses of the same repository race on the remote refresh.
#[derive(Clone)]
pub struct Analyzer {
    signals: Arc<dyn Signals>,
    remote: String,
}

impl std::fmt::Debug for Analyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Analyzer")
            .field("remote", &self.remote)
            .finish_non_exhaustive()
    }
}

impl Analyzer {
    pub fn new(signals: Arc<dyn Signals>, remote: impl Into<String>) -> Self {
        let remote = remote.into();
        Self {
            signals,
            remote: if remote.trim().is_empty() {
                DEFAULT_REMOTE.to_string()
            } else {
                remote
            },
        }
    }

    pub fn remote(&self) -> &str {
        &self.remote
    }

    /// Never fails: every problem along the way ends up inside the report.
    pub fn analyze(&self, path: &Path, cancel: &Cancel) -> SyncReport {
        log::debug!("Analyzing {path:?} against '{}'", self.remote);

        let stages = Stages {
            signals: self.signals.as_ref(),
            remote: &self.remote,
            path,
            cancel,
        };

        let (ControlFlow::Break(report) | ControlFlow::Continue(report)) = stages.run();

        log::info!(
            "{path:?}: {} (behind {}, ahead {}, flags {:?})",
            report.status,
            report.behind,
            report.ahead,
            report.flags
        );
        report
    }
}

/// One analysis. Each stage either hands the draft on or breaks with a finished report.
struct Stages<'a> {
    signals: &'a dyn Signals,
    remote: &'a str,
    path: &'a Path,
    cancel: &'a Cancel,
}

impl Stages<'_> {
    fn run(&self) -> ControlFlow<SyncReport, SyncReport> {
        let draft = self.check_repository(ReportDraft::new(self.path))?;
        let draft = self.resolve_head(draft);
        let draft = self.require_remote(draft)?;
        let draft = self.probe_remote(draft);
        let draft = self.resolve_upstream(draft)?;
        let draft = self.refresh_counts(draft);
        ControlFlow::Continue(self.conclude(draft))
    }

    fn check_repository(&self, draft: ReportDraft) -> ControlFlow<SyncReport, ReportDraft> {
        let draft = match self.signals.is_repository(self.path, self.cancel) {
            Ok(true) => return ControlFlow::Continue(draft),
            Ok(false) => draft,
            Err(e) => draft.error(&e),
        };

        ControlFlow::Break(draft.action(INIT_ACTION).finish(Status::NotAGitRepo))
    }

    fn resolve_head(&self, draft: ReportDraft) -> ReportDraft {
        let detached = self
            .signals
            .is_detached_head(self.path, self.cancel)
            .unwrap_or_else(|e| {
                log::debug!("Couldn't tell if HEAD is detached: {e}");
                false
            });

        let draft = if detached {
            draft.flag(Flag::DetachedHead).detail("HEAD is detached")
        } else {
            draft
        };

        let branch = self
            .signals
            .current_branch(self.path, self.cancel)
            .unwrap_or_else(|e| {
                log::debug!("Couldn't resolve current branch: {e}");
                String::new()
            });

        if branch.is_empty() && detached {
            draft.with_branch(DETACHED_PLACEHOLDER)
        } else {
            draft.with_branch(branch)
        }
    }

    fn require_remote(&self, draft: ReportDraft) -> ControlFlow<SyncReport, ReportDraft> {
        let draft = match self.signals.has_remote(self.path, self.remote, self.cancel) {
            Ok(true) => return ControlFlow::Continue(draft),
            Ok(false) => draft,
            Err(e) => draft.error(&e),
        };

        let draft = draft.action(format!("Add remote: git remote add {} <url>", self.remote));
        ControlFlow::Break(self.inspect_worktree(draft).finish(Status::NoRemote))
    }

    fn probe_remote(&self, draft: ReportDraft) -> ReportDraft {
        match self
            .signals
            .is_remote_reachable(self.path, self.remote, self.cancel)
        {
            Ok(true) => draft,
            Ok(false) => self.unreachable(draft),
            Err(e) => {
                log::debug!("Reachability check failed: {e}");
                self.unreachable(draft)
            }
        }
    }

    fn unreachable(&self, draft: ReportDraft) -> ReportDraft {
        draft
            .flag(Flag::RemoteUnreachable)
            .detail(format!("Remote {:?} is unreachable", self.remote))
    }

    fn resolve_upstream(&self, draft: ReportDraft) -> ControlFlow<SyncReport, ReportDraft> {
        let err = match self.signals.upstream(self.path, self.cancel) {
            Ok(upstream) => return ControlFlow::Continue(draft.with_upstream(upstream)),
            Err(err) => err,
        };

        log::debug!("No usable upstream: {err}");
        let draft = match err {
            UpstreamError::NotConfigured(_) => draft,
            UpstreamError::Failed(ref e) => draft.error(e),
        };

        let target = push_target(draft.branch_name()).to_string();
        let draft = draft.action(format!("Set upstream: git push -u {} {target}", self.remote));
        let draft = self.hint_merged(draft);
        ControlFlow::Break(self.inspect_worktree(draft).finish(Status::NoUpstream))
    }

    /// Counts may be stale when the fetch fails, they are still computed.
    fn refresh_counts(&self, draft: ReportDraft) -> ReportDraft {
        let draft = match self.signals.fetch_prune(self.path, self.remote, self.cancel) {
            Ok(()) => draft,
            Err(e) => {
                log::warn!("Fetch from '{}' failed: {e}", self.remote);
                draft
                    .flag(Flag::RemoteUnreachable)
                    .detail("Fetch failed; ahead/behind may be stale")
            }
        };

        let upstream = draft.upstream_name().to_string();
        match self
            .signals
            .ahead_behind(self.path, &upstream, "HEAD", self.cancel)
        {
            Ok(counts) => draft.with_counts(counts),
            Err(e) => draft.error(&e).detail("Could not compute ahead/behind"),
        }
    }

    fn conclude(&self, draft: ReportDraft) -> SyncReport {
        let counts = draft.counts();
        let status = classify(counts.behind, counts.ahead);

        let draft = sync_actions(status)
            .iter()
            .fold(draft, |draft, action| draft.action(*action));

        let draft = self.inspect_worktree(draft);
        let draft = if draft.has_flag(Flag::WorktreeDirty) {
            draft.action(REVIEW_WORKTREE_ACTION)
        } else {
            draft
        };

        draft.finish(status)
    }

    fn hint_merged(&self, draft: ReportDraft) -> ReportDraft {
        let branch = push_target(draft.branch_name()).to_string();
        let base = match self
            .signals
            .default_branch(self.path, self.remote, self.cancel)
        {
            Ok(base) if !base.is_empty() => base,
            Ok(_) => FALLBACK_BASE.to_string(),
            Err(e) => {
                log::debug!("Falling back to '{FALLBACK_BASE}' as base branch: {e}");
                FALLBACK_BASE.to_string()
            }
        };

        match self
            .signals
            .is_branch_merged_into(self.path, &branch, &base, self.cancel)
        {
            Ok(false) => draft,
            Ok(true) => {
                let suggestion = format!(
                    "Branch {branch:?} appears merged into {base:?}; consider deleting it locally: git branch -d {branch}"
                );
                draft.merged_into(base, suggestion)
            }
            Err(e) => draft.detail(format!("Merged-branch check failed: {e}")),
        }
    }

    fn inspect_worktree(&self, draft: ReportDraft) -> ReportDraft {
        match self.signals.is_worktree_dirty(self.path, self.cancel) {
            Ok(false) => draft,
            Ok(true) => draft
                .flag(Flag::WorktreeDirty)
                .detail("Working tree has staged, unstaged, or untracked changes"),
            Err(e) => draft.detail(format!("Could not inspect worktree: {e}")),
        }
    }
}

fn sync_actions(status: Status) -> &'static [&'static str] {
    match status {
        Status::Diverged => &[
            "Review incoming changes: git pull --rebase",
            "Resolve conflicts if needed, then push",
        ],
        Status::Late => &["Update branch: git pull --rebase"],
        Status::SyncPending => &["Push local commits: git push"],
        Status::Synced => &["No sync action required"],
        Status::NotAGitRepo | Status::NoRemote | Status::NoUpstream => &[],
    }
}

/// What to name when suggesting a push: the branch, or `HEAD` when there is none.
fn push_target(branch: &str) -> &str {
    if branch.trim().is_empty() || branch == DETACHED_PLACEHOLDER {
        "HEAD"
    } else {
        branch
    }
}
