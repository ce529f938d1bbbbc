use std::path::Path;

use super::Analyzer;
use crate::{
    Res,
    cancel::Cancel,
    report::{BranchStatus, BranchSummary},
    status::{Flag, classify},
};

impl Analyzer {
    pub fn scan_local_branches(&self, path: &Path, cancel: &Cancel) -> Res<Vec<BranchSummary>> {
        Ok(self
            .signals
            .local_branches(path, cancel)?
            .into_iter()
            .map(|name| BranchSummary { name })
            .collect())
    }

    /// One row per local branch, in listing order.
    ///
    /// Only a failure to list the branches is returned as an error. A branch whose own
    /// lookups fail still gets a row.
    pub fn analyze_all_branches(&self, path: &Path, cancel: &Cancel) -> Res<Vec<BranchStatus>> {
        let branches = self.signals.local_branches(path, cancel)?;
        log::debug!("Scanning {} local branches in {path:?}", branches.len());

        Ok(branches
            .iter()
            .map(|branch| self.analyze_branch(path, branch, cancel))
            .collect())
    }

    fn analyze_branch(&self, path: &Path, branch: &str, cancel: &Cancel) -> BranchStatus {
        let row = BranchStatus::unresolved(branch);

        let upstream = match self.signals.branch_upstream(path, branch, cancel) {
            Ok(upstream) => upstream,
            Err(e) => {
                log::debug!("'{branch}' has no usable upstream: {e}");
                return row;
            }
        };

        match self.signals.ahead_behind(path, &upstream, branch, cancel) {
            Ok(counts) => BranchStatus {
                upstream,
                status: classify(counts.behind, counts.ahead),
                behind: counts.behind,
                ahead: counts.ahead,
                ..row
            },
            Err(e) => {
                log::debug!("Couldn't count '{upstream}...{branch}': {e}");
                BranchStatus {
                    upstream,
                    flags: vec![Flag::RemoteUnreachable],
                    ..row
                }
            }
        }
    }
}
