mod fake;
mod repo;
mod ui;

use std::{path::Path, sync::Arc};

pub use fake::{FakeSignals, Upstream};
pub use repo::{RepoTestContext, clone_and_commit, commit, run};
pub use ui::{TestContext, ctrl, keys};

use crate::{analyzer::Analyzer, cancel::Cancel, git::shell::ShellSignals, report::SyncReport};

/// Analyzes with a scripted signal source, handing it back for call inspection.
pub fn analyze_fake(signals: FakeSignals) -> (SyncReport, Arc<FakeSignals>) {
    let signals = Arc::new(signals);
    let analyzer = Analyzer::new(signals.clone(), "origin");
    (analyzer.analyze(Path::new("/repo"), &Cancel::new()), signals)
}

pub fn shell_analyzer() -> Analyzer {
    Analyzer::new(Arc::new(ShellSignals::default()), "origin")
}
