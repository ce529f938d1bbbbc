use std::{collections::HashMap, path::Path, sync::Mutex};

use crate::{
    Res,
    cancel::Cancel,
    error::Error,
    git::{AheadBehind, Signals, UpstreamError},
};

/// What an upstream lookup should answer with.
#[derive(Debug, Clone)]
pub enum Upstream {
    Set(String),
    Missing,
    Broken(String),
}

/// A scripted signal source. Failures are given as git's message and surface as a bad exit.
///
/// Every call is logged by name, so tests can check which stages ran.
#[derive(Debug)]
pub struct FakeSignals {
    pub repository: Result<bool, String>,
    pub branch: Result<String, String>,
    pub detached: Result<bool, String>,
    pub remote: Result<bool, String>,
    pub reachable: Result<bool, String>,
    pub upstream: Upstream,
    pub fetch: Result<(), String>,
    pub counts: Result<AheadBehind, String>,
    pub dirty: Result<bool, String>,
    pub default_branch: Result<String, String>,
    pub merged: Result<bool, String>,
    pub branches: Result<Vec<String>, String>,
    pub branch_upstreams: HashMap<String, Upstream>,
    pub branch_counts: HashMap<String, Result<AheadBehind, String>>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl FakeSignals {
    /// A clean checkout of `main` tracking `origin/main`, level with it.
    pub fn healthy() -> Self {
        Self {
            repository: Ok(true),
            branch: Ok("main".into()),
            detached: Ok(false),
            remote: Ok(true),
            reachable: Ok(true),
            upstream: Upstream::Set("origin/main".into()),
            fetch: Ok(()),
            counts: Ok(AheadBehind::default()),
            dirty: Ok(false),
            default_branch: Ok("main".into()),
            merged: Ok(false),
            branches: Ok(vec!["main".into()]),
            branch_upstreams: HashMap::new(),
            branch_counts: HashMap::new(),
            calls: Mutex::new(vec![]),
        }
    }

    /// Every call fails.
    pub fn broken() -> Self {
        fn fail<T>() -> Result<T, String> {
            Err("fatal: boom".to_string())
        }

        Self {
            repository: fail(),
            branch: fail(),
            detached: fail(),
            remote: fail(),
            reachable: fail(),
            upstream: Upstream::Broken("fatal: boom".into()),
            fetch: fail(),
            counts: fail(),
            dirty: fail(),
            default_branch: fail(),
            merged: fail(),
            branches: fail(),
            branch_upstreams: HashMap::new(),
            branch_counts: HashMap::new(),
            calls: Mutex::new(vec![]),
        }
    }

    pub fn counts(self, behind: u32, ahead: u32) -> Self {
        Self {
            counts: Ok(AheadBehind { behind, ahead }),
            ..self
        }
    }

    pub fn with_branch(
        mut self,
        name: &str,
        upstream: Upstream,
        counts: Result<AheadBehind, String>,
    ) -> Self {
        self.branch_upstreams.insert(name.to_string(), upstream);
        self.branch_counts.insert(name.to_string(), counts);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, name: &str) -> usize {
        self.calls().iter().filter(|call| *call == name).count()
    }

    fn answer<T: Clone>(&self, call: &str, cancel: &Cancel, value: &Result<T, String>) -> Res<T> {
        self.calls.lock().unwrap().push(call.to_string());

        if cancel.is_cancelled() {
            return Err(Error::Cancelled(call.to_string()));
        }

        value
            .clone()
            .map_err(|msg| Error::CmdBadExit(call.to_string(), Some(128), msg))
    }

    fn answer_upstream(
        &self,
        call: &str,
        cancel: &Cancel,
        upstream: Option<&Upstream>,
    ) -> Result<String, UpstreamError> {
        self.calls.lock().unwrap().push(call.to_string());

        if cancel.is_cancelled() {
            return Err(UpstreamError::Failed(Error::Cancelled(call.to_string())));
        }

        match upstream.unwrap_or(&Upstream::Missing) {
            Upstream::Set(name) => Ok(name.clone()),
            Upstream::Missing => Err(UpstreamError::NotConfigured(
                "fatal: no upstream configured for branch".into(),
            )),
            Upstream::Broken(msg) => Err(UpstreamError::Failed(Error::CmdBadExit(
                call.to_string(),
                Some(128),
                msg.clone(),
            ))),
        }
    }
}

impl Signals for FakeSignals {
    fn is_repository(&self, _path: &Path, cancel: &Cancel) -> Res<bool> {
        self.answer("is_repository", cancel, &self.repository)
    }

    fn current_branch(&self, _path: &Path, cancel: &Cancel) -> Res<String> {
        self.answer("current_branch", cancel, &self.branch)
    }

    fn is_detached_head(&self, _path: &Path, cancel: &Cancel) -> Res<bool> {
        self.answer("is_detached_head", cancel, &self.detached)
    }

    fn has_remote(&self, _path: &Path, _remote: &str, cancel: &Cancel) -> Res<bool> {
        self.answer("has_remote", cancel, &self.remote)
    }

    fn is_remote_reachable(&self, _path: &Path, _remote: &str, cancel: &Cancel) -> Res<bool> {
        self.answer("is_remote_reachable", cancel, &self.reachable)
    }

    fn upstream(&self, _path: &Path, cancel: &Cancel) -> Result<String, UpstreamError> {
        self.answer_upstream("upstream", cancel, Some(&self.upstream))
    }

    fn branch_upstream(
        &self,
        _path: &Path,
        branch: &str,
        cancel: &Cancel,
    ) -> Result<String, UpstreamError> {
        self.answer_upstream("branch_upstream", cancel, self.branch_upstreams.get(branch))
    }

    fn fetch_prune(&self, _path: &Path, _remote: &str, cancel: &Cancel) -> Res<()> {
        self.answer("fetch_prune", cancel, &self.fetch)
    }

    fn ahead_behind(
        &self,
        _path: &Path,
        _left: &str,
        right: &str,
        cancel: &Cancel,
    ) -> Res<AheadBehind> {
        match self.branch_counts.get(right) {
            Some(counts) => self.answer("ahead_behind", cancel, counts),
            None => self.answer("ahead_behind", cancel, &self.counts),
        }
    }

    fn is_worktree_dirty(&self, _path: &Path, cancel: &Cancel) -> Res<bool> {
        self.answer("is_worktree_dirty", cancel, &self.dirty)
    }

    fn default_branch(&self, _path: &Path, _remote: &str, cancel: &Cancel) -> Res<String> {
        self.answer("default_branch", cancel, &self.default_branch)
    }

    fn is_branch_merged_into(
        &self,
        _path: &Path,
        _branch: &str,
        _base: &str,
        cancel: &Cancel,
    ) -> Res<bool> {
        self.answer("is_branch_merged_into", cancel, &self.merged)
    }

    fn local_branches(&self, _path: &Path, cancel: &Cancel) -> Res<Vec<String>> {
        self.answer("local_branches", cancel, &self.branches)
    }
}
