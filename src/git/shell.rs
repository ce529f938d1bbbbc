use std::{
    borrow::Cow,
    io::{self, Read},
    iter,
    path::Path,
    process::{Child, Command, Stdio},
    thread::{self, JoinHandle},
    time::{Duration, Instant},
};

use itertools::Itertools;

use super::{AheadBehind, Signals, UpstreamError, parse::parse_ahead_behind};
use crate::{Res, cancel::Cancel, error::Error};

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Reads repository state by running the `git` executable.
#[derive(Debug, Clone)]
pub struct ShellSignals {
    program: String,
    timeout: Option<Duration>,
}

impl Default for ShellSignals {
    fn default() -> Self {
        Self::new("git", None)
    }
}

impl ShellSignals {
    pub fn new(program: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            program: program.into(),
            timeout,
        }
    }

    /// Runs git in `dir` and returns its trimmed stdout.
    ///
    /// A failed exit carries stdout and stderr combined, so callers can look at git's message.
    fn git(&self, dir: &Path, args: &[&str], cancel: &Cancel) -> Res<String> {
        let mut cmd = Command::new(&self.program);
        cmd.args(args)
            .current_dir(dir)
            // Diagnostics are matched as English text further down
            .env("LC_ALL", "C")
            .env("GIT_TERMINAL_PROMPT", "0")
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let args = command_args(&cmd);
        if cancel.is_cancelled() {
            return Err(Error::Cancelled(args.into_owned()));
        }

        log::debug!("Running '{args}' in {dir:?}");
        let mut child = cmd.spawn().map_err(Error::SpawnCmd)?;
        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let started = Instant::now();
        let status = loop {
            if let Some(status) = child.try_wait().map_err(Error::CouldntAwaitCmd)? {
                break status;
            }

            if cancel.is_cancelled() {
                log::debug!("Cancelling '{args}'");
                kill(&mut child);
                return Err(Error::Cancelled(args.into_owned()));
            }

            if self.timeout.is_some_and(|timeout| started.elapsed() >= timeout) {
                log::warn!("'{args}' timed out after {:?}", started.elapsed());
                kill(&mut child);
                return Err(Error::CmdTimedOut(args.into_owned()));
            }

            thread::sleep(POLL_INTERVAL);
        };

        let stdout = collect(stdout)?;
        let stderr = collect(stderr)?;
        log::debug!("'{args}' finished with {status:?}");

        if !status.success() {
            let stdout = strip_ansi(&stdout);
            let stderr = strip_ansi(&stderr);
            let out = [stdout.trim(), stderr.trim()]
                .into_iter()
                .filter(|s| !s.is_empty())
                .join("\n");
            return Err(Error::CmdBadExit(args.into_owned(), status.code(), out));
        }

        Ok(stdout.trim().to_string())
    }

    fn upstream_of(&self, dir: &Path, rev: &str, cancel: &Cancel) -> Result<String, UpstreamError> {
        match self.git(
            dir,
            &["rev-parse", "--abbrev-ref", "--symbolic-full-name", rev],
            cancel,
        ) {
            Ok(upstream) => Ok(upstream),
            Err(e @ Error::CmdBadExit(..)) if is_no_upstream_message(&e.to_string()) => {
                Err(UpstreamError::NotConfigured(e.to_string()))
            }
            Err(e) => Err(UpstreamError::Failed(e)),
        }
    }
}

impl Signals for ShellSignals {
    fn is_repository(&self, path: &Path, cancel: &Cancel) -> Res<bool> {
        match self.git(path, &["rev-parse", "--is-inside-work-tree"], cancel) {
            Ok(out) => Ok(out == "true"),
            Err(Error::CmdBadExit(..)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    fn current_branch(&self, path: &Path, cancel: &Cancel) -> Res<String> {
        self.git(path, &["branch", "--show-current"], cancel)
    }

    fn is_detached_head(&self, path: &Path, cancel: &Cancel) -> Res<bool> {
        succeeded(self.git(path, &["symbolic-ref", "--quiet", "--short", "HEAD"], cancel))
            .map(|on_branch| !on_branch)
    }

    fn has_remote(&self, path: &Path, remote: &str, cancel: &Cancel) -> Res<bool> {
        let out = self.git(path, &["remote"], cancel)?;
        Ok(out.lines().any(|line| line.trim() == remote))
    }

    fn is_remote_reachable(&self, path: &Path, remote: &str, cancel: &Cancel) -> Res<bool> {
        succeeded(self.git(path, &["ls-remote", "--heads", remote], cancel))
    }

    fn upstream(&self, path: &Path, cancel: &Cancel) -> Result<String, UpstreamError> {
        self.upstream_of(path, "@{u}", cancel)
    }

    fn branch_upstream(
        &self,
        path: &Path,
        branch: &str,
        cancel: &Cancel,
    ) -> Result<String, UpstreamError> {
        self.upstream_of(path, &format!("{branch}@{{upstream}}"), cancel)
    }

    fn fetch_prune(&self, path: &Path, remote: &str, cancel: &Cancel) -> Res<()> {
        self.git(path, &["fetch", "--prune", remote], cancel)
            .map(|_| ())
    }

    fn ahead_behind(
        &self,
        path: &Path,
        left: &str,
        right: &str,
        cancel: &Cancel,
    ) -> Res<AheadBehind> {
        let range = format!("{left}...{right}");
        let out = self.git(path, &["rev-list", "--left-right", "--count", &range], cancel)?;
        parse_ahead_behind(&out)
    }

    fn is_worktree_dirty(&self, path: &Path, cancel: &Cancel) -> Res<bool> {
        Ok(!self.git(path, &["status", "--porcelain"], cancel)?.is_empty())
    }

    fn default_branch(&self, path: &Path, remote: &str, cancel: &Cancel) -> Res<String> {
        let remote_head = format!("refs/remotes/{remote}/HEAD");
        match self.git(path, &["symbolic-ref", "--short", &remote_head], cancel) {
            Ok(out) => {
                let prefix = format!("{remote}/");
                return Ok(out.strip_prefix(&prefix).unwrap_or(&out).to_string());
            }
            Err(Error::CmdBadExit(..)) => (),
            Err(e) => return Err(e),
        }

        for candidate in ["main", "master"] {
            if succeeded(self.git(path, &["rev-parse", "--verify", "--quiet", candidate], cancel))? {
                return Ok(candidate.to_string());
            }
        }

        Err(Error::DefaultBranchUnknown)
    }

    fn is_branch_merged_into(
        &self,
        path: &Path,
        branch: &str,
        base: &str,
        cancel: &Cancel,
    ) -> Res<bool> {
        let out = self.git(
            path,
            &["branch", "--format=%(refname:short)", "--merged", base],
            cancel,
        )?;
        Ok(out.lines().any(|line| line.trim() == branch))
    }

    fn local_branches(&self, path: &Path, cancel: &Cancel) -> Res<Vec<String>> {
        let out = self.git(
            path,
            &["for-each-ref", "--format=%(refname:short)", "refs/heads"],
            cancel,
        )?;

        Ok(out
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(String::from)
            .collect())
    }
}

/// git words a missing upstream differently across versions, and only in English. Commands run
/// with `LC_ALL=C`, but a git that rewords these messages will surface as a plain failure.
fn is_no_upstream_message(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    msg.contains("no upstream")
        || msg.contains("has no upstream branch")
        || msg.contains("not configured for branch")
}

/// A clean exit means yes, a failed exit means no. Anything else is an error.
fn succeeded(result: Res<String>) -> Res<bool> {
    match result {
        Ok(_) => Ok(true),
        Err(Error::CmdBadExit(..)) => Ok(false),
        Err(e) => Err(e),
    }
}

pub(crate) fn command_args(cmd: &Command) -> Cow<'static, str> {
    iter::once(cmd.get_program().to_string_lossy())
        .chain(cmd.get_args().map(|arg| arg.to_string_lossy()))
        .join(" ")
        .into()
}

fn drain(pipe: Option<impl Read + Send + 'static>) -> JoinHandle<io::Result<Vec<u8>>> {
    thread::spawn(move || {
        let mut bytes = vec![];
        if let Some(mut pipe) = pipe {
            pipe.read_to_end(&mut bytes)?;
        }
        Ok(bytes)
    })
}

fn collect(handle: JoinHandle<io::Result<Vec<u8>>>) -> Res<String> {
    let bytes = handle
        .join()
        .map_err(|_| Error::CouldntReadCmdOutput(io::Error::other("output reader panicked")))?
        .map_err(Error::CouldntReadCmdOutput)?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Only for messages shown to people. Parsed output keeps its tabs.
fn strip_ansi(text: &str) -> String {
    strip_ansi_escapes::strip_str(text)
}

fn kill(child: &mut Child) {
    if let Err(e) = child.kill() {
        log::warn!("Couldn't kill git: {e}");
    }
    if let Err(e) = child.wait() {
        log::warn!("Couldn't reap git: {e}");
    }
}
