use std::{fs, path::Path, process::Command};

use temp_dir::TempDir;

/// A working copy and, for clones, the bare repository it tracks as `origin`.
pub struct RepoTestContext {
    pub dir: TempDir,
    pub remote_dir: TempDir,
}

impl RepoTestContext {
    pub fn setup_init() -> Self {
        let remote_dir = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();

        run(dir.path(), &["git", "init", "--initial-branch=main"]);
        set_config(dir.path());

        Self { dir, remote_dir }
    }

    pub fn setup_clone() -> Self {
        let remote_dir = TempDir::new().unwrap();
        let dir = TempDir::new().unwrap();

        run(
            remote_dir.path(),
            &["git", "init", "--bare", "--initial-branch=main"],
        );
        set_config(remote_dir.path());

        clone_and_commit(&remote_dir, "initial-file", "hello");
        run(
            dir.path(),
            &["git", "clone", remote_dir.path().to_str().unwrap(), "."],
        );
        set_config(dir.path());

        Self { dir, remote_dir }
    }

    pub fn repo(&self) -> git2::Repository {
        git2::Repository::open(self.dir.path()).unwrap()
    }

    /// Points HEAD straight at the commit it is on.
    pub fn detach_head(&self) {
        let repo = self.repo();
        let id = repo.head().unwrap().peel_to_commit().unwrap().id();
        repo.set_head_detached(id).unwrap();
    }
}

// https://git-scm.com/book/en/v2/Git-Internals-Environment-Variables
const ENV_VARS: [(&str, &str); 9] = [
    ("GIT_CONFIG_GLOBAL", "/dev/null"),
    ("GIT_CONFIG_SYSTEM", "/dev/null"),
    ("GIT_AUTHOR_NAME", "Author Name"),
    ("GIT_AUTHOR_EMAIL", "author@email.com"),
    ("GIT_AUTHOR_DATE", "Fri Feb 16 11:11 2024 +0100"),
    ("GIT_COMMITTER_NAME", "Committer Name"),
    ("GIT_COMMITTER_EMAIL", "committer@email.com"),
    ("GIT_COMMITTER_DATE", "Sun Feb 18 14:00 2024 +0100"),
    ("LC_ALL", "C"),
];

pub fn run(dir: &Path, cmd: &[&str]) -> String {
    String::from_utf8(
        Command::new(cmd[0])
            .args(&cmd[1..])
            .envs(ENV_VARS)
            .current_dir(dir)
            .output()
            .unwrap_or_else(|_| panic!("failed to execute {cmd:?}"))
            .stderr,
    )
    .unwrap()
}

fn set_config(path: &Path) {
    run(path, &["git", "config", "user.email", "ci@example.com"]);
    run(path, &["git", "config", "user.name", "CI"]);
}

pub fn clone_and_commit(remote_dir: &TempDir, file_name: &str, file_content: &str) {
    let other_dir = TempDir::new().unwrap();

    run(
        other_dir.path(),
        &["git", "clone", remote_dir.path().to_str().unwrap(), "."],
    );

    set_config(other_dir.path());

    commit(other_dir.path(), file_name, file_content);
    run(other_dir.path(), &["git", "push", "origin", "HEAD:main"]);
}

pub fn commit(dir: &Path, file_name: &str, contents: &str) {
    let path = dir.to_path_buf().join(file_name);
    let message = match path.try_exists() {
        Ok(true) => format!("modify {file_name}"),
        _ => format!("add {file_name}"),
    };
    fs::write(path, contents).expect("error writing to file");
    run(dir, &["git", "add", file_name]);
    run(dir, &["git", "commit", "-m", &message]);
}
