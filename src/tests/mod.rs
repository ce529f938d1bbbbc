//! Tests that span the analyzer and its surroundings.
//! - `analyze` and `branches` drive the analyzer with a scripted signal source
//! - `shell` sets up real repositories in temporary directories and runs git against them
//! - `dashboard` renders into a test terminal
//!
//! When debugging a git-backed case it helps to keep the directory around.
//! ```rust`
//! dbg!(&ctx.dir.path());
//! ctx.dir.leak();
//! ````

mod helpers;
