use std::path::PathBuf;

use clap::Parser;

#[derive(Default, Debug, Parser)]
#[command(name = crate::APP_NAME)]
#[command(about = "Shows how a git working copy diverges from its remote")]
pub struct Args {
    /// Repository path to inspect
    #[clap(long, default_value = ".")]
    pub path: PathBuf,
    /// Remote to compare against (overrides the config file)
    #[clap(long)]
    pub remote: Option<String>,
    /// Print plain text status and exit
    #[clap(long, action, conflicts_with = "json")]
    pub plain: bool,
    /// Print JSON status and exit
    #[clap(long, action)]
    pub json: bool,
    /// With --plain or --json, also report every local branch
    #[clap(long, action)]
    pub all_branches: bool,
    /// List local branches and exit
    #[clap(long, action, conflicts_with_all = ["plain", "json"])]
    pub list_branches: bool,
    /// Config file to use instead of the default location
    #[clap(long)]
    pub config: Option<PathBuf>,
    /// Enable logging to 'gitsync.log'
    #[clap(long, action)]
    pub log: bool,

    #[clap(long, action)]
    /// Print version
    pub version: bool,
}

impl Args {
    pub fn mode(&self) -> Mode {
        if self.list_branches {
            Mode::ListBranches
        } else if self.json {
            Mode::Json
        } else if self.plain {
            Mode::Plain
        } else {
            Mode::Dashboard
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Dashboard,
    Plain,
    Json,
    ListBranches,
}
