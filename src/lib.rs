pub mod analyzer;
mod app;
pub mod cancel;
pub mod cli;
pub mod config;
pub mod error;
pub mod git;
pub mod render;
pub mod report;
pub mod status;
pub mod term;
#[cfg(test)]
mod tests;
mod ui;

use std::sync::Arc;

use analyzer::Analyzer;
use app::App;
use cancel::Cancel;
use cli::{Args, Mode};
use error::Error;
use git::shell::ShellSignals;
use ratatui::Terminal;

pub const APP_NAME: &str = "gitsync";

pub type Res<T> = Result<T, Error>;

pub fn run(args: &Args) -> Res<()> {
    log::debug!("Initializing config");
    let config = Arc::new(config::init_config(args.config.clone())?);

    let signals = ShellSignals::new(
        config.general.git_program.clone(),
        config.general.command_timeout(),
    );
    let remote = args
        .remote
        .clone()
        .unwrap_or_else(|| config.general.remote.clone());
    let analyzer = Analyzer::new(Arc::new(signals), remote);

    match args.mode() {
        Mode::Dashboard => {
            log::debug!("Starting dashboard");
            let mut term = Terminal::new(term::backend()).map_err(Error::Term)?;
            term.backend_mut().setup_term().map_err(Error::Term)?;

            let mut app = App::create(analyzer, args.path.clone(), config);
            let result = app.run(&mut term);

            term.backend_mut().reset_term().map_err(Error::Term)?;
            result
        }
        _ => {
            println!("{}", output(args, &analyzer, &Cancel::new())?);
            Ok(())
        }
    }
}

/// The text printed by the non-interactive modes.
fn output(args: &Args, analyzer: &Analyzer, cancel: &Cancel) -> Res<String> {
    let path = args.path.as_path();

    match args.mode() {
        Mode::ListBranches => Ok(render::branch_list(
            &analyzer.scan_local_branches(path, cancel)?,
        )),
        Mode::Json => {
            let report = analyzer.analyze(path, cancel);
            let branches = args
                .all_branches
                .then(|| analyzer.analyze_all_branches(path, cancel));
            render::json(&report, branches.as_ref())
        }
        Mode::Plain | Mode::Dashboard => {
            let report = render::plain(&analyzer.analyze(path, cancel));
            if !args.all_branches {
                return Ok(report);
            }

            let table = match analyzer.analyze_all_branches(path, cancel) {
                Ok(rows) => render::branch_table(&rows),
                Err(e) => {
                    log::warn!("Couldn't scan branches: {e}");
                    format!("Couldn't scan branches: {e}")
                }
            };
            Ok(format!("{report}\n\n{table}"))
        }
    }
}
