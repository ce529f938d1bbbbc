use std::{
    path::PathBuf,
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Local};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::{
    Res,
    analyzer::Analyzer,
    cancel::Cancel,
    config::Config,
    error::Error,
    report::{BranchStatus, SyncReport},
    term::Term,
    ui,
};

/// How long to wait for input when nothing is scheduled.
const IDLE_POLL: Duration = Duration::from_secs(1);

/// What the dashboard currently shows.
#[derive(Debug, Default)]
pub(crate) struct Snapshot {
    pub report: Option<SyncReport>,
    pub branches: Vec<BranchStatus>,
    pub branch_error: Option<String>,
    pub taken_at: Option<DateTime<Local>>,
}

pub(crate) struct App {
    analyzer: Analyzer,
    pub path: PathBuf,
    pub config: Arc<Config>,
    pub snapshot: Snapshot,
    pub quit: bool,
    last_refresh: Option<Instant>,
}

impl App {
    pub fn create(analyzer: Analyzer, path: PathBuf, config: Arc<Config>) -> Self {
        Self {
            analyzer,
            path,
            config,
            snapshot: Snapshot::default(),
            quit: false,
            last_refresh: None,
        }
    }

    /// Re-runs both analyses. Blocks until git has answered.
    pub fn refresh(&mut self) {
        log::debug!("Refreshing {:?}", self.path);
        let cancel = Cancel::new();

        let report = self.analyzer.analyze(&self.path, &cancel);
        let (branches, branch_error) = match self.analyzer.analyze_all_branches(&self.path, &cancel)
        {
            Ok(rows) => (rows, None),
            Err(e) => {
                log::warn!("Couldn't scan branches: {e}");
                (vec![], Some(e.to_string()))
            }
        };

        self.snapshot = Snapshot {
            report: Some(report),
            branches,
            branch_error,
            taken_at: Some(Local::now()),
        };
        self.last_refresh = Some(Instant::now());
    }

    pub fn redraw_now(&mut self, term: &mut Term) -> Res<()> {
        term.draw(|frame| ui::ui(frame, self)).map_err(Error::Term)?;
        Ok(())
    }

    pub fn run(&mut self, term: &mut Term) -> Res<()> {
        self.redraw_now(term)?;
        if self.snapshot.report.is_none() {
            self.refresh();
            self.redraw_now(term)?;
        }

        while !self.quit {
            if term.backend().poll_event(self.next_poll())? {
                let event = term.backend_mut().read_event()?;
                self.handle_event(event);
            } else if self.refresh_due() {
                self.refresh();
            }

            self.redraw_now(term)?;
        }

        Ok(())
    }

    fn next_poll(&self) -> Duration {
        match (self.config.general.refresh_interval(), self.last_refresh) {
            (Some(interval), Some(last)) => interval.saturating_sub(last.elapsed()),
            _ => IDLE_POLL,
        }
    }

    pub fn refresh_due(&self) -> bool {
        match (self.config.general.refresh_interval(), self.last_refresh) {
            (Some(interval), Some(last)) => last.elapsed() >= interval,
            (Some(_), None) => true,
            (None, _) => false,
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        let Event::Key(KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            ..
        }) = event
        else {
            return;
        };

        match (modifiers, code) {
            (KeyModifiers::NONE, KeyCode::Char('q') | KeyCode::Esc)
            | (KeyModifiers::CONTROL, KeyCode::Char('c')) => self.quit = true,
            (KeyModifiers::NONE, KeyCode::Char('r')) => self.refresh(),
            _ => (),
        }
    }
}
