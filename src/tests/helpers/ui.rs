use std::{path::PathBuf, sync::Arc};

use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use itertools::Itertools;
use ratatui::{Terminal, backend::TestBackend, layout::Size};

use super::FakeSignals;
use crate::{
    analyzer::Analyzer,
    app::App,
    config::{self, Config},
    error::Error,
    term::{Term, TermBackend},
};

pub struct TestContext {
    pub term: Term,
    pub signals: Arc<FakeSignals>,
    config: Arc<Config>,
}

impl TestContext {
    pub fn setup(signals: FakeSignals) -> Self {
        let size = Size::new(80, 30);
        let term = Terminal::new(TermBackend::Test {
            backend: TestBackend::new(size.width, size.height),
            events: vec![],
        })
        .unwrap();

        Self {
            term,
            signals: Arc::new(signals),
            config: Arc::new(config::init_test_config().unwrap()),
        }
    }

    pub fn config(&mut self) -> &mut Config {
        Arc::get_mut(&mut self.config).unwrap()
    }

    pub fn init_app(&mut self) -> App {
        let analyzer = Analyzer::new(self.signals.clone(), "origin");
        let mut app = App::create(analyzer, PathBuf::from("/repo"), Arc::clone(&self.config));

        app.redraw_now(&mut self.term).unwrap();
        app
    }

    pub fn update(&mut self, app: &mut App, new_events: Vec<Event>) {
        let TermBackend::Test { events, .. } = self.term.backend_mut() else {
            unreachable!();
        };

        events.extend(new_events.into_iter().rev());

        let result = app.run(&mut self.term);
        assert!(app.quit || matches!(result, Err(Error::NoMoreEvents)));
    }

    /// The screen as text, one line per row with trailing blanks removed.
    pub fn buffer_text(&self) -> String {
        let TermBackend::Test { backend, .. } = self.term.backend() else {
            unreachable!();
        };

        let buffer = backend.buffer();
        buffer
            .content
            .chunks(buffer.area.width as usize)
            .map(|row| row.iter().map(|cell| cell.symbol()).join("").trim_end().to_string())
            .join("\n")
    }
}

pub fn keys(input: &str) -> Vec<Event> {
    input
        .chars()
        .map(|c| Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)))
        .collect()
}

pub fn ctrl(c: char) -> Event {
    Event::Key(KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL))
}
