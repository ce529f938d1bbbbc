use crate::{
    app::App,
    config::StyleConfig,
    render::{branch_cells, or_placeholder},
    report::SyncReport,
    status::Status,
};
use itertools::Itertools;
use ratatui::{
    Frame,
    prelude::*,
    widgets::{Block, Cell, Paragraph, Row, Table, Wrap},
};

const UNKNOWN: &str = "(unknown)";
const NONE: &str = "(none)";

/// Rows plus borders and header, clamped to what a layout can hold.
fn table_height(rows: usize) -> u16 {
    if rows == 0 {
        return 0;
    }

    u16::try_from(rows).unwrap_or(u16::MAX).saturating_add(3)
}

pub(crate) fn ui(frame: &mut Frame, app: &App) {
    let style = &app.config.style;
    let snapshot = &app.snapshot;

    let table_len = table_height(snapshot.branches.len());
    let error_len = u16::from(snapshot.branch_error.is_some());

    let [title_area, card_area, table_area, error_area, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Min(3),
        Constraint::Length(table_len),
        Constraint::Length(error_len),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let refreshed = snapshot
        .taken_at
        .map(|at| format!("  refreshed {}", at.format("%H:%M:%S")))
        .unwrap_or_default();

    frame.render_widget(
        Paragraph::new(vec![
            Line::styled("Git Sync Status", &style.title),
            Line::from(vec![
                Span::raw(app.path.display().to_string()),
                Span::styled(refreshed, &style.muted),
            ]),
        ]),
        title_area,
    );

    let card = match &snapshot.report {
        Some(report) => status_card(style, report),
        None => Text::styled("Loading repository status...", &style.muted),
    };
    frame.render_widget(
        Paragraph::new(card)
            .wrap(Wrap { trim: false })
            .block(Block::bordered().title(" Status ")),
        card_area,
    );

    if !snapshot.branches.is_empty() {
        frame.render_widget(branch_table(style, app), table_area);
    }

    if let Some(e) = &snapshot.branch_error {
        frame.render_widget(
            Line::styled(format!("Couldn't scan branches: {e}"), &style.error_msg),
            error_area,
        );
    }

    frame.render_widget(
        Line::from(vec![
            Span::styled("r", &style.hotkey),
            Span::raw(" refresh • "),
            Span::styled("q", &style.hotkey),
            Span::raw(" quit"),
        ]),
        footer_area,
    );
}

fn status_card<'a>(style: &StyleConfig, report: &'a SyncReport) -> Text<'a> {
    let header = |title: &'static str| Line::styled(title, &style.section_header);
    let field = |name: &'static str, value: &'a str| {
        Line::from(vec![
            Span::styled(format!("  {name}: "), &style.muted),
            Span::raw(or_placeholder(value, UNKNOWN)),
        ])
    };
    let bullets = |items: &'a [String]| -> Vec<Line<'a>> {
        if items.is_empty() {
            vec![Line::styled(format!("  {NONE}"), &style.muted)]
        } else {
            items
                .iter()
                .map(|item| Line::raw(format!("  - {item}")))
                .collect()
        }
    };

    let mut lines = vec![
        header("Repository"),
        field("Branch", &report.branch),
        field("Upstream", &report.upstream),
        Line::from(vec![
            Span::styled("  Status: ", &style.muted),
            Span::styled(report.status.to_string(), status_style(style, report.status)),
        ]),
        Line::raw(format!(
            "  Ahead: {}  Behind: {}",
            report.ahead, report.behind
        )),
        Line::from(vec![
            Span::styled("  Flags: ", &style.muted),
            Span::raw(if report.flags.is_empty() {
                NONE.to_string()
            } else {
                report.flags.iter().join(", ")
            }),
        ]),
        Line::default(),
        header("Suggested actions"),
    ];
    lines.extend(bullets(&report.actions));

    if !report.details.is_empty() {
        lines.push(Line::default());
        lines.push(header("Diagnostics"));
        lines.extend(bullets(&report.details));
    }

    if !report.error.is_empty() {
        lines.push(Line::default());
        lines.push(header("Last git error"));
        lines.extend(
            report
                .error
                .lines()
                .map(|line| Line::styled(format!("  {line}"), &style.error_msg)),
        );
    }

    Text::from(lines)
}

fn branch_table<'a>(style: &StyleConfig, app: &'a App) -> Table<'a> {
    let rows = app.snapshot.branches.iter().map(|row| {
        let [branch, upstream, status, counts, flags] = branch_cells(row);
        Row::new(vec![
            Cell::from(branch),
            Cell::from(upstream),
            Cell::from(status).style(status_style(style, row.status)),
            Cell::from(counts),
            Cell::from(flags),
        ])
    });

    Table::new(
        rows,
        [
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Length(14),
            Constraint::Length(9),
            Constraint::Fill(1),
        ],
    )
    .header(
        Row::new(["BRANCH", "UPSTREAM", "STATUS", "A/B", "FLAGS"]).style(&style.section_header),
    )
    .block(Block::bordered().title(" All Branches "))
}

fn status_style(style: &StyleConfig, status: Status) -> Style {
    match status {
        Status::Synced => &style.status_ok,
        Status::SyncPending | Status::Late | Status::NoUpstream => &style.status_warn,
        Status::Diverged | Status::NoRemote | Status::NotAGitRepo => &style.status_error,
    }
    .into()
}
