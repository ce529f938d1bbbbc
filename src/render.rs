//! Text renderings of reports for non-interactive output.

use itertools::Itertools;
use serde::Serialize;

use crate::{
    Res,
    error::Error,
    report::{BranchStatus, BranchSummary, SyncReport},
};

pub fn plain(report: &SyncReport) -> String {
    let mut lines = vec![
        format!("path={}", report.repo_path.display()),
        format!("branch={}", report.branch),
        format!("upstream={}", report.upstream),
        format!("status={}", report.status),
        format!("ahead={}", report.ahead),
        format!("behind={}", report.behind),
    ];

    if !report.flags.is_empty() {
        lines.push(format!("flags=[{}]", report.flags.iter().join(", ")));
    }
    if !report.actions.is_empty() {
        lines.push(format!("actions=[{}]", report.actions.iter().join(", ")));
    }
    if !report.error.is_empty() {
        lines.push(format!("error={}", report.error));
    }

    lines.join("\n")
}

/// With a scan, the report is nested next to its rows. A failed scan keeps the report and
/// carries the failure as `branch_error`.
pub fn json(report: &SyncReport, branches: Option<&Res<Vec<BranchStatus>>>) -> Res<String> {
    #[derive(Serialize)]
    struct WithBranches<'a> {
        report: &'a SyncReport,
        branches: &'a [BranchStatus],
        #[serde(skip_serializing_if = "Option::is_none")]
        branch_error: Option<String>,
    }

    match branches {
        Some(Ok(branches)) => serde_json::to_string_pretty(&WithBranches {
            report,
            branches,
            branch_error: None,
        }),
        Some(Err(e)) => serde_json::to_string_pretty(&WithBranches {
            report,
            branches: &[],
            branch_error: Some(e.to_string()),
        }),
        None => serde_json::to_string_pretty(report),
    }
    .map_err(Error::Json)
}

pub fn branch_list(branches: &[BranchSummary]) -> String {
    if branches.is_empty() {
        return "No local branches found.".to_string();
    }

    branches
        .iter()
        .map(|branch| format!("- {}", branch.name))
        .join("\n")
}

/// Columns are sized to their widest cell.
pub fn branch_table(rows: &[BranchStatus]) -> String {
    let header = ["BRANCH", "UPSTREAM", "STATUS", "A/B", "FLAGS"].map(String::from);
    let cells = rows.iter().map(branch_cells).collect::<Vec<_>>();

    let widths = cells.iter().fold(header.clone().map(|h| h.len()), |mut widths, row| {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
        widths
    });

    let format_row = |row: &[String; 5]| {
        row.iter()
            .zip(widths)
            .map(|(cell, width)| format!("{cell:<width$}"))
            .join("  ")
            .trim_end()
            .to_string()
    };

    let rule = "-".repeat(widths.iter().sum::<usize>() + 2 * (widths.len() - 1));

    [format_row(&header), rule]
        .into_iter()
        .chain(cells.iter().map(format_row))
        .join("\n")
}

pub(crate) fn branch_cells(row: &BranchStatus) -> [String; 5] {
    [
        row.branch.clone(),
        or_placeholder(&row.upstream, "-").to_string(),
        row.status.to_string(),
        format!("{}/{}", row.ahead, row.behind),
        if row.flags.is_empty() {
            "-".to_string()
        } else {
            row.flags.iter().join(",")
        },
    ]
}

pub(crate) fn or_placeholder<'a>(value: &'a str, placeholder: &'a str) -> &'a str {
    if value.trim().is_empty() {
        placeholder
    } else {
        value
    }
}
