use std::{fmt::Display, io, num::ParseIntError};

#[derive(Debug)]
pub enum Error {
    SpawnCmd(io::Error),
    CouldntAwaitCmd(io::Error),
    CouldntReadCmdOutput(io::Error),
    CmdBadExit(String, Option<i32>, String),
    CmdTimedOut(String),
    Cancelled(String),
    AheadBehindTokenCount(String),
    AheadBehindCount(&'static str, String, ParseIntError),
    DefaultBranchUnknown,
    Config(Box<figment::Error>),
    OpenLogFile(io::Error),
    Term(io::Error),
    Json(serde_json::Error),
    NoMoreEvents,
}

impl std::error::Error for Error {}

impl Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::SpawnCmd(e) => f.write_fmt(format_args!("Failed to spawn command: {e}")),
            Error::CouldntAwaitCmd(e) => f.write_fmt(format_args!("Couldn't await command: {e}")),
            Error::CouldntReadCmdOutput(e) => {
                f.write_fmt(format_args!("Couldn't read command output: {e}"))
            }
            Error::CmdBadExit(args, code, out) => {
                f.write_fmt(format_args!(
                    "'{}' exited with code: {}",
                    args,
                    code.map(|c| c.to_string())
                        .unwrap_or_else(|| "".to_string())
                ))?;
                if !out.is_empty() {
                    f.write_fmt(format_args!(": {out}"))?;
                }
                Ok(())
            }
            Error::CmdTimedOut(args) => f.write_fmt(format_args!("'{args}' timed out")),
            Error::Cancelled(args) => f.write_fmt(format_args!("'{args}' was cancelled")),
            Error::AheadBehindTokenCount(out) => {
                f.write_fmt(format_args!("invalid ahead/behind output {out:?}"))
            }
            Error::AheadBehindCount(side, token, e) => {
                f.write_fmt(format_args!("invalid {side} count {token:?}: {e}"))
            }
            Error::DefaultBranchUnknown => f.write_str("could not determine default branch"),
            Error::Config(e) => f.write_fmt(format_args!("Configuration error: {e}")),
            Error::OpenLogFile(e) => f.write_fmt(format_args!("Couldn't open log file: {e}")),
            Error::Term(e) => f.write_fmt(format_args!("Terminal error: {e}")),
            Error::Json(e) => f.write_fmt(format_args!("Couldn't encode JSON: {e}")),
            Error::NoMoreEvents => f.write_str("No more events"),
        }
    }
}
