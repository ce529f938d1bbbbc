use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Terminal outcome of one analysis.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    NotAGitRepo,
    NoRemote,
    NoUpstream,
    Synced,
    SyncPending,
    Late,
    Diverged,
}

/// Non-fatal condition noticed while analysing. Appears at most once per report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, IntoStaticStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum Flag {
    DetachedHead,
    RemoteUnreachable,
    WorktreeDirty,
}

/// Compares an upstream with its local branch. Both sides moved wins over either one alone.
pub fn classify(behind: u32, ahead: u32) -> Status {
    match (behind, ahead) {
        (1.., 1..) => Status::Diverged,
        (1.., 0) => Status::Late,
        (0, 1..) => Status::SyncPending,
        (0, 0) => Status::Synced,
    }
}
