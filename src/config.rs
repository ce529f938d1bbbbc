use std::{path::PathBuf, time::Duration};

use etcetera::{BaseStrategy, choose_base_strategy};
use figment::{
    Figment,
    providers::{Format, Toml},
};
use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

use crate::{APP_NAME, Res, error::Error};

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub general: GeneralConfig,
    pub style: StyleConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeneralConfig {
    pub remote: String,
    pub git_program: String,
    pub command_timeout_ms: u64,
    pub refresh_interval_secs: u64,
}

impl GeneralConfig {
    pub fn command_timeout(&self) -> Option<Duration> {
        (self.command_timeout_ms > 0).then(|| Duration::from_millis(self.command_timeout_ms))
    }

    pub fn refresh_interval(&self) -> Option<Duration> {
        (self.refresh_interval_secs > 0).then(|| Duration::from_secs(self.refresh_interval_secs))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct StyleConfig {
    #[serde(default)]
    pub title: StyleConfigEntry,
    #[serde(default)]
    pub muted: StyleConfigEntry,
    #[serde(default)]
    pub section_header: StyleConfigEntry,
    #[serde(default)]
    pub status_ok: StyleConfigEntry,
    #[serde(default)]
    pub status_warn: StyleConfigEntry,
    #[serde(default)]
    pub status_error: StyleConfigEntry,
    #[serde(default)]
    pub error_msg: StyleConfigEntry,
    #[serde(default)]
    pub hotkey: StyleConfigEntry,
}

#[derive(Default, Debug, Clone, Deserialize)]
pub struct StyleConfigEntry {
    #[serde(default)]
    fg: Option<Color>,
    #[serde(default)]
    bg: Option<Color>,
    #[serde(default)]
    mods: Option<Modifier>,
}

impl From<&StyleConfigEntry> for Style {
    fn from(val: &StyleConfigEntry) -> Self {
        Style {
            fg: val.fg,
            bg: val.bg,
            underline_color: None,
            add_modifier: val.mods.unwrap_or(Modifier::empty()),
            sub_modifier: Modifier::empty(),
        }
    }
}

/// Bundled defaults, overlaid with the user's file when there is one.
pub fn init_config(path: Option<PathBuf>) -> Res<Config> {
    let mut figment = Figment::new().merge(Toml::string(DEFAULT_CONFIG));

    match path.or_else(config_path) {
        Some(path) if path.exists() => {
            log::debug!("Loading config file at {path:?}");
            figment = figment.merge(Toml::file(path));
        }
        Some(path) => log::debug!("No config file at {path:?}, using defaults"),
        None => log::warn!("Couldn't locate a config directory, using defaults"),
    }

    figment
        .extract()
        .map_err(|e| Error::Config(Box::new(e)))
}

fn config_path() -> Option<PathBuf> {
    choose_base_strategy()
        .inspect_err(|e| log::warn!("Couldn't find home directory: {e}"))
        .ok()
        .map(|strategy| strategy.config_dir().join(APP_NAME).join("config.toml"))
}

#[cfg(test)]
pub(crate) fn init_test_config() -> Res<Config> {
    Figment::new()
        .merge(Toml::string(DEFAULT_CONFIG))
        .extract()
        .map_err(|e| Error::Config(Box::new(e)))
}
