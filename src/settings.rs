//! Typed view over the key/value settings table.
//!
//! Values are stored as strings and seeded once per key on startup;
//! `AppSettings::load` parses them into a typed structure, falling back to the
//! seeded defaults for missing or unparseable values. A missing key is absent,
//! not null-valued, so every consumer carries a fallback.

use std::str::FromStr;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::db::Store;
use crate::timer::PomodoroConfig;

pub mod keys {
    pub const DAILY_TARGET: &str = "daily_target";
    pub const GOAL_NOTIFICATION: &str = "goal_notification";
    pub const START_REMINDER: &str = "start_reminder";
    pub const HAPTIC_FEEDBACK: &str = "haptic_feedback";
    pub const EXCLUDE_WEEKENDS: &str = "exclude_weekends";
    pub const POMODORO_WORK_DURATION: &str = "pomodoro_work_duration";
    pub const POMODORO_SHORT_BREAK: &str = "pomodoro_short_break";
    pub const POMODORO_LONG_BREAK: &str = "pomodoro_long_break";
    pub const POMODORO_SESSIONS_UNTIL_LONG_BREAK: &str = "pomodoro_sessions_until_long_break";
    pub const POMODORO_AUTO_START_BREAKS: &str = "pomodoro_auto_start_breaks";
    pub const POMODORO_AUTO_START_WORK: &str = "pomodoro_auto_start_work";
    /// Export webhook endpoint. No seeded default: absent means export is not
    /// configured.
    pub const SCRIPT_URL: &str = "script_url";
}

/// Default daily target: 8 hours in seconds.
pub const DEFAULT_DAILY_TARGET: i64 = 28_800;

/// Seeded on first run, one row per key. Existing values are never
/// overwritten.
pub const DEFAULTS: &[(&str, &str)] = &[
    (keys::DAILY_TARGET, "28800"),
    (keys::GOAL_NOTIFICATION, "true"),
    (keys::START_REMINDER, "false"),
    (keys::HAPTIC_FEEDBACK, "true"),
    (keys::EXCLUDE_WEEKENDS, "false"),
    (keys::POMODORO_WORK_DURATION, "1500"),
    (keys::POMODORO_SHORT_BREAK, "300"),
    (keys::POMODORO_LONG_BREAK, "900"),
    (keys::POMODORO_SESSIONS_UNTIL_LONG_BREAK, "4"),
    (keys::POMODORO_AUTO_START_BREAKS, "false"),
    (keys::POMODORO_AUTO_START_WORK, "false"),
];

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    pub daily_target: i64,
    pub goal_notification: bool,
    pub start_reminder: bool,
    pub haptic_feedback: bool,
    pub exclude_weekends: bool,
    pub script_url: Option<String>,
    pub pomodoro: PomodoroConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            daily_target: DEFAULT_DAILY_TARGET,
            goal_notification: true,
            start_reminder: false,
            haptic_feedback: true,
            exclude_weekends: false,
            script_url: None,
            pomodoro: PomodoroConfig::default(),
        }
    }
}

impl AppSettings {
    /// Parses the settings table once into a typed structure.
    pub async fn load(store: &Store) -> Result<Self> {
        let defaults = Self::default();
        let pomodoro_defaults = defaults.pomodoro.clone();

        Ok(Self {
            daily_target: parse_or(
                store.get_setting(keys::DAILY_TARGET).await?,
                defaults.daily_target,
            ),
            goal_notification: parse_bool_or(
                store.get_setting(keys::GOAL_NOTIFICATION).await?,
                defaults.goal_notification,
            ),
            start_reminder: parse_bool_or(
                store.get_setting(keys::START_REMINDER).await?,
                defaults.start_reminder,
            ),
            haptic_feedback: parse_bool_or(
                store.get_setting(keys::HAPTIC_FEEDBACK).await?,
                defaults.haptic_feedback,
            ),
            exclude_weekends: parse_bool_or(
                store.get_setting(keys::EXCLUDE_WEEKENDS).await?,
                defaults.exclude_weekends,
            ),
            script_url: store
                .get_setting(keys::SCRIPT_URL)
                .await?
                .filter(|url| !url.trim().is_empty()),
            pomodoro: PomodoroConfig {
                work_duration: parse_or(
                    store.get_setting(keys::POMODORO_WORK_DURATION).await?,
                    pomodoro_defaults.work_duration,
                ),
                short_break: parse_or(
                    store.get_setting(keys::POMODORO_SHORT_BREAK).await?,
                    pomodoro_defaults.short_break,
                ),
                long_break: parse_or(
                    store.get_setting(keys::POMODORO_LONG_BREAK).await?,
                    pomodoro_defaults.long_break,
                ),
                sessions_until_long_break: parse_or(
                    store
                        .get_setting(keys::POMODORO_SESSIONS_UNTIL_LONG_BREAK)
                        .await?,
                    pomodoro_defaults.sessions_until_long_break,
                ),
                auto_start_breaks: parse_bool_or(
                    store.get_setting(keys::POMODORO_AUTO_START_BREAKS).await?,
                    pomodoro_defaults.auto_start_breaks,
                ),
                auto_start_work: parse_bool_or(
                    store.get_setting(keys::POMODORO_AUTO_START_WORK).await?,
                    pomodoro_defaults.auto_start_work,
                ),
            },
        })
    }
}

fn parse_or<T: FromStr>(value: Option<String>, default: T) -> T {
    value
        .and_then(|raw| raw.trim().parse().ok())
        .unwrap_or(default)
}

fn parse_bool_or(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(str::trim) {
        Some("true") => true,
        Some("false") => false,
        _ => default,
    }
}
