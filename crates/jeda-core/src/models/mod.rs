//! Data models for Jeda

mod settings;
mod stats;

pub use settings::{
    AlarmSound, Backsound, ColorSlot, NumericField, Settings, SettingsEdit, SettingsField, Swatch,
    ValidationError, MAX_ALARM_REPEAT, MAX_NUMERIC_VALUE, MIN_NUMERIC_VALUE,
};
pub use stats::{
    first_rank_on_page, format_focus_time, total_pages, ActivitySummary, RankingsPage, UserStats,
    RANKINGS_PAGE_SIZE,
};

pub(crate) use settings::clamp_volume;
