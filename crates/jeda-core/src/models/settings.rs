//! Timer settings model

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::util::to_slug;

/// Lowest value any numeric setting may take.
pub const MIN_NUMERIC_VALUE: u32 = 1;
/// Highest value a duration or interval setting may take.
pub const MAX_NUMERIC_VALUE: u32 = 999;
/// Highest value the alarm repeat count may take.
pub const MAX_ALARM_REPEAT: u32 = 10;

/// Errors raised while interpreting user-supplied field text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Unknown settings field: {0}")]
    UnknownField(String),
    #[error("Invalid value for {field}: expected true/false, got '{value}'")]
    InvalidBoolean { field: &'static str, value: String },
    #[error("Invalid volume '{0}': expected a number between 0 and 1 or a percentage")]
    InvalidVolume(String),
    #[error("Unknown color '{0}'")]
    UnknownColor(String),
    #[error("Unknown alarm sound '{0}'")]
    UnknownAlarmSound(String),
    #[error("Unknown backsound '{0}'")]
    UnknownBacksound(String),
}

/// One of the ten named palette colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Swatch {
    BrickRed,
    DeepIndigo,
    Teal,
    SteelBlue,
    Bronze,
    RoyalPurple,
    MutedMagenta,
    ForestGreen,
    SlateGray,
    Black,
}

impl Swatch {
    pub const ALL: [Self; 10] = [
        Self::BrickRed,
        Self::DeepIndigo,
        Self::Teal,
        Self::SteelBlue,
        Self::Bronze,
        Self::RoyalPurple,
        Self::MutedMagenta,
        Self::ForestGreen,
        Self::SlateGray,
        Self::Black,
    ];

    pub const fn name(self) -> &'static str {
        match self {
            Self::BrickRed => "Brick Red",
            Self::DeepIndigo => "Deep Indigo",
            Self::Teal => "Teal",
            Self::SteelBlue => "Steel Blue",
            Self::Bronze => "Bronze",
            Self::RoyalPurple => "Royal Purple",
            Self::MutedMagenta => "Muted Magenta",
            Self::ForestGreen => "Forest Green",
            Self::SlateGray => "Slate Gray",
            Self::Black => "Black",
        }
    }

    /// CSS color value stored in settings payloads.
    pub const fn value(self) -> &'static str {
        match self {
            Self::BrickRed => "oklch(0.5425 0.1342 23.73)",
            Self::DeepIndigo => "oklch(0.3635 0.0554 277.8)",
            Self::Teal => "oklch(0.5406 0.067 196.69)",
            Self::SteelBlue => "oklch(0.4703 0.0888 247.87)",
            Self::Bronze => "oklch(0.6209 0.095 90.75)",
            Self::RoyalPurple => "oklch(0.3961 0.1167 303.38)",
            Self::MutedMagenta => "oklch(0.5297 0.1356 343.24)",
            Self::ForestGreen => "oklch(0.5275 0.0713 151.27)",
            Self::SlateGray => "oklch(0.2953 0.0196 278.09)",
            Self::Black => "oklch(0.0000 0.0000 0.0000)",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL.into_iter().find(|swatch| swatch.value() == value)
    }
}

impl FromStr for Swatch {
    type Err = ValidationError;

    /// Accepts the CSS value, the display name, or its slug (`forest-green`).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if let Some(swatch) = Self::from_value(text) {
            return Ok(swatch);
        }
        let slug = to_slug(text);
        Self::ALL
            .into_iter()
            .find(|swatch| to_slug(swatch.name()) == slug)
            .ok_or_else(|| ValidationError::UnknownColor(text.trim().to_string()))
    }
}

impl TryFrom<String> for Swatch {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Swatch> for String {
    fn from(value: Swatch) -> Self {
        value.value().to_string()
    }
}

impl fmt::Display for Swatch {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.name())
    }
}

/// Alarm played when a timer phase ends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AlarmSound {
    #[default]
    #[serde(rename = "alarm-bell.mp3")]
    Bell,
    #[serde(rename = "alarm-digital.mp3")]
    Digital,
    #[serde(rename = "alarm-kitchen.mp3")]
    Kitchen,
}

impl AlarmSound {
    pub const ALL: [Self; 3] = [Self::Bell, Self::Digital, Self::Kitchen];

    pub const fn label(self) -> &'static str {
        match self {
            Self::Bell => "Alarm Bell",
            Self::Digital => "Alarm Digital",
            Self::Kitchen => "Alarm Kitchen",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Bell => "alarm-bell.mp3",
            Self::Digital => "alarm-digital.mp3",
            Self::Kitchen => "alarm-kitchen.mp3",
        }
    }

    pub fn asset_path(self) -> String {
        format!("sounds/alarm/{}", self.file_name())
    }

    pub fn from_file_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sound| sound.file_name() == value.trim())
    }
}

impl FromStr for AlarmSound {
    type Err = ValidationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if let Some(sound) = Self::from_file_name(text) {
            return Ok(sound);
        }
        let slug = to_slug(text);
        Self::ALL
            .into_iter()
            .find(|sound| {
                to_slug(sound.label()) == slug
                    || to_slug(sound.label()).trim_start_matches("alarm-") == slug
            })
            .ok_or_else(|| ValidationError::UnknownAlarmSound(text.trim().to_string()))
    }
}

/// Ambient loop played while a timer runs. `None` means silence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Backsound {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "ticking-fast.mp3")]
    TickingFast,
    #[serde(rename = "ticking-slow.mp3")]
    TickingSlow,
}

impl Backsound {
    pub const ALL: [Self; 3] = [Self::None, Self::TickingFast, Self::TickingSlow];

    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "None",
            Self::TickingFast => "Ticking Fast",
            Self::TickingSlow => "Ticking Slow",
        }
    }

    pub const fn file_name(self) -> &'static str {
        match self {
            Self::None => "",
            Self::TickingFast => "ticking-fast.mp3",
            Self::TickingSlow => "ticking-slow.mp3",
        }
    }

    pub fn asset_path(self) -> Option<String> {
        match self {
            Self::None => None,
            other => Some(format!("sounds/backsound/{}", other.file_name())),
        }
    }

    pub fn from_file_name(value: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|sound| sound.file_name() == value.trim())
    }
}

impl FromStr for Backsound {
    type Err = ValidationError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if let Some(sound) = Self::from_file_name(text) {
            return Ok(sound);
        }
        let slug = to_slug(text);
        Self::ALL
            .into_iter()
            .find(|sound| to_slug(sound.label()) == slug)
            .ok_or_else(|| ValidationError::UnknownBacksound(text.trim().to_string()))
    }
}

/// Integer-valued settings that go through clamp-on-edit and resolve-on-blur.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NumericField {
    PomodoroTime,
    ShortBreakTime,
    LongBreakTime,
    LongBreakInterval,
    AlarmRepeat,
}

impl NumericField {
    pub const ALL: [Self; 5] = [
        Self::PomodoroTime,
        Self::ShortBreakTime,
        Self::LongBreakTime,
        Self::LongBreakInterval,
        Self::AlarmRepeat,
    ];

    pub const fn key(self) -> &'static str {
        match self {
            Self::PomodoroTime => "pomodoroTime",
            Self::ShortBreakTime => "shortBreakTime",
            Self::LongBreakTime => "longBreakTime",
            Self::LongBreakInterval => "longBreakInterval",
            Self::AlarmRepeat => "alarmRepeat",
        }
    }

    pub const fn max(self) -> u32 {
        match self {
            Self::AlarmRepeat => MAX_ALARM_REPEAT,
            _ => MAX_NUMERIC_VALUE,
        }
    }

    /// Clamp a finite number into this field's range, rounding to an integer.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn clamp(self, value: f64) -> u32 {
        let rounded = value.round();
        if rounded < f64::from(MIN_NUMERIC_VALUE) {
            MIN_NUMERIC_VALUE
        } else if rounded > f64::from(self.max()) {
            self.max()
        } else {
            rounded as u32
        }
    }

    pub const fn contains(self, value: u32) -> bool {
        value >= MIN_NUMERIC_VALUE && value <= self.max()
    }
}

/// Which timer phase a color applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColorSlot {
    Pomodoro,
    ShortBreak,
    LongBreak,
}

impl ColorSlot {
    pub const ALL: [Self; 3] = [Self::Pomodoro, Self::ShortBreak, Self::LongBreak];

    pub const fn key(self) -> &'static str {
        match self {
            Self::Pomodoro => "pomodoroColor",
            Self::ShortBreak => "shortBreakColor",
            Self::LongBreak => "longBreakColor",
        }
    }
}

/// Every editable settings field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingsField {
    Numeric(NumericField),
    AutoStartBreaks,
    AutoStartPomodoros,
    Color(ColorSlot),
    Volume,
    AlarmSound,
    Backsound,
}

impl SettingsField {
    pub const ALL: [Self; 13] = [
        Self::Numeric(NumericField::PomodoroTime),
        Self::Numeric(NumericField::ShortBreakTime),
        Self::Numeric(NumericField::LongBreakTime),
        Self::Numeric(NumericField::LongBreakInterval),
        Self::AutoStartBreaks,
        Self::AutoStartPomodoros,
        Self::Color(ColorSlot::Pomodoro),
        Self::Color(ColorSlot::ShortBreak),
        Self::Color(ColorSlot::LongBreak),
        Self::Volume,
        Self::AlarmSound,
        Self::Backsound,
        Self::Numeric(NumericField::AlarmRepeat),
    ];

    /// Wire name of the field (camelCase, as in the JSON payload).
    pub const fn key(self) -> &'static str {
        match self {
            Self::Numeric(field) => field.key(),
            Self::AutoStartBreaks => "autoStartBreaks",
            Self::AutoStartPomodoros => "autoStartPomodoros",
            Self::Color(slot) => slot.key(),
            Self::Volume => "volume",
            Self::AlarmSound => "alarmSound",
            Self::Backsound => "backsound",
        }
    }
}

impl FromStr for SettingsField {
    type Err = ValidationError;

    /// Accepts the wire name (`pomodoroTime`) or its slug (`pomodoro-time`).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let slug = to_slug(text);
        Self::ALL
            .into_iter()
            .find(|field| to_slug(field.key()) == slug)
            .ok_or_else(|| ValidationError::UnknownField(text.trim().to_string()))
    }
}

impl fmt::Display for SettingsField {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str(self.key())
    }
}

/// A single typed change to a draft.
///
/// Numeric edits carry the raw input text; clamping happens when the edit is
/// applied so that an empty field can stay empty until it loses focus.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingsEdit {
    Numeric(NumericField, String),
    AutoStartBreaks(bool),
    AutoStartPomodoros(bool),
    Color(ColorSlot, Swatch),
    Volume(f64),
    AlarmSound(AlarmSound),
    Backsound(Backsound),
}

impl SettingsEdit {
    /// Interpret `value` as input for `field`.
    pub fn parse(field: SettingsField, value: &str) -> Result<Self, ValidationError> {
        match field {
            SettingsField::Numeric(numeric) => Ok(Self::Numeric(numeric, value.to_string())),
            SettingsField::AutoStartBreaks => {
                parse_bool(field, value).map(Self::AutoStartBreaks)
            }
            SettingsField::AutoStartPomodoros => {
                parse_bool(field, value).map(Self::AutoStartPomodoros)
            }
            SettingsField::Color(slot) => value.parse().map(|swatch| Self::Color(slot, swatch)),
            SettingsField::Volume => parse_volume(value).map(Self::Volume),
            SettingsField::AlarmSound => value.parse().map(Self::AlarmSound),
            SettingsField::Backsound => value.parse().map(Self::Backsound),
        }
    }

    pub const fn field(&self) -> SettingsField {
        match self {
            Self::Numeric(field, _) => SettingsField::Numeric(*field),
            Self::AutoStartBreaks(_) => SettingsField::AutoStartBreaks,
            Self::AutoStartPomodoros(_) => SettingsField::AutoStartPomodoros,
            Self::Color(slot, _) => SettingsField::Color(*slot),
            Self::Volume(_) => SettingsField::Volume,
            Self::AlarmSound(_) => SettingsField::AlarmSound,
            Self::Backsound(_) => SettingsField::Backsound,
        }
    }
}

fn parse_bool(field: SettingsField, value: &str) -> Result<bool, ValidationError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ValidationError::InvalidBoolean {
            field: field.key(),
            value: value.trim().to_string(),
        }),
    }
}

/// Accepts `0.5` or `50%`.
fn parse_volume(value: &str) -> Result<f64, ValidationError> {
    let trimmed = value.trim();
    let (number, scale) = trimmed
        .strip_suffix('%')
        .map_or((trimmed, 1.0), |percent| (percent.trim(), 100.0));
    number
        .parse::<f64>()
        .ok()
        .filter(|volume| volume.is_finite())
        .map(|volume| clamp_volume(volume / scale))
        .ok_or_else(|| ValidationError::InvalidVolume(trimmed.to_string()))
}

pub(crate) fn clamp_volume(volume: f64) -> f64 {
    if volume.is_finite() {
        volume.clamp(0.0, 1.0)
    } else {
        1.0
    }
}

/// Timer settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "RawSettings")]
pub struct Settings {
    pub pomodoro_time: u32,
    pub short_break_time: u32,
    pub long_break_time: u32,
    pub long_break_interval: u32,
    pub auto_start_breaks: bool,
    pub auto_start_pomodoros: bool,
    pub pomodoro_color: Swatch,
    pub short_break_color: Swatch,
    pub long_break_color: Swatch,
    /// Playback volume in `[0, 1]`
    pub volume: f64,
    pub alarm_sound: AlarmSound,
    pub backsound: Backsound,
    pub alarm_repeat: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            pomodoro_time: 25,
            short_break_time: 5,
            long_break_time: 15,
            long_break_interval: 4,
            auto_start_breaks: false,
            auto_start_pomodoros: false,
            pomodoro_color: Swatch::BrickRed,
            short_break_color: Swatch::Teal,
            long_break_color: Swatch::SteelBlue,
            volume: 1.0,
            alarm_sound: AlarmSound::Bell,
            backsound: Backsound::None,
            alarm_repeat: 1,
        }
    }
}

impl Settings {
    pub const fn numeric(&self, field: NumericField) -> u32 {
        match field {
            NumericField::PomodoroTime => self.pomodoro_time,
            NumericField::ShortBreakTime => self.short_break_time,
            NumericField::LongBreakTime => self.long_break_time,
            NumericField::LongBreakInterval => self.long_break_interval,
            NumericField::AlarmRepeat => self.alarm_repeat,
        }
    }

    pub fn set_numeric(&mut self, field: NumericField, value: u32) {
        let slot = match field {
            NumericField::PomodoroTime => &mut self.pomodoro_time,
            NumericField::ShortBreakTime => &mut self.short_break_time,
            NumericField::LongBreakTime => &mut self.long_break_time,
            NumericField::LongBreakInterval => &mut self.long_break_interval,
            NumericField::AlarmRepeat => &mut self.alarm_repeat,
        };
        *slot = value;
    }

    pub const fn color(&self, slot: ColorSlot) -> Swatch {
        match slot {
            ColorSlot::Pomodoro => self.pomodoro_color,
            ColorSlot::ShortBreak => self.short_break_color,
            ColorSlot::LongBreak => self.long_break_color,
        }
    }

    pub fn set_color(&mut self, slot: ColorSlot, swatch: Swatch) {
        match slot {
            ColorSlot::Pomodoro => self.pomodoro_color = swatch,
            ColorSlot::ShortBreak => self.short_break_color = swatch,
            ColorSlot::LongBreak => self.long_break_color = swatch,
        }
    }

    /// Bring every field into its valid range.
    #[must_use]
    pub fn normalized(mut self) -> Self {
        for field in NumericField::ALL {
            let value = field.clamp(f64::from(self.numeric(field)));
            self.set_numeric(field, value);
        }
        self.volume = clamp_volume(self.volume);
        self
    }

    /// Whether every field already sits inside its valid range.
    pub fn is_normalized(&self) -> bool {
        NumericField::ALL
            .into_iter()
            .all(|field| field.contains(self.numeric(field)))
            && (0.0..=1.0).contains(&self.volume)
    }

    /// Display text for a field, as shown by `settings show`.
    pub fn display_value(&self, field: SettingsField) -> String {
        match field {
            SettingsField::Numeric(numeric) => self.numeric(numeric).to_string(),
            SettingsField::AutoStartBreaks => self.auto_start_breaks.to_string(),
            SettingsField::AutoStartPomodoros => self.auto_start_pomodoros.to_string(),
            SettingsField::Color(slot) => {
                let swatch = self.color(slot);
                format!("{} ({})", swatch.name(), swatch.value())
            }
            SettingsField::Volume => format!("{:.0}%", self.volume * 100.0),
            SettingsField::AlarmSound => self.alarm_sound.label().to_string(),
            SettingsField::Backsound => self.backsound.label().to_string(),
        }
    }
}

/// Lenient decoding shape for settings read from disk or the network.
///
/// Anything missing, mistyped, or unknown falls back to the field default and
/// out-of-range numbers are clamped.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RawSettings {
    pomodoro_time: Option<Value>,
    short_break_time: Option<Value>,
    long_break_time: Option<Value>,
    long_break_interval: Option<Value>,
    alarm_repeat: Option<Value>,
    auto_start_breaks: Option<Value>,
    auto_start_pomodoros: Option<Value>,
    pomodoro_color: Option<Value>,
    short_break_color: Option<Value>,
    long_break_color: Option<Value>,
    volume: Option<Value>,
    alarm_sound: Option<Value>,
    backsound: Option<Value>,
}

impl From<RawSettings> for Settings {
    fn from(raw: RawSettings) -> Self {
        let defaults = Self::default();
        let numeric = |value: Option<Value>, field: NumericField| {
            value
                .as_ref()
                .and_then(lenient_number)
                .map_or(defaults.numeric(field), |number| field.clamp(number))
        };
        let boolean = |value: Option<Value>, fallback: bool| {
            value.as_ref().and_then(Value::as_bool).unwrap_or(fallback)
        };
        let color = |value: Option<Value>, slot: ColorSlot| {
            value
                .as_ref()
                .and_then(Value::as_str)
                .and_then(Swatch::from_value)
                .unwrap_or_else(|| defaults.color(slot))
        };

        Self {
            pomodoro_time: numeric(raw.pomodoro_time, NumericField::PomodoroTime),
            short_break_time: numeric(raw.short_break_time, NumericField::ShortBreakTime),
            long_break_time: numeric(raw.long_break_time, NumericField::LongBreakTime),
            long_break_interval: numeric(raw.long_break_interval, NumericField::LongBreakInterval),
            alarm_repeat: numeric(raw.alarm_repeat, NumericField::AlarmRepeat),
            auto_start_breaks: boolean(raw.auto_start_breaks, defaults.auto_start_breaks),
            auto_start_pomodoros: boolean(raw.auto_start_pomodoros, defaults.auto_start_pomodoros),
            pomodoro_color: color(raw.pomodoro_color, ColorSlot::Pomodoro),
            short_break_color: color(raw.short_break_color, ColorSlot::ShortBreak),
            long_break_color: color(raw.long_break_color, ColorSlot::LongBreak),
            volume: raw
                .volume
                .as_ref()
                .and_then(Value::as_f64)
                .map_or(defaults.volume, clamp_volume),
            alarm_sound: raw
                .alarm_sound
                .as_ref()
                .and_then(Value::as_str)
                .and_then(AlarmSound::from_file_name)
                .unwrap_or(defaults.alarm_sound),
            backsound: raw
                .backsound
                .as_ref()
                .and_then(Value::as_str)
                .and_then(Backsound::from_file_name)
                .unwrap_or(defaults.backsound),
        }
    }
}

fn lenient_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|number| number.is_finite())
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn test_settings_default() {
        let settings = Settings::default();
        assert_eq!(settings.pomodoro_time, 25);
        assert_eq!(settings.short_break_time, 5);
        assert_eq!(settings.long_break_time, 15);
        assert_eq!(settings.long_break_interval, 4);
        assert_eq!(settings.pomodoro_color, Swatch::BrickRed);
        assert_eq!(settings.backsound, Backsound::None);
        assert!(settings.is_normalized());
    }

    #[test]
    fn settings_serialize_with_wire_names_and_values() {
        let value = serde_json::to_value(Settings::default()).unwrap();
        assert_eq!(
            value,
            json!({
                "pomodoroTime": 25,
                "shortBreakTime": 5,
                "longBreakTime": 15,
                "longBreakInterval": 4,
                "autoStartBreaks": false,
                "autoStartPomodoros": false,
                "pomodoroColor": "oklch(0.5425 0.1342 23.73)",
                "shortBreakColor": "oklch(0.5406 0.067 196.69)",
                "longBreakColor": "oklch(0.4703 0.0888 247.87)",
                "volume": 1.0,
                "alarmSound": "alarm-bell.mp3",
                "backsound": "",
                "alarmRepeat": 1
            })
        );
    }

    #[test]
    fn lenient_decode_clamps_and_falls_back() {
        let settings: Settings = serde_json::from_value(json!({
            "pomodoroTime": 1500,
            "shortBreakTime": "7",
            "longBreakTime": null,
            "alarmRepeat": 40,
            "volume": 3.5,
            "pomodoroColor": "hotpink",
            "alarmSound": "alarm-digital.mp3",
            "backsound": "rain.mp3",
            "userId": "ignored"
        }))
        .unwrap();

        assert_eq!(settings.pomodoro_time, 999);
        assert_eq!(settings.short_break_time, 7);
        assert_eq!(settings.long_break_time, 15);
        assert_eq!(settings.alarm_repeat, MAX_ALARM_REPEAT);
        assert!((settings.volume - 1.0).abs() < f64::EPSILON);
        assert_eq!(settings.pomodoro_color, Swatch::BrickRed);
        assert_eq!(settings.alarm_sound, AlarmSound::Digital);
        assert_eq!(settings.backsound, Backsound::None);
    }

    #[test]
    fn numeric_clamp_respects_field_bounds() {
        assert_eq!(NumericField::PomodoroTime.clamp(1000.0), 999);
        assert_eq!(NumericField::PomodoroTime.clamp(-3.0), 1);
        assert_eq!(NumericField::PomodoroTime.clamp(42.0), 42);
        assert_eq!(NumericField::AlarmRepeat.clamp(25.0), 10);
        assert_eq!(NumericField::LongBreakInterval.clamp(2.4), 2);
    }

    #[test]
    fn swatch_parses_value_name_and_slug() {
        assert_eq!("Forest Green".parse::<Swatch>().unwrap(), Swatch::ForestGreen);
        assert_eq!("slate-gray".parse::<Swatch>().unwrap(), Swatch::SlateGray);
        assert_eq!(
            "oklch(0.3635 0.0554 277.8)".parse::<Swatch>().unwrap(),
            Swatch::DeepIndigo
        );
        assert!("chartreuse".parse::<Swatch>().is_err());
    }

    #[test]
    fn sounds_parse_file_names_and_labels() {
        assert_eq!("digital".parse::<AlarmSound>().unwrap(), AlarmSound::Digital);
        assert_eq!(
            "alarm-kitchen.mp3".parse::<AlarmSound>().unwrap(),
            AlarmSound::Kitchen
        );
        assert_eq!("none".parse::<Backsound>().unwrap(), Backsound::None);
        assert_eq!("".parse::<Backsound>().unwrap(), Backsound::None);
        assert_eq!(
            "Ticking Slow".parse::<Backsound>().unwrap(),
            Backsound::TickingSlow
        );
        assert_eq!(Backsound::None.asset_path(), None);
        assert_eq!(AlarmSound::Bell.asset_path(), "sounds/alarm/alarm-bell.mp3");
    }

    #[test]
    fn settings_field_parses_wire_name_and_slug() {
        assert_eq!(
            "pomodoroTime".parse::<SettingsField>().unwrap(),
            SettingsField::Numeric(NumericField::PomodoroTime)
        );
        assert_eq!(
            "short-break-color".parse::<SettingsField>().unwrap(),
            SettingsField::Color(ColorSlot::ShortBreak)
        );
        assert_eq!(
            "backsound".parse::<SettingsField>().unwrap(),
            SettingsField::Backsound
        );
        assert!(matches!(
            "tickRate".parse::<SettingsField>(),
            Err(ValidationError::UnknownField(_))
        ));
    }

    #[test]
    fn settings_edit_parse_interprets_values() {
        assert_eq!(
            SettingsEdit::parse(SettingsField::Volume, "50%").unwrap(),
            SettingsEdit::Volume(0.5)
        );
        assert_eq!(
            SettingsEdit::parse(SettingsField::Volume, "2").unwrap(),
            SettingsEdit::Volume(1.0)
        );
        assert_eq!(
            SettingsEdit::parse(SettingsField::AutoStartBreaks, "on").unwrap(),
            SettingsEdit::AutoStartBreaks(true)
        );
        assert!(SettingsEdit::parse(SettingsField::AutoStartPomodoros, "maybe").is_err());
        assert!(SettingsEdit::parse(SettingsField::Volume, "loud").is_err());
    }
}
