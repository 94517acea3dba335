//! Editable, session-scoped copy of the settings.

use std::collections::HashSet;

use crate::models::{
    clamp_volume, NumericField, Settings, SettingsEdit, SettingsField, ValidationError,
    MIN_NUMERIC_VALUE,
};

/// What a numeric field currently holds in a draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericInput {
    Value(u32),
    /// Cleared or non-numeric input waiting for blur resolution
    Empty,
}

/// Transient copy of the committed settings owned by one editing session.
///
/// Edits never touch the committed value; [`SettingsSync::close_session`]
/// decides what happens to the draft.
///
/// [`SettingsSync::close_session`]: super::SettingsSync::close_session
#[derive(Debug, Clone, PartialEq)]
pub struct Draft {
    values: Settings,
    empty: HashSet<NumericField>,
    dirty: bool,
}

impl Draft {
    pub(crate) fn from_committed(settings: Settings) -> Self {
        Self {
            values: settings,
            empty: HashSet::new(),
            dirty: false,
        }
    }

    pub const fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Draft values; numeric fields reported by [`Self::numeric_input`] as
    /// empty still hold their previous number here.
    pub const fn values(&self) -> &Settings {
        &self.values
    }

    pub fn numeric_input(&self, field: NumericField) -> NumericInput {
        if self.empty.contains(&field) {
            NumericInput::Empty
        } else {
            NumericInput::Value(self.values.numeric(field))
        }
    }

    /// Parse `raw` for `field` and apply it.
    ///
    /// Numeric text never fails here: it is clamped or held as empty.
    pub fn edit_field(&mut self, field: SettingsField, raw: &str) -> Result<(), ValidationError> {
        let edit = SettingsEdit::parse(field, raw)?;
        self.apply(edit);
        Ok(())
    }

    /// Apply one typed edit and mark the draft dirty.
    pub fn apply(&mut self, edit: SettingsEdit) {
        match edit {
            SettingsEdit::Numeric(field, raw) => match parse_numeric(&raw) {
                Some(number) => {
                    self.values.set_numeric(field, field.clamp(number));
                    self.empty.remove(&field);
                }
                None => {
                    self.empty.insert(field);
                }
            },
            SettingsEdit::AutoStartBreaks(enabled) => self.values.auto_start_breaks = enabled,
            SettingsEdit::AutoStartPomodoros(enabled) => self.values.auto_start_pomodoros = enabled,
            SettingsEdit::Color(slot, swatch) => self.values.set_color(slot, swatch),
            SettingsEdit::Volume(volume) => self.values.volume = clamp_volume(volume),
            SettingsEdit::AlarmSound(sound) => self.values.alarm_sound = sound,
            SettingsEdit::Backsound(sound) => self.values.backsound = sound,
        }
        self.dirty = true;
    }

    /// Blur handling: an empty numeric field becomes 1.
    pub fn resolve_field(&mut self, field: NumericField) {
        if self.empty.remove(&field) {
            self.values.set_numeric(field, MIN_NUMERIC_VALUE);
        }
    }

    pub fn resolve_all(&mut self) {
        for field in NumericField::ALL {
            self.resolve_field(field);
        }
    }

    /// Replace every draft value with the defaults and mark the draft dirty.
    pub fn reset_to_defaults(&mut self) {
        self.values = Settings::default();
        self.empty.clear();
        self.dirty = true;
    }

    /// Settings as they would be committed: empty fields resolved, ranges enforced.
    pub fn normalized(&self) -> Settings {
        let mut draft = self.clone();
        draft.resolve_all();
        draft.values.normalized()
    }
}

fn parse_numeric(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|value| value.is_finite())
}
