//! User preference bundle.
//!
//! Settings are process-wide, created once per store and merged in place.
//! The store merges updates as given; `CounterService::update_settings`
//! bounds `default_goal` and `display_name` first.

use crate::model::counter::DEFAULT_GOAL;
use serde::{Deserialize, Serialize};

/// Maximum profile display name length in characters.
pub const MAX_DISPLAY_NAME_CHARS: usize = 30;

/// Fixed set of avatar assets the profile screen can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Avatar {
    Lotus,
    Om,
    Meditation,
}

impl Avatar {
    /// Every avatar in picker order.
    pub const ALL: [Avatar; 3] = [Avatar::Lotus, Avatar::Om, Avatar::Meditation];

    /// Stable string id used by host asset lookups.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Lotus => "lotus",
            Self::Om => "om",
            Self::Meditation => "meditation",
        }
    }

    /// Parses a host asset id. Matching is exact.
    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|avatar| avatar.as_str() == value)
    }
}

/// User theme choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemePreference {
    Light,
    Dark,
    /// Follow the host's system appearance.
    Auto,
}

impl ThemePreference {
    /// Resolves the preference against the host's current appearance.
    pub fn resolve(self, system: Appearance) -> Appearance {
        match self {
            Self::Light => Appearance::Light,
            Self::Dark => Appearance::Dark,
            Self::Auto => system,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Auto => "auto",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            "auto" => Some(Self::Auto),
            _ => None,
        }
    }
}

/// Concrete colour scheme after theme resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Appearance {
    Light,
    Dark,
}

impl Appearance {
    pub fn is_dark(self) -> bool {
        self == Self::Dark
    }
}

/// Process-wide preference bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    pub display_name: String,
    pub avatar: Avatar,
    /// Gates haptic feedback. Read by callers, never by the store.
    pub haptic_enabled: bool,
    /// Stored for the profile screen; no sound path exists yet.
    pub sound_enabled: bool,
    pub theme: ThemePreference,
    /// Goal seeded into new counters.
    pub default_goal: u32,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            display_name: "Practitioner".to_string(),
            avatar: Avatar::Lotus,
            haptic_enabled: true,
            sound_enabled: false,
            theme: ThemePreference::Auto,
            default_goal: DEFAULT_GOAL,
        }
    }
}

impl AppSettings {
    pub(crate) fn apply(&mut self, update: SettingsUpdate) {
        if let Some(display_name) = update.display_name {
            self.display_name = display_name;
        }
        if let Some(avatar) = update.avatar {
            self.avatar = avatar;
        }
        if let Some(haptic_enabled) = update.haptic_enabled {
            self.haptic_enabled = haptic_enabled;
        }
        if let Some(sound_enabled) = update.sound_enabled {
            self.sound_enabled = sound_enabled;
        }
        if let Some(theme) = update.theme {
            self.theme = theme;
        }
        if let Some(default_goal) = update.default_goal {
            self.default_goal = default_goal;
        }
    }
}

/// Field-level settings update; unset fields keep their value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsUpdate {
    pub display_name: Option<String>,
    pub avatar: Option<Avatar>,
    pub haptic_enabled: Option<bool>,
    pub sound_enabled: Option<bool>,
    pub theme: Option<ThemePreference>,
    pub default_goal: Option<u32>,
}

impl SettingsUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }

    pub fn avatar(mut self, avatar: Avatar) -> Self {
        self.avatar = Some(avatar);
        self
    }

    pub fn haptic_enabled(mut self, enabled: bool) -> Self {
        self.haptic_enabled = Some(enabled);
        self
    }

    pub fn sound_enabled(mut self, enabled: bool) -> Self {
        self.sound_enabled = Some(enabled);
        self
    }

    pub fn theme(mut self, theme: ThemePreference) -> Self {
        self.theme = Some(theme);
        self
    }

    pub fn default_goal(mut self, goal: u32) -> Self {
        self.default_goal = Some(goal);
        self
    }
}
