//! Interface preferences held for the lifetime of the process

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Presentation class applied while dark mode is on
pub const DARK_CLASS: &str = "dark";

/// Interface language
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Zh,
    En,
}

impl Language {
    pub fn code(self) -> &'static str {
        match self {
            Language::Zh => "zh",
            Language::En => "en",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "zh" => Ok(Language::Zh),
            "en" => Ok(Language::En),
            other => Err(format!("Unknown language '{}'. Use 'zh' or 'en'.", other)),
        }
    }
}

/// Lock, theme and language flags. Nothing here is persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettingsStore {
    is_locked: bool,
    is_dark: bool,
    language: Language,
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self {
            is_locked: true,
            is_dark: false,
            language: Language::default(),
        }
    }
}

impl SettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a given language, other flags at their defaults
    pub fn with_language(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn is_locked(&self) -> bool {
        self.is_locked
    }

    pub fn is_dark(&self) -> bool {
        self.is_dark
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn toggle_lock(&mut self) -> bool {
        self.is_locked = !self.is_locked;
        self.is_locked
    }

    /// Flip dark mode, returning the new state
    pub fn toggle_dark_mode(&mut self) -> bool {
        self.is_dark = !self.is_dark;
        self.is_dark
    }

    /// Class the presentation layer should apply, if any
    pub fn theme_class(&self) -> Option<&'static str> {
        self.is_dark.then_some(DARK_CLASS)
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }
}
