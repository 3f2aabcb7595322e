//! Light/dark theme preferences.
//!
//! While `use_system` is on, the OS colour-scheme preference decides the
//! mode. Any explicit mode change turns system-following off.

use crate::error::StorageError;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};

pub const THEME_MODE_KEY: &str = "themeMode";
pub const USE_SYSTEM_THEME_KEY: &str = "useSystemTheme";
pub const ACCENT_COLOR_KEY: &str = "accentColor";
pub const REDUCE_MOTION_KEY: &str = "reduceMotion";

pub const DEFAULT_ACCENT: &str = "#2196f3";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    pub fn as_str(self) -> &'static str {
        match self {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
        }
    }

    pub fn parse(raw: &str) -> Option<ThemeMode> {
        match raw {
            "light" => Some(ThemeMode::Light),
            "dark" => Some(ThemeMode::Dark),
            _ => None,
        }
    }

    pub fn flipped(self) -> ThemeMode {
        match self {
            ThemeMode::Light => ThemeMode::Dark,
            ThemeMode::Dark => ThemeMode::Light,
        }
    }
}

/// What the host reports about OS-level preferences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SystemPreferences {
    pub prefers_dark: bool,
    pub prefers_reduced_motion: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ThemeSettings {
    pub mode: ThemeMode,
    pub use_system: bool,
    pub accent_color: String,
    pub reduce_motion: bool,
}

impl Default for ThemeSettings {
    fn default() -> Self {
        Self {
            mode: ThemeMode::Light,
            use_system: true,
            accent_color: DEFAULT_ACCENT.to_owned(),
            reduce_motion: false,
        }
    }
}

impl ThemeSettings {
    /// Reads saved settings, falling back to defaults per key. When
    /// following the system, the OS preference overrides the saved mode.
    pub fn load(
        store: &impl KeyValueStore,
        system: SystemPreferences,
    ) -> Result<Self, StorageError> {
        let mode = store
            .get(THEME_MODE_KEY)?
            .as_deref()
            .and_then(ThemeMode::parse)
            .unwrap_or_default();
        let use_system = store.get_flag(USE_SYSTEM_THEME_KEY)?.unwrap_or(true);
        let accent_color = store
            .get(ACCENT_COLOR_KEY)?
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| DEFAULT_ACCENT.to_owned());
        let reduce_motion = store
            .get_flag(REDUCE_MOTION_KEY)?
            .unwrap_or(system.prefers_reduced_motion);

        let mut settings = Self {
            mode,
            use_system,
            accent_color,
            reduce_motion,
        };
        settings.follow_system(system.prefers_dark);
        Ok(settings)
    }

    pub fn save(&self, store: &impl KeyValueStore) -> Result<(), StorageError> {
        store.set(THEME_MODE_KEY, self.mode.as_str())?;
        store.set_flag(USE_SYSTEM_THEME_KEY, self.use_system)?;
        store.set(ACCENT_COLOR_KEY, &self.accent_color)?;
        store.set_flag(REDUCE_MOTION_KEY, self.reduce_motion)
    }

    pub fn is_dark(&self) -> bool {
        self.mode == ThemeMode::Dark
    }

    pub fn toggle(&mut self) {
        self.use_system = false;
        self.mode = self.mode.flipped();
    }

    pub fn set_dark_mode(&mut self, dark: bool) {
        self.use_system = false;
        self.mode = if dark { ThemeMode::Dark } else { ThemeMode::Light };
    }

    pub fn set_mode(&mut self, mode: ThemeMode) {
        self.mode = mode;
    }

    /// Flips system-following. Turning it on adopts the OS preference.
    pub fn toggle_system(&mut self, prefers_dark: bool) {
        self.use_system = !self.use_system;
        self.follow_system(prefers_dark);
    }

    /// Called on load and whenever the OS colour scheme changes.
    pub fn follow_system(&mut self, prefers_dark: bool) {
        if self.use_system {
            self.mode = if prefers_dark { ThemeMode::Dark } else { ThemeMode::Light };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const DARK_OS: SystemPreferences = SystemPreferences {
        prefers_dark: true,
        prefers_reduced_motion: false,
    };

    #[test]
    fn defaults_follow_system() {
        let settings = ThemeSettings::load(&MemoryStore::new(), DARK_OS).expect("load");
        assert!(settings.use_system);
        assert!(settings.is_dark());
        assert_eq!(settings.accent_color, DEFAULT_ACCENT);
    }

    #[test]
    fn toggle_leaves_system_mode() {
        let mut settings = ThemeSettings::load(&MemoryStore::new(), DARK_OS).expect("load");
        settings.toggle();
        assert!(!settings.use_system);
        assert_eq!(settings.mode, ThemeMode::Light);

        settings.follow_system(true);
        assert_eq!(settings.mode, ThemeMode::Light);

        settings.toggle_system(true);
        assert!(settings.use_system);
        assert_eq!(settings.mode, ThemeMode::Dark);
    }

    #[test]
    fn saved_manual_mode_survives_reload() {
        let store = MemoryStore::new();
        let mut settings = ThemeSettings::load(&store, DARK_OS).expect("load");
        settings.set_dark_mode(false);
        settings.accent_color = "#e91e63".into();
        settings.save(&store).expect("save");

        assert_eq!(store.get(THEME_MODE_KEY).expect("get").as_deref(), Some("light"));
        assert_eq!(
            store.get(USE_SYSTEM_THEME_KEY).expect("get").as_deref(),
            Some("false")
        );

        let reloaded = ThemeSettings::load(&store, DARK_OS).expect("reload");
        assert_eq!(reloaded, settings);
    }

    #[test]
    fn reduce_motion_defaults_to_os_until_saved() {
        let store = MemoryStore::new();
        let os = SystemPreferences {
            prefers_dark: false,
            prefers_reduced_motion: true,
        };
        assert!(ThemeSettings::load(&store, os).expect("load").reduce_motion);

        store.set_flag(REDUCE_MOTION_KEY, false).expect("set");
        assert!(!ThemeSettings::load(&store, os).expect("load").reduce_motion);
    }

    #[test]
    fn unknown_mode_falls_back_to_light() {
        let store = MemoryStore::new();
        store.set(THEME_MODE_KEY, "sepia").expect("set");
        store.set_flag(USE_SYSTEM_THEME_KEY, false).expect("set");
        let settings = ThemeSettings::load(&store, DARK_OS).expect("load");
        assert_eq!(settings.mode, ThemeMode::Light);
    }
}
