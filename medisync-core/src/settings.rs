//! Settings page preferences (everything except the theme, which lives in
//! [`crate::theme`]).

use crate::error::StorageError;
use crate::storage::KeyValueStore;
use serde::{Deserialize, Serialize};

pub const LANGUAGE_KEY: &str = "medisync-language";
pub const FONT_SIZE_KEY: &str = "medisync-font-size";
pub const FONT_FAMILY_KEY: &str = "medisync-font-family";
pub const TIME_FORMAT_KEY: &str = "medisync-time-format";
pub const ANIMATION_SPEED_KEY: &str = "medisync-animation-speed";
pub const NOTIFICATION_CHANNELS_KEY: &str = "medisync-notifications";

pub const LANGUAGES: [(&str, &str); 4] = [
    ("en", "English"),
    ("es", "Español"),
    ("fr", "Français"),
    ("de", "Deutsch"),
];
pub const FONT_SIZES: [&str; 3] = ["small", "medium", "large"];
pub const FONT_FAMILIES: [&str; 3] = ["Inter", "Roboto", "Open Sans"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationChannels {
    pub email: bool,
    pub push: bool,
    pub sms: bool,
}

impl Default for NotificationChannels {
    fn default() -> Self {
        Self {
            email: true,
            push: true,
            sms: false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeFormat {
    #[default]
    #[serde(rename = "12h")]
    TwelveHour,
    #[serde(rename = "24h")]
    TwentyFourHour,
}

impl TimeFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeFormat::TwelveHour => "12h",
            TimeFormat::TwentyFourHour => "24h",
        }
    }

    pub fn parse(raw: &str) -> Option<TimeFormat> {
        match raw {
            "12h" => Some(TimeFormat::TwelveHour),
            "24h" => Some(TimeFormat::TwentyFourHour),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Preferences {
    pub language: String,
    pub font_size: String,
    pub font_family: String,
    pub time_format: TimeFormat,
    /// Seconds per transition; clamped to `0.5..=2.0`.
    pub animation_speed: f32,
    pub notifications: NotificationChannels,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            language: "en".to_owned(),
            font_size: "medium".to_owned(),
            font_family: "Inter".to_owned(),
            time_format: TimeFormat::TwelveHour,
            animation_speed: 1.0,
            notifications: NotificationChannels::default(),
        }
    }
}

impl Preferences {
    /// Missing or unreadable keys keep their default value.
    pub fn load(store: &impl KeyValueStore) -> Result<Self, StorageError> {
        let mut prefs = Self::default();
        if let Some(v) = store.get(LANGUAGE_KEY)? {
            if LANGUAGES.iter().any(|(code, _)| *code == v) {
                prefs.language = v;
            }
        }
        if let Some(v) = store.get(FONT_SIZE_KEY)? {
            if FONT_SIZES.contains(&v.as_str()) {
                prefs.font_size = v;
            }
        }
        if let Some(v) = store.get(FONT_FAMILY_KEY)? {
            if !v.trim().is_empty() {
                prefs.font_family = v;
            }
        }
        if let Some(v) = store.get(TIME_FORMAT_KEY)?.as_deref().and_then(TimeFormat::parse) {
            prefs.time_format = v;
        }
        if let Some(v) = store
            .get(ANIMATION_SPEED_KEY)?
            .and_then(|raw| raw.parse::<f32>().ok())
        {
            prefs.set_animation_speed(v);
        }
        match store.get_json::<NotificationChannels>(NOTIFICATION_CHANNELS_KEY) {
            Ok(Some(channels)) => prefs.notifications = channels,
            Ok(None) | Err(StorageError::Serialization(_)) => {}
            Err(err) => return Err(err),
        }
        Ok(prefs)
    }

    pub fn save(&self, store: &impl KeyValueStore) -> Result<(), StorageError> {
        store.set(LANGUAGE_KEY, &self.language)?;
        store.set(FONT_SIZE_KEY, &self.font_size)?;
        store.set(FONT_FAMILY_KEY, &self.font_family)?;
        store.set(TIME_FORMAT_KEY, self.time_format.as_str())?;
        store.set(ANIMATION_SPEED_KEY, &self.animation_speed.to_string())?;
        store.set_json(NOTIFICATION_CHANNELS_KEY, &self.notifications)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn set_animation_speed(&mut self, seconds: f32) {
        self.animation_speed = if seconds.is_finite() {
            seconds.clamp(0.5, 2.0)
        } else {
            1.0
        };
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn empty_store_gives_defaults() {
        let prefs = Preferences::load(&MemoryStore::new()).expect("load");
        assert_eq!(prefs, Preferences::default());
        assert!(prefs.notifications.email);
        assert!(!prefs.notifications.sms);
    }

    #[test]
    fn save_and_reload() {
        let store = MemoryStore::new();
        let mut prefs = Preferences::default();
        prefs.language = "fr".into();
        prefs.font_size = "large".into();
        prefs.time_format = TimeFormat::TwentyFourHour;
        prefs.set_animation_speed(1.5);
        prefs.notifications.sms = true;
        prefs.save(&store).expect("save");

        assert_eq!(Preferences::load(&store).expect("load"), prefs);
    }

    #[test]
    fn garbage_values_are_ignored() {
        let store = MemoryStore::new();
        store.set(LANGUAGE_KEY, "klingon").expect("set");
        store.set(ANIMATION_SPEED_KEY, "fast").expect("set");
        store.set(NOTIFICATION_CHANNELS_KEY, "[").expect("set");
        assert_eq!(
            Preferences::load(&store).expect("load"),
            Preferences::default()
        );
    }

    #[test]
    fn reset_restores_defaults() {
        let mut prefs = Preferences {
            language: "de".into(),
            ..Preferences::default()
        };
        prefs.set_animation_speed(9.0);
        assert_eq!(prefs.animation_speed, 2.0);
        prefs.reset();
        assert_eq!(prefs, Preferences::default());
    }
}
