//! Player preferences and gameplay tuning
//!
//! Persisted in LocalStorage as one JSON blob.

use serde::{Deserialize, Serialize};

use crate::tuning::Tuning;

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Silence everything
    pub muted: bool,

    // === Gameplay ===
    pub tuning: Tuning,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            master_volume: 0.8,
            music_volume: 0.7,
            sfx_volume: 1.0,
            muted: false,
            tuning: Tuning::default(),
        }
    }
}

impl Settings {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "flappy_canvas_settings";

    /// Music volume after master and mute are applied
    pub fn effective_music_volume(&self) -> f32 {
        self.scaled(self.music_volume)
    }

    /// Sound effects volume after master and mute are applied
    pub fn effective_sfx_volume(&self) -> f32 {
        self.scaled(self.sfx_volume)
    }

    /// Flip mute, returning the new setting
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    fn scaled(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            (self.master_volume * channel).clamp(0.0, 1.0)
        }
    }

    /// Parse stored JSON. Unknown or missing fields take defaults; tuning that
    /// fails validation is replaced with the default tuning.
    pub fn from_json(json: &str) -> Option<Self> {
        let mut settings: Settings = match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Discarding unreadable settings: {}", e);
                return None;
            }
        };
        if let Err(e) = settings.tuning.validate() {
            log::warn!("Stored tuning rejected ({}), using defaults", e);
            settings.tuning = Tuning::default();
        }
        Some(settings)
    }

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                if let Some(settings) = Self::from_json(&json) {
                    log::info!("Loaded settings from LocalStorage");
                    return settings;
                }
            }
        } else {
            log::warn!("LocalStorage unavailable");
        }

        log::info!("Using default settings");
        Self::default()
    }

    /// Save settings to LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn save(&self) {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(json) = serde_json::to_string(self) {
                if storage.set_item(Self::STORAGE_KEY, &json).is_err() {
                    log::warn!("Failed to write {}", Self::STORAGE_KEY);
                    return;
                }
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        log::debug!("No storage natively ({}), using defaults", Self::STORAGE_KEY);
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
