//! User preferences
//!
//! Persisted in LocalStorage. Only preferences live here; simulation runs are
//! never saved. A page query such as `?camera=follow&lang=de` overrides and
//! stores them.

use serde::{Deserialize, Serialize};

use crate::driver::StepMode;
use crate::i18n::Locale;
use crate::renderer::CameraPolicy;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Locale override; `None` follows the page route
    pub locale: Option<Locale>,
    pub camera: CameraPolicy,
    pub step_mode: StepMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            locale: None,
            camera: CameraPolicy::ClampToMidpoint,
            step_mode: StepMode::Fixed,
        }
    }
}

impl Settings {
    /// Locale to display: the stored override, else the route's locale
    pub fn effective_locale(&self, route: &str) -> Locale {
        self.locale.unwrap_or_else(|| Locale::from_route(route))
    }

    /// Parse stored JSON, falling back to defaults on any error
    pub fn from_json(json: &str) -> Self {
        match serde_json::from_str(json) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    /// Apply `key=value` pairs from a URL query (`?camera=follow&lang=de&step=variable`).
    /// `lang=auto` clears the locale override. Unknown keys and values are ignored.
    /// Returns whether anything changed.
    pub fn apply_query(&mut self, query: &str) -> bool {
        let before = self.clone();
        let pairs = query
            .trim_start_matches('?')
            .split('&')
            .filter_map(|pair| pair.split_once('='));

        for (key, value) in pairs {
            match key {
                "camera" => match CameraPolicy::from_str(value) {
                    Some(policy) => self.camera = policy,
                    None => log::warn!("Unknown camera policy {:?}", value),
                },
                "lang" if value.eq_ignore_ascii_case("auto") => self.locale = None,
                "lang" => match Locale::from_tag(value) {
                    Some(locale) => self.locale = Some(locale),
                    None => log::warn!("Unsupported locale {:?}", value),
                },
                "step" => match StepMode::from_str(value) {
                    Some(mode) => self.step_mode = mode,
                    None => log::warn!("Unknown step mode {:?}", value),
                },
                _ => {}
            }
        }

        let changed = *self != before;
        if changed {
            log::info!(
                "Preferences: camera {}, step {}, locale {}",
                self.camera.as_str(),
                self.step_mode.as_str(),
                self.locale.map_or("auto", |l| l.as_tag())
            );
        }
        changed
    }

    /// LocalStorage key (used only in wasm32)
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "brake_sim_settings";

    /// Load settings from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                log::info!("Loaded settings from LocalStorage");
                return Self::from_json(&json);
            }
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
                let _ = storage.set_item(Self::STORAGE_KEY, &json);
                log::info!("Settings saved");
            }
        }
    }

    /// Native stubs
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load() -> Self {
        Self::default()
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn save(&self) {
        // No-op for native
    }
}
