use std::sync::Arc;

use ocula_core::ThemeVariant;
use serde_json::Value;
use tracing::warn;

use crate::{PreferenceError, PreferenceStore};

pub const KEY_DARK_MODE: &str = "dark_mode";
pub const KEY_THEME_VARIANT: &str = "theme_variant";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ThemeSettings {
    pub dark_mode: bool,
    pub variant: ThemeVariant,
}

/// Typed view over the two theme keys of a [`PreferenceStore`].
pub struct ThemePreferences {
    store: Arc<dyn PreferenceStore>,
}

impl ThemePreferences {
    pub fn new(store: Arc<dyn PreferenceStore>) -> Self {
        Self { store }
    }

    pub fn dark_mode(&self) -> Result<bool, PreferenceError> {
        Ok(self.store.get_bool(KEY_DARK_MODE)?.unwrap_or(false))
    }

    /// Missing, non-string and unknown values all read back as the default variant.
    pub fn theme_variant(&self) -> Result<ThemeVariant, PreferenceError> {
        let Some(raw) = self.store.get(KEY_THEME_VARIANT)? else {
            return Ok(ThemeVariant::default());
        };
        match raw.as_str().and_then(ThemeVariant::from_id) {
            Some(v) => Ok(v),
            None => {
                warn!(stored = %raw, "unknown theme variant, using default");
                Ok(ThemeVariant::default())
            }
        }
    }

    pub fn load(&self) -> Result<ThemeSettings, PreferenceError> {
        Ok(ThemeSettings {
            dark_mode: self.dark_mode()?,
            variant: self.theme_variant()?,
        })
    }

    pub fn set_dark_mode(&self, enabled: bool) -> Result<(), PreferenceError> {
        self.store.set(KEY_DARK_MODE, Value::Bool(enabled))
    }

    pub fn set_theme_variant(&self, variant: ThemeVariant) -> Result<(), PreferenceError> {
        self.store
            .set(KEY_THEME_VARIANT, Value::String(variant.id().to_string()))
    }

    pub fn reset(&self) -> Result<(), PreferenceError> {
        self.store.remove(KEY_DARK_MODE)?;
        self.store.remove(KEY_THEME_VARIANT)
    }
}
