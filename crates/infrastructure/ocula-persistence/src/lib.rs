mod error;
mod file;
mod store;
mod theme;

pub use error::*;
pub use file::{default_preferences_path, JsonFilePreferenceStore};
pub use store::{InMemoryPreferenceStore, PreferenceStore};
pub use theme::{ThemePreferences, ThemeSettings, KEY_DARK_MODE, KEY_THEME_VARIANT};
