use std::sync::Arc;

use anyhow::Context;
use ocula_core::ThemeVariant;
use ocula_persistence::{ThemePreferences, ThemeSettings};
use tracing::{debug, info};

use crate::app_core::{Controller, Scope};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsState {
    pub is_loading: bool,
    pub dark_mode: bool,
    pub theme_variant: ThemeVariant,
    pub error: Option<String>,
}

#[derive(Debug)]
pub enum SettingsEvent {
    Load,
    ToggleDarkMode,
    SetThemeVariant(ThemeVariant),
    ResetToDefaults,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsEffect {
    ShowSuccess(String),
    ShowError(String),
}

type SettingsScope = Scope<SettingsState, SettingsEffect>;

/// Theme preferences. Every change is written to the store first and only
/// reflected in state once the write succeeded.
pub struct SettingsController {
    prefs: Arc<ThemePreferences>,
}

impl SettingsController {
    pub fn new(prefs: Arc<ThemePreferences>) -> Self {
        Self { prefs }
    }

    /// Store calls may touch the filesystem, so they run off the event loop.
    async fn with_prefs<T, Op>(&self, op: Op) -> anyhow::Result<T>
    where
        T: Send + 'static,
        Op: FnOnce(&ThemePreferences) -> anyhow::Result<T> + Send + 'static,
    {
        let prefs = self.prefs.clone();
        tokio::task::spawn_blocking(move || op(&prefs))
            .await
            .context("preference task failed")?
    }

    fn fail(scope: &SettingsScope, e: anyhow::Error) {
        let message = format!("{e:#}");
        scope.update_state(|s| SettingsState {
            is_loading: false,
            error: Some(message.clone()),
            ..s
        });
        scope.send_effect(SettingsEffect::ShowError(message));
    }

    fn start_loading(scope: &SettingsScope) {
        scope.update_state(|s| SettingsState {
            is_loading: true,
            error: None,
            ..s
        });
    }
}

#[async_trait::async_trait]
impl Controller for SettingsController {
    type State = SettingsState;
    type Event = SettingsEvent;
    type Effect = SettingsEffect;

    const NAME: &'static str = "settings";

    async fn on_event(&mut self, event: SettingsEvent, scope: &SettingsScope) -> anyhow::Result<()> {
        match event {
            SettingsEvent::Load => {
                Self::start_loading(scope);
                let res = self
                    .with_prefs(|p| p.load().context("failed to read theme preferences"))
                    .await;
                match res {
                    Ok(ThemeSettings { dark_mode, variant }) => {
                        debug!(dark_mode, variant = %variant, "theme loaded");
                        scope.update_state(|s| SettingsState {
                            is_loading: false,
                            dark_mode,
                            theme_variant: variant,
                            ..s
                        });
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }

            SettingsEvent::ToggleDarkMode => {
                Self::start_loading(scope);
                // Flip what is stored, which may differ from state before Load.
                let res = self
                    .with_prefs(|p| {
                        let enabled = !p.dark_mode().context("failed to read dark mode")?;
                        p.set_dark_mode(enabled)
                            .context("failed to save dark mode")?;
                        Ok(enabled)
                    })
                    .await;
                match res {
                    Ok(enabled) => {
                        info!(enabled, "dark mode changed");
                        scope.update_state(|s| SettingsState {
                            is_loading: false,
                            dark_mode: enabled,
                            ..s
                        });
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }

            SettingsEvent::SetThemeVariant(variant) => {
                Self::start_loading(scope);
                let res = self
                    .with_prefs(move |p| {
                        p.set_theme_variant(variant)
                            .context("failed to save theme")
                    })
                    .await;
                match res {
                    Ok(()) => {
                        info!(variant = %variant, "theme changed");
                        scope.update_state(|s| SettingsState {
                            is_loading: false,
                            theme_variant: variant,
                            ..s
                        });
                        scope.send_effect(SettingsEffect::ShowSuccess(format!(
                            "Theme set to {variant}"
                        )));
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }

            SettingsEvent::ResetToDefaults => {
                Self::start_loading(scope);
                let res = self
                    .with_prefs(|p| {
                        let defaults = ThemeSettings::default();
                        p.set_dark_mode(defaults.dark_mode)?;
                        p.set_theme_variant(defaults.variant)?;
                        Ok(())
                    })
                    .await
                    .context("failed to reset theme");
                match res {
                    Ok(()) => {
                        scope.update_state(|_| SettingsState::default());
                        scope.send_effect(SettingsEffect::ShowSuccess(
                            "Settings restored to defaults".into(),
                        ));
                    }
                    Err(e) => Self::fail(scope, e),
                }
            }
        }
        Ok(())
    }

    fn recover(state: SettingsState) -> SettingsState {
        SettingsState {
            is_loading: false,
            ..state
        }
    }
}
