use std::sync::Arc;

use ocula_core::validation::{validate_credentials, validate_email, validate_registration};
use ocula_core::{Credentials, Registration, User};
use ocula_repository::AuthRepository;
use tracing::{error, info, warn};

use crate::app_core::{Controller, HandlerError, Scope};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AuthState {
    pub is_loading: bool,
    pub is_authenticated: bool,
    pub user: Option<User>,
    pub error: Option<String>,
    pub password_reset_sent: bool,
}

#[derive(Debug)]
pub enum AuthEvent {
    Login(Credentials),
    Register(Registration),
    RequestPasswordReset { email: String },
    Logout,
    RestoreSession,
    ClearError,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEffect {
    NavigateToHome,
    NavigateToLogin,
    ShowSuccess(String),
    ShowError(String),
}

type AuthScope = Scope<AuthState, AuthEffect>;

pub struct AuthController {
    repo: Arc<dyn AuthRepository>,
}

impl AuthController {
    pub fn new(repo: Arc<dyn AuthRepository>) -> Self {
        Self { repo }
    }

    async fn login(&self, credentials: Credentials, scope: &AuthScope) {
        if let Err(e) = validate_credentials(&credentials) {
            scope.update_state(|s| AuthState {
                error: Some(e.to_string()),
                ..s
            });
            return;
        }

        scope.update_state(|s| AuthState {
            is_loading: true,
            error: None,
            ..s
        });

        match self.repo.login(&credentials).await {
            Ok(user) => {
                let greeting = format!("Welcome back, {}", user.full_name);
                scope.update_state(|s| AuthState {
                    is_loading: false,
                    is_authenticated: true,
                    user: Some(user),
                    error: None,
                    ..s
                });
                scope.send_effect(AuthEffect::NavigateToHome);
                scope.send_effect(AuthEffect::ShowSuccess(greeting));
            }
            Err(e) => {
                scope.update_state(|s| AuthState {
                    is_loading: false,
                    is_authenticated: false,
                    user: None,
                    error: Some(e.to_string()),
                    ..s
                });
            }
        }
    }

    async fn register(&self, registration: Registration, scope: &AuthScope) {
        if let Err(e) = validate_registration(&registration) {
            scope.update_state(|s| AuthState {
                error: Some(e.to_string()),
                ..s
            });
            return;
        }

        scope.update_state(|s| AuthState {
            is_loading: true,
            error: None,
            ..s
        });

        match self.repo.register(&registration).await {
            Ok(user) => {
                info!(user_id = %user.id, "registered");
                scope.update_state(|s| AuthState {
                    is_loading: false,
                    is_authenticated: true,
                    user: Some(user),
                    error: None,
                    ..s
                });
                scope.send_effect(AuthEffect::NavigateToHome);
                scope.send_effect(AuthEffect::ShowSuccess("Account created".into()));
            }
            Err(e) => {
                scope.update_state(|s| AuthState {
                    is_loading: false,
                    error: Some(e.to_string()),
                    ..s
                });
            }
        }
    }

    async fn request_password_reset(&self, email: String, scope: &AuthScope) {
        if let Err(e) = validate_email(&email) {
            scope.update_state(|s| AuthState {
                error: Some(e.to_string()),
                ..s
            });
            return;
        }

        scope.update_state(|s| AuthState {
            is_loading: true,
            error: None,
            password_reset_sent: false,
            ..s
        });

        match self.repo.request_password_reset(email.trim()).await {
            Ok(()) => {
                scope.update_state(|s| AuthState {
                    is_loading: false,
                    password_reset_sent: true,
                    ..s
                });
                scope.send_effect(AuthEffect::ShowSuccess(
                    "Password reset link sent".into(),
                ));
            }
            Err(e) => {
                let message = e.to_string();
                scope.update_state(|s| AuthState {
                    is_loading: false,
                    error: Some(message.clone()),
                    ..s
                });
                scope.send_effect(AuthEffect::ShowError(message));
            }
        }
    }

    async fn logout(&self, scope: &AuthScope) {
        scope.update_state(|s| AuthState {
            is_loading: true,
            ..s
        });

        match self.repo.logout().await {
            Ok(()) => info!("signed out"),
            // The local session is cleared either way.
            Err(e) => warn!(error = %e, "remote logout failed"),
        }

        scope.update_state(|_| AuthState::default());
        scope.send_effect(AuthEffect::NavigateToLogin);
    }

    fn restore_session(&self, scope: &AuthScope) {
        if let Some(user) = self.repo.current_user() {
            scope.update_state(|s| AuthState {
                is_authenticated: true,
                user: Some(user),
                ..s
            });
            scope.send_effect(AuthEffect::NavigateToHome);
        }
    }
}

#[async_trait::async_trait]
impl Controller for AuthController {
    type State = AuthState;
    type Event = AuthEvent;
    type Effect = AuthEffect;

    const NAME: &'static str = "auth";

    async fn on_event(&mut self, event: AuthEvent, scope: &AuthScope) -> anyhow::Result<()> {
        match event {
            AuthEvent::Login(credentials) => self.login(credentials, scope).await,
            AuthEvent::Register(registration) => self.register(registration, scope).await,
            AuthEvent::RequestPasswordReset { email } => {
                self.request_password_reset(email, scope).await
            }
            AuthEvent::Logout => self.logout(scope).await,
            AuthEvent::RestoreSession => self.restore_session(scope),
            AuthEvent::ClearError => scope.update_state(|s| AuthState { error: None, ..s }),
        }
        Ok(())
    }

    fn on_error(&mut self, event: &str, err: HandlerError, scope: &AuthScope) {
        error!(controller = Self::NAME, %event, error = %err, "event handler failed");
        scope.send_effect(AuthEffect::ShowError("Something went wrong".into()));
    }

    fn recover(state: AuthState) -> AuthState {
        AuthState {
            is_loading: false,
            ..state
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_state_is_signed_out() {
        let s = AuthState::default();
        assert!(!s.is_loading);
        assert!(!s.is_authenticated);
        assert!(s.user.is_none());
        assert!(s.error.is_none());
    }

    #[test]
    fn recover_clears_loading_and_keeps_the_rest() {
        let s = AuthController::recover(AuthState {
            is_loading: true,
            error: Some("Invalid credentials".into()),
            ..AuthState::default()
        });
        assert!(!s.is_loading);
        assert_eq!(s.error.as_deref(), Some("Invalid credentials"));
    }
}
