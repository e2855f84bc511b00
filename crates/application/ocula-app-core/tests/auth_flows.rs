use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use ocula_app_core::{AuthController, AuthEffect, AuthEvent, AuthState, StateContainer};
use ocula_core::{Credentials, Registration, User, UserRole};
use ocula_repository::mock::{Account, MockAuthRepository};
use ocula_repository::seed::{DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD};
use ocula_repository::{AuthRepository, Latency, RepoResult};
use tokio::sync::mpsc::error::TryRecvError;
use tokio::sync::{watch, Notify};

fn admin() -> User {
    User {
        id: "u-1".into(),
        full_name: "Avery Admin".into(),
        email: DEMO_ADMIN_EMAIL.into(),
        role: UserRole::Admin,
        customer_id: None,
    }
}

fn controller(repo: impl AuthRepository) -> StateContainer<AuthController> {
    StateContainer::spawn(AuthController::new(Arc::new(repo)))
}

/// Delegates to a mock and counts every call that reaches it.
struct CountingAuth {
    inner: MockAuthRepository,
    calls: Arc<AtomicUsize>,
}

#[async_trait::async_trait]
impl AuthRepository for CountingAuth {
    async fn login(&self, credentials: &Credentials) -> RepoResult<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.login(credentials).await
    }
    async fn register(&self, registration: &Registration) -> RepoResult<User> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.register(registration).await
    }
    async fn logout(&self) -> RepoResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.logout().await
    }
    async fn request_password_reset(&self, email: &str) -> RepoResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.request_password_reset(email).await
    }
    fn current_user(&self) -> Option<User> {
        self.inner.current_user()
    }
    fn observe_session(&self) -> watch::Receiver<Option<User>> {
        self.inner.observe_session()
    }
}

/// Holds every login until the test opens the gate.
struct GatedAuth {
    inner: MockAuthRepository,
    gate: Arc<Notify>,
}

#[async_trait::async_trait]
impl AuthRepository for GatedAuth {
    async fn login(&self, credentials: &Credentials) -> RepoResult<User> {
        self.gate.notified().await;
        self.inner.login(credentials).await
    }
    async fn register(&self, registration: &Registration) -> RepoResult<User> {
        self.inner.register(registration).await
    }
    async fn logout(&self) -> RepoResult<()> {
        self.inner.logout().await
    }
    async fn request_password_reset(&self, email: &str) -> RepoResult<()> {
        self.inner.request_password_reset(email).await
    }
    fn current_user(&self) -> Option<User> {
        self.inner.current_user()
    }
    fn observe_session(&self) -> watch::Receiver<Option<User>> {
        self.inner.observe_session()
    }
}

#[tokio::test]
async fn wrong_password_sets_error_without_navigation() {
    let auth = controller(MockAuthRepository::seeded(Latency::NONE));
    let mut effects = auth.subscribe_effects();

    auth.handle_event(AuthEvent::Login(Credentials::new(DEMO_ADMIN_EMAIL, "wrongpass")));
    let s = auth.wait_for(|s| s.error.is_some()).await.unwrap();

    assert!(!s.is_loading);
    assert!(!s.is_authenticated);
    assert!(s.user.is_none());
    assert_eq!(s.error.as_deref(), Some("Invalid credentials"));
    assert!(matches!(effects.try_recv(), Err(TryRecvError::Empty)));
}

#[tokio::test]
async fn correct_password_navigates_home_then_greets() {
    let repo = MockAuthRepository::new(vec![Account::new(admin(), "correctpass")], Latency::NONE);
    let auth = controller(repo);
    let mut effects = auth.subscribe_effects();

    auth.handle_event(AuthEvent::Login(Credentials::new(
        DEMO_ADMIN_EMAIL,
        "correctpass",
    )));
    let s = auth.wait_for(|s| s.is_authenticated).await.unwrap();

    assert!(!s.is_loading);
    assert_eq!(s.user, Some(admin()));
    assert_eq!(s.error, None);
    assert_eq!(effects.recv().await.unwrap(), AuthEffect::NavigateToHome);
    assert_eq!(
        effects.recv().await.unwrap(),
        AuthEffect::ShowSuccess("Welcome back, Avery Admin".into())
    );
}

async fn logout_and_settle(auth: &StateContainer<AuthController>) -> AuthState {
    let mut effects = auth.subscribe_effects();
    auth.handle_event(AuthEvent::Logout);
    assert_eq!(effects.recv().await.unwrap(), AuthEffect::NavigateToLogin);
    auth.state()
}

#[tokio::test]
async fn logout_is_idempotent() {
    let fresh = controller(MockAuthRepository::seeded(Latency::NONE));
    let never_logged_in = logout_and_settle(&fresh).await;

    let used = controller(MockAuthRepository::seeded(Latency::NONE));
    used.handle_event(AuthEvent::Login(Credentials::new(
        DEMO_ADMIN_EMAIL,
        DEMO_ADMIN_PASSWORD,
    )));
    used.wait_for(|s| s.is_authenticated).await.unwrap();
    let first = logout_and_settle(&used).await;
    let second = logout_and_settle(&used).await;

    assert_eq!(never_logged_in, AuthState::default());
    assert_eq!(first, AuthState::default());
    assert_eq!(second, AuthState::default());
}

#[tokio::test]
async fn invalid_input_never_reaches_the_repository() {
    let calls = Arc::new(AtomicUsize::new(0));
    let auth = controller(CountingAuth {
        inner: MockAuthRepository::seeded(Latency::NONE),
        calls: calls.clone(),
    });

    auth.handle_event(AuthEvent::Login(Credentials::new("", "")));
    let s = auth.wait_for(|s| s.error.is_some()).await.unwrap();
    assert_eq!(s.error.as_deref(), Some("Email and password are required"));
    assert!(!s.is_loading);

    auth.handle_event(AuthEvent::ClearError);
    auth.handle_event(AuthEvent::Login(Credentials::new("not-an-email", "secret1")));
    auth.wait_for(|s| s.error.as_deref() == Some("Enter a valid email address"))
        .await
        .unwrap();

    auth.handle_event(AuthEvent::ClearError);
    auth.handle_event(AuthEvent::Register(Registration {
        full_name: "Sam".into(),
        email: "sam@example.test".into(),
        password: "secret1".into(),
        confirm_password: "secret2".into(),
    }));
    let s = auth
        .wait_for(|s| s.error.as_deref() == Some("Passwords do not match"))
        .await
        .unwrap();
    assert!(!s.is_authenticated);

    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn loading_flag_spans_the_repository_call() {
    let gate = Arc::new(Notify::new());
    let auth = controller(GatedAuth {
        inner: MockAuthRepository::seeded(Latency::NONE),
        gate: gate.clone(),
    });

    auth.handle_event(AuthEvent::Login(Credentials::new(
        DEMO_ADMIN_EMAIL,
        DEMO_ADMIN_PASSWORD,
    )));
    let pending = auth.wait_for(|s| s.is_loading).await.unwrap();
    assert!(!pending.is_authenticated);

    gate.notify_one();
    let done = auth.wait_for(|s| !s.is_loading).await.unwrap();
    assert!(done.is_authenticated);
}

#[tokio::test]
async fn restore_session_picks_up_an_existing_login() {
    let repo = Arc::new(MockAuthRepository::seeded(Latency::NONE));
    repo.login(&Credentials::new(DEMO_ADMIN_EMAIL, DEMO_ADMIN_PASSWORD))
        .await
        .unwrap();

    let auth = StateContainer::spawn(AuthController::new(repo));
    auth.handle_event(AuthEvent::RestoreSession);
    let s = auth.wait_for(|s| s.is_authenticated).await.unwrap();
    assert_eq!(s.user.unwrap().email, DEMO_ADMIN_EMAIL);
}

#[tokio::test]
async fn password_reset_marks_the_request_sent() {
    let auth = controller(MockAuthRepository::seeded(Latency::NONE));
    auth.handle_event(AuthEvent::RequestPasswordReset {
        email: "nobody@example.test".into(),
    });
    let s = auth.wait_for(|s| s.password_reset_sent).await.unwrap();
    assert!(!s.is_loading);
    assert_eq!(s.error, None);
}
