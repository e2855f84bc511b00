use ocula_core::{Credentials, Registration, User, UserRole};
use tokio::sync::watch;
use tracing::{debug, info};

use crate::{AuthRepository, Latency, ObservableList, RepoResult, RepositoryError};

#[derive(Clone)]
pub struct Account {
    pub user: User,
    password: String,
}

impl Account {
    pub fn new(user: User, password: impl Into<String>) -> Self {
        Self {
            user,
            password: password.into(),
        }
    }

    fn matches(&self, credentials: &Credentials) -> bool {
        self.user
            .email
            .eq_ignore_ascii_case(credentials.email.trim())
            && self.password == credentials.password
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("user", &self.user)
            .finish_non_exhaustive()
    }
}

pub struct MockAuthRepository {
    accounts: ObservableList<Account>,
    session: watch::Sender<Option<User>>,
    latency: Latency,
}

impl MockAuthRepository {
    pub fn new(accounts: Vec<Account>, latency: Latency) -> Self {
        let (session, _rx) = watch::channel(None);
        Self {
            accounts: ObservableList::new(accounts),
            session,
            latency,
        }
    }

    pub fn seeded(latency: Latency) -> Self {
        Self::new(crate::seed::demo_accounts(), latency)
    }
}

#[async_trait::async_trait]
impl AuthRepository for MockAuthRepository {
    async fn login(&self, credentials: &Credentials) -> RepoResult<User> {
        self.latency.simulate().await;
        let user = self.accounts.query(|accounts| {
            accounts
                .iter()
                .find(|a| a.matches(credentials))
                .map(|a| a.user.clone())
        });
        match user {
            Some(user) => {
                info!(user_id = %user.id, "login accepted");
                self.session.send_replace(Some(user.clone()));
                Ok(user)
            }
            None => {
                debug!(email = %credentials.email, "login rejected");
                Err(RepositoryError::InvalidCredentials)
            }
        }
    }

    async fn register(&self, registration: &Registration) -> RepoResult<User> {
        self.latency.simulate().await;
        let email = registration.email.trim().to_string();
        let user = self.accounts.try_update(|accounts| {
            if accounts
                .iter()
                .any(|a| a.user.email.eq_ignore_ascii_case(&email))
            {
                return Err(RepositoryError::Duplicate {
                    entity: "Account",
                    key: email.clone(),
                });
            }
            let user = User {
                id: super::new_id(),
                full_name: registration.full_name.trim().to_string(),
                email: email.clone(),
                role: UserRole::Patient,
                customer_id: None,
            };
            accounts.push(Account::new(user.clone(), registration.password.clone()));
            Ok(user)
        })?;
        info!(user_id = %user.id, "account registered");
        self.session.send_replace(Some(user.clone()));
        Ok(user)
    }

    async fn logout(&self) -> RepoResult<()> {
        self.latency.simulate().await;
        self.session.send_replace(None);
        Ok(())
    }

    async fn request_password_reset(&self, email: &str) -> RepoResult<()> {
        self.latency.simulate().await;
        // Same answer for known and unknown addresses.
        debug!(%email, "password reset requested");
        Ok(())
    }

    fn current_user(&self) -> Option<User> {
        self.session.borrow().clone()
    }

    fn observe_session(&self) -> watch::Receiver<Option<User>> {
        self.session.subscribe()
    }
}
