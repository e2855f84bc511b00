#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("{entity} '{id}' not found")]
    NotFound { entity: &'static str, id: String },
    #[error("{entity} '{key}' already exists")]
    Duplicate { entity: &'static str, key: String },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RepositoryErrorKind {
    Auth,
    Missing,
    Conflict,
    Backend,
}

impl RepositoryError {
    pub fn kind(&self) -> RepositoryErrorKind {
        match self {
            RepositoryError::InvalidCredentials => RepositoryErrorKind::Auth,
            RepositoryError::NotFound { .. } => RepositoryErrorKind::Missing,
            RepositoryError::Duplicate { .. } => RepositoryErrorKind::Conflict,
            RepositoryError::Unavailable(_) => RepositoryErrorKind::Backend,
        }
    }

    pub(crate) fn not_found(entity: &'static str, id: &str) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }
}

pub type RepoResult<T> = Result<T, RepositoryError>;
