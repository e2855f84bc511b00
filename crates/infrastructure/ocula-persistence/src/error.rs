#[derive(Debug, thiserror::Error)]
pub enum PreferenceError {
    #[error("could not determine config directory")]
    NoConfigDir,
    #[error("preference store lock poisoned")]
    Poisoned,
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}
