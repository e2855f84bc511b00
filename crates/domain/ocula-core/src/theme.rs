use serde::{Deserialize, Serialize};

/// Colour scheme selectable in settings. Stored by its identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ThemeVariant {
    #[default]
    Ocean,
    Forest,
    Sunset,
    Monochrome,
}

impl ThemeVariant {
    pub const ALL: [ThemeVariant; 4] = [
        ThemeVariant::Ocean,
        ThemeVariant::Forest,
        ThemeVariant::Sunset,
        ThemeVariant::Monochrome,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::Ocean => "ocean",
            Self::Forest => "forest",
            Self::Sunset => "sunset",
            Self::Monochrome => "monochrome",
        }
    }

    /// Strict lookup by identifier.
    pub fn from_id(id: &str) -> Option<Self> {
        let id = id.trim();
        Self::ALL.into_iter().find(|v| v.id().eq_ignore_ascii_case(id))
    }

    /// Lenient lookup used when reading stored preferences; unknown values
    /// resolve to the default variant.
    pub fn from_id_or_default(id: &str) -> Self {
        Self::from_id(id).unwrap_or_default()
    }
}

impl std::fmt::Display for ThemeVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}
