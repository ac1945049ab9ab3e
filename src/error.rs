//! Error types for the editor core.

use core::fmt;

/// Editor-level failure.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EditorError {
    /// Export was requested before any image was loaded.
    MissingImage,
    /// Config document could not be parsed.
    ConfigParse(String),
    /// Config parsed but holds values the layout cannot use.
    InvalidConfig(&'static str),
}

impl fmt::Display for EditorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingImage => write!(f, "no image loaded; upload an image first"),
            Self::ConfigParse(msg) => write!(f, "config parse failed: {}", msg),
            Self::InvalidConfig(reason) => write!(f, "invalid config: {}", reason),
        }
    }
}

impl std::error::Error for EditorError {}

#[cfg(test)]
mod tests {
    use super::EditorError;

    #[test]
    fn display_is_user_facing() {
        assert_eq!(
            EditorError::MissingImage.to_string(),
            "no image loaded; upload an image first"
        );
        assert_eq!(
            EditorError::InvalidConfig("zoom").to_string(),
            "invalid config: zoom"
        );
    }
}
