use thiserror::Error;

use crate::model::SectionType;

/// Central error type for storefront builder operations.
#[derive(Error, Debug)]
pub enum BuilderError {
    #[error("Section not found: {0}")]
    SectionNotFound(String),

    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    #[error("Theme preset not found: {0}")]
    ThemePresetNotFound(String),

    #[error("Version not found: {0}")]
    VersionNotFound(String),

    #[error("Clipboard is empty")]
    ClipboardEmpty,

    #[error("Cannot paste {copied} settings onto a {target} section")]
    ClipboardTypeMismatch {
        copied: SectionType,
        target: SectionType,
    },

    #[error("Invalid settings for {section_type} section: {reason}")]
    InvalidSettings {
        section_type: SectionType,
        reason: String,
    },

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("No design document for seller {0}")]
    DocumentNotFound(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl BuilderError {
    /// Validation errors abort the operation without touching state and are
    /// reported to the user; everything else is a backend or runtime failure.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            BuilderError::SectionNotFound(_)
                | BuilderError::TemplateNotFound(_)
                | BuilderError::ThemePresetNotFound(_)
                | BuilderError::VersionNotFound(_)
                | BuilderError::ClipboardEmpty
                | BuilderError::ClipboardTypeMismatch { .. }
                | BuilderError::InvalidSettings { .. }
                | BuilderError::InvalidDocument(_)
        )
    }
}

/// Convenience type alias for builder results.
pub type BuilderResult<T> = Result<T, BuilderError>;
