use serde::Serialize;

use crate::error::BuilderError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

/// A user-visible notification (toast).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.level == NoticeLevel::Error
    }
}

impl From<&BuilderError> for Notice {
    fn from(err: &BuilderError) -> Self {
        match err {
            BuilderError::ClipboardEmpty => Notice::info("Copy a section's settings first"),
            BuilderError::ClipboardTypeMismatch { copied, target } => Notice::error(format!(
                "Can only paste {} settings onto a {} section, not {}",
                copied.label(),
                copied.label(),
                target.label()
            )),
            BuilderError::Persistence(_) | BuilderError::SerializationError(_) => {
                Notice::error("Failed to save store design")
            }
            other => Notice::error(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SectionType;

    #[test]
    fn test_mismatch_notice_names_both_types() {
        let err = BuilderError::ClipboardTypeMismatch {
            copied: SectionType::Hero,
            target: SectionType::Faq,
        };
        let notice = Notice::from(&err);
        assert!(notice.is_error());
        assert!(notice.message.contains("Hero Banner"));
        assert!(notice.message.contains("FAQ"));
    }

    #[test]
    fn test_persistence_notice_hides_backend_detail() {
        let notice = Notice::from(&BuilderError::Persistence("socket closed".into()));
        assert_eq!(notice, Notice::error("Failed to save store design"));
    }
}
