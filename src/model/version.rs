use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::section::StoreSection;
use crate::model::styles::GlobalStyles;

// ---------------------------------------------------------------------------
// VersionSnapshot: named, restorable copies of the whole design
// ---------------------------------------------------------------------------

/// A version identifier, unique within a document's history.
pub type VersionId = String;

/// Generate a new version ID.
pub fn new_version_id() -> VersionId {
    format!("v-{}", Uuid::new_v4().as_simple())
}

/// A named checkpoint of the design. Never mutated once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionSnapshot {
    pub id: VersionId,
    pub name: String,
    pub timestamp: DateTime<Utc>,
    pub sections: Vec<StoreSection>,
    pub global_styles: GlobalStyles,
    pub theme_preset: String,
}

impl VersionSnapshot {
    /// Capture the given state under `name`.
    pub fn capture(
        name: impl Into<String>,
        sections: &[StoreSection],
        global_styles: &GlobalStyles,
        theme_preset: &str,
    ) -> Self {
        Self {
            id: new_version_id(),
            name: name.into(),
            timestamp: Utc::now(),
            sections: sections.to_vec(),
            global_styles: global_styles.clone(),
            theme_preset: theme_preset.to_string(),
        }
    }

    /// The automatic checkpoint taken right before publishing.
    pub fn pre_publish(
        sections: &[StoreSection],
        global_styles: &GlobalStyles,
        theme_preset: &str,
    ) -> Self {
        let now = Utc::now();
        let mut snapshot = Self::capture(
            format!("Pre-publish {}", now.to_rfc3339()),
            sections,
            global_styles,
            theme_preset,
        );
        snapshot.timestamp = now;
        snapshot
    }
}
