use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use uuid::Uuid;

use crate::error::{BuilderError, BuilderResult};
use crate::model::catalog::ThemePreset;
use crate::model::section::StoreSection;
use crate::model::styles::GlobalStyles;
use crate::model::version::VersionSnapshot;

/// Identifier assigned by the document store on first save.
pub type DocumentId = Uuid;

/// Theme preset name of a document created from scratch.
pub const BLANK_PRESET: &str = "blank";

// ---------------------------------------------------------------------------
// Document: the persisted storefront design of one seller
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// `None` until the store has inserted the document.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<DocumentId>,
    pub seller_id: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default = "default_preset")]
    pub theme_preset: String,
    #[serde(default)]
    pub global_styles: GlobalStyles,
    /// Ordered by `order` ascending.
    #[serde(default)]
    pub sections: Vec<StoreSection>,
    /// Newest first.
    #[serde(default)]
    pub version_history: Vec<VersionSnapshot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

fn default_preset() -> String {
    BLANK_PRESET.to_string()
}

impl Document {
    /// An empty, unpublished design.
    pub fn new(seller_id: impl Into<String>) -> Self {
        Self {
            id: None,
            seller_id: seller_id.into(),
            is_active: false,
            theme_preset: default_preset(),
            global_styles: GlobalStyles::default(),
            sections: Vec::new(),
            version_history: Vec::new(),
            updated_at: None,
        }
    }

    /// A design seeded from a theme preset.
    pub fn from_preset(seller_id: impl Into<String>, preset: &ThemePreset) -> Self {
        Self {
            theme_preset: preset.id.to_string(),
            global_styles: preset.global_styles.clone(),
            sections: preset.sections(),
            ..Self::new(seller_id)
        }
    }

    /// Sections that appear on the published storefront, in render order.
    pub fn published_sections(&self) -> Vec<&StoreSection> {
        let mut visible: Vec<&StoreSection> = self.sections.iter().filter(|s| s.visible).collect();
        visible.sort_by_key(|s| s.order);
        visible
    }

    /// Copy of this document keeping only the visible sections.
    pub fn published_view(&self) -> Self {
        Self {
            sections: self.published_sections().into_iter().cloned().collect(),
            version_history: Vec::new(),
            ..self.clone()
        }
    }

    /// Sort sections by `order` so the vector index matches render position.
    pub fn normalize(&mut self) {
        self.sections.sort_by_key(|s| s.order);
    }

    /// Check the structural invariants of a document received from outside:
    /// unique section ids and dense 0..N-1 ordering.
    pub fn validate(&self) -> BuilderResult<()> {
        if self.seller_id.trim().is_empty() {
            return Err(BuilderError::InvalidDocument("seller_id is empty".to_string()));
        }

        let mut ids = HashSet::new();
        for section in &self.sections {
            if !ids.insert(section.id.as_str()) {
                return Err(BuilderError::InvalidDocument(format!(
                    "duplicate section id {}",
                    section.id
                )));
            }
        }

        let mut orders: Vec<usize> = self.sections.iter().map(|s| s.order).collect();
        orders.sort_unstable();
        if orders.iter().enumerate().any(|(i, order)| i != *order) {
            return Err(BuilderError::InvalidDocument(format!(
                "section order is not a dense 0..{} sequence: {:?}",
                self.sections.len(),
                orders
            )));
        }

        Ok(())
    }
}
