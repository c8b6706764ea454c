use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::BuilderError;
use crate::model::settings::SectionSettings;
use crate::model::styles::SectionStyles;

// ---------------------------------------------------------------------------
// SectionId
// ---------------------------------------------------------------------------

/// Opaque section identifier, generated client-side.
pub type SectionId = String;

/// Generate a new section ID.
pub fn new_section_id() -> SectionId {
    Uuid::new_v4().to_string()
}

// ---------------------------------------------------------------------------
// SectionType: the fixed set of storefront blocks
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionType {
    Hero,
    FeaturedProducts,
    ProductGrid,
    About,
    Faq,
    Video,
    Gallery,
    Testimonials,
    Cta,
    Stats,
    SocialLinks,
    CategoryShowcase,
    TrustBadges,
    Divider,
    CustomText,
}

impl SectionType {
    pub const ALL: [SectionType; 15] = [
        SectionType::Hero,
        SectionType::FeaturedProducts,
        SectionType::ProductGrid,
        SectionType::About,
        SectionType::Faq,
        SectionType::Video,
        SectionType::Gallery,
        SectionType::Testimonials,
        SectionType::Cta,
        SectionType::Stats,
        SectionType::SocialLinks,
        SectionType::CategoryShowcase,
        SectionType::TrustBadges,
        SectionType::Divider,
        SectionType::CustomText,
    ];

    /// The wire name of this type (`featured_products`, `cta`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            SectionType::Hero => "hero",
            SectionType::FeaturedProducts => "featured_products",
            SectionType::ProductGrid => "product_grid",
            SectionType::About => "about",
            SectionType::Faq => "faq",
            SectionType::Video => "video",
            SectionType::Gallery => "gallery",
            SectionType::Testimonials => "testimonials",
            SectionType::Cta => "cta",
            SectionType::Stats => "stats",
            SectionType::SocialLinks => "social_links",
            SectionType::CategoryShowcase => "category_showcase",
            SectionType::TrustBadges => "trust_badges",
            SectionType::Divider => "divider",
            SectionType::CustomText => "custom_text",
        }
    }

    /// Label shown in the section picker.
    pub fn label(&self) -> &'static str {
        match self {
            SectionType::Hero => "Hero Banner",
            SectionType::FeaturedProducts => "Featured Products",
            SectionType::ProductGrid => "Product Grid",
            SectionType::About => "About",
            SectionType::Faq => "FAQ",
            SectionType::Video => "Video",
            SectionType::Gallery => "Gallery",
            SectionType::Testimonials => "Testimonials",
            SectionType::Cta => "Call to Action",
            SectionType::Stats => "Stats",
            SectionType::SocialLinks => "Social Links",
            SectionType::CategoryShowcase => "Category Showcase",
            SectionType::TrustBadges => "Trust Badges",
            SectionType::Divider => "Divider",
            SectionType::CustomText => "Custom Text",
        }
    }
}

impl fmt::Display for SectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SectionType {
    type Err = BuilderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SectionType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| BuilderError::InvalidDocument(format!("unknown section type '{s}'")))
    }
}

// ---------------------------------------------------------------------------
// StoreSection
// ---------------------------------------------------------------------------

/// One configurable content block of a storefront page.
///
/// The section type is carried by the settings payload, so a section can never
/// hold settings that belong to another type. On the wire the type is a
/// separate `type` field next to a free-form `settings` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawSection", into = "RawSection")]
pub struct StoreSection {
    pub id: SectionId,
    /// Render position. Dense 0..N-1 across a document.
    pub order: usize,
    /// Hidden sections stay in the document but are not published.
    pub visible: bool,
    pub settings: SectionSettings,
    pub styles: Option<SectionStyles>,
}

impl StoreSection {
    /// Create a visible section with the default settings for `section_type`.
    pub fn new(section_type: SectionType, order: usize) -> Self {
        Self::with_settings(SectionSettings::default_for(section_type), order)
    }

    /// Create a visible section with the given settings payload.
    pub fn with_settings(settings: SectionSettings, order: usize) -> Self {
        Self {
            id: new_section_id(),
            order,
            visible: true,
            settings,
            styles: None,
        }
    }

    pub fn section_type(&self) -> SectionType {
        self.settings.section_type()
    }

    /// Deep copy under a fresh id.
    pub fn duplicate(&self) -> Self {
        Self {
            id: new_section_id(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct RawSection {
    id: SectionId,
    #[serde(rename = "type")]
    section_type: SectionType,
    order: usize,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default)]
    settings: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    styles: Option<SectionStyles>,
}

fn default_visible() -> bool {
    true
}

impl TryFrom<RawSection> for StoreSection {
    type Error = BuilderError;

    fn try_from(raw: RawSection) -> Result<Self, Self::Error> {
        let settings = SectionSettings::from_value(raw.section_type, raw.settings)?;
        Ok(Self {
            id: raw.id,
            order: raw.order,
            visible: raw.visible,
            settings,
            styles: raw.styles,
        })
    }
}

impl From<StoreSection> for RawSection {
    fn from(section: StoreSection) -> Self {
        Self {
            id: section.id,
            section_type: section.settings.section_type(),
            order: section.order,
            visible: section.visible,
            settings: section.settings.to_value(),
            styles: section.styles,
        }
    }
}
