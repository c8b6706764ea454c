use serde::Serialize;

use crate::model::section::{SectionType, StoreSection};
use crate::model::settings::*;
use crate::model::styles::{Animation, BackgroundGradient, GlobalStyles, SectionStyles};

// ---------------------------------------------------------------------------
// Static catalog: default settings, section templates and theme presets
// ---------------------------------------------------------------------------

/// The default-settings table entry for `section_type`.
pub fn default_settings(section_type: SectionType) -> SectionSettings {
    SectionSettings::default_for(section_type)
}

/// A predefined, pre-filled section offered in the template picker.
#[derive(Debug, Clone, Serialize)]
pub struct SectionTemplate {
    pub id: &'static str,
    pub name: &'static str,
    #[serde(rename = "type")]
    pub section_type: SectionType,
    pub settings: SectionSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub styles: Option<SectionStyles>,
}

impl SectionTemplate {
    fn new(id: &'static str, name: &'static str, settings: SectionSettings) -> Self {
        Self {
            id,
            name,
            section_type: settings.section_type(),
            settings,
            styles: None,
        }
    }

    fn styled(mut self, styles: SectionStyles) -> Self {
        self.styles = Some(styles);
        self
    }

    /// A new section cloned from this template's payload.
    pub fn instantiate(&self, order: usize) -> StoreSection {
        let mut section = StoreSection::with_settings(self.settings.clone(), order);
        section.styles = self.styles.clone();
        section
    }
}

pub fn section_templates() -> Vec<SectionTemplate> {
    vec![
        SectionTemplate::new(
            "hero-sale",
            "Sale Banner",
            SectionSettings::Hero(HeroSettings {
                heading: "Mega Sale: Up to 50% Off".to_string(),
                subheading: "Limited time offer on all digital products".to_string(),
                bg_color: "#dc2626".to_string(),
                button_text: "Grab the Deal".to_string(),
                ..Default::default()
            }),
        )
        .styled(SectionStyles {
            background_gradient: Some(BackgroundGradient {
                from: "#dc2626".to_string(),
                to: "#f59e0b".to_string(),
                direction: "135deg".to_string(),
            }),
            animation: Some(Animation::FadeIn),
            ..Default::default()
        }),
        SectionTemplate::new(
            "hero-minimal",
            "Minimal Hero",
            SectionSettings::Hero(HeroSettings {
                heading: "Simple. Digital. Instant.".to_string(),
                subheading: String::new(),
                bg_color: "#ffffff".to_string(),
                text_color: "#111827".to_string(),
                alignment: "left".to_string(),
                ..Default::default()
            }),
        ),
        SectionTemplate::new(
            "products-bestsellers",
            "Bestsellers",
            SectionSettings::FeaturedProducts(FeaturedProductsSettings {
                title: "Bestsellers".to_string(),
                subtitle: "Our most popular products this month".to_string(),
                max_products: 8,
                layout: "grid".to_string(),
                ..Default::default()
            }),
        ),
        SectionTemplate::new(
            "faq-digital-delivery",
            "Digital Delivery FAQ",
            SectionSettings::Faq(FaqSettings {
                title: "Delivery & Access".to_string(),
                items: vec![
                    FaqItem {
                        question: "When will I get my product?".to_string(),
                        answer: "Immediately after payment, in your library and by email."
                            .to_string(),
                    },
                    FaqItem {
                        question: "Is my payment secure?".to_string(),
                        answer: "Payments are processed by the marketplace escrow.".to_string(),
                    },
                    FaqItem {
                        question: "What if the key does not work?".to_string(),
                        answer: "Open a support chat and we will replace it.".to_string(),
                    },
                ],
            }),
        ),
        SectionTemplate::new(
            "cta-newsletter",
            "Newsletter Signup",
            SectionSettings::Cta(CtaSettings {
                heading: "Never miss a drop".to_string(),
                description: "Follow the store to hear about new products first.".to_string(),
                button_text: "Follow Store".to_string(),
                button_link: "#follow".to_string(),
                ..Default::default()
            }),
        ),
        SectionTemplate::new(
            "stats-social-proof",
            "Social Proof",
            SectionSettings::Stats(StatsSettings {
                title: "Trusted by Gamers".to_string(),
                ..Default::default()
            }),
        ),
        SectionTemplate::new(
            "testimonials-reviews",
            "Customer Reviews",
            SectionSettings::Testimonials(TestimonialsSettings {
                title: "Reviews".to_string(),
                items: vec![
                    Testimonial {
                        name: "Alex".to_string(),
                        text: "Key arrived in seconds.".to_string(),
                        rating: 5,
                    },
                    Testimonial {
                        name: "Sam".to_string(),
                        text: "Great prices, will buy again.".to_string(),
                        rating: 4,
                    },
                ],
            }),
        ),
    ]
}

pub fn find_template(id: &str) -> Option<SectionTemplate> {
    section_templates().into_iter().find(|t| t.id == id)
}

// ---------------------------------------------------------------------------
// Theme presets
// ---------------------------------------------------------------------------

/// A bundle of global styles and initial sections applied in one step.
#[derive(Debug, Clone, Serialize)]
pub struct ThemePreset {
    pub id: &'static str,
    pub name: &'static str,
    pub global_styles: GlobalStyles,
    #[serde(rename = "sections")]
    pub seeds: Vec<SectionSettings>,
}

impl ThemePreset {
    /// Fresh sections for this preset, ordered 0..N-1.
    pub fn sections(&self) -> Vec<StoreSection> {
        self.seeds
            .iter()
            .enumerate()
            .map(|(order, settings)| StoreSection::with_settings(settings.clone(), order))
            .collect()
    }
}

fn palette(primary: &str, secondary: &str, background: &str, text: &str, font: &str) -> GlobalStyles {
    GlobalStyles {
        primary_color: primary.to_string(),
        secondary_color: secondary.to_string(),
        background_color: background.to_string(),
        text_color: text.to_string(),
        font_family: font.to_string(),
    }
}

pub fn theme_presets() -> Vec<ThemePreset> {
    use SectionType::*;
    let defaults = |types: &[SectionType]| types.iter().map(|t| default_settings(*t)).collect();

    vec![
        ThemePreset {
            id: "minimal",
            name: "Minimal",
            global_styles: palette("#111827", "#6b7280", "#ffffff", "#111827", "Inter"),
            seeds: defaults(&[Hero, ProductGrid, About]),
        },
        ThemePreset {
            id: "bold",
            name: "Bold",
            global_styles: palette("#dc2626", "#f59e0b", "#0f0f0f", "#fafafa", "Montserrat"),
            seeds: defaults(&[Hero, FeaturedProducts, Stats, Cta]),
        },
        ThemePreset {
            id: "elegant",
            name: "Elegant",
            global_styles: palette("#a16207", "#78716c", "#fafaf9", "#1c1917", "Playfair Display"),
            seeds: defaults(&[Hero, About, FeaturedProducts, Testimonials, Faq]),
        },
        ThemePreset {
            id: "neon",
            name: "Neon Gamer",
            global_styles: palette("#22d3ee", "#a855f7", "#030712", "#e5e7eb", "Orbitron"),
            seeds: defaults(&[
                Hero,
                TrustBadges,
                FeaturedProducts,
                CategoryShowcase,
                ProductGrid,
                SocialLinks,
            ]),
        },
    ]
}

pub fn find_preset(id: &str) -> Option<ThemePreset> {
    theme_presets().into_iter().find(|p| p.id == id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_template_ids_are_unique() {
        let templates = section_templates();
        let ids: HashSet<&str> = templates.iter().map(|t| t.id).collect();
        assert_eq!(ids.len(), templates.len());
    }

    #[test]
    fn test_template_instantiate_uses_fresh_ids() {
        let template = find_template("hero-sale").unwrap();
        let a = template.instantiate(0);
        let b = template.instantiate(1);
        assert_ne!(a.id, b.id);
        assert_eq!(a.section_type(), SectionType::Hero);
        assert!(a.styles.is_some());
        assert_eq!(b.order, 1);
    }

    #[test]
    fn test_preset_sections_are_dense() {
        for preset in theme_presets() {
            let sections = preset.sections();
            for (i, section) in sections.iter().enumerate() {
                assert_eq!(section.order, i, "preset {}", preset.id);
            }
        }
    }

    #[test]
    fn test_template_serializes_with_type_tag() {
        let value = serde_json::to_value(find_template("cta-newsletter").unwrap()).unwrap();
        assert_eq!(value["type"], "cta");
        assert_eq!(value["settings"]["buttonText"], "Follow Store");
    }

    #[test]
    fn test_unknown_lookups() {
        assert!(find_template("nope").is_none());
        assert!(find_preset("nope").is_none());
    }
}
