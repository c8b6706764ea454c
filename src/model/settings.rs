use serde::{de::DeserializeOwned, Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};

use crate::error::{BuilderError, BuilderResult};
use crate::model::section::SectionType;

// ---------------------------------------------------------------------------
// SectionSettings: one payload shape per section type
// ---------------------------------------------------------------------------

/// Per-type settings of a storefront section.
///
/// The `Default` impl of each payload struct is the default-settings table
/// used when a section is added from the picker.
#[derive(Debug, Clone, PartialEq)]
pub enum SectionSettings {
    Hero(HeroSettings),
    FeaturedProducts(FeaturedProductsSettings),
    ProductGrid(ProductGridSettings),
    About(AboutSettings),
    Faq(FaqSettings),
    Video(VideoSettings),
    Gallery(GallerySettings),
    Testimonials(TestimonialsSettings),
    Cta(CtaSettings),
    Stats(StatsSettings),
    SocialLinks(SocialLinksSettings),
    CategoryShowcase(CategoryShowcaseSettings),
    TrustBadges(TrustBadgesSettings),
    Divider(DividerSettings),
    CustomText(CustomTextSettings),
}

impl SectionSettings {
    pub fn section_type(&self) -> SectionType {
        match self {
            SectionSettings::Hero(_) => SectionType::Hero,
            SectionSettings::FeaturedProducts(_) => SectionType::FeaturedProducts,
            SectionSettings::ProductGrid(_) => SectionType::ProductGrid,
            SectionSettings::About(_) => SectionType::About,
            SectionSettings::Faq(_) => SectionType::Faq,
            SectionSettings::Video(_) => SectionType::Video,
            SectionSettings::Gallery(_) => SectionType::Gallery,
            SectionSettings::Testimonials(_) => SectionType::Testimonials,
            SectionSettings::Cta(_) => SectionType::Cta,
            SectionSettings::Stats(_) => SectionType::Stats,
            SectionSettings::SocialLinks(_) => SectionType::SocialLinks,
            SectionSettings::CategoryShowcase(_) => SectionType::CategoryShowcase,
            SectionSettings::TrustBadges(_) => SectionType::TrustBadges,
            SectionSettings::Divider(_) => SectionType::Divider,
            SectionSettings::CustomText(_) => SectionType::CustomText,
        }
    }

    /// Default settings for a freshly added section of `section_type`.
    pub fn default_for(section_type: SectionType) -> Self {
        match section_type {
            SectionType::Hero => SectionSettings::Hero(Default::default()),
            SectionType::FeaturedProducts => SectionSettings::FeaturedProducts(Default::default()),
            SectionType::ProductGrid => SectionSettings::ProductGrid(Default::default()),
            SectionType::About => SectionSettings::About(Default::default()),
            SectionType::Faq => SectionSettings::Faq(Default::default()),
            SectionType::Video => SectionSettings::Video(Default::default()),
            SectionType::Gallery => SectionSettings::Gallery(Default::default()),
            SectionType::Testimonials => SectionSettings::Testimonials(Default::default()),
            SectionType::Cta => SectionSettings::Cta(Default::default()),
            SectionType::Stats => SectionSettings::Stats(Default::default()),
            SectionType::SocialLinks => SectionSettings::SocialLinks(Default::default()),
            SectionType::CategoryShowcase => SectionSettings::CategoryShowcase(Default::default()),
            SectionType::TrustBadges => SectionSettings::TrustBadges(Default::default()),
            SectionType::Divider => SectionSettings::Divider(Default::default()),
            SectionType::CustomText => SectionSettings::CustomText(Default::default()),
        }
    }

    /// Decode a free-form JSON settings object for the given type. Missing
    /// keys take their defaults; `null` yields the full default payload.
    pub fn from_value(section_type: SectionType, value: Value) -> BuilderResult<Self> {
        if value.is_null() {
            return Ok(Self::default_for(section_type));
        }

        fn decode<T: DeserializeOwned>(section_type: SectionType, value: Value) -> BuilderResult<T> {
            serde_json::from_value(value).map_err(|e| BuilderError::InvalidSettings {
                section_type,
                reason: e.to_string(),
            })
        }

        let settings = match section_type {
            SectionType::Hero => SectionSettings::Hero(decode(section_type, value)?),
            SectionType::FeaturedProducts => {
                SectionSettings::FeaturedProducts(decode(section_type, value)?)
            }
            SectionType::ProductGrid => SectionSettings::ProductGrid(decode(section_type, value)?),
            SectionType::About => SectionSettings::About(decode(section_type, value)?),
            SectionType::Faq => SectionSettings::Faq(decode(section_type, value)?),
            SectionType::Video => SectionSettings::Video(decode(section_type, value)?),
            SectionType::Gallery => SectionSettings::Gallery(decode(section_type, value)?),
            SectionType::Testimonials => {
                SectionSettings::Testimonials(decode(section_type, value)?)
            }
            SectionType::Cta => SectionSettings::Cta(decode(section_type, value)?),
            SectionType::Stats => SectionSettings::Stats(decode(section_type, value)?),
            SectionType::SocialLinks => SectionSettings::SocialLinks(decode(section_type, value)?),
            SectionType::CategoryShowcase => {
                SectionSettings::CategoryShowcase(decode(section_type, value)?)
            }
            SectionType::TrustBadges => SectionSettings::TrustBadges(decode(section_type, value)?),
            SectionType::Divider => SectionSettings::Divider(decode(section_type, value)?),
            SectionType::CustomText => SectionSettings::CustomText(decode(section_type, value)?),
        };
        Ok(settings)
    }

    /// Encode as the JSON object persisted under `settings`.
    pub fn to_value(&self) -> Value {
        // Plain structs of strings, numbers and vectors always encode.
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    /// Shallow-merge `patch` into these settings. The merged object must still
    /// decode for this section type.
    pub fn merge(&self, patch: &Map<String, Value>) -> BuilderResult<Self> {
        let section_type = self.section_type();
        let merged = merge_object(self.to_value(), patch);
        Self::from_value(section_type, merged)
    }
}

impl Serialize for SectionSettings {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            SectionSettings::Hero(s) => s.serialize(serializer),
            SectionSettings::FeaturedProducts(s) => s.serialize(serializer),
            SectionSettings::ProductGrid(s) => s.serialize(serializer),
            SectionSettings::About(s) => s.serialize(serializer),
            SectionSettings::Faq(s) => s.serialize(serializer),
            SectionSettings::Video(s) => s.serialize(serializer),
            SectionSettings::Gallery(s) => s.serialize(serializer),
            SectionSettings::Testimonials(s) => s.serialize(serializer),
            SectionSettings::Cta(s) => s.serialize(serializer),
            SectionSettings::Stats(s) => s.serialize(serializer),
            SectionSettings::SocialLinks(s) => s.serialize(serializer),
            SectionSettings::CategoryShowcase(s) => s.serialize(serializer),
            SectionSettings::TrustBadges(s) => s.serialize(serializer),
            SectionSettings::Divider(s) => s.serialize(serializer),
            SectionSettings::CustomText(s) => s.serialize(serializer),
        }
    }
}

/// Shallow merge: top-level keys of `patch` replace those of `base`.
pub(crate) fn merge_object(base: Value, patch: &Map<String, Value>) -> Value {
    let mut object = match base {
        Value::Object(map) => map,
        _ => Map::new(),
    };
    for (key, value) in patch {
        object.insert(key.clone(), value.clone());
    }
    Value::Object(object)
}

// ---------------------------------------------------------------------------
// Payload shapes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct HeroSettings {
    pub heading: String,
    pub subheading: String,
    pub bg_color: String,
    pub text_color: String,
    pub bg_image: Option<String>,
    pub button_text: String,
    pub button_link: String,
    pub alignment: String,
}

impl Default for HeroSettings {
    fn default() -> Self {
        Self {
            heading: "Welcome to My Store".to_string(),
            subheading: "Discover amazing digital products".to_string(),
            bg_color: "#1a1a2e".to_string(),
            text_color: "#ffffff".to_string(),
            bg_image: None,
            button_text: "Shop Now".to_string(),
            button_link: "#products".to_string(),
            alignment: "center".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FeaturedProductsSettings {
    pub title: String,
    pub subtitle: String,
    pub product_ids: Vec<String>,
    pub max_products: u32,
    pub show_price: bool,
    pub layout: String,
}

impl Default for FeaturedProductsSettings {
    fn default() -> Self {
        Self {
            title: "Featured Products".to_string(),
            subtitle: "Hand-picked favourites".to_string(),
            product_ids: Vec::new(),
            max_products: 4,
            show_price: true,
            layout: "carousel".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct ProductGridSettings {
    pub title: String,
    pub columns: u32,
    pub products_per_page: u32,
    pub show_filters: bool,
    pub sort_by: String,
}

impl Default for ProductGridSettings {
    fn default() -> Self {
        Self {
            title: "All Products".to_string(),
            columns: 3,
            products_per_page: 12,
            show_filters: true,
            sort_by: "newest".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct AboutSettings {
    pub title: String,
    pub content: String,
    pub image_url: Option<String>,
    pub image_position: String,
}

impl Default for AboutSettings {
    fn default() -> Self {
        Self {
            title: "About Us".to_string(),
            content: "Tell your customers about your store and what makes it special."
                .to_string(),
            image_url: None,
            image_position: "left".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FaqItem {
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct FaqSettings {
    pub title: String,
    pub items: Vec<FaqItem>,
}

impl Default for FaqSettings {
    fn default() -> Self {
        Self {
            title: "Frequently Asked Questions".to_string(),
            items: vec![
                FaqItem {
                    question: "How do I receive my purchase?".to_string(),
                    answer: "Digital products are delivered instantly after payment.".to_string(),
                },
                FaqItem {
                    question: "Can I get a refund?".to_string(),
                    answer: "Contact support within 7 days if a product does not work."
                        .to_string(),
                },
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct VideoSettings {
    pub title: String,
    pub video_url: String,
    pub autoplay: bool,
    pub show_controls: bool,
}

impl Default for VideoSettings {
    fn default() -> Self {
        Self {
            title: "Watch Our Story".to_string(),
            video_url: String::new(),
            autoplay: false,
            show_controls: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GallerySettings {
    pub title: String,
    pub images: Vec<String>,
    pub columns: u32,
}

impl Default for GallerySettings {
    fn default() -> Self {
        Self {
            title: "Gallery".to_string(),
            images: Vec::new(),
            columns: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct Testimonial {
    pub name: String,
    pub text: String,
    pub rating: u8,
}

impl Default for Testimonial {
    fn default() -> Self {
        Self {
            name: String::new(),
            text: String::new(),
            rating: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TestimonialsSettings {
    pub title: String,
    pub items: Vec<Testimonial>,
}

impl Default for TestimonialsSettings {
    fn default() -> Self {
        Self {
            title: "What Our Customers Say".to_string(),
            items: vec![Testimonial {
                name: "Happy Customer".to_string(),
                text: "Fast delivery and great products!".to_string(),
                rating: 5,
            }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CtaSettings {
    pub heading: String,
    pub description: String,
    pub button_text: String,
    pub button_link: String,
    pub bg_color: String,
}

impl Default for CtaSettings {
    fn default() -> Self {
        Self {
            heading: "Ready to get started?".to_string(),
            description: "Browse the catalog and find what you need.".to_string(),
            button_text: "Browse Products".to_string(),
            button_link: "#products".to_string(),
            bg_color: "#6366f1".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct StatItem {
    pub label: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct StatsSettings {
    pub title: String,
    pub items: Vec<StatItem>,
}

impl Default for StatsSettings {
    fn default() -> Self {
        let stat = |label: &str, value: &str| StatItem {
            label: label.to_string(),
            value: value.to_string(),
        };
        Self {
            title: "Our Numbers".to_string(),
            items: vec![
                stat("Products Sold", "1,000+"),
                stat("Happy Customers", "500+"),
                stat("Rating", "4.9"),
            ],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SocialLink {
    pub platform: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SocialLinksSettings {
    pub title: String,
    pub links: Vec<SocialLink>,
}

impl Default for SocialLinksSettings {
    fn default() -> Self {
        Self {
            title: "Follow Us".to_string(),
            links: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CategoryShowcaseSettings {
    pub title: String,
    pub categories: Vec<String>,
    pub layout: String,
}

impl Default for CategoryShowcaseSettings {
    fn default() -> Self {
        Self {
            title: "Shop by Category".to_string(),
            categories: Vec::new(),
            layout: "grid".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TrustBadge {
    pub icon: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TrustBadgesSettings {
    pub badges: Vec<TrustBadge>,
}

impl Default for TrustBadgesSettings {
    fn default() -> Self {
        let badge = |icon: &str, label: &str| TrustBadge {
            icon: icon.to_string(),
            label: label.to_string(),
        };
        Self {
            badges: vec![
                badge("shield", "Secure Payment"),
                badge("zap", "Instant Delivery"),
                badge("headphones", "24/7 Support"),
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct DividerSettings {
    pub style: String,
    pub color: String,
    pub thickness: u32,
}

impl Default for DividerSettings {
    fn default() -> Self {
        Self {
            style: "line".to_string(),
            color: "#e5e7eb".to_string(),
            thickness: 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct CustomTextSettings {
    pub content: String,
    pub alignment: String,
}

impl Default for CustomTextSettings {
    fn default() -> Self {
        Self {
            content: "Add your custom text here.".to_string(),
            alignment: "left".to_string(),
        }
    }
}
