use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BuilderError, BuilderResult};
use crate::model::settings::merge_object;

// ---------------------------------------------------------------------------
// GlobalStyles: document-wide palette and typography
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct GlobalStyles {
    pub primary_color: String,
    pub secondary_color: String,
    pub background_color: String,
    pub text_color: String,
    pub font_family: String,
}

impl Default for GlobalStyles {
    fn default() -> Self {
        Self {
            primary_color: "#6366f1".to_string(),
            secondary_color: "#8b5cf6".to_string(),
            background_color: "#ffffff".to_string(),
            text_color: "#1f2937".to_string(),
            font_family: "Inter".to_string(),
        }
    }
}

impl GlobalStyles {
    /// Shallow-merge a JSON patch into the palette.
    pub fn merge(&self, patch: &Map<String, Value>) -> BuilderResult<Self> {
        let base = serde_json::to_value(self)?;
        serde_json::from_value(merge_object(base, patch))
            .map_err(|e| BuilderError::InvalidDocument(format!("invalid global styles: {e}")))
    }
}

// ---------------------------------------------------------------------------
// SectionStyles: optional per-section overrides
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Animation {
    None,
    FadeIn,
    SlideUp,
    ZoomIn,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BackgroundGradient {
    pub from: String,
    pub to: String,
    /// CSS angle, e.g. `135deg`.
    #[serde(default = "default_direction")]
    pub direction: String,
}

fn default_direction() -> String {
    "135deg".to_string()
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct SectionStyles {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_top: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin_bottom: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_gradient: Option<BackgroundGradient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<Animation>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide_on_mobile: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide_on_tablet: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub hide_on_desktop: bool,
}

impl SectionStyles {
    /// Shallow-merge a JSON patch. A `null` value clears an optional field.
    pub fn merge(&self, patch: &Map<String, Value>) -> BuilderResult<Self> {
        let base = serde_json::to_value(self)?;
        serde_json::from_value(merge_object(base, patch))
            .map_err(|e| BuilderError::InvalidDocument(format!("invalid section styles: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_styles_serialize_to_empty_object() {
        let value = serde_json::to_value(SectionStyles::default()).unwrap();
        assert_eq!(value, json!({}));
    }

    #[test]
    fn test_styles_merge_sets_and_clears_fields() {
        let patch = json!({ "paddingTop": 48, "animation": "fade_in", "hideOnMobile": true });
        let styles = SectionStyles::default()
            .merge(patch.as_object().unwrap())
            .unwrap();
        assert_eq!(styles.padding_top, Some(48));
        assert_eq!(styles.animation, Some(Animation::FadeIn));
        assert!(styles.hide_on_mobile);

        let cleared = styles
            .merge(json!({ "paddingTop": null }).as_object().unwrap())
            .unwrap();
        assert_eq!(cleared.padding_top, None);
        assert_eq!(cleared.animation, Some(Animation::FadeIn));
    }

    #[test]
    fn test_global_styles_merge() {
        let styles = GlobalStyles::default()
            .merge(json!({ "primaryColor": "#ff0000" }).as_object().unwrap())
            .unwrap();
        assert_eq!(styles.primary_color, "#ff0000");
        assert_eq!(styles.font_family, "Inter");
    }

    #[test]
    fn test_global_styles_reject_unknown_keys() {
        let err = GlobalStyles::default()
            .merge(json!({ "primaryColour": "#ff0000" }).as_object().unwrap())
            .unwrap_err();
        assert!(matches!(err, BuilderError::InvalidDocument(_)));
    }

    #[test]
    fn test_gradient_direction_defaults() {
        let gradient: BackgroundGradient =
            serde_json::from_value(json!({ "from": "#000", "to": "#fff" })).unwrap();
        assert_eq!(gradient.direction, "135deg");
    }
}
