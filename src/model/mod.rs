pub mod catalog;
pub mod document;
pub mod section;
pub mod settings;
pub mod styles;
pub mod version;

pub use catalog::{find_preset, find_template, SectionTemplate, ThemePreset};
pub use document::*;
pub use section::*;
pub use settings::SectionSettings;
pub use styles::*;
pub use version::*;
