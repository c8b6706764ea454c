use crate::error::{BuilderError, BuilderResult};
use crate::model::{SectionSettings, SectionStyles, SectionType, StoreSection};

/// Settings copied from one section, ready to paste onto another of the same
/// type.
#[derive(Debug, Clone, PartialEq)]
pub struct CopiedSettings {
    pub section_type: SectionType,
    pub settings: SectionSettings,
    pub styles: Option<SectionStyles>,
}

/// Single-slot, session-local clipboard. Never persisted.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
    slot: Option<CopiedSettings>,
}

impl Clipboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the slot with the settings and styles of `section`.
    pub fn copy_from(&mut self, section: &StoreSection) {
        self.slot = Some(CopiedSettings {
            section_type: section.section_type(),
            settings: section.settings.clone(),
            styles: section.styles.clone(),
        });
    }

    /// The copied payload, if it may be pasted onto `target`.
    pub fn paste_onto(&self, target: &StoreSection) -> BuilderResult<&CopiedSettings> {
        let copied = self.slot.as_ref().ok_or(BuilderError::ClipboardEmpty)?;
        if copied.section_type != target.section_type() {
            return Err(BuilderError::ClipboardTypeMismatch {
                copied: copied.section_type,
                target: target.section_type(),
            });
        }
        Ok(copied)
    }

    pub fn peek(&self) -> Option<&CopiedSettings> {
        self.slot.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paste_requires_matching_type() {
        let mut clipboard = Clipboard::new();
        let hero = StoreSection::new(SectionType::Hero, 0);
        let faq = StoreSection::new(SectionType::Faq, 1);

        assert!(matches!(
            clipboard.paste_onto(&hero),
            Err(BuilderError::ClipboardEmpty)
        ));

        clipboard.copy_from(&hero);
        assert!(clipboard.paste_onto(&StoreSection::new(SectionType::Hero, 2)).is_ok());
        assert!(matches!(
            clipboard.paste_onto(&faq),
            Err(BuilderError::ClipboardTypeMismatch {
                copied: SectionType::Hero,
                target: SectionType::Faq
            })
        ));
    }

    #[test]
    fn test_copy_replaces_slot() {
        let mut clipboard = Clipboard::new();
        clipboard.copy_from(&StoreSection::new(SectionType::Hero, 0));
        clipboard.copy_from(&StoreSection::new(SectionType::Video, 0));
        assert_eq!(clipboard.peek().unwrap().section_type, SectionType::Video);
    }
}
