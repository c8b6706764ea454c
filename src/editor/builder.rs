use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::editor::clipboard::Clipboard;
use crate::editor::history::{HistoryStack, HistoryState};
use crate::editor::sections::{self, Direction};
use crate::error::{BuilderError, BuilderResult};
use crate::model::{
    find_preset, find_template, Document, DocumentId, SectionId, SectionType, StoreSection,
    VersionId, VersionSnapshot,
};

/// Default cap on retained version snapshots.
pub const DEFAULT_MAX_VERSIONS: usize = 20;

// ---------------------------------------------------------------------------
// BuilderAction: every user action the editor understands
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum BuilderAction {
    AddSection { section_type: SectionType },
    AddFromTemplate { template_id: String },
    DuplicateSection { id: SectionId },
    RemoveSection { id: SectionId },
    ToggleVisibility { id: SectionId },
    MoveSection { id: SectionId, direction: Direction },
    UpdateSettings { id: SectionId, patch: Map<String, Value> },
    UpdateStyles { id: SectionId, patch: Map<String, Value> },
    UpdateGlobalStyles { patch: Map<String, Value> },
    CopySettings { id: SectionId },
    PasteSettings { id: SectionId },
    SelectSection { id: Option<SectionId> },
    ApplyThemePreset { preset: String },
    Undo,
    Redo,
    SaveVersion {
        #[serde(default)]
        name: Option<String>,
    },
    RestoreVersion { version_id: VersionId },
    DeleteVersion { version_id: VersionId },
}

impl BuilderAction {
    /// Confirmation shown to the user after the action succeeds, if any.
    pub fn success_message(&self) -> Option<&'static str> {
        match self {
            BuilderAction::AddFromTemplate { .. } => Some("Template added"),
            BuilderAction::DuplicateSection { .. } => Some("Section duplicated"),
            BuilderAction::RemoveSection { .. } => Some("Section removed"),
            BuilderAction::CopySettings { .. } => Some("Settings copied"),
            BuilderAction::PasteSettings { .. } => Some("Settings pasted"),
            BuilderAction::ApplyThemePreset { .. } => Some("Theme applied"),
            BuilderAction::SaveVersion { .. } => Some("Version saved"),
            BuilderAction::RestoreVersion { .. } => Some("Version restored"),
            BuilderAction::DeleteVersion { .. } => Some("Version deleted"),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// StoreBuilder: the editor state owner
// ---------------------------------------------------------------------------

/// Owns the live design of one seller and applies editor actions to it.
///
/// Successful mutations replace the section list through the pure functions
/// in [`sections`] and then go through [`StoreBuilder::commit`], which
/// records exactly one history entry.
#[derive(Debug, Clone)]
pub struct StoreBuilder {
    document: Document,
    history: HistoryStack,
    clipboard: Clipboard,
    selected: Option<SectionId>,
    dirty: bool,
    revision: u64,
    max_versions: usize,
}

impl StoreBuilder {
    pub fn new(document: Document) -> Self {
        Self::with_max_versions(document, DEFAULT_MAX_VERSIONS)
    }

    pub fn with_max_versions(mut document: Document, max_versions: usize) -> Self {
        document.sections = sections::normalized(&document.sections);
        let mut builder = Self {
            document,
            history: HistoryStack::new(),
            clipboard: Clipboard::new(),
            selected: None,
            dirty: false,
            revision: 0,
            max_versions: max_versions.max(1),
        };
        builder.history.push(builder.snapshot());
        builder
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn clipboard(&self) -> &Clipboard {
        &self.clipboard
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    /// Whether the document changed since the last call to
    /// [`StoreBuilder::mark_saved`].
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Monotonic counter bumped on every change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Remember the id assigned by the store on first insert.
    pub fn set_document_id(&mut self, id: DocumentId) {
        self.document.id = Some(id);
    }

    fn snapshot(&self) -> HistoryState {
        HistoryState {
            sections: self.document.sections.clone(),
            global_styles: self.document.global_styles.clone(),
            theme_preset: self.document.theme_preset.clone(),
        }
    }

    fn touch(&mut self) {
        self.dirty = true;
        self.revision += 1;
    }

    /// Record the live state in history and mark the document dirty.
    fn commit(&mut self) {
        self.history.push(self.snapshot());
        self.touch();
    }

    fn set_sections(&mut self, sections: Vec<StoreSection>) {
        self.document.sections = sections;
        self.commit();
    }

    fn restore(&mut self, state: HistoryState) {
        self.document.sections = state.sections;
        self.document.global_styles = state.global_styles;
        self.document.theme_preset = state.theme_preset;
        if let Some(id) = &self.selected {
            if !self.document.sections.iter().any(|s| &s.id == id) {
                self.selected = None;
            }
        }
        self.commit();
    }

    // -- section operations -------------------------------------------------

    pub fn add_section(&mut self, section_type: SectionType) -> SectionId {
        let section = StoreSection::new(section_type, self.document.sections.len());
        let id = section.id.clone();
        self.set_sections(sections::append(&self.document.sections, section));
        self.selected = Some(id.clone());
        tracing::debug!(section_type = %section_type, section_id = %id, "section added");
        id
    }

    pub fn add_from_template(&mut self, template_id: &str) -> BuilderResult<SectionId> {
        let template = find_template(template_id)
            .ok_or_else(|| BuilderError::TemplateNotFound(template_id.to_string()))?;
        let section = template.instantiate(self.document.sections.len());
        let id = section.id.clone();
        self.set_sections(sections::append(&self.document.sections, section));
        self.selected = Some(id.clone());
        tracing::debug!(template_id, section_id = %id, "section added from template");
        Ok(id)
    }

    pub fn duplicate_section(&mut self, id: &str) -> BuilderResult<SectionId> {
        let (out, copy_id) = sections::duplicate(&self.document.sections, id)?;
        self.set_sections(out);
        self.selected = Some(copy_id.clone());
        Ok(copy_id)
    }

    pub fn remove_section(&mut self, id: &str) -> BuilderResult<()> {
        let out = sections::remove(&self.document.sections, id)?;
        self.set_sections(out);
        if self.selected.as_deref() == Some(id) {
            self.selected = None;
        }
        Ok(())
    }

    pub fn toggle_visibility(&mut self, id: &str) -> BuilderResult<()> {
        let out = sections::toggle_visibility(&self.document.sections, id)?;
        self.set_sections(out);
        Ok(())
    }

    /// Returns `false` when the section already sits at the boundary.
    pub fn move_section(&mut self, id: &str, direction: Direction) -> BuilderResult<bool> {
        match sections::move_section(&self.document.sections, id, direction)? {
            Some(out) => {
                self.set_sections(out);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub fn update_section_settings(
        &mut self,
        id: &str,
        patch: &Map<String, Value>,
    ) -> BuilderResult<()> {
        let out = sections::update_settings(&self.document.sections, id, patch)?;
        self.set_sections(out);
        Ok(())
    }

    pub fn update_section_styles(
        &mut self,
        id: &str,
        patch: &Map<String, Value>,
    ) -> BuilderResult<()> {
        let out = sections::update_styles(&self.document.sections, id, patch)?;
        self.set_sections(out);
        Ok(())
    }

    pub fn update_global_styles(&mut self, patch: &Map<String, Value>) -> BuilderResult<()> {
        self.document.global_styles = self.document.global_styles.merge(patch)?;
        self.commit();
        Ok(())
    }

    pub fn copy_settings(&mut self, id: &str) -> BuilderResult<()> {
        let section = sections::find(&self.document.sections, id)?;
        self.clipboard.copy_from(section);
        Ok(())
    }

    pub fn paste_settings(&mut self, id: &str) -> BuilderResult<()> {
        let target = sections::find(&self.document.sections, id)?;
        let copied = self.clipboard.paste_onto(target)?;
        let out = sections::replace_settings(
            &self.document.sections,
            id,
            copied.settings.clone(),
            copied.styles.clone(),
        )?;
        self.set_sections(out);
        Ok(())
    }

    pub fn select_section(&mut self, id: Option<&str>) -> BuilderResult<()> {
        if let Some(id) = id {
            sections::find(&self.document.sections, id)?;
        }
        self.selected = id.map(str::to_string);
        Ok(())
    }

    /// Replace global styles and sections with those of a theme preset.
    pub fn apply_theme_preset(&mut self, preset_id: &str) -> BuilderResult<()> {
        let preset = find_preset(preset_id)
            .ok_or_else(|| BuilderError::ThemePresetNotFound(preset_id.to_string()))?;
        self.document.global_styles = preset.global_styles.clone();
        self.document.sections = preset.sections();
        self.document.theme_preset = preset.id.to_string();
        self.selected = None;
        self.commit();
        tracing::info!(preset = preset_id, "theme preset applied");
        Ok(())
    }

    // -- history ------------------------------------------------------------

    /// Returns `false` when there is nothing to undo.
    pub fn undo(&mut self) -> bool {
        match self.history.undo() {
            Some(state) => {
                self.restore(state);
                tracing::debug!(index = self.history.index(), "undo");
                true
            }
            None => false,
        }
    }

    /// Returns `false` when there is nothing to redo.
    pub fn redo(&mut self) -> bool {
        match self.history.redo() {
            Some(state) => {
                self.restore(state);
                tracing::debug!(index = self.history.index(), "redo");
                true
            }
            None => false,
        }
    }

    // -- versions -----------------------------------------------------------

    fn push_version(&mut self, snapshot: VersionSnapshot) -> VersionId {
        let id = snapshot.id.clone();
        self.document.version_history.insert(0, snapshot);
        self.document.version_history.truncate(self.max_versions);
        self.touch();
        id
    }

    /// Snapshot the live design. Not an undoable action.
    pub fn save_version(&mut self, name: Option<&str>) -> VersionId {
        let name = match name.map(str::trim) {
            Some(n) if !n.is_empty() => n.to_string(),
            _ => format!("Version {}", self.document.version_history.len() + 1),
        };
        let snapshot = VersionSnapshot::capture(
            name,
            &self.document.sections,
            &self.document.global_styles,
            &self.document.theme_preset,
        );
        tracing::info!(version_id = %snapshot.id, name = %snapshot.name, "version saved");
        self.push_version(snapshot)
    }

    /// Replace the live design with a snapshot. Recorded in history, so the
    /// restore itself can be undone.
    pub fn restore_version(&mut self, version_id: &str) -> BuilderResult<()> {
        let snapshot = self
            .document
            .version_history
            .iter()
            .find(|v| v.id == version_id)
            .cloned()
            .ok_or_else(|| BuilderError::VersionNotFound(version_id.to_string()))?;

        self.document.sections = sections::normalized(&snapshot.sections);
        self.document.global_styles = snapshot.global_styles;
        self.document.theme_preset = snapshot.theme_preset;
        self.selected = None;
        self.commit();
        tracing::info!(version_id, "version restored");
        Ok(())
    }

    pub fn delete_version(&mut self, version_id: &str) -> BuilderResult<()> {
        let before = self.document.version_history.len();
        self.document.version_history.retain(|v| v.id != version_id);
        if self.document.version_history.len() == before {
            return Err(BuilderError::VersionNotFound(version_id.to_string()));
        }
        self.touch();
        Ok(())
    }

    /// Take the automatic pre-publish checkpoint and flag the design active.
    pub fn prepare_publish(&mut self) -> VersionId {
        let snapshot = VersionSnapshot::pre_publish(
            &self.document.sections,
            &self.document.global_styles,
            &self.document.theme_preset,
        );
        self.document.is_active = true;
        self.push_version(snapshot)
    }

    pub fn unpublish(&mut self) {
        self.document.is_active = false;
        self.touch();
    }

    // -- dispatch -----------------------------------------------------------

    /// Apply one action. Returns whether the document changed.
    pub fn apply(&mut self, action: &BuilderAction) -> BuilderResult<bool> {
        let revision = self.revision;
        match action {
            BuilderAction::AddSection { section_type } => {
                self.add_section(*section_type);
            }
            BuilderAction::AddFromTemplate { template_id } => {
                self.add_from_template(template_id)?;
            }
            BuilderAction::DuplicateSection { id } => {
                self.duplicate_section(id)?;
            }
            BuilderAction::RemoveSection { id } => self.remove_section(id)?,
            BuilderAction::ToggleVisibility { id } => self.toggle_visibility(id)?,
            BuilderAction::MoveSection { id, direction } => {
                self.move_section(id, *direction)?;
            }
            BuilderAction::UpdateSettings { id, patch } => {
                self.update_section_settings(id, patch)?
            }
            BuilderAction::UpdateStyles { id, patch } => self.update_section_styles(id, patch)?,
            BuilderAction::UpdateGlobalStyles { patch } => self.update_global_styles(patch)?,
            BuilderAction::CopySettings { id } => self.copy_settings(id)?,
            BuilderAction::PasteSettings { id } => self.paste_settings(id)?,
            BuilderAction::SelectSection { id } => self.select_section(id.as_deref())?,
            BuilderAction::ApplyThemePreset { preset } => self.apply_theme_preset(preset)?,
            BuilderAction::Undo => {
                self.undo();
            }
            BuilderAction::Redo => {
                self.redo();
            }
            BuilderAction::SaveVersion { name } => {
                self.save_version(name.as_deref());
            }
            BuilderAction::RestoreVersion { version_id } => self.restore_version(version_id)?,
            BuilderAction::DeleteVersion { version_id } => self.delete_version(version_id)?,
        }
        Ok(self.revision != revision)
    }
}
