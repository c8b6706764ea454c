//! Pure operations over a section list.
//!
//! Every function takes the current sections and returns a new list whose
//! `order` values are renormalised to 0..N-1, leaving the input untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BuilderError, BuilderResult};
use crate::model::{SectionSettings, SectionStyles, StoreSection};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
}

/// Copy of `sections` sorted by render position with dense `order` values.
pub fn normalized(sections: &[StoreSection]) -> Vec<StoreSection> {
    let mut out = sections.to_vec();
    out.sort_by_key(|s| s.order);
    renumber(&mut out);
    out
}

fn renumber(sections: &mut [StoreSection]) {
    for (order, section) in sections.iter_mut().enumerate() {
        section.order = order;
    }
}

fn position(sections: &[StoreSection], id: &str) -> BuilderResult<usize> {
    sections
        .iter()
        .position(|s| s.id == id)
        .ok_or_else(|| BuilderError::SectionNotFound(id.to_string()))
}

pub fn find<'a>(sections: &'a [StoreSection], id: &str) -> BuilderResult<&'a StoreSection> {
    sections
        .iter()
        .find(|s| s.id == id)
        .ok_or_else(|| BuilderError::SectionNotFound(id.to_string()))
}

/// Append `section` after the last one.
pub fn append(sections: &[StoreSection], section: StoreSection) -> Vec<StoreSection> {
    let mut out = normalized(sections);
    out.push(section);
    renumber(&mut out);
    out
}

/// Insert a deep copy of `id` right after it. Returns the new list and the
/// id of the copy.
pub fn duplicate(sections: &[StoreSection], id: &str) -> BuilderResult<(Vec<StoreSection>, String)> {
    let mut out = normalized(sections);
    let at = position(&out, id)?;
    let copy = out[at].duplicate();
    let copy_id = copy.id.clone();
    out.insert(at + 1, copy);
    renumber(&mut out);
    Ok((out, copy_id))
}

pub fn remove(sections: &[StoreSection], id: &str) -> BuilderResult<Vec<StoreSection>> {
    let mut out = normalized(sections);
    let at = position(&out, id)?;
    out.remove(at);
    renumber(&mut out);
    Ok(out)
}

pub fn toggle_visibility(sections: &[StoreSection], id: &str) -> BuilderResult<Vec<StoreSection>> {
    let mut out = normalized(sections);
    let at = position(&out, id)?;
    out[at].visible = !out[at].visible;
    Ok(out)
}

/// Swap `id` with its neighbour. `Ok(None)` when it already sits at the
/// boundary in that direction.
pub fn move_section(
    sections: &[StoreSection],
    id: &str,
    direction: Direction,
) -> BuilderResult<Option<Vec<StoreSection>>> {
    let mut out = normalized(sections);
    let at = position(&out, id)?;
    let target = match direction {
        Direction::Up if at > 0 => at - 1,
        Direction::Down if at + 1 < out.len() => at + 1,
        _ => return Ok(None),
    };
    out.swap(at, target);
    renumber(&mut out);
    Ok(Some(out))
}

pub fn update_settings(
    sections: &[StoreSection],
    id: &str,
    patch: &Map<String, Value>,
) -> BuilderResult<Vec<StoreSection>> {
    let mut out = normalized(sections);
    let at = position(&out, id)?;
    out[at].settings = out[at].settings.merge(patch)?;
    Ok(out)
}

pub fn update_styles(
    sections: &[StoreSection],
    id: &str,
    patch: &Map<String, Value>,
) -> BuilderResult<Vec<StoreSection>> {
    let mut out = normalized(sections);
    let at = position(&out, id)?;
    let current = out[at].styles.clone().unwrap_or_default();
    out[at].styles = Some(current.merge(patch)?);
    Ok(out)
}

/// Overwrite settings and styles of `id`. The caller guarantees the settings
/// belong to the section's type.
pub fn replace_settings(
    sections: &[StoreSection],
    id: &str,
    settings: SectionSettings,
    styles: Option<SectionStyles>,
) -> BuilderResult<Vec<StoreSection>> {
    let mut out = normalized(sections);
    let at = position(&out, id)?;
    out[at].settings = settings;
    out[at].styles = styles;
    Ok(out)
}
