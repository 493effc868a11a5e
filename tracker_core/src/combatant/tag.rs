//! Combatant annotations

use serde::{Deserialize, Serialize};

/// A free-text annotation attached to a combatant ("Concentrating",
/// "Prone", "Cursed by the idol")
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(rename = "Text")]
    pub text: String,
}

impl Tag {
    pub fn new(text: impl Into<String>) -> Self {
        Tag { text: text.into() }
    }
}

/// Persisted tag shape
///
/// Legacy saves stored tags as bare strings; current saves store objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SavedTag {
    Legacy(String),
    Current(Tag),
}

impl From<SavedTag> for Tag {
    fn from(saved: SavedTag) -> Self {
        match saved {
            SavedTag::Legacy(text) => Tag::new(text),
            SavedTag::Current(tag) => tag,
        }
    }
}

impl From<&Tag> for SavedTag {
    fn from(tag: &Tag) -> Self {
        SavedTag::Current(tag.clone())
    }
}

/// Migrate a persisted tag list, accepting both shapes
pub(crate) fn migrate_tags(saved: Vec<SavedTag>) -> Vec<Tag> {
    saved.into_iter().map(Tag::from).collect()
}
