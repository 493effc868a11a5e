//! Persisted combatant records

use super::tag::SavedTag;
use super::CombatantId;
use crate::stat_block::StatBlock;
use serde::{Deserialize, Serialize};

/// Serialized combatant state, consumed when restoring a saved encounter
///
/// Everything except the stat block is optional and defaults; live fields
/// are overlaid onto the combatant after template derivation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedCombatant {
    /// Missing in very old saves; a fresh id is generated on restore
    #[serde(rename = "Id", default)]
    pub id: Option<CombatantId>,
    #[serde(rename = "StatBlock")]
    pub stat_block: StatBlock,
    /// Baseline max HP; falls back to the stat block's HP value
    #[serde(rename = "MaxHP", default)]
    pub max_hp: Option<i32>,
    #[serde(rename = "IndexLabel", default)]
    pub index_label: u32,
    #[serde(rename = "CurrentHP", default)]
    pub current_hp: i32,
    #[serde(rename = "TemporaryHP", default)]
    pub temporary_hp: i32,
    #[serde(rename = "Initiative", default)]
    pub initiative: i32,
    #[serde(rename = "InitiativeGroup", default)]
    pub initiative_group: Option<String>,
    #[serde(rename = "Alias", default)]
    pub alias: String,
    #[serde(rename = "Tags", default)]
    pub tags: Vec<SavedTag>,
    #[serde(rename = "Hidden", default)]
    pub hidden: bool,
    /// AC stays masked in spectator views unless the save revealed it
    #[serde(rename = "HideAC", default = "default_hide_ac")]
    pub hide_ac: bool,
}

fn default_hide_ac() -> bool {
    true
}
