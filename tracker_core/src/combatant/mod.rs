//! Combatant - one live participant derived from a template

mod saved;
mod tag;

pub use saved::SavedCombatant;
pub use tag::{SavedTag, Tag};

use crate::encounter::NameCounts;
use crate::settings::RulesSettings;
use rand::distributions::Alphanumeric;
use rand::Rng;
use rules_core::{ability_check, Advantage, DiceExpression};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::stat_block::{AbilityScores, StatBlock};

/// Opaque identity, unique for the encounter's lifetime
///
/// Restored saves may carry a legacy numeric id; it is coerced to a string
/// at the deserialization boundary and treated as opaque everywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct CombatantId(String);

impl CombatantId {
    pub fn new(id: impl Into<String>) -> Self {
        CombatantId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Combine a template id with a random token so repeated instantiation
    /// of the same template never collides within a session
    pub(crate) fn generate<R: Rng>(template_id: &str, rng: &mut R) -> Self {
        let token: String = rng
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect();
        CombatantId(format!("{}.{}", template_id, token))
    }
}

impl fmt::Display for CombatantId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for CombatantId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl Visitor<'_> for IdVisitor {
            type Value = CombatantId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a string or legacy numeric combatant id")
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                Ok(CombatantId::new(v))
            }

            fn visit_string<E: de::Error>(self, v: String) -> Result<Self::Value, E> {
                Ok(CombatantId(v))
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(CombatantId(v.to_string()))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                Ok(CombatantId(v.to_string()))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

/// Result of one damage application
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DamageOutcome {
    /// Damage soaked by temporary hit points
    pub absorbed: i32,
    /// Damage that reached current hit points
    pub penetrating: i32,
    /// Current HP reached zero with negative HP disallowed
    pub defeated: bool,
}

/// One live participant: a template snapshot plus session state
///
/// Derived fields are recomputed exactly once per template replacement and
/// never mutated directly. Current and temporary HP change only through the
/// damage, healing, and temporary-HP operations (and restore).
#[derive(Debug, Clone)]
pub struct Combatant {
    id: CombatantId,
    stat_block: StatBlock,
    index_label: u32,

    // Derived from the template
    max_hp: i32,
    ac: i32,
    ability_modifiers: AbilityScores,
    initiative_bonus: i32,
    concentration_bonus: i32,
    is_player_character: bool,

    // Live session state
    current_hp: i32,
    temporary_hp: i32,
    alias: String,
    tags: Vec<Tag>,
    initiative: i32,
    initiative_group: Option<String>,
    hidden: bool,
    hide_ac: bool,
}

impl Combatant {
    /// Build a fresh combatant from a template
    ///
    /// Max HP comes from the rolling policy and a new id is generated from
    /// the template id plus a random token.
    pub(crate) fn from_template<R: Rng>(
        mut stat_block: StatBlock,
        rules: &RulesSettings,
        counts: &mut NameCounts,
        rng: &mut R,
    ) -> Self {
        stat_block.hp.value = rolled_max_hp(&stat_block, rules, rng);
        let id = CombatantId::generate(&stat_block.id, rng);
        Self::assemble(id, stat_block, counts)
    }

    /// Rebuild a combatant from a saved record
    ///
    /// The HP baseline is the saved max HP (falling back to the saved
    /// template's value), then live fields are overlaid verbatim.
    pub(crate) fn from_saved<R: Rng>(
        saved: SavedCombatant,
        counts: &mut NameCounts,
        rng: &mut R,
    ) -> Self {
        let mut stat_block = saved.stat_block.clone();
        stat_block.hp.value = saved.max_hp.unwrap_or(stat_block.hp.value);
        let id = saved
            .id
            .clone()
            .unwrap_or_else(|| CombatantId::generate(&stat_block.id, rng));

        let mut combatant = Self::assemble(id, stat_block, counts);
        combatant.overlay_saved(saved);
        combatant
    }

    fn assemble(id: CombatantId, stat_block: StatBlock, counts: &mut NameCounts) -> Self {
        let mut combatant = Combatant {
            id,
            stat_block,
            index_label: 0,
            max_hp: 0,
            ac: 0,
            ability_modifiers: AbilityScores::default().modifiers(),
            initiative_bonus: 0,
            concentration_bonus: 0,
            is_player_character: false,
            current_hp: 0,
            temporary_hp: 0,
            alias: String::new(),
            tags: Vec::new(),
            initiative: 0,
            initiative_group: None,
            hidden: false,
            hide_ac: true,
        };
        combatant.derive_from_template(counts, None);
        combatant.current_hp = combatant.max_hp;
        combatant
    }

    fn overlay_saved(&mut self, saved: SavedCombatant) {
        self.index_label = saved.index_label;
        self.current_hp = saved.current_hp;
        self.temporary_hp = saved.temporary_hp;
        self.initiative = saved.initiative;
        self.initiative_group = saved.initiative_group;
        self.alias = saved.alias;
        self.tags = tag::migrate_tags(saved.tags);
        self.hidden = saved.hidden;
        self.hide_ac = saved.hide_ac;
    }

    /// Swap the underlying template and re-derive stats
    ///
    /// Live fields (HP, initiative, tags, visibility) are preserved; the
    /// index label is recomputed against the previous display name.
    pub(crate) fn replace_stat_block(&mut self, stat_block: StatBlock, counts: &mut NameCounts) {
        let old_name = std::mem::replace(&mut self.stat_block, stat_block).name;
        self.derive_from_template(counts, Some(&old_name));
    }

    /// The single derivation pass run on construction and template change
    fn derive_from_template(&mut self, counts: &mut NameCounts, old_name: Option<&str>) {
        self.reindex(counts, old_name);
        self.is_player_character = self.stat_block.is_player();
        self.ac = self.stat_block.ac.value;
        self.max_hp = self.stat_block.hp.value;
        self.ability_modifiers = self.stat_block.abilities.modifiers();
        let initiative_modifier = self.stat_block.initiative_modifier.unwrap_or(0);
        self.initiative_bonus = self.ability_modifiers.dexterity + initiative_modifier;
        self.concentration_bonus = self.ability_modifiers.constitution;
    }

    fn reindex(&mut self, counts: &mut NameCounts, old_name: Option<&str>) {
        let name = &self.stat_block.name;
        // An unchanged name keeps its label; reassigning would double-count
        if old_name != Some(name.as_str()) {
            self.index_label = counts.assign(name, old_name);
        }
    }

    // === HP state machine ===

    /// Apply damage, consuming temporary HP before current HP
    ///
    /// With negative HP disallowed, current HP clamps at zero and the
    /// outcome reports the defeat. Zero damage is a no-op.
    pub fn apply_damage(&mut self, amount: u32, rules: &RulesSettings) -> DamageOutcome {
        if amount == 0 {
            return DamageOutcome::default();
        }
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);

        let absorbed = amount.min(self.temporary_hp);
        self.temporary_hp -= absorbed;
        let penetrating = amount - absorbed;
        self.current_hp = self.current_hp.saturating_sub(penetrating);

        let mut defeated = false;
        if self.current_hp <= 0 && !rules.allow_negative_hp {
            defeated = true;
            self.current_hp = 0;
        }

        DamageOutcome {
            absorbed,
            penetrating,
            defeated,
        }
    }

    /// Apply healing, clamped at max HP; temporary HP is untouched
    ///
    /// Returns the HP actually restored.
    pub fn apply_healing(&mut self, amount: u32) -> i32 {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        let healed = self.current_hp.saturating_add(amount).min(self.max_hp) - self.current_hp;
        self.current_hp += healed;
        healed
    }

    /// Grant temporary HP; pools never stack, the larger value wins
    pub fn apply_temporary_hp(&mut self, amount: u32) {
        let amount = i32::try_from(amount).unwrap_or(i32::MAX);
        if amount > self.temporary_hp {
            self.temporary_hp = amount;
        }
    }

    // === Rolls ===

    /// Roll initiative: a d20 check against the initiative bonus, with
    /// advantage when the template flags it
    pub fn roll_initiative<R: Rng>(&self, rng: &mut R) -> i32 {
        let advantage = if self.stat_block.initiative_advantage {
            Advantage::Advantage
        } else {
            Advantage::Normal
        };
        ability_check(self.initiative_bonus, advantage, rng)
    }

    /// Roll a concentration check against the Constitution modifier
    pub fn roll_concentration<R: Rng>(&self, rng: &mut R) -> i32 {
        ability_check(self.concentration_bonus, Advantage::Normal, rng)
    }

    // === Display identity ===

    /// Name shown in views: the alias if set, the template name with the
    /// index label when the name is shared, the bare name otherwise
    pub fn display_name(&self, counts: &NameCounts) -> String {
        if !self.alias.is_empty() {
            return self.alias.clone();
        }
        let name = &self.stat_block.name;
        if counts.count(name) > 1 {
            format!("{} {}", name, self.index_label)
        } else {
            name.clone()
        }
    }

    /// Project this combatant back into the persisted shape
    pub fn to_saved(&self) -> SavedCombatant {
        SavedCombatant {
            id: Some(self.id.clone()),
            stat_block: self.stat_block.clone(),
            max_hp: Some(self.max_hp),
            index_label: self.index_label,
            current_hp: self.current_hp,
            temporary_hp: self.temporary_hp,
            initiative: self.initiative,
            initiative_group: self.initiative_group.clone(),
            alias: self.alias.clone(),
            tags: self.tags.iter().map(SavedTag::from).collect(),
            hidden: self.hidden,
            hide_ac: self.hide_ac,
        }
    }

    // === Mutators mediated by the encounter ===

    pub(crate) fn set_initiative_value(&mut self, value: i32) {
        self.initiative = value;
    }

    pub(crate) fn set_initiative_group_value(&mut self, group: Option<String>) {
        self.initiative_group = group;
    }

    pub(crate) fn set_alias_value(&mut self, alias: String) {
        self.alias = alias;
    }

    pub(crate) fn set_hidden_value(&mut self, hidden: bool) {
        self.hidden = hidden;
    }

    pub(crate) fn set_hide_ac_value(&mut self, hide_ac: bool) {
        self.hide_ac = hide_ac;
    }

    pub(crate) fn add_tag_value(&mut self, tag: Tag) {
        self.tags.push(tag);
    }

    pub(crate) fn remove_tag_value(&mut self, text: &str) -> bool {
        let before = self.tags.len();
        self.tags.retain(|t| t.text != text);
        self.tags.len() != before
    }

    // === Getters ===

    pub fn id(&self) -> &CombatantId {
        &self.id
    }

    pub fn stat_block(&self) -> &StatBlock {
        &self.stat_block
    }

    pub fn index_label(&self) -> u32 {
        self.index_label
    }

    pub fn max_hp(&self) -> i32 {
        self.max_hp
    }

    pub fn ac(&self) -> i32 {
        self.ac
    }

    pub fn ability_modifiers(&self) -> &AbilityScores {
        &self.ability_modifiers
    }

    pub fn initiative_bonus(&self) -> i32 {
        self.initiative_bonus
    }

    pub fn concentration_bonus(&self) -> i32 {
        self.concentration_bonus
    }

    pub fn is_player_character(&self) -> bool {
        self.is_player_character
    }

    pub fn current_hp(&self) -> i32 {
        self.current_hp
    }

    pub fn temporary_hp(&self) -> i32 {
        self.temporary_hp
    }

    pub fn alias(&self) -> &str {
        &self.alias
    }

    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    pub fn initiative(&self) -> i32 {
        self.initiative
    }

    pub fn initiative_group(&self) -> Option<&str> {
        self.initiative_group.as_deref()
    }

    pub fn hidden(&self) -> bool {
        self.hidden
    }

    pub fn hide_ac(&self) -> bool {
        self.hide_ac
    }
}

/// HP-rolling policy for fresh combatants
///
/// Only monsters with the roll-monster-HP rule enabled roll their HP notes;
/// a malformed expression falls back to the static value.
fn rolled_max_hp<R: Rng>(stat_block: &StatBlock, rules: &RulesSettings, rng: &mut R) -> i32 {
    if !rules.roll_monster_hp || stat_block.is_player() {
        return stat_block.hp.value;
    }
    match stat_block.hp.notes.parse::<DiceExpression>() {
        // A combatant must never start with non-positive max HP
        Ok(expression) => expression.roll(rng).total.max(1),
        Err(error) => {
            tracing::warn!(
                %error,
                notes = %stat_block.hp.notes,
                "failed to roll hit points, using the static value"
            );
            stat_block.hp.value
        }
    }
}
