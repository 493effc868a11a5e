//! Encounter container
//!
//! Owns the combatant collection, the shared name-count table, and the
//! telemetry sink. All mutations of a combatant's session state go through
//! the encounter, which is what lets initiative-group synchronization and
//! defeat events work without back-references.

mod name_index;

pub use name_index::NameCounts;

use crate::combatant::{Combatant, CombatantId, DamageOutcome, SavedCombatant, Tag};
use crate::display::{static_view, StaticCombatantView};
use crate::settings::Settings;
use crate::stat_block::StatBlock;
use crate::telemetry::{LogSink, TelemetrySink};
use rand::Rng;
use serde_json::json;
use std::fmt;
use thiserror::Error;

/// Error addressing a combatant within an encounter
#[derive(Debug, Error)]
pub enum EncounterError {
    #[error("unknown combatant: {0}")]
    UnknownCombatant(CombatantId),
}

/// A running encounter
pub struct Encounter {
    combatants: Vec<Combatant>,
    name_counts: NameCounts,
    sink: Box<dyn TelemetrySink>,
}

impl fmt::Debug for Encounter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encounter")
            .field("combatants", &self.combatants)
            .field("name_counts", &self.name_counts)
            .finish_non_exhaustive()
    }
}

impl Default for Encounter {
    fn default() -> Self {
        Self::new()
    }
}

impl Encounter {
    /// Create an empty encounter reporting events through `tracing`
    pub fn new() -> Self {
        Self::with_sink(Box::new(LogSink))
    }

    /// Create an empty encounter with a custom telemetry sink
    pub fn with_sink(sink: Box<dyn TelemetrySink>) -> Self {
        Encounter {
            combatants: Vec::new(),
            name_counts: NameCounts::new(),
            sink,
        }
    }

    // === Membership ===

    /// Add a fresh combatant built from a template, returning its id
    pub fn add_from_template<R: Rng>(
        &mut self,
        stat_block: StatBlock,
        settings: &Settings,
        rng: &mut R,
    ) -> CombatantId {
        let combatant =
            Combatant::from_template(stat_block, &settings.rules, &mut self.name_counts, rng);
        let id = combatant.id().clone();
        self.combatants.push(combatant);
        id
    }

    /// Rebuild a combatant from a saved record, returning its id
    ///
    /// The RNG is only consulted when the record predates stored ids.
    pub fn restore<R: Rng>(&mut self, saved: SavedCombatant, rng: &mut R) -> CombatantId {
        let combatant = Combatant::from_saved(saved, &mut self.name_counts, rng);
        let id = combatant.id().clone();
        self.combatants.push(combatant);
        id
    }

    /// Remove a combatant, releasing its display-name count
    pub fn remove(&mut self, id: &CombatantId) -> Result<Combatant, EncounterError> {
        let index = self.index_of(id)?;
        let combatant = self.combatants.remove(index);
        self.name_counts.release(&combatant.stat_block().name);
        Ok(combatant)
    }

    // === Template reconciliation ===

    /// Replace a combatant's template, re-deriving stats but preserving
    /// its live HP, initiative, tags, and visibility
    pub fn replace_stat_block(
        &mut self,
        id: &CombatantId,
        stat_block: StatBlock,
    ) -> Result<(), EncounterError> {
        let index = self.index_of(id)?;
        self.combatants[index].replace_stat_block(stat_block, &mut self.name_counts);
        Ok(())
    }

    // === HP operations ===

    /// Apply damage; a defeat emits a telemetry event with the display name
    pub fn apply_damage(
        &mut self,
        id: &CombatantId,
        amount: u32,
        settings: &Settings,
    ) -> Result<DamageOutcome, EncounterError> {
        let index = self.index_of(id)?;
        let outcome = self.combatants[index].apply_damage(amount, &settings.rules);
        if outcome.defeated {
            let name = self.combatants[index].display_name(&self.name_counts);
            self.sink
                .track_event("CombatantDefeated", json!({ "Name": name }));
        }
        Ok(outcome)
    }

    /// Heal a combatant, clamped at its max HP; returns the HP restored
    pub fn apply_healing(
        &mut self,
        id: &CombatantId,
        amount: u32,
    ) -> Result<i32, EncounterError> {
        Ok(self.combatant_mut(id)?.apply_healing(amount))
    }

    /// Grant temporary HP (max-wins, never stacks)
    pub fn apply_temporary_hp(
        &mut self,
        id: &CombatantId,
        amount: u32,
    ) -> Result<(), EncounterError> {
        self.combatant_mut(id)?.apply_temporary_hp(amount);
        Ok(())
    }

    // === Initiative ===

    /// Set a combatant's initiative
    ///
    /// When the combatant belongs to an initiative group, the value is
    /// written to every member sharing the key in one pass; membership is
    /// never altered.
    pub fn set_initiative(&mut self, id: &CombatantId, value: i32) -> Result<(), EncounterError> {
        let index = self.index_of(id)?;
        match self.combatants[index].initiative_group().map(str::to_owned) {
            Some(group) => {
                for combatant in &mut self.combatants {
                    if combatant.initiative_group() == Some(group.as_str()) {
                        combatant.set_initiative_value(value);
                    }
                }
            }
            None => self.combatants[index].set_initiative_value(value),
        }
        Ok(())
    }

    /// Roll initiative for a combatant and apply it (with group sync)
    pub fn roll_initiative<R: Rng>(
        &mut self,
        id: &CombatantId,
        rng: &mut R,
    ) -> Result<i32, EncounterError> {
        let value = self.combatant(id)?.roll_initiative(rng);
        self.set_initiative(id, value)?;
        Ok(value)
    }

    /// Change a combatant's initiative group membership
    pub fn set_initiative_group(
        &mut self,
        id: &CombatantId,
        group: Option<String>,
    ) -> Result<(), EncounterError> {
        self.combatant_mut(id)?.set_initiative_group_value(group);
        Ok(())
    }

    // === Display identity and annotations ===

    pub fn set_alias(&mut self, id: &CombatantId, alias: String) -> Result<(), EncounterError> {
        self.combatant_mut(id)?.set_alias_value(alias);
        Ok(())
    }

    pub fn set_hidden(&mut self, id: &CombatantId, hidden: bool) -> Result<(), EncounterError> {
        self.combatant_mut(id)?.set_hidden_value(hidden);
        Ok(())
    }

    pub fn set_hide_ac(&mut self, id: &CombatantId, hide_ac: bool) -> Result<(), EncounterError> {
        self.combatant_mut(id)?.set_hide_ac_value(hide_ac);
        Ok(())
    }

    pub fn add_tag(&mut self, id: &CombatantId, tag: Tag) -> Result<(), EncounterError> {
        self.combatant_mut(id)?.add_tag_value(tag);
        Ok(())
    }

    /// Remove every tag with the given text; returns whether any matched
    pub fn remove_tag(&mut self, id: &CombatantId, text: &str) -> Result<bool, EncounterError> {
        Ok(self.combatant_mut(id)?.remove_tag_value(text))
    }

    /// Resolved display name (alias, indexed name, or bare name)
    pub fn display_name(&self, id: &CombatantId) -> Result<String, EncounterError> {
        Ok(self.combatant(id)?.display_name(&self.name_counts))
    }

    // === Views ===

    /// Spectator-facing projection of one combatant
    pub fn view(
        &self,
        id: &CombatantId,
        settings: &Settings,
    ) -> Result<StaticCombatantView, EncounterError> {
        Ok(static_view(self.combatant(id)?, &self.name_counts, settings))
    }

    /// Spectator-facing projections of all non-hidden combatants
    pub fn views(&self, settings: &Settings) -> Vec<StaticCombatantView> {
        self.combatants
            .iter()
            .filter(|c| !c.hidden())
            .map(|c| static_view(c, &self.name_counts, settings))
            .collect()
    }

    // === Accessors ===

    pub fn combatants(&self) -> &[Combatant] {
        &self.combatants
    }

    pub fn combatant(&self, id: &CombatantId) -> Result<&Combatant, EncounterError> {
        self.combatants
            .iter()
            .find(|c| c.id() == id)
            .ok_or_else(|| EncounterError::UnknownCombatant(id.clone()))
    }

    pub fn name_counts(&self) -> &NameCounts {
        &self.name_counts
    }

    fn combatant_mut(&mut self, id: &CombatantId) -> Result<&mut Combatant, EncounterError> {
        self.combatants
            .iter_mut()
            .find(|c| c.id() == id)
            .ok_or_else(|| EncounterError::UnknownCombatant(id.clone()))
    }

    fn index_of(&self, id: &CombatantId) -> Result<usize, EncounterError> {
        self.combatants
            .iter()
            .position(|c| c.id() == id)
            .ok_or_else(|| EncounterError::UnknownCombatant(id.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stat_block::ValueAndNotes;
    use crate::telemetry::RecordingSink;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(7)
    }

    fn monster(name: &str, hp: i32) -> StatBlock {
        StatBlock {
            id: name.to_lowercase(),
            name: name.to_string(),
            hp: ValueAndNotes {
                value: hp,
                notes: String::new(),
            },
            ..StatBlock::default()
        }
    }

    #[test]
    fn test_add_and_remove() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut encounter = Encounter::new();

        let id = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        assert_eq!(encounter.combatants().len(), 1);
        assert_eq!(encounter.name_counts().count("Goblin"), 1);

        let removed = encounter.remove(&id).unwrap();
        assert_eq!(removed.stat_block().name, "Goblin");
        assert!(encounter.combatants().is_empty());
        assert_eq!(encounter.name_counts().count("Goblin"), 0);
    }

    #[test]
    fn test_unknown_combatant_errors() {
        let mut encounter = Encounter::new();
        let missing = CombatantId::new("nope");
        assert!(matches!(
            encounter.set_initiative(&missing, 10),
            Err(EncounterError::UnknownCombatant(_))
        ));
        assert!(matches!(
            encounter.apply_healing(&missing, 5),
            Err(EncounterError::UnknownCombatant(_))
        ));
    }

    #[test]
    fn test_shared_names_get_index_labels() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut encounter = Encounter::new();

        let a = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        let b = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        let c = encounter.add_from_template(monster("Ogre", 59), &settings, &mut rng);

        assert_eq!(encounter.display_name(&a).unwrap(), "Goblin 1");
        assert_eq!(encounter.display_name(&b).unwrap(), "Goblin 2");
        assert_eq!(encounter.display_name(&c).unwrap(), "Ogre");
    }

    #[test]
    fn test_rename_decrements_old_count() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut encounter = Encounter::new();

        let a = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        let b = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        assert_eq!(encounter.name_counts().count("Goblin"), 2);

        encounter
            .replace_stat_block(&b, monster("Hobgoblin", 11))
            .unwrap();
        assert_eq!(encounter.name_counts().count("Goblin"), 1);
        assert_eq!(encounter.name_counts().count("Hobgoblin"), 1);
        assert_eq!(encounter.combatant(&b).unwrap().index_label(), 1);
        // The remaining goblin no longer needs its index
        assert_eq!(encounter.display_name(&a).unwrap(), "Goblin");
    }

    #[test]
    fn test_alias_overrides_display_name() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut encounter = Encounter::new();

        let id = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        encounter.set_alias(&id, "Boss".to_string()).unwrap();
        assert_eq!(encounter.display_name(&id).unwrap(), "Boss");
    }

    #[test]
    fn test_initiative_group_synchronizes() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut encounter = Encounter::new();

        let a = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        let b = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        let lone = encounter.add_from_template(monster("Ogre", 59), &settings, &mut rng);

        encounter
            .set_initiative_group(&a, Some("pack".to_string()))
            .unwrap();
        encounter
            .set_initiative_group(&b, Some("pack".to_string()))
            .unwrap();
        encounter.set_initiative(&lone, 3).unwrap();

        encounter.set_initiative(&a, 17).unwrap();

        assert_eq!(encounter.combatant(&a).unwrap().initiative(), 17);
        assert_eq!(encounter.combatant(&b).unwrap().initiative(), 17);
        assert_eq!(encounter.combatant(&lone).unwrap().initiative(), 3);
        // Propagation only touches the value, never membership
        assert_eq!(
            encounter.combatant(&b).unwrap().initiative_group(),
            Some("pack")
        );
    }

    #[test]
    fn test_group_sync_from_either_member() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut encounter = Encounter::new();

        let a = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        let b = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        for id in [&a, &b] {
            encounter
                .set_initiative_group(id, Some("pack".to_string()))
                .unwrap();
        }

        encounter.set_initiative(&b, 12).unwrap();
        assert_eq!(encounter.combatant(&a).unwrap().initiative(), 12);
        assert_eq!(encounter.combatant(&b).unwrap().initiative(), 12);
    }

    #[test]
    fn test_roll_initiative_applies_to_group() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut encounter = Encounter::new();

        let a = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        let b = encounter.add_from_template(monster("Goblin", 7), &settings, &mut rng);
        for id in [&a, &b] {
            encounter
                .set_initiative_group(id, Some("pack".to_string()))
                .unwrap();
        }

        let rolled = encounter.roll_initiative(&a, &mut rng).unwrap();
        assert_eq!(encounter.combatant(&a).unwrap().initiative(), rolled);
        assert_eq!(encounter.combatant(&b).unwrap().initiative(), rolled);
    }

    #[test]
    fn test_defeat_emits_telemetry_once() {
        let settings = Settings::default();
        let mut rng = rng();
        let events = Rc::new(RefCell::new(RecordingSink::default()));
        let mut encounter = Encounter::with_sink(Box::new(Rc::clone(&events)));

        let id = encounter.add_from_template(monster("Goblin", 30), &settings, &mut rng);
        let outcome = encounter.apply_damage(&id, 35, &settings).unwrap();
        assert!(outcome.defeated);
        assert_eq!(encounter.combatant(&id).unwrap().current_hp(), 0);

        let recorded = &events.borrow().events;
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].0, "CombatantDefeated");
        assert_eq!(recorded[0].1, json!({ "Name": "Goblin" }));
    }

    #[test]
    fn test_survivable_damage_emits_nothing() {
        let settings = Settings::default();
        let mut rng = rng();
        let events = Rc::new(RefCell::new(RecordingSink::default()));
        let mut encounter = Encounter::with_sink(Box::new(Rc::clone(&events)));

        let id = encounter.add_from_template(monster("Goblin", 30), &settings, &mut rng);
        encounter.apply_damage(&id, 29, &settings).unwrap();
        assert!(events.borrow().events.is_empty());
    }

    #[test]
    fn test_no_defeat_event_when_negative_hp_allowed() {
        let mut settings = Settings::default();
        settings.rules.allow_negative_hp = true;
        let mut rng = rng();
        let events = Rc::new(RefCell::new(RecordingSink::default()));
        let mut encounter = Encounter::with_sink(Box::new(Rc::clone(&events)));

        let id = encounter.add_from_template(monster("Goblin", 30), &settings, &mut rng);
        encounter.apply_damage(&id, 35, &settings).unwrap();
        assert_eq!(encounter.combatant(&id).unwrap().current_hp(), -5);
        assert!(events.borrow().events.is_empty());
    }

    #[test]
    fn test_restore_and_save_round_trip() {
        let mut rng = rng();
        let mut encounter = Encounter::new();

        let saved: SavedCombatant = serde_json::from_str(
            r#"{
                "Id": 42,
                "StatBlock": { "Name": "Wolf", "HP": { "Value": 11 } },
                "CurrentHP": 6,
                "Initiative": 14
            }"#,
        )
        .unwrap();
        let id = encounter.restore(saved, &mut rng);
        assert_eq!(id, CombatantId::new("42"));

        let combatant = encounter.combatant(&id).unwrap();
        assert_eq!(combatant.current_hp(), 6);
        assert_eq!(combatant.initiative(), 14);

        let saved_again = combatant.to_saved();
        assert_eq!(saved_again.current_hp, 6);
        assert_eq!(saved_again.initiative, 14);
    }

    #[test]
    fn test_damage_through_encounter() {
        let settings = Settings::default();
        let mut rng = rng();
        let mut encounter = Encounter::new();

        let id = encounter.add_from_template(monster("Ogre", 59), &settings, &mut rng);
        encounter.apply_temporary_hp(&id, 5).unwrap();
        let outcome = encounter.apply_damage(&id, 8, &settings).unwrap();
        assert_eq!(outcome.absorbed, 5);
        let combatant = encounter.combatant(&id).unwrap();
        assert_eq!(combatant.temporary_hp(), 0);
        assert_eq!(combatant.current_hp(), 56);
    }
}
