//! Character and monster templates

use rules_core::modifier_from_score;
use serde::{Deserialize, Serialize};

/// A numeric stat paired with free-text notes
///
/// Hit points use the notes for the dice expression ("2d6+2"); armor class
/// notes hold descriptive text ("natural armor").
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValueAndNotes {
    #[serde(rename = "Value")]
    pub value: i32,
    #[serde(rename = "Notes")]
    pub notes: String,
}

/// The six raw ability scores
///
/// Also used to carry the derived modifiers, one per ability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityScores {
    #[serde(rename = "Str")]
    pub strength: i32,
    #[serde(rename = "Dex")]
    pub dexterity: i32,
    #[serde(rename = "Con")]
    pub constitution: i32,
    #[serde(rename = "Int")]
    pub intelligence: i32,
    #[serde(rename = "Wis")]
    pub wisdom: i32,
    #[serde(rename = "Cha")]
    pub charisma: i32,
}

impl Default for AbilityScores {
    fn default() -> Self {
        AbilityScores {
            strength: 10,
            dexterity: 10,
            constitution: 10,
            intelligence: 10,
            wisdom: 10,
            charisma: 10,
        }
    }
}

impl AbilityScores {
    /// Derive the modifier for each score
    pub fn modifiers(&self) -> AbilityScores {
        AbilityScores {
            strength: modifier_from_score(self.strength),
            dexterity: modifier_from_score(self.dexterity),
            constitution: modifier_from_score(self.constitution),
            intelligence: modifier_from_score(self.intelligence),
            wisdom: modifier_from_score(self.wisdom),
            charisma: modifier_from_score(self.charisma),
        }
    }
}

/// Static definition of a character or monster's base stats
///
/// Read-only from the tracker's perspective; a combatant holds a replaceable
/// snapshot. Every field defaults, so partial JSON merges against the
/// defaults the way stored stat blocks expect.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatBlock {
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "AC")]
    pub ac: ValueAndNotes,
    #[serde(rename = "HP")]
    pub hp: ValueAndNotes,
    #[serde(rename = "Abilities")]
    pub abilities: AbilityScores,
    /// "player" for player characters, anything else for monsters
    #[serde(rename = "Player")]
    pub player: String,
    #[serde(rename = "InitiativeModifier")]
    pub initiative_modifier: Option<i32>,
    #[serde(rename = "InitiativeAdvantage")]
    pub initiative_advantage: bool,
}

impl StatBlock {
    /// Whether this template is player-controlled
    pub fn is_player(&self) -> bool {
        self.player == "player"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_merges_defaults() {
        let block: StatBlock = serde_json::from_str(
            r#"{ "Name": "Goblin", "HP": { "Value": 7, "Notes": "2d6" } }"#,
        )
        .unwrap();

        assert_eq!(block.name, "Goblin");
        assert_eq!(block.hp.value, 7);
        assert_eq!(block.hp.notes, "2d6");
        assert_eq!(block.ac.value, 0);
        assert_eq!(block.abilities.dexterity, 10);
        assert_eq!(block.initiative_modifier, None);
        assert!(!block.is_player());
    }

    #[test]
    fn test_player_flag() {
        let block: StatBlock =
            serde_json::from_str(r#"{ "Name": "Mira", "Player": "player" }"#).unwrap();
        assert!(block.is_player());

        let block: StatBlock =
            serde_json::from_str(r#"{ "Name": "Ogre", "Player": "npc" }"#).unwrap();
        assert!(!block.is_player());
    }

    #[test]
    fn test_ability_modifiers() {
        let scores = AbilityScores {
            strength: 18,
            dexterity: 14,
            constitution: 12,
            intelligence: 10,
            wisdom: 9,
            charisma: 6,
        };
        let mods = scores.modifiers();
        assert_eq!(mods.strength, 4);
        assert_eq!(mods.dexterity, 2);
        assert_eq!(mods.constitution, 1);
        assert_eq!(mods.intelligence, 0);
        assert_eq!(mods.wisdom, -1);
        assert_eq!(mods.charisma, -2);
    }
}
