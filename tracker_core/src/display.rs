//! Spectator-facing display projection
//!
//! A pure, read-only transform of a combatant plus the display settings
//! into the flattened shape sent to spectator views. How much monster HP
//! detail leaks out is governed by the HP verbosity setting; players always
//! see their own exact numbers.

use crate::combatant::{Combatant, CombatantId, Tag};
use crate::encounter::NameCounts;
use crate::settings::{HpVerbosity, Settings};
use serde::{Serialize, Serializer};
use std::fmt;

/// Largest red/green channel intensity used by the HP gradient
const MAX_CHANNEL: f64 = 170.0;

/// Flattened, read-only combatant summary for spectator views
///
/// Serialized field names match the historical wire shape.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StaticCombatantView {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "AC")]
    pub ac: i32,
    #[serde(rename = "ACDisplay")]
    pub ac_display: bool,
    #[serde(rename = "HPDisplay")]
    pub hp_display: HpDisplay,
    #[serde(rename = "HPColor")]
    pub hp_color: HpColor,
    #[serde(rename = "Initiative")]
    pub initiative: i32,
    #[serde(rename = "Id")]
    pub id: CombatantId,
    #[serde(rename = "Tags")]
    pub tags: Vec<Tag>,
    #[serde(rename = "IsPlayerCharacter")]
    pub is_player_character: bool,
}

/// HP rendering for one combatant under the active verbosity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpDisplay {
    /// Exact "current[+temp]/max"
    Exact {
        current: i32,
        temporary: i32,
        max: i32,
    },
    /// Verbosity hides monster HP entirely
    Hidden,
    /// Signed current minus max
    DamageTaken(i32),
    /// Four-tier descriptive label
    Tier(HealthTier),
}

impl fmt::Display for HpDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HpDisplay::Exact {
                current,
                temporary: 0,
                max,
            } => write!(f, "{}/{}", current, max),
            HpDisplay::Exact {
                current,
                temporary,
                max,
            } => write!(f, "{}+{}/{}", current, temporary, max),
            HpDisplay::Hidden => Ok(()),
            HpDisplay::DamageTaken(delta) => write!(f, "{}", delta),
            HpDisplay::Tier(tier) => f.write_str(tier.label()),
        }
    }
}

impl Serialize for HpDisplay {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Descriptive health band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTier {
    Defeated,
    Bloodied,
    Hurt,
    Healthy,
}

impl HealthTier {
    /// Band for a current/max HP pair: Defeated at or below zero,
    /// Bloodied below half, Hurt below max, Healthy at max
    pub fn of(current: i32, max: i32) -> Self {
        if current <= 0 {
            HealthTier::Defeated
        } else if current * 2 < max {
            HealthTier::Bloodied
        } else if current < max {
            HealthTier::Hurt
        } else {
            HealthTier::Healthy
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            HealthTier::Defeated => "Defeated",
            HealthTier::Bloodied => "Bloodied",
            HealthTier::Hurt => "Hurt",
            HealthTier::Healthy => "Healthy",
        }
    }

    /// Style hook used by renderers
    pub fn css_class(self) -> &'static str {
        match self {
            HealthTier::Defeated => "defeatedHP",
            HealthTier::Bloodied => "bloodiedHP",
            HealthTier::Hurt => "hurtHP",
            HealthTier::Healthy => "healthyHP",
        }
    }
}

/// HP text color for spectator views
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HpColor {
    /// Defer to the renderer's default styling
    Auto,
    /// Green-to-red gradient by remaining HP ratio (blue channel is zero)
    Rgb { red: u8, green: u8 },
}

impl fmt::Display for HpColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            HpColor::Auto => f.write_str("auto"),
            HpColor::Rgb { red, green } => write!(f, "rgb({},{},0)", red, green),
        }
    }
}

impl Serialize for HpColor {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Project a combatant into its spectator-facing summary
pub fn static_view(
    combatant: &Combatant,
    counts: &NameCounts,
    settings: &Settings,
) -> StaticCombatantView {
    let verbosity = settings.player_view.monster_hp_verbosity;
    StaticCombatantView {
        name: combatant.display_name(counts),
        ac: combatant.ac(),
        ac_display: ac_display(combatant),
        hp_display: hp_display(combatant, verbosity),
        hp_color: hp_color(combatant, verbosity),
        initiative: combatant.initiative(),
        id: combatant.id().clone(),
        tags: combatant.tags().to_vec(),
        is_player_character: combatant.is_player_character(),
    }
}

fn ac_display(combatant: &Combatant) -> bool {
    combatant.is_player_character() || !combatant.hide_ac()
}

fn hp_display(combatant: &Combatant, verbosity: HpVerbosity) -> HpDisplay {
    if combatant.is_player_character() || verbosity == HpVerbosity::ActualHp {
        return HpDisplay::Exact {
            current: combatant.current_hp(),
            temporary: combatant.temporary_hp(),
            max: combatant.max_hp(),
        };
    }
    match verbosity {
        HpVerbosity::HideAll => HpDisplay::Hidden,
        HpVerbosity::DamageTaken => {
            HpDisplay::DamageTaken(combatant.current_hp() - combatant.max_hp())
        }
        _ => HpDisplay::Tier(HealthTier::of(combatant.current_hp(), combatant.max_hp())),
    }
}

fn hp_color(combatant: &Combatant, verbosity: HpVerbosity) -> HpColor {
    let monochrome = matches!(
        verbosity,
        HpVerbosity::MonochromeLabel | HpVerbosity::HideAll | HpVerbosity::DamageTaken
    );
    if !combatant.is_player_character() && monochrome {
        return HpColor::Auto;
    }

    let ratio = if combatant.max_hp() > 0 {
        (combatant.current_hp() as f64 / combatant.max_hp() as f64).clamp(0.0, 1.0)
    } else {
        0.0
    };
    HpColor::Rgb {
        red: ((1.0 - ratio) * MAX_CHANNEL) as u8,
        green: (ratio * MAX_CHANNEL) as u8,
    }
}
