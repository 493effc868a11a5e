//! Prelude module for convenient imports
//!
//! ```rust
//! use tracker_core::prelude::*;
//! ```

// Core types
pub use crate::combatant::{Combatant, CombatantId, DamageOutcome, SavedCombatant, Tag};
pub use crate::encounter::{Encounter, EncounterError, NameCounts};
pub use crate::stat_block::{AbilityScores, StatBlock, ValueAndNotes};

// Display projection
pub use crate::display::{static_view, HealthTier, HpColor, HpDisplay, StaticCombatantView};

// Config
pub use crate::settings::{HpVerbosity, RulesSettings, Settings};

// Telemetry
pub use crate::telemetry::{LogSink, NullSink, TelemetrySink};

// Re-exports from rules_core
pub use rules_core::{ability_check, modifier_from_score, Advantage, DiceExpression, RollResult};
