//! tracker_core - Turn-based combat tracking engine
//!
//! This library provides:
//! - Combatant: A stat-block template instantiated into a live encounter
//! - Encounter: The combatant collection with initiative-group sync and
//!   name-collision indexing
//! - StaticCombatantView: Spectator-facing projection governed by HP
//!   verbosity settings
//! - Saved records: Tolerant persistence shapes for restoring sessions
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use tracker_core::prelude::*;
//!
//! let settings = Settings::default();
//! let mut rng = rand::thread_rng();
//! let mut encounter = Encounter::new();
//!
//! let mut goblin = StatBlock::default();
//! goblin.name = "Goblin".to_string();
//! goblin.hp.value = 7;
//!
//! let id = encounter.add_from_template(goblin, &settings, &mut rng);
//! encounter.roll_initiative(&id, &mut rng).unwrap();
//! let outcome = encounter.apply_damage(&id, 5, &settings).unwrap();
//! println!("{} penetrating damage", outcome.penetrating);
//! ```

pub mod combatant;
pub mod display;
pub mod encounter;
pub mod prelude;
pub mod settings;
pub mod stat_block;
pub mod telemetry;

// Core API - what most users need
pub use combatant::{Combatant, CombatantId, DamageOutcome, SavedCombatant, Tag};
pub use encounter::{Encounter, EncounterError, NameCounts};
pub use stat_block::{AbilityScores, StatBlock, ValueAndNotes};

// Display projection
pub use display::{static_view, HealthTier, HpColor, HpDisplay, StaticCombatantView};

// Configuration
pub use settings::{HpVerbosity, PlayerViewSettings, RulesSettings, Settings, SettingsError};

// Telemetry
pub use telemetry::{LogSink, NullSink, RecordingSink, TelemetrySink};

// Re-export commonly needed rules_core types
pub use rules_core::{ability_check, modifier_from_score, Advantage, DiceExpression, RollResult};
