//! Deterministic tactical battle simulation.
//!
//! `battle-core` holds the canonical battle rules: the grid, the roster, the
//! counter-driven scheduler, ability resolution, and the phase machine that
//! ties them together. Everything is pure and single-threaded; the crate does
//! no I/O, spawns no tasks, and takes randomness only through [`BattleRng`].
//! Callers drive a [`BattleFlow`] by pumping it and feeding it input, and
//! observe it through drained [`BattleEvent`]s.

pub mod ability;
pub mod board;
pub mod config;
pub mod error;
pub mod events;
pub mod experience;
pub mod flow;
pub mod menu;
pub mod resolver;
pub mod rng;
pub mod roster;
pub mod scheduler;
pub mod stats;
pub mod status;
pub mod targeting;
pub mod turn;
pub mod types;
pub mod victory;

pub use ability::{
    Ability, AbilityCatalog, AbilityCategory, EffectGroup, EffectKind, HitMethod, TargetFilter,
};
pub use board::{Board, GridBoard};
pub use config::BattleConfig;
pub use error::CoreError;
pub use events::BattleEvent;
pub use experience::{ExperienceAward, award_experience};
pub use flow::{
    BattleFlow, BattleSetup, FlowSignal, Phase, Script, ScriptBook, SpawnSpec, VictoryRule,
};
pub use menu::{Menu, MenuEntry};
pub use resolver::{EffectOutcome, EffectTweak, PerformReport, Resolver};
pub use rng::{BattleRng, Pcg32};
pub use roster::{Roster, Unit, UnitSpec};
pub use scheduler::{GateId, RoundStep, TurnCheck, TurnGate, TurnScheduler};
pub use stats::{BaseStats, StatChange, StatKind};
pub use status::{StatusGate, StatusKind};
pub use targeting::{AreaShape, RangeShape, TargetRing, move_range};
pub use turn::{AbilityChoice, Plan, PlanContext, Planner, Turn};
pub use types::{
    Alliance, Direction, Driver, EntityId, FireInput, Locomotion, Point, RelativeFacing,
};
pub use victory::{DefeatAllEnemies, DefeatTarget, Victor, VictoryCondition};
