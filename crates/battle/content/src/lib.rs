//! Data-driven battle content and loaders.
//!
//! This crate houses the recipe shapes data files deserialize into and the
//! loaders that read them:
//! - Ability catalogs (RON, deserialized straight into battle-core values)
//! - Unit recipes with growth lines and ability references (RON)
//! - Encounters: board, spawn list, victory rule, scripts (TOML)
//!
//! Recipes cross-reference each other by name only; [`registry::ContentRegistry`]
//! resolves the names and hands battle-core fully assembled specs. Content
//! never reaches into a running battle.

#[cfg(feature = "serde")]
pub mod recipes;

#[cfg(feature = "loaders")]
pub mod encounter;
#[cfg(feature = "loaders")]
pub mod loaders;
#[cfg(feature = "loaders")]
pub mod registry;

#[cfg(feature = "serde")]
pub use recipes::{
    BoardRecipe, CategoryRecipe, EncounterRecipe, ScriptRecipe, SpawnRecipe, UnitRecipe,
    VictoryRecipe,
};

#[cfg(feature = "loaders")]
pub use encounter::build_setup;
#[cfg(feature = "loaders")]
pub use loaders::{AbilityLoader, ContentFactory, EncounterLoader, LoadResult, UnitLoader};
#[cfg(feature = "loaders")]
pub use registry::ContentRegistry;
