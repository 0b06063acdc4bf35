//! File loaders turning RON and TOML data into battle values.
//!
//! Ability and unit catalogs ship as RON, encounters as TOML. Catalog files
//! deserialize straight into battle-core values where they can; everything
//! else goes through the [`crate::recipes`] shapes. [`ContentFactory`] wires
//! a whole data directory together.

pub mod abilities;
pub mod encounters;
pub mod factory;
pub mod units;

pub use abilities::AbilityLoader;
pub use encounters::EncounterLoader;
pub use factory::ContentFactory;
pub use units::UnitLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Reads a data file into memory, naming the path on failure.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
