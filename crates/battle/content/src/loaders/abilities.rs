//! Ability catalog loader.

use std::path::Path;

use battle_core::Ability;

use crate::loaders::{LoadResult, read_file};

/// Loader for ability catalogs from RON files.
pub struct AbilityLoader;

impl AbilityLoader {
    /// Load an ability catalog from a RON file.
    ///
    /// RON format: `Vec<Ability>`. Each ability is keyed later by its own
    /// name, so names must be unique across the file; the registry enforces
    /// that on insert.
    pub fn load(path: &Path) -> LoadResult<Vec<Ability>> {
        let content = read_file(path)?;
        let abilities: Vec<Ability> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse ability catalog RON: {}", e))?;
        Ok(abilities)
    }
}
