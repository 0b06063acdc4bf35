//! Content factory assembling battle content from a data directory.

use std::path::{Path, PathBuf};

use battle_core::Ability;

use crate::loaders::{AbilityLoader, EncounterLoader, LoadResult, UnitLoader};
use crate::recipes::{EncounterRecipe, UnitRecipe};
use crate::registry::ContentRegistry;

/// Loads battle content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── abilities.ron
/// ├── units.ron
/// └── encounters/
///     └── skirmish.toml
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the ability catalog from `abilities.ron`.
    pub fn load_abilities(&self) -> LoadResult<Vec<Ability>> {
        let path = self.data_dir.join("abilities.ron");
        AbilityLoader::load(&path)
    }

    /// Load unit recipes from `units.ron`.
    pub fn load_units(&self) -> LoadResult<Vec<UnitRecipe>> {
        let path = self.data_dir.join("units.ron");
        UnitLoader::load(&path)
    }

    /// Load an encounter from `encounters/{name}.toml`.
    pub fn load_encounter(&self, name: &str) -> LoadResult<EncounterRecipe> {
        let path = self
            .data_dir
            .join("encounters")
            .join(format!("{}.toml", name));
        EncounterLoader::load(&path)
    }

    /// Load abilities and units into a registry ready for encounter building.
    pub fn load_registry(&self) -> LoadResult<ContentRegistry> {
        let mut registry = ContentRegistry::new();
        for ability in self.load_abilities()? {
            registry.add_ability(ability)?;
        }
        for unit in self.load_units()? {
            registry.add_unit(unit)?;
        }
        Ok(registry)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Alliance, Driver, Pcg32, VictoryRule};

    use crate::encounter::build_setup;

    fn bundled() -> ContentFactory {
        ContentFactory::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    #[test]
    fn factory_paths() {
        let factory = ContentFactory::new("/tmp/data");
        assert_eq!(factory.data_dir(), Path::new("/tmp/data"));
    }

    #[test]
    fn bundled_catalogs_cross_reference_cleanly() {
        let registry = bundled().load_registry().expect("load registry");

        // Every ability a unit names must exist, at any level.
        for name in ["Aleph", "Tetrioth", "Samekh", "Bug", "Enemy Critter", "Flying Critter"] {
            registry.unit_spec(name, 10).expect("assemble unit");
        }

        let hero = registry.unit_spec("Aleph", 10).expect("assemble");
        assert_eq!(hero.alliance, Alliance::Hero);
        assert_eq!(hero.driver, Driver::Human);

        let critter = registry.unit_spec("Bug", 10).expect("assemble");
        assert_eq!(critter.alliance, Alliance::Enemy);
        assert_eq!(critter.driver, Driver::Computer);
    }

    #[test]
    fn bundled_skirmish_builds_a_setup() {
        let factory = bundled();
        let registry = factory.load_registry().expect("load registry");
        let recipe = factory.load_encounter("skirmish").expect("load encounter");

        let mut rng = Pcg32::new(7);
        let (board, setup) = build_setup(&recipe, &registry, &mut rng).expect("build");

        assert_eq!(board.width(), 10);
        assert_eq!(setup.spawns.len(), 7);
        assert!(
            setup
                .spawns
                .iter()
                .all(|s| (9..=11).contains(&s.unit.level))
        );
        // The winged raider at the back of the list is the mark.
        assert_eq!(
            setup.victory,
            VictoryRule::DefeatTarget {
                spawn_index: 6,
                min_hp: 10,
            }
        );
        assert!(setup.scripts.intro.is_some());
    }
}
