//! Name-resolved content lookups.
//!
//! Loaders fill the registry with parsed catalogs; encounter building drains
//! it by name. Names are the only cross-references the data files carry, so
//! every miss names the referent that asked for it.

use std::collections::HashMap;

use battle_core::{Ability, AbilityCatalog, AbilityCategory, Driver, UnitSpec};

use crate::loaders::LoadResult;
use crate::recipes::UnitRecipe;

/// Parsed content, keyed by name.
#[derive(Debug, Default)]
pub struct ContentRegistry {
    abilities: HashMap<String, Ability>,
    units: HashMap<String, UnitRecipe>,
}

impl ContentRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an ability under its own name.
    pub fn add_ability(&mut self, ability: Ability) -> LoadResult<()> {
        if self.abilities.contains_key(&ability.name) {
            anyhow::bail!("duplicate ability '{}'", ability.name);
        }
        self.abilities.insert(ability.name.clone(), ability);
        Ok(())
    }

    /// Registers a unit recipe under its own name.
    pub fn add_unit(&mut self, recipe: UnitRecipe) -> LoadResult<()> {
        if self.units.contains_key(&recipe.name) {
            anyhow::bail!("duplicate unit '{}'", recipe.name);
        }
        self.units.insert(recipe.name.clone(), recipe);
        Ok(())
    }

    pub fn ability(&self, name: &str) -> Option<&Ability> {
        self.abilities.get(name)
    }

    pub fn unit(&self, name: &str) -> Option<&UnitRecipe> {
        self.units.get(name)
    }

    /// Assembles a spawnable spec: stats scaled to `level`, ability names
    /// resolved against the catalog, driver chosen by the strategy rule.
    pub fn unit_spec(&self, name: &str, level: i32) -> LoadResult<UnitSpec> {
        let recipe = self
            .units
            .get(name)
            .ok_or_else(|| anyhow::anyhow!("unknown unit '{}'", name))?;

        let attack = self.resolve_ability(&recipe.attack, name)?.clone();
        let mut categories = Vec::with_capacity(recipe.catalog.len());
        for category in &recipe.catalog {
            let mut abilities = Vec::with_capacity(category.abilities.len());
            for ability_name in &category.abilities {
                abilities.push(self.resolve_ability(ability_name, name)?.clone());
            }
            categories.push(AbilityCategory {
                name: category.name.clone(),
                abilities,
            });
        }

        let mut spec = UnitSpec::new(recipe.name.clone(), recipe.alliance);
        spec.locomotion = recipe.locomotion;
        spec.level = level;
        spec.stats = recipe.stats_at(level);
        spec.attack = attack;
        spec.catalog = AbilityCatalog { categories };
        match &recipe.strategy {
            Some(tag) => {
                spec.driver = Driver::Computer;
                spec.strategy = Some(tag.clone());
            }
            None => spec.driver = Driver::Human,
        }
        Ok(spec)
    }

    fn resolve_ability(&self, ability: &str, unit: &str) -> LoadResult<&Ability> {
        self.abilities.get(ability).ok_or_else(|| {
            anyhow::anyhow!("unknown ability '{}' referenced by unit '{}'", ability, unit)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Alliance, BaseStats, Locomotion, StatKind};

    use crate::recipes::CategoryRecipe;

    fn sword() -> Ability {
        let mut ability = Ability::strike();
        ability.name = "Sword".to_string();
        ability
    }

    fn cure() -> Ability {
        let mut ability = Ability::strike();
        ability.name = "Cure".to_string();
        ability.mana_cost = Some(6);
        ability
    }

    fn recipe(name: &str, strategy: Option<&str>) -> UnitRecipe {
        UnitRecipe {
            name: name.to_string(),
            alliance: Alliance::Hero,
            locomotion: Locomotion::Walk,
            base: BaseStats {
                max_hp: 20,
                atk: 10,
                ..BaseStats::default()
            },
            growth: BaseStats {
                max_hp: 4,
                atk: 2,
                ..BaseStats::default()
            },
            attack: "Sword".to_string(),
            catalog: vec![CategoryRecipe {
                name: "White Magic".to_string(),
                abilities: vec!["Cure".to_string()],
            }],
            strategy: strategy.map(str::to_string),
        }
    }

    fn registry() -> ContentRegistry {
        let mut registry = ContentRegistry::new();
        registry.add_ability(sword()).expect("add sword");
        registry.add_ability(cure()).expect("add cure");
        registry
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut registry = registry();
        let err = registry.add_ability(sword()).expect_err("duplicate");
        assert!(err.to_string().contains("Sword"));

        registry.add_unit(recipe("Aleph", None)).expect("add unit");
        let err = registry
            .add_unit(recipe("Aleph", None))
            .expect_err("duplicate");
        assert!(err.to_string().contains("Aleph"));
    }

    #[test]
    fn unit_spec_resolves_names_and_scales_stats() {
        let mut registry = registry();
        registry.add_unit(recipe("Aleph", None)).expect("add unit");

        let spec = registry.unit_spec("Aleph", 10).expect("assemble");
        assert_eq!(spec.level, 10);
        assert_eq!(spec.stats.max_hp, 20 + 4 * 9);
        assert_eq!(spec.stats.atk, 10 + 2 * 9);
        assert_eq!(spec.attack.name, "Sword");
        assert_eq!(spec.catalog.ability(0, 0).map(|a| a.name.as_str()), Some("Cure"));
    }

    #[test]
    fn strategy_tag_switches_the_driver() {
        let mut registry = registry();
        registry.add_unit(recipe("Aleph", None)).expect("add unit");
        registry
            .add_unit(recipe("Bug", Some("brute")))
            .expect("add unit");

        let hero = registry.unit_spec("Aleph", 1).expect("assemble");
        assert_eq!(hero.driver, Driver::Human);
        assert_eq!(hero.strategy, None);

        let critter = registry.unit_spec("Bug", 1).expect("assemble");
        assert_eq!(critter.driver, Driver::Computer);
        assert_eq!(critter.strategy.as_deref(), Some("brute"));
    }

    #[test]
    fn missing_references_name_the_referent() {
        let mut registry = ContentRegistry::new();
        registry.add_ability(sword()).expect("add sword");
        registry.add_unit(recipe("Aleph", None)).expect("add unit");

        let err = registry.unit_spec("Ghost", 1).expect_err("unknown unit");
        assert!(err.to_string().contains("Ghost"));

        // "Cure" is in the catalog but was never registered.
        let err = registry.unit_spec("Aleph", 1).expect_err("unknown ability");
        let message = err.to_string();
        assert!(message.contains("Cure") && message.contains("Aleph"));
    }

    #[test]
    fn assembled_spec_spawns_with_full_pools() {
        use battle_core::{Direction, Point, Roster};

        let mut registry = registry();
        registry.add_unit(recipe("Aleph", None)).expect("add unit");
        let spec = registry.unit_spec("Aleph", 3).expect("assemble");

        let mut roster = Roster::new();
        let id = roster
            .spawn(spec, Point::new(0, 0), Direction::South)
            .expect("spawn");
        let unit = roster.unit(id).expect("unit");
        assert_eq!(unit.stat(StatKind::Hp), 28);
        assert_eq!(unit.stat(StatKind::Lvl), 3);
    }
}
