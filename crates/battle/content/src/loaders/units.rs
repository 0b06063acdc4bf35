//! Unit recipe loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::recipes::UnitRecipe;

/// Loader for unit recipes from RON files.
pub struct UnitLoader;

impl UnitLoader {
    /// Load unit recipes from a RON file.
    ///
    /// RON format: `Vec<UnitRecipe>`. Abilities are referenced by name and
    /// stay unresolved until the recipes reach a registry.
    pub fn load(path: &Path) -> LoadResult<Vec<UnitRecipe>> {
        let content = read_file(path)?;
        let units: Vec<UnitRecipe> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse unit recipe RON: {}", e))?;
        Ok(units)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Alliance, Locomotion};
    use std::io::Write;

    #[test]
    fn parses_recipes_and_fills_optional_fields() {
        let source = r#"
[
    (
        name: "Aleph",
        alliance: Hero,
        locomotion: Walk,
        base: (max_hp: 20, max_mp: 6, atk: 14, def: 8, mat: 6, mdf: 6, evd: 10, res: 8, spd: 9, mov: 4),
        growth: (max_hp: 4, max_mp: 1, atk: 2, def: 1, mat: 1, mdf: 1, evd: 0, res: 0, spd: 0, mov: 0),
        attack: "Sword",
        catalog: [
            (name: "Tactics", abilities: ["Shockwave"]),
        ],
    ),
    (
        name: "Bug",
        alliance: Enemy,
        locomotion: Walk,
        base: (max_hp: 16, max_mp: 0, atk: 12, def: 6, mat: 4, mdf: 4, evd: 8, res: 5, spd: 8, mov: 4),
        attack: "Fang",
        strategy: Some("brute"),
    ),
]
"#;
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(source.as_bytes()).expect("write");

        let units = UnitLoader::load(file.path()).expect("load");
        assert_eq!(units.len(), 2);

        let aleph = &units[0];
        assert_eq!(aleph.alliance, Alliance::Hero);
        assert_eq!(aleph.base.atk, 14);
        assert_eq!(aleph.catalog[0].abilities, vec!["Shockwave".to_string()]);
        // No strategy tag: player controlled.
        assert_eq!(aleph.strategy, None);

        let bug = &units[1];
        assert_eq!(bug.locomotion, Locomotion::Walk);
        assert_eq!(bug.strategy.as_deref(), Some("brute"));
        // Omitted growth defaults to a flat line.
        assert_eq!(bug.growth.max_hp, 0);
        assert!(bug.catalog.is_empty());
    }
}
