//! Encounter loader.

use std::path::Path;

use crate::loaders::{LoadResult, read_file};
use crate::recipes::EncounterRecipe;

/// Loader for encounter descriptions from TOML files.
pub struct EncounterLoader;

impl EncounterLoader {
    /// Load an encounter description from a TOML file.
    pub fn load(path: &Path) -> LoadResult<EncounterRecipe> {
        let content = read_file(path)?;
        let recipe: EncounterRecipe = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse encounter TOML: {}", e))?;
        Ok(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use battle_core::{Direction, Point, VictoryRule};
    use std::io::Write;

    #[test]
    fn parses_a_full_encounter() {
        let source = r#"
name = "nest"
experience_award = 80

[board]
width = 8
height = 6
obstacles = [{ x = 3, y = 3 }]

[[spawns]]
unit = "Aleph"
min_level = 9
max_level = 11
position = { x = 1, y = 1 }
facing = "East"

[[spawns]]
unit = "Bug"
min_level = 9
max_level = 11

[victory]
target_spawn = 1
min_hp = 10

[scripts]
intro = ["Hold the pass."]
victory = ["The pass is held."]
"#;
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(source.as_bytes()).expect("write");

        let recipe = EncounterLoader::load(file.path()).expect("load");
        assert_eq!(recipe.name, "nest");
        assert_eq!(recipe.experience_award, 80);
        assert_eq!(recipe.board.obstacles, vec![Point::new(3, 3)]);

        assert_eq!(recipe.spawns[0].position, Some(Point::new(1, 1)));
        assert_eq!(recipe.spawns[0].facing, Some(Direction::East));
        assert_eq!(recipe.spawns[1].position, None);

        assert_eq!(
            recipe.victory.to_rule(),
            VictoryRule::DefeatTarget {
                spawn_index: 1,
                min_hp: 10,
            }
        );
        let book = recipe.scripts.to_book();
        assert!(book.intro.is_some());
        assert!(book.defeat.is_none());
    }

    #[test]
    fn omitted_sections_fall_back_to_defaults() {
        let source = r#"
name = "brawl"

[board]
width = 4
height = 4

[[spawns]]
unit = "Bug"
"#;
        let mut file = tempfile::NamedTempFile::new().expect("temp file");
        file.write_all(source.as_bytes()).expect("write");

        let recipe = EncounterLoader::load(file.path()).expect("load");
        assert_eq!(recipe.victory.to_rule(), VictoryRule::DefeatAllEnemies);
        assert_eq!(recipe.spawns[0].min_level, 1);
        assert_eq!(recipe.spawns[0].max_level, 1);
        assert_eq!(recipe.experience_award, 100);
        assert!(recipe.board.obstacles.is_empty());
    }
}
