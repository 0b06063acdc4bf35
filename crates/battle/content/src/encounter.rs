//! Turns an encounter recipe into a runnable battle.

use battle_core::{BattleRng, BattleSetup, GridBoard, SpawnSpec};

use crate::loaders::LoadResult;
use crate::recipes::EncounterRecipe;
use crate::registry::ContentRegistry;

/// Builds the board and setup an encounter file describes.
///
/// Spawn levels roll inside the recipe's range here; placement stays with
/// the battle itself, which lands positionless spawns on random free tiles.
pub fn build_setup(
    recipe: &EncounterRecipe,
    registry: &ContentRegistry,
    rng: &mut dyn BattleRng,
) -> LoadResult<(GridBoard, BattleSetup)> {
    let board = recipe.board.build();
    let mut setup = BattleSetup::new();
    for spawn in &recipe.spawns {
        let level = rng.range_i32(spawn.min_level, spawn.max_level);
        let unit = registry.unit_spec(&spawn.unit, level)?;
        setup.spawns.push(SpawnSpec {
            unit,
            position: spawn.position,
            facing: spawn.facing,
        });
    }
    setup.victory = recipe.victory.to_rule();
    setup.scripts = recipe.scripts.to_book();
    setup.experience_award = recipe.experience_award;
    Ok((board, setup))
}
