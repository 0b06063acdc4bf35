//! Serde shapes the data files deserialize into.
//!
//! Recipes reference abilities and units by name; [`crate::registry`]
//! resolves the names into battle-core values. Conversions that need no
//! lookup live here on the recipe itself.

use battle_core::{
    Alliance, BaseStats, BattleConfig, Direction, GridBoard, Locomotion, Point, Script,
    ScriptBook, VictoryRule,
};
use serde::{Deserialize, Serialize};

// =============================================================================
// Units
// =============================================================================

/// Blueprint for one unit kind.
///
/// `strategy` doubles as the driver switch: a unit without one is player
/// controlled, a unit with one is computer controlled and the tag is handed
/// to the planner untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitRecipe {
    pub name: String,
    pub alliance: Alliance,
    pub locomotion: Locomotion,
    /// Stat line at level one.
    pub base: BaseStats,
    /// Per-level increment past level one.
    #[serde(default)]
    pub growth: BaseStats,
    /// Name of the ability answering the bare attack command.
    pub attack: String,
    #[serde(default)]
    pub catalog: Vec<CategoryRecipe>,
    #[serde(default)]
    pub strategy: Option<String>,
}

impl UnitRecipe {
    /// Stat line at `level`: base plus one growth step per level past the
    /// first. Levels below one scale like level one.
    pub fn stats_at(&self, level: i32) -> BaseStats {
        let steps = (level - 1).max(0);
        BaseStats {
            max_hp: self.base.max_hp + self.growth.max_hp * steps,
            max_mp: self.base.max_mp + self.growth.max_mp * steps,
            atk: self.base.atk + self.growth.atk * steps,
            def: self.base.def + self.growth.def * steps,
            mat: self.base.mat + self.growth.mat * steps,
            mdf: self.base.mdf + self.growth.mdf * steps,
            evd: self.base.evd + self.growth.evd * steps,
            res: self.base.res + self.growth.res * steps,
            spd: self.base.spd + self.growth.spd * steps,
            mov: self.base.mov + self.growth.mov * steps,
        }
    }
}

/// One ability-menu category, listing its abilities by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRecipe {
    pub name: String,
    pub abilities: Vec<String>,
}

// =============================================================================
// Encounters
// =============================================================================

/// A complete battle description: board, who spawns, and how it ends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EncounterRecipe {
    pub name: String,
    pub board: BoardRecipe,
    pub spawns: Vec<SpawnRecipe>,
    #[serde(default)]
    pub victory: VictoryRecipe,
    #[serde(default)]
    pub scripts: ScriptRecipe,
    #[serde(default = "default_experience_award")]
    pub experience_award: i32,
}

fn default_experience_award() -> i32 {
    BattleConfig::VICTORY_EXPERIENCE
}

/// Rectangular board with blocked tiles.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoardRecipe {
    pub width: i32,
    pub height: i32,
    #[serde(default)]
    pub obstacles: Vec<Point>,
}

impl BoardRecipe {
    pub fn build(&self) -> GridBoard {
        GridBoard::new(self.width, self.height).with_obstacles(self.obstacles.iter().copied())
    }
}

/// One spawn slot. The level rolls inside `min_level..=max_level`; position
/// and facing stay random unless pinned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpawnRecipe {
    pub unit: String,
    #[serde(default = "default_level")]
    pub min_level: i32,
    #[serde(default = "default_level")]
    pub max_level: i32,
    #[serde(default)]
    pub position: Option<Point>,
    #[serde(default)]
    pub facing: Option<Direction>,
}

fn default_level() -> i32 {
    1
}

/// Victory condition shape. Without a target slot the battle runs until one
/// whole side falls.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct VictoryRecipe {
    /// Index into the spawn list of the unit whose defeat ends the battle.
    #[serde(default)]
    pub target_spawn: Option<usize>,
    /// Hit point floor granted to the target.
    #[serde(default)]
    pub min_hp: i32,
}

impl VictoryRecipe {
    pub fn to_rule(self) -> VictoryRule {
        match self.target_spawn {
            Some(spawn_index) => VictoryRule::DefeatTarget {
                spawn_index,
                min_hp: self.min_hp,
            },
            None => VictoryRule::DefeatAllEnemies,
        }
    }
}

/// Cut-scene pages for the three battle bookends. Empty lists mean the
/// bookend is skipped.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptRecipe {
    #[serde(default)]
    pub intro: Vec<String>,
    #[serde(default)]
    pub victory: Vec<String>,
    #[serde(default)]
    pub defeat: Vec<String>,
}

impl ScriptRecipe {
    pub fn to_book(&self) -> ScriptBook {
        ScriptBook {
            intro: pages(&self.intro),
            victory: pages(&self.victory),
            defeat: pages(&self.defeat),
        }
    }
}

fn pages(lines: &[String]) -> Option<Script> {
    (!lines.is_empty()).then(|| Script {
        pages: lines.to_vec(),
    })
}
