//! Computer drivers for enemy (and auto-piloted hero) turns.

use battle_core::{
    AbilityChoice, Direction, Plan, PlanContext, Planner, Point, Roster, Unit, move_range,
};

/// Closes on the nearest standing foe and strikes with the basic attack as
/// soon as a reachable tile puts the foe in range.
///
/// The unit's strategy tag tweaks the approach: `skirmisher` strikes from
/// the farthest tile that still reaches, everyone else steps as close as
/// the strike allows. Unknown tags get the aggressive default.
#[derive(Debug, Default)]
pub struct NearestFoePlanner;

impl NearestFoePlanner {
    fn keeps_distance(unit: &Unit) -> bool {
        unit.strategy() == Some("skirmisher")
    }
}

impl Planner for NearestFoePlanner {
    fn evaluate(&mut self, ctx: PlanContext<'_>) -> Plan {
        let Some(actor) = ctx.roster.unit(ctx.actor) else {
            return Plan {
                ability: None,
                move_to: Point::new(0, 0),
                aim_at: Point::new(0, 0),
                attack_facing: Direction::North,
            };
        };
        let hold = Plan {
            ability: None,
            move_to: actor.position(),
            aim_at: actor.position(),
            attack_facing: actor.facing(),
        };
        let Some(foe) = nearest_foe(ctx.roster, actor) else {
            return hold;
        };

        // Staying put is always a candidate destination.
        let mut candidates = vec![actor.position()];
        candidates.extend(move_range(ctx.board, ctx.roster, actor));

        let attack = actor.attack();
        let mut strike: Option<(Point, i32)> = None;
        let mut approach = (actor.position(), actor.position().distance(foe.position()));
        for tile in candidates {
            let gap = tile.distance(foe.position());
            let facing = Direction::between(tile, foe.position()).unwrap_or(actor.facing());
            if attack
                .range
                .tiles(ctx.board, tile, facing)
                .contains(&foe.position())
            {
                let better = match strike {
                    None => true,
                    Some((_, held)) => {
                        if Self::keeps_distance(actor) {
                            gap > held
                        } else {
                            gap < held
                        }
                    }
                };
                if better {
                    strike = Some((tile, gap));
                }
            }
            if gap < approach.1 {
                approach = (tile, gap);
            }
        }

        match strike {
            Some((tile, _)) => {
                tracing::debug!(actor = %ctx.actor, from = ?tile, foe = %foe.id(), "planned strike");
                Plan {
                    ability: Some(AbilityChoice::Attack),
                    move_to: tile,
                    aim_at: foe.position(),
                    attack_facing: Direction::between(tile, foe.position())
                        .unwrap_or(actor.facing()),
                }
            }
            None => {
                tracing::debug!(actor = %ctx.actor, toward = ?approach.0, foe = %foe.id(), "planned approach");
                Plan {
                    ability: None,
                    move_to: approach.0,
                    aim_at: foe.position(),
                    attack_facing: Direction::between(approach.0, foe.position())
                        .unwrap_or(actor.facing()),
                }
            }
        }
    }

    fn end_facing(&mut self, ctx: PlanContext<'_>) -> Direction {
        let Some(actor) = ctx.roster.unit(ctx.actor) else {
            return Direction::North;
        };
        match nearest_foe(ctx.roster, actor) {
            Some(foe) => Direction::between(actor.position(), foe.position())
                .unwrap_or(actor.facing()),
            None => actor.facing(),
        }
    }
}

/// Closest foe still standing, first-spawned on ties.
fn nearest_foe<'r>(roster: &'r Roster, actor: &Unit) -> Option<&'r Unit> {
    roster
        .iter()
        .filter(|unit| unit.alliance().is_foe_of(actor.alliance()) && !unit.is_knocked_out())
        .min_by_key(|unit| actor.position().distance(unit.position()))
}
