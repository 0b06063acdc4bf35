//! Enter, exit, and input behavior of each phase.
//!
//! Enter handlers queue automatic steps; only input handlers transition
//! directly. Rejected intents (confirming an empty target list, stepping off
//! the board) are silent no-ops.

use crate::ability::Ability;
use crate::config::BattleConfig;
use crate::events::BattleEvent;
use crate::experience::award_experience;
use crate::menu::Menu;
use crate::resolver::PerformReport;
use crate::status::StatusKind;
use crate::targeting::{TargetRing, move_range};
use crate::turn::{AbilityChoice, PlanContext};
use crate::types::{Alliance, Direction, Driver, EntityId, FireInput, Point};
use crate::victory::Victor;

use super::auto::AutoStep;
use super::{BattleFlow, Phase, ScriptCursor};

impl BattleFlow {
    pub(super) fn enter_phase(&mut self, phase: Phase) {
        match phase {
            Phase::Init => {}
            Phase::CutScene => self.enter_cut_scene(),
            Phase::SelectUnit => self.enter_select_unit(),
            Phase::Explore => self.enter_explore(),
            Phase::CommandSelection => self.enter_command_selection(),
            Phase::CategorySelection => self.enter_category_selection(),
            Phase::ActionSelection => self.enter_action_selection(),
            Phase::MoveTarget => self.enter_move_target(),
            Phase::MoveSequence => self.enter_move_sequence(),
            Phase::AbilityTarget => self.enter_ability_target(),
            Phase::ConfirmAbilityTarget => self.enter_confirm_ability_target(),
            Phase::PerformAbility => self.enter_perform_ability(),
            Phase::EndFacing => self.enter_end_facing(),
            Phase::EndBattle => self.enter_end_battle(),
        }
    }

    pub(super) fn exit_phase(&mut self, phase: Phase) {
        match phase {
            Phase::CutScene => {
                self.script = None;
            }
            Phase::Explore => {
                self.events.push(BattleEvent::StatPanelHidden);
            }
            Phase::CommandSelection | Phase::CategorySelection | Phase::ActionSelection => {
                self.close_menu();
            }
            Phase::MoveTarget | Phase::AbilityTarget | Phase::ConfirmAbilityTarget => {
                self.clear_highlight();
            }
            Phase::EndFacing => {
                self.entry_facing = None;
            }
            _ => {}
        }
    }

    pub(super) fn handle_move(&mut self, delta: Point) {
        if delta == Point::new(0, 0) {
            return;
        }
        match self.phase {
            Phase::Explore => self.explore_move(delta),
            Phase::CommandSelection | Phase::CategorySelection | Phase::ActionSelection => {
                self.menu_move(delta);
            }
            Phase::MoveTarget => self.cursor_move(delta),
            Phase::AbilityTarget => self.ability_target_move(delta),
            Phase::ConfirmAbilityTarget => self.ring_move(delta),
            Phase::EndFacing => self.rotate_actor(Direction::of(delta)),
            _ => {}
        }
    }

    pub(super) fn handle_fire(&mut self, input: FireInput) {
        match self.phase {
            Phase::CutScene => self.cut_scene_fire(),
            Phase::Explore => {
                if input == FireInput::Confirm {
                    self.change_phase(Phase::CommandSelection);
                }
            }
            Phase::CommandSelection => match input {
                FireInput::Confirm => self.command_confirm(),
                _ => self.command_cancel(),
            },
            Phase::CategorySelection => match input {
                FireInput::Confirm => self.category_confirm(),
                _ => self.change_phase(Phase::CommandSelection),
            },
            Phase::ActionSelection => match input {
                FireInput::Confirm => self.action_confirm(),
                _ => self.change_phase(Phase::CategorySelection),
            },
            Phase::MoveTarget => match input {
                FireInput::Confirm => self.move_target_confirm(),
                _ => self.change_phase(Phase::CommandSelection),
            },
            Phase::AbilityTarget => match input {
                FireInput::Confirm => self.ability_target_confirm(),
                _ => self.change_phase(Phase::CategorySelection),
            },
            Phase::ConfirmAbilityTarget => match input {
                FireInput::Confirm => self.confirm_target_confirm(),
                _ => self.change_phase(Phase::AbilityTarget),
            },
            Phase::EndFacing => match input {
                FireInput::Confirm => {
                    self.finish_turn();
                    self.change_phase(Phase::SelectUnit);
                }
                FireInput::Cancel => {
                    if let Some(facing) = self.entry_facing {
                        self.rotate_actor(facing);
                    }
                    self.change_phase(Phase::CommandSelection);
                }
                FireInput::Alternate => {}
            },
            _ => {}
        }
    }

    // -------------------------------------------------------------------------
    // Cut-scenes
    // -------------------------------------------------------------------------

    fn enter_cut_scene(&mut self) {
        self.victor = self.victory.victor(&self.roster);
        let script = match self.victor {
            Victor::Undecided => self.scripts.intro.clone(),
            Victor::Hero => self.scripts.victory.clone(),
            Victor::Enemy => self.scripts.defeat.clone(),
        };
        match script {
            Some(script) if !script.pages.is_empty() => {
                self.events.push(BattleEvent::ScriptPageShown {
                    page: script.pages[0].clone(),
                });
                self.script = Some(ScriptCursor {
                    pages: script.pages,
                    index: 0,
                });
                self.queue_page_turn();
            }
            _ => {
                let next = self.after_cut_scene();
                self.auto.push_back(AutoStep::Goto(next));
            }
        }
    }

    fn after_cut_scene(&self) -> Phase {
        if self.victor == Victor::Undecided {
            Phase::SelectUnit
        } else {
            Phase::EndBattle
        }
    }

    /// With no human watching, pages flip themselves.
    fn queue_page_turn(&mut self) {
        if !self.roster.any_human() {
            self.auto
                .push_back(AutoStep::Wait(BattleConfig::SCRIPT_PAGE_PAUSE));
            self.auto.push_back(AutoStep::Fire(FireInput::Confirm));
        }
    }

    fn cut_scene_fire(&mut self) {
        let Some(script) = self.script.as_mut() else {
            let next = self.after_cut_scene();
            self.change_phase(next);
            return;
        };
        script.index += 1;
        if script.index < script.pages.len() {
            let page = script.pages[script.index].clone();
            self.events.push(BattleEvent::ScriptPageShown { page });
            self.queue_page_turn();
        } else {
            self.script = None;
            self.events.push(BattleEvent::ScriptCompleted);
            let next = self.after_cut_scene();
            self.change_phase(next);
        }
    }

    // -------------------------------------------------------------------------
    // Turn selection
    // -------------------------------------------------------------------------

    fn enter_select_unit(&mut self) {
        self.turn = None;
        self.auto.push_back(AutoStep::PumpScheduler);
    }

    // -------------------------------------------------------------------------
    // Explore
    // -------------------------------------------------------------------------

    fn enter_explore(&mut self) {
        let Some(actor) = self.actor() else {
            return;
        };
        let Some(unit) = self.roster.unit(actor) else {
            return;
        };
        self.cursor = unit.position();
        let position = self.cursor;
        self.events.push(BattleEvent::CursorMoved { position });
        self.events
            .push(BattleEvent::StatPanelShown { entity: actor });
    }

    fn explore_move(&mut self, delta: Point) {
        let before = self.cursor;
        self.cursor_move(delta);
        if self.cursor == before {
            return;
        }
        match self.roster.occupant_at(self.cursor) {
            Some(entity) => self.events.push(BattleEvent::StatPanelShown { entity }),
            None => self.events.push(BattleEvent::StatPanelHidden),
        }
    }

    // -------------------------------------------------------------------------
    // Command menu
    // -------------------------------------------------------------------------

    fn enter_command_selection(&mut self) {
        let Some(turn) = self.turn.as_ref() else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let (actor, moved, acted) = (turn.actor, turn.moved, turn.acted);
        let Some(unit) = self.roster.unit(actor) else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let (driver, position) = (unit.driver(), unit.position());

        match driver {
            Driver::Human => {
                let mut menu = Menu::new(
                    "Command",
                    ["Move", "Action", "Wait"].map(String::from),
                );
                menu.set_locked(0, moved);
                menu.set_locked(1, acted);
                self.menu = Some(menu);
                self.show_menu();
            }
            Driver::Computer => {
                if self.turn.as_ref().is_some_and(|t| t.plan.is_none()) {
                    let ctx = PlanContext {
                        actor,
                        roster: &self.roster,
                        board: self.board.as_ref(),
                    };
                    let plan = self.planner.evaluate(ctx);
                    if let Some(turn) = self.turn.as_mut() {
                        turn.plan = Some(plan);
                    }
                }
                let Some(plan) = self.turn.as_ref().and_then(|t| t.plan) else {
                    self.auto.push_back(AutoStep::Goto(Phase::EndFacing));
                    return;
                };

                self.auto
                    .push_back(AutoStep::Wait(BattleConfig::THINK_PAUSE));
                if !moved && plan.move_to != position {
                    self.auto.push_back(AutoStep::Goto(Phase::MoveTarget));
                    return;
                }
                if !acted
                    && let Some(choice) = plan.ability
                    && let Some(ability) = self.resolve_choice(actor, choice)
                    && self
                        .roster
                        .unit(actor)
                        .is_some_and(|u| ability.can_perform(u))
                {
                    if let Some(turn) = self.turn.as_mut() {
                        turn.ability = Some(ability);
                    }
                    self.auto.push_back(AutoStep::Goto(Phase::AbilityTarget));
                    return;
                }
                self.auto.push_back(AutoStep::Goto(Phase::EndFacing));
            }
        }
    }

    fn resolve_choice(&self, actor: EntityId, choice: AbilityChoice) -> Option<Ability> {
        let unit = self.roster.unit(actor)?;
        match choice {
            AbilityChoice::Attack => Some(unit.attack().clone()),
            AbilityChoice::Learned { category, index } => {
                unit.catalog().ability(category, index).cloned()
            }
        }
    }

    fn command_confirm(&mut self) {
        let Some(menu) = self.menu.as_ref() else {
            return;
        };
        let Some(entry) = menu.entries().get(menu.selection()) else {
            return;
        };
        if entry.locked {
            return;
        }
        match menu.selection() {
            0 => self.change_phase(Phase::MoveTarget),
            1 => self.change_phase(Phase::CategorySelection),
            _ => self.change_phase(Phase::EndFacing),
        }
    }

    fn command_cancel(&mut self) {
        let undoable = self
            .turn
            .as_ref()
            .is_some_and(|t| t.moved && !t.lock_move);
        if !undoable {
            self.change_phase(Phase::Explore);
            return;
        }
        let Some(turn) = self.turn.as_mut() else {
            return;
        };
        let actor = turn.actor;
        let Some(unit) = self.roster.unit_mut(actor) else {
            return;
        };
        turn.undo_move(unit);
        let position = unit.position();
        self.events.push(BattleEvent::MoveUndone {
            entity: actor,
            position,
        });
        if let Some(menu) = self.menu.as_mut() {
            menu.set_locked(0, false);
        }
        self.show_menu();
    }

    // -------------------------------------------------------------------------
    // Ability menus
    // -------------------------------------------------------------------------

    fn enter_category_selection(&mut self) {
        let Some(actor) = self.actor() else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let Some(unit) = self.roster.unit(actor) else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let mut labels = vec!["Attack".to_string()];
        labels.extend(unit.catalog().category_names().map(String::from));
        self.menu = Some(Menu::new("Action", labels));
        self.show_menu();
    }

    fn category_confirm(&mut self) {
        let Some(selection) = self.menu.as_ref().map(Menu::selection) else {
            return;
        };
        if selection == 0 {
            let ability = self
                .actor()
                .and_then(|actor| self.resolve_choice(actor, AbilityChoice::Attack));
            let Some(ability) = ability else {
                return;
            };
            if let Some(turn) = self.turn.as_mut() {
                turn.ability = Some(ability);
            }
            self.change_phase(Phase::AbilityTarget);
        } else {
            self.category = Some(selection - 1);
            self.change_phase(Phase::ActionSelection);
        }
    }

    fn enter_action_selection(&mut self) {
        let Some(category) = self.category else {
            self.auto.push_back(AutoStep::Goto(Phase::CategorySelection));
            return;
        };
        let Some(unit) = self.actor().and_then(|id| self.roster.unit(id)) else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let Some(entry) = unit.catalog().category(category) else {
            self.auto.push_back(AutoStep::Goto(Phase::CategorySelection));
            return;
        };

        let labels: Vec<String> = entry
            .abilities
            .iter()
            .map(|ability| match ability.mana_cost {
                Some(cost) => format!("{} ({} MP)", ability.name, cost),
                None => ability.name.clone(),
            })
            .collect();
        let locked: Vec<bool> = entry
            .abilities
            .iter()
            .map(|ability| !ability.can_perform(unit))
            .collect();
        let mut menu = Menu::new(entry.name.clone(), labels);
        for (index, lock) in locked.into_iter().enumerate() {
            menu.set_locked(index, lock);
        }
        self.menu = Some(menu);
        self.show_menu();
    }

    fn action_confirm(&mut self) {
        let Some(menu) = self.menu.as_ref() else {
            return;
        };
        let Some(entry) = menu.entries().get(menu.selection()) else {
            return;
        };
        if entry.locked {
            return;
        }
        let index = menu.selection();
        let Some(category) = self.category else {
            return;
        };
        let ability = self.actor().and_then(|actor| {
            self.resolve_choice(actor, AbilityChoice::Learned { category, index })
        });
        let Some(ability) = ability else {
            return;
        };
        if let Some(turn) = self.turn.as_mut() {
            turn.ability = Some(ability);
        }
        self.change_phase(Phase::AbilityTarget);
    }

    // -------------------------------------------------------------------------
    // Movement
    // -------------------------------------------------------------------------

    fn enter_move_target(&mut self) {
        let Some(unit) = self.actor().and_then(|id| self.roster.unit(id)) else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let driver = unit.driver();
        let position = unit.position();
        let tiles = move_range(self.board.as_ref(), &self.roster, unit);

        self.cursor = position;
        self.highlight = tiles.clone();
        self.events.push(BattleEvent::TilesHighlighted {
            tiles: tiles.clone(),
            targets: tiles,
        });
        self.events
            .push(BattleEvent::CursorMoved { position });

        if driver == Driver::Computer {
            let goal = self.turn.as_ref().and_then(|t| t.plan).map(|p| p.move_to);
            let Some(goal) = goal else {
                self.auto.push_back(AutoStep::Fire(FireInput::Cancel));
                return;
            };
            if self.highlight.contains(&goal) {
                self.auto.push_back(AutoStep::CursorStep { goal });
            } else {
                // The plan aimed outside the reachable set; drop the move
                // and let the command phase re-decide.
                if let Some(plan) = self.turn.as_mut().and_then(|t| t.plan.as_mut()) {
                    plan.move_to = position;
                }
                self.auto.push_back(AutoStep::Fire(FireInput::Cancel));
            }
        }
    }

    fn cursor_move(&mut self, delta: Point) {
        let next = self.cursor + delta;
        if !self.board.contains(next) {
            return;
        }
        self.cursor = next;
        self.events.push(BattleEvent::CursorMoved { position: next });
    }

    fn move_target_confirm(&mut self) {
        if self.highlight.contains(&self.cursor) {
            self.change_phase(Phase::MoveSequence);
        }
    }

    fn enter_move_sequence(&mut self) {
        let target = self.cursor;
        let Some(turn) = self.turn.as_mut() else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let actor = turn.actor;
        let Some(unit) = self.roster.unit_mut(actor) else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };

        let from = unit.position();
        if let Some(direction) = Direction::between(from, target)
            && direction != unit.facing()
        {
            unit.set_facing(direction);
            self.events.push(BattleEvent::FacingChanged {
                entity: actor,
                facing: direction,
            });
        }
        unit.set_position(target);
        turn.moved = true;
        self.events.push(BattleEvent::UnitMoved {
            entity: actor,
            from,
            to: target,
        });
        self.auto
            .push_back(AutoStep::Wait(BattleConfig::TRAVERSAL_PAUSE));
        self.auto.push_back(AutoStep::Goto(Phase::CommandSelection));
    }

    // -------------------------------------------------------------------------
    // Ability targeting
    // -------------------------------------------------------------------------

    fn enter_ability_target(&mut self) {
        let ability = self.turn.as_ref().and_then(|t| t.ability.clone());
        let Some(ability) = ability else {
            self.auto.push_back(AutoStep::Goto(Phase::CommandSelection));
            return;
        };
        let Some(unit) = self.actor().and_then(|id| self.roster.unit(id)) else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let driver = unit.driver();
        self.refresh_range(&ability);

        if driver == Driver::Computer {
            let Some(plan) = self.turn.as_ref().and_then(|t| t.plan) else {
                self.abandon_action();
                return;
            };
            if ability.range.direction_oriented() {
                self.auto
                    .push_back(AutoStep::Wait(BattleConfig::FACING_PAUSE));
                self.auto.push_back(AutoStep::Rotate(plan.attack_facing));
                self.auto
                    .push_back(AutoStep::Wait(BattleConfig::FACING_PAUSE));
                self.auto.push_back(AutoStep::Fire(FireInput::Confirm));
            } else if self.highlight.contains(&plan.aim_at) {
                self.auto
                    .push_back(AutoStep::CursorStep { goal: plan.aim_at });
            } else {
                self.abandon_action();
            }
        }
    }

    /// Clears a computer plan's action when its aim cannot be honored, then
    /// sends the turn back through the command phase.
    fn abandon_action(&mut self) {
        if let Some(turn) = self.turn.as_mut() {
            turn.ability = None;
            if let Some(plan) = turn.plan.as_mut() {
                plan.ability = None;
            }
        }
        self.auto.push_back(AutoStep::Goto(Phase::CommandSelection));
    }

    /// Recomputes the range preview from the actor's position and facing.
    pub(super) fn refresh_range(&mut self, ability: &Ability) {
        let Some(unit) = self.actor().and_then(|id| self.roster.unit(id)) else {
            return;
        };
        let origin = unit.position();
        let facing = unit.facing();
        let tiles = ability.range.tiles(self.board.as_ref(), origin, facing);
        let targets: Vec<Point> = tiles
            .iter()
            .copied()
            .filter(|&position| {
                self.roster
                    .occupant_at(position)
                    .and_then(|id| self.roster.unit(id))
                    .is_some_and(|candidate| ability.is_target(unit, candidate))
            })
            .collect();

        self.cursor = origin;
        self.highlight = tiles.clone();
        self.events
            .push(BattleEvent::TilesHighlighted { tiles, targets });
    }

    pub(super) fn rotate_actor(&mut self, direction: Direction) {
        let Some(actor) = self.actor() else {
            return;
        };
        let Some(unit) = self.roster.unit_mut(actor) else {
            return;
        };
        if unit.facing() == direction {
            return;
        }
        unit.set_facing(direction);
        self.events.push(BattleEvent::FacingChanged {
            entity: actor,
            facing: direction,
        });
    }

    fn ability_target_move(&mut self, delta: Point) {
        let ability = self.turn.as_ref().and_then(|t| t.ability.clone());
        let Some(ability) = ability else {
            return;
        };
        if ability.range.direction_oriented() {
            self.rotate_actor(Direction::of(delta));
            self.refresh_range(&ability);
        } else {
            self.cursor_move(delta);
        }
    }

    fn ability_target_confirm(&mut self) {
        let Some(turn) = self.turn.as_ref() else {
            return;
        };
        let Some(ability) = turn.ability.as_ref() else {
            return;
        };
        let valid =
            ability.range.direction_oriented() || self.highlight.contains(&self.cursor);
        if !valid {
            return;
        }
        self.change_phase(Phase::ConfirmAbilityTarget);
    }

    fn enter_confirm_ability_target(&mut self) {
        let ability = self.turn.as_ref().and_then(|t| t.ability.clone());
        let Some(ability) = ability else {
            self.auto.push_back(AutoStep::Goto(Phase::CommandSelection));
            return;
        };
        let Some(unit) = self.actor().and_then(|id| self.roster.unit(id)) else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let driver = unit.driver();
        let origin = unit.position();
        let facing = unit.facing();

        let area = ability
            .area
            .tiles(self.board.as_ref(), &ability.range, origin, facing, self.cursor);
        let targets: Vec<Point> = area
            .iter()
            .copied()
            .filter(|&position| {
                self.roster
                    .occupant_at(position)
                    .and_then(|id| self.roster.unit(id))
                    .is_some_and(|candidate| ability.is_target(unit, candidate))
            })
            .collect();

        self.highlight = area.clone();
        self.ring = TargetRing::new(targets.clone());
        self.events.push(BattleEvent::TilesHighlighted {
            tiles: area,
            targets,
        });
        self.focus_target();

        if driver == Driver::Computer {
            self.auto
                .push_back(AutoStep::Wait(BattleConfig::SETTLE_PAUSE));
            self.auto.push_back(AutoStep::Fire(FireInput::Confirm));
        }
    }

    /// Emits the hit/amount preview for the ring's current target.
    fn focus_target(&mut self) {
        let Some(position) = self.ring.current() else {
            return;
        };
        let Some(unit) = self.actor().and_then(|id| self.roster.unit(id)) else {
            return;
        };
        let Some(candidate) = self
            .roster
            .occupant_at(position)
            .and_then(|id| self.roster.unit(id))
        else {
            return;
        };
        let Some(ability) = self.turn.as_ref().and_then(|t| t.ability.as_ref()) else {
            return;
        };
        let Some(group) = ability.preview_group(unit, candidate) else {
            return;
        };
        let chance = group.hit.chance(unit, candidate);
        let amount = self.resolver.predict(unit, candidate, group);
        self.events.push(BattleEvent::TargetFocused {
            position,
            chance,
            amount,
        });
    }

    fn ring_move(&mut self, delta: Point) {
        if self.ring.is_empty() {
            return;
        }
        if delta.x > 0 || delta.y < 0 {
            self.ring.next();
        } else {
            self.ring.previous();
        }
        self.focus_target();
    }

    fn confirm_target_confirm(&mut self) {
        if self.ring.is_empty() {
            return;
        }
        let targets = self.highlight.clone();
        if let Some(turn) = self.turn.as_mut() {
            turn.targets = targets;
        }
        self.change_phase(Phase::PerformAbility);
    }

    // -------------------------------------------------------------------------
    // Resolution
    // -------------------------------------------------------------------------

    fn enter_perform_ability(&mut self) {
        let Some(turn) = self.turn.as_mut() else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let actor = turn.actor;
        turn.acted = true;
        if turn.moved {
            turn.lock_move = true;
        }
        let ability = turn.ability.take();
        let targets = std::mem::take(&mut turn.targets);
        let Some(ability) = ability else {
            self.auto.push_back(AutoStep::Goto(Phase::EndFacing));
            return;
        };

        self.events.push(BattleEvent::AbilityAnnounced {
            entity: actor,
            ability: ability.name.clone(),
        });
        let report = self
            .resolver
            .perform(
                &mut self.roster,
                self.rng.as_mut(),
                actor,
                &ability,
                &targets,
            )
            .unwrap_or_default();
        if !report.performed {
            self.events.push(BattleEvent::AbilityFailed {
                entity: actor,
                ability: ability.name.clone(),
            });
        }
        self.report_outcomes(&report);

        self.victor = self.victory.victor(&self.roster);
        let next = if self.victor != Victor::Undecided {
            self.finish_turn();
            Phase::CutScene
        } else if self
            .roster
            .unit(actor)
            .is_none_or(|unit| unit.is_defeated())
        {
            self.finish_turn();
            Phase::SelectUnit
        } else if self.turn.as_ref().is_some_and(|t| !t.moved) {
            Phase::CommandSelection
        } else {
            Phase::EndFacing
        };
        self.auto
            .push_back(AutoStep::Wait(BattleConfig::ABILITY_DISPLAY_PAUSE));
        self.auto.push_back(AutoStep::Goto(next));
    }

    fn report_outcomes(&mut self, report: &PerformReport) {
        for outcome in &report.outcomes {
            if !outcome.hit {
                self.events.push(BattleEvent::EffectMissed {
                    entity: outcome.target,
                    chance: outcome.chance,
                    roll: outcome.roll,
                });
                continue;
            }
            if let Some(change) = outcome.change {
                self.events.push(BattleEvent::EffectApplied {
                    entity: outcome.target,
                    change,
                    knocked_out: outcome.knocked_out,
                });
            }
            if let Some(status) = outcome.inflicted {
                self.events.push(BattleEvent::StatusAttached {
                    entity: outcome.target,
                    status,
                });
            }
            if outcome.knocked_out {
                self.events.push(BattleEvent::StatusAttached {
                    entity: outcome.target,
                    status: StatusKind::KnockOut,
                });
            }
        }
    }

    // -------------------------------------------------------------------------
    // End of turn
    // -------------------------------------------------------------------------

    fn enter_end_facing(&mut self) {
        let Some(actor) = self.actor() else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        let Some(unit) = self.roster.unit(actor) else {
            self.auto.push_back(AutoStep::Goto(Phase::SelectUnit));
            return;
        };
        self.entry_facing = Some(unit.facing());

        if unit.driver() == Driver::Computer {
            let ctx = PlanContext {
                actor,
                roster: &self.roster,
                board: self.board.as_ref(),
            };
            let direction = self.planner.end_facing(ctx);
            self.auto
                .push_back(AutoStep::Wait(BattleConfig::FACING_PAUSE));
            self.auto.push_back(AutoStep::Rotate(direction));
            self.auto
                .push_back(AutoStep::Wait(BattleConfig::FACING_PAUSE));
            self.auto.push_back(AutoStep::Fire(FireInput::Confirm));
        }
    }

    fn enter_end_battle(&mut self) {
        if self.victor == Victor::Hero && self.experience_award > 0 {
            let party = self.roster.party(Alliance::Hero);
            let awards = award_experience(&mut self.roster, &party, self.experience_award);
            for award in awards {
                self.events.push(BattleEvent::ExperienceAwarded {
                    entity: award.entity,
                    amount: award.amount,
                });
            }
        }
        self.events.push(BattleEvent::BattleEnded {
            victor: self.victor,
        });
    }

    // -------------------------------------------------------------------------
    // Shared presentation state
    // -------------------------------------------------------------------------

    fn menu_move(&mut self, delta: Point) {
        let Some(menu) = self.menu.as_mut() else {
            return;
        };
        let changed = if delta.x > 0 || delta.y < 0 {
            menu.next()
        } else {
            menu.previous()
        };
        if changed {
            let title = menu.title().to_string();
            let index = menu.selection();
            self.events
                .push(BattleEvent::MenuSelection { title, index });
        }
    }

    fn show_menu(&mut self) {
        if let Some(menu) = self.menu.as_ref() {
            self.events.push(BattleEvent::MenuShown {
                title: menu.title().to_string(),
                entries: menu.entries().to_vec(),
            });
        }
    }

    fn close_menu(&mut self) {
        if self.menu.take().is_some() {
            self.events.push(BattleEvent::MenuHidden);
        }
    }

    fn clear_highlight(&mut self) {
        if self.highlight.is_empty() && self.ring.is_empty() {
            return;
        }
        self.highlight.clear();
        self.ring.clear();
        self.events.push(BattleEvent::HighlightCleared);
    }
}
