//! The battle state machine.
//!
//! [`BattleFlow`] owns the board, roster, scheduler, and resolver, and drives
//! them through a fixed set of phases. Callers alternate between
//! [`pump`](BattleFlow::pump), which advances every automatic step until the
//! battle needs outside help, and the input entry points, which feed one
//! human decision into the active phase. Presentation pacing surfaces as
//! [`FlowSignal::Wait`]; the flow never sleeps on its own.
//!
//! Exactly one phase is active at a time. A transition runs the old phase's
//! exit, then the new phase's enter, strictly in that order; a transition
//! requested while one is in flight is dropped, and a transition to the
//! current phase is a no-op.

mod auto;
mod phases;
mod setup;

pub use setup::{BattleSetup, Script, ScriptBook, SpawnSpec, VictoryRule};

use std::collections::VecDeque;
use std::time::Duration;

use crate::board::Board;
use crate::error::CoreError;
use crate::events::BattleEvent;
use crate::menu::Menu;
use crate::resolver::{EffectTweak, Resolver};
use crate::rng::BattleRng;
use crate::roster::Roster;
use crate::scheduler::TurnScheduler;
use crate::targeting::TargetRing;
use crate::turn::{Planner, Turn};
use crate::types::{FireInput, Point};
use crate::victory::{DefeatAllEnemies, Victor, VictoryCondition};

use auto::AutoStep;

// =============================================================================
// Phases and signals
// =============================================================================

/// The battle's control states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Phase {
    Init,
    CutScene,
    SelectUnit,
    Explore,
    CommandSelection,
    CategorySelection,
    ActionSelection,
    MoveTarget,
    MoveSequence,
    AbilityTarget,
    ConfirmAbilityTarget,
    PerformAbility,
    EndFacing,
    EndBattle,
}

/// Why [`BattleFlow::pump`] returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowSignal {
    /// A human decision is needed; feed [`BattleFlow::on_move`] or
    /// [`BattleFlow::on_fire`] and pump again.
    AwaitInput,
    /// Presentation pacing. Wait this long, then pump again.
    Wait(Duration),
    /// The battle is over.
    Ended(Victor),
}

/// Pages of the active cut-scene.
#[derive(Debug)]
struct ScriptCursor {
    pages: Vec<String>,
    index: usize,
}

// =============================================================================
// Flow
// =============================================================================

pub struct BattleFlow {
    board: Box<dyn Board>,
    roster: Roster,
    scheduler: TurnScheduler,
    resolver: Resolver,
    rng: Box<dyn BattleRng>,
    planner: Box<dyn Planner>,
    victory: Box<dyn VictoryCondition>,
    scripts: ScriptBook,
    experience_award: i32,

    phase: Phase,
    in_transition: bool,
    turn: Option<Turn>,
    cursor: Point,
    menu: Option<Menu>,
    ring: TargetRing,
    highlight: Vec<Point>,
    script: Option<ScriptCursor>,
    /// Catalog category the action menu is browsing.
    category: Option<usize>,
    /// Facing at EndFacing entry, restored on cancel.
    entry_facing: Option<crate::types::Direction>,
    auto: VecDeque<AutoStep>,
    events: Vec<BattleEvent>,
    victor: Victor,
    round_seen: u32,
}

impl BattleFlow {
    /// Builds the battle and runs the init phase: spawns every unit, arms
    /// the victory condition, and registers the status gate. The first
    /// [`pump`](Self::pump) enters the opening cut-scene.
    pub fn new(
        board: Box<dyn Board>,
        setup: BattleSetup,
        rng: Box<dyn BattleRng>,
        planner: Box<dyn Planner>,
    ) -> Result<Self, CoreError> {
        let mut flow = Self {
            board,
            roster: Roster::new(),
            scheduler: TurnScheduler::new(),
            resolver: Resolver::new(),
            rng,
            planner,
            victory: Box::new(DefeatAllEnemies),
            scripts: ScriptBook::default(),
            experience_award: 0,
            phase: Phase::Init,
            in_transition: false,
            turn: None,
            cursor: Point::new(0, 0),
            menu: None,
            ring: TargetRing::new(Vec::new()),
            highlight: Vec::new(),
            script: None,
            category: None,
            entry_facing: None,
            auto: VecDeque::new(),
            events: Vec::new(),
            victor: Victor::Undecided,
            round_seen: 0,
        };
        flow.events.push(BattleEvent::PhaseEntered { phase: Phase::Init });
        flow.initialize(setup)?;
        flow.auto.push_back(AutoStep::Goto(Phase::CutScene));
        Ok(flow)
    }

    /// Runs queued automatic steps until the battle needs input, wants a
    /// pacing wait, or ends.
    pub fn pump(&mut self) -> FlowSignal {
        loop {
            if self.phase == Phase::EndBattle {
                return FlowSignal::Ended(self.victor);
            }
            match self.auto.pop_front() {
                Some(step) => {
                    if let Some(signal) = self.run_step(step) {
                        return signal;
                    }
                }
                None => return FlowSignal::AwaitInput,
            }
        }
    }

    /// Directional input. Ignored unless the active phase is listening to a
    /// human.
    pub fn on_move(&mut self, delta: Point) {
        if self.accepts_input() {
            self.handle_move(delta);
        }
    }

    /// Fire input. Ignored unless the active phase is listening to a human.
    pub fn on_fire(&mut self, input: FireInput) {
        if self.accepts_input() {
            self.handle_fire(input);
        }
    }

    /// Events accumulated since the last drain, in emission order.
    pub fn drain_events(&mut self) -> Vec<BattleEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn victor(&self) -> Victor {
        self.victor
    }

    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn board(&self) -> &dyn Board {
        self.board.as_ref()
    }

    pub fn turn(&self) -> Option<&Turn> {
        self.turn.as_ref()
    }

    /// Rounds the scheduler has opened so far.
    pub fn round(&self) -> u32 {
        self.scheduler.round()
    }

    /// Current cursor tile of the active targeting phase.
    pub fn cursor(&self) -> Point {
        self.cursor
    }

    /// Registers a damage/heal adjustment hook on the resolver.
    pub fn add_tweak(&mut self, tweak: impl EffectTweak + 'static) {
        self.resolver.add_tweak(tweak);
    }

    // -------------------------------------------------------------------------
    // Transition machinery
    // -------------------------------------------------------------------------

    /// Switches phases. No-op when `to` is already active or another
    /// transition is in flight; exit, queued-step reset, and enter are
    /// strictly sequenced otherwise.
    pub(crate) fn change_phase(&mut self, to: Phase) {
        if self.in_transition || to == self.phase {
            return;
        }
        self.in_transition = true;
        self.exit_phase(self.phase);
        self.auto.clear();
        self.phase = to;
        self.events.push(BattleEvent::PhaseEntered { phase: to });
        self.enter_phase(to);
        self.in_transition = false;
    }

    /// Settles the active turn against the scheduler, if one is open.
    fn finish_turn(&mut self) {
        if let Some(turn) = self.turn.take() {
            self.scheduler
                .complete_turn(&mut self.roster, turn.actor, turn.moved, turn.acted);
            self.events.push(BattleEvent::TurnCompleted {
                entity: turn.actor,
                moved: turn.moved,
                acted: turn.acted,
            });
        }
    }

    fn actor(&self) -> Option<crate::types::EntityId> {
        self.turn.as_ref().map(|t| t.actor)
    }

    fn actor_is_human(&self) -> bool {
        self.actor()
            .and_then(|id| self.roster.unit(id))
            .is_some_and(|unit| unit.driver() == crate::types::Driver::Human)
    }

    /// Whether outside input reaches the active phase. Automatic phases and
    /// computer turns take none.
    fn accepts_input(&self) -> bool {
        match self.phase {
            Phase::CutScene => self.script.is_some() && self.roster.any_human(),
            Phase::Explore
            | Phase::CommandSelection
            | Phase::CategorySelection
            | Phase::ActionSelection
            | Phase::MoveTarget
            | Phase::AbilityTarget
            | Phase::ConfirmAbilityTarget
            | Phase::EndFacing => self.actor_is_human(),
            _ => false,
        }
    }
}

impl std::fmt::Debug for BattleFlow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BattleFlow")
            .field("phase", &self.phase)
            .field("round", &self.scheduler.round())
            .field("units", &self.roster.len())
            .field("victor", &self.victor)
            .finish()
    }
}
