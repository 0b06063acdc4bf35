//! Tuning constants for the battle rules.
//!
//! Everything here is a rule of the simulation, not a presentation choice:
//! changing a value changes battle outcomes (or, for the pacing block, the
//! exact suspension sequence the flow yields to its driver).

use std::time::Duration;

/// Battle rule constants.
pub struct BattleConfig;

impl BattleConfig {
    // ========================================================================
    // Turn scheduling
    // ========================================================================

    /// Counter value a unit must reach before it may act.
    pub const TURN_ACTIVATION: i32 = 1000;

    /// Base counter cost of taking a turn.
    pub const TURN_COST: i32 = 500;

    /// Additional counter cost when the unit moved during its turn.
    pub const MOVE_COST: i32 = 300;

    /// Additional counter cost when the unit acted during its turn.
    pub const ACTION_COST: i32 = 200;

    // ========================================================================
    // Effect magnitudes
    // ========================================================================

    /// Lower clamp for a signed effect delta (damage is negative).
    pub const MIN_EFFECT: i32 = -999;

    /// Upper clamp for a signed effect delta (healing is positive).
    pub const MAX_EFFECT: i32 = 999;

    /// Variance window applied when an effect lands, in percent of the
    /// predicted amount.
    pub const VARIANCE_MIN_PCT: i32 = 90;
    pub const VARIANCE_MAX_PCT: i32 = 110;

    /// Experience granted to the winning party when a battle concludes.
    pub const VICTORY_EXPERIENCE: i32 = 100;

    // ========================================================================
    // Capacities
    // ========================================================================

    /// Maximum simultaneous status effects per unit.
    pub const MAX_STATUS_EFFECTS: usize = 8;

    /// Maximum entries a command menu can hold.
    pub const MAX_MENU_ENTRIES: usize = 8;

    // ========================================================================
    // Pacing
    // ========================================================================
    // Fixed suspension lengths the flow requests from its driver. The order
    // and count of suspensions is part of the flow contract; the driver is
    // free to honor the durations with any clock.

    /// Computer driver "thinking" pause before it reveals its plan.
    pub const THINK_PAUSE: Duration = Duration::from_millis(1000);

    /// Pause between simulated cursor steps.
    pub const CURSOR_STEP_PAUSE: Duration = Duration::from_millis(250);

    /// Pause after the simulated cursor settles, before confirming.
    pub const SETTLE_PAUSE: Duration = Duration::from_millis(500);

    /// How long a computer driver displays its chosen ability name.
    pub const ABILITY_DISPLAY_PAUSE: Duration = Duration::from_millis(2000);

    /// Pause on either side of the computer's end-of-turn facing pick.
    pub const FACING_PAUSE: Duration = Duration::from_millis(500);

    /// Pause covering a unit's traversal to its move target.
    pub const TRAVERSAL_PAUSE: Duration = Duration::from_millis(500);

    /// Pause per cut-scene page when no human is present to advance it.
    pub const SCRIPT_PAGE_PAUSE: Duration = Duration::from_millis(1000);
}
