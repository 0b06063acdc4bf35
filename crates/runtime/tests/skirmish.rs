//! The bundled skirmish encounter, played out entirely by the computer.
//!
//! This is the whole stack in one sitting: content files load into the
//! registry, the encounter builds a setup, the session runs the flow on a
//! clock, and the bus reports the outcome.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use battle_content::{ContentFactory, build_setup};
use battle_core::{BattleEvent, BattleFlow, Driver, Pcg32, Victor};
use runtime::{BattleSession, NearestFoePlanner, PacingClock, ScriptedInput, Topic};
use tokio::sync::broadcast;

/// Instant clock with a fuse. A battle that pauses more often than the
/// budget allows is stuck, and the test should fail instead of spinning.
struct BoundedClock {
    remaining: AtomicU32,
}

impl BoundedClock {
    fn new(budget: u32) -> Self {
        Self {
            remaining: AtomicU32::new(budget),
        }
    }
}

#[async_trait]
impl PacingClock for BoundedClock {
    async fn pause(&self, _duration: Duration) {
        assert!(
            self.remaining.fetch_sub(1, Ordering::Relaxed) > 0,
            "battle exceeded its pause budget"
        );
    }
}

fn data_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../battle/content/data")
}

#[tokio::test]
async fn bundled_skirmish_plays_out_by_itself() {
    println!("=== Phase 1: load content and build the encounter ===");
    let factory = ContentFactory::new(data_dir());
    let registry = factory.load_registry().expect("registry");
    let encounter = factory.load_encounter("skirmish").expect("encounter");

    let mut rng = Pcg32::new(20240817);
    let (board, mut setup) = build_setup(&encounter, &registry, &mut rng).expect("setup");
    // No player in this test; the computer drives both sides.
    for spawn in &mut setup.spawns {
        spawn.unit.driver = Driver::Computer;
    }
    let units = setup.spawns.len();

    let flow = BattleFlow::new(
        Box::new(board),
        setup,
        Box::new(rng),
        Box::new(NearestFoePlanner),
    )
    .expect("battle");

    println!("=== Phase 2: run the battle to its end ===");
    let session = BattleSession::new(flow).with_clock(BoundedClock::new(200_000));
    let bus = session.bus();
    let mut flow_events = bus.subscribe(Topic::Flow);

    let report = session
        .run(ScriptedInput::default())
        .await
        .expect("battle report");
    println!(
        "victor {:?} after {} rounds, {} of {} units standing",
        report.victor,
        report.rounds,
        report.survivors.len(),
        units
    );

    assert_ne!(report.victor, Victor::Undecided);
    assert!(report.rounds >= 1);
    assert!(!report.survivors.is_empty());
    assert!(report.survivors.len() < units);

    println!("=== Phase 3: the flow topic carried the ending ===");
    let mut saw_ended = false;
    loop {
        match flow_events.try_recv() {
            Ok(BattleEvent::BattleEnded { victor }) => {
                assert_eq!(victor, report.victor);
                saw_ended = true;
            }
            Ok(_) => {}
            // A long battle overflows the channel; skip to what's retained.
            Err(broadcast::error::TryRecvError::Lagged(_)) => {}
            Err(_) => break,
        }
    }
    assert!(saw_ended);
}
