//! Battle sessions driven end to end over scripted input.

use battle_core::{
    Alliance, BaseStats, BattleEvent, BattleFlow, BattleSetup, Direction, Driver, EntityId,
    FireInput, GridBoard, Pcg32, Point, SpawnSpec, UnitSpec, Victor,
};
use runtime::{
    BattleSession, InstantClock, NearestFoePlanner, PlayerInput, RuntimeError, ScriptedInput,
    Topic,
};

fn fighter(name: &str, alliance: Alliance, driver: Driver, spd: i32) -> UnitSpec {
    let mut spec = UnitSpec::new(name, alliance);
    spec.driver = driver;
    spec.stats = BaseStats {
        max_hp: 30,
        atk: 20,
        spd,
        mov: 3,
        ..BaseStats::default()
    };
    spec
}

/// Hero at the origin, a five-hit-point rat right next to it. The hero is
/// fast enough to act first.
fn duel(hero_driver: Driver) -> BattleFlow {
    let mut setup = BattleSetup::new();
    setup.spawns.push(SpawnSpec::at(
        fighter("hero", Alliance::Hero, hero_driver, 1000),
        Point::new(0, 0),
        Direction::East,
    ));
    let mut rat = fighter("rat", Alliance::Enemy, Driver::Computer, 400);
    rat.stats.max_hp = 5;
    setup
        .spawns
        .push(SpawnSpec::at(rat, Point::new(1, 0), Direction::West));

    BattleFlow::new(
        Box::new(GridBoard::new(6, 6)),
        setup,
        Box::new(Pcg32::new(7)),
        Box::new(NearestFoePlanner),
    )
    .expect("battle setup")
}

/// The first-turn kill: step the command menu to Action, confirm the
/// attack category, aim at the adjacent rat, confirm twice.
fn attack_script() -> ScriptedInput {
    ScriptedInput::new([
        PlayerInput::Move(Point::new(1, 0)),
        PlayerInput::Fire(FireInput::Confirm),
        PlayerInput::Fire(FireInput::Confirm),
        PlayerInput::Move(Point::new(1, 0)),
        PlayerInput::Fire(FireInput::Confirm),
        PlayerInput::Fire(FireInput::Confirm),
    ])
}

#[tokio::test]
async fn scripted_human_duel_runs_to_victory() {
    let session = BattleSession::new(duel(Driver::Human)).with_clock(InstantClock);
    let report = session.run(attack_script()).await.expect("battle report");

    assert_eq!(report.victor, Victor::Hero);
    assert_eq!(report.rounds, 1);
    assert_eq!(report.survivors, vec![EntityId(0)]);
}

#[tokio::test]
async fn computer_duel_needs_no_input_at_all() {
    let session = BattleSession::new(duel(Driver::Computer)).with_clock(InstantClock);
    let report = session
        .run(ScriptedInput::default())
        .await
        .expect("battle report");

    assert_eq!(report.victor, Victor::Hero);
    assert_eq!(report.survivors, vec![EntityId(0)]);
}

#[tokio::test]
async fn an_exhausted_source_fails_the_session() {
    let session = BattleSession::new(duel(Driver::Human)).with_clock(InstantClock);
    let err = session
        .run(ScriptedInput::default())
        .await
        .expect_err("the battle still wanted input");
    assert!(matches!(err, RuntimeError::InputSourceClosed));
}

#[tokio::test]
async fn the_bus_routes_events_by_topic() {
    let session = BattleSession::new(duel(Driver::Human)).with_clock(InstantClock);
    let bus = session.bus();
    let mut flow_events = bus.subscribe(Topic::Flow);
    let mut combat = bus.subscribe(Topic::Combat);
    let mut presentation = bus.subscribe(Topic::Presentation);

    session.run(attack_script()).await.expect("battle report");

    let mut saw_ended = false;
    while let Ok(event) = flow_events.try_recv() {
        assert_eq!(Topic::of(&event), Topic::Flow);
        saw_ended |= matches!(
            event,
            BattleEvent::BattleEnded {
                victor: Victor::Hero
            }
        );
    }
    assert!(saw_ended);

    let mut saw_knockout = false;
    while let Ok(event) = combat.try_recv() {
        assert_eq!(Topic::of(&event), Topic::Combat);
        saw_knockout |= matches!(
            event,
            BattleEvent::EffectApplied {
                knocked_out: true,
                ..
            }
        );
    }
    assert!(saw_knockout);

    let mut saw_menu = false;
    while let Ok(event) = presentation.try_recv() {
        assert_eq!(Topic::of(&event), Topic::Presentation);
        saw_menu |= matches!(event, BattleEvent::MenuShown { .. });
    }
    assert!(saw_menu);
}
