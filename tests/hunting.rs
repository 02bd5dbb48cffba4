use bevy_ecs::system::RunSystemOnce;
use glam::IVec2;
use pacman_engine::{
    events::GameEvent,
    map::direction::Direction,
    systems::{
        ghost::{GhostId, GhostState},
        hunting::{hunting_timer_system, HuntingPhase, HuntingTimer},
        movement::Mover,
        state::StepLog,
    },
    timer::INDEFINITE,
    variant::{GameVariant, VariantRules},
};
use speculoos::prelude::*;

mod common;

#[test]
fn test_first_phase_scatters_for_420_ticks() {
    let rules = VariantRules::for_variant(GameVariant::PacMan);
    let mut hunting = HuntingTimer::default();
    hunting.start_first_phase(&rules, 1);

    assert_that(&hunting.phase()).is_equal_to(HuntingPhase::Scattering);
    assert_that(&hunting.duration()).is_equal_to(420);

    for _ in 0..421 {
        assert_that(&hunting.update()).is_false();
    }
    assert_that(&hunting.phase()).is_equal_to(HuntingPhase::Scattering);

    assert_that(&hunting.update()).is_true();
    assert_that(&hunting.phase_index()).is_equal_to(1);
    assert_that(&hunting.phase()).is_equal_to(HuntingPhase::Chasing);
    assert_that(&hunting.duration()).is_equal_to(1200);
}

#[test]
fn test_last_phase_chases_forever() {
    let rules = VariantRules::for_variant(GameVariant::MsPacMan);
    let mut hunting = HuntingTimer::default();
    hunting.start_first_phase(&rules, 1);

    let mut started = 0;
    for _ in 0..200_000 {
        if hunting.update() {
            started += 1;
        }
    }

    assert_that(&started).is_equal_to(7);
    assert_that(&hunting.phase_index()).is_equal_to(7);
    assert_that(&hunting.phase()).is_equal_to(HuntingPhase::Chasing);
    assert_that(&hunting.remaining()).is_equal_to(INDEFINITE);
}

#[test]
fn test_stopped_timer_keeps_its_phase() {
    let rules = VariantRules::for_variant(GameVariant::PacMan);
    let mut hunting = HuntingTimer::default();
    hunting.start_first_phase(&rules, 1);
    for _ in 0..100 {
        hunting.update();
    }

    hunting.stop();
    for _ in 0..1000 {
        hunting.update();
    }
    assert_that(&hunting.is_stopped()).is_true();
    assert_that(&hunting.tick_count()).is_equal_to(100);

    hunting.start();
    hunting.update();
    assert_that(&hunting.tick_count()).is_equal_to(101);
}

#[test]
fn test_phase_change_reverses_hunting_ghosts() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    let rules = *world.resource::<VariantRules>();
    world.resource_mut::<HuntingTimer>().start_first_phase(&rules, 1);
    let hunter = common::spawn_ghost(&mut world, GhostId::Red, GhostState::HuntingPac, IVec2::new(6, 8), Direction::Right);
    let frightened = common::spawn_ghost(&mut world, GhostId::Pink, GhostState::Frightened, IVec2::new(21, 8), Direction::Left);

    for _ in 0..421 {
        world.run_system_once(hunting_timer_system).expect("System should run successfully");
    }
    assert_that(&common::drain_events(&mut world).is_empty()).is_true();
    assert_that(&world.resource::<StepLog>().hunting_phase_started.is_none()).is_true();

    world.run_system_once(hunting_timer_system).expect("System should run successfully");

    assert_that(&world.get::<Mover>(hunter).map(|m| m.reverse_requested)).is_equal_to(Some(true));
    assert_that(&world.get::<Mover>(frightened).map(|m| m.reverse_requested)).is_equal_to(Some(false));
    assert_that(&world.resource::<StepLog>().hunting_phase_started).is_equal_to(Some(1));
    assert_that(&common::drain_events(&mut world)).is_equal_to(vec![GameEvent::HuntingPhaseStarted {
        index: 1,
        phase: HuntingPhase::Chasing,
    }]);
}

#[test]
fn test_phase_expiring_as_power_starts_waits_for_resume() {
    let rules = VariantRules::for_variant(GameVariant::PacMan);
    let mut hunting = HuntingTimer::default();
    hunting.start_first_phase(&rules, 1);
    for _ in 0..421 {
        hunting.update();
    }
    assert_that(&hunting.remaining()).is_equal_to(0);

    hunting.stop();
    for _ in 0..500 {
        assert_that(&hunting.update()).is_false();
    }
    assert_that(&hunting.is_stopped()).is_true();
    assert_that(&hunting.phase_index()).is_equal_to(0);

    hunting.start();
    assert_that(&hunting.update()).is_true();
    assert_that(&hunting.phase_index()).is_equal_to(1);
    assert_that(&hunting.is_running()).is_true();
}
