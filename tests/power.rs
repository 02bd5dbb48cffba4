use bevy_ecs::system::RunSystemOnce;
use glam::IVec2;
use pacman_engine::{
    events::GameEvent,
    map::direction::Direction,
    systems::{
        ghost::{Ghost, GhostId, GhostState},
        hunting::HuntingTimer,
        level::{Level, PowerTimer},
        power::{is_power_fading, is_power_fading_starting, power_system},
        state::StepLog,
    },
    timer::TickTimer,
    variant::{GameVariant, VariantRules},
};
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn running_power(ticks: u64) -> PowerTimer {
    let mut timer = TickTimer::default();
    timer.restart(ticks);
    PowerTimer(timer)
}

#[test]
fn test_fading_starts_when_fading_window_remains() {
    let data = Level::new(1, false, [0, 1]).data;
    let (power_ticks, fading_ticks) = (data.pac_power_ticks() as u64, data.power_fading_ticks() as u64);
    assert_that(&(power_ticks, fading_ticks)).is_equal_to((360, 140));

    let mut power = running_power(power_ticks);
    for _ in 0..(power_ticks - fading_ticks - 1) {
        power.0.tick();
    }
    assert_that(&is_power_fading_starting(&power, fading_ticks)).is_false();
    assert_that(&is_power_fading(&power, fading_ticks)).is_false();

    power.0.tick();
    assert_that(&power.0.tick_count()).is_equal_to(220);
    assert_that(&is_power_fading_starting(&power, fading_ticks)).is_true();
    assert_that(&is_power_fading(&power, fading_ticks)).is_true();

    power.0.tick();
    assert_that(&is_power_fading_starting(&power, fading_ticks)).is_false();
    assert_that(&is_power_fading(&power, fading_ticks)).is_true();
}

#[test]
fn test_short_power_fades_from_its_first_tick() {
    let mut power = running_power(60);
    assert_that(&is_power_fading_starting(&power, 140)).is_false();

    power.0.tick();
    assert_that(&is_power_fading_starting(&power, 140)).is_true();

    power.0.tick();
    assert_that(&is_power_fading_starting(&power, 140)).is_false();
    assert_that(&is_power_fading(&power, 140)).is_true();
}

#[test]
fn test_power_expiry_resumes_hunting_where_it_stopped() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    let rules = *world.resource::<VariantRules>();
    {
        let mut hunting = world.resource_mut::<HuntingTimer>();
        hunting.start_first_phase(&rules, 1);
        for _ in 0..100 {
            hunting.update();
        }
        hunting.stop();
    }
    world.insert_resource(running_power(2));
    let frightened = common::spawn_ghost(&mut world, GhostId::Pink, GhostState::Frightened, IVec2::new(6, 8), Direction::Left);
    let returning = common::spawn_ghost(&mut world, GhostId::Cyan, GhostState::ReturningHome, IVec2::new(13, 14), Direction::Left);

    world.run_system_once(power_system).expect("System should run successfully");
    assert_that(&world.resource::<StepLog>().pac_starts_losing_power).is_true();
    assert_that(&common::drain_events(&mut world)).is_equal_to(vec![GameEvent::PacStartsLosingPower]);

    world.run_system_once(power_system).expect("System should run successfully");
    assert_that(&common::drain_events(&mut world).is_empty()).is_true();
    assert_that(&world.resource::<HuntingTimer>().is_stopped()).is_true();

    world.run_system_once(power_system).expect("System should run successfully");
    assert_eq!(common::drain_events(&mut world), vec![GameEvent::PacLostPower]);
    assert_that(&world.resource::<StepLog>().pac_lost_power).is_true();
    assert_that(&world.get::<Ghost>(frightened).map(|g| g.state)).is_equal_to(Some(GhostState::HuntingPac));
    assert_that(&world.get::<Ghost>(returning).map(|g| g.state)).is_equal_to(Some(GhostState::ReturningHome));

    let hunting = world.resource::<HuntingTimer>();
    assert_that(&hunting.is_running()).is_true();
    assert_that(&hunting.phase_index()).is_equal_to(0);
    assert_that(&hunting.tick_count()).is_equal_to(100);
    assert_that(&world.resource::<PowerTimer>().0.is_running()).is_false();
}
