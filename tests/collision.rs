use bevy_ecs::system::RunSystemOnce;
use glam::IVec2;
use pacman_engine::{
    constants::ticks,
    events::GameEvent,
    map::direction::Direction,
    systems::{
        collision::{ghost_collision_system, pac_killed_system},
        gate::GateKeeper,
        ghost::{Ghost, GhostId, GhostState},
        hunting::HuntingTimer,
        level::Level,
        movement::Mover,
        player::Pac,
        score::Scoreboard,
        stage::{ghost_eaten_pause_system, pac_dying_system},
        state::{GameStage, StepLog},
    },
    variant::{GameVariant, VariantRules},
};
use speculoos::prelude::*;

mod common;

const MEETING_TILE: IVec2 = IVec2::new(6, 8);

fn ghost_state(world: &bevy_ecs::world::World, ghost: bevy_ecs::entity::Entity) -> Option<GhostState> {
    world.get::<Ghost>(ghost).map(|g| g.state)
}

#[test]
fn test_frightened_ghosts_eaten_in_id_order() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, MEETING_TILE, Direction::Left);
    // Spawned out of order; points still follow the ghost ids.
    for id in [GhostId::Orange, GhostId::Pink, GhostId::Red, GhostId::Cyan] {
        common::spawn_ghost(&mut world, id, GhostState::Frightened, MEETING_TILE, Direction::Right);
    }

    world.run_system_once(ghost_collision_system).expect("System should run successfully");

    assert_that(&common::drain_events(&mut world)).is_equal_to(vec![
        GameEvent::GhostEaten { ghost: GhostId::Red, points: 200 },
        GameEvent::GhostEaten { ghost: GhostId::Pink, points: 400 },
        GameEvent::GhostEaten { ghost: GhostId::Cyan, points: 800 },
        GameEvent::GhostEaten { ghost: GhostId::Orange, points: 1600 },
    ]);
    assert_that(&world.resource::<Scoreboard>().score).is_equal_to(3000);
    assert_that(&world.resource::<Level>().victims.len()).is_equal_to(4);
    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::GhostEatenPause {
        remaining_ticks: ticks::GHOST_EATEN_PAUSE,
    });
    assert_that(&world.resource::<StepLog>().killed_ghosts.len()).is_equal_to(4);
}

#[test]
fn test_hunting_ghost_is_not_eaten() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, MEETING_TILE, Direction::Left);
    let ghost = common::spawn_ghost(&mut world, GhostId::Red, GhostState::HuntingPac, MEETING_TILE, Direction::Right);

    world.run_system_once(ghost_collision_system).expect("System should run successfully");

    assert_that(&common::drain_events(&mut world).is_empty()).is_true();
    assert_that(&ghost_state(&world, ghost)).is_equal_to(Some(GhostState::HuntingPac));
    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::Hunting);
}

#[test]
fn test_sixteenth_kill_of_level_earns_bonus() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, MEETING_TILE, Direction::Left);
    common::spawn_ghost(&mut world, GhostId::Cyan, GhostState::Frightened, MEETING_TILE, Direction::Right);
    world.resource_mut::<Level>().killed_ghost_count = 15;

    world.run_system_once(ghost_collision_system).expect("System should run successfully");

    assert_that(&world.resource::<Scoreboard>().score).is_equal_to(12_200);
    assert_that(&world.resource::<Scoreboard>().lives).is_equal_to(4);
    assert_that(&common::drain_events(&mut world)).is_equal_to(vec![
        GameEvent::GhostEaten { ghost: GhostId::Cyan, points: 200 },
        GameEvent::ExtraLifeWon,
    ]);
}

#[test]
fn test_fifteenth_kill_earns_no_bonus() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, MEETING_TILE, Direction::Left);
    common::spawn_ghost(&mut world, GhostId::Cyan, GhostState::Frightened, MEETING_TILE, Direction::Right);
    world.resource_mut::<Level>().killed_ghost_count = 14;

    world.run_system_once(ghost_collision_system).expect("System should run successfully");

    assert_that(&world.resource::<Scoreboard>().score).is_equal_to(200);
}

#[test]
fn test_hunting_ghost_kills_pac() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    let rules = *world.resource::<VariantRules>();
    world.resource_mut::<HuntingTimer>().start_first_phase(&rules, 1);
    let pac = common::spawn_pac(&mut world, MEETING_TILE, Direction::Left);
    common::spawn_ghost(&mut world, GhostId::Red, GhostState::HuntingPac, MEETING_TILE, Direction::Right);

    world.run_system_once(pac_killed_system).expect("System should run successfully");

    assert_that(&common::drain_events(&mut world)).is_equal_to(vec![GameEvent::PacDied]);
    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::PacDying {
        remaining_ticks: ticks::PAC_DYING,
    });
    assert_that(&world.resource::<StepLog>().pac_killed).is_true();
    assert_that(&world.resource::<HuntingTimer>().is_stopped()).is_true();
    assert_that(&world.resource::<GateKeeper>().is_global_counter_enabled()).is_true();
    assert_that(&world.resource::<Level>().elroy.enabled).is_false();
    assert_that(&world.get::<Pac>(pac).map(|p| p.dead)).is_equal_to(Some(true));
}

#[test]
fn test_frightened_ghost_does_not_kill() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, MEETING_TILE, Direction::Left);
    common::spawn_ghost(&mut world, GhostId::Red, GhostState::Frightened, MEETING_TILE, Direction::Right);

    world.run_system_once(pac_killed_system).expect("System should run successfully");

    assert_that(&common::drain_events(&mut world).is_empty()).is_true();
    assert_that(&world.resource::<StepLog>().pac_killed).is_false();
}

#[test]
fn test_immune_pac_survives() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    let pac = common::spawn_pac(&mut world, MEETING_TILE, Direction::Left);
    world.get_mut::<Pac>(pac).expect("Pac-Man should exist").immune = true;
    common::spawn_ghost(&mut world, GhostId::Red, GhostState::HuntingPac, MEETING_TILE, Direction::Right);

    world.run_system_once(pac_killed_system).expect("System should run successfully");

    assert_that(&common::drain_events(&mut world).is_empty()).is_true();
    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::Hunting);
}

#[test]
fn test_ms_pacman_demo_spares_pac_at_first() {
    let mut world = common::create_test_world(GameVariant::MsPacMan);
    common::spawn_pac(&mut world, MEETING_TILE, Direction::Left);
    common::spawn_ghost(&mut world, GhostId::Red, GhostState::HuntingPac, MEETING_TILE, Direction::Right);
    {
        let mut level = world.resource_mut::<Level>();
        level.demo = true;
        level.ticks = ticks::DEMO_LEVEL_MIN_DURATION - 1;
    }

    world.run_system_once(pac_killed_system).expect("System should run successfully");
    assert_that(&common::drain_events(&mut world).is_empty()).is_true();

    world.resource_mut::<Level>().ticks = ticks::DEMO_LEVEL_MIN_DURATION;
    world.run_system_once(pac_killed_system).expect("System should run successfully");
    assert_that(&common::drain_events(&mut world)).is_equal_to(vec![GameEvent::PacDied]);
}

#[test]
fn test_ghost_eaten_pause_counts_down() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    let eaten = common::spawn_ghost(&mut world, GhostId::Pink, GhostState::Eaten, MEETING_TILE, Direction::Right);
    let stage = GameStage::GhostEatenPause { remaining_ticks: 60 };
    world.insert_resource(stage);
    world.insert_resource(StepLog::new(1, stage));

    world.run_system_once(ghost_eaten_pause_system).expect("System should run successfully");

    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::GhostEatenPause { remaining_ticks: 59 });
    assert_that(&ghost_state(&world, eaten)).is_equal_to(Some(GhostState::Eaten));
}

#[test]
fn test_ghost_eaten_pause_sends_eaten_ghosts_home() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    let eaten = common::spawn_ghost(&mut world, GhostId::Pink, GhostState::Eaten, MEETING_TILE, Direction::Right);
    let frightened = common::spawn_ghost(&mut world, GhostId::Cyan, GhostState::Frightened, IVec2::new(21, 8), Direction::Left);
    let stage = GameStage::GhostEatenPause { remaining_ticks: 1 };
    world.insert_resource(stage);
    world.insert_resource(StepLog::new(1, stage));

    world.run_system_once(ghost_eaten_pause_system).expect("System should run successfully");

    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::Hunting);
    assert_that(&ghost_state(&world, eaten)).is_equal_to(Some(GhostState::ReturningHome));
    assert_that(&ghost_state(&world, frightened)).is_equal_to(Some(GhostState::Frightened));
}

#[test]
fn test_pac_dying_hides_ghosts_and_counts_down() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    let ghost = common::spawn_ghost(&mut world, GhostId::Red, GhostState::HuntingPac, MEETING_TILE, Direction::Right);
    let stage = GameStage::PacDying {
        remaining_ticks: ticks::PAC_DYING,
    };
    world.insert_resource(stage);
    world.insert_resource(StepLog::new(1, stage));

    world.run_system_once(pac_dying_system).expect("System should run successfully");

    assert_that(&world.get::<Mover>(ghost).map(|m| m.visible)).is_equal_to(Some(false));
    assert_that(&*world.resource::<GameStage>()).is_equal_to(GameStage::PacDying {
        remaining_ticks: ticks::PAC_DYING - 1,
    });
}
