use bevy_ecs::{entity::Entity, system::RunSystemOnce, world::World};
use glam::{IVec2, Vec2};
use pacman_engine::{
    constants::{landmarks, speed},
    error::GhostError,
    map::{direction::Direction, tile::tile_origin, world::WorldMap},
    systems::{
        ghost::{ghost_system, ChaseRole, Ghost, GhostId, GhostState, HuntingBehavior},
        hunting::HuntingTimer,
        level::{Level, PowerTimer, SimRng},
        movement::{Mover, Navigator},
    },
    variant::{percentage_speed, GameVariant, VariantRules},
};
use speculoos::prelude::*;

mod common;

fn pac_at(tile: IVec2, dir: Direction) -> Mover {
    Mover::new(tile_origin(tile), dir, speed::PAC_CORNERING)
}

#[test]
fn test_ambusher_targets_four_tiles_ahead() {
    let pac = pac_at(IVec2::new(10, 10), Direction::Right);
    let target = ChaseRole::Ambusher.target(IVec2::new(1, 1), IVec2::new(2, 0), &pac, IVec2::ZERO, true);
    assert_that(&target).is_equal_to(IVec2::new(14, 10));
}

#[test]
fn test_ambusher_overflow_bug_facing_up() {
    let pac = pac_at(IVec2::new(10, 10), Direction::Up);

    let with_bug = ChaseRole::Ambusher.target(IVec2::new(1, 1), IVec2::new(2, 0), &pac, IVec2::ZERO, true);
    let without_bug = ChaseRole::Ambusher.target(IVec2::new(1, 1), IVec2::new(2, 0), &pac, IVec2::ZERO, false);

    assert_that(&with_bug).is_equal_to(IVec2::new(6, 6));
    assert_that(&without_bug).is_equal_to(IVec2::new(10, 6));
}

#[test]
fn test_flanker_mirrors_through_red_ghost() {
    let pac = pac_at(IVec2::new(10, 10), Direction::Right);
    let target = ChaseRole::Flanker.target(IVec2::new(1, 1), IVec2::new(27, 34), &pac, IVec2::new(8, 10), true);
    assert_that(&target).is_equal_to(IVec2::new(16, 10));
}

#[test]
fn test_opportunist_retreats_when_close() {
    let pac = pac_at(IVec2::new(10, 10), Direction::Left);
    let scatter = IVec2::new(0, 34);

    let near = ChaseRole::Opportunist.target(IVec2::new(10, 12), scatter, &pac, IVec2::ZERO, true);
    let far = ChaseRole::Opportunist.target(IVec2::new(10, 30), scatter, &pac, IVec2::ZERO, true);

    assert_that(&near).is_equal_to(scatter);
    assert_that(&far).is_equal_to(IVec2::new(10, 10));
}

#[test]
fn test_direct_pursuer_targets_pac_tile() {
    let pac = pac_at(IVec2::new(20, 29), Direction::Down);
    let target = ChaseRole::DirectPursuer.target(IVec2::new(1, 1), IVec2::new(25, 0), &pac, IVec2::ZERO, true);
    assert_that(&target).is_equal_to(IVec2::new(20, 29));
}

#[test]
fn test_ghost_id_and_state_conversions() {
    assert_that(&GhostId::try_from(2u8)).is_equal_to(Ok(GhostId::Cyan));
    assert_that(&GhostId::try_from(4u8)).is_equal_to(Err(GhostError::InvalidId(4)));
    assert_that(&GhostState::try_from(6u8)).is_equal_to(Ok(GhostState::EnteringHouse));
    assert_that(&GhostState::try_from(7u8)).is_equal_to(Err(GhostError::InvalidState(7)));
}

#[test]
fn test_door_access_depends_on_state() {
    let (map, _) = common::arcade_map();
    let door = map.house().left_door_tile();
    let mover = Mover::new(tile_origin(door - IVec2::Y), Direction::Down, 0.0);
    let mut ghost = Ghost::new(GhostId::Pink, map.house().center(), HuntingBehavior::Standard(ChaseRole::Ambusher));

    ghost.state = GhostState::HuntingPac;
    assert_that(&ghost.can_access_tile(&mover, &map, door)).is_false();
    ghost.state = GhostState::EnteringHouse;
    assert_that(&ghost.can_access_tile(&mover, &map, door)).is_true();
}

#[test]
fn test_one_way_tile_blocks_hunting_ghost_from_below() {
    let (map, _) = common::arcade_map();
    let one_way = landmarks::ONE_WAY_DOWN_TILES[0];
    let below = Mover::new(tile_origin(one_way + IVec2::Y), Direction::Up, 0.0);
    let mut ghost = Ghost::new(GhostId::Red, map.house().center(), HuntingBehavior::Standard(ChaseRole::DirectPursuer));

    ghost.state = GhostState::HuntingPac;
    assert_that(&ghost.can_access_tile(&below, &map, one_way)).is_false();

    ghost.state = GhostState::Frightened;
    assert_that(&ghost.can_access_tile(&below, &map, one_way)).is_true();

    ghost.state = GhostState::HuntingPac;
    ghost.one_way_restricted = false;
    assert_that(&ghost.can_access_tile(&below, &map, one_way)).is_true();
}

#[test]
fn test_leaving_ghost_starts_hunting_above_door() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
    let ghost = common::spawn_ghost(&mut world, GhostId::Pink, GhostState::LeavingHouse, IVec2::new(13, 16), Direction::Up);
    let entry = world.resource::<WorldMap>().house().entry_position();
    world.get_mut::<Mover>(ghost).expect("Ghost should have a mover").set_position(entry);

    world.run_system_once(ghost_system).expect("System should run successfully");

    assert_that(&world.get::<Ghost>(ghost).map(|g| g.state)).is_equal_to(Some(GhostState::HuntingPac));
    assert_that(&world.get::<Mover>(ghost).map(|m| m.move_dir)).is_equal_to(Some(Direction::Left));
}

#[test]
fn test_leaving_ghost_is_frightened_during_power() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
    let ghost = common::spawn_ghost(&mut world, GhostId::Cyan, GhostState::LeavingHouse, IVec2::new(13, 16), Direction::Up);
    let entry = world.resource::<WorldMap>().house().entry_position();
    world.get_mut::<Mover>(ghost).expect("Ghost should have a mover").set_position(entry);
    world.resource_mut::<PowerTimer>().0.restart(300);

    world.run_system_once(ghost_system).expect("System should run successfully");

    assert_that(&world.get::<Ghost>(ghost).map(|g| g.state)).is_equal_to(Some(GhostState::Frightened));
}

#[test]
fn test_eaten_ghost_does_not_move() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
    let ghost = common::spawn_ghost(&mut world, GhostId::Orange, GhostState::Eaten, IVec2::new(6, 8), Direction::Right);
    world.get_mut::<Mover>(ghost).expect("Ghost should have a mover").set_speed(1.0);

    world.run_system_once(ghost_system).expect("System should run successfully");

    assert_that(&world.get::<Mover>(ghost).map(|m| m.position)).is_equal_to(Some(tile_origin(IVec2::new(6, 8))));
}

#[test]
fn test_returning_ghost_enters_house_at_entry() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
    let ghost = common::spawn_ghost(&mut world, GhostId::Red, GhostState::ReturningHome, IVec2::new(13, 14), Direction::Left);
    let entry = world.resource::<WorldMap>().house().entry_position();
    world.get_mut::<Mover>(ghost).expect("Ghost should have a mover").set_position(entry);

    world.run_system_once(ghost_system).expect("System should run successfully");

    assert_that(&world.get::<Ghost>(ghost).map(|g| g.state)).is_equal_to(Some(GhostState::EnteringHouse));
    assert_that(&world.get::<Mover>(ghost).map(|m| m.move_dir)).is_equal_to(Some(Direction::Down));
}

#[test]
fn test_entering_ghost_locks_at_revival_position() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
    let ghost = common::spawn_ghost(&mut world, GhostId::Cyan, GhostState::EnteringHouse, IVec2::new(11, 17), Direction::Down);
    let revival = world.get::<Ghost>(ghost).map(|g| g.revival_position).expect("Ghost should exist");
    world.get_mut::<Mover>(ghost).expect("Ghost should have a mover").set_position(revival);

    world.run_system_once(ghost_system).expect("System should run successfully");

    assert_that(&world.get::<Ghost>(ghost).map(|g| g.state)).is_equal_to(Some(GhostState::Locked));
    assert_that(&world.get::<Mover>(ghost).map(|m| m.move_dir)).is_equal_to(Some(Direction::Up));
}

#[test]
fn test_entering_ghost_walks_towards_revival_position() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
    let ghost = common::spawn_ghost(&mut world, GhostId::Orange, GhostState::EnteringHouse, IVec2::new(13, 14), Direction::Down);
    let entry = world.resource::<WorldMap>().house().entry_position();
    world.get_mut::<Mover>(ghost).expect("Ghost should have a mover").set_position(entry);

    for _ in 0..200 {
        world.run_system_once(ghost_system).expect("System should run successfully");
    }

    // Once locked, the ghost bounces inside the house instead of moving on.
    assert_that(&world.get::<Ghost>(ghost).map(|g| g.state)).is_equal_to(Some(GhostState::Locked));
    let tile = world.get::<Mover>(ghost).map(|m| m.tile()).expect("Ghost should have a mover");
    assert_that(&world.resource::<WorldMap>().is_inside_house(tile)).is_true();
}

#[test]
fn test_returning_ghost_enters_house_with_stale_speed() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
    let ghost = common::spawn_ghost(&mut world, GhostId::Red, GhostState::ReturningHome, IVec2::new(13, 14), Direction::Left);
    let entry = world.resource::<WorldMap>().house().entry_position();
    {
        let mut mover = world.get_mut::<Mover>(ghost).expect("Ghost should have a mover");
        mover.set_position(entry + Vec2::new(0.9, 0.0));
        mover.set_speed(0.0);
    }

    world.run_system_once(ghost_system).expect("System should run successfully");

    assert_that(&world.get::<Ghost>(ghost).map(|g| g.state)).is_equal_to(Some(GhostState::EnteringHouse));
    assert_that(&world.get::<Mover>(ghost).map(|m| m.position)).is_equal_to(Some(entry));
}

fn moved_speed(world: &mut World, ghost: Entity) -> f32 {
    world.run_system_once(ghost_system).expect("System should run successfully");
    world.get::<Mover>(ghost).map(|m| m.speed()).expect("Ghost should have a mover")
}

fn is_close(speed: f32, expected: f32) -> bool {
    (speed - expected).abs() < 1e-4
}

#[test]
fn test_frightened_ghost_never_reverses_in_corridor() {
    for seed in 0..32 {
        let mut world = common::create_test_world(GameVariant::PacMan);
        world.insert_resource(SimRng::for_level(seed, 1));
        common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
        let ghost = common::spawn_ghost(&mut world, GhostId::Pink, GhostState::Frightened, IVec2::new(3, 8), Direction::Right);

        world.run_system_once(ghost_system).expect("System should run successfully");

        let mover = world.get::<Mover>(ghost).expect("Ghost should have a mover");
        assert_that(&mover.wish_dir).is_equal_to(Direction::Right);
        assert_that(&mover.move_dir).is_equal_to(Direction::Right);
        assert_that(&mover.target_tile.is_none()).is_true();
    }
}

#[test]
fn test_frightened_ghost_turns_clockwise_past_walls() {
    for seed in 0..32 {
        let mut world = common::create_test_world(GameVariant::PacMan);
        world.insert_resource(SimRng::for_level(seed, 1));
        common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
        let ghost = common::spawn_ghost(&mut world, GhostId::Pink, GhostState::Frightened, IVec2::new(1, 4), Direction::Left);

        world.run_system_once(ghost_system).expect("System should run successfully");

        assert_that(&world.get::<Mover>(ghost).map(|m| m.move_dir)).is_equal_to(Some(Direction::Down));
    }
}

#[test]
fn test_frightened_ghost_speed() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
    let ghost = common::spawn_ghost(&mut world, GhostId::Pink, GhostState::Frightened, IVec2::new(3, 8), Direction::Right);
    let expected = world.resource::<Level>().data.ghost_frightened_speed();

    assert_that(&is_close(moved_speed(&mut world, ghost), expected)).is_true();
}

#[test]
fn test_cruise_elroy_speeds_up_and_always_chases() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    let pac_tile = IVec2::new(13, 26);
    common::spawn_pac(&mut world, pac_tile, Direction::Left);
    let red = common::spawn_ghost(&mut world, GhostId::Red, GhostState::HuntingPac, IVec2::new(6, 8), Direction::Right);
    let scatter_tile = world.resource::<WorldMap>().scatter_tile(GhostId::Red.index());

    let test_cases = [(0, 75), (1, 80), (2, 85)];
    for (mode, percentage) in test_cases {
        world.get_mut::<Mover>(red).expect("Ghost should have a mover").center_over_tile(IVec2::new(6, 8));
        world.resource_mut::<Level>().elroy.set_mode(mode);

        let speed = moved_speed(&mut world, red);
        assert!(is_close(speed, percentage_speed(percentage)), "mode {mode}: speed {speed}");

        let expected_target = if mode == 0 { scatter_tile } else { pac_tile };
        assert_that(&world.get::<Mover>(red).and_then(|m| m.target_tile)).is_equal_to(Some(expected_target));
    }

    world.get_mut::<Mover>(red).expect("Ghost should have a mover").center_over_tile(IVec2::new(6, 8));
    world.resource_mut::<Level>().elroy.set_enabled(false);
    assert_that(&is_close(moved_speed(&mut world, red), percentage_speed(75))).is_true();
    assert_that(&world.get::<Mover>(red).and_then(|m| m.target_tile)).is_equal_to(Some(scatter_tile));
}

#[test]
fn test_ms_pacman_red_and_pink_roam_in_first_scatter() {
    let mut world = common::create_test_world(GameVariant::MsPacMan);
    let rules = *world.resource::<VariantRules>();
    world.resource_mut::<HuntingTimer>().start_first_phase(&rules, 1);
    common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
    let red = common::spawn_ghost(&mut world, GhostId::Red, GhostState::HuntingPac, IVec2::new(6, 8), Direction::Right);
    let pink = common::spawn_ghost(&mut world, GhostId::Pink, GhostState::HuntingPac, IVec2::new(21, 8), Direction::Left);
    let cyan = common::spawn_ghost(&mut world, GhostId::Cyan, GhostState::HuntingPac, IVec2::new(15, 4), Direction::Right);

    world.run_system_once(ghost_system).expect("System should run successfully");

    assert_that(&world.get::<Mover>(red).map(|m| m.target_tile.is_none())).is_equal_to(Some(true));
    assert_that(&world.get::<Mover>(pink).map(|m| m.target_tile.is_none())).is_equal_to(Some(true));
    let cyan_scatter = world.resource::<WorldMap>().scatter_tile(GhostId::Cyan.index());
    assert_that(&world.get::<Mover>(cyan).and_then(|m| m.target_tile)).is_equal_to(Some(cyan_scatter));

    {
        let mut hunting = world.resource_mut::<HuntingTimer>();
        while !hunting.update() {}
        assert_that(&hunting.phase_index()).is_equal_to(1);
    }
    world.run_system_once(ghost_system).expect("System should run successfully");

    assert_that(&world.get::<Mover>(red).map(|m| m.target_tile.is_some())).is_equal_to(Some(true));
    assert_that(&world.get::<Mover>(pink).map(|m| m.target_tile.is_some())).is_equal_to(Some(true));
}

#[test]
fn test_pacman_red_targets_scatter_tile_in_first_scatter() {
    let mut world = common::create_test_world(GameVariant::PacMan);
    let rules = *world.resource::<VariantRules>();
    world.resource_mut::<HuntingTimer>().start_first_phase(&rules, 1);
    common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
    let red = common::spawn_ghost(&mut world, GhostId::Red, GhostState::HuntingPac, IVec2::new(6, 8), Direction::Right);

    world.run_system_once(ghost_system).expect("System should run successfully");

    let scatter_tile = world.resource::<WorldMap>().scatter_tile(GhostId::Red.index());
    assert_that(&world.get::<Mover>(red).and_then(|m| m.target_tile)).is_equal_to(Some(scatter_tile));
}

#[test]
fn test_tunnel_slowdown() {
    // (variant, level, slowed down in the tunnel)
    let test_cases = [
        (GameVariant::PacMan, 1, true),
        (GameVariant::PacMan, 5, true),
        (GameVariant::MsPacMan, 1, true),
        (GameVariant::MsPacMan, 3, true),
        (GameVariant::MsPacMan, 4, false),
    ];

    for (variant, level_number, slowed) in test_cases {
        let mut world = common::create_test_world(variant);
        world.insert_resource(Level::new(level_number, false, [0, 1]));
        common::spawn_pac(&mut world, IVec2::new(13, 26), Direction::Left);
        let cyan = common::spawn_ghost(&mut world, GhostId::Cyan, GhostState::HuntingPac, IVec2::new(3, 17), Direction::Left);

        let data = world.resource::<Level>().data;
        let expected = if slowed {
            data.ghost_tunnel_speed()
        } else {
            data.ghost_normal_speed()
        };
        let speed = moved_speed(&mut world, cyan);
        assert!(is_close(speed, expected), "{variant:?} level {level_number}: speed {speed}, expected {expected}");
    }
}
