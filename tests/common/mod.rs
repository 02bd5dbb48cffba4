#![allow(dead_code)]

use bevy_ecs::{entity::Entity, event::Events, world::World};
use glam::IVec2;
use pacman_engine::{
    config::GameConfig,
    constants::speed,
    error::GameError,
    events::GameEvent,
    game::Game,
    map::{
        direction::Direction,
        food::FoodStore,
        tile::tile_origin,
        world::{MapDefinition, WorldMap},
    },
    systems::{
        blinking::EnergizerBlink,
        gate::GateKeeper,
        ghost::{Ghost, GhostId, GhostState},
        hunting::HuntingTimer,
        level::{Level, PowerTimer, SimRng},
        movement::Mover,
        player::Pac,
        score::Scoreboard,
        state::{GameStage, StepHistory, StepLog},
    },
    variant::{GameVariant, VariantRules},
};

pub fn arcade_map() -> (WorldMap, FoodStore) {
    WorldMap::from_definition(&MapDefinition::arcade()).expect("The arcade map should build")
}

/// A world with every resource the simulation systems read, in the hunting stage of level 1.
pub fn create_test_world(variant: GameVariant) -> World {
    let mut world = World::new();
    let (map, food) = arcade_map();
    world.insert_resource(map);
    world.insert_resource(food);
    world.insert_resource(VariantRules::for_variant(variant));
    world.insert_resource(Level::new(1, false, [0, 1]));
    world.insert_resource(HuntingTimer::default());
    world.insert_resource(PowerTimer::default());
    world.insert_resource(GateKeeper::default());
    world.insert_resource(Scoreboard::new(3));
    world.insert_resource(EnergizerBlink::default());
    world.insert_resource(SimRng::for_level(7, 1));
    world.insert_resource(GameStage::Hunting);
    world.insert_resource(StepLog::new(1, GameStage::Hunting));
    world.insert_resource(StepHistory::default());
    world.init_resource::<Events<GameEvent>>();
    world.init_resource::<Events<GameError>>();
    world
}

pub fn spawn_pac(world: &mut World, tile: IVec2, dir: Direction) -> Entity {
    let mover = Mover::new(tile_origin(tile), dir, speed::PAC_CORNERING);
    world.spawn((Pac::new(false), mover)).id()
}

pub fn spawn_ghost(world: &mut World, id: GhostId, state: GhostState, tile: IVec2, dir: Direction) -> Entity {
    let revival = world.resource::<WorldMap>().house().ghost_positions()[id.index()];
    let behavior = world.resource::<VariantRules>().hunting_behavior(id);
    let mut ghost = Ghost::new(id, revival, behavior);
    ghost.state = state;
    let mover = Mover::new(tile_origin(tile), dir, speed::GHOST_CORNERING);
    world.spawn((ghost, mover)).id()
}

pub fn drain_events(world: &mut World) -> Vec<GameEvent> {
    world.resource_mut::<Events<GameEvent>>().drain().collect()
}

pub fn new_game(variant: GameVariant) -> Game {
    Game::new(GameConfig {
        variant,
        seed: 42,
        ..Default::default()
    })
    .expect("Game should be created")
}
