//! This module contains the game façade: level building, commands and the per-tick schedule.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::{With, Without};
use bevy_ecs::schedule::{ExecutorKind, IntoScheduleConfigs, Schedule};
use bevy_ecs::system::Res;
use bevy_ecs::world::World;
use glam::{IVec2, Vec2};
use strum::IntoEnumIterator;
use tracing::{debug, info, trace, warn};

use crate::config::GameConfig;
use crate::constants::speed;
use crate::error::{GameError, GameResult};
use crate::events::{GameCommand, GameEvent};
use crate::formatter;
use crate::map::direction::Direction;
use crate::map::food::FoodStore;
use crate::map::world::WorldMap;
use crate::systems::blinking::{blinking_system, EnergizerBlink};
use crate::systems::bonus::{bonus_activation_system, bonus_system, Bonus, BonusBundle, BonusState};
use crate::systems::collision::{ghost_collision_system, pac_killed_system};
use crate::systems::food::food_system;
use crate::systems::gate::{ghost_release_system, GateKeeper};
use crate::systems::ghost::{ghost_system, Ghost, GhostId, GhostState};
use crate::systems::hunting::{hunting_timer_system, HuntingPhase, HuntingTimer};
use crate::systems::level::{Level, PowerTimer, SimRng};
use crate::systems::movement::Mover;
use crate::systems::player::{pac_system, Pac};
use crate::systems::power::power_system;
use crate::systems::score::Scoreboard;
use crate::systems::stage::{ghost_eaten_pause_system, level_clock_system, level_complete_system, pac_dying_system};
use crate::systems::state::{GameStage, StepHistory, StepLog};
use crate::systems::steering::{Autopilot, Steering};
use crate::variant::{GameVariant, VariantRules};

/// Position and heading of one actor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActorSnapshot {
    pub position: Vec2,
    pub tile: IVec2,
    pub move_dir: Direction,
    pub wish_dir: Direction,
    pub speed: f32,
    pub visible: bool,
}

impl From<&Mover> for ActorSnapshot {
    fn from(mover: &Mover) -> Self {
        Self {
            position: mover.position,
            tile: mover.tile(),
            move_dir: mover.move_dir,
            wish_dir: mover.wish_dir,
            speed: mover.speed(),
            visible: mover.visible,
        }
    }
}

/// A comparable picture of the level between two ticks.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSnapshot {
    pub tick: u64,
    pub level_number: u32,
    pub demo: bool,
    pub stage: GameStage,
    pub score: u32,
    pub lives: u8,
    pub food_eaten: usize,
    pub food_uneaten: usize,
    pub hunting_phase: (usize, HuntingPhase),
    pub power_remaining: u64,
    pub bonus_symbols: [u8; 2],
    pub pac: ActorSnapshot,
    /// Ghost states and actors, in id order.
    pub ghosts: Vec<(GhostId, GhostState, ActorSnapshot)>,
    pub bonus: (BonusState, u8, ActorSnapshot),
}

/// Core simulation state built on the Bevy ECS architecture.
///
/// The `World` holds the actors (Pac-Man, four ghosts, the bonus) as entities and
/// everything else as resources, while the `Schedule` runs one simulation step in a
/// fixed order. Stage changes made by a system take effect on the next tick: every
/// run condition reads the stage recorded in the tick's [`StepLog`].
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
    config: GameConfig,
    pac_steering: Option<Steering>,
    tick: u64,
}

impl Game {
    /// Creates a game with level 1 built but not started.
    ///
    /// # Errors
    ///
    /// Returns `GameError` if the configured map cannot be parsed or lacks a landmark.
    pub fn new(config: GameConfig) -> GameResult<Game> {
        info!(variant = config.variant.as_ref(), seed = config.seed, "Creating game");

        let mut world = World::default();
        let mut schedule = Schedule::default();

        Self::setup_ecs(&mut world);
        Self::insert_resources(&mut world, &config);
        Self::configure_schedule(&mut schedule);

        let mut game = Game {
            world,
            schedule,
            config,
            pac_steering: None,
            tick: 0,
        };
        game.build_level(1, false)?;
        Ok(game)
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
    }

    fn insert_resources(world: &mut World, config: &GameConfig) {
        let mut rules = VariantRules::for_variant(config.variant);
        if let Some(overflow_bug) = config.overflow_bug {
            rules.overflow_bug = overflow_bug;
        }
        world.insert_resource(rules);
        world.insert_resource(Level::default());
        world.insert_resource(HuntingTimer::default());
        world.insert_resource(PowerTimer::default());
        world.insert_resource(GateKeeper::default());
        world.insert_resource(Scoreboard::new(config.start_lives));
        world.insert_resource(EnergizerBlink::default());
        world.insert_resource(SimRng::for_level(config.seed, 0));
        world.insert_resource(GameStage::default());
        world.insert_resource(StepLog::default());
        world.insert_resource(StepHistory::default());
    }

    fn configure_schedule(schedule: &mut Schedule) {
        schedule.set_executor_kind(ExecutorKind::SingleThreaded);

        let hunting = |log: Res<StepLog>| log.stage == GameStage::Hunting;
        let alive = |log: Res<StepLog>| log.stage == GameStage::Hunting && !log.pac_killed;
        let no_kills = |log: Res<StepLog>| log.stage == GameStage::Hunting && !log.pac_killed && log.killed_ghosts.is_empty();

        schedule.add_systems(
            (
                level_clock_system.run_if(hunting),
                hunting_timer_system.run_if(hunting),
                blinking_system.run_if(hunting),
                ghost_release_system.run_if(hunting),
                food_system.run_if(hunting),
                bonus_activation_system.run_if(|log: Res<StepLog>| log.stage == GameStage::Hunting && log.bonus_reached),
                pac_system.run_if(hunting),
                power_system.run_if(hunting),
                pac_killed_system.run_if(hunting),
                ghost_system.run_if(|log: Res<StepLog>| {
                    (log.stage == GameStage::Hunting && !log.pac_killed) || matches!(log.stage, GameStage::GhostEatenPause { .. })
                }),
                ghost_collision_system.run_if(alive),
                bonus_system.run_if(no_kills),
                level_complete_system.run_if(alive),
                ghost_eaten_pause_system.run_if(|log: Res<StepLog>| matches!(log.stage, GameStage::GhostEatenPause { .. })),
                pac_dying_system.run_if(|log: Res<StepLog>| matches!(log.stage, GameStage::PacDying { .. })),
            )
                .chain(),
        );
    }

    /// Builds a level from scratch: fresh map and food, timers, gate keeper and actors.
    ///
    /// Building the same level twice yields the same state.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidState` for level 0 and map errors from the configured map.
    pub fn build_level(&mut self, number: u32, demo: bool) -> GameResult<()> {
        if number == 0 {
            return Err(GameError::InvalidState("levels are numbered from 1".into()));
        }
        let (map, food) = WorldMap::from_definition(&self.config.map)?;
        let rules = *self.world.resource::<VariantRules>();

        let mut rng = SimRng::for_level(self.config.seed, number);
        let bonus_symbols = [rules.bonus_symbol(number, &mut rng.0), rules.bonus_symbol(number, &mut rng.0)];

        self.world.clear_entities();
        self.world.insert_resource(Level::new(number, demo, bonus_symbols));
        self.world.insert_resource(rng);
        self.world.insert_resource(HuntingTimer::default());
        self.world.insert_resource(PowerTimer::default());
        self.world.insert_resource(EnergizerBlink::default());
        self.world.insert_resource(GameStage::Idle);
        self.world.resource_mut::<GateKeeper>().set_level_number(number);
        self.world.resource_mut::<Scoreboard>().enabled = !demo;
        self.world.resource_mut::<StepHistory>().clear();

        let steering = if demo {
            Some(match rules.variant {
                GameVariant::PacMan => Steering::pacman_demo_route(),
                GameVariant::MsPacMan => Steering::Autopilot(Autopilot::default()),
            })
        } else {
            self.pac_steering.clone()
        };
        Self::spawn_actors(&mut self.world, &map, &rules, steering, self.config.pac_immune && !demo);

        self.world.insert_resource(food);
        self.world.insert_resource(map);
        self.world.send_event(GameEvent::LevelCreated { level: number, demo });
        info!(level = number, demo, ?bonus_symbols, "Level created");
        Ok(())
    }

    fn spawn_actors(world: &mut World, map: &WorldMap, rules: &VariantRules, steering: Option<Steering>, pac_immune: bool) {
        let mut pac_mover = Mover::new(map.pac_position(), Direction::Left, speed::PAC_CORNERING);
        pac_mover.set_speed(0.0);
        let pac = Pac {
            steering,
            ..Pac::new(pac_immune)
        };
        let entity = world.spawn((pac, pac_mover)).id();
        trace!(?entity, position = ?map.pac_position(), "Spawned Pac-Man");

        let positions = map.house().ghost_positions();
        for id in GhostId::iter() {
            // The red ghost starts outside the house but is revived in its center.
            let revival = match id {
                GhostId::Red => positions[GhostId::Pink.index()],
                _ => positions[id.index()],
            };
            let mut mover = Mover::new(positions[id.index()], id.start_direction(), speed::GHOST_CORNERING);
            mover.set_speed(0.0);
            let ghost = Ghost::new(id, revival, rules.hunting_behavior(id));
            let entity = world.spawn((ghost, mover)).id();
            trace!(ghost = id.as_ref(), ?entity, "Spawned ghost");
        }

        world.spawn(BonusBundle::new(rules.bonus_kind));
        debug!("All actors spawned");
    }

    /// Puts every actor back to its start position, as at the start of a round.
    fn reset_actors(&mut self) {
        let (pac_position, ghost_positions) = {
            let map = self.world.resource::<WorldMap>();
            (map.pac_position(), map.house().ghost_positions())
        };

        let mut pacs = self.world.query::<(&mut Pac, &mut Mover)>();
        for (mut pac, mut mover) in pacs.iter_mut(&mut self.world) {
            pac.reset();
            if let Some(Steering::Route(route)) = pac.steering.as_mut() {
                route.init();
            }
            mover.reset(pac_position, Direction::Left);
            mover.set_speed(0.0);
            mover.visible = true;
        }

        let mut ghosts = self.world.query::<(&mut Ghost, &mut Mover)>();
        for (mut ghost, mut mover) in ghosts.iter_mut(&mut self.world) {
            ghost.set_state(GhostState::Locked);
            mover.reset(ghost_positions[ghost.id.index()], ghost.id.start_direction());
            mover.set_speed(0.0);
            mover.visible = true;
        }

        let mut bonuses = self.world.query_filtered::<(&mut Bonus, &mut Mover), (Without<Pac>, Without<Ghost>)>();
        for (mut bonus, mut mover) in bonuses.iter_mut(&mut self.world) {
            if bonus.state != BonusState::Inactive {
                bonus.set_inactive(&mut mover);
            }
        }

        self.world.resource_mut::<PowerTimer>().0.reset(0);
        self.world.resource_mut::<EnergizerBlink>().0.reset();
        self.world.resource_mut::<Level>().victims.clear();
        debug!("Actors reset");
    }

    fn start_hunting(&mut self) {
        let number = self.world.resource::<Level>().number;
        let rules = *self.world.resource::<VariantRules>();
        let (index, phase) = {
            let mut hunting = self.world.resource_mut::<HuntingTimer>();
            hunting.start_first_phase(&rules, number);
            (hunting.phase_index(), hunting.phase())
        };
        if let Some(mut log) = self.world.get_resource_mut::<StepLog>() {
            log.hunting_phase_started = Some(index);
        }
        self.world.send_event(GameEvent::HuntingPhaseStarted { index, phase });
        self.world.resource_mut::<EnergizerBlink>().0.start();
        self.world.insert_resource(GameStage::Hunting);
    }

    /// Starts (or restarts after a lost life) the round of the current level.
    pub fn start_level(&mut self) {
        self.reset_actors();
        let level = self.world.resource::<Level>().number;
        info!(level, "Level started");
        self.world.send_event(GameEvent::LevelStarted { level });
        self.start_hunting();
    }

    /// Executes a command and returns the events it caused.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidState` when the command does not fit the current stage.
    pub fn execute(&mut self, command: GameCommand) -> GameResult<Vec<GameEvent>> {
        debug!(?command, "Executing command");
        match command {
            GameCommand::BuildLevel(number) => self.build_level(number, false)?,
            GameCommand::BuildDemoLevel => self.build_level(1, true)?,
            GameCommand::StartGame => {
                let lives = self.config.start_lives;
                self.world.resource_mut::<Scoreboard>().reset(lives);
                self.build_level(1, false)?;
                self.start_level();
            }
            GameCommand::ContinueGame => match self.stage() {
                GameStage::Idle => self.start_level(),
                GameStage::LevelComplete => {
                    let level = self.world.resource::<Level>();
                    let (next, demo) = (level.number + 1, level.demo);
                    self.build_level(next, demo)?;
                    self.start_level();
                }
                stage => {
                    return Err(GameError::InvalidState(format!("cannot continue in stage {stage:?}")));
                }
            },
            GameCommand::SetPacSteering(steering) => {
                self.pac_steering = steering.clone();
                let mut pacs = self.world.query::<&mut Pac>();
                for mut pac in pacs.iter_mut(&mut self.world) {
                    pac.steering = steering.clone();
                }
            }
        }
        Ok(self.drain_events())
    }

    /// Sets the direction Pac-Man turns into next, as player input would.
    pub fn set_pac_wish_dir(&mut self, dir: Direction) {
        let mut pacs = self.world.query_filtered::<&mut Mover, With<Pac>>();
        for mut mover in pacs.iter_mut(&mut self.world) {
            mover.set_wish_dir(dir);
        }
    }

    /// Runs one simulation step and returns the events it produced, in order.
    pub fn tick(&mut self) -> Vec<GameEvent> {
        self.tick += 1;
        formatter::increment_tick();

        let stage = *self.world.resource::<GameStage>();
        self.world.insert_resource(StepLog::new(self.tick, stage));
        self.schedule.run(&mut self.world);

        if *self.world.resource::<GameStage>() == (GameStage::PacDying { remaining_ticks: 0 }) {
            self.on_pac_dying_finished();
        }

        let log = self.world.resource::<StepLog>().clone();
        self.world.resource_mut::<StepHistory>().record(log);

        for error in self.world.resource_mut::<Events<GameError>>().drain() {
            warn!(%error, tick = self.tick, "Error during tick");
        }
        self.drain_events()
    }

    fn on_pac_dying_finished(&mut self) {
        let demo = self.world.resource::<Level>().demo;
        let game_over = demo || self.world.resource_mut::<Scoreboard>().lose_life();
        if game_over {
            info!(demo, score = self.world.resource::<Scoreboard>().score, "Game over");
            self.world.insert_resource(GameStage::GameOver);
            self.world.send_event(GameEvent::GameOver);
        } else {
            debug!(lives = self.world.resource::<Scoreboard>().lives, "Life lost, waiting to continue");
            self.reset_actors();
            self.world.insert_resource(GameStage::Idle);
        }
    }

    fn drain_events(&mut self) -> Vec<GameEvent> {
        self.world.resource_mut::<Events<GameEvent>>().drain().collect()
    }

    /// Ticks run since the game was created.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stage(&self) -> GameStage {
        *self.world.resource::<GameStage>()
    }

    pub fn level(&self) -> &Level {
        self.world.resource::<Level>()
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        self.world.resource::<Scoreboard>()
    }

    pub fn food(&self) -> &FoodStore {
        self.world.resource::<FoodStore>()
    }

    pub fn map(&self) -> &WorldMap {
        self.world.resource::<WorldMap>()
    }

    pub fn history(&self) -> &StepHistory {
        self.world.resource::<StepHistory>()
    }

    /// The log of the last tick.
    pub fn last_step(&self) -> &StepLog {
        self.world.resource::<StepLog>()
    }

    /// Captures the level state for comparison.
    pub fn snapshot(&mut self) -> LevelSnapshot {
        let pac = {
            let mut pacs = self.world.query_filtered::<&Mover, With<Pac>>();
            pacs.iter(&self.world).next().map(ActorSnapshot::from)
        };
        let mut ghosts: Vec<(GhostId, GhostState, ActorSnapshot)> = {
            let mut query = self.world.query::<(&Ghost, &Mover)>();
            query
                .iter(&self.world)
                .map(|(ghost, mover)| (ghost.id, ghost.state, ActorSnapshot::from(mover)))
                .collect()
        };
        ghosts.sort_by_key(|(id, _, _)| *id);
        let bonus = {
            let mut bonuses = self.world.query::<(&Bonus, &Mover)>();
            bonuses
                .iter(&self.world)
                .next()
                .map(|(bonus, mover)| (bonus.state, bonus.symbol, ActorSnapshot::from(mover)))
        };
        let absent = ActorSnapshot::from(&Mover::new(Vec2::ZERO, Direction::Left, 0.0));

        let level = self.world.resource::<Level>();
        let scoreboard = self.world.resource::<Scoreboard>();
        let food = self.world.resource::<FoodStore>();
        let hunting = self.world.resource::<HuntingTimer>();
        LevelSnapshot {
            tick: self.tick,
            level_number: level.number,
            demo: level.demo,
            stage: *self.world.resource::<GameStage>(),
            score: scoreboard.score,
            lives: scoreboard.lives,
            food_eaten: food.eaten_count(),
            food_uneaten: food.uneaten_count(),
            hunting_phase: (hunting.phase_index(), hunting.phase()),
            power_remaining: self.world.resource::<PowerTimer>().0.remaining(),
            bonus_symbols: level.bonus_symbols,
            pac: pac.unwrap_or(absent),
            ghosts,
            bonus: bonus.unwrap_or((BonusState::Inactive, 0, absent)),
        }
    }
}
