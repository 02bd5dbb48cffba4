//! The bonus symbol: a static fruit below the house or a fruit wandering through the maze.

use bevy_ecs::bundle::Bundle;
use bevy_ecs::component::Component;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res, ResMut};
use glam::{IVec2, Vec2};
use rand::Rng;
use strum_macros::AsRefStr;
use tracing::{debug, info, warn};

use crate::constants::{speed, ticks, HALF_TILE};
use crate::events::GameEvent;
use crate::map::direction::Direction;
use crate::map::tile::tile_origin;
use crate::map::world::WorldMap;
use crate::systems::ghost::Ghost;
use crate::systems::level::{Level, SimRng};
use crate::systems::movement::{Mover, Navigator};
use crate::systems::player::Pac;
use crate::systems::score::Scoreboard;
use crate::systems::state::StepLog;
use crate::systems::steering::RouteSteering;
use crate::timer::INDEFINITE;
use crate::variant::{BonusKind, VariantRules};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
pub enum BonusState {
    #[default]
    Inactive,
    Edible,
    Eaten,
}

/// The bonus actor. Movement state lives in the sibling [`Mover`] component.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct Bonus {
    pub symbol: u8,
    pub points: u32,
    pub state: BonusState,
    pub kind: BonusKind,
    /// Ticks left in the current state, [`INDEFINITE`] for a wandering bonus.
    pub countdown: u64,
    pub route: Option<RouteSteering>,
}

impl Navigator for Bonus {
    fn can_access_tile(&self, _mover: &Mover, world: &WorldMap, tile: IVec2) -> bool {
        if world.is_inside_house(tile) {
            return false;
        }
        if world.is_inside(tile) {
            !world.is_blocked(tile)
        } else {
            world.is_portal(tile)
        }
    }

    fn can_reverse(&self, _mover: &Mover) -> bool {
        false
    }
}

impl Bonus {
    pub fn new(kind: BonusKind) -> Self {
        Self {
            symbol: 0,
            points: 0,
            state: BonusState::Inactive,
            kind,
            countdown: 0,
            route: None,
        }
    }

    pub fn set_inactive(&mut self, mover: &mut Mover) {
        self.state = BonusState::Inactive;
        self.route = None;
        mover.set_speed(0.0);
        mover.visible = false;
        debug!(symbol = self.symbol, "Bonus inactive");
    }

    pub fn set_edible(&mut self, mover: &mut Mover, ticks: u64) {
        self.state = BonusState::Edible;
        self.countdown = ticks;
        mover.visible = true;
        debug!(symbol = self.symbol, ticks, "Bonus edible");
    }

    pub fn set_eaten(&mut self, mover: &mut Mover, ticks: u64) {
        self.state = BonusState::Eaten;
        self.countdown = ticks;
        mover.set_speed(0.0);
        debug!(symbol = self.symbol, ticks, "Bonus eaten");
    }

    /// Counts down; returns `true` when the countdown had already run out.
    fn count_down(&mut self) -> bool {
        if self.countdown == 0 {
            return true;
        }
        if self.countdown != INDEFINITE {
            self.countdown -= 1;
        }
        false
    }

    /// Advances the bonus by one tick. Returns `true` when it expired.
    pub fn update(&mut self, mover: &mut Mover, world: &WorldMap) -> bool {
        match (self.state, self.kind) {
            (BonusState::Inactive, _) => false,
            (BonusState::Edible, BonusKind::Static) | (BonusState::Eaten, _) => {
                if self.count_down() {
                    self.set_inactive(mover);
                    true
                } else {
                    false
                }
            }
            (BonusState::Edible, BonusKind::Moving) => {
                let mut route = self.route.take();
                let complete = match route.as_mut() {
                    Some(route) => {
                        route.steer(mover, world, &*self);
                        route.is_complete()
                    }
                    None => true,
                };
                if complete {
                    debug!(symbol = self.symbol, tile = ?mover.tile(), "Bonus reached its exit");
                    self.set_inactive(mover);
                    return true;
                }
                self.route = route;
                mover.navigate_towards_target(world, &*self);
                mover.try_moving(world, &*self);
                false
            }
        }
    }
}

#[derive(Bundle)]
pub struct BonusBundle {
    pub bonus: Bonus,
    pub mover: Mover,
}

impl BonusBundle {
    pub fn new(kind: BonusKind) -> Self {
        let mut mover = Mover::new(Vec2::ZERO, Direction::Left, 0.0);
        mover.visible = false;
        mover.can_teleport = kind == BonusKind::Static;
        Self {
            bonus: Bonus::new(kind),
            mover,
        }
    }
}

/// Activates the next bonus of the level when a food milestone was reached this tick.
///
/// A static bonus simply replaces the previous one. A wandering bonus is skipped
/// while the previous one is still around, when the variant says so.
#[allow(clippy::too_many_arguments)]
pub fn bonus_activation_system(
    world: Res<WorldMap>,
    rules: Res<VariantRules>,
    mut level: ResMut<Level>,
    mut rng: ResMut<SimRng>,
    mut log: ResMut<StepLog>,
    mut bonuses: Query<(&mut Bonus, &mut Mover), (Without<Pac>, Without<Ghost>)>,
    mut events: EventWriter<GameEvent>,
) {
    let Ok((mut bonus, mut mover)) = bonuses.single_mut() else {
        return;
    };
    if rules.bonus_waits_for_previous && bonus.state != BonusState::Inactive {
        info!(symbol = bonus.symbol, state = bonus.state.as_ref(), "Previous bonus still active, skipping");
        return;
    }
    let Some(symbol) = level.next_bonus_symbol() else {
        return;
    };

    match rules.bonus_kind {
        BonusKind::Static => {
            let position = tile_origin(world.bonus_tile()) + Vec2::new(HALF_TILE as f32, 0.0);
            mover.reset(position, Direction::Left);
            mover.set_speed(0.0);
            bonus.route = None;
            let (min, max) = ticks::STATIC_BONUS_EDIBLE;
            let edible_ticks = rng.0.random_range(min..max) as u64;
            bonus.symbol = symbol;
            bonus.points = rules.bonus_value(symbol);
            bonus.set_edible(&mut mover, edible_ticks);
        }
        BonusKind::Moving => {
            let portals = world.portals();
            if portals.is_empty() {
                warn!(symbol, "No portals, cannot place a wandering bonus");
                return;
            }
            let left_to_right = rng.0.random_bool(0.5);
            let entry_portal = portals[rng.0.random_range(0..portals.len())];
            let exit_portal = portals[rng.0.random_range(0..portals.len())];
            let (entry, exit) = if left_to_right {
                (entry_portal.left_end, exit_portal.right_end + IVec2::X)
            } else {
                (entry_portal.right_end, exit_portal.left_end - IVec2::X)
            };
            let house = world.house();
            let house_entry = house.entry_tile();
            let behind_house = house_entry + IVec2::new(0, house.size_in_tiles().y + 1);

            mover.reset(tile_origin(entry), if left_to_right { Direction::Right } else { Direction::Left });
            mover.set_speed(speed::MOVING_BONUS);
            mover.set_target_tile(None);
            bonus.route = Some(RouteSteering::new(vec![house_entry, behind_house, house_entry, exit]));
            bonus.symbol = symbol;
            bonus.points = rules.bonus_value(symbol);
            bonus.set_edible(&mut mover, INDEFINITE);
            debug!(?entry, ?exit, left_to_right, "Wandering bonus route");
        }
    }

    log.bonus_index = Some(level.next_bonus_index);
    level.next_bonus_index += 1;
    info!(symbol, points = bonus.points, tile = ?mover.tile(), "Bonus activated");
    events.write(GameEvent::BonusActivated { symbol });
}

/// Eats the bonus if Pac-Man is on its tile, otherwise advances it.
#[allow(clippy::too_many_arguments)]
pub fn bonus_system(
    world: Res<WorldMap>,
    mut scoreboard: ResMut<Scoreboard>,
    mut log: ResMut<StepLog>,
    pacs: Query<&Mover, (With<Pac>, Without<Bonus>)>,
    mut bonuses: Query<(&mut Bonus, &mut Mover), (Without<Pac>, Without<Ghost>)>,
    mut events: EventWriter<GameEvent>,
) {
    let (Ok(pac_mover), Ok((mut bonus, mut mover))) = (pacs.single(), bonuses.single_mut()) else {
        return;
    };

    if bonus.state == BonusState::Edible && mover.tile() == pac_mover.tile() {
        bonus.set_eaten(&mut mover, ticks::BONUS_EATEN as u64);
        info!(symbol = bonus.symbol, points = bonus.points, "Bonus eaten");
        if scoreboard.score_points(bonus.points) {
            events.write(GameEvent::ExtraLifeWon);
        }
        log.bonus_eaten = true;
        events.write(GameEvent::BonusEaten {
            symbol: bonus.symbol,
            points: bonus.points,
        });
    } else if bonus.update(&mut mover, &world) {
        events.write(GameEvent::BonusExpired { symbol: bonus.symbol });
    }
}
