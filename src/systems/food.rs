use bevy_ecs::event::EventWriter;
use bevy_ecs::query::Without;
use bevy_ecs::system::{Query, Res, ResMut};
use smallvec::SmallVec;
use tracing::{debug, trace};

use crate::constants::{points, ticks};
use crate::events::GameEvent;
use crate::map::food::FoodStore;
use crate::map::parser::Food;
use crate::map::world::WorldMap;
use crate::systems::gate::GateKeeper;
use crate::systems::ghost::{Ghost, GhostId, GhostState};
use crate::systems::hunting::HuntingTimer;
use crate::systems::level::{Level, PowerTimer};
use crate::systems::movement::Mover;
use crate::systems::player::Pac;
use crate::systems::power::on_energizer_eaten;
use crate::systems::score::Scoreboard;
use crate::systems::state::StepLog;
use crate::variant::VariantRules;

/// Checks Pac-Man's tile for food and applies everything that eating it triggers:
/// resting, elroy thresholds, power, points, dot counters and bonus milestones.
#[allow(clippy::too_many_arguments)]
pub fn food_system(
    world: Res<WorldMap>,
    rules: Res<VariantRules>,
    mut food: ResMut<FoodStore>,
    mut level: ResMut<Level>,
    mut scoreboard: ResMut<Scoreboard>,
    mut gate: ResMut<GateKeeper>,
    mut hunting: ResMut<HuntingTimer>,
    mut power: ResMut<PowerTimer>,
    mut log: ResMut<StepLog>,
    mut pacs: Query<(&mut Pac, &Mover), Without<Ghost>>,
    mut ghosts: Query<(&mut Ghost, &mut Mover), Without<Pac>>,
    mut events: EventWriter<GameEvent>,
) {
    let Ok((mut pac, pac_mover)) = pacs.single_mut() else {
        return;
    };
    let tile = pac_mover.tile();
    let Some(eaten) = food.register_eaten(tile) else {
        pac.starve();
        return;
    };

    let energizer = eaten == Food::Energizer;
    log.food_found_tile = Some(tile);
    log.energizer_found = energizer;
    trace!(?tile, energizer, uneaten = food.uneaten_count(), "Food eaten");

    pac.rest(if energizer {
        ticks::PAC_REST_ENERGIZER
    } else {
        ticks::PAC_REST_PELLET
    });

    if rules.elroy {
        let uneaten = food.uneaten_count();
        if uneaten == level.data.elroy1_dots_left as usize {
            level.elroy.set_mode(1);
        } else if uneaten == level.data.elroy2_dots_left as usize {
            level.elroy.set_mode(2);
        }
    }

    let value = if energizer {
        on_energizer_eaten(&mut level, &mut hunting, &mut power, &mut ghosts, &mut log, &mut events);
        points::ENERGIZER
    } else {
        points::PELLET
    };
    if scoreboard.score_points(value) {
        events.write(GameEvent::ExtraLifeWon);
    }

    let mut locked: SmallVec<[(GhostId, bool); 4]> = ghosts
        .iter()
        .filter(|(ghost, _)| ghost.state == GhostState::Locked)
        .map(|(ghost, mover)| (ghost.id, world.is_inside_house(mover.tile())))
        .collect();
    locked.sort_by_key(|(id, _)| *id);
    let orange_locked = locked.iter().any(|(id, _)| *id == GhostId::Orange);
    let first_locked_inside = locked.iter().find(|(_, inside)| *inside).map(|(id, _)| *id);
    gate.register_food_eaten(orange_locked, first_locked_inside);

    if rules.is_bonus_milestone(food.eaten_count()) {
        debug!(eaten = food.eaten_count(), "Bonus milestone reached");
        log.bonus_reached = true;
    }

    pac.end_starving();
    events.write(GameEvent::PacFoundFood { tile, energizer });
}
