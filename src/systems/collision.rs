//! Pac-Man meeting ghosts. Actors collide when they occupy the same tile.

use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res, ResMut};
use smallvec::SmallVec;
use tracing::info;

use crate::constants::{points, ticks};
use crate::events::GameEvent;
use crate::systems::gate::GateKeeper;
use crate::systems::ghost::{Ghost, GhostState};
use crate::systems::hunting::HuntingTimer;
use crate::systems::level::{Level, PowerTimer};
use crate::systems::movement::Mover;
use crate::systems::player::Pac;
use crate::systems::score::Scoreboard;
use crate::systems::state::{GameStage, StepLog};
use crate::variant::{GameVariant, VariantRules};

/// Whether ghosts cannot kill Pac-Man right now, independent of immunity.
///
/// In the Ms. Pac-Man demo level Pac-Man survives the first twenty seconds.
pub fn is_pac_killing_ignored(level: &Level, rules: &VariantRules) -> bool {
    level.demo && rules.variant == GameVariant::MsPacMan && level.ticks < ticks::DEMO_LEVEL_MIN_DURATION
}

/// Kills Pac-Man when a hunting ghost shares its tile.
///
/// Stops both timers, switches the house to the global dot counter, disables elroy
/// and starts the dying sequence.
#[allow(clippy::too_many_arguments)]
pub fn pac_killed_system(
    rules: Res<VariantRules>,
    mut level: ResMut<Level>,
    mut hunting: ResMut<HuntingTimer>,
    mut power: ResMut<PowerTimer>,
    mut gate: ResMut<GateKeeper>,
    mut stage: ResMut<GameStage>,
    mut log: ResMut<StepLog>,
    mut pacs: Query<(&mut Pac, &Mover), Without<Ghost>>,
    ghosts: Query<(&Ghost, &Mover), Without<Pac>>,
    mut events: EventWriter<GameEvent>,
) {
    let Ok((mut pac, pac_mover)) = pacs.single_mut() else {
        return;
    };
    let pac_tile = pac_mover.tile();
    let killer = ghosts
        .iter()
        .find(|(ghost, mover)| ghost.state == GhostState::HuntingPac && mover.tile() == pac_tile)
        .map(|(ghost, _)| ghost.id);
    let Some(killer) = killer else {
        return;
    };

    let ignored = if level.demo {
        is_pac_killing_ignored(&level, &rules)
    } else {
        pac.immune
    };
    if ignored {
        return;
    }

    info!(killer = killer.as_ref(), tile = ?pac_tile, "Pac-Man killed");
    log.pac_killed = true;
    hunting.stop();
    power.0.stop();
    power.0.reset(0);
    gate.reset_global_counter(true);
    level.elroy.set_enabled(false);
    pac.die();
    *stage = GameStage::PacDying {
        remaining_ticks: ticks::PAC_DYING,
    };
    events.write(GameEvent::PacDied);
}

/// Frightened ghosts on Pac-Man's tile are eaten, in id order.
///
/// Ghosts eaten under one energizer score 200, 400, 800 and 1600 points; the
/// sixteenth ghost of a level earns a further 12000.
#[allow(clippy::too_many_arguments)]
pub fn ghost_collision_system(
    mut level: ResMut<Level>,
    mut scoreboard: ResMut<Scoreboard>,
    mut stage: ResMut<GameStage>,
    mut log: ResMut<StepLog>,
    pacs: Query<&Mover, (With<Pac>, Without<Ghost>)>,
    mut ghosts: Query<(&mut Ghost, &Mover), Without<Pac>>,
    mut events: EventWriter<GameEvent>,
) {
    let Ok(pac_mover) = pacs.single() else {
        return;
    };
    let pac_tile = pac_mover.tile();

    let mut victims: SmallVec<[_; 4]> = ghosts
        .iter_mut()
        .filter(|(ghost, mover)| ghost.state == GhostState::Frightened && mover.tile() == pac_tile)
        .map(|(ghost, _)| ghost)
        .collect();
    victims.sort_by_key(|ghost| ghost.id);

    for ghost in victims.iter_mut() {
        let killed_so_far = level.victims.len();
        let value = points::GHOST_EATEN[killed_so_far.min(points::GHOST_EATEN.len() - 1)];
        level.victims.push(ghost.id);
        level.killed_ghost_count += 1;
        ghost.set_state(GhostState::Eaten);
        ghost.killed_index = Some(killed_so_far);
        log.killed_ghosts.push(ghost.id);
        info!(ghost = ghost.id.as_ref(), points = value, tile = ?pac_tile, "Ghost eaten");

        if scoreboard.score_points(value) {
            events.write(GameEvent::ExtraLifeWon);
        }
        events.write(GameEvent::GhostEaten {
            ghost: ghost.id,
            points: value,
        });

        if level.killed_ghost_count == points::ALL_GHOSTS_EATEN_COUNT {
            info!(level = level.number, points = points::ALL_GHOSTS_EATEN, "All ghosts eaten in level");
            if scoreboard.score_points(points::ALL_GHOSTS_EATEN) {
                events.write(GameEvent::ExtraLifeWon);
            }
        }
    }

    if !log.killed_ghosts.is_empty() {
        *stage = GameStage::GhostEatenPause {
            remaining_ticks: ticks::GHOST_EATEN_PAUSE,
        };
    }
}
