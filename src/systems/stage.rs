//! Systems that move the game between its stages.

use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{Without, With};
use bevy_ecs::system::{Query, Res, ResMut};
use tracing::{debug, info};

use crate::events::GameEvent;
use crate::map::food::FoodStore;
use crate::systems::blinking::EnergizerBlink;
use crate::systems::bonus::{Bonus, BonusState};
use crate::systems::ghost::{Ghost, GhostState};
use crate::systems::hunting::HuntingTimer;
use crate::systems::level::{Level, PowerTimer};
use crate::systems::movement::Mover;
use crate::systems::player::Pac;
use crate::systems::state::{GameStage, StepLog};

/// Counts the hunting ticks of the level.
pub fn level_clock_system(mut level: ResMut<Level>) {
    level.ticks += 1;
}

/// Completes the level once the last piece of food has been eaten.
#[allow(clippy::too_many_arguments)]
pub fn level_complete_system(
    food: Res<FoodStore>,
    level: Res<Level>,
    mut hunting: ResMut<HuntingTimer>,
    mut power: ResMut<PowerTimer>,
    mut blink: ResMut<EnergizerBlink>,
    mut stage: ResMut<GameStage>,
    mut bonuses: Query<(&mut Bonus, &mut Mover), (Without<Pac>, Without<Ghost>)>,
    mut events: EventWriter<GameEvent>,
) {
    if food.uneaten_count() > 0 {
        return;
    }

    hunting.stop();
    power.0.stop();
    power.0.reset(0);
    blink.0.reset();
    for (mut bonus, mut mover) in bonuses.iter_mut() {
        if bonus.state != BonusState::Inactive {
            bonus.set_inactive(&mut mover);
        }
    }
    info!(level = level.number, ticks = level.ticks, "Level complete");
    *stage = GameStage::LevelComplete;
    events.write(GameEvent::StopAllSounds);
    events.write(GameEvent::LevelCompleted { level: level.number });
}

/// Counts down the freeze after a ghost was eaten, then sends the eaten ghosts home.
pub fn ghost_eaten_pause_system(
    log: Res<StepLog>,
    mut stage: ResMut<GameStage>,
    mut ghosts: Query<&mut Ghost, With<Mover>>,
) {
    let GameStage::GhostEatenPause { remaining_ticks } = log.stage else {
        return;
    };
    let remaining_ticks = remaining_ticks.saturating_sub(1);
    if remaining_ticks > 0 {
        *stage = GameStage::GhostEatenPause { remaining_ticks };
        return;
    }

    for mut ghost in ghosts.iter_mut() {
        if ghost.state == GhostState::Eaten {
            ghost.set_state(GhostState::ReturningHome);
        }
    }
    debug!("Ghost eaten pause over");
    *stage = GameStage::Hunting;
}

/// Counts down Pac-Man's death sequence. The game handles the end of it.
pub fn pac_dying_system(log: Res<StepLog>, mut stage: ResMut<GameStage>, mut ghosts: Query<&mut Mover, With<Ghost>>) {
    let GameStage::PacDying { remaining_ticks } = log.stage else {
        return;
    };
    if remaining_ticks == crate::constants::ticks::PAC_DYING {
        for mut mover in ghosts.iter_mut() {
            mover.visible = false;
        }
    }
    *stage = GameStage::PacDying {
        remaining_ticks: remaining_ticks.saturating_sub(1),
    };
}
