//! Power mode: energizers frighten the ghosts for a level-dependent duration.

use bevy_ecs::event::EventWriter;
use bevy_ecs::query::Without;
use bevy_ecs::system::{Query, ResMut};
use tracing::{debug, info};

use crate::events::GameEvent;
use crate::systems::ghost::{Ghost, GhostState};
use crate::systems::hunting::HuntingTimer;
use crate::systems::level::{Level, PowerTimer};
use crate::systems::movement::Mover;
use crate::systems::player::Pac;
use crate::systems::state::StepLog;

/// Whether the fading window of power mode starts on this tick.
///
/// Power shorter than the fading window starts fading on its first tick.
pub fn is_power_fading_starting(power: &PowerTimer, fading_ticks: u64) -> bool {
    let timer = &power.0;
    (timer.is_running() && timer.remaining() == fading_ticks) || (timer.duration() < fading_ticks && timer.tick_count() == 1)
}

/// Whether power mode is in its fading window.
pub fn is_power_fading(power: &PowerTimer, fading_ticks: u64) -> bool {
    power.0.is_running() && power.0.remaining() <= fading_ticks
}

/// Gives Pac-Man power after eating an energizer.
///
/// On levels without power mode, hunting and frightened ghosts only reverse.
pub fn on_energizer_eaten(
    level: &mut Level,
    hunting: &mut HuntingTimer,
    power: &mut PowerTimer,
    ghosts: &mut Query<(&mut Ghost, &mut Mover), Without<Pac>>,
    log: &mut StepLog,
    events: &mut EventWriter<GameEvent>,
) {
    level.victims.clear();
    let power_ticks = level.data.pac_power_ticks() as u64;
    if power_ticks == 0 {
        for (ghost, mut mover) in ghosts.iter_mut() {
            if ghost.in_state(&[GhostState::HuntingPac, GhostState::Frightened]) {
                mover.reverse_asap();
            }
        }
        return;
    }

    hunting.stop();
    power.0.restart(power_ticks);
    info!(ticks = power_ticks, "Pac-Man gets power");
    for (mut ghost, mut mover) in ghosts.iter_mut() {
        if ghost.state == GhostState::HuntingPac {
            ghost.set_state(GhostState::Frightened);
        }
        if ghost.state == GhostState::Frightened {
            mover.reverse_asap();
        }
    }
    log.pac_gets_power = true;
    events.write(GameEvent::PacGetsPower);
}

/// Ticks the power timer; signals the start of fading and ends power mode on expiry.
pub fn power_system(
    mut power: ResMut<PowerTimer>,
    mut hunting: ResMut<HuntingTimer>,
    mut level: ResMut<Level>,
    mut log: ResMut<StepLog>,
    mut ghosts: Query<&mut Ghost>,
    mut events: EventWriter<GameEvent>,
) {
    power.0.tick();
    let fading_ticks = level.data.power_fading_ticks() as u64;

    if is_power_fading_starting(&power, fading_ticks) {
        debug!(remaining = power.0.remaining(), "Pac-Man starts losing power");
        log.pac_starts_losing_power = true;
        events.write(GameEvent::PacStartsLosingPower);
    } else if power.0.has_expired() {
        power.0.stop();
        power.0.reset(0);
        level.victims.clear();
        hunting.start();
        for mut ghost in ghosts.iter_mut() {
            if ghost.state == GhostState::Frightened {
                ghost.set_state(GhostState::HuntingPac);
            }
        }
        info!("Pac-Man lost power, hunting resumed");
        log.pac_lost_power = true;
        events.write(GameEvent::PacLostPower);
    }
}
