use bevy_ecs::resource::Resource;
use bevy_ecs::system::ResMut;

use crate::constants::ticks;
use crate::timer::Pulse;

/// The on/off signal the energizers blink with while hunting.
#[derive(Resource, Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnergizerBlink(pub Pulse);

impl Default for EnergizerBlink {
    fn default() -> Self {
        Self(Pulse::new(ticks::ENERGIZER_BLINK, true))
    }
}

impl EnergizerBlink {
    pub fn is_on(&self) -> bool {
        self.0.is_on()
    }
}

/// Advances the energizer blink pulse by one tick.
pub fn blinking_system(mut blink: ResMut<EnergizerBlink>) {
    blink.0.tick();
}
