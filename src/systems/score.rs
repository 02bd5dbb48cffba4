use bevy_ecs::resource::Resource;
use thousands::Separable;
use tracing::{debug, info};

use crate::constants::points;

/// Score, high score and remaining lives of the current game.
#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct Scoreboard {
    pub score: u32,
    pub high_score: u32,
    pub lives: u8,
    /// Disabled in demo levels.
    pub enabled: bool,
    extra_life_awarded: bool,
}

impl Default for Scoreboard {
    fn default() -> Self {
        Self::new(3)
    }
}

impl Scoreboard {
    pub fn new(lives: u8) -> Self {
        Self {
            score: 0,
            high_score: 0,
            lives,
            enabled: true,
            extra_life_awarded: false,
        }
    }

    /// Starts a new game, keeping the high score.
    pub fn reset(&mut self, lives: u8) {
        self.score = 0;
        self.lives = lives;
        self.enabled = true;
        self.extra_life_awarded = false;
    }

    /// Adds points to the score.
    ///
    /// Returns `true` when the score just crossed the extra life threshold; the life has
    /// then already been added.
    pub fn score_points(&mut self, points: u32) -> bool {
        if !self.enabled || points == 0 {
            return false;
        }
        let before = self.score;
        self.score += points;
        self.high_score = self.high_score.max(self.score);
        debug!(points, score = %self.score.separate_with_commas(), "Points scored");

        if !self.extra_life_awarded && before < points::EXTRA_LIFE && self.score >= points::EXTRA_LIFE {
            self.extra_life_awarded = true;
            self.lives = self.lives.saturating_add(1);
            info!(score = %self.score.separate_with_commas(), lives = self.lives, "Extra life won");
            return true;
        }
        false
    }

    /// Takes a life away. Returns `true` when none are left.
    pub fn lose_life(&mut self) -> bool {
        self.lives = self.lives.saturating_sub(1);
        self.lives == 0
    }
}
