//! This module contains all the constants used by the simulation.

use glam::UVec2;

/// The number of simulation ticks per second of arcade time.
pub const TICKS_PER_SECOND: u32 = 60;

/// The size of each tile, in pixels.
pub const TILE_SIZE: i32 = 8;
/// Half of [`TILE_SIZE`], the distance from a tile's corner to its center.
pub const HALF_TILE: i32 = TILE_SIZE / 2;
/// The size of the arcade board, in tiles (three HUD rows on top, two below).
pub const BOARD_CELL_SIZE: UVec2 = UVec2::new(28, 36);

/// The speed, in pixels per tick, that all speed percentages are relative to.
pub const BASE_SPEED: f32 = 1.25;

/// Speeds that do not depend on the level.
pub mod speed {
    /// Speed of a ghost bouncing inside, leaving or entering the house.
    pub const GHOST_INSIDE_HOUSE: f32 = 0.5;
    /// Speed of a ghost's eyes returning to the house.
    pub const GHOST_RETURNING_HOME: f32 = 2.0;
    /// Speed of the Ms. Pac-Man bonus while wandering through the maze.
    ///
    /// Only approximated from observing the arcade machine.
    pub const MOVING_BONUS: f32 = 0.5;
    /// One-tick speed change applied when a ghost takes a corner.
    pub const GHOST_CORNERING: f32 = -1.25;
    /// One-tick speed change applied when Pac-Man takes a corner.
    pub const PAC_CORNERING: f32 = 1.5;
}

/// Point values awarded by the simulation.
pub mod points {
    pub const PELLET: u32 = 10;
    pub const ENERGIZER: u32 = 50;
    /// Points for the first, second, third and fourth ghost eaten under one energizer.
    pub const GHOST_EATEN: [u32; 4] = [200, 400, 800, 1600];
    /// Awarded when all sixteen ghosts of a level have been eaten.
    pub const ALL_GHOSTS_EATEN: u32 = 12_000;
    /// Number of ghosts that must be eaten in a single level for [`ALL_GHOSTS_EATEN`].
    pub const ALL_GHOSTS_EATEN_COUNT: u32 = 16;
    /// The score at which an extra life is granted (once per game).
    pub const EXTRA_LIFE: u32 = 10_000;
}

/// Durations, in ticks.
pub mod ticks {
    /// How long an eaten bonus keeps showing its value.
    ///
    /// Only approximated from observing the arcade machine.
    pub const BONUS_EATEN: u32 = 120;
    /// Minimum and maximum (exclusive) edible duration of a static bonus.
    pub const STATIC_BONUS_EDIBLE: (u32, u32) = (540, 600);
    /// Pac-Man rests this many ticks after eating a pellet.
    pub const PAC_REST_PELLET: u32 = 1;
    /// Pac-Man rests this many ticks after eating an energizer.
    pub const PAC_REST_ENERGIZER: u32 = 3;
    /// Ticks per energizer flash while power mode fades.
    pub const FLASH_LENGTH: u32 = 28;
    /// On/off period of the energizer blink pulse.
    pub const ENERGIZER_BLINK: u32 = 10;
    /// Length of the freeze after a ghost has been eaten.
    pub const GHOST_EATEN_PAUSE: u32 = 60;
    /// Length of Pac-Man's death sequence.
    pub const PAC_DYING: u32 = 240;
    /// In the Ms. Pac-Man demo level, Pac-Man cannot be killed during this initial period.
    pub const DEMO_LEVEL_MIN_DURATION: u64 = 20 * super::TICKS_PER_SECOND as u64;
}

/// Default landmark tiles of the arcade board.
pub mod landmarks {
    use glam::IVec2;

    /// Top-left tile of the fallback ghost house.
    pub const HOUSE_MIN_TILE: IVec2 = IVec2::new(10, 15);
    /// Bottom-right tile of the fallback ghost house.
    pub const HOUSE_MAX_TILE: IVec2 = IVec2::new(17, 19);
    /// Pac-Man's start tile; the actor is placed half a tile to the right of it.
    pub const PAC_TILE: IVec2 = IVec2::new(13, 26);
    /// Tile of the static bonus; it is placed half a tile to the right of it.
    pub const BONUS_TILE: IVec2 = IVec2::new(13, 20);
    /// Scatter targets of the red, pink, cyan and orange ghost.
    pub const SCATTER_TILES: [IVec2; 4] = [IVec2::new(25, 0), IVec2::new(2, 0), IVec2::new(27, 34), IVec2::new(0, 34)];
    /// Tiles that hunting ghosts may not enter from below: the passages above the
    /// crossings over the house and above Pac-Man's start.
    pub const ONE_WAY_DOWN_TILES: [IVec2; 4] = [IVec2::new(12, 13), IVec2::new(15, 13), IVec2::new(12, 25), IVec2::new(15, 25)];
}

/// Depth, in tiles, of each portal beyond the tunnel ends.
pub const PORTAL_DEPTH: i32 = 2;

/// The raw layout of the arcade board, as a 2D array of characters.
///
/// `#` wall, `.` pellet, `o` energizer, `=` house door, `T` tunnel, ` ` empty.
pub const RAW_BOARD: [&str; BOARD_CELL_SIZE.y as usize] = [
    "                            ",
    "                            ",
    "                            ",
    "############################",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#o####.#####.##.#####.####o#",
    "#.####.#####.##.#####.####.#",
    "#..........................#",
    "#.####.##.########.##.####.#",
    "#.####.##.########.##.####.#",
    "#......##....##....##......#",
    "######.##### ## #####.######",
    "     #.##### ## #####.#     ",
    "     #.##          ##.#     ",
    "     #.## ###==### ##.#     ",
    "######.## #      # ##.######",
    "TTTTTT.   #      #   .TTTTTT",
    "######.## #      # ##.######",
    "     #.## ######## ##.#     ",
    "     #.##          ##.#     ",
    "     #.## ######## ##.#     ",
    "######.## ######## ##.######",
    "#............##............#",
    "#.####.#####.##.#####.####.#",
    "#.####.#####.##.#####.####.#",
    "#o..##.......  .......##..o#",
    "###.##.##.########.##.##.###",
    "###.##.##.########.##.##.###",
    "#......##....##....##......#",
    "#.##########.##.##########.#",
    "#.##########.##.##########.#",
    "#..........................#",
    "############################",
    "                            ",
    "                            ",
];
