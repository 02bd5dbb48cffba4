use glam::{IVec2, Vec2};
use strum_macros::AsRefStr;

/// The four cardinal directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr)]
#[repr(usize)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Left,
    Down,
    #[default]
    Right,
}

impl Direction {
    /// The four cardinal directions in tie-break priority order.
    ///
    /// When two candidate directions are equally good, the one listed first wins.
    pub const PRIORITY: [Direction; 4] = [Direction::Up, Direction::Left, Direction::Down, Direction::Right];

    /// Returns the opposite direction. Constant time.
    pub const fn opposite(self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// Returns the next direction when turning clockwise.
    pub const fn next_clockwise(self) -> Direction {
        match self {
            Direction::Up => Direction::Right,
            Direction::Right => Direction::Down,
            Direction::Down => Direction::Left,
            Direction::Left => Direction::Up,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Direction::Left | Direction::Right)
    }

    pub const fn is_vertical(self) -> bool {
        !self.is_horizontal()
    }

    /// Whether both directions lie on the same axis (e.g. `Left` and `Right`).
    pub const fn same_orientation(self, other: Direction) -> bool {
        self.is_horizontal() == other.is_horizontal()
    }

    /// Returns the direction as a unit tile offset. Screen coordinates: `Up` is negative y.
    pub const fn as_ivec2(self) -> IVec2 {
        match self {
            Direction::Up => IVec2::NEG_Y,
            Direction::Down => IVec2::Y,
            Direction::Left => IVec2::NEG_X,
            Direction::Right => IVec2::X,
        }
    }

    /// The direction of a unit step between neighboring tiles.
    pub fn from_step(step: IVec2) -> Option<Direction> {
        Self::PRIORITY.into_iter().find(|dir| dir.as_ivec2() == step)
    }

    /// Returns the direction as a unit pixel vector.
    pub fn as_vec2(self) -> Vec2 {
        self.as_ivec2().as_vec2()
    }

    /// Returns the direction as a usize (0-3) in priority order. Constant time.
    /// This is useful for indexing into arrays.
    pub const fn as_usize(self) -> usize {
        self as usize
    }
}

impl From<Direction> for IVec2 {
    fn from(dir: Direction) -> Self {
        dir.as_ivec2()
    }
}
