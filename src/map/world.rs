//! The world query surface: terrain, portals, the ghost house and landmark positions.

use bevy_ecs::resource::Resource;
use glam::{IVec2, Vec2};
use tracing::{debug, warn};

use crate::constants::{landmarks, HALF_TILE, PORTAL_DEPTH, RAW_BOARD, TILE_SIZE};
use crate::error::{GameResult, MapError};
use crate::map::food::FoodStore;
use crate::map::parser::{MapTileParser, Terrain};
use crate::map::tile::{tile_at, tile_origin};

/// Landmarks that a board layout cannot express by itself.
#[derive(Debug, Clone, PartialEq)]
pub struct MapProperties {
    pub house_min_tile: Option<IVec2>,
    pub house_max_tile: Option<IVec2>,
    /// Falls back to the tile marked `X` on the board.
    pub pac_tile: Option<IVec2>,
    pub bonus_tile: IVec2,
    /// Scatter targets by ghost id.
    pub scatter_tiles: [IVec2; 4],
    pub one_way_down: Vec<IVec2>,
}

impl Default for MapProperties {
    fn default() -> Self {
        Self {
            house_min_tile: Some(landmarks::HOUSE_MIN_TILE),
            house_max_tile: Some(landmarks::HOUSE_MAX_TILE),
            pac_tile: Some(landmarks::PAC_TILE),
            bonus_tile: landmarks::BONUS_TILE,
            scatter_tiles: landmarks::SCATTER_TILES,
            one_way_down: landmarks::ONE_WAY_DOWN_TILES.to_vec(),
        }
    }
}

/// A board layout together with its landmarks.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDefinition {
    pub board: Vec<String>,
    pub properties: MapProperties,
}

impl MapDefinition {
    /// The arcade board with its default landmarks.
    pub fn arcade() -> Self {
        Self {
            board: RAW_BOARD.iter().map(|row| row.to_string()).collect(),
            properties: MapProperties::default(),
        }
    }
}

impl Default for MapDefinition {
    fn default() -> Self {
        Self::arcade()
    }
}

/// The rectangular ghost house, door included.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct House {
    pub min_tile: IVec2,
    pub max_tile: IVec2,
}

impl House {
    pub const ARCADE: House = House {
        min_tile: landmarks::HOUSE_MIN_TILE,
        max_tile: landmarks::HOUSE_MAX_TILE,
    };

    pub fn size_in_tiles(&self) -> IVec2 {
        self.max_tile - self.min_tile + IVec2::ONE
    }

    pub fn contains(&self, tile: IVec2) -> bool {
        tile.cmpge(self.min_tile).all() && tile.cmple(self.max_tile).all()
    }

    pub fn left_door_tile(&self) -> IVec2 {
        self.min_tile + IVec2::new(3, 0)
    }

    pub fn right_door_tile(&self) -> IVec2 {
        self.min_tile + IVec2::new(4, 0)
    }

    /// The position right above the door, between both door tiles.
    pub fn entry_position(&self) -> Vec2 {
        tile_origin(self.left_door_tile() - IVec2::Y) + Vec2::new(HALF_TILE as f32, 0.0)
    }

    pub fn entry_tile(&self) -> IVec2 {
        tile_at(self.entry_position())
    }

    /// The pixel center of the house.
    pub fn center(&self) -> Vec2 {
        tile_origin(self.min_tile) + (self.size_in_tiles() * HALF_TILE).as_vec2()
    }

    /// Start positions of the red, pink, cyan and orange ghost.
    ///
    /// The red ghost starts above the door, the others side by side inside.
    pub fn ghost_positions(&self) -> [Vec2; 4] {
        let red = self.entry_position();
        let center_y = (self.min_tile.y * TILE_SIZE + self.size_in_tiles().y * HALF_TILE) as f32;
        let pink = Vec2::new(red.x, center_y);
        let offset = Vec2::new((2 * TILE_SIZE) as f32, 0.0);
        [red, pink, pink - offset, pink + offset]
    }
}

/// A pair of tunnel ends on opposite board edges.
///
/// The portal tiles are the `depth` tiles beyond each tunnel end, outside the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Portal {
    pub left_end: IVec2,
    pub right_end: IVec2,
    pub depth: i32,
}

impl Portal {
    pub fn contains(&self, tile: IVec2) -> bool {
        (1..=self.depth).any(|i| tile == self.left_end - IVec2::new(i, 0) || tile == self.right_end + IVec2::new(i, 0))
    }
}

/// Read-only view of the level's world, queried by every actor every tick.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WorldMap {
    cols: i32,
    rows: i32,
    terrain: Vec<Terrain>,
    portals: Vec<Portal>,
    house: House,
    one_way_down: Vec<IVec2>,
    pac_tile: IVec2,
    bonus_tile: IVec2,
    scatter_tiles: [IVec2; 4],
}

impl WorldMap {
    /// Builds the world and its food layer from a map definition.
    ///
    /// A missing house is not fatal: a warning is logged and the arcade house is used.
    ///
    /// # Errors
    ///
    /// Returns an error if the board cannot be parsed, Pac-Man has no start tile,
    /// a landmark lies outside the board, or a door tile lies outside the house.
    pub fn from_definition(definition: &MapDefinition) -> GameResult<(WorldMap, FoodStore)> {
        let parsed = MapTileParser::parse_board(&definition.board)?;
        let props = &definition.properties;

        let house = match Self::resolve_house(props) {
            Ok(house) => house,
            Err(error) => {
                warn!(%error, fallback = ?House::ARCADE, "Using fallback ghost house");
                House::ARCADE
            }
        };
        if let Some(door) = parsed.house_door.iter().find(|&&tile| !house.contains(tile)) {
            return Err(MapError::InvalidConfig(format!("house door {door} lies outside the house")).into());
        }

        let pac_tile = props
            .pac_tile
            .or(parsed.pac_start)
            .ok_or(MapError::MissingLandmark("pac_tile"))?;

        let (cols, rows) = (parsed.cols as i32, parsed.rows as i32);
        let terrain: Vec<Terrain> = parsed.cells.iter().map(|cell| cell.terrain).collect();

        let portals: Vec<Portal> = (0..rows)
            .filter(|&row| {
                let left = terrain[(row * cols) as usize];
                let right = terrain[(row * cols + cols - 1) as usize];
                left == Terrain::Tunnel && right == Terrain::Tunnel
            })
            .map(|row| Portal {
                left_end: IVec2::new(0, row),
                right_end: IVec2::new(cols - 1, row),
                depth: PORTAL_DEPTH,
            })
            .collect();

        let world = WorldMap {
            cols,
            rows,
            terrain,
            portals,
            house,
            one_way_down: props.one_way_down.clone(),
            pac_tile,
            bonus_tile: props.bonus_tile,
            scatter_tiles: props.scatter_tiles,
        };

        for (name, tile) in [
            ("pac_tile", pac_tile),
            ("bonus_tile", props.bonus_tile),
            ("house_min_tile", house.min_tile),
            ("house_max_tile", house.max_tile),
        ] {
            if !world.is_inside(tile) {
                return Err(MapError::LandmarkOutOfBounds { name, tile }.into());
            }
        }

        let food = FoodStore::new(parsed.cols, parsed.rows, parsed.cells.iter().map(|cell| cell.food).collect());

        debug!(
            cols,
            rows,
            portals = world.portals.len(),
            food = food.total_count(),
            "World map built"
        );

        Ok((world, food))
    }

    fn resolve_house(props: &MapProperties) -> Result<House, MapError> {
        let min_tile = props.house_min_tile.ok_or(MapError::MissingLandmark("house_min_tile"))?;
        let max_tile = props.house_max_tile.ok_or(MapError::MissingLandmark("house_max_tile"))?;
        if min_tile.cmpgt(max_tile).any() {
            return Err(MapError::InvalidConfig(format!("house bounds {min_tile}..{max_tile} are inverted")));
        }
        Ok(House { min_tile, max_tile })
    }

    pub fn cols(&self) -> i32 {
        self.cols
    }

    pub fn rows(&self) -> i32 {
        self.rows
    }

    /// Whether the tile lies on the board.
    pub fn is_inside(&self, tile: IVec2) -> bool {
        (0..self.cols).contains(&tile.x) && (0..self.rows).contains(&tile.y)
    }

    /// The terrain of a tile on the board, `None` outside.
    pub fn terrain(&self, tile: IVec2) -> Option<Terrain> {
        self.is_inside(tile)
            .then(|| self.terrain[(tile.y * self.cols + tile.x) as usize])
    }

    pub fn is_blocked(&self, tile: IVec2) -> bool {
        self.terrain(tile) == Some(Terrain::Wall)
    }

    pub fn is_door(&self, tile: IVec2) -> bool {
        self.terrain(tile) == Some(Terrain::Door)
    }

    pub fn is_tunnel(&self, tile: IVec2) -> bool {
        self.terrain(tile) == Some(Terrain::Tunnel)
    }

    pub fn is_portal(&self, tile: IVec2) -> bool {
        self.portals.iter().any(|portal| portal.contains(tile))
    }

    pub fn is_inside_house(&self, tile: IVec2) -> bool {
        self.house.contains(tile)
    }

    /// Whether hunting ghosts are kept from entering this tile from below.
    pub fn is_one_way_down(&self, tile: IVec2) -> bool {
        self.one_way_down.contains(&tile)
    }

    pub fn portals(&self) -> &[Portal] {
        &self.portals
    }

    pub fn house(&self) -> &House {
        &self.house
    }

    pub fn scatter_tile(&self, ghost_index: usize) -> IVec2 {
        self.scatter_tiles[ghost_index]
    }

    /// Pac-Man's start position, half a tile right of the start tile.
    pub fn pac_position(&self) -> Vec2 {
        tile_origin(self.pac_tile) + Vec2::new(HALF_TILE as f32, 0.0)
    }

    pub fn bonus_tile(&self) -> IVec2 {
        self.bonus_tile
    }

    /// Every tile of the board in row-major order.
    pub fn tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.rows).flat_map(move |y| (0..self.cols).map(move |x| IVec2::new(x, y)))
    }
}
