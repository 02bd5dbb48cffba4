use bevy_ecs::resource::Resource;
use glam::IVec2;

use crate::map::parser::Food;

/// The level's food layer. The only part of the maze that changes during a level.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct FoodStore {
    cols: usize,
    rows: usize,
    food: Vec<Option<Food>>,
    eaten: Vec<bool>,
    total: usize,
    uneaten: usize,
}

impl FoodStore {
    pub fn new(cols: usize, rows: usize, food: Vec<Option<Food>>) -> Self {
        let total = food.iter().filter(|f| f.is_some()).count();
        Self {
            cols,
            rows,
            eaten: vec![false; food.len()],
            food,
            total,
            uneaten: total,
        }
    }

    fn index(&self, tile: IVec2) -> Option<usize> {
        let inside = (0..self.cols as i32).contains(&tile.x) && (0..self.rows as i32).contains(&tile.y);
        inside.then(|| tile.y as usize * self.cols + tile.x as usize)
    }

    /// The uneaten food at a tile, if any.
    pub fn food_at(&self, tile: IVec2) -> Option<Food> {
        self.index(tile).and_then(|i| if self.eaten[i] { None } else { self.food[i] })
    }

    pub fn has_food_at(&self, tile: IVec2) -> bool {
        self.food_at(tile).is_some()
    }

    pub fn is_energizer_at(&self, tile: IVec2) -> bool {
        self.food_at(tile) == Some(Food::Energizer)
    }

    /// Marks the food at a tile as eaten and returns what was there.
    pub fn register_eaten(&mut self, tile: IVec2) -> Option<Food> {
        let food = self.food_at(tile)?;
        if let Some(i) = self.index(tile) {
            self.eaten[i] = true;
            self.uneaten -= 1;
        }
        Some(food)
    }

    pub fn total_count(&self) -> usize {
        self.total
    }

    pub fn uneaten_count(&self) -> usize {
        self.uneaten
    }

    pub fn eaten_count(&self) -> usize {
        self.total - self.uneaten
    }

    /// Tiles that still carry food.
    pub fn remaining_tiles(&self) -> impl Iterator<Item = IVec2> + '_ {
        (0..self.food.len())
            .filter(|&i| self.food[i].is_some() && !self.eaten[i])
            .map(|i| IVec2::new((i % self.cols) as i32, (i / self.cols) as i32))
    }
}
