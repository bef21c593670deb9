//! The arena: a fixed cuboid grid with sparse special items.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::Dice;
use crate::error::{EngineError, EngineResult};
use crate::game::{Coord, SpecialItem, Weapon};

/// Largest accepted arena dimension.
///
/// Keeps every cell index inside the `i32` range of [`Coord`] and bounds the
/// item map at one billion cells.
pub const MAX_DIMENSION: u32 = 1000;

/// Cells kept free of items so both robots can always be placed.
const RESERVED_CELLS: u64 = 2;

/// Random probes before falling back to a linear scan for a free cell.
const SAMPLE_ATTEMPTS: u32 = 1024;

/// Tunable parameters for arena construction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaSettings {
    /// Every dimension must be at least this large.
    pub min_dimension: u32,
    /// Items spawned per unit of volume, scaled by a uniform draw.
    pub fill_coefficient: f64,
}

impl Default for ArenaSettings {
    fn default() -> Self {
        Self {
            min_dimension: 30,
            fill_coefficient: 0.2,
        }
    }
}

/// A `width x length x height` grid holding at most one item per cell.
///
/// Dimensions never change after construction.
#[derive(Debug, Clone, PartialEq)]
pub struct Arena {
    width: u32,
    length: u32,
    height: u32,
    items: HashMap<Coord, SpecialItem>,
}

impl Arena {
    /// Create an arena and scatter a random population of items.
    ///
    /// `floor(volume * fill_coefficient * U(0,1))` items are placed on
    /// distinct free cells; two cells are always left free.
    ///
    /// Each dimension is capped at [`MAX_DIMENSION`]. Cells are addressed by
    /// `i32` coordinates and items are stored one per cell, so the cap keeps
    /// both the coordinate math and the fill bounded. Large arenas stay cheap
    /// only with a small `fill_coefficient`.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidDimension`] if a dimension is below
    /// `settings.min_dimension` or above [`MAX_DIMENSION`].
    pub fn new<D: Dice + ?Sized>(
        width: u32,
        length: u32,
        height: u32,
        settings: &ArenaSettings,
        weapons: &[Weapon],
        dice: &mut D,
    ) -> EngineResult<Self> {
        let valid = |d: u32| d >= settings.min_dimension.max(1) && d <= MAX_DIMENSION;
        if !(valid(width) && valid(length) && valid(height)) {
            return Err(EngineError::InvalidDimension {
                minimum: settings.min_dimension.max(1),
                maximum: MAX_DIMENSION,
                width,
                length,
                height,
            });
        }

        let mut arena = Self {
            width,
            length,
            height,
            items: HashMap::new(),
        };
        arena.fill(settings.fill_coefficient, weapons, dice);
        tracing::debug!(%arena, "arena created");
        Ok(arena)
    }

    fn fill<D: Dice + ?Sized>(&mut self, coefficient: f64, weapons: &[Weapon], dice: &mut D) {
        let volume = self.volume();
        // Truncation is the point: floor(volume * coefficient * U).
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss, clippy::cast_precision_loss)]
        let drawn = (volume as f64 * coefficient.max(0.0) * dice.unit()) as u64;
        let count = drawn.min(volume.saturating_sub(RESERVED_CELLS));

        for _ in 0..count {
            let item = SpecialItem::random(dice, weapons);
            let Some(cell) = self.random_free_coordinate(dice) else {
                break;
            };
            self.items.insert(cell, with_position(item, cell));
        }
    }

    /// Width (x axis).
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Length (y axis).
    #[must_use]
    pub const fn length(&self) -> u32 {
        self.length
    }

    /// Height (z axis).
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Number of cells.
    #[must_use]
    pub const fn volume(&self) -> u64 {
        self.width as u64 * self.length as u64 * self.height as u64
    }

    /// Check if a coordinate lies inside the grid.
    #[must_use]
    pub fn contains(&self, coord: Coord) -> bool {
        let inside = |v: i32, limit: u32| u32::try_from(v).is_ok_and(|v| v < limit);
        inside(coord.x, self.width) && inside(coord.y, self.length) && inside(coord.z, self.height)
    }

    /// The item at `coord`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OutOfBounds`] if `coord` is outside the grid.
    pub fn item_at(&self, coord: Coord) -> EngineResult<Option<&SpecialItem>> {
        if !self.contains(coord) {
            return Err(EngineError::OutOfBounds { coord });
        }
        Ok(self.items.get(&coord))
    }

    /// Put `item` on `cell`, replacing whatever was there.
    ///
    /// The item's own position is updated to `cell`. Returns the replaced item.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::OutOfBounds`] if `cell` is outside the grid.
    pub fn place_item(&mut self, cell: Coord, item: SpecialItem) -> EngineResult<Option<SpecialItem>> {
        if !self.contains(cell) {
            return Err(EngineError::OutOfBounds { coord: cell });
        }
        Ok(self.items.insert(cell, with_position(item, cell)))
    }

    /// Take the item at `cell` out of the arena.
    pub fn remove_item(&mut self, cell: Coord) -> Option<SpecialItem> {
        self.items.remove(&cell)
    }

    /// Number of items currently lying in the arena.
    #[must_use]
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Iterate over all occupied cells and their items.
    pub fn items(&self) -> impl Iterator<Item = (Coord, &SpecialItem)> {
        self.items.iter().map(|(coord, item)| (*coord, item))
    }

    /// Uniformly sample a cell holding no item.
    ///
    /// Returns `None` only when every cell is occupied.
    pub fn random_free_coordinate<D: Dice + ?Sized>(&self, dice: &mut D) -> Option<Coord> {
        self.random_free_coordinate_avoiding(dice, &[])
    }

    /// Uniformly sample a cell holding no item and not listed in `avoid`.
    ///
    /// Returns `None` when no such cell exists.
    pub fn random_free_coordinate_avoiding<D: Dice + ?Sized>(
        &self,
        dice: &mut D,
        avoid: &[Coord],
    ) -> Option<Coord> {
        let is_free = |cell: &Coord| !self.items.contains_key(cell) && !avoid.contains(cell);
        let blocked = self.items.len() as u64 + avoid.len() as u64;
        if blocked < self.volume() {
            for _ in 0..SAMPLE_ATTEMPTS {
                let cell = Coord::new(
                    axis(dice.below(self.width)),
                    axis(dice.below(self.length)),
                    axis(dice.below(self.height)),
                );
                if is_free(&cell) {
                    return Some(cell);
                }
            }
        }
        self.cells().find(is_free)
    }

    fn cells(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.width).flat_map(move |x| {
            (0..self.length).flat_map(move |y| {
                (0..self.height).map(move |z| Coord::new(axis(x), axis(y), axis(z)))
            })
        })
    }
}

impl fmt::Display for Arena {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Arena <{} x {} x {}> <Items {}>",
            self.width,
            self.length,
            self.height,
            self.items.len()
        )
    }
}

fn with_position(mut item: SpecialItem, cell: Coord) -> SpecialItem {
    item.set_position(Some(cell));
    item
}

/// Dimensions are capped at [`MAX_DIMENSION`], so every index fits an `i32`.
fn axis(index: u32) -> i32 {
    i32::try_from(index).unwrap_or(i32::MAX)
}
