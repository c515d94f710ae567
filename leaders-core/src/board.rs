//! Hex board geometry with axial coordinates

use serde::{Deserialize, Serialize};

/// Board radius (distance from center to edge)
pub const BOARD_RADIUS: i8 = 3;

/// Number of cells on a radius-3 board
pub const CELL_COUNT: usize = 37;

/// Axial hex coordinates
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Hex {
    pub q: i8,
    pub r: i8,
}

impl Hex {
    pub const fn new(q: i8, r: i8) -> Self {
        Self { q, r }
    }

    /// Third cube coordinate
    pub fn s(&self) -> i8 {
        -self.q - self.r
    }

    /// Check if this hex is on the board
    pub fn is_valid(&self) -> bool {
        // Widened so i8::MIN cannot overflow
        let (q, r, radius) = (self.q as i16, self.r as i16, BOARD_RADIUS as i16);
        q.abs() <= radius && r.abs() <= radius && (q + r).abs() <= radius
    }

    /// Distance from center (0,0)
    pub fn distance_to_center(&self) -> i8 {
        (self.q.abs() + self.r.abs() + (self.q + self.r).abs()) / 2
    }

    /// Distance between two hexes
    pub fn distance_to(&self, other: Hex) -> i8 {
        let dq = (self.q - other.q).abs();
        let dr = (self.r - other.r).abs();
        let ds = ((self.q + self.r) - (other.q + other.r)).abs();
        (dq + dr + ds) / 2
    }

    /// Same axis on one of the three hex axes
    pub fn is_aligned(&self, other: Hex) -> bool {
        self.q == other.q || self.r == other.r || self.q + self.r == other.q + other.r
    }

    /// Get neighbor in direction (0-5)
    pub fn neighbor(&self, direction: u8) -> Hex {
        self.offset(direction, 1)
    }

    /// Hex `steps` cells away in direction (0-5)
    pub fn offset(&self, direction: u8, steps: i8) -> Hex {
        let (dq, dr) = DIRECTIONS[direction as usize % 6];
        Hex::new(self.q + dq * steps, self.r + dr * steps)
    }

    /// All six neighbors, including off-board ones
    pub fn neighbors(&self) -> [Hex; 6] {
        let mut out = [*self; 6];
        for (dir, slot) in out.iter_mut().enumerate() {
            *slot = self.neighbor(dir as u8);
        }
        out
    }

    /// Neighbors that lie on the board
    pub fn valid_neighbors(&self) -> impl Iterator<Item = Hex> {
        self.neighbors().into_iter().filter(|h| h.is_valid())
    }

    /// Direction index from `self` toward `other` when the two are aligned
    pub fn direction_to(&self, other: Hex) -> Option<u8> {
        if *self == other || !self.is_aligned(other) {
            return None;
        }
        let dist = self.distance_to(other);
        let dq = (other.q - self.q) / dist;
        let dr = (other.r - self.r) / dist;
        DIRECTIONS
            .iter()
            .position(|&d| d == (dq, dr))
            .map(|i| i as u8)
    }

    /// On-board cells walking away from `self` in one direction (exclusive of `self`)
    pub fn ray(&self, direction: u8) -> impl Iterator<Item = Hex> {
        let origin = *self;
        (1..=2 * BOARD_RADIUS)
            .map(move |step| origin.offset(direction, step))
            .take_while(|h| h.is_valid())
    }

    /// Cells strictly between two aligned hexes
    pub fn between(&self, other: Hex) -> Vec<Hex> {
        match self.direction_to(other) {
            Some(dir) => (1..self.distance_to(other))
                .map(|step| self.offset(dir, step))
                .collect(),
            None => Vec::new(),
        }
    }
}

/// Direction vectors in axial coordinates (dq, dr)
/// Index: 0=N, 1=NE, 2=SE, 3=S, 4=SW, 5=NW
pub const DIRECTIONS: [(i8, i8); 6] = [
    (0, -1),  // N
    (1, -1),  // NE
    (1, 0),   // SE
    (0, 1),   // S
    (-1, 1),  // SW
    (-1, 0),  // NW
];

/// Opposite direction index
pub fn opposite(direction: u8) -> u8 {
    (direction + 3) % 6
}

/// Every valid cell, row by row
pub fn all_cells() -> impl Iterator<Item = Hex> {
    (-BOARD_RADIUS..=BOARD_RADIUS).flat_map(|r| {
        (-BOARD_RADIUS..=BOARD_RADIUS)
            .map(move |q| Hex::new(q, r))
            .filter(|h| h.is_valid())
    })
}
