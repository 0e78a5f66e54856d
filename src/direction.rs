use std::f32::consts::FRAC_PI_4;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the eight compass views a sprite is rendered from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    NW,
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
}

/// Traversal order for rendering and for sheet rows
pub const CANONICAL_ORDER: [Direction; 8] = [
    Direction::NW,
    Direction::N,
    Direction::NE,
    Direction::E,
    Direction::SE,
    Direction::S,
    Direction::SW,
    Direction::W,
];

pub fn canonical_order() -> [Direction; 8] {
    CANONICAL_ORDER
}

impl Direction {
    /// Number of 45° steps from the rig's zero angle
    fn step(self) -> u8 {
        match self {
            Direction::NW => 1,
            Direction::N => 2,
            Direction::NE => 3,
            Direction::E => 4,
            Direction::SE => 5,
            Direction::S => 6,
            Direction::SW => 7,
            Direction::W => 8,
        }
    }

    /// Rig rotation around the vertical axis, in radians
    pub fn angle(self) -> f32 {
        f32::from(self.step()) * FRAC_PI_4
    }

    pub fn degrees(self) -> u32 {
        u32::from(self.step()) * 45
    }

    /// Row of this direction in the final sheet
    pub fn row(self) -> usize {
        usize::from(self.step() - 1)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Direction::NW => "NW",
            Direction::N => "N",
            Direction::NE => "NE",
            Direction::E => "E",
            Direction::SE => "SE",
            Direction::S => "S",
            Direction::SW => "SW",
            Direction::W => "W",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CANONICAL_ORDER
            .iter()
            .copied()
            .find(|d| d.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown direction: {}", s))
    }
}
