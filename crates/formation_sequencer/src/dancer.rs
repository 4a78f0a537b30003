// SPDX-License-Identifier: MIT OR Apache-2.0
//! Dancer definitions.

use serde::{Deserialize, Serialize};

/// Unique identifier for a dancer
///
/// Handed out by the [`EntityStore`](crate::store::EntityStore) counter and
/// never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DancerId(pub u64);

impl DancerId {
    /// Get the raw ID value
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DancerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A point on the stage
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal stage coordinate
    pub x: f64,
    /// Vertical stage coordinate
    pub y: f64,
}

impl Position {
    /// Create a new position
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Round both coordinates to the nearest multiple of `cell`
    pub fn snapped(self, cell: f64) -> Self {
        if !(cell > 0.0 && cell.is_finite()) {
            return self;
        }
        Self {
            x: (self.x / cell).round() * cell,
            y: (self.y / cell).round() * cell,
        }
    }
}

impl From<(f64, f64)> for Position {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// A performer on the stage
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dancer {
    /// Unique dancer ID
    pub id: DancerId,
    /// Display name
    pub name: String,
    /// Hex colour, e.g. `#e74c3c`
    pub color: String,
    /// Current horizontal coordinate
    pub x: f64,
    /// Current vertical coordinate
    pub y: f64,
}

impl Dancer {
    /// Create a new dancer
    pub fn new(
        id: DancerId,
        name: impl Into<String>,
        color: impl Into<String>,
        position: Position,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            color: color.into(),
            x: position.x,
            y: position.y,
        }
    }

    /// Current position
    pub fn position(&self) -> Position {
        Position::new(self.x, self.y)
    }

    /// Move the dancer
    pub fn set_position(&mut self, position: Position) {
        self.x = position.x;
        self.y = position.y;
    }
}

/// The three dancers every new show starts with
pub fn starter_cast() -> Vec<Dancer> {
    let bright = crate::palette::BRIGHT.colors;
    vec![
        Dancer::new(DancerId(1), "Alex", bright[0], Position::new(150.0, 200.0)),
        Dancer::new(DancerId(2), "Jamie", bright[1], Position::new(300.0, 200.0)),
        Dancer::new(DancerId(3), "Sam", bright[2], Position::new(225.0, 300.0)),
    ]
}
