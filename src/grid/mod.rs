//! # Grid Environment Contract
//!
//! The boundary between the grid-world simulation and the encoders. The
//! simulation itself (layout, movement, termination, rendering) lives
//! outside this crate; it only has to implement [`GridState`] and
//! [`GridEnvironment`] and emit [`RawObservation`]s.
//!
//! ## Raw Observation Layout
//!
//! ```text
//! image[i, j] = [object_id, color_id, state_id]
//!       │  └── row of the agent's view (0 = farthest ahead)
//!       └───── column of the agent's view
//! ```

mod symbols;

pub use symbols::{SymbolTable, SymbolTables, COLOR_NAMES, OBJECT_NAMES, STATE_NAMES};

use crate::{Result, SspError};
use serde::{Deserialize, Serialize};

// ============================================================================
// Heading
// ============================================================================

/// Discrete agent heading
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Right = 0,
    Down = 1,
    Left = 2,
    Up = 3,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Self::Right, Self::Down, Self::Left, Self::Up];

    /// Unit heading vector in grid coordinates (y grows downward)
    pub fn to_vec(self) -> (i32, i32) {
        match self {
            Self::Right => (1, 0),
            Self::Down => (0, 1),
            Self::Left => (-1, 0),
            Self::Up => (0, -1),
        }
    }

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for Direction {
    type Error = SspError;

    fn try_from(value: u8) -> Result<Self> {
        Self::ALL
            .get(usize::from(value))
            .copied()
            .ok_or_else(|| SspError::Configuration(format!("Invalid direction index {}", value)))
    }
}

// ============================================================================
// Observations
// ============================================================================

/// `W × H` grid of `[object, color, state]` ids
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservationGrid {
    width: usize,
    height: usize,
    cells: Vec<[u8; 3]>,
}

impl ObservationGrid {
    /// Wrap cells stored column-major (`cells[i * height + j]`)
    pub fn new(width: usize, height: usize, cells: Vec<[u8; 3]>) -> Result<Self> {
        if cells.len() != width * height {
            return Err(SspError::DimensionMismatch {
                expected: width * height,
                actual: cells.len(),
            });
        }
        Ok(Self {
            width,
            height,
            cells,
        })
    }

    /// Every cell set to `cell`
    pub fn filled(width: usize, height: usize, cell: [u8; 3]) -> Self {
        Self {
            width,
            height,
            cells: vec![cell; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn get(&self, i: usize, j: usize) -> Option<[u8; 3]> {
        if i < self.width && j < self.height {
            Some(self.cells[i * self.height + j])
        } else {
            None
        }
    }

    pub fn set(&mut self, i: usize, j: usize, cell: [u8; 3]) -> Result<()> {
        if i >= self.width || j >= self.height {
            return Err(SspError::Configuration(format!(
                "Cell ({}, {}) outside {}x{} grid",
                i, j, self.width, self.height
            )));
        }
        self.cells[i * self.height + j] = cell;
        Ok(())
    }

    /// `(i, j, cell)` in column-major order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, [u8; 3])> + '_ {
        let height = self.height;
        self.cells
            .iter()
            .enumerate()
            .map(move |(k, &cell)| (k / height, k % height, cell))
    }
}

/// One observation as emitted by the environment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawObservation {
    pub image: ObservationGrid,
    pub mission: String,
}

/// Result of one environment step
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    pub observation: RawObservation,
    pub reward: f64,
    pub done: bool,
}

// ============================================================================
// Environment Traits
// ============================================================================

/// Read-only view of the simulation state the encoders need
pub trait GridState {
    fn width(&self) -> usize;

    fn height(&self) -> usize;

    /// Absolute agent cell
    fn agent_pos(&self) -> (usize, usize);

    fn agent_dir(&self) -> Direction;

    /// Object id at an absolute cell; `None` for empty or out-of-range cells
    fn object_at(&self, x: usize, y: usize) -> Option<u8>;
}

/// A steppable grid world
pub trait GridEnvironment: GridState {
    type Action;

    fn reset(&mut self) -> RawObservation;

    fn step(&mut self, action: Self::Action) -> StepOutcome;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_direction_vectors() {
        assert_eq!(Direction::Right.to_vec(), (1, 0));
        assert_eq!(Direction::Down.to_vec(), (0, 1));
        assert_eq!(Direction::Left.to_vec(), (-1, 0));
        assert_eq!(Direction::Up.to_vec(), (0, -1));
    }

    #[test]
    fn test_direction_from_index() {
        for d in Direction::ALL {
            assert_eq!(Direction::try_from(d.index()).unwrap(), d);
        }
        assert!(Direction::try_from(4).is_err());
    }

    #[test]
    fn test_grid_layout() {
        let mut grid = ObservationGrid::filled(3, 2, [1, 0, 0]);
        grid.set(2, 1, [5, 4, 0]).unwrap();

        assert_eq!(grid.get(2, 1), Some([5, 4, 0]));
        assert_eq!(grid.get(0, 0), Some([1, 0, 0]));
        assert_eq!(grid.get(3, 0), None);
        assert!(grid.set(0, 2, [2, 0, 0]).is_err());

        let keys: Vec<_> = grid.iter().filter(|(_, _, c)| c[0] == 5).collect();
        assert_eq!(keys, vec![(2, 1, [5, 4, 0])]);
    }

    #[test]
    fn test_grid_new_checks_length() {
        assert!(ObservationGrid::new(2, 2, vec![[0, 0, 0]; 3]).is_err());
        assert!(ObservationGrid::new(2, 2, vec![[0, 0, 0]; 4]).is_ok());
    }
}
