use core::fmt;

use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};

use crate::*;

/// Chance that a standard cube is generated without a tool.
pub const EMPTY_TOOL_PROBABILITY: f64 = 0.25;

/// Special tool found inside a cube.
///
/// Tools are stateless: the same value can be applied any number of times.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tool {
    /// Stamps a cell and its four orthogonal neighbors.
    CrossStamp,
    /// Stamps every cell of a row.
    RowStamp,
    /// Stamps every cell of a column.
    ColumnStamp,
    /// Turns one cube upside down.
    Flip,
    /// Locks one cube in place for the rest of the game.
    Lock,
}

/// What kind of target a tool is aimed at.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TargetShape {
    Cell,
    Row,
    Column,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ToolTarget {
    Cell(Coord2),
    Row(Coord),
    Column(Coord),
}

impl ToolTarget {
    pub const fn shape(self) -> TargetShape {
        match self {
            Self::Cell(_) => TargetShape::Cell,
            Self::Row(_) => TargetShape::Row,
            Self::Column(_) => TargetShape::Column,
        }
    }

    fn validate(self) -> Result<Self> {
        let valid = match self {
            Self::Cell(coords) => in_bounds(coords),
            Self::Row(index) | Self::Column(index) => index < GRID_SIZE,
        };
        if valid {
            Ok(self)
        } else {
            Err(GameError::InvalidCoords)
        }
    }
}

impl fmt::Display for ToolTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Cell(coords) => write!(f, "{}", Location(coords)),
            Self::Row(row) => write!(f, "row R{}", u16::from(row) + 1),
            Self::Column(col) => write!(f, "column C{}", u16::from(col) + 1),
        }
    }
}

/// Result of applying a tool.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOutcome {
    pub tool: Tool,
    pub target: ToolTarget,
    /// Number of cells the tool acted on.
    pub cells: u8,
}

impl Tool {
    pub const ALL: [Tool; 5] = [
        Tool::CrossStamp,
        Tool::RowStamp,
        Tool::ColumnStamp,
        Tool::Flip,
        Tool::Lock,
    ];

    pub const fn name(self) -> &'static str {
        use Tool::*;
        match self {
            CrossStamp => "CrossStamp",
            RowStamp => "RowStamp",
            ColumnStamp => "ColumnStamp",
            Flip => "Flip",
            Lock => "Lock",
        }
    }

    pub const fn description(self) -> &'static str {
        use Tool::*;
        match self {
            CrossStamp => "Re-stamps 5 boxes (in a plus shape) to the target letter",
            RowStamp => "Re-stamps all boxes in an entire row to the target letter",
            ColumnStamp => "Re-stamps all boxes in an entire column to the target letter",
            Flip => "Flips a box upside down (swaps top and bottom sides)",
            Lock => "Replaces a box with an identical locked copy",
        }
    }

    pub const fn target_shape(self) -> TargetShape {
        use Tool::*;
        match self {
            CrossStamp | Flip | Lock => TargetShape::Cell,
            RowStamp => TargetShape::Row,
            ColumnStamp => TargetShape::Column,
        }
    }

    /// Picks one of the five tools with equal probability.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    /// Like [`Tool::random`], but a quarter of the time there is no tool at all.
    pub fn random_or_empty<R: Rng + ?Sized>(rng: &mut R) -> Option<Self> {
        if rng.random_bool(EMPTY_TOOL_PROBABILITY) {
            None
        } else {
            Some(Self::random(rng))
        }
    }

    /// Applies the tool to `grid`, stamping with `letter` where the tool stamps.
    ///
    /// Flip and lock fail when the targeted cube is already locked; those
    /// failures leave the grid untouched.
    pub fn apply(self, grid: &mut Grid, target: ToolTarget, letter: Letter) -> Result<ToolOutcome> {
        use Tool::*;

        if target.shape() != self.target_shape() {
            return Err(GameError::TargetShapeMismatch);
        }
        let target = target.validate()?;

        let cells = match (self, target) {
            (CrossStamp, ToolTarget::Cell(center)) => {
                let neighbors = Direction::ALL.map(|direction| direction.step(center));
                let mut cells = u8::from(grid.stamp_at(center, letter));
                for coords in neighbors.into_iter().flatten() {
                    cells += u8::from(grid.stamp_at(coords, letter));
                }
                cells
            }
            (RowStamp, ToolTarget::Row(row)) => (0..GRID_SIZE)
                .map(|col| u8::from(grid.stamp_at((row, col), letter)))
                .sum(),
            (ColumnStamp, ToolTarget::Column(col)) => (0..GRID_SIZE)
                .map(|row| u8::from(grid.stamp_at((row, col), letter)))
                .sum(),
            (Flip, ToolTarget::Cell(coords)) => {
                let cube = &mut grid[coords];
                if cube.is_locked() {
                    return Err(GameError::ImmovableTarget {
                        location: Location(coords),
                        action: CubeAction::Flip,
                    });
                }
                cube.flip();
                1
            }
            (Lock, ToolTarget::Cell(coords)) => {
                let cube = &mut grid[coords];
                if cube.is_locked() {
                    return Err(GameError::AlreadyLocked {
                        location: Location(coords),
                    });
                }
                cube.lock();
                1
            }
            _ => return Err(GameError::TargetShapeMismatch),
        };

        log::debug!("Applied {} at {} with letter {}", self.name(), target, letter);
        Ok(ToolOutcome {
            tool: self,
            target,
            cells,
        })
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
