use core::fmt;
use core::str::FromStr;

use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};

/// Single coordinate axis used for rows, columns, and positions.
pub type Coord = u8;

/// Two-dimensional coordinates `(row, col)`, both zero-based.
pub type Coord2 = (Coord, Coord);

/// Width and height of the board.
pub const GRID_SIZE: Coord = 8;

/// Number of cells on the board.
pub const CELL_COUNT: usize = (GRID_SIZE as usize) * (GRID_SIZE as usize);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn in_bounds((row, col): Coord2) -> bool {
    row < GRID_SIZE && col < GRID_SIZE
}

/// Applies `delta` to `coords`, returning a value only when it remains on the board.
fn apply_delta(coords: Coord2, delta: (i8, i8)) -> Option<Coord2> {
    let (row, col) = coords;
    let (dr, dc) = delta;

    let next_row = row.checked_add_signed(dr)?;
    let next_col = col.checked_add_signed(dc)?;
    let next = (next_row, next_col);

    in_bounds(next).then_some(next)
}

/// Symbol printed on a cube face.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    A,
    B,
    C,
    D,
    E,
    F,
    G,
    H,
}

impl Letter {
    pub const ALL: [Letter; 8] = [
        Letter::A,
        Letter::B,
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::H,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }

    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.random_range(0..Self::ALL.len())]
    }

    pub const fn as_char(self) -> char {
        match self {
            Letter::A => 'A',
            Letter::B => 'B',
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::H => 'H',
        }
    }
}

impl fmt::Display for Letter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseLetterError;

impl fmt::Display for ParseLetterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("expected a single letter from A to H")
    }
}

impl core::error::Error for ParseLetterError {}

impl FromStr for Letter {
    type Err = ParseLetterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.trim().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Self::ALL
                .into_iter()
                .find(|letter| letter.as_char() == c.to_ascii_uppercase())
                .ok_or(ParseLetterError),
            _ => Err(ParseLetterError),
        }
    }
}

/// One of the four directions a cube can be rolled in.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Up,
        Direction::Down,
        Direction::Left,
        Direction::Right,
    ];

    /// `(row, col)` displacement of one step in this direction.
    pub const fn delta(self) -> (i8, i8) {
        use Direction::*;
        match self {
            Up => (-1, 0),
            Down => (1, 0),
            Left => (0, -1),
            Right => (0, 1),
        }
    }

    pub const fn display_name(self) -> &'static str {
        use Direction::*;
        match self {
            Up => "upwards",
            Down => "downwards",
            Left => "left",
            Right => "right",
        }
    }

    pub const fn opposite(self) -> Self {
        use Direction::*;
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }

    pub const fn is_vertical(self) -> bool {
        matches!(self, Self::Up | Self::Down)
    }

    /// Next coordinates in this direction, `None` when that would leave the board.
    pub fn step(self, coords: Coord2) -> Option<Coord2> {
        apply_delta(coords, self.delta())
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_stays_on_board() {
        assert_eq!(Direction::Up.step((0, 3)), None);
        assert_eq!(Direction::Left.step((4, 0)), None);
        assert_eq!(Direction::Down.step((7, 7)), None);
        assert_eq!(Direction::Right.step((2, 7)), None);
        assert_eq!(Direction::Down.step((0, 3)), Some((1, 3)));
        assert_eq!(Direction::Right.step((2, 6)), Some((2, 7)));
    }

    #[test]
    fn opposite_directions_cancel_out() {
        for direction in Direction::ALL {
            let (dr, dc) = direction.delta();
            let (or, oc) = direction.opposite().delta();
            assert_eq!((dr + or, dc + oc), (0, 0));
            assert_eq!(direction.is_horizontal(), !direction.is_vertical());
        }
    }

    #[test]
    fn letters_parse_case_insensitively() {
        assert_eq!("a".parse::<Letter>(), Ok(Letter::A));
        assert_eq!(" H ".parse::<Letter>(), Ok(Letter::H));
        assert_eq!("I".parse::<Letter>(), Err(ParseLetterError));
        assert_eq!("AB".parse::<Letter>(), Err(ParseLetterError));
        assert_eq!("".parse::<Letter>(), Err(ParseLetterError));
    }
}
