//! Player-facing cell addresses.
//!
//! Locations are shown one-based as `R3-C5`. Parsing is lenient: case does not
//! matter and each axis may omit its `R`/`C` prefix, so `r3-c5` and `3-5` name
//! the same cell.

use core::fmt;
use core::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::*;

/// Zero-based board coordinates with a one-based `R#-C#` presentation.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location(pub Coord2);

impl Location {
    pub const fn coords(self) -> Coord2 {
        self.0
    }
}

impl From<Coord2> for Location {
    fn from(coords: Coord2) -> Self {
        Self(coords)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (row, col) = self.0;
        write!(f, "R{}-C{}", u16::from(row) + 1, u16::from(col) + 1)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ParseLocationError;

impl fmt::Display for ParseLocationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "expected a location such as R1-C1 with values from 1 to {GRID_SIZE}"
        )
    }
}

impl core::error::Error for ParseLocationError {}

impl FromStr for Location {
    type Err = ParseLocationError;

    fn from_str(s: &str) -> core::result::Result<Self, Self::Err> {
        parse_location(s).map(Self).ok_or(ParseLocationError)
    }
}

/// Parses an `R#-C#` location into zero-based coordinates.
///
/// Returns `None` for anything malformed or off the board; callers are expected
/// to ask again.
pub fn parse_location(input: &str) -> Option<Coord2> {
    let (row, col) = input.trim().split_once('-')?;
    let row = parse_line_index(row, 'R')?;
    let col = parse_line_index(col, 'C')?;
    Some((row, col))
}

/// Parses a single one-based row or column such as `R3`, `c5` or `7`.
pub fn parse_line_index(input: &str, prefix: char) -> Option<Coord> {
    let input = input.trim();
    let digits = input
        .strip_prefix(prefix.to_ascii_uppercase())
        .or_else(|| input.strip_prefix(prefix.to_ascii_lowercase()))
        .unwrap_or(input)
        .trim();

    let number: u16 = digits.parse().ok()?;
    if (1..=u16::from(GRID_SIZE)).contains(&number) {
        Coord::try_from(number - 1).ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn parses_prefixed_and_bare_locations() {
        assert_eq!(parse_location("R1-C1"), Some((0, 0)));
        assert_eq!(parse_location("r3-c5"), Some((2, 4)));
        assert_eq!(parse_location(" 8-8 "), Some((7, 7)));
        assert_eq!(parse_location("R2-4"), Some((1, 3)));
        assert_eq!(parse_location("2 - C4"), Some((1, 3)));
    }

    #[test]
    fn rejects_malformed_locations() {
        assert_eq!(parse_location(""), None);
        assert_eq!(parse_location("R1C1"), None);
        assert_eq!(parse_location("R0-C1"), None);
        assert_eq!(parse_location("R9-C1"), None);
        assert_eq!(parse_location("C1-R1"), None);
        assert_eq!(parse_location("R1-C1-C2"), None);
        assert_eq!(parse_location("Rx-C1"), None);
        assert_eq!(parse_location("-1-1"), None);
    }

    #[test]
    fn parses_line_indices() {
        assert_eq!(parse_line_index("R3", 'R'), Some(2));
        assert_eq!(parse_line_index("c8", 'C'), Some(7));
        assert_eq!(parse_line_index("1", 'C'), Some(0));
        assert_eq!(parse_line_index("R3", 'C'), None);
        assert_eq!(parse_line_index("9", 'R'), None);
    }

    #[test]
    fn location_round_trips_through_display() {
        let location = Location((2, 6));
        assert_eq!(location.to_string(), "R3-C7");
        assert_eq!("R3-C7".parse(), Ok(location));
        assert_eq!("R3".parse::<Location>(), Err(ParseLocationError));
    }
}
