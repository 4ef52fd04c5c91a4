use core::fmt;
use core::ops::{Index, IndexMut};

use ndarray::Array2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// Count type used for label tallies.
pub type CellCount = u16;

/// Directions a roll may take from an edge cell, inward only.
pub type AvailableDirections = SmallVec<[Direction; 2]>;

const LAST: Coord = GRID_SIZE - 1;
const CELL_WIDTH: usize = 8;
const RULE_WIDTH: usize = 3 + CELL_WIDTH * GRID_SIZE as usize + 1;

/// Result of a chained roll.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RollOutcome {
    pub start: Coord2,
    pub direction: Direction,
    /// How many cubes turned over.
    pub rolled: u8,
    /// Locked cube that halted the chain, `None` when it ran off the board.
    pub stopped_by: Option<Coord2>,
}

/// The 8x8 board. Every cell owns exactly one cube.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    cubes: Array2<Cube>,
}

impl Grid {
    pub fn from_fn(mut f: impl FnMut(Coord2) -> Cube) -> Self {
        let dim = (GRID_SIZE, GRID_SIZE).to_nd_index();
        let cubes = Array2::from_shape_fn(dim, |(row, col)| {
            // both indices are below GRID_SIZE
            f((row as Coord, col as Coord))
        });
        Self { cubes }
    }

    pub fn filled(cube: Cube) -> Self {
        Self::from_fn(|_| cube)
    }

    /// Fills every cell with an independently generated random cube.
    pub fn populate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::from_fn(|_| random_cube(rng))
    }

    pub fn validate_coords(coords: Coord2) -> Result<Coord2> {
        if in_bounds(coords) {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn cube(&self, coords: Coord2) -> Option<&Cube> {
        in_bounds(coords).then(|| &self[coords])
    }

    pub fn cube_mut(&mut self, coords: Coord2) -> Option<&mut Cube> {
        if in_bounds(coords) {
            Some(&mut self[coords])
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Cube> {
        self.cubes.iter()
    }

    /// All coordinates in row-major order.
    pub fn iter_coords() -> impl Iterator<Item = Coord2> {
        (0..GRID_SIZE).flat_map(|row| (0..GRID_SIZE).map(move |col| (row, col)))
    }

    pub const fn is_edge((row, col): Coord2) -> bool {
        row == 0 || row == LAST || col == 0 || col == LAST
    }

    pub const fn is_corner((row, col): Coord2) -> bool {
        (row == 0 || row == LAST) && (col == 0 || col == LAST)
    }

    /// Inward directions from `coords`: two at a corner, one on any other edge
    /// cell and none in the interior.
    pub fn available_directions(coords: Coord2) -> AvailableDirections {
        let (row, col) = coords;
        let mut directions = AvailableDirections::new();

        if !in_bounds(coords) {
            return directions;
        }
        if col == 0 {
            directions.push(Direction::Right);
        } else if col == LAST {
            directions.push(Direction::Left);
        }
        if row == 0 {
            directions.push(Direction::Down);
        } else if row == LAST {
            directions.push(Direction::Up);
        }

        directions
    }

    /// Rolls the cube at `start` and every cube after it in `direction`, until
    /// a locked cube or the edge of the board stops the chain.
    ///
    /// The locked cube itself is left untouched.
    pub fn propagate_roll(&mut self, start: Coord2, direction: Direction) -> RollOutcome {
        let mut outcome = RollOutcome {
            start,
            direction,
            rolled: 0,
            stopped_by: None,
        };

        let mut current = in_bounds(start).then_some(start);
        while let Some(coords) = current {
            let cube = &mut self[coords];
            if !cube.can_rotate() {
                log::trace!("Roll stopped by locked cube at {:?}", coords);
                outcome.stopped_by = Some(coords);
                break;
            }

            cube.rotate(direction);
            outcome.rolled += 1;
            log::trace!("Rolled cube at {:?} {}, top is now {}", coords, direction, cube.top());

            current = direction.step(coords);
        }

        log::debug!(
            "Rolled {} cubes {} from {:?}, stopped by {:?}",
            outcome.rolled,
            direction,
            start,
            outcome.stopped_by
        );
        outcome
    }

    pub fn reset_turn_flags(&mut self) {
        for cube in self.cubes.iter_mut() {
            cube.reset_rolled();
        }
    }

    /// Number of cubes showing `target` on top.
    pub fn count_label(&self, target: Letter) -> CellCount {
        // at most 64 cells
        self.cubes.iter().filter(|cube| cube.top() == target).count() as CellCount
    }

    pub fn all_edges_locked(&self) -> bool {
        Self::iter_coords()
            .filter(|&coords| Self::is_edge(coords))
            .all(|coords| self[coords].is_locked())
    }

    /// Stamps the top of the cube at `coords`; off-board coordinates are ignored.
    ///
    /// Returns whether a cube was there to be stamped.
    pub(crate) fn stamp_at(&mut self, coords: Coord2, letter: Letter) -> bool {
        match self.cube_mut(coords) {
            Some(cube) => {
                cube.stamp_top(letter);
                true
            }
            None => false,
        }
    }

    pub fn render(&self) -> alloc::string::String {
        use alloc::string::ToString;
        self.to_string()
    }
}

impl Index<Coord2> for Grid {
    type Output = Cube;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.cubes[coords.to_nd_index()]
    }
}

impl IndexMut<Coord2> for Grid {
    fn index_mut(&mut self, coords: Coord2) -> &mut Self::Output {
        &mut self.cubes[coords.to_nd_index()]
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("   ")?;
        for col in 0..GRID_SIZE {
            write!(f, "   C{:<4}", col + 1)?;
        }
        writeln!(f)?;
        writeln!(f, "{:-<1$}", "", RULE_WIDTH)?;

        for row in 0..GRID_SIZE {
            write!(f, "R{} ", row + 1)?;
            for col in 0..GRID_SIZE {
                write!(f, "| {} ", self[(row, col)])?;
            }
            writeln!(f, "|")?;
            writeln!(f, "{:-<1$}", "", RULE_WIDTH)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FACES: Faces = [
        Letter::A,
        Letter::B,
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
    ];

    fn standard_grid() -> Grid {
        Grid::filled(Cube::standard(FACES, None))
    }

    #[test]
    fn edges_and_corners() {
        assert!(Grid::is_edge((0, 4)));
        assert!(Grid::is_edge((4, 7)));
        assert!(!Grid::is_edge((3, 3)));
        assert!(Grid::is_corner((7, 0)));
        assert!(!Grid::is_corner((0, 4)));
    }

    #[test]
    fn corners_offer_two_inward_directions() {
        use Direction::*;

        assert_eq!(Grid::available_directions((0, 0)).as_slice(), &[Right, Down]);
        assert_eq!(Grid::available_directions((0, 7)).as_slice(), &[Left, Down]);
        assert_eq!(Grid::available_directions((7, 0)).as_slice(), &[Right, Up]);
        assert_eq!(Grid::available_directions((7, 7)).as_slice(), &[Left, Up]);
    }

    #[test]
    fn edges_offer_one_direction_and_interior_none() {
        use Direction::*;

        assert_eq!(Grid::available_directions((0, 3)).as_slice(), &[Down]);
        assert_eq!(Grid::available_directions((7, 3)).as_slice(), &[Up]);
        assert_eq!(Grid::available_directions((3, 0)).as_slice(), &[Right]);
        assert_eq!(Grid::available_directions((3, 7)).as_slice(), &[Left]);
        assert!(Grid::available_directions((3, 3)).is_empty());
        assert!(Grid::available_directions((8, 0)).is_empty());
    }

    #[test]
    fn roll_runs_to_the_far_edge() {
        let mut grid = standard_grid();
        let outcome = grid.propagate_roll((0, 2), Direction::Down);

        assert_eq!(outcome.rolled, 8);
        assert_eq!(outcome.stopped_by, None);
        assert!((0..GRID_SIZE).all(|row| grid[(row, 2)].was_rolled_this_turn()));
        assert!((0..GRID_SIZE).all(|row| grid[(row, 2)].top() == Letter::C));
        assert!(!grid[(0, 1)].was_rolled_this_turn());
    }

    #[test]
    fn roll_stops_before_locked_cube() {
        let mut grid = standard_grid();
        grid[(4, 5)] = Cube::locked(FACES);

        let outcome = grid.propagate_roll((4, 7), Direction::Left);

        assert_eq!(outcome.rolled, 2);
        assert_eq!(outcome.stopped_by, Some((4, 5)));
        assert!(grid[(4, 7)].was_rolled_this_turn());
        assert!(grid[(4, 6)].was_rolled_this_turn());
        assert_eq!(grid[(4, 5)].faces(), FACES);
        assert_eq!(grid[(4, 4)].faces(), FACES);
    }

    #[test]
    fn roll_from_locked_start_moves_nothing() {
        let mut grid = standard_grid();
        grid[(0, 3)] = Cube::locked(FACES);

        let outcome = grid.propagate_roll((0, 3), Direction::Down);

        assert_eq!(outcome.rolled, 0);
        assert_eq!(outcome.stopped_by, Some((0, 3)));
        assert_eq!(grid, {
            let mut expected = standard_grid();
            expected[(0, 3)] = Cube::locked(FACES);
            expected
        });
    }

    #[test]
    fn roll_from_off_board_is_a_no_op() {
        let mut grid = standard_grid();
        let outcome = grid.propagate_roll((8, 0), Direction::Up);
        assert_eq!(outcome.rolled, 0);
        assert_eq!(grid, standard_grid());
    }

    #[test]
    fn reset_turn_flags_clears_every_cube() {
        let mut grid = standard_grid();
        grid.propagate_roll((7, 0), Direction::Right);
        grid.reset_turn_flags();
        assert!(grid.iter().all(|cube| !cube.was_rolled_this_turn()));
    }

    #[test]
    fn all_edges_locked_only_looks_at_edges() {
        let mut grid = Grid::filled(Cube::locked(FACES));
        grid[(3, 4)] = Cube::standard(FACES, None);
        assert!(grid.all_edges_locked());

        grid[(7, 5)] = Cube::immutable_surface(FACES, None);
        assert!(!grid.all_edges_locked());
    }

    #[test]
    fn stamp_at_ignores_off_board_cells() {
        let mut grid = standard_grid();
        assert!(!grid.stamp_at((0, 8), Letter::H));
        assert!(grid.stamp_at((0, 7), Letter::H));
        assert_eq!(grid.count_label(Letter::H), 1);
    }

    #[test]
    fn render_shows_every_cell() {
        let mut grid = standard_grid();
        grid[(0, 0)] = Cube::locked(FACES);
        let rendered = grid.render();
        let lines: alloc::vec::Vec<&str> = rendered.lines().collect();

        assert_eq!(lines.len(), 2 + 2 * usize::from(GRID_SIZE));
        assert!(lines[0].contains("C1") && lines[0].contains("C8"));
        assert!(lines[2].starts_with("R1 | L-A-O | S-A-C |"));
        assert_eq!(lines[1].len(), RULE_WIDTH);
    }
}
