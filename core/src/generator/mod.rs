use crate::*;
pub use random::*;

mod random;

pub trait GridGenerator {
    fn generate(self) -> Grid;
}

/// Builds a board where every cell holds a copy of the same cube.
///
/// Useful for setting up known positions.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct UniformGridGenerator {
    cube: Cube,
}

impl UniformGridGenerator {
    pub fn new(cube: Cube) -> Self {
        Self { cube }
    }

    /// Standard cubes without tools, showing `letter` on every face.
    pub fn standard(letter: Letter) -> Self {
        Self::new(Cube::standard([letter; 6], None))
    }
}

impl GridGenerator for UniformGridGenerator {
    fn generate(self) -> Grid {
        Grid::filled(self.cube)
    }
}
