use rand::prelude::*;

use super::*;

/// Share of cells that become standard cubes.
pub const STANDARD_PROBABILITY: f64 = 0.85;
/// Share of cells that become immutable-surface cubes; the rest are locked.
pub const IMMUTABLE_SURFACE_PROBABILITY: f64 = 0.10;

impl CubeKind {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let roll: f64 = rng.random();
        if roll < STANDARD_PROBABILITY {
            Self::Standard
        } else if roll < STANDARD_PROBABILITY + IMMUTABLE_SURFACE_PROBABILITY {
            Self::ImmutableSurface
        } else {
            Self::Locked
        }
    }
}

/// Generates a single cube: kind first, then faces, then its tool.
///
/// Standard cubes may come up empty, immutable-surface cubes always hold a tool
/// and locked cubes never do.
pub fn random_cube<R: Rng + ?Sized>(rng: &mut R) -> Cube {
    let kind = CubeKind::random(rng);
    let faces = random_faces(rng);
    match kind {
        CubeKind::Standard => Cube::standard(faces, Tool::random_or_empty(rng)),
        CubeKind::ImmutableSurface => Cube::immutable_surface(faces, Some(Tool::random(rng))),
        CubeKind::Locked => Cube::locked(faces),
    }
}

/// Purely random population from a fixed seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomGridGenerator {
    seed: u64,
}

impl RandomGridGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self) -> Grid {
        let mut rng = SmallRng::seed_from_u64(self.seed);
        let grid = Grid::populate(&mut rng);
        log::debug!(
            "Generated grid from seed {}, {} locked cubes",
            self.seed,
            grid.iter().filter(|cube| cube.is_locked()).count()
        );
        grid
    }
}
