use alloc::format;
use alloc::string::String;
use core::fmt;
use core::ops::Index;

use rand::{Rng, RngExt};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// A letter may appear on at most this many faces of a freshly generated cube.
pub const MAX_LETTER_REPEATS: u8 = 2;

/// Semantic face positions, in storage order.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Face {
    Top,
    Bottom,
    Front,
    Back,
    Left,
    Right,
}

impl Face {
    pub const ALL: [Face; 6] = [
        Face::Top,
        Face::Bottom,
        Face::Front,
        Face::Back,
        Face::Left,
        Face::Right,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

pub type Faces = [Letter; 6];

/// Generates six labels with no letter used more than twice.
pub fn random_faces<R: Rng + ?Sized>(rng: &mut R) -> Faces {
    let mut counts = [0u8; Letter::ALL.len()];
    let mut faces = [Letter::A; 6];

    for face in &mut faces {
        let available: SmallVec<[Letter; 8]> = Letter::ALL
            .into_iter()
            .filter(|letter| counts[letter.index()] < MAX_LETTER_REPEATS)
            .collect();
        let letter = available[rng.random_range(0..available.len())];
        counts[letter.index()] += 1;
        *face = letter;
    }

    faces
}

/// Capability variant of a cube.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CubeKind {
    /// Rolls, flips and takes stamps.
    Standard,
    /// Rolls and flips, silently ignores stamps.
    ImmutableSurface,
    /// Never moves and never holds a tool; still takes stamps.
    Locked,
}

impl CubeKind {
    pub const fn can_rotate(self) -> bool {
        !matches!(self, Self::Locked)
    }

    pub const fn accepts_stamp(self) -> bool {
        !matches!(self, Self::ImmutableSurface)
    }

    pub const fn tag(self) -> char {
        use CubeKind::*;
        match self {
            Standard => 'S',
            ImmutableSurface => 'I',
            Locked => 'L',
        }
    }
}

/// A single box on the board.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cube {
    kind: CubeKind,
    faces: Faces,
    tool: Option<Tool>,
    opened: bool,
    rolled_this_turn: bool,
}

impl Cube {
    /// Locked cubes drop `tool` and start out opened.
    pub fn new(kind: CubeKind, faces: Faces, tool: Option<Tool>) -> Self {
        let locked = matches!(kind, CubeKind::Locked);
        Self {
            kind,
            faces,
            tool: if locked { None } else { tool },
            opened: locked,
            rolled_this_turn: false,
        }
    }

    pub fn standard(faces: Faces, tool: Option<Tool>) -> Self {
        Self::new(CubeKind::Standard, faces, tool)
    }

    pub fn immutable_surface(faces: Faces, tool: Option<Tool>) -> Self {
        Self::new(CubeKind::ImmutableSurface, faces, tool)
    }

    pub fn locked(faces: Faces) -> Self {
        Self::new(CubeKind::Locked, faces, None)
    }

    pub fn kind(&self) -> CubeKind {
        self.kind
    }

    pub fn faces(&self) -> Faces {
        self.faces
    }

    pub fn face(&self, face: Face) -> Letter {
        self.faces[face.index()]
    }

    pub fn top(&self) -> Letter {
        self.face(Face::Top)
    }

    pub fn bottom(&self) -> Letter {
        self.face(Face::Bottom)
    }

    /// Tool still sealed inside, if any.
    pub fn tool(&self) -> Option<Tool> {
        self.tool
    }

    pub fn is_empty(&self) -> bool {
        self.tool.is_none()
    }

    pub fn is_opened(&self) -> bool {
        self.opened
    }

    pub fn is_locked(&self) -> bool {
        matches!(self.kind, CubeKind::Locked)
    }

    pub fn was_rolled_this_turn(&self) -> bool {
        self.rolled_this_turn
    }

    pub fn can_rotate(&self) -> bool {
        self.kind.can_rotate()
    }

    /// Rolls the cube a quarter turn, cycling the four faces around that axis.
    ///
    /// Locked cubes stay put and are not marked as rolled.
    pub fn rotate(&mut self, direction: Direction) {
        if !self.can_rotate() {
            return;
        }

        let cycle = roll_cycle(direction);
        let mut letters = cycle.map(|face| self.face(face));
        letters.rotate_right(1);
        for (face, letter) in cycle.into_iter().zip(letters) {
            self.faces[face.index()] = letter;
        }
        self.rolled_this_turn = true;
    }

    /// Turns the cube upside down, swapping top and bottom.
    pub fn flip(&mut self) {
        if self.can_rotate() {
            self.faces.swap(Face::Top.index(), Face::Bottom.index());
        }
    }

    /// Prints `letter` on the top face, unless the surface is immutable.
    pub fn stamp_top(&mut self, letter: Letter) {
        if self.kind.accepts_stamp() {
            self.faces[Face::Top.index()] = letter;
        }
    }

    /// Opens the cube, handing out its tool at most once.
    pub fn open(&mut self) -> Option<Tool> {
        self.opened = true;
        self.tool.take()
    }

    pub(crate) fn reset_rolled(&mut self) {
        self.rolled_this_turn = false;
    }

    /// Turns this cube into a locked one in place, keeping its faces.
    pub(crate) fn lock(&mut self) {
        self.kind = CubeKind::Locked;
        self.tool = None;
        self.opened = true;
    }

    /// Unfolded view of all six faces.
    pub fn render_cube(&self) -> String {
        use Face::*;

        format!(
            "    -----\n\
             \x20   | {} |\n\
             -------------\n\
             | {} | {} | {} |\n\
             -------------\n\
             \x20   | {} |\n\
             \x20   -----\n\
             \x20   | {} |\n\
             \x20   -----",
            self.face(Back),
            self.face(Left),
            self.face(Top),
            self.face(Right),
            self.face(Front),
            self.face(Bottom),
        )
    }
}

impl Index<Face> for Cube {
    type Output = Letter;

    fn index(&self, face: Face) -> &Self::Output {
        &self.faces[face.index()]
    }
}

/// Grid cell summary: kind tag, top label and opened status, e.g. `S-A-C`.
impl fmt::Display for Cube {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = if self.opened { 'O' } else { 'C' };
        write!(f, "{}-{}-{}", self.kind.tag(), self.top(), status)
    }
}

/// Faces visited by a roll, each moving onto the next one (the last wraps around).
const fn roll_cycle(direction: Direction) -> [Face; 4] {
    use Face::*;
    match direction {
        Direction::Right => [Left, Top, Right, Bottom],
        Direction::Left => [Right, Top, Left, Bottom],
        Direction::Down => [Front, Top, Back, Bottom],
        Direction::Up => [Back, Top, Front, Bottom],
    }
}
