#![no_std]

extern crate alloc;

use serde::{Deserialize, Serialize};

pub use cube::*;
pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use location::*;
pub use tool::*;
pub use types::*;

mod cube;
mod engine;
mod error;
mod generator;
mod grid;
mod location;
mod tool;
mod types;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameConfig {
    pub max_turns: u8,
    /// Only boxes rolled during the current turn may be opened.
    pub require_rolled_target: bool,
}

impl GameConfig {
    pub const DEFAULT_MAX_TURNS: u8 = 5;

    pub const fn new_unchecked(max_turns: u8, require_rolled_target: bool) -> Self {
        Self {
            max_turns,
            require_rolled_target,
        }
    }

    pub fn new(max_turns: u8) -> Self {
        Self::new_unchecked(max_turns.clamp(1, u8::MAX), true)
    }

    pub const fn with_require_rolled_target(mut self, require_rolled_target: bool) -> Self {
        self.require_rolled_target = require_rolled_target;
        self
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(Self::DEFAULT_MAX_TURNS, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_needs_at_least_one_turn() {
        assert_eq!(GameConfig::new(0).max_turns, 1);
        assert_eq!(GameConfig::new(9).max_turns, 9);
        assert_eq!(GameConfig::default().max_turns, 5);
        assert!(GameConfig::default().require_rolled_target);
    }
}
