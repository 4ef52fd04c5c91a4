use rand::prelude::*;
use serde::{Deserialize, Serialize};

use crate::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameOutcome {
    /// Every turn was played.
    Succeeded,
    /// The game stopped early because no edge cube could roll.
    Failed,
}

/// Valid transitions:
/// - TurnComplete -> AwaitingRoll
/// - TurnComplete -> GameOver(Failed)
/// - AwaitingRoll -> AwaitingToolUse
/// - AwaitingToolUse -> AwaitingToolUse (once the box is opened)
/// - AwaitingRoll | AwaitingToolUse -> TurnComplete | GameOver(Succeeded)
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EngineState {
    /// Between turns, including before the first one.
    TurnComplete,
    /// Stage one: waiting for an edge cube to roll.
    AwaitingRoll,
    /// Stage two: `tool` is `None` until a box has been opened.
    AwaitingToolUse { tool: Option<Tool> },
    GameOver(GameOutcome),
}

impl EngineState {
    pub const fn is_finished(self) -> bool {
        matches!(self, Self::GameOver(_))
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::TurnComplete
    }
}

/// Final result, available once the game is over.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameReport {
    pub outcome: GameOutcome,
    pub target: Letter,
    pub score: CellCount,
    pub turns_played: u8,
}

/// Source of player decisions for [`TurnEngine::play_turn`].
///
/// Every choice returns `None` once the source has nothing more to give, which
/// aborts the turn with [`GameError::InputExhausted`]. The notification hooks
/// default to doing nothing.
pub trait TurnInput {
    /// Edge cell to start stage one from.
    fn roll_location(&mut self, engine: &TurnEngine) -> Option<Coord2>;

    /// Which way to roll a corner cube, one of `options`.
    fn corner_direction(&mut self, coords: Coord2, options: [Direction; 2]) -> Option<Direction>;

    /// Cell to open in stage two.
    fn open_location(&mut self, engine: &TurnEngine) -> Option<Coord2>;

    /// Where to aim the tool that was just found.
    fn tool_target(&mut self, engine: &TurnEngine, tool: Tool) -> Option<ToolTarget>;

    /// The last answer was refused and the question will be asked again.
    fn rejected(&mut self, _engine: &TurnEngine, _error: GameError) {}

    fn rolled(&mut self, _engine: &TurnEngine, _outcome: &RollOutcome) {}

    fn opened(&mut self, _engine: &TurnEngine, _coords: Coord2, _tool: Tool) {}

    fn tool_applied(&mut self, _engine: &TurnEngine, _outcome: &ToolOutcome) {}

    /// The turn ended early because of `error`.
    fn turn_forfeited(&mut self, _engine: &TurnEngine, _error: GameError) {}
}

/// Runs a single game: a fixed number of two-stage turns on one grid.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TurnEngine {
    grid: Grid,
    target: Letter,
    config: GameConfig,
    turn_number: u8,
    turns_played: u8,
    state: EngineState,
}

impl TurnEngine {
    pub fn new(grid: Grid, target: Letter, config: GameConfig) -> Self {
        Self {
            grid,
            target,
            config,
            turn_number: 0,
            turns_played: 0,
            state: Default::default(),
        }
    }

    /// Random grid and target letter, both drawn from `seed`.
    pub fn generate(config: GameConfig, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let grid = Grid::populate(&mut rng);
        let target = Letter::random(&mut rng);
        log::debug!("New game from seed {}, target letter {}", seed, target);
        Self::new(grid, target, config)
    }

    /// Replaces the target letter. Fails with [`GameError::UnexpectedStage`]
    /// once the first turn has begun.
    pub fn with_target(mut self, target: Letter) -> Result<Self> {
        if self.turn_number != 0 {
            return Err(GameError::UnexpectedStage);
        }
        self.target = target;
        Ok(self)
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn target(&self) -> Letter {
        self.target
    }

    pub fn config(&self) -> GameConfig {
        self.config
    }

    /// Current turn, starting at 1; 0 before the first turn begins.
    pub fn turn_number(&self) -> u8 {
        self.turn_number
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state.is_finished()
    }

    /// Cubes currently showing the target letter.
    pub fn score(&self) -> CellCount {
        self.grid.count_label(self.target)
    }

    pub fn report(&self) -> Option<GameReport> {
        match self.state {
            EngineState::GameOver(outcome) => Some(self.report_for(outcome)),
            _ => None,
        }
    }

    /// Starts the next turn, ending the game instead if no edge cube can roll.
    pub fn begin_turn(&mut self) -> Result<EngineState> {
        self.check_not_finished()?;
        if !matches!(self.state, EngineState::TurnComplete) {
            return Err(GameError::UnexpectedStage);
        }

        self.turn_number += 1;
        self.grid.reset_turn_flags();
        log::debug!("Turn {} of {}", self.turn_number, self.config.max_turns);

        if self.grid.all_edges_locked() {
            log::warn!("No moves can be made, every edge cube is locked");
            self.end_game(GameOutcome::Failed);
        } else {
            self.state = EngineState::AwaitingRoll;
        }
        Ok(self.state)
    }

    /// Stage one: rolls the edge cube at `coords` and everything behind it.
    ///
    /// `direction` is only needed at corners, where there are two ways to go;
    /// elsewhere it may be omitted. Choosing a locked cube forfeits the turn.
    pub fn roll(&mut self, coords: Coord2, direction: Option<Direction>) -> Result<RollOutcome> {
        self.check_not_finished()?;
        if !matches!(self.state, EngineState::AwaitingRoll) {
            return Err(GameError::UnexpectedStage);
        }

        let coords = Grid::validate_coords(coords)?;
        if !Grid::is_edge(coords) {
            return Err(GameError::NotOnEdge);
        }
        if self.grid[coords].is_locked() {
            return self.forfeit(GameError::ImmovableTarget {
                location: Location(coords),
                action: CubeAction::Roll,
            });
        }

        let direction = resolve_direction(coords, direction)?;
        let outcome = self.grid.propagate_roll(coords, direction);
        self.state = EngineState::AwaitingToolUse { tool: None };
        Ok(outcome)
    }

    /// Stage two, first half: opens the box at `coords` and takes its tool.
    ///
    /// An empty box forfeits the turn.
    pub fn open(&mut self, coords: Coord2) -> Result<Tool> {
        self.check_not_finished()?;
        if !matches!(self.state, EngineState::AwaitingToolUse { tool: None }) {
            return Err(GameError::UnexpectedStage);
        }

        let coords = Grid::validate_coords(coords)?;
        let cube = &mut self.grid[coords];
        if self.config.require_rolled_target && !cube.was_rolled_this_turn() {
            return Err(GameError::NotRolledThisTurn);
        }

        match cube.open() {
            Some(tool) => {
                log::debug!("Opened {} and found {}", Location(coords), tool);
                self.state = EngineState::AwaitingToolUse { tool: Some(tool) };
                Ok(tool)
            }
            None => self.forfeit(GameError::EmptyTarget {
                location: Location(coords),
            }),
        }
    }

    /// Stage two, second half: applies the tool found in the opened box.
    ///
    /// Tool failures forfeit the turn but keep whatever stage one rolled.
    pub fn use_tool(&mut self, target: ToolTarget) -> Result<ToolOutcome> {
        self.check_not_finished()?;
        let EngineState::AwaitingToolUse { tool: Some(tool) } = self.state else {
            return Err(GameError::UnexpectedStage);
        };

        match tool.apply(&mut self.grid, target, self.target) {
            Ok(outcome) => {
                self.complete_turn();
                Ok(outcome)
            }
            Err(err) if err.forfeits_turn() => self.forfeit(err),
            Err(err) => Err(err),
        }
    }

    /// Plays one whole turn with decisions from `input`.
    ///
    /// A turn that was already started, e.g. after the input ran out, is picked
    /// up at its current stage. Refused answers are reported back and asked
    /// again. A forfeited turn is not an error here; it is reported through
    /// [`TurnInput::turn_forfeited`].
    pub fn play_turn<I: TurnInput + ?Sized>(&mut self, input: &mut I) -> Result<EngineState> {
        self.check_not_finished()?;
        if matches!(self.state, EngineState::TurnComplete) && self.begin_turn()?.is_finished() {
            return Ok(self.state);
        }

        match self.play_stages(input) {
            Ok(()) => Ok(self.state),
            Err(err) if err.forfeits_turn() => {
                input.turn_forfeited(self, err);
                Ok(self.state)
            }
            Err(err) => Err(err),
        }
    }

    /// Plays turns until the game is over.
    pub fn run<I: TurnInput + ?Sized>(&mut self, input: &mut I) -> Result<GameReport> {
        loop {
            if let EngineState::GameOver(outcome) = self.state {
                return Ok(self.report_for(outcome));
            }
            self.play_turn(input)?;
        }
    }

    /// Plays the rest of the current turn, starting from whichever stage the
    /// engine is waiting on.
    fn play_stages<I: TurnInput + ?Sized>(&mut self, input: &mut I) -> Result<()> {
        if matches!(self.state, EngineState::AwaitingRoll) {
            let roll = self.until_accepted(input, |engine, input| {
                let coords = input.roll_location(engine)?;
                let direction = match engine.corner_options(coords) {
                    Some(options) => Some(input.corner_direction(coords, options)?),
                    None => None,
                };
                Some(engine.roll(coords, direction))
            })?;
            input.rolled(self, &roll);
        }

        let tool = match self.state {
            EngineState::AwaitingToolUse { tool: Some(tool) } => tool,
            _ => {
                let (coords, tool) = self.until_accepted(input, |engine, input| {
                    let coords = input.open_location(engine)?;
                    Some(engine.open(coords).map(|tool| (coords, tool)))
                })?;
                input.opened(self, coords, tool);
                tool
            }
        };

        let outcome = self.until_accepted(input, |engine, input| {
            let target = input.tool_target(engine, tool)?;
            Some(engine.use_tool(target))
        })?;
        input.tool_applied(self, &outcome);

        Ok(())
    }

    /// Repeats `step` until it succeeds or fails with an error that is not
    /// about the input itself.
    fn until_accepted<I, T>(
        &mut self,
        input: &mut I,
        mut step: impl FnMut(&mut Self, &mut I) -> Option<Result<T>>,
    ) -> Result<T>
    where
        I: TurnInput + ?Sized,
    {
        loop {
            match step(self, input).ok_or(GameError::InputExhausted)? {
                Ok(value) => return Ok(value),
                Err(err) if err.is_retryable() => {
                    log::debug!("Rejected input: {}", err);
                    input.rejected(self, err);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Both inward directions when `coords` is a corner cube that can roll.
    fn corner_options(&self, coords: Coord2) -> Option<[Direction; 2]> {
        if !self.grid.cube(coords).is_some_and(Cube::can_rotate) {
            return None;
        }
        match Grid::available_directions(coords).as_slice() {
            &[first, second] => Some([first, second]),
            _ => None,
        }
    }

    fn forfeit<T>(&mut self, err: GameError) -> Result<T> {
        log::warn!("Turn {} forfeited: {}", self.turn_number, err);
        self.complete_turn();
        Err(err)
    }

    fn complete_turn(&mut self) {
        self.turns_played += 1;
        if self.turn_number >= self.config.max_turns {
            self.end_game(GameOutcome::Succeeded);
        } else {
            self.state = EngineState::TurnComplete;
        }
    }

    fn end_game(&mut self, outcome: GameOutcome) {
        if self.state.is_finished() {
            return;
        }
        self.state = EngineState::GameOver(outcome);
        log::debug!(
            "Game over after {} turns: {:?}, {} cubes show {}",
            self.turns_played,
            outcome,
            self.score(),
            self.target
        );
    }

    fn report_for(&self, outcome: GameOutcome) -> GameReport {
        GameReport {
            outcome,
            target: self.target,
            score: self.score(),
            turns_played: self.turns_played,
        }
    }

    fn check_not_finished(&self) -> Result<()> {
        if self.state.is_finished() {
            Err(GameError::AlreadyEnded)
        } else {
            Ok(())
        }
    }
}

/// Settles the roll direction from `coords`, which must be an edge cell.
fn resolve_direction(coords: Coord2, requested: Option<Direction>) -> Result<Direction> {
    let available = Grid::available_directions(coords);
    match (available.as_slice(), requested) {
        (&[only], None) => Ok(only),
        (_, Some(direction)) if available.contains(&direction) => Ok(direction),
        _ => Err(GameError::InvalidDirection),
    }
}
