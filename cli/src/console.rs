use std::fmt::Display;
use std::io::{BufRead, Write};

use rollbox_core::*;

/// Line-based front end: prompts on `out`, reads answers from `input`.
pub struct Console<R, W> {
    input: R,
    out: W,
    /// Turn for which the stage one header was already printed.
    announced_turn: u8,
}

impl<R: BufRead, W: Write> Console<R, W> {
    pub fn new(input: R, out: W) -> Self {
        Self {
            input,
            out,
            announced_turn: 0,
        }
    }

    pub fn welcome(&mut self, engine: &TurnEngine) {
        self.say(format_args!(
            "Welcome to the rolling box puzzle. An {0}x{0} box grid has been generated.",
            GRID_SIZE
        ));
        self.say(format_args!(
            "Your goal is to get the letter \"{}\" on top of as many boxes as you can in {} turns.",
            engine.target(),
            engine.config().max_turns
        ));
        self.say("\nThe initial state of the box grid:");
        self.say(engine.grid());
    }

    pub fn game_over(&mut self, engine: &TurnEngine, report: &GameReport) {
        self.say("\n******** GAME OVER ********");
        self.say("The final state of the box grid:");
        self.say(engine.grid());
        self.say(format_args!(
            "Boxes showing the target letter \"{}\": {}",
            report.target, report.score
        ));
        match report.outcome {
            GameOutcome::Succeeded => self.say("The game has been completed successfully!"),
            GameOutcome::Failed => self.say("The game has failed, no more moves can be made."),
        }
    }

    fn say(&mut self, text: impl Display) {
        if let Err(err) = writeln!(self.out, "{}", text) {
            log::warn!("Could not write to output: {}", err);
        }
    }

    /// Prints `prompt` and reads one trimmed line; `None` at end of input.
    fn ask(&mut self, prompt: &str) -> Option<String> {
        if let Err(err) = write!(self.out, "{}", prompt).and_then(|()| self.out.flush()) {
            log::warn!("Could not write prompt: {}", err);
        }

        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim().to_owned()),
            Err(err) => {
                log::error!("Could not read input: {}", err);
                None
            }
        }
    }

    /// Asks until `parse` accepts the answer.
    fn ask_until<T>(&mut self, prompt: &str, retry: &str, parse: impl Fn(&str) -> Option<T>) -> Option<T> {
        loop {
            let answer = self.ask(prompt)?;
            match parse(&answer) {
                Some(value) => return Some(value),
                None => self.say(format_args!("INCORRECT INPUT: {}", retry)),
            }
        }
    }

    fn ask_location(&mut self, prompt: &str) -> Option<Coord2> {
        self.ask_until(prompt, "Invalid location format, expected e.g. R2-C4.", parse_location)
    }

    fn offer_box_viewing(&mut self, grid: &Grid) -> Option<()> {
        let view = self.ask_until(
            "---> Do you want to view all surfaces of a box? [1] Yes or [2] No? ",
            "Please enter 1 or 2.",
            |answer| match answer {
                "1" => Some(true),
                "2" => Some(false),
                _ => None,
            },
        )?;

        if view {
            let coords = self.ask_location("Please enter the location of the box you want to view: ")?;
            self.say(grid[coords].render_cube());
        } else {
            self.say("Continuing to the first stage...");
        }
        Some(())
    }
}

impl<R: BufRead, W: Write> TurnInput for Console<R, W> {
    fn roll_location(&mut self, engine: &TurnEngine) -> Option<Coord2> {
        let turn = engine.turn_number();
        if self.announced_turn != turn {
            self.announced_turn = turn;
            self.say(format_args!("\n=====> TURN {}:", turn));
            self.offer_box_viewing(engine.grid())?;
            self.say(format_args!("\n---> TURN {} - FIRST STAGE:", turn));
        }
        self.ask_location("Please enter the location of the edge box you want to roll: ")
    }

    fn corner_direction(&mut self, _coords: Coord2, [first, second]: [Direction; 2]) -> Option<Direction> {
        let prompt = format!(
            "The chosen box can be rolled to either [1] {} or [2] {}: ",
            first.display_name(),
            second.display_name()
        );
        self.ask_until(&prompt, "Please enter 1 or 2.", |answer| match answer {
            "1" => Some(first),
            "2" => Some(second),
            _ => None,
        })
    }

    fn open_location(&mut self, _engine: &TurnEngine) -> Option<Coord2> {
        self.ask_location("Please enter the location of the box you want to open: ")
    }

    fn tool_target(&mut self, _engine: &TurnEngine, tool: Tool) -> Option<ToolTarget> {
        match tool.target_shape() {
            TargetShape::Cell => self
                .ask_location("Please enter the location of the box to use this tool on: ")
                .map(ToolTarget::Cell),
            TargetShape::Row => self
                .ask_until(
                    "Please enter the row to stamp (e.g. R3 or 3): ",
                    "Invalid row.",
                    |answer| parse_line_index(answer, 'R'),
                )
                .map(ToolTarget::Row),
            TargetShape::Column => self
                .ask_until(
                    "Please enter the column to stamp (e.g. C5 or 5): ",
                    "Invalid column.",
                    |answer| parse_line_index(answer, 'C'),
                )
                .map(ToolTarget::Column),
        }
    }

    fn rejected(&mut self, _engine: &TurnEngine, error: GameError) {
        self.say(format_args!("INCORRECT INPUT: {}. Please try again.", error));
    }

    fn rolled(&mut self, engine: &TurnEngine, outcome: &RollOutcome) {
        if outcome.stopped_by.is_some() {
            self.say(format_args!(
                "The chosen box and any box on its path have been rolled {} until a locked box was reached. \
                 The new state of the box grid:",
                outcome.direction.display_name()
            ));
        } else {
            self.say(format_args!(
                "The chosen box and any box on its path have been rolled {}. The new state of the box grid:",
                outcome.direction.display_name()
            ));
        }
        self.say(engine.grid());
        self.say(format_args!("\n---> TURN {} - SECOND STAGE:", engine.turn_number()));
    }

    fn opened(&mut self, _engine: &TurnEngine, coords: Coord2, tool: Tool) {
        self.say(format_args!(
            "The box at {} is opened. It contains a tool --> {} ({})",
            Location(coords),
            tool,
            tool.description()
        ));
    }

    fn tool_applied(&mut self, engine: &TurnEngine, outcome: &ToolOutcome) {
        let target = engine.target();
        match outcome.tool {
            Tool::CrossStamp => self.say(format_args!(
                "The box at {} and its neighbours have been stamped with \"{}\".",
                outcome.target, target
            )),
            Tool::RowStamp | Tool::ColumnStamp => self.say(format_args!(
                "All boxes in {} have been stamped with \"{}\".",
                outcome.target, target
            )),
            Tool::Flip => self.say(format_args!(
                "The box at {} has been flipped upside down.",
                outcome.target
            )),
            Tool::Lock => self.say(format_args!(
                "The box at {} has been locked in place.",
                outcome.target
            )),
        }
        self.say("The new state of the box grid:");
        self.say(engine.grid());
    }

    fn turn_forfeited(&mut self, _engine: &TurnEngine, error: GameError) {
        self.say(format_args!("{}. Continuing to the next turn...", error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn play(grid: Grid, turns: u8, script: &str) -> (Result<GameReport>, String) {
        let mut engine = TurnEngine::new(grid, Letter::B, GameConfig::new(turns));
        let mut out = Vec::new();
        let result = {
            let mut console = Console::new(Cursor::new(script.as_bytes()), &mut out);
            engine.run(&mut console)
        };
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn plays_a_turn_from_typed_answers() {
        let grid = Grid::filled(Cube::standard([Letter::A; 6], Some(Tool::RowStamp)));
        let script = "2\nR1-C1\n1\nr1-c3\nR4\n";

        let (result, output) = play(grid, 1, script);

        let report = result.unwrap();
        assert_eq!(report.score, 8);
        assert_eq!(report.outcome, GameOutcome::Succeeded);
        assert!(output.contains("=====> TURN 1:"));
        assert!(output.contains("rolled to either [1] right or [2] downwards"));
        assert!(output.contains("It contains a tool --> RowStamp"));
        assert!(output.contains("All boxes in row R4 have been stamped with \"B\"."));
    }

    #[test]
    fn bad_answers_are_asked_again() {
        let grid = Grid::filled(Cube::standard([Letter::A; 6], None));
        let script = "maybe\n1\nR9-C9\nR2-C2\nR5-C4\nR5-C1\nR1-C1\nR5-C5\n";

        let (result, output) = play(grid, 1, script);

        assert!(result.is_ok());
        assert!(output.contains("Please enter 1 or 2."));
        assert!(output.contains("    | A |"));
        assert!(output.contains("INCORRECT INPUT: Invalid location format"));
        assert!(output.contains("INCORRECT INPUT: The chosen box is not on any of the edges"));
        assert!(output.contains("INCORRECT INPUT: The chosen box was not rolled during this turn"));
        assert!(output.contains("The box at R5-C5 is empty. Continuing to the next turn..."));
    }

    #[test]
    fn running_out_of_lines_stops_the_game() {
        let grid = Grid::filled(Cube::standard([Letter::A; 6], None));
        let (result, output) = play(grid, 1, "2\n");

        assert_eq!(result, Err(GameError::InputExhausted));
        assert!(output.contains("FIRST STAGE"));
    }
}
