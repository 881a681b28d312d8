#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Shared rendering contracts for Snaze adapters.
//!
//! Renderers consume [`Frame`] snapshots only. [`compose`] turns a frame into
//! the text of one screen and [`TerminalRenderer`] writes that text to any
//! [`Write`] sink.

use std::{fmt::Write as _, io::Write};

use anyhow::{Context, Result as AnyResult};
use snaze_core::{Direction, Frame, SessionState, TileKind, WELCOME_BANNER};

const RULE: &str = "---------------------------------------------------------------";
const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

/// Symbols used to draw a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Palette {
    /// Wall tile.
    pub wall: &'static str,
    /// Empty and out-of-bounds tiles.
    pub floor: &'static str,
    /// Food tile.
    pub food: &'static str,
    /// Head before the snake has moved.
    pub head_idle: &'static str,
    /// Head after a crash or a lost game.
    pub head_dead: &'static str,
    /// Heads facing north, east, south and west.
    pub head_moving: [&'static str; 4],
    /// Body segment.
    pub body: &'static str,
    /// Body segment after a crash.
    pub body_dead: &'static str,
    /// Remaining life in the HUD.
    pub life: &'static str,
    /// Lost life in the HUD.
    pub life_lost: &'static str,
}

impl Palette {
    /// Palette for terminals with Unicode glyph support.
    pub const UNICODE: Palette = Palette {
        wall: "█",
        floor: " ",
        food: "⚜",
        head_idle: "✼",
        head_dead: "☹",
        head_moving: ["∨", "<", "∧", ">"],
        body: "●",
        body_dead: "◌",
        life: "♥",
        life_lost: "♡",
    };

    /// Palette restricted to printable ASCII.
    pub const ASCII: Palette = Palette {
        wall: "#",
        floor: " ",
        food: "$",
        head_idle: "@",
        head_dead: "X",
        head_moving: ["v", "<", "^", ">"],
        body: "o",
        body_dead: "x",
        life: "*",
        life_lost: ".",
    };

    /// Symbol for a tile of the provided kind in the provided frame.
    #[must_use]
    pub fn tile(&self, kind: TileKind, frame: &Frame) -> &'static str {
        match kind {
            TileKind::Empty | TileKind::OutOfBounds => self.floor,
            TileKind::Wall => self.wall,
            TileKind::Food => self.food,
            TileKind::SnakeHead => self.head(frame),
            TileKind::SnakeBody if frame.state == SessionState::Crash => self.body_dead,
            TileKind::SnakeBody => self.body,
        }
    }

    fn head(&self, frame: &Frame) -> &'static str {
        if frame.state == SessionState::Start {
            return self.head_idle;
        }
        if frame.state == SessionState::Crash || frame.is_lost() {
            return self.head_dead;
        }
        match frame.heading {
            None => self.head_idle,
            Some(Direction::North) => self.head_moving[0],
            Some(Direction::East) => self.head_moving[1],
            Some(Direction::South) => self.head_moving[2],
            Some(Direction::West) => self.head_moving[3],
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::UNICODE
    }
}

/// Message shown above the board in pause and terminal states.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Banner {
    /// Shown before the first level starts.
    Welcome,
    /// Shown after a crash that left lives.
    Crash,
    /// Shown after a non-final level was cleared.
    LevelUp,
    /// Shown after the final level was cleared.
    Won,
    /// Shown after the last life was lost.
    Lost,
}

impl Banner {
    /// Banner matching the frame's state, if that state carries one.
    #[must_use]
    pub fn for_frame(frame: &Frame) -> Option<Self> {
        match frame.state {
            SessionState::Start => Some(Self::Welcome),
            SessionState::Crash => Some(Self::Crash),
            SessionState::LevelUp => Some(Self::LevelUp),
            SessionState::GameOver if frame.is_lost() => Some(Self::Lost),
            SessionState::GameOver => Some(Self::Won),
            SessionState::Thinking | SessionState::Run => None,
        }
    }

    /// Text of the banner. `prompt` adds the press-enter line to pause banners.
    #[must_use]
    pub fn text(self, frame: &Frame, prompt: bool) -> String {
        let mut text = String::new();
        match self {
            Self::Welcome => {
                let _ = writeln!(text, "-------------> {WELCOME_BANNER} <-------------");
                let _ = writeln!(text, "{RULE}");
                let _ = writeln!(
                    text,
                    " Levels loaded: {} | Snake lives: {} | Foods to eat: {}",
                    frame.level_count, frame.starting_lives, frame.quota
                );
                let _ = writeln!(text, " Clear all levels to win the game. Good luck!!!");
                let _ = writeln!(text, "{RULE}");
                if prompt {
                    let _ = writeln!(text, ">>> Press <ENTER> to start the game!");
                }
            }
            Self::Crash => {
                let _ = writeln!(text, "Oh no! The snake crashed!");
                if prompt {
                    let _ = writeln!(text, ">>> Press <ENTER> to try again.");
                }
                let _ = writeln!(text, "{RULE}");
            }
            Self::LevelUp => {
                let _ = writeln!(text, "Yeah! The snake advanced to the next level!");
                if prompt {
                    let _ = writeln!(text, ">>> Press <ENTER> to start the next level.");
                }
                let _ = writeln!(text, "{RULE}");
            }
            Self::Won => boxed(&mut text, "CONGRATS! The snake WON!"),
            Self::Lost => boxed(&mut text, "OH NO! The snake LOST!"),
        }
        text
    }
}

fn boxed(text: &mut String, headline: &str) {
    const WIDTH: usize = 37;
    let edge = format!("+{}+", "-".repeat(WIDTH));
    let _ = writeln!(text, "{edge}");
    let _ = writeln!(text, "|{headline:^WIDTH$}|");
    let _ = writeln!(text, "|{:^WIDTH$}|", "Thanks for playing!");
    let _ = writeln!(text, "{edge}");
}

/// Status line: lives, score, food progress and level progress.
#[must_use]
pub fn hud(frame: &Frame, palette: &Palette) -> String {
    let lost = frame.starting_lives.saturating_sub(frame.lives);
    let lives = usize::try_from(frame.lives).unwrap_or(0);
    let lost = usize::try_from(lost).unwrap_or(0);
    format!(
        "Lives: {}{} | Score: {} | Food eaten: {} of {} | Level: {} of {}",
        palette.life.repeat(lives),
        palette.life_lost.repeat(lost),
        frame.score,
        frame.consumed,
        frame.quota,
        frame.level + 1,
        frame.level_count,
    )
}

/// Board rows, one line per grid row.
#[must_use]
pub fn board(frame: &Frame, palette: &Palette) -> String {
    let mut board = String::new();
    for row in frame.tile_rows() {
        for kind in row {
            board.push_str(palette.tile(*kind, frame));
        }
        board.push('\n');
    }
    board
}

/// Full text of one screen: optional banner, HUD, rule and board.
#[must_use]
pub fn compose(frame: &Frame, palette: &Palette, prompt: bool) -> String {
    let mut screen = String::new();
    if let Some(banner) = Banner::for_frame(frame) {
        screen.push_str(&banner.text(frame, prompt));
        screen.push('\n');
    }
    screen.push_str(&hud(frame, palette));
    screen.push('\n');
    screen.push_str(RULE);
    screen.push('\n');
    screen.push_str(&board(frame, palette));
    screen
}

/// Destination for frame snapshots.
pub trait FrameSink {
    /// Presents a single frame.
    fn present(&mut self, frame: &Frame) -> AnyResult<()>;
}

/// Text renderer writing full screens to a byte sink such as stdout.
#[derive(Debug)]
pub struct TerminalRenderer<W> {
    out: W,
    palette: Palette,
    clear_screen: bool,
    prompts: bool,
}

impl<W> TerminalRenderer<W>
where
    W: Write,
{
    /// Creates a renderer that clears the screen before every frame and shows prompts.
    pub fn new(out: W, palette: Palette) -> Self {
        Self {
            out,
            palette,
            clear_screen: true,
            prompts: true,
        }
    }

    /// Controls whether every frame starts with a clear-screen escape.
    #[must_use]
    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    /// Controls whether pause banners ask for an acknowledgement.
    #[must_use]
    pub fn with_prompts(mut self, prompts: bool) -> Self {
        self.prompts = prompts;
        self
    }

    /// Consumes the renderer, returning the underlying sink.
    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W> FrameSink for TerminalRenderer<W>
where
    W: Write,
{
    fn present(&mut self, frame: &Frame) -> AnyResult<()> {
        if !frame.state.is_drawn() {
            return Ok(());
        }

        let mut screen = String::new();
        if self.clear_screen {
            screen.push_str(CLEAR_SCREEN);
        }
        screen.push_str(&compose(frame, &self.palette, self.prompts));

        self.out
            .write_all(screen.as_bytes())
            .context("failed to write frame")?;
        self.out.flush().context("failed to flush frame")?;
        Ok(())
    }
}
