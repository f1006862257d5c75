use core::fmt;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::Context;
use pairflip_core::{
    CardState, ClickOutcome, Coord, Deal, GameError, GameListener, GameSession, HideTicket,
    Position, RandomDealBuilder, Scheduler, Shell,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::images::list_images;
use crate::settings::Settings;

const CELL_WIDTH: usize = 8;

const HELP: &str = "\
Commands:
  <row> <col>     turn the card at that spot (both start at 1)
  r               restart with the same cards
  s               restart with the cards shuffled
  o [folder]      open a folder of images
  h               show this help
  q               quit";

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) enum Cue {
    Success,
    Fail,
    End,
}

impl fmt::Display for Cue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Cue::Success => "Pair found!",
            Cue::Fail => "No match.",
            Cue::End => "You won!",
        })
    }
}

/// Session shell for a line-based terminal.
///
/// The hide is kept as a deadline; the game loop waits it out before reading more input.
#[derive(Debug, Default)]
pub(crate) struct TerminalShell {
    pending_hide: Option<(Instant, HideTicket)>,
    cues: Vec<Cue>,
    notices: Vec<String>,
}

impl TerminalShell {
    fn take_pending_hide(&mut self) -> Option<(Instant, HideTicket)> {
        self.pending_hide.take()
    }

    fn drain_cues(&mut self) -> Vec<Cue> {
        std::mem::take(&mut self.cues)
    }

    fn drain_notices(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notices)
    }
}

impl Scheduler for TerminalShell {
    fn schedule_hide(&mut self, delay: Duration, ticket: HideTicket) {
        log::trace!("Hide {ticket} in {delay:?}");
        self.pending_hide = Some((Instant::now() + delay, ticket));
    }

    fn cancel_hide(&mut self, ticket: HideTicket) {
        if self.pending_hide.is_some_and(|(_, pending)| pending == ticket) {
            self.pending_hide = None;
        }
    }
}

impl GameListener for TerminalShell {
    fn deal_built(&mut self, deal: &Deal) {
        let size = deal.size();
        self.notices.push(format!(
            "New board: {} pairs on {} rows x {} columns.",
            deal.pair_count(),
            size.rows,
            size.cols
        ));
    }

    fn mismatch(&mut self, _pos: Position) {
        self.cues.push(Cue::Fail);
    }

    fn match_kept(&mut self, _pos: Position) {
        self.cues.push(Cue::Success);
    }

    fn won(&mut self) {
        self.cues.push(Cue::End);
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Command {
    Click(Position),
    Restart,
    Reshuffle,
    Open(Option<PathBuf>),
    Help,
    Quit,
    Nothing,
}

impl Command {
    /// Parses one input line. Rows and columns are typed starting at 1.
    pub fn parse(line: &str) -> Result<Self, String> {
        let mut words = line.split_whitespace();
        let Some(first) = words.next() else {
            return Ok(Command::Nothing);
        };
        let rest: Vec<&str> = words.collect();

        let command = match (first.to_ascii_lowercase().as_str(), rest.as_slice()) {
            ("q" | "quit", []) => Command::Quit,
            ("r" | "restart" | "p" | "play", []) => Command::Restart,
            ("s" | "shuffle", []) => Command::Reshuffle,
            ("h" | "help" | "?", []) => Command::Help,
            ("o" | "open" | "c" | "change", []) => Command::Open(None),
            ("o" | "open" | "c" | "change", _) => Command::Open(Some(PathBuf::from(rest.join(" ")))),
            (row, [col]) => Command::Click((parse_coord(row)?, parse_coord(col)?)),
            _ => return Err(format!("Unknown command {line:?}, type h for help")),
        };
        Ok(command)
    }
}

fn parse_coord(word: &str) -> Result<Coord, String> {
    match word.parse::<Coord>() {
        Ok(value) if value >= 1 => Ok(value - 1),
        _ => Err(format!("{word:?} is not a row or column number")),
    }
}

/// Text rendering of the board with 1-based row and column headers.
pub(crate) fn render_board<S: Shell>(session: &GameSession<S>) -> String {
    let deal = session.deal();
    let size = deal.size();
    if deal.is_empty() {
        return "No cards dealt. Open a folder of images with o <folder>.\n".to_string();
    }

    let mut out = String::from("   ");
    for col in 1..=size.cols {
        out.push_str(&format!(" {col:^width$} ", width = CELL_WIDTH));
    }
    out.push('\n');

    for row in 0..size.rows {
        out.push_str(&format!("{:>2} ", row + 1));
        for col in 0..size.cols {
            let pos = (row, col);
            let cell = match (deal.face_at(pos), session.card_state(pos)) {
                (None, _) => format!(" {:width$} ", "", width = CELL_WIDTH),
                (Some(_), CardState::Hidden) => format!("[{:^width$}]", "??", width = CELL_WIDTH),
                (Some(face), CardState::Open) => {
                    format!("[{:^width$}]", face.label(CELL_WIDTH), width = CELL_WIDTH)
                }
                (Some(face), CardState::Matched) => {
                    format!("<{:^width$}>", face.label(CELL_WIDTH), width = CELL_WIDTH)
                }
            };
            out.push_str(&cell);
        }
        out.push('\n');
    }
    out
}

/// Line-driven game loop over any input and output.
pub(crate) struct TerminalGame<R, W> {
    session: GameSession<TerminalShell>,
    settings: Settings,
    rng: StdRng,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> TerminalGame<R, W> {
    pub fn new(settings: Settings, seed: u64, input: R, output: W) -> Self {
        log::debug!("seed: {seed}");
        Self {
            session: GameSession::new(TerminalShell::default(), settings.session),
            settings,
            rng: StdRng::seed_from_u64(seed),
            input,
            output,
        }
    }

    pub fn run(&mut self, folder: Option<PathBuf>) -> anyhow::Result<()> {
        self.open(folder)?;
        self.show_board()?;

        while let Some(line) = self.prompt()? {
            let command = match Command::parse(&line) {
                Ok(command) => command,
                Err(message) => {
                    writeln!(self.output, "{message}")?;
                    continue;
                }
            };
            if !self.execute(command)? {
                break;
            }
        }
        Ok(())
    }

    /// Runs one command. Returns `false` once the player has quit.
    fn execute(&mut self, command: Command) -> anyhow::Result<bool> {
        match command {
            Command::Nothing => {}
            Command::Help => writeln!(self.output, "{HELP}")?,
            Command::Quit => return self.confirm_quit().map(|quit| !quit),
            Command::Restart if self.settings.reshuffle_on_restart => self.reshuffle()?,
            Command::Restart => {
                self.session.restart();
                self.show_board()?;
            }
            Command::Reshuffle => self.reshuffle()?,
            Command::Open(folder) => {
                self.open(folder)?;
                self.show_board()?;
            }
            Command::Click(pos) => self.click(pos)?,
        }
        Ok(true)
    }

    fn click(&mut self, pos: Position) -> anyhow::Result<()> {
        match self.session.on_card_clicked(pos) {
            Err(err) => writeln!(self.output, "{err} ({}, {}).", pos.0 + 1, pos.1 + 1)?,
            Ok(outcome) if !outcome.has_update() => {
                writeln!(self.output, "Nothing to turn there.")?;
            }
            Ok(outcome) => {
                self.show_board()?;
                if outcome == ClickOutcome::Mismatched {
                    self.wait_for_hide()?;
                }
                if outcome == ClickOutcome::Won {
                    writeln!(
                        self.output,
                        "Solved in {} tries. [p]lay again, [c]hange cards or [q]uit?",
                        self.session.attempts()
                    )?;
                }
            }
        }
        Ok(())
    }

    /// Blocks until the scheduled hide is due, then runs it. Input is not read meanwhile.
    fn wait_for_hide(&mut self) -> anyhow::Result<()> {
        let Some((deadline, ticket)) = self.session.shell_mut().take_pending_hide() else {
            return Ok(());
        };
        self.output.flush()?;
        let remaining = deadline.saturating_duration_since(Instant::now());
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
        if self.session.on_hide_elapsed(ticket) {
            self.show_board()?;
        }
        Ok(())
    }

    fn reshuffle(&mut self) -> anyhow::Result<()> {
        self.session.restart_reshuffled(&mut self.rng);
        self.show_board()
    }

    fn open(&mut self, folder: Option<PathBuf>) -> anyhow::Result<()> {
        let folder = folder.unwrap_or_else(|| self.settings.image_dir.clone());
        let faces = match list_images(&folder, &self.settings.extensions) {
            Ok(faces) => faces,
            Err(err) => {
                log::warn!("{err:#}");
                writeln!(self.output, "Could not open {}.", folder.display())?;
                return Ok(());
            }
        };

        let builder = RandomDealBuilder::new(self.rng.random(), self.settings.deal);
        match self.session.deal_faces(builder, &faces) {
            Ok(()) => {}
            Err(GameError::EmptyImageSet) => {
                writeln!(self.output, "No images found in {}.", folder.display())?;
            }
            Err(err) => return Err(err).context("Could not deal the cards"),
        }
        Ok(())
    }

    fn confirm_quit(&mut self) -> anyhow::Result<bool> {
        write!(self.output, "Are you sure to quit? [y/N] ")?;
        let answer = self.read_line()?.unwrap_or_else(|| "y".to_string());
        Ok(matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes"))
    }

    fn prompt(&mut self) -> anyhow::Result<Option<String>> {
        write!(self.output, "> ")?;
        self.read_line()
    }

    fn read_line(&mut self) -> anyhow::Result<Option<String>> {
        self.output.flush()?;
        let mut line = String::new();
        let read = self
            .input
            .read_line(&mut line)
            .context("Could not read input")?;
        Ok((read > 0).then_some(line))
    }

    fn show_board(&mut self) -> anyhow::Result<()> {
        for notice in self.session.shell_mut().drain_notices() {
            writeln!(self.output, "{notice}")?;
        }
        write!(self.output, "{}", render_board(&self.session))?;
        for cue in self.session.shell_mut().drain_cues() {
            if self.settings.bell {
                write!(self.output, "\x07")?;
            }
            writeln!(self.output, "{cue}")?;
        }
        Ok(())
    }
}
