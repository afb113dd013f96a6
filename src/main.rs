//! Terminal 2048 runner (default binary).
//!
//! crossterm for input and a plain text board; tiles are drawn from the
//! projector's sprites so turns animate.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event};
use crossterm::style::Print;
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen,
};
use crossterm::{execute, queue};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use tui_2048::input::map_key;
use tui_2048::session::{command_queue, Flow, Session, SessionConfig, TickOutcome, TurnReport};
use tui_2048::types::{BOARD_SIZE, ROW_SPAN, TILE_SEP};

/// Character cell size of one board cell
const CELL_W: u16 = 7;
const CELL_H: u16 = 2;
const BOARD_TOP: u16 = 2;

struct Screen {
    out: Stdout,
}

impl Screen {
    fn enter() -> Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        execute!(out, EnterAlternateScreen, Hide)?;
        Ok(Self { out })
    }

    fn exit(&mut self) -> Result<()> {
        execute!(self.out, Show, LeaveAlternateScreen)?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn draw(&mut self, session: &Session, report: &TurnReport) -> Result<()> {
        queue!(
            self.out,
            Clear(ClearType::All),
            MoveTo(0, 0),
            Print(format!(
                "Score: {:>6}   Best: {:>6}   Top tile: {:>5}",
                report.score,
                report.max_score,
                session.engine().grid().max_tile()
            ))
        )?;

        let width = CELL_W * BOARD_SIZE as u16;
        for line in 0..=(CELL_H * BOARD_SIZE as u16) {
            let glyph = if line % CELL_H == 0 { "-" } else { "." };
            queue!(
                self.out,
                MoveTo(0, BOARD_TOP + line),
                Print(glyph.repeat(width as usize + 1))
            )?;
        }

        for sprite in session.sprites() {
            let col = ((sprite.x - TILE_SEP) * CELL_W as i32 / ROW_SPAN).max(0) as u16;
            let row = ((sprite.y - TILE_SEP) * CELL_H as i32 / ROW_SPAN).max(0) as u16;
            queue!(
                self.out,
                MoveTo(col + 1, BOARD_TOP + row + 1),
                Print(format!("{:^5}", sprite.value))
            )?;
        }

        let status = match (report.won, report.game_over) {
            (true, _) => "You win!  n: new game  q: quit",
            (false, true) => "Game over.  n: new game  q: quit",
            _ => "arrows/wasd/hjkl: tilt  n: new game  q: quit",
        };
        queue!(
            self.out,
            MoveTo(0, BOARD_TOP + CELL_H * BOARD_SIZE as u16 + 2),
            Print(status)
        )?;
        self.out.flush()?;
        Ok(())
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn main() -> Result<()> {
    init_tracing();
    let config = SessionConfig::from_env();

    let mut screen = Screen::enter()?;
    let result = run(&mut screen, config);

    // Always try to restore terminal state.
    let _ = screen.exit();
    result
}

fn run(screen: &mut Screen, config: SessionConfig) -> Result<()> {
    let (tx, mut queue) = command_queue();
    let mut session = Session::new(config);
    let mut report = session.new_game()?;

    let tick_ms = session.config().tick_ms;
    debug!(seed = session.config().seed, tick_ms, "session started");
    let tick_duration = Duration::from_millis(u64::from(tick_ms));
    let mut last_tick = Instant::now();

    loop {
        screen.draw(&session, &report)?;

        let timeout = tick_duration
            .checked_sub(last_tick.elapsed())
            .unwrap_or(Duration::ZERO);
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if let Some(command) = map_key(key) {
                    tx.send(command);
                }
            }
        }

        match session.pump(&mut queue)? {
            Some(Flow::Quit) => {
                info!(
                    score = report.score,
                    max_score = report.max_score,
                    "leaving game"
                );
                return Ok(());
            }
            Some(Flow::Continue(next)) => report = next,
            None => {}
        }

        if last_tick.elapsed() >= tick_duration {
            last_tick = Instant::now();
            if let TickOutcome::Settled(next) = session.tick()? {
                report = next;
            }
        }
    }
}
