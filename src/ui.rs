use crossterm::{
    cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    style::{self, Color, Stylize},
    terminal::{self, ClearType},
    ExecutableCommand, QueueableCommand,
};
use rand::Rng;
use std::error::Error;
use std::io::{self, Write};
use tracing::{info, warn};

use crate::config::Settings;
use crate::drag::{DragSession, Offset, Release, TileMetrics};
use crate::error::PuzzleError;
use crate::puzzle::Puzzle;
use crate::view::BoardView;

/// Terminal cells per tile.
pub const TILE_COLS: u16 = 8;
pub const TILE_ROWS: u16 = 3;
const PITCH_COLS: u16 = TILE_COLS + 1;
const PITCH_ROWS: u16 = TILE_ROWS + 1;

const BOARD_LEFT: u16 = 2;
const BOARD_TOP: u16 = 3;

/// Raw mode, alternate screen and mouse capture for as long as it lives.
/// Dropping it restores the terminal, including while unwinding.
pub struct TerminalGuard {
    restore: fn() -> io::Result<()>,
}

impl TerminalGuard {
    pub fn enter() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let guard = TerminalGuard {
            restore: restore_terminal,
        };

        let mut stdout = io::stdout();
        stdout.execute(terminal::EnterAlternateScreen)?;
        stdout.execute(cursor::Hide)?;
        stdout.execute(EnableMouseCapture)?;
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if let Err(err) = (self.restore)() {
            warn!(%err, "failed to restore terminal");
        }
    }
}

fn restore_terminal() -> io::Result<()> {
    let mut stdout = io::stdout();
    stdout.execute(DisableMouseCapture)?;
    stdout.execute(cursor::Show)?;
    stdout.execute(terminal::LeaveAlternateScreen)?;
    terminal::disable_raw_mode()
}

/// Maps terminal cells to board slots and board units.
///
/// One slot pitch (tile plus the one-cell gap) spans exactly
/// `metrics.pitch()` board units, so a full-cell drag lines up with the
/// drag clamp.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoardLayout {
    pub left: u16,
    pub top: u16,
    pub size: usize,
    pub metrics: TileMetrics,
}

impl BoardLayout {
    pub fn new(size: usize, metrics: TileMetrics) -> Self {
        Self {
            left: BOARD_LEFT,
            top: BOARD_TOP,
            size,
            metrics,
        }
    }

    fn units_per_col(&self) -> f32 {
        self.metrics.pitch() / PITCH_COLS as f32
    }

    fn units_per_row(&self) -> f32 {
        self.metrics.pitch() / PITCH_ROWS as f32
    }

    pub fn slot_at(&self, column: u16, row: u16) -> Option<usize> {
        let dx = column.checked_sub(self.left)?;
        let dy = row.checked_sub(self.top)?;

        let (col, within_x) = ((dx / PITCH_COLS) as usize, dx % PITCH_COLS);
        let (line, within_y) = ((dy / PITCH_ROWS) as usize, dy % PITCH_ROWS);

        if col >= self.size || line >= self.size {
            return None;
        }
        if within_x >= TILE_COLS || within_y >= TILE_ROWS {
            return None;
        }

        Some(line * self.size + col)
    }

    pub fn translation(&self, from: (u16, u16), to: (u16, u16)) -> Offset {
        Offset::new(
            (to.0 as f32 - from.0 as f32) * self.units_per_col(),
            (to.1 as f32 - from.1 as f32) * self.units_per_row(),
        )
    }

    pub fn cell_shift(&self, offset: Offset) -> (i32, i32) {
        (
            (offset.x / self.units_per_col()).round() as i32,
            (offset.y / self.units_per_row()).round() as i32,
        )
    }

    fn slot_origin(&self, index: usize) -> (i32, i32) {
        let col = (index % self.size) as i32;
        let line = (index / self.size) as i32;
        (
            self.left as i32 + col * PITCH_COLS as i32,
            self.top as i32 + line * PITCH_ROWS as i32,
        )
    }

    fn bottom(&self) -> u16 {
        self.top + self.size as u16 * PITCH_ROWS
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub struct App<R> {
    settings: Settings,
    layout: BoardLayout,
    puzzle: Puzzle<u32>,
    session: DragSession,
    anchor: Option<(u16, u16)>,
    rng: R,
}

impl<R: Rng> App<R> {
    pub fn new(settings: Settings, mut rng: R) -> Result<Self, PuzzleError> {
        let puzzle = new_puzzle(&settings, &mut rng)?;
        Ok(Self {
            layout: BoardLayout::new(settings.grid.dimension(), settings.metrics()),
            settings,
            puzzle,
            session: DragSession::Idle,
            anchor: None,
            rng,
        })
    }

    pub fn puzzle(&self) -> &Puzzle<u32> {
        &self.puzzle
    }

    pub fn session(&self) -> DragSession {
        self.session
    }

    pub fn new_game(&mut self) -> Result<(), PuzzleError> {
        self.puzzle = new_puzzle(&self.settings, &mut self.rng)?;
        self.session = DragSession::Idle;
        self.anchor = None;
        Ok(())
    }

    pub fn handle_mouse(&mut self, event: MouseEvent) {
        let cell = (event.column, event.row);
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if let Some(index) = self.layout.slot_at(cell.0, cell.1) {
                    self.session = DragSession::press(index);
                    self.anchor = Some(cell);
                }
            }
            MouseEventKind::Drag(MouseButton::Left) => {
                if let Some(anchor) = self.anchor {
                    let translation = self.layout.translation(anchor, cell);
                    let metrics = self.layout.metrics;
                    self.session = self.session.drag(&self.puzzle, translation, metrics);
                }
            }
            MouseEventKind::Up(MouseButton::Left) => {
                let (session, decision) =
                    self.session.release(&mut self.puzzle, self.layout.metrics);
                self.session = session;
                self.anchor = None;
                if decision == Release::Commit && self.puzzle.is_solved() {
                    info!(moves = self.puzzle.move_count(), "puzzle solved");
                }
            }
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> Result<Flow, PuzzleError> {
        if key.kind != KeyEventKind::Press {
            return Ok(Flow::Continue);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => Ok(Flow::Quit),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Ok(Flow::Quit),
            KeyCode::Char('r') => {
                self.new_game()?;
                Ok(Flow::Continue)
            }
            _ => Ok(Flow::Continue),
        }
    }

    pub fn draw<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let view = BoardView::new(&self.puzzle, &self.session);
        let grid = self.settings.grid;

        out.queue(terminal::Clear(ClearType::All))?;
        out.queue(cursor::MoveTo(0, 0))?;

        let header = format!(
            " PhotoFinish | {} {}x{} | Moves: {}",
            grid.label(),
            view.size,
            view.size,
            view.move_count
        );
        out.queue(style::Print(format!("\r\n{}\r\n", header.bold())))?;

        // Resting tiles first so the dragged one paints over its neighbours.
        let active = self.session.active_index();
        for (index, slot) in view.slots.iter().enumerate() {
            if Some(index) == active {
                continue;
            }
            if let Some(&label) = slot.tile {
                self.draw_tile(out, index, label, slot.offset)?;
            }
        }
        if let Some(index) = active {
            let slot = &view.slots[index];
            if let Some(&label) = slot.tile {
                self.draw_tile(out, index, label, slot.offset)?;
            }
        }

        let bottom = self.layout.bottom();
        if view.solved {
            out.queue(cursor::MoveTo(self.layout.left, bottom + 1))?;
            out.queue(style::Print("You Won!".green().bold()))?;
        }
        out.queue(cursor::MoveTo(self.layout.left, bottom + 3))?;
        out.queue(style::Print("drag tiles with the mouse | r: new game | q: quit".dim()))?;

        out.flush()
    }

    fn draw_tile<W: Write>(
        &self,
        out: &mut W,
        index: usize,
        label: u32,
        offset: Offset,
    ) -> io::Result<()> {
        let (x, y) = self.layout.slot_origin(index);
        let (dx, dy) = self.layout.cell_shift(offset);
        let (x, y) = (x + dx, y + dy);
        if x < 0 || y < 0 {
            return Ok(());
        }

        let color = tile_color(label, self.layout.size);
        for line in 0..TILE_ROWS {
            let content = if line == TILE_ROWS / 2 {
                format!("{:^width$}", label, width = TILE_COLS as usize)
            } else {
                " ".repeat(TILE_COLS as usize)
            };
            out.queue(cursor::MoveTo(x as u16, y as u16 + line))?;
            out.queue(style::Print(content.with(Color::Black).on(color)))?;
        }
        Ok(())
    }

    fn event_loop<W: Write>(&mut self, out: &mut W) -> Result<(), Box<dyn Error>> {
        loop {
            self.draw(out)?;
            match event::read()? {
                Event::Key(key) => {
                    if self.handle_key(key)? == Flow::Quit {
                        return Ok(());
                    }
                }
                Event::Mouse(mouse) => self.handle_mouse(mouse),
                _ => {}
            }
        }
    }
}

pub fn run<R: Rng>(settings: Settings, rng: R) -> Result<(), Box<dyn Error>> {
    let mut app = App::new(settings, rng)?;

    let _terminal = TerminalGuard::enter()?;
    app.event_loop(&mut io::stdout())
}

pub fn tile_labels(size: usize) -> Vec<u32> {
    (1..(size * size) as u32).collect()
}

pub fn new_puzzle<R: Rng + ?Sized>(
    settings: &Settings,
    rng: &mut R,
) -> Result<Puzzle<u32>, PuzzleError> {
    let size = settings.grid.dimension();
    let puzzle = Puzzle::shuffled(size, tile_labels(size), settings.shuffle_swaps, rng)?;
    info!(size, swaps = settings.shuffle_swaps, "new game");
    Ok(puzzle)
}

fn tile_color(label: u32, size: usize) -> Color {
    let home = label.saturating_sub(1) as usize;
    let span = size.saturating_sub(1).max(1);
    let col = home % size;
    let row = home / size;
    Color::Rgb {
        r: (60 + col * 160 / span) as u8,
        g: (80 + row * 150 / span) as u8,
        b: 170,
    }
}
