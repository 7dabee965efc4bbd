//! Character-cell output and key input.
//!
//! A [`Surface`] turns `(col, row, char, style)` writes into screen cells,
//! with row 0 at the top. The crossterm implementations drive a real
//! terminal; the headless ones back tests and offscreen rendering.

use std::collections::VecDeque;
use std::io::{self, Stdout, Write};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use crossterm::style::{self, Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::{cursor, execute, queue, terminal};
use parking_lot::Mutex;
use tracing::warn;

use crate::data_types::{CellStyle, Color};

pub trait Surface: Send {
    /// `(cols, rows)`.
    fn size(&self) -> io::Result<(u16, u16)>;
    fn put(&mut self, col: u16, row: u16, ch: char, style: CellStyle) -> io::Result<()>;
    fn clear(&mut self) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
}

pub trait KeySource: Send {
    /// Waits at most `timeout` for one key press.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<KeyCode>>;
}

fn to_crossterm(color: Color) -> style::Color {
    match color {
        Color::Red => style::Color::DarkRed,
        Color::Green => style::Color::DarkGreen,
        Color::Yellow => style::Color::DarkYellow,
        Color::Blue => style::Color::DarkBlue,
        Color::Magenta => style::Color::DarkMagenta,
        Color::Cyan => style::Color::DarkCyan,
        Color::White => style::Color::Grey,
        Color::Black => style::Color::Black,
    }
}

/// Terminal surface on stdout. Raw mode and the alternate screen are held
/// for the lifetime of the value and restored on drop.
pub struct CrosstermSurface {
    out: Stdout,
}

impl CrosstermSurface {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { out })
    }
}

impl Surface for CrosstermSurface {
    fn size(&self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn put(&mut self, col: u16, row: u16, ch: char, style: CellStyle) -> io::Result<()> {
        queue!(
            self.out,
            cursor::MoveTo(col, row),
            SetAttribute(Attribute::Reset),
            SetForegroundColor(to_crossterm(style.fg)),
            SetBackgroundColor(to_crossterm(style.bg))
        )?;
        if style.reverse {
            queue!(self.out, SetAttribute(Attribute::Reverse))?;
        }
        if style.dim {
            queue!(self.out, SetAttribute(Attribute::Dim))?;
        }
        queue!(self.out, Print(ch))
    }

    fn clear(&mut self) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetBackgroundColor(to_crossterm(Color::Black)),
            terminal::Clear(terminal::ClearType::All)
        )
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }
}

impl Drop for CrosstermSurface {
    fn drop(&mut self) {
        if let Err(e) = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen) {
            warn!("failed to leave alternate screen: {e}");
        }
        if let Err(e) = terminal::disable_raw_mode() {
            warn!("failed to disable raw mode: {e}");
        }
    }
}

/// Key presses from the terminal. Key releases and non-key events are ignored.
#[derive(Debug, Default)]
pub struct CrosstermKeys;

impl KeySource for CrosstermKeys {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<KeyCode>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key) if key.kind != KeyEventKind::Release => Ok(Some(key.code)),
            _ => Ok(None),
        }
    }
}

#[derive(Debug)]
struct Screen {
    cols: u16,
    rows: u16,
    cells: Vec<(char, CellStyle)>,
    flushes: usize,
}

impl Screen {
    fn blank(cols: u16, rows: u16) -> Self {
        Self {
            cols,
            rows,
            cells: vec![(' ', CellStyle::default()); cols as usize * rows as usize],
            flushes: 0,
        }
    }

    fn offset(&self, col: u16, row: u16) -> Option<usize> {
        (col < self.cols && row < self.rows).then(|| row as usize * self.cols as usize + col as usize)
    }
}

/// In-memory surface. Clones share the same cells, so a test can keep a
/// handle while the backend owns another.
#[derive(Clone, Debug)]
pub struct HeadlessSurface {
    screen: Arc<Mutex<Screen>>,
}

impl HeadlessSurface {
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            screen: Arc::new(Mutex::new(Screen::blank(cols, rows))),
        }
    }

    /// Changes the reported size and blanks the screen.
    pub fn resize(&self, cols: u16, rows: u16) {
        *self.screen.lock() = Screen::blank(cols, rows);
    }

    pub fn char_at(&self, col: u16, row: u16) -> Option<char> {
        let screen = self.screen.lock();
        screen.offset(col, row).map(|i| screen.cells[i].0)
    }

    pub fn style_at(&self, col: u16, row: u16) -> Option<CellStyle> {
        let screen = self.screen.lock();
        screen.offset(col, row).map(|i| screen.cells[i].1)
    }

    /// Row `row` (counted from the top) as text.
    pub fn row_text(&self, row: u16) -> String {
        let screen = self.screen.lock();
        (0..screen.cols)
            .filter_map(|col| screen.offset(col, row).map(|i| screen.cells[i].0))
            .collect()
    }

    pub fn contents(&self) -> Vec<String> {
        let rows = self.screen.lock().rows;
        (0..rows).map(|r| self.row_text(r)).collect()
    }

    pub fn flush_count(&self) -> usize {
        self.screen.lock().flushes
    }
}

impl Surface for HeadlessSurface {
    fn size(&self) -> io::Result<(u16, u16)> {
        let screen = self.screen.lock();
        Ok((screen.cols, screen.rows))
    }

    fn put(&mut self, col: u16, row: u16, ch: char, style: CellStyle) -> io::Result<()> {
        let mut screen = self.screen.lock();
        let Some(i) = screen.offset(col, row) else {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("cell {col},{row} is off screen"),
            ));
        };
        screen.cells[i] = (ch, style);
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        let mut screen = self.screen.lock();
        let (cols, rows, flushes) = (screen.cols, screen.rows, screen.flushes);
        *screen = Screen::blank(cols, rows);
        screen.flushes = flushes;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.screen.lock().flushes += 1;
        Ok(())
    }
}

/// Replays a fixed list of keys. Clones share the queue, so more keys can be
/// pushed while a listener thread owns another handle.
#[derive(Clone, Debug, Default)]
pub struct ScriptedKeys {
    keys: Arc<Mutex<VecDeque<KeyCode>>>,
}

impl ScriptedKeys {
    pub fn new(keys: impl IntoIterator<Item = KeyCode>) -> Self {
        Self {
            keys: Arc::new(Mutex::new(keys.into_iter().collect())),
        }
    }

    pub fn push(&self, key: KeyCode) {
        self.keys.lock().push_back(key);
    }

    pub fn remaining(&self) -> usize {
        self.keys.lock().len()
    }
}

impl KeySource for ScriptedKeys {
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<KeyCode>> {
        let key = self.keys.lock().pop_front();
        if key.is_none() {
            thread::sleep(timeout);
        }
        Ok(key)
    }
}
