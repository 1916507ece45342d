use std::io::{self, stdout, Stdout, Write};
use std::time::Duration;

use crossterm::event::{poll, read, Event, KeyEvent, KeyEventKind};
use crossterm::style::{self, Print, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{self, ClearType, EnterAlternateScreen, LeaveAlternateScreen};
use crossterm::{cursor, execute, queue};

use crate::display::{self, Color, MessageBox, Renderer, Screen};
use crate::tile::{Field, Tile};

/// Rows above the field reserved for the score line.
const HUD_ROWS: u16 = 1;
/// Terminal cells are about twice as tall as wide, so a tile spans two columns.
const CELLS_PER_TILE: u16 = 2;

const MESSAGE_FG: Color = Color::rgb(0, 0, 0);
const MESSAGE_BG: Color = Color::rgb(240, 240, 240);

#[derive(Copy, Clone, PartialEq)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

/// Where key events come from. Split out so the draining rules can be
/// exercised without a tty.
trait EventSource {
    fn pending(&mut self) -> io::Result<bool>;
    fn next(&mut self) -> io::Result<Event>;
}

struct CrosstermEvents;

impl EventSource for CrosstermEvents {
    fn pending(&mut self) -> io::Result<bool> {
        poll(Duration::ZERO)
    }

    fn next(&mut self) -> io::Result<Event> {
        read()
    }
}

/// Every key event already queued, presses and releases alike.
fn drain_keys<E: EventSource>(events: &mut E) -> io::Result<Vec<KeyEvent>> {
    let mut keys = vec![];

    while events.pending()? {
        if let Event::Key(ev) = events.next()? {
            keys.push(ev);
        }
    }

    Ok(keys)
}

/// Discards whatever is queued (held keys auto-repeat) and waits for a
/// press made after the call.
fn wait_for_fresh_press<E: EventSource>(events: &mut E) -> io::Result<KeyEvent> {
    drain_keys(events)?;

    loop {
        if let Event::Key(ev) = events.next()? {
            if ev.kind == KeyEventKind::Press {
                return Ok(ev);
            }
        }
    }
}

/// Terminal cells needed for `field`: two columns per tile, plus the
/// score row. Fails if that does not fit a terminal coordinate.
fn grid_extent(field: &Field) -> io::Result<(u16, u16)> {
    let too_big = || {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("a {}x{} field does not fit in a terminal", field.columns(), field.rows()),
        )
    };

    let width = u16::try_from(field.columns())
        .ok()
        .and_then(|c| c.checked_mul(CELLS_PER_TILE))
        .ok_or_else(too_big)?;
    let height = u16::try_from(field.rows())
        .ok()
        .and_then(|r| r.checked_add(HUD_ROWS))
        .ok_or_else(too_big)?;

    Ok((width, height))
}

struct Message {
    top_left: (u16, u16),
    width: u16,
    height: u16,
}

/// Crossterm-backed screen. Frames are composed in `screen` and written out
/// on `present`; messages are drawn over it without touching the buffer.
pub struct TermManager {
    width: u16,
    height: u16,
    stdout: Stdout,
    screen: Vec<Cell>,
    current_msg: Option<Message>,
}

impl TermManager {
    pub fn new(field: &Field) -> io::Result<Self> {
        let (width, height) = grid_extent(field)?;

        let (term_w, term_h) = terminal::size()?;
        if term_w < width || term_h < height {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                format!("terminal is {}x{}, the game needs at least {}x{}", term_w, term_h, width, height),
            ));
        }

        let blank = Cell { ch: ' ', fg: display::TEXT, bg: display::BACKGROUND };
        Ok(TermManager {
            width,
            height,
            stdout: stdout(),
            screen: vec![blank; width as usize * height as usize],
            current_msg: None,
        })
    }

    pub fn setup(&mut self) -> io::Result<()> {
        execute!(self.stdout, EnterAlternateScreen, cursor::Hide, cursor::DisableBlinking)?;
        terminal::enable_raw_mode()?;
        execute!(self.stdout, terminal::Clear(ClearType::All))
    }

    pub fn restore(&mut self) -> io::Result<()> {
        terminal::disable_raw_mode()?;
        execute!(
            self.stdout,
            style::ResetColor,
            cursor::Show,
            cursor::EnableBlinking,
            LeaveAlternateScreen
        )
    }

    pub fn read_key_blocking(&self) -> io::Result<KeyEvent> {
        wait_for_fresh_press(&mut CrosstermEvents)
    }

    pub fn read_key_events_queue(&self) -> io::Result<Vec<KeyEvent>> {
        drain_keys(&mut CrosstermEvents)
    }

    /// Draws a centered box of `lines` over the current frame.
    pub fn show_overlay(&mut self, lines: &[&str]) -> io::Result<()> {
        if self.has_message() {
            self.hide_message()?;
        }

        let msg_width = (lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) + 4) as u16;
        let msg_height = (lines.len() + 2) as u16;
        let msg_width = msg_width.min(self.width);
        let msg_height = msg_height.min(self.height);
        let top_left = ((self.width - msg_width) / 2, (self.height - msg_height) / 2);

        queue!(self.stdout, SetForegroundColor(to_term(MESSAGE_FG)), SetBackgroundColor(to_term(MESSAGE_BG)))?;
        for y_diff in 0..msg_height {
            let line = match y_diff {
                0 => "",
                d if d == msg_height - 1 => "",
                d => lines.get(d as usize - 1).copied().unwrap_or(""),
            };
            let padded: String = format!("{: ^width$}", line, width = msg_width as usize)
                .chars()
                .take(msg_width as usize)
                .collect();
            queue!(self.stdout, cursor::MoveTo(top_left.0, top_left.1 + y_diff), Print(padded))?;
        }

        self.current_msg = Some(Message { top_left, width: msg_width, height: msg_height });
        self.flush()
    }

    pub fn hide_message(&mut self) -> io::Result<()> {
        let msg = match self.current_msg.take() {
            Some(msg) => msg,
            None => return Ok(()),
        };

        for y in msg.top_left.1..msg.top_left.1 + msg.height {
            self.write_row(y, msg.top_left.0, msg.top_left.0 + msg.width)?;
        }

        self.flush()
    }

    pub fn has_message(&self) -> bool {
        self.current_msg.is_some()
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.stdout.flush()
    }

    ///////////////////////////////////////////////////////////////////////////

    fn set_cell(&mut self, x: u16, y: u16, cell: Cell) {
        if x < self.width && y < self.height {
            self.screen[self.width as usize * y as usize + x as usize] = cell;
        }
    }

    fn cell(&self, x: u16, y: u16) -> Cell {
        self.screen[self.width as usize * y as usize + x as usize]
    }

    fn write_row(&mut self, y: u16, from_x: u16, to_x: u16) -> io::Result<()> {
        queue!(self.stdout, cursor::MoveTo(from_x, y))?;

        let mut colors: Option<(Color, Color)> = None;
        for x in from_x..to_x {
            let cell = self.cell(x, y);
            if colors != Some((cell.fg, cell.bg)) {
                queue!(self.stdout, SetForegroundColor(to_term(cell.fg)), SetBackgroundColor(to_term(cell.bg)))?;
                colors = Some((cell.fg, cell.bg));
            }
            queue!(self.stdout, Print(cell.ch))?;
        }

        Ok(())
    }
}

impl Renderer for TermManager {
    fn clear(&mut self, color: Color) -> io::Result<()> {
        let blank = Cell { ch: ' ', fg: display::TEXT, bg: color };
        self.screen.iter_mut().for_each(|c| *c = blank);
        Ok(())
    }

    fn fill_rect(&mut self, tile: &Tile, color: Color) -> io::Result<()> {
        let (col, row) = tile.cell();
        let x = u16::try_from(col).ok().and_then(|c| c.checked_mul(CELLS_PER_TILE));
        let y = u16::try_from(row).ok().and_then(|r| r.checked_add(HUD_ROWS));
        let (x, y) = match (x, y) {
            (Some(x), Some(y)) => (x, y),
            _ => return Ok(()),
        };

        for dx in 0..CELLS_PER_TILE {
            if let Some(cx) = x.checked_add(dx) {
                self.set_cell(cx, y, Cell { ch: ' ', fg: color, bg: color });
            }
        }
        Ok(())
    }

    fn draw_text(&mut self, text: &str, color: Color, x: u16, y: u16) -> io::Result<()> {
        for (i, ch) in text.chars().enumerate() {
            let cx = match u16::try_from(i).ok().and_then(|i| x.checked_add(i)) {
                Some(cx) if cx < self.width && y < self.height => cx,
                _ => break,
            };
            let bg = self.cell(cx, y).bg;
            self.set_cell(cx, y, Cell { ch, fg: color, bg });
        }
        Ok(())
    }

    fn present(&mut self) -> io::Result<()> {
        for y in 0..self.height {
            self.write_row(y, 0, self.width)?;
        }

        // The frame just overwrote any message box.
        self.current_msg = None;
        self.flush()
    }
}

impl MessageBox for TermManager {
    fn show_message(&mut self, title: &str, body: &str) -> io::Result<()> {
        let mut lines = vec![title, ""];
        lines.extend(body.lines());
        lines.extend(["", "Press any key to continue"]);

        self.show_overlay(&lines)?;
        self.read_key_blocking()?;
        self.hide_message()
    }
}

impl Screen for TermManager {
    fn pending_keys(&mut self) -> io::Result<Vec<KeyEvent>> {
        self.read_key_events_queue()
    }

    fn show_paused(&mut self) -> io::Result<()> {
        self.show_overlay(&["Paused", "Press P to resume", "or Q to quit"])
    }

    fn hide_paused(&mut self) -> io::Result<()> {
        self.hide_message()
    }
}

fn to_term(color: Color) -> style::Color {
    style::Color::Rgb { r: color.r, g: color.g, b: color.b }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEventState, KeyModifiers};
    use std::collections::VecDeque;

    /// `queued` is what is already waiting when a call starts; `later`
    /// only shows up once the caller blocks.
    struct ScriptedEvents {
        queued: VecDeque<Event>,
        later: VecDeque<Event>,
    }

    impl EventSource for ScriptedEvents {
        fn pending(&mut self) -> io::Result<bool> {
            Ok(!self.queued.is_empty())
        }

        fn next(&mut self) -> io::Result<Event> {
            self.queued
                .pop_front()
                .or_else(|| self.later.pop_front())
                .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "script exhausted"))
        }
    }

    fn key(code: KeyCode, kind: KeyEventKind) -> Event {
        Event::Key(KeyEvent { code, modifiers: KeyModifiers::NONE, kind, state: KeyEventState::NONE })
    }

    #[test]
    fn held_keys_do_not_dismiss_a_dialog() {
        let mut events = ScriptedEvents {
            queued: VecDeque::from(vec![
                key(KeyCode::Right, KeyEventKind::Press),
                key(KeyCode::Right, KeyEventKind::Repeat),
                key(KeyCode::Right, KeyEventKind::Press),
            ]),
            later: VecDeque::from(vec![
                key(KeyCode::Right, KeyEventKind::Release),
                key(KeyCode::Enter, KeyEventKind::Press),
            ]),
        };

        let pressed = wait_for_fresh_press(&mut events).unwrap();

        assert_eq!(pressed.code, KeyCode::Enter);
        assert!(events.later.is_empty());
    }

    #[test]
    fn draining_returns_only_queued_keys() {
        let mut events = ScriptedEvents {
            queued: VecDeque::from(vec![
                key(KeyCode::Up, KeyEventKind::Press),
                Event::FocusGained,
                key(KeyCode::Char('p'), KeyEventKind::Press),
            ]),
            later: VecDeque::from(vec![key(KeyCode::Down, KeyEventKind::Press)]),
        };

        let codes: Vec<KeyCode> = drain_keys(&mut events).unwrap().into_iter().map(|k| k.code).collect();

        assert_eq!(codes, vec![KeyCode::Up, KeyCode::Char('p')]);
        assert_eq!(events.later.len(), 1);
    }

    #[test]
    fn classic_field_fits_in_an_80_column_terminal() {
        assert_eq!(grid_extent(&Field::new(800, 640, 20)).unwrap(), (80, 33));
    }

    #[test]
    fn oversized_fields_are_rejected_instead_of_wrapping() {
        let err = grid_extent(&Field::new(800_000, 640, 20)).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);

        assert!(grid_extent(&Field::new(20 * 40_000, 20, 20)).is_err());
        assert!(grid_extent(&Field::new(20, 20 * 65_535, 20)).is_err());
        assert!(TermManager::new(&Field::new(800_000, 640, 20)).is_err());
    }
}
