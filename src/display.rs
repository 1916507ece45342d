use std::io;

use crossterm::event::KeyEvent;

use crate::snake::Snake;
use crate::tile::Tile;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Color { r, g, b }
    }
}

pub const BACKGROUND: Color = Color::rgb(180, 180, 180);
pub const FRUIT: Color = Color::rgb(66, 93, 245);
pub const HEAD: Color = Color::rgb(0, 0, 0);
pub const TEXT: Color = Color::rgb(0, 0, 0);

const MIN_GREEN: i32 = 20;

/// Per-frame drawing surface.
pub trait Renderer {
    fn clear(&mut self, color: Color) -> io::Result<()>;
    fn fill_rect(&mut self, tile: &Tile, color: Color) -> io::Result<()>;
    /// `x`/`y` are in text cells, not field units.
    fn draw_text(&mut self, text: &str, color: Color, x: u16, y: u16) -> io::Result<()>;
    fn present(&mut self) -> io::Result<()>;
}

/// Modal notification. Returns once the player has seen it.
pub trait MessageBox {
    fn show_message(&mut self, title: &str, body: &str) -> io::Result<()>;
}

/// Everything the game loop needs from the player's side of the screen.
pub trait Screen: Renderer + MessageBox {
    /// Key events queued since the last call, without blocking.
    fn pending_keys(&mut self) -> io::Result<Vec<KeyEvent>>;
    fn show_paused(&mut self) -> io::Result<()>;
    fn hide_paused(&mut self) -> io::Result<()>;
}

/// Body colors from head to tail: green fading by `255 / len` per tile,
/// never below `MIN_GREEN`.
pub fn body_gradient(len: usize) -> impl Iterator<Item = Color> {
    let step = (255 / len.max(1) as i32).max(1);
    let first = (255 - step).max(MIN_GREEN);

    (0..len as i32).map(move |i| {
        let green = (first - step * i).max(MIN_GREEN);
        Color::rgb(0, green as u8, 0)
    })
}

/// clear -> fruit -> body -> head -> score -> present.
pub fn draw_frame<R: Renderer + ?Sized>(renderer: &mut R, snake: &Snake) -> io::Result<()> {
    renderer.clear(BACKGROUND)?;
    renderer.fill_rect(&snake.fruit().tile, FRUIT)?;

    for (tile, color) in snake.body().iter().zip(body_gradient(snake.len())) {
        renderer.fill_rect(tile, color)?;
    }

    renderer.fill_rect(&snake.head(), HEAD)?;
    renderer.draw_text(&format!("Score: {}", snake.len()), TEXT, 0, 0)?;
    renderer.present()
}
