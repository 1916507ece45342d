/// A square cell of the playing grid. Two tiles are the same tile when they
/// sit at the same position; `size` is uniform across a game.
#[derive(Debug, Copy, Clone)]
pub struct Tile {
    pub x: i32,
    pub y: i32,
    pub size: i32,
}

impl Tile {
    pub fn new(x: i32, y: i32, size: i32) -> Self {
        Tile { x, y, size }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Self {
        Tile { x: self.x + dx, y: self.y + dy, size: self.size }
    }

    /// Grid column/row of the tile.
    pub fn cell(&self) -> (i32, i32) {
        (self.x / self.size, self.y / self.size)
    }
}

impl PartialEq for Tile {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl Eq for Tile {}

/// Playing-field dimensions, in the same units as tile positions.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Field {
    pub width: i32,
    pub height: i32,
    pub tile_size: i32,
}

impl Field {
    pub fn new(width: i32, height: i32, tile_size: i32) -> Self {
        Field { width, height, tile_size }
    }

    pub fn contains(&self, tile: &Tile) -> bool {
        tile.x >= 0 && tile.y >= 0 && tile.x < self.width && tile.y < self.height
    }

    pub fn columns(&self) -> i32 {
        self.width / self.tile_size
    }

    pub fn rows(&self) -> i32 {
        self.height / self.tile_size
    }
}
