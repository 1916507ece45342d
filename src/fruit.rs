use crate::tile::{Field, Tile};

use rand::Rng;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Fruit {
    pub tile: Tile,
}

/// Picks a random tile-aligned position inside the field.
///
/// The index range on each axis is `0..=(dimension / tile_size - 1)`, so
/// the fruit always lies fully inside the field.
pub fn place_random<R: Rng + ?Sized>(rng: &mut R, field: &Field) -> Fruit {
    let size = field.tile_size;
    let max_col = (field.columns() - 1).max(0);
    let max_row = (field.rows() - 1).max(0);

    let x = rng.gen_range(0..=max_col) * size;
    let y = rng.gen_range(0..=max_row) * size;

    Fruit { tile: Tile::new(x, y, size) }
}

/// Moves `fruit` until it no longer overlaps `body`.
///
/// A fruit at least one tile away from the origin on both axes is nudged one
/// tile diagonally towards it; otherwise a fresh random position is drawn.
/// Never returns if the body covers every reachable tile.
pub fn resolve_collision_with_body<R: Rng + ?Sized>(
    rng: &mut R,
    mut fruit: Fruit,
    body: &[Tile],
    field: &Field,
) -> Fruit {
    let size = field.tile_size;

    while body.contains(&fruit.tile) {
        if fruit.tile.x >= size && fruit.tile.y >= size {
            fruit.tile = fruit.tile.offset(-size, -size);
        } else {
            fruit = place_random(rng, field);
        }
    }

    fruit
}
