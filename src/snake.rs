use crate::fruit::{self, Fruit};
use crate::tile::{Field, Tile};

use log::{debug, info};
use rand::Rng;
use MoveResult::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Running,
    Paused,
    Ended,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Crash {
    Wall,
    SelfCollision,
}

#[derive(Debug, PartialEq, Eq)]
pub enum MoveResult {
    /// Plain movement, the tail tile was dropped.
    Moved { new_head: Tile, old_tail: Tile },
    /// The head landed on the fruit: the body grew and the fruit was relocated.
    Ate { new_head: Tile },
    /// Terminal transition. `score` is the body length at the moment of the crash.
    Crashed { cause: Crash, score: usize },
    /// Paused or already ended, nothing happened.
    Idle,
}

pub struct Snake {
    body: Vec<Tile>,
    dx: i32,
    dy: i32,
    state: State,
    field: Field,
    fruit: Fruit,
}

impl Snake {
    /// A single-tile snake at the origin heading right, with a fruit placed
    /// somewhere off its body.
    pub fn new<R: Rng + ?Sized>(field: Field, rng: &mut R) -> Self {
        let body = vec![Tile::new(0, 0, field.tile_size)];
        let fruit = fruit::place_random(rng, &field);
        let fruit = fruit::resolve_collision_with_body(rng, fruit, &body, &field);

        Snake { body, dx: field.tile_size, dy: 0, state: State::Running, field, fruit }
    }

    pub fn body(&self) -> &[Tile] {
        &self.body
    }

    pub fn head(&self) -> Tile {
        self.body[0]
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn fruit(&self) -> Fruit {
        self.fruit
    }

    #[cfg(test)]
    pub fn direction(&self) -> (i32, i32) {
        (self.dx, self.dy)
    }

    #[cfg(test)]
    pub fn state(&self) -> State {
        self.state
    }

    pub fn is_paused(&self) -> bool {
        self.state == State::Paused
    }

    pub fn toggle_pause(&mut self) {
        self.state = match self.state {
            State::Running => State::Paused,
            State::Paused => State::Running,
            State::Ended => State::Ended,
        };
        info!("pause toggled, now {:?}", self.state);
    }

    /// Points the snake along `axis`, towards the sign of `sign`.
    ///
    /// Ignored while paused or ended, for a zero `sign`, and when the body is
    /// longer than one tile and already moving along `axis` (this also rules
    /// out a direct reversal).
    pub fn set_direction(&mut self, axis: Axis, sign: i32) {
        if self.state != State::Running || sign == 0 {
            return;
        }

        let current = match axis {
            Axis::X => self.dx,
            Axis::Y => self.dy,
        };
        if current != 0 && self.body.len() > 1 {
            return;
        }

        let step = sign.signum() * self.field.tile_size;
        match axis {
            Axis::X => {
                self.dx = step;
                self.dy = 0;
            }
            Axis::Y => {
                self.dx = 0;
                self.dy = step;
            }
        }
    }

    pub fn advance_tick<R: Rng + ?Sized>(&mut self, rng: &mut R) -> MoveResult {
        if self.state != State::Running {
            return Idle;
        }

        let new_head = self.head().offset(self.dx, self.dy);

        let crash = if !self.field.contains(&new_head) {
            Some(Crash::Wall)
        } else if self.body.contains(&new_head) {
            Some(Crash::SelfCollision)
        } else {
            None
        };

        if let Some(cause) = crash {
            self.state = State::Ended;
            info!("crashed into {:?} at ({}, {})", cause, new_head.x, new_head.y);
            return Crashed { cause, score: self.body.len() };
        }

        self.body.insert(0, new_head);

        if new_head != self.fruit.tile {
            let old_tail = self.body.pop().unwrap_or(new_head);
            return Moved { new_head, old_tail };
        }

        let placed = fruit::place_random(rng, &self.field);
        self.fruit = fruit::resolve_collision_with_body(rng, placed, &self.body, &self.field);
        debug!("fruit eaten, length {}, next fruit at ({}, {})", self.body.len(), self.fruit.tile.x, self.fruit.tile.y);

        Ate { new_head }
    }

    #[cfg(test)]
    pub(crate) fn from_parts(body: Vec<Tile>, direction: (i32, i32), fruit: Tile, field: Field) -> Self {
        Snake {
            body,
            dx: direction.0,
            dy: direction.1,
            state: State::Running,
            field,
            fruit: Fruit { tile: fruit },
        }
    }
}
