use std::io;
use std::thread::sleep;
use std::time::Instant;

use log::{debug, error, info};
use rand::Rng;

use crate::audio::{Audio, EAT_SOUND, LOSE_SOUND};
use crate::config::GameConfig;
use crate::display::{draw_frame, MessageBox, Screen};
use crate::input::{translate_key, KeyAction};
use crate::scores::{self, ScoreError, ScoreLog, ScoreRecord};
use crate::snake::{MoveResult::*, Snake};

const LEADERBOARD_SIZE: usize = 5;

#[derive(Debug)]
pub struct GameOver {
    pub score: usize,
    /// Set when the score could not be saved or the leaderboard not read.
    pub persist_error: Option<ScoreError>,
}

#[derive(Debug)]
pub enum Exit {
    Quit,
    Over(GameOver),
}

pub struct SnakeGame<S, A, R> {
    config: GameConfig,
    screen: S,
    audio: A,
    scores: Option<ScoreLog>,
    snake: Snake,
    rng: R,
}

impl<S: Screen, A: Audio, R: Rng> SnakeGame<S, A, R> {
    pub fn new(config: GameConfig, screen: S, audio: A, scores: Option<ScoreLog>, mut rng: R) -> Self {
        let snake = Snake::new(config.field, &mut rng);
        SnakeGame { config, screen, audio, scores, snake, rng }
    }

    pub fn screen_mut(&mut self) -> &mut S {
        &mut self.screen
    }

    /// Runs until the player quits or the snake crashes.
    pub fn play(&mut self) -> io::Result<Exit> {
        draw_frame(&mut self.screen, &self.snake)?;

        loop {
            let tick_start = Instant::now();

            let keys: Vec<KeyAction> = self
                .screen
                .pending_keys()?
                .iter()
                .map(|key_ev| {
                    let action = translate_key(key_ev);
                    if action == KeyAction::None {
                        debug!("ignored key {:?}", key_ev.code);
                    }
                    action
                })
                .collect();

            if let Some(exit) = self.tick(&keys)? {
                return Ok(exit);
            }

            let elapsed = tick_start.elapsed();
            if elapsed < self.config.tick {
                sleep(self.config.tick - elapsed);
            }
        }
    }

    /// One step of the loop: apply `keys` in order, then move and redraw
    /// unless paused.
    pub fn tick(&mut self, keys: &[KeyAction]) -> io::Result<Option<Exit>> {
        for key in keys {
            match *key {
                KeyAction::Quit => {
                    info!("player quit at length {}", self.snake.len());
                    return Ok(Some(Exit::Quit));
                }
                KeyAction::TogglePause => self.toggle_pause()?,
                KeyAction::Turn(axis, sign) => {
                    if !self.snake.is_paused() {
                        self.snake.set_direction(axis, sign);
                    }
                }
                KeyAction::None => {}
            }
        }

        if self.snake.is_paused() {
            return Ok(None);
        }

        match self.snake.advance_tick(&mut self.rng) {
            Ate { .. } => self.audio.play(&self.config.sound(EAT_SOUND)),
            Crashed { cause, score } => {
                debug!("run ended by {:?}", cause);
                let over = end_game(&mut self.screen, &self.audio, self.scores.as_mut(), &self.config, score)?;
                return Ok(Some(Exit::Over(over)));
            }
            Moved { .. } | Idle => {}
        }

        draw_frame(&mut self.screen, &self.snake)?;
        Ok(None)
    }

    fn toggle_pause(&mut self) -> io::Result<()> {
        self.snake.toggle_pause();

        if self.snake.is_paused() {
            self.screen.show_paused()
        } else {
            self.screen.hide_paused()
        }
    }
}

/// Lose cue, score message, then (if the log is available) save the score
/// and show the leaderboard. Persistence problems are logged and returned,
/// they never stop the sequence.
pub fn end_game<M, A>(
    messages: &mut M,
    audio: &A,
    scores: Option<&mut ScoreLog>,
    config: &GameConfig,
    score: usize,
) -> io::Result<GameOver>
where
    M: MessageBox + ?Sized,
    A: Audio + ?Sized,
{
    audio.play(&config.sound(LOSE_SOUND));
    info!("game over for {} with score {}", config.player_name, score);

    messages.show_message("You lost!", &format!("Your score is {}", score))?;

    let log = match scores {
        Some(log) => log,
        None => {
            error!("score log unavailable, score not recorded");
            return Ok(GameOver { score, persist_error: None });
        }
    };

    let score_value = u32::try_from(score).unwrap_or(u32::MAX);
    match record_and_rank(log, &config.player_name, score_value) {
        Ok(best) => {
            messages.show_message("Your score", &leaderboard_text(&best))?;
            Ok(GameOver { score, persist_error: None })
        }
        Err(e) => {
            error!("unable to record score: {}", e);
            Ok(GameOver { score, persist_error: Some(e) })
        }
    }
}

fn record_and_rank(log: &mut ScoreLog, name: &str, score: u32) -> Result<Vec<ScoreRecord>, ScoreError> {
    log.append(name, score)?;
    Ok(scores::top(log.read_all()?, LEADERBOARD_SIZE))
}

pub fn leaderboard_text(best: &[ScoreRecord]) -> String {
    let mut text = String::from("The five highest scores are:\n");
    for record in best {
        text.push_str(&format!("{} ({})\n", record.score, record.name));
    }
    text
}
