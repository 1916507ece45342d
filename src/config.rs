use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::tile::Field;

pub const MAX_SPEED: u32 = 50;

/// Everything a game needs, fixed for its lifetime.
#[derive(Debug, Clone)]
pub struct GameConfig {
    pub player_name: String,
    pub tick: Duration,
    pub field: Field,
    pub score_file: PathBuf,
    pub assets: PathBuf,
}

impl GameConfig {
    /// `speed` is a divisor of one second, in `1..=MAX_SPEED`. The tile size
    /// must split the field into whole tiles. The player name becomes one
    /// line of the score log, so it may not contain line breaks.
    pub fn new(player_name: &str, speed: u32, field: Field) -> Result<Self> {
        if player_name.contains(['\n', '\r']) {
            bail!("player name {:?} must not contain line breaks", player_name);
        }
        if speed == 0 || speed > MAX_SPEED {
            bail!("invalid speed {} (0 < speed <= {})", speed, MAX_SPEED);
        }
        if field.tile_size <= 0 {
            bail!("tile size must be positive, got {}", field.tile_size);
        }
        if field.width <= 0 || field.height <= 0 {
            bail!("field must not be empty, got {}x{}", field.width, field.height);
        }
        if field.width % field.tile_size != 0 || field.height % field.tile_size != 0 {
            bail!(
                "tile size {} does not divide the {}x{} field",
                field.tile_size,
                field.width,
                field.height
            );
        }

        Ok(GameConfig {
            player_name: player_name.to_string(),
            tick: Duration::from_millis(1000 / speed as u64),
            field,
            score_file: PathBuf::from("highscore"),
            assets: PathBuf::from("assets"),
        })
    }

    pub fn sound(&self, name: &str) -> PathBuf {
        self.assets.join(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tick_is_derived_from_speed() {
        let field = Field::new(800, 640, 20);
        assert_eq!(GameConfig::new("p", 20, field).unwrap().tick, Duration::from_millis(50));
        assert_eq!(GameConfig::new("p", 1, field).unwrap().tick, Duration::from_millis(1000));
        assert_eq!(GameConfig::new("p", 50, field).unwrap().tick, Duration::from_millis(20));
        assert_eq!(GameConfig::new("p", 3, field).unwrap().tick, Duration::from_millis(333));
    }

    #[test]
    fn speed_must_be_in_range() {
        let field = Field::new(800, 640, 20);
        assert!(GameConfig::new("p", 0, field).is_err());
        assert!(GameConfig::new("p", 51, field).is_err());
    }

    #[test]
    fn tiles_must_divide_the_field() {
        assert!(GameConfig::new("p", 10, Field::new(810, 640, 20)).is_err());
        assert!(GameConfig::new("p", 10, Field::new(800, 630, 20)).is_err());
        assert!(GameConfig::new("p", 10, Field::new(800, 640, 0)).is_err());
        assert!(GameConfig::new("p", 10, Field::new(0, 640, 20)).is_err());
    }

    #[test]
    fn defaults_match_the_classic_layout() {
        let config = GameConfig::new("zoe", 10, Field::new(800, 640, 20)).unwrap();
        assert_eq!(config.player_name, "zoe");
        assert_eq!(config.score_file, PathBuf::from("highscore"));
        assert_eq!(config.sound("crunch.wav"), PathBuf::from("assets/crunch.wav"));
    }

    #[test]
    fn names_with_line_breaks_are_rejected() {
        let field = Field::new(800, 640, 20);
        assert!(GameConfig::new("ann\nbob:99", 10, field).is_err());
        assert!(GameConfig::new("ann\r", 10, field).is_err());
        assert!(GameConfig::new("ann bob", 10, field).is_ok());
    }
}
