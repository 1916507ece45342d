mod audio;
mod config;
mod display;
mod fruit;
mod game;
mod input;
mod scores;
mod snake;
mod term;
mod tile;

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, info, LevelFilter};
use simplelog::WriteLogger;

use crate::audio::WavAudio;
use crate::config::{GameConfig, MAX_SPEED};
use crate::game::{Exit, SnakeGame};
use crate::scores::ScoreLog;
use crate::term::TermManager;
use crate::tile::Field;

#[derive(Parser)]
#[command(name = "gridsnake")]
#[command(version, about = "Grid snake with a persistent high score table")]
struct Cli {
    /// Name saved next to your score
    player_name: String,

    /// Speed divisor: one tick every 1000/SPEED ms (1..=50)
    #[arg(value_parser = clap::value_parser!(u32).range(1..=MAX_SPEED as i64))]
    speed: u32,

    /// Field width
    #[arg(long, default_value_t = 800)]
    width: i32,

    /// Field height
    #[arg(long, default_value_t = 640)]
    height: i32,

    /// Tile edge length, must divide width and height
    #[arg(long, default_value_t = 20)]
    tile_size: i32,

    /// High score log
    #[arg(long, default_value = "highscore")]
    score_file: PathBuf,

    /// Directory holding crunch.wav and lose_sound.wav
    #[arg(long, default_value = "assets")]
    assets: PathBuf,

    #[arg(long, default_value = "snake.log")]
    log_file: PathBuf,

    /// Log at debug level
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { LevelFilter::Debug } else { LevelFilter::Info };
    let log_file = File::create(&cli.log_file)
        .with_context(|| format!("Failed to create log file {}", cli.log_file.display()))?;
    WriteLogger::init(level, simplelog::Config::default(), log_file).context("Failed to initialize logger")?;

    let field = Field::new(cli.width, cli.height, cli.tile_size);
    let mut config = GameConfig::new(&cli.player_name, cli.speed, field)?;
    config.score_file = cli.score_file;
    config.assets = cli.assets;
    info!("starting: {:?}", config);

    let scores = match ScoreLog::open(&config.score_file) {
        Ok(log) => Some(log),
        Err(e) => {
            error!("unable to open {}: {}", config.score_file.display(), e);
            eprintln!("unable to open highscore file {}: {}", config.score_file.display(), e);
            None
        }
    };

    let mut term = TermManager::new(&config.field).context("Failed to open terminal")?;
    term.setup().context("Failed to set up terminal")?;

    let mut game = SnakeGame::new(config, term, WavAudio, scores, rand::thread_rng());

    let outcome = game.play();
    game.screen_mut().restore().context("Failed to restore terminal")?;

    match outcome.context("Game loop failed")? {
        Exit::Quit => info!("quit"),
        Exit::Over(over) => {
            println!("Final score: {}", over.score);
            if let Some(e) = over.persist_error {
                eprintln!("error: unable to write score to the highscore file: {}", e);
            }
        }
    }

    Ok(())
}
