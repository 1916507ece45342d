use std::fs::File;
use std::io::{stdout, BufReader, Write};
use std::path::{Path, PathBuf};
use std::thread;

use anyhow::{Context, Result};
use log::{debug, warn};
use rodio::{Decoder, OutputStream, Sink};

pub const EAT_SOUND: &str = "crunch.wav";
pub const LOSE_SOUND: &str = "lose_sound.wav";

/// Fire-and-forget sound cues. Callers never learn whether playback worked.
pub trait Audio {
    fn play(&self, sound: &Path);
}

/// Decodes and plays sound files on a detached thread per cue. Falls back to
/// the terminal bell when the file or the output device is unavailable.
pub struct WavAudio;

impl Audio for WavAudio {
    fn play(&self, sound: &Path) {
        let sound: PathBuf = sound.to_path_buf();

        // Never joined.
        thread::spawn(move || match play_to_end(&sound) {
            Ok(()) => debug!("played {}", sound.display()),
            Err(e) => {
                warn!("{:#}, ringing the bell instead", e);
                ring_bell();
            }
        });
    }
}

fn decode(sound: &Path) -> Result<Decoder<BufReader<File>>> {
    let file = File::open(sound).with_context(|| format!("unable to open {}", sound.display()))?;
    Decoder::new(BufReader::new(file)).with_context(|| format!("unable to decode {}", sound.display()))
}

/// Blocks the calling thread until the sound has finished.
fn play_to_end(sound: &Path) -> Result<()> {
    let source = decode(sound)?;

    // The stream must outlive the sink.
    let (_stream, handle) = OutputStream::try_default().context("no audio output device")?;
    let sink = Sink::try_new(&handle).context("unable to open audio sink")?;
    sink.append(source);
    sink.sleep_until_end();

    Ok(())
}

fn ring_bell() {
    let mut out = stdout();
    if let Err(e) = out.write_all(b"\x07").and_then(|_| out.flush()) {
        warn!("unable to ring bell: {}", e);
    }
}
