//! oasis - Terminal ambient soundscape player
//!
//! Run with: cargo run -- [soundscape]
//!
//! Logs go to `oasis.log` in the working directory so they do not tear the
//! terminal UI.

mod ui;

use std::{fs::File, sync::Mutex};

use color_eyre::eyre::{Result as EyreResult, WrapErr};
use oasis_dsp::{EngineConfig, SoundscapeEngine, SoundscapeKind};

use ui::App;

/// Samples buffered between the audio thread and the UI.
const TAP_CAPACITY: usize = 16_384;

fn main() -> EyreResult<()> {
    color_eyre::install()?;

    let log = File::create("oasis.log").wrap_err("failed to create oasis.log")?;
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(log))
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let autoplay = std::env::args()
        .nth(1)
        .map(|id| id.parse::<SoundscapeKind>())
        .transpose()?;

    let config = EngineConfig::default();
    let initial_volume = config.initial_volume;
    let mut engine = SoundscapeEngine::with_default_output(config)?;
    let audio_rx = engine.attach_tap(TAP_CAPACITY);

    // Opens the device so the UI knows the sample rate up front
    engine.set_volume(initial_volume);
    if let Some(kind) = autoplay {
        engine.play(kind, initial_volume)?;
    }

    let mut terminal = ratatui::init();
    let result = App::new(engine, audio_rx).run(&mut terminal);
    ratatui::restore();
    result
}
