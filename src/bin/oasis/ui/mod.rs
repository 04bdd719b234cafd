//! TUI for oasis
//!
//! A soundscape picker with live waveform and spectrum of the output.

mod soundscapes;
mod spectrum;
mod transport;
mod waveform;

use std::time::Duration;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use oasis_dsp::{PlaybackState, SoundscapeEngine, SoundscapeKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use rtrb::Consumer;

use soundscapes::render_soundscapes;
use spectrum::{render_spectrum, SpectrumAnalyzer};
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;

const VOLUME_STEP: f32 = 0.05;

pub struct App {
    engine: SoundscapeEngine,
    /// Ring buffer receiver for rendered output samples
    audio_rx: Consumer<f32>,
    audio_buffer: Vec<f32>,
    spectrum: SpectrumAnalyzer,
    selected: usize,
    /// Last error, shown until the next successful action
    status: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(engine: SoundscapeEngine, audio_rx: Consumer<f32>) -> Self {
        let sample_rate = engine.sample_rate().unwrap_or(48_000.0);
        Self {
            engine,
            audio_rx,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            spectrum: SpectrumAnalyzer::new(VIS_BUFFER_SIZE, sample_rate),
            selected: 0,
            status: None,
            should_quit: false,
        }
    }

    pub fn run(mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        if let PlaybackState::Playing(kind) = self.engine.state() {
            self.selected = SoundscapeKind::ALL
                .iter()
                .position(|&k| k == kind)
                .unwrap_or(0);
        }

        while !self.should_quit {
            self.poll_audio();
            self.spectrum.update(&self.audio_buffer);

            terminal.draw(|frame| self.render(frame))?;

            // ~60fps
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.engine.stop();
        Ok(())
    }

    /// Drain the tap, keeping the last VIS_BUFFER_SIZE samples
    fn poll_audio(&mut self) {
        let available = self.audio_rx.slots();
        if available == 0 {
            return;
        }
        if let Ok(chunk) = self.audio_rx.read_chunk(available) {
            let (first, second) = chunk.as_slices();
            self.audio_buffer.extend_from_slice(first);
            self.audio_buffer.extend_from_slice(second);
            chunk.commit_all();
        }
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        let count = SoundscapeKind::ALL.len();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected = (self.selected + count - 1) % count;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.selected = (self.selected + 1) % count;
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                let kind = SoundscapeKind::ALL[self.selected];
                let volume = self.engine.volume();
                let result = self.engine.toggle(kind, volume).map(|_| ());
                self.report(result);
            }
            KeyCode::Char('+') | KeyCode::Char('=') => {
                self.engine.set_volume(self.engine.volume() + VOLUME_STEP);
            }
            KeyCode::Char('-') | KeyCode::Char('_') => {
                self.engine.set_volume(self.engine.volume() - VOLUME_STEP);
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                let result = self.engine.play_one_shot();
                self.report(result);
            }
            _ => {}
        }
    }

    fn report(&mut self, result: Result<(), oasis_dsp::EngineError>) {
        self.status = match result {
            Ok(()) => None,
            Err(err) => {
                tracing::warn!(error = %err, "control action failed");
                Some(err.to_string())
            }
        };
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Transport bar
                Constraint::Min(9),    // Soundscapes + scopes
                Constraint::Length(1), // Help bar
            ])
            .split(area);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(rows[1]);

        let scopes = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(columns[1]);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(
            frame,
            rows[0],
            &self.engine,
            &stats,
            self.status.as_deref(),
        );
        render_soundscapes(frame, columns[0], self.selected, self.engine.state());
        render_waveform(frame, scopes[0], &self.audio_buffer);
        render_spectrum(frame, scopes[1], self.spectrum.data());

        let help = Paragraph::new(
            " [↑/↓] Select  [Enter] Play/Stop  [+/-] Volume  [S] Shred  [Q] Quit",
        )
        .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, rows[2]);
    }
}
