//! Transport bar widget - shows play state, volume, output and level meters

use oasis_dsp::{PlaybackState, SoundscapeEngine};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

/// Ten-cell volume bar, e.g. `■■■■■□□□□□`
fn volume_bar(volume: f32) -> String {
    let filled = (volume * 10.0).round() as usize;
    (0..10).map(|i| if i < filled { '■' } else { '□' }).collect()
}

pub fn render_transport(
    frame: &mut Frame,
    area: Rect,
    engine: &SoundscapeEngine,
    audio_stats: &AudioStats,
    status: Option<&str>,
) {
    let block = Block::default()
        .title(" oasis ")
        .borders(Borders::ALL);

    let (symbol, label, color) = match engine.state() {
        PlaybackState::Playing(kind) => ("▶", kind.title(), Color::Green),
        PlaybackState::Idle => ("■", "Idle", Color::Yellow),
    };

    let output = match engine.sample_rate() {
        Some(rate) => format!("{:.1}kHz  ", rate / 1000.0),
        None => "no output  ".to_string(),
    };

    let mut spans = vec![
        Span::styled(format!(" {symbol} {label}  "), Style::default().fg(color)),
        Span::styled(
            format!("Vol {} {:.2}  ", volume_bar(engine.volume()), engine.volume()),
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(
            format!("Nodes: {}  Shreds: {}  ", engine.active_node_count(), engine.one_shot_count()),
            Style::default().fg(Color::White),
        ),
        Span::styled(output, Style::default().fg(Color::DarkGray)),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if let Some(message) = status {
        spans.push(Span::styled(
            format!("  ! {message}"),
            Style::default().fg(Color::Red),
        ));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(block);
    frame.render_widget(paragraph, area);
}
