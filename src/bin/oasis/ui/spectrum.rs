//! Spectrum analyzer widget
//!
//! Soundscapes are mostly low-frequency energy, so the display is
//! log-spaced from 20 Hz and smoothed over frames to keep noise readable.

use std::sync::Arc;

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    symbols,
    widgets::{Axis, Block, Borders, Chart, Dataset, GraphType},
    Frame,
};
use rustfft::{num_complex::Complex, Fft, FftPlanner};

/// Number of points on the display
const SPECTRUM_BINS: usize = 48;
const FLOOR_DB: f64 = -100.0;
/// Weight of the newest frame in the running average
const SMOOTHING: f64 = 0.3;

pub struct SpectrumAnalyzer {
    window: Vec<f32>,
    /// FFT bin range averaged into each display point
    bands: Vec<(usize, usize)>,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    /// (log10 of frequency, level in dB)
    spectrum: Vec<(f64, f64)>,
}

impl SpectrumAnalyzer {
    pub fn new(buffer_len: usize, sample_rate: f32) -> Self {
        let buffer_len = buffer_len.max(2);
        let fft = FftPlanner::new().plan_fft_forward(buffer_len);

        // Hann window
        let denom = (buffer_len - 1) as f32;
        let window = (0..buffer_len)
            .map(|i| 0.5 * (1.0 - (std::f32::consts::TAU * i as f32 / denom).cos()))
            .collect();

        let half = buffer_len / 2;
        let bin_hz = sample_rate as f64 / buffer_len as f64;
        let min_hz = 20.0f64;
        let max_hz = (sample_rate as f64 / 2.0).min(20_000.0).max(min_hz * 2.0);
        let step = (max_hz / min_hz).powf(1.0 / SPECTRUM_BINS as f64);

        let mut bands = Vec::with_capacity(SPECTRUM_BINS);
        let mut spectrum = Vec::with_capacity(SPECTRUM_BINS);
        for i in 0..SPECTRUM_BINS {
            let lo_hz = min_hz * step.powi(i as i32);
            let hi_hz = lo_hz * step;
            let lo = ((lo_hz / bin_hz).floor() as usize).clamp(1, half - 1);
            let hi = ((hi_hz / bin_hz).ceil() as usize).clamp(lo + 1, half);
            bands.push((lo, hi));
            spectrum.push(((lo_hz * hi_hz).sqrt().log10(), FLOOR_DB));
        }

        Self {
            window,
            bands,
            fft,
            scratch: vec![Complex::new(0.0, 0.0); buffer_len],
            spectrum,
        }
    }

    pub fn update(&mut self, buffer: &[f32]) {
        if buffer.len() != self.window.len() {
            return;
        }

        for ((slot, &sample), &w) in self.scratch.iter_mut().zip(buffer).zip(&self.window) {
            *slot = Complex::new(sample * w, 0.0);
        }
        self.fft.process(&mut self.scratch);

        for (point, &(lo, hi)) in self.spectrum.iter_mut().zip(&self.bands) {
            let power = self.scratch[lo..hi]
                .iter()
                .map(|bin| bin.norm_sqr())
                .sum::<f32>()
                / (hi - lo) as f32;
            let db = (10.0 * (power.max(1e-12) as f64).log10()).max(FLOOR_DB);
            point.1 += SMOOTHING * (db - point.1);
        }
    }

    pub fn data(&self) -> &[(f64, f64)] {
        &self.spectrum
    }
}

pub fn render_spectrum(frame: &mut Frame, area: Rect, spectrum: &[(f64, f64)]) {
    let block = Block::default()
        .title(" Spectrum ")
        .borders(Borders::ALL);

    let dataset = Dataset::default()
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(Color::Green))
        .data(spectrum);

    let (min_x, max_x) = spectrum
        .iter()
        .fold((f64::MAX, f64::MIN), |(lo, hi), &(x, _)| (lo.min(x), hi.max(x)));
    let max_db = spectrum.iter().map(|&(_, db)| db).fold(FLOOR_DB, f64::max);

    let chart = Chart::new(vec![dataset])
        .block(block)
        .x_axis(
            Axis::default()
                .bounds([min_x.min(max_x), max_x])
                .labels(vec!["20", "200", "2k", "20k"])
                .style(Style::default().fg(Color::DarkGray)),
        )
        .y_axis(
            Axis::default()
                .bounds([FLOOR_DB, max_db.max(0.0) + 10.0])
                .labels(vec!["-100", "-60", "-20", "0"])
                .style(Style::default().fg(Color::DarkGray)),
        );

    frame.render_widget(chart, area);
}
