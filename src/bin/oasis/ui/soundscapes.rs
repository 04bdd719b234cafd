//! Soundscape picker

use oasis_dsp::{PlaybackState, SoundscapeKind};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
    Frame,
};

pub fn render_soundscapes(frame: &mut Frame, area: Rect, selected: usize, state: PlaybackState) {
    let block = Block::default()
        .title(" Soundscapes ")
        .borders(Borders::ALL);

    let items: Vec<ListItem> = SoundscapeKind::ALL
        .iter()
        .map(|&kind| {
            let playing = state == PlaybackState::Playing(kind);
            let marker = if playing { "♪ " } else { "  " };
            let title_style = if playing {
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Green)),
                    Span::styled(kind.title(), title_style),
                ]),
                Line::from(Span::styled(
                    format!("  {}", kind.description()),
                    Style::default().fg(Color::DarkGray),
                )),
            ])
        })
        .collect();

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::Rgb(30, 40, 50)))
        .highlight_symbol("▸");

    let mut list_state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}
