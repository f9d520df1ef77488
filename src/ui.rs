//! UI rendering helpers for the terminal user interface.
//!
//! This module contains functions to render the TUI using `ratatui`: the
//! spectrum pane, the now-playing box with progress and volume slider, and
//! the playlist. The whole frame is redrawn on every event-loop pass, so the
//! spectrum pane re-derives its cell dimensions from the current terminal
//! area each time and survives resizes for free.

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, List, ListItem, Padding, Paragraph},
};
use std::time::Duration;

use crate::app::{App, IconTier, PlaybackState};
use crate::audio::{SPECTRUM_BANDS, SessionInfo};
use crate::config::UiSettings;

/// Base bar color; brightness scales with band magnitude.
const BAR_R: u8 = 128;
const BAR_B: u8 = 32;

/// Width of the volume slider affordance in cells.
const SLIDER_WIDTH: usize = 20;

/// Eighth-block glyphs for the partial top cell of a bar.
const PARTIALS: [char; 7] = ['▁', '▂', '▃', '▄', '▅', '▆', '▇'];

/// Format a `Duration` as `MM:SS`.
fn format_mmss(d: Duration) -> String {
    let secs = d.as_secs();
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

fn controls_text(player_visible: bool) -> &'static str {
    if player_visible {
        "[space] play/pause | [h/l ←/→] prev/next | [↑/↓] volume | [m] mute | [0-9] seek | [x/esc] dismiss | [q] quit"
    } else {
        "[j/k] move | [enter] play | [g/G] top/bottom | [q] quit"
    }
}

/// Map a band magnitude in [0, 1] to the bar color, intensity-scaled.
fn bar_color(value: f32) -> Color {
    let r = f32::from(BAR_R) + f32::from(u8::MAX - BAR_R) * value;
    Color::Rgb(r.round() as u8, 0, BAR_B)
}

/// Render the frequency bars into `area` (inside the pane border).
///
/// Column count and row count come from the area itself, so a resize simply
/// changes the sampling of the fixed 32-band snapshot. Missing data (no
/// spectrum handle yet) draws empty bars.
fn spectrum_lines(app: &App, area: Rect) -> Vec<Line<'static>> {
    let bands = app
        .spectrum_handle
        .as_ref()
        .and_then(|h| h.lock().ok().map(|f| f.bands))
        .unwrap_or([0.0; SPECTRUM_BANDS]);

    let w = area.width as usize;
    let h = area.height as usize;
    if w == 0 || h == 0 {
        return Vec::new();
    }

    let mut lines: Vec<Line> = Vec::with_capacity(h);
    for row in 0..h {
        let mut spans: Vec<Span> = Vec::with_capacity(w);
        for col in 0..w {
            let band = bands[col * SPECTRUM_BANDS / w];
            // Height of this bar in eighths of a cell.
            let eighths = (band * (h as f32) * 8.0).round() as usize;
            let below = (h - 1 - row) * 8;
            let fill = eighths.saturating_sub(below).min(8);

            let ch = match fill {
                0 => ' ',
                8 => '█',
                n => PARTIALS[n - 1],
            };
            spans.push(Span::styled(
                ch.to_string(),
                Style::default().fg(bar_color(band)),
            ));
        }
        lines.push(Line::from(spans));
    }
    lines
}

fn volume_line(app: &App) -> Line<'static> {
    let (label, style) = match app.volume.icon_tier() {
        IconTier::Silent => (
            "vol",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::DIM),
        ),
        IconTier::Low => ("vol", Style::default().fg(Color::Gray)),
        IconTier::Full => ("vol", Style::default().fg(Color::White)),
    };

    let fill = app.volume.fill_ratio();
    let filled = (fill * SLIDER_WIDTH as f32).round() as usize;
    let mut slider = String::with_capacity(SLIDER_WIDTH);
    for i in 0..SLIDER_WIDTH {
        slider.push(if i < filled { '█' } else { '░' });
    }

    let suffix = if app.volume.muted() {
        " muted".to_string()
    } else {
        format!(" {:3.0}%", fill * 100.0)
    };

    Line::from(vec![
        Span::styled(format!("{label} "), style),
        Span::raw(slider),
        Span::raw(suffix),
    ])
}

fn now_playing_line(app: &App, session: &SessionInfo) -> Line<'static> {
    let title = session
        .index
        .and_then(|i| app.playlist.get(i))
        .map(|t| t.display.clone())
        .unwrap_or_else(|| "-".to_string());

    let state = match app.playback {
        PlaybackState::Playing => "▶",
        PlaybackState::Paused => "⏸",
        PlaybackState::Idle => " ",
    };

    let mut spans = vec![
        Span::styled(
            format!("{state} {title}"),
            Style::default().add_modifier(Modifier::BOLD),
        ),
    ];
    if let Some(err) = &session.last_error {
        spans.push(Span::styled(
            format!("  ✗ {err}"),
            Style::default().fg(Color::Red),
        ));
    }
    Line::from(spans)
}

/// Render the entire UI into the provided `frame` using `app` state and the
/// session snapshot taken this pass.
pub fn draw(frame: &mut Frame, app: &App, session: &SessionInfo, ui_settings: &UiSettings) {
    let show_spectrum = app.player_visible && ui_settings.spectrum_rows > 0;

    let mut constraints = vec![Constraint::Length(3)];
    if show_spectrum {
        constraints.push(Constraint::Length(ui_settings.spectrum_rows + 2));
    }
    if app.player_visible {
        constraints.push(Constraint::Length(5));
    }
    constraints.push(Constraint::Min(1));
    constraints.push(Constraint::Length(3));

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(frame.area());
    let mut next = 0usize;

    // Header
    let header = Paragraph::new(ui_settings.header_text.as_str())
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" calando ")
                .title_alignment(Alignment::Center),
        );
    frame.render_widget(header, chunks[next]);
    next += 1;

    // Spectrum pane
    if show_spectrum {
        let pane = chunks[next];
        next += 1;
        let block = Block::default().borders(Borders::ALL).title(" spectrum ");
        let inner = block.inner(pane);
        frame.render_widget(block, pane);
        frame.render_widget(Paragraph::new(spectrum_lines(app, inner)), inner);
    }

    // Now playing: title, progress, volume
    if app.player_visible {
        let pane = chunks[next];
        next += 1;
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" now playing ")
            .padding(Padding {
                left: 1,
                right: 1,
                top: 0,
                bottom: 0,
            });
        let inner = block.inner(pane);
        frame.render_widget(block, pane);

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Length(1),
            ])
            .split(inner);

        frame.render_widget(Paragraph::new(now_playing_line(app, session)), rows[0]);

        let (ratio, time_label) = match session.duration {
            Some(total) if !total.is_zero() => {
                let ratio =
                    (session.elapsed.as_secs_f64() / total.as_secs_f64()).clamp(0.0, 1.0);
                (
                    ratio,
                    format!("{} / {}", format_mmss(session.elapsed), format_mmss(total)),
                )
            }
            _ => (0.0, format!("{} / --:--", format_mmss(session.elapsed))),
        };
        let progress = Gauge::default()
            .gauge_style(Style::default().fg(Color::Rgb(128, 0, 32)).bg(Color::Black))
            .ratio(ratio)
            .label(time_label);
        frame.render_widget(progress, rows[1]);

        frame.render_widget(Paragraph::new(volume_line(app)), rows[2]);
    }

    // Track list: the cursor is highlighted, the single loaded entry carries
    // the playing marker.
    {
        let selected = app.playlist.selected();
        let items: Vec<ListItem> = app
            .playlist
            .tracks()
            .iter()
            .enumerate()
            .map(|(i, track)| {
                if selected == Some(i) {
                    ListItem::new(Line::from(vec![
                        Span::styled("▶ ", Style::default().fg(Color::Rgb(200, 0, 50))),
                        Span::styled(
                            track.display.clone(),
                            Style::default().add_modifier(Modifier::BOLD),
                        ),
                    ]))
                } else {
                    ListItem::new(format!("  {}", track.display))
                }
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().borders(Borders::ALL).title(" tracks "))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");
        let mut state = ratatui::widgets::ListState::default();
        if app.has_tracks() {
            state.select(Some(app.cursor));
        }
        frame.render_stateful_widget(list, chunks[next], &mut state);
        next += 1;
    }

    // Footer
    let footer = Paragraph::new(controls_text(app.player_visible)).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" controls ")
            .padding(Padding {
                left: 1,
                right: 0,
                top: 0,
                bottom: 0,
            }),
    );
    frame.render_widget(footer, chunks[next]);
}
