use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::Terminal;
use ratatui::backend::Backend;

use crate::app::App;
use crate::audio::{AudioCmd, AudioPlayer};
use crate::config::Settings;
use crate::ui;

/// How long to wait for a key before redrawing anyway. Keeps the spectrum
/// and elapsed time moving while the keyboard is idle.
const FRAME_POLL: Duration = Duration::from_millis(50);

/// Drive the TUI until the user quits.
///
/// One pass per frame: snapshot the shared session, mirror it into the app
/// (playback state, visibility, the now-playing marker), draw, then handle
/// at most one key. All transport keys are forwarded to the device thread as
/// commands; the UI never mutates playback state directly, it only reflects
/// the next snapshot.
pub fn run<B: Backend>(
    terminal: &mut Terminal<B>,
    settings: &Settings,
    app: &mut App,
    player: &AudioPlayer,
) -> Result<(), Box<dyn std::error::Error>>
where
    B::Error: 'static,
{
    loop {
        let session = app.session_snapshot();
        app.apply_session(&session);

        terminal.draw(|f| ui::draw(f, app, &session, &settings.ui))?;

        if !event::poll(FRAME_POLL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind == KeyEventKind::Release {
            continue;
        }

        match key.code {
            KeyCode::Char('q') => {
                player.quit_softly(Duration::from_millis(settings.audio.quit_fade_out_ms));
                return Ok(());
            }

            // List navigation is always live, player pane or not. The arrow
            // keys double as volume keys once the pane is up, so they only
            // move the cursor while it is hidden.
            KeyCode::Char('j') => app.cursor_next(),
            KeyCode::Char('k') => app.cursor_prev(),
            KeyCode::Down if !app.player_visible => app.cursor_next(),
            KeyCode::Up if !app.player_visible => app.cursor_prev(),
            KeyCode::Char('g') => app.cursor_first(),
            KeyCode::Char('G') => app.cursor_last(),

            KeyCode::Enter => {
                if app.has_tracks() {
                    let _ = player.send(AudioCmd::Load(app.cursor));
                }
            }

            // Transport keys only act while a track is loaded.
            KeyCode::Char(' ') | KeyCode::Char('p') if app.player_visible => {
                let _ = player.send(AudioCmd::TogglePause);
            }
            KeyCode::Char('l') | KeyCode::Right if app.player_visible => {
                let _ = player.send(AudioCmd::Next);
            }
            KeyCode::Char('h') | KeyCode::Left if app.player_visible => {
                let _ = player.send(AudioCmd::Prev);
            }
            KeyCode::Up if app.player_visible => {
                app.volume.step(settings.controls.volume_step);
                let _ = player.send(app.volume.as_cmd());
            }
            KeyCode::Down if app.player_visible => {
                app.volume.step(-settings.controls.volume_step);
                let _ = player.send(app.volume.as_cmd());
            }
            KeyCode::Char('m') if app.player_visible => {
                app.volume.toggle_mute();
                let _ = player.send(app.volume.as_cmd());
            }
            KeyCode::Char(c @ '0'..='9') if app.player_visible => {
                let tenth = c as u32 - '0' as u32;
                let _ = player.send(AudioCmd::SeekTo(tenth as f32 / 10.0));
            }
            KeyCode::Char('x') | KeyCode::Esc if app.player_visible => {
                let _ = player.send(AudioCmd::Dismiss);
            }

            _ => {}
        }
    }
}
