use std::io;
use std::thread::{self, JoinHandle};
use std::time::Instant;

use crossbeam_channel::{Receiver, select};

use crate::config::Settings;
use crate::engine::{Completion, PlaybackEngine, Responder};
use crate::error::PlayerError;
use crate::library::Playlist;
use crate::media::MediaBackend;
use crate::visualizer::Sampler;

use super::types::{PlaybackHandle, PlayerCmd, SampleHandle};

/// An engine completion whose outcome is owed to a caller on another thread.
struct Forward {
    pending: Completion,
    done: Responder,
}

pub(super) fn spawn_player_thread<B>(
    backend: B,
    mut playlist: Playlist,
    settings: Settings,
    rx: Receiver<PlayerCmd>,
    playback: PlaybackHandle,
    samples: SampleHandle,
) -> io::Result<JoinHandle<()>>
where
    B: MediaBackend + Send + 'static,
{
    thread::Builder::new()
        .name("vinyl-player".into())
        .spawn(move || {
            let mut engine = PlaybackEngine::new(backend, &settings);
            let mut sampler = Sampler::from_settings(&settings);
            let notifications = engine.notifications().clone();
            let idle = settings.idle_poll();
            let mut forwards: Vec<Forward> = Vec::new();

            if settings.playback.shuffle {
                engine.set_shuffle(&mut playlist, true);
            }
            if settings.player.load_first_track {
                // Nothing waits on the initial load; failures land in the snapshot.
                let _ = engine.next(&mut playlist, Instant::now());
            }
            log::info!(
                "player thread started with {} tracks from '{}'",
                playlist.len(),
                playlist.name
            );

            loop {
                let now = Instant::now();
                let timeout = [sampler.next_deadline(), engine.next_deadline()]
                    .into_iter()
                    .flatten()
                    .min()
                    .map_or(idle, |at| at.saturating_duration_since(now).min(idle));

                select! {
                    recv(rx) -> cmd => match cmd {
                        Ok(PlayerCmd::Quit) | Err(_) => break,
                        Ok(cmd) => apply(cmd, &mut engine, &mut playlist, &mut forwards),
                    },
                    recv(notifications) -> notification => {
                        if let Ok(notification) = notification {
                            engine.handle_notification(notification);
                        }
                    },
                    default(timeout) => {}
                }

                let now = Instant::now();
                engine.pump(now);

                sampler.sync(engine.is_playing(), now);
                if let Some(sample) = sampler.tick(engine.analyser(), now) {
                    if let Ok(mut out) = samples.lock() {
                        out.clone_from(sample);
                    }
                }

                publish(&playback, &engine, &playlist);
                settle(&mut forwards);
            }

            // Teardown aborts whatever the engine still had pending.
            drop(engine);
            settle(&mut forwards);
            if let Ok(mut snap) = playback.lock() {
                snap.engine.state.is_playing = false;
            }
            log::info!("player thread stopped");
        })
}

fn apply<B: MediaBackend>(
    cmd: PlayerCmd,
    engine: &mut PlaybackEngine<B>,
    playlist: &mut Playlist,
    forwards: &mut Vec<Forward>,
) {
    let now = Instant::now();
    match cmd {
        PlayerCmd::Select { id, done } => match engine.select(playlist, &id, now) {
            Some(pending) => forwards.push(Forward { pending, done }),
            None => done.resolve(Err(PlayerError::Other {
                detail: format!("no track with id '{id}'"),
            })),
        },
        PlayerCmd::Play(done) => forwards.push(Forward {
            pending: engine.play(),
            done,
        }),
        PlayerCmd::TogglePlay(done) => forwards.push(Forward {
            pending: engine.toggle_play(),
            done,
        }),
        PlayerCmd::Next(done) => match engine.next(playlist, now) {
            Some(pending) => forwards.push(Forward { pending, done }),
            None => done.resolve(Err(PlayerError::NoTrackLoaded)),
        },
        PlayerCmd::Previous(done) => match engine.previous(playlist, now) {
            Some(pending) => forwards.push(Forward { pending, done }),
            None => done.resolve(Err(PlayerError::NoTrackLoaded)),
        },
        PlayerCmd::Pause => engine.pause(),
        PlayerCmd::Seek(seconds) => engine.seek(seconds),
        PlayerCmd::SetVolume(volume) => engine.set_volume(volume),
        PlayerCmd::ToggleMute => engine.toggle_mute(),
        PlayerCmd::SetShuffle(on) => engine.set_shuffle(playlist, on),
        PlayerCmd::ToggleShuffle => {
            let on = !engine.state().is_shuffled;
            engine.set_shuffle(playlist, on);
        }
        PlayerCmd::SetRepeat(mode) => engine.set_repeat_mode(mode),
        PlayerCmd::CycleRepeat => {
            let mode = engine.cycle_repeat();
            log::debug!("repeat mode now {mode:?}");
        }
        PlayerCmd::Quit => {}
    }
}

fn publish<B: MediaBackend>(playback: &PlaybackHandle, engine: &PlaybackEngine<B>, playlist: &Playlist) {
    let index = playlist.current_index();
    if let Ok(mut snap) = playback.lock() {
        snap.engine = engine.snapshot();
        snap.playlist_index = index;
        if snap.order.as_slice() != playlist.order() {
            snap.order = playlist.order().to_vec();
        }
    }
}

/// Hand resolved engine outcomes back to their callers.
fn settle(forwards: &mut Vec<Forward>) {
    let mut i = 0;
    while i < forwards.len() {
        match forwards[i].pending.try_result() {
            Some(result) => forwards.swap_remove(i).done.resolve(result),
            None => i += 1,
        }
    }
}
