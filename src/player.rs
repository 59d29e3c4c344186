//! A playback engine confined to its own thread.
//!
//! [`Player`] owns the command side; the thread owns the engine, the sampler
//! and the playlist. Hosts read state through [`PlaybackHandle`] and the
//! latest visualization frame through [`SampleHandle`].

mod thread;
mod types;

pub use types::{PlaybackHandle, PlayerSnapshot, SampleHandle};
use types::PlayerCmd;

use std::io;
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crossbeam_channel::{Sender, unbounded};

use crate::analysis::{AnalyserConfig, VisualizationSample};
use crate::config::Settings;
use crate::engine::{Completion, Responder, completion};
use crate::library::{Playlist, RepeatMode};
use crate::media::MediaBackend;

use self::thread::spawn_player_thread;

pub struct Player {
    tx: Sender<PlayerCmd>,
    playback: PlaybackHandle,
    samples: SampleHandle,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl Player {
    /// Start the player thread around `backend`.
    pub fn spawn<B>(backend: B, playlist: Playlist, settings: Settings) -> io::Result<Self>
    where
        B: MediaBackend + Send + 'static,
    {
        let (tx, rx) = unbounded::<PlayerCmd>();
        let bins = AnalyserConfig::from(&settings.analyser).bin_count();
        let playback: PlaybackHandle = Arc::new(Mutex::new(PlayerSnapshot {
            order: playlist.order().to_vec(),
            ..PlayerSnapshot::default()
        }));
        let samples: SampleHandle = Arc::new(Mutex::new(VisualizationSample::empty(bins)));

        let handle = spawn_player_thread(
            backend,
            playlist,
            settings,
            rx,
            playback.clone(),
            samples.clone(),
        )?;

        Ok(Self {
            tx,
            playback,
            samples,
            join: Mutex::new(Some(handle)),
        })
    }

    pub fn playback_handle(&self) -> PlaybackHandle {
        self.playback.clone()
    }

    pub fn sample_handle(&self) -> SampleHandle {
        self.samples.clone()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.playback
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    pub fn latest_sample(&self) -> VisualizationSample {
        self.samples
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    fn send(&self, cmd: PlayerCmd) {
        // A stopped thread drops the command; any responder inside it then
        // reports the operation as aborted.
        if self.tx.send(cmd).is_err() {
            log::warn!("player thread is gone, command dropped");
        }
    }

    fn request(&self, cmd: impl FnOnce(Responder) -> PlayerCmd) -> Completion {
        let (done, pending) = completion();
        self.send(cmd(done));
        pending
    }

    pub fn select(&self, id: impl Into<String>) -> Completion {
        let id = id.into();
        self.request(|done| PlayerCmd::Select { id, done })
    }

    pub fn play(&self) -> Completion {
        self.request(PlayerCmd::Play)
    }

    pub fn toggle_play(&self) -> Completion {
        self.request(PlayerCmd::TogglePlay)
    }

    pub fn next(&self) -> Completion {
        self.request(PlayerCmd::Next)
    }

    pub fn previous(&self) -> Completion {
        self.request(PlayerCmd::Previous)
    }

    pub fn pause(&self) {
        self.send(PlayerCmd::Pause);
    }

    pub fn seek(&self, seconds: f64) {
        self.send(PlayerCmd::Seek(seconds));
    }

    pub fn set_volume(&self, volume: f32) {
        self.send(PlayerCmd::SetVolume(volume));
    }

    pub fn toggle_mute(&self) {
        self.send(PlayerCmd::ToggleMute);
    }

    pub fn set_shuffle(&self, on: bool) {
        self.send(PlayerCmd::SetShuffle(on));
    }

    pub fn toggle_shuffle(&self) {
        self.send(PlayerCmd::ToggleShuffle);
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode) {
        self.send(PlayerCmd::SetRepeat(mode));
    }

    pub fn cycle_repeat(&self) {
        self.send(PlayerCmd::CycleRepeat);
    }

    /// Stop the thread and wait for the engine teardown to finish.
    pub fn quit(&self) {
        let _ = self.tx.send(PlayerCmd::Quit);

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                if h.join().is_err() {
                    log::error!("player thread panicked");
                }
            }
        }
    }
}

impl Drop for Player {
    fn drop(&mut self) {
        self.quit();
    }
}

#[cfg(test)]
mod tests;
