//! Frame-paced sampling of the analyser while playback is running.
//!
//! The sampler is a cancellable repeating task: [`Sampler::sync`] starts it
//! when playback begins and cancels it when playback stops, and
//! [`Sampler::tick`] produces at most one sample per due frame.

use std::time::{Duration, Instant};

use crate::analysis::{AnalyserConfig, AnalysisNode, VisualizationSample};
use crate::config::Settings;
use crate::media::AnalysisGraph;

#[derive(Debug)]
pub struct Sampler {
    interval: Duration,
    /// `Some` while the task is active.
    next_frame: Option<Instant>,
    sample: VisualizationSample,
    frames: u64,
}

impl Sampler {
    pub fn new(interval: Duration, bins: usize) -> Self {
        Self {
            interval: interval.max(Duration::from_millis(1)),
            next_frame: None,
            sample: VisualizationSample::empty(bins),
            frames: 0,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        let bins = AnalyserConfig::from(&settings.analyser).bin_count();
        Self::new(settings.frame_interval(), bins)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn is_running(&self) -> bool {
        self.next_frame.is_some()
    }

    /// Start or cancel the task to follow `is_playing`.
    ///
    /// Calling it repeatedly with the same flag is a no-op, so there is never
    /// more than one schedule.
    pub fn sync(&mut self, is_playing: bool, now: Instant) {
        match (is_playing, self.next_frame) {
            (true, None) => {
                log::debug!("visualizer started, frame interval {:?}", self.interval);
                self.next_frame = Some(now);
            }
            (false, Some(_)) => {
                log::debug!("visualizer stopped after {} frames", self.frames);
                self.next_frame = None;
            }
            _ => {}
        }
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.next_frame
    }

    /// Sample `node` if a frame is due.
    ///
    /// Returns the refreshed sample, or `None` when the task is cancelled,
    /// the frame is not due yet, or there is no analyser to read.
    pub fn tick<G: AnalysisGraph>(
        &mut self,
        node: Option<&AnalysisNode<G>>,
        now: Instant,
    ) -> Option<&VisualizationSample> {
        let due = self.next_frame?;
        if now < due {
            return None;
        }

        // Missed frames are dropped, not replayed.
        let mut next = due + self.interval;
        if next <= now {
            next = now + self.interval;
        }
        self.next_frame = Some(next);

        let node = node?;
        node.fill(&mut self.sample);
        self.frames += 1;
        self.sample.frame = self.frames;
        Some(&self.sample)
    }

    /// The most recent sample; all zeros before the first frame.
    pub fn latest(&self) -> &VisualizationSample {
        &self.sample
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }
}
