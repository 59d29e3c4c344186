//! Read-only access to the analyser stage of the audio graph.

use crate::config::AnalyserSettings;
use crate::media::AnalysisGraph;

/// Construction-time analyser configuration. Fixed for the graph's lifetime.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AnalyserConfig {
    /// FFT window size; a power of two.
    pub fft_size: usize,
    /// Averaging constant between successive frames, `0.0..=1.0`.
    pub smoothing: f32,
}

impl Default for AnalyserConfig {
    fn default() -> Self {
        Self {
            fft_size: 256,
            smoothing: 0.8,
        }
    }
}

impl AnalyserConfig {
    /// Length of both sample arrays.
    pub fn bin_count(&self) -> usize {
        self.fft_size / 2
    }
}

impl From<&AnalyserSettings> for AnalyserConfig {
    fn from(s: &AnalyserSettings) -> Self {
        Self {
            fft_size: s.fft_size,
            smoothing: s.smoothing,
        }
    }
}

/// One frame of visualization data.
///
/// A snapshot, not history: each tick overwrites the previous one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisualizationSample {
    /// Counts produced samples, starting at 1. 0 means nothing sampled yet.
    pub frame: u64,
    /// Frequency magnitudes on a 0..=255 scale.
    pub frequencies: Vec<u8>,
    /// Time-domain amplitudes on a 0..=255 scale, 128 is the zero line.
    pub waveform: Vec<u8>,
}

impl VisualizationSample {
    /// An all-zero sample of `bins` length, shown before the first tick.
    pub fn empty(bins: usize) -> Self {
        Self {
            frame: 0,
            frequencies: vec![0; bins],
            waveform: vec![0; bins],
        }
    }
}

/// Thin accessor over the analyser owned by the engine.
pub struct AnalysisNode<G> {
    graph: G,
    config: AnalyserConfig,
}

impl<G: AnalysisGraph> AnalysisNode<G> {
    pub(crate) fn new(graph: G, config: AnalyserConfig) -> Self {
        Self { graph, config }
    }

    pub fn config(&self) -> AnalyserConfig {
        self.config
    }

    pub fn bin_count(&self) -> usize {
        self.config.bin_count()
    }

    pub fn frequencies(&self) -> Vec<u8> {
        let mut out = vec![0; self.bin_count()];
        self.graph.frequency_data(&mut out);
        out
    }

    pub fn waveform(&self) -> Vec<u8> {
        let mut out = vec![0; self.bin_count()];
        self.graph.waveform_data(&mut out);
        out
    }

    /// Refresh both arrays of `sample` in place, reusing its buffers.
    pub fn fill(&self, sample: &mut VisualizationSample) {
        let bins = self.bin_count();
        sample.frequencies.resize(bins, 0);
        sample.waveform.resize(bins, 0);
        self.graph.frequency_data(&mut sample.frequencies);
        self.graph.waveform_data(&mut sample.waveform);
    }

    pub(crate) fn graph_mut(&mut self) -> &mut G {
        &mut self.graph
    }
}
