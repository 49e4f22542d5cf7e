//! `VoiceDetector` — the per-track analysis pipeline.
//!
//! ## Pipeline stages (per track)
//!
//! ```text
//! 1. Slice the track into overlapping fixed-length windows
//! 2. FFT each window → one-sided spectrum
//! 3. Classify each spectrum → WindowLabel
//! 4. Aggregate the labels → Option<VoiceInterval>
//! ```
//!
//! Windows are processed strictly in time order because the aggregator
//! depends on boundary order. Tracks are independent of each other, so
//! batch callers may run one detector per track on separate threads with no
//! coordination.

pub mod aggregate;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::audio::AudioTrack;
use crate::error::{Result, VocalisError};
use crate::spectrum::SpectrumAnalyzer;
use crate::vad::{
    ClassifierConfig, PeakBandClassifier, VoiceInterval, WindowClassifier, WindowLabel,
};
use crate::window::windows;

/// Configuration for `VoiceDetector`.
///
/// Defaults reproduce the reference experiment: 2 s windows sliding by
/// 0.2 s, the default peak-band classifier, and a 1 s edge trim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Analysis window length in seconds. Default: 2.0.
    pub window_seconds: f64,
    /// Offset between consecutive window starts in seconds; smaller than
    /// `window_seconds` means overlap. Default: 0.2.
    pub slide_seconds: f64,
    /// Peak-band classifier policy.
    pub classifier: ClassifierConfig,
    /// Seconds trimmed from each end of the aggregated interval.
    /// Default: [`aggregate::EDGE_TRIM_SECONDS`].
    pub edge_trim_seconds: f64,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            window_seconds: 2.0,
            slide_seconds: 0.2,
            classifier: ClassifierConfig::default(),
            edge_trim_seconds: aggregate::EDGE_TRIM_SECONDS,
        }
    }
}

/// Per-track voice-presence detector.
///
/// Holds the FFT planner across calls, so reusing one detector for many
/// same-length tracks avoids re-planning.
pub struct VoiceDetector {
    config: DetectorConfig,
    classifier: PeakBandClassifier,
    analyzer: SpectrumAnalyzer,
}

impl VoiceDetector {
    /// Create a detector, validating every policy constant up front.
    ///
    /// # Errors
    /// `VocalisError::InvalidParameter` when the window/slide durations, the
    /// edge trim, or any classifier constant is degenerate — a caller
    /// configuration bug, never a property of the audio.
    pub fn new(config: DetectorConfig) -> Result<Self> {
        if config.window_seconds <= 0.0 {
            return Err(VocalisError::InvalidParameter(format!(
                "window_seconds must be positive, got {}",
                config.window_seconds
            )));
        }
        if config.slide_seconds <= 0.0 {
            return Err(VocalisError::InvalidParameter(format!(
                "slide_seconds must be positive, got {}",
                config.slide_seconds
            )));
        }
        if config.edge_trim_seconds.is_nan() || config.edge_trim_seconds < 0.0 {
            return Err(VocalisError::InvalidParameter(format!(
                "edge_trim_seconds must be non-negative, got {}",
                config.edge_trim_seconds
            )));
        }
        let classifier = PeakBandClassifier::new(config.classifier)?;

        Ok(Self {
            config,
            classifier,
            analyzer: SpectrumAnalyzer::new(),
        })
    }

    pub fn config(&self) -> &DetectorConfig {
        &self.config
    }

    /// Classify every full-length window of `track`, in time order.
    ///
    /// A track shorter than one window yields an empty label list.
    pub fn label_windows(&mut self, track: &AudioTrack) -> Result<Vec<WindowLabel>> {
        let mut labels = Vec::new();
        let mut voiced = 0usize;

        for window in windows(track, self.config.window_seconds, self.config.slide_seconds)? {
            let spectrum = self.analyzer.analyze(&window);
            let is_voice = self.classifier.classify(&spectrum, track.sample_rate);
            if is_voice {
                voiced += 1;
            }
            labels.push(WindowLabel {
                start_seconds: window.start_seconds(track.sample_rate),
                is_voice,
            });
        }

        debug!(windows = labels.len(), voiced, "windows classified");
        Ok(labels)
    }

    /// Run the full pipeline on one track.
    ///
    /// Returns `None` when the track holds no voice evidence — including
    /// tracks shorter than a single window.
    pub fn detect(&mut self, track: &AudioTrack) -> Result<Option<VoiceInterval>> {
        let labels = self.label_windows(track)?;
        let interval = aggregate::aggregate(
            &labels,
            self.config.window_seconds,
            self.config.edge_trim_seconds,
        );

        match &interval {
            Some(iv) => info!(
                start_seconds = iv.start_seconds,
                end_seconds = iv.end_seconds,
                "voice detected"
            ),
            None => info!("no voice detected"),
        }
        Ok(interval)
    }
}
