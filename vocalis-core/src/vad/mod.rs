//! Voice-activity classification of window spectra.
//!
//! The `WindowClassifier` trait is the extensibility seam: the default
//! `PeakBandClassifier` counts dominant spectral peaks inside the
//! fundamental voice band; any replacement policy can slot in without
//! touching the engine.

pub mod peaks;

pub use peaks::{ClassifierConfig, PeakBandClassifier, PEAK_INDEX_OFFSET};

use serde::{Deserialize, Serialize};

use crate::spectrum::Spectrum;

/// Per-window classification result, tagged with the window's start time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WindowLabel {
    /// Start of the window in seconds from track start.
    pub start_seconds: f64,
    /// Whether the window's spectrum looks like voice.
    pub is_voice: bool,
}

/// The voice interval detected in one track, in seconds from track start.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceInterval {
    pub start_seconds: f64,
    pub end_seconds: f64,
}

/// One of the top-K magnitude bins of a spectrum.
///
/// Transient — recomputed per window, never stored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyPeak {
    /// Zero-based one-sided bin index.
    pub index: usize,
    /// Bin frequency in Hz, including the preserved index offset
    /// (see [`PEAK_INDEX_OFFSET`]).
    pub frequency_hz: f64,
}

/// Trait for all per-window classifiers.
pub trait WindowClassifier {
    /// Decide whether a single window's spectrum is voice.
    ///
    /// `sample_rate` must be the rate of the track the spectrum came from;
    /// it anchors the bin-to-Hz conversion.
    fn classify(&self, spectrum: &Spectrum, sample_rate: u32) -> bool;
}
