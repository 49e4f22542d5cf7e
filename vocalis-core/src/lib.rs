//! # vocalis-core
//!
//! Offline voice-presence detection for mixed audio recordings.
//!
//! ## Architecture
//!
//! ```text
//! WAV file → read_wav → AudioTrack
//!                           │
//!                      Windower (overlapping fixed-length windows)
//!                           │
//!                      SpectrumAnalyzer (one-sided FFT per window)
//!                           │
//!                      PeakBandClassifier (top-K peaks vs. voice band)
//!                           │
//!                      aggregate → Option<VoiceInterval>
//! ```
//!
//! Every track is analyzed independently; batch callers may run one
//! `VoiceDetector` per file on separate threads with no shared state.
//! The `synth` module builds evaluation corpora by planting a speech clip
//! inside a backing track at a random, reproducible offset.

#![forbid(unsafe_code)]
#![warn(clippy::all)]

pub mod audio;
pub mod engine;
pub mod error;
pub mod spectrum;
pub mod synth;
pub mod vad;
pub mod window;

// Convenience re-exports for downstream crates
pub use audio::{read_wav, write_wav, AudioTrack};
pub use engine::{DetectorConfig, VoiceDetector};
pub use error::{Result, VocalisError};
pub use vad::{ClassifierConfig, VoiceInterval, WindowLabel};
