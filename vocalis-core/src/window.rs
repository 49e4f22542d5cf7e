//! Fixed-length overlapping windowing of a sample sequence.
//!
//! ## Rounding rule
//!
//! Window length and slide step are both computed as
//! `floor(sample_rate × seconds)` samples. A trailing window that would run
//! past the end of the track is discarded — the classifier only operates on
//! full-length windows, so no zero-padding happens at this stage.

use crate::audio::AudioTrack;
use crate::error::{Result, VocalisError};

/// One fixed-length slice of a track, tagged with its start offset.
#[derive(Debug, Clone, Copy)]
pub struct Window<'a> {
    /// Offset of the first sample within the parent track.
    pub start_sample: usize,
    /// The window's samples; same length for every window of one track.
    pub samples: &'a [i16],
}

impl Window<'_> {
    /// Start time of this window in seconds.
    pub fn start_seconds(&self, sample_rate: u32) -> f64 {
        self.start_sample as f64 / f64::from(sample_rate)
    }
}

/// Finite iterator over the full-length windows of a track.
///
/// Restartable: call [`windows`] again for a fresh pass.
#[derive(Debug, Clone)]
pub struct Windows<'a> {
    samples: &'a [i16],
    window_len: usize,
    step: usize,
    next_start: usize,
}

impl<'a> Iterator for Windows<'a> {
    type Item = Window<'a>;

    fn next(&mut self) -> Option<Window<'a>> {
        let start = self.next_start;
        if start > self.samples.len() || self.samples.len() - start < self.window_len {
            return None;
        }
        self.next_start = start + self.step;
        Some(Window {
            start_sample: start,
            samples: &self.samples[start..start + self.window_len],
        })
    }
}

/// Slice `track` into overlapping windows of `window_seconds`, advancing by
/// `slide_seconds` per window.
///
/// A track shorter than one window yields an empty iterator — "no evidence",
/// not an error.
///
/// # Errors
/// `VocalisError::InvalidParameter` when either duration is non-positive or
/// floors to zero samples at the track's sample rate.
pub fn windows(
    track: &AudioTrack,
    window_seconds: f64,
    slide_seconds: f64,
) -> Result<Windows<'_>> {
    if window_seconds <= 0.0 {
        return Err(VocalisError::InvalidParameter(format!(
            "window_seconds must be positive, got {window_seconds}"
        )));
    }
    if slide_seconds <= 0.0 {
        return Err(VocalisError::InvalidParameter(format!(
            "slide_seconds must be positive, got {slide_seconds}"
        )));
    }

    let window_len = (f64::from(track.sample_rate) * window_seconds).floor() as usize;
    let step = (f64::from(track.sample_rate) * slide_seconds).floor() as usize;

    if window_len == 0 {
        return Err(VocalisError::InvalidParameter(format!(
            "window of {window_seconds} s is shorter than one sample at {} Hz",
            track.sample_rate
        )));
    }
    if step == 0 {
        return Err(VocalisError::InvalidParameter(format!(
            "slide of {slide_seconds} s is shorter than one sample at {} Hz",
            track.sample_rate
        )));
    }

    Ok(Windows {
        samples: &track.samples,
        window_len,
        step,
        next_start: 0,
    })
}
