//! Track-level aggregation of per-window labels.
//!
//! Every voice-labeled window contributes its start and end time to one
//! flat, time-ordered boundary list; the reported interval runs from the
//! first boundary to the last, pulled in by the edge trim on both sides to
//! compensate for window-overlap bleed. One interval per track — disjoint
//! voice regions collapse into their envelope.

use tracing::debug;

use crate::vad::{VoiceInterval, WindowLabel};

/// Seconds trimmed from each end of the raw boundary envelope. An empirical
/// correction constant from the reference experiment, not a derived value.
pub const EDGE_TRIM_SECONDS: f64 = 1.0;

/// Derive the track's voice interval from its window labels.
///
/// Returns `None` when fewer than two boundary timestamps exist, i.e. when
/// no window was labeled voice. With `window_seconds` below twice the trim
/// the arithmetic can yield `start > end`; that is kept unchanged from the
/// reference behavior.
pub fn aggregate(
    labels: &[WindowLabel],
    window_seconds: f64,
    edge_trim_seconds: f64,
) -> Option<VoiceInterval> {
    let boundaries = voice_boundaries(labels, window_seconds);
    debug!(boundaries = boundaries.len(), "aggregating window labels");
    interval_from_boundaries(&boundaries, edge_trim_seconds)
}

/// Start and end timestamps of every voice-labeled window, in label order.
fn voice_boundaries(labels: &[WindowLabel], window_seconds: f64) -> Vec<f64> {
    let mut boundaries = Vec::new();
    for label in labels.iter().filter(|l| l.is_voice) {
        boundaries.push(label.start_seconds);
        boundaries.push(label.start_seconds + window_seconds);
    }
    boundaries
}

fn interval_from_boundaries(boundaries: &[f64], edge_trim_seconds: f64) -> Option<VoiceInterval> {
    match boundaries {
        [first, .., last] => Some(VoiceInterval {
            start_seconds: first + edge_trim_seconds,
            end_seconds: last - edge_trim_seconds,
        }),
        _ => None,
    }
}
