//! Synthetic corpus construction.
//!
//! Plants a speech clip inside silence or a backing track (noise, music, a
//! tone) at a random offset, so evaluation corpora come with known ground
//! truth. The caller owns the RNG; seed a `StdRng` for a reproducible
//! corpus.
//!
//! All three operations produce a track of exactly
//! `floor(sample_rate × size_seconds)` samples at the speech clip's sample
//! rate.

use rand::Rng;
use tracing::{debug, warn};

use crate::audio::AudioTrack;
use crate::error::{Result, VocalisError};

/// Fraction of the speech region crossfaded with the backing track at each
/// seam in [`smooth_mix`].
pub const FADE_FRACTION: f64 = 0.2;

/// Target length in samples plus a uniformly random start offset for the
/// speech clip. The clip must fit with room to spare on at least one side.
fn placement(
    speech: &AudioTrack,
    size_seconds: f64,
    rng: &mut impl Rng,
) -> Result<(usize, usize)> {
    if size_seconds <= 0.0 {
        return Err(VocalisError::InvalidParameter(format!(
            "size_seconds must be positive, got {size_seconds}"
        )));
    }

    let target_len = (f64::from(speech.sample_rate) * size_seconds).floor() as usize;
    if speech.len() >= target_len {
        return Err(VocalisError::InvalidParameter(format!(
            "speech clip of {} samples does not fit inside a {size_seconds} s target",
            speech.len()
        )));
    }

    let stuffing = target_len - speech.len();
    let start = rng.gen_range(0..stuffing);
    Ok((target_len, start))
}

/// The backing track must cover the full target length in samples; target
/// length is anchored to the speech clip's rate, so this also catches
/// mismatched-rate backings that are nominally "long enough".
fn check_backing(backing: &AudioTrack, size_seconds: f64, target_len: usize) -> Result<()> {
    if backing.len() < target_len {
        return Err(VocalisError::BackingTooShort {
            requested_secs: size_seconds,
            actual_secs: backing.duration_secs(),
        });
    }
    Ok(())
}

fn check_rates(speech: &AudioTrack, backing: &AudioTrack) {
    if speech.sample_rate != backing.sample_rate {
        warn!(
            speech_rate = speech.sample_rate,
            backing_rate = backing.sample_rate,
            "sample rate mismatch; output uses the speech clip's rate"
        );
    }
}

/// Place `speech` at a random offset inside `size_seconds` of silence.
///
/// # Errors
/// `VocalisError::InvalidParameter` when the target duration is
/// non-positive or the clip does not fit inside it.
pub fn stuff(speech: &AudioTrack, size_seconds: f64, rng: &mut impl Rng) -> Result<AudioTrack> {
    let (target_len, start) = placement(speech, size_seconds, rng)?;

    let mut samples = vec![0i16; target_len];
    samples[start..start + speech.len()].copy_from_slice(&speech.samples);

    debug!(start, target_len, "stuffed speech clip into silence");
    Ok(AudioTrack::new(speech.sample_rate, samples))
}

/// Splice `speech` into `backing` at a random offset, with a hard cut at
/// both seams.
///
/// # Errors
/// `VocalisError::BackingTooShort` when the backing track cannot cover the
/// target duration — a fatal precondition, not a per-file condition.
/// `VocalisError::InvalidParameter` as for [`stuff`].
pub fn mix(
    speech: &AudioTrack,
    backing: &AudioTrack,
    size_seconds: f64,
    rng: &mut impl Rng,
) -> Result<AudioTrack> {
    check_rates(speech, backing);
    let (target_len, start) = placement(speech, size_seconds, rng)?;
    check_backing(backing, size_seconds, target_len)?;
    let end = start + speech.len();

    let mut samples = Vec::with_capacity(target_len);
    samples.extend_from_slice(&backing.samples[..start]);
    samples.extend_from_slice(&speech.samples);
    samples.extend_from_slice(&backing.samples[end..target_len]);

    debug!(start, end, target_len, "mixed speech clip into backing track");
    Ok(AudioTrack::new(speech.sample_rate, samples))
}

/// Splice `speech` into `backing` with a linear crossfade over the first
/// and last [`FADE_FRACTION`] of the speech region.
///
/// Inside the fade the backing track's contribution ramps from full down to
/// zero (and back up at the tail); overlapping samples saturate at the i16
/// range rather than wrapping.
///
/// # Errors
/// As for [`mix`].
pub fn smooth_mix(
    speech: &AudioTrack,
    backing: &AudioTrack,
    size_seconds: f64,
    rng: &mut impl Rng,
) -> Result<AudioTrack> {
    check_rates(speech, backing);
    let (target_len, start) = placement(speech, size_seconds, rng)?;
    check_backing(backing, size_seconds, target_len)?;
    let end = start + speech.len();
    let fade_len = (speech.len() as f64 * FADE_FRACTION).ceil() as usize;

    let mut samples = Vec::with_capacity(target_len);
    samples.extend_from_slice(&backing.samples[..start]);
    for (i, &s) in speech.samples.iter().enumerate() {
        let from_end = speech.len() - 1 - i;
        let ramp = if fade_len == 0 {
            0.0
        } else if i < fade_len {
            1.0 - i as f64 / fade_len as f64
        } else if from_end < fade_len {
            1.0 - from_end as f64 / fade_len as f64
        } else {
            0.0
        };
        let mixed = i32::from(s) + (f64::from(backing.samples[start + i]) * ramp) as i32;
        samples.push(mixed.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16);
    }
    samples.extend_from_slice(&backing.samples[end..target_len]);

    debug!(start, end, fade_len, "smooth-mixed speech clip into backing track");
    Ok(AudioTrack::new(speech.sample_rate, samples))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    const RATE: u32 = 1_000;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1212)
    }

    fn speech_clip(len: usize) -> AudioTrack {
        AudioTrack::new(RATE, (0..len).map(|i| (i % 100) as i16 + 1).collect())
    }

    fn backing_track(len: usize) -> AudioTrack {
        AudioTrack::new(RATE, vec![-7i16; len])
    }

    #[test]
    fn stuff_places_clip_verbatim_inside_silence() {
        let speech = speech_clip(500);
        let out = stuff(&speech, 3.0, &mut rng()).unwrap();

        assert_eq!(out.len(), 3_000);
        let start = out.samples.iter().position(|&s| s != 0).unwrap();
        assert_eq!(&out.samples[start..start + 500], speech.samples.as_slice());
        assert!(out.samples[..start].iter().all(|&s| s == 0));
        assert!(out.samples[start + 500..].iter().all(|&s| s == 0));
    }

    #[test]
    fn stuff_is_deterministic_for_a_fixed_seed() {
        let speech = speech_clip(500);
        let a = stuff(&speech, 3.0, &mut rng()).unwrap();
        let b = stuff(&speech, 3.0, &mut rng()).unwrap();
        assert_eq!(a.samples, b.samples);
    }

    #[test]
    fn clip_that_does_not_fit_is_invalid() {
        let speech = speech_clip(3_000);
        assert!(matches!(
            stuff(&speech, 3.0, &mut rng()),
            Err(VocalisError::InvalidParameter(_))
        ));
    }

    #[test]
    fn mix_splices_clip_between_backing_halves() {
        let speech = speech_clip(500);
        let backing = backing_track(5_000);
        let out = mix(&speech, &backing, 3.0, &mut rng()).unwrap();

        assert_eq!(out.len(), 3_000);
        let start = out.samples.iter().position(|&s| s != -7).unwrap();
        assert_eq!(&out.samples[start..start + 500], speech.samples.as_slice());
        assert!(out.samples[..start].iter().all(|&s| s == -7));
        assert!(out.samples[start + 500..].iter().all(|&s| s == -7));
    }

    #[test]
    fn short_backing_track_is_fatal() {
        let speech = speech_clip(500);
        let backing = backing_track(2_000);
        assert!(matches!(
            mix(&speech, &backing, 3.0, &mut rng()),
            Err(VocalisError::BackingTooShort { .. })
        ));
        assert!(matches!(
            smooth_mix(&speech, &backing, 3.0, &mut rng()),
            Err(VocalisError::BackingTooShort { .. })
        ));
    }

    #[test]
    fn smooth_mix_keeps_the_clip_middle_verbatim() {
        let speech = speech_clip(500);
        let backing = backing_track(5_000);
        let out = smooth_mix(&speech, &backing, 3.0, &mut rng()).unwrap();
        assert_eq!(out.len(), 3_000);

        // Same placement as mix() under the same seed.
        let reference = mix(&speech, &backing, 3.0, &mut rng()).unwrap();
        let start = reference
            .samples
            .iter()
            .position(|&s| s != -7)
            .unwrap();

        // fade_len = ceil(500 * 0.2) = 100; samples 100..400 of the clip
        // carry no backing contribution.
        assert_eq!(
            &out.samples[start + 100..start + 400],
            &speech.samples[100..400]
        );
        // Seam sample: full backing contribution on top of the clip.
        assert_eq!(out.samples[start], speech.samples[0] - 7);
    }

    #[test]
    fn smooth_mix_saturates_instead_of_wrapping() {
        let speech = AudioTrack::new(RATE, vec![i16::MAX; 500]);
        let backing = AudioTrack::new(RATE, vec![i16::MAX; 5_000]);
        let out = smooth_mix(&speech, &backing, 3.0, &mut rng()).unwrap();
        assert!(out.samples.iter().all(|&s| s >= 0), "wrapped negative");
    }
}
