//! One-sided FFT spectra of sample windows.

use rustfft::num_complex::Complex;
use rustfft::FftPlanner;

use crate::window::Window;

/// One-sided complex spectrum of a single window.
///
/// Bin order is ascending, index 0 = DC; the mirrored upper half of the DFT
/// is dropped, so the length is `floor(window_length / 2)`. No normalization
/// is applied — magnitudes are on the scale implied by the raw i16
/// amplitudes.
#[derive(Debug, Clone)]
pub struct Spectrum {
    bins: Vec<Complex<f32>>,
}

impl Spectrum {
    pub(crate) fn from_bins(bins: Vec<Complex<f32>>) -> Self {
        Self { bins }
    }

    /// Number of one-sided bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    pub fn bins(&self) -> &[Complex<f32>] {
        &self.bins
    }

    /// Magnitude of bin `index`.
    pub fn magnitude(&self, index: usize) -> f32 {
        self.bins[index].norm()
    }
}

/// Computes window spectra, caching FFT plans across calls.
///
/// Dropping the mirrored half is valid for real-valued input only; PCM
/// samples satisfy that by construction.
pub struct SpectrumAnalyzer {
    planner: FftPlanner<f32>,
}

impl SpectrumAnalyzer {
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
        }
    }

    /// Full DFT of the window's samples, truncated to the first
    /// `floor(N/2)` bins.
    pub fn analyze(&mut self, window: &Window<'_>) -> Spectrum {
        let n = window.samples.len();
        if n == 0 {
            return Spectrum { bins: Vec::new() };
        }
        let fft = self.planner.plan_fft_forward(n);

        let mut buf: Vec<Complex<f32>> = window
            .samples
            .iter()
            .map(|&s| Complex::new(f32::from(s), 0.0))
            .collect();
        fft.process(&mut buf);
        buf.truncate(n / 2);

        Spectrum { bins: buf }
    }
}

impl Default for SpectrumAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
