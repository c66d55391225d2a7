//! Shared real-FFT helpers: windowed magnitude spectra and phase-transform
//! cross-correlation. The heavier per-call policy (thresholds, peak picking)
//! lives with the components that use these.

use realfft::num_complex::Complex;
use realfft::{RealFftPlanner, RealToComplex};
use std::ops::Range;
use std::sync::Arc;

/// Forward transform for fixed-length analysis windows, with reusable
/// buffers. One instance per window length.
pub struct SpectrumAnalyzer {
    len: usize,
    r2c: Arc<dyn RealToComplex<f64>>,
    input: Vec<f64>,
    output: Vec<Complex<f64>>,
    magnitudes: Vec<f64>,
}

impl SpectrumAnalyzer {
    pub fn new(len: usize) -> Self {
        let mut planner = RealFftPlanner::<f64>::new();
        let r2c = planner.plan_fft_forward(len);
        let input = r2c.make_input_vec();
        let output = r2c.make_output_vec();
        let magnitudes = vec![0.0; output.len()];
        Self {
            len,
            r2c,
            input,
            output,
            magnitudes,
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Magnitude spectrum of one window (half spectrum, `len/2 + 1` bins).
    pub fn magnitudes(&mut self, window: &[f64]) -> &[f64] {
        assert_eq!(window.len(), self.len);
        self.input.copy_from_slice(window);
        self.r2c.process(&mut self.input, &mut self.output).ok();
        for (mag, bin) in self.magnitudes.iter_mut().zip(self.output.iter()) {
            *mag = bin.norm();
        }
        &self.magnitudes
    }
}

/// Indices of half-spectrum bins whose center frequency lies inside
/// `[low_hz, high_hz]` for a transform of `window_len` samples.
pub fn band_bins(window_len: usize, sample_rate: u32, low_hz: f64, high_hz: f64) -> Range<usize> {
    let bin_count = window_len / 2 + 1;
    let bin_hz = sample_rate as f64 / window_len as f64;
    let start = ((low_hz / bin_hz).ceil().max(0.0) as usize).min(bin_count);
    let end = (((high_hz / bin_hz).floor() as usize) + 1).min(bin_count);
    if start >= end {
        return start..start;
    }
    start..end
}

/// Circular cross-correlation of `a` against `b` via the phase transform:
/// only the phase of the cross-power spectrum survives, which sharpens the
/// delay peak. Returns `a.len() + b.len()` samples; lag `l >= 0` sits at
/// index `l`, lag `l < 0` at index `n + l`.
///
/// Zero-magnitude cross-power bins carry no phase information; they are
/// dropped (zero contribution) instead of dividing by zero.
pub fn phat_cross_correlation(
    planner: &mut RealFftPlanner<f64>,
    a: &[f64],
    b: &[f64],
) -> Vec<f64> {
    let n = a.len() + b.len();
    if n == 0 {
        return Vec::new();
    }
    let r2c = planner.plan_fft_forward(n);
    let c2r = planner.plan_fft_inverse(n);

    let mut time_a = r2c.make_input_vec();
    time_a[..a.len()].copy_from_slice(a);
    let mut spec_a = r2c.make_output_vec();
    r2c.process(&mut time_a, &mut spec_a).ok();

    let mut time_b = r2c.make_input_vec();
    time_b[..b.len()].copy_from_slice(b);
    let mut spec_b = r2c.make_output_vec();
    r2c.process(&mut time_b, &mut spec_b).ok();

    let mut degenerate = 0usize;
    let mut phat: Vec<Complex<f64>> = spec_a
        .iter()
        .zip(spec_b.iter())
        .map(|(fa, fb)| {
            let p = fa * fb.conj();
            let mag = p.norm();
            if mag > 0.0 {
                p / mag
            } else {
                degenerate += 1;
                Complex::new(0.0, 0.0)
            }
        })
        .collect();
    if degenerate > 0 {
        tracing::debug!(bins = degenerate, "zero-magnitude cross-power bins dropped");
    }

    // The half spectrum of a real sequence is real at DC and (for even n)
    // Nyquist; clear rounding residue so the inverse transform accepts it.
    phat[0].im = 0.0;
    if n % 2 == 0 {
        let last = phat.len() - 1;
        phat[last].im = 0.0;
    }

    let mut corr = c2r.make_output_vec();
    c2r.process(&mut phat, &mut corr).ok();

    let scale = 1.0 / n as f64;
    for v in corr.iter_mut() {
        *v *= scale;
    }
    corr
}
