use crate::spectrum::phat_cross_correlation;
use realfft::RealFftPlanner;

#[derive(Debug, Clone, Default)]
pub struct DelaySettings {
    /// Largest lag magnitude (in samples) considered when scanning the
    /// correlation. `None` treats the whole frame as plausible.
    pub max_lag_samples: Option<usize>,
}

/// GCC-PHAT time-delay estimator.
///
/// Resolution is one sample (no sub-sample interpolation) and no SNR check
/// is performed; the estimate is only as good as the input segments.
pub struct DelayEstimator {
    settings: DelaySettings,
    planner: RealFftPlanner<f64>,
}

impl DelayEstimator {
    pub fn new(settings: DelaySettings) -> Self {
        Self {
            settings,
            planner: RealFftPlanner::new(),
        }
    }

    /// Signed offset in seconds of `sig` relative to `sigref`; positive when
    /// `sig` lags the reference. Deterministic for fixed inputs: the lag of
    /// maximum absolute correlation wins, ties going to the first occurrence
    /// in scan order (most negative lag first).
    pub fn estimate(&mut self, sig: &[f64], sigref: &[f64], sample_rate: u32) -> f64 {
        let n = sig.len() + sigref.len();
        if n == 0 {
            return 0.0;
        }

        let corr = phat_cross_correlation(&mut self.planner, sig, sigref);

        // Lags span [-n/2, n/2); positive lag l sits at corr[l], negative at
        // corr[n + l].
        let max_offset = (n / 2) as isize;
        let bound = match self.settings.max_lag_samples {
            Some(b) => (b as isize).min(max_offset),
            None => max_offset,
        };
        let lo = -bound;
        let hi = bound.min(max_offset - 1);

        let mut best_lag = 0isize;
        let mut best_val = -1.0f64;
        for lag in lo..=hi {
            let index = if lag < 0 {
                (n as isize + lag) as usize
            } else {
                lag as usize
            };
            let value = corr[index].abs();
            if value > best_val {
                best_val = value;
                best_lag = lag;
            }
        }

        best_lag as f64 / sample_rate as f64
    }
}
