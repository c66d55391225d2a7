use crate::spectrum::{band_bins, SpectrumAnalyzer};
use std::ops::Range;
use trimic_core::EventWindow;

#[derive(Debug, Clone)]
pub struct DetectorSettings {
    pub window_length: usize,
    pub band_low_hz: f64,
    pub band_high_hz: f64,
    pub threshold: f64,
}

/// Band-energy-ratio onset detector over non-overlapping windows.
///
/// A window whose in-band magnitude fraction exceeds the threshold opens a
/// detection and jumps the scan pointer by two window lengths, so brief
/// pauses inside one event do not close it. A failing window closes the open
/// detection at its own start.
pub struct ActivityDetector {
    settings: DetectorSettings,
    analyzer: SpectrumAnalyzer,
    band: Range<usize>,
}

impl ActivityDetector {
    pub fn new(settings: DetectorSettings, sample_rate: u32) -> Self {
        let analyzer = SpectrumAnalyzer::new(settings.window_length);
        let band = band_bins(
            settings.window_length,
            sample_rate,
            settings.band_low_hz,
            settings.band_high_hz,
        );
        Self {
            settings,
            analyzer,
            band,
        }
    }

    /// Detected event windows, ordered by start and non-overlapping. Empty
    /// input or no qualifying window yields an empty list.
    pub fn detect(&mut self, samples: &[f64]) -> Vec<EventWindow> {
        let window_length = self.settings.window_length;
        let n = samples.len();
        let limit = n.saturating_sub(window_length);

        let mut events = Vec::new();
        let mut open: Option<usize> = None;
        let mut w = 0usize;

        while w < limit {
            let ratio = self.band_ratio(&samples[w..w + window_length]);
            if ratio > self.settings.threshold {
                if open.is_none() {
                    tracing::debug!(start = w, ratio, "activity onset");
                    open = Some(w);
                }
                w += 2 * window_length;
                if w > limit {
                    // Hysteresis jump ran off the end: clip to the end of the signal.
                    if let Some(start) = open.take() {
                        events.push(EventWindow { start, end: n });
                    }
                    break;
                }
            } else {
                if let Some(start) = open.take() {
                    tracing::debug!(start, end = w, "activity closed");
                    events.push(EventWindow { start, end: w });
                }
                w += window_length;
            }
        }

        // A jump can land exactly on the last full window boundary with the
        // detection still open; every emitted window must have end > start.
        if let Some(start) = open.take() {
            events.push(EventWindow { start, end: n });
        }

        events
    }

    fn band_ratio(&mut self, window: &[f64]) -> f64 {
        let mags = self.analyzer.magnitudes(window);
        let total: f64 = mags.iter().sum();
        if total <= 0.0 {
            return 0.0;
        }
        let in_band: f64 = mags[self.band.clone()].iter().sum();
        in_band / total
    }
}
