pub mod detector;
pub mod gcc;
pub mod spectrum;

pub use detector::{ActivityDetector, DetectorSettings};
pub use gcc::{DelayEstimator, DelaySettings};
pub use spectrum::{band_bins, phat_cross_correlation, SpectrumAnalyzer};
