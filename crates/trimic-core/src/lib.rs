pub mod config;
pub mod error;
pub mod types;

pub use config::{
    AppConfig, ArrayConfig, DelayConfig, DetectorConfig, GeneralConfig, PhysicsConfig, SolverConfig,
};
pub use error::{ConfigError, InputError};
pub use types::{
    DelayMeasurement, EventLocation, EventWindow, MicrophoneArray, Recording, CHANNEL_COUNT,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_creation() {
        let rec = Recording::new(vec![vec![0.0, 0.5, -0.5]; 3], 44100).unwrap();
        assert_eq!(rec.len(), 3);
        assert_eq!(rec.sample_rate(), 44100);
    }

    #[test]
    fn test_event_location_fields() {
        let loc = EventLocation {
            event_index: 0,
            onset_seconds: 0.5,
            x: 1.0,
            y: 2.0,
            converged: true,
            residual: 1e-12,
        };
        assert_eq!(loc.event_index, 0);
        assert!(loc.converged);
    }
}
