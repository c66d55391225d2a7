//! Orchestration of the three analysis stages: activity detection on the
//! reference channel, per-event delay estimation against the two measurement
//! channels, and the hyperbolic position solve. Events are independent; a
//! solve that fails to converge is reported on its record and the remaining
//! events proceed untouched.

use trimic_core::{
    AppConfig, ConfigError, DelayMeasurement, DetectorConfig, EventLocation, MicrophoneArray,
    Recording,
};
use trimic_dsp::{ActivityDetector, DelayEstimator, DelaySettings, DetectorSettings};
use trimic_solver::{hyperbolic_residual, GaussNewton, LeastSquares};

pub struct Pipeline {
    detector: DetectorConfig,
    array: MicrophoneArray,
    speed_of_sound: f64,
    delay: DelaySettings,
    solver: GaussNewton,
    initial_guess: [f64; 2],
}

impl Pipeline {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            detector: config.detector.clone(),
            array: config.array.build()?,
            speed_of_sound: config.physics.speed_of_sound,
            delay: DelaySettings {
                max_lag_samples: config.delay.max_lag_samples,
            },
            solver: GaussNewton {
                max_iterations: config.solver.max_iterations,
                tolerance: config.solver.tolerance,
            },
            initial_guess: config.solver.initial_guess,
        })
    }

    pub fn array(&self) -> &MicrophoneArray {
        &self.array
    }

    /// Locate every detected event in the recording, ordered by onset.
    pub fn run(&self, recording: &Recording) -> Vec<EventLocation> {
        let sample_rate = recording.sample_rate();
        let settings = DetectorSettings {
            window_length: self.detector.window_length_for(sample_rate),
            band_low_hz: self.detector.band_low_hz,
            band_high_hz: self.detector.band_high_hz,
            threshold: self.detector.threshold,
        };

        let mut detector = ActivityDetector::new(settings, sample_rate);
        let events = detector.detect(recording.channel(self.array.reference()));
        tracing::info!(count = events.len(), "activity detection complete");

        let mut estimator = DelayEstimator::new(self.delay.clone());
        let mut locations = Vec::with_capacity(events.len());

        for (event_index, window) in events.iter().enumerate() {
            let reference = &recording.channel(self.array.reference())[window.start..window.end];

            let delays = self.array.measurement().map(|channel| DelayMeasurement {
                channel,
                seconds: estimator.estimate(
                    &recording.channel(channel)[window.start..window.end],
                    reference,
                    sample_rate,
                ),
            });

            tracing::debug!(
                event = event_index,
                channel_a = delays[0].channel,
                tau_a = delays[0].seconds,
                channel_b = delays[1].channel,
                tau_b = delays[1].seconds,
                "delays estimated"
            );

            let tau = [delays[0].seconds, delays[1].seconds];
            let solution = self.solver.solve(
                &|point| hyperbolic_residual(point, tau, self.speed_of_sound, &self.array),
                self.initial_guess,
            );

            if solution.converged {
                tracing::info!(
                    event = event_index,
                    x = solution.position[0],
                    y = solution.position[1],
                    "event located"
                );
            } else {
                tracing::warn!(
                    event = event_index,
                    residual = solution.residual_norm,
                    iterations = solution.iterations,
                    "position solve did not converge"
                );
            }

            locations.push(EventLocation {
                event_index,
                onset_seconds: window.onset_seconds(sample_rate),
                x: solution.position[0],
                y: solution.position[1],
                converged: solution.converged,
                residual: solution.residual_norm,
            });
        }

        locations
    }
}
