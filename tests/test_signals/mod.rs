//! Synthetic ECG streams for the integration tests.

use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Zero baseline with single-sample impulses of `amplitude` at `positions`.
pub fn impulse_train(len: usize, amplitude: i16, positions: &[usize]) -> Vec<i16> {
    let mut signal = vec![0i16; len];
    for &pos in positions {
        signal[pos] = amplitude;
    }
    signal
}

/// Evenly spaced impulse positions starting at `first`.
pub fn regular_positions(len: usize, first: usize, period: usize) -> Vec<usize> {
    (first..len).step_by(period).collect()
}

/// Add a single-sample impulse into an existing signal.
pub fn add_impulse(signal: &mut [i16], at: usize, amplitude: i16) {
    signal[at] = amplitude;
}

/// Add a broad triangular bump centered on `at`, `half_width` samples per
/// flank. The gentle flanks give it a QRS-scale area with a fraction of the
/// slope.
pub fn add_broad_bump(signal: &mut [i16], at: usize, amplitude: i16, half_width: usize) {
    for k in 0..=half_width {
        let v = (amplitude as i32 * (half_width - k) as i32 / half_width as i32) as i16;
        signal[at + k] = v;
        signal[at - k] = v;
    }
}

/// Add a narrow triangular QRS-like complex centered on `at` (the annotated
/// R position): one sample each side at half amplitude.
pub fn add_qrs(signal: &mut [i16], at: usize, amplitude: i16) {
    signal[at - 1] = amplitude / 2;
    signal[at] = amplitude;
    signal[at + 1] = amplitude / 2;
}

/// Uniform noise in `[-amplitude, amplitude]` from a fixed seed.
pub fn seeded_noise(len: usize, amplitude: i16, seed: u64) -> Vec<i16> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    (0..len)
        .map(|_| rng.random_range(-amplitude..=amplitude))
        .collect()
}
