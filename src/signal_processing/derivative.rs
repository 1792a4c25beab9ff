use crate::constants::DR_BUFFER_LEN;

/// 5-point derivative, `y[n] = (2x[n] + x[n-1] - x[n-3] - 2x[n-4]) >> 3`.
///
/// The tap line is short enough that shifting the taps beats ring indexing.
/// Group delay is 2 samples.
pub struct DerivativeFilter {
    taps: [i16; DR_BUFFER_LEN],
}

impl DerivativeFilter {
    pub fn new() -> Self {
        Self {
            taps: [0; DR_BUFFER_LEN],
        }
    }

    /// Feed one band-passed sample, returning the scaled slope estimate.
    pub fn process(&mut self, x: i16) -> i16 {
        let d = self.taps[0].wrapping_sub(self.taps[2]);
        let w = (d as i32 + ((x as i32 - self.taps[3] as i32) << 1)) as i16;

        self.taps[3] = self.taps[2];
        self.taps[2] = self.taps[1];
        self.taps[1] = self.taps[0];
        self.taps[0] = x;

        w >> 3
    }
}
