use crate::constants::{HP_BUFFER_LEN, LP_BUFFER_LEN};

/// Integer low-pass stage of the band-pass cascade (cutoff ~15 Hz at 200 Hz).
///
/// Difference equation `y[n] = 2y[n-1] - y[n-2] + x[n] - 2x[n-6] + x[n-12]`,
/// realized in Direct Form II: the two feedback taps live in dedicated
/// registers and the ring holds raw input samples. The raw value is scaled
/// down by an arithmetic right shift of 5 so the cascade stays inside 16
/// bits; headroom is the ADC's responsibility. Group delay is 5 samples.
pub struct LowPassFilter {
    buf: [i16; LP_BUFFER_LEN],
    head: usize,
    y_prev: i16,
    y_prev2: i16,
}

impl LowPassFilter {
    pub fn new() -> Self {
        Self {
            buf: [0; LP_BUFFER_LEN],
            head: 0,
            y_prev: 0,
            y_prev2: 0,
        }
    }

    /// Feed one raw ADC sample, returning the scaled filter output.
    pub fn process(&mut self, x: i16) -> i16 {
        // The head slot is x[n-12]; half a ring ahead of it is x[n-6].
        let half = (self.head + LP_BUFFER_LEN / 2) % LP_BUFFER_LEN;

        let w = (((self.y_prev as i32) << 1) - self.y_prev2 as i32 + x as i32
            - ((self.buf[half] as i32) << 1)
            + self.buf[self.head] as i32) as i16;

        self.y_prev2 = self.y_prev;
        self.y_prev = w;
        self.buf[self.head] = x;
        self.head = (self.head + 1) % LP_BUFFER_LEN;

        w >> 5
    }
}

/// Integer high-pass stage (cutoff ~5 Hz); with [`LowPassFilter`] it forms
/// the band-pass path.
///
/// Difference equation
/// `y[n] = y[n-1] + x[n-32]/32 - x[n]/32 + x[n-16] - x[n-17]` over the
/// low-pass output, with the running `y` carried in a recursive accumulator
/// across samples. The exposed value is the accumulator arithmetically
/// shifted right by 1. Group delay is 16 samples.
pub struct HighPassFilter {
    buf: [i16; HP_BUFFER_LEN],
    head: usize,
    y: i16,
}

impl HighPassFilter {
    pub fn new() -> Self {
        Self {
            buf: [0; HP_BUFFER_LEN],
            head: 0,
            y: 0,
        }
    }

    /// Feed one low-pass output sample, returning the band-passed value.
    pub fn process(&mut self, x: i16) -> i16 {
        let half = (self.head + HP_BUFFER_LEN / 2) % HP_BUFFER_LEN;
        let prev = if half == 0 { HP_BUFFER_LEN - 1 } else { half - 1 };

        self.y = (self.y as i32 + (self.buf[self.head] as i32 >> 5) - (x as i32 >> 5)
            + self.buf[half] as i32
            - self.buf[prev] as i32) as i16;

        self.buf[self.head] = x;
        self.head = (self.head + 1) % HP_BUFFER_LEN;

        self.y >> 1
    }
}
