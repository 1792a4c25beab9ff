use crate::constants::{MVA_BUFFER_LEN, MVA_LIM_VAL};

/// Rolling integrator over the last 30 squared samples.
///
/// The window sum is maintained incrementally over a circular buffer. Both
/// ends are clamped: the add saturates at `u16::MAX` and retiring the oldest
/// entry floors at 0, so a saturated window recovers instead of wrapping.
/// The output is the window mean, hard-limited to 32000. Group delay is 15
/// samples.
pub struct MovingWindowIntegrator {
    buf: [u16; MVA_BUFFER_LEN],
    head: usize,
    sum: u16,
}

impl MovingWindowIntegrator {
    pub fn new() -> Self {
        Self {
            buf: [0; MVA_BUFFER_LEN],
            head: 0,
            sum: 0,
        }
    }

    /// Feed one squared sample, returning the clamped window mean.
    pub fn process(&mut self, sq: u16) -> u16 {
        if self.sum < u16::MAX - sq {
            self.sum += sq;
        } else {
            self.sum = u16::MAX;
        }

        let oldest = self.buf[self.head];
        if self.sum > oldest {
            self.sum -= oldest;
        } else {
            self.sum = 0;
        }

        self.buf[self.head] = sq;
        self.head = (self.head + 1) % MVA_BUFFER_LEN;

        (self.sum / MVA_BUFFER_LEN as u16).min(MVA_LIM_VAL)
    }
}
