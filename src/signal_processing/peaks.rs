/// 3-point local-maximum detector that emits the peak value.
///
/// Emits `x[n-1]` whenever `x[n-2] < x[n-1] >= x[n]`, else 0. Runs on the
/// integrated signal, where every emitted value is a beat candidate.
pub struct PeakEmitter {
    prev: u16,
    prev2: u16,
}

impl PeakEmitter {
    pub fn new() -> Self {
        Self { prev: 0, prev2: 0 }
    }

    pub fn process(&mut self, x: u16) -> u16 {
        let p = if x <= self.prev && self.prev > self.prev2 {
            self.prev
        } else {
            0
        };
        self.prev2 = self.prev;
        self.prev = x;
        p
    }
}

/// Rectified running maximum over 3-point local maxima.
///
/// Tracks the tallest local peak of `|x|` seen since the last [`clear`],
/// without emitting anything per sample; the decision logic consumes the
/// stored value when the integrated signal fires.
///
/// [`clear`]: RunningPeak::clear
pub struct RunningPeak {
    prev: i16,
    prev2: i16,
    best: i16,
}

impl RunningPeak {
    pub fn new() -> Self {
        Self {
            prev: 0,
            prev2: 0,
            best: 0,
        }
    }

    pub fn observe(&mut self, x: i16) {
        let mag = if x < 0 { x.wrapping_neg() } else { x };
        if mag <= self.prev && self.prev > self.prev2 && self.prev > self.best {
            self.best = self.prev;
        }
        self.prev2 = self.prev;
        self.prev = mag;
    }

    pub fn best(&self) -> i16 {
        self.best
    }

    /// Drop the stored maximum; the two-sample history is kept so detection
    /// continues seamlessly across beat boundaries.
    pub fn clear(&mut self) {
        self.best = 0;
    }
}
