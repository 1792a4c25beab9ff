use crate::constants::{
    PT1000MS, RR_BUFFER_LEN, RR_HIGH_LIMIT_STARTUP, RR_LOW_LIMIT_STARTUP,
    RR_MISSED_LIMIT_STARTUP,
};

/// Rhythm classification carried by the most recent accepted interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartRhythm {
    Regular,
    Irregular,
}

/// Dual rolling RR-interval averages with acceptance limits.
///
/// The recent buffer takes every interval; the selected buffer only those
/// inside the 92% to 116% acceptance band around the recent mean. The missed
/// limit (166% of the selected mean, or of the recent mean right after an
/// irregular interval) is what arms search-back. Both sums are maintained
/// incrementally; buffers start filled with the 1 s startup interval.
pub struct RrTracker {
    recent_buf: [i16; RR_BUFFER_LEN],
    selected_buf: [i16; RR_BUFFER_LEN],
    recent_head: usize,
    selected_head: usize,
    recent_sum: i16,
    selected_sum: i16,
    recent_mean: i16,
    selected_mean: i16,
    low_limit: i16,
    high_limit: i16,
    missed_limit: i16,
    rhythm: HeartRhythm,
}

impl RrTracker {
    pub fn new() -> Self {
        Self {
            recent_buf: [PT1000MS; RR_BUFFER_LEN],
            selected_buf: [PT1000MS; RR_BUFFER_LEN],
            recent_head: 0,
            selected_head: 0,
            recent_sum: PT1000MS << 3,
            selected_sum: PT1000MS << 3,
            recent_mean: PT1000MS,
            selected_mean: PT1000MS,
            low_limit: RR_LOW_LIMIT_STARTUP,
            high_limit: RR_HIGH_LIMIT_STARTUP,
            missed_limit: RR_MISSED_LIMIT_STARTUP,
            rhythm: HeartRhythm::Regular,
        }
    }

    /// Fold one confirmed interval in, returning its classification.
    ///
    /// An in-band interval refreshes both buffers and re-derives all three
    /// limits; an out-of-band interval only widens the missed limit around
    /// the recent mean so search-back arms sooner relative to the rhythm
    /// actually observed.
    pub fn update(&mut self, qrs: i16) -> HeartRhythm {
        self.recent_sum += qrs - self.recent_buf[self.recent_head];
        self.recent_buf[self.recent_head] = qrs;
        self.recent_mean = self.recent_sum / RR_BUFFER_LEN as i16;
        self.recent_head = (self.recent_head + 1) % RR_BUFFER_LEN;

        if qrs >= self.low_limit && qrs <= self.high_limit {
            self.selected_sum += qrs - self.selected_buf[self.selected_head];
            self.selected_buf[self.selected_head] = qrs;
            self.selected_mean = self.selected_sum / RR_BUFFER_LEN as i16;
            self.selected_head = (self.selected_head + 1) % RR_BUFFER_LEN;

            self.low_limit = self.recent_mean - (self.recent_mean << 1) / 25;
            self.high_limit = self.recent_mean + (self.recent_mean << 2) / 25;
            self.missed_limit = self.selected_mean + self.selected_mean * 33 / 50;
            self.rhythm = HeartRhythm::Regular;
        } else {
            self.missed_limit = self.recent_mean + self.recent_mean * 33 / 50;
            self.rhythm = HeartRhythm::Irregular;
        }

        self.rhythm
    }

    pub fn recent_mean(&self) -> i16 {
        self.recent_mean
    }

    pub fn selected_mean(&self) -> i16 {
        self.selected_mean
    }

    pub fn missed_limit(&self) -> i16 {
        self.missed_limit
    }

    pub fn rhythm(&self) -> HeartRhythm {
        self.rhythm
    }
}
