//! Per-sample instrumentation rows.

/// Everything reported about one processed sample: the filter-chain taps,
/// the located R peak (absolute sample index, 0 when none fired this
/// sample) and the running threshold state.
pub struct SampleRecord {
    pub input: i16,
    pub lpf: i16,
    pub hpf: i16,
    pub drf: i16,
    pub sqf: u16,
    pub mva: u16,
    pub r_location: u64,
    pub th_i1: u16,
    pub spki: u16,
    pub npki: u16,
    pub th_f1: i16,
}

impl SampleRecord {
    /// Column header matching [`csv_row`].
    ///
    /// [`csv_row`]: SampleRecord::csv_row
    pub const CSV_HEADER: &'static str =
        "Input,LPFilter,HPFilter,DerivativeF,SQRFilter,MVAFilter,RBeat,RunningThI1,SignalLevel,NoiseLevel,RunningThF";

    pub fn csv_row(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{}",
            self.input,
            self.lpf,
            self.hpf,
            self.drf,
            self.sqf,
            self.mva,
            self.r_location,
            self.th_i1,
            self.spki,
            self.npki,
            self.th_f1
        )
    }
}
