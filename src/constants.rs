//! Numeric constants for the 200 Hz detection pipeline.
//!
//! Every timing constant is expressed in samples at the fixed 200 Hz ADC
//! rate; the filter coefficients and RR fractions are only valid at this
//! rate.

/// Samples in 200 ms: the blank-time window, also the tail of the emit delay.
pub const PT200MS: i16 = 40;

/// Samples in 360 ms: the T-wave refractory window.
pub const PT360MS: i16 = 72;

/// Samples in 1 s: the startup RR-interval estimate.
pub const PT1000MS: i16 = 200;

/// Samples in 2 s: the length of the peak-learning window.
pub const PT2000MS: i16 = 400;

/// Samples in 4 s: beat-free interval that triggers a full restart.
pub const PT4000MS: i16 = 800;

/// Cumulative group delay of the filter cascade (5 + 16 + 2 + 15 samples).
pub const GENERAL_DELAY: i16 = 38;

/// Startup RR acceptance and missed limits: 92%, 116% and 166% of 1 s.
pub const RR_LOW_LIMIT_STARTUP: i16 = 184;
pub const RR_HIGH_LIMIT_STARTUP: i16 = 232;
pub const RR_MISSED_LIMIT_STARTUP: i16 = 332;

/// Ring lengths of the filter stages.
pub const LP_BUFFER_LEN: usize = 12;
pub const HP_BUFFER_LEN: usize = 32;
pub const DR_BUFFER_LEN: usize = 4;
pub const MVA_BUFFER_LEN: usize = 30;

/// Entries in each rolling RR-interval buffer.
pub const RR_BUFFER_LEN: usize = 8;

/// Derivative magnitude above which the squaring stage saturates.
pub const SQR_LIM_VAL: i16 = 256;

/// Hard limit on the squaring output.
pub const SQR_LIM_OUT: u16 = 30000;

/// Hard limit on the moving-average output.
pub const MVA_LIM_VAL: u16 = 32000;
