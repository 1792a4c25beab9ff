//! Real-time fixed-point QRS (R-peak) detection for single-lead ECG streams
//! sampled at 200 Hz.
//!
//! The detector consumes 16-bit samples one at a time and reports each beat
//! as a delay, in samples, back from the current input. All hot-path
//! arithmetic is 16/32-bit integer adds, subtracts and shifts, sized for
//! microcontrollers without an FPU.

pub mod config;
pub mod constants;
pub mod detector;
pub mod error;
pub mod input;
pub mod output;
pub mod signal_processing;

pub use config::RunConfig;
pub use detector::{DetectorState, HeartRhythm, QrsDetector};
pub use error::{EcgError, Result};
