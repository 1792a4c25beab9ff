pub mod derivative;
pub mod filters;
pub mod moving_average;
pub mod peaks;
pub mod squaring;

pub use derivative::DerivativeFilter;
pub use filters::{HighPassFilter, LowPassFilter};
pub use moving_average::MovingWindowIntegrator;
pub use peaks::{PeakEmitter, RunningPeak};
pub use squaring::square;
