//! Text-file ECG input: one integer sample per line, extra whitespace
//! tolerated.

use crate::error::{EcgError, Result};
use std::fs;
use std::path::Path;

/// Read an ECG recording stored as whitespace-separated integer samples.
///
/// Values are truncated to 16 bits, matching an ADC capture replayed from a
/// wider text representation.
pub fn read_samples(path: &Path) -> Result<Vec<i16>> {
    let text = fs::read_to_string(path).map_err(|source| EcgError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut samples = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        for token in line.split_whitespace() {
            let value: i64 = token.parse().map_err(|_| EcgError::BadSample {
                line: idx + 1,
                text: token.to_string(),
            })?;
            samples.push(value as i16);
        }
    }
    Ok(samples)
}
