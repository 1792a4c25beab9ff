//! Run options for the command-line front-end.

use std::path::PathBuf;

/// Options for one file-processing run.
///
/// # Example
/// ```
/// use pulsegate::RunConfig;
///
/// let mut config = RunConfig::new("ecg.txt");
/// config.echo = true;
/// ```
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// Input ECG text file, one sample per line.
    pub input: PathBuf,
    /// Destination for the per-sample instrumentation rows.
    pub output: PathBuf,
    /// Echo each CSV row to stdout as it is written.
    pub echo: bool,
}

impl RunConfig {
    pub fn new(input: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: PathBuf::from("output.csv"),
            echo: false,
        }
    }
}
