//! Run statistics.

use std::fmt;

/// Terminal outcome of one record within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordOutcome {
    /// Nothing to do under the current mode
    Skipped,
    /// No recognized repository reference
    InvalidRepo,
    /// Lookup failed for a reason other than rate limiting
    Failed,
    /// Lookup succeeded and the record was updated
    Succeeded,
}

/// Counts for one run.
///
/// `performed` counts records that reached a terminal outcome; the record a
/// run halts on is not counted anywhere.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStatistics {
    pub performed: usize,
    pub skipped: usize,
    pub failed: usize,
    pub invalid_repo: usize,
    pub succeeded: usize,
}

impl RunStatistics {
    pub fn record(&mut self, outcome: RecordOutcome) {
        self.performed += 1;
        match outcome {
            RecordOutcome::Skipped => self.skipped += 1,
            RecordOutcome::InvalidRepo => self.invalid_repo += 1,
            RecordOutcome::Failed => self.failed += 1,
            RecordOutcome::Succeeded => self.succeeded += 1,
        }
    }

    /// Percentage of performed records that succeeded or needed nothing.
    pub fn success_rate(&self) -> Option<f64> {
        if self.performed == 0 {
            return None;
        }
        Some((self.succeeded + self.skipped) as f64 / self.performed as f64 * 100.0)
    }
}

impl fmt::Display for RunStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Plugins checked: {}", self.performed)?;
        writeln!(f, "Plugins skipped: {}", self.skipped)?;
        writeln!(f, "Plugins failed: {}", self.failed)?;
        writeln!(f, "Plugins with invalid repo: {}", self.invalid_repo)?;
        write!(f, "Plugins succeeded: {}", self.succeeded)?;
        if let Some(rate) = self.success_rate() {
            write!(
                f,
                "\nPlugins succeeded or skipped: {} {:.2}%",
                self.succeeded + self.skipped,
                rate
            )?;
        }
        Ok(())
    }
}
