use crate::calibration::{AscParameters, CalibrationError};
use modecal_core::ObservedShares;

/// runs one simulation trial for a parameter vector and reports the mode
/// shares it produced
pub trait TrialRunner {
    fn run_trial(
        &self,
        trial_number: usize,
        params: &AscParameters,
    ) -> Result<ObservedShares, CalibrationError>;
}
