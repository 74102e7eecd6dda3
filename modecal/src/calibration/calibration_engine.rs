use super::{AscParameters, CalibrationError};
use modecal_core::ObservedShares;

/// an optimization backend for the calibration loop: supplies the starting
/// parameters and proposes new parameters after each completed trial.
pub trait CalibrationEngine {
    fn initial(&self) -> AscParameters;

    fn update(
        &mut self,
        trial_number: usize,
        current: &AscParameters,
        observed: &ObservedShares,
    ) -> Result<AscParameters, CalibrationError>;
}
