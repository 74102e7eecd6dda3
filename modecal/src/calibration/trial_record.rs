use super::AscParameters;
use modecal_core::ObservedShares;
use serde::{Deserialize, Serialize};

/// outcome of one completed simulation trial
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrialRecord {
    pub trial_number: usize,
    pub params: AscParameters,
    pub observed: ObservedShares,
    pub mean_absolute_error: f64,
}
