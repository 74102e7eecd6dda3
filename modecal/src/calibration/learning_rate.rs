use serde::{Deserialize, Serialize};

/// step size schedule for ASC updates, indexed by trial number
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum LearningRate {
    /// same step size for every trial
    Constant { rate: f64 },
    /// grows linearly from `start` to 1 over `interval` trials, then stays at 1
    Linear { start: f64, interval: usize },
}

impl LearningRate {
    pub fn rate(&self, trial_number: usize) -> f64 {
        match self {
            LearningRate::Constant { rate } => *rate,
            LearningRate::Linear { start, interval } => {
                if *interval == 0 || trial_number >= *interval {
                    1.0
                } else {
                    start + (1.0 - start) * (trial_number as f64 / *interval as f64)
                }
            }
        }
    }
}

impl Default for LearningRate {
    fn default() -> Self {
        LearningRate::Constant { rate: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_schedule() {
        let lr = LearningRate::Linear {
            start: 0.25,
            interval: 20,
        };
        assert_eq!(lr.rate(0), 0.25);
        assert!((lr.rate(10) - 0.625).abs() < 1e-12);
        assert_eq!(lr.rate(20), 1.0);
        assert_eq!(lr.rate(250), 1.0);
    }

    #[test]
    fn test_constant_schedule() {
        let lr = LearningRate::Constant { rate: 0.5 };
        assert_eq!(lr.rate(0), 0.5);
        assert_eq!(lr.rate(99), 0.5);
    }
}
